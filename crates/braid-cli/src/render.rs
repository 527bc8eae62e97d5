//! Timeline layout as an ASCII gutter.
//!
//! One line per row:
//!
//! ```text
//! ●  ╷ m0 "start the build"
//!  ● │ m1 [+Tools] "ran 3 tools"
//! ●  ╵ m2 "done"
//! ```
//!
//! The gutter is as wide as the widest row so text columns line up; the dot
//! sits on the row's lane, and the glyph after the gutter shows which part
//! of the cell the connector spans.

use serde_json::Value;

use braid_layout::{Connector, Marker, Record, RowLayout, Segment, TimelineLayout};

const SUMMARY_CHARS: usize = 40;

/// Format a layout as gutter lines, one per row.
pub fn format_layout_lines(layout: &TimelineLayout, records: &[Record]) -> Vec<String> {
    let width = layout.max_columns().max(1);
    layout
        .rows
        .iter()
        .zip(records)
        .map(|(row, record)| format_row(row, record, width))
        .collect()
}

fn format_row(row: &RowLayout, record: &Record, width: usize) -> String {
    let cell = row.gutter();
    let gutter: String = (0..width)
        .map(|c| if c == cell.column { '●' } else { ' ' })
        .collect();

    let span = match cell.connector {
        Connector::Through => '│',
        Connector::Up => '╵',
        Connector::Down => '╷',
        Connector::None => ' ',
    };

    let content = match record.content() {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    };
    let summary = format_content_summary(&content, SUMMARY_CHARS);

    match &row.marker {
        Some(found) => format!("{gutter} {span} {} {} \"{summary}\"", row.key, marker_tag(&found.marker)),
        None => format!("{gutter} {span} {} \"{summary}\"", row.key),
    }
}

/// `[+Label]` for a collapsed group, `[-Label]` for an expanded one.
fn marker_tag(marker: &Marker) -> String {
    let sign = if marker.is_expanded() { '-' } else { '+' };
    format!("[{sign}{}]", marker.label)
}

/// Format decomposed segments, indented two spaces per depth.
pub fn format_segment_lines(segments: &[Segment]) -> Vec<String> {
    let mut lines = Vec::new();
    for segment in segments {
        let indent = "  ".repeat(segment.depth());
        match segment {
            Segment::Marker { marker, .. } => {
                let mut line = format!("{indent}{}", marker_tag(marker));
                if let Some(description) = &marker.description {
                    line.push_str(&format!(" {description}"));
                }
                lines.push(line);
            }
            Segment::Text { text, .. } => {
                lines.extend(
                    text.lines()
                        .filter(|l| !l.trim().is_empty())
                        .map(|l| format!("{indent}{}", l.trim())),
                );
            }
        }
    }
    lines
}

/// Format content as a truncated summary.
fn format_content_summary(content: &str, max_chars: usize) -> String {
    // First line only
    let first_line = content.lines().next().unwrap_or("");
    let trimmed = first_line.trim();

    if trimmed.chars().count() <= max_chars {
        trimmed.to_string()
    } else {
        let truncated: String = trimmed.chars().take(max_chars - 3).collect();
        format!("{}...", truncated)
    }
}
