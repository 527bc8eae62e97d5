//! Flat decomposition of nested group markers.
//!
//! An expanded group's body can itself hold further groups. Instead of
//! mutually recursive render functions, the text is unrolled into a flat list
//! of depth-tagged segments: each marker opens one level, and everything after
//! it belongs to that level. The presentation layer nests panels by depth.

use serde::Serialize;

use braid_types::Marker;

use crate::parse::split_at_first_marker;

/// One piece of decomposed text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Segment {
    /// Literal text to render as-is.
    Text { depth: usize, text: String },
    /// A collapsible header; the following deeper segments are its body.
    Marker { depth: usize, marker: Marker },
}

impl Segment {
    /// Nesting depth (0 for top level).
    pub fn depth(&self) -> usize {
        match self {
            Segment::Text { depth, .. } | Segment::Marker { depth, .. } => *depth,
        }
    }

    pub fn is_marker(&self) -> bool {
        matches!(self, Segment::Marker { .. })
    }
}

/// Unroll `text` into depth-tagged segments.
///
/// Blank text between markers is dropped. Once `max_depth` markers are open
/// the rest of the text is kept as a literal so pathological input cannot
/// nest without bound.
pub fn decompose(text: &str, max_depth: usize) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut rest = text.to_string();
    let mut depth = 0;

    while !rest.trim().is_empty() {
        if depth >= max_depth {
            tracing::warn!("decompose hit max nesting depth ({max_depth}), keeping remainder as text");
            segments.push(Segment::Text { depth, text: rest });
            break;
        }

        let Some(split) = split_at_first_marker(&rest) else {
            segments.push(Segment::Text { depth, text: rest });
            break;
        };

        if !split.before.trim().is_empty() {
            segments.push(Segment::Text {
                depth,
                text: split.before,
            });
        }
        segments.push(Segment::Marker {
            depth,
            marker: split.marker,
        });
        rest = split.after;
        depth += 1;
    }

    segments
}
