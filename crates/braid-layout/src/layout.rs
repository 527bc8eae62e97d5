//! Render-ready row layout.
//!
//! Composes the branch graph, the configured lane strategy, adjacency, and
//! record-level marker detection into one tuple per record. This is what a
//! presentation layer consumes: it maps `lane` to a horizontal offset, draws
//! connector segments from the gutter cell, and nests panels from the marker
//! body segments.

use serde::Serialize;
use serde_json::Value;

use braid_types::{ExecId, Marker, Record};

use crate::adjacency::compute_adjacency;
use crate::config::{LaneStrategy, LayoutConfig};
use crate::graph::BranchGraph;
use crate::lanes::assign_rows;
use crate::parse::{parse_structured_with_remainder, try_extract_marker};
use crate::segments::{Segment, decompose};

/// A group marker carried by a whole record, with its decomposed body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RecordMarker {
    pub marker: Marker,
    /// Segments of the carrier's `content` text; empty when there is none.
    pub body: Vec<Segment>,
}

/// Find the marker a record carries, if any.
///
/// The record object itself is checked first; then its `content`, parsed
/// leniently. The body is the marker carrier's own `content` string: the
/// record's content for a record-level marker, the parsed object's `content`
/// for an embedded one. Text around an embedded marker is not part of the
/// body.
pub fn record_marker(record: &Record, max_depth: usize) -> Option<RecordMarker> {
    let (marker, body_text) = match try_extract_marker(record.as_value()) {
        Some(marker) => (marker, record.content_text().map(str::to_string)),
        None => {
            let parsed = parse_structured_with_remainder(record.content()?).parsed?;
            let marker = try_extract_marker(&parsed)?;
            let body = parsed.get("content").and_then(Value::as_str).map(str::to_string);
            (marker, body)
        }
    };

    let body = body_text
        .map(|text| decompose(&text, max_depth))
        .unwrap_or_default();
    Some(RecordMarker { marker, body })
}

/// Which part of a gutter cell the vertical connector covers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Connector {
    /// Lone dot.
    #[default]
    None,
    /// From the top edge to the dot.
    Up,
    /// From the dot to the bottom edge.
    Down,
    /// Top edge to bottom edge.
    Through,
}

impl Connector {
    pub fn from_flags(prev: bool, next: bool) -> Self {
        match (prev, next) {
            (true, true) => Connector::Through,
            (true, false) => Connector::Up,
            (false, true) => Connector::Down,
            (false, false) => Connector::None,
        }
    }
}

/// Gutter geometry for one row, in columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct GutterCell {
    /// Column count; at least 1 so the dot always has a place.
    pub columns: usize,
    /// Column holding the dot (0 for rows without a lane).
    pub column: usize,
    pub connector: Connector,
}

/// Everything the presentation layer needs for one record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowLayout {
    pub index: usize,
    /// Stable key for UI state that must survive refreshes.
    pub key: String,
    pub exec_id: Option<ExecId>,
    pub lane: Option<usize>,
    pub lane_count: usize,
    pub prev_connected: bool,
    pub next_connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<RecordMarker>,
}

impl RowLayout {
    /// Gutter geometry for this row.
    pub fn gutter(&self) -> GutterCell {
        let connector = if self.lane.is_some() {
            Connector::from_flags(self.prev_connected, self.next_connected)
        } else {
            Connector::None
        };
        GutterCell {
            columns: self.lane_count.max(1),
            column: self.lane.unwrap_or(0),
            connector,
        }
    }
}

/// Full layout of one timeline snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TimelineLayout {
    pub strategy: LaneStrategy,
    pub rows: Vec<RowLayout>,
}

impl TimelineLayout {
    /// Lay out `records` from scratch.
    pub fn compute(records: &[Record], config: &LayoutConfig) -> Self {
        let graph = BranchGraph::from_records(records);
        let ids: Vec<Option<ExecId>> = records.iter().map(Record::exec_id).collect();
        let lanes = assign_rows(config.strategy, records, &graph);
        let adjacency = compute_adjacency(&ids, &graph, config.max_ancestor_hops);

        let rows: Vec<RowLayout> = records
            .iter()
            .zip(ids)
            .zip(lanes)
            .enumerate()
            .map(|(index, ((record, exec_id), lanes))| {
                // Rows without an id are drawn as a lone dot, never connected.
                let has_id = exec_id.is_some();
                RowLayout {
                    index,
                    key: record.stable_key(index),
                    exec_id,
                    lane: lanes.lane,
                    lane_count: lanes.lane_count,
                    prev_connected: has_id && adjacency.prev_connected[index],
                    next_connected: has_id && adjacency.next_connected[index],
                    marker: record_marker(record, config.max_nesting_depth),
                }
            })
            .collect();

        tracing::debug!(
            rows = rows.len(),
            branches = graph.len(),
            strategy = %config.strategy,
            "timeline layout computed"
        );
        Self {
            strategy: config.strategy,
            rows,
        }
    }

    /// Widest gutter over all rows.
    pub fn max_columns(&self) -> usize {
        self.rows.iter().map(|r| r.gutter().columns).max().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use serde_json::json;

    use braid_types::MarkerKind;

    use super::*;

    fn records(values: Vec<Value>) -> Vec<Record> {
        values.into_iter().map(Record::new).collect()
    }

    #[test]
    fn test_rows_combine_lanes_and_adjacency() {
        let recs = records(vec![
            json!({"id": "m0", "execId": "a", "content": "start"}),
            json!({"id": "m1", "execId": "b", "parentExecId": "a"}),
            json!({"id": "m2", "role": "system", "content": "summary"}),
            json!({"id": "m3", "execId": "a"}),
        ]);
        let layout = TimelineLayout::compute(&recs, &LayoutConfig::default());

        assert_eq!(layout.len(), 4);
        let r = &layout.rows;
        assert_eq!(r[0].key, "m0");
        assert_eq!((r[0].lane, r[0].lane_count), (Some(0), 1));
        assert_eq!((r[1].lane, r[1].lane_count), (Some(1), 2));
        assert!(r[0].next_connected && r[1].prev_connected);
        assert_eq!((r[2].lane, r[2].lane_count), (None, 0));
        assert!(!r[2].prev_connected && !r[2].next_connected);
        assert!(!r[3].prev_connected);
        assert_eq!(layout.max_columns(), 2);
    }

    #[test]
    fn test_subtree_strategy() {
        let recs = records(vec![
            json!({"execId": "a"}),
            json!({"execId": "b", "parentExecId": "a"}),
            json!({"execId": "c", "parentExecId": "a"}),
        ]);
        let config = LayoutConfig::default().with_strategy(LaneStrategy::Subtree);
        let layout = TimelineLayout::compute(&recs, &config);
        assert_eq!(layout.strategy, LaneStrategy::Subtree);
        let lanes: Vec<Option<usize>> = layout.rows.iter().map(|r| r.lane).collect();
        assert_eq!(lanes, vec![Some(0), Some(0), Some(1)]);
        assert!(layout.rows.iter().all(|r| r.lane_count == 2));
    }

    #[test]
    fn test_gutter_cell() {
        let recs = records(vec![
            json!({"execId": "a"}),
            json!({"execId": "a"}),
            json!({"execId": "a"}),
            json!({"content": "no exec"}),
        ]);
        let layout = TimelineLayout::compute(&recs, &LayoutConfig::default());
        let cells: Vec<Connector> = layout.rows.iter().map(|r| r.gutter().connector).collect();
        assert_eq!(
            cells,
            vec![Connector::Down, Connector::Through, Connector::Up, Connector::None]
        );
        let lone = layout.rows[3].gutter();
        assert_eq!((lone.columns, lone.column), (1, 0));
    }

    #[test]
    fn test_record_level_marker() {
        let record = Record::new(json!({
            "type": "collapsed_group",
            "name": "Tools",
            "content": "ran 3 tools {\"type\":\"expanded\",\"name\":\"Inner\"} ok",
        }));
        let found = record_marker(&record, 8).unwrap();
        assert_eq!(found.marker.kind, MarkerKind::Collapsed);
        assert_eq!(found.marker.label, "Tools");
        assert_eq!(found.body.len(), 3);
        assert!(found.body[1].is_marker());
        assert_eq!(found.body[2].depth(), 1);
    }

    #[test]
    fn test_content_marker() {
        let record = Record::new(json!({
            "role": "assistant",
            "content": "```json\n{\"collapsedGroup\":{\"name\":\"Plan\",\"expanded\":true},\"content\":\"step one\"}\n```",
        }));
        let found = record_marker(&record, 8).unwrap();
        assert!(found.marker.is_expanded());
        assert_eq!(found.marker.label, "Plan");
        assert_eq!(
            found.body,
            vec![Segment::Text {
                depth: 0,
                text: "step one".into()
            }]
        );
    }

    #[test]
    fn test_structured_content_marker_without_body() {
        let record = Record::new(json!({"content": {"type": "expanded", "name": "E"}}));
        let found = record_marker(&record, 8).unwrap();
        assert_eq!(found.marker.label, "E");
        assert!(found.body.is_empty());
    }

    #[test]
    fn test_plain_record_has_no_marker() {
        assert!(record_marker(&Record::new(json!({"content": "hello"})), 8).is_none());
        assert!(record_marker(&Record::new(json!({"role": "user"})), 8).is_none());
    }

    #[test]
    fn test_layout_serializes_for_presentation() {
        let recs = records(vec![json!({"id": "x", "execId": "a"})]);
        let layout = TimelineLayout::compute(&recs, &LayoutConfig::default());
        let value = serde_json::to_value(&layout).unwrap();
        assert_eq!(value["strategy"], "Timeline");
        assert_eq!(value["rows"][0]["execId"], "a");
        assert_eq!(value["rows"][0]["laneCount"], 1);
        assert!(value["rows"][0].get("marker").is_none());
    }

    #[test]
    fn test_empty_timeline() {
        let layout = TimelineLayout::compute(&[], &LayoutConfig::default());
        assert!(layout.is_empty());
        assert_eq!(layout.max_columns(), 0);
    }
}
