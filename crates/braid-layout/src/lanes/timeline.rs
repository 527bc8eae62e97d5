//! Timeline-aware lane allocation with reuse.
//!
//! Only concurrent branches widen the gutter. When a branch has its last
//! record its lane is freed and the next new branch takes the lowest free
//! lane. Raw lane numbers are never shown: each row reports the rank of its
//! lane among the lanes active at that row, so the gutter is always a dense
//! `0..k-1`.
//!
//! Every call runs a fresh [`TimelineScan`]; nothing is shared between calls.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use braid_types::{ExecId, Record};

use super::RowLanes;

/// Output of [`layout_timeline`], indexed by record position.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineLanes {
    /// Compacted lane per row; `None` for rows without an execution id.
    pub lane_by_index: Vec<Option<usize>>,
    /// Active branch count per row; 0 for rows without an execution id.
    pub lane_count_by_index: Vec<usize>,
    /// Most lanes active at once over the whole sequence.
    pub peak_lanes: usize,
}

impl TimelineLanes {
    /// Per-row view in the shared lane contract.
    pub fn rows(&self) -> Vec<RowLanes> {
        self.lane_by_index
            .iter()
            .zip(&self.lane_count_by_index)
            .map(|(lane, count)| RowLanes {
                lane: *lane,
                lane_count: *count,
            })
            .collect()
    }
}

/// Scan accumulator: raw lanes in use and which branch holds which.
#[derive(Default)]
struct TimelineScan<'a> {
    active: BTreeSet<usize>,
    lane_of: HashMap<&'a str, usize>,
}

impl<'a> TimelineScan<'a> {
    /// Raw lane held by `id`, opening the lowest free one for a new branch.
    fn acquire(&mut self, id: &'a str) -> usize {
        if let Some(lane) = self.lane_of.get(id) {
            return *lane;
        }
        let lane = (0..).find(|l| !self.active.contains(l)).unwrap_or_default();
        self.active.insert(lane);
        self.lane_of.insert(id, lane);
        lane
    }

    /// Dense column of `raw` among the lanes active right now.
    fn compact(&self, raw: usize) -> usize {
        self.active.range(..raw).count()
    }

    fn release(&mut self, id: &str) {
        if let Some(lane) = self.lane_of.remove(id) {
            self.active.remove(&lane);
        }
    }
}

/// Allocate timeline lanes for `records`.
pub fn layout_timeline(records: &[Record]) -> TimelineLanes {
    let ids: Vec<Option<ExecId>> = records.iter().map(Record::exec_id).collect();
    layout_timeline_ids(&ids)
}

/// [`layout_timeline`] over pre-resolved execution ids.
pub fn layout_timeline_ids(ids: &[Option<ExecId>]) -> TimelineLanes {
    let mut last_index: HashMap<&str, usize> = HashMap::new();
    for (i, id) in ids.iter().enumerate() {
        if let Some(id) = id {
            last_index.insert(id.as_str(), i);
        }
    }

    let mut out = TimelineLanes {
        lane_by_index: Vec::with_capacity(ids.len()),
        lane_count_by_index: Vec::with_capacity(ids.len()),
        peak_lanes: 0,
    };
    let mut scan = TimelineScan::default();

    for (i, id) in ids.iter().enumerate() {
        let Some(id) = id.as_ref().map(ExecId::as_str) else {
            out.lane_by_index.push(None);
            out.lane_count_by_index.push(0);
            continue;
        };

        let raw = scan.acquire(id);
        let count = scan.active.len();
        out.lane_by_index.push(Some(scan.compact(raw)));
        out.lane_count_by_index.push(count);
        out.peak_lanes = out.peak_lanes.max(count);

        if last_index.get(id) == Some(&i) {
            scan.release(id);
        }
    }

    tracing::debug!(rows = ids.len(), peak = out.peak_lanes, "timeline lanes computed");
    out
}

// ============================================================================
// Tests
// ============================================================================
