//! Lane assignment strategies.
//!
//! Two strategies exist for two input assumptions, and they keep different
//! guarantees:
//!
//! - [`subtree`]: the full forest is known up front. Each branch gets one
//!   fixed lane; lane numbers only grow.
//! - [`timeline`]: only the linear sequence is known. Lanes are reclaimed when
//!   a branch ends and compacted per row.
//!
//! Both report through the same per-row contract, [`RowLanes`].

pub mod subtree;
pub mod timeline;

use serde::Serialize;

use braid_types::{ExecId, Record};

use crate::config::LaneStrategy;
use crate::graph::BranchGraph;

pub use subtree::{SubtreeLanes, assign_subtree_lanes};
pub use timeline::{TimelineLanes, layout_timeline, layout_timeline_ids};

/// Lane of one row and the gutter width it should be drawn with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowLanes {
    /// Column for this row's branch; `None` for rows without an execution id.
    pub lane: Option<usize>,
    /// Number of columns in this row's gutter; 0 for rows without an id.
    pub lane_count: usize,
}

/// Run `strategy` over `records` and report one [`RowLanes`] per record.
pub fn assign_rows(strategy: LaneStrategy, records: &[Record], graph: &BranchGraph) -> Vec<RowLanes> {
    let ids: Vec<Option<ExecId>> = records.iter().map(Record::exec_id).collect();
    match strategy {
        LaneStrategy::Timeline => layout_timeline_ids(&ids).rows(),
        LaneStrategy::Subtree => assign_subtree_lanes(&graph.nodes()).rows(&ids),
    }
}
