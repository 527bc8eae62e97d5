//! Connector adjacency between consecutive rows.
//!
//! Two consecutive rows are connected when one execution id is an ancestor of
//! the other (or they are the same id). Siblings and cousins break the line.
//! The result governs whether a vertical segment is drawn through a row's
//! gutter cell and is independent of which lane strategy placed the rows.

use serde::Serialize;

use braid_types::{DEFAULT_MAX_ANCESTOR_HOPS, ExecId, Record};

use crate::graph::BranchGraph;

/// Per-row connector flags.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Adjacency {
    /// Row `i` connects up to row `i - 1`.
    pub prev_connected: Vec<bool>,
    /// Row `i` connects down to row `i + 1`.
    pub next_connected: Vec<bool>,
}

/// Compute adjacency over resolved execution ids.
///
/// Each boundary between rows is decided once and written to both sides, so
/// `next_connected[i] == prev_connected[i + 1]` always holds.
pub fn compute_adjacency(exec_ids: &[Option<ExecId>], graph: &BranchGraph, max_hops: usize) -> Adjacency {
    let n = exec_ids.len();
    let mut adjacency = Adjacency {
        prev_connected: vec![false; n],
        next_connected: vec![false; n],
    };

    for (i, pair) in exec_ids.windows(2).enumerate() {
        let linked = match (&pair[0], &pair[1]) {
            (Some(a), Some(b)) => graph.same_branch(a.as_str(), b.as_str(), max_hops),
            _ => false,
        };
        adjacency.next_connected[i] = linked;
        adjacency.prev_connected[i + 1] = linked;
    }

    adjacency
}

/// [`compute_adjacency`] straight from records, building the graph as well.
pub fn compute_adjacency_for_records(records: &[Record], max_hops: usize) -> Adjacency {
    let graph = BranchGraph::from_records(records);
    let ids: Vec<Option<ExecId>> = records.iter().map(Record::exec_id).collect();
    compute_adjacency(&ids, &graph, max_hops)
}

/// Adjacency over a plain list of id strings; empty strings count as absent.
pub fn compute_adjacency_for_ids<S: AsRef<str>>(ids: &[Option<S>], graph: &BranchGraph) -> Adjacency {
    let ids: Vec<Option<ExecId>> = ids
        .iter()
        .map(|id| id.as_ref().and_then(ExecId::new))
        .collect();
    compute_adjacency(&ids, graph, DEFAULT_MAX_ANCESTOR_HOPS)
}

// ============================================================================
// Tests
// ============================================================================
