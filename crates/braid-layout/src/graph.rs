//! Branch forest derived from timeline records.
//!
//! The BranchGraph is an ephemeral child → parent index computed from the
//! records' execution ids and parent hints. It is rebuilt on every layout
//! pass and never outlives the snapshot it was built from.

use std::collections::HashSet;

use indexmap::IndexMap;

use braid_types::{BranchNode, DEFAULT_MAX_ANCESTOR_HOPS, ExecId, Record};

/// Child → parent mapping over execution ids, in first-appearance order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BranchGraph {
    parents: IndexMap<ExecId, Option<ExecId>>,
}

impl BranchGraph {
    /// Build the parent map from timeline records.
    ///
    /// Every record with an execution id contributes a node. Parent hints are
    /// optional; when records of the same id disagree, the last hint observed
    /// wins. A record without a hint never erases an earlier one.
    pub fn from_records(records: &[Record]) -> Self {
        let mut parents: IndexMap<ExecId, Option<ExecId>> = IndexMap::new();

        for record in records {
            let Some(id) = record.exec_id() else {
                continue;
            };
            let hint = record.parent_exec_id().filter(|p| *p != id);
            let slot = parents.entry(id).or_insert(None);
            if let Some(hint) = hint {
                if let Some(previous) = slot.as_ref()
                    && *previous != hint
                {
                    tracing::trace!(%previous, %hint, "conflicting parent hints, keeping the latest");
                }
                *slot = Some(hint);
            }
        }

        Self { parents }
    }

    /// Build the parent map from explicit branch nodes. Later nodes replace
    /// earlier ones with the same id.
    pub fn from_nodes(nodes: &[BranchNode]) -> Self {
        let mut parents = IndexMap::new();
        for node in nodes {
            let parent = node.parent_id.clone().filter(|p| *p != node.id);
            parents.insert(node.id.clone(), parent);
        }
        Self { parents }
    }

    /// Declared parent of `id`, if any.
    pub fn parent_of(&self, id: &str) -> Option<&ExecId> {
        self.parents.get(id).and_then(Option::as_ref)
    }

    /// Whether `id` appeared in the source records.
    pub fn contains(&self, id: &str) -> bool {
        self.parents.contains_key(id)
    }

    /// Nodes in first-appearance order.
    pub fn nodes(&self) -> Vec<BranchNode> {
        self.parents
            .iter()
            .map(|(id, parent)| BranchNode {
                id: id.clone(),
                parent_id: parent.clone(),
            })
            .collect()
    }

    /// Iterate `(id, parent)` pairs in first-appearance order.
    pub fn iter(&self) -> impl Iterator<Item = (&ExecId, Option<&ExecId>)> {
        self.parents.iter().map(|(id, parent)| (id, parent.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Is `candidate` an ancestor of (or equal to) `descendant`?
    ///
    /// Walks parent links from `descendant` toward the root. Circuit-breaks
    /// on a revisited id (cycle) or after `max_hops` links; both count as
    /// "not an ancestor".
    pub fn is_ancestor(&self, candidate: &str, descendant: &str, max_hops: usize) -> bool {
        if candidate == descendant {
            return true;
        }

        let mut seen = HashSet::new();
        let mut current = Some(descendant);
        let mut hops = 0;

        while let Some(id) = current {
            if id == candidate {
                return true;
            }
            if hops >= max_hops {
                tracing::warn!("is_ancestor hit hop ceiling ({max_hops}) from {descendant}");
                return false;
            }
            if !seen.insert(id) {
                tracing::debug!("parent cycle through {id}, treating as unrelated");
                return false;
            }
            current = self.parent_of(id).map(ExecId::as_str);
            hops += 1;
        }

        false
    }

    /// Same branch: one id is an ancestor of the other, in either direction.
    pub fn same_branch(&self, a: &str, b: &str, max_hops: usize) -> bool {
        self.is_ancestor(a, b, max_hops) || self.is_ancestor(b, a, max_hops)
    }

    /// Chain from `start` up to its root (inclusive).
    ///
    /// Stops at an unknown parent, a cycle, or `max_hops` links. Empty when
    /// `start` is not in the graph.
    pub fn lineage(&self, start: &str, max_hops: usize) -> Vec<&ExecId> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = self.parents.get_key_value(start).map(|(id, _)| id);

        while let Some(id) = current {
            if chain.len() > max_hops || !seen.insert(id.as_str()) {
                break;
            }
            chain.push(id);
            current = self
                .parent_of(id.as_str())
                .and_then(|p| self.parents.get_key_value(p.as_str()))
                .map(|(id, _)| id);
        }

        chain
    }
}

/// Free-function form of [`BranchGraph::is_ancestor`] with the default ceiling.
pub fn is_ancestor(candidate: &str, descendant: &str, graph: &BranchGraph) -> bool {
    graph.is_ancestor(candidate, descendant, DEFAULT_MAX_ANCESTOR_HOPS)
}

// ============================================================================
// Tests
// ============================================================================
