//! Static tree-based lane mapping.
//!
//! Assigns a fixed lane per execution id from the parent/child forest. Roots
//! open new lanes left to right; the first child (by id) stays on its
//! parent's lane so a branch continues straight down, and later siblings
//! branch out to new lanes. Lanes are handed out in depth-first preorder and
//! never reused, so `lane_count` is the total number of branch points plus
//! roots.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use braid_types::{BranchNode, ExecId};

use super::RowLanes;

/// Output of [`assign_subtree_lanes`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtreeLanes {
    pub lane_by_id: HashMap<ExecId, usize>,
    pub lane_count: usize,
}

impl SubtreeLanes {
    pub fn lane_of(&self, id: &str) -> Option<usize> {
        self.lane_by_id.get(id).copied()
    }

    /// Per-row view in the shared lane contract. Every row with a lane is
    /// drawn at the full forest width.
    pub fn rows(&self, exec_ids: &[Option<ExecId>]) -> Vec<RowLanes> {
        exec_ids
            .iter()
            .map(|id| {
                let lane = id.as_ref().and_then(|id| self.lane_of(id.as_str()));
                RowLanes {
                    lane,
                    lane_count: if lane.is_some() { self.lane_count } else { 0 },
                }
            })
            .collect()
    }
}

/// How a node popped off the DFS stack gets its lane.
#[derive(Clone, Copy)]
enum Slot {
    /// First child: continue the parent's lane.
    Inherit(usize),
    /// Root or later sibling: open the next lane.
    Fresh,
}

/// Depth-first lane walk with a shared lane counter.
struct SubtreeWalk<'a> {
    children: HashMap<&'a str, Vec<&'a BranchNode>>,
    visited: HashSet<&'a str>,
    lanes: SubtreeLanes,
}

impl<'a> SubtreeWalk<'a> {
    fn walk(&mut self, start: &'a BranchNode) {
        let mut stack = vec![(start, Slot::Fresh)];

        while let Some((node, slot)) = stack.pop() {
            if !self.visited.insert(node.id.as_str()) {
                continue;
            }
            let lane = match slot {
                Slot::Inherit(lane) => lane,
                Slot::Fresh => {
                    let lane = self.lanes.lane_count;
                    self.lanes.lane_count += 1;
                    lane
                }
            };
            self.lanes.lane_by_id.insert(node.id.clone(), lane);

            if let Some(kids) = self.children.get(node.id.as_str()) {
                // Reverse push so the first child is walked (and numbered) first.
                for (i, kid) in kids.iter().enumerate().rev() {
                    let slot = if i == 0 { Slot::Inherit(lane) } else { Slot::Fresh };
                    stack.push((*kid, slot));
                }
            }
        }
    }
}

/// Assign a fixed lane to every node of the forest.
///
/// Duplicate ids keep the last node. Nodes caught in a parent cycle are never
/// reachable from a root; each cycle is broken open at its smallest id and
/// laid out after the real roots.
pub fn assign_subtree_lanes(nodes: &[BranchNode]) -> SubtreeLanes {
    // Sorted by id, so roots and sibling lists come out sorted too.
    let by_id: BTreeMap<&str, &BranchNode> = nodes.iter().map(|n| (n.id.as_str(), n)).collect();

    let mut roots = Vec::new();
    let mut children: HashMap<&str, Vec<&BranchNode>> = HashMap::new();
    for node in by_id.values().copied() {
        match node.parent_id.as_ref().map(ExecId::as_str) {
            Some(parent) if parent != node.id.as_str() && by_id.contains_key(parent) => {
                children.entry(parent).or_default().push(node);
            }
            _ => roots.push(node),
        }
    }

    let mut walk = SubtreeWalk {
        children,
        visited: HashSet::new(),
        lanes: SubtreeLanes::default(),
    };
    for root in roots {
        walk.walk(root);
    }

    for node in by_id.values().copied() {
        if !walk.visited.contains(node.id.as_str()) {
            tracing::warn!("parent cycle through {}, laying it out as a root", node.id);
            walk.walk(node);
        }
    }

    tracing::debug!(nodes = by_id.len(), lanes = walk.lanes.lane_count, "subtree lanes computed");
    walk.lanes
}

// ============================================================================
// Tests
// ============================================================================
