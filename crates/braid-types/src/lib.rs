//! Shared types for the braid timeline layout engine.
//!
//! This crate is the data foundation: execution ids, the duck-typed timeline
//! record, derived branch nodes, and group markers. It has **no internal
//! braid dependencies**; `braid-layout` builds on it.
//!
//! # Relationship Overview
//!
//! ```text
//! Record (one timeline row, array position = time order)
//!     └── executionId → ExecId (which concurrent branch produced it)
//!     └── parent hint → ExecId (explicit lineage, optional)
//!     └── content     → text or structured value, may embed a Marker
//!
//! BranchNode (ExecId + optional parent ExecId)
//!     └── parent_id forms the branch forest
//!
//! Marker (collapsed / expanded group directive)
//!     └── nested inside content text, arbitrarily deep
//! ```
//!
//! # Key Types
//!
//! |------------------|-----------------------------------------------|
//! | Type             | Purpose                                       |
//! |------------------|-----------------------------------------------|
//! | [`ExecId`]       | Execution id (opaque string, cheap to clone)  |
//! | [`Record`]       | Read-only view over one upstream JSON record  |
//! | [`BranchNode`]   | `{id, parent_id}` forest node                 |
//! | [`Marker`]       | Collapsible group header                      |
//! | [`MarkerKind`]   | Collapsed or expanded                         |
//! |------------------|-----------------------------------------------|

pub mod ids;
pub mod marker;
pub mod record;

pub use ids::{BranchNode, ExecId};
pub use marker::{Marker, MarkerKind};
pub use record::{EXEC_ID_PATHS, FieldPath, PARENT_ID_PATHS, Record, resolve_id};

/// Default ceiling on parent hops when walking a lineage.
///
/// Real branch depth is a handful of levels (agent → sub-agent → tool). The
/// ceiling only exists to stop a corrupted parent chain from spinning.
pub const DEFAULT_MAX_ANCESTOR_HOPS: usize = 100;

/// Default ceiling on nested group markers inside one text blob.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 32;
