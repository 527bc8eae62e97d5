//! Execution-branch timeline layout engine.
//!
//! Takes a time-ordered list of conversational / tool-execution records, each
//! optionally tagged with an execution id, and computes what a presentation
//! layer needs to draw a commit-graph-style gutter beside them.
//!
//! # Pipeline
//!
//! ```text
//! records ─┬─ parse      group markers in content (before / marker / after)
//!          ├─ graph      child → parent map, cycle-safe ancestor queries
//!          ├─ lanes      timeline (reuse + per-row compaction) | subtree (fixed)
//!          ├─ adjacency  prev/next connector flags
//!          └─ layout     one RowLayout per record
//! ```
//!
//! # Failure model
//!
//! Nothing in the pipeline fails. Malformed marker text is plain text, a
//! parent cycle is "not an ancestor", a record without an execution id is a
//! lone dot. Degenerate input degrades to a simpler rendering. Only loading a
//! [`LayoutConfig`] returns errors.
//!
//! Every call is a pure function of its input snapshot; there is no shared
//! state and no incremental mode.

pub mod adjacency;
pub mod config;
mod error;
pub mod graph;
pub mod lanes;
pub mod layout;
pub mod parse;
pub mod segments;

pub use adjacency::{Adjacency, compute_adjacency, compute_adjacency_for_ids, compute_adjacency_for_records};
pub use config::{LaneStrategy, LayoutConfig};
pub use error::ConfigError;
pub use graph::{BranchGraph, is_ancestor};
pub use lanes::{RowLanes, SubtreeLanes, TimelineLanes, assign_rows, assign_subtree_lanes, layout_timeline};
pub use layout::{Connector, GutterCell, RecordMarker, RowLayout, TimelineLayout, record_marker};
pub use parse::{
    MarkerSplit, Parsed, parse_structured_with_remainder, parse_text_with_remainder, split_at_first_marker,
    try_extract_marker,
};
pub use segments::{Segment, decompose};

pub use braid_types::{BranchNode, ExecId, Marker, MarkerKind, Record};

/// Result type for configuration loading.
pub type Result<T> = std::result::Result<T, ConfigError>;
