//! Execution identifiers and branch nodes.
//!
//! Upstream producers hand us execution ids as arbitrary strings (sometimes
//! numbers). `ExecId` keeps them opaque: no parsing, no normalisation beyond
//! rejecting the empty string. Ids are short, so they live inline in a
//! `SmartString` and clone without allocating.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use smartstring::alias::String as SmartString;

/// Identifier grouping records produced by the same concurrent branch of work.
#[derive(Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecId(SmartString);

impl ExecId {
    /// Build an id from text. Empty (or whitespace-only) text is not an id.
    pub fn new(s: impl AsRef<str>) -> Option<Self> {
        let s = s.as_ref();
        if s.trim().is_empty() {
            None
        } else {
            Some(Self(SmartString::from(s)))
        }
    }

    /// The id text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

// Equality, ordering and hashing all go through `as_str` so that
// `HashMap<ExecId, _>` lookups by `&str` agree with `Borrow<str>`.

impl PartialEq for ExecId {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for ExecId {}

impl PartialOrd for ExecId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ExecId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl Hash for ExecId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl Borrow<str> for ExecId {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for ExecId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ExecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for ExecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExecId({})", self.as_str())
    }
}

/// A node of the branch forest: an execution id and its parent, if known.
///
/// A node whose parent is absent, or names an id that is not itself a node,
/// is a root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchNode {
    pub id: ExecId,
    #[serde(default)]
    pub parent_id: Option<ExecId>,
}

impl BranchNode {
    /// Create a node. A self-referential parent is dropped.
    pub fn new(id: ExecId, parent_id: Option<ExecId>) -> Self {
        let parent_id = parent_id.filter(|p| *p != id);
        Self { id, parent_id }
    }

    /// Whether this node declares no parent.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

// ============================================================================
// Tests
// ============================================================================
