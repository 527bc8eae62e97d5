//! Timeline records and field alias resolution.
//!
//! Records arrive from several upstream producers that never agreed on field
//! names: the execution id may be `executionId`, `execId`, `exec_id`, a nested
//! `exec.id`, or a bare `exec` string. Rather than probing ad hoc, each id is
//! resolved against an ordered table of field paths; the first path that
//! yields a usable scalar wins. The tables are public so the resolution order
//! can be audited and tested on its own.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ids::ExecId;

/// A path of object keys from the record root, e.g. `&["exec", "id"]`.
pub type FieldPath = &'static [&'static str];

/// Execution id aliases, most specific first.
pub const EXEC_ID_PATHS: &[FieldPath] = &[
    &["executionId"],
    &["execId"],
    &["exec_id"],
    &["exec", "id"],
    &["exec"],
];

/// Parent execution id aliases, most specific first.
pub const PARENT_ID_PATHS: &[FieldPath] = &[
    &["parentExecutionId"],
    &["exec", "parentId"],
    &["exec", "parent_id"],
    &["parentExecId"],
    &["execParentId"],
    &["parent_exec_id"],
    &["exec", "parent", "id"],
    &["exec_parent"],
];

/// Keys that identify a single message, tried in order for row keys.
const MESSAGE_ID_KEYS: &[&str] = &["id", "message_id", "_id"];

/// Resolve an id against an ordered alias table.
///
/// A path that is missing, null, empty, or lands on a non-scalar is skipped
/// and the next path is tried.
pub fn resolve_id(value: &Value, paths: &[FieldPath]) -> Option<ExecId> {
    paths
        .iter()
        .find_map(|path| lookup(value, path).and_then(scalar_text))
        .and_then(ExecId::new)
}

fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |cur, key| cur.get(*key))
}

/// Text of a string or number value; `None` for empty strings and everything else.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// One timeline entry, read-only.
///
/// Wraps the upstream JSON as-is. Position in the surrounding slice is the
/// time order; the record itself carries no timestamp semantics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Value);

impl Record {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The underlying JSON.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Execution id, resolved through [`EXEC_ID_PATHS`].
    pub fn exec_id(&self) -> Option<ExecId> {
        resolve_id(&self.0, EXEC_ID_PATHS)
    }

    /// Parent execution id hint, resolved through [`PARENT_ID_PATHS`].
    pub fn parent_exec_id(&self) -> Option<ExecId> {
        resolve_id(&self.0, PARENT_ID_PATHS)
    }

    /// The `content` field, text or structured.
    pub fn content(&self) -> Option<&Value> {
        self.0.get("content")
    }

    /// The `content` field when it is a string.
    pub fn content_text(&self) -> Option<&str> {
        self.content().and_then(Value::as_str)
    }

    /// Key that stays stable across refreshes of the same timeline.
    ///
    /// Only per-message identifiers are authoritative; a `docId` can be shared
    /// by many messages and only ever prefixes the key. Without a message id
    /// the key falls back to `docId|create_time|role|index`, which is unique
    /// within one snapshot but not across reorderings.
    pub fn stable_key(&self, index: usize) -> String {
        let doc_id = self.0.get("docId").and_then(scalar_text);
        let message_id = MESSAGE_ID_KEYS
            .iter()
            .find_map(|key| self.0.get(*key).and_then(scalar_text));

        if let Some(message_id) = message_id {
            return match doc_id {
                Some(doc) => format!("{doc}:{message_id}"),
                None => message_id,
            };
        }

        let created = self.0.get("create_time").and_then(scalar_text).unwrap_or_default();
        let role = self.0.get("role").and_then(scalar_text).unwrap_or_default();
        match doc_id {
            Some(doc) => format!("{doc}|{created}|{role}|{index}"),
            None => format!("{created}|{role}|{index}"),
        }
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

// ============================================================================
// Tests
// ============================================================================
