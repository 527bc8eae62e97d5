//! Group marker extraction from free text.
//!
//! Conversational content is free text that may or may not embed a JSON
//! directive. Three shapes are recognised, tried in order:
//!
//! 1. the whole (trimmed) text is a JSON object or array,
//! 2. a fenced code block (```` ```json ... ``` ````),
//! 3. an object embedded somewhere in running text.
//!
//! Nothing here fails: text that does not parse is simply not a marker.
//! Each call handles one level; nesting is the caller's loop (see
//! [`crate::segments`]).

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

use braid_types::{Marker, MarkerKind};

/// First fenced block, optionally tagged `json`. Lazy so the first fence wins.
static FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)```(?:json)?\s*([\s\S]*?)```").expect("fence pattern is valid")
});

/// Result of [`parse_structured_with_remainder`].
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Parsed {
    /// The structured value found, if any.
    pub parsed: Option<Value>,
    /// Text left over once the structured part is removed, trimmed.
    pub remainder: Option<String>,
}

/// Result of [`split_at_first_marker`].
///
/// `before` and `after` are untrimmed slices of the input, so
/// `before + after` holds every character that was not part of the marker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MarkerSplit {
    pub before: String,
    pub marker: Marker,
    pub after: String,
}

/// Recognise a group marker in an already-structured value.
///
/// Two shapes:
/// - an explicit `type` of `collapsed_group` or `expanded`,
/// - a `collapsedGroup` / `collapsed_group` object with an `expanded` flag.
pub fn try_extract_marker(value: &Value) -> Option<Marker> {
    let obj = value.as_object()?;

    match obj.get("type").and_then(Value::as_str) {
        Some("collapsed_group") => return Some(marker_from(obj, MarkerKind::Collapsed)),
        Some("expanded" | "expanded_group") => return Some(marker_from(obj, MarkerKind::Expanded)),
        _ => {}
    }

    let group = ["collapsedGroup", "collapsed_group"]
        .iter()
        .find_map(|key| obj.get(*key).filter(|v| truthy(v)))?
        .as_object()?;
    let kind = if group.get("expanded").is_some_and(truthy) {
        MarkerKind::Expanded
    } else {
        MarkerKind::Collapsed
    };
    Some(marker_from(group, kind))
}

fn marker_from(obj: &Map<String, Value>, kind: MarkerKind) -> Marker {
    let label = ["name", "group"]
        .iter()
        .find_map(|key| obj.get(*key).and_then(text_of))
        .unwrap_or_else(|| Marker::DEFAULT_LABEL.to_string());
    Marker {
        kind,
        label,
        description: obj.get("description").and_then(text_of),
        response_id: ["responseId", "response_id"]
            .iter()
            .find_map(|key| obj.get(*key).and_then(text_of)),
    }
}

/// Non-empty string or number as text.
fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Loose truthiness: upstream flags arrive as bools, 0/1, or strings.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn looks_structured(s: &str) -> bool {
    (s.starts_with('{') && s.ends_with('}')) || (s.starts_with('[') && s.ends_with(']'))
}

fn parse_json(s: &str) -> Option<Value> {
    serde_json::from_str(s).ok()
}

/// Parse a JSON-ish value out of `raw`, keeping whatever text surrounds it.
///
/// Structured input is returned untouched. Non-string scalars and empty text
/// yield nothing. Text that holds no parsable JSON comes back as the
/// remainder.
pub fn parse_structured_with_remainder(raw: &Value) -> Parsed {
    match raw {
        Value::String(s) => parse_text_with_remainder(s),
        Value::Object(_) | Value::Array(_) => Parsed {
            parsed: Some(raw.clone()),
            remainder: None,
        },
        _ => Parsed::default(),
    }
}

/// Text form of [`parse_structured_with_remainder`].
pub fn parse_text_with_remainder(raw: &str) -> Parsed {
    let s = raw.trim();
    if s.is_empty() {
        return Parsed::default();
    }

    if looks_structured(s)
        && let Some(value) = parse_json(s)
    {
        return Parsed {
            parsed: Some(value),
            remainder: None,
        };
    }

    if let Some(caps) = FENCE.captures(s)
        && let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1))
        && !inner.as_str().is_empty()
        && let Some(value) = parse_json(inner.as_str().trim())
    {
        let outside = format!("{}{}", &s[..whole.start()], &s[whole.end()..]);
        return Parsed {
            parsed: Some(value),
            remainder: non_empty(outside.trim()),
        };
    }

    if let Some((first, last)) = outer_braces(s)
        && let Some(value) = parse_json(&s[first..=last])
    {
        let remainder = [s[..first].trim(), s[last + 1..].trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        return Parsed {
            parsed: Some(value),
            remainder: non_empty(&remainder),
        };
    }

    Parsed {
        parsed: None,
        remainder: Some(s.to_string()),
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() { None } else { Some(s.to_string()) }
}

/// Byte positions of the first `{` and the last `}`, when they enclose something.
fn outer_braces(s: &str) -> Option<(usize, usize)> {
    let first = s.find('{')?;
    let last = s.rfind('}')?;
    (last > first).then_some((first, last))
}

/// First `{` (at or after `from`) that starts a complete JSON value.
///
/// Returns the fragment's byte range and value. JSON objects are
/// self-delimiting, so anything after the closing brace is left alone.
fn first_parsable_fragment(s: &str, from: usize) -> Option<(usize, usize, Value)> {
    s[from..]
        .match_indices('{')
        .map(|(offset, _)| from + offset)
        .find_map(|start| {
            let mut stream = serde_json::Deserializer::from_str(&s[start..]).into_iter::<Value>();
            match stream.next() {
                Some(Ok(value)) => Some((start, start + stream.byte_offset(), value)),
                _ => None,
            }
        })
}

/// Split `raw` around the first embedded group marker.
///
/// The first fragment that parses as JSON decides the outcome: when it is not
/// a marker the result is `None`, even if a later fragment would have been.
/// Returns `None` when the text holds no parsable fragment at all.
pub fn split_at_first_marker(raw: &str) -> Option<MarkerSplit> {
    let split = |before: &str, value: &Value, after: &str| {
        try_extract_marker(value).map(|marker| MarkerSplit {
            before: before.to_string(),
            marker,
            after: after.to_string(),
        })
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if looks_structured(trimmed)
        && let Some(value) = parse_json(trimmed)
    {
        return split("", &value, "");
    }

    if let Some(caps) = FENCE.captures(raw)
        && let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1))
        && !inner.as_str().is_empty()
        && let Some(value) = parse_json(inner.as_str().trim())
    {
        return split(&raw[..whole.start()], &value, &raw[whole.end()..]);
    }

    let (first, last) = outer_braces(raw)?;
    if let Some(value) = parse_json(&raw[first..=last]) {
        return split(&raw[..first], &value, &raw[last + 1..]);
    }

    // Several fragments in running text: the widest slice does not parse,
    // so take the earliest self-contained one.
    let (start, end, value) = first_parsable_fragment(raw, first)?;
    split(&raw[..start], &value, &raw[end..])
}

// ============================================================================
// Tests
// ============================================================================
