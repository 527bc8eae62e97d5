//! Collapsible group markers.
//!
//! A marker is a structured directive embedded in otherwise free text. It
//! tells the presentation layer to open a collapsible panel; the text that
//! follows the marker is the panel body and may hold further markers.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Whether a group starts folded or unfolded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MarkerKind {
    Collapsed,
    Expanded,
}

impl MarkerKind {
    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerKind::Collapsed => "collapsed",
            MarkerKind::Expanded => "expanded",
        }
    }
}

/// A collapsed/expanded group header.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub kind: MarkerKind,
    pub label: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub response_id: Option<String>,
}

impl Marker {
    /// Label used when the directive names neither `name` nor `group`.
    pub const DEFAULT_LABEL: &'static str = "GROUP";

    pub fn new(kind: MarkerKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
            description: None,
            response_id: None,
        }
    }

    /// Whether the panel should start unfolded.
    pub fn is_expanded(&self) -> bool {
        self.kind == MarkerKind::Expanded
    }
}
