use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of interaction event
///
/// Unrecognised kinds are kept verbatim in `Other` instead of failing to
/// parse, since the log is written by clients we don't control.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InteractionKind {
    View,
    Complete,
    Like,
    Dislike,
    Other(String),
}

impl InteractionKind {
    /// Contribution of one event to the interaction matrix
    pub fn weight(&self) -> f64 {
        match self {
            InteractionKind::View => 1.0,
            InteractionKind::Complete => 3.0,
            InteractionKind::Like => 5.0,
            InteractionKind::Dislike => -5.0,
            InteractionKind::Other(_) => 0.5,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            InteractionKind::View => "view",
            InteractionKind::Complete => "complete",
            InteractionKind::Like => "like",
            InteractionKind::Dislike => "dislike",
            InteractionKind::Other(kind) => kind,
        }
    }
}

impl From<String> for InteractionKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "view" => InteractionKind::View,
            "complete" => InteractionKind::Complete,
            "like" => InteractionKind::Like,
            "dislike" => InteractionKind::Dislike,
            _ => InteractionKind::Other(kind),
        }
    }
}

impl From<&str> for InteractionKind {
    fn from(kind: &str) -> Self {
        InteractionKind::from(kind.to_string())
    }
}

impl From<InteractionKind> for String {
    fn from(kind: InteractionKind) -> Self {
        match kind {
            InteractionKind::Other(kind) => kind,
            known => known.as_str().to_string(),
        }
    }
}

/// One event from the interaction log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub profile_id: String,
    pub content_id: String,
    #[serde(rename = "type")]
    pub kind: InteractionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Watch duration in seconds, when the client reported one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl Interaction {
    pub fn new(
        profile_id: impl Into<String>,
        content_id: impl Into<String>,
        kind: impl Into<InteractionKind>,
    ) -> Self {
        Self {
            profile_id: profile_id.into(),
            content_id: content_id.into(),
            kind: kind.into(),
            timestamp: None,
            duration: None,
        }
    }
}
