/// Wire types returned by the code-generation backend.
///
/// The client never owns these entities. They are deserialized, turned into
/// view-model state, and dropped.
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// POST /generate-code
// ---------------------------------------------------------------------------

/// Response body of `POST /generate-code`.
///
/// Every field is optional on the wire. The backend sends `resources: null`
/// when the model reply was not valid JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub resources: Option<Vec<ResourceLink>>,
}

impl GenerationResult {
    /// The generated code, or `None` when absent or empty.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref().filter(|c| !c.is_empty())
    }

    /// The explanation, or `None` when absent or empty.
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref().filter(|e| !e.is_empty())
    }

    /// The resource list, empty when absent or `null`.
    pub fn resources(&self) -> &[ResourceLink] {
        self.resources.as_deref().unwrap_or_default()
    }
}

/// A citation returned with generated code.
///
/// The backend sends either a bare URL string or an object with a URL and an
/// optional display title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceLink {
    Url(String),
    Titled {
        #[serde(default)]
        url: String,
        #[serde(default)]
        title: Option<String>,
    },
}

impl ResourceLink {
    /// Link target.
    pub fn href(&self) -> &str {
        match self {
            Self::Url(url) => url,
            Self::Titled { url, .. } => url,
        }
    }

    /// Display label: the title, falling back to the URL when the title is
    /// absent or empty.
    pub fn label(&self) -> &str {
        match self {
            Self::Url(url) => url,
            Self::Titled { url, title } => title
                .as_deref()
                .filter(|t| !t.is_empty())
                .unwrap_or(url.as_str()),
        }
    }
}

// ---------------------------------------------------------------------------
// GET /check-connection
// ---------------------------------------------------------------------------

/// Response body of `GET /check-connection`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    #[serde(default)]
    pub status: Option<String>,
    /// Free-form detail. FastAPI error bodies put a string or a list here.
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ConnectionStatus {
    pub fn online() -> Self {
        Self {
            status: Some("online".to_string()),
            detail: None,
        }
    }

    pub fn offline(detail: impl Into<String>) -> Self {
        Self {
            status: Some("offline".to_string()),
            detail: Some(serde_json::Value::String(detail.into())),
        }
    }

    pub fn is_online(&self) -> bool {
        self.status.as_deref() == Some("online")
    }

    /// Human-readable detail text: strings verbatim, other JSON as JSON.
    pub fn detail_text(&self) -> String {
        match &self.detail {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Null) | None => "unknown".to_string(),
            Some(other) => other.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// GET /history
// ---------------------------------------------------------------------------

/// Server-side identifier of a history item.
///
/// The reference backend uses integer primary keys; string ids are accepted
/// so other backends can be used.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HistoryId {
    Number(i64),
    Text(String),
}

impl HistoryId {
    /// Parse an id typed by the user: integers become [`HistoryId::Number`].
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.parse::<i64>() {
            Ok(n) => Self::Number(n),
            Err(_) => Self::Text(raw.to_string()),
        }
    }
}

impl fmt::Display for HistoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// A previously submitted prompt and the raw response the backend stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub id: HistoryId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub prompt: String,
    /// JSON-encoded generation payload as produced by the model. May not be
    /// valid JSON at all.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Read a nullable string column as an empty string.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
