use chrono::{DateTime, NaiveDateTime};
use serde_json::Value;

use crate::api::{HistoryId, HistoryItem, ResourceLink};

use super::resources::RenderedLink;

/// The history dialog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryModal {
    pub visible: bool,
    pub list: HistoryList,
    pub details: Option<HistoryDetails>,
}

/// Content of the history list container.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum HistoryList {
    /// Never opened.
    #[default]
    Idle,
    Loading,
    Empty,
    Failed(String),
    Rows(Vec<HistoryRow>),
}

impl HistoryList {
    pub fn rows(&self) -> &[HistoryRow] {
        match self {
            Self::Rows(rows) => rows,
            _ => &[],
        }
    }

    /// Remove the row with `id`. Returns whether a row was removed.
    pub fn remove(&mut self, id: &HistoryId) -> bool {
        let Self::Rows(rows) = self else {
            return false;
        };
        let before = rows.len();
        rows.retain(|row| &row.item.id != id);
        rows.len() != before
    }

    pub fn find(&self, id: &HistoryId) -> Option<&HistoryRow> {
        self.rows().iter().find(|row| &row.item.id == id)
    }
}

/// One entry of the history list: the prompt (opens details) and a delete
/// control.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    pub item: HistoryItem,
    /// `created_at` formatted for display, when the backend sent one.
    pub created: Option<String>,
}

impl HistoryRow {
    pub fn new(item: HistoryItem) -> Self {
        let created = item.created_at.as_deref().map(format_timestamp);
        Self { item, created }
    }

    pub fn id(&self) -> &HistoryId {
        &self.item.id
    }

    pub fn prompt(&self) -> &str {
        &self.item.prompt
    }
}

/// Format a backend timestamp as `YYYY-MM-DD HH:MM`.
///
/// Accepts naive ISO-8601 (what the reference backend emits) and RFC 3339.
/// Anything else is shown as-is.
fn format_timestamp(raw: &str) -> String {
    const DISPLAY: &str = "%Y-%m-%d %H:%M";

    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return ts.format(DISPLAY).to_string();
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return ts.format(DISPLAY).to_string();
    }
    raw.to_string()
}

/// Full view of one stored request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryDetails {
    pub prompt: String,
    pub code: String,
    pub explanation: String,
    pub resources: Vec<RenderedLink>,
}

impl HistoryDetails {
    /// Build the details view from a stored item.
    ///
    /// The stored response is the model's raw reply. When it is not JSON the
    /// whole string is shown as code; a JSON value that isn't an object shows
    /// nothing. Resource links get the same title-or-URL label as in the
    /// generation flow.
    pub fn from_item(item: &HistoryItem) -> Self {
        let Ok(parsed) = serde_json::from_str::<Value>(&item.response) else {
            return Self {
                prompt: item.prompt.clone(),
                code: item.response.clone(),
                explanation: String::new(),
                resources: Vec::new(),
            };
        };

        let text_field = |key: &str| {
            parsed
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        let resources = parsed
            .get("resources")
            .and_then(Value::as_array)
            .map(|links| {
                links
                    .iter()
                    .filter_map(|link| serde_json::from_value::<ResourceLink>(link.clone()).ok())
                    .map(|link| RenderedLink::from(&link))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            prompt: item.prompt.clone(),
            code: text_field("code"),
            explanation: text_field("explanation"),
            resources,
        }
    }
}
