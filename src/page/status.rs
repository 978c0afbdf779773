use crate::api::ConnectionStatus;

use super::{NETWORK_ERROR_DETAIL, OFFLINE_PREFIX, ONLINE_TEXT};

/// Affirmative or warning color of the status indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Rendered green.
    Positive,
    /// Rendered red.
    Negative,
}

impl Tone {
    pub fn color_name(self) -> &'static str {
        match self {
            Self::Positive => "green",
            Self::Negative => "red",
        }
    }
}

/// The connection status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusIndicator {
    pub label: String,
    pub tone: Tone,
}

impl StatusIndicator {
    /// Indicator for a status payload the backend returned.
    pub fn from_status(status: &ConnectionStatus) -> Self {
        if status.is_online() {
            Self {
                label: ONLINE_TEXT.to_string(),
                tone: Tone::Positive,
            }
        } else {
            Self::offline(&status.detail_text())
        }
    }

    /// Indicator for a check that never got a status payload.
    pub fn network_error() -> Self {
        Self::offline(NETWORK_ERROR_DETAIL)
    }

    fn offline(detail: &str) -> Self {
        Self {
            label: format!("{OFFLINE_PREFIX} ({detail})"),
            tone: Tone::Negative,
        }
    }

    pub fn is_positive(&self) -> bool {
        self.tone == Tone::Positive
    }
}
