//! View-model of the code-generation page.
//!
//! [`PageState`] holds everything the page shows: the prompt field, the
//! loading indicator, the code/explanation/sources panels, the connection
//! status line, the history dialog, toasts and pending alerts. Flows mutate
//! it through [`crate::flows::PageController`]; front ends (the interactive
//! shell, one-shot CLI commands) render it.

pub mod history;
pub mod resources;
pub mod status;

use std::time::{Duration, Instant};

pub use history::{HistoryDetails, HistoryList, HistoryModal, HistoryRow};
pub use resources::{RenderedLink, ResourcesPanel};
pub use status::{StatusIndicator, Tone};

use crate::api::GenerationResult;

// ---------------------------------------------------------------------------
// UI strings
// ---------------------------------------------------------------------------

pub const EMPTY_PROMPT_ALERT: &str = "Enter a prompt to generate code!";
pub const CODE_FALLBACK_TEXT: &str = "Code not found";
pub const EXPLANATION_FALLBACK_TEXT: &str = "Explanation not found";
pub const NO_SOURCES_TEXT: &str = "No sources found.";
pub const REQUEST_ERROR_CODE_TEXT: &str = "Error while executing the request.";
pub const REQUEST_ERROR_EXPLANATION_TEXT: &str = "Check the connection to the server.";
pub const NOTHING_TO_COPY_ALERT: &str = "No code to copy!";
pub const COPIED_TOAST_TEXT: &str = "Code copied!";
pub const ONLINE_TEXT: &str = "Connection: Online";
pub const OFFLINE_PREFIX: &str = "Connection: Offline";
pub const NETWORK_ERROR_DETAIL: &str = "Network error";
pub const HISTORY_LOADING_TEXT: &str = "Loading...";
pub const HISTORY_EMPTY_TEXT: &str = "History is empty";
pub const HISTORY_FAILED_TEXT: &str = "Failed to load history";

// ---------------------------------------------------------------------------
// Loading indicator
// ---------------------------------------------------------------------------

/// Spinner shown while a generation request is in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadingIndicator {
    visible: bool,
    completed: u64,
}

impl LoadingIndicator {
    pub fn show(&mut self) {
        self.visible = true;
    }

    /// Hide the indicator. A hide while visible completes one cycle.
    pub fn hide(&mut self) {
        if self.visible {
            self.visible = false;
            self.completed += 1;
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Number of show → hide cycles completed so far.
    pub fn completed_cycles(&self) -> u64 {
        self.completed
    }
}

// ---------------------------------------------------------------------------
// Toasts
// ---------------------------------------------------------------------------

/// A transient message that removes itself once `expires_at` has passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub text: String,
    pub expires_at: Instant,
}

impl Toast {
    pub fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

// ---------------------------------------------------------------------------
// Page state
// ---------------------------------------------------------------------------

/// Everything the page displays.
#[derive(Debug, Clone, Default)]
pub struct PageState {
    pub prompt: String,
    pub loading: LoadingIndicator,
    pub output: String,
    pub explanation: String,
    pub resources: ResourcesPanel,
    /// `None` until the first connection check completes.
    pub connection: Option<StatusIndicator>,
    pub history: HistoryModal,
    toasts: Vec<Toast>,
    alerts: Vec<String>,
}

impl PageState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty the code, explanation and sources panels.
    pub fn clear_output(&mut self) {
        self.output.clear();
        self.explanation.clear();
        self.resources = ResourcesPanel::Blank;
    }

    /// Show a successful generation, substituting fallback text for absent
    /// fields.
    pub fn show_generation(&mut self, result: &GenerationResult) {
        self.output = result.code().unwrap_or(CODE_FALLBACK_TEXT).to_string();
        self.explanation = result
            .explanation()
            .unwrap_or(EXPLANATION_FALLBACK_TEXT)
            .to_string();
        self.resources = ResourcesPanel::from_links(result.resources());
    }

    /// Show the fixed error texts after a failed generation.
    pub fn show_generation_error(&mut self) {
        self.output = REQUEST_ERROR_CODE_TEXT.to_string();
        self.explanation = REQUEST_ERROR_EXPLANATION_TEXT.to_string();
    }

    /// Queue a blocking-alert message for the front end.
    pub fn alert(&mut self, message: impl Into<String>) {
        self.alerts.push(message.into());
    }

    /// Drain queued alerts, oldest first.
    pub fn take_alerts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alerts)
    }

    pub fn show_toast(&mut self, text: impl Into<String>, ttl: Duration, now: Instant) {
        self.toasts.push(Toast {
            text: text.into(),
            expires_at: now + ttl,
        });
    }

    /// Remove expired toasts and return the ones still visible.
    pub fn prune_toasts(&mut self, now: Instant) -> &[Toast] {
        self.toasts.retain(|toast| toast.is_live(now));
        &self.toasts
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
