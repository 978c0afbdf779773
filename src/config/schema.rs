/// Configuration schema and defaults for the codegen client.
///
/// Defines the TOML-serializable configuration structure with all sections:
/// `[backend]`, `[polling]`, `[ui]` and `[diagnostics]`.
///
/// Every field has a sensible built-in default. Users only need to set the
/// values they want to override.
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level client configuration.
///
/// Maps directly to the `~/.codegen/config.toml` and `.codegen.toml` file
/// schemas. All sections and fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub backend: BackendConfig,
    pub polling: PollingConfig,
    pub ui: UiConfig,
    pub diagnostics: DiagnosticsConfig,
}

// ---------------------------------------------------------------------------
// [backend]
// ---------------------------------------------------------------------------

/// Where the code-generation backend lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the backend, e.g. `http://127.0.0.1:8000`.
    pub base_url: String,
    /// Timeout for `POST /generate-code` and the history endpoints.
    ///
    /// The backend itself waits up to 60 s on its LLM, so this stays high.
    pub timeout_ms: u64,
    /// Timeout for `GET /check-connection`.
    pub health_timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            timeout_ms: 60_000,
            health_timeout_ms: 5_000,
        }
    }
}

// ---------------------------------------------------------------------------
// [polling]
// ---------------------------------------------------------------------------

/// Connection polling settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// When `false`, the connection is checked once and never polled.
    pub enabled: bool,
    /// Delay between two connection checks.
    pub interval_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: 5_000,
        }
    }
}

// ---------------------------------------------------------------------------
// [ui]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// How long the "copied" toast stays visible.
    pub toast_ms: u64,
    /// Colorize output when stdout is a terminal. `false` disables color
    /// everywhere.
    pub color: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            toast_ms: 2_000,
            color: true,
        }
    }
}

// ---------------------------------------------------------------------------
// [diagnostics]
// ---------------------------------------------------------------------------

/// Developer-facing diagnostics log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    pub enabled: bool,
    /// Path to the JSONL log. `~` is expanded to the home directory.
    pub path: String,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "~/.codegen/diagnostics.jsonl".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default TOML content
// ---------------------------------------------------------------------------

impl ClientConfig {
    /// Generate the annotated default TOML config file content.
    ///
    /// Used by `codegen config init` to create a starting config file with
    /// all settings documented.
    pub fn default_toml() -> String {
        r#"# codegen client configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (CODEGEN_*)
#   2. Project config (.codegen.toml in current directory)
#   3. User global config (~/.codegen/config.toml)
#   4. Built-in defaults

[backend]
base_url = "http://127.0.0.1:8000"
timeout_ms = 60000          # POST /generate-code, /history
health_timeout_ms = 5000    # GET /check-connection

[polling]
enabled = true
interval_ms = 5000

[ui]
toast_ms = 2000             # lifetime of the "Code copied!" toast
color = true                # terminals only; NO_COLOR also disables colors

[diagnostics]
enabled = true
path = "~/.codegen/diagnostics.jsonl"
"#
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
