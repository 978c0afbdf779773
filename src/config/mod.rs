/// Configuration system for the codegen client.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults**: hardcoded in [`schema::ClientConfig::default()`]
/// 2. **User global config**: `~/.codegen/config.toml`
/// 3. **Project local config**: `.codegen.toml` in the current working directory
/// 4. **Environment variables**: `CODEGEN_*` overrides (highest precedence)
///
/// Layers are merged key by key: a file that only sets `backend.base_url`
/// leaves every other value from the previous layer untouched.
///
/// # Usage
///
/// ```rust,ignore
/// use codegen_client::config;
///
/// let cfg = config::load();
/// let backend = HttpBackend::from_config(&cfg.backend);
/// ```
pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub use schema::ClientConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved client configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env
/// vars.
pub fn load() -> ClientConfig {
    let mut config = load_files(&[global_config_path(), project_config_path()]);
    apply_env_overrides(&mut config);
    config
}

/// Merge the given TOML files, in order, on top of the built-in defaults.
///
/// Missing or malformed files are skipped, and a zero polling interval falls
/// back to the default.
fn load_files(paths: &[Option<PathBuf>]) -> ClientConfig {
    let Ok(mut merged) = toml::Value::try_from(ClientConfig::default()) else {
        return ClientConfig::default();
    };

    for path in paths.iter().flatten() {
        if let Some(layer) = load_toml_value(path) {
            merge_values(&mut merged, layer);
        }
    }

    let mut config: ClientConfig = merged.try_into().unwrap_or_default();
    if config.polling.interval_ms == 0 {
        config.polling.interval_ms = schema::PollingConfig::default().interval_ms;
    }
    config
}

/// Reject settings that parse but cannot be used.
fn validate(config: &ClientConfig) -> Result<()> {
    anyhow::ensure!(
        config.polling.interval_ms > 0,
        "polling.interval_ms must be greater than zero"
    );
    Ok(())
}

/// Read a TOML file as an untyped value tree.
///
/// Returns `None` if the file doesn't exist or is not valid TOML.
fn load_toml_value(path: &Path) -> Option<toml::Value> {
    let content = fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Recursively merge `overlay` into `base`.
///
/// Tables are merged key by key. Any other value in the overlay replaces the
/// base value.
fn merge_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Path to the user global config: `~/.codegen/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".codegen").join("config.toml"))
}

/// Path to the project local config: `.codegen.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".codegen.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return home;
    }
    PathBuf::from(path)
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `CODEGEN_URL`: backend base URL
/// - `CODEGEN_TIMEOUT_MS`: generation/history request timeout
/// - `CODEGEN_HEALTH_TIMEOUT_MS`: connection check timeout
/// - `CODEGEN_POLLING`: connection polling on/off
/// - `CODEGEN_POLL_INTERVAL_MS`: polling interval
/// - `CODEGEN_TOAST_MS`: toast lifetime
/// - `CODEGEN_COLOR`: colored output on/off (`NO_COLOR` also disables it)
/// - `CODEGEN_DIAGNOSTICS`: diagnostics log on/off
/// - `CODEGEN_DIAGNOSTICS_PATH`: diagnostics log path
fn apply_env_overrides(config: &mut ClientConfig) {
    // Backend
    if let Ok(val) = std::env::var("CODEGEN_URL")
        && !val.is_empty()
    {
        config.backend.base_url = val;
    }
    if let Ok(val) = std::env::var("CODEGEN_TIMEOUT_MS")
        && let Ok(ms) = val.parse::<u64>()
    {
        config.backend.timeout_ms = ms;
    }
    if let Ok(val) = std::env::var("CODEGEN_HEALTH_TIMEOUT_MS")
        && let Ok(ms) = val.parse::<u64>()
    {
        config.backend.health_timeout_ms = ms;
    }

    // Polling
    if let Ok(val) = std::env::var("CODEGEN_POLLING") {
        config.polling.enabled = is_truthy(&val);
    }
    if let Ok(val) = std::env::var("CODEGEN_POLL_INTERVAL_MS")
        && let Ok(ms) = val.parse::<u64>()
        && ms > 0
    {
        config.polling.interval_ms = ms;
    }

    // UI
    if let Ok(val) = std::env::var("CODEGEN_TOAST_MS")
        && let Ok(ms) = val.parse::<u64>()
    {
        config.ui.toast_ms = ms;
    }
    if let Ok(val) = std::env::var("CODEGEN_COLOR") {
        config.ui.color = is_truthy(&val);
    }
    if std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()) {
        config.ui.color = false;
    }

    // Diagnostics
    if let Ok(val) = std::env::var("CODEGEN_DIAGNOSTICS") {
        config.diagnostics.enabled = is_truthy(&val);
    }
    if let Ok(val) = std::env::var("CODEGEN_DIAGNOSTICS_PATH")
        && !val.is_empty()
    {
        config.diagnostics.path = val;
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.codegen/config.toml`.
///
/// Creates the `~/.codegen/` directory if it doesn't exist. Returns an error
/// if the file already exists (use `force = true` to overwrite).
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.codegen/ directory")?;
    }

    fs::write(&path, ClientConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Set a single config key to a value in the global config file.
///
/// Reads the current global config (or defaults), updates the specified key,
/// and writes the result back. Supports dotted keys like `backend.base_url`.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;

    let content = if path.exists() {
        fs::read_to_string(&path).context("failed to read config file")?
    } else {
        toml::to_string_pretty(&ClientConfig::default())
            .context("failed to serialize default config")?
    };

    let mut root: toml::Value =
        toml::from_str(&content).context("failed to parse config as TOML value")?;
    set_toml_value(&mut root, key, value)?;

    // Reject values that would make the file unloadable.
    let validated: ClientConfig = root
        .clone()
        .try_into()
        .with_context(|| format!("invalid value for '{key}': {value}"))?;
    validate(&validated).with_context(|| format!("invalid value for '{key}': {value}"))?;

    let output = toml::to_string_pretty(&root).context("failed to serialize updated config")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(&path, output).context("failed to write config file")?;

    Ok(())
}

/// Set a value in a TOML value tree using a dotted key path.
///
/// The new value is parsed according to the type of the existing value. A
/// key that doesn't exist in a known section is stored as a string.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    if parts.iter().any(|p| p.is_empty()) {
        anyhow::bail!("invalid config key: '{key}'");
    }

    let (leaf, sections) = parts
        .split_last()
        .with_context(|| format!("invalid config key: '{key}'"))?;

    let mut current = root;
    for &part in sections {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let table = current.as_table_mut().with_context(|| {
        format!(
            "expected table at '{}'",
            key.rsplit_once('.').map(|(s, _)| s).unwrap_or("")
        )
    })?;

    let new_value = match table.get(*leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::Table(_)) => {
            anyhow::bail!("'{key}' is a section, not a value");
        }
        _ => toml::Value::String(raw_value.to_string()),
    };

    table.insert((*leaf).to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
