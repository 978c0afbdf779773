//! One-shot CLI commands.
//!
//! Provides subcommand handlers for:
//! - `codegen generate <prompt>`: run the generation flow once
//! - `codegen status [--watch]`: connection check, optionally polled
//! - `codegen history list|show|delete`: history dialog operations
//! - `codegen config show|init|set|reset`: configuration management
//! - `codegen logs`: recent diagnostics entries

use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use colored::Colorize;

use crate::api::{BackendApi, HistoryId, HttpBackend};
use crate::clipboard::SystemClipboard;
use crate::config::{self, ClientConfig};
use crate::diagnostics::{DiagnosticEntry, Diagnostics};
use crate::flows::{
    ConnectionOutcome, CopyOutcome, GenerateOutcome, HistoryOutcome, PageController, Poller,
};
use crate::page::{HISTORY_FAILED_TEXT, PageState, RenderedLink};
use crate::render;

type Controller = PageController<HttpBackend, SystemClipboard>;

/// Output format for commands that can print machine-readable results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

fn controller(cfg: &ClientConfig) -> Controller {
    PageController::new(
        HttpBackend::from_config(&cfg.backend),
        SystemClipboard,
        Diagnostics::from_config(&cfg.diagnostics),
    )
    .with_toast_ttl(Duration::from_millis(cfg.ui.toast_ms))
}

/// Print queued alerts and live toasts.
fn print_feedback(controller: &Controller) {
    let mut page = controller.page();
    for message in page.take_alerts() {
        println!("{}", render::alert(&message));
    }
    print!("{}", render::toasts(page.prune_toasts(std::time::Instant::now())));
}

// ---------------------------------------------------------------------------
// codegen generate
// ---------------------------------------------------------------------------

/// Run the generation flow for `prompt` and print the panels.
pub fn run_generate(cfg: &ClientConfig, prompt: &str, copy: bool, format: OutputFormat) -> Result<()> {
    let controller = controller(cfg);
    let outcome = controller.generate_for(prompt);

    if outcome == GenerateOutcome::Rejected {
        print_feedback(&controller);
        return Ok(());
    }

    if copy
        && outcome == GenerateOutcome::Rendered
        && controller.copy_code() == CopyOutcome::Failed
    {
        eprintln!(
            "{} {}",
            "✗".red().bold(),
            "Could not copy to the clipboard (see `codegen logs`)".dimmed()
        );
    }

    match format {
        OutputFormat::Json => {
            let value = generation_json(&controller.page(), outcome);
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => {
            print!("{}", render::generation(&controller.page()));
            print_feedback(&controller);
        }
    }

    Ok(())
}

fn links_json(links: &[RenderedLink]) -> Vec<serde_json::Value> {
    links
        .iter()
        .map(|link| serde_json::json!({ "url": link.href, "title": link.label }))
        .collect()
}

fn generation_json(page: &PageState, outcome: GenerateOutcome) -> serde_json::Value {
    serde_json::json!({
        "ok": outcome == GenerateOutcome::Rendered,
        "code": page.output,
        "explanation": page.explanation,
        "resources": links_json(page.resources.links()),
    })
}

// ---------------------------------------------------------------------------
// codegen status
// ---------------------------------------------------------------------------

/// Check the connection once, or keep polling with `watch`.
pub fn run_status(cfg: &ClientConfig, watch: bool) -> Result<()> {
    let controller = controller(cfg);

    if !watch {
        println!("{}", "Backend Connection".bold().cyan());
        println!("{}", "=".repeat(40));
        if let ConnectionOutcome::Applied(indicator) = controller.check_connection() {
            print_health_item("Backend", indicator.is_positive(), &cfg.backend.base_url);
            println!("  {}", render::status_line(&indicator));
        }
        return Ok(());
    }

    println!(
        "{}",
        format!(
            "Polling {} every {}ms (Ctrl+C to stop)",
            cfg.backend.base_url, cfg.polling.interval_ms
        )
        .dimmed()
    );

    let poll = controller.clone();
    let last: Mutex<Option<String>> = Mutex::new(None);
    let _poller = Poller::spawn(
        "status-watch",
        Duration::from_millis(cfg.polling.interval_ms),
        move || {
            let ConnectionOutcome::Applied(indicator) = poll.check_connection() else {
                return;
            };
            let mut last = last.lock().unwrap_or_else(|e| e.into_inner());
            if last.as_deref() != Some(indicator.label.as_str()) {
                println!(
                    "{} {}",
                    Local::now().format("%H:%M:%S").to_string().dimmed(),
                    render::status_line(&indicator)
                );
                *last = Some(indicator.label);
            }
        },
    )?;

    loop {
        std::thread::park();
    }
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<12} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// codegen history list | show | delete
// ---------------------------------------------------------------------------

/// Load and print the full history.
pub fn run_history_list(cfg: &ClientConfig, format: OutputFormat) -> Result<()> {
    let controller = controller(cfg);
    let outcome = controller.open_history();
    let page = controller.page();

    match format {
        OutputFormat::Json => {
            if outcome == HistoryOutcome::Failed {
                anyhow::bail!("{HISTORY_FAILED_TEXT} (see `codegen logs`)");
            }
            let items: Vec<_> = page.history.list.rows().iter().map(|row| &row.item).collect();
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
        OutputFormat::Text => print!("{}", render::history_list(&page.history)),
    }

    Ok(())
}

/// Print the details of one history entry.
pub fn run_history_show(cfg: &ClientConfig, raw_id: &str) -> Result<()> {
    let controller = controller(cfg);
    let id = HistoryId::parse(raw_id);

    if controller.open_history() == HistoryOutcome::Failed {
        anyhow::bail!("{HISTORY_FAILED_TEXT} (see `codegen logs`)");
    }
    if !controller.show_details(&id) {
        let alerts = controller.page().take_alerts();
        anyhow::bail!("{}", alerts.join("; "));
    }

    let page = controller.page();
    if let Some(details) = &page.history.details {
        print!("{}", render::history_details(details));
    }
    Ok(())
}

/// Delete one history entry.
///
/// Unlike the history dialog, a rejected delete is reported as an error.
pub fn run_history_delete(cfg: &ClientConfig, raw_id: &str) -> Result<()> {
    let backend = HttpBackend::from_config(&cfg.backend);
    let id = HistoryId::parse(raw_id);

    backend
        .delete_history(&id)
        .with_context(|| format!("failed to delete history item {id}"))?;
    println!("{} Deleted history item {}", "✓".green().bold(), id.to_string().bold());
    Ok(())
}

// ---------------------------------------------------------------------------
// codegen config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    print_source("~/.codegen/config.toml", global_exists);
    print_source(".codegen.toml", project_exists);
    println!(
        "  {} {}",
        "·".dimmed(),
        "CODEGEN_* environment variables".dimmed()
    );

    Ok(())
}

fn print_source(name: &str, exists: bool) {
    if exists {
        println!("  {} {}", "✓".green(), name.dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), format!("{name} (not found)").dimmed());
    }
}

/// Initialize a default config file at `~/.codegen/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    println!("  {}", "Edit the file to point at your backend.".dimmed());
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// codegen logs
// ---------------------------------------------------------------------------

/// Print the most recent diagnostics entries.
pub fn run_logs(cfg: &ClientConfig, tail: usize) -> Result<()> {
    let diagnostics = Diagnostics::from_config(&cfg.diagnostics);
    let Some(path) = diagnostics.path() else {
        println!(
            "{}",
            "Diagnostics are disabled (set diagnostics.enabled = true).".yellow()
        );
        return Ok(());
    };

    let entries = diagnostics.read_recent(tail);
    if entries.is_empty() {
        println!("{}", "No diagnostics recorded.".green());
        return Ok(());
    }

    println!("{}", "Recent Diagnostics".bold().cyan());
    println!("{}", format!("{}", path.display()).dimmed());
    println!("{}", "=".repeat(60));
    for entry in &entries {
        println!("{}", format_entry(entry));
    }
    Ok(())
}

fn format_entry(entry: &DiagnosticEntry) -> String {
    format!(
        "  {} {:<10} {}",
        local_time(&entry.timestamp).dimmed(),
        entry.flow.bold(),
        entry.message
    )
}

/// Render an RFC 3339 timestamp in local time; anything else is shown as is.
fn local_time(timestamp: &str) -> String {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|_| timestamp.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
