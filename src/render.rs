//! Terminal rendering of the page view-model.
//!
//! Every function returns a `String` so front ends decide where it goes and
//! tests can compare plain text (with colors switched off).

use std::fmt::Write as _;

use colored::{ColoredString, Colorize};

use crate::page::{
    HISTORY_EMPTY_TEXT, HISTORY_LOADING_TEXT, HistoryDetails, HistoryList, HistoryModal,
    PageState, RenderedLink, ResourcesPanel, StatusIndicator, Toast, Tone,
};

/// Globally disable colored output, or leave it to terminal detection.
///
/// `true` never forces color onto a pipe or file.
pub fn set_color(enabled: bool) {
    if enabled {
        colored::control::unset_override();
    } else {
        colored::control::set_override(false);
    }
}

fn header(title: &str) -> ColoredString {
    title.bold().cyan()
}

/// Status line in the indicator's color.
pub fn status_line(indicator: &StatusIndicator) -> String {
    match indicator.tone {
        Tone::Positive => indicator.label.green().to_string(),
        Tone::Negative => indicator.label.red().to_string(),
    }
}

/// Status line, or a neutral placeholder before the first check.
pub fn connection(status: Option<&StatusIndicator>) -> String {
    match status {
        Some(indicator) => status_line(indicator),
        None => "Connection: checking...".dimmed().to_string(),
    }
}

fn link_line(link: &RenderedLink) -> String {
    if link.label == link.href {
        format!("  • {}", link.href.underline())
    } else {
        format!("  • {} <{}>", link.label, link.href.underline())
    }
}

fn resources(panel: &ResourcesPanel, out: &mut String) {
    if let Some(placeholder) = panel.placeholder() {
        let _ = writeln!(out, "  {}", placeholder.dimmed());
    }
    for link in panel.links() {
        let _ = writeln!(out, "{}", link_line(link));
    }
}

/// Code, explanation and sources panels.
pub fn generation(page: &PageState) -> String {
    let mut out = String::new();

    if page.loading.is_visible() {
        let _ = writeln!(out, "{}", "Generating...".yellow());
        return out;
    }

    let _ = writeln!(out, "{}", header("Code"));
    let _ = writeln!(out, "{}", "-".repeat(40));
    let _ = writeln!(out, "{}", page.output);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", header("Explanation"));
    let _ = writeln!(out, "{}", page.explanation);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", header("Sources"));
    resources(&page.resources, &mut out);

    out
}

/// The history list with 1-based row numbers.
pub fn history_list(modal: &HistoryModal) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", header("History"));
    let _ = writeln!(out, "{}", "=".repeat(40));

    match &modal.list {
        HistoryList::Idle => {}
        HistoryList::Loading => {
            let _ = writeln!(out, "  {}", HISTORY_LOADING_TEXT.dimmed());
        }
        HistoryList::Empty => {
            let _ = writeln!(out, "  {}", HISTORY_EMPTY_TEXT.dimmed());
        }
        HistoryList::Failed(message) => {
            let _ = writeln!(out, "  {}", message.red());
        }
        HistoryList::Rows(rows) => {
            for (i, row) in rows.iter().enumerate() {
                let created = row
                    .created
                    .as_deref()
                    .map(|c| format!("{c}  "))
                    .unwrap_or_default();
                let _ = writeln!(
                    out,
                    "  {:>3}. {}{} {}",
                    i + 1,
                    created.dimmed(),
                    row.prompt(),
                    format!("[#{}]", row.id()).dimmed(),
                );
            }
        }
    }

    out
}

/// Full details of one history entry.
pub fn history_details(details: &HistoryDetails) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", "Prompt:".bold(), details.prompt);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", header("Code"));
    let _ = writeln!(out, "{}", details.code);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", header("Explanation"));
    let _ = writeln!(out, "{}", details.explanation);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", header("Sources"));
    for link in &details.resources {
        let _ = writeln!(out, "{}", link_line(link));
    }
    out
}

/// Live toasts, one per line.
pub fn toasts(toasts: &[Toast]) -> String {
    toasts
        .iter()
        .map(|toast| format!("{} {}\n", "✓".green().bold(), toast.text))
        .collect()
}

/// A blocking alert.
pub fn alert(message: &str) -> String {
    format!("{} {}", "!".yellow().bold(), message.yellow())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
