//! Interactive page session (`codegen shell`).
//!
//! Reads one command per line and drives the same flows as the web page:
//! generation, copy, connection status (polled in the background) and the
//! history dialog.

use std::io::{BufRead, Write};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use colored::Colorize;

use crate::api::{BackendApi, HistoryId, HttpBackend};
use crate::clipboard::{Clipboard, SystemClipboard};
use crate::config::ClientConfig;
use crate::config::schema::PollingConfig;
use crate::diagnostics::Diagnostics;
use crate::flows::PageController;
use crate::page::HistoryList;
use crate::render;

const HELP: &str = "\
Commands:
  gen <prompt>     type a prompt and generate code
  prompt <text>    type a prompt without submitting
  generate         submit the current prompt
  copy             copy the generated code to the clipboard
  status           check the connection now
  history          open the history dialog
  show <n|#id>     show details of row n (or of the entry with id)
  del <n|#id>      delete row n (or the entry with id)
  close            close the history dialog
  help             show this help
  quit             leave the shell";

/// A history row addressed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowRef {
    /// 1-based position in the visible list.
    Position(usize),
    Id(HistoryId),
}

impl RowRef {
    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Some(id) = raw.strip_prefix('#') {
            return (!id.is_empty()).then(|| Self::Id(HistoryId::parse(id)));
        }
        raw.parse::<usize>().ok().filter(|&n| n > 0).map(Self::Position)
    }

    /// Resolve to an id against the rows currently listed.
    pub fn resolve(&self, list: &HistoryList) -> Option<HistoryId> {
        match self {
            Self::Id(id) => Some(id.clone()),
            Self::Position(n) => list.rows().get(n - 1).map(|row| row.id().clone()),
        }
    }
}

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Generate(Option<String>),
    Prompt(String),
    Copy,
    Status,
    History,
    Show(RowRef),
    Delete(RowRef),
    Close,
    Help,
    Quit,
    Empty,
    Invalid(String),
}

impl ShellCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "" => Self::Empty,
            "gen" if !rest.is_empty() => Self::Generate(Some(rest.to_string())),
            "gen" | "generate" => Self::Generate(None),
            "prompt" => Self::Prompt(rest.to_string()),
            "copy" => Self::Copy,
            "status" => Self::Status,
            "history" => Self::History,
            "show" => Self::row_command(rest, Self::Show),
            "del" | "delete" => Self::row_command(rest, Self::Delete),
            "close" => Self::Close,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => Self::Invalid(format!("unknown command '{other}' (type 'help')")),
        }
    }

    fn row_command(arg: &str, build: fn(RowRef) -> Self) -> Self {
        match RowRef::parse(arg) {
            Some(row) => build(row),
            None => Self::Invalid(format!("expected a row number or #id, got '{arg}'")),
        }
    }
}

/// Start an interactive session against the configured backend.
pub fn run(config: &ClientConfig) -> Result<()> {
    let controller = PageController::new(
        HttpBackend::from_config(&config.backend),
        SystemClipboard,
        Diagnostics::from_config(&config.diagnostics),
    )
    .with_toast_ttl(Duration::from_millis(config.ui.toast_ms));

    println!("{}", "codegen shell".bold().cyan());
    println!("{}", format!("backend: {}", config.backend.base_url).dimmed());
    println!("{}", "Type 'help' for commands.".dimmed());

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    run_session(&controller, &config.polling, stdin.lock(), &mut stdout)
}

/// Drive a session from `input`, writing everything to `out`.
///
/// Starts the connection poller (or a single check when polling is off) and
/// stops it when the input ends or `quit` is entered.
pub fn run_session<B, C, R, W>(
    controller: &PageController<B, C>,
    polling: &PollingConfig,
    input: R,
    out: &mut W,
) -> Result<()>
where
    B: BackendApi + 'static,
    C: Clipboard + 'static,
    R: BufRead,
    W: Write,
{
    let poller = if polling.enabled {
        Some(controller.start_polling(Duration::from_millis(polling.interval_ms))?)
    } else {
        controller.check_connection();
        None
    };

    write_prompt(controller, out)?;
    for line in input.lines() {
        let line = line.context("failed reading shell input")?;
        let command = ShellCommand::parse(&line);
        if command == ShellCommand::Quit {
            break;
        }
        let text = execute(controller, command);
        write_feedback(controller, out)?;
        write!(out, "{text}").context("failed writing shell output")?;
        write_prompt(controller, out)?;
    }
    writeln!(out).context("failed writing shell output")?;

    if let Some(poller) = poller {
        poller.cancel();
    }
    Ok(())
}

/// Run one command and return the panel it affected.
fn execute<B, C>(controller: &PageController<B, C>, command: ShellCommand) -> String
where
    B: BackendApi + 'static,
    C: Clipboard + 'static,
{
    match command {
        ShellCommand::Generate(prompt) => {
            if let Some(prompt) = prompt {
                controller.set_prompt(prompt);
            }
            controller.generate();
            render::generation(&controller.page())
        }
        ShellCommand::Prompt(text) => {
            controller.set_prompt(text);
            String::new()
        }
        ShellCommand::Copy => {
            // Failures only reach the diagnostics log.
            controller.copy_code();
            String::new()
        }
        ShellCommand::Status => {
            controller.check_connection();
            format!("{}\n", render::connection(controller.page().connection.as_ref()))
        }
        ShellCommand::History => {
            controller.open_history();
            render::history_list(&controller.page().history)
        }
        ShellCommand::Show(row) => {
            let Some(id) = resolve_row(controller, &row) else {
                return String::new();
            };
            if controller.show_details(&id) {
                let page = controller.page();
                page.history
                    .details
                    .as_ref()
                    .map(render::history_details)
                    .unwrap_or_default()
            } else {
                String::new()
            }
        }
        ShellCommand::Delete(row) => {
            let Some(id) = resolve_row(controller, &row) else {
                return String::new();
            };
            controller.delete_history(&id);
            render::history_list(&controller.page().history)
        }
        ShellCommand::Close => {
            controller.close_history();
            String::new()
        }
        ShellCommand::Help => format!("{HELP}\n"),
        ShellCommand::Invalid(message) => format!("{}\n", render::alert(&message)),
        ShellCommand::Empty | ShellCommand::Quit => String::new(),
    }
}

/// Resolve a row reference, queueing an alert when it points nowhere.
fn resolve_row<B, C>(controller: &PageController<B, C>, row: &RowRef) -> Option<HistoryId>
where
    B: BackendApi,
    C: Clipboard,
{
    let mut page = controller.page();
    let resolved = row.resolve(&page.history.list);
    if resolved.is_none() {
        page.alert("No such row. Open the history first ('history').");
    }
    resolved
}

/// Print pending alerts and live toasts.
fn write_feedback<B, C, W>(controller: &PageController<B, C>, out: &mut W) -> Result<()>
where
    B: BackendApi,
    C: Clipboard,
    W: Write,
{
    let (alerts, toasts) = {
        let mut page = controller.page();
        let alerts = page.take_alerts();
        let toasts = render::toasts(page.prune_toasts(Instant::now()));
        (alerts, toasts)
    };

    for message in alerts {
        writeln!(out, "{}", render::alert(&message)).context("failed writing shell output")?;
    }
    write!(out, "{toasts}").context("failed writing shell output")?;
    Ok(())
}

fn write_prompt<B, C, W>(controller: &PageController<B, C>, out: &mut W) -> Result<()>
where
    B: BackendApi,
    C: Clipboard,
    W: Write,
{
    let status = render::connection(controller.page().connection.as_ref());
    write!(out, "[{status}] > ").context("failed writing shell prompt")?;
    out.flush().context("failed flushing shell prompt")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
