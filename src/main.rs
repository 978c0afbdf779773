use anyhow::Result;
use clap::{Parser, Subcommand};

use codegen_client::{cli, config, render, shell};

#[derive(Debug, Parser)]
#[command(name = "codegen")]
#[command(about = "Generate code from a prompt using a code-generation backend")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate code for a prompt and print code, explanation and sources
    Generate {
        /// The prompt to send
        #[arg(trailing_var_arg = true, required = true)]
        prompt: Vec<String>,
        /// Copy the generated code to the clipboard
        #[arg(long)]
        copy: bool,
        /// Output format: text (default), json
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Check the backend connection
    Status {
        /// Keep polling until interrupted
        #[arg(long)]
        watch: bool,
    },
    /// Browse and manage request history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// Interactive page session
    Shell,
    /// Show or edit configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Show recent diagnostics entries
    Logs {
        /// Number of entries to show
        #[arg(long, default_value = "20")]
        tail: usize,
    },
}

#[derive(Debug, Subcommand)]
enum HistoryAction {
    /// List all history entries
    List {
        /// Output format: text (default), json
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show the details of one entry
    Show { id: String },
    /// Delete one entry
    Delete { id: String },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write a default config to ~/.codegen/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a dotted key, e.g. `backend.base_url`
    Set { key: String, value: String },
    /// Reset the global config to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();
    let cfg = config::load();
    render::set_color(cfg.ui.color);

    match app.command {
        Commands::Generate {
            prompt,
            copy,
            format,
        } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_generate(&cfg, &prompt.join(" "), copy, fmt)
        }
        Commands::Status { watch } => cli::run_status(&cfg, watch),
        Commands::History { action } => match action {
            HistoryAction::List { format } => {
                let fmt = cli::OutputFormat::from_str_opt(Some(&format));
                cli::run_history_list(&cfg, fmt)
            }
            HistoryAction::Show { id } => cli::run_history_show(&cfg, &id),
            HistoryAction::Delete { id } => cli::run_history_delete(&cfg, &id),
        },
        Commands::Shell => shell::run(&cfg),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
        Commands::Logs { tail } => cli::run_logs(&cfg, tail),
    }
}
