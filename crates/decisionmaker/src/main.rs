//! DecisionMaker9000 command-line entry point.
//!
//! Keeps named lists of weighted options on disk and lets a timed, weighted
//! random draw pick one of them.
//!
//! # Usage
//!
//! ```text
//! decisionmaker [--data-dir DIR] [--json] <COMMAND>
//!
//! Commands:
//!   lists                          saved list names
//!   show <list>                    options with index, weight and share
//!   add <list> <labels> [-w N]     append comma-separated options
//!   edit <list> <index> <weight>   change one weight
//!   remove <list> <index>...       remove options
//!   sort <list> <order>            sort a list and keep that order
//!   delete <list> [--yes]          delete a saved list
//!   copy <from> <to> [--yes]       save a list under another name
//!   decide <list> [--duration S]   run the timed reveal
//!   roll <list>... [--lock L]      one pick per list
//!   settings [set ...]             show or change settings
//!   shell                          interactive session
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable            | Default | Description                          |
//! |---------------------|---------|--------------------------------------|
//! | `DECISIONMAKER_DIR` | `.`     | Holds `settings.json` and `lists/`   |
//! | `RUST_LOG`          | `warn`  | Log filter (logs go to stderr)       |

use std::future::Future;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use decisionmaker_core::SortOrder;
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use decisionmaker::application::manage_lists::Overwrite;
use decisionmaker::infrastructure::cli_bridge::{
    self, AppState, CommandResult, ListViewDto, OptionDto, RollRowDto, SaveStatus,
    SettingsUpdateDto,
};
use decisionmaker::infrastructure::terminal::shell::Shell;
use decisionmaker::infrastructure::terminal::{
    confirm, delete_prompt, overwrite_prompt, render_list, render_removed, render_rolls,
    render_settings, TerminalDisplay,
};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Keep weighted option lists and let a timed weighted draw decide.
#[derive(Debug, Parser)]
#[command(name = "decisionmaker", about = "Weighted random decisions from saved lists", version)]
struct Cli {
    /// Directory holding `settings.json` and the `lists/` folder.
    #[arg(long, global = true, default_value = ".", env = "DECISIONMAKER_DIR")]
    data_dir: PathBuf,

    /// Print the raw `{ success, data, error }` response as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List saved lists.
    Lists,
    /// Show a saved list in the configured sort order.
    Show { list: String },
    /// Add comma-separated options to a list, creating it if needed.
    Add {
        list: String,
        labels: String,
        #[arg(long, short, default_value_t = 1)]
        weight: u32,
    },
    /// Change the weight of the option at INDEX (as printed by `show`).
    Edit {
        list: String,
        index: usize,
        weight: u32,
    },
    /// Remove the options at the given indices.
    Remove {
        list: String,
        #[arg(required = true)]
        indices: Vec<usize>,
    },
    /// Sort a saved list, write it back and make ORDER the configured
    /// `sort_order`.
    Sort { list: String, order: SortOrder },
    /// Delete a saved list.
    Delete {
        list: String,
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },
    /// Save a copy of a list under another name.
    Copy {
        from: String,
        to: String,
        /// Overwrite without asking.
        #[arg(long, short)]
        yes: bool,
    },
    /// Run the timed reveal on a saved list.
    Decide {
        list: String,
        /// Reveal duration in seconds (defaults to the `duration` setting).
        #[arg(long, short)]
        duration: Option<i64>,
    },
    /// Draw one option from each of several saved lists.
    Roll {
        #[arg(required = true)]
        lists: Vec<String>,
        /// Keep a row instead of rolling it: `LIST` or `LIST=RESULT`.
        #[arg(long, value_name = "LIST[=RESULT]")]
        lock: Vec<String>,
    },
    /// Show settings, or change them with `settings set`.
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },
    /// Start an interactive session.
    Shell,
}

#[derive(Debug, Subcommand)]
enum SettingsAction {
    /// Change one or more settings.
    Set {
        #[arg(long)]
        duration: Option<String>,
        #[arg(long)]
        sort_order: Option<String>,
        #[arg(long)]
        font_size: Option<String>,
        #[arg(long)]
        theme: Option<String>,
    },
}

// ── Output helpers ────────────────────────────────────────────────────────────

/// Prints a command result either as JSON or through `render`.  A failed
/// command becomes an error, so the process exits non-zero.
fn emit<T: Serialize>(
    json: bool,
    result: CommandResult<T>,
    render: impl FnOnce(&T) -> String,
) -> anyhow::Result<Option<T>> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("failed to encode response")?
        );
        if !result.success {
            bail!(result.error.unwrap_or_else(|| "command failed".to_string()));
        }
        return Ok(result.data);
    }

    match result {
        CommandResult {
            success: true,
            data,
            ..
        } => {
            if let Some(data) = &data {
                print!("{}", render(data));
            }
            Ok(data)
        }
        CommandResult { error, .. } => bail!(error.unwrap_or_else(|| "command failed".to_string())),
    }
}

/// Turns a failed bridge result into an error without printing anything.
fn require<T: Serialize>(result: CommandResult<T>) -> anyhow::Result<T> {
    match result {
        CommandResult {
            success: true,
            data: Some(data),
            ..
        } => Ok(data),
        CommandResult { error, .. } => bail!(error.unwrap_or_else(|| "command failed".to_string())),
    }
}

fn ask(prompt: &str) -> anyhow::Result<bool> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    confirm(&mut input, &mut output, prompt).context("failed to read confirmation")
}

/// Parses a `--lock` value: `LIST` or `LIST=RESULT`.
fn parse_lock(raw: &str) -> (String, Option<String>) {
    match raw.split_once('=') {
        Some((list, result)) => (list.trim().to_string(), Some(result.trim().to_string())),
        None => (raw.trim().to_string(), None),
    }
}

/// Builds multi-roll rows; a list named by `--lock` is kept instead of
/// rolled.
fn roll_rows(lists: Vec<String>, locks: &[String]) -> Vec<RollRowDto> {
    let locks: Vec<(String, Option<String>)> = locks.iter().map(|l| parse_lock(l)).collect();
    lists
        .into_iter()
        .map(|list_name| {
            let lock = locks.iter().find(|(name, _)| *name == list_name);
            RollRowDto {
                locked: lock.is_some(),
                previous: lock.and_then(|(_, result)| result.clone()),
                list_name,
            }
        })
        .collect()
}

/// Removes options from the loaded list and writes it back under `list`.
/// The removed rows are returned only once the list is on disk.
fn remove_and_save(
    state: &mut AppState,
    list: &str,
    indices: &[usize],
) -> anyhow::Result<Vec<OptionDto>> {
    let removed = require(cli_bridge::remove_options(state, indices))?;
    require(cli_bridge::save_current_list(state, list, Overwrite::Confirmed))?;
    Ok(removed)
}

/// Sorts the loaded list and writes it back under `list`.
///
/// `show`, `decide` and `load` re-sort by the configured `sort_order`, so
/// `order` also becomes the configured order.
fn sort_and_save(
    state: &mut AppState,
    list: &str,
    order: SortOrder,
) -> anyhow::Result<ListViewDto> {
    let update = SettingsUpdateDto {
        sort_order: Some(order.to_string()),
        ..SettingsUpdateDto::default()
    };
    require(cli_bridge::update_settings(state, update))?;
    require(cli_bridge::save_current_list(state, list, Overwrite::Confirmed))?;
    require(cli_bridge::get_options(state))
}

/// Raises `cancel` on every signal delivered by `signal`.
///
/// Returns when a signal arrives while `cancel` is still raised (nothing
/// consumed the previous one), or with the error of a failed listen.
async fn listen_for_cancel<F, Fut>(cancel: Arc<AtomicBool>, mut signal: F) -> io::Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = io::Result<()>>,
{
    loop {
        signal().await?;
        if cancel.swap(true, Ordering::Relaxed) {
            return Ok(());
        }
        info!("received Ctrl+C, stopping reveal");
    }
}

/// Spawns a Ctrl+C listener that raises the returned flag.  A second Ctrl+C
/// before the flag is reset exits the process.
fn cancel_on_ctrl_c() -> Arc<AtomicBool> {
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);
    tokio::spawn(async move {
        match listen_for_cancel(flag, || tokio::signal::ctrl_c()).await {
            Ok(()) => {
                info!("received Ctrl+C twice, exiting");
                std::process::exit(130);
            }
            Err(e) => tracing::error!("failed to listen for Ctrl+C signal: {e}"),
        }
    });
    cancel
}

// ── Commands ──────────────────────────────────────────────────────────────────

async fn run(cli: Cli) -> anyhow::Result<()> {
    let json = cli.json;
    let mut state = AppState::open(&cli.data_dir)
        .with_context(|| format!("failed to open data directory {}", cli.data_dir.display()))?;
    debug!("data directory: {}", state.data_dir.display());

    match cli.command {
        Command::Lists => {
            emit(json, cli_bridge::get_saved_lists(&state), |names| {
                names.iter().map(|n| format!("{n}\n")).collect()
            })?;
        }
        Command::Show { list } => {
            emit(json, cli_bridge::load_saved_list(&mut state, &list), render_list)?;
        }
        Command::Add {
            list,
            labels,
            weight,
        } => {
            require(cli_bridge::open_list_for_edit(&mut state, &list))?;
            require(cli_bridge::add_options(&mut state, &labels, weight))?;
            require(cli_bridge::save_current_list(&mut state, &list, Overwrite::Confirmed))?;
            emit(json, cli_bridge::get_options(&state), render_list)?;
        }
        Command::Edit {
            list,
            index,
            weight,
        } => {
            require(cli_bridge::load_saved_list(&mut state, &list))?;
            require(cli_bridge::edit_option(&mut state, index, weight))?;
            require(cli_bridge::save_current_list(&mut state, &list, Overwrite::Confirmed))?;
            emit(json, cli_bridge::get_options(&state), render_list)?;
        }
        Command::Remove { list, indices } => {
            require(cli_bridge::load_saved_list(&mut state, &list))?;
            let removed = remove_and_save(&mut state, &list, &indices)?;
            emit(json, CommandResult::ok(removed), |rows| render_removed(rows))?;
        }
        Command::Sort { list, order } => {
            require(cli_bridge::load_saved_list(&mut state, &list))?;
            let view = sort_and_save(&mut state, &list, order)?;
            emit(json, CommandResult::ok(view), render_list)?;
        }
        Command::Delete { list, yes } => {
            if !yes && !ask(&delete_prompt(&list))? {
                println!("not deleted");
                return Ok(());
            }
            emit(json, cli_bridge::delete_saved_list(&mut state, &list), |_| {
                format!("deleted \"{}\"\n", list.trim())
            })?;
        }
        Command::Copy { from, to, yes } => {
            require(cli_bridge::load_saved_list(&mut state, &from))?;
            let overwrite = if yes { Overwrite::Confirmed } else { Overwrite::Ask };
            let mut status = require(cli_bridge::save_current_list(&mut state, &to, overwrite))?;
            if status == SaveStatus::NeedsConfirmation {
                if !ask(&overwrite_prompt(&to))? {
                    println!("not saved");
                    return Ok(());
                }
                status = require(cli_bridge::save_current_list(
                    &mut state,
                    &to,
                    Overwrite::Confirmed,
                ))?;
            }
            emit(json, CommandResult::ok(status), |status| match status {
                SaveStatus::Overwritten => format!("overwrote \"{}\"\n", to.trim()),
                _ => format!("saved \"{}\"\n", to.trim()),
            })?;
        }
        Command::Decide { list, duration } => {
            require(cli_bridge::load_saved_list(&mut state, &list))?;
            let cancel = cancel_on_ctrl_c();
            let mut rng = rand::thread_rng();
            let result = if json {
                let mut display = TerminalDisplay::new(io::sink());
                cli_bridge::decide(&state, duration, &mut display, &mut rng, &cancel).await
            } else {
                let mut display = TerminalDisplay::new(io::stdout());
                cli_bridge::decide(&state, duration, &mut display, &mut rng, &cancel).await
            };
            emit(json, result, |outcome| match outcome.outcome.as_str() {
                "cancelled" => "cancelled\n".to_string(),
                _ => String::new(),
            })?;
        }
        Command::Roll { lists, lock } => {
            let rows = roll_rows(lists, &lock);
            let mut rng = rand::thread_rng();
            emit(json, cli_bridge::multi_roll(&state, rows, &mut rng), |rows| {
                render_rolls(rows)
            })?;
        }
        Command::Settings { action: None } => {
            emit(json, cli_bridge::get_settings(&state), render_settings)?;
        }
        Command::Settings {
            action:
                Some(SettingsAction::Set {
                    duration,
                    sort_order,
                    font_size,
                    theme,
                }),
        } => {
            let update = SettingsUpdateDto {
                duration,
                sort_order,
                font_size,
                theme,
            };
            emit(json, cli_bridge::update_settings(&mut state, update), render_settings)?;
        }
        Command::Shell => {
            let cancel = cancel_on_ctrl_c();
            let stdin = io::stdin();
            let mut shell = Shell::new(
                &mut state,
                stdin.lock(),
                io::stdout(),
                rand::thread_rng(),
                &cancel,
            );
            shell.run().await.context("shell I/O failed")?;
        }
    }
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never mix with command output.  Level is
    // overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    run(cli).await?;
    io::stdout().flush().context("failed to flush stdout")?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
