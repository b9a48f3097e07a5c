//! Interactive shell: one in-memory option list edited across many commands.
//!
//! The one-shot CLI subcommands load, change and save a list on every
//! invocation.  The shell instead keeps an [`AppState`] alive, so a list can
//! be built up, sorted and decided on before (or without) being saved.
//!
//! ```text
//! > add -w 3 tacos
//! > add pizza, burger
//! > show
//! > decide 2
//! > save dinner
//! ```

use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use decisionmaker_core::SortOrder;
use rand::Rng;
use tracing::debug;

use super::{
    confirm, delete_prompt, overwrite_prompt, render_list, render_removed, render_rolls,
    render_settings,
};
use super::TerminalDisplay;
use crate::application::manage_lists::Overwrite;
use crate::infrastructure::cli_bridge::{
    self, AppState, CommandResult, RollRowDto, SaveStatus, SettingsUpdateDto,
};

const HELP: &str = "\
commands:
  new                         start an empty, unsaved list
  load <name>                 replace the current list with a saved one
  save <name>                 save the current list
  delete <name>               delete a saved list
  lists                       show saved list names
  show                        show the current list
  add [-w N] <a, b, ...>      add comma-separated options (weight N, default 1)
  edit <index> <weight>       change an option's weight
  remove <index>...           remove options
  sort <alphabetical|weight>  sort the current list
  decide [seconds]            run the timed reveal
  roll [<list>...]            one pick per saved list (no names: roll again)
  lock <row>                  toggle the lock on a roll row
  settings [<key> <value>]    show or change settings
  help                        show this text
  quit                        leave the shell
";

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Help,
    Quit,
    New,
    Lists,
    Show,
    Load(String),
    Save(String),
    Delete(String),
    Add { labels: String, weight: u32 },
    Edit { index: usize, weight: u32 },
    Remove(Vec<usize>),
    Sort(SortOrder),
    Decide(Option<i64>),
    Roll(Vec<String>),
    Lock(usize),
    Settings(Option<(String, String)>),
}

fn parse_number<T: std::str::FromStr>(what: &str, raw: &str) -> Result<T, String> {
    raw.parse()
        .map_err(|_| format!("{what} must be a whole number, got '{raw}'"))
}

fn required(rest: &str, usage: &str) -> Result<String, String> {
    if rest.is_empty() {
        Err(format!("usage: {usage}"))
    } else {
        Ok(rest.to_string())
    }
}

/// Parses one input line.  Blank lines yield `Ok(None)`.
///
/// # Errors
///
/// A usage message for unknown commands or malformed arguments.
pub fn parse_command(line: &str) -> Result<Option<ShellCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let args: Vec<&str> = rest.split_whitespace().collect();

    let command = match word.to_ascii_lowercase().as_str() {
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        "new" => ShellCommand::New,
        "lists" => ShellCommand::Lists,
        "show" => ShellCommand::Show,
        "load" => ShellCommand::Load(required(rest, "load <name>")?),
        "save" => ShellCommand::Save(required(rest, "save <name>")?),
        "delete" => ShellCommand::Delete(required(rest, "delete <name>")?),
        "add" => {
            let (weight, labels) = match args.first() {
                Some(&("-w" | "--weight")) => {
                    let raw = args.get(1).ok_or("usage: add [-w N] <a, b, ...>")?;
                    let weight = parse_number("weight", raw)?;
                    let labels = rest
                        .split_once(raw)
                        .map(|(_, tail)| tail.trim())
                        .unwrap_or_default();
                    (weight, labels)
                }
                _ => (decisionmaker_core::domain::options::DEFAULT_WEIGHT, rest),
            };
            ShellCommand::Add {
                labels: required(labels, "add [-w N] <a, b, ...>")?,
                weight,
            }
        }
        "edit" => match args.as_slice() {
            [index, weight] => ShellCommand::Edit {
                index: parse_number("index", index)?,
                weight: parse_number("weight", weight)?,
            },
            _ => return Err("usage: edit <index> <weight>".to_string()),
        },
        "remove" => {
            if args.is_empty() {
                return Err("usage: remove <index>...".to_string());
            }
            let indices = args
                .iter()
                .map(|raw| parse_number("index", raw))
                .collect::<Result<Vec<usize>, _>>()?;
            ShellCommand::Remove(indices)
        }
        "sort" => match args.as_slice() {
            [order] => ShellCommand::Sort(order.parse()?),
            _ => return Err("usage: sort <alphabetical|weight>".to_string()),
        },
        "decide" => match args.as_slice() {
            [] => ShellCommand::Decide(None),
            [secs] => ShellCommand::Decide(Some(parse_number("duration", secs)?)),
            _ => return Err("usage: decide [seconds]".to_string()),
        },
        "roll" => ShellCommand::Roll(args.iter().map(|s| s.to_string()).collect()),
        "lock" => match args.as_slice() {
            [row] => ShellCommand::Lock(parse_number("row", row)?),
            _ => return Err("usage: lock <row>".to_string()),
        },
        "settings" => match args.as_slice() {
            [] => ShellCommand::Settings(None),
            [key, value] => ShellCommand::Settings(Some((key.to_string(), value.to_string()))),
            _ => return Err("usage: settings [<key> <value>]".to_string()),
        },
        other => return Err(format!("unknown command '{other}' (try 'help')")),
    };
    Ok(Some(command))
}

/// Maps a settings key typed in the shell onto a partial update.
fn settings_update(key: &str, value: String) -> Result<SettingsUpdateDto, String> {
    let mut update = SettingsUpdateDto::default();
    match key.to_ascii_lowercase().replace('-', "_").as_str() {
        "duration" => update.duration = Some(value),
        "sort_order" | "sort" => update.sort_order = Some(value),
        "font_size" | "font" => update.font_size = Some(value),
        "theme" => update.theme = Some(value),
        other => {
            return Err(format!(
                "unknown setting '{other}' (expected duration, sort_order, font_size or theme)"
            ))
        }
    }
    Ok(update)
}

/// Whether the loop should keep reading commands.
enum Flow {
    Continue,
    Quit,
}

/// Runs the shell until `quit` or end of input.
pub struct Shell<'a, R, W, G> {
    state: &'a mut AppState,
    input: R,
    output: W,
    rng: G,
    cancel: &'a AtomicBool,
    /// Rows of the last multi-roll, kept so `lock` and a bare `roll` work.
    roll_rows: Vec<RollRowDto>,
}

impl<'a, R, W, G> Shell<'a, R, W, G>
where
    R: BufRead,
    W: Write,
    G: Rng,
{
    pub fn new(state: &'a mut AppState, input: R, output: W, rng: G, cancel: &'a AtomicBool) -> Self {
        Self {
            state,
            input,
            output,
            rng,
            cancel,
            roll_rows: Vec::new(),
        }
    }

    /// Reads and executes commands until `quit` or end of input.
    ///
    /// # Errors
    ///
    /// I/O errors on the input or output streams.  Command failures are
    /// printed and the loop continues.
    pub async fn run(&mut self) -> io::Result<()> {
        writeln!(self.output, "DecisionMaker9000 shell. Type 'help' for commands.")?;
        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(());
            }

            match parse_command(&line) {
                Ok(None) => {}
                Ok(Some(command)) => {
                    debug!("shell command: {command:?}");
                    if let Flow::Quit = self.execute(command).await? {
                        return Ok(());
                    }
                }
                Err(usage) => writeln!(self.output, "{usage}")?,
            }
        }
    }

    fn report<T: serde::Serialize>(&mut self, result: CommandResult<T>) -> io::Result<Option<T>> {
        match result {
            CommandResult {
                success: true,
                data,
                ..
            } => Ok(data),
            CommandResult { error, .. } => {
                writeln!(self.output, "{}", error.unwrap_or_else(|| "failed".to_string()))?;
                Ok(None)
            }
        }
    }

    fn show_current(&mut self) -> io::Result<()> {
        let result = cli_bridge::get_options(self.state);
        if let Some(view) = self.report(result)? {
            write!(self.output, "{}", render_list(&view))?;
        }
        Ok(())
    }

    async fn execute(&mut self, command: ShellCommand) -> io::Result<Flow> {
        match command {
            ShellCommand::Help => write!(self.output, "{HELP}")?,
            ShellCommand::Quit => return Ok(Flow::Quit),
            ShellCommand::New => {
                cli_bridge::new_list(self.state);
                writeln!(self.output, "started a new list")?;
            }
            ShellCommand::Lists => {
                let result = cli_bridge::get_saved_lists(self.state);
                if let Some(names) = self.report(result)? {
                    if names.is_empty() {
                        writeln!(self.output, "no saved lists")?;
                    }
                    for name in names {
                        writeln!(self.output, "  {name}")?;
                    }
                }
            }
            ShellCommand::Show => self.show_current()?,
            ShellCommand::Load(name) => {
                let result = cli_bridge::load_saved_list(self.state, &name);
                if let Some(view) = self.report(result)? {
                    write!(self.output, "{}", render_list(&view))?;
                }
            }
            ShellCommand::Save(name) => {
                let result = cli_bridge::save_current_list(self.state, &name, Overwrite::Ask);
                let status = match self.report(result)? {
                    Some(SaveStatus::NeedsConfirmation) => {
                        if confirm(&mut self.input, &mut self.output, &overwrite_prompt(&name))? {
                            let result =
                                cli_bridge::save_current_list(self.state, &name, Overwrite::Confirmed);
                            self.report(result)?
                        } else {
                            writeln!(self.output, "not saved")?;
                            None
                        }
                    }
                    other => other,
                };
                if let Some(status) = status {
                    let verb = match status {
                        SaveStatus::Overwritten => "overwrote",
                        _ => "saved",
                    };
                    writeln!(self.output, "{verb} \"{}\"", name.trim())?;
                }
            }
            ShellCommand::Delete(name) => {
                if confirm(&mut self.input, &mut self.output, &delete_prompt(&name))? {
                    let result = cli_bridge::delete_saved_list(self.state, &name);
                    if self.report(result)?.is_some() {
                        writeln!(self.output, "deleted \"{}\"", name.trim())?;
                    }
                }
            }
            ShellCommand::Add { labels, weight } => {
                let result = cli_bridge::add_options(self.state, &labels, weight);
                if let Some(view) = self.report(result)? {
                    write!(self.output, "{}", render_list(&view))?;
                }
            }
            ShellCommand::Edit { index, weight } => {
                let result = cli_bridge::edit_option(self.state, index, weight);
                if let Some(view) = self.report(result)? {
                    write!(self.output, "{}", render_list(&view))?;
                }
            }
            ShellCommand::Remove(indices) => {
                let result = cli_bridge::remove_options(self.state, &indices);
                if let Some(removed) = self.report(result)? {
                    write!(self.output, "{}", render_removed(&removed))?;
                    self.show_current()?;
                }
            }
            ShellCommand::Sort(order) => {
                let result = cli_bridge::sort_options(self.state, order);
                if let Some(view) = self.report(result)? {
                    write!(self.output, "{}", render_list(&view))?;
                }
            }
            ShellCommand::Decide(duration) => {
                self.cancel.store(false, Ordering::Relaxed);
                let result = {
                    let mut display = TerminalDisplay::new(&mut self.output);
                    cli_bridge::decide(self.state, duration, &mut display, &mut self.rng, self.cancel)
                        .await
                };
                // A Ctrl+C that cancelled the reveal is consumed here.
                self.cancel.store(false, Ordering::Relaxed);
                if let Some(outcome) = self.report(result)? {
                    if outcome.outcome == "cancelled" {
                        writeln!(self.output, "cancelled")?;
                    }
                }
            }
            ShellCommand::Roll(names) => {
                if !names.is_empty() {
                    self.roll_rows = names
                        .into_iter()
                        .map(|list_name| RollRowDto {
                            list_name,
                            locked: false,
                            previous: None,
                        })
                        .collect();
                }
                if self.roll_rows.is_empty() {
                    writeln!(self.output, "usage: roll <list>...")?;
                    return Ok(Flow::Continue);
                }
                let result = cli_bridge::multi_roll(self.state, self.roll_rows.clone(), &mut self.rng);
                if let Some(results) = self.report(result)? {
                    for (row, result) in self.roll_rows.iter_mut().zip(&results) {
                        row.previous = Some(result.result.clone());
                    }
                    write!(self.output, "{}", render_rolls(&results))?;
                }
            }
            ShellCommand::Lock(row) => match self.roll_rows.get_mut(row) {
                Some(r) => {
                    r.locked = !r.locked;
                    let state = if r.locked { "locked" } else { "unlocked" };
                    writeln!(self.output, "row {row} ({}) {state}", r.list_name)?;
                }
                None => writeln!(self.output, "no roll row {row}")?,
            },
            ShellCommand::Settings(None) => {
                let result = cli_bridge::get_settings(self.state);
                if let Some(settings) = self.report(result)? {
                    write!(self.output, "{}", render_settings(&settings))?;
                }
            }
            ShellCommand::Settings(Some((key, value))) => match settings_update(&key, value) {
                Ok(update) => {
                    let result = cli_bridge::update_settings(self.state, update);
                    if let Some(settings) = self.report(result)? {
                        write!(self.output, "{}", render_settings(&settings))?;
                    }
                }
                Err(message) => writeln!(self.output, "{message}")?,
            },
        }
        Ok(Flow::Continue)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
