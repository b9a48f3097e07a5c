//! Terminal presentation: the reveal display, confirmation prompts and the
//! interactive shell.
//!
//! Everything here writes to a generic [`Write`] so tests can capture the
//! output in a `Vec<u8>`; the binary passes `stdout`.

pub mod shell;

use std::io::{self, BufRead, Write};

use crate::application::run_reveal::RevealDisplay;
use crate::infrastructure::cli_bridge::{ListViewDto, OptionDto, RollResultDto, SettingsDto};

/// Text shown when a reveal is requested on an empty list.
pub const NO_OPTIONS_TEXT: &str = "No options to display";

/// Redraws a single terminal line for every reveal frame.
///
/// Intermediate frames are written with a leading carriage return and no
/// newline so each one replaces the last; the settled result ends the line.
pub struct TerminalDisplay<W: Write> {
    out: W,
    /// Width of the last frame, so shorter frames can blank out the rest.
    last_width: usize,
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W) -> Self {
        Self { out, last_width: 0 }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn redraw(&mut self, line: &str) {
        let pad = self.last_width.saturating_sub(line.chars().count());
        // Display errors are not actionable mid-reveal.
        let _ = write!(self.out, "\r{line}{:pad$}", "");
        let _ = self.out.flush();
        self.last_width = line.chars().count();
    }
}

impl<W: Write> RevealDisplay for TerminalDisplay<W> {
    fn show(&mut self, label: &str, tick: u32, total: u32) {
        self.redraw(&format!("  {label}  [{tick}/{total}]"));
    }

    fn settle(&mut self, label: &str) {
        self.redraw(&format!("> {label}"));
        let _ = writeln!(self.out);
        let _ = self.out.flush();
        self.last_width = 0;
    }

    fn no_options(&mut self) {
        let _ = writeln!(self.out, "{NO_OPTIONS_TEXT}");
        let _ = self.out.flush();
    }
}

/// Asks a yes/no question; anything but `y`/`yes` (including end of input)
/// means no.
///
/// # Errors
///
/// I/O errors from reading `input` or writing `output`.
pub fn confirm<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> io::Result<bool> {
    write!(output, "{prompt} [y/N] ")?;
    output.flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        writeln!(output)?;
        return Ok(false);
    }
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

/// Prompt text for deleting a saved list.
pub fn delete_prompt(name: &str) -> String {
    format!("Are you sure you want to delete the list \"{name}\"?")
}

/// Prompt text for overwriting a saved list.
pub fn overwrite_prompt(name: &str) -> String {
    format!("The list \"{name}\" already exists. Do you want to overwrite it?")
}

// ── Rendering ─────────────────────────────────────────────────────────────────

/// Renders an option list, one indexed row per option with its share of the
/// total weight.
pub fn render_list(view: &ListViewDto) -> String {
    let title = view.name.as_deref().unwrap_or("(unsaved list)");
    let mut out = format!("{title}\n");
    if view.options.is_empty() {
        out.push_str("  (no options)\n");
        return out;
    }
    for row in &view.options {
        let share = row.weight as f64 * 100.0 / view.total_weight as f64;
        out.push_str(&format!(
            "  {:>3}  {} (Weight: {})  {share:.1}%\n",
            row.index, row.label, row.weight
        ));
    }
    out
}

/// Renders the settings in force.
pub fn render_settings(settings: &SettingsDto) -> String {
    format!(
        "duration   = {}\nsort_order = {}\nfont_size  = {}\ntheme      = {}\n",
        settings.duration, settings.sort_order, settings.font_size, settings.theme
    )
}

/// Renders multi-roll results, one row per list.
/// One `removed <label> (Weight: N)` line per removed option.
pub fn render_removed(rows: &[OptionDto]) -> String {
    rows.iter()
        .map(|r| format!("removed {} (Weight: {})\n", r.label, r.weight))
        .collect()
}

pub fn render_rolls(rows: &[RollResultDto]) -> String {
    let width = rows.iter().map(|r| r.list_name.chars().count()).max().unwrap_or(0);
    rows.iter()
        .enumerate()
        .map(|(i, r)| {
            let lock = if r.locked { " [locked]" } else { "" };
            format!("  {i:>3}  {:<width$}  {}{lock}\n", r.list_name, r.result)
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_show_redraws_in_place() {
        // Arrange
        let mut display = TerminalDisplay::new(Vec::new());

        // Act
        display.show("pizza", 1, 3);
        display.show("tacos", 2, 3);

        // Assert
        let text = String::from_utf8(display.into_inner()).unwrap();
        assert_eq!(text, "\r  pizza  [1/3]\r  tacos  [2/3]");
        assert!(!text.contains('\n'));
    }

    #[test]
    fn test_shorter_frame_blanks_leftover_characters() {
        let mut display = TerminalDisplay::new(Vec::new());

        display.show("spaghetti", 1, 2);
        display.settle("pho");

        let text = String::from_utf8(display.into_inner()).unwrap();
        let last = text.rsplit('\r').next().unwrap();
        assert!(last.starts_with("> pho "));
        assert!(last.ends_with('\n'));
        assert_eq!(last.trim_end_matches('\n').len(), "  spaghetti  [1/2]".len());
    }

    #[test]
    fn test_no_options_prints_notice() {
        let mut display = TerminalDisplay::new(Vec::new());
        display.no_options();
        let text = String::from_utf8(display.into_inner()).unwrap();
        assert_eq!(text, "No options to display\n");
    }

    #[test]
    fn test_confirm_accepts_yes_variants() {
        for answer in ["y\n", "Y\n", "yes\n", " YES \n"] {
            let mut input = Cursor::new(answer.as_bytes());
            let mut output = Vec::new();
            assert!(confirm(&mut input, &mut output, "Sure?").unwrap(), "{answer:?}");
        }
    }

    #[test]
    fn test_confirm_defaults_to_no() {
        for answer in ["\n", "n\n", "maybe\n", ""] {
            let mut input = Cursor::new(answer.as_bytes());
            let mut output = Vec::new();
            assert!(!confirm(&mut input, &mut output, "Sure?").unwrap(), "{answer:?}");
        }
    }

    #[test]
    fn test_confirm_writes_prompt() {
        let mut input = Cursor::new(b"n\n".as_slice());
        let mut output = Vec::new();

        confirm(&mut input, &mut output, &delete_prompt("dinner")).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert_eq!(
            text,
            "Are you sure you want to delete the list \"dinner\"? [y/N] "
        );
    }

    #[test]
    fn test_render_list_shows_index_weight_and_share() {
        use crate::infrastructure::cli_bridge::OptionDto;

        let view = ListViewDto {
            name: Some("dinner".to_string()),
            options: vec![
                OptionDto {
                    index: 0,
                    label: "pizza".to_string(),
                    weight: 1,
                },
                OptionDto {
                    index: 1,
                    label: "tacos".to_string(),
                    weight: 3,
                },
            ],
            total_weight: 4,
        };

        let text = render_list(&view);

        assert_eq!(
            text,
            "dinner\n    0  pizza (Weight: 1)  25.0%\n    1  tacos (Weight: 3)  75.0%\n"
        );
    }

    #[test]
    fn test_render_empty_unsaved_list() {
        let view = ListViewDto {
            name: None,
            options: Vec::new(),
            total_weight: 0,
        };
        assert_eq!(render_list(&view), "(unsaved list)\n  (no options)\n");
    }

    #[test]
    fn test_render_rolls_marks_locked_rows() {
        let rows = vec![
            RollResultDto {
                list_name: "food".to_string(),
                result: "pizza".to_string(),
                locked: false,
            },
            RollResultDto {
                list_name: "drinks".to_string(),
                result: "tea".to_string(),
                locked: true,
            },
        ];

        let text = render_rolls(&rows);

        assert_eq!(text, "    0  food    pizza\n    1  drinks  tea [locked]\n");
    }

    #[test]
    fn test_overwrite_prompt_names_the_list() {
        assert_eq!(
            overwrite_prompt("x"),
            "The list \"x\" already exists. Do you want to overwrite it?"
        );
    }
}
