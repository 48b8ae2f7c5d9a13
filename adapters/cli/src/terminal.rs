//! Line-oriented terminal rendering of the Simon Says board.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use log::debug;
use simon_says_core::PadColor;
use simon_says_presentation::Presenter;

const RESET: &str = "\x1b[0m";

/// Presenter that prints engine callbacks as terminal lines.
#[derive(Debug)]
pub(crate) struct TerminalPresenter<W> {
    out: W,
    status_visible: bool,
}

impl<W: Write> TerminalPresenter<W> {
    /// Creates a presenter writing to `out` with the idle layout active.
    pub(crate) fn new(out: W) -> Self {
        Self {
            out,
            status_visible: false,
        }
    }

    /// Prints `text` without a trailing newline and flushes it.
    pub(crate) fn prompt(&mut self, text: &str) -> Result<()> {
        write!(self.out, "{text}").context("failed to write prompt")?;
        self.out.flush().context("failed to flush terminal")
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{text}").context("failed to write to terminal")?;
        self.out.flush().context("failed to flush terminal")
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn render_status(&mut self, text: &str) -> Result<()> {
        if !self.status_visible {
            return Ok(());
        }
        self.line(&format!("  {text}"))
    }

    fn render_heading(&mut self, text: &str) -> Result<()> {
        self.line(&format!("== {text} =="))
    }

    fn set_pads_interactive(&mut self, interactive: bool) -> Result<()> {
        if interactive {
            self.line("  Your turn: type the colors (r g b y) and press Enter.")
        } else {
            Ok(())
        }
    }

    fn activate_pad(&mut self, color: PadColor) -> Result<()> {
        self.line(&format!("  {}", swatch(color)))
    }

    fn show_idle_ui(&mut self) -> Result<()> {
        self.status_visible = false;
        Ok(())
    }

    fn show_playing_ui(&mut self) -> Result<()> {
        self.status_visible = true;
        Ok(())
    }

    fn announce(&mut self, text: &str) -> Result<()> {
        self.line(&format!("*** {text} ***"))
    }
}

fn swatch(color: PadColor) -> String {
    let code = match color {
        PadColor::Red => "41",
        PadColor::Green => "42",
        PadColor::Blue => "44",
        PadColor::Yellow => "43",
    };
    format!(
        "\x1b[1;30;{code}m {:^8} {RESET}",
        color.name().to_ascii_uppercase()
    )
}

/// Reads one line of input after printing `prompt`; `None` on end of input.
pub(crate) fn read_line<R, W>(
    input: &mut R,
    presenter: &mut TerminalPresenter<W>,
    prompt: &str,
) -> Result<Option<String>>
where
    R: BufRead,
    W: Write,
{
    presenter.prompt(prompt)?;
    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .context("failed to read from stdin")?;
    Ok((read > 0).then_some(line))
}

/// Splits a typed line into pad tokens.
///
/// Words are separated by whitespace or commas. A run of color initials such
/// as `rgby` presses one pad per character; any other word that is not a
/// color name is dropped whole.
pub(crate) fn press_tokens(line: &str) -> Vec<String> {
    line.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|word| !word.is_empty())
        .flat_map(|word| {
            if PadColor::from_token(word).is_some() {
                return vec![word.to_owned()];
            }
            let initials: Vec<String> = word.chars().map(String::from).collect();
            if initials
                .iter()
                .all(|initial| PadColor::from_token(initial).is_some())
            {
                initials
            } else {
                debug!("ignoring unresolvable input {word:?}");
                Vec::new()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn render(presenter: TerminalPresenter<Vec<u8>>) -> String {
        String::from_utf8(presenter.into_inner()).expect("utf-8 output")
    }

    #[test]
    fn status_is_hidden_until_playing_ui_is_shown() {
        let mut presenter = TerminalPresenter::new(Vec::new());
        presenter.render_status("hidden").expect("write");
        presenter.show_playing_ui().expect("write");
        presenter.render_status("3 presses left").expect("write");
        presenter.show_idle_ui().expect("write");
        presenter.render_status("hidden again").expect("write");

        assert_eq!(render(presenter), "  3 presses left\n");
    }

    #[test]
    fn heading_and_announcement_are_framed() {
        let mut presenter = TerminalPresenter::new(Vec::new());
        presenter.render_heading("Round 2 of 8").expect("write");
        presenter.announce("Wrong move! Game over.").expect("write");

        assert_eq!(
            render(presenter),
            "== Round 2 of 8 ==\n*** Wrong move! Game over. ***\n"
        );
    }

    #[test]
    fn activated_pad_prints_its_name() {
        let mut presenter = TerminalPresenter::new(Vec::new());
        presenter.activate_pad(PadColor::Yellow).expect("write");

        let output = render(presenter);
        assert!(output.contains("YELLOW"));
        assert!(output.ends_with(&format!("{RESET}\n")));
    }

    #[test]
    fn read_line_reports_end_of_input() {
        let mut presenter = TerminalPresenter::new(Vec::new());
        let mut input = Cursor::new("r g\n");

        let first = read_line(&mut input, &mut presenter, "> ").expect("read");
        let second = read_line(&mut input, &mut presenter, "> ").expect("read");

        assert_eq!(first.as_deref(), Some("r g\n"));
        assert_eq!(second, None);
        assert_eq!(render(presenter), "> > ");
    }

    #[test]
    fn press_tokens_accept_names_initials_and_runs() {
        assert_eq!(press_tokens("red, g  blue"), vec!["red", "g", "blue"]);
        assert_eq!(press_tokens("rgby"), vec!["r", "g", "b", "y"]);
        assert_eq!(press_tokens("  \n"), Vec::<String>::new());
    }

    #[test]
    fn misspelled_words_press_nothing() {
        assert_eq!(press_tokens("grene"), Vec::<String>::new());
        assert_eq!(press_tokens("reed"), Vec::<String>::new());
        assert_eq!(press_tokens("blue grene yb"), vec!["blue", "y", "b"]);
    }
}
