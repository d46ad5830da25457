//! Presenters: execute rendered [`Emit`] operations.
//!
//! The renderer never touches the terminal. A [`Presenter`] takes each
//! operation and writes `indent` spaces, the text, and the line end. The
//! terminal presenter colors text by [`Style`]; the plain presenter collects
//! uncolored text, which is what tests and pipes want.

use owo_colors::OwoColorize;
use serde::Deserialize;
use std::io::{self, Write};

use crate::render::{Emit, Style};

/// Executes styled text operations.
pub trait Presenter {
    fn emit(&mut self, op: &Emit) -> io::Result<()>;

    fn present_all(&mut self, ops: &[Emit]) -> io::Result<()> {
        for op in ops {
            self.emit(op)?;
        }
        Ok(())
    }
}

/// Writes operations to a terminal (or any writer), optionally colored.
pub struct TerminalPresenter<W: Write> {
    out: W,
    color: bool,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn emit(&mut self, op: &Emit) -> io::Result<()> {
        write!(self.out, "{:indent$}", "", indent = op.indent)?;
        if self.color && !op.text.is_empty() {
            write!(self.out, "{}", paint(&op.text, op.style))?;
        } else {
            self.out.write_all(op.text.as_bytes())?;
        }
        self.out.write_all(op.end.as_str().as_bytes())
    }
}

fn paint(text: &str, style: Style) -> String {
    match style {
        Style::Plain => text.to_string(),
        Style::Word => text.bright_yellow().to_string(),
        Style::Phonetic => text.bright_white().to_string(),
        Style::PartOfSpeech => text.bright_red().to_string(),
        Style::Meaning => text.truecolor(255, 135, 0).to_string(),
        Style::Example => text.blue().to_string(),
        Style::ExampleEmphasis => text.bright_blue().to_string(),
        Style::Label => text.bold().to_string(),
        Style::Region => text.yellow().to_string(),
        Style::Register => text.red().to_string(),
        Style::Domain => text.green().to_string(),
        Style::Note => text.magenta().to_string(),
    }
}

/// Collects uncolored output in memory.
#[derive(Debug, Default)]
pub struct PlainPresenter {
    buf: String,
}

impl PlainPresenter {
    pub fn into_string(self) -> String {
        self.buf
    }
}

impl Presenter for PlainPresenter {
    fn emit(&mut self, op: &Emit) -> io::Result<()> {
        self.buf.extend(std::iter::repeat(' ').take(op.indent));
        self.buf.push_str(&op.text);
        self.buf.push_str(op.end.as_str());
        Ok(())
    }
}

/// Render operations to a plain string.
pub fn render_plain(ops: &[Emit]) -> String {
    let mut presenter = PlainPresenter::default();
    for op in ops {
        // Writing to a String cannot fail.
        let _ = presenter.emit(op);
    }
    presenter.into_string()
}

/// When to color output.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color when stdout is a TTY.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn enabled(&self) -> bool {
        match self {
            ColorMode::Auto => atty::is(atty::Stream::Stdout),
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }

    /// Presenter for stdout in this mode.
    pub fn stdout_presenter(&self) -> TerminalPresenter<io::Stdout> {
        TerminalPresenter::new(io::stdout(), self.enabled())
    }
}
