//! Terminal implementations of the core's interaction seams
//!
//! Prompts go to stdout and answers are read line by line. End of input is
//! treated as a dismissed prompt.

use std::fmt;
use std::io::{self, BufRead, Write};

use hostbook_core::ui::{InputRequest, MessageLevel, Notifier, PickRequest, Progress, Prompter};

/// Answer that clears a pre-filled value
const CLEAR: &str = "-";

/// Line-based prompter over any reader and writer
pub struct TerminalPrompter<R, W> {
    reader: R,
    writer: W,
    assume_yes: bool,
}

impl TerminalPrompter<io::StdinLock<'static>, io::Stdout> {
    /// Prompter on the process's stdin and stdout
    pub fn stdio(assume_yes: bool) -> Self {
        Self::new(io::stdin().lock(), io::stdout(), assume_yes)
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(reader: R, writer: W, assume_yes: bool) -> Self {
        Self {
            reader,
            writer,
            assume_yes,
        }
    }

    fn ask(&mut self, text: fmt::Arguments<'_>) -> Option<String> {
        self.writer.write_fmt(text).ok()?;
        self.writer.flush().ok()?;

        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }

    #[cfg(test)]
    fn into_writer(self) -> W {
        self.writer
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn input(&mut self, request: &InputRequest) -> Option<String> {
        let shown = match (&request.value, request.password) {
            (Some(v), _) if v.is_empty() => None,
            (Some(_), true) => Some("****".to_string()),
            (Some(v), false) => Some(v.clone()),
            (None, _) => request.placeholder.clone(),
        };
        let answer = match shown {
            Some(hint) => self.ask(format_args!("{} [{hint}]: ", request.prompt))?,
            None => self.ask(format_args!("{}: ", request.prompt))?,
        };

        let answer = answer.trim();
        if answer == CLEAR {
            return Some(String::new());
        }
        if answer.is_empty() {
            return Some(request.value.clone().unwrap_or_default());
        }
        Some(answer.to_string())
    }

    fn pick(&mut self, request: &PickRequest) -> Option<usize> {
        let mut menu = format!("{}\n", request.prompt);
        for (i, item) in request.items.iter().enumerate() {
            let marker = if request.selected == Some(i) { '*' } else { ' ' };
            menu.push_str(&format!(" {marker}{}) {item}\n", i + 1));
        }
        let answer = self.ask(format_args!("{menu}Choice: "))?;

        let answer = answer.trim();
        if answer.is_empty() {
            return request.selected;
        }
        answer
            .parse::<usize>()
            .ok()
            .filter(|n| (1..=request.items.len()).contains(n))
            .map(|n| n - 1)
    }

    fn confirm(&mut self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        self.ask(format_args!("{message} [y/N] "))
            .is_some_and(|a| matches!(a.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
    }
}

/// Prints informational messages to stdout.
///
/// Warnings and errors are only logged; failed commands print their error
/// once on exit.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, level: MessageLevel, message: &str) {
        match level {
            MessageLevel::Info => println!("{message}"),
            MessageLevel::Warning => tracing::warn!("{message}"),
            MessageLevel::Error => tracing::debug!("{message}"),
        }
    }
}

/// Reports long-running checks on stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleProgress;

impl Progress for ConsoleProgress {
    fn begin(&self, title: &str) {
        eprintln!("{title}...");
    }

    fn end(&self, _title: &str) {}
}
