//! Renders a live conversation to the terminal.
//!
//! [`ConsoleRenderer`] is installed as the session's observer. It prints the
//! Assistant's response as it streams in and drives the spinner while a turn
//! has produced no text yet. User messages are not echoed since the user has
//! just typed them.

use super::stream::{StreamPrinter, StreamUpdate};
use crate::output::console::ConsoleFormatter;
use crate::progress::ProgressReporter;
use colored::Colorize;
use ragchat_application::{ConversationObserver, TurnOutcome};
use ragchat_domain::{ChatMode, Message, Participant};
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

struct RenderState {
    out: Box<dyn Write + Send>,
    printer: StreamPrinter,
    /// Whether the speaker label for the running turn has been printed.
    labelled: bool,
}

/// Conversation observer that writes to the console
pub struct ConsoleRenderer {
    progress: ProgressReporter,
    state: Mutex<RenderState>,
}

impl ConsoleRenderer {
    pub fn new(show_progress: bool) -> Self {
        Self::with_writer(Box::new(io::stdout()), show_progress)
    }

    pub fn with_writer(out: Box<dyn Write + Send>, show_progress: bool) -> Self {
        let progress = if show_progress {
            ProgressReporter::new()
        } else {
            ProgressReporter::hidden()
        };
        Self {
            progress,
            state: Mutex::new(RenderState {
                out,
                printer: StreamPrinter::new(),
                labelled: false,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RenderState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn progress_message(mode: ChatMode) -> &'static str {
        match mode {
            ChatMode::Rag => "Searching documents...",
            ChatMode::Plain => "Thinking...",
        }
    }
}

impl RenderState {
    fn label(&mut self) {
        if !self.labelled {
            let _ = write!(
                self.out,
                "{} ",
                ConsoleFormatter::speaker(Participant::Assistant)
            );
            self.labelled = true;
        }
    }

    fn render(&mut self, text: &str) {
        match self.printer.advance(text) {
            StreamUpdate::Append(delta) => {
                self.label();
                let _ = write!(self.out, "{}", delta);
            }
            StreamUpdate::Replace(text) => {
                if self.labelled {
                    let _ = writeln!(self.out);
                }
                self.label();
                let _ = write!(self.out, "{}", text.red());
            }
            StreamUpdate::Unchanged => {}
        }
        let _ = self.out.flush();
    }

    fn end_turn(&mut self, outcome: &TurnOutcome) {
        match outcome {
            TurnOutcome::Discarded => {
                if self.labelled {
                    let _ = writeln!(self.out);
                }
                let _ = write!(self.out, "{}", "(conversation cleared, response discarded)".dimmed());
            }
            _ if !self.labelled => {
                self.label();
                let _ = write!(self.out, "{}", "(empty response)".dimmed());
            }
            _ => {}
        }
        let _ = writeln!(self.out);
        let _ = writeln!(self.out);
        let _ = self.out.flush();
        self.printer.reset();
        self.labelled = false;
    }
}

impl ConversationObserver for ConsoleRenderer {
    fn on_turn_started(&self, _user_index: usize, mode: ChatMode) {
        {
            let mut state = self.lock();
            state.printer.reset();
            state.labelled = false;
        }
        self.progress.start(Self::progress_message(mode));
    }

    fn on_message_updated(&self, _index: usize, message: &Message) {
        if !message.is_assistant() {
            return;
        }
        self.progress.stop();
        self.lock().render(&message.text);
    }

    fn on_turn_settled(&self, _user_index: usize, outcome: &TurnOutcome) {
        self.progress.stop();
        self.lock().end_turn(outcome);
    }

    fn on_cleared(&self) {
        self.progress.stop();
    }
}
