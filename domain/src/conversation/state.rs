//! Conversation state machine
//!
//! [`ConversationState`] is the synchronous core of response orchestration:
//! it owns the [`MessageLog`], the `Idle`/`Generating` phase, the cursor of
//! the last answered User turn and the session epoch. Every decision about
//! whether a response is owed is made here, under whatever lock the caller
//! holds, before any suspension point.
//!
//! # Turn lifecycle
//!
//! ```text
//! Idle ──try_begin_turn()──▶ Generating ──settle()──▶ Idle
//!            │                    │
//!   appends empty Assistant   write_response() replaces its text
//! ```
//!
//! # Clearing mid-turn
//!
//! [`clear`](ConversationState::clear) bumps the epoch. A [`PendingTurn`]
//! captured under an older epoch is stale: its writes and its cursor
//! advance are dropped, and settling it only returns the phase to `Idle`.

use super::log::MessageLog;
use super::message::Message;
use super::mode::ChatMode;

/// Whether a pipeline run is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Generating,
}

/// A User turn that has been claimed for a response.
///
/// Returned by [`ConversationState::try_begin_turn`] and handed back on
/// every write so stale turns can be recognised after a clear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTurn {
    /// Index of the User message being answered.
    pub user_index: usize,
    /// Text of that User message.
    pub user_text: String,
    /// Index of the Assistant placeholder appended for this turn.
    pub placeholder_index: usize,
    /// Mode captured when the turn started.
    pub mode: ChatMode,
    epoch: u64,
}

impl PendingTurn {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Conversation log plus orchestration bookkeeping (Entity)
#[derive(Debug, Clone, Default)]
pub struct ConversationState {
    log: MessageLog,
    phase: Phase,
    cursor: Option<usize>,
    epoch: u64,
    mode: ChatMode,
}

impl ConversationState {
    pub fn new(mode: ChatMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    pub fn messages(&self) -> &[Message] {
        self.log.messages()
    }

    pub fn mode(&self) -> ChatMode {
        self.mode
    }

    /// Change the mode used by turns that start after this call.
    pub fn set_mode(&mut self, mode: ChatMode) {
        self.mode = mode;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_generating(&self) -> bool {
        self.phase == Phase::Generating
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Append any message. Returns its index.
    pub fn append(&mut self, message: Message) -> usize {
        self.log.append(message)
    }

    pub fn append_user(&mut self, text: impl Into<String>) -> usize {
        self.log.append(Message::user(text))
    }

    /// Index of the most recent User turn that still owes a response.
    ///
    /// A turn is owed when it lies past the cursor and is not already
    /// followed by an Assistant entry. The phase is not consulted.
    pub fn unanswered_turn(&self) -> Option<usize> {
        let user_index = self.log.last_user_index()?;
        if self.cursor.is_some_and(|cursor| user_index <= cursor) {
            return None;
        }
        match self.log.get(user_index + 1) {
            Some(next) if next.is_assistant() => None,
            _ => Some(user_index),
        }
    }

    /// Claim the unanswered turn, if any, and move to `Generating`.
    ///
    /// Appends the empty Assistant placeholder in the same step, so
    /// re-evaluating the trigger afterwards can never claim the turn twice.
    pub fn try_begin_turn(&mut self) -> Option<PendingTurn> {
        if self.is_generating() {
            return None;
        }
        let user_index = self.unanswered_turn()?;
        let user_text = self.log.get(user_index)?.text.clone();

        self.phase = Phase::Generating;
        let placeholder_index = self.log.append(Message::assistant(""));

        Some(PendingTurn {
            user_index,
            user_text,
            placeholder_index,
            mode: self.mode,
            epoch: self.epoch,
        })
    }

    /// True when `turn` was started under the current epoch.
    pub fn is_current(&self, turn: &PendingTurn) -> bool {
        turn.epoch == self.epoch
    }

    /// Replace the in-progress Assistant text with `text`.
    ///
    /// Returns the updated index, or `None` when the turn is stale.
    pub fn write_response(&mut self, turn: &PendingTurn, text: &str) -> Option<usize> {
        if !self.is_current(turn) {
            return None;
        }
        self.log
            .replace_last(Message::is_assistant, |message| message.set_text(text))
    }

    /// Finish `turn` and return to `Idle`.
    ///
    /// `failure_text`, when given, replaces whatever was streamed so far.
    /// The cursor advances to the turn's User index whether it succeeded or
    /// failed, so a failed turn is never retried. Returns the index of the
    /// entry rewritten with `failure_text`, if any.
    pub fn settle(&mut self, turn: &PendingTurn, failure_text: Option<&str>) -> Option<usize> {
        self.phase = Phase::Idle;
        if !self.is_current(turn) {
            return None;
        }
        let updated = failure_text.and_then(|text| self.write_response(turn, text));
        self.cursor = Some(turn.user_index);
        updated
    }

    /// Empty the log, forget the cursor and start a new epoch.
    ///
    /// The phase is left untouched: an in-flight run keeps the machine in
    /// `Generating` until it settles.
    pub fn clear(&mut self) {
        self.log.clear();
        self.cursor = None;
        self.epoch += 1;
    }
}
