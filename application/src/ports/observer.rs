//! Conversation observer port
//!
//! The session reports every change it makes to the message list so a
//! rendering layer can redraw. Callbacks run after the session lock has been
//! released, so observers may read the session back.

use ragchat_domain::{ChatMode, Message};
use tokio::sync::mpsc;

/// How a turn ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The response was written to the placeholder.
    Answered,
    /// The turn failed and the placeholder shows the mode's error text.
    Failed { error: String },
    /// The conversation was cleared while the turn was running; nothing it
    /// produced was kept.
    Discarded,
}

impl TurnOutcome {
    pub fn is_answered(&self) -> bool {
        matches!(self, Self::Answered)
    }
}

/// Callback for changes to a conversation
///
/// Every method has a no-op default so implementations only override what
/// they render.
pub trait ConversationObserver: Send + Sync {
    /// A message was appended at `index`.
    fn on_message_appended(&self, _index: usize, _message: &Message) {}

    /// The message at `index` was rewritten (streamed text or error text).
    fn on_message_updated(&self, _index: usize, _message: &Message) {}

    /// The message list was emptied.
    fn on_cleared(&self) {}

    /// A response started for the User message at `user_index`.
    fn on_turn_started(&self, _user_index: usize, _mode: ChatMode) {}

    /// The response for the User message at `user_index` settled.
    fn on_turn_settled(&self, _user_index: usize, _outcome: &TurnOutcome) {}
}

/// No-op observer
pub struct NoObserver;

impl ConversationObserver for NoObserver {}

/// A conversation change, as delivered by [`ChannelObserver`]
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    MessageAppended { index: usize, message: Message },
    MessageUpdated { index: usize, message: Message },
    Cleared,
    TurnStarted { user_index: usize, mode: ChatMode },
    TurnSettled { user_index: usize, outcome: TurnOutcome },
}

/// Forwards conversation changes over an unbounded channel.
///
/// Sends never block the session; events for a dropped receiver are
/// discarded.
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl ChannelObserver {
    pub fn new(tx: mpsc::UnboundedSender<SessionEvent>) -> Self {
        Self { tx }
    }

    /// Create an observer together with the receiving end of its channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    fn send(&self, event: SessionEvent) {
        let _ = self.tx.send(event);
    }
}

impl ConversationObserver for ChannelObserver {
    fn on_message_appended(&self, index: usize, message: &Message) {
        self.send(SessionEvent::MessageAppended {
            index,
            message: message.clone(),
        });
    }

    fn on_message_updated(&self, index: usize, message: &Message) {
        self.send(SessionEvent::MessageUpdated {
            index,
            message: message.clone(),
        });
    }

    fn on_cleared(&self) {
        self.send(SessionEvent::Cleared);
    }

    fn on_turn_started(&self, user_index: usize, mode: ChatMode) {
        self.send(SessionEvent::TurnStarted { user_index, mode });
    }

    fn on_turn_settled(&self, user_index: usize, outcome: &TurnOutcome) {
        self.send(SessionEvent::TurnSettled {
            user_index,
            outcome: outcome.clone(),
        });
    }
}
