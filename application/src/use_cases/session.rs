//! Conversation session handle.
//!
//! [`ConversationSession`] is the single owner of a conversation's state. It
//! is cheap to clone; every clone refers to the same conversation, so the
//! orchestrator and the rendering layer can hold it at the same time.
//!
//! All state changes happen under one short lock that is never held across
//! an `.await`. Observer callbacks fire after the lock is released.

use crate::ports::observer::{ConversationObserver, NoObserver, TurnOutcome};
use ragchat_domain::{ChatMode, ConversationState, Message, PendingTurn, Phase};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Clone)]
pub struct ConversationSession {
    state: Arc<Mutex<ConversationState>>,
    observer: Arc<dyn ConversationObserver>,
}

impl ConversationSession {
    pub fn new(mode: ChatMode) -> Self {
        Self {
            state: Arc::new(Mutex::new(ConversationState::new(mode))),
            observer: Arc::new(NoObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn ConversationObserver>) -> Self {
        self.observer = observer;
        self
    }

    fn lock(&self) -> MutexGuard<'_, ConversationState> {
        // Every mutation leaves the state consistent; a poisoned lock is reusable.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ==================== Queries ====================

    /// Snapshot of the message list.
    pub fn messages(&self) -> Vec<Message> {
        self.lock().messages().to_vec()
    }

    pub fn len(&self) -> usize {
        self.lock().log().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().log().is_empty()
    }

    pub fn mode(&self) -> ChatMode {
        self.lock().mode()
    }

    pub fn phase(&self) -> Phase {
        self.lock().phase()
    }

    pub fn is_generating(&self) -> bool {
        self.lock().is_generating()
    }

    /// Index of the User message still waiting for a response, if any.
    pub fn unanswered_turn(&self) -> Option<usize> {
        self.lock().unanswered_turn()
    }

    // ==================== Commands ====================

    /// Switch retrieval on or off for turns that start from now on.
    pub fn set_mode(&self, mode: ChatMode) {
        self.lock().set_mode(mode);
    }

    /// Append a User message. Returns its index.
    pub fn append_user(&self, text: impl Into<String>) -> usize {
        self.append(Message::user(text))
    }

    /// Append any message. Returns its index.
    ///
    /// Appending an Assistant message directly after an unanswered User
    /// message marks that turn as answered.
    pub fn append(&self, message: Message) -> usize {
        let index = self.lock().append(message.clone());
        self.observer.on_message_appended(index, &message);
        index
    }

    /// Empty the conversation.
    ///
    /// A response that is still being generated keeps running but its
    /// output is discarded.
    pub fn clear(&self) {
        self.lock().clear();
        self.observer.on_cleared();
    }

    // ==================== Turn lifecycle ====================

    /// Claim the owed turn and append its empty Assistant placeholder.
    pub(crate) fn try_begin_turn(&self) -> Option<PendingTurn> {
        let (turn, placeholder) = {
            let mut state = self.lock();
            let turn = state.try_begin_turn()?;
            let placeholder = state.log().get(turn.placeholder_index).cloned();
            (turn, placeholder)
        };
        self.observer.on_turn_started(turn.user_index, turn.mode);
        if let Some(message) = placeholder {
            self.observer
                .on_message_appended(turn.placeholder_index, &message);
        }
        Some(turn)
    }

    /// Show `text` as the turn's response so far. Returns false when the
    /// turn is stale and the text was dropped.
    pub(crate) fn write_response(&self, turn: &PendingTurn, text: &str) -> bool {
        let updated = {
            let mut state = self.lock();
            state
                .write_response(turn, text)
                .and_then(|index| state.log().get(index).cloned().map(|m| (index, m)))
        };
        match updated {
            Some((index, message)) => {
                self.observer.on_message_updated(index, &message);
                true
            }
            None => false,
        }
    }

    /// Finish the turn and return to Idle.
    ///
    /// `failure_text` replaces the streamed text when the turn failed. The
    /// returned outcome is [`TurnOutcome::Discarded`] when the conversation
    /// was cleared while the turn ran.
    pub(crate) fn settle(
        &self,
        turn: &PendingTurn,
        failure: Option<(&str, String)>,
    ) -> TurnOutcome {
        let (current, updated) = {
            let mut state = self.lock();
            let current = state.is_current(turn);
            let updated = state
                .settle(turn, failure.as_ref().map(|(text, _)| *text))
                .and_then(|index| state.log().get(index).cloned().map(|m| (index, m)));
            (current, updated)
        };

        if let Some((index, message)) = updated {
            self.observer.on_message_updated(index, &message);
        }

        let outcome = match (current, failure) {
            (false, _) => TurnOutcome::Discarded,
            (true, Some((_, error))) => TurnOutcome::Failed { error },
            (true, None) => TurnOutcome::Answered,
        };
        self.observer.on_turn_settled(turn.user_index, &outcome);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::observer::{ChannelObserver, SessionEvent};
    use ragchat_domain::Participant;

    #[test]
    fn test_clones_share_state() {
        let session = ConversationSession::new(ChatMode::Rag);
        let view = session.clone();

        session.append_user("hello");

        assert_eq!(view.messages(), vec![Message::user("hello")]);
        assert_eq!(view.unanswered_turn(), Some(0));
    }

    #[test]
    fn test_turn_lifecycle_notifies_observer() {
        let (observer, mut rx) = ChannelObserver::channel();
        let session = ConversationSession::new(ChatMode::Plain).with_observer(Arc::new(observer));

        session.append_user("hi");
        let turn = session.try_begin_turn().unwrap();
        assert!(session.is_generating());
        assert!(session.write_response(&turn, "Hel"));
        assert_eq!(session.settle(&turn, None), TurnOutcome::Answered);

        let events: Vec<SessionEvent> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
        assert_eq!(
            events,
            vec![
                SessionEvent::MessageAppended {
                    index: 0,
                    message: Message::user("hi"),
                },
                SessionEvent::TurnStarted {
                    user_index: 0,
                    mode: ChatMode::Plain,
                },
                SessionEvent::MessageAppended {
                    index: 1,
                    message: Message::assistant(""),
                },
                SessionEvent::MessageUpdated {
                    index: 1,
                    message: Message::assistant("Hel"),
                },
                SessionEvent::TurnSettled {
                    user_index: 0,
                    outcome: TurnOutcome::Answered,
                },
            ]
        );
        assert!(!session.is_generating());
    }

    #[test]
    fn test_failed_settle_writes_error_text() {
        let session = ConversationSession::new(ChatMode::Rag);
        session.append_user("q");
        let turn = session.try_begin_turn().unwrap();
        session.write_response(&turn, "partial");

        let outcome = session.settle(
            &turn,
            Some(("Error getting response from RAG system.", "boom".to_string())),
        );

        assert_eq!(
            outcome,
            TurnOutcome::Failed {
                error: "boom".to_string()
            }
        );
        let last = session.messages().pop().unwrap();
        assert_eq!(last.sender, Participant::Assistant);
        assert_eq!(last.text, "Error getting response from RAG system.");
    }

    #[test]
    fn test_stale_turn_is_discarded() {
        let session = ConversationSession::new(ChatMode::Plain);
        session.append_user("q");
        let turn = session.try_begin_turn().unwrap();

        session.clear();
        assert!(session.is_generating());
        assert!(!session.write_response(&turn, "late"));
        assert_eq!(session.settle(&turn, None), TurnOutcome::Discarded);

        assert!(session.is_empty());
        assert!(!session.is_generating());
    }

    #[test]
    fn test_poisoned_lock_is_recovered() {
        let session = ConversationSession::new(ChatMode::Plain);
        session.append_user("before");

        let poisoner = session.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.state.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert_eq!(session.len(), 1);
        session.append_user("after");
        assert_eq!(session.len(), 2);
    }
}
