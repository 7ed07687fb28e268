//! The ordered conversation log

use super::message::Message;

/// Ordered, append-only sequence of messages (Entity)
///
/// Insertion order is conversational order. Entries are only removed by
/// [`clear`](Self::clear). The in-progress Assistant entry is mutated in
/// place through [`replace_last`](Self::replace_last).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message and return its index.
    pub fn append(&mut self, message: Message) -> usize {
        self.messages.push(message);
        self.messages.len() - 1
    }

    /// Apply `updater` to the most recent entry satisfying `predicate`.
    ///
    /// Returns the index of the updated entry, or `None` when no entry
    /// matched (e.g. the log was cleared).
    pub fn replace_last<P, U>(&mut self, predicate: P, updater: U) -> Option<usize>
    where
        P: Fn(&Message) -> bool,
        U: FnOnce(&mut Message),
    {
        let index = self.messages.iter().rposition(predicate)?;
        updater(&mut self.messages[index]);
        Some(index)
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Index of the most recent User-authored entry.
    pub fn last_user_index(&self) -> Option<usize> {
        self.messages.iter().rposition(Message::is_user)
    }

    pub fn get(&self, index: usize) -> Option<&Message> {
        self.messages.get(index)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
