//! Ordered message history fed back to the model each turn.

use crate::types::ChatMessage;

/// Append-only history rooted at a seed message. The only way to shrink it is
/// [`ConversationState::reset_to_seed`].
#[derive(Debug, Clone)]
pub struct ConversationState {
    messages: Vec<ChatMessage>,
}

impl ConversationState {
    pub fn new(seed: ChatMessage) -> Self {
        Self {
            messages: vec![seed],
        }
    }

    /// Seed with a plain user message.
    pub fn seeded(prompt: &str) -> Self {
        Self::new(ChatMessage::user(prompt))
    }

    pub fn append(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Drop everything after the seed message.
    pub fn reset_to_seed(&mut self) {
        self.messages.truncate(1);
    }

    pub fn snapshot(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn seed(&self) -> &ChatMessage {
        &self.messages[0]
    }

    pub fn last(&self) -> &ChatMessage {
        &self.messages[self.messages.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always false: the seed message is never removed.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
