//! Conversation history owned by the agent loop

use crate::message::{Role, Turn};

/// Ordered turns, always starting with exactly one system turn.
///
/// Turns are only ever appended; [`Conversation::reset`] drops everything
/// after the system turn.
#[derive(Debug, Clone)]
pub struct Conversation {
    id: String,
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            turns: vec![Turn::system(system_prompt)],
        }
    }

    /// Identifier for log correlation; changes on reset
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Never true: the system turn is always present
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn system_prompt(&self) -> &str {
        &self.turns[0].text
    }

    pub(crate) fn push(&mut self, turn: Turn) {
        debug_assert!(turn.role != Role::System, "system turn appended mid-conversation");
        self.turns.push(turn);
    }

    pub(crate) fn reset(&mut self) {
        self.turns.truncate(1);
        self.id = uuid::Uuid::new_v4().to_string();
    }
}
