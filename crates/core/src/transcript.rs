//! Transcript-related types.

use serde::{Deserialize, Serialize};
use shopping_guide_model::ModelMessage;

/// Who produced a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The behavioral contract given to the model.
    System,
    /// The person being guided.
    User,
    /// The model.
    Assistant,
}

/// One role-tagged entry in the transcript.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Turn {
    /// Who produced this turn.
    pub role: Role,
    /// The text of this turn.
    pub content: String,
}

impl Turn {
    /// Creates a user turn.
    #[inline]
    pub fn user<S: Into<String>>(content: S) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates an assistant turn.
    #[inline]
    pub fn assistant<S: Into<String>>(content: S) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

impl From<&Turn> for ModelMessage {
    #[inline]
    fn from(turn: &Turn) -> Self {
        let content = turn.content.clone();
        match turn.role {
            Role::System => ModelMessage::System(content),
            Role::User => ModelMessage::User(content),
            Role::Assistant => ModelMessage::Assistant(content),
        }
    }
}

/// The ordered, append-only history of a conversation.
///
/// The system contract is not stored here, it's prepended whenever a
/// request is built. Only the dialogue engine appends to a transcript,
/// everyone else gets a read-only view.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// Adds one turn at the end.
    #[inline]
    pub(crate) fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Returns the turns in chronological order.
    #[inline]
    pub fn snapshot(&self) -> &[Turn] {
        &self.turns
    }

    /// Returns the number of turns.
    #[inline]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Returns `true` if nothing has been exchanged yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Iterates over the turns in chronological order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Turn> {
        self.turns.iter()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Turn;
    type IntoIter = std::slice::Iter<'a, Turn>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
