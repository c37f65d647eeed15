//! The answer being put together for the current question.

use crate::reply::{InputType, NextTurn};

/// Accumulates the user's answer to one question.
///
/// A pending selection belongs to exactly one [`NextTurn`]. It is never
/// carried to the next question: create a fresh one with
/// [`PendingSelection::for_turn`] or call [`PendingSelection::reset`]
/// whenever a new turn arrives.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PendingSelection {
    input_type: Option<InputType>,
    choices: Vec<String>,
    // Positions in `choices`, since labels may repeat.
    selected: Vec<usize>,
    text: String,
}

impl PendingSelection {
    /// Creates an empty selection for answering `turn`.
    pub fn for_turn(turn: &NextTurn) -> Self {
        Self {
            input_type: Some(turn.input_type.clone()),
            choices: turn.choices.clone(),
            selected: vec![],
            text: String::new(),
        }
    }

    /// Selects a label, returning whether anything changed.
    ///
    /// A label listed more than once refers to its first occurrence. See
    /// [`Self::select_index`].
    pub fn select(&mut self, label: &str) -> bool {
        match self.choices.iter().position(|c| c == label) {
            Some(index) => self.select_index(index),
            None => false,
        }
    }

    /// Selects the choice at `index` (0-based), returning whether anything
    /// changed.
    ///
    /// A single-choice question keeps only the latest choice, a
    /// multiple-choice question toggles it. Indices out of range, and
    /// questions that aren't choice questions, are ignored.
    pub fn select_index(&mut self, index: usize) -> bool {
        if index >= self.choices.len() {
            return false;
        }
        match self.input_type {
            Some(InputType::Single) => {
                if self.selected == [index] {
                    return false;
                }
                self.selected = vec![index];
            }
            Some(InputType::Multiple) => {
                let pos = self.selected.iter().position(|&i| i == index);
                if let Some(pos) = pos {
                    self.selected.remove(pos);
                } else {
                    self.selected.push(index);
                }
            }
            _ => return false,
        }
        true
    }

    /// Returns `true` if any choice labeled `label` is currently selected.
    #[inline]
    pub fn is_selected(&self, label: &str) -> bool {
        self.selected.iter().any(|&i| self.choices[i] == label)
    }

    /// Sets the free-text answer.
    #[inline]
    pub fn set_text<S: Into<String>>(&mut self, text: S) {
        self.text = text.into();
    }

    /// Returns the answer as it should be submitted.
    ///
    /// For free text it's the typed text. Otherwise it's the selected
    /// labels joined with `", "`, in the order the choices are listed.
    pub fn answer(&self) -> String {
        if self.input_type == Some(InputType::FreeText) {
            return self.text.clone();
        }
        self.choices
            .iter()
            .enumerate()
            .filter(|(idx, _)| self.selected.contains(idx))
            .map(|(_, choice)| choice.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Returns `true` if nothing has been selected or typed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty() && self.text.is_empty()
    }

    /// Clears everything selected or typed so far.
    #[inline]
    pub fn reset(&mut self) {
        self.selected.clear();
        self.text.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(input_type: InputType, choices: &[&str]) -> NextTurn {
        NextTurn {
            query: "Pick".to_owned(),
            input_type,
            choices: choices.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn test_single_replaces() {
        let mut selection =
            PendingSelection::for_turn(&turn(InputType::Single, &["8", "9"]));
        assert!(selection.select("8"));
        assert!(selection.select("9"));
        assert!(!selection.select("9"));
        assert!(!selection.select("12"));
        assert_eq!(selection.answer(), "9");
    }

    #[test]
    fn test_multiple_follows_choice_order() {
        let mut selection = PendingSelection::for_turn(&turn(
            InputType::Multiple,
            &["Red", "Green", "Large"],
        ));
        selection.select("Large");
        selection.select("Green");
        selection.select("Red");
        selection.select("Green");
        assert_eq!(selection.answer(), "Red, Large");
        assert!(selection.select_index(1));
        assert_eq!(selection.answer(), "Red, Green, Large");
        assert!(!selection.select_index(3));
    }

    #[test]
    fn test_repeated_labels() {
        let mut selection = PendingSelection::for_turn(&turn(
            InputType::Single,
            &["8", "8", "9"],
        ));
        assert!(selection.select_index(0));
        assert_eq!(selection.answer(), "8");
        assert!(selection.select_index(1));
        assert_eq!(selection.answer(), "8");
        assert!(selection.select("8"));
        assert_eq!(selection.answer(), "8");

        let mut selection = PendingSelection::for_turn(&turn(
            InputType::Multiple,
            &["Red", "Red", "Blue"],
        ));
        assert!(selection.select_index(0));
        assert!(selection.select_index(1));
        assert_eq!(selection.answer(), "Red, Red");
        assert!(selection.select_index(0));
        assert!(selection.is_selected("Red"));
        assert_eq!(selection.answer(), "Red");
    }

    #[test]
    fn test_free_text() {
        let mut selection =
            PendingSelection::for_turn(&NextTurn::free_text("Budget?"));
        assert!(selection.is_empty());
        assert!(!selection.select("anything"));
        selection.set_text("under $100");
        assert_eq!(selection.answer(), "under $100");
    }

    #[test]
    fn test_unknown_type_renders_nothing() {
        let mut selection = PendingSelection::for_turn(&turn(
            InputType::Other("slider".to_owned()),
            &["a"],
        ));
        assert!(!selection.select("a"));
        assert_eq!(selection.answer(), "");
    }

    #[test]
    fn test_reset() {
        let mut selection =
            PendingSelection::for_turn(&turn(InputType::Multiple, &["a", "b"]));
        selection.select("a");
        selection.set_text("stray");
        assert!(!selection.is_empty());
        selection.reset();
        assert!(selection.is_empty());
        assert_eq!(selection.answer(), "");
    }
}
