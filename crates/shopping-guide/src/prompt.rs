//! Reading answers typed in a terminal.

use std::error::Error;
use std::fmt::{self, Display};

use shopping_guide_core::{InputType, NextTurn, PendingSelection};

/// What a line typed by the user asks for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Answer the current question.
    Answer(String),
    /// Start over with a new request (`/new <request>`).
    NewRequest(String),
    /// Leave (`/quit`).
    Quit,
}

/// Parses one input line.
pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if line == "/quit" || line == "/exit" {
        return Command::Quit;
    }
    if let Some(request) = line.strip_prefix("/new ") {
        let request = request.trim();
        if !request.is_empty() {
            return Command::NewRequest(request.to_owned());
        }
    }
    Command::Answer(line.to_owned())
}

/// A typed answer that doesn't fit the question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputError {
    message: String,
}

impl Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for InputError {}

/// Parses 1-based choice numbers separated by commas or spaces into
/// 0-based indices, dropping repeats.
pub fn parse_indices(
    input: &str,
    count: usize,
) -> Result<Vec<usize>, InputError> {
    let mut indices = Vec::new();
    for token in input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        let idx = match token.parse::<usize>() {
            Ok(n) if (1..=count).contains(&n) => n - 1,
            _ => {
                return Err(InputError {
                    message: format!(
                        "`{token}` is not a choice, pick a number from 1 to {count}"
                    ),
                });
            }
        };
        if !indices.contains(&idx) {
            indices.push(idx);
        }
    }
    Ok(indices)
}

/// Fills `selection` with the answer typed for `turn`.
///
/// The typed line is the whole answer, so whatever was selected before is
/// replaced. A choice question without choices has nothing to select and
/// accepts any line.
pub fn apply_input(
    selection: &mut PendingSelection,
    turn: &NextTurn,
    input: &str,
) -> Result<(), InputError> {
    if turn.input_type.is_choice() && turn.choices.is_empty() {
        return Ok(());
    }
    match turn.input_type {
        InputType::FreeText => {
            selection.set_text(input.trim());
        }
        InputType::Single => {
            let indices = parse_indices(input, turn.choices.len())?;
            let [idx] = indices[..] else {
                return Err(InputError {
                    message: "pick exactly one choice".to_owned(),
                });
            };
            selection.reset();
            selection.select_index(idx);
        }
        InputType::Multiple => {
            let indices = parse_indices(input, turn.choices.len())?;
            selection.reset();
            for idx in indices {
                selection.select_index(idx);
            }
        }
        InputType::Other(_) => {}
    }
    Ok(())
}
