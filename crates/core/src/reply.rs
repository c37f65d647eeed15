//! Turning a model reply into the next question.
//!
//! A raw completion is first decoded against the JSON contract. Text that
//! doesn't decode is not an error: it becomes a free-text question on its
//! own, so the conversation never stalls because the model ignored the
//! format.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use shopping_guide_model::{ModelReply, TurnProposal};

/// How the user is expected to answer a question.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InputType {
    /// Pick exactly one of the choices.
    Single,
    /// Pick any number of the choices.
    Multiple,
    /// Type an answer.
    FreeText,
    /// A value the model made up. It's kept as-is so the presentation
    /// layer can decide what to do with it (usually render no input).
    Other(String),
}

impl InputType {
    /// Returns the wire name of this input type.
    #[inline]
    pub fn as_str(&self) -> &str {
        match self {
            InputType::Single => "single",
            InputType::Multiple => "multiple",
            InputType::FreeText => "free-text",
            InputType::Other(other) => other,
        }
    }

    /// Returns `true` if the answer is picked from a list of choices.
    #[inline]
    pub fn is_choice(&self) -> bool {
        matches!(self, InputType::Single | InputType::Multiple)
    }
}

impl From<String> for InputType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "single" => InputType::Single,
            "multiple" => InputType::Multiple,
            "free-text" => InputType::FreeText,
            _ => InputType::Other(value),
        }
    }
}

impl From<InputType> for String {
    #[inline]
    fn from(value: InputType) -> Self {
        match value {
            InputType::Other(other) => other,
            known => known.as_str().to_owned(),
        }
    }
}

impl Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The structured outcome of one round.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NextTurn {
    /// The question to present.
    pub query: String,
    /// How the question should be answered.
    #[serde(rename = "type")]
    pub input_type: InputType,
    /// Labels to pick from, in display order. Empty for free text.
    pub choices: Vec<String>,
}

impl NextTurn {
    /// Creates a free-text question.
    #[inline]
    pub fn free_text<S: Into<String>>(query: S) -> Self {
        Self {
            query: query.into(),
            input_type: InputType::FreeText,
            choices: vec![],
        }
    }
}

/// How much a decoded reply is trusted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Validation {
    /// Whatever decodes is passed through untouched, including unknown
    /// input types and choice questions without choices.
    #[default]
    Lenient,
    /// A decoded reply with an unknown input type, or a choice question
    /// without choices, is handled like text that didn't decode at all.
    /// Choices sent along with a free-text question are dropped.
    Strict,
}

/// The result of interpreting one reply.
///
/// Both variants are valid outcomes, `Fallback` only records that the
/// reply didn't follow the contract.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Interpretation {
    /// The reply followed the contract.
    Parsed(NextTurn),
    /// The reply was used as a plain free-text question.
    Fallback(NextTurn),
}

impl Interpretation {
    /// Returns the interpreted turn.
    #[inline]
    pub fn next_turn(&self) -> &NextTurn {
        match self {
            Interpretation::Parsed(turn) | Interpretation::Fallback(turn) => {
                turn
            }
        }
    }

    /// Converts into the interpreted turn.
    #[inline]
    pub fn into_next_turn(self) -> NextTurn {
        match self {
            Interpretation::Parsed(turn) | Interpretation::Fallback(turn) => {
                turn
            }
        }
    }

    /// Returns `true` if the reply didn't follow the contract.
    #[inline]
    pub fn is_fallback(&self) -> bool {
        matches!(self, Interpretation::Fallback(_))
    }
}

/// Interprets a reply in either transport shape.
#[inline]
pub fn interpret_reply(
    reply: ModelReply,
    validation: Validation,
) -> Interpretation {
    match reply {
        ModelReply::Completion(text) => interpret_completion(&text, validation),
        ModelReply::Proposal(proposal) => {
            interpret_proposal(proposal, validation)
        }
    }
}

/// Interprets the raw text of a model reply.
pub fn interpret_completion(
    text: &str,
    validation: Validation,
) -> Interpretation {
    let proposal = match serde_json::from_str::<TurnProposal>(text) {
        Ok(proposal) => proposal,
        Err(err) => {
            warn!("reply is not a contract object ({err}), using it as text");
            return Interpretation::Fallback(NextTurn::free_text(text.trim()));
        }
    };
    match accept(proposal, validation) {
        Ok(turn) => Interpretation::Parsed(turn),
        Err(_) => {
            warn!("reply failed strict validation, using it as text");
            Interpretation::Fallback(NextTurn::free_text(text.trim()))
        }
    }
}

/// Interprets a proposal that was already decoded by the backend.
///
/// With strict validation, a rejected proposal falls back to its `query`
/// as a free-text question, since there is no raw text to fall back to.
pub fn interpret_proposal(
    proposal: TurnProposal,
    validation: Validation,
) -> Interpretation {
    match accept(proposal, validation) {
        Ok(turn) => Interpretation::Parsed(turn),
        Err(query) => {
            warn!("proposal failed strict validation, using its query");
            Interpretation::Fallback(NextTurn::free_text(query.trim()))
        }
    }
}

/// Builds a turn from a proposal, or hands back its query if the proposal
/// is rejected.
fn accept(
    proposal: TurnProposal,
    validation: Validation,
) -> Result<NextTurn, String> {
    let TurnProposal {
        query,
        r#type,
        mut choices,
    } = proposal;
    let input_type = InputType::from(r#type);

    if validation == Validation::Strict {
        match &input_type {
            InputType::Other(_) => return Err(query),
            InputType::Single | InputType::Multiple if choices.is_empty() => {
                return Err(query);
            }
            InputType::FreeText => choices.clear(),
            _ => {}
        }
    }

    Ok(NextTurn {
        query,
        input_type,
        choices,
    })
}
