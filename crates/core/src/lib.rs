//! Core logic of a guided dialogue: the transcript, the round protocol,
//! and how model replies turn into the next question.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod engine;
mod error;
mod model_client;
mod reply;
pub mod selection;
pub mod transcript;

pub use engine::{
    DEFAULT_SYSTEM_PROMPT, DEFAULT_TEMPERATURE, DialogueEngine,
    DialogueEngineBuilder, compose_user_message,
};
pub use error::RoundError;
pub use reply::{
    InputType, Interpretation, NextTurn, Validation, interpret_completion,
    interpret_proposal, interpret_reply,
};
pub use selection::PendingSelection;
pub use transcript::{Role, Transcript, Turn};
