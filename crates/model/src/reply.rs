use serde::{Deserialize, Serialize};

/// The structured object the model is instructed to answer with.
///
/// Every field falls back to its default when missing and unknown fields
/// are ignored, so a reply that drifts from the contract still decodes.
/// `type` is kept as a plain string here; deciding what an unrecognized
/// value means is up to the consumer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurnProposal {
    /// The next question to ask the user.
    #[serde(default)]
    pub query: String,
    /// The answer modality, normally `single`, `multiple` or `free-text`.
    #[serde(default)]
    pub r#type: String,
    /// Labels the user can pick from.
    #[serde(default)]
    pub choices: Vec<String>,
}

/// A reply from the model provider.
///
/// Providers speak one of two transport shapes. A raw completion endpoint
/// hands back the model's text verbatim, which still has to be decoded by
/// the caller. A proxy may have done that decoding server-side and hands
/// back the proposal directly.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ModelReply {
    /// The raw text content of the model's message.
    Completion(String),
    /// A proposal that was already decoded by the backend.
    Proposal(TurnProposal),
}
