use serde::{Deserialize, Serialize};
use shopping_guide_model::{ModelReply, TurnProposal};

/// The reply carried by a preset response.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PresetReply {
    /// Raw model text, as a chat-completion endpoint would return it.
    #[serde(rename = "completion")]
    Completion(String),
    /// An already decoded proposal, as a proxy would return it.
    #[serde(rename = "proposal")]
    Proposal(TurnProposal),
}

impl From<PresetReply> for ModelReply {
    #[inline]
    fn from(value: PresetReply) -> Self {
        match value {
            PresetReply::Completion(text) => ModelReply::Completion(text),
            PresetReply::Proposal(proposal) => ModelReply::Proposal(proposal),
        }
    }
}

/// The preset response for an assistant step.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetResponse {
    /// The reply to return, once the request succeeds.
    pub reply: PresetReply,
    /// If set, the request will fail in the first `failure` attempts.
    /// `Some(0)` means the request will fail infinitely.
    pub failures: Option<u64>,
}

impl PresetResponse {
    /// Creates a `PresetResponse` answering with raw completion text.
    #[inline]
    pub fn completion<S: Into<String>>(text: S) -> Self {
        Self {
            reply: PresetReply::Completion(text.into()),
            failures: None,
        }
    }

    /// Creates a `PresetResponse` answering with a decoded proposal.
    #[inline]
    pub fn proposal(proposal: TurnProposal) -> Self {
        Self {
            reply: PresetReply::Proposal(proposal),
            failures: None,
        }
    }

    /// Sets failure times before a successful response. `0` means the
    /// response will always be a failure.
    #[inline]
    pub fn with_failures(mut self, failures: u64) -> Self {
        self.failures = Some(failures);
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_serialize_deserialize() {
        let response = PresetResponse::proposal(TurnProposal {
            query: "Which color?".to_owned(),
            r#type: "multiple".to_owned(),
            choices: vec!["Red".to_owned(), "Blue".to_owned()],
        })
        .with_failures(1);

        let serialized = serde_json::to_value(&response).unwrap();
        assert_eq!(
            serialized,
            json!({
                "reply": {
                    "type": "proposal",
                    "data": {
                        "query": "Which color?",
                        "type": "multiple",
                        "choices": ["Red", "Blue"]
                    }
                },
                "failures": 1
            })
        );
        let deserialized: PresetResponse =
            serde_json::from_value(serialized).unwrap();

        assert_eq!(response, deserialized);
    }
}
