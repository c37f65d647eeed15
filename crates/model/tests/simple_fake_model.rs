use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use shopping_guide_model::{
    ErrorKind, ModelMessage, ModelProvider, ModelProviderError, ModelReply,
    ModelRequest, TurnProposal,
};
use tokio::time::sleep;

#[derive(Debug)]
struct FakeModelProviderError(ErrorKind);

impl Display for FakeModelProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl Error for FakeModelProviderError {}

impl ModelProviderError for FakeModelProviderError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

/// Echoes the last user message back, either as raw text or as an
/// already decoded proposal.
struct FakeModelProvider {
    decoded: bool,
}

impl ModelProvider for FakeModelProvider {
    type Error = FakeModelProviderError;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelReply, Self::Error>> + Send + 'static
    {
        let last_user = req.messages.iter().rev().find_map(|msg| match msg {
            ModelMessage::User(text) => Some(text.clone()),
            _ => None,
        });
        let decoded = self.decoded;
        async move {
            sleep(Duration::from_millis(1)).await;
            let Some(text) = last_user else {
                return Err(FakeModelProviderError(ErrorKind::MalformedReply));
            };
            let query = format!("You said {text}");
            if decoded {
                Ok(ModelReply::Proposal(TurnProposal {
                    query,
                    r#type: "free-text".to_owned(),
                    choices: vec![],
                }))
            } else {
                Ok(ModelReply::Completion(query))
            }
        }
    }
}

mod tests {
    use super::*;

    #[tokio::test]
    async fn test_completion() {
        let provider = FakeModelProvider { decoded: false };
        let req = ModelRequest {
            messages: vec![
                ModelMessage::System("Be brief.".to_string()),
                ModelMessage::User("Good morning".to_string()),
            ],
            temperature: Some(0.7),
        };
        let reply = provider.send_request(&req).await.unwrap();
        assert_eq!(
            reply,
            ModelReply::Completion("You said Good morning".to_owned())
        );
    }

    #[tokio::test]
    async fn test_proposal() {
        let provider = FakeModelProvider { decoded: true };
        let req = ModelRequest {
            messages: vec![ModelMessage::User("Hi".to_string())],
            temperature: None,
        };
        let ModelReply::Proposal(proposal) =
            provider.send_request(&req).await.unwrap()
        else {
            unreachable!("expected a decoded proposal");
        };
        assert_eq!(proposal.query, "You said Hi");
        assert_eq!(proposal.r#type, "free-text");
    }

    #[tokio::test]
    async fn test_error() {
        let provider = FakeModelProvider { decoded: false };
        let req = ModelRequest {
            messages: vec![],
            temperature: None,
        };
        let result = provider.send_request(&req).await;
        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedReply);
    }
}
