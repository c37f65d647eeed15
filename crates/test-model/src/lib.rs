//! A local fake model for testing purpose.

mod preset;

use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use shopping_guide_model::{
    ErrorKind, ModelMessage, ModelProvider, ModelProviderError, ModelReply,
    ModelRequest,
};
use tokio::time::sleep;

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    message: &'static str,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.kind)
    }
}

impl StdError for Error {}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

#[derive(Clone)]
enum ConversationStep {
    UserInput,
    AssistantResponse(PresetResponse),
}

#[derive(Default)]
struct Recorder {
    requests: Vec<ModelRequest>,
    attempts: HashMap<usize, u64>,
}

/// A local fake model for testing purpose.
///
/// Before sending requests, you need to setup the conversation script, which
/// is how the model should respond to a request. The added steps will be
/// selected according to the non-system messages in your request. If there
/// are no enough steps in the script, an error will be returned.
///
/// Clones share the record of received requests, so a test can keep one
/// clone around and inspect what the other one has been sent.
///
/// # Note
///
/// This type is not optimized for production use, there are heavy memory
/// copies involved. You should only use it for testing.
#[derive(Clone, Default)]
pub struct TestModelProvider {
    conversation_script: Vec<ConversationStep>,
    delay: Option<Duration>,
    recorder: Arc<Mutex<Recorder>>,
}

impl TestModelProvider {
    #[inline]
    pub fn add_assistant_response_step(&mut self, preset: PresetResponse) {
        self.conversation_script
            .push(ConversationStep::AssistantResponse(preset));
    }

    #[inline]
    pub fn add_user_input_step(&mut self) {
        self.conversation_script.push(ConversationStep::UserInput);
    }

    /// Adds a user input step followed by an assistant response step.
    #[inline]
    pub fn add_round(&mut self, preset: PresetResponse) {
        self.add_user_input_step();
        self.add_assistant_response_step(preset);
    }

    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    /// Returns every request received so far, in order.
    pub fn requests(&self) -> Vec<ModelRequest> {
        self.recorder
            .lock()
            .map(|r| r.requests.clone())
            .unwrap_or_default()
    }

    fn respond(&self, req: &ModelRequest) -> Result<ModelReply, Error> {
        let mut recorder = self.recorder.lock().map_err(|_| Error {
            message: "recorder is poisoned",
            kind: ErrorKind::Other,
        })?;
        recorder.requests.push(req.clone());

        let step_idx = req
            .messages
            .iter()
            .filter(|msg| !matches!(msg, ModelMessage::System(_)))
            .count();
        let Some(step) = self.conversation_script.get(step_idx) else {
            return Err(Error {
                message: "no enough steps",
                kind: ErrorKind::RateLimitExceeded,
            });
        };
        let preset = match step {
            ConversationStep::UserInput => {
                return Err(Error {
                    message: "not an assistant response step",
                    kind: ErrorKind::MalformedReply,
                });
            }
            ConversationStep::AssistantResponse(preset) => preset,
        };

        let attempt = recorder.attempts.entry(step_idx).or_default();
        *attempt += 1;
        let should_fail = match preset.failures {
            Some(0) => true,
            Some(failures) => *attempt <= failures,
            None => false,
        };
        if should_fail {
            return Err(Error {
                message: "injected failure",
                kind: ErrorKind::Transport,
            });
        }

        Ok(preset.reply.clone().into())
    }
}

impl ModelProvider for TestModelProvider {
    type Error = crate::Error;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelReply, Self::Error>> + Send + 'static
    {
        let result = self.respond(req);
        let delay = self.delay.unwrap_or(Duration::from_millis(1));
        async move {
            sleep(delay).await;
            result
        }
    }
}

#[cfg(test)]
mod tests {
    use shopping_guide_model::TurnProposal;

    use super::*;

    fn request(messages: Vec<ModelMessage>) -> ModelRequest {
        ModelRequest {
            messages,
            temperature: Some(0.7),
        }
    }

    #[tokio::test]
    async fn test_send_request() {
        let mut provider = TestModelProvider::default();
        provider.add_round(PresetResponse::completion("Hello, world!"));
        provider.add_round(PresetResponse::proposal(TurnProposal {
            query: "Which size?".to_owned(),
            r#type: "single".to_owned(),
            choices: vec!["S".to_owned(), "M".to_owned()],
        }));

        let mut req = request(vec![
            ModelMessage::System("Be helpful.".to_owned()),
            ModelMessage::User("Hi".to_owned()),
        ]);
        let reply = provider.send_request(&req).await.unwrap();
        assert_eq!(reply, ModelReply::Completion("Hello, world!".to_owned()));

        req.messages
            .push(ModelMessage::Assistant("Hello, world!".to_owned()));
        req.messages.push(ModelMessage::User("A shirt".to_owned()));
        let reply = provider.send_request(&req).await.unwrap();
        let ModelReply::Proposal(proposal) = reply else {
            unreachable!("unexpected reply: {reply:?}");
        };
        assert_eq!(proposal.query, "Which size?");

        let requests = provider.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].messages.len(), 4);
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let mut provider = TestModelProvider::default();
        provider.add_round(PresetResponse::completion("ok").with_failures(2));

        let req = request(vec![ModelMessage::User("Hi".to_owned())]);
        for _ in 0..2 {
            let err = provider.send_request(&req).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Transport);
        }
        assert!(provider.send_request(&req).await.is_ok());
    }

    #[tokio::test]
    async fn test_script_exhausted() {
        let provider = TestModelProvider::default();
        let req = request(vec![ModelMessage::User("Hi".to_owned())]);
        let err = provider.send_request(&req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RateLimitExceeded);
    }
}
