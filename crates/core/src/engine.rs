mod builder;

use shopping_guide_model::{ModelMessage, ModelRequest};

pub use builder::DialogueEngineBuilder;

use crate::error::RoundError;
use crate::model_client::ModelClient;
use crate::reply::{NextTurn, Validation, interpret_reply};
use crate::transcript::{Transcript, Turn};

/// The behavioral contract sent as the first message of every request.
pub const DEFAULT_SYSTEM_PROMPT: &str = include_str!("system_prompt.md");

/// Sampling temperature used unless configured otherwise.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Drives a guided conversation, one round at a time.
///
/// The engine owns the transcript and the latest [`NextTurn`]. A round
/// sends the contract, the whole transcript and the new user message to
/// the backend, interprets the reply, and only then records the exchange.
/// A failed round leaves the transcript untouched.
///
/// `submit_utterance` borrows the engine mutably, so there can never be
/// two rounds in flight for the same conversation.
pub struct DialogueEngine {
    model_client: ModelClient,
    system_prompt: String,
    temperature: Option<f32>,
    validation: Validation,
    transcript: Transcript,
    last_turn: Option<NextTurn>,
}

impl DialogueEngine {
    fn from_builder(builder: DialogueEngineBuilder) -> Self {
        let DialogueEngineBuilder {
            model_client,
            system_prompt,
            temperature,
            validation,
        } = builder;

        Self {
            model_client,
            system_prompt,
            temperature,
            validation,
            transcript: Default::default(),
            last_turn: None,
        }
    }

    /// Runs one round and returns the next question.
    ///
    /// `prior_question` is the question being answered, `None` for the
    /// first round. `user_input` is the initial request on the first round
    /// and the subject of the answer afterwards. `user_selection` is the
    /// answer itself, `None` on the first round.
    ///
    /// # Cancel safety
    ///
    /// This method is cancel safe. The transcript is only updated after the
    /// reply has been received, so dropping the future leaves it untouched.
    pub async fn submit_utterance(
        &mut self,
        prior_question: Option<&str>,
        user_input: &str,
        user_selection: Option<&str>,
    ) -> Result<NextTurn, RoundError> {
        let message = compose_user_message(user_input, user_selection);
        debug!(
            round = self.rounds() + 1,
            prior_question = ?prior_question,
            "submitting {message:?}"
        );

        let request = self.build_model_request(&message);
        let reply = match self.model_client.send_request(request).await {
            Ok(reply) => reply,
            Err(err) => {
                debug!("round failed, transcript left unchanged");
                return Err(RoundError::new(err));
            }
        };

        let next_turn =
            interpret_reply(reply, self.validation).into_next_turn();

        // The assistant side is recorded as the question text, never the
        // JSON envelope it came in.
        self.transcript.append(Turn::user(message));
        self.transcript
            .append(Turn::assistant(next_turn.query.clone()));
        self.last_turn = Some(next_turn.clone());

        Ok(next_turn)
    }

    /// Returns the conversation so far.
    #[inline]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Returns the question produced by the latest successful round.
    #[inline]
    pub fn last_turn(&self) -> Option<&NextTurn> {
        self.last_turn.as_ref()
    }

    /// Returns the number of completed rounds.
    #[inline]
    pub fn rounds(&self) -> usize {
        self.transcript.len() / 2
    }

    fn build_model_request(&self, message: &str) -> ModelRequest {
        let mut messages = Vec::with_capacity(self.transcript.len() + 2);
        messages.push(ModelMessage::System(self.system_prompt.clone()));
        messages.extend(self.transcript.iter().map(ModelMessage::from));
        messages.push(ModelMessage::User(message.to_owned()));
        ModelRequest {
            messages,
            temperature: self.temperature,
        }
    }
}

/// Composes the outbound user message.
///
/// With a selection the message reads `"<user_input>: <user_selection>"`,
/// otherwise it's `user_input` verbatim.
#[inline]
pub fn compose_user_message(
    user_input: &str,
    user_selection: Option<&str>,
) -> String {
    match user_selection {
        Some(selection) => format!("{user_input}: {selection}"),
        None => user_input.to_owned(),
    }
}
