use std::error::Error;
use std::fmt::{self, Display};

use shopping_guide_core::{
    DialogueEngine, DialogueEngineBuilder, NextTurn, PendingSelection,
    RoundError, Transcript, Validation,
};
use shopping_guide_model::ModelProvider;

/// A session builder.
///
/// See [`Session`].
pub struct SessionBuilder {
    engine_builder: DialogueEngineBuilder,
}

impl SessionBuilder {
    /// Creates a session builder with a specified model provider.
    pub fn with_model_provider<M: ModelProvider + 'static>(
        provider: M,
    ) -> Self {
        let engine_builder =
            DialogueEngineBuilder::with_model_provider(provider);
        Self { engine_builder }
    }

    /// Replaces the behavioral contract sent to the model.
    #[inline]
    pub fn with_system_prompt<S: Into<String>>(mut self, prompt: S) -> Self {
        self.engine_builder = self.engine_builder.with_system_prompt(prompt);
        self
    }

    /// Sets the sampling temperature.
    #[inline]
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.engine_builder = self.engine_builder.with_temperature(temperature);
        self
    }

    /// Sets how much decoded replies are trusted.
    #[inline]
    pub fn with_validation(mut self, validation: Validation) -> Self {
        self.engine_builder = self.engine_builder.with_validation(validation);
        self
    }

    /// Builds a new session.
    pub fn build(self) -> Session {
        Session {
            engine: self.engine_builder.build(),
            selection: PendingSelection::default(),
        }
    }
}

/// Error returned by [`Session::submit_answer`].
#[derive(Debug)]
pub enum SessionError {
    /// There is no question to answer yet.
    NoQuestion,
    /// The round failed, the answer can be submitted again.
    Round(RoundError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::NoQuestion => write!(f, "no question to answer"),
            SessionError::Round(err) => Display::fmt(err, f),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SessionError::NoQuestion => None,
            SessionError::Round(err) => Some(err),
        }
    }
}

impl From<RoundError> for SessionError {
    #[inline]
    fn from(value: RoundError) -> Self {
        SessionError::Round(value)
    }
}

/// A guided shopping conversation, like a page that shows one question at
/// a time and a form to answer it.
///
/// The session holds a dialogue engine together with the answer being
/// filled in for the current question. The answer is cleared whenever a
/// new question arrives, and kept when a round fails.
pub struct Session {
    engine: DialogueEngine,
    selection: PendingSelection,
}

impl Session {
    /// Sends a free-form request, typically what the user is looking for.
    pub async fn submit_request(
        &mut self,
        request: &str,
    ) -> Result<NextTurn, RoundError> {
        let next_turn =
            self.engine.submit_utterance(None, request, None).await?;
        self.advance(&next_turn);
        Ok(next_turn)
    }

    /// Answers the current question with the pending selection.
    pub async fn submit_answer(&mut self) -> Result<NextTurn, SessionError> {
        let Some(current) = self.engine.last_turn() else {
            return Err(SessionError::NoQuestion);
        };
        let question = current.query.clone();
        let answer = self.selection.answer();
        let next_turn = self
            .engine
            .submit_utterance(Some(&question), &question, Some(&answer))
            .await?;
        self.advance(&next_turn);
        Ok(next_turn)
    }

    /// Returns the question currently shown.
    #[inline]
    pub fn current_turn(&self) -> Option<&NextTurn> {
        self.engine.last_turn()
    }

    /// Returns the answer being filled in.
    #[inline]
    pub fn selection(&self) -> &PendingSelection {
        &self.selection
    }

    /// Returns the answer being filled in, for editing.
    #[inline]
    pub fn selection_mut(&mut self) -> &mut PendingSelection {
        &mut self.selection
    }

    /// Returns the conversation so far.
    #[inline]
    pub fn transcript(&self) -> &Transcript {
        self.engine.transcript()
    }

    fn advance(&mut self, next_turn: &NextTurn) {
        self.selection = PendingSelection::for_turn(next_turn);
        trace!("now asking: {:?}", next_turn.query);
    }
}
