use shopping_guide_model::ModelProvider;

use super::{DEFAULT_SYSTEM_PROMPT, DEFAULT_TEMPERATURE, DialogueEngine};
use crate::model_client::ModelClient;
use crate::reply::Validation;

/// [`DialogueEngine`] builder.
pub struct DialogueEngineBuilder {
    pub(crate) model_client: ModelClient,
    pub(crate) system_prompt: String,
    pub(crate) temperature: Option<f32>,
    pub(crate) validation: Validation,
}

impl DialogueEngineBuilder {
    /// Creates a new builder with the specified model provider.
    #[inline]
    pub fn with_model_provider<P: ModelProvider + 'static>(
        provider: P,
    ) -> Self {
        Self {
            model_client: ModelClient::new(provider),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_owned(),
            temperature: Some(DEFAULT_TEMPERATURE),
            validation: Validation::default(),
        }
    }

    /// Replaces the behavioral contract sent as the system message.
    #[inline]
    pub fn with_system_prompt<S: Into<String>>(mut self, prompt: S) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Sets the sampling temperature. `None` leaves it to the backend.
    #[inline]
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets how much decoded replies are trusted.
    #[inline]
    pub fn with_validation(mut self, validation: Validation) -> Self {
        self.validation = validation;
        self
    }

    /// Builds the engine with an empty transcript.
    #[inline]
    pub fn build(self) -> DialogueEngine {
        DialogueEngine::from_builder(self)
    }
}
