//! A model provider for OpenAI-compatible chat completion APIs.
//!
//! The provider hands the model's raw message text back to the caller as
//! [`ModelReply::Completion`], decoding the answer is not its business.

#[macro_use]
extern crate tracing;

mod config;
mod io;
mod proto;
mod stream;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use mime::Mime;
use reqwest::{Client, Response, header};
use shopping_guide_model::{
    ErrorKind, ModelProvider, ModelProviderError, ModelReply, ModelRequest,
};

pub use config::{OpenAIConfig, OpenAIConfigBuilder};
use io::{Chunks, Sse};
use proto::ChatCompletion;

/// Error type for [`OpenAIProvider`].
#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    fn from_reqwest(err: reqwest::Error) -> Self {
        let kind = match err.status() {
            Some(status) => ErrorKind::from_status(status.as_u16()),
            None if err.is_decode() => ErrorKind::MalformedReply,
            None => ErrorKind::Transport,
        };
        Self::new(format!("{err}"), kind)
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// OpenAI-compatible model provider.
#[derive(Clone, Debug)]
pub struct OpenAIProvider {
    client: Client,
    config: Arc<OpenAIConfig>,
}

impl OpenAIProvider {
    /// Creates a new `OpenAIProvider` with the given configuration.
    #[inline]
    pub fn new(config: OpenAIConfig) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }
}

impl ModelProvider for OpenAIProvider {
    type Error = Error;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelReply, Self::Error>> + Send + 'static
    {
        let streaming = self.config.streaming;
        let openai_req = proto::create_request(req, &self.config);
        let resp_fut = self
            .client
            .post(self.config.completions_url())
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.config.api_key),
            )
            .header(header::CONTENT_TYPE, "application/json")
            .header(
                header::ACCEPT,
                if streaming {
                    "text/event-stream"
                } else {
                    "application/json"
                },
            )
            .json(&openai_req)
            .send();

        async move {
            let resp = resp_fut
                .await
                .and_then(Response::error_for_status)
                .map_err(Error::from_reqwest)?;

            let content_type = resp
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<Mime>().ok());
            let is_event_stream = content_type
                .as_ref()
                .map(|m| m.subtype().as_str() == "event-stream")
                .unwrap_or(false);

            // Some servers ignore `stream` and answer with a plain body, so
            // the response decides how it's read.
            let content = if is_event_stream {
                let sse = Sse::new(Chunks::from_response(resp));
                stream::collect_content(sse).await?
            } else {
                if streaming {
                    debug!(
                        "expected an event stream, got {content_type:?} instead"
                    );
                }
                let completion = resp
                    .json::<ChatCompletion>()
                    .await
                    .map_err(|err| {
                        Error::new(format!("{err}"), ErrorKind::MalformedReply)
                    })?;
                completion.into_content().ok_or_else(|| {
                    Error::new(
                        "reply has no message content",
                        ErrorKind::MalformedReply,
                    )
                })?
            };

            trace!("got completion: {content}");
            Ok(ModelReply::Completion(content))
        }
    }
}
