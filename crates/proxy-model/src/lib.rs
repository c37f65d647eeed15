//! A model provider for a local proxy that talks to the model on our
//! behalf and answers with an already decoded proposal.
//!
//! The proxy receives the message list as
//! `{"messages": [{"role": ..., "content": ...}], "temperature": ...}`
//! and answers with `{"query": ..., "type": ..., "choices": [...]}`.

#[macro_use]
extern crate tracing;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use mime::Mime;
use reqwest::{Client, Response, header};
use serde::Serialize;
use shopping_guide_model::{
    ErrorKind, ModelMessage, ModelProvider, ModelProviderError, ModelReply,
    ModelRequest, TurnProposal,
};

/// Error type for [`ProxyProvider`].
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

/// Builder for [`ProxyConfig`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ProxyConfigBuilder {
    endpoint: String,
}

impl ProxyConfigBuilder {
    /// Creates a builder with the URL the proxy listens on.
    #[inline]
    pub fn with_endpoint<S: Into<String>>(endpoint: S) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    /// Builds the configuration.
    #[inline]
    pub fn build(self) -> ProxyConfig {
        ProxyConfig {
            endpoint: self.endpoint,
        }
    }
}

/// Configuration for the proxy provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ProxyConfig {
    endpoint: String,
}

#[derive(Serialize)]
struct ProxyRequest<'a> {
    messages: &'a [ModelMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Proxy model provider.
#[derive(Clone, Debug)]
pub struct ProxyProvider {
    client: Client,
    config: Arc<ProxyConfig>,
}

impl ProxyProvider {
    /// Creates a new `ProxyProvider` with the given configuration.
    #[inline]
    pub fn new(config: ProxyConfig) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }
}

impl ModelProvider for ProxyProvider {
    type Error = Error;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelReply, Self::Error>> + Send + 'static
    {
        let body = ProxyRequest {
            messages: &req.messages,
            temperature: req.temperature,
        };
        let resp_fut = self
            .client
            .post(&self.config.endpoint)
            .header(header::ACCEPT, "application/json")
            .json(&body)
            .send();

        async move {
            let resp = match resp_fut.await.and_then(Response::error_for_status)
            {
                Ok(resp) => resp,
                Err(err) => {
                    let kind = err
                        .status()
                        .map(|s| ErrorKind::from_status(s.as_u16()))
                        .unwrap_or(ErrorKind::Transport);
                    return Err(Error::new(format!("{err}"), kind));
                }
            };

            let content_type = resp
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<Mime>().ok());
            if let Some(content_type) = &content_type {
                if content_type.subtype() != mime::JSON {
                    return Err(Error::new(
                        format!("Unexpected content type: {content_type}"),
                        ErrorKind::MalformedReply,
                    ));
                }
            }

            let body = resp.bytes().await.map_err(|err| {
                Error::new(format!("{err}"), ErrorKind::Transport)
            })?;
            let proposal = decode_proposal(&body)?;
            trace!("got proposal: {proposal:?}");
            Ok(ModelReply::Proposal(proposal))
        }
    }
}

fn decode_proposal(body: &[u8]) -> Result<TurnProposal, Error> {
    serde_json::from_slice(body)
        .map_err(|err| Error::new(format!("{err}"), ErrorKind::MalformedReply))
}
