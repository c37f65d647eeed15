use std::fmt::{self, Display};

/// The kind of error that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The backend could not be reached, or the connection broke while
    /// receiving the reply.
    Transport,
    /// The backend answered with a non-successful status code.
    Status(u16),
    /// The model provider is rate limited.
    RateLimitExceeded,
    /// The backend answered, but the reply carries no usable text (e.g.
    /// the message content is missing entirely).
    MalformedReply,
    /// Any other errors.
    Other,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Transport => write!(f, "Transport error"),
            ErrorKind::Status(code) => write!(f, "Unexpected status {code}"),
            ErrorKind::RateLimitExceeded => write!(f, "Rate limit exceeded"),
            ErrorKind::MalformedReply => write!(f, "Malformed reply"),
            ErrorKind::Other => write!(f, "Other error"),
        }
    }
}

impl ErrorKind {
    /// Maps an HTTP status code to an error kind.
    #[inline]
    pub fn from_status(code: u16) -> Self {
        match code {
            429 => ErrorKind::RateLimitExceeded,
            code => ErrorKind::Status(code),
        }
    }
}
