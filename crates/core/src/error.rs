use std::error::Error;
use std::fmt::{self, Debug, Display};

use shopping_guide_model::{ErrorKind, ModelProviderError};

/// A round that didn't produce a next turn.
///
/// The transcript is left exactly as it was before the round, so the same
/// answer can be submitted again.
pub struct RoundError {
    source: Box<dyn ModelProviderError>,
}

impl RoundError {
    #[inline]
    pub(crate) fn new(source: Box<dyn ModelProviderError>) -> Self {
        Self { source }
    }

    /// Returns the kind of the underlying backend error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }
}

impl Debug for RoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoundError")
            .field("kind", &self.kind())
            .field("source", &self.source)
            .finish()
    }
}

impl Display for RoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "round failed ({}): {}", self.kind(), self.source)
    }
}

impl Error for RoundError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.source.as_ref())
    }
}
