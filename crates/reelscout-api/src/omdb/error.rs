//! Typed failures of the OMDb client.
//!
//! Client methods return `anyhow::Result`; callers that need to tell the
//! cases apart use `err.downcast_ref::<OmdbError>()`.

use thiserror::Error;

/// Errors surfaced by the OMDb client.
#[derive(Debug, Error, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub enum OmdbError {
    /// The service was unreachable or answered with a non-2xx status.
    #[error("OMDb request failed: {reason}")]
    NetworkFailure {
        /// Transport error or HTTP status with body.
        reason: String,
    },

    /// The request was valid but no record matches the IMDb ID.
    #[error("no OMDb record for {id}")]
    NotFound {
        /// The IMDb ID that was looked up.
        id: String,
    },

    /// OMDb answered `Response: "False"` with an unexpected message.
    #[error("OMDb API error: {message}")]
    Api {
        /// The `Error` field of the response.
        message: String,
    },

    /// The body could not be decoded as the expected JSON.
    #[error("failed to decode OMDb response: {reason}")]
    Decode {
        /// Decoder message.
        reason: String,
    },
}

impl OmdbError {
    /// Whether the error means "no such record".
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Finds an `OmdbError` anywhere in an `anyhow` chain.
    #[must_use]
    pub fn find(err: &anyhow::Error) -> Option<&Self> {
        err.chain().find_map(|cause| cause.downcast_ref::<Self>())
    }
}
