//! Error types for the FormSite client.
//!
//! # Design
//! Failures fall into two families. Transport failures (`Transport`,
//! `HttpError`) mean no usable response came back. Malformed responses mean
//! a success response arrived but its body could not be parsed or lacked a
//! field the mapper needs. An empty result set is not an error and never
//! appears here.

use thiserror::Error;

/// Errors returned by the FormSite client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// A success response whose body is unparsable or missing a field.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// A required configuration value was not found in the environment.
    #[error("missing credential: {0} is not set")]
    MissingCredential(&'static str),
}

impl ApiError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        ApiError::MalformedResponse(msg.into())
    }

    /// Returns `true` when the network call did not report success.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::HttpError { .. })
    }

    /// Returns `true` when a success response could not be mapped.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedResponse(_))
    }
}

/// Convenience alias for client results.
pub type Result<T> = std::result::Result<T, ApiError>;
