//! Error type for metadata retrieval, parsing and refresh.

use thiserror::Error;

/// Everything that can end a single fetch/parse/refresh attempt.
///
/// None of these are retried internally. A refresh that returns one of them
/// leaves the caller's descriptor untouched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MetadataError {
    /// Connection-level failure, no HTTP response was received.
    #[error("network error while fetching {url}: {message}")]
    Network { url: String, message: String },

    /// The endpoint answered with a non-2xx status.
    #[error("failed to fetch metadata from {url}: {status} {status_text}")]
    FetchFailed {
        status: u16,
        status_text: String,
        url: String,
    },

    /// 2xx response whose body is not an EDMX document (e.g. an HTML error page).
    #[error("invalid metadata response from {url}")]
    InvalidMetadataDocument { url: String },

    /// The body is not well-formed XML.
    #[error("malformed metadata document: {message}")]
    MalformedDocument { message: String },

    /// Well-formed XML without an Edmx/DataServices container.
    #[error("unsupported metadata document shape: {message}")]
    UnsupportedShape { message: String },

    /// Connection coordinates do not form an absolute http(s) URL.
    #[error("invalid metadata url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl MetadataError {
    /// HTTP status carried by `FetchFailed`
    pub fn status(&self) -> Option<u16> {
        match self {
            MetadataError::FetchFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Stable tag used in structured log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            MetadataError::Network { .. } => "network_error",
            MetadataError::FetchFailed { .. } => "fetch_failed",
            MetadataError::InvalidMetadataDocument { .. } => "invalid_metadata_document",
            MetadataError::MalformedDocument { .. } => "malformed_document",
            MetadataError::UnsupportedShape { .. } => "unsupported_shape",
            MetadataError::InvalidUrl { .. } => "invalid_url",
        }
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        MetadataError::MalformedDocument {
            message: message.into(),
        }
    }

    pub(crate) fn unsupported(message: impl Into<String>) -> Self {
        MetadataError::UnsupportedShape {
            message: message.into(),
        }
    }
}
