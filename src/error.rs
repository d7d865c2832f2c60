//! Error types for meridian-link.
//!
//! Resolution and decoding define their own narrow error types so callers
//! can react per column or per row; everything else funnels into
//! [`MeridianLinkError`].

use thiserror::Error;

/// Errors from resolving an algebraic type descriptor against a typespace.
///
/// Fatal to the single resolution call that produced it. The schema cache
/// turns a failed table projection into skip-and-warn; the resolver itself
/// never substitutes a default for these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeResolutionError {
    /// A `Ref` descriptor pointed outside the typespace.
    #[error("type ref {index} out of bounds for typespace of {len} entries")]
    RefOutOfBounds { index: usize, len: usize },

    /// A bare string tag that is not in the closed primitive set.
    /// The wire protocol's primitive namespace is closed, so this is a
    /// protocol violation rather than odd caller data.
    #[error("unrecognized primitive type tag '{0}'")]
    UnrecognizedPrimitive(String),

    /// A row schema fragment resolved to something other than a product
    /// type.
    #[error("schema fragment does not resolve to a product type")]
    NotAProduct,
}

/// Column/value count mismatch for a positional wire row.
///
/// Column identity is purely positional, so a mismatched row cannot be
/// decoded safely in either direction. The caller decides whether to abort
/// the result set or skip the row.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("row has {actual} values but the schema describes {expected} columns")]
pub struct RowShapeError {
    /// Column count the schema describes.
    pub expected: usize,
    /// Value count the wire row actually carried.
    pub actual: usize,
}

/// Main error type for meridian-link operations.
#[derive(Error, Debug)]
pub enum MeridianLinkError {
    #[error("Type resolution error: {0}")]
    TypeResolution(#[from] TypeResolutionError),

    #[error("Row shape error: {0}")]
    RowShape(#[from] RowShapeError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Non-2xx response from the server, with whatever body it sent.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Schema discovery could not produce a descriptor (e.g. unknown table).
    #[error("Discovery error: {0}")]
    Discovery(String),
}

/// Result type alias for meridian-link operations.
pub type Result<T> = std::result::Result<T, MeridianLinkError>;
