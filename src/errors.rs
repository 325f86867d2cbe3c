//! Error types for FCPXML marker resolution
//!
//! Fatal errors abort the whole parse (unparsable XML, unknown root tag,
//! missing library/resources). Time-model shape errors are raised by the
//! constructors in [`crate::models`]. Per-clip lookup failures are not errors
//! at all at the top level: they become [`crate::models::Diagnostic`] entries.

use thiserror::Error;

/// Crate-wide error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FcpxError {
    /// XML is not well-formed
    #[error("Invalid XML: {0}")]
    InvalidXml(String),

    /// Root tag is neither FCPXML nor a recognized legacy dialect, or the
    /// dialect is recognized but has no parser
    #[error("Unsupported XML format: {0}")]
    UnsupportedFormat(String),

    /// A required structural element is missing (library, resources)
    #[error("Malformed document: missing required element '{0}'")]
    MalformedDocument(String),

    /// A clip or marker references a resource id that is not in the table
    #[error("Unresolvable reference '{reference}' on <{element}>")]
    UnresolvableReference { element: String, reference: String },

    /// start/duration/offset value of an unrecognized shape
    #[error("Invalid time value '{value}': {reason}")]
    InvalidTimeValue { value: String, reason: String },

    /// to-do marker without a completed flag, or a completed flag on any
    /// other marker kind
    #[error("Invalid marker state: {0}")]
    InvalidMarkerState(String),

    /// Reading the input file or bundle failed
    #[error("I/O error on '{path}': {message}")]
    Io { path: String, message: String },
}

impl FcpxError {
    pub(crate) fn invalid_time(value: impl Into<String>, reason: impl Into<String>) -> Self {
        FcpxError::InvalidTimeValue {
            value: value.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FcpxError>;
