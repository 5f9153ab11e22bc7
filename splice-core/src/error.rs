//! Error types for include composition.
//!
//! Every failure is fatal: the first error anywhere in the include graph
//! aborts the whole composition and surfaces with the offending reference.

use std::io;

use crate::resolver::ResolveError;

/// Composition failure.
#[derive(Debug, thiserror::Error)]
pub enum SpliceError {
    /// The resolver could not map the reference to a resource.
    #[error("Cannot open include [{reference}]")]
    ReferenceResolution {
        reference: String,
        #[source]
        source: ResolveError,
    },

    /// The resolver found no resource for the reference.
    #[error("Cannot find include [{reference}]")]
    ResourceNotFound { reference: String },

    /// A resolved resource could not be read.
    #[error("Cannot parse include [{reference}]")]
    Io {
        reference: String,
        #[source]
        source: io::Error,
    },

    /// A resource is not a well-formed document.
    #[error("Malformed include [{reference}] ({system_id} at byte {position}): {message}")]
    Malformed {
        reference: String,
        system_id: String,
        position: u64,
        message: String,
    },

    #[error("Include [{reference}] exceeds maximum include depth {max_depth}")]
    IncludeDepthExceeded { reference: String, max_depth: usize },

    #[error("Include [{reference}] forms a cycle: {system_id} is already being included")]
    IncludeCycle { reference: String, system_id: String },

    /// The downstream consumer rejected an event.
    #[error("Event handler failed: {0}")]
    Handler(String),
}

impl SpliceError {
    /// The reference this error is attributed to, if any.
    pub fn reference(&self) -> Option<&str> {
        match self {
            Self::ReferenceResolution { reference, .. }
            | Self::ResourceNotFound { reference }
            | Self::Io { reference, .. }
            | Self::Malformed { reference, .. }
            | Self::IncludeDepthExceeded { reference, .. }
            | Self::IncludeCycle { reference, .. } => Some(reference),
            Self::Handler(_) => None,
        }
    }
}

/// Failure reported by an [`EventSource`](crate::source::EventSource).
///
/// Sources know the resource they read but not the reference that named it;
/// [`SourceError::attribute`] attaches the reference. Errors raised by the
/// handler the source was feeding travel back unchanged as `Handler`.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("read failed: {0}")]
    Io(#[from] io::Error),

    #[error("malformed document {system_id} at byte {position}: {message}")]
    Malformed {
        system_id: String,
        position: u64,
        message: String,
    },

    #[error(transparent)]
    Handler(SpliceError),
}

impl SourceError {
    /// Convert into a [`SpliceError`] attributed to `reference`.
    ///
    /// Handler errors already carry the reference of the level that raised
    /// them and pass through untouched.
    pub fn attribute(self, reference: &str) -> SpliceError {
        match self {
            SourceError::Io(source) => SpliceError::Io {
                reference: reference.to_owned(),
                source,
            },
            SourceError::Malformed {
                system_id,
                position,
                message,
            } => SpliceError::Malformed {
                reference: reference.to_owned(),
                system_id,
                position,
                message,
            },
            SourceError::Handler(inner) => inner,
        }
    }
}
