//! Resolution and registry error handling.

use crate::codec::Mode;
use std::{
    error::Error,
    fmt::{self, Display},
};

pub use crate::codec::{CodecError, CodecResult};

/// Error returned when a [`Resolver`] cannot produce a codec for a request.
///
/// Every variant is logged through `tracing` before it is returned, so callers
/// only need to decide whether the failure is fatal.
///
/// [`Resolver`]: crate::Resolver
#[derive(Debug)]
#[non_exhaustive]
pub enum OpenError {
    /// An explicitly requested (or defaulted) type name is not registered.
    UnknownType(String),
    /// The selected format cannot be opened in the requested direction.
    ///
    /// This is never followed by a fallback attempt.
    UnsupportedMode {
        /// Canonical type name of the selected format.
        type_name: String,
        /// Direction which was requested.
        mode: Mode,
    },
    /// No type was given, the extension matched nothing, and every fallback
    /// format was absent, lacked the requested direction, or failed to open.
    NoCodecAvailable {
        /// Path which was being opened.
        path: String,
        /// Direction which was requested.
        mode: Mode,
    },
    /// The selected backend failed to open the stream.
    Backend {
        /// Canonical type name of the selected format.
        type_name: String,
        /// Path which was being opened.
        path: String,
        /// The backend's own error.
        source: CodecError,
    },
}

impl OpenError {
    /// Canonical type name of the format which was selected, if resolution got that far.
    #[must_use]
    pub fn type_name(&self) -> Option<&str> {
        match self {
            OpenError::UnknownType(_) | OpenError::NoCodecAvailable { .. } => None,
            OpenError::UnsupportedMode { type_name, .. } | OpenError::Backend { type_name, .. } =>
                Some(type_name),
        }
    }
}

impl Display for OpenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpenError::UnknownType(t) => write!(f, "error: bad type: {t}"),
            OpenError::UnsupportedMode { type_name, mode } =>
                write!(f, "{type_name}: error: mode '{mode}' not supported"),
            OpenError::NoCodecAvailable { path, mode } =>
                write!(f, "error: no codec available for {path:?} (mode '{mode}')"),
            OpenError::Backend {
                type_name,
                path,
                source,
            } => write!(f, "{type_name}: error: failed to open {path:?}: {source}"),
        }
    }
}

impl Error for OpenError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            OpenError::Backend { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type for codec resolution.
pub type OpenResult<T> = Result<T, OpenError>;

/// Error returned when adding a malformed format to a [`Registry`].
///
/// [`Registry`]: crate::registry::Registry
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum RegistryError {
    /// A format with this type name is already registered.
    DuplicateType(String),
    /// Type names must be non-empty.
    EmptyTypeName,
    /// An extension alias was not of the form `.ext`.
    BadAlias {
        /// Type name of the offending format.
        type_name: String,
        /// The offending alias.
        alias: String,
    },
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to register format: ")?;
        match self {
            RegistryError::DuplicateType(t) => write!(f, "type {t:?} is already registered"),
            RegistryError::EmptyTypeName => write!(f, "type name is empty"),
            RegistryError::BadAlias { type_name, alias } =>
                write!(f, "{type_name}: alias {alias:?} must look like \".ext\""),
        }
    }
}

impl Error for RegistryError {}
