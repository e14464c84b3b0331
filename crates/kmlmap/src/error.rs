use derive_more::Display;
use kmlmap_core::{
    codec::CodecError,
    config::ConfigError,
    descriptor::DescriptorError,
    error::{ErrorClass, ErrorOrigin as CoreErrorOrigin},
    ownership::OwnershipError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

// re-exports
pub use kmlmap_core::error::MappingError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }
}

impl From<MappingError> for Error {
    fn from(err: MappingError) -> Self {
        Self::new(err.class().into(), err.origin().into(), err.to_string())
    }
}

impl From<CodecError> for Error {
    fn from(err: CodecError) -> Self {
        MappingError::from(err).into()
    }
}

impl From<DescriptorError> for Error {
    fn from(err: DescriptorError) -> Self {
        MappingError::from(err).into()
    }
}

impl From<OwnershipError> for Error {
    fn from(err: OwnershipError) -> Self {
        MappingError::from(err).into()
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::new(ErrorKind::Configuration, ErrorOrigin::Config, err.to_string())
    }
}

///
/// ErrorKind
/// Public error taxonomy for callers.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    /// Type metadata, codec registration, or options are wrong. Fix the
    /// program, not the document.
    Configuration,

    /// An ownership rule was violated.
    Conflict,

    /// A resource bound such as nesting depth was hit.
    Limit,

    /// The document holds a value that does not decode.
    Malformed,

    /// A required element is absent.
    NotFound,
}

impl From<ErrorClass> for ErrorKind {
    fn from(class: ErrorClass) -> Self {
        match class {
            ErrorClass::Configuration => Self::Configuration,
            ErrorClass::Conflict => Self::Conflict,
            ErrorClass::Limit => Self::Limit,
            ErrorClass::Malformed => Self::Malformed,
            ErrorClass::NotFound => Self::NotFound,
        }
    }
}

///
/// ErrorOrigin
/// Public origin taxonomy for callers.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Codec,
    Config,
    Descriptor,
    Engine,
    Ownership,
}

impl From<CoreErrorOrigin> for ErrorOrigin {
    fn from(origin: CoreErrorOrigin) -> Self {
        match origin {
            CoreErrorOrigin::Codec => Self::Codec,
            CoreErrorOrigin::Descriptor => Self::Descriptor,
            CoreErrorOrigin::Engine => Self::Engine,
            CoreErrorOrigin::Ownership => Self::Ownership,
        }
    }
}
