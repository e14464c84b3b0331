use crate::{codec::CodecError, descriptor::DescriptorError, ownership::OwnershipError};
use std::fmt;
use thiserror::Error as ThisError;

///
/// MappingError
///
/// Fatal failure of one engine call. Non-fatal problems are reported as
/// warnings alongside the decoded value instead.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[remain::sorted]
pub enum MappingError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("element nesting exceeds the limit of {limit}")]
    DepthExceeded { limit: usize },

    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    #[error("{element}: required property '{property}' is missing")]
    MissingRequired {
        element: &'static str,
        property: &'static str,
    },

    #[error(transparent)]
    Ownership(#[from] OwnershipError),

    #[error("{element}: required property '{property}' could not be decoded: {source}")]
    RequiredValue {
        element: &'static str,
        property: &'static str,
        source: CodecError,
    },

    #[error("expected root element '{expected}', found '{found}'")]
    UnexpectedRoot {
        expected: &'static str,
        found: String,
    },
}

impl MappingError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Codec(CodecError::UnknownCodec { .. }) | Self::Descriptor(_) => {
                ErrorClass::Configuration
            }
            Self::Codec(_) | Self::RequiredValue { .. } | Self::UnexpectedRoot { .. } => {
                ErrorClass::Malformed
            }
            Self::DepthExceeded { .. } => ErrorClass::Limit,
            Self::MissingRequired { .. } => ErrorClass::NotFound,
            Self::Ownership(_) => ErrorClass::Conflict,
        }
    }

    #[must_use]
    pub const fn origin(&self) -> ErrorOrigin {
        match self {
            Self::Codec(_) | Self::RequiredValue { .. } => ErrorOrigin::Codec,
            Self::Descriptor(_) => ErrorOrigin::Descriptor,
            Self::Ownership(_) => ErrorOrigin::Ownership,
            Self::DepthExceeded { .. }
            | Self::MissingRequired { .. }
            | Self::UnexpectedRoot { .. } => ErrorOrigin::Engine,
        }
    }

    /// Whether a nested child failing this way may be dropped with a
    /// warning instead of aborting the whole document. Configuration
    /// problems and the depth limit always abort.
    #[must_use]
    pub(crate) const fn is_child_recoverable(&self) -> bool {
        !matches!(
            self,
            Self::Codec(CodecError::UnknownCodec { .. })
                | Self::Descriptor(_)
                | Self::DepthExceeded { .. }
        )
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {self}", self.origin(), self.class())
    }
}

///
/// ErrorClass
/// Internal error taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Configuration,
    Conflict,
    Limit,
    Malformed,
    NotFound,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Configuration => "configuration",
            Self::Conflict => "conflict",
            Self::Limit => "limit",
            Self::Malformed => "malformed",
            Self::NotFound => "not_found",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Internal origin taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Codec,
    Descriptor,
    Engine,
    Ownership,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Codec => "codec",
            Self::Descriptor => "descriptor",
            Self::Engine => "engine",
            Self::Ownership => "ownership",
        };
        write!(f, "{label}")
    }
}
