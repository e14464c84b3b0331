//! Scalar codecs: text <-> typed leaf values.
//!
//! Every leaf kind is addressed by a [`ScalarTag`]. The engine never matches on
//! concrete Rust types; it looks the tag up in the [`CodecRegistry`] and moves
//! values around as `dyn Any`. New leaf kinds are added by implementing
//! [`Scalar`] or by calling [`register_scalar_codec`].

mod builtin;
mod color;
mod registry;


use derive_more::Display;
use serde::Serialize;
use std::{
    any::{Any, TypeId},
    fmt,
    sync::Arc,
};
use thiserror::Error as ThisError;

// re-exports
pub use color::Color32;
pub use registry::{
    CodecRegistry, codec_for, decode, encode, register_scalar, register_scalar_codec,
    registered_tags,
};
pub(crate) use registry::register_if_absent;

///
/// ScalarTag
///
/// Stable identifier of one scalar kind.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct ScalarTag(&'static str);

impl ScalarTag {
    #[must_use]
    pub const fn new(tag: &'static str) -> Self {
        Self(tag)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

///
/// Scalar
///
/// A leaf value with a textual element representation.
/// `decode(encode(x))` must yield a value equal to `x`.
///

pub trait Scalar: Any + Send + Sync + Sized {
    const TAG: ScalarTag;

    fn encode(&self) -> String;

    fn decode(text: &str) -> Result<Self, CodecError>;
}

///
/// CodecError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[remain::sorted]
pub enum CodecError {
    #[error("malformed {tag} value '{text}': {reason}")]
    MalformedValue {
        tag: ScalarTag,
        text: String,
        reason: String,
    },

    #[error("value does not have the Rust type registered for {tag}")]
    TypeMismatch { tag: ScalarTag },

    #[error("no scalar codec registered for {tag}")]
    UnknownCodec { tag: ScalarTag },

    #[error("unrecognized {tag} token '{token}'")]
    UnrecognizedToken { tag: ScalarTag, token: String },
}

impl CodecError {
    pub fn malformed(tag: ScalarTag, text: &str, reason: impl fmt::Display) -> Self {
        Self::MalformedValue {
            tag,
            text: text.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn unrecognized(tag: ScalarTag, token: &str) -> Self {
        Self::UnrecognizedToken {
            tag,
            token: token.to_string(),
        }
    }

    #[must_use]
    pub const fn tag(&self) -> ScalarTag {
        match self {
            Self::MalformedValue { tag, .. }
            | Self::TypeMismatch { tag }
            | Self::UnknownCodec { tag }
            | Self::UnrecognizedToken { tag, .. } => *tag,
        }
    }
}

/// Boxed, type-erased decoded value.
pub type AnyScalar = Box<dyn Any + Send>;

type EncodeFn = Arc<dyn Fn(&dyn Any) -> Result<String, CodecError> + Send + Sync>;
type DecodeFn = Arc<dyn Fn(&str) -> Result<AnyScalar, CodecError> + Send + Sync>;

///
/// ScalarCodec
///
/// Type-erased encode/decode pair for one tag. Cloning is cheap.
///

#[derive(Clone)]
pub struct ScalarCodec {
    tag: ScalarTag,
    value_type: Option<TypeId>,
    encode: EncodeFn,
    decode: DecodeFn,
}

impl ScalarCodec {
    /// Build a codec from raw type-erased functions.
    /// The produced Rust type is unknown, so descriptors cannot check it.
    pub fn new(
        tag: ScalarTag,
        encode: impl Fn(&dyn Any) -> Result<String, CodecError> + Send + Sync + 'static,
        decode: impl Fn(&str) -> Result<AnyScalar, CodecError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            tag,
            value_type: None,
            encode: Arc::new(encode),
            decode: Arc::new(decode),
        }
    }

    /// Build a codec for `T` from typed functions.
    pub fn typed<T, E, D>(tag: ScalarTag, encode: E, decode: D) -> Self
    where
        T: Any + Send,
        E: Fn(&T) -> String + Send + Sync + 'static,
        D: Fn(&str) -> Result<T, CodecError> + Send + Sync + 'static,
    {
        Self {
            value_type: Some(TypeId::of::<T>()),
            ..Self::new(
                tag,
                move |value: &dyn Any| {
                    value
                        .downcast_ref::<T>()
                        .map(&encode)
                        .ok_or(CodecError::TypeMismatch { tag })
                },
                move |text: &str| decode(text).map(|value| Box::new(value) as AnyScalar),
            )
        }
    }

    /// The codec a [`Scalar`] implementation provides for itself.
    #[must_use]
    pub fn of<T: Scalar>() -> Self {
        Self::typed(T::TAG, T::encode, T::decode)
    }

    #[must_use]
    pub const fn tag(&self) -> ScalarTag {
        self.tag
    }

    /// Rust type produced by `decode`, when the codec was built with [`Self::typed`].
    #[must_use]
    pub const fn value_type(&self) -> Option<TypeId> {
        self.value_type
    }

    /// Whether this codec can carry values of `ty`.
    #[must_use]
    pub fn carries(&self, ty: TypeId) -> bool {
        self.value_type.is_none_or(|own| own == ty)
    }

    pub fn encode(&self, value: &dyn Any) -> Result<String, CodecError> {
        (self.encode)(value)
    }

    pub fn decode(&self, text: &str) -> Result<AnyScalar, CodecError> {
        (self.decode)(text)
    }
}

impl fmt::Debug for ScalarCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScalarCodec")
            .field("tag", &self.tag)
            .finish_non_exhaustive()
    }
}

/// Recover the concrete value a codec produced for `tag`.
pub fn downcast_scalar<T: Any>(tag: ScalarTag, value: AnyScalar) -> Result<T, CodecError> {
    value
        .downcast::<T>()
        .map(|boxed| *boxed)
        .map_err(|_| CodecError::TypeMismatch { tag })
}
