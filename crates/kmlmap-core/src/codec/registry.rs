use crate::codec::{AnyScalar, CodecError, Scalar, ScalarCodec, ScalarTag};
use std::{
    any::Any,
    collections::HashMap,
    sync::{LazyLock, PoisonError, RwLock},
};

///
/// CodecRegistry
///
/// Map from scalar tag to codec. A later registration for a tag replaces
/// the earlier one.
///

#[derive(Debug, Default)]
pub struct CodecRegistry {
    codecs: HashMap<ScalarTag, ScalarCodec>,
}

impl CodecRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in scalar codec.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();

        macro_rules! register_builtins {
            ( @args $registry:ident; @entries $( ($ty:ty, $tag:literal, numeric = $numeric:tt, sample = $sample:expr) ),* $(,)? ) => {
                $( $registry.register::<$ty>(); )*
            };
        }

        scalar_registry!(register_builtins, registry);

        registry
    }

    /// Insert a codec, returning the one it replaced.
    pub fn insert(&mut self, codec: ScalarCodec) -> Option<ScalarCodec> {
        self.codecs.insert(codec.tag(), codec)
    }

    pub fn register<T: Scalar>(&mut self) -> Option<ScalarCodec> {
        self.insert(ScalarCodec::of::<T>())
    }

    #[must_use]
    pub fn get(&self, tag: ScalarTag) -> Option<&ScalarCodec> {
        self.codecs.get(&tag)
    }

    #[must_use]
    pub fn contains(&self, tag: ScalarTag) -> bool {
        self.codecs.contains_key(&tag)
    }

    pub fn encode(&self, tag: ScalarTag, value: &dyn Any) -> Result<String, CodecError> {
        self.get(tag)
            .ok_or(CodecError::UnknownCodec { tag })?
            .encode(value)
    }

    pub fn decode(&self, tag: ScalarTag, text: &str) -> Result<AnyScalar, CodecError> {
        self.get(tag)
            .ok_or(CodecError::UnknownCodec { tag })?
            .decode(text)
    }

    /// Registered tags in sorted order.
    #[must_use]
    pub fn tags(&self) -> Vec<ScalarTag> {
        let mut tags: Vec<_> = self.codecs.keys().copied().collect();
        tags.sort_unstable();

        tags
    }
}

///
/// REGISTRY
/// process-wide codec table, seeded with the built-ins
///

static REGISTRY: LazyLock<RwLock<CodecRegistry>> =
    LazyLock::new(|| RwLock::new(CodecRegistry::with_builtins()));

fn with_registry<R>(f: impl FnOnce(&CodecRegistry) -> R) -> R {
    let registry = REGISTRY.read().unwrap_or_else(PoisonError::into_inner);

    f(&registry)
}

fn with_registry_mut<R>(f: impl FnOnce(&mut CodecRegistry) -> R) -> R {
    let mut registry = REGISTRY.write().unwrap_or_else(PoisonError::into_inner);

    f(&mut registry)
}

/// Register a codec for `tag` from typed encode/decode functions.
///
/// Returns the codec previously registered under the same tag, if any.
pub fn register_scalar_codec<T, E, D>(tag: ScalarTag, encode: E, decode: D) -> Option<ScalarCodec>
where
    T: Any + Send,
    E: Fn(&T) -> String + Send + Sync + 'static,
    D: Fn(&str) -> Result<T, CodecError> + Send + Sync + 'static,
{
    let codec = ScalarCodec::typed(tag, encode, decode);
    tracing::debug!(tag = %tag, "registering scalar codec");

    with_registry_mut(|registry| registry.insert(codec))
}

/// Register the codec a [`Scalar`] implementation provides.
pub fn register_scalar<T: Scalar>() -> Option<ScalarCodec> {
    with_registry_mut(CodecRegistry::register::<T>)
}

/// Register `codec` only when its tag is still free. Returns whether it was
/// inserted.
pub(crate) fn register_if_absent(codec: ScalarCodec) -> bool {
    with_registry_mut(|registry| {
        if registry.contains(codec.tag()) {
            false
        } else {
            registry.insert(codec);
            true
        }
    })
}

#[must_use]
pub fn codec_for(tag: ScalarTag) -> Option<ScalarCodec> {
    with_registry(|registry| registry.get(tag).cloned())
}

pub fn encode(tag: ScalarTag, value: &dyn Any) -> Result<String, CodecError> {
    // clone the codec out so user encoders never run under the registry lock
    codec_for(tag)
        .ok_or(CodecError::UnknownCodec { tag })?
        .encode(value)
}

pub fn decode(tag: ScalarTag, text: &str) -> Result<AnyScalar, CodecError> {
    codec_for(tag)
        .ok_or(CodecError::UnknownCodec { tag })?
        .decode(text)
}

#[must_use]
pub fn registered_tags() -> Vec<ScalarTag> {
    with_registry(CodecRegistry::tags)
}
