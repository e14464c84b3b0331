//! Optional scalar slots.

///
/// Leaf
///
/// An optional scalar property value. `Unset` means the property was never
/// assigned (or the element was absent on read); it is kept distinct from a
/// value that happens to equal the declared default.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Leaf<T> {
    Unset,
    Set(T),
}

impl<T> Leaf<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self::Unset
    }

    #[must_use]
    pub const fn is_set(&self) -> bool {
        matches!(self, Self::Set(_))
    }

    #[must_use]
    pub const fn get(&self) -> Option<&T> {
        match self {
            Self::Unset => None,
            Self::Set(value) => Some(value),
        }
    }

    /// Assign a value, returning the previous one.
    pub fn set(&mut self, value: T) -> Option<T> {
        std::mem::replace(self, Self::Set(value)).into_option()
    }

    /// Return to `Unset`, returning the previous value.
    pub fn clear(&mut self) -> Option<T> {
        std::mem::replace(self, Self::Unset).into_option()
    }

    /// The value, or `default` when unset.
    #[must_use]
    pub fn get_or<'a>(&'a self, default: &'a T) -> &'a T {
        self.get().unwrap_or(default)
    }

    #[must_use]
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Unset => None,
            Self::Set(value) => Some(value),
        }
    }

    /// Classify against a declared default.
    #[must_use]
    pub fn state(&self, default: Option<&T>) -> LeafState
    where
        T: PartialEq,
    {
        match (self.get(), default) {
            (None, _) => LeafState::Unset,
            (Some(value), Some(default)) if value == default => LeafState::Default,
            (Some(_), _) => LeafState::Custom,
        }
    }
}

impl<T: Copy> Leaf<T> {
    /// Copy the value out, or `default` when unset.
    #[must_use]
    pub fn value_or(&self, default: T) -> T {
        self.get().copied().unwrap_or(default)
    }
}

impl<T> Default for Leaf<T> {
    fn default() -> Self {
        Self::Unset
    }
}

impl<T> From<Option<T>> for Leaf<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Unset, Self::Set)
    }
}

impl<T> From<Leaf<T>> for Option<T> {
    fn from(value: Leaf<T>) -> Self {
        value.into_option()
    }
}

///
/// LeafState
///
/// The three observable states of an optional scalar with a declared default.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LeafState {
    Unset,
    Default,
    Custom,
}
