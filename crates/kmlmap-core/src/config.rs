use crate::DEFAULT_MAX_DEPTH;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("invalid mapping options: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("max_depth must be at least 1")]
    ZeroDepth,
}

///
/// MappingOptions
///
/// Per-call knobs for the mapping engine.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct MappingOptions {
    /// Deepest element nesting the engine will follow.
    pub max_depth: usize,

    /// Emit declared defaults for unset optional properties, unless the
    /// property suppresses defaults.
    pub materialize_defaults: bool,

    /// Require the root element name to match the target type.
    pub check_root_name: bool,
}

impl MappingOptions {
    /// Parse options from a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let options: Self = toml::from_str(text)?;
        options.validate()?;

        Ok(options)
    }

    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }

        Ok(())
    }

    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub const fn with_materialize_defaults(mut self, on: bool) -> Self {
        self.materialize_defaults = on;
        self
    }

    #[must_use]
    pub const fn with_check_root_name(mut self, on: bool) -> Self {
        self.check_root_name = on;
        self
    }
}

impl Default for MappingOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            materialize_defaults: false,
            check_root_name: true,
        }
    }
}
