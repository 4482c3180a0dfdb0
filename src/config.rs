use crate::{
    constants::{DEFAULT_OUTPUT_TYPE, FALLBACK_TYPES, LOG_CONTEXT},
    registry::{Registry, DEFAULT_REGISTRY},
};

use derivative::Derivative;
use serde::Deserialize;
use std::sync::Arc;

/// Configuration for codec resolution.
///
/// Everything except the registry can be deserialised from a host application's
/// own settings file; absent fields take their defaults.
#[derive(Clone, Derivative, Deserialize)]
#[derivative(Debug)]
#[serde(default)]
#[non_exhaustive]
pub struct Config {
    /// Type used when writing to a path with a missing or unrecognised
    /// extension, if no type was requested.
    ///
    /// Defaults to `"wav"`.
    pub default_output_type: String,

    /// Types tried, in order, when a read or write request carries no explicit
    /// type and its path's extension matches nothing.
    ///
    /// Defaults to `["probe"]`.
    pub fallback_types: Vec<String>,

    /// Prefix for every logged resolution failure.
    ///
    /// Defaults to `"dsp"`.
    pub log_context: String,

    #[derivative(Debug = "ignore")]
    #[serde(skip, default = "default_registry_handle")]
    /// Table of formats which may be opened.
    ///
    /// Defaults to [`DEFAULT_REGISTRY`].
    ///
    /// [`DEFAULT_REGISTRY`]: static@DEFAULT_REGISTRY
    pub registry: Arc<Registry>,
}

fn default_registry_handle() -> Arc<Registry> {
    DEFAULT_REGISTRY.clone()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_output_type: DEFAULT_OUTPUT_TYPE.to_string(),
            fallback_types: FALLBACK_TYPES.iter().map(|t| (*t).to_string()).collect(),
            log_context: LOG_CONTEXT.to_string(),
            registry: default_registry_handle(),
        }
    }
}

impl Config {
    /// Sets this `Config`'s output type for unrecognised write paths.
    #[must_use]
    pub fn default_output_type(mut self, default_output_type: impl Into<String>) -> Self {
        self.default_output_type = default_output_type.into();
        self
    }

    /// Sets this `Config`'s ordered fallback types.
    #[must_use]
    pub fn fallback_types<I, S>(mut self, fallback_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fallback_types = fallback_types.into_iter().map(Into::into).collect();
        self
    }

    /// Sets this `Config`'s diagnostic prefix.
    #[must_use]
    pub fn log_context(mut self, log_context: impl Into<String>) -> Self {
        self.log_context = log_context.into();
        self
    }

    /// Sets this `Config`'s format registry.
    #[must_use]
    pub fn registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = registry;
        self
    }
}
