//! Configuration types for the CPM engine.

#[cfg(feature = "python")]
use pyo3::prelude::*;
use thiserror::Error;

/// Errors raised while interpreting configuration values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown horizon mode: {0} (expected \"shared\" or \"per_component\")")]
    UnknownHorizonMode(String),
}

/// How the backward pass chooses the latest finish of sink tasks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HorizonMode {
    /// Every sink finishes at the single plan horizon `max(EF)`.
    #[default]
    Shared,
    /// Each weakly connected component finishes at its own `max(EF)`.
    PerComponent,
}

impl HorizonMode {
    pub fn parse(mode: &str) -> Result<Self, ConfigError> {
        match mode {
            "shared" => Ok(Self::Shared),
            "per_component" => Ok(Self::PerComponent),
            other => Err(ConfigError::UnknownHorizonMode(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Shared => "shared",
            Self::PerComponent => "per_component",
        }
    }
}

/// Engine configuration.
#[cfg_attr(feature = "python", pyclass)]
#[derive(Clone, Debug)]
pub struct CpmConfig {
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug.
    #[cfg_attr(feature = "python", pyo3(get, set))]
    pub verbosity: u8,
    /// Sink horizon policy: "shared" or "per_component".
    #[cfg_attr(feature = "python", pyo3(get, set))]
    pub horizon_mode: String,
}

impl Default for CpmConfig {
    fn default() -> Self {
        Self {
            verbosity: 0,
            horizon_mode: HorizonMode::Shared.as_str().to_string(),
        }
    }
}

impl CpmConfig {
    /// Resolve the string horizon mode into its typed form.
    pub fn horizon(&self) -> Result<HorizonMode, ConfigError> {
        HorizonMode::parse(&self.horizon_mode)
    }
}

#[cfg(feature = "python")]
#[pymethods]
impl CpmConfig {
    #[new]
    #[pyo3(signature = (verbosity=None, horizon_mode=None))]
    fn py_new(verbosity: Option<u8>, horizon_mode: Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            verbosity: verbosity.unwrap_or(defaults.verbosity),
            horizon_mode: horizon_mode.unwrap_or(defaults.horizon_mode),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "CpmConfig(verbosity={}, horizon_mode={:?})",
            self.verbosity, self.horizon_mode
        )
    }
}
