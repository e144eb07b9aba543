//! Renderer configuration

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::context::RenderContext;
use crate::error::{RenderError, RenderResult};
use crate::params::RenderMode;
use crate::serializer::function::{CallSerializer, call_keywords};

/// File name looked up in the working directory.
pub const LOCAL_CONFIG: &str = "jpql.toml";

/// Renderer configuration, usually read from `jpql.toml`.
///
/// ```toml
/// mode = "inline"
///
/// [functions]
/// lower = "LCASE"
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig {
    /// Default render mode for front-ends that do not pick one per call
    #[serde(default)]
    pub mode: RenderMode,

    /// Keyword overrides for function-style nodes, keyed by node kind
    #[serde(default)]
    pub functions: BTreeMap<String, String>,
}

impl RenderConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml(content: &str) -> RenderResult<Self> {
        toml::from_str(content).map_err(|e| RenderError::Config(e.to_string()))
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> RenderResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// Load `./jpql.toml`, then `<config dir>/jpql/config.toml`, else defaults.
    pub fn discover() -> RenderResult<Self> {
        for path in Self::search_paths() {
            if path.exists() {
                tracing::debug!("loading config from {}", path.display());
                return Self::load(&path);
            }
        }
        tracing::warn!("no {} found, using default configuration", LOCAL_CONFIG);
        Ok(Self::default())
    }

    fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("jpql").join("config.toml"));
        }
        paths
    }

    /// Set the default render mode
    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    /// Override the keyword written for a function-style node kind
    pub fn with_function(mut self, kind: impl Into<String>, keyword: impl Into<String>) -> Self {
        self.functions.insert(kind.into(), keyword.into());
        self
    }

    /// Default context with this configuration's overrides applied.
    pub fn context(&self) -> RenderResult<RenderContext> {
        let known = call_keywords();
        let mut context = RenderContext::default();
        for (name, keyword) in &self.functions {
            let Some((kind, _)) = known.iter().find(|(kind, _)| kind.as_str() == name) else {
                return Err(RenderError::Config(format!(
                    "unknown function '{}' (configurable: {})",
                    name,
                    known
                        .iter()
                        .map(|(kind, _)| kind.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                )));
            };
            if keyword.trim().is_empty() {
                return Err(RenderError::Config(format!("empty keyword for function '{}'", name)));
            }
            context = context.with_serializer(CallSerializer::new(kind.clone(), keyword.as_str()));
        }
        Ok(context)
    }
}
