//! Tool configuration.
//!
//! An optional `actiondoc.toml` at the project root names the handler method
//! and the capability manifest: which trait FQNs grant a class the generated
//! `run` and `dispatch`/`dispatchOn` entry points. Capabilities are declared
//! here rather than discovered by executing target code, so the analyser can
//! derive flags from the source text alone.
//!
//! ```toml
//! handler_method = "handle"
//!
//! [capabilities]
//! run = ["LumoSolutions\\Actionable\\Traits\\IsRunnable"]
//! dispatch = ["LumoSolutions\\Actionable\\Traits\\IsDispatchable"]
//! ```

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::types::{CapabilityFlags, ClassSnapshot};

/// The config file name looked up under the project root.
pub const CONFIG_FILE: &str = "actiondoc.toml";

/// Trait FQNs conferring each capability.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Capabilities {
    /// Traits whose presence enables the `run` annotation.
    pub run: Vec<String>,
    /// Traits whose presence enables `dispatch` and `dispatchOn`.
    pub dispatch: Vec<String>,
}

impl Default for Capabilities {
    fn default() -> Self {
        Capabilities {
            run: vec!["LumoSolutions\\Actionable\\Traits\\IsRunnable".to_string()],
            dispatch: vec!["LumoSolutions\\Actionable\\Traits\\IsDispatchable".to_string()],
        }
    }
}

/// Top-level tool configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// The instance method whose signature drives the generated annotations.
    pub handler_method: String,
    pub capabilities: Capabilities,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            handler_method: "handle".to_string(),
            capabilities: Capabilities::default(),
        }
    }
}

impl Config {
    /// Load `actiondoc.toml` from the project root, falling back to defaults
    /// when the file is absent.
    pub fn load(project_root: &Path) -> Result<Config, toml::de::Error> {
        let path = project_root.join(CONFIG_FILE);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(_) => return Ok(Config::default()),
        };
        toml::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Config, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from an explicit file path. Unlike [`Config::load`],
    /// a missing or unreadable file is an error: the caller asked for this
    /// specific file.
    pub fn from_path(path: &Path) -> anyhow::Result<Config> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Derive a class's capability flags from its directly-composed traits.
    pub fn capabilities_of(&self, snapshot: &ClassSnapshot) -> CapabilityFlags {
        let mut flags = CapabilityFlags::default();
        for trait_rel in &snapshot.traits {
            let fqn = trait_rel.full_name();
            if self.capabilities.run.iter().any(|t| t == &fqn) {
                flags.supports_run = true;
            }
            if self.capabilities.dispatch.iter().any(|t| t == &fqn) {
                flags.supports_dispatch = true;
            }
        }
        flags
    }
}
