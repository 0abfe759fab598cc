//! Decoder settings.
//!
//! Deserialized from the TOML file passed with `--config`. Every key is
//! optional:
//!
//! ```toml
//! os_name = "Microsoft Windows NT"
//! redefinition = "keep_existing"   # replace | keep_existing | reject
//! method_bodies = "deferred"       # eager | deferred
//! exact_block_length = true
//! allow_short_packages = false
//! max_depth = 128
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use hadron_aml::{DecoderConfig, MethodBodies, RedefinitionPolicy};
use serde::Deserialize;

/// What to do when a path is defined twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Redefinition {
    /// The later definition wins.
    #[default]
    Replace,
    /// The earlier definition wins.
    KeepExisting,
    /// Fail the load.
    Reject,
}

/// When method bodies are decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bodies {
    /// While the table is decoded.
    #[default]
    Eager,
    /// After every table is loaded.
    Deferred,
}

/// Top-level settings file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DumpConfig {
    /// String bound at `\_OS`.
    pub os_name: Option<String>,
    /// Duplicate-definition handling.
    pub redefinition: Redefinition,
    /// Method body decoding mode.
    pub method_bodies: Bodies,
    /// Reject blocks with unread trailing bytes (default `true`).
    pub exact_block_length: Option<bool>,
    /// Accept packages with fewer elements than declared.
    pub allow_short_packages: bool,
    /// Nesting limit (library default when absent).
    pub max_depth: Option<usize>,
}

impl DumpConfig {
    /// Reads and parses a settings file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// The library configuration these settings describe.
    pub fn decoder_config(&self) -> DecoderConfig {
        let mut config = DecoderConfig::default()
            .with_redefinition(match self.redefinition {
                Redefinition::Replace => RedefinitionPolicy::Replace,
                Redefinition::KeepExisting => RedefinitionPolicy::KeepExisting,
                Redefinition::Reject => RedefinitionPolicy::Reject,
            })
            .with_method_bodies(match self.method_bodies {
                Bodies::Eager => MethodBodies::Eager,
                Bodies::Deferred => MethodBodies::Deferred,
            })
            .with_exact_block_length(self.exact_block_length.unwrap_or(true))
            .with_short_packages(self.allow_short_packages);
        if let Some(os_name) = &self.os_name {
            config = config.with_os_name(os_name.clone());
        }
        if let Some(max_depth) = self.max_depth {
            config = config.with_max_depth(max_depth);
        }
        config
    }
}
