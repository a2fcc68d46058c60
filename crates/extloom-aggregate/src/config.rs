//! Aggregation settings.
//!
//! Defaults live in [`defaults`]; [`AggregateConfig::from_env`] overlays the
//! variables named in [`env_vars`].

use std::path::PathBuf;

use extloom_core::codec::ClassDecoder;
use extloom_core::TypeIdentity;
use serde::{Deserialize, Serialize};

/// Default values.
pub mod defaults {
    /// Archive directory holding extension payloads.
    pub const ENTRY_PREFIX: &str = "META-INF/extloom/";
    /// File extension of a payload entry.
    pub const ENTRY_EXTENSION: &str = ".ext";
    /// Appended to the owner's simple name to name the generated type.
    pub const TYPE_SUFFIX: &str = "Extensions";
    /// Upper bound for a single token.
    pub const MAX_TOKEN_BYTES: u64 = extloom_core::codec::DEFAULT_MAX_TOKEN_BYTES;
    /// Where generated sources are written.
    pub const OUTPUT_DIR: &str = "generated";
}

/// Environment variable names.
pub mod env_vars {
    pub const ENTRY_PREFIX: &str = "EXTLOOM_ENTRY_PREFIX";
    pub const TYPE_SUFFIX: &str = "EXTLOOM_TYPE_SUFFIX";
    pub const MAX_TOKEN_BYTES: &str = "EXTLOOM_MAX_TOKEN_BYTES";
    pub const OUTPUT_DIR: &str = "EXTLOOM_OUTPUT_DIR";
    pub const LOG_JSON: &str = "EXTLOOM_LOG_JSON";
}

/// Aggregator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateConfig {
    #[serde(default = "AggregateConfig::default_entry_prefix")]
    pub entry_prefix: String,
    #[serde(default = "AggregateConfig::default_type_suffix")]
    pub type_suffix: String,
    #[serde(default = "AggregateConfig::default_max_token_bytes")]
    pub max_token_bytes: u64,
    #[serde(default = "AggregateConfig::default_output_dir")]
    pub output_dir: PathBuf,
}

impl AggregateConfig {
    fn default_entry_prefix() -> String {
        defaults::ENTRY_PREFIX.to_string()
    }

    fn default_type_suffix() -> String {
        defaults::TYPE_SUFFIX.to_string()
    }

    fn default_max_token_bytes() -> u64 {
        defaults::MAX_TOKEN_BYTES
    }

    fn default_output_dir() -> PathBuf {
        PathBuf::from(defaults::OUTPUT_DIR)
    }

    /// Defaults overridden by any set environment variables.
    ///
    /// Unparsable values keep the default.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(prefix) = std::env::var(env_vars::ENTRY_PREFIX) {
            config.entry_prefix = prefix;
        }
        if let Ok(suffix) = std::env::var(env_vars::TYPE_SUFFIX) {
            config.type_suffix = suffix;
        }
        if let Some(limit) = std::env::var(env_vars::MAX_TOKEN_BYTES)
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.max_token_bytes = limit;
        }
        if let Ok(dir) = std::env::var(env_vars::OUTPUT_DIR) {
            config.output_dir = PathBuf::from(dir);
        }
        config
    }

    pub fn with_entry_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.entry_prefix = prefix.into();
        self
    }

    pub fn with_type_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.type_suffix = suffix.into();
        self
    }

    pub fn with_max_token_bytes(mut self, limit: u64) -> Self {
        self.max_token_bytes = limit;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Archive entry name for the payload of `owner`.
    pub fn entry_name(&self, owner: &TypeIdentity) -> String {
        format!(
            "{}{}{}",
            self.entry_prefix,
            owner.as_str(),
            defaults::ENTRY_EXTENSION
        )
    }

    /// Whether an archive entry holds an extension payload.
    pub fn is_payload_entry(&self, name: &str) -> bool {
        name.starts_with(&self.entry_prefix) && name.ends_with(defaults::ENTRY_EXTENSION)
    }

    /// Payload decoder for these settings.
    pub fn decoder(&self) -> ClassDecoder {
        ClassDecoder::new(self.type_suffix.clone()).with_max_token_bytes(self.max_token_bytes)
    }
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            entry_prefix: Self::default_entry_prefix(),
            type_suffix: Self::default_type_suffix(),
            max_token_bytes: Self::default_max_token_bytes(),
            output_dir: Self::default_output_dir(),
        }
    }
}
