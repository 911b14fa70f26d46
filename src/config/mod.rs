//! Configuration management
//!
//! Handles config.toml (user-defined) and config.lock (generated with all defaults).

mod types;
mod validation;

pub use types::*;
pub use validation::{validate, ValidationResult};

use crate::nat64::{
    PortTranslationMode, Translator, TranslatorConfig, DEFAULT_ICMP_TIMEOUT, DEFAULT_IDLE_TIMEOUT,
    DEFAULT_MAX_MAPPINGS,
};
use crate::{Error, Result};
use std::path::Path;
use std::time::Duration;

/// Load configuration from a TOML file
pub fn load<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    let config: Config = toml::from_str(&content).map_err(|e| Error::Config(e.to_string()))?;
    Ok(config)
}

/// Generate a lock file from config, filling in all defaults
pub fn generate_lock(config: &Config, source: &str) -> ConfigLock {
    ConfigLock::from_config(config, source)
}

/// Build a ready-to-run translator from the `[translator]` section.
pub fn build_translator(config: &Config) -> Result<Translator> {
    let section = &config.translator;

    let translator_config = TranslatorConfig {
        max_mappings: section.max_mappings.unwrap_or(DEFAULT_MAX_MAPPINGS),
        idle_timeout: section
            .idle_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_IDLE_TIMEOUT),
        icmp_timeout: section
            .icmp_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_ICMP_TIMEOUT),
        port_translation: match section.port_translation {
            PortTranslation::Enabled => PortTranslationMode::Enabled,
            PortTranslation::Disabled => PortTranslationMode::Disabled,
        },
        ..TranslatorConfig::default()
    };

    let mut translator = Translator::new(translator_config);
    if let Some(cidr) = &section.cidr {
        translator.set_ip4_cidr(cidr.parse()?);
    }
    if let Some(prefix) = &section.prefix {
        translator.set_nat64_prefix(prefix.parse()?);
    }
    translator.set_enabled(section.enabled);
    Ok(translator)
}
