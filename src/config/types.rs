//! Configuration types

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// User-defined configuration (config.toml)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub translator: TranslatorSection,
    #[serde(default)]
    pub log: LogSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranslatorSection {
    #[serde(default)]
    pub enabled: bool,
    /// IPv4 pool CIDR, e.g. "192.0.2.0/24".
    pub cidr: Option<String>,
    /// NAT64 prefix, e.g. "64:ff9b::/96".
    pub prefix: Option<String>,
    #[serde(default)]
    pub port_translation: PortTranslation,
    pub max_mappings: Option<usize>,
    pub idle_timeout_secs: Option<u64>,
    pub icmp_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PortTranslation {
    #[default]
    Disabled,
    Enabled,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogSection {
    /// error, warn, info, debug, trace
    pub level: Option<String>,
    /// pretty, compact, json
    pub format: Option<String>,
}

// ============================================================================
// Lock file types (generated, includes all defaults)
// ============================================================================

/// Generated lock file with all defaults filled in
#[derive(Debug, Clone, Serialize)]
pub struct ConfigLock {
    pub generated_at: String,
    pub source_hash: String,
    pub translator: TranslatorLock,
    pub log: LogLock,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranslatorLock {
    pub enabled: bool,
    pub cidr: Option<String>,
    pub prefix: Option<String>,
    pub port_translation: String,
    pub max_mappings: usize,
    pub idle_timeout_secs: u64,
    pub icmp_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogLock {
    pub level: String,
    pub format: String,
}

impl ConfigLock {
    /// `source` is the raw config.toml text the lock was generated from;
    /// its digest lets `config validate` detect drift.
    pub fn from_config(config: &Config, source: &str) -> Self {
        let translator = TranslatorLock {
            enabled: config.translator.enabled,
            cidr: config.translator.cidr.clone(),
            prefix: config.translator.prefix.clone(),
            port_translation: format!("{:?}", config.translator.port_translation).to_lowercase(),
            max_mappings: config
                .translator
                .max_mappings
                .unwrap_or(crate::nat64::translator::DEFAULT_MAX_MAPPINGS),
            idle_timeout_secs: config
                .translator
                .idle_timeout_secs
                .unwrap_or(crate::nat64::translator::DEFAULT_IDLE_TIMEOUT.as_secs()),
            icmp_timeout_secs: config
                .translator
                .icmp_timeout_secs
                .unwrap_or(crate::nat64::translator::DEFAULT_ICMP_TIMEOUT.as_secs()),
        };

        let log = LogLock {
            level: config.log.level.clone().unwrap_or_else(|| "info".into()),
            format: config.log.format.clone().unwrap_or_else(|| "pretty".into()),
        };

        ConfigLock {
            generated_at: chrono::Utc::now().to_rfc3339(),
            source_hash: format!("{:x}", Sha256::digest(source.as_bytes())),
            translator,
            log,
        }
    }
}
