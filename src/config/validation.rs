//! Configuration validation

use super::Config;
use crate::nat64::{Ip4Cidr, Nat64Prefix};

#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    pub fn error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn print_diagnostics(&self) {
        for warning in &self.warnings {
            println!("[WARN] {}", warning);
        }
        for error in &self.errors {
            println!("[ERROR] {}", error);
        }
    }
}

/// Validate configuration and return warnings/errors
pub fn validate(config: &Config) -> ValidationResult {
    let mut result = ValidationResult::new();
    validate_translator(config, &mut result);
    validate_log(config, &mut result);
    result
}

fn validate_translator(config: &Config, result: &mut ValidationResult) {
    let section = &config.translator;

    match &section.cidr {
        Some(cidr) => {
            if let Err(e) = cidr.parse::<Ip4Cidr>() {
                result.error(format!("translator.cidr: {}", e));
            }
        }
        None if section.enabled => {
            result.warn("translator: enabled without cidr, translator will stay not_running");
        }
        None => {}
    }

    match &section.prefix {
        Some(prefix) => {
            if let Err(e) = prefix.parse::<Nat64Prefix>() {
                result.error(format!("translator.prefix: {}", e));
            }
        }
        None if section.enabled => {
            result.warn("translator: enabled without prefix, translator will stay not_running");
        }
        None => {}
    }

    match section.max_mappings {
        Some(0) => result.error("translator.max_mappings: must be at least 1"),
        Some(_) => {}
        None => result.warn("translator.max_mappings not specified, using default 254"),
    }

    if section.idle_timeout_secs == Some(0) {
        result.error("translator.idle_timeout_secs: must be non-zero");
    }
    if section.icmp_timeout_secs == Some(0) {
        result.error("translator.icmp_timeout_secs: must be non-zero");
    }
    if let (Some(idle), Some(icmp)) = (section.idle_timeout_secs, section.icmp_timeout_secs) {
        if icmp > idle {
            result.warn(format!(
                "translator: icmp_timeout_secs ({}) exceeds idle_timeout_secs ({})",
                icmp, idle
            ));
        }
    }
}

fn validate_log(config: &Config, result: &mut ValidationResult) {
    if let Some(level) = &config.log.level {
        let known = ["error", "warn", "info", "debug", "trace"];
        if !known.contains(&level.to_lowercase().as_str()) {
            result.warn(format!("log.level: unknown level '{}', using info", level));
        }
    }
    if let Some(format) = &config.log.format {
        let known = ["pretty", "compact", "json"];
        if !known.contains(&format.to_lowercase().as_str()) {
            result.warn(format!(
                "log.format: unknown format '{}', using pretty",
                format
            ));
        }
    }
}
