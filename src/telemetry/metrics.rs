//! Metrics for translator statistics.
//!
//! The translator itself is single-owner and keeps plain-integer
//! counters; this registry snapshots them into atomics so a separate
//! exporter task can read them without touching the translator.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::nat64::{DropReason, Translator};

/// Atomic counter for thread-safe increment operations.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add(&self, val: u64) {
        self.0.fetch_add(val, Ordering::Relaxed);
    }

    pub fn set(&self, val: u64) {
        self.0.store(val, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Global metrics registry for the translator.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    // Traffic, split by direction.
    pub packets_6to4: Counter,
    pub bytes_6to4: Counter,
    pub packets_4to6: Counter,
    pub bytes_4to6: Counter,

    // Drops, split by direction.
    pub dropped_6to4: Counter,
    pub dropped_4to6: Counter,
    pub no_mapping_drops: Counter,

    // Gauges.
    pub active_mappings: AtomicU64,
    pub free_addresses: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refreshes every metric from the translator's current counters.
    pub fn observe(&self, translator: &Translator) {
        let totals = translator.counters().total;
        self.packets_6to4.set(totals.packets_6to4);
        self.bytes_6to4.set(totals.bytes_6to4);
        self.packets_4to6.set(totals.packets_4to6);
        self.bytes_4to6.set(totals.bytes_4to6);

        let errors = translator.error_counters();
        self.dropped_6to4.set(errors.total_dropped_6to4());
        self.dropped_4to6.set(errors.total_dropped_4to6());
        self.no_mapping_drops.set(
            errors.get_6to4(DropReason::NoMapping) + errors.get_4to6(DropReason::NoMapping),
        );

        self.active_mappings
            .store(translator.mapping_count() as u64, Ordering::Relaxed);
        self.free_addresses
            .store(translator.available_addresses() as u64, Ordering::Relaxed);
    }

    /// Exports all metrics as key-value pairs, ready for conversion to a
    /// Prometheus-style exposition later.
    pub fn export(&self) -> Vec<(String, u64)> {
        vec![
            ("nat64_packets_6to4".into(), self.packets_6to4.get()),
            ("nat64_bytes_6to4".into(), self.bytes_6to4.get()),
            ("nat64_packets_4to6".into(), self.packets_4to6.get()),
            ("nat64_bytes_4to6".into(), self.bytes_4to6.get()),
            ("nat64_dropped_6to4".into(), self.dropped_6to4.get()),
            ("nat64_dropped_4to6".into(), self.dropped_4to6.get()),
            ("nat64_no_mapping_drops".into(), self.no_mapping_drops.get()),
            (
                "nat64_active_mappings".into(),
                self.active_mappings.load(Ordering::Relaxed),
            ),
            (
                "nat64_free_addresses".into(),
                self.free_addresses.load(Ordering::Relaxed),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nat64::{PortTranslationMode, State, TranslatorConfig};

    #[test]
    fn test_counter_operations() {
        let counter = Counter::new();
        counter.inc();
        counter.add(41);
        assert_eq!(counter.get(), 42);
        counter.set(7);
        assert_eq!(counter.get(), 7);
    }

    #[test]
    fn test_observe_reflects_translator_state() {
        let mut translator = Translator::new(TranslatorConfig {
            max_mappings: 8,
            port_translation: PortTranslationMode::Disabled,
            ..TranslatorConfig::default()
        });
        translator.set_ip4_cidr("192.0.2.0/24".parse().unwrap());
        translator.set_nat64_prefix("64:ff9b::/96".parse().unwrap());
        translator.set_enabled(true);
        assert_eq!(translator.state(), State::Active);

        let registry = MetricsRegistry::new();
        registry.observe(&translator);

        assert_eq!(registry.active_mappings.load(Ordering::Relaxed), 0);
        assert_eq!(registry.free_addresses.load(Ordering::Relaxed), 8);

        let export = registry.export();
        assert!(export
            .iter()
            .any(|(name, value)| name == "nat64_free_addresses" && *value == 8));
    }
}
