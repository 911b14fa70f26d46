//! Stateful NAT64 translation (RFC 6146 style) with RFC 6052 address
//! embedding.

pub mod address_pool;
pub mod cidr;
pub mod counters;
pub mod mapping;
pub mod prefix;
pub mod translator;

pub use address_pool::AddressPool;
pub use cidr::Ip4Cidr;
pub use counters::{Counters, DropReason, ErrorCounters, ProtocolCounters};
pub use mapping::{Mapping, MappingCursor, MappingHandle, MappingPool, MappingTable};
pub use prefix::{extract_ip4, synthesize_ip6, Nat64Prefix};
pub use translator::{
    AddressMapping, Outcome, PortTranslationMode, SendResult, State, Translator, TranslatorConfig,
    DEFAULT_ICMP_TIMEOUT, DEFAULT_IDLE_TIMEOUT, DEFAULT_MAX_MAPPINGS,
};
