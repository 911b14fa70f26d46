//! nat64r - Userspace NAT64 Translator
//!
//! A stateful IPv6/IPv4 translator (RFC 6146 style) with RFC 6052 address
//! synthesis, a fixed-capacity mapping table, and optional port translation.

pub mod config;
pub mod error;
pub mod nat64;
pub mod protocol;
pub mod telemetry;

pub use error::{Error, Result};
