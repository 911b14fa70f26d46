//! NAT64 IPv6 prefix and RFC 6052 address embedding.
//!
//! The well-known layout puts the embedded IPv4 address at a position
//! determined by the prefix length; byte 8 (the `u` octet) is always zero
//! and is skipped for the 40/48/56 splits.

use crate::{Error, Result};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// Prefix lengths recognized by RFC 6052.
pub const VALID_LENGTHS: [u8; 6] = [32, 40, 48, 56, 64, 96];

/// An IPv6 prefix marking NAT64-synthesized destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nat64Prefix {
    address: Ipv6Addr,
    length: u8,
}

impl Nat64Prefix {
    pub fn new(address: Ipv6Addr, length: u8) -> Result<Self> {
        if !VALID_LENGTHS.contains(&length) {
            return Err(Error::InvalidArgs(format!(
                "NAT64 prefix length {} not one of {:?}",
                length, VALID_LENGTHS
            )));
        }
        Ok(Self { address, length })
    }

    pub fn address(&self) -> Ipv6Addr {
        self.address
    }

    pub fn length(&self) -> u8 {
        self.length
    }

    /// Whether `addr` falls inside this prefix (first `length` bits match).
    pub fn matches(&self, addr: &Ipv6Addr) -> bool {
        let ours = self.address.octets();
        let theirs = addr.octets();
        let full_bytes = (self.length / 8) as usize;

        if ours[..full_bytes] != theirs[..full_bytes] {
            return false;
        }

        let rem = self.length % 8;
        if rem == 0 {
            return true;
        }
        let mask = 0xFFu8 << (8 - rem);
        (ours[full_bytes] ^ theirs[full_bytes]) & mask == 0
    }
}

impl FromStr for Nat64Prefix {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (addr, len) = s
            .split_once('/')
            .ok_or_else(|| Error::Parse(format!("prefix missing '/': {}", s)))?;
        let address: Ipv6Addr = addr
            .parse()
            .map_err(|_| Error::Parse(format!("invalid IPv6 address: {}", addr)))?;
        let length: u8 = len
            .parse()
            .map_err(|_| Error::Parse(format!("invalid prefix length: {}", len)))?;
        Self::new(address, length)
    }
}

impl fmt::Display for Nat64Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.length)
    }
}

/// Embed `ip4` into `prefix` per RFC 6052 §2.2.
pub fn synthesize_ip6(prefix: &Nat64Prefix, ip4: Ipv4Addr) -> Ipv6Addr {
    let mut bytes = prefix.address().octets();
    let v4 = ip4.octets();

    match prefix.length() {
        32 => bytes[4..8].copy_from_slice(&v4),
        40 => {
            bytes[5..8].copy_from_slice(&v4[..3]);
            bytes[9] = v4[3];
        }
        48 => {
            bytes[6..8].copy_from_slice(&v4[..2]);
            bytes[9..11].copy_from_slice(&v4[2..]);
        }
        56 => {
            bytes[7] = v4[0];
            bytes[9..12].copy_from_slice(&v4[1..]);
        }
        64 => bytes[9..13].copy_from_slice(&v4),
        _ => bytes[12..16].copy_from_slice(&v4), // 96
    }

    bytes[8] = 0; // the u octet
    Ipv6Addr::from(bytes)
}

/// Extract the embedded IPv4 address from `ip6` for a given NAT64 prefix
/// length. Mirror of [`synthesize_ip6`].
pub fn extract_ip4(prefix_length: u8, ip6: &Ipv6Addr) -> Ipv4Addr {
    let bytes = ip6.octets();
    let mut v4 = [0u8; 4];

    match prefix_length {
        32 => v4.copy_from_slice(&bytes[4..8]),
        40 => {
            v4[..3].copy_from_slice(&bytes[5..8]);
            v4[3] = bytes[9];
        }
        48 => {
            v4[..2].copy_from_slice(&bytes[6..8]);
            v4[2..].copy_from_slice(&bytes[9..11]);
        }
        56 => {
            v4[0] = bytes[7];
            v4[1..].copy_from_slice(&bytes[9..12]);
        }
        64 => v4.copy_from_slice(&bytes[9..13]),
        _ => v4.copy_from_slice(&bytes[12..16]), // 96
    }

    Ipv4Addr::from(v4)
}
