//! IPv4 CIDR block used to provision the translator's address pool.

use crate::{Error, Result};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// An IPv4 prefix with length 1..=32 (e.g. `192.0.2.0/24`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ip4Cidr {
    address: Ipv4Addr,
    length: u8,
}

impl Ip4Cidr {
    pub fn new(address: Ipv4Addr, length: u8) -> Result<Self> {
        if length == 0 || length > 32 {
            return Err(Error::InvalidArgs(format!(
                "CIDR prefix length {} out of range 1..=32",
                length
            )));
        }
        Ok(Self { address, length })
    }

    pub fn address(&self) -> Ipv4Addr {
        self.address
    }

    pub fn length(&self) -> u8 {
        self.length
    }

    /// Mask covering the host bits. `/32` is valid, so shift via u64.
    pub fn host_mask(&self) -> u32 {
        (0xFFFF_FFFFu64 >> self.length) as u32
    }

    pub fn subnet_mask(&self) -> u32 {
        !self.host_mask()
    }

    /// Network part of the configured address, in host byte order.
    pub fn network(&self) -> u32 {
        u32::from(self.address) & self.subnet_mask()
    }

    /// Address formed from the network part plus `host` (masked to the
    /// host bits).
    pub fn address_at(&self, host: u32) -> Ipv4Addr {
        Ipv4Addr::from(self.network() | (host & self.host_mask()))
    }
}

impl FromStr for Ip4Cidr {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (addr, len) = s
            .split_once('/')
            .ok_or_else(|| Error::Parse(format!("CIDR missing '/': {}", s)))?;
        let address: Ipv4Addr = addr
            .parse()
            .map_err(|_| Error::Parse(format!("invalid IPv4 address: {}", addr)))?;
        let length: u8 = len
            .parse()
            .map_err(|_| Error::Parse(format!("invalid prefix length: {}", len)))?;
        Self::new(address, length)
    }
}

impl fmt::Display for Ip4Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.length)
    }
}
