//! Wire-format handling for the translator datapath.
//!
//! Each protocol module provides a borrowed parse view and the mutation
//! helpers the NAT64 rewrite path needs. Header construction is done by
//! encoding a fixed-size header and prepending it to a [`PacketBuffer`].

pub mod checksum;
pub mod icmp;
pub mod icmpv6;
pub mod ipv4;
pub mod ipv6;
pub mod packet;
pub mod tcp;
pub mod udp;

pub use packet::PacketBuffer;

/// IP protocol numbers (IPv4 protocol field / IPv6 next header).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum IpProto {
    Icmp = 1,
    Tcp = 6,
    Udp = 17,
    Icmpv6 = 58,
}

impl IpProto {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(IpProto::Icmp),
            6 => Some(IpProto::Tcp),
            17 => Some(IpProto::Udp),
            58 => Some(IpProto::Icmpv6),
            _ => None,
        }
    }
}
