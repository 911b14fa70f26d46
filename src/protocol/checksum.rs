//! Internet checksum - RFC 1071
//!
//! One's complement sums for IP headers and transport pseudo-headers.
//! Both address families are covered since NAT64 recomputes the transport
//! checksum against the pseudo-header of the *new* IP version.

use std::net::{Ipv4Addr, Ipv6Addr};

/// Accumulate 16-bit big-endian words of `data` into a running sum.
/// An odd trailing byte is padded with zero.
pub fn accumulate(mut sum: u32, data: &[u8]) -> u32 {
    let mut chunks = data.chunks_exact(2);
    for chunk in &mut chunks {
        sum = sum.wrapping_add(u16::from_be_bytes([chunk[0], chunk[1]]) as u32);
    }
    if let [last] = chunks.remainder() {
        sum = sum.wrapping_add(u16::from_be_bytes([*last, 0]) as u32);
    }
    sum
}

/// Fold a 32-bit running sum to 16 bits and complement it.
pub fn finish(mut sum: u32) -> u16 {
    while sum >> 16 != 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }
    !(sum as u16)
}

/// Checksum over a plain byte range (IPv4 header, ICMPv4 message).
pub fn checksum(data: &[u8]) -> u16 {
    finish(accumulate(0, data))
}

/// Running sum of the IPv4 pseudo-header (RFC 768 / RFC 793).
pub fn pseudo_header_v4(src: Ipv4Addr, dst: Ipv4Addr, proto: u8, length: u16) -> u32 {
    let mut sum = accumulate(0, &src.octets());
    sum = accumulate(sum, &dst.octets());
    sum = sum.wrapping_add(proto as u32);
    sum.wrapping_add(length as u32)
}

/// Running sum of the IPv6 pseudo-header (RFC 8200 §8.1).
pub fn pseudo_header_v6(src: &Ipv6Addr, dst: &Ipv6Addr, proto: u8, length: u32) -> u32 {
    let mut sum = accumulate(0, &src.octets());
    sum = accumulate(sum, &dst.octets());
    sum = sum.wrapping_add(length >> 16);
    sum = sum.wrapping_add(length & 0xFFFF);
    sum.wrapping_add(proto as u32)
}

/// Transport checksum over `segment` with an IPv4 pseudo-header.
///
/// The checksum field inside `segment` must be zeroed by the caller; when
/// it is left in place the result is 0 for a valid segment (self-check).
pub fn transport_checksum_v4(src: Ipv4Addr, dst: Ipv4Addr, proto: u8, segment: &[u8]) -> u16 {
    finish(accumulate(
        pseudo_header_v4(src, dst, proto, segment.len() as u16),
        segment,
    ))
}

/// Transport checksum over `segment` with an IPv6 pseudo-header.
pub fn transport_checksum_v6(src: &Ipv6Addr, dst: &Ipv6Addr, proto: u8, segment: &[u8]) -> u16 {
    finish(accumulate(
        pseudo_header_v6(src, dst, proto, segment.len() as u32),
        segment,
    ))
}
