//! TCP header access for the NAT64 rewrite path - RFC 793
//!
//! Only the fields the translator touches: ports and checksum. Sequence
//! numbers, flags, and options pass through untouched.

use super::checksum;
use crate::{Error, Result};
use std::net::{Ipv4Addr, Ipv6Addr};

pub const MIN_HEADER_SIZE: usize = 20;

const CHECKSUM_OFFSET: usize = 16;

/// Mutable view of a TCP segment (header + payload).
#[derive(Debug)]
pub struct TcpSegment<'a> {
    buffer: &'a mut [u8],
}

impl<'a> TcpSegment<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Result<Self> {
        if buffer.len() < MIN_HEADER_SIZE {
            return Err(Error::Parse("TCP header too short".into()));
        }
        Ok(Self { buffer })
    }

    pub fn src_port(&self) -> u16 {
        u16::from_be_bytes([self.buffer[0], self.buffer[1]])
    }

    pub fn dst_port(&self) -> u16 {
        u16::from_be_bytes([self.buffer[2], self.buffer[3]])
    }

    pub fn set_src_port(&mut self, port: u16) {
        self.buffer[0..2].copy_from_slice(&port.to_be_bytes());
    }

    pub fn set_dst_port(&mut self, port: u16) {
        self.buffer[2..4].copy_from_slice(&port.to_be_bytes());
    }

    pub fn update_checksum_v4(&mut self, src: Ipv4Addr, dst: Ipv4Addr) {
        self.buffer[CHECKSUM_OFFSET..CHECKSUM_OFFSET + 2].fill(0);
        let sum = checksum::transport_checksum_v4(src, dst, 6, self.buffer);
        self.buffer[CHECKSUM_OFFSET..CHECKSUM_OFFSET + 2].copy_from_slice(&sum.to_be_bytes());
    }

    pub fn update_checksum_v6(&mut self, src: &Ipv6Addr, dst: &Ipv6Addr) {
        self.buffer[CHECKSUM_OFFSET..CHECKSUM_OFFSET + 2].fill(0);
        let sum = checksum::transport_checksum_v6(src, dst, 6, self.buffer);
        self.buffer[CHECKSUM_OFFSET..CHECKSUM_OFFSET + 2].copy_from_slice(&sum.to_be_bytes());
    }
}

/// Build a minimal SYN segment with a checksum valid for an IPv6
/// pseudo-header. Test helper.
pub fn build_v6(src: &Ipv6Addr, dst: &Ipv6Addr, src_port: u16, dst_port: u16) -> Vec<u8> {
    let mut buf = vec![0u8; MIN_HEADER_SIZE];
    buf[0..2].copy_from_slice(&src_port.to_be_bytes());
    buf[2..4].copy_from_slice(&dst_port.to_be_bytes());
    buf[12] = 0x50; // data offset 5
    buf[13] = 0x02; // SYN
    buf[14..16].copy_from_slice(&0x7210u16.to_be_bytes()); // window

    let sum = checksum::transport_checksum_v6(src, dst, 6, &buf);
    buf[CHECKSUM_OFFSET..CHECKSUM_OFFSET + 2].copy_from_slice(&sum.to_be_bytes());
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_rewrite_and_checksum() {
        let src: Ipv6Addr = "2001:db8::5".parse().unwrap();
        let dst: Ipv6Addr = "64:ff9b::c000:201".parse().unwrap();
        let mut buf = build_v6(&src, &dst, 9999, 443);

        assert_eq!(checksum::transport_checksum_v6(&src, &dst, 6, &buf), 0);

        let mut seg = TcpSegment::new(&mut buf).unwrap();
        assert_eq!(seg.src_port(), 9999);
        assert_eq!(seg.dst_port(), 443);

        seg.set_src_port(50001);
        let v4_src = Ipv4Addr::new(192, 0, 2, 9);
        let v4_dst = Ipv4Addr::new(192, 0, 2, 1);
        seg.update_checksum_v4(v4_src, v4_dst);
        assert_eq!(checksum::transport_checksum_v4(v4_src, v4_dst, 6, &buf), 0);
    }

    #[test]
    fn test_too_short() {
        let mut buf = [0u8; 19];
        assert!(TcpSegment::new(&mut buf).is_err());
    }
}
