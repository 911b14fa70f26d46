//! UDP header access for the NAT64 rewrite path - RFC 768

use super::checksum;
use crate::{Error, Result};
use std::net::{Ipv4Addr, Ipv6Addr};

pub const HEADER_SIZE: usize = 8;

const CHECKSUM_OFFSET: usize = 6;

/// Mutable view of a UDP segment (header + payload).
#[derive(Debug)]
pub struct UdpSegment<'a> {
    buffer: &'a mut [u8],
}

impl<'a> UdpSegment<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Result<Self> {
        if buffer.len() < HEADER_SIZE {
            return Err(Error::Parse("UDP header too short".into()));
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

    pub fn length(&self) -> u16 {
        u16::from_be_bytes([self.buffer[4], self.buffer[5]])
    }

    /// Recompute the checksum against an IPv4 pseudo-header.
    /// A computed value of 0 is transmitted as 0xFFFF (0 means "no checksum").
    pub fn update_checksum_v4(&mut self, src: Ipv4Addr, dst: Ipv4Addr) {
        self.buffer[CHECKSUM_OFFSET..CHECKSUM_OFFSET + 2].fill(0);
        let sum = checksum::transport_checksum_v4(src, dst, 17, self.buffer);
        let sum = if sum == 0 { 0xFFFF } else { sum };
        self.buffer[CHECKSUM_OFFSET..CHECKSUM_OFFSET + 2].copy_from_slice(&sum.to_be_bytes());
    }

    /// Recompute the checksum against an IPv6 pseudo-header. The checksum
    /// is mandatory for UDP over IPv6, so 0 maps to 0xFFFF here as well.
    pub fn update_checksum_v6(&mut self, src: &Ipv6Addr, dst: &Ipv6Addr) {
        self.buffer[CHECKSUM_OFFSET..CHECKSUM_OFFSET + 2].fill(0);
        let sum = checksum::transport_checksum_v6(src, dst, 17, self.buffer);
        let sum = if sum == 0 { 0xFFFF } else { sum };
        self.buffer[CHECKSUM_OFFSET..CHECKSUM_OFFSET + 2].copy_from_slice(&sum.to_be_bytes());
    }
}

/// Build a UDP datagram with a checksum valid for an IPv6 pseudo-header.
/// Test helper for constructing translator input.
pub fn build_v6(
    src: &Ipv6Addr,
    dst: &Ipv6Addr,
    src_port: u16,
    dst_port: u16,
    payload: &[u8],
) -> Vec<u8> {
    let length = (HEADER_SIZE + payload.len()) as u16;
    let mut buf = vec![0u8; HEADER_SIZE + payload.len()];
    buf[0..2].copy_from_slice(&src_port.to_be_bytes());
    buf[2..4].copy_from_slice(&dst_port.to_be_bytes());
    buf[4..6].copy_from_slice(&length.to_be_bytes());
    buf[HEADER_SIZE..].copy_from_slice(payload);

    let sum = checksum::transport_checksum_v6(src, dst, 17, &buf);
    let sum = if sum == 0 { 0xFFFF } else { sum };
    buf[CHECKSUM_OFFSET..CHECKSUM_OFFSET + 2].copy_from_slice(&sum.to_be_bytes());
    buf
}

/// Build a UDP datagram with a checksum valid for an IPv4 pseudo-header.
pub fn build_v4(
    src: Ipv4Addr,
    dst: Ipv4Addr,
    src_port: u16,
    dst_port: u16,
    payload: &[u8],
) -> Vec<u8> {
    let length = (HEADER_SIZE + payload.len()) as u16;
    let mut buf = vec![0u8; HEADER_SIZE + payload.len()];
    buf[0..2].copy_from_slice(&src_port.to_be_bytes());
    buf[2..4].copy_from_slice(&dst_port.to_be_bytes());
    buf[4..6].copy_from_slice(&length.to_be_bytes());
    buf[HEADER_SIZE..].copy_from_slice(payload);

    let sum = checksum::transport_checksum_v4(src, dst, 17, &buf);
    let sum = if sum == 0 { 0xFFFF } else { sum };
    buf[CHECKSUM_OFFSET..CHECKSUM_OFFSET + 2].copy_from_slice(&sum.to_be_bytes());
    buf
}
