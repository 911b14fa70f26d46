//! ICMPv6 message access - RFC 4443
//!
//! Unlike ICMPv4, the ICMPv6 checksum covers an IPv6 pseudo-header.

use super::checksum;
use crate::{Error, Result};
use std::net::Ipv6Addr;

pub const HEADER_SIZE: usize = 8;

pub const ECHO_REQUEST: u8 = 128;
pub const ECHO_REPLY: u8 = 129;

const CHECKSUM_OFFSET: usize = 2;

/// Mutable view of an ICMPv6 message.
#[derive(Debug)]
pub struct Icmpv6Message<'a> {
    buffer: &'a mut [u8],
}

impl<'a> Icmpv6Message<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Result<Self> {
        if buffer.len() < HEADER_SIZE {
            return Err(Error::Parse("ICMPv6 message too short".into()));
        }
        Ok(Self { buffer })
    }

    pub fn msg_type(&self) -> u8 {
        self.buffer[0]
    }

    pub fn set_msg_type(&mut self, value: u8) {
        self.buffer[0] = value;
    }

    pub fn is_echo_request(&self) -> bool {
        self.msg_type() == ECHO_REQUEST
    }

    pub fn is_echo_reply(&self) -> bool {
        self.msg_type() == ECHO_REPLY
    }

    pub fn identifier(&self) -> u16 {
        u16::from_be_bytes([self.buffer[4], self.buffer[5]])
    }

    pub fn set_identifier(&mut self, id: u16) {
        self.buffer[4..6].copy_from_slice(&id.to_be_bytes());
    }

    pub fn update_checksum(&mut self, src: &Ipv6Addr, dst: &Ipv6Addr) {
        self.buffer[CHECKSUM_OFFSET..CHECKSUM_OFFSET + 2].fill(0);
        let sum = checksum::transport_checksum_v6(src, dst, 58, self.buffer);
        self.buffer[CHECKSUM_OFFSET..CHECKSUM_OFFSET + 2].copy_from_slice(&sum.to_be_bytes());
    }
}

/// Build an ICMPv6 echo message with a valid checksum. Test helper.
pub fn build_echo(
    src: &Ipv6Addr,
    dst: &Ipv6Addr,
    msg_type: u8,
    identifier: u16,
    sequence: u16,
    payload: &[u8],
) -> Vec<u8> {
    let mut buf = vec![0u8; HEADER_SIZE + payload.len()];
    buf[0] = msg_type;
    buf[4..6].copy_from_slice(&identifier.to_be_bytes());
    buf[6..8].copy_from_slice(&sequence.to_be_bytes());
    buf[HEADER_SIZE..].copy_from_slice(payload);

    let sum = checksum::transport_checksum_v6(src, dst, 58, &buf);
    buf[CHECKSUM_OFFSET..CHECKSUM_OFFSET + 2].copy_from_slice(&sum.to_be_bytes());
    buf
}
