//! ICMPv4 message access - RFC 792
//!
//! The translator only rewrites Echo messages; everything else is
//! reported as unsupported by the caller.

use super::checksum;
use crate::{Error, Result};

pub const HEADER_SIZE: usize = 8;

pub const ECHO_REPLY: u8 = 0;
pub const ECHO_REQUEST: u8 = 8;

const CHECKSUM_OFFSET: usize = 2;

/// Mutable view of an ICMPv4 message.
#[derive(Debug)]
pub struct IcmpMessage<'a> {
    buffer: &'a mut [u8],
}

impl<'a> IcmpMessage<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Result<Self> {
        if buffer.len() < HEADER_SIZE {
            return Err(Error::Parse("ICMP message too short".into()));
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

    /// Echo identifier (only meaningful for Echo Request/Reply).
    pub fn identifier(&self) -> u16 {
        u16::from_be_bytes([self.buffer[4], self.buffer[5]])
    }

    pub fn set_identifier(&mut self, id: u16) {
        self.buffer[4..6].copy_from_slice(&id.to_be_bytes());
    }

    /// Recompute the checksum over the whole message. ICMPv4 has no
    /// pseudo-header.
    pub fn update_checksum(&mut self) {
        self.buffer[CHECKSUM_OFFSET..CHECKSUM_OFFSET + 2].fill(0);
        let sum = checksum::checksum(self.buffer);
        self.buffer[CHECKSUM_OFFSET..CHECKSUM_OFFSET + 2].copy_from_slice(&sum.to_be_bytes());
    }
}

/// Build an ICMPv4 echo message. Test helper.
pub fn build_echo(msg_type: u8, identifier: u16, sequence: u16, payload: &[u8]) -> Vec<u8> {
    let mut buf = vec![0u8; HEADER_SIZE + payload.len()];
    buf[0] = msg_type;
    buf[4..6].copy_from_slice(&identifier.to_be_bytes());
    buf[6..8].copy_from_slice(&sequence.to_be_bytes());
    buf[HEADER_SIZE..].copy_from_slice(payload);

    let sum = checksum::checksum(&buf);
    buf[CHECKSUM_OFFSET..CHECKSUM_OFFSET + 2].copy_from_slice(&sum.to_be_bytes());
    buf
}
