//! IPv4 header parsing and encoding - RFC 791

use super::checksum;
use crate::{Error, Result};
use std::net::Ipv4Addr;

/// Minimum IPv4 header size (without options).
pub const MIN_HEADER_SIZE: usize = 20;

/// Parsed IPv4 header (zero-copy reference).
#[derive(Debug)]
pub struct Ipv4View<'a> {
    buffer: &'a [u8],
    header_len: usize,
}

impl<'a> Ipv4View<'a> {
    pub fn parse(buffer: &'a [u8]) -> Result<Self> {
        if buffer.len() < MIN_HEADER_SIZE {
            return Err(Error::Parse("IPv4 header too short".into()));
        }

        if buffer[0] >> 4 != 4 {
            return Err(Error::Parse("not an IPv4 packet".into()));
        }

        let header_len = ((buffer[0] & 0x0F) as usize) * 4;
        if header_len < MIN_HEADER_SIZE || buffer.len() < header_len {
            return Err(Error::Parse("IPv4 header truncated".into()));
        }

        let total_length = u16::from_be_bytes([buffer[2], buffer[3]]) as usize;
        if total_length < header_len || total_length > buffer.len() {
            return Err(Error::Parse("IPv4 total length inconsistent".into()));
        }

        Ok(Self { buffer, header_len })
    }

    pub fn dscp_ecn(&self) -> u8 {
        self.buffer[1]
    }

    pub fn total_length(&self) -> u16 {
        u16::from_be_bytes([self.buffer[2], self.buffer[3]])
    }

    pub fn fragment_offset(&self) -> u16 {
        u16::from_be_bytes([self.buffer[6] & 0x1F, self.buffer[7]])
    }

    pub fn more_fragments(&self) -> bool {
        self.buffer[6] & 0x20 != 0
    }

    /// A fragment other than the first (or a non-final fragment).
    pub fn is_fragment(&self) -> bool {
        self.more_fragments() || self.fragment_offset() > 0
    }

    pub fn ttl(&self) -> u8 {
        self.buffer[8]
    }

    pub fn protocol(&self) -> u8 {
        self.buffer[9]
    }

    pub fn src_addr(&self) -> Ipv4Addr {
        Ipv4Addr::new(
            self.buffer[12],
            self.buffer[13],
            self.buffer[14],
            self.buffer[15],
        )
    }

    pub fn dst_addr(&self) -> Ipv4Addr {
        Ipv4Addr::new(
            self.buffer[16],
            self.buffer[17],
            self.buffer[18],
            self.buffer[19],
        )
    }

    pub fn header_len(&self) -> usize {
        self.header_len
    }

    pub fn payload(&self) -> &[u8] {
        &self.buffer[self.header_len..self.total_length() as usize]
    }

    pub fn validate_checksum(&self) -> bool {
        checksum::checksum(&self.buffer[..self.header_len]) == 0
    }
}

/// IPv4 header fields for encoding. Always emits a 20-byte header
/// (no options) with the Don't Fragment flag set and a valid checksum.
#[derive(Debug, Clone)]
pub struct Ipv4Header {
    pub dscp_ecn: u8,
    pub identification: u16,
    pub ttl: u8,
    pub protocol: u8,
    pub src: Ipv4Addr,
    pub dst: Ipv4Addr,
    pub payload_len: u16,
}

impl Ipv4Header {
    pub fn encode(&self) -> [u8; MIN_HEADER_SIZE] {
        let mut buf = [0u8; MIN_HEADER_SIZE];
        let total_length = MIN_HEADER_SIZE as u16 + self.payload_len;

        buf[0] = 0x45; // version 4, IHL 5
        buf[1] = self.dscp_ecn;
        buf[2..4].copy_from_slice(&total_length.to_be_bytes());
        buf[4..6].copy_from_slice(&self.identification.to_be_bytes());
        buf[6] = 0x40; // DF
        buf[8] = self.ttl;
        buf[9] = self.protocol;
        buf[12..16].copy_from_slice(&self.src.octets());
        buf[16..20].copy_from_slice(&self.dst.octets());

        let sum = checksum::checksum(&buf);
        buf[10..12].copy_from_slice(&sum.to_be_bytes());
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header() -> Ipv4Header {
        Ipv4Header {
            dscp_ecn: 0,
            identification: 0x1234,
            ttl: 63,
            protocol: 17,
            src: Ipv4Addr::new(192, 0, 2, 1),
            dst: Ipv4Addr::new(198, 51, 100, 7),
            payload_len: 12,
        }
    }

    #[test]
    fn test_encode_parse_roundtrip() {
        let mut packet = sample_header().encode().to_vec();
        packet.extend_from_slice(&[0u8; 12]);

        let view = Ipv4View::parse(&packet).unwrap();
        assert_eq!(view.header_len(), 20);
        assert_eq!(view.total_length(), 32);
        assert_eq!(view.ttl(), 63);
        assert_eq!(view.protocol(), 17);
        assert_eq!(view.src_addr(), Ipv4Addr::new(192, 0, 2, 1));
        assert_eq!(view.dst_addr(), Ipv4Addr::new(198, 51, 100, 7));
        assert_eq!(view.payload().len(), 12);
        assert!(view.validate_checksum());
        assert!(!view.is_fragment());
    }

    #[test]
    fn test_parse_too_short() {
        assert!(Ipv4View::parse(&[0u8; 19]).is_err());
    }

    #[test]
    fn test_parse_wrong_version() {
        let mut packet = sample_header().encode().to_vec();
        packet.extend_from_slice(&[0u8; 12]);
        packet[0] = 0x65;
        assert!(Ipv4View::parse(&packet).is_err());
    }

    #[test]
    fn test_parse_bad_total_length() {
        let mut packet = sample_header().encode().to_vec();
        packet.extend_from_slice(&[0u8; 12]);
        packet[2..4].copy_from_slice(&100u16.to_be_bytes());
        assert!(Ipv4View::parse(&packet).is_err());
    }

    #[test]
    fn test_parse_truncated_options() {
        let mut packet = sample_header().encode().to_vec();
        packet[0] = 0x4F; // IHL 15 = 60 bytes
        assert!(Ipv4View::parse(&packet).is_err());
    }

    #[test]
    fn test_corrupt_checksum_detected() {
        let mut packet = sample_header().encode().to_vec();
        packet.extend_from_slice(&[0u8; 12]);
        packet[10] ^= 0xFF;
        let view = Ipv4View::parse(&packet).unwrap();
        assert!(!view.validate_checksum());
    }
}
