//! IPv6 header parsing and encoding - RFC 8200

use crate::{Error, Result};
use std::net::Ipv6Addr;

/// IPv6 header size (fixed, no extension headers handled here).
pub const HEADER_SIZE: usize = 40;

/// Parsed IPv6 header (zero-copy reference).
#[derive(Debug)]
pub struct Ipv6View<'a> {
    buffer: &'a [u8],
}

impl<'a> Ipv6View<'a> {
    pub fn parse(buffer: &'a [u8]) -> Result<Self> {
        if buffer.len() < HEADER_SIZE {
            return Err(Error::Parse("IPv6 header too short".into()));
        }

        if buffer[0] >> 4 != 6 {
            return Err(Error::Parse("not an IPv6 packet".into()));
        }

        let payload_length = u16::from_be_bytes([buffer[4], buffer[5]]) as usize;
        if buffer.len() < HEADER_SIZE + payload_length {
            return Err(Error::Parse("IPv6 payload truncated".into()));
        }

        Ok(Self { buffer })
    }

    pub fn traffic_class(&self) -> u8 {
        (self.buffer[0] << 4) | (self.buffer[1] >> 4)
    }

    pub fn payload_length(&self) -> u16 {
        u16::from_be_bytes([self.buffer[4], self.buffer[5]])
    }

    pub fn next_header(&self) -> u8 {
        self.buffer[6]
    }

    pub fn hop_limit(&self) -> u8 {
        self.buffer[7]
    }

    pub fn src_addr(&self) -> Ipv6Addr {
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&self.buffer[8..24]);
        Ipv6Addr::from(bytes)
    }

    pub fn dst_addr(&self) -> Ipv6Addr {
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&self.buffer[24..40]);
        Ipv6Addr::from(bytes)
    }

    pub fn payload(&self) -> &[u8] {
        &self.buffer[HEADER_SIZE..HEADER_SIZE + self.payload_length() as usize]
    }
}

/// IPv6 header fields for encoding.
#[derive(Debug, Clone)]
pub struct Ipv6Header {
    pub traffic_class: u8,
    pub flow_label: u32,
    pub payload_len: u16,
    pub next_header: u8,
    pub hop_limit: u8,
    pub src: Ipv6Addr,
    pub dst: Ipv6Addr,
}

impl Ipv6Header {
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        let flow = self.flow_label & 0xFFFFF;

        buf[0] = 0x60 | (self.traffic_class >> 4);
        buf[1] = (self.traffic_class << 4) | ((flow >> 16) as u8);
        buf[2] = (flow >> 8) as u8;
        buf[3] = flow as u8;
        buf[4..6].copy_from_slice(&self.payload_len.to_be_bytes());
        buf[6] = self.next_header;
        buf[7] = self.hop_limit;
        buf[8..24].copy_from_slice(&self.src.octets());
        buf[24..40].copy_from_slice(&self.dst.octets());
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header() -> Ipv6Header {
        Ipv6Header {
            traffic_class: 0x12,
            flow_label: 0xABCDE,
            payload_len: 8,
            next_header: 17,
            hop_limit: 64,
            src: "2001:db8::1".parse().unwrap(),
            dst: "64:ff9b::c000:201".parse().unwrap(),
        }
    }

    #[test]
    fn test_encode_parse_roundtrip() {
        let mut packet = sample_header().encode().to_vec();
        packet.extend_from_slice(&[0u8; 8]);

        let view = Ipv6View::parse(&packet).unwrap();
        assert_eq!(view.traffic_class(), 0x12);
        assert_eq!(view.payload_length(), 8);
        assert_eq!(view.next_header(), 17);
        assert_eq!(view.hop_limit(), 64);
        assert_eq!(view.src_addr(), "2001:db8::1".parse::<Ipv6Addr>().unwrap());
        assert_eq!(
            view.dst_addr(),
            "64:ff9b::c000:201".parse::<Ipv6Addr>().unwrap()
        );
        assert_eq!(view.payload().len(), 8);
    }

    #[test]
    fn test_parse_too_short() {
        assert!(Ipv6View::parse(&[0u8; 39]).is_err());
    }

    #[test]
    fn test_parse_wrong_version() {
        let mut packet = sample_header().encode().to_vec();
        packet.extend_from_slice(&[0u8; 8]);
        packet[0] = 0x45;
        assert!(Ipv6View::parse(&packet).is_err());
    }

    #[test]
    fn test_parse_truncated_payload() {
        let packet = sample_header().encode().to_vec();
        // payload_len says 8 but no payload bytes follow
        assert!(Ipv6View::parse(&packet).is_err());
    }
}
