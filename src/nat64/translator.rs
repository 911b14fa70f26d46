//! The stateful NAT64 translator.
//!
//! Owns the address pool and mapping table and implements the two
//! in-place translation paths plus the sweep-based expiry. IPv6 to IPv4
//! traffic originates sessions; the reverse path only matches existing
//! ones. All translation is synchronous and per-packet atomic, so a
//! single owner driving it from one task needs no locking.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::ops::RangeInclusive;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace};

use crate::protocol::icmp::IcmpMessage;
use crate::protocol::icmpv6::Icmpv6Message;
use crate::protocol::ipv4::{Ipv4Header, Ipv4View};
use crate::protocol::ipv6::{Ipv6Header, Ipv6View};
use crate::protocol::tcp::TcpSegment;
use crate::protocol::udp::UdpSegment;
use crate::protocol::{icmp, icmpv6, ipv6, tcp, udp, IpProto, PacketBuffer};

use super::address_pool::AddressPool;
use super::cidr::Ip4Cidr;
use super::counters::{DropReason, ErrorCounters, ProtocolCounters, TransportClass};
use super::mapping::{Mapping, MappingHandle, MappingPool, MappingTable};
use super::prefix::{self, Nat64Prefix};

/// Dynamic/private port range used for translated ports and ICMP ids.
pub const DYNAMIC_PORT_MIN: u16 = 49152;
pub const DYNAMIC_PORT_MAX: u16 = 65535;
const PORT_ALLOCATION_TRIES: usize = 100;

pub const DEFAULT_MAX_MAPPINGS: usize = 254;
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(7200);
pub const DEFAULT_ICMP_TIMEOUT: Duration = Duration::from_secs(60);

/// Administrative and configuration state of the translator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Administratively off; both paths refuse all packets.
    Disabled,
    /// Enabled but missing a valid CIDR or NAT64 prefix.
    NotRunning,
    /// Enabled with both a CIDR and a NAT64 prefix configured.
    Active,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            State::Disabled => "disabled",
            State::NotRunning => "not_running",
            State::Active => "active",
        };
        f.write_str(s)
    }
}

/// Whether transport ports (and ICMP identifiers) are rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortTranslationMode {
    /// Sessions are keyed by IPv6 address only; ports pass through.
    Disabled,
    /// Sessions are keyed by address and port; a fresh port from the
    /// dynamic range replaces the source port on the IPv4 side.
    Enabled,
}

#[derive(Debug, Clone)]
pub struct TranslatorConfig {
    pub max_mappings: usize,
    pub idle_timeout: Duration,
    pub icmp_timeout: Duration,
    pub port_translation: PortTranslationMode,
    /// Range translated ports are sampled from. Narrowing it is only
    /// useful for exercising port exhaustion.
    pub dynamic_port_range: RangeInclusive<u16>,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        TranslatorConfig {
            max_mappings: DEFAULT_MAX_MAPPINGS,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            icmp_timeout: DEFAULT_ICMP_TIMEOUT,
            port_translation: PortTranslationMode::Disabled,
            dynamic_port_range: DYNAMIC_PORT_MIN..=DYNAMIC_PORT_MAX,
        }
    }
}

/// Result of an in-place translation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Packet was rewritten in place; forward it.
    Forward,
    /// Not a NAT64 packet; caller forwards the original unmodified.
    NotTranslated,
    /// Packet must be discarded.
    Drop(DropReason),
}

/// Result codes surfaced by [`Translator::send_message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendResult {
    Sent,
    Drop,
    NoBufs,
    NoRoute,
    /// The supplied packet is neither valid IPv4 nor IPv6.
    Parse,
}

/// Read-only snapshot of one active mapping.
#[derive(Debug, Clone)]
pub struct AddressMapping {
    pub id: u64,
    pub ip6: Ipv6Addr,
    pub ip4: Ipv4Addr,
    pub source_port: u16,
    pub translated_port: u16,
    pub remaining_ms: u64,
    pub counters: ProtocolCounters,
}

pub struct Translator {
    config: TranslatorConfig,
    enabled: bool,
    state: State,
    cidr: Option<Ip4Cidr>,
    prefix: Option<Nat64Prefix>,
    address_pool: AddressPool,
    pool: MappingPool,
    table: MappingTable,
    next_id: u64,
    rng: StdRng,
    counters: ProtocolCounters,
    errors: ErrorCounters,
}

impl Translator {
    pub fn new(config: TranslatorConfig) -> Self {
        let capacity = config.max_mappings;
        Translator {
            config,
            enabled: false,
            state: State::Disabled,
            cidr: None,
            prefix: None,
            address_pool: AddressPool::new(capacity),
            pool: MappingPool::new(capacity),
            table: MappingTable::new(),
            next_id: 1,
            rng: StdRng::from_entropy(),
            counters: ProtocolCounters::default(),
            errors: ErrorCounters::default(),
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn ip4_cidr(&self) -> Option<Ip4Cidr> {
        self.cidr
    }

    pub fn nat64_prefix(&self) -> Option<Nat64Prefix> {
        self.prefix
    }

    pub fn counters(&self) -> &ProtocolCounters {
        &self.counters
    }

    pub fn error_counters(&self) -> &ErrorCounters {
        &self.errors
    }

    pub fn mapping_count(&self) -> usize {
        self.table.len()
    }

    pub fn available_addresses(&self) -> usize {
        self.address_pool.available()
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        self.update_state();
    }

    /// Installs the IPv4 pool CIDR. Setting the value already in place is
    /// a no-op; a different CIDR invalidates every active mapping and
    /// rebuilds the address pool.
    pub fn set_ip4_cidr(&mut self, cidr: Ip4Cidr) {
        if self.cidr == Some(cidr) {
            return;
        }
        self.release_all_mappings();
        self.address_pool.configure(&cidr);
        info!(cidr = %cidr, "NAT64 pool CIDR configured");
        self.cidr = Some(cidr);
        self.update_state();
    }

    pub fn clear_ip4_cidr(&mut self) {
        if self.cidr.is_none() {
            return;
        }
        self.cidr = None;
        self.update_state();
    }

    /// Installs the NAT64 prefix. Unlike a CIDR change this keeps
    /// existing mappings; only the synthesized source addresses change.
    pub fn set_nat64_prefix(&mut self, prefix: Nat64Prefix) {
        if self.prefix == Some(prefix) {
            return;
        }
        info!(prefix = %prefix, "NAT64 prefix configured");
        self.prefix = Some(prefix);
        self.update_state();
    }

    pub fn clear_nat64_prefix(&mut self) {
        if self.prefix.is_none() {
            return;
        }
        self.prefix = None;
        self.update_state();
    }

    fn update_state(&mut self) {
        let next = if !self.enabled {
            State::Disabled
        } else if self.cidr.is_some() && self.prefix.is_some() {
            State::Active
        } else {
            State::NotRunning
        };
        if next != self.state {
            info!(from = %self.state, to = %next, "NAT64 translator state changed");
            self.state = next;
        }
        if self.state != State::Active {
            self.release_all_mappings();
        }
    }

    fn release_all_mappings(&mut self) {
        let drained = self.table.clear(&mut self.pool);
        if drained.is_empty() {
            return;
        }
        info!(count = drained.len(), "released all NAT64 mappings");
        for mapping in drained {
            self.address_pool.release(mapping.ip4);
        }
    }

    /// Translates an outbound IPv6 packet into IPv4 in place, creating a
    /// session on first sight of the flow.
    pub fn translate_ip6_to_ip4(&mut self, packet: &mut PacketBuffer) -> Outcome {
        if self.state != State::Active {
            return Outcome::NotTranslated;
        }
        let Some(prefix) = self.prefix else {
            return Outcome::NotTranslated;
        };

        let (src6, dst6, hop_limit, traffic_class, next_header, payload_len) =
            match Ipv6View::parse(packet.as_slice()) {
                Ok(view) => (
                    view.src_addr(),
                    view.dst_addr(),
                    view.hop_limit(),
                    view.traffic_class(),
                    view.next_header(),
                    view.payload_length() as usize,
                ),
                Err(_) => return self.drop_6to4(DropReason::IllegalPacket),
            };

        if !prefix.matches(&dst6) {
            return Outcome::NotTranslated;
        }

        let proto = match IpProto::from_u8(next_header) {
            Some(IpProto::Icmp) | None => return self.drop_6to4(DropReason::UnsupportedProto),
            Some(p) => p,
        };

        let payload = &packet.as_slice()[ipv6::HEADER_SIZE..];
        let source_port = match self.source_identity_v6(proto, payload) {
            Ok(port) => port,
            Err(reason) => return self.drop_6to4(reason),
        };

        let now = Instant::now();
        let key_port = self.lookup_port(source_port);
        let handle = match self.table.find_by_ip6(&self.pool, &src6, key_port) {
            Some(handle) => handle,
            None => match self.allocate_mapping(src6, source_port, now) {
                Some(handle) => handle,
                None => return self.drop_6to4(DropReason::NoMapping),
            },
        };

        let timeout = self.timeout_for(proto);
        let (ip4, translated_port) = match self.pool.get_mut(handle) {
            Some(mapping) => {
                mapping.touch(now, timeout);
                (mapping.ip4, mapping.translated_port)
            }
            None => return self.drop_6to4(DropReason::Unknown),
        };

        let dst4 = prefix::extract_ip4(prefix.length(), &dst6);
        let rewrite_ports = self.config.port_translation == PortTranslationMode::Enabled;
        // Link-layer padding past the datagram must not reach the rewrite.
        packet.truncate(ipv6::HEADER_SIZE + payload_len);
        packet.trim_front(ipv6::HEADER_SIZE);

        let protocol = match proto {
            IpProto::Udp => {
                let Ok(mut segment) = UdpSegment::new(packet.as_mut_slice()) else {
                    return self.drop_6to4(DropReason::IllegalPacket);
                };
                if rewrite_ports {
                    segment.set_src_port(translated_port);
                }
                segment.update_checksum_v4(ip4, dst4);
                IpProto::Udp as u8
            }
            IpProto::Tcp => {
                let Ok(mut segment) = TcpSegment::new(packet.as_mut_slice()) else {
                    return self.drop_6to4(DropReason::IllegalPacket);
                };
                if rewrite_ports {
                    segment.set_src_port(translated_port);
                }
                segment.update_checksum_v4(ip4, dst4);
                IpProto::Tcp as u8
            }
            IpProto::Icmpv6 => {
                let Ok(mut message) = IcmpMessage::new(packet.as_mut_slice()) else {
                    return self.drop_6to4(DropReason::IllegalPacket);
                };
                message.set_msg_type(icmp::ECHO_REQUEST);
                if rewrite_ports {
                    message.set_identifier(translated_port);
                }
                message.update_checksum();
                IpProto::Icmp as u8
            }
            IpProto::Icmp => return self.drop_6to4(DropReason::UnsupportedProto),
        };

        let header = Ipv4Header {
            dscp_ecn: traffic_class,
            identification: 0,
            ttl: hop_limit.saturating_sub(1),
            protocol,
            src: ip4,
            dst: dst4,
            payload_len: packet.len() as u16,
        };
        packet.prepend(&header.encode());

        let class = transport_class(proto);
        let bytes = packet.len() as u64;
        if let Some(mapping) = self.pool.get_mut(handle) {
            mapping.counters.count_6to4(class, bytes);
        }
        self.counters.count_6to4(class, bytes);
        trace!(src = %src6, via = %ip4, dst = %dst4, bytes, "translated IPv6->IPv4");
        Outcome::Forward
    }

    /// Translates an inbound IPv4 packet back into IPv6 in place. Never
    /// creates a session; IPv6-looking input passes through untouched.
    pub fn translate_ip4_to_ip6(&mut self, packet: &mut PacketBuffer) -> Outcome {
        if self.state != State::Active {
            return self.drop_4to6(DropReason::Unknown);
        }
        let Some(prefix) = self.prefix else {
            return self.drop_4to6(DropReason::Unknown);
        };

        let parsed = match Ipv4View::parse(packet.as_slice()) {
            Ok(view) => (
                view.src_addr(),
                view.dst_addr(),
                view.ttl(),
                view.dscp_ecn(),
                view.protocol(),
                view.header_len(),
                view.total_length() as usize,
            ),
            Err(_) => {
                if Ipv6View::parse(packet.as_slice()).is_ok() {
                    // Already IPv6; hand back for normal forwarding.
                    return Outcome::NotTranslated;
                }
                return self.drop_4to6(DropReason::IllegalPacket);
            }
        };
        let (src4, dst4, ttl, dscp_ecn, protocol, header_len, total_length) = parsed;

        let proto = match IpProto::from_u8(protocol) {
            Some(IpProto::Icmpv6) | None => return self.drop_4to6(DropReason::UnsupportedProto),
            Some(p) => p,
        };

        let payload = &packet.as_slice()[header_len..];
        let dest_port = match self.dest_identity_v4(proto, payload) {
            Ok(port) => port,
            Err(reason) => return self.drop_4to6(reason),
        };

        let key_port = self.lookup_port(dest_port);
        let Some(handle) = self.table.find_by_ip4(&self.pool, &dst4, key_port) else {
            return self.drop_4to6(DropReason::NoMapping);
        };

        let now = Instant::now();
        let timeout = self.timeout_for(proto);
        let (ip6, source_port) = match self.pool.get_mut(handle) {
            Some(mapping) => {
                mapping.touch(now, timeout);
                (mapping.ip6, mapping.source_port)
            }
            None => return self.drop_4to6(DropReason::Unknown),
        };

        let src6 = prefix::synthesize_ip6(&prefix, src4);
        let rewrite_ports = self.config.port_translation == PortTranslationMode::Enabled;
        // Link-layer padding past the datagram must not reach the rewrite.
        packet.truncate(total_length);
        packet.trim_front(header_len);

        let next_header = match proto {
            IpProto::Udp => {
                let Ok(mut segment) = UdpSegment::new(packet.as_mut_slice()) else {
                    return self.drop_4to6(DropReason::IllegalPacket);
                };
                if rewrite_ports {
                    segment.set_dst_port(source_port);
                }
                segment.update_checksum_v6(&src6, &ip6);
                IpProto::Udp as u8
            }
            IpProto::Tcp => {
                let Ok(mut segment) = TcpSegment::new(packet.as_mut_slice()) else {
                    return self.drop_4to6(DropReason::IllegalPacket);
                };
                if rewrite_ports {
                    segment.set_dst_port(source_port);
                }
                segment.update_checksum_v6(&src6, &ip6);
                IpProto::Tcp as u8
            }
            IpProto::Icmp => {
                let Ok(mut message) = Icmpv6Message::new(packet.as_mut_slice()) else {
                    return self.drop_4to6(DropReason::IllegalPacket);
                };
                message.set_msg_type(icmpv6::ECHO_REPLY);
                if rewrite_ports {
                    message.set_identifier(source_port);
                }
                message.update_checksum(&src6, &ip6);
                IpProto::Icmpv6 as u8
            }
            IpProto::Icmpv6 => return self.drop_4to6(DropReason::UnsupportedProto),
        };

        let header = Ipv6Header {
            traffic_class: dscp_ecn,
            flow_label: 0,
            payload_len: packet.len() as u16,
            next_header,
            hop_limit: ttl.saturating_sub(1),
            src: src6,
            dst: ip6,
        };
        packet.prepend(&header.encode());

        let class = transport_class(proto);
        let bytes = packet.len() as u64;
        if let Some(mapping) = self.pool.get_mut(handle) {
            mapping.counters.count_4to6(class, bytes);
        }
        self.counters.count_4to6(class, bytes);
        trace!(src = %src4, dst = %ip6, bytes, "translated IPv4->IPv6");
        Outcome::Forward
    }

    /// Takes ownership of an IPv4 packet, translates it, and hands the
    /// result to `send` (the IPv6 send path). Input that parses as
    /// neither IPv4 nor IPv6 is reported as [`SendResult::Parse`].
    pub fn send_message<F>(&mut self, mut packet: PacketBuffer, send: F) -> SendResult
    where
        F: FnOnce(PacketBuffer) -> SendResult,
    {
        if Ipv4View::parse(packet.as_slice()).is_err()
            && Ipv6View::parse(packet.as_slice()).is_err()
        {
            return SendResult::Parse;
        }
        match self.translate_ip4_to_ip6(&mut packet) {
            Outcome::Forward | Outcome::NotTranslated => send(packet),
            Outcome::Drop(_) => SendResult::Drop,
        }
    }

    /// Removes every mapping expired at `now`, returning their addresses
    /// to the pool. Returns the number evicted. Expiry is coarse: a
    /// mapping may outlive its deadline by up to one sweep period.
    pub fn process_expiry(&mut self, now: Instant) -> usize {
        let evicted = self.table.evict_expired(&mut self.pool, now);
        let count = evicted.len();
        for mapping in evicted {
            debug!(id = mapping.id, ip4 = %mapping.ip4, "NAT64 mapping expired");
            self.address_pool.release(mapping.ip4);
        }
        count
    }

    /// How often [`Self::process_expiry`] should run.
    pub fn sweep_period(&self) -> Duration {
        self.config.idle_timeout.min(self.config.icmp_timeout)
    }

    /// Snapshots the active mappings in creation order.
    pub fn address_mappings(&self, now: Instant) -> Vec<AddressMapping> {
        let mut snapshot = Vec::with_capacity(self.table.len());
        let mut cursor = self.table.cursor();
        while let Some(handle) = cursor.advance(&self.pool) {
            if let Some(mapping) = self.pool.get(handle) {
                snapshot.push(AddressMapping {
                    id: mapping.id,
                    ip6: mapping.ip6,
                    ip4: mapping.ip4,
                    source_port: mapping.source_port,
                    translated_port: mapping.translated_port,
                    remaining_ms: mapping.remaining(now).as_millis() as u64,
                    counters: mapping.counters,
                });
            }
        }
        snapshot
    }

    fn allocate_mapping(
        &mut self,
        ip6: Ipv6Addr,
        source_port: u16,
        now: Instant,
    ) -> Option<MappingHandle> {
        let ip4 = self.address_pool.allocate()?;
        let translated_port = match self.config.port_translation {
            PortTranslationMode::Disabled => source_port,
            PortTranslationMode::Enabled => match self.allocate_translated_port(source_port) {
                Some(port) => port,
                None => {
                    self.address_pool.release(ip4);
                    return None;
                }
            },
        };

        let id = self.next_id;
        self.next_id += 1;
        let mapping = Mapping {
            id,
            ip6,
            ip4,
            source_port,
            translated_port,
            expires_at: now,
            counters: ProtocolCounters::default(),
        };
        match self.table.insert(&mut self.pool, mapping) {
            Some(handle) => {
                debug!(id, ip6 = %ip6, ip4 = %ip4, translated_port, "NAT64 mapping created");
                Some(handle)
            }
            None => {
                self.address_pool.release(ip4);
                None
            }
        }
    }

    /// Rejection sampling over the dynamic range, preserving the parity
    /// of the original port, until an unused port is found.
    fn allocate_translated_port(&mut self, source_port: u16) -> Option<u16> {
        for _ in 0..PORT_ALLOCATION_TRIES {
            let sampled: u16 = self.rng.gen_range(self.config.dynamic_port_range.clone());
            let candidate = (sampled & !1) | (source_port & 1);
            if !self.translated_port_in_use(candidate) {
                return Some(candidate);
            }
        }
        None
    }

    fn translated_port_in_use(&self, port: u16) -> bool {
        let mut cursor = self.table.cursor();
        while let Some(handle) = cursor.advance(&self.pool) {
            if let Some(mapping) = self.pool.get(handle) {
                if mapping.translated_port == port {
                    return true;
                }
            }
        }
        false
    }

    fn lookup_port(&self, port: u16) -> Option<u16> {
        match self.config.port_translation {
            PortTranslationMode::Enabled => Some(port),
            PortTranslationMode::Disabled => None,
        }
    }

    fn timeout_for(&self, proto: IpProto) -> Duration {
        match proto {
            IpProto::Icmp | IpProto::Icmpv6 => self.config.icmp_timeout,
            IpProto::Tcp | IpProto::Udp => self.config.idle_timeout,
        }
    }

    /// Source port or ICMP identifier of an outbound IPv6 payload. Only
    /// echo requests originate ICMP sessions.
    fn source_identity_v6(&self, proto: IpProto, payload: &[u8]) -> Result<u16, DropReason> {
        match proto {
            IpProto::Udp => {
                if payload.len() < udp::HEADER_SIZE {
                    return Err(DropReason::IllegalPacket);
                }
                Ok(u16::from_be_bytes([payload[0], payload[1]]))
            }
            IpProto::Tcp => {
                if payload.len() < tcp::MIN_HEADER_SIZE {
                    return Err(DropReason::IllegalPacket);
                }
                Ok(u16::from_be_bytes([payload[0], payload[1]]))
            }
            IpProto::Icmpv6 => {
                if payload.len() < icmpv6::HEADER_SIZE {
                    return Err(DropReason::IllegalPacket);
                }
                if payload[0] != icmpv6::ECHO_REQUEST {
                    return Err(DropReason::UnsupportedProto);
                }
                Ok(u16::from_be_bytes([payload[4], payload[5]]))
            }
            IpProto::Icmp => Err(DropReason::UnsupportedProto),
        }
    }

    /// Destination port or ICMP identifier of an inbound IPv4 payload.
    /// Only echo replies match ICMP sessions on the way back.
    fn dest_identity_v4(&self, proto: IpProto, payload: &[u8]) -> Result<u16, DropReason> {
        match proto {
            IpProto::Udp => {
                if payload.len() < udp::HEADER_SIZE {
                    return Err(DropReason::IllegalPacket);
                }
                Ok(u16::from_be_bytes([payload[2], payload[3]]))
            }
            IpProto::Tcp => {
                if payload.len() < tcp::MIN_HEADER_SIZE {
                    return Err(DropReason::IllegalPacket);
                }
                Ok(u16::from_be_bytes([payload[2], payload[3]]))
            }
            IpProto::Icmp => {
                if payload.len() < icmp::HEADER_SIZE {
                    return Err(DropReason::IllegalPacket);
                }
                if payload[0] != icmp::ECHO_REPLY {
                    return Err(DropReason::UnsupportedProto);
                }
                Ok(u16::from_be_bytes([payload[4], payload[5]]))
            }
            IpProto::Icmpv6 => Err(DropReason::UnsupportedProto),
        }
    }

    fn drop_6to4(&mut self, reason: DropReason) -> Outcome {
        self.errors.record_6to4(reason);
        debug!(?reason, "dropping IPv6->IPv4 packet");
        Outcome::Drop(reason)
    }

    fn drop_4to6(&mut self, reason: DropReason) -> Outcome {
        self.errors.record_4to6(reason);
        debug!(?reason, "dropping IPv4->IPv6 packet");
        Outcome::Drop(reason)
    }
}

fn transport_class(proto: IpProto) -> TransportClass {
    match proto {
        IpProto::Udp => TransportClass::Udp,
        IpProto::Tcp => TransportClass::Tcp,
        IpProto::Icmp | IpProto::Icmpv6 => TransportClass::Icmp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::checksum;

    const PREFIX: &str = "64:ff9b::/96";
    const CIDR: &str = "192.0.2.0/24";

    fn translator(mode: PortTranslationMode) -> Translator {
        translator_with_capacity(mode, DEFAULT_MAX_MAPPINGS)
    }

    fn translator_with_capacity(mode: PortTranslationMode, capacity: usize) -> Translator {
        let mut t = Translator::new(TranslatorConfig {
            max_mappings: capacity,
            port_translation: mode,
            ..TranslatorConfig::default()
        });
        t.set_ip4_cidr(CIDR.parse().unwrap());
        t.set_nat64_prefix(PREFIX.parse().unwrap());
        t.set_enabled(true);
        assert_eq!(t.state(), State::Active);
        t
    }

    fn v6_udp(src: &str, dst: &str, sport: u16, dport: u16, payload: &[u8]) -> PacketBuffer {
        let src: Ipv6Addr = src.parse().unwrap();
        let dst: Ipv6Addr = dst.parse().unwrap();
        let segment = udp::build_v6(&src, &dst, sport, dport, payload);
        let header = Ipv6Header {
            traffic_class: 0,
            flow_label: 0,
            payload_len: segment.len() as u16,
            next_header: IpProto::Udp as u8,
            hop_limit: 64,
            src,
            dst,
        };
        let mut bytes = header.encode().to_vec();
        bytes.extend_from_slice(&segment);
        PacketBuffer::from_packet(&bytes)
    }

    fn v4_udp(src: &str, dst: &str, sport: u16, dport: u16, payload: &[u8]) -> PacketBuffer {
        let src: Ipv4Addr = src.parse().unwrap();
        let dst: Ipv4Addr = dst.parse().unwrap();
        let segment = udp::build_v4(src, dst, sport, dport, payload);
        let header = Ipv4Header {
            dscp_ecn: 0,
            identification: 1,
            ttl: 64,
            protocol: IpProto::Udp as u8,
            src,
            dst,
            payload_len: segment.len() as u16,
        };
        let mut bytes = header.encode().to_vec();
        bytes.extend_from_slice(&segment);
        PacketBuffer::from_packet(&bytes)
    }

    fn v6_echo_request(src: &str, dst: &str, identifier: u16) -> PacketBuffer {
        let src: Ipv6Addr = src.parse().unwrap();
        let dst: Ipv6Addr = dst.parse().unwrap();
        let message = icmpv6::build_echo(&src, &dst, icmpv6::ECHO_REQUEST, identifier, 1, b"ping");
        let header = Ipv6Header {
            traffic_class: 0,
            flow_label: 0,
            payload_len: message.len() as u16,
            next_header: IpProto::Icmpv6 as u8,
            hop_limit: 64,
            src,
            dst,
        };
        let mut bytes = header.encode().to_vec();
        bytes.extend_from_slice(&message);
        PacketBuffer::from_packet(&bytes)
    }

    fn v4_echo_reply(src: &str, dst: &str, identifier: u16) -> PacketBuffer {
        let src: Ipv4Addr = src.parse().unwrap();
        let dst: Ipv4Addr = dst.parse().unwrap();
        let message = icmp::build_echo(icmp::ECHO_REPLY, identifier, 1, b"ping");
        let header = Ipv4Header {
            dscp_ecn: 0,
            identification: 2,
            ttl: 64,
            protocol: IpProto::Icmp as u8,
            src,
            dst,
            payload_len: message.len() as u16,
        };
        let mut bytes = header.encode().to_vec();
        bytes.extend_from_slice(&message);
        PacketBuffer::from_packet(&bytes)
    }

    #[test]
    fn test_state_machine_transitions() {
        let mut t = Translator::new(TranslatorConfig::default());
        assert_eq!(t.state(), State::Disabled);

        t.set_ip4_cidr(CIDR.parse().unwrap());
        t.set_nat64_prefix(PREFIX.parse().unwrap());
        assert_eq!(t.state(), State::Disabled);

        t.set_enabled(true);
        assert_eq!(t.state(), State::Active);

        t.clear_nat64_prefix();
        assert_eq!(t.state(), State::NotRunning);

        t.set_nat64_prefix(PREFIX.parse().unwrap());
        assert_eq!(t.state(), State::Active);

        t.set_enabled(false);
        assert_eq!(t.state(), State::Disabled);
    }

    #[test]
    fn test_disabled_translator_refuses_both_paths() {
        let mut t = Translator::new(TranslatorConfig::default());

        let mut packet = v6_udp("2001:db8::5", "64:ff9b::c000:201", 43127, 80, b"hi");
        assert_eq!(t.translate_ip6_to_ip4(&mut packet), Outcome::NotTranslated);

        let mut packet = v4_udp("192.0.2.99", "192.0.2.1", 80, 43127, b"hi");
        assert_eq!(
            t.translate_ip4_to_ip6(&mut packet),
            Outcome::Drop(DropReason::Unknown)
        );
    }

    #[test]
    fn test_udp_session_round_trip() {
        let mut t = translator(PortTranslationMode::Disabled);

        // 64:ff9b::c633:6401 embeds 198.51.100.1 in the /96 prefix.
        let mut packet = v6_udp("2001:db8::5", "64:ff9b::c633:6401", 43127, 80, b"hello");
        assert_eq!(t.translate_ip6_to_ip4(&mut packet), Outcome::Forward);

        let bytes = packet.as_slice().to_vec();
        let view = Ipv4View::parse(&bytes).unwrap();
        assert_eq!(view.src_addr(), Ipv4Addr::new(192, 0, 2, 1));
        assert_eq!(view.dst_addr(), Ipv4Addr::new(198, 51, 100, 1));
        assert_eq!(view.protocol(), IpProto::Udp as u8);
        assert_eq!(view.ttl(), 63);
        assert!(view.validate_checksum());
        // Transport checksum verifies against the new pseudo-header.
        assert_eq!(
            checksum::transport_checksum_v4(
                view.src_addr(),
                view.dst_addr(),
                IpProto::Udp as u8,
                view.payload()
            ),
            0
        );
        // Ports untouched without port translation.
        let payload = view.payload();
        assert_eq!(u16::from_be_bytes([payload[0], payload[1]]), 43127);
        assert_eq!(u16::from_be_bytes([payload[2], payload[3]]), 80);

        // Reply from the remote host back to the allocated address.
        let mut reply = v4_udp("198.51.100.1", "192.0.2.1", 80, 43127, b"world");
        assert_eq!(t.translate_ip4_to_ip6(&mut reply), Outcome::Forward);

        let bytes = reply.as_slice().to_vec();
        let view = Ipv6View::parse(&bytes).unwrap();
        assert_eq!(view.src_addr(), "64:ff9b::c633:6401".parse::<Ipv6Addr>().unwrap());
        assert_eq!(view.dst_addr(), "2001:db8::5".parse::<Ipv6Addr>().unwrap());
        assert_eq!(view.next_header(), IpProto::Udp as u8);
        assert_eq!(view.hop_limit(), 63);
        assert_eq!(
            checksum::transport_checksum_v6(
                &view.src_addr(),
                &view.dst_addr(),
                IpProto::Udp as u8,
                view.payload()
            ),
            0
        );

        let counters = t.counters();
        assert_eq!(counters.udp.packets_6to4, 1);
        assert_eq!(counters.udp.packets_4to6, 1);
        assert_eq!(counters.total.packets_6to4, 1);
    }

    #[test]
    fn test_padding_after_datagram_is_stripped() {
        let mut t = translator(PortTranslationMode::Disabled);

        let mut packet = v6_udp("2001:db8::5", "64:ff9b::c633:6401", 43127, 80, b"hi");
        assert_eq!(t.translate_ip6_to_ip4(&mut packet), Outcome::Forward);

        // 10-byte reply datagram followed by Ethernet-style trailer
        // padding. The padding must not leak into the translated
        // payload length or the rewritten checksum.
        let reply = v4_udp("198.51.100.1", "192.0.2.1", 80, 43127, b"ok");
        let mut bytes = reply.as_slice().to_vec();
        bytes.extend_from_slice(&[0u8; 6]);
        let mut reply = PacketBuffer::from_packet(&bytes);
        assert_eq!(t.translate_ip4_to_ip6(&mut reply), Outcome::Forward);

        let view = Ipv6View::parse(reply.as_slice()).unwrap();
        assert_eq!(view.payload_length(), 10);
        assert_eq!(reply.len(), ipv6::HEADER_SIZE + 10);
        let payload = view.payload();
        // IPv6 payload length agrees with the UDP Length field.
        assert_eq!(u16::from_be_bytes([payload[4], payload[5]]), 10);
        assert_eq!(
            checksum::transport_checksum_v6(
                &view.src_addr(),
                &view.dst_addr(),
                IpProto::Udp as u8,
                payload
            ),
            0
        );

        // Same guard on the outbound path.
        let request = v6_udp("2001:db8::5", "64:ff9b::c633:6401", 43127, 80, b"hi");
        let mut bytes = request.as_slice().to_vec();
        bytes.extend_from_slice(&[0u8; 4]);
        let mut request = PacketBuffer::from_packet(&bytes);
        assert_eq!(t.translate_ip6_to_ip4(&mut request), Outcome::Forward);

        let view = Ipv4View::parse(request.as_slice()).unwrap();
        assert_eq!(view.total_length(), 30);
        assert_eq!(request.len(), 30);
        assert_eq!(
            checksum::transport_checksum_v4(
                view.src_addr(),
                view.dst_addr(),
                IpProto::Udp as u8,
                view.payload()
            ),
            0
        );
    }

    #[test]
    fn test_tcp_syn_translates_with_valid_checksum() {
        let mut t = translator(PortTranslationMode::Enabled);
        let src: Ipv6Addr = "2001:db8::5".parse().unwrap();
        let dst: Ipv6Addr = "64:ff9b::c633:6401".parse().unwrap();
        let segment = tcp::build_v6(&src, &dst, 40000, 443);
        let header = Ipv6Header {
            traffic_class: 0,
            flow_label: 0,
            payload_len: segment.len() as u16,
            next_header: IpProto::Tcp as u8,
            hop_limit: 64,
            src,
            dst,
        };
        let mut bytes = header.encode().to_vec();
        bytes.extend_from_slice(&segment);
        let mut packet = PacketBuffer::from_packet(&bytes);

        assert_eq!(t.translate_ip6_to_ip4(&mut packet), Outcome::Forward);

        let bytes = packet.as_slice().to_vec();
        let view = Ipv4View::parse(&bytes).unwrap();
        assert_eq!(view.protocol(), IpProto::Tcp as u8);
        assert_eq!(
            checksum::transport_checksum_v4(
                view.src_addr(),
                view.dst_addr(),
                IpProto::Tcp as u8,
                view.payload()
            ),
            0
        );
        let payload = view.payload();
        let translated = u16::from_be_bytes([payload[0], payload[1]]);
        assert!(translated >= DYNAMIC_PORT_MIN);
        assert_eq!(translated % 2, 0);
        assert_eq!(t.counters().tcp.packets_6to4, 1);
    }

    #[test]
    fn test_addresses_assigned_lowest_host_id_first() {
        let mut t = translator(PortTranslationMode::Disabled);

        for (i, src) in ["2001:db8::1", "2001:db8::2", "2001:db8::3"].iter().enumerate() {
            let mut packet = v6_udp(src, "64:ff9b::c633:6401", 5000, 80, b"x");
            assert_eq!(t.translate_ip6_to_ip4(&mut packet), Outcome::Forward);
            let bytes = packet.as_slice().to_vec();
            let view = Ipv4View::parse(&bytes).unwrap();
            assert_eq!(view.src_addr(), Ipv4Addr::new(192, 0, 2, 1 + i as u8));
        }
        assert_eq!(t.mapping_count(), 3);
    }

    #[test]
    fn test_existing_mapping_is_reused() {
        let mut t = translator(PortTranslationMode::Disabled);

        let mut first = v6_udp("2001:db8::5", "64:ff9b::c633:6401", 43127, 80, b"a");
        assert_eq!(t.translate_ip6_to_ip4(&mut first), Outcome::Forward);
        let mut second = v6_udp("2001:db8::5", "64:ff9b::c633:6401", 43127, 443, b"b");
        assert_eq!(t.translate_ip6_to_ip4(&mut second), Outcome::Forward);

        let now = Instant::now();
        let mappings = t.address_mappings(now);
        assert_eq!(mappings.len(), 1);
        assert_eq!(mappings[0].ip4, Ipv4Addr::new(192, 0, 2, 1));
        assert_eq!(mappings[0].counters.udp.packets_6to4, 2);
    }

    #[test]
    fn test_pool_exhaustion_drops_with_no_mapping() {
        let mut t = translator_with_capacity(PortTranslationMode::Disabled, 2);

        for src in ["2001:db8::1", "2001:db8::2"] {
            let mut packet = v6_udp(src, "64:ff9b::c633:6401", 5000, 80, b"x");
            assert_eq!(t.translate_ip6_to_ip4(&mut packet), Outcome::Forward);
        }
        assert_eq!(t.available_addresses(), 0);

        let mut packet = v6_udp("2001:db8::3", "64:ff9b::c633:6401", 5000, 80, b"x");
        assert_eq!(
            t.translate_ip6_to_ip4(&mut packet),
            Outcome::Drop(DropReason::NoMapping)
        );
        assert_eq!(t.error_counters().get_6to4(DropReason::NoMapping), 1);
        assert_eq!(t.mapping_count(), 2);
        assert_eq!(t.available_addresses(), 0);
    }

    #[test]
    fn test_port_exhaustion_releases_address() {
        let mut t = Translator::new(TranslatorConfig {
            port_translation: PortTranslationMode::Enabled,
            // One even and one odd port; a second even-parity flow
            // cannot be satisfied.
            dynamic_port_range: 49152..=49153,
            ..TranslatorConfig::default()
        });
        t.set_ip4_cidr(CIDR.parse().unwrap());
        t.set_nat64_prefix(PREFIX.parse().unwrap());
        t.set_enabled(true);

        let mut packet = v6_udp("2001:db8::1", "64:ff9b::c633:6401", 5000, 80, b"x");
        assert_eq!(t.translate_ip6_to_ip4(&mut packet), Outcome::Forward);
        assert_eq!(t.address_mappings(Instant::now())[0].translated_port, 49152);
        let available = t.available_addresses();

        let mut packet = v6_udp("2001:db8::2", "64:ff9b::c633:6401", 5002, 80, b"x");
        assert_eq!(
            t.translate_ip6_to_ip4(&mut packet),
            Outcome::Drop(DropReason::NoMapping)
        );
        assert_eq!(t.error_counters().get_6to4(DropReason::NoMapping), 1);
        assert_eq!(t.mapping_count(), 1);
        // The address drawn for the failed flow went back to the pool.
        assert_eq!(t.available_addresses(), available);
    }

    #[test]
    fn test_expiry_sweep_reclaims_capacity() {
        let mut t = translator_with_capacity(PortTranslationMode::Disabled, 1);

        let mut packet = v6_udp("2001:db8::1", "64:ff9b::c633:6401", 5000, 80, b"x");
        assert_eq!(t.translate_ip6_to_ip4(&mut packet), Outcome::Forward);
        let mut packet = v6_udp("2001:db8::2", "64:ff9b::c633:6401", 5000, 80, b"x");
        assert_eq!(
            t.translate_ip6_to_ip4(&mut packet),
            Outcome::Drop(DropReason::NoMapping)
        );

        let later = Instant::now() + DEFAULT_IDLE_TIMEOUT + t.sweep_period();
        assert_eq!(t.process_expiry(later), 1);
        assert_eq!(t.mapping_count(), 0);

        let mut packet = v6_udp("2001:db8::2", "64:ff9b::c633:6401", 5000, 80, b"x");
        assert_eq!(t.translate_ip6_to_ip4(&mut packet), Outcome::Forward);
        let bytes = packet.as_slice().to_vec();
        let view = Ipv4View::parse(&bytes).unwrap();
        // The reclaimed address is handed out again.
        assert_eq!(view.src_addr(), Ipv4Addr::new(192, 0, 2, 1));
    }

    #[test]
    fn test_icmp_echo_identifier_round_trip() {
        let mut t = translator(PortTranslationMode::Enabled);

        let mut request = v6_echo_request("2001:db8::5", "64:ff9b::c633:6401", 0x1234);
        assert_eq!(t.translate_ip6_to_ip4(&mut request), Outcome::Forward);

        let bytes = request.as_slice().to_vec();
        let view = Ipv4View::parse(&bytes).unwrap();
        assert_eq!(view.protocol(), IpProto::Icmp as u8);
        let payload = view.payload();
        assert_eq!(payload[0], icmp::ECHO_REQUEST);
        let translated_id = u16::from_be_bytes([payload[4], payload[5]]);
        assert!(translated_id >= DYNAMIC_PORT_MIN);
        // Parity of the original identifier is preserved.
        assert_eq!(translated_id % 2, 0);
        assert_eq!(checksum::checksum(payload), 0);

        let mut reply = v4_echo_reply("198.51.100.1", "192.0.2.1", translated_id);
        assert_eq!(t.translate_ip4_to_ip6(&mut reply), Outcome::Forward);

        let bytes = reply.as_slice().to_vec();
        let view = Ipv6View::parse(&bytes).unwrap();
        assert_eq!(view.next_header(), IpProto::Icmpv6 as u8);
        let payload = view.payload();
        assert_eq!(payload[0], icmpv6::ECHO_REPLY);
        // Original identifier restored through the mapping.
        assert_eq!(u16::from_be_bytes([payload[4], payload[5]]), 0x1234);
        assert_eq!(
            checksum::transport_checksum_v6(
                &view.src_addr(),
                &view.dst_addr(),
                IpProto::Icmpv6 as u8,
                payload
            ),
            0
        );
    }

    #[test]
    fn test_port_translation_allocates_distinct_ports() {
        let mut t = translator(PortTranslationMode::Enabled);

        let mut a = v6_udp("2001:db8::5", "64:ff9b::c633:6401", 5000, 80, b"x");
        assert_eq!(t.translate_ip6_to_ip4(&mut a), Outcome::Forward);
        let mut b = v6_udp("2001:db8::5", "64:ff9b::c633:6401", 5001, 80, b"x");
        assert_eq!(t.translate_ip6_to_ip4(&mut b), Outcome::Forward);

        // Same source address, different ports: two sessions.
        let mappings = t.address_mappings(Instant::now());
        assert_eq!(mappings.len(), 2);
        assert_ne!(mappings[0].translated_port, mappings[1].translated_port);
        for m in &mappings {
            assert!(m.translated_port >= DYNAMIC_PORT_MIN);
            assert_eq!(m.translated_port % 2, m.source_port % 2);
        }

        let port_a = {
            let bytes = a.as_slice().to_vec();
            let view = Ipv4View::parse(&bytes).unwrap();
            let payload = view.payload();
            u16::from_be_bytes([payload[0], payload[1]])
        };
        assert_eq!(port_a, mappings[0].translated_port);
    }

    #[test]
    fn test_cidr_change_invalidates_mappings() {
        let mut t = translator(PortTranslationMode::Disabled);

        let mut packet = v6_udp("2001:db8::5", "64:ff9b::c633:6401", 5000, 80, b"x");
        assert_eq!(t.translate_ip6_to_ip4(&mut packet), Outcome::Forward);
        assert_eq!(t.mapping_count(), 1);

        t.set_ip4_cidr("198.51.100.0/24".parse().unwrap());
        assert_eq!(t.mapping_count(), 0);
        assert_eq!(t.state(), State::Active);

        // New flows draw from the new block.
        let mut packet = v6_udp("2001:db8::5", "64:ff9b::c633:6401", 5000, 80, b"x");
        assert_eq!(t.translate_ip6_to_ip4(&mut packet), Outcome::Forward);
        let bytes = packet.as_slice().to_vec();
        let view = Ipv4View::parse(&bytes).unwrap();
        assert_eq!(view.src_addr(), Ipv4Addr::new(198, 51, 100, 1));

        t.clear_ip4_cidr();
        assert_eq!(t.state(), State::NotRunning);
        assert_eq!(t.mapping_count(), 0);
    }

    #[test]
    fn test_same_cidr_set_keeps_mappings() {
        let mut t = translator(PortTranslationMode::Disabled);

        let mut packet = v6_udp("2001:db8::5", "64:ff9b::c633:6401", 5000, 80, b"x");
        assert_eq!(t.translate_ip6_to_ip4(&mut packet), Outcome::Forward);

        t.set_ip4_cidr(CIDR.parse().unwrap());
        assert_eq!(t.mapping_count(), 1);
    }

    #[test]
    fn test_prefix_change_keeps_mappings() {
        let mut t = translator(PortTranslationMode::Disabled);

        let mut packet = v6_udp("2001:db8::5", "64:ff9b::c633:6401", 5000, 80, b"x");
        assert_eq!(t.translate_ip6_to_ip4(&mut packet), Outcome::Forward);

        t.set_nat64_prefix("2001:db8:64::/96".parse().unwrap());
        assert_eq!(t.mapping_count(), 1);
        assert_eq!(t.state(), State::Active);
    }

    #[test]
    fn test_destination_outside_prefix_is_not_translated() {
        let mut t = translator(PortTranslationMode::Disabled);
        let mut packet = v6_udp("2001:db8::5", "2001:db8::1", 5000, 80, b"x");
        assert_eq!(t.translate_ip6_to_ip4(&mut packet), Outcome::NotTranslated);
        assert_eq!(t.mapping_count(), 0);
    }

    #[test]
    fn test_reply_without_session_is_dropped() {
        let mut t = translator(PortTranslationMode::Disabled);
        let mut packet = v4_udp("198.51.100.1", "192.0.2.1", 80, 5000, b"x");
        assert_eq!(
            t.translate_ip4_to_ip6(&mut packet),
            Outcome::Drop(DropReason::NoMapping)
        );
        assert_eq!(t.error_counters().get_4to6(DropReason::NoMapping), 1);
    }

    #[test]
    fn test_ipv6_input_on_v4_path_passes_through() {
        let mut t = translator(PortTranslationMode::Disabled);
        let mut packet = v6_udp("2001:db8::5", "2001:db8::1", 5000, 80, b"x");
        let before = packet.as_slice().to_vec();
        assert_eq!(t.translate_ip4_to_ip6(&mut packet), Outcome::NotTranslated);
        assert_eq!(packet.as_slice(), &before[..]);
    }

    #[test]
    fn test_unsupported_icmpv6_type_is_dropped() {
        let mut t = translator(PortTranslationMode::Disabled);
        let src: Ipv6Addr = "2001:db8::5".parse().unwrap();
        let dst: Ipv6Addr = "64:ff9b::c633:6401".parse().unwrap();
        // Neighbor solicitation, not an echo.
        let message = icmpv6::build_echo(&src, &dst, 135, 0, 0, &[]);
        let header = Ipv6Header {
            traffic_class: 0,
            flow_label: 0,
            payload_len: message.len() as u16,
            next_header: IpProto::Icmpv6 as u8,
            hop_limit: 64,
            src,
            dst,
        };
        let mut bytes = header.encode().to_vec();
        bytes.extend_from_slice(&message);
        let mut packet = PacketBuffer::from_packet(&bytes);

        assert_eq!(
            t.translate_ip6_to_ip4(&mut packet),
            Outcome::Drop(DropReason::UnsupportedProto)
        );
        assert_eq!(t.error_counters().get_6to4(DropReason::UnsupportedProto), 1);
    }

    #[test]
    fn test_truncated_header_is_dropped() {
        let mut t = translator(PortTranslationMode::Disabled);
        let mut packet = PacketBuffer::from_packet(&[0x60, 0x00, 0x00]);
        assert_eq!(
            t.translate_ip6_to_ip4(&mut packet),
            Outcome::Drop(DropReason::IllegalPacket)
        );
        assert_eq!(t.error_counters().get_6to4(DropReason::IllegalPacket), 1);
    }

    #[test]
    fn test_send_message_results() {
        let mut t = translator(PortTranslationMode::Disabled);

        // Establish a session so the reply has somewhere to go.
        let mut outbound = v6_udp("2001:db8::5", "64:ff9b::c633:6401", 43127, 80, b"x");
        assert_eq!(t.translate_ip6_to_ip4(&mut outbound), Outcome::Forward);

        let reply = v4_udp("198.51.100.1", "192.0.2.1", 80, 43127, b"y");
        let result = t.send_message(reply, |packet| {
            assert!(Ipv6View::parse(packet.as_slice()).is_ok());
            SendResult::Sent
        });
        assert_eq!(result, SendResult::Sent);

        let stray = v4_udp("198.51.100.1", "192.0.2.9", 80, 43127, b"y");
        assert_eq!(
            t.send_message(stray, |_| SendResult::Sent),
            SendResult::Drop
        );

        let garbage = PacketBuffer::from_packet(&[0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(
            t.send_message(garbage, |_| SendResult::Sent),
            SendResult::Parse
        );
    }

    #[test]
    fn test_sweep_period_is_shorter_timeout() {
        let t = Translator::new(TranslatorConfig::default());
        assert_eq!(t.sweep_period(), DEFAULT_ICMP_TIMEOUT);
    }

    #[test]
    fn test_mapping_snapshot_reports_remaining_time() {
        let mut t = translator(PortTranslationMode::Disabled);
        let mut packet = v6_udp("2001:db8::5", "64:ff9b::c633:6401", 5000, 80, b"x");
        assert_eq!(t.translate_ip6_to_ip4(&mut packet), Outcome::Forward);

        let mappings = t.address_mappings(Instant::now());
        assert_eq!(mappings.len(), 1);
        assert!(mappings[0].remaining_ms <= DEFAULT_IDLE_TIMEOUT.as_millis() as u64);
        assert!(mappings[0].remaining_ms > DEFAULT_IDLE_TIMEOUT.as_millis() as u64 / 2);
        assert_eq!(mappings[0].ip6, "2001:db8::5".parse::<Ipv6Addr>().unwrap());
    }
}
