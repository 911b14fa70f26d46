//! Packet/byte counters and drop-reason tallies.
//!
//! Kept as plain integers: the translator runs on a single logical thread
//! (run-to-completion), so no atomics are needed here. The telemetry
//! registry snapshots these into atomic gauges for export.

/// Packets/bytes split by translation direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub packets_4to6: u64,
    pub bytes_4to6: u64,
    pub packets_6to4: u64,
    pub bytes_6to4: u64,
}

impl Counters {
    fn count_4to6(&mut self, bytes: u64) {
        self.packets_4to6 += 1;
        self.bytes_4to6 += bytes;
    }

    fn count_6to4(&mut self, bytes: u64) {
        self.packets_6to4 += 1;
        self.bytes_6to4 += bytes;
    }
}

/// Transport class a translated packet belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportClass {
    Udp,
    Tcp,
    Icmp,
}

/// Per-protocol counters plus a running total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProtocolCounters {
    pub udp: Counters,
    pub tcp: Counters,
    pub icmp: Counters,
    pub total: Counters,
}

impl ProtocolCounters {
    pub fn count_4to6(&mut self, class: TransportClass, bytes: u64) {
        match class {
            TransportClass::Udp => self.udp.count_4to6(bytes),
            TransportClass::Tcp => self.tcp.count_4to6(bytes),
            TransportClass::Icmp => self.icmp.count_4to6(bytes),
        }
        self.total.count_4to6(bytes);
    }

    pub fn count_6to4(&mut self, class: TransportClass, bytes: u64) {
        match class {
            TransportClass::Udp => self.udp.count_6to4(bytes),
            TransportClass::Tcp => self.tcp.count_6to4(bytes),
            TransportClass::Icmp => self.icmp.count_6to4(bytes),
        }
        self.total.count_6to4(bytes);
    }
}

/// Why a packet was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    Unknown,
    /// Malformed IP or transport header.
    IllegalPacket,
    /// Transport protocol or ICMP sub-type the translator cannot carry.
    UnsupportedProto,
    /// No existing session and/or no capacity to create one.
    NoMapping,
}

impl DropReason {
    const COUNT: usize = 4;

    fn index(self) -> usize {
        match self {
            DropReason::Unknown => 0,
            DropReason::IllegalPacket => 1,
            DropReason::UnsupportedProto => 2,
            DropReason::NoMapping => 3,
        }
    }
}

/// Drop tallies per reason, split by direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ErrorCounters {
    count_4to6: [u64; DropReason::COUNT],
    count_6to4: [u64; DropReason::COUNT],
}

impl ErrorCounters {
    pub fn record_4to6(&mut self, reason: DropReason) {
        self.count_4to6[reason.index()] += 1;
    }

    pub fn record_6to4(&mut self, reason: DropReason) {
        self.count_6to4[reason.index()] += 1;
    }

    pub fn get_4to6(&self, reason: DropReason) -> u64 {
        self.count_4to6[reason.index()]
    }

    pub fn get_6to4(&self, reason: DropReason) -> u64 {
        self.count_6to4[reason.index()]
    }

    pub fn total_dropped_4to6(&self) -> u64 {
        self.count_4to6.iter().sum()
    }

    pub fn total_dropped_6to4(&self) -> u64 {
        self.count_6to4.iter().sum()
    }
}
