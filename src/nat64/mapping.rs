//! Session mapping arena and lookup table.
//!
//! Mappings live in a fixed-capacity arena (`MappingPool`) and are
//! addressed by stable index handles. The `MappingTable` threads active
//! slots into a singly linked list in creation order using a next-handle
//! chain stored alongside each slot, so insert is O(1) and lookups are a
//! bounded O(capacity) scan.

use std::net::{Ipv4Addr, Ipv6Addr};
use std::time::{Duration, Instant};

use super::counters::ProtocolCounters;

/// Stable index of a slot in the [`MappingPool`] arena.
pub type MappingHandle = usize;

/// One active translation session.
#[derive(Debug, Clone)]
pub struct Mapping {
    /// Monotonic session id, never reused while the translator runs.
    pub id: u64,
    pub ip6: Ipv6Addr,
    pub ip4: Ipv4Addr,
    /// Source port, or ICMP identifier for echo sessions.
    pub source_port: u16,
    /// Equal to `source_port` when port translation is disabled.
    pub translated_port: u16,
    pub expires_at: Instant,
    pub counters: ProtocolCounters,
}

impl Mapping {
    pub fn touch(&mut self, now: Instant, timeout: Duration) {
        self.expires_at = now + timeout;
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.expires_at.saturating_duration_since(now)
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.expires_at <= now
    }
}

struct Slot {
    mapping: Mapping,
    next: Option<MappingHandle>,
}

/// Fixed-capacity arena with a free-index stack. Never grows.
pub struct MappingPool {
    slots: Vec<Option<Slot>>,
    free: Vec<MappingHandle>,
}

impl MappingPool {
    pub fn new(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        // Reversed so the lowest index pops first.
        let free = (0..capacity).rev().collect();
        MappingPool { slots, free }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn available(&self) -> usize {
        self.free.len()
    }

    fn allocate(&mut self, mapping: Mapping) -> Option<MappingHandle> {
        let handle = self.free.pop()?;
        self.slots[handle] = Some(Slot { mapping, next: None });
        Some(handle)
    }

    fn release(&mut self, handle: MappingHandle) -> Option<Mapping> {
        let slot = self.slots[handle].take()?;
        self.free.push(handle);
        Some(slot.mapping)
    }

    pub fn get(&self, handle: MappingHandle) -> Option<&Mapping> {
        self.slots.get(handle)?.as_ref().map(|s| &s.mapping)
    }

    pub fn get_mut(&mut self, handle: MappingHandle) -> Option<&mut Mapping> {
        self.slots.get_mut(handle)?.as_mut().map(|s| &mut s.mapping)
    }

    fn next_of(&self, handle: MappingHandle) -> Option<MappingHandle> {
        self.slots[handle].as_ref().and_then(|s| s.next)
    }

    fn set_next(&mut self, handle: MappingHandle, next: Option<MappingHandle>) {
        if let Some(slot) = self.slots[handle].as_mut() {
            slot.next = next;
        }
    }
}

/// Active mappings in creation order.
#[derive(Default)]
pub struct MappingTable {
    head: Option<MappingHandle>,
    tail: Option<MappingHandle>,
    len: usize,
}

impl MappingTable {
    pub fn new() -> Self {
        MappingTable::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Appends a mapping, returning its handle, or `None` when the arena
    /// is full.
    pub fn insert(&mut self, pool: &mut MappingPool, mapping: Mapping) -> Option<MappingHandle> {
        let handle = pool.allocate(mapping)?;
        match self.tail {
            Some(tail) => pool.set_next(tail, Some(handle)),
            None => self.head = Some(handle),
        }
        self.tail = Some(handle);
        self.len += 1;
        Some(handle)
    }

    /// Finds the session originated by `ip6`. With `port` set, the source
    /// port (or ICMP id) must match as well.
    pub fn find_by_ip6(
        &self,
        pool: &MappingPool,
        ip6: &Ipv6Addr,
        port: Option<u16>,
    ) -> Option<MappingHandle> {
        self.scan(pool, |m| {
            m.ip6 == *ip6 && port.map_or(true, |p| m.source_port == p)
        })
    }

    /// Finds the session owning the translated IPv4 identity. With `port`
    /// set, the translated port disambiguates mappings sharing one
    /// address.
    pub fn find_by_ip4(
        &self,
        pool: &MappingPool,
        ip4: &Ipv4Addr,
        port: Option<u16>,
    ) -> Option<MappingHandle> {
        self.scan(pool, |m| {
            m.ip4 == *ip4 && port.map_or(true, |p| m.translated_port == p)
        })
    }

    fn scan<F: Fn(&Mapping) -> bool>(&self, pool: &MappingPool, pred: F) -> Option<MappingHandle> {
        let mut cursor = self.head;
        while let Some(handle) = cursor {
            let mapping = pool.get(handle)?;
            if pred(mapping) {
                return Some(handle);
            }
            cursor = pool.next_of(handle);
        }
        None
    }

    /// Removes every mapping expired at `now` in one pass, returning the
    /// evicted sessions so the caller can release their IPv4 addresses.
    pub fn evict_expired(&mut self, pool: &mut MappingPool, now: Instant) -> Vec<Mapping> {
        self.drain_matching(pool, |m| m.is_expired(now))
    }

    /// Removes and returns every mapping.
    pub fn clear(&mut self, pool: &mut MappingPool) -> Vec<Mapping> {
        self.drain_matching(pool, |_| true)
    }

    fn drain_matching<F: Fn(&Mapping) -> bool>(
        &mut self,
        pool: &mut MappingPool,
        pred: F,
    ) -> Vec<Mapping> {
        let mut evicted = Vec::new();
        let mut prev: Option<MappingHandle> = None;
        let mut cursor = self.head;

        while let Some(handle) = cursor {
            let next = pool.next_of(handle);
            let matched = pool.get(handle).map(&pred).unwrap_or(false);
            if matched {
                match prev {
                    Some(p) => pool.set_next(p, next),
                    None => self.head = next,
                }
                if self.tail == Some(handle) {
                    self.tail = prev;
                }
                if let Some(mapping) = pool.release(handle) {
                    evicted.push(mapping);
                }
                self.len -= 1;
            } else {
                prev = Some(handle);
            }
            cursor = next;
        }
        evicted
    }

    /// Starts a weakly consistent traversal: entries freed between calls
    /// to [`MappingCursor::advance`] end the traversal early instead of
    /// dereferencing a stale handle.
    pub fn cursor(&self) -> MappingCursor {
        MappingCursor { next: self.head }
    }
}

/// Read cursor over a [`MappingTable`] that tolerates concurrent
/// eviction by stopping at a vacated slot.
pub struct MappingCursor {
    next: Option<MappingHandle>,
}

impl MappingCursor {
    pub fn advance(&mut self, pool: &MappingPool) -> Option<MappingHandle> {
        let handle = self.next?;
        if pool.get(handle).is_none() {
            self.next = None;
            return None;
        }
        self.next = pool.next_of(handle);
        Some(handle)
    }
}
