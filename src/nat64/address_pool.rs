//! Pool of IPv4 addresses handed out to active sessions.
//!
//! Addresses come from the configured CIDR in ascending host-id order and
//! are recycled FIFO, so allocation is fully deterministic: the lowest
//! host id goes out first, and a released address goes to the back of the
//! queue.

use std::collections::VecDeque;
use std::net::Ipv4Addr;

use super::cidr::Ip4Cidr;

#[derive(Debug, Default)]
pub struct AddressPool {
    free: VecDeque<Ipv4Addr>,
    capacity: usize,
}

impl AddressPool {
    pub fn new(capacity: usize) -> Self {
        AddressPool {
            free: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Rebuilds the pool from `cidr`, discarding all previously free
    /// addresses. Host id 0 (the network address) and the broadcast
    /// address are excluded for prefixes shorter than /31; /31 and /32
    /// use every address in the block. The pool never grows beyond the
    /// mapping capacity even when the CIDR is larger.
    pub fn configure(&mut self, cidr: &Ip4Cidr) {
        self.free.clear();

        let total = 1u64 << (32 - cidr.length());
        let (first, last) = if cidr.length() >= 31 {
            (0, total)
        } else {
            (1, total - 1)
        };

        for host in first..last {
            if self.free.len() >= self.capacity {
                break;
            }
            self.free.push_back(cidr.address_at(host as u32));
        }
    }

    pub fn allocate(&mut self) -> Option<Ipv4Addr> {
        self.free.pop_front()
    }

    pub fn release(&mut self, address: Ipv4Addr) {
        self.free.push_back(address);
    }

    pub fn available(&self) -> usize {
        self.free.len()
    }
}
