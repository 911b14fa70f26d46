//! Packet buffer with reserved headroom for in-place translation.
//!
//! NAT64 strips one IP header and prepends another of a different size, so
//! the buffer keeps spare bytes in front of the payload. `prepend` falls
//! back to reallocating when the headroom is exhausted.

/// Headroom reserved in front of a freshly wrapped packet. An IPv6 header
/// (40 bytes) is the largest header the translator ever prepends.
pub const DEFAULT_HEADROOM: usize = 40;

#[derive(Debug, Clone)]
pub struct PacketBuffer {
    buf: Vec<u8>,
    head: usize,
}

impl PacketBuffer {
    /// Wrap a packet, reserving [`DEFAULT_HEADROOM`] bytes in front.
    pub fn from_packet(data: &[u8]) -> Self {
        Self::with_headroom(data, DEFAULT_HEADROOM)
    }

    pub fn with_headroom(data: &[u8], headroom: usize) -> Self {
        let mut buf = vec![0u8; headroom + data.len()];
        buf[headroom..].copy_from_slice(data);
        Self {
            buf,
            head: headroom,
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len() - self.head
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn headroom(&self) -> usize {
        self.head
    }

    /// Current packet contents.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[self.head..]
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.buf[self.head..]
    }

    /// Insert `header` in front of the current contents.
    pub fn prepend(&mut self, header: &[u8]) {
        if header.len() > self.head {
            // Out of headroom; reallocate with a fresh reserve in front.
            let mut buf = vec![0u8; DEFAULT_HEADROOM + header.len() + self.len()];
            buf[DEFAULT_HEADROOM + header.len()..].copy_from_slice(self.as_slice());
            self.buf = buf;
            self.head = DEFAULT_HEADROOM + header.len();
        }
        self.head -= header.len();
        self.buf[self.head..self.head + header.len()].copy_from_slice(header);
    }

    /// Remove `count` bytes from the front (header strip). `count` is
    /// clamped to the packet length.
    pub fn trim_front(&mut self, count: usize) {
        self.head = (self.head + count).min(self.buf.len());
    }

    /// Drop everything past the first `len` bytes (padding strip). A
    /// `len` beyond the packet length leaves it unchanged.
    pub fn truncate(&mut self, len: usize) {
        if len < self.len() {
            self.buf.truncate(self.head + len);
        }
    }

    /// Consume the buffer, returning the packet bytes.
    pub fn into_vec(mut self) -> Vec<u8> {
        self.buf.drain(..self.head);
        self.buf
    }
}
