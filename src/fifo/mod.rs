//! FIFO (First In First Out) buffer management
//!
//! The MPU-6050 has a 1024-byte FIFO. With the DMP enabled, every sample period
//! the DMP appends one fixed-size packet (42 bytes for MotionApps 2.0). The host
//! must drain packets faster than they arrive; once the FIFO fills, the device
//! raises the overflow flag and the stream is no longer packet-aligned, so the
//! only recovery is a reset.
//!
//! [`reader::PacketReader`] implements the drain loop: at most one packet per
//! call, overflow recovery, and a bounded wait for a packet that has been
//! signalled but is not yet fully in the FIFO.

pub mod reader;

pub use reader::{PacketReader, ReadOutcome};

use crate::dmp::MAX_PACKET_SIZE;

/// FIFO size in bytes
pub const FIFO_SIZE: u16 = 1024;

/// One motion packet copied out of the FIFO
///
/// The bytes are opaque to the pipeline; only the device's decode routines
/// interpret them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawPacket {
    data: [u8; MAX_PACKET_SIZE],
    len: usize,
}

impl RawPacket {
    /// Create a zeroed packet of `len` bytes
    ///
    /// Returns `None` if `len` is zero or exceeds [`MAX_PACKET_SIZE`].
    pub const fn new(len: usize) -> Option<Self> {
        if len == 0 || len > MAX_PACKET_SIZE {
            return None;
        }
        Some(Self {
            data: [0; MAX_PACKET_SIZE],
            len,
        })
    }

    /// Packet length in bytes
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Always false; packets are never empty
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Packet contents
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Mutable packet contents, for filling from the FIFO
    pub fn as_mut_bytes(&mut self) -> &mut [u8] {
        &mut self.data[..self.len]
    }
}
