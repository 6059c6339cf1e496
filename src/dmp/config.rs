//! DMP Configuration
//!
//! Constants for the MotionApps 2.0 firmware layout and a parser for the
//! configuration set that accompanies a firmware image.
//!
//! ## Configuration Set Format
//!
//! The set is a flat byte sequence of records:
//!
//! ```text
//! [bank, offset, length, data[0], ..., data[length-1]]   memory write
//! [bank, offset, 0x00,   opcode]                         special operation
//! ```
//!
//! Memory writes land at DMP address `bank << 8 | offset`. The only special
//! operation the MPU-6050 needs is [`CONFIG_OPCODE_ENABLE_INTERRUPTS`].

/// FIFO packet size produced by MotionApps 2.0 firmware
pub const MOTION_APPS_20_PACKET_SIZE: u16 = 42;

/// DMP program start address for MotionApps 2.0 firmware
pub const MOTION_APPS_20_START_ADDRESS: u16 = 0x0400;

/// Largest packet the pipeline buffers
pub const MAX_PACKET_SIZE: usize = 64;

/// Special opcode: enable FIFO overflow, zero-motion and DMP interrupts
pub const CONFIG_OPCODE_ENABLE_INTERRUPTS: u8 = 0x01;

/// Byte offsets of the quaternion components inside a MotionApps 2.0 packet
///
/// Each component is a big-endian Q30 value; only the upper 16 bits are used,
/// giving a Q14 fixed-point number.
#[derive(Debug, Clone, Copy)]
pub struct DmpPacketLayout;

impl DmpPacketLayout {
    /// Offset of quaternion W
    pub const QUAT_W: usize = 0;
    /// Offset of quaternion X
    pub const QUAT_X: usize = 4;
    /// Offset of quaternion Y
    pub const QUAT_Y: usize = 8;
    /// Offset of quaternion Z
    pub const QUAT_Z: usize = 12;
    /// Bytes needed to decode the quaternion
    pub const QUATERNION_END: usize = 14;
    /// Q14 divisor (2^14)
    pub const QUAT_SCALE: f32 = 16384.0;
}

/// A single configuration-set record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigRecord<'a> {
    /// Write `data` to DMP memory at `address`
    Write {
        /// DMP memory address (`bank << 8 | offset`)
        address: u16,
        /// Bytes to write
        data: &'a [u8],
    },
    /// Special operation identified by an opcode
    Special(u8),
}

/// Iterator over the records of a configuration set
///
/// Yields `Err(offset)` once and stops if a record is truncated.
#[derive(Debug, Clone)]
pub struct ConfigRecords<'a> {
    set: &'a [u8],
    position: usize,
    failed: bool,
}

impl<'a> ConfigRecords<'a> {
    /// Start iterating over a configuration set
    pub const fn new(set: &'a [u8]) -> Self {
        Self {
            set,
            position: 0,
            failed: false,
        }
    }
}

impl<'a> Iterator for ConfigRecords<'a> {
    type Item = Result<ConfigRecord<'a>, usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.position >= self.set.len() {
            return None;
        }

        let start = self.position;
        let Some(header) = self.set.get(start..start + 3) else {
            self.failed = true;
            return Some(Err(start));
        };
        let (bank, offset, length) = (header[0], header[1], header[2]);
        let body = start + 3;

        if length == 0 {
            let Some(&opcode) = self.set.get(body) else {
                self.failed = true;
                return Some(Err(start));
            };
            self.position = body + 1;
            return Some(Ok(ConfigRecord::Special(opcode)));
        }

        let end = body + usize::from(length);
        let Some(data) = self.set.get(body..end) else {
            self.failed = true;
            return Some(Err(start));
        };
        self.position = end;

        Some(Ok(ConfigRecord::Write {
            address: u16::from_be_bytes([bank, offset]),
            data,
        }))
    }
}
