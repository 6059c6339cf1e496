//! DMP Firmware Loader
//!
//! The DMP does not have pre-programmed firmware, so the program and its
//! configuration set are uploaded by the host on every power-up.
//!
//! ## Loading Process
//!
//! DMP memory is reached through three registers:
//! - `BANK_SEL` (0x6D): Selects the memory bank (256-byte pages)
//! - `MEM_START_ADDR` (0x6E): Sets the start address within the current bank
//! - `MEM_R_W` (0x6F): Data port; the address auto-increments on each byte
//!
//! Data is written in chunks of at most [`WRITE_CHUNK_SIZE`] bytes that never cross
//! a bank boundary. Every chunk is read back and compared; the first mismatch
//! aborts the load.

use crate::dmp::config::{CONFIG_OPCODE_ENABLE_INTERRUPTS, ConfigRecord, ConfigRecords};

/// Maximum size of a single memory transaction (bytes per chunk)
pub const WRITE_CHUNK_SIZE: usize = 16;

/// DMP memory bank size (bytes)
pub const DMP_BANK_SIZE: usize = 256;

/// Access to DMP memory and the few registers the configuration set touches
pub trait MemoryPort {
    /// Bus error type
    type Error;

    /// Write a chunk that lies within one bank
    fn write_block(&mut self, bank: u8, offset: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Read a chunk that lies within one bank
    fn read_block(&mut self, bank: u8, offset: u8, buffer: &mut [u8]) -> Result<(), Self::Error>;

    /// Run a special configuration opcode. Returns `false` for unsupported opcodes.
    fn special(&mut self, opcode: u8) -> Result<bool, Self::Error>;
}

/// Firmware loader implementation
pub struct FirmwareLoader;

impl FirmwareLoader {
    /// Upload `data` to DMP memory starting at `address` and verify it
    ///
    /// # Returns
    ///
    /// `Ok(true)` if every chunk read back identical, `Ok(false)` on the first
    /// mismatch, or the bus error.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn write_verified<M: MemoryPort>(
        port: &mut M,
        address: u16,
        data: &[u8],
    ) -> Result<bool, M::Error> {
        let mut current_address = usize::from(address);
        let mut remaining = data;
        let mut readback = [0u8; WRITE_CHUNK_SIZE];

        while !remaining.is_empty() {
            #[allow(clippy::cast_possible_truncation)]
            let bank = (current_address / DMP_BANK_SIZE) as u8;
            #[allow(clippy::cast_possible_truncation)]
            let offset = (current_address % DMP_BANK_SIZE) as u8;

            let room_in_bank = DMP_BANK_SIZE - usize::from(offset);
            let len = remaining.len().min(WRITE_CHUNK_SIZE).min(room_in_bank);
            let (chunk, rest) = remaining.split_at(len);

            port.write_block(bank, offset, chunk)?;
            port.read_block(bank, offset, &mut readback[..len])?;

            if readback[..len] != *chunk {
                #[cfg(feature = "defmt")]
                defmt::debug!(
                    "DMP verify mismatch at bank {} offset 0x{:02X}",
                    bank,
                    offset
                );
                return Ok(false);
            }

            current_address += len;
            remaining = rest;
        }

        Ok(true)
    }

    /// Upload a firmware program starting at DMP address 0
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn load_firmware<M: MemoryPort>(port: &mut M, firmware: &[u8]) -> Result<bool, M::Error> {
        #[cfg(feature = "defmt")]
        defmt::debug!("Loading {} bytes of DMP firmware", firmware.len());

        Self::write_verified(port, 0, firmware)
    }

    /// Apply a configuration set
    ///
    /// Returns `Ok(false)` if the set is malformed, a write fails verification, or
    /// an opcode is not supported.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn apply_config<M: MemoryPort>(port: &mut M, set: &[u8]) -> Result<bool, M::Error> {
        for record in ConfigRecords::new(set) {
            let Ok(record) = record else {
                return Ok(false);
            };

            let applied = match record {
                ConfigRecord::Write { address, data } => Self::write_verified(port, address, data)?,
                ConfigRecord::Special(opcode) => {
                    #[cfg(feature = "defmt")]
                    defmt::trace!("DMP config special opcode 0x{:02X}", opcode);
                    port.special(opcode)?
                }
            };

            if !applied {
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Whether an opcode is understood by [`MemoryPort`] implementations in this crate
    pub const fn is_known_opcode(opcode: u8) -> bool {
        opcode == CONFIG_OPCODE_ENABLE_INTERRUPTS
    }
}
