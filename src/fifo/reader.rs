//! Packet reader / FIFO manager
//!
//! ## Algorithm (per call)
//!
//! 1. Nothing to do unless the interrupt latch fired or the tracked byte count
//!    already covers a packet.
//! 2. Clear the latch, read `INT_STATUS` and the FIFO count.
//! 3. Overflow flag set, or FIFO full: reset the FIFO, report
//!    [`ReadOutcome::Overflow`].
//! 4. DMP-ready flag clear: record the count and stay idle.
//! 5. DMP-ready flag set: wait (bounded) until a whole packet is buffered, read
//!    exactly one packet, and subtract it from the tracked count.
//!
//! `INT_STATUS` clears on read, so a backlog left by step 5 makes the next call
//! look at the device without a new interrupt, but the buffered packet is only
//! read once the DMP has raised its ready bit again.
//!
//! The reader never returns more than one packet per call.

use crate::Error;
use crate::device::MotionDevice;
use crate::fifo::{FIFO_SIZE, RawPacket};
use crate::interrupt::{InterruptLatch, InterruptStatus};

/// Default bound on FIFO count re-reads while waiting for a packet to complete
pub const DEFAULT_WAIT_POLLS: u32 = 1000;

/// Result of one reader step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadOutcome {
    /// No packet available this call
    Idle,
    /// FIFO overflowed and was reset; this cycle's data is dropped
    Overflow {
        /// FIFO count observed before the reset
        count: u16,
    },
    /// One packet read
    Packet(RawPacket),
}

/// Drains DMP packets from the device FIFO
#[derive(Debug, Clone)]
pub struct PacketReader {
    packet_size: u16,
    tracked_count: u16,
    max_wait_polls: u32,
}

impl PacketReader {
    /// Create a reader for packets of `packet_size` bytes
    ///
    /// Returns `None` if no [`RawPacket`] can hold that size.
    pub const fn new(packet_size: u16, max_wait_polls: u32) -> Option<Self> {
        if RawPacket::new(packet_size as usize).is_none() {
            return None;
        }
        Some(Self {
            packet_size,
            tracked_count: 0,
            max_wait_polls,
        })
    }

    /// Expected packet size in bytes
    pub const fn packet_size(&self) -> u16 {
        self.packet_size
    }

    /// FIFO bytes believed to be buffered after the last read
    pub const fn tracked_count(&self) -> u16 {
        self.tracked_count
    }

    /// Whether a buffered packet can be read without waiting for an interrupt
    pub const fn has_backlog(&self) -> bool {
        self.tracked_count >= self.packet_size
    }

    /// Run one step of the drain loop
    ///
    /// # Arguments
    ///
    /// * `device` - Device to query and read from
    /// * `latch` - Interrupt latch; consumed if set
    ///
    /// # Returns
    ///
    /// [`ReadOutcome::Packet`] with exactly one packet, [`ReadOutcome::Overflow`]
    /// after a FIFO reset, or [`ReadOutcome::Idle`].
    ///
    /// # Errors
    ///
    /// - [`Error::Bus`] if communication with the device fails
    /// - [`Error::FifoTimeout`] if the DMP signalled a packet but the FIFO did not
    ///   reach a full packet within the wait bound
    pub fn read<D: MotionDevice>(
        &mut self,
        device: &mut D,
        latch: &InterruptLatch,
    ) -> Result<ReadOutcome, Error<D::BusError>> {
        let signalled = latch.take();
        if !signalled && !self.has_backlog() {
            return Ok(ReadOutcome::Idle);
        }

        let status = InterruptStatus::from_raw(device.interrupt_status()?);
        let mut count = device.fifo_count()?;

        if status.fifo_overflow() || count >= FIFO_SIZE {
            device.reset_fifo()?;
            self.tracked_count = 0;

            #[cfg(feature = "defmt")]
            defmt::warn!(
                "FIFO overflow (status=0x{:02X}, count={}), FIFO reset",
                status.raw(),
                count
            );

            return Ok(ReadOutcome::Overflow { count });
        }

        if !status.dmp_ready() {
            self.tracked_count = count;
            return Ok(ReadOutcome::Idle);
        }

        let mut polls = 0;
        while count < self.packet_size {
            if polls >= self.max_wait_polls {
                self.tracked_count = count;

                #[cfg(feature = "defmt")]
                defmt::warn!(
                    "FIFO stalled at {} bytes, expected {}",
                    count,
                    self.packet_size
                );

                return Err(Error::FifoTimeout);
            }
            core::hint::spin_loop();
            count = device.fifo_count()?;
            polls += 1;
        }

        let Some(mut packet) = RawPacket::new(usize::from(self.packet_size)) else {
            return Err(Error::InvalidConfig);
        };
        device.read_fifo(packet.as_mut_bytes())?;
        self.tracked_count = count - self.packet_size;

        #[cfg(feature = "defmt")]
        defmt::trace!("Read packet, {} bytes left in FIFO", self.tracked_count);

        Ok(ReadOutcome::Packet(packet))
    }
}
