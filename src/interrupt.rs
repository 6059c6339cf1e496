//! Interrupt configuration, status decoding, and the data-ready latch
//!
//! The MPU-6050 drives a single INT pin. With the DMP running, the pin pulses each
//! time a motion packet lands in the FIFO. The host's interrupt handler must do
//! nothing but call [`InterruptLatch::signal`]; the polling loop picks the flag up
//! with [`InterruptLatch::take`] and does all register access itself.
//!
//! # Example
//!
//! ```ignore
//! # use mpu6050_gimbal::InterruptLatch;
//! static LATCH: InterruptLatch = InterruptLatch::new();
//!
//! #[interrupt]
//! fn IO_IRQ_BANK0() {
//!     LATCH.signal();
//! }
//! ```

use core::sync::atomic::{AtomicBool, Ordering};

/// `INT_STATUS` bit: raw sensor data ready
pub const DATA_READY_BIT: u8 = 0x01;
/// `INT_STATUS` bit: DMP packet ready
pub const DMP_INT_BIT: u8 = 0x02;
/// `INT_STATUS` bit: I2C master event
pub const I2C_MST_INT_BIT: u8 = 0x08;
/// `INT_STATUS` bit: FIFO overflow
pub const FIFO_OFLOW_BIT: u8 = 0x10;
/// `INT_STATUS` bit: zero motion detected
pub const ZMOT_BIT: u8 = 0x20;
/// `INT_STATUS` bit: motion detected
pub const MOT_BIT: u8 = 0x40;

/// Single-word "data ready" flag shared between interrupt and polling contexts
///
/// Signals coalesce: any number of [`signal`](Self::signal) calls between two
/// [`take`](Self::take) calls are observed exactly once. Signals are ignored until
/// the latch is armed, which the controller does once the DMP is running.
#[derive(Debug)]
pub struct InterruptLatch {
    pending: AtomicBool,
    armed: AtomicBool,
}

impl InterruptLatch {
    /// Create a disarmed, clear latch (usable in a `static`)
    pub const fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
            armed: AtomicBool::new(false),
        }
    }

    /// Record a data-ready edge. Interrupt-context safe.
    pub fn signal(&self) {
        if self.armed.load(Ordering::Acquire) {
            self.pending.store(true, Ordering::Release);
        }
    }

    /// Consume a pending signal
    ///
    /// Only plain atomic loads and stores are used, so this works on cores
    /// without compare-and-swap (Cortex-M0, AVR). A signal that lands between
    /// the load and the store coalesces into the one being consumed.
    ///
    /// # Returns
    ///
    /// `true` if at least one signal arrived since the last call
    pub fn take(&self) -> bool {
        if self.pending.load(Ordering::Acquire) {
            self.pending.store(false, Ordering::Release);
            true
        } else {
            false
        }
    }

    /// Check the flag without clearing it
    pub fn is_set(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Start accepting signals
    pub fn arm(&self) {
        self.pending.store(false, Ordering::Release);
        self.armed.store(true, Ordering::Release);
    }

    /// Stop accepting signals and drop any pending one
    pub fn disarm(&self) {
        self.armed.store(false, Ordering::Release);
        self.pending.store(false, Ordering::Release);
    }

    /// Whether signals are currently accepted
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }
}

impl Default for InterruptLatch {
    fn default() -> Self {
        Self::new()
    }
}

/// Interrupt source configuration (`INT_ENABLE`)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(clippy::struct_excessive_bools)]
pub struct InterruptConfig {
    /// Enable raw data ready interrupt
    pub data_ready: bool,
    /// Enable DMP packet interrupt
    pub dmp: bool,
    /// Enable I2C master interrupt
    pub i2c_master: bool,
    /// Enable FIFO overflow interrupt
    pub fifo_overflow: bool,
    /// Enable zero-motion interrupt
    pub zero_motion: bool,
    /// Enable motion interrupt
    pub motion: bool,
}

impl InterruptConfig {
    /// DMP packet and FIFO overflow interrupts, the pipeline's normal setting
    pub const fn dmp_fifo() -> Self {
        Self {
            data_ready: false,
            dmp: true,
            i2c_master: false,
            fifo_overflow: true,
            zero_motion: false,
            motion: false,
        }
    }

    /// Configuration-set opcode 0x01: DMP, FIFO overflow and zero-motion interrupts
    pub const fn dmp_fifo_zero_motion() -> Self {
        Self {
            zero_motion: true,
            ..Self::dmp_fifo()
        }
    }

    /// Check if any interrupt is enabled
    pub const fn any_enabled(&self) -> bool {
        self.data_ready
            || self.dmp
            || self.i2c_master
            || self.fifo_overflow
            || self.zero_motion
            || self.motion
    }

    /// Convert to the raw `INT_ENABLE` register value
    pub const fn to_raw(&self) -> u8 {
        let mut value = 0u8;
        if self.data_ready {
            value |= DATA_READY_BIT;
        }
        if self.dmp {
            value |= DMP_INT_BIT;
        }
        if self.i2c_master {
            value |= I2C_MST_INT_BIT;
        }
        if self.fifo_overflow {
            value |= FIFO_OFLOW_BIT;
        }
        if self.zero_motion {
            value |= ZMOT_BIT;
        }
        if self.motion {
            value |= MOT_BIT;
        }
        value
    }
}

/// Decoded `INT_STATUS` byte
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InterruptStatus {
    raw: u8,
}

impl InterruptStatus {
    /// Wrap a raw status byte
    pub const fn from_raw(raw: u8) -> Self {
        Self { raw }
    }

    /// Raw status byte
    pub const fn raw(&self) -> u8 {
        self.raw
    }

    /// FIFO overflowed since the last status read
    pub const fn fifo_overflow(&self) -> bool {
        self.raw & FIFO_OFLOW_BIT != 0
    }

    /// DMP signalled a complete packet
    pub const fn dmp_ready(&self) -> bool {
        self.raw & DMP_INT_BIT != 0
    }

    /// Raw sensor data ready
    pub const fn data_ready(&self) -> bool {
        self.raw & DATA_READY_BIT != 0
    }

    /// Check if any interrupt flag is set
    pub const fn any_set(&self) -> bool {
        self.raw != 0
    }
}
