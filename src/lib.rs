#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

#[cfg(test)]
extern crate std;

pub mod device;
pub mod interface;
pub mod registers;

pub mod dmp;
pub mod fifo;
pub mod interrupt;

pub mod command;
pub mod controller;
pub mod filter;

// Re-export main types
pub use command::{Axis, CommandEncoder, CommandEvent, CommandSet, Motion, Polarity};
pub use controller::{
    ControllerConfig, DeviceState, ImuController, InitFailure, PipelineStats, PollOutcome,
    SmoothedOutput,
};
pub use device::{CalibrationOffsets, MotionDevice, Mpu6050Driver};
pub use dmp::{
    DmpImage, DmpStatus, GravityVector, OrientationSample, OrientationVariant, Quaternion,
};
pub use fifo::{FIFO_SIZE, PacketReader, RawPacket, ReadOutcome};
pub use filter::SmoothingFilter;
pub use interface::{I2cInterface, InterfaceError};
pub use interrupt::{InterruptConfig, InterruptLatch, InterruptStatus};

/// MPU-6050 I2C address when AD0 pin is low (default: 0x68)
///
/// Most breakout boards pull AD0 low. Use [`I2cInterface::default()`] for this
/// configuration.
pub const I2C_ADDRESS_AD0_LOW: u8 = 0x68;

/// MPU-6050 I2C address when AD0 pin is high (alternative: 0x69)
///
/// Use [`I2cInterface::alternative()`] for this configuration.
pub const I2C_ADDRESS_AD0_HIGH: u8 = 0x69;

/// Expected value of the `WHO_AM_I` identity bits (register bits 6:1)
pub const WHO_AM_I_VALUE: u8 = 0x34;

/// Driver errors
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Communication error with the device
    Bus(E),
    /// Invalid `WHO_AM_I` register value (contains the actual value read)
    InvalidDevice(u8),
    /// Invalid configuration parameter
    InvalidConfig,
    /// Bring-up failed; the controller is faulted
    Init(InitFailure),
    /// A signalled packet did not fully arrive within the wait bound
    FifoTimeout,
    /// Device packet size is zero or larger than a [`RawPacket`] can hold
    InvalidPacketSize(u16),
    /// Packet could not be decoded into an orientation
    MalformedPacket,
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Self::Bus(error)
    }
}
