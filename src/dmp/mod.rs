//! Digital Motion Processor (DMP) Support
//!
//! The MPU-6050's DMP fuses gyroscope and accelerometer readings into a
//! quaternion and pushes fixed-size packets into the FIFO. The DMP has no
//! resident firmware: the host uploads it on every power-up, followed by a
//! configuration set that patches DMP memory. Both blobs are supplied by the
//! application through [`DmpImage`]; this crate does not ship them.
//!
//! ## Status Codes
//!
//! Loading reports a [`DmpStatus`] rather than an error so the numeric code can be
//! logged or shown on a debug channel:
//! - `0`: firmware and configuration loaded
//! - `1`: firmware read-back did not match (memory load failure)
//! - `2`: configuration set could not be applied (configuration update failure)
//!
//! ## Orientation Types
//!
//! [`Quaternion`] → [`GravityVector`] → [`OrientationSample`]. The conversion math
//! lives in [`parser`].

pub mod config;
pub mod loader;
pub mod parser;

pub use config::{
    CONFIG_OPCODE_ENABLE_INTERRUPTS, MAX_PACKET_SIZE, MOTION_APPS_20_PACKET_SIZE,
    MOTION_APPS_20_START_ADDRESS,
};
pub use loader::{DMP_BANK_SIZE, FirmwareLoader, MemoryPort, WRITE_CHUNK_SIZE};
pub use parser::DmpParser;

/// Radians to degrees
pub const RAD_TO_DEG: f32 = 180.0 / core::f32::consts::PI;

/// Result of loading the motion processor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DmpStatus {
    /// Firmware and configuration loaded
    Ready = 0,
    /// Firmware did not verify after upload
    MemoryLoadFailed = 1,
    /// Configuration set could not be applied
    ConfigUpdateFailed = 2,
}

impl DmpStatus {
    /// Numeric diagnostic code
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Map a numeric code back to a status, `None` for unknown codes
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Ready),
            1 => Some(Self::MemoryLoadFailed),
            2 => Some(Self::ConfigUpdateFailed),
            _ => None,
        }
    }

    /// Whether the DMP is usable
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// Firmware image and its companion configuration set
///
/// The configuration set is a sequence of records `[bank, offset, length, data...]`.
/// A record with `length == 0` carries a single opcode byte instead of data
/// (see [`CONFIG_OPCODE_ENABLE_INTERRUPTS`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DmpImage {
    /// DMP program bytes
    pub firmware: &'static [u8],
    /// Configuration set applied after the program is loaded
    pub config: &'static [u8],
    /// Program start address written to `DMP_CFG_1`/`DMP_CFG_2`
    pub start_address: u16,
    /// Size of each FIFO packet produced by this firmware
    pub packet_size: u16,
}

impl DmpImage {
    /// Image using the MotionApps 2.0 layout (42-byte packets, start address 0x0400)
    pub const fn motion_apps_20(firmware: &'static [u8], config: &'static [u8]) -> Self {
        Self {
            firmware,
            config,
            start_address: MOTION_APPS_20_START_ADDRESS,
            packet_size: MOTION_APPS_20_PACKET_SIZE,
        }
    }

    /// Override the packet size
    #[must_use]
    pub const fn with_packet_size(mut self, packet_size: u16) -> Self {
        self.packet_size = packet_size;
        self
    }

    /// Override the program start address
    #[must_use]
    pub const fn with_start_address(mut self, start_address: u16) -> Self {
        self.start_address = start_address;
        self
    }
}

/// Quaternion data from DMP
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Quaternion {
    /// W component (scalar part)
    pub w: f32,
    /// X component (i)
    pub x: f32,
    /// Y component (j)
    pub y: f32,
    /// Z component (k)
    pub z: f32,
}

impl Quaternion {
    /// Create a new quaternion
    pub const fn new(w: f32, x: f32, y: f32, z: f32) -> Self {
        Self { w, x, y, z }
    }

    /// Create identity quaternion (no rotation)
    pub const fn identity() -> Self {
        Self {
            w: 1.0,
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Calculate quaternion magnitude (norm)
    pub fn magnitude(&self) -> f32 {
        libm::sqrtf(self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z)
    }
}

/// Direction of gravity in the sensor frame, derived from a quaternion
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GravityVector {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

/// Which angle set the pipeline averages
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OrientationVariant {
    /// Yaw/pitch/roll relative to gravity
    #[default]
    YawPitchRoll,
    /// Euler angles (psi, theta, phi) straight from the quaternion
    Euler,
}

/// Stabilization axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    /// Yaw / psi
    X,
    /// Pitch / theta
    Y,
    /// Roll / phi
    Z,
}

/// Three orientation angles
///
/// Radians when produced by the decoder, degrees once averaged by the
/// [`SmoothingFilter`](crate::filter::SmoothingFilter). For the Euler variant the
/// fields carry psi, theta and phi respectively.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OrientationSample {
    /// Yaw (X axis)
    pub yaw: f32,
    /// Pitch (Y axis)
    pub pitch: f32,
    /// Roll (Z axis)
    pub roll: f32,
}

impl OrientationSample {
    /// Create a new sample
    pub const fn new(yaw: f32, pitch: f32, roll: f32) -> Self {
        Self { yaw, pitch, roll }
    }

    /// Angle for one axis
    pub const fn axis(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.yaw,
            Axis::Y => self.pitch,
            Axis::Z => self.roll,
        }
    }

    /// Convert radians to degrees
    #[must_use]
    pub fn to_degrees(&self) -> Self {
        Self {
            yaw: self.yaw * RAD_TO_DEG,
            pitch: self.pitch * RAD_TO_DEG,
            roll: self.roll * RAD_TO_DEG,
        }
    }
}
