//! DMP FIFO Packet Parser
//!
//! Turns a raw MotionApps packet into orientation values. The conversion is a
//! fixed chain:
//!
//! ```text
//! packet ──► Quaternion ──► GravityVector ──► yaw / pitch / roll
//!                 └───────────────────────────► euler (psi, theta, phi)
//! ```
//!
//! All angles are in radians.
//!
//! ## Usage
//!
//! ```no_run
//! # use mpu6050_gimbal::dmp::parser::DmpParser;
//! # let packet = [0u8; 42];
//! let parser = DmpParser::new();
//! if let Some(q) = parser.parse_quaternion(&packet) {
//!     let gravity = parser.gravity(&q);
//!     let ypr = parser.yaw_pitch_roll(&q, &gravity);
//! }
//! ```

use crate::dmp::config::DmpPacketLayout;
use crate::dmp::{GravityVector, OrientationSample, OrientationVariant, Quaternion};

/// DMP FIFO packet parser
#[derive(Debug, Clone, Copy, Default)]
pub struct DmpParser;

impl DmpParser {
    /// Create a new DMP parser
    pub const fn new() -> Self {
        Self
    }

    /// Parse the quaternion from a MotionApps packet
    ///
    /// Returns `None` if the packet is too short to hold a quaternion.
    pub fn parse_quaternion(&self, packet: &[u8]) -> Option<Quaternion> {
        if packet.len() < DmpPacketLayout::QUATERNION_END {
            return None;
        }

        let component = |offset: usize| {
            f32::from(i16::from_be_bytes([packet[offset], packet[offset + 1]]))
                / DmpPacketLayout::QUAT_SCALE
        };

        Some(Quaternion {
            w: component(DmpPacketLayout::QUAT_W),
            x: component(DmpPacketLayout::QUAT_X),
            y: component(DmpPacketLayout::QUAT_Y),
            z: component(DmpPacketLayout::QUAT_Z),
        })
    }

    /// Gravity direction in the sensor frame
    pub fn gravity(&self, q: &Quaternion) -> GravityVector {
        GravityVector {
            x: 2.0 * (q.x * q.z - q.w * q.y),
            y: 2.0 * (q.w * q.x + q.y * q.z),
            z: q.w * q.w - q.x * q.x - q.y * q.y + q.z * q.z,
        }
    }

    /// Yaw, pitch and roll relative to gravity
    pub fn yaw_pitch_roll(&self, q: &Quaternion, gravity: &GravityVector) -> OrientationSample {
        let yaw = libm::atan2f(
            2.0 * q.x * q.y - 2.0 * q.w * q.z,
            2.0 * q.w * q.w + 2.0 * q.x * q.x - 1.0,
        );
        let pitch = libm::atanf(
            gravity.x / libm::sqrtf(gravity.y * gravity.y + gravity.z * gravity.z),
        );
        let roll = libm::atanf(
            gravity.y / libm::sqrtf(gravity.x * gravity.x + gravity.z * gravity.z),
        );

        OrientationSample { yaw, pitch, roll }
    }

    /// Euler angles (psi, theta, phi), returned in yaw/pitch/roll slots
    pub fn euler(&self, q: &Quaternion) -> OrientationSample {
        let psi = libm::atan2f(
            2.0 * q.x * q.y - 2.0 * q.w * q.z,
            2.0 * q.w * q.w + 2.0 * q.x * q.x - 1.0,
        );
        // Clamp so numeric noise on a unit quaternion never leaves asin's domain
        let sin_theta = (2.0 * q.x * q.z + 2.0 * q.w * q.y).clamp(-1.0, 1.0);
        let theta = -libm::asinf(sin_theta);
        let phi = libm::atan2f(
            2.0 * q.y * q.z - 2.0 * q.w * q.x,
            2.0 * q.w * q.w + 2.0 * q.z * q.z - 1.0,
        );

        OrientationSample {
            yaw: psi,
            pitch: theta,
            roll: phi,
        }
    }

    /// Full decode of one packet for the selected variant
    pub fn orientation(
        &self,
        packet: &[u8],
        variant: OrientationVariant,
    ) -> Option<OrientationSample> {
        let q = self.parse_quaternion(packet)?;
        Some(match variant {
            OrientationVariant::YawPitchRoll => {
                let gravity = self.gravity(&q);
                self.yaw_pitch_roll(&q, &gravity)
            }
            OrientationVariant::Euler => self.euler(&q),
        })
    }
}
