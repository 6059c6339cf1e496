//! Test utilities and helper functions

use crate::common::mock_interface::MockInterface;
use mpu6050_gimbal::dmp::DmpImage;
use mpu6050_gimbal::Mpu6050Driver;

/// Mock delay implementation for testing
///
/// This is a no-op delay that implements the embedded-hal DelayNs trait
/// for use in tests where actual delays are not needed.
#[derive(Debug, Clone, Copy)]
pub struct MockDelay;

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, _ns: u32) {
        // No-op for testing
    }

    fn delay_us(&mut self, _us: u32) {
        // No-op for testing
    }

    fn delay_ms(&mut self, _ms: u32) {
        // No-op for testing
    }
}

/// Synthetic DMP program: 600 bytes spanning three banks
pub static TEST_FIRMWARE: [u8; 600] = {
    let mut firmware = [0u8; 600];
    let mut i = 0;
    while i < firmware.len() {
        firmware[i] = (i % 251) as u8 + 1;
        i += 1;
    }
    firmware
};

/// Configuration set: one 3-byte memory patch in bank 3, then the interrupt opcode
pub static TEST_CONFIG: [u8; 10] = [0x03, 0x7B, 0x03, 0x4C, 0xCD, 0x6C, 0x07, 0x86, 0x00, 0x01];

/// Image built from the synthetic firmware and configuration set
pub fn test_image() -> DmpImage {
    DmpImage::motion_apps_20(&TEST_FIRMWARE, &TEST_CONFIG)
}

/// Create a mock driver for testing
/// Returns (driver, interface) where interface is a clone that shares state with the driver
pub fn create_mock_driver() -> (Mpu6050Driver<MockInterface>, MockInterface) {
    create_mock_driver_with_image(test_image())
}

/// Create a mock driver that uploads a specific image
pub fn create_mock_driver_with_image(
    image: DmpImage,
) -> (Mpu6050Driver<MockInterface>, MockInterface) {
    let interface = MockInterface::new();
    let interface_clone = interface.clone();
    let driver = Mpu6050Driver::new(interface, image);
    (driver, interface_clone)
}

/// Encode a quaternion into a 42-byte MotionApps packet
pub fn quaternion_packet(w: f32, x: f32, y: f32, z: f32) -> [u8; 42] {
    let mut packet = [0u8; 42];
    for (i, value) in [w, x, y, z].into_iter().enumerate() {
        let raw = (value * 16384.0).round() as i16;
        packet[i * 4..i * 4 + 2].copy_from_slice(&raw.to_be_bytes());
    }
    packet
}

/// Packet that decodes to the given yaw (degrees), zero pitch and roll
pub fn yaw_packet(degrees: f32) -> [u8; 42] {
    let half = -degrees.to_radians() / 2.0;
    quaternion_packet(half.cos(), 0.0, 0.0, half.sin())
}

/// Packet that decodes to the given pitch (degrees), zero yaw and roll
pub fn pitch_packet(degrees: f32) -> [u8; 42] {
    let half = -degrees.to_radians() / 2.0;
    quaternion_packet(half.cos(), 0.0, half.sin(), 0.0)
}

/// Packet that decodes to the given roll (degrees), zero yaw and pitch
pub fn roll_packet(degrees: f32) -> [u8; 42] {
    let half = degrees.to_radians() / 2.0;
    quaternion_packet(half.cos(), half.sin(), 0.0, 0.0)
}

/// Assert that two floating point values are approximately equal
pub fn assert_float_eq(a: f32, b: f32, epsilon: f32) {
    let diff = (a - b).abs();
    assert!(
        diff < epsilon,
        "Values not equal within epsilon: {} vs {} (diff: {}, epsilon: {})",
        a,
        b,
        diff,
        epsilon
    );
}
