//! Common test utilities and mock implementations

#![allow(dead_code)]

pub mod fake_device;
pub mod test_utils;

pub use fake_device::{FakeError, FakeMotionDevice};
pub use mock_interface::{MockError, MockInterface, Operation};
pub use test_utils::{
    MockDelay, assert_float_eq, create_mock_driver, pitch_packet, quaternion_packet, roll_packet,
    yaw_packet,
};
