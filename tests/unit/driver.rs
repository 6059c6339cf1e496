//! Unit tests for the register-level driver

use crate::common::mock_interface::{
    FIFO_COUNTH, FIFO_COUNTL, FIFO_R_W, PWR_MGMT_1, USER_CTRL, WHO_AM_I,
};
use crate::common::{MockDelay, MockError, Operation, create_mock_driver};
use mpu6050_gimbal::{CalibrationOffsets, Error, MotionDevice};

#[test]
fn test_connection_accepts_mpu6050() {
    let (mut driver, _interface) = create_mock_driver();

    assert_eq!(driver.read_who_am_i(), Ok(0x34));
    assert_eq!(driver.test_connection(), Ok(true));
    assert!(driver.verify_identity().is_ok());
}

#[test]
fn test_connection_rejects_other_device() {
    let (mut driver, interface) = create_mock_driver();
    // MPU-9250 style identity
    interface.set_who_am_i(0x71);

    assert_eq!(driver.test_connection(), Ok(false));
    assert_eq!(driver.verify_identity(), Err(Error::InvalidDevice(0x38)));
}

#[test]
fn test_initialize_wakes_device() {
    let (mut driver, interface) = create_mock_driver();
    assert_eq!(interface.register(PWR_MGMT_1), 0x40);

    driver.initialize(&mut MockDelay).unwrap();

    let pwr_mgmt = interface.register(PWR_MGMT_1);
    assert_eq!(pwr_mgmt & 0x40, 0, "sleep bit should be cleared");
    assert_eq!(pwr_mgmt & 0x07, 1, "clock should be PLL with X gyro");
    assert_eq!(interface.register(0x1B) & 0x18, 0, "gyro range should be 250 dps");
    assert_eq!(interface.register(0x1C) & 0x18, 0, "accel range should be 2 g");
}

#[test]
fn test_calibration_offsets_big_endian() {
    let (mut driver, interface) = create_mock_driver();

    driver
        .set_calibration_offsets(&CalibrationOffsets::new(220, 76, -85, 1788))
        .unwrap();

    assert_eq!(interface.register(0x13), 0x00);
    assert_eq!(interface.register(0x14), 0xDC);
    assert_eq!(interface.register(0x15), 0x00);
    assert_eq!(interface.register(0x16), 0x4C);
    assert_eq!(interface.register(0x17), 0xFF);
    assert_eq!(interface.register(0x18), 0xAB);
    assert_eq!(interface.register(0x0A), 0x06);
    assert_eq!(interface.register(0x0B), 0xFC);
}

#[test]
fn test_dmp_enable_sets_fifo_enable() {
    let (mut driver, interface) = create_mock_driver();

    driver.set_dmp_enabled(true).unwrap();
    assert_eq!(interface.register(USER_CTRL) & 0xC0, 0xC0);

    driver.set_dmp_enabled(false).unwrap();
    assert_eq!(interface.register(USER_CTRL) & 0xC0, 0x00);
}

#[test]
fn test_fifo_count_and_burst_read() {
    let (mut driver, interface) = create_mock_driver();
    let bytes: Vec<u8> = (0..300u16).map(|i| i as u8).collect();
    interface.push_fifo(&bytes);

    assert_eq!(driver.fifo_count(), Ok(300));

    let mut buffer = [0u8; 42];
    driver.read_fifo(&mut buffer).unwrap();
    assert_eq!(&buffer[..], &bytes[..42]);
    assert_eq!(driver.fifo_count(), Ok(258));

    // Every byte came through the FIFO data port
    let fifo_reads = interface
        .operations()
        .iter()
        .filter(|op| matches!(op, Operation::ReadRegister { address: FIFO_R_W, .. }))
        .count();
    assert_eq!(fifo_reads, 42);
}

#[test]
fn test_empty_fifo_read_is_noop() {
    let (mut driver, interface) = create_mock_driver();
    interface.clear_operations();

    driver.read_fifo(&mut []).unwrap();
    assert!(interface.operations().is_empty());
}

#[test]
fn test_reset_fifo_clears_queue() {
    let (mut driver, interface) = create_mock_driver();
    interface.push_fifo(&[1; 100]);

    driver.reset_fifo().unwrap();

    assert_eq!(interface.fifo_len(), 0);
    assert_eq!(driver.fifo_count(), Ok(0));
    // FIFO_RESET self-clears
    assert_eq!(interface.register(USER_CTRL) & 0x04, 0);
}

#[test]
fn test_interrupt_status_reports_dmp_and_overflow() {
    let (mut driver, interface) = create_mock_driver();

    assert_eq!(driver.interrupt_status(), Ok(0));

    interface.push_fifo(&[0; 42]);
    assert_eq!(driver.interrupt_status(), Ok(0x02));

    interface.push_fifo(&[0; 42]);
    interface.set_fifo_overflow();
    assert_eq!(driver.interrupt_status(), Ok(0x12));
}

#[test]
fn test_interrupt_status_clears_on_read() {
    let (mut driver, interface) = create_mock_driver();
    interface.push_fifo(&[0; 84]);

    assert_eq!(driver.interrupt_status(), Ok(0x02));
    // Bytes are still buffered but the DMP has not raised a new packet
    assert_eq!(driver.interrupt_status(), Ok(0));
    assert_eq!(driver.fifo_count(), Ok(84));

    interface.set_fifo_overflow();
    assert_eq!(driver.interrupt_status(), Ok(0x10));
    assert_eq!(driver.interrupt_status(), Ok(0));
}

#[test]
fn test_fifo_count_is_one_burst() {
    let (mut driver, interface) = create_mock_driver();
    interface.push_fifo(&[0; 0x03FE]);
    // FIFO grows by two bytes after every bus transaction
    interface.set_fifo_fill_per_read(2);
    interface.clear_operations();

    // A split high/low read would see 0x03 then 0x00 and report 0x0300
    assert_eq!(driver.fifo_count(), Ok(0x03FE));
    assert_eq!(
        interface.operations(),
        vec![
            Operation::ReadRegister {
                address: FIFO_COUNTH,
                value: 0x03,
            },
            Operation::ReadRegister {
                address: FIFO_COUNTL,
                value: 0xFE,
            },
        ]
    );

    assert_eq!(driver.fifo_count(), Ok(0x0400));
}

#[test]
fn test_packet_size_comes_from_image() {
    let (driver, _interface) = create_mock_driver();
    assert_eq!(driver.fifo_packet_size(), 42);
}

#[test]
fn test_read_failure_is_bus_error() {
    let (mut driver, interface) = create_mock_driver();

    interface.fail_next_read();
    assert_eq!(
        driver.fifo_count(),
        Err(Error::Bus(MockError::Communication))
    );

    // Error was only for one operation
    assert_eq!(driver.fifo_count(), Ok(0));
}

#[test]
fn test_write_failure_is_bus_error() {
    let (mut driver, interface) = create_mock_driver();

    interface.fail_next_write();
    assert_eq!(
        driver.set_calibration_offsets(&CalibrationOffsets::default()),
        Err(Error::Bus(MockError::Communication))
    );
}

#[test]
fn test_release_returns_interface() {
    let (mut driver, _interface) = create_mock_driver();
    driver.read_who_am_i().unwrap();

    let interface = driver.release();
    assert_eq!(interface.register(WHO_AM_I), 0x68);
}
