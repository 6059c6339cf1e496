//! `MotionDevice` fake for pipeline tests
//!
//! Works at the level of the device contract rather than registers, so tests can
//! script FIFO contents, status bytes, stalls and bring-up failures directly.
//!
//! Every push raises the DMP-ready status bit. Like the real `INT_STATUS` it
//! clears on read, so bytes left in the FIFO do not re-raise it.

use mpu6050_gimbal::device::{CalibrationOffsets, MotionDevice};
use mpu6050_gimbal::dmp::DmpStatus;
use mpu6050_gimbal::Error;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Fake bus error
#[derive(Debug, Clone, PartialEq)]
pub enum FakeError {
    /// Injected bus failure
    Bus,
}

#[derive(Debug)]
struct FakeState {
    fifo: VecDeque<u8>,
    /// Bytes that reach the FIFO a few at a time, one chunk per count query
    incoming: VecDeque<u8>,
    arrival_chunk: usize,
    overflow: bool,
    dmp_ready: bool,
    /// Reported count ceiling (simulates a FIFO that stops filling)
    stall_at: Option<u16>,
    /// Force the status byte instead of deriving it
    status_override: Option<u8>,
    packet_size: u16,
    connected: bool,
    dmp_status: DmpStatus,
    fail_bus: bool,
    dmp_enabled: bool,
    offsets: Option<CalibrationOffsets>,
    status_reads: usize,
    count_reads: usize,
    fifo_reads: usize,
    fifo_resets: usize,
    load_attempts: usize,
}

/// Scriptable motion device
#[derive(Clone)]
pub struct FakeMotionDevice {
    state: Rc<RefCell<FakeState>>,
}

#[allow(dead_code)]
impl FakeMotionDevice {
    /// Healthy device producing 42-byte packets
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(FakeState {
                fifo: VecDeque::new(),
                incoming: VecDeque::new(),
                arrival_chunk: 0,
                overflow: false,
                dmp_ready: false,
                stall_at: None,
                status_override: None,
                packet_size: 42,
                connected: true,
                dmp_status: DmpStatus::Ready,
                fail_bus: false,
                dmp_enabled: false,
                offsets: None,
                status_reads: 0,
                count_reads: 0,
                fifo_reads: 0,
                fifo_resets: 0,
                load_attempts: 0,
            })),
        }
    }

    pub fn push_packet(&self, packet: &[u8]) {
        let mut state = self.state.borrow_mut();
        state.fifo.extend(packet.iter().copied());
        state.dmp_ready = true;
    }

    /// Queue bytes that trickle into the FIFO `chunk` bytes per count query
    pub fn push_slowly(&self, bytes: &[u8], chunk: usize) {
        let mut state = self.state.borrow_mut();
        state.incoming.extend(bytes.iter().copied());
        state.arrival_chunk = chunk;
        state.dmp_ready = true;
    }

    pub fn fill_fifo(&self, len: usize) {
        let mut state = self.state.borrow_mut();
        state.fifo.extend(std::iter::repeat_n(0xAA, len));
        state.dmp_ready = true;
    }

    pub fn set_overflow(&self) {
        self.state.borrow_mut().overflow = true;
    }

    pub fn set_stall_at(&self, count: Option<u16>) {
        self.state.borrow_mut().stall_at = count;
    }

    pub fn set_status_override(&self, status: Option<u8>) {
        self.state.borrow_mut().status_override = status;
    }

    pub fn set_packet_size(&self, size: u16) {
        self.state.borrow_mut().packet_size = size;
    }

    pub fn set_connected(&self, connected: bool) {
        self.state.borrow_mut().connected = connected;
    }

    pub fn set_dmp_status(&self, status: DmpStatus) {
        self.state.borrow_mut().dmp_status = status;
    }

    pub fn set_fail_bus(&self, fail: bool) {
        self.state.borrow_mut().fail_bus = fail;
    }

    pub fn fifo_len(&self) -> usize {
        self.state.borrow().fifo.len()
    }

    pub fn dmp_enabled(&self) -> bool {
        self.state.borrow().dmp_enabled
    }

    pub fn offsets(&self) -> Option<CalibrationOffsets> {
        self.state.borrow().offsets
    }

    pub fn status_reads(&self) -> usize {
        self.state.borrow().status_reads
    }

    pub fn count_reads(&self) -> usize {
        self.state.borrow().count_reads
    }

    pub fn fifo_reads(&self) -> usize {
        self.state.borrow().fifo_reads
    }

    pub fn fifo_resets(&self) -> usize {
        self.state.borrow().fifo_resets
    }

    pub fn load_attempts(&self) -> usize {
        self.state.borrow().load_attempts
    }

    /// Total bus operations seen by the pipeline-facing methods
    pub fn bus_activity(&self) -> usize {
        let state = self.state.borrow();
        state.status_reads + state.count_reads + state.fifo_reads + state.fifo_resets
    }

    fn check_bus(&self) -> Result<(), Error<FakeError>> {
        if self.state.borrow().fail_bus {
            return Err(Error::Bus(FakeError::Bus));
        }
        Ok(())
    }
}

impl MotionDevice for FakeMotionDevice {
    type BusError = FakeError;

    fn initialize<D: embedded_hal::delay::DelayNs>(
        &mut self,
        _delay: &mut D,
    ) -> Result<(), Error<FakeError>> {
        self.check_bus()
    }

    fn test_connection(&mut self) -> Result<bool, Error<FakeError>> {
        self.check_bus()?;
        Ok(self.state.borrow().connected)
    }

    fn load_motion_processor<D: embedded_hal::delay::DelayNs>(
        &mut self,
        _delay: &mut D,
    ) -> Result<DmpStatus, Error<FakeError>> {
        self.check_bus()?;
        let mut state = self.state.borrow_mut();
        state.load_attempts += 1;
        Ok(state.dmp_status)
    }

    fn set_calibration_offsets(
        &mut self,
        offsets: &CalibrationOffsets,
    ) -> Result<(), Error<FakeError>> {
        self.check_bus()?;
        self.state.borrow_mut().offsets = Some(*offsets);
        Ok(())
    }

    fn set_dmp_enabled(&mut self, enable: bool) -> Result<(), Error<FakeError>> {
        self.check_bus()?;
        self.state.borrow_mut().dmp_enabled = enable;
        Ok(())
    }

    fn interrupt_status(&mut self) -> Result<u8, Error<FakeError>> {
        self.check_bus()?;
        let mut state = self.state.borrow_mut();
        state.status_reads += 1;

        if let Some(status) = state.status_override {
            return Ok(status);
        }

        let mut status = 0;
        if state.dmp_ready {
            status |= 0x02;
        }
        if state.overflow {
            status |= 0x10;
        }
        state.dmp_ready = false;
        state.overflow = false;
        Ok(status)
    }

    fn fifo_count(&mut self) -> Result<u16, Error<FakeError>> {
        self.check_bus()?;
        let mut state = self.state.borrow_mut();
        state.count_reads += 1;

        let chunk = state.arrival_chunk.min(state.incoming.len());
        let arrived: Vec<u8> = state.incoming.drain(..chunk).collect();
        state.fifo.extend(arrived);

        let count = state.fifo.len().min(1024) as u16;
        Ok(match state.stall_at {
            Some(limit) => count.min(limit),
            None => count,
        })
    }

    fn fifo_packet_size(&self) -> u16 {
        self.state.borrow().packet_size
    }

    fn reset_fifo(&mut self) -> Result<(), Error<FakeError>> {
        self.check_bus()?;
        let mut state = self.state.borrow_mut();
        state.fifo_resets += 1;
        state.fifo.clear();
        state.incoming.clear();
        state.overflow = false;
        state.dmp_ready = false;
        Ok(())
    }

    fn read_fifo(&mut self, buffer: &mut [u8]) -> Result<(), Error<FakeError>> {
        self.check_bus()?;
        let mut state = self.state.borrow_mut();
        state.fifo_reads += 1;
        for byte in buffer.iter_mut() {
            *byte = state.fifo.pop_front().unwrap_or(0);
        }
        Ok(())
    }
}
