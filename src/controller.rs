//! Sensor-to-command pipeline
//!
//! [`ImuController`] owns the device and runs the whole chain:
//!
//! ```text
//! init():  initialize → test connection → load DMP → offsets → enable → arm latch
//! poll():  PacketReader → decode → SmoothingFilter → CommandEncoder
//! ```
//!
//! A failed bring-up leaves the controller [`DeviceState::Faulted`] and every
//! later `poll()` returns [`PollOutcome::Disabled`] without touching the bus,
//! until the caller runs `init()` again.

use crate::command::{CommandEncoder, CommandSet, DEFAULT_THRESHOLD_DEG, Polarity};
use crate::device::{CalibrationOffsets, MotionDevice};
use crate::dmp::{DmpStatus, OrientationSample, OrientationVariant};
use crate::fifo::reader::{DEFAULT_WAIT_POLLS, PacketReader, ReadOutcome};
use crate::filter::{DEFAULT_WINDOW, SmoothingFilter};
use crate::interrupt::InterruptLatch;
use crate::Error;

use embedded_hal::delay::DelayNs;

/// Why bring-up failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitFailure {
    /// The device did not identify itself
    ConnectionFailed,
    /// The motion processor reported a nonzero load status
    MotionProcessor(DmpStatus),
    /// The device reported a packet size the reader cannot buffer
    PacketSize(u16),
    /// Bus communication failed during bring-up
    Bus,
}

impl InitFailure {
    /// Diagnostic code: the DMP status (1, 2) for load failures, 0xFD..=0xFF otherwise
    pub const fn code(self) -> u8 {
        match self {
            Self::MotionProcessor(status) => status.code(),
            Self::PacketSize(_) => 0xFD,
            Self::Bus => 0xFE,
            Self::ConnectionFailed => 0xFF,
        }
    }
}

/// Bring-up state of the controller
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceState {
    /// `init()` has not completed
    #[default]
    Uninitialized,
    /// DMP running, polling enabled
    Ready,
    /// Bring-up failed; polling disabled
    Faulted(InitFailure),
}

/// Pipeline configuration
///
/// # Example
///
/// ```
/// # use mpu6050_gimbal::{CalibrationOffsets, ControllerConfig};
/// let config = ControllerConfig::default()
///     .with_offsets(CalibrationOffsets::new(220, 76, -85, 1788))
///     .with_window(20)
///     .with_threshold(5.0);
/// assert_eq!(config.window, 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerConfig {
    /// Gyro and accel trim written during bring-up
    pub offsets: CalibrationOffsets,
    /// Samples per averaged output (at least 1)
    pub window: u16,
    /// Deadband half-width in degrees (finite, non-negative)
    pub threshold_deg: f32,
    /// Sign pairing between angle and motion
    pub polarity: Polarity,
    /// Angle set fed to the filter
    pub variant: OrientationVariant,
    /// FIFO count re-reads allowed while waiting for a signalled packet
    pub fifo_wait_polls: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            offsets: CalibrationOffsets::default(),
            window: DEFAULT_WINDOW,
            threshold_deg: DEFAULT_THRESHOLD_DEG,
            polarity: Polarity::Normal,
            variant: OrientationVariant::YawPitchRoll,
            fifo_wait_polls: DEFAULT_WAIT_POLLS,
        }
    }
}

impl ControllerConfig {
    /// Set the calibration offsets
    #[must_use]
    pub const fn with_offsets(mut self, offsets: CalibrationOffsets) -> Self {
        self.offsets = offsets;
        self
    }

    /// Set the averaging window
    #[must_use]
    pub const fn with_window(mut self, window: u16) -> Self {
        self.window = window;
        self
    }

    /// Set the deadband threshold in degrees
    #[must_use]
    pub const fn with_threshold(mut self, threshold_deg: f32) -> Self {
        self.threshold_deg = threshold_deg;
        self
    }

    /// Set the angle/motion sign pairing
    #[must_use]
    pub const fn with_polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }

    /// Select yaw/pitch/roll or Euler angles
    #[must_use]
    pub const fn with_variant(mut self, variant: OrientationVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Set the bound on the FIFO busy-wait
    #[must_use]
    pub const fn with_fifo_wait_polls(mut self, polls: u32) -> Self {
        self.fifo_wait_polls = polls;
        self
    }
}

/// One averaging window's result
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SmoothedOutput {
    /// Window average in degrees
    pub average: OrientationSample,
    /// Commands derived from the average
    pub commands: CommandSet,
}

/// What a single `poll()` did
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollOutcome {
    /// Controller not ready; nothing was done
    Disabled,
    /// No packet this call
    Idle,
    /// FIFO overflowed and was reset
    Overflow,
    /// Packet consumed, window not yet full
    Accumulating {
        /// Samples in the current window
        count: u16,
    },
    /// Packet consumed and a window completed
    Emitted(SmoothedOutput),
}

/// Running pipeline counters
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PipelineStats {
    /// Packets read from the FIFO
    pub packets: u32,
    /// FIFO overflows recovered
    pub overflows: u32,
    /// Busy-waits that hit the bound
    pub timeouts: u32,
    /// Averaged outputs emitted
    pub windows: u32,
}

/// DMP pipeline controller
pub struct ImuController<'a, D> {
    device: D,
    latch: &'a InterruptLatch,
    config: ControllerConfig,
    state: DeviceState,
    reader: Option<PacketReader>,
    filter: SmoothingFilter,
    encoder: CommandEncoder,
    stats: PipelineStats,
}

impl<'a, D> ImuController<'a, D>
where
    D: MotionDevice,
{
    /// Create a controller
    ///
    /// No bus traffic happens until [`init`](Self::init).
    ///
    /// # Arguments
    ///
    /// * `device` - Device driving the pipeline, usually an [`Mpu6050Driver`](crate::Mpu6050Driver)
    /// * `latch` - Latch signalled from the INT pin handler
    /// * `config` - Offsets, window, deadband and FIFO wait settings
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for a zero window or a negative or
    /// non-finite threshold.
    pub fn new(
        device: D,
        latch: &'a InterruptLatch,
        config: ControllerConfig,
    ) -> Result<Self, Error<D::BusError>> {
        let Some(filter) = SmoothingFilter::new(config.window) else {
            return Err(Error::InvalidConfig);
        };
        let Some(encoder) = CommandEncoder::new(config.threshold_deg, config.polarity) else {
            return Err(Error::InvalidConfig);
        };

        Ok(Self {
            device,
            latch,
            config,
            state: DeviceState::Uninitialized,
            reader: None,
            filter,
            encoder,
            stats: PipelineStats::default(),
        })
    }

    /// Bring the device up
    ///
    /// On success the DMP is streaming, the latch is armed and polling is
    /// enabled. On failure the controller is [`DeviceState::Faulted`] with the
    /// reason preserved; calling `init()` again retries the whole sequence.
    ///
    /// # Arguments
    ///
    /// * `delay` - Delay provider implementing `embedded_hal::delay::DelayNs`
    ///
    /// # Errors
    ///
    /// - [`Error::Init`] if the device is absent or the DMP failed to load
    /// - [`Error::InvalidPacketSize`] if the packet size cannot be buffered
    /// - [`Error::Bus`] if communication fails
    pub fn init<T: DelayNs>(&mut self, delay: &mut T) -> Result<(), Error<D::BusError>> {
        self.latch.disarm();
        self.reader = None;
        self.filter.reset();
        self.state = DeviceState::Uninitialized;

        match self.bring_up(delay) {
            Ok(reader) => {
                #[cfg(feature = "defmt")]
                defmt::info!("DMP ready, packet size {} bytes", reader.packet_size());

                self.reader = Some(reader);
                self.state = DeviceState::Ready;
                self.latch.arm();
                Ok(())
            }
            Err(error) => {
                let failure = match &error {
                    Error::Init(failure) => *failure,
                    Error::InvalidPacketSize(size) => InitFailure::PacketSize(*size),
                    _ => InitFailure::Bus,
                };

                #[cfg(feature = "defmt")]
                defmt::error!("DMP initialization failed (code {})", failure.code());

                self.state = DeviceState::Faulted(failure);
                Err(error)
            }
        }
    }

    fn bring_up<T: DelayNs>(&mut self, delay: &mut T) -> Result<PacketReader, Error<D::BusError>> {
        self.device.initialize(delay)?;

        if !self.device.test_connection()? {
            return Err(Error::Init(InitFailure::ConnectionFailed));
        }

        let status = self.device.load_motion_processor(delay)?;
        if !status.is_ok() {
            return Err(Error::Init(InitFailure::MotionProcessor(status)));
        }

        self.device.set_calibration_offsets(&self.config.offsets)?;

        let packet_size = self.device.fifo_packet_size();
        let Some(reader) = PacketReader::new(packet_size, self.config.fifo_wait_polls) else {
            return Err(Error::InvalidPacketSize(packet_size));
        };

        self.device.set_dmp_enabled(true)?;

        Ok(reader)
    }

    /// Run one pipeline step
    ///
    /// Consumes at most one packet. Returns [`PollOutcome::Disabled`] without any
    /// bus traffic unless the controller is [`DeviceState::Ready`].
    ///
    /// # Returns
    ///
    /// - [`PollOutcome::Idle`] when no packet was available
    /// - [`PollOutcome::Overflow`] when the FIFO was reset and this cycle dropped
    /// - [`PollOutcome::Accumulating`] when a sample joined the current window
    /// - [`PollOutcome::Emitted`] when a window completed
    ///
    /// # Errors
    ///
    /// - [`Error::Bus`] if communication fails
    /// - [`Error::FifoTimeout`] if a signalled packet never completed; the
    ///   controller stays ready
    /// - [`Error::MalformedPacket`] if the packet could not be decoded
    pub fn poll(&mut self) -> Result<PollOutcome, Error<D::BusError>> {
        if self.state != DeviceState::Ready {
            return Ok(PollOutcome::Disabled);
        }
        let Some(reader) = self.reader.as_mut() else {
            return Ok(PollOutcome::Disabled);
        };

        let packet = match reader.read(&mut self.device, self.latch) {
            Ok(ReadOutcome::Idle) => return Ok(PollOutcome::Idle),
            Ok(ReadOutcome::Overflow { .. }) => {
                self.stats.overflows = self.stats.overflows.wrapping_add(1);
                return Ok(PollOutcome::Overflow);
            }
            Ok(ReadOutcome::Packet(packet)) => packet,
            Err(error) => {
                if matches!(error, Error::FifoTimeout) {
                    self.stats.timeouts = self.stats.timeouts.wrapping_add(1);
                }
                return Err(error);
            }
        };
        self.stats.packets = self.stats.packets.wrapping_add(1);

        let Some(sample) = self
            .device
            .decode_orientation(packet.as_bytes(), self.config.variant)
        else {
            return Err(Error::MalformedPacket);
        };

        let Some(average) = self.filter.push(sample) else {
            return Ok(PollOutcome::Accumulating {
                count: self.filter.count(),
            });
        };

        let commands = self.encoder.encode(&average);
        self.stats.windows = self.stats.windows.wrapping_add(1);

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "Window average: yaw={} pitch={} roll={} -> {}",
            average.yaw,
            average.pitch,
            average.roll,
            commands
        );

        Ok(PollOutcome::Emitted(SmoothedOutput { average, commands }))
    }

    /// Current bring-up state
    pub const fn state(&self) -> DeviceState {
        self.state
    }

    /// Whether `poll()` will run the pipeline
    pub fn is_ready(&self) -> bool {
        self.state == DeviceState::Ready
    }

    /// Pipeline counters
    pub const fn stats(&self) -> PipelineStats {
        self.stats
    }

    /// Active configuration
    pub const fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Samples in the current, incomplete window
    pub const fn pending_samples(&self) -> u16 {
        self.filter.count()
    }

    /// Get a reference to the device
    pub const fn device(&self) -> &D {
        &self.device
    }

    /// Get a mutable reference to the device (for advanced usage)
    ///
    /// Direct FIFO access while the controller is ready desynchronizes the
    /// tracked byte count.
    pub const fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Disarm the latch and return the device
    pub fn release(self) -> D {
        self.latch.disarm();
        self.device
    }
}
