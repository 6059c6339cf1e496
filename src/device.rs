//! High-level driver API for the MPU-6050
//!
//! [`MotionDevice`] is the contract the pipeline consumes: bring-up, DMP
//! loading, FIFO access and packet decoding. [`Mpu6050Driver`] implements it on
//! top of the generated register map; tests and other sensors can provide their
//! own implementation.

use crate::dmp::loader::{FirmwareLoader, MemoryPort};
use crate::dmp::{
    CONFIG_OPCODE_ENABLE_INTERRUPTS, DmpImage, DmpParser, DmpStatus, GravityVector,
    OrientationSample, OrientationVariant, Quaternion,
};
use crate::interrupt::InterruptConfig;
use crate::registers::{FIFO_COUNTH, FIFO_R_W, MEM_R_W, Mpu6050 as RegisterDevice};
use crate::{Error, WHO_AM_I_VALUE};

use device_driver::RegisterInterface;
use embedded_hal::delay::DelayNs;

/// Time the device needs after a reset before registers can be written again
const RESET_DELAY_MS: u32 = 30;

/// Clock source: PLL with X axis gyroscope reference
const CLKSEL_PLL_XGYRO: u8 = 1;

/// Sample rate divider used with the DMP (1 kHz / (1 + 4) = 200 Hz)
const DMP_SAMPLE_RATE_DIV: u8 = 4;

/// DLPF setting used with the DMP (42 Hz gyro bandwidth)
const DMP_DLPF_CFG: u8 = 3;

/// External frame sync on `TEMP_OUT_L`
const DMP_EXT_SYNC: u8 = 1;

/// Gyro full scale used with the DMP (±2000 dps)
const DMP_GYRO_FS: u8 = 3;

/// Fixed gyroscope and accelerometer trim values
///
/// Written to the user offset registers before the DMP is enabled. The values
/// are raw register counts and are specific to one physical sensor.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationOffsets {
    /// Gyroscope X offset (`XG_OFFS_USR`)
    pub gyro_x: i16,
    /// Gyroscope Y offset (`YG_OFFS_USR`)
    pub gyro_y: i16,
    /// Gyroscope Z offset (`ZG_OFFS_USR`)
    pub gyro_z: i16,
    /// Accelerometer Z offset (`ZA_OFFS`)
    pub accel_z: i16,
}

impl CalibrationOffsets {
    /// Create a set of offsets
    pub const fn new(gyro_x: i16, gyro_y: i16, gyro_z: i16, accel_z: i16) -> Self {
        Self {
            gyro_x,
            gyro_y,
            gyro_z,
            accel_z,
        }
    }
}

/// Operations the pipeline needs from a DMP-capable motion sensor
///
/// The decode methods are provided and assume the MotionApps 2.0 packet layout.
/// Override them for firmware with a different layout.
pub trait MotionDevice {
    /// Bus error type
    type BusError;

    /// Configure clock, ranges and wake the device
    ///
    /// Leaves the device awake on the PLL clock with the X gyro as reference,
    /// the gyroscope at ±250 dps and the accelerometer at ±2 g. The motion
    /// processor is not touched.
    ///
    /// # Arguments
    ///
    /// * `delay` - Delay provider implementing `embedded_hal::delay::DelayNs`
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    fn initialize<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error<Self::BusError>>;

    /// Check that the expected device answers on the bus
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    fn test_connection(&mut self) -> Result<bool, Error<Self::BusError>>;

    /// Upload and configure the motion processor
    ///
    /// Resets the device, writes the firmware and the configuration set, and
    /// programs the sample rate and filters the DMP expects. The DMP itself is
    /// left disabled; call [`set_dmp_enabled`](Self::set_dmp_enabled) afterwards.
    ///
    /// # Arguments
    ///
    /// * `delay` - Delay provider used to wait out the device reset
    ///
    /// # Returns
    ///
    /// [`DmpStatus::Ready`] on success. A failed firmware or configuration
    /// verify is reported through the status, not as an error.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    fn load_motion_processor<D: DelayNs>(
        &mut self,
        delay: &mut D,
    ) -> Result<DmpStatus, Error<Self::BusError>>;

    /// Write the gyroscope and accelerometer trim values
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    fn set_calibration_offsets(
        &mut self,
        offsets: &CalibrationOffsets,
    ) -> Result<(), Error<Self::BusError>>;

    /// Start or stop the motion processor and its FIFO output
    ///
    /// The firmware must already be loaded before enabling the DMP.
    ///
    /// # Arguments
    ///
    /// * `enable` - `true` to enable the DMP and FIFO, `false` to disable both
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    fn set_dmp_enabled(&mut self, enable: bool) -> Result<(), Error<Self::BusError>>;

    /// Read (and clear) the interrupt status byte
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    fn interrupt_status(&mut self) -> Result<u8, Error<Self::BusError>>;

    /// Number of bytes waiting in the FIFO
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    fn fifo_count(&mut self) -> Result<u16, Error<Self::BusError>>;

    /// Size of one motion packet in bytes
    fn fifo_packet_size(&self) -> u16;

    /// Discard everything in the FIFO
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    fn reset_fifo(&mut self) -> Result<(), Error<Self::BusError>>;

    /// Read exactly `buffer.len()` bytes from the FIFO
    ///
    /// The caller is responsible for checking [`fifo_count`](Self::fifo_count)
    /// first; reading past the buffered data returns filler bytes on real
    /// hardware.
    ///
    /// # Arguments
    ///
    /// * `buffer` - Buffer to read data into, usually one packet long
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    fn read_fifo(&mut self, buffer: &mut [u8]) -> Result<(), Error<Self::BusError>>;

    /// Extract the orientation quaternion from a packet
    fn decode_quaternion(&self, packet: &[u8]) -> Option<Quaternion> {
        DmpParser::new().parse_quaternion(packet)
    }

    /// Gravity direction for a quaternion
    fn decode_gravity(&self, q: &Quaternion) -> GravityVector {
        DmpParser::new().gravity(q)
    }

    /// Yaw, pitch and roll in radians
    fn decode_yaw_pitch_roll(&self, q: &Quaternion, gravity: &GravityVector) -> OrientationSample {
        DmpParser::new().yaw_pitch_roll(q, gravity)
    }

    /// Euler angles (psi, theta, phi) in radians
    fn decode_euler(&self, q: &Quaternion) -> OrientationSample {
        DmpParser::new().euler(q)
    }

    /// Decode a packet into the selected angle set
    ///
    /// Quaternion first, then gravity (yaw/pitch/roll only), then angles.
    ///
    /// # Arguments
    ///
    /// * `packet` - One raw FIFO packet
    /// * `variant` - Which angle set to compute
    ///
    /// # Returns
    ///
    /// Angles in radians, or `None` if the packet is too short to hold a
    /// quaternion.
    fn decode_orientation(
        &self,
        packet: &[u8],
        variant: OrientationVariant,
    ) -> Option<OrientationSample> {
        let q = self.decode_quaternion(packet)?;
        Some(match variant {
            OrientationVariant::YawPitchRoll => {
                let gravity = self.decode_gravity(&q);
                self.decode_yaw_pitch_roll(&q, &gravity)
            }
            OrientationVariant::Euler => self.decode_euler(&q),
        })
    }
}

/// Main driver for the MPU-6050
pub struct Mpu6050Driver<I> {
    device: RegisterDevice<I>,
    image: DmpImage,
}

impl<I> Mpu6050Driver<I>
where
    I: RegisterInterface<AddressType = u8>,
{
    /// Create a new driver instance
    ///
    /// Nothing is sent to the device until [`MotionDevice::initialize`] is called.
    /// `image` is the DMP program and configuration set uploaded by
    /// [`MotionDevice::load_motion_processor`].
    ///
    /// # Arguments
    ///
    /// * `interface` - Register interface, normally an [`I2cInterface`](crate::I2cInterface)
    /// * `image` - DMP firmware, configuration set and packet layout
    ///
    /// # Example
    ///
    /// ```ignore
    /// let image = DmpImage::motion_apps_20(FIRMWARE, CONFIG);
    /// let mut driver = Mpu6050Driver::new(I2cInterface::default(i2c), image);
    /// driver.verify_identity()?;
    /// ```
    pub fn new(interface: I, image: DmpImage) -> Self {
        Self {
            device: RegisterDevice::new(interface),
            image,
        }
    }

    /// Read the raw `WHO_AM_I` identity bits (0x34 for a genuine MPU-6050)
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_who_am_i(&mut self) -> Result<u8, Error<I::Error>> {
        let who_am_i = self.device.who_am_i().read()?;
        Ok(who_am_i.who_am_i())
    }

    /// Verify the device identity, returning the value read on mismatch
    ///
    /// # Errors
    ///
    /// - [`Error::Bus`] if communication with the device fails
    /// - [`Error::InvalidDevice`] if `WHO_AM_I` does not match
    pub fn verify_identity(&mut self) -> Result<(), Error<I::Error>> {
        let who_am_i = self.read_who_am_i()?;
        if who_am_i != WHO_AM_I_VALUE {
            return Err(Error::InvalidDevice(who_am_i));
        }
        Ok(())
    }

    /// DMP image this driver uploads
    pub const fn image(&self) -> &DmpImage {
        &self.image
    }

    /// Program the DMP start address
    fn set_dmp_start_address(&mut self, address: u16) -> Result<(), Error<I::Error>> {
        let [high, low] = address.to_be_bytes();
        self.device.dmp_cfg_1().write(|w| {
            w.set_prgm_start_addrh(high);
        })?;
        self.device.dmp_cfg_2().write(|w| {
            w.set_prgm_start_addrl(low);
        })?;
        Ok(())
    }

    /// Point the DMP memory window at `bank`/`offset`
    fn select_memory(&mut self, bank: u8, offset: u8) -> Result<(), Error<I::Error>> {
        self.device.bank_sel().write(|w| {
            w.set_mem_bank_sel(bank);
        })?;
        self.device.mem_start_addr().write(|w| {
            w.set_mem_start_addr(offset);
        })?;
        Ok(())
    }

    /// Reset, wake and select the PLL clock
    fn reset_and_wake<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error<I::Error>> {
        self.device.pwr_mgmt_1().write(|w| {
            w.set_device_reset(true);
        })?;
        delay.delay_ms(RESET_DELAY_MS);

        self.device.pwr_mgmt_1().write(|w| {
            w.set_sleep(false);
            w.set_clksel(CLKSEL_PLL_XGYRO);
        })?;
        Ok(())
    }

    /// Register setup that follows a successful DMP upload
    fn configure_for_dmp(&mut self) -> Result<(), Error<I::Error>> {
        self.set_dmp_start_address(self.image.start_address)?;

        self.device.int_enable().write(|w| {
            w.set_int_enable(InterruptConfig::dmp_fifo().to_raw());
        })?;
        self.device.smplrt_div().write(|w| {
            w.set_smplrt_div(DMP_SAMPLE_RATE_DIV);
        })?;
        self.device.fsync_dlpf_config().write(|w| {
            w.set_dlpf_cfg(DMP_DLPF_CFG);
            w.set_ext_sync_set(DMP_EXT_SYNC);
        })?;
        self.device.gyro_config().modify(|w| {
            w.set_fs_sel(DMP_GYRO_FS);
        })?;

        self.reset_fifo()?;
        self.set_dmp_enabled(false)?;
        Ok(())
    }

    /// Consume the driver and return the underlying interface
    pub fn release(self) -> I {
        self.device.interface
    }

    /// Get a reference to the underlying register device (for advanced usage)
    pub const fn device(&self) -> &RegisterDevice<I> {
        &self.device
    }

    /// Get a mutable reference to the underlying register device (for advanced usage)
    pub const fn device_mut(&mut self) -> &mut RegisterDevice<I> {
        &mut self.device
    }
}

impl<I> MotionDevice for Mpu6050Driver<I>
where
    I: RegisterInterface<AddressType = u8>,
{
    type BusError = I::Error;

    fn initialize<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error<I::Error>> {
        self.device.pwr_mgmt_1().modify(|w| {
            w.set_clksel(CLKSEL_PLL_XGYRO);
        })?;
        self.device.gyro_config().modify(|w| {
            w.set_fs_sel(0);
        })?;
        self.device.accel_config().modify(|w| {
            w.set_afs_sel(0);
        })?;
        self.device.pwr_mgmt_1().modify(|w| {
            w.set_sleep(false);
        })?;

        // Gyro needs a moment to settle after leaving sleep
        delay.delay_ms(1);

        #[cfg(feature = "defmt")]
        defmt::debug!("MPU-6050 initialized (PLL X gyro, 250 dps, 2 g)");

        Ok(())
    }

    fn test_connection(&mut self) -> Result<bool, Error<I::Error>> {
        Ok(self.read_who_am_i()? == WHO_AM_I_VALUE)
    }

    fn load_motion_processor<D: DelayNs>(
        &mut self,
        delay: &mut D,
    ) -> Result<DmpStatus, Error<I::Error>> {
        self.reset_and_wake(delay)?;

        let image = self.image;
        if !FirmwareLoader::load_firmware(self, image.firmware)? {
            #[cfg(feature = "defmt")]
            defmt::error!("DMP firmware verification failed");
            return Ok(DmpStatus::MemoryLoadFailed);
        }

        if !FirmwareLoader::apply_config(self, image.config)? {
            #[cfg(feature = "defmt")]
            defmt::error!("DMP configuration set rejected");
            return Ok(DmpStatus::ConfigUpdateFailed);
        }

        self.configure_for_dmp()?;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "DMP loaded: {} bytes firmware, start 0x{:04X}",
            image.firmware.len(),
            image.start_address
        );

        Ok(DmpStatus::Ready)
    }

    fn set_calibration_offsets(
        &mut self,
        offsets: &CalibrationOffsets,
    ) -> Result<(), Error<I::Error>> {
        let [high, low] = offsets.gyro_x.to_be_bytes();
        self.device.xg_offs_usrh().write(|w| w.set_xg_offs_usr_h(high))?;
        self.device.xg_offs_usrl().write(|w| w.set_xg_offs_usr_l(low))?;

        let [high, low] = offsets.gyro_y.to_be_bytes();
        self.device.yg_offs_usrh().write(|w| w.set_yg_offs_usr_h(high))?;
        self.device.yg_offs_usrl().write(|w| w.set_yg_offs_usr_l(low))?;

        let [high, low] = offsets.gyro_z.to_be_bytes();
        self.device.zg_offs_usrh().write(|w| w.set_zg_offs_usr_h(high))?;
        self.device.zg_offs_usrl().write(|w| w.set_zg_offs_usr_l(low))?;

        let [high, low] = offsets.accel_z.to_be_bytes();
        self.device.za_offs_h().write(|w| w.set_za_offs_h(high))?;
        self.device.za_offs_l().write(|w| w.set_za_offs_l(low))?;

        Ok(())
    }

    fn set_dmp_enabled(&mut self, enable: bool) -> Result<(), Error<I::Error>> {
        self.device.user_ctrl().modify(|w| {
            w.set_dmp_en(enable);
            w.set_fifo_en(enable);
        })?;
        Ok(())
    }

    fn interrupt_status(&mut self) -> Result<u8, Error<I::Error>> {
        Ok(self.device.int_status().read()?.int_status())
    }

    fn fifo_count(&mut self) -> Result<u16, Error<I::Error>> {
        // One burst so the high byte cannot change between the two reads
        let mut count = [0u8; 2];
        self.device
            .interface
            .read_register(FIFO_COUNTH, 16, &mut count)?;

        Ok(u16::from_be_bytes(count))
    }

    fn fifo_packet_size(&self) -> u16 {
        self.image.packet_size
    }

    fn reset_fifo(&mut self) -> Result<(), Error<I::Error>> {
        // FIFO_RESET self-clears once the FIFO is empty
        self.device.user_ctrl().modify(|w| {
            w.set_fifo_reset(true);
        })?;
        Ok(())
    }

    fn read_fifo(&mut self, buffer: &mut [u8]) -> Result<(), Error<I::Error>> {
        if buffer.is_empty() {
            return Ok(());
        }

        // Burst read; FIFO_R_W does not auto-increment so every byte comes from the FIFO
        #[allow(clippy::cast_possible_truncation)]
        let size_bits = (buffer.len() * 8) as u32;
        self.device
            .interface
            .read_register(FIFO_R_W, size_bits, buffer)?;
        Ok(())
    }
}

impl<I> MemoryPort for Mpu6050Driver<I>
where
    I: RegisterInterface<AddressType = u8>,
{
    type Error = Error<I::Error>;

    fn write_block(&mut self, bank: u8, offset: u8, data: &[u8]) -> Result<(), Self::Error> {
        self.select_memory(bank, offset)?;

        #[allow(clippy::cast_possible_truncation)]
        let size_bits = (data.len() * 8) as u32;
        self.device
            .interface
            .write_register(MEM_R_W, size_bits, data)?;

        #[cfg(feature = "defmt")]
        defmt::trace!(
            "DMP write: bank {} offset 0x{:02X} ({} bytes)",
            bank,
            offset,
            data.len()
        );

        Ok(())
    }

    fn read_block(&mut self, bank: u8, offset: u8, buffer: &mut [u8]) -> Result<(), Self::Error> {
        self.select_memory(bank, offset)?;

        #[allow(clippy::cast_possible_truncation)]
        let size_bits = (buffer.len() * 8) as u32;
        self.device
            .interface
            .read_register(MEM_R_W, size_bits, buffer)?;
        Ok(())
    }

    fn special(&mut self, opcode: u8) -> Result<bool, Self::Error> {
        match opcode {
            CONFIG_OPCODE_ENABLE_INTERRUPTS => {
                self.device.int_enable().write(|w| {
                    w.set_int_enable(InterruptConfig::dmp_fifo_zero_motion().to_raw());
                })?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
