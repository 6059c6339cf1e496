//! Bus interface implementation for the MPU-6050
//!
//! The MPU-6050 only speaks I2C. This module adapts any `embedded-hal` I2C bus to
//! the `device-driver` register interface used by the generated register map.

use crate::I2C_ADDRESS_AD0_LOW;

use device_driver::RegisterInterface;

/// Largest payload written in one transaction (DMP memory chunks are 16 bytes)
pub const MAX_WRITE_LEN: usize = 32;

/// Errors raised by [`I2cInterface`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterfaceError<E> {
    /// The underlying I2C bus reported an error
    I2c(E),
    /// A write payload was longer than [`MAX_WRITE_LEN`] bytes
    WriteTooLong(usize),
}

impl<E> From<E> for InterfaceError<E> {
    fn from(error: E) -> Self {
        Self::I2c(error)
    }
}

/// I2C interface for the MPU-6050
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cInterface<I2C> {
    /// Create a new I2C interface with the default address (0x68, AD0 pin LOW)
    ///
    /// # Example
    /// ```ignore
    /// let interface = I2cInterface::default(i2c);
    /// let driver = Mpu6050Driver::new(interface, image);
    /// ```
    pub const fn default(i2c: I2C) -> Self {
        Self {
            i2c,
            address: I2C_ADDRESS_AD0_LOW,
        }
    }

    /// Create a new I2C interface with the alternative address (0x69, AD0 pin HIGH)
    pub const fn alternative(i2c: I2C) -> Self {
        Self {
            i2c,
            address: crate::I2C_ADDRESS_AD0_HIGH,
        }
    }

    /// Create a new I2C interface with a custom device address
    pub const fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Device address used on the bus
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Consume the interface and return the I2C peripheral
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C, E> RegisterInterface for I2cInterface<I2C>
where
    I2C: embedded_hal::i2c::I2c<Error = E>,
{
    type Error = InterfaceError<E>;
    type AddressType = u8;

    fn read_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits; // Size is implicit in read_data.len() for I2C
        self.i2c.write_read(self.address, &[address], read_data)?;
        Ok(())
    }

    fn write_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits; // Size is implicit in write_data.len() for I2C
        let len = write_data.len();
        if len > MAX_WRITE_LEN {
            return Err(InterfaceError::WriteTooLong(len));
        }

        let mut buffer = [0u8; MAX_WRITE_LEN + 1];
        buffer[0] = address;
        buffer[1..=len].copy_from_slice(write_data);

        self.i2c.write(self.address, &buffer[..=len])?;
        Ok(())
    }
}
