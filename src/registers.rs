//! Register definitions for the MPU-6050
//!
//! Only the registers touched by the DMP pipeline are described here: power and
//! clock control, sensor ranges, user offsets, interrupt control, the FIFO, and
//! the DMP memory window.
//!
//! ## DMP Memory Window
//! DMP memory is not memory-mapped. It is reached through three registers:
//! - `BANK_SEL` (0x6D): 256-byte memory bank
//! - `MEM_START_ADDR` (0x6E): offset within the bank (auto-increments on access)
//! - `MEM_R_W` (0x6F): data port
//!
//! Multi-byte values (offsets, FIFO count) are split across high/low registers and
//! are big-endian on the wire.

device_driver::create_device!(
    device_name: Mpu6050,
    dsl: {
        config {
            type RegisterAddressType = u8;
            type DefaultByteOrder = BE;
        }

        // ==================== USER OFFSETS ====================

        /// ZA_OFFS_H - Accelerometer Z offset high byte (0x0A)
        register ZaOffsH {
            const ADDRESS = 0x0A;
            const SIZE_BITS = 8;

            /// Accelerometer Z offset bits 15:8
            za_offs_h: uint = 0..8,
        },

        /// ZA_OFFS_L - Accelerometer Z offset low byte (0x0B)
        register ZaOffsL {
            const ADDRESS = 0x0B;
            const SIZE_BITS = 8;

            /// Accelerometer Z offset bits 7:0
            za_offs_l: uint = 0..8,
        },

        /// XG_OFFS_USRH - Gyroscope X user offset high byte (0x13)
        register XgOffsUsrh {
            const ADDRESS = 0x13;
            const SIZE_BITS = 8;

            /// Gyroscope X offset bits 15:8
            xg_offs_usr_h: uint = 0..8,
        },

        /// XG_OFFS_USRL - Gyroscope X user offset low byte (0x14)
        register XgOffsUsrl {
            const ADDRESS = 0x14;
            const SIZE_BITS = 8;

            /// Gyroscope X offset bits 7:0
            xg_offs_usr_l: uint = 0..8,
        },

        /// YG_OFFS_USRH - Gyroscope Y user offset high byte (0x15)
        register YgOffsUsrh {
            const ADDRESS = 0x15;
            const SIZE_BITS = 8;

            /// Gyroscope Y offset bits 15:8
            yg_offs_usr_h: uint = 0..8,
        },

        /// YG_OFFS_USRL - Gyroscope Y user offset low byte (0x16)
        register YgOffsUsrl {
            const ADDRESS = 0x16;
            const SIZE_BITS = 8;

            /// Gyroscope Y offset bits 7:0
            yg_offs_usr_l: uint = 0..8,
        },

        /// ZG_OFFS_USRH - Gyroscope Z user offset high byte (0x17)
        register ZgOffsUsrh {
            const ADDRESS = 0x17;
            const SIZE_BITS = 8;

            /// Gyroscope Z offset bits 15:8
            zg_offs_usr_h: uint = 0..8,
        },

        /// ZG_OFFS_USRL - Gyroscope Z user offset low byte (0x18)
        register ZgOffsUsrl {
            const ADDRESS = 0x18;
            const SIZE_BITS = 8;

            /// Gyroscope Z offset bits 7:0
            zg_offs_usr_l: uint = 0..8,
        },

        // ==================== SENSOR CONFIGURATION ====================

        /// SMPLRT_DIV - Sample Rate Divider (0x19)
        /// Sample rate = gyro output rate / (1 + divider)
        register SmplrtDiv {
            const ADDRESS = 0x19;
            const SIZE_BITS = 8;

            /// Sample rate divider
            smplrt_div: uint = 0..8,
        },

        /// CONFIG - Frame sync and digital low pass filter (0x1A)
        register FsyncDlpfConfig {
            const ADDRESS = 0x1A;
            const SIZE_BITS = 8;

            /// Digital low pass filter setting (3 = 42 Hz gyro bandwidth)
            dlpf_cfg: uint = 0..3,
            /// External frame sync source (1 = TEMP_OUT_L)
            ext_sync_set: uint = 3..6,
            reserved_7_6: uint = 6..8,
        },

        /// GYRO_CONFIG - Gyroscope Configuration (0x1B)
        register GyroConfig {
            const ADDRESS = 0x1B;
            const SIZE_BITS = 8;

            reserved_2_0: uint = 0..3,
            /// Full scale select (0=±250, 1=±500, 2=±1000, 3=±2000 dps)
            fs_sel: uint = 3..5,
            /// Self-test enables (Z, Y, X)
            self_test: uint = 5..8,
        },

        /// ACCEL_CONFIG - Accelerometer Configuration (0x1C)
        register AccelConfig {
            const ADDRESS = 0x1C;
            const SIZE_BITS = 8;

            reserved_2_0: uint = 0..3,
            /// Full scale select (0=±2g, 1=±4g, 2=±8g, 3=±16g)
            afs_sel: uint = 3..5,
            /// Self-test enables (Z, Y, X)
            self_test: uint = 5..8,
        },

        // ==================== INTERRUPTS ====================

        /// INT_ENABLE - Interrupt Enable (0x38)
        register IntEnable {
            const ADDRESS = 0x38;
            const SIZE_BITS = 8;

            /// Interrupt enable mask (see [`crate::interrupt::InterruptConfig`])
            int_enable: uint = 0..8,
        },

        /// INT_STATUS - Interrupt Status (0x3A)
        /// All bits clear when the register is read.
        register IntStatus {
            const ADDRESS = 0x3A;
            const SIZE_BITS = 8;

            /// Interrupt status flags (see [`crate::interrupt::InterruptStatus`])
            int_status: uint = 0..8,
        },

        // ==================== CONTROL ====================

        /// USER_CTRL - User Control (0x6A)
        register UserCtrl {
            const ADDRESS = 0x6A;
            const SIZE_BITS = 8;

            /// Reset all sensor signal paths
            sig_cond_reset: bool = 0,
            /// Reset the I2C master
            i2c_mst_reset: bool = 1,
            /// Reset the FIFO (self-clearing)
            fifo_reset: bool = 2,
            /// Reset the DMP (self-clearing)
            dmp_reset: bool = 3,
            /// Disable the primary I2C interface
            i2c_if_dis: bool = 4,
            /// Enable the I2C master
            i2c_mst_en: bool = 5,
            /// FIFO enable
            fifo_en: bool = 6,
            /// DMP enable
            dmp_en: bool = 7,
        },

        /// PWR_MGMT_1 - Power Management 1 (0x6B)
        register PwrMgmt1 {
            const ADDRESS = 0x6B;
            const SIZE_BITS = 8;

            /// Clock source select (0=internal 8MHz, 1=PLL X gyro, 3=PLL Z gyro)
            clksel: uint = 0..3,
            /// Temperature sensor disable
            temp_dis: bool = 3,
            reserved_4: uint = 4..5,
            /// Cycle between sleep and sample
            cycle: bool = 5,
            /// Sleep mode enable
            sleep: bool = 6,
            /// Device reset (self-clearing)
            device_reset: bool = 7,
        },

        // ==================== DMP MEMORY ====================

        /// BANK_SEL - DMP memory bank select (0x6D)
        register BankSel {
            const ADDRESS = 0x6D;
            const SIZE_BITS = 8;

            /// DMP memory bank
            mem_bank_sel: uint = 0..8,
        },

        /// MEM_START_ADDR - DMP memory start address (0x6E)
        register MemStartAddr {
            const ADDRESS = 0x6E;
            const SIZE_BITS = 8;

            /// Address within the selected bank
            mem_start_addr: uint = 0..8,
        },

        /// MEM_R_W - DMP memory data port (0x6F)
        register MemRW {
            const ADDRESS = 0x6F;
            const SIZE_BITS = 8;

            /// Data byte at the current memory address
            mem_r_w: uint = 0..8,
        },

        /// DMP_CFG_1 - DMP program start address high byte (0x70)
        register DmpCfg1 {
            const ADDRESS = 0x70;
            const SIZE_BITS = 8;

            /// Program start address bits 15:8
            prgm_start_addrh: uint = 0..8,
        },

        /// DMP_CFG_2 - DMP program start address low byte (0x71)
        register DmpCfg2 {
            const ADDRESS = 0x71;
            const SIZE_BITS = 8;

            /// Program start address bits 7:0
            prgm_start_addrl: uint = 0..8,
        },

        // ==================== FIFO ====================

        /// FIFO_COUNTH - FIFO Count High (0x72)
        register FifoCounth {
            const ADDRESS = 0x72;
            const SIZE_BITS = 8;

            /// FIFO count high byte
            fifo_cnt_h: uint = 0..8,
        },

        /// FIFO_COUNTL - FIFO Count Low (0x73)
        register FifoCountl {
            const ADDRESS = 0x73;
            const SIZE_BITS = 8;

            /// FIFO count low byte
            fifo_cnt_l: uint = 0..8,
        },

        /// FIFO_R_W - FIFO Read/Write (0x74)
        register FifoRW {
            const ADDRESS = 0x74;
            const SIZE_BITS = 8;

            /// FIFO data port
            fifo_r_w: uint = 0..8,
        },

        // ==================== IDENTIFICATION ====================

        /// WHO_AM_I - Device ID Register (0x75)
        /// Bits 6:1 read 0x34 (register value 0x68).
        register WhoAmI {
            const ADDRESS = 0x75;
            const SIZE_BITS = 8;

            reserved_0: uint = 0..1,
            /// Upper 6 bits of the 7-bit I2C address
            who_am_i: uint = 1..7,
            reserved_7: uint = 7..8,
        },
    }
);

/// FIFO_COUNTH register address, start of the two-byte FIFO count burst
pub const FIFO_COUNTH: u8 = 0x72;

/// FIFO_R_W register address, used for burst reads
pub const FIFO_R_W: u8 = 0x74;

/// MEM_R_W register address, used for burst DMP memory access
pub const MEM_R_W: u8 = 0x6F;
