use thiserror::Error;
use tracing::{debug, warn};

use crate::bus::{BusError, I2cBus};

// MCP9808 register selectors
pub const REG_CONFIG: u8 = 0x01;
pub const REG_AMBIENT_TEMP: u8 = 0x05;
pub const REG_MANUF_ID: u8 = 0x06;
pub const REG_DEVICE_ID: u8 = 0x07;

pub const MANUF_ID: u16 = 0x0054; // Microchip
pub const DEVICE_ID: u16 = 0x0401; // MCP9808 rev. 1

// Configuration register bits
pub const CONFIG_SHUTDOWN: u16 = 0x0100;
pub const CONFIG_CRIT_LOCKED: u16 = 0x0080;
pub const CONFIG_WIN_LOCKED: u16 = 0x0040;

#[derive(Debug, Error)]
pub enum Mcp9808Error {
    #[error(transparent)]
    Bus(#[from] BusError),
    #[error("invalid i2c address {0:#04x}")]
    InvalidAddress(u8),
    #[error("register {register:#04x}: expected {expected:#06x}, found {found:#06x}")]
    IdMismatch {
        register: u8,
        expected: u16,
        found: u16,
    },
    #[error("configuration register is locked ({0:#06x})")]
    ConfigLocked(u16),
}

/// MCP9808 temperature sensor on an injected bus. `begin` must succeed before
/// any other call is meaningful.
pub struct Mcp9808<B: I2cBus> {
    bus: B,
    address: u8,
}

impl<B: I2cBus> Mcp9808<B> {
    pub fn new(bus: B) -> Mcp9808<B> {
        Mcp9808 { bus, address: 0 }
    }

    /// Bind to a 7-bit bus address and verify the chip identity against the
    /// manufacturer and device ID registers.
    pub fn begin(&mut self, address: u8) -> Result<(), Mcp9808Error> {
        if address == 0 || address > 0x7F {
            return Err(Mcp9808Error::InvalidAddress(address));
        }
        self.address = address;

        self.check_id(REG_MANUF_ID, MANUF_ID)?;
        self.check_id(REG_DEVICE_ID, DEVICE_ID)?;

        debug!(address, "mcp9808 identity verified");
        Ok(())
    }

    fn check_id(&mut self, register: u8, expected: u16) -> Result<(), Mcp9808Error> {
        let found = self.read16(register)?;
        if found != expected {
            warn!(register, expected, found, "identity check failed");
            return Err(Mcp9808Error::IdMismatch {
                register,
                expected,
                found,
            });
        }
        Ok(())
    }

    /// Raw ambient-temperature register, flag bits included.
    pub fn read_raw_temperature(&mut self) -> Result<u16, Mcp9808Error> {
        self.read16(REG_AMBIENT_TEMP)
    }

    pub fn read_celsius(&mut self) -> Result<f32, Mcp9808Error> {
        let raw = self.read_raw_temperature()?;

        // Bits 15-13 are alert flags, not part of the magnitude
        let mut temperature = (raw & 0x0FFF) as f32 / 16.0;

        // The remaining 13 bits are two's complement; bit 12 is the sign
        if raw & 0x1000 != 0 {
            temperature -= 256.0;
        }

        Ok(temperature)
    }

    pub fn read_fahrenheit(&mut self) -> Result<f32, Mcp9808Error> {
        Ok(self.read_celsius()? * 9.0 / 5.0 + 32.0)
    }

    /// Put the sensor into low-power shutdown. Refused while either lock bit
    /// is set, since the chip write-protects the configuration register.
    pub fn shutdown(&mut self) -> Result<(), Mcp9808Error> {
        let conf = self.read16(REG_CONFIG)?;

        let locked = (conf & CONFIG_CRIT_LOCKED) == CONFIG_CRIT_LOCKED
            || (conf & CONFIG_WIN_LOCKED) == CONFIG_WIN_LOCKED;
        if locked {
            return Err(Mcp9808Error::ConfigLocked(conf));
        }

        self.write16(REG_CONFIG, conf | CONFIG_SHUTDOWN)
    }

    /// Resume continuous conversion. Clears only the shutdown bit; all other
    /// configuration flags are preserved.
    pub fn wake(&mut self) -> Result<(), Mcp9808Error> {
        let conf = self.read16(REG_CONFIG)?;
        self.write16(REG_CONFIG, conf & !CONFIG_SHUTDOWN)
    }

    /// Write a 16-bit register: selector byte, then the value big-endian.
    pub fn write16(&mut self, register: u8, value: u16) -> Result<(), Mcp9808Error> {
        self.bus.begin_transfer(self.address)?;
        self.bus.write_byte(register)?;
        self.bus.write_byte((value >> 8) as u8)?;
        self.bus.write_byte((value & 0xFF) as u8)?;
        self.bus.end_transfer()?;
        Ok(())
    }

    /// Read a 16-bit register: select it with a write phase, then request two
    /// bytes and assemble them big-endian.
    pub fn read16(&mut self, register: u8) -> Result<u16, Mcp9808Error> {
        self.bus.begin_transfer(self.address)?;
        self.bus.write_byte(register)?;
        self.bus.end_transfer()?;

        self.bus.request_bytes(self.address, 2)?;
        let hi = self.bus.read_byte()?;
        let lo = self.bus.read_byte()?;
        Ok(u16::from(hi) << 8 | u16::from(lo))
    }
}
