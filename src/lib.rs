//! Driver for the Microchip MCP9808 I2C temperature sensor.
//!
//! The driver sequences register reads and writes over any [`I2cBus`]
//! implementation; [`RppalBus`] provides one for the Raspberry Pi. Readings
//! come back as degrees Celsius with 1/16 degree resolution, decoded from the
//! chip's 13-bit two's-complement register format.

pub mod bus;
pub mod mcp9808;

pub use bus::{BusError, I2cBus, RppalBus};
pub use mcp9808::{Mcp9808, Mcp9808Error};
