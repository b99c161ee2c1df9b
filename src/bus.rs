use std::collections::VecDeque;

use rppal::i2c::I2c;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BusError {
    #[error("i2c transfer failed: {0}")]
    I2c(#[from] rppal::i2c::Error),
    #[error("bus returned {got} of {wanted} requested bytes")]
    ShortRead { wanted: usize, got: usize },
    #[error("no transfer in progress")]
    NoTransfer,
}

/// Wire-style two-phase bus surface: queue bytes into a write transaction,
/// flush it on `end_transfer`, then pull received bytes after `request_bytes`.
pub trait I2cBus {
    fn begin_transfer(&mut self, address: u8) -> Result<(), BusError>;
    fn write_byte(&mut self, byte: u8) -> Result<(), BusError>;
    fn end_transfer(&mut self) -> Result<(), BusError>;
    fn request_bytes(&mut self, address: u8, count: usize) -> Result<(), BusError>;
    fn read_byte(&mut self) -> Result<u8, BusError>;
}

/// `I2cBus` on top of the Raspberry Pi's /dev/i2c interface. rppal only
/// speaks whole transactions, so written bytes are buffered between
/// `begin_transfer` and `end_transfer`.
pub struct RppalBus {
    i2c: I2c,
    outgoing: Option<Vec<u8>>,
    incoming: VecDeque<u8>,
}

impl RppalBus {
    pub fn new(i2c: I2c) -> RppalBus {
        RppalBus {
            i2c,
            outgoing: None,
            incoming: VecDeque::new(),
        }
    }
}

impl I2cBus for RppalBus {
    fn begin_transfer(&mut self, address: u8) -> Result<(), BusError> {
        self.i2c.set_slave_address(address as u16)?;
        self.outgoing = Some(Vec::new());
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), BusError> {
        self.outgoing
            .as_mut()
            .ok_or(BusError::NoTransfer)?
            .push(byte);
        Ok(())
    }

    fn end_transfer(&mut self) -> Result<(), BusError> {
        let bytes = self.outgoing.take().ok_or(BusError::NoTransfer)?;
        self.i2c.write(&bytes)?;
        Ok(())
    }

    fn request_bytes(&mut self, address: u8, count: usize) -> Result<(), BusError> {
        self.i2c.set_slave_address(address as u16)?;
        let mut buffer = vec![0u8; count];
        let got = self.i2c.read(&mut buffer)?;
        if got < count {
            return Err(BusError::ShortRead { wanted: count, got });
        }
        self.incoming.extend(&buffer[..got]);
        Ok(())
    }

    fn read_byte(&mut self) -> Result<u8, BusError> {
        self.incoming
            .pop_front()
            .ok_or(BusError::ShortRead { wanted: 1, got: 0 })
    }
}
