//! I2C bus adapter.
//!
//! Implements [`BusTransport`] over any `embedded_hal::i2c::I2c` bus,
//! bound to one 7-bit device address.  On the host this is
//! `linux_embedded_hal::I2cdev`; tests use an in-memory bus.
//!
//! Register semantics follow SMBus block transfers:
//! - write: one transaction `[reg, data...]`
//! - read:  write `[reg]`, repeated start, read `len` bytes

use embedded_hal::i2c::{Error as _, I2c};
use log::debug;

use crate::app::ports::{BusTransport, Block, MAX_BLOCK_LEN};
use crate::error::TransportError;

pub struct I2cBus<I> {
    i2c: I,
    address: u8,
}

impl<I: I2c> I2cBus<I> {
    pub fn new(i2c: I, address: u8) -> Self {
        Self { i2c, address }
    }

    fn io_error(&self, op: &str, reg: u8, kind: embedded_hal::i2c::ErrorKind) -> TransportError {
        debug!(
            "i2c {} at {:#04x} reg {:#04x} failed: {:?}",
            op, self.address, reg, kind
        );
        TransportError::Io
    }
}

impl<I: I2c> BusTransport for I2cBus<I> {
    fn write_block(&mut self, reg: u8, data: &[u8]) -> Result<(), TransportError> {
        if data.len() > MAX_BLOCK_LEN {
            return Err(TransportError::BlockTooLarge(data.len()));
        }
        let mut buf = [0u8; MAX_BLOCK_LEN + 1];
        buf[0] = reg;
        buf[1..=data.len()].copy_from_slice(data);

        self.i2c
            .write(self.address, &buf[..=data.len()])
            .map_err(|e| self.io_error("write", reg, e.kind()))
    }

    fn read_block(&mut self, reg: u8, len: usize) -> Result<Block, TransportError> {
        if len > MAX_BLOCK_LEN {
            return Err(TransportError::BlockTooLarge(len));
        }
        let mut buf = [0u8; MAX_BLOCK_LEN];
        self.i2c
            .write_read(self.address, &[reg], &mut buf[..len])
            .map_err(|e| self.io_error("read", reg, e.kind()))?;
        Block::from_slice(&buf[..len]).map_err(|_| TransportError::BlockTooLarge(len))
    }

    fn read_byte(&mut self, reg: u8) -> Result<u8, TransportError> {
        let block = self.read_block(reg, 1)?;
        block
            .first()
            .copied()
            .ok_or(TransportError::ShortRead { expected: 1, got: 0 })
    }
}
