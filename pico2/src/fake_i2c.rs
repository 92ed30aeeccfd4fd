//! Scripted I2C target for driver tests.

use std::collections::VecDeque;

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

/// Register-file device answering at one address.
pub(crate) struct FakeI2c {
    pub address: u8,
    pub regs: [u8; 256],
    /// `(data register, read-pointer register)`: reads from the data
    /// register stream out of `fifo` and bump the read pointer.
    pub fifo_port: Option<(u8, u8)>,
    pub fifo: VecDeque<u8>,
    /// `(register, mask)` of bits that clear right after being written.
    pub self_clearing: Option<(u8, u8)>,
    /// Keep self-clearing bits set (device stuck in reset).
    pub sticky_reset: bool,
    /// NACK every transaction.
    pub fail: bool,
    pointer: u8,
}

impl FakeI2c {
    pub fn new(address: u8) -> Self {
        Self {
            address,
            regs: [0; 256],
            fifo_port: None,
            fifo: VecDeque::new(),
            self_clearing: None,
            sticky_reset: false,
            fail: false,
            pointer: 0,
        }
    }

    fn write_byte(
        &mut self,
        value: u8,
    ) {
        let reg = self.pointer;
        self.regs[reg as usize] = match self.self_clearing {
            Some((r, mask)) if r == reg && !self.sticky_reset => value & !mask,
            _ => value,
        };
        self.pointer = self.pointer.wrapping_add(1);
    }

    fn read_into(
        &mut self,
        buf: &mut [u8],
    ) {
        if let Some((data, rd_ptr)) = self.fifo_port
            && data == self.pointer
        {
            for b in buf.iter_mut() {
                *b = self.fifo.pop_front().unwrap_or(0);
            }
            self.regs[rd_ptr as usize] = (self.regs[rd_ptr as usize] + 1) % 32;
            return;
        }
        for b in buf.iter_mut() {
            *b = self.regs[self.pointer as usize];
            self.pointer = self.pointer.wrapping_add(1);
        }
    }
}

impl ErrorType for FakeI2c {
    type Error = ErrorKind;
}

impl I2c for FakeI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if self.fail || address != self.address {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    if let Some((&reg, rest)) = bytes.split_first() {
                        self.pointer = reg;
                        for &b in rest {
                            self.write_byte(b);
                        }
                    }
                }
                Operation::Read(buf) => self.read_into(buf),
            }
        }
        Ok(())
    }
}
