//! Newline framing for the serial link.
//!
//! The phone sends one JSON command per line. Bytes are collected until
//! `\n`; a trailing `\r` is dropped and blank lines are skipped. A line
//! longer than the buffer is discarded up to its newline and reported once.

use heapless::Vec;
use thiserror::Error;

/// Framing failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("line exceeds the receive buffer")]
    Overflow,
}

/// Accumulates bytes into complete lines of at most `N` bytes.
#[derive(Debug, Default)]
pub struct LineFramer<const N: usize> {
    line: Vec<u8, N>,
    overflowed: bool,
}

impl<const N: usize> LineFramer<N> {
    pub const fn new() -> Self {
        Self {
            line: Vec::new(),
            overflowed: false,
        }
    }

    /// Feed one byte. Returns a finished line (or its failure) on `\n`.
    pub fn push(
        &mut self,
        byte: u8,
    ) -> Option<Result<Vec<u8, N>, FrameError>> {
        if byte != b'\n' {
            if !self.overflowed && self.line.push(byte).is_err() {
                self.overflowed = true;
            }
            return None;
        }

        let line = core::mem::take(&mut self.line);
        if core::mem::take(&mut self.overflowed) {
            return Some(Err(FrameError::Overflow));
        }

        let mut line = line;
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        if line.is_empty() {
            return None;
        }
        Some(Ok(line))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
