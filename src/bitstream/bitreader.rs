//! BitReader: reads a packed bitstream, most significant bit first.
//!
//! The reader works over a borrowed slice and can be limited to a logical bit length, so
//! the zero padding in the last byte of a payload is never mistaken for data.
//!

use crate::error::{corrupt, Result};

const BIT_MASK: u8 = 0xff;

/// Reads bits out of a byte slice.
#[derive(Debug)]
pub struct BitReader<'a> {
    buffer: &'a [u8],
    cursor: usize,
    bit_index: usize,
    /// Logical number of readable bits.
    limit: u64,
    /// Bits consumed so far.
    consumed: u64,
}

impl<'a> BitReader<'a> {
    /// Creates a new BitReader over every bit of `buffer`.
    pub fn new(buffer: &'a [u8]) -> Self {
        Self::with_limit(buffer, buffer.len() as u64 * 8)
    }

    /// Creates a new BitReader that stops after `bits` bits (or the end of `buffer`).
    pub fn with_limit(buffer: &'a [u8], bits: u64) -> Self {
        Self {
            buffer,
            cursor: 0,
            bit_index: 0,
            limit: bits.min(buffer.len() as u64 * 8),
            consumed: 0,
        }
    }

    /// Number of bits still available before the limit.
    pub fn remaining_bits(&self) -> u64 {
        self.limit - self.consumed
    }

    /// Return bit as Option<usize> (1 or 0), or None if there is no more data to read
    pub fn bit(&mut self) -> Option<usize> {
        if self.remaining_bits() == 0 {
            return None;
        }
        let bit =
            (self.buffer[self.cursor] & BIT_MASK >> self.bit_index) >> (7 - self.bit_index);
        self.bit_index += 1;
        self.bit_index %= 8;
        if self.bit_index == 0 {
            self.cursor += 1;
        }
        self.consumed += 1;
        Some(bit as usize)
    }

    /// Return Option<Bool> *true* if the next bit is 1, *false* if 0, consuming the bit,
    /// or None if there is no more data to read
    pub fn bool_bit(&mut self) -> Option<bool> {
        self.bit().map(|bit| bit == 1)
    }

    /// Return the next n bits (0-64) as a big-endian number, or None if fewer than n bits
    /// remain. Nothing is consumed on None.
    pub fn bint(&mut self, n: usize) -> Option<u64> {
        if n > 64 || n as u64 > self.remaining_bits() {
            return None;
        }
        // Take as much as possible from each byte: the rest of a partial byte, then whole
        // bytes, then the head of the last byte.
        let mut result = 0_u64;
        let mut needed = n;
        while needed > 0 {
            let avail = 8 - self.bit_index;
            let take = needed.min(avail);
            let bits = (self.buffer[self.cursor] & BIT_MASK >> self.bit_index) >> (avail - take);
            result = (result << take) | bits as u64;
            self.bit_index += take;
            if self.bit_index == 8 {
                self.bit_index = 0;
                self.cursor += 1;
            }
            needed -= take;
        }
        self.consumed += n as u64;
        Some(result)
    }

    /// Returns a byte as an Option<u8>, or None if there is no more data to read. This is
    /// a convenience function, and calls bint(8).
    pub fn byte(&mut self) -> Option<u8> {
        self.bint(8).map(|byte| byte as u8)
    }

    /// Returns an Option<Vec<u8>> of n bytes, or None if fewer than n bytes remain.
    pub fn bytes(&mut self, n: usize) -> Option<Vec<u8>> {
        if n as u64 * 8 > self.remaining_bits() {
            return None;
        }
        (0..n).map(|_| self.byte()).collect()
    }

    /// Everything left up to the limit as a borrowed slice, when the reader sits on a byte
    /// boundary and the limit is whole bytes. Consumes it all.
    pub fn rest(&mut self) -> Option<&'a [u8]> {
        if self.bit_index != 0 || self.remaining_bits() % 8 != 0 {
            return None;
        }
        let end = self.cursor + (self.remaining_bits() / 8) as usize;
        let rest = &self.buffer[self.cursor..end];
        self.cursor = end;
        self.consumed = self.limit;
        Some(rest)
    }

    /// Debugging function. Report current position in the buffer.
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.cursor, self.bit_index)
    }
}

/// Expand packed bytes into bits, MSB first, keeping exactly `bit_len` of them.
/// Fails if `bytes` holds fewer than `bit_len` bits.
pub fn unpack(bytes: &[u8], bit_len: u64) -> Result<Vec<bool>> {
    if bit_len > bytes.len() as u64 * 8 {
        return Err(corrupt(format!(
            "{} bits declared but only {} bytes present",
            bit_len,
            bytes.len()
        )));
    }
    let mut br = BitReader::with_limit(bytes, bit_len);
    let mut bits = Vec::with_capacity(bit_len as usize);
    while let Some(bit) = br.bool_bit() {
        bits.push(bit);
    }
    Ok(bits)
}
