use log::error;

use crate::huffman_coding::code_book::Code;

/// Creates a bitstream for output. Bits are packed most significant bit first.
pub struct BitPacker {
    pub output: Vec<u8>,
    queue: u64,
    q_bits: u8,
    bit_count: u64,
}

impl BitPacker {
    /// Create a new BitPacker with an output buffer of size specified. Call flush() (or
    /// finish()) to push the last partial byte to the buffer.
    pub fn new(size: usize) -> Self {
        Self {
            output: Vec::with_capacity(size),
            queue: 0,
            q_bits: 0,
            bit_count: 0,
        }
    }

    /// Internal bitstream write function common to all out.XX functions.
    fn write_stream(&mut self) {
        while self.q_bits > 7 {
            let byte = (self.queue >> (self.q_bits - 8)) as u8;
            self.output.push(byte); //push the packed byte out
            self.q_bits -= 8; //adjust the count of bits left in the queue
        }
    }

    /// Writes the `depth` least significant bits of `data` (0-32 bits).
    pub fn out_bits(&mut self, data: u32, depth: u8) {
        debug_assert!(depth <= 32);
        if depth == 0 {
            return;
        }
        self.queue <<= depth; //shift queue by bit length
        self.queue |= data as u64 & (u64::MAX >> (64 - depth)); //add data portion to queue
        self.q_bits += depth; //update depth of queue bits
        self.bit_count += depth as u64;
        self.write_stream();
    }

    pub fn push_bit(&mut self, bit: bool) {
        self.out_bits(bit as u32, 1);
    }

    /// Puts the bits of a huffman code on the stream, root end first.
    pub fn push_code(&mut self, code: &Code) {
        for (bits, len) in code.chunks() {
            self.out_bits(bits, len);
        }
    }

    pub fn out8(&mut self, data: u8) {
        self.out_bits(data as u32, 8);
    }

    pub fn out16(&mut self, data: u16) {
        self.out_bits(data as u32, 16);
    }

    pub fn out32(&mut self, data: u32) {
        self.out_bits(data, 32);
    }

    pub fn out64(&mut self, data: u64) {
        self.out32((data >> 32) as u32);
        self.out32(data as u32);
    }

    /// Puts a run of bytes on the stream. Copies straight through when byte aligned.
    pub fn out_bytes(&mut self, data: &[u8]) {
        if self.q_bits == 0 {
            self.output.extend_from_slice(data);
            self.bit_count += data.len() as u64 * 8;
        } else {
            data.iter().for_each(|&b| self.out8(b));
        }
    }

    /// Number of logical bits written so far, padding excluded.
    pub fn bit_count(&self) -> u64 {
        self.bit_count
    }

    /// Flushes the remaining bits (1-7) from the buffer, padding with 0s in the least
    /// signficant bits
    pub fn flush(&mut self) {
        if self.q_bits > 0 {
            self.queue <<= 8 - self.q_bits; //pad the queue with zeros
            self.q_bits += 8 - self.q_bits;
            self.write_stream(); // write out all that is left
            if self.q_bits > 0 {
                error!("Stuff left in the BitPacker queue.");
            }
        }
    }

    /// Flush and hand back the packed bytes with the logical bit length.
    pub fn finish(mut self) -> (Vec<u8>, u64) {
        self.flush();
        (self.output, self.bit_count)
    }

    /// Debugging function to return the number of bytes.bits output so far
    pub fn loc(&self) -> String {
        format!(
            "[{}.{}]",
            ((self.output.len() * 8) + self.q_bits as usize) / 8,
            ((self.output.len() * 8) + self.q_bits as usize) % 8
        )
    }
}

/// Pack a sequence of bits 8 to a byte, MSB first, zero padding the last byte.
/// Returns the bytes and the logical bit length.
pub fn pack(bits: &[bool]) -> (Vec<u8>, u64) {
    let mut bp = BitPacker::new((bits.len() + 7) / 8);
    bits.iter().for_each(|&bit| bp.push_bit(bit));
    bp.finish()
}
