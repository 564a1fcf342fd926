//! The bitstream module is the bit-level I/O layer of the codec.
//!
//! Huffman codes are rarely a whole number of bytes long. The BitPacker queues code bits and
//! pushes out full bytes, most significant bit first, padding the final byte with zeros.
//! The BitReader walks the same layout back, and can be limited to the logical bit length
//! recorded alongside the bytes so that padding is never read as data.
//!
//! Both are also used for the fixed-width header fields of the container, which are written
//! big-endian.
//!
pub mod bitpacker;
pub mod bitreader;
