use rayon::prelude::*;

use crate::error::{HuffError, Result};

/// Inputs larger than this are counted in parallel.
const PARALLEL_THRESHOLD: usize = 64_000;
/// 16k is pretty much the sweet spot for chunk size.
const CHUNK_SIZE: usize = 16_000;

/// Occurrence count of every byte value in one input buffer. Built once, read-only after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; 256],
}

impl FrequencyTable {
    /// Count the bytes of `data`. Empty input is rejected.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.is_empty() {
            return Err(HuffError::EmptyInput);
        }
        Ok(Self {
            counts: freqs(data),
        })
    }

    /// How many times `symbol` occurs.
    pub fn count(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Number of distinct byte values present.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Total number of bytes counted.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Present symbols and their counts, in ascending symbol order.
    pub fn symbols(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .map(|(symbol, &count)| (symbol as u8, count))
    }
}

/// Returns a frequency count of the input data. Uses parallelism when data set is over 64k.
pub fn freqs(data: &[u8]) -> [u64; 256] {
    if data.len() > PARALLEL_THRESHOLD {
        data.par_chunks(CHUNK_SIZE)
            .fold(
                || [0_u64; 256],
                |mut freqs, chunk| {
                    chunk.iter().for_each(|&el| freqs[el as usize] += 1);
                    freqs
                },
            )
            .reduce(
                || [0_u64; 256],
                |mut s, f| {
                    s.iter_mut().zip(f.iter()).for_each(|(a, b)| *a += b);
                    s
                },
            )
    } else {
        let mut freqs = [0_u64; 256];
        data.iter().for_each(|&el| freqs[el as usize] += 1);
        freqs
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn small_count_test() {
        let table = FrequencyTable::from_bytes(b"aaaabbbcc").unwrap();
        assert_eq!(table.count(b'a'), 4);
        assert_eq!(table.count(b'b'), 3);
        assert_eq!(table.count(b'c'), 2);
        assert_eq!(table.count(b'd'), 0);
        assert_eq!(table.distinct(), 3);
        assert_eq!(table.total(), 9);
    }

    #[test]
    fn symbols_ascending_test() {
        let table = FrequencyTable::from_bytes(b"zyx zyx").unwrap();
        let syms = table.symbols().collect::<Vec<_>>();
        assert_eq!(syms, vec![(b' ', 1), (b'x', 2), (b'y', 2), (b'z', 2)]);
    }

    #[test]
    fn empty_input_test() {
        assert!(matches!(
            FrequencyTable::from_bytes(&[]),
            Err(HuffError::EmptyInput)
        ));
    }

    #[test]
    fn parallel_matches_sequential_test() {
        // Big enough to take the rayon path.
        let data = (0..200_000_u32)
            .map(|i| (i.wrapping_mul(2654435761) >> 13) as u8)
            .collect::<Vec<u8>>();
        let mut expected = [0_u64; 256];
        data.iter().for_each(|&b| expected[b as usize] += 1);
        assert_eq!(freqs(&data), expected);
        assert_eq!(FrequencyTable::from_bytes(&data).unwrap().total(), 200_000);
    }
}
