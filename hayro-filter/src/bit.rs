//! Reading and writing MSB-first codes of varying width.

/// A bit reader.
#[derive(Debug, Clone)]
pub(crate) struct BitReader<'a> {
    data: &'a [u8],
    cur_pos: usize,
}

impl<'a> BitReader<'a> {
    #[inline]
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, cur_pos: 0 }
    }

    /// Read a code of `bit_size` bits, at most 16.
    ///
    /// Returns `None` if not enough bits are left.
    #[inline(always)]
    pub(crate) fn read(&mut self, bit_size: u8) -> Option<u16> {
        debug_assert!(bit_size <= 16);

        let byte_pos = self.cur_pos / 8;
        let bit_pos = self.cur_pos % 8;
        let end_byte_pos = (bit_pos + bit_size as usize - 1) / 8;
        let mut read = [0_u8; 4];

        for (i, r) in read.iter_mut().enumerate().take(end_byte_pos + 1) {
            *r = *self.data.get(byte_pos + i)?;
        }

        let item = (u32::from_be_bytes(read) >> (32 - bit_pos - bit_size as usize)) & bit_mask(bit_size);
        self.cur_pos += bit_size as usize;

        Some(item as u16)
    }
}

/// A bit writer that grows its buffer as needed.
#[derive(Debug, Default)]
pub(crate) struct BitWriter {
    data: Vec<u8>,
    cur_pos: usize,
}

impl BitWriter {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            cur_pos: 0,
        }
    }

    /// Write the lowest `bit_size` bits of `val`.
    #[inline]
    pub(crate) fn write(&mut self, val: u16, bit_size: u8) {
        let value = val as u32 & bit_mask(bit_size);
        let mut bits_left = bit_size as usize;

        while bits_left > 0 {
            let bit_pos = self.cur_pos % 8;

            if bit_pos == 0 {
                self.data.push(0);
            }

            let bits_in_byte = (8 - bit_pos).min(bits_left);
            let chunk = (value >> (bits_left - bits_in_byte)) & bit_mask(bits_in_byte as u8);

            if let Some(byte) = self.data.last_mut() {
                *byte |= (chunk as u8) << (8 - bit_pos - bits_in_byte);
            }

            self.cur_pos += bits_in_byte;
            bits_left -= bits_in_byte;
        }
    }

    /// Return the written bytes, with the last byte padded with zero bits.
    pub(crate) fn finish(self) -> Vec<u8> {
        self.data
    }
}

fn bit_mask(bit_size: u8) -> u32 {
    ((1_u64 << bit_size) - 1) as u32
}
