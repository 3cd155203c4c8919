//! A compact array of 4 bit cells, two per byte.

/// Cell `i` lives in byte `i / 2`: even cells in the high nibble and odd cells
/// in the low nibble.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct NibbleArray {
    bytes: Box<[u8]>,
    len: usize,
}

const NIBBLE_MASK: u8 = 0x0F;

fn splat(value: u8) -> u8 {
    ((value & NIBBLE_MASK) << 4) | (value & NIBBLE_MASK)
}

impl NibbleArray {
    /// Create an array of `len` cells, each holding the low 4 bits of
    /// `initial`.
    #[must_use]
    pub fn new(len: usize, initial: u8) -> Self {
        NibbleArray {
            bytes: vec![splat(initial); Self::byte_len_for(len)].into_boxed_slice(),
            len,
        }
    }

    /// The number of bytes backing `len` cells.
    #[must_use]
    pub const fn byte_len_for(len: usize) -> usize {
        len.div_ceil(2)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    fn check_index(&self, index: usize) {
        assert!(
            index < self.len,
            "nibble index {index} out of range for length {}",
            self.len
        );
    }

    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> u8 {
        self.check_index(index);
        let byte = self.bytes[index / 2];
        if index % 2 == 0 {
            byte >> 4
        } else {
            byte & NIBBLE_MASK
        }
    }

    /// Store the low 4 bits of `value` in cell `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn set(&mut self, index: usize, value: u8) {
        self.check_index(index);
        let value = value & NIBBLE_MASK;
        let byte = &mut self.bytes[index / 2];
        *byte = if index % 2 == 0 {
            (*byte & NIBBLE_MASK) | (value << 4)
        } else {
            (*byte & !NIBBLE_MASK) | value
        };
    }

    /// Reset every cell to the low 4 bits of `value`.
    pub fn fill(&mut self, value: u8) {
        self.bytes.fill(splat(value));
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}
