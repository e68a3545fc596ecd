use alloc::vec::Vec;
use core::ops::Range;

pub struct Encoder {
    data: Vec<u8>,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    pub fn build(self) -> Vec<u8> {
        self.data
    }

    pub fn offset(&self) -> usize {
        self.data.len()
    }

    /// Appends the minimal SDNV encoding of `value`, returning the range it occupies.
    pub fn emit(&mut self, value: u64) -> Range<usize> {
        let start = self.data.len();

        // Number of 7-bit groups needed, at least one
        let groups = ((64 - value.leading_zeros()).max(1)).div_ceil(7);
        for g in (0..groups).rev() {
            let mut b = ((value >> (g * 7)) & 0x7F) as u8;
            if g != 0 {
                b |= 0x80;
            }
            self.data.push(b);
        }
        start..self.data.len()
    }

    pub fn emit_raw_slice(&mut self, data: &[u8]) -> Range<usize> {
        let start = self.data.len();
        self.data.extend_from_slice(data);
        start..self.data.len()
    }
}

pub fn emit(value: u64) -> Vec<u8> {
    let mut e = Encoder::new();
    e.emit(value);
    e.build()
}
