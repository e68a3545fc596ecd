use core::ops::Range;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("Not enough data for encoded value")]
    Truncated,

    #[error("Encoded value is too large for the target type")]
    Overflow,
}

/// An integer type that can be decoded from an SDNV.
///
/// `MAX_LEN` bounds the number of encoded octets accepted for the type,
/// independently of the decoded value: a 32-bit target accepts at most 5
/// octets (35 bits), a 64-bit target at most 10 (70 bits).
pub trait FromSdnv: Sized {
    const MAX_LEN: usize;

    fn from_sdnv(value: u64) -> Option<Self>;
}

impl FromSdnv for u32 {
    const MAX_LEN: usize = 5;

    fn from_sdnv(value: u64) -> Option<Self> {
        value.try_into().ok()
    }
}

impl FromSdnv for u64 {
    const MAX_LEN: usize = 10;

    fn from_sdnv(value: u64) -> Option<Self> {
        Some(value)
    }
}

// A value that would be negative when reinterpreted is an overflow
impl FromSdnv for i32 {
    const MAX_LEN: usize = 5;

    fn from_sdnv(value: u64) -> Option<Self> {
        value.try_into().ok()
    }
}

impl FromSdnv for i64 {
    const MAX_LEN: usize = 10;

    fn from_sdnv(value: u64) -> Option<Self> {
        value.try_into().ok()
    }
}

fn parse_raw(data: &[u8], max_len: usize) -> Result<(u64, usize), Error> {
    let mut value = 0u64;
    for (idx, b) in data.iter().enumerate() {
        if idx >= max_len || value > (u64::MAX >> 7) {
            return Err(Error::Overflow);
        }
        value = (value << 7) | (b & 0x7F) as u64;
        if b & 0x80 == 0 {
            return Ok((value, idx + 1));
        }
    }
    Err(Error::Truncated)
}

/// Decodes a single SDNV from the start of `data`, returning the value and
/// the number of octets consumed.
pub fn parse<T: FromSdnv>(data: &[u8]) -> Result<(T, usize), Error> {
    let (value, len) = parse_raw(data, T::MAX_LEN)?;
    T::from_sdnv(value)
        .map(|v| (v, len))
        .ok_or(Error::Overflow)
}

/// Decodes a single SDNV starting at `offset` within `data`.
pub fn parse_at<T: FromSdnv>(data: &[u8], offset: usize) -> Result<(T, usize), Error> {
    parse(data.get(offset..).ok_or(Error::Truncated)?)
}

/// A forward-only cursor over a byte buffer.
///
/// Offsets reported by a `Reader` are always relative to the start of the
/// buffer it was created from, including for sub-readers produced by
/// [`Reader::take`]. No read ever goes beyond `end()`.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
    end: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            offset: 0,
            end: data.len(),
        }
    }

    /// The whole underlying buffer, not just the readable window.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn remaining(&self) -> usize {
        self.end - self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.offset >= self.end
    }

    fn window(&self) -> &'a [u8] {
        &self.data[self.offset..self.end]
    }

    pub fn peek_u8(&self) -> Result<u8, Error> {
        self.window().first().copied().ok_or(Error::Truncated)
    }

    pub fn read_u8(&mut self) -> Result<u8, Error> {
        let b = self.peek_u8()?;
        self.offset += 1;
        Ok(b)
    }

    pub fn read_u16(&mut self) -> Result<u16, Error> {
        let s = self.read_slice(2)?;
        Ok(u16::from_be_bytes([s[0], s[1]]))
    }

    pub fn read_u32(&mut self) -> Result<u32, Error> {
        let s = self.read_slice(4)?;
        Ok(u32::from_be_bytes([s[0], s[1], s[2], s[3]]))
    }

    /// Consumes `len` octets, returning their range within the buffer.
    pub fn read_bytes(&mut self, len: usize) -> Result<Range<usize>, Error> {
        if len > self.remaining() {
            return Err(Error::Truncated);
        }
        let start = self.offset;
        self.offset += len;
        Ok(start..self.offset)
    }

    pub fn read_slice(&mut self, len: usize) -> Result<&'a [u8], Error> {
        let r = self.read_bytes(len)?;
        Ok(&self.data[r])
    }

    pub fn skip(&mut self, len: usize) -> Result<(), Error> {
        self.read_bytes(len).map(|_| ())
    }

    pub fn parse<T: FromSdnv>(&mut self) -> Result<T, Error> {
        let (value, len) = parse(self.window())?;
        self.offset += len;
        Ok(value)
    }

    /// Decodes an SDNV and returns the range of octets it occupied.
    pub fn parse_measured<T: FromSdnv>(&mut self) -> Result<(T, Range<usize>), Error> {
        let start = self.offset;
        let value = self.parse()?;
        Ok((value, start..self.offset))
    }

    /// Decodes a length field.
    ///
    /// Lengths gate subsequent reads, so they are held to the signed 32-bit
    /// range.
    pub fn parse_length(&mut self) -> Result<usize, Error> {
        let len: i32 = self.parse()?;
        usize::try_from(len).map_err(|_| Error::Overflow)
    }

    /// Splits off a sub-reader over the next `len` octets and advances past them.
    pub fn take(&mut self, len: usize) -> Result<Reader<'a>, Error> {
        let r = self.read_bytes(len)?;
        Ok(Reader {
            data: self.data,
            offset: r.start,
            end: r.end,
        })
    }
}
