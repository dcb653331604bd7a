use crate::boxes::FourCC;
use crate::error::{ParseError, Result};
use crate::fixed::{Fixed8_8, Fixed16_16, UFixed16_16};
use crate::timestamp::mac_epoch_to_utc;
use byteorder::{BigEndian, ByteOrder};
use chrono::{DateTime, Utc};

/// Read position over an immutable byte buffer.
///
/// Positions are absolute offsets into `data`. A cursor may be windowed so
/// that reads stop at `limit` even though the buffer continues; leaf decoders
/// get a window ending at their box's end.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
    limit: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        ByteCursor { data, pos: 0, limit: data.len() }
    }

    /// A cursor at `start` that refuses to read at or past `end`.
    pub fn window(data: &'a [u8], start: usize, end: usize) -> Result<Self> {
        if end > data.len() || start > end {
            return Err(ParseError::OutOfBounds {
                offset: start,
                needed: end.saturating_sub(start),
                limit: data.len(),
            });
        }
        Ok(ByteCursor { data, pos: start, limit: end })
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn remaining(&self) -> usize {
        self.limit - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos == self.limit
    }

    pub fn seek(&mut self, offset: usize) -> Result<()> {
        if offset > self.limit {
            return Err(ParseError::OutOfBounds {
                offset,
                needed: 0,
                limit: self.limit,
            });
        }
        self.pos = offset;
        Ok(())
    }

    pub fn peek(&self, n: usize) -> Result<&'a [u8]> {
        match self.pos.checked_add(n) {
            Some(end) if end <= self.limit => Ok(&self.data[self.pos..end]),
            _ => Err(ParseError::OutOfBounds {
                offset: self.pos,
                needed: n,
                limit: self.limit,
            }),
        }
    }

    pub fn read(&mut self, n: usize) -> Result<&'a [u8]> {
        let bytes = self.peek(n)?;
        self.pos += n;
        Ok(bytes)
    }

    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.read(n).map(|_| ())
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read(1)?[0])
    }

    pub fn read_u16_be(&mut self) -> Result<u16> {
        Ok(BigEndian::read_u16(self.read(2)?))
    }

    pub fn read_i16_be(&mut self) -> Result<i16> {
        Ok(BigEndian::read_i16(self.read(2)?))
    }

    pub fn read_u24_be(&mut self) -> Result<u32> {
        Ok(BigEndian::read_u24(self.read(3)?))
    }

    pub fn read_u32_be(&mut self) -> Result<u32> {
        Ok(BigEndian::read_u32(self.read(4)?))
    }

    pub fn read_i32_be(&mut self) -> Result<i32> {
        Ok(BigEndian::read_i32(self.read(4)?))
    }

    pub fn read_u64_be(&mut self) -> Result<u64> {
        Ok(BigEndian::read_u64(self.read(8)?))
    }

    /// Unsigned big-endian word of 4 or 8 bytes, as used by versioned boxes.
    /// Callers only pass widths from `word_width` or `OffsetWidth::bytes`.
    pub(crate) fn read_word(&mut self, width: usize) -> Result<u64> {
        match width {
            4 => self.read_u32_be().map(u64::from),
            8 => self.read_u64_be(),
            _ => Err(ParseError::OutOfBounds {
                offset: self.pos,
                needed: width,
                limit: self.limit,
            }),
        }
    }

    pub fn read_fourcc(&mut self) -> Result<FourCC> {
        self.read_array::<4>().map(FourCC)
    }

    pub fn read_uuid(&mut self) -> Result<[u8; 16]> {
        self.read_array::<16>()
    }

    pub fn read_fixed_16_16(&mut self) -> Result<Fixed16_16> {
        self.read_i32_be().map(Fixed16_16::from_bits)
    }

    pub fn read_ufixed_16_16(&mut self) -> Result<UFixed16_16> {
        self.read_u32_be().map(UFixed16_16::from_bits)
    }

    pub fn read_fixed_8_8(&mut self) -> Result<Fixed8_8> {
        self.read_i16_be().map(Fixed8_8::from_bits)
    }

    /// Seconds since 1904-01-01T00:00:00Z stored in a 4- or 8-byte field.
    pub fn read_mac_epoch_time(&mut self, width: usize) -> Result<DateTime<Utc>> {
        let raw = match width {
            4 | 8 => self.read_word(width)?,
            _ => return Err(ParseError::InvalidTimestamp { value: width as u64 }),
        };
        mac_epoch_to_utc(raw)
    }
}
