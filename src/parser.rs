use crate::boxes::{BoxHeader, BoxSize, FourCC};
use crate::cursor::ByteCursor;
use crate::error::{ParseError, Result};
use std::iter::FusedIterator;

/// Smallest possible box: 32-bit size + type.
pub const MIN_HEADER_SIZE: usize = 8;
/// Header with a 64-bit large size.
pub const LARGE_HEADER_SIZE: usize = 16;

/// Read the header of the box starting at the cursor's position.
///
/// `range_end` is the end of the enclosing range (parent payload or buffer).
/// On success the cursor is left at `payload_start`.
pub fn read_box_header(cur: &mut ByteCursor<'_>, range_end: usize) -> Result<BoxHeader> {
    let start = cur.position();
    if range_end > cur.limit() || start > range_end {
        return Err(ParseError::OutOfBounds {
            offset: start,
            needed: range_end.saturating_sub(start),
            limit: cur.limit(),
        });
    }
    let available = range_end - start;
    if available < MIN_HEADER_SIZE {
        return Err(ParseError::TruncatedHeader { offset: start, available });
    }

    let size32 = cur.read_u32_be()?;
    let typ = cur.read_fourcc()?;

    let (size_field, end) = match size32 {
        0 => (BoxSize::ToEnd, range_end),
        1 => {
            if available < LARGE_HEADER_SIZE {
                return Err(ParseError::TruncatedHeader { offset: start, available });
            }
            let large = cur.read_u64_be()?;
            if large < LARGE_HEADER_SIZE as u64 || large > available as u64 {
                return Err(ParseError::InvalidSize { offset: start, size: large });
            }
            (BoxSize::Large(large), start + large as usize)
        }
        n => {
            if (n as usize) < MIN_HEADER_SIZE || n as usize > available {
                return Err(ParseError::InvalidSize { offset: start, size: n as u64 });
            }
            (BoxSize::Normal(n), start + n as usize)
        }
    };

    let mut user_type = None;
    if typ == FourCC::UUID {
        if cur.position() + 16 > end {
            return Err(ParseError::InvalidSize { offset: start, size: (end - start) as u64 });
        }
        user_type = Some(cur.read_uuid()?);
    }

    let payload_start = cur.position();
    Ok(BoxHeader {
        typ,
        size_field,
        user_type,
        start,
        payload_start,
        end,
        header_size: payload_start - start,
    })
}

/// Sibling box headers in `[pos, end)`.
///
/// Each next box starts where the previous one declared its end. The first
/// error ends the iteration.
#[derive(Debug, Clone)]
pub struct BoxWalker<'a> {
    data: &'a [u8],
    pos: usize,
    end: usize,
    done: bool,
}

impl<'a> BoxWalker<'a> {
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn range_end(&self) -> usize {
        self.end
    }

    fn step(&mut self) -> Result<BoxHeader> {
        let mut cur = ByteCursor::window(self.data, self.pos, self.end)?;
        let remaining = cur.remaining();
        if remaining < MIN_HEADER_SIZE {
            return Err(ParseError::TrailingBytes { offset: self.pos, len: remaining });
        }
        read_box_header(&mut cur, self.end)
    }
}

impl Iterator for BoxWalker<'_> {
    type Item = Result<BoxHeader>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.pos == self.end {
            self.done = true;
            return None;
        }
        match self.step() {
            Ok(hdr) => {
                log::trace!("box {} at {}..{}", hdr.typ, hdr.start, hdr.end);
                self.pos = hdr.end;
                Some(Ok(hdr))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl FusedIterator for BoxWalker<'_> {}

/// Walk the boxes laid out back to back in `data[start..end]`.
///
/// Restartable: every call parses from scratch. Recursion into containers is
/// up to the caller, over `[payload_start, end)` of the container.
pub fn walk(data: &[u8], start: usize, end: usize) -> BoxWalker<'_> {
    BoxWalker { data, pos: start, end, done: false }
}
