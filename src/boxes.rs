use crate::known_boxes::KnownBox;
use crate::parser::{BoxWalker, walk};
use crate::error::Result;
use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    pub const FTYP: Self = FourCC(*b"ftyp");
    pub const MOOV: Self = FourCC(*b"moov");
    pub const MDAT: Self = FourCC(*b"mdat");
    pub const MVHD: Self = FourCC(*b"mvhd");
    pub const TRAK: Self = FourCC(*b"trak");
    pub const TKHD: Self = FourCC(*b"tkhd");
    pub const MDIA: Self = FourCC(*b"mdia");
    pub const MDHD: Self = FourCC(*b"mdhd");
    pub const HDLR: Self = FourCC(*b"hdlr");
    pub const MINF: Self = FourCC(*b"minf");
    pub const STBL: Self = FourCC(*b"stbl");
    pub const STCO: Self = FourCC(*b"stco");
    pub const CO64: Self = FourCC(*b"co64");
    pub const UUID: Self = FourCC(*b"uuid");
    pub const MP41: Self = FourCC(*b"mp41");

    pub fn from_str(s: &str) -> Option<Self> {
        let b = s.as_bytes();
        if b.len() == 4 {
            Some(FourCC([b[0], b[1], b[2], b[3]]))
        } else { None }
    }
    pub fn as_str_lossy(&self) -> String {
        self.0.iter().map(|&c| if (32..=126).contains(&c) { c as char } else { '.' })
            .collect()
    }
}
impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str_lossy())
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str_lossy())
    }
}

impl Serialize for FourCC {
    fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.serialize_str(&self.as_str_lossy())
    }
}

/// Which size convention a box header used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BoxSize {
    /// Ordinary 32-bit size, header included.
    Normal(u32),
    /// `size == 1`, followed by a 64-bit size.
    Large(u64),
    /// `size == 0`: the box runs to the end of the enclosing range.
    ToEnd,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoxHeader {
    pub typ: FourCC,
    pub size_field: BoxSize,
    #[serde(serialize_with = "serialize_user_type")]
    pub user_type: Option<[u8; 16]>,
    pub start: usize,         // absolute offset of the size field
    pub payload_start: usize, // first byte after the header
    pub end: usize,           // one past the last byte of the box
    pub header_size: usize,   // 8, 16, or +16 for uuid boxes
}

impl BoxHeader {
    /// Total box length, header included.
    pub fn size(&self) -> u64 {
        (self.end - self.start) as u64
    }

    pub fn payload_len(&self) -> usize {
        self.end - self.payload_start
    }
}

fn serialize_user_type<S: Serializer>(
    v: &Option<[u8; 16]>,
    s: S,
) -> std::result::Result<S::Ok, S::Error> {
    match v {
        Some(u) => s.serialize_some(&hex::encode(u)),
        None => s.serialize_none(),
    }
}

/// What a box holds, decided from its type.
#[derive(Debug, Clone)]
pub enum NodeKind<'a> {
    Container(BoxWalker<'a>),
    FullBox { version: u8, flags: u32, data: &'a [u8] },
    Leaf(&'a [u8]),
    Unknown(&'a [u8]),
}

/// A box in a borrowed buffer. Children and payload are views, never copies.
#[derive(Debug, Clone)]
pub struct BoxRef<'a> {
    pub hdr: BoxHeader,
    data: &'a [u8],
}

impl<'a> BoxRef<'a> {
    pub(crate) fn new(hdr: BoxHeader, data: &'a [u8]) -> Self {
        BoxRef { hdr, data }
    }

    pub fn known(&self) -> KnownBox {
        KnownBox::from(self.hdr.typ)
    }

    pub fn payload(&self) -> &'a [u8] {
        &self.data[self.hdr.payload_start..self.hdr.end]
    }

    pub fn kind(&self) -> NodeKind<'a> {
        let payload = self.payload();
        let known = self.known();
        if known.is_container() {
            NodeKind::Container(walk(self.data, self.hdr.payload_start, self.hdr.end))
        } else if known.is_full_box() && payload.len() >= 4 {
            let flags =
                ((payload[1] as u32) << 16) | ((payload[2] as u32) << 8) | (payload[3] as u32);
            NodeKind::FullBox { version: payload[0], flags, data: &payload[4..] }
        } else if self.hdr.typ == FourCC::UUID {
            NodeKind::Unknown(payload)
        } else {
            NodeKind::Leaf(payload)
        }
    }

    /// Lazily iterate the children of a container box; `None` for anything else.
    pub fn children(&self) -> Option<Boxes<'a>> {
        if self.known().is_container() {
            Some(Boxes { walker: walk(self.data, self.hdr.payload_start, self.hdr.end) })
        } else {
            None
        }
    }
}

/// Sibling boxes over a range, as nodes.
#[derive(Debug, Clone)]
pub struct Boxes<'a> {
    walker: BoxWalker<'a>,
}

impl<'a> Iterator for Boxes<'a> {
    type Item = Result<BoxRef<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        let data = self.walker.data();
        self.walker.next().map(|r| r.map(|hdr| BoxRef::new(hdr, data)))
    }
}

/// Top-level boxes of a whole buffer.
pub fn boxes(data: &[u8]) -> Boxes<'_> {
    Boxes { walker: walk(data, 0, data.len()) }
}
