use crate::boxes::{BoxHeader, FourCC};
use crate::cursor::ByteCursor;
use crate::error::{ParseError, Result};
use crate::fixed::{Fixed8_8, Fixed16_16, Matrix, UFixed16_16};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A record decoded from one box's payload.
///
/// Implementations get a cursor at `hdr.payload_start`; reads are cut off at
/// `hdr.end`. They never look at child boxes.
pub trait BoxDecoder: Sized {
    fn decode(hdr: &BoxHeader, cur: &mut ByteCursor<'_>) -> Result<Self>;
}

/// Decode `hdr`'s payload out of the buffer it was walked from.
pub fn decode_box<T: BoxDecoder>(data: &[u8], hdr: &BoxHeader) -> Result<T> {
    let mut cur = ByteCursor::window(data, hdr.payload_start, hdr.end)?;
    T::decode(hdr, &mut cur)
}

// Runs `f` on a copy of `cur` windowed to the box, then moves `cur` to where
// `f` stopped.
fn within_box<T>(
    hdr: &BoxHeader,
    cur: &mut ByteCursor<'_>,
    f: impl FnOnce(&mut ByteCursor<'_>) -> Result<T>,
) -> Result<T> {
    let mut inner = ByteCursor::window(cur.data(), cur.position(), hdr.end.min(cur.limit()))?;
    let out = f(&mut inner)?;
    cur.seek(inner.position())?;
    Ok(out)
}

fn read_version_flags(cur: &mut ByteCursor<'_>) -> Result<(u8, u32)> {
    let version = cur.read_u8()?;
    let flags = cur.read_u24_be()?;
    Ok((version, flags))
}

// 4-byte words for version 0, 8-byte for version 1.
fn word_width(typ: FourCC, version: u8) -> Result<usize> {
    match version {
        0 => Ok(4),
        1 => Ok(8),
        _ => Err(ParseError::UnsupportedVersion { typ, version }),
    }
}

fn read_matrix(cur: &mut ByteCursor<'_>) -> Result<Matrix> {
    let mut m = [0i32; 9];
    for v in m.iter_mut() {
        *v = cur.read_i32_be()?;
    }
    Ok(Matrix(m))
}

// ---------- ftyp ----------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileTypeBox {
    pub major_brand: FourCC,
    pub minor_version: u32,
    pub compatible_brands: Vec<FourCC>,
}

impl FileTypeBox {
    /// What a file without `ftyp` is read as: `mp41`, version 0, `[mp41]`.
    pub fn mp41_default() -> Self {
        FileTypeBox {
            major_brand: FourCC::MP41,
            minor_version: 0,
            compatible_brands: vec![FourCC::MP41],
        }
    }

    pub fn is_compatible_with(&self, brand: FourCC) -> bool {
        self.major_brand == brand || self.compatible_brands.contains(&brand)
    }
}

impl Default for FileTypeBox {
    fn default() -> Self {
        Self::mp41_default()
    }
}

impl BoxDecoder for FileTypeBox {
    fn decode(hdr: &BoxHeader, cur: &mut ByteCursor<'_>) -> Result<Self> {
        within_box(hdr, cur, |c| {
            if c.remaining() < 8 {
                return Err(ParseError::malformed(
                    hdr.typ,
                    format!("{} byte payload cannot hold brand and version", c.remaining()),
                ));
            }
            let major_brand = c.read_fourcc()?;
            let minor_version = c.read_u32_be()?;
            let rest = c.remaining();
            if rest % 4 != 0 {
                return Err(ParseError::malformed(
                    hdr.typ,
                    format!("{rest} bytes of brands is not a multiple of 4"),
                ));
            }
            let mut compatible_brands = Vec::with_capacity(rest / 4);
            while !c.is_empty() {
                compatible_brands.push(c.read_fourcc()?);
            }
            Ok(FileTypeBox { major_brand, minor_version, compatible_brands })
        })
    }
}

pub fn decode_ftyp(hdr: &BoxHeader, cur: &mut ByteCursor<'_>) -> Result<FileTypeBox> {
    FileTypeBox::decode(hdr, cur)
}

// ---------- mvhd ----------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieHeaderBox {
    pub version: u8,
    pub flags: u32,
    pub creation_time: DateTime<Utc>,
    pub modification_time: DateTime<Utc>,
    /// Time units per second for the whole presentation.
    pub timescale: u32,
    /// Length of the longest track, in `timescale` units.
    pub duration: u64,
    pub rate: Fixed16_16,
    pub volume: Fixed8_8,
    pub matrix: Matrix,
    pub next_track_id: u32,
}

impl MovieHeaderBox {
    pub fn duration_seconds(&self) -> Option<f64> {
        (self.timescale != 0).then(|| self.duration as f64 / self.timescale as f64)
    }
}

impl BoxDecoder for MovieHeaderBox {
    fn decode(hdr: &BoxHeader, cur: &mut ByteCursor<'_>) -> Result<Self> {
        within_box(hdr, cur, |c| {
            let (version, flags) = read_version_flags(c)?;
            let w = word_width(hdr.typ, version)?;

            let creation_time = c.read_mac_epoch_time(w)?;
            let modification_time = c.read_mac_epoch_time(w)?;
            let timescale = c.read_u32_be()?; // 4 bytes in both versions
            let duration = c.read_word(w)?;
            let rate = c.read_fixed_16_16()?;
            let volume = c.read_fixed_8_8()?;
            c.skip(2 + 4 * 2)?; // reserved
            let matrix = read_matrix(c)?;
            c.skip(4 * 6)?; // pre_defined
            let next_track_id = c.read_u32_be()?;

            Ok(MovieHeaderBox {
                version,
                flags,
                creation_time,
                modification_time,
                timescale,
                duration,
                rate,
                volume,
                matrix,
                next_track_id,
            })
        })
    }
}

pub fn decode_mvhd(hdr: &BoxHeader, cur: &mut ByteCursor<'_>) -> Result<MovieHeaderBox> {
    MovieHeaderBox::decode(hdr, cur)
}

// ---------- tkhd ----------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackHeaderBox {
    pub version: u8,
    pub flags: u32,
    pub creation_time: DateTime<Utc>,
    pub modification_time: DateTime<Utc>,
    pub track_id: u32,
    /// In movie (`mvhd`) timescale units.
    pub duration: u64,
    pub layer: i16,
    pub alternate_group: i16,
    pub volume: Fixed8_8,
    pub matrix: Matrix,
    pub width: UFixed16_16,
    pub height: UFixed16_16,
}

impl TrackHeaderBox {
    pub const TRACK_ENABLED: u32 = 0x1;
    pub const TRACK_IN_MOVIE: u32 = 0x2;
    pub const TRACK_IN_PREVIEW: u32 = 0x4;

    pub fn is_enabled(&self) -> bool {
        self.flags & Self::TRACK_ENABLED != 0
    }

    pub fn is_in_movie(&self) -> bool {
        self.flags & Self::TRACK_IN_MOVIE != 0
    }

    pub fn is_in_preview(&self) -> bool {
        self.flags & Self::TRACK_IN_PREVIEW != 0
    }
}

impl BoxDecoder for TrackHeaderBox {
    fn decode(hdr: &BoxHeader, cur: &mut ByteCursor<'_>) -> Result<Self> {
        within_box(hdr, cur, |c| {
            let (version, flags) = read_version_flags(c)?;
            let w = word_width(hdr.typ, version)?;

            let creation_time = c.read_mac_epoch_time(w)?;
            let modification_time = c.read_mac_epoch_time(w)?;
            let track_id = c.read_u32_be()?;
            c.skip(4)?; // reserved
            let duration = c.read_word(w)?;
            c.skip(4 * 2)?; // reserved
            let layer = c.read_i16_be()?;
            let alternate_group = c.read_i16_be()?;
            let volume = c.read_fixed_8_8()?;
            c.skip(2)?; // reserved
            let matrix = read_matrix(c)?;
            let width = c.read_ufixed_16_16()?;
            let height = c.read_ufixed_16_16()?;

            Ok(TrackHeaderBox {
                version,
                flags,
                creation_time,
                modification_time,
                track_id,
                duration,
                layer,
                alternate_group,
                volume,
                matrix,
                width,
                height,
            })
        })
    }
}

pub fn decode_tkhd(hdr: &BoxHeader, cur: &mut ByteCursor<'_>) -> Result<TrackHeaderBox> {
    TrackHeaderBox::decode(hdr, cur)
}

// ---------- mdhd ----------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaHeaderBox {
    pub version: u8,
    pub creation_time: DateTime<Utc>,
    pub modification_time: DateTime<Utc>,
    /// Time units per second for this track's media.
    pub timescale: u32,
    pub duration: u64,
    /// ISO-639-2/T code, `und` when unset.
    pub language: String,
}

fn lang_from_u16(code: u16) -> String {
    if code == 0 {
        return "und".to_string();
    }
    let c1 = ((code >> 10) & 0x1F) as u8 + 0x60;
    let c2 = ((code >> 5) & 0x1F) as u8 + 0x60;
    let c3 = (code & 0x1F) as u8 + 0x60;
    format!("{}{}{}", c1 as char, c2 as char, c3 as char)
}

impl BoxDecoder for MediaHeaderBox {
    fn decode(hdr: &BoxHeader, cur: &mut ByteCursor<'_>) -> Result<Self> {
        within_box(hdr, cur, |c| {
            let (version, _flags) = read_version_flags(c)?;
            let w = word_width(hdr.typ, version)?;

            let creation_time = c.read_mac_epoch_time(w)?;
            let modification_time = c.read_mac_epoch_time(w)?;
            let timescale = c.read_u32_be()?;
            let duration = c.read_word(w)?;
            let language = lang_from_u16(c.read_u16_be()?);
            c.skip(2)?; // pre_defined

            Ok(MediaHeaderBox {
                version,
                creation_time,
                modification_time,
                timescale,
                duration,
                language,
            })
        })
    }
}

pub fn decode_mdhd(hdr: &BoxHeader, cur: &mut ByteCursor<'_>) -> Result<MediaHeaderBox> {
    MediaHeaderBox::decode(hdr, cur)
}

// ---------- hdlr ----------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandlerBox {
    /// `vide`, `soun`, `hint`, `meta`, ...
    pub handler_type: FourCC,
    pub name: String,
}

impl BoxDecoder for HandlerBox {
    fn decode(hdr: &BoxHeader, cur: &mut ByteCursor<'_>) -> Result<Self> {
        within_box(hdr, cur, |c| {
            let _ = read_version_flags(c)?;
            c.skip(4)?; // pre_defined
            let handler_type = c.read_fourcc()?;
            c.skip(4 * 3)?; // reserved

            // name: null-terminated string (or just rest of box)
            let rest = c.read(c.remaining())?;
            let name_bytes = match rest.iter().position(|&b| b == 0) {
                Some(nul) => &rest[..nul],
                None => rest,
            };
            let name = String::from_utf8_lossy(name_bytes).into_owned();

            Ok(HandlerBox { handler_type, name })
        })
    }
}

pub fn decode_hdlr(hdr: &BoxHeader, cur: &mut ByteCursor<'_>) -> Result<HandlerBox> {
    HandlerBox::decode(hdr, cur)
}

// ---------- stco / co64 ----------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OffsetWidth {
    /// `stco`
    Bits32,
    /// `co64`
    Bits64,
}

impl OffsetWidth {
    pub fn bytes(self) -> usize {
        match self {
            OffsetWidth::Bits32 => 4,
            OffsetWidth::Bits64 => 8,
        }
    }
}

/// Absolute file offsets of each chunk of a track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkOffsetTable {
    pub width: OffsetWidth,
    pub entries: Vec<u64>,
}

impl ChunkOffsetTable {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl BoxDecoder for ChunkOffsetTable {
    fn decode(hdr: &BoxHeader, cur: &mut ByteCursor<'_>) -> Result<Self> {
        let width = match &hdr.typ.0 {
            b"stco" => OffsetWidth::Bits32,
            b"co64" => OffsetWidth::Bits64,
            _ => return Err(ParseError::malformed(hdr.typ, "not a chunk offset box")),
        };
        within_box(hdr, cur, |c| {
            let payload_len = c.remaining() as u64;
            if payload_len < 8 {
                return Err(ParseError::malformed(
                    hdr.typ,
                    format!("{payload_len} byte payload cannot hold an entry count"),
                ));
            }
            let _ = read_version_flags(c)?;
            let entry_count = c.read_u32_be()?;

            let needed = 8 + entry_count as u64 * width.bytes() as u64;
            if payload_len < needed {
                return Err(ParseError::malformed(
                    hdr.typ,
                    format!("{entry_count} entries need {needed} bytes, payload has {payload_len}"),
                ));
            }

            let mut entries = Vec::with_capacity(entry_count as usize);
            for _ in 0..entry_count {
                entries.push(c.read_word(width.bytes())?);
            }
            if !c.is_empty() {
                log::debug!("{}: ignoring {} bytes of padding after table", hdr.typ, c.remaining());
                c.skip(c.remaining())?;
            }

            Ok(ChunkOffsetTable { width, entries })
        })
    }
}

fn expect_type(hdr: &BoxHeader, typ: FourCC) -> Result<()> {
    if hdr.typ != typ {
        return Err(ParseError::malformed(hdr.typ, format!("expected a {typ} box")));
    }
    Ok(())
}

/// 32-bit chunk offsets. Rejects any header that is not `stco`.
pub fn decode_stco(hdr: &BoxHeader, cur: &mut ByteCursor<'_>) -> Result<ChunkOffsetTable> {
    expect_type(hdr, FourCC::STCO)?;
    ChunkOffsetTable::decode(hdr, cur)
}

/// 64-bit chunk offsets. Rejects any header that is not `co64`.
pub fn decode_co64(hdr: &BoxHeader, cur: &mut ByteCursor<'_>) -> Result<ChunkOffsetTable> {
    expect_type(hdr, FourCC::CO64)?;
    ChunkOffsetTable::decode(hdr, cur)
}
