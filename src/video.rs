//! Assembles the typed view of a whole file from one walk over its boxes.
//!
//! Recursion policy lives here: `moov`, `trak`, `mdia`, `minf` and `stbl`
//! are descended into, the leaves this crate understands are decoded, and
//! everything else is stepped over by its declared size.

use crate::boxes::{BoxHeader, BoxSize, FourCC};
use crate::decoders::{
    ChunkOffsetTable, FileTypeBox, HandlerBox, MediaHeaderBox, MovieHeaderBox, TrackHeaderBox,
    decode_box,
};
use crate::error::Result;
use crate::parser::walk;
use serde::Serialize;

/// Where a top-level `mdat` sits. Sample data itself is never read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaData {
    pub start: usize,
    pub payload_start: usize,
    pub payload_len: usize,
    /// Declared with the 64-bit size field.
    pub large_size: bool,
}

/// Everything found under one `trak` box.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Track {
    pub header: Option<TrackHeaderBox>,
    pub media_header: Option<MediaHeaderBox>,
    pub handler: Option<HandlerBox>,
    pub chunk_offsets: Option<ChunkOffsetTable>,
}

impl Track {
    pub fn track_id(&self) -> Option<u32> {
        self.header.as_ref().map(|h| h.track_id)
    }

    pub fn handler_type(&self) -> Option<FourCC> {
        self.handler.as_ref().map(|h| h.handler_type)
    }

    /// Media duration in seconds, from `mdhd`.
    pub fn duration_seconds(&self) -> Option<f64> {
        let mdhd = self.media_header.as_ref()?;
        (mdhd.timescale != 0).then(|| mdhd.duration as f64 / mdhd.timescale as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoFile {
    /// The `ftyp` leading the file, or the `mp41` default when there is none.
    pub file_type: FileTypeBox,
    /// `false` when `file_type` is the default.
    pub file_type_declared: bool,
    pub movie_header: Option<MovieHeaderBox>,
    /// One entry per `trak`, in file order.
    pub tracks: Vec<Track>,
    pub media_data: Vec<MediaData>,
    pub top_level: Vec<BoxHeader>,
}

impl VideoFile {
    pub fn parse(data: &[u8]) -> Result<Self> {
        parse(data)
    }

    pub fn duration_seconds(&self) -> Option<f64> {
        self.movie_header.as_ref()?.duration_seconds()
    }
}

/// Decode a complete in-memory MP4/MOV file.
pub fn parse(data: &[u8]) -> Result<VideoFile> {
    log::debug!("parsing {} bytes", data.len());

    let mut file_type = None;
    let mut movie_header = None;
    let mut tracks = Vec::new();
    let mut media_data = Vec::new();
    let mut top_level: Vec<BoxHeader> = Vec::new();

    for hdr in walk(data, 0, data.len()) {
        let hdr = hdr?;
        match &hdr.typ.0 {
            b"ftyp" => {
                // only an ftyp leading the file declares its type
                let leading = top_level.iter().all(|h| h.typ == FourCC::FTYP);
                if file_type.is_some() {
                    log::warn!("ignoring extra ftyp at offset {}", hdr.start);
                } else if !leading {
                    log::warn!("ignoring ftyp at offset {} after other boxes", hdr.start);
                } else {
                    file_type = Some(decode_box::<FileTypeBox>(data, &hdr)?);
                }
            }
            b"moov" => read_moov(data, &hdr, &mut movie_header, &mut tracks)?,
            b"mdat" => media_data.push(MediaData {
                start: hdr.start,
                payload_start: hdr.payload_start,
                payload_len: hdr.payload_len(),
                large_size: matches!(hdr.size_field, BoxSize::Large(_)),
            }),
            _ => log::debug!("skipping top-level {} ({} bytes)", hdr.typ, hdr.size()),
        }
        top_level.push(hdr);
    }

    let file_type_declared = file_type.is_some();
    if !file_type_declared {
        log::debug!("no ftyp box, assuming mp41");
    }

    Ok(VideoFile {
        file_type: file_type.unwrap_or_else(FileTypeBox::mp41_default),
        file_type_declared,
        movie_header,
        tracks,
        media_data,
        top_level,
    })
}

fn read_moov(
    data: &[u8],
    moov: &BoxHeader,
    movie_header: &mut Option<MovieHeaderBox>,
    tracks: &mut Vec<Track>,
) -> Result<()> {
    for hdr in walk(data, moov.payload_start, moov.end) {
        let hdr = hdr?;
        match &hdr.typ.0 {
            b"mvhd" => {
                if movie_header.is_some() {
                    log::warn!("ignoring extra mvhd at offset {}", hdr.start);
                } else {
                    *movie_header = Some(decode_box(data, &hdr)?);
                }
            }
            b"trak" => tracks.push(read_trak(data, &hdr)?),
            _ => log::debug!("skipping {} in moov", hdr.typ),
        }
    }
    Ok(())
}

fn read_trak(data: &[u8], trak: &BoxHeader) -> Result<Track> {
    let mut track = Track::default();
    for hdr in walk(data, trak.payload_start, trak.end) {
        let hdr = hdr?;
        match &hdr.typ.0 {
            b"tkhd" => track.header = Some(decode_box(data, &hdr)?),
            b"mdia" => read_mdia(data, &hdr, &mut track)?,
            _ => log::debug!("skipping {} in trak", hdr.typ),
        }
    }
    Ok(track)
}

fn read_mdia(data: &[u8], mdia: &BoxHeader, track: &mut Track) -> Result<()> {
    for hdr in walk(data, mdia.payload_start, mdia.end) {
        let hdr = hdr?;
        match &hdr.typ.0 {
            b"mdhd" => track.media_header = Some(decode_box(data, &hdr)?),
            b"hdlr" => track.handler = Some(decode_box(data, &hdr)?),
            b"minf" => {
                for inner in walk(data, hdr.payload_start, hdr.end) {
                    let inner = inner?;
                    if inner.typ == FourCC::STBL {
                        read_stbl(data, &inner, track)?;
                    }
                }
            }
            _ => log::debug!("skipping {} in mdia", hdr.typ),
        }
    }
    Ok(())
}

fn read_stbl(data: &[u8], stbl: &BoxHeader, track: &mut Track) -> Result<()> {
    for hdr in walk(data, stbl.payload_start, stbl.end) {
        let hdr = hdr?;
        if hdr.typ == FourCC::STCO || hdr.typ == FourCC::CO64 {
            if track.chunk_offsets.is_some() {
                log::warn!("track has more than one chunk offset table, keeping the first");
                continue;
            }
            track.chunk_offsets = Some(decode_box(data, &hdr)?);
        }
    }
    Ok(())
}
