//! Human-readable rendering of a parsed [`VideoFile`].

use crate::decoders::{ChunkOffsetTable, MovieHeaderBox, OffsetWidth};
use crate::fixed::Matrix;
use crate::util::spaced_hex;
use crate::video::{Track, VideoFile};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use std::fmt;

/// Text report of a file, with timestamps shown at `offset`.
pub struct Report<'a> {
    pub file: &'a VideoFile,
    pub offset: FixedOffset,
}

impl<'a> Report<'a> {
    pub fn utc(file: &'a VideoFile) -> Self {
        Report { file, offset: Utc.fix() }
    }

    fn time(&self, t: &DateTime<Utc>) -> String {
        t.with_timezone(&self.offset).format("%Y-%m-%d %H:%M:%S %:z").to_string()
    }

    fn movie(&self, f: &mut fmt::Formatter<'_>, mvhd: &MovieHeaderBox) -> fmt::Result {
        writeln!(f, "Movie header (version {}):", mvhd.version)?;
        writeln!(f, "  created:   {}", self.time(&mvhd.creation_time))?;
        writeln!(f, "  modified:  {}", self.time(&mvhd.modification_time))?;
        writeln!(f, "  timescale: {}", mvhd.timescale)?;
        match mvhd.duration_seconds() {
            Some(s) => writeln!(f, "  duration:  {} ({s:.3} s)", mvhd.duration)?,
            None => writeln!(f, "  duration:  {}", mvhd.duration)?,
        }
        writeln!(f, "  rate:      {}", mvhd.rate)?;
        writeln!(f, "  volume:    {}", mvhd.volume)?;
        matrix(f, &mvhd.matrix)?;
        writeln!(f, "  next track id: {}", mvhd.next_track_id)
    }

    fn track(&self, f: &mut fmt::Formatter<'_>, index: usize, track: &Track) -> fmt::Result {
        write!(f, "Track #{index}")?;
        if let Some(id) = track.track_id() {
            write!(f, " id={id}")?;
        }
        if let Some(hdlr) = &track.handler {
            write!(f, " {}", hdlr.handler_type)?;
            if !hdlr.name.is_empty() {
                write!(f, " \"{}\"", hdlr.name)?;
            }
        }
        writeln!(f)?;

        if let Some(tkhd) = &track.header {
            writeln!(
                f,
                "  {}, {}x{}, layer {}, alternate group {}",
                if tkhd.is_enabled() { "enabled" } else { "disabled" },
                tkhd.width.integer_part(),
                tkhd.height.integer_part(),
                tkhd.layer,
                tkhd.alternate_group,
            )?;
            writeln!(f, "  created:   {}", self.time(&tkhd.creation_time))?;
            writeln!(f, "  modified:  {}", self.time(&tkhd.modification_time))?;
            writeln!(f, "  duration:  {} (movie timescale)", tkhd.duration)?;
            if !tkhd.matrix.is_identity() {
                matrix(f, &tkhd.matrix)?;
            }
        }
        if let Some(mdhd) = &track.media_header {
            write!(f, "  media:     timescale {}, language {}", mdhd.timescale, mdhd.language)?;
            match track.duration_seconds() {
                Some(s) => writeln!(f, ", {s:.3} s")?,
                None => writeln!(f)?,
            }
        }
        if let Some(table) = &track.chunk_offsets {
            chunks(f, table)?;
        }
        Ok(())
    }
}

fn matrix(f: &mut fmt::Formatter<'_>, m: &Matrix) -> fmt::Result {
    for (i, bytes) in m.to_be_bytes().iter().enumerate() {
        writeln!(f, "  matrix[{i}]: {}", spaced_hex(bytes))?;
    }
    Ok(())
}

fn chunks(f: &mut fmt::Formatter<'_>, table: &ChunkOffsetTable) -> fmt::Result {
    let kind = match table.width {
        OffsetWidth::Bits32 => "stco",
        OffsetWidth::Bits64 => "co64",
    };
    write!(f, "  chunks:    {} ({kind})", table.len())?;
    if let (Some(first), Some(last)) = (table.entries.first(), table.entries.last()) {
        write!(f, ", offsets {first:#x}..={last:#x}")?;
    }
    writeln!(f)
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ftyp = &self.file.file_type;
        write!(f, "File type: {} (minor {})", ftyp.major_brand, ftyp.minor_version)?;
        if !self.file.file_type_declared {
            write!(f, " [no ftyp, default]")?;
        }
        writeln!(f)?;
        let brands: Vec<String> = ftyp.compatible_brands.iter().map(|b| b.to_string()).collect();
        writeln!(f, "  compatible: {}", brands.join(", "))?;

        for mdat in &self.file.media_data {
            writeln!(
                f,
                "Media data at {:#x}: payload {:#x}, {} bytes{}",
                mdat.start,
                mdat.payload_start,
                mdat.payload_len,
                if mdat.large_size { " (64-bit size)" } else { "" },
            )?;
        }

        match &self.file.movie_header {
            Some(mvhd) => self.movie(f, mvhd)?,
            None => writeln!(f, "No movie header")?,
        }

        for (i, track) in self.file.tracks.iter().enumerate() {
            self.track(f, i, track)?;
        }
        Ok(())
    }
}
