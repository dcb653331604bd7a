pub mod boxes;
pub mod cursor;
pub mod decoders;
pub mod error;
pub mod fixed;
pub mod known_boxes;
pub mod parser;
pub mod report;
pub mod timestamp;
pub mod util;
pub mod video;

pub use boxes::{BoxHeader, BoxRef, BoxSize, Boxes, FourCC, NodeKind, boxes};
pub use cursor::ByteCursor;
pub use decoders::{
    BoxDecoder, ChunkOffsetTable, FileTypeBox, HandlerBox, MediaHeaderBox, MovieHeaderBox,
    OffsetWidth, TrackHeaderBox, decode_box, decode_co64, decode_ftyp, decode_hdlr, decode_mdhd,
    decode_mvhd, decode_stco, decode_tkhd,
};
pub use error::{ParseError, Result};
pub use fixed::{Fixed8_8, Fixed16_16, Matrix, UFixed16_16};
pub use parser::{BoxWalker, read_box_header, walk};
pub use report::Report;
pub use video::{MediaData, Track, VideoFile, parse};
