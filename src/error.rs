use crate::boxes::FourCC;

/// Everything that can go wrong while decoding a box tree.
///
/// Offsets are absolute positions in the buffer handed to the parser.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("read of {needed} bytes at offset {offset} exceeds limit {limit}")]
    OutOfBounds {
        offset: usize,
        needed: usize,
        limit: usize,
    },
    #[error("truncated box header at offset {offset}: only {available} bytes left")]
    TruncatedHeader { offset: usize, available: usize },
    #[error("invalid box size {size} at offset {offset}")]
    InvalidSize { offset: usize, size: u64 },
    #[error("{len} trailing bytes at offset {offset} cannot form a box header")]
    TrailingBytes { offset: usize, len: usize },
    #[error("malformed {typ} box: {reason}")]
    MalformedBox { typ: FourCC, reason: String },
    #[error("unsupported {typ} version {version}")]
    UnsupportedVersion { typ: FourCC, version: u8 },
    #[error("timestamp value {value} is out of range")]
    InvalidTimestamp { value: u64 },
}

impl ParseError {
    pub(crate) fn malformed(typ: FourCC, reason: impl Into<String>) -> Self {
        ParseError::MalformedBox {
            typ,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ParseError>;
