use thiserror::Error;

use crate::reader::ReaderError;

#[doc = r#"
Any way the bytes of a MIDI file can fail to mean what they claim to mean.

Parse errors are always wrapped in a [`ReaderError`](crate::reader::ReaderError)
so that the byte offset of the failure travels with them.
"#]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// A delta-time or length prefix ran past the four-byte limit
    /// the format allows (28 significant bits).
    #[error("malformed variable-length quantity (more than 4 bytes)")]
    MalformedVariableLengthQuantity,
    /// A byte expected to carry 7-bit data had its high bit set.
    #[error("data byte {0:#04x} has its high bit set")]
    InvalidDataByte(u8),
    /// The header chunk is missing or malformed.
    #[error(transparent)]
    Header(#[from] HeaderError),
    /// A track chunk or one of its events is malformed.
    #[error(transparent)]
    Track(#[from] TrackError),
    /// An SMPTE field is out of range.
    #[error(transparent)]
    Smpte(#[from] SmpteError),
}

/// Ways the header chunk can be invalid.
///
/// Any of these aborts the file load; no track chunks are read after a
/// header failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeaderError {
    /// The first chunk of the file did not carry the `MThd` tag.
    #[error("expected header tag \"MThd\", found \"{}\"", String::from_utf8_lossy(.0))]
    WrongTag([u8; 4]),
    /// The header payload is shorter than the six bytes it must hold.
    #[error("header chunk holds {0} bytes, expected at least 6")]
    TruncatedPayload(usize),
    /// The format field is not 0, 1 or 2.
    #[error("unknown format type {0}")]
    UnknownFormatType(u16),
    /// Format 0 promises a single track but the header declares more.
    #[error("single-track format declares {0} tracks")]
    SingleTrackFormatWithMultipleTracks(u16),
}

/// Ways a track chunk can be invalid.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrackError {
    /// The chunk declares more payload bytes than the stream holds.
    #[error("truncated track chunk: {available} of {declared} declared bytes present")]
    TruncatedChunk {
        /// Byte count from the chunk's length field.
        declared: u32,
        /// Bytes actually present before the stream ended.
        available: usize,
    },
    /// An event needed more bytes than the chunk's declared length allows.
    #[error("truncated track chunk: events overrun the declared length")]
    EventOverrun,
    /// A data byte appeared where a status byte was required and no
    /// running status was active to fall back on.
    #[error("data byte {0:#04x} with no active running status")]
    OrphanDataByte(u8),
    /// A status byte that the MIDI specification leaves undefined.
    #[error("status byte {0:#04x} is undefined")]
    UndefinedStatus(u8),
}

/// Ways SMPTE timing data can be out of range.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SmpteError {
    /// The header's frame-rate byte is not one of the four defined rates.
    #[error("header frame rate {0} is not one of -24, -25, -29, -30")]
    HeaderFrameRate(i8),
    /// An SMPTE offset payload was not exactly five bytes.
    #[error("smpte offset holds {0} bytes, expected 5")]
    Length(usize),
    /// The offset's frame-rate bits are out of range.
    #[error("frame rate bits {0} are out of range")]
    FrameRateBits(u8),
    /// Hours above 23.
    #[error("hour {0} out of range")]
    Hour(u8),
    /// Minutes above 59.
    #[error("minute {0} out of range")]
    Minute(u8),
    /// Seconds above 59.
    #[error("second {0} out of range")]
    Second(u8),
    /// Subframes above 99.
    #[error("subframe {0} out of range")]
    Subframe(u8),
}

/// An error produced while assembling a whole [`MidiFile`](crate::file::MidiFile).
///
/// Track-level failures carry the index of the offending track so a caller
/// driving the chunk API directly can decide to skip it instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FileError {
    /// A failure outside any particular track (header, chunk framing).
    #[error(transparent)]
    Read(#[from] ReaderError),
    /// A failure while decoding the events of one track.
    #[error("decoding track {index}: {source}")]
    Track {
        /// Zero-based index of the track chunk that failed.
        index: u16,
        /// The underlying read failure, positioned at the offending byte.
        source: ReaderError,
    },
}

impl FileError {
    /// The byte offset at which decoding stopped.
    pub const fn position(&self) -> usize {
        match self {
            Self::Read(e) => e.position(),
            Self::Track { source, .. } => source.position(),
        }
    }

    /// The index of the track being decoded when the failure occurred,
    /// if the failure happened inside a track.
    pub const fn track_index(&self) -> Option<u16> {
        match self {
            Self::Read(_) => None,
            Self::Track { index, .. } => Some(*index),
        }
    }
}

/// An error produced by [`FormatRegistry::load`](crate::registry::FormatRegistry::load).
#[derive(Debug, Error)]
pub enum LoadError {
    /// The path's extension has no registered decoder.
    #[error("no decoder registered for extension {0:?}")]
    UnsupportedFormat(String),
    /// The file could not be read from disk.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The bytes could not be decoded.
    #[error(transparent)]
    File(#[from] FileError),
}
