#![doc = r#"
The outer chunk framing shared by everything in a MIDI file.

A chunk is a 4-character ASCII tag, a 32-bit big-endian payload length,
and the payload itself. The format defines two tags — `MThd` for the
single header chunk and `MTrk` for track chunks — but files may carry
proprietary chunks with other tags, which are skippable rather than
errors.
"#]

use crate::{
    TrackError,
    message::TrackEvents,
    reader::{ReadResult, Reader, ReaderError},
};

/// The header chunk tag, `MThd`.
pub const HEADER_TAG: [u8; 4] = *b"MThd";
/// The track chunk tag, `MTrk`.
pub const TRACK_TAG: [u8; 4] = *b"MTrk";

/// One chunk as framed on disk: tag, declared length, payload bytes.
///
/// Produced by [`Reader::read_chunk`]; the tag has not been interpreted
/// yet and the payload may be shorter than declared if the file ended
/// early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawChunk<'a> {
    tag: [u8; 4],
    declared_len: u32,
    payload: &'a [u8],
    payload_offset: usize,
}

impl<'a> RawChunk<'a> {
    pub(crate) const fn new(
        tag: [u8; 4],
        declared_len: u32,
        payload: &'a [u8],
        payload_offset: usize,
    ) -> Self {
        Self {
            tag,
            declared_len,
            payload,
            payload_offset,
        }
    }

    /// The 4-byte ASCII tag.
    pub const fn tag(&self) -> [u8; 4] {
        self.tag
    }

    /// The payload length the chunk declares.
    pub const fn declared_len(&self) -> u32 {
        self.declared_len
    }

    /// The payload bytes actually present.
    pub const fn payload(&self) -> &'a [u8] {
        self.payload
    }

    /// File offset of the first payload byte.
    pub const fn payload_offset(&self) -> usize {
        self.payload_offset
    }

    /// True when the file ended before the declared payload length.
    pub const fn is_truncated(&self) -> bool {
        self.payload.len() < self.declared_len as usize
    }

    /// A reader over the payload that reports file-absolute offsets.
    pub(crate) const fn payload_reader(&self) -> Reader<'a> {
        Reader::with_offset(self.payload, self.payload_offset)
    }
}

/// A validated track chunk, ready to have its events decoded.
#[derive(Debug, Clone, Copy)]
pub struct TrackChunk<'a> {
    payload: &'a [u8],
    payload_offset: usize,
}

impl<'a> TrackChunk<'a> {
    /// Accept a raw `MTrk` chunk, rejecting one whose payload the file
    /// cut short.
    pub fn from_raw(raw: RawChunk<'a>) -> ReadResult<Self> {
        if raw.is_truncated() {
            return Err(ReaderError::parse(
                raw.payload_offset + raw.payload.len(),
                TrackError::TruncatedChunk {
                    declared: raw.declared_len,
                    available: raw.payload.len(),
                },
            ));
        }
        Ok(Self {
            payload: raw.payload,
            payload_offset: raw.payload_offset,
        })
    }

    /// The payload length in bytes.
    pub const fn len(&self) -> usize {
        self.payload.len()
    }

    /// True for a track chunk with no events at all.
    pub const fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Iterate over the chunk's events.
    ///
    /// Each call starts over with a fresh running status.
    pub const fn events(&self) -> TrackEvents<'a> {
        TrackEvents::new(self.payload_reader())
    }

    const fn payload_reader(&self) -> Reader<'a> {
        Reader::with_offset(self.payload, self.payload_offset)
    }
}
