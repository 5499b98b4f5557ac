#![doc = r#"
The assembled representation of a MIDI file.

[`MidiFile::parse`] drives the reader over a byte buffer: one header
chunk (which must come first, carrying the `MThd` tag), then chunks
until the header's declared track count has been met. Chunks with tags
other than `MTrk` in between are vendor extensions and are skipped.

The result is an immutable snapshot — a header plus tracks of decoded
events — that borrows nothing, so decoding the same buffer twice yields
two equal values.
"#]

mod chunk;
pub use chunk::*;

mod header;
pub use header::*;

mod timing;
pub use timing::*;

mod meta;
pub use meta::*;

mod track;
pub use track::*;

mod timed_events;
pub use timed_events::*;

use crate::{
    FileError, HeaderError,
    reader::{Reader, ReaderError},
};

#[doc = r#"
A fully decoded MIDI file: the header and every track's events.
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MidiFile {
    header: Header,
    tracks: Vec<Track>,
}

impl MidiFile {
    /// Decode a complete MIDI file from a byte buffer.
    ///
    /// The first chunk must be a valid header; decoding then continues
    /// until as many track chunks as the header declares have been
    /// read. Unknown chunk tags between tracks are skipped. A failure
    /// inside a track reports that track's index and the byte offset
    /// where decoding stopped.
    pub fn parse(bytes: &[u8]) -> Result<Self, FileError> {
        let mut reader = Reader::from_byte_slice(bytes);

        let first = reader
            .read_chunk()?
            .ok_or_else(|| ReaderError::end_of_stream(0))?;
        if first.tag() != HEADER_TAG {
            return Err(ReaderError::parse(0, HeaderError::WrongTag(first.tag())).into());
        }
        let header = Header::read(&first)?;

        let mut tracks = Vec::with_capacity(usize::from(header.track_count()));
        while tracks.len() < usize::from(header.track_count()) {
            let chunk = reader
                .read_chunk()?
                .ok_or_else(|| ReaderError::end_of_stream(reader.buffer_position()))?;
            match chunk.tag() {
                TRACK_TAG => {
                    let index = tracks.len() as u16;
                    let track = TrackChunk::from_raw(chunk)
                        .and_then(|c| Track::from_chunk(&c))
                        .map_err(|source| FileError::Track { index, source })?;
                    tracks.push(track);
                }
                _ => {
                    // Vendor chunk between tracks; skip it.
                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        "skipping chunk \"{}\" ({} bytes)",
                        String::from_utf8_lossy(&chunk.tag()),
                        chunk.payload().len(),
                    );
                }
            }
        }

        Ok(Self { header, tracks })
    }

    /// Assemble a file from already-decoded parts.
    pub const fn from_parts(header: Header, tracks: Vec<Track>) -> Self {
        Self { header, tracks }
    }

    /// The file's header.
    pub const fn header(&self) -> &Header {
        &self.header
    }

    /// The decoded tracks, in file order.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Consume the file, keeping its tracks.
    pub fn into_tracks(self) -> Vec<Track> {
        self.tracks
    }

    /// Consume the file into events annotated with absolute
    /// microsecond timestamps.
    pub fn into_timed_events(self) -> TimedEventIter {
        TimedEventIter::new(self)
    }
}
