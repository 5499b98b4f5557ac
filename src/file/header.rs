use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{
    HeaderError,
    file::{RawChunk, Timing},
    reader::{ReadResult, ReaderError},
};

#[doc = r#"
The decoded header chunk: what kind of file this is, how many track
chunks to expect, and how to interpret delta-times.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Header {
    format_type: FormatType,
    track_count: u16,
    timing: Timing,
}

impl Header {
    /// Create a header.
    pub const fn new(format_type: FormatType, track_count: u16, timing: Timing) -> Self {
        Self {
            format_type,
            track_count,
            timing,
        }
    }

    /// Decode the header from a raw `MThd` chunk.
    ///
    /// The payload must hold at least six bytes: format, track count,
    /// and division, each big-endian 16-bit. A longer payload is
    /// allowed and the excess ignored, as later revisions of the format
    /// reserve the right to extend the header.
    pub(crate) fn read(raw: &RawChunk<'_>) -> ReadResult<Self> {
        if raw.payload().len() < 6 {
            return Err(ReaderError::parse(
                raw.payload_offset() + raw.payload().len(),
                HeaderError::TruncatedPayload(raw.payload().len()),
            ));
        }
        let mut reader = raw.payload_reader();
        let format_raw = reader.read_u16_be()?;
        let format_type = FormatType::try_from(format_raw).map_err(|_| {
            ReaderError::parse(reader.buffer_position(), HeaderError::UnknownFormatType(format_raw))
        })?;
        let track_count = reader.read_u16_be()?;
        if matches!(format_type, FormatType::SingleMultiChannel) && track_count > 1 {
            return Err(ReaderError::parse(
                reader.buffer_position(),
                HeaderError::SingleTrackFormatWithMultipleTracks(track_count),
            ));
        }
        let timing = Timing::read(&mut reader)?;
        Ok(Self {
            format_type,
            track_count,
            timing,
        })
    }

    /// The file's format type.
    pub const fn format_type(&self) -> FormatType {
        self.format_type
    }

    /// How many track chunks the header announces.
    pub const fn track_count(&self) -> u16 {
        self.track_count
    }

    /// How delta-times are to be interpreted.
    pub const fn timing(&self) -> Timing {
        self.timing
    }
}

/// The three file layouts the format defines.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum FormatType {
    /// Format 0: one track carrying every channel.
    SingleMultiChannel = 0,
    /// Format 1: several tracks played simultaneously, the first of
    /// which conventionally carries the tempo map.
    Simultaneous = 1,
    /// Format 2: several independent single-track sequences.
    SequentiallyIndependent = 2,
}
