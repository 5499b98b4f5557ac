#![doc = r#"
Meta events: non-sounding bookkeeping carried in track chunks.

A meta event is framed as `0xFF <type> <vlq length> <payload>`. Types
this module does not recognize are preserved as [`MetaMessage::Unknown`]
rather than rejected — real-world files carry vendor-specific meta
events freely. A recognized type whose payload is too short to hold its
fields is preserved the same way.
"#]

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{
    file::SmpteOffset,
    message::channel::{Channel, DataByte},
    reader::{ReadResult, Reader, ReaderError},
};

/// The meta event types defined by the SMF specification.
///
/// This is the label table for [`MetaMessage`]: the discriminant is the
/// wire type byte.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MetaKind {
    /// Sequence number (0x00).
    SequenceNumber = 0x00,
    /// Free text (0x01).
    Text = 0x01,
    /// Copyright notice (0x02).
    Copyright = 0x02,
    /// Track name (0x03).
    TrackName = 0x03,
    /// Instrument name (0x04).
    InstrumentName = 0x04,
    /// Lyric fragment (0x05).
    Lyric = 0x05,
    /// Marker text (0x06).
    Marker = 0x06,
    /// Cue point text (0x07).
    CuePoint = 0x07,
    /// Program name (0x08).
    ProgramName = 0x08,
    /// Device name (0x09).
    DeviceName = 0x09,
    /// Channel prefix for following events (0x20).
    ChannelPrefix = 0x20,
    /// Output port (0x21).
    Port = 0x21,
    /// End of track (0x2F).
    EndOfTrack = 0x2F,
    /// Tempo in microseconds per quarter note (0x51).
    Tempo = 0x51,
    /// SMPTE start offset for the track (0x54).
    SmpteOffset = 0x54,
    /// Time signature (0x58).
    TimeSignature = 0x58,
    /// Key signature (0x59).
    KeySignature = 0x59,
    /// Sequencer-specific data (0x7F).
    SequencerSpecific = 0x7F,
}

impl MetaKind {
    /// A human-readable name for the kind.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::SequenceNumber => "sequence number",
            Self::Text => "text",
            Self::Copyright => "copyright",
            Self::TrackName => "track name",
            Self::InstrumentName => "instrument name",
            Self::Lyric => "lyric",
            Self::Marker => "marker",
            Self::CuePoint => "cue point",
            Self::ProgramName => "program name",
            Self::DeviceName => "device name",
            Self::ChannelPrefix => "channel prefix",
            Self::Port => "port",
            Self::EndOfTrack => "end of track",
            Self::Tempo => "tempo",
            Self::SmpteOffset => "smpte offset",
            Self::TimeSignature => "time signature",
            Self::KeySignature => "key signature",
            Self::SequencerSpecific => "sequencer specific",
        }
    }
}

/// The set of decoded meta events.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MetaMessage {
    /// Identifies the sequence; `None` when the payload is empty, in
    /// which case the track's position in the file is the number.
    SequenceNumber(Option<u16>),
    /// Free text.
    Text(String),
    /// A copyright notice.
    Copyright(String),
    /// The track's name.
    TrackName(String),
    /// The instrument's name.
    InstrumentName(String),
    /// A lyric fragment.
    Lyric(String),
    /// A marker in the sequence.
    Marker(String),
    /// A cue point.
    CuePoint(String),
    /// The program's name.
    ProgramName(String),
    /// The intended output device.
    DeviceName(String),
    /// The channel that following events without one belong to.
    ChannelPrefix(Channel),
    /// The intended output port.
    Port(DataByte),
    /// Marks the end of the track's events.
    EndOfTrack,
    /// The tempo from this point on.
    Tempo(Tempo),
    /// Where in absolute SMPTE time the track starts.
    SmpteOffset(SmpteOffset),
    /// Numerator, denominator power of two, MIDI clocks per metronome
    /// click, and 32nd notes per quarter.
    TimeSignature {
        /// Beats per bar.
        numerator: u8,
        /// Power of two giving the beat unit (2 means quarter notes).
        denominator: u8,
        /// MIDI clocks per metronome click.
        clocks_per_click: u8,
        /// Notated 32nd notes per MIDI quarter note.
        thirty_seconds_per_quarter: u8,
    },
    /// Sharps (positive) or flats (negative), and whether the key is minor.
    KeySignature {
        /// Count of sharps, or of flats when negative.
        sharps: i8,
        /// True for a minor key.
        minor: bool,
    },
    /// Data meant only for the producing sequencer.
    SequencerSpecific(Vec<u8>),
    /// A meta event this library does not recognize, kept verbatim.
    Unknown {
        /// The raw type byte.
        kind: u8,
        /// The raw payload.
        data: Vec<u8>,
    },
}

fn text(data: &[u8]) -> String {
    String::from_utf8_lossy(data).into_owned()
}

impl MetaMessage {
    /// Decode a meta event. The `0xFF` status byte has already been
    /// consumed; the reader is at the type byte.
    pub(crate) fn read(reader: &mut Reader<'_>) -> ReadResult<Self> {
        let type_byte = reader.read_byte()?;
        let data = reader.read_vlq_bytes()?;
        let position = reader.buffer_position();
        Self::classify(type_byte, data, position)
    }

    fn classify(type_byte: u8, data: &[u8], position: usize) -> ReadResult<Self> {
        let message = match MetaKind::try_from(type_byte) {
            Ok(MetaKind::SequenceNumber) => Self::SequenceNumber(if data.len() >= 2 {
                Some(u16::from_be_bytes([data[0], data[1]]))
            } else {
                None
            }),
            Ok(MetaKind::Text) => Self::Text(text(data)),
            Ok(MetaKind::Copyright) => Self::Copyright(text(data)),
            Ok(MetaKind::TrackName) => Self::TrackName(text(data)),
            Ok(MetaKind::InstrumentName) => Self::InstrumentName(text(data)),
            Ok(MetaKind::Lyric) => Self::Lyric(text(data)),
            Ok(MetaKind::Marker) => Self::Marker(text(data)),
            Ok(MetaKind::CuePoint) => Self::CuePoint(text(data)),
            Ok(MetaKind::ProgramName) => Self::ProgramName(text(data)),
            Ok(MetaKind::DeviceName) => Self::DeviceName(text(data)),
            Ok(MetaKind::ChannelPrefix) if !data.is_empty() && data[0] < 16 => {
                Self::ChannelPrefix(Channel::from_nibble(data[0]))
            }
            Ok(MetaKind::Port) if !data.is_empty() => Self::Port(DataByte::masked(data[0])),
            Ok(MetaKind::EndOfTrack) => Self::EndOfTrack,
            Ok(MetaKind::Tempo) if data.len() >= 3 => {
                Self::Tempo(Tempo::from_bytes([data[0], data[1], data[2]]))
            }
            Ok(MetaKind::SmpteOffset) if data.len() >= 5 => {
                let offset = SmpteOffset::parse(&data[..5])
                    .map_err(|e| ReaderError::parse(position, e))?;
                Self::SmpteOffset(offset)
            }
            Ok(MetaKind::TimeSignature) if data.len() >= 4 => Self::TimeSignature {
                numerator: data[0],
                denominator: data[1],
                clocks_per_click: data[2],
                thirty_seconds_per_quarter: data[3],
            },
            Ok(MetaKind::KeySignature) if data.len() >= 2 => Self::KeySignature {
                sharps: data[0] as i8,
                minor: data[1] != 0,
            },
            Ok(MetaKind::SequencerSpecific) => Self::SequencerSpecific(data.to_vec()),
            // Unrecognized type bytes, and recognized ones whose payload
            // is too short for their fields, survive verbatim.
            Ok(_) | Err(_) => Self::Unknown {
                kind: type_byte,
                data: data.to_vec(),
            },
        };
        Ok(message)
    }

    /// The kind of this message, or `None` for [`MetaMessage::Unknown`].
    pub const fn kind(&self) -> Option<MetaKind> {
        Some(match self {
            Self::SequenceNumber(_) => MetaKind::SequenceNumber,
            Self::Text(_) => MetaKind::Text,
            Self::Copyright(_) => MetaKind::Copyright,
            Self::TrackName(_) => MetaKind::TrackName,
            Self::InstrumentName(_) => MetaKind::InstrumentName,
            Self::Lyric(_) => MetaKind::Lyric,
            Self::Marker(_) => MetaKind::Marker,
            Self::CuePoint(_) => MetaKind::CuePoint,
            Self::ProgramName(_) => MetaKind::ProgramName,
            Self::DeviceName(_) => MetaKind::DeviceName,
            Self::ChannelPrefix(_) => MetaKind::ChannelPrefix,
            Self::Port(_) => MetaKind::Port,
            Self::EndOfTrack => MetaKind::EndOfTrack,
            Self::Tempo(_) => MetaKind::Tempo,
            Self::SmpteOffset(_) => MetaKind::SmpteOffset,
            Self::TimeSignature { .. } => MetaKind::TimeSignature,
            Self::KeySignature { .. } => MetaKind::KeySignature,
            Self::SequencerSpecific(_) => MetaKind::SequencerSpecific,
            Self::Unknown { .. } => return None,
        })
    }

    /// A human-readable name for this message's kind.
    pub const fn label(&self) -> &'static str {
        match self.kind() {
            Some(kind) => kind.label(),
            None => "unknown meta",
        }
    }
}

#[doc = r#"
A tempo, stored as microseconds per quarter note.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tempo(u32);

impl Tempo {
    /// 120 beats per minute, the tempo assumed until a tempo event arrives.
    pub const DEFAULT: Self = Self(500_000);

    /// Create a tempo from microseconds per quarter note.
    pub const fn new(micros_per_quarter_note: u32) -> Self {
        Self(micros_per_quarter_note)
    }

    /// Decode the 24-bit big-endian payload of a tempo meta event.
    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self(((bytes[0] as u32) << 16) | ((bytes[1] as u32) << 8) | bytes[2] as u32)
    }

    /// Microseconds per quarter note.
    pub const fn micros_per_quarter_note(&self) -> u32 {
        self.0
    }

    /// Quarter notes per minute.
    pub const fn beats_per_minute(&self) -> f64 {
        60_000_000.0 / self.0 as f64
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::Reader;
    use pretty_assertions::assert_eq;

    fn read_meta(bytes: &[u8]) -> MetaMessage {
        let mut reader = Reader::from_byte_slice(bytes);
        MetaMessage::read(&mut reader).unwrap()
    }

    #[test]
    fn track_name_decodes_as_text() {
        let msg = read_meta(b"\x03\x05Lead!");
        assert_eq!(msg, MetaMessage::TrackName("Lead!".into()));
        assert_eq!(msg.label(), "track name");
    }

    #[test]
    fn tempo_decodes_24_bit_payload() {
        let msg = read_meta(&[0x51, 0x03, 0x07, 0xA1, 0x20]);
        let MetaMessage::Tempo(tempo) = msg else {
            panic!("expected tempo");
        };
        assert_eq!(tempo.micros_per_quarter_note(), 500_000);
        assert_eq!(tempo.beats_per_minute(), 120.0);
    }

    #[test]
    fn unrecognized_type_is_preserved() {
        let msg = read_meta(&[0x0A, 0x03, 0xDE, 0xAD, 0x7F]);
        assert_eq!(
            msg,
            MetaMessage::Unknown {
                kind: 0x0A,
                data: vec![0xDE, 0xAD, 0x7F],
            }
        );
        assert_eq!(msg.kind(), None);
        assert_eq!(msg.label(), "unknown meta");
    }

    #[test]
    fn short_payload_for_known_type_is_preserved() {
        // tempo wants 3 bytes, gets 1
        let msg = read_meta(&[0x51, 0x01, 0x40]);
        assert_eq!(
            msg,
            MetaMessage::Unknown {
                kind: 0x51,
                data: vec![0x40],
            }
        );
    }

    #[test]
    fn end_of_track_has_empty_payload() {
        assert_eq!(read_meta(&[0x2F, 0x00]), MetaMessage::EndOfTrack);
    }

    #[test]
    fn key_signature_decodes_sharps_and_mode() {
        let msg = read_meta(&[0x59, 0x02, 0xFD, 0x01]);
        assert_eq!(
            msg,
            MetaMessage::KeySignature {
                sharps: -3,
                minor: true
            }
        );
    }
}
