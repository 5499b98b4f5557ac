#![doc = r#"
System exclusive, system common, and system real-time messages.

System exclusive data in a file is framed with a VLQ length, unlike on
a wire. A `0xF0` event opens (and usually, with a trailing `0xF7` byte,
closes) a sysex transmission; a `0xF7` event carries a continuation of
one that an earlier packet left open. The two are distinct kinds here.
"#]

use crate::{
    TrackError,
    message::channel::DataByte,
    reader::{ReadResult, Reader, ReaderError},
};

/// The opening packet of a system-exclusive transmission (status `0xF0`).
///
/// The payload excludes the `0xF0` itself but keeps any terminating
/// `0xF7` byte exactly as stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SystemExclusive {
    data: Vec<u8>,
}

impl SystemExclusive {
    /// Create a sysex message from its raw payload.
    pub const fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub(crate) fn read(reader: &mut Reader<'_>) -> ReadResult<Self> {
        Ok(Self::new(reader.read_vlq_bytes()?.to_vec()))
    }

    /// The raw payload bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// True if the payload carries its own `0xF7` terminator, meaning
    /// no continuation packet follows.
    pub fn is_terminated(&self) -> bool {
        self.data.last() == Some(&0xF7)
    }
}

/// A continuation or termination packet of a split system-exclusive
/// transmission (status `0xF7`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SysExContinuation {
    data: Vec<u8>,
}

impl SysExContinuation {
    /// Create a continuation packet from its raw payload.
    pub const fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub(crate) fn read(reader: &mut Reader<'_>) -> ReadResult<Self> {
        Ok(Self::new(reader.read_vlq_bytes()?.to_vec()))
    }

    /// The raw payload bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// System common messages (status `0xF1` through `0xF6`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SystemCommon {
    /// MIDI time code quarter frame (`0xF1`), one data byte.
    MtcQuarterFrame(DataByte),
    /// Song position pointer (`0xF2`), a 14-bit count of MIDI beats.
    SongPosition(SongPosition),
    /// Song select (`0xF3`), one data byte.
    SongSelect(DataByte),
    /// Tune request (`0xF6`), no payload.
    TuneRequest,
}

impl SystemCommon {
    /// Decode the payload of a system common message whose status byte
    /// has already been consumed.
    pub(crate) fn read(status: u8, reader: &mut Reader<'_>) -> ReadResult<Self> {
        let message = match status {
            0xF1 => Self::MtcQuarterFrame(DataByte::masked(reader.read_byte()?)),
            0xF2 => {
                let lsb = DataByte::masked(reader.read_byte()?);
                let msb = DataByte::masked(reader.read_byte()?);
                Self::SongPosition(SongPosition::new(lsb, msb))
            }
            0xF3 => Self::SongSelect(DataByte::masked(reader.read_byte()?)),
            0xF6 => Self::TuneRequest,
            _ => {
                return Err(ReaderError::parse(
                    reader.buffer_position(),
                    TrackError::UndefinedStatus(status),
                ));
            }
        };
        Ok(message)
    }
}

/// A 14-bit song position, counted in MIDI beats (sixteenth notes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SongPosition(u16);

impl SongPosition {
    /// Combine the two data bytes, least significant first.
    pub const fn new(lsb: DataByte, msb: DataByte) -> Self {
        Self(((msb.0 as u16) << 7) | lsb.0 as u16)
    }

    /// The position in MIDI beats.
    pub const fn beats(&self) -> u16 {
        self.0
    }
}

/// System real-time messages: single status bytes with no payload.
///
/// These may appear between any two events. They do not disturb running
/// status. `0xFF` never appears here — in a file it introduces a meta
/// event instead of a reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SystemRealtime {
    /// Timing clock (`0xF8`), 24 per quarter note.
    TimingClock,
    /// Start playback (`0xFA`).
    Start,
    /// Continue playback (`0xFB`).
    Continue,
    /// Stop playback (`0xFC`).
    Stop,
    /// Active sensing keep-alive (`0xFE`).
    ActiveSensing,
}

impl SystemRealtime {
    /// Classify a real-time status byte.
    pub(crate) fn from_status(status: u8, position: usize) -> ReadResult<Self> {
        let message = match status {
            0xF8 => Self::TimingClock,
            0xFA => Self::Start,
            0xFB => Self::Continue,
            0xFC => Self::Stop,
            0xFE => Self::ActiveSensing,
            _ => {
                return Err(ReaderError::parse(
                    position,
                    TrackError::UndefinedStatus(status),
                ));
            }
        };
        Ok(message)
    }
}
