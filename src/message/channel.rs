#![doc = r#"
Channel voice messages: the musical bulk of any MIDI file.

A channel voice status byte carries the message type in its high nibble
and the channel in its low nibble. The payload is one or two data bytes,
each restricted to 7 bits.
"#]

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{
    ParseError,
    reader::{ReadResult, Reader},
};

#[doc = r#"
A 7-bit data byte.

Every payload byte of a channel voice message is one of these; the
high bit is reserved for status bytes.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DataByte(pub(crate) u8);

impl DataByte {
    /// Create a data byte, checking that the high bit is clear.
    pub const fn new(byte: u8) -> Result<Self, ParseError> {
        if byte > 0x7F {
            return Err(ParseError::InvalidDataByte(byte));
        }
        Ok(Self(byte))
    }

    /// Create a data byte by masking the high bit away.
    pub const fn masked(byte: u8) -> Self {
        Self(byte & 0x7F)
    }

    /// The raw 7-bit value.
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for DataByte {
    type Error = ParseError;
    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Self::new(byte)
    }
}

/// One of the sixteen MIDI channels.
///
/// `Channel::One` is the wire value 0.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TryFromPrimitive, IntoPrimitive,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Channel {
    /// Channel 1 (wire value 0).
    One,
    /// Channel 2.
    Two,
    /// Channel 3.
    Three,
    /// Channel 4.
    Four,
    /// Channel 5.
    Five,
    /// Channel 6.
    Six,
    /// Channel 7.
    Seven,
    /// Channel 8.
    Eight,
    /// Channel 9.
    Nine,
    /// Channel 10, conventionally percussion.
    Ten,
    /// Channel 11.
    Eleven,
    /// Channel 12.
    Twelve,
    /// Channel 13.
    Thirteen,
    /// Channel 14.
    Fourteen,
    /// Channel 15.
    Fifteen,
    /// Channel 16 (wire value 15).
    Sixteen,
}

impl Channel {
    /// The channel named by a status byte: its low nibble, unshifted.
    pub const fn from_status(status: u8) -> Self {
        Self::from_nibble(status & 0x0F)
    }

    /// Build a channel from a value already known to fit in 4 bits.
    pub(crate) const fn from_nibble(nibble: u8) -> Self {
        use Channel::*;
        match nibble & 0x0F {
            0 => One,
            1 => Two,
            2 => Three,
            3 => Four,
            4 => Five,
            5 => Six,
            6 => Seven,
            7 => Eight,
            8 => Nine,
            9 => Ten,
            10 => Eleven,
            11 => Twelve,
            12 => Thirteen,
            13 => Fourteen,
            14 => Fifteen,
            _ => Sixteen,
        }
    }

    /// The wire value, 0 through 15.
    pub const fn value(&self) -> u8 {
        *self as u8
    }
}

#[doc = r#"
A channel voice message: a channel plus the event that fired on it.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelVoiceMessage {
    channel: Channel,
    event: VoiceEvent,
}

impl ChannelVoiceMessage {
    /// Create a new channel voice message.
    pub const fn new(channel: Channel, event: VoiceEvent) -> Self {
        Self { channel, event }
    }

    /// Decode the data bytes of a voice message whose status byte (or
    /// running status) has already been resolved.
    ///
    /// Data bytes are masked to 7 bits.
    pub(crate) fn read(status: u8, reader: &mut Reader<'_>) -> ReadResult<Self> {
        let channel = Channel::from_status(status);
        let mut data = || -> ReadResult<DataByte> { Ok(DataByte::masked(reader.read_byte()?)) };
        let event = match status >> 4 {
            0x8 => VoiceEvent::NoteOff {
                key: data()?,
                velocity: data()?,
            },
            0x9 => VoiceEvent::NoteOn {
                key: data()?,
                velocity: data()?,
            },
            0xA => VoiceEvent::PolyphonicKeyPressure {
                key: data()?,
                pressure: data()?,
            },
            0xB => VoiceEvent::ControlChange {
                controller: data()?,
                value: data()?,
            },
            0xC => VoiceEvent::ProgramChange { program: data()? },
            0xD => VoiceEvent::ChannelPressure { pressure: data()? },
            _ => VoiceEvent::PitchBend(PitchBend::new(data()?, data()?)),
        };
        Ok(Self { channel, event })
    }

    /// The channel this message fired on.
    pub const fn channel(&self) -> Channel {
        self.channel
    }

    /// The event payload.
    pub const fn event(&self) -> &VoiceEvent {
        &self.event
    }
}

/// The set of channel voice events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VoiceEvent {
    /// Stop sounding a key.
    NoteOff {
        /// The key to release.
        key: DataByte,
        /// The release velocity.
        velocity: DataByte,
    },
    /// Start sounding a key.
    ///
    /// A note-on with velocity 0 is conventionally a note-off.
    NoteOn {
        /// The key to press.
        key: DataByte,
        /// How hard it was pressed.
        velocity: DataByte,
    },
    /// Change the pressure on a single held key.
    PolyphonicKeyPressure {
        /// The held key.
        key: DataByte,
        /// The new pressure.
        pressure: DataByte,
    },
    /// Change a controller's value.
    ControlChange {
        /// The controller number.
        controller: DataByte,
        /// The new value.
        value: DataByte,
    },
    /// Select a new program (instrument) for the channel.
    ProgramChange {
        /// The program number.
        program: DataByte,
    },
    /// Change the pressure on the whole channel at once.
    ChannelPressure {
        /// The new pressure.
        pressure: DataByte,
    },
    /// Bend the channel's pitch.
    PitchBend(PitchBend),
}

/// A 14-bit pitch bend value.
///
/// `0x2000` is the center (no bend); `0x0000` is full bend down and
/// `0x3FFF` full bend up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PitchBend(u16);

impl PitchBend {
    /// The no-bend center value.
    pub const CENTER: Self = Self(0x2000);

    /// Combine the two data bytes of a pitch bend message.
    ///
    /// The least significant byte comes first on the wire, unlike every
    /// other multi-byte value in the format.
    pub const fn new(lsb: DataByte, msb: DataByte) -> Self {
        Self(((msb.0 as u16) << 7) | lsb.0 as u16)
    }

    /// The raw value, 0 through 0x3FFF.
    pub const fn value(&self) -> u16 {
        self.0
    }

    /// The bend relative to center, -0x2000 through 0x1FFF.
    pub const fn as_signed(&self) -> i16 {
        self.0 as i16 - 0x2000
    }
}
