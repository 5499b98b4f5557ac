#![doc = r#"
The track event model: delta-times, status bytes, and running status.

Every event in a track chunk is a delta-time (a VLQ of ticks since the
previous event in the same track) followed by a message. The message's
status byte may be omitted: when the byte after the delta-time has its
high bit clear, the previous channel voice status is reused and the
byte is the first data byte of the new event. That carried-over status
is the *running status*; it is scoped to one track, set by channel
voice messages, cancelled by meta and sysex events, and untouched by
system real-time messages.
"#]

pub mod channel;
pub use channel::*;

mod meta;
pub use meta::*;

mod system;
pub use system::*;

use crate::{
    TrackError,
    reader::{ReadResult, Reader, ReaderError},
};

#[doc = r#"
One decoded track event: how long after the previous event it fires,
and what it is.
"#]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackEvent {
    delta_ticks: u32,
    message: TrackMessage,
}

impl TrackEvent {
    /// Create a track event.
    pub const fn new(delta_ticks: u32, message: TrackMessage) -> Self {
        Self {
            delta_ticks,
            message,
        }
    }

    /// Decode one event, updating `running_status`.
    pub(crate) fn read(
        reader: &mut Reader<'_>,
        running_status: &mut Option<u8>,
    ) -> ReadResult<Self> {
        let delta_ticks = reader.read_vlq()?;
        let message = TrackMessage::read(reader, running_status)?;
        Ok(Self {
            delta_ticks,
            message,
        })
    }

    /// Ticks since the previous event in the same track.
    pub const fn delta_ticks(&self) -> u32 {
        self.delta_ticks
    }

    /// The decoded message.
    pub const fn message(&self) -> &TrackMessage {
        &self.message
    }

    /// Consume the event, keeping only its message.
    pub fn into_message(self) -> TrackMessage {
        self.message
    }
}

/// Everything a track event can be.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrackMessage {
    /// A channel voice message.
    ChannelVoice(ChannelVoiceMessage),
    /// The opening packet of a system-exclusive transmission.
    SystemExclusive(SystemExclusive),
    /// A continuation of a split system-exclusive transmission.
    SysExContinuation(SysExContinuation),
    /// A system common message.
    SystemCommon(SystemCommon),
    /// A system real-time message.
    SystemRealtime(SystemRealtime),
    /// A meta event.
    Meta(MetaMessage),
}

impl TrackMessage {
    fn read(reader: &mut Reader<'_>, running_status: &mut Option<u8>) -> ReadResult<Self> {
        let cursor = reader.peek_byte()?;
        let status = if cursor & 0x80 != 0 {
            reader.read_byte()?;
            cursor
        } else {
            // Data byte in status position: reuse the running status and
            // leave the byte for the message payload.
            running_status.ok_or_else(|| {
                ReaderError::parse(reader.buffer_position(), TrackError::OrphanDataByte(cursor))
            })?
        };

        let message = match status {
            0x80..=0xEF => {
                *running_status = Some(status);
                Self::ChannelVoice(ChannelVoiceMessage::read(status, reader)?)
            }
            0xF0 => {
                *running_status = None;
                Self::SystemExclusive(SystemExclusive::read(reader)?)
            }
            0xF7 => {
                *running_status = None;
                Self::SysExContinuation(SysExContinuation::read(reader)?)
            }
            0xFF => {
                *running_status = None;
                Self::Meta(MetaMessage::read(reader)?)
            }
            0xF1..=0xF6 => {
                *running_status = None;
                Self::SystemCommon(SystemCommon::read(status, reader)?)
            }
            // 0xF8..=0xFE: real-time, transparent to running status.
            _ => Self::SystemRealtime(SystemRealtime::from_status(
                status,
                reader.buffer_position(),
            )?),
        };
        Ok(message)
    }
}

/// An iterator decoding the events of one track chunk's payload.
///
/// Yields events until the payload is exhausted. An event that needs
/// bytes past the end of the payload fails with a truncated-track
/// error rather than reading beyond the chunk's declared length.
#[derive(Debug, Clone)]
pub struct TrackEvents<'a> {
    reader: Reader<'a>,
    running_status: Option<u8>,
}

impl<'a> TrackEvents<'a> {
    pub(crate) const fn new(reader: Reader<'a>) -> Self {
        Self {
            reader,
            running_status: None,
        }
    }

    /// The current read offset, relative to the start of the file.
    pub const fn buffer_position(&self) -> usize {
        self.reader.buffer_position()
    }
}

impl Iterator for TrackEvents<'_> {
    type Item = ReadResult<TrackEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.reader.at_end() {
            return None;
        }
        Some(
            TrackEvent::read(&mut self.reader, &mut self.running_status)
                .map_err(|e| e.end_of_stream_as(TrackError::EventOverrun)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::Reader;
    use pretty_assertions::assert_eq;

    fn events_of(payload: &[u8]) -> Vec<ReadResult<TrackEvent>> {
        TrackEvents::new(Reader::from_byte_slice(payload)).collect()
    }

    #[test]
    fn running_status_carries_between_events() {
        // Second note-on omits its status byte.
        let payload = [
            0x00, 0x90, 0x3C, 0x40, //
            0x60, 0x3E, 0x50,
        ];
        let events: Vec<_> = events_of(&payload)
            .into_iter()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].delta_ticks(), 0);
        assert_eq!(events[1].delta_ticks(), 0x60);
        for (event, key) in events.iter().zip([0x3C, 0x3E]) {
            let TrackMessage::ChannelVoice(cv) = event.message() else {
                panic!("expected channel voice");
            };
            assert_eq!(cv.channel(), Channel::One);
            let VoiceEvent::NoteOn { key: k, .. } = cv.event() else {
                panic!("expected note on");
            };
            assert_eq!(k.value(), key);
        }
    }

    #[test]
    fn meta_event_cancels_running_status() {
        let payload = [
            0x00, 0x90, 0x3C, 0x40, // note on, sets running status
            0x00, 0xFF, 0x06, 0x02, b'h', b'i', // marker, cancels it
            0x00, 0x3C, 0x00, // would-be running status reuse
        ];
        let events = events_of(&payload);
        assert!(events[0].is_ok());
        assert!(events[1].is_ok());
        let err = events[2].as_ref().unwrap_err();
        assert_eq!(
            err.kind(),
            &crate::reader::ReaderErrorKind::Parse(TrackError::OrphanDataByte(0x3C).into())
        );
    }

    #[test]
    fn realtime_message_is_transparent_to_running_status() {
        let payload = [
            0x00, 0x90, 0x3C, 0x40, //
            0x00, 0xF8, // timing clock
            0x00, 0x3E, 0x50, // still note-on via running status
        ];
        let events: Vec<_> = events_of(&payload)
            .into_iter()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(
            events[1].message(),
            &TrackMessage::SystemRealtime(SystemRealtime::TimingClock)
        );
        assert!(matches!(
            events[2].message(),
            TrackMessage::ChannelVoice(_)
        ));
    }

    #[test]
    fn event_overrunning_payload_is_a_truncation_error() {
        // note-on with only one of its two data bytes present
        let payload = [0x00, 0x90, 0x3C];
        let events = events_of(&payload);
        let err = events[0].as_ref().unwrap_err();
        assert_eq!(
            err.kind(),
            &crate::reader::ReaderErrorKind::Parse(TrackError::EventOverrun.into())
        );
    }

    #[test]
    fn sysex_packets_decode_as_distinct_kinds() {
        let payload = [
            0x00, 0xF0, 0x03, 0x43, 0x12, 0x00, // opening packet, unterminated
            0x00, 0xF7, 0x02, 0x31, 0xF7, // continuation carrying the terminator
        ];
        let events: Vec<_> = events_of(&payload)
            .into_iter()
            .collect::<Result<_, _>>()
            .unwrap();
        let TrackMessage::SystemExclusive(sysex) = events[0].message() else {
            panic!("expected sysex");
        };
        assert_eq!(sysex.data(), &[0x43, 0x12, 0x00]);
        assert!(!sysex.is_terminated());
        let TrackMessage::SysExContinuation(rest) = events[1].message() else {
            panic!("expected continuation");
        };
        assert_eq!(rest.data(), &[0x31, 0xF7]);
    }
}
