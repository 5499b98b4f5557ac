use crate::{
    file::{SmpteOffset, TrackChunk},
    message::{MetaMessage, Tempo, TrackEvent, TrackMessage},
    reader::ReadResult,
};

#[doc = r#"
One decoded track: its events in order, plus the per-track facts the
events establish (tempo, name, SMPTE offset).
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Track {
    events: Vec<TrackEvent>,
    info: TrackInfo,
}

impl Track {
    /// Build a track from decoded events, deriving its [`TrackInfo`].
    pub fn new(events: Vec<TrackEvent>) -> Self {
        let mut info = TrackInfo::default();
        for event in &events {
            let TrackMessage::Meta(meta) = event.message() else {
                continue;
            };
            match meta {
                MetaMessage::Tempo(tempo) if !info.saw_tempo => {
                    info.tempo = *tempo;
                    info.saw_tempo = true;
                }
                MetaMessage::SmpteOffset(offset) if info.smpte_offset.is_none() => {
                    info.smpte_offset = Some(*offset);
                }
                MetaMessage::TrackName(name) if info.name.is_none() => {
                    info.name = Some(name.clone());
                }
                _ => {}
            }
        }
        Self { events, info }
    }

    /// Decode every event of a track chunk into a track.
    pub fn from_chunk(chunk: &TrackChunk<'_>) -> ReadResult<Self> {
        let mut events = Vec::with_capacity(chunk.len() / 3);
        for event in chunk.events() {
            events.push(event?);
        }
        Ok(Self::new(events))
    }

    /// The events, in file order.
    pub fn events(&self) -> &[TrackEvent] {
        &self.events
    }

    /// Per-track facts derived from meta events.
    pub const fn info(&self) -> &TrackInfo {
        &self.info
    }

    /// The events paired with their absolute tick: the running sum of
    /// every delta-time up to and including each event's own.
    pub fn events_with_ticks(&self) -> impl Iterator<Item = (u32, &TrackEvent)> {
        self.events.iter().scan(0u32, |ticks, event| {
            *ticks = ticks.saturating_add(event.delta_ticks());
            Some((*ticks, event))
        })
    }

    pub(crate) fn into_events(self) -> Vec<TrackEvent> {
        self.events
    }
}

/// Facts about a track gathered from its meta events.
///
/// The first occurrence of each wins; a track with no tempo event
/// reports the format's default 120 BPM.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackInfo {
    pub(crate) tempo: Tempo,
    pub(crate) saw_tempo: bool,
    pub(crate) smpte_offset: Option<SmpteOffset>,
    pub(crate) name: Option<String>,
}

impl TrackInfo {
    /// The track's tempo.
    pub const fn tempo(&self) -> Tempo {
        self.tempo
    }

    /// The track's SMPTE offset, if it declared one.
    pub const fn smpte_offset(&self) -> Option<&SmpteOffset> {
        self.smpte_offset.as_ref()
    }

    /// The track's name, if it declared one.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl Default for TrackInfo {
    fn default() -> Self {
        Self {
            tempo: Tempo::DEFAULT,
            saw_tempo: false,
            smpte_offset: None,
            name: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{Channel, ChannelVoiceMessage, DataByte, VoiceEvent};
    use pretty_assertions::assert_eq;

    fn note_on(delta: u32, key: u8) -> TrackEvent {
        TrackEvent::new(
            delta,
            TrackMessage::ChannelVoice(ChannelVoiceMessage::new(
                Channel::One,
                VoiceEvent::NoteOn {
                    key: DataByte::masked(key),
                    velocity: DataByte::masked(0x40),
                },
            )),
        )
    }

    #[test]
    fn info_takes_first_tempo_and_name() {
        let events = vec![
            TrackEvent::new(0, TrackMessage::Meta(MetaMessage::TrackName("lead".into()))),
            TrackEvent::new(0, TrackMessage::Meta(MetaMessage::Tempo(Tempo::new(600_000)))),
            TrackEvent::new(0, TrackMessage::Meta(MetaMessage::Tempo(Tempo::new(400_000)))),
        ];
        let track = Track::new(events);
        assert_eq!(track.info().tempo(), Tempo::new(600_000));
        assert_eq!(track.info().name(), Some("lead"));
    }

    #[test]
    fn default_tempo_is_120_bpm() {
        let track = Track::new(vec![note_on(0, 60)]);
        assert_eq!(track.info().tempo().micros_per_quarter_note(), 500_000);
    }

    #[test]
    fn accumulated_ticks_are_a_running_sum() {
        let track = Track::new(vec![note_on(0, 60), note_on(96, 62), note_on(32, 64)]);
        let ticks: Vec<u32> = track.events_with_ticks().map(|(t, _)| t).collect();
        assert_eq!(ticks, vec![0, 96, 128]);
    }
}
