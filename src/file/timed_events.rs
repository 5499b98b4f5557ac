use crate::{
    file::{FormatType, MidiFile, Timing, Track},
    message::{Tempo, TrackMessage},
};

/// A track message annotated with its absolute time in microseconds.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimedEvent {
    micros: u64,
    message: TrackMessage,
}

impl TimedEvent {
    /// Microseconds from the start of the sequence.
    pub const fn micros(&self) -> u64 {
        self.micros
    }

    /// The message itself.
    pub const fn message(&self) -> &TrackMessage {
        &self.message
    }
}

/// An iterator returned by [`MidiFile::into_timed_events`].
///
/// Walks every track in file order, converting each event's accumulated
/// ticks into microseconds. For simultaneous-track files the first
/// track's tempo governs all of them; for sequentially independent
/// files each track keeps its own.
pub struct TimedEventIter {
    timing: Timing,
    file_tempo: Option<Tempo>,
    tracks: std::vec::IntoIter<Track>,
    current: Option<CurrentTrack>,
}

impl TimedEventIter {
    pub(crate) fn new(file: MidiFile) -> Self {
        let timing = file.header().timing();
        let file_tempo = match file.header().format_type() {
            // Conductor track: tempo lives in the first track.
            FormatType::Simultaneous | FormatType::SingleMultiChannel => {
                file.tracks().first().map(|t| t.info().tempo())
            }
            FormatType::SequentiallyIndependent => None,
        };
        let mut tracks = file.into_tracks().into_iter();
        let current = tracks.next().map(|t| CurrentTrack::new(t, file_tempo, timing));
        Self {
            timing,
            file_tempo,
            tracks,
            current,
        }
    }
}

impl Iterator for TimedEventIter {
    type Item = TimedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let current = self.current.as_mut()?;
            if let Some(event) = current.next() {
                return Some(event);
            }
            self.current = self
                .tracks
                .next()
                .map(|t| CurrentTrack::new(t, self.file_tempo, self.timing));
        }
    }
}

struct CurrentTrack {
    micros_per_tick: f64,
    offset_micros: f64,
    accumulated_ticks: u64,
    events: std::vec::IntoIter<crate::message::TrackEvent>,
}

impl CurrentTrack {
    fn new(track: Track, file_tempo: Option<Tempo>, timing: Timing) -> Self {
        let tempo = file_tempo.unwrap_or(track.info().tempo());

        let (micros_per_tick, offset_micros) = match timing {
            Timing::Smpte(smpte) => {
                let ticks_per_second =
                    u32::from(smpte.fps().as_division()) * u32::from(smpte.ticks_per_frame());
                let micros_per_tick = 1_000_000. / f64::from(ticks_per_second);

                // The file's frame rate overrides the offset's own.
                let offset_micros = track
                    .info()
                    .smpte_offset()
                    .map(|offset| {
                        #[cfg(feature = "tracing")]
                        if offset.fps != smpte.fps() {
                            tracing::warn!(
                                "track smpte offset fps ({}) disagrees with the file's ({}); \
                                 using the file's",
                                offset.fps.as_f64(),
                                smpte.fps().as_f64(),
                            );
                        }
                        offset.as_micros_with_override(smpte.fps())
                    })
                    .unwrap_or(0.);

                (micros_per_tick, offset_micros)
            }
            Timing::TicksPerQuarterNote(tpqn) => {
                let micros_per_tick =
                    f64::from(tempo.micros_per_quarter_note()) / f64::from(tpqn.get());
                let offset_micros = track
                    .info()
                    .smpte_offset()
                    .map(|offset| offset.as_micros())
                    .unwrap_or(0.);
                (micros_per_tick, offset_micros)
            }
        };

        Self {
            micros_per_tick,
            offset_micros,
            accumulated_ticks: 0,
            events: track.into_events().into_iter(),
        }
    }
}

impl Iterator for CurrentTrack {
    type Item = TimedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let event = self.events.next()?;
        self.accumulated_ticks += u64::from(event.delta_ticks());
        let micros =
            (self.micros_per_tick * self.accumulated_ticks as f64 + self.offset_micros) as u64;
        Some(TimedEvent {
            micros,
            message: event.into_message(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        file::{Header, SmpteFps},
        message::{
            Channel, ChannelVoiceMessage, DataByte, MetaMessage, TrackEvent, VoiceEvent,
        },
    };
    use pretty_assertions::assert_eq;

    fn note_on(delta: u32, key: u8, channel: Channel) -> TrackEvent {
        TrackEvent::new(
            delta,
            TrackMessage::ChannelVoice(ChannelVoiceMessage::new(
                channel,
                VoiceEvent::NoteOn {
                    key: DataByte::masked(key),
                    velocity: DataByte::masked(100),
                },
            )),
        )
    }

    fn tempo_event(delta: u32, micros_per_quarter: u32) -> TrackEvent {
        TrackEvent::new(
            delta,
            TrackMessage::Meta(MetaMessage::Tempo(Tempo::new(micros_per_quarter))),
        )
    }

    fn file(format_type: FormatType, timing: Timing, tracks: Vec<Track>) -> MidiFile {
        MidiFile::from_parts(
            Header::new(format_type, tracks.len() as u16, timing),
            tracks,
        )
    }

    #[test]
    fn empty_file_yields_nothing() {
        let file = file(
            FormatType::Simultaneous,
            Timing::new_ticks_per_quarter_note(480),
            vec![],
        );
        assert_eq!(file.into_timed_events().next(), None);
    }

    #[test]
    fn ticks_scale_by_tempo() {
        let track = Track::new(vec![
            tempo_event(0, 500_000),
            note_on(0, 60, Channel::One),
            note_on(480, 60, Channel::One),
            note_on(240, 62, Channel::One),
        ]);
        let file = file(
            FormatType::SingleMultiChannel,
            Timing::new_ticks_per_quarter_note(480),
            vec![track],
        );
        let times: Vec<u64> = file.into_timed_events().map(|e| e.micros()).collect();
        assert_eq!(times, vec![0, 0, 500_000, 750_000]);
    }

    #[test]
    fn first_track_tempo_governs_simultaneous_files() {
        let conductor = Track::new(vec![tempo_event(0, 600_000), note_on(0, 60, Channel::One)]);
        let follower = Track::new(vec![
            tempo_event(0, 400_000),
            note_on(480, 48, Channel::Two),
        ]);
        let file = file(
            FormatType::Simultaneous,
            Timing::new_ticks_per_quarter_note(480),
            vec![conductor, follower],
        );
        let times: Vec<u64> = file.into_timed_events().map(|e| e.micros()).collect();
        // the follower's own 400_000 tempo is overridden by the conductor's
        assert_eq!(times, vec![0, 0, 0, 600_000]);
    }

    #[test]
    fn independent_tracks_keep_their_own_tempo() {
        let first = Track::new(vec![tempo_event(0, 1_000_000), note_on(960, 60, Channel::One)]);
        let second = Track::new(vec![tempo_event(0, 500_000), note_on(480, 48, Channel::Two)]);
        let file = file(
            FormatType::SequentiallyIndependent,
            Timing::new_ticks_per_quarter_note(480),
            vec![first, second],
        );
        let times: Vec<u64> = file.into_timed_events().map(|e| e.micros()).collect();
        assert_eq!(times, vec![0, 2_000_000, 0, 500_000]);
    }

    #[test]
    fn smpte_timing_ignores_tempo() {
        let track = Track::new(vec![
            note_on(0, 60, Channel::One),
            note_on(1200, 60, Channel::One),
        ]);
        let file = file(
            FormatType::SingleMultiChannel,
            Timing::new_smpte(SmpteFps::Thirty, DataByte::masked(40)),
            vec![track],
        );
        // 30 fps x 40 ticks per frame = 1200 ticks per second
        let times: Vec<u64> = file.into_timed_events().map(|e| e.micros()).collect();
        assert_eq!(times, vec![0, 1_000_000]);
    }

    #[test]
    fn empty_tracks_are_skipped() {
        let first = Track::new(vec![note_on(0, 60, Channel::One)]);
        let empty = Track::new(vec![]);
        let last = Track::new(vec![note_on(0, 48, Channel::Three)]);
        let file = file(
            FormatType::Simultaneous,
            Timing::new_ticks_per_quarter_note(480),
            vec![first, empty, last],
        );
        let events: Vec<TimedEvent> = file.into_timed_events().collect();
        assert_eq!(events.len(), 2);
        let TrackMessage::ChannelVoice(cv) = events[1].message() else {
            panic!("expected channel voice");
        };
        assert_eq!(cv.channel(), Channel::Three);
    }
}
