#![doc = r#"
A tolerant reader for Standard MIDI Files.

`midikit` decodes `.mid`/`.midi` files into a structured, owned event
model. It is built from three layers, composed top-down when loading a
file:

- [`reader`] — forward-only big-endian primitive reads over a byte
  buffer, including the variable-length quantities MIDI uses for
  delta-times and lengths.
- [`file`] — the outer chunk framing (`MThd`/`MTrk`), the header, and
  the assembled [`MidiFile`](file::MidiFile).
- [`message`] — the events inside track chunks: channel voice messages
  with running-status handling, meta events, sysex, and the system
  common/real-time messages.

Unknown chunk tags and unrecognized meta event types are preserved, not
rejected; real-world files carry vendor extensions freely. Everything
that *is* malformed fails with an error naming the failure kind, the
byte offset, and (inside a track) the track index.

# Example

```no_run
use midikit::prelude::*;

let registry = FormatRegistry::with_standard_formats();
let file = registry.load("song.mid")?;
for (i, track) in file.tracks().iter().enumerate() {
    println!("track {i}: {} events", track.events().len());
}
# Ok::<(), midikit::LoadError>(())
```
"#]

mod error;
pub use error::*;

pub mod reader;

pub mod file;

pub mod message;

pub mod registry;

#[doc = r#"
Re-exports of the types most callers need.
"#]
pub mod prelude {
    pub use crate::{
        FileError, HeaderError, LoadError, ParseError, SmpteError, TrackError,
        file::{
            FormatType, Header, MidiFile, RawChunk, SmpteFps, SmpteOffset, SmpteTiming,
            TicksPerQuarterNote, TimedEvent, Timing, Track, TrackChunk, TrackInfo,
        },
        message::{
            Channel, ChannelVoiceMessage, DataByte, MetaKind, MetaMessage, PitchBend,
            SongPosition, SysExContinuation, SystemCommon, SystemExclusive, SystemRealtime,
            Tempo, TrackEvent, TrackEvents, TrackMessage, VoiceEvent,
        },
        reader::{ReadResult, Reader, ReaderError, ReaderErrorKind},
        registry::FormatRegistry,
    };
}
