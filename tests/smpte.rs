use midikit::prelude::*;
use pretty_assertions::assert_eq;

/// Build a minimal single-track file with SMPTE division and an SMPTE
/// offset meta event at the head of the track.
fn smpte_file(
    fps: SmpteFps,
    ticks_per_frame: u8,
    hour: u8,
    minute: u8,
    second: u8,
    frame: u8,
    subframe: u8,
) -> Vec<u8> {
    let mut bytes = Vec::new();

    bytes.extend_from_slice(b"MThd");
    bytes.extend_from_slice(&6u32.to_be_bytes());
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x01]);
    let fps_byte = match fps {
        SmpteFps::TwentyFour => 0xE8, // -24 in two's complement
        SmpteFps::TwentyFive => 0xE7,
        SmpteFps::TwentyNine => 0xE3,
        SmpteFps::Thirty => 0xE2,
    };
    bytes.push(fps_byte);
    bytes.push(ticks_per_frame);

    let rate_bits: u8 = match fps {
        SmpteFps::TwentyFour => 0b00,
        SmpteFps::TwentyFive => 0b01,
        SmpteFps::TwentyNine => 0b10,
        SmpteFps::Thirty => 0b11,
    };
    let payload = [
        0x00,
        0xFF,
        0x54,
        0x05,
        (rate_bits << 5) | (hour & 0x1F),
        minute,
        second,
        frame,
        subframe,
        // one beat to give the track a body
        0x00,
        0x90,
        0x3C,
        0x64,
        0x60,
        0x80,
        0x3C,
        0x40,
        0x00,
        0xFF,
        0x2F,
        0x00,
    ];
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    bytes.extend_from_slice(&payload);
    bytes
}

#[test]
fn smpte_division_decodes_from_the_header() {
    let bytes = smpte_file(SmpteFps::TwentyFour, 40, 12, 30, 15, 18, 50);
    let file = MidiFile::parse(&bytes).unwrap();

    let Timing::Smpte(smpte) = file.header().timing() else {
        panic!("expected smpte timing");
    };
    assert_eq!(smpte.fps(), SmpteFps::TwentyFour);
    assert_eq!(smpte.ticks_per_frame(), 40);
    assert_eq!(file.header().timing().ticks_per_quarter_note(), None);
}

#[test]
fn smpte_offset_meta_event_decodes() {
    let bytes = smpte_file(SmpteFps::TwentyFour, 40, 12, 30, 15, 18, 50);
    let file = MidiFile::parse(&bytes).unwrap();

    let TrackMessage::Meta(MetaMessage::SmpteOffset(offset)) =
        file.tracks()[0].events()[0].message()
    else {
        panic!("expected smpte offset meta event");
    };
    assert_eq!(offset.fps, SmpteFps::TwentyFour);
    assert_eq!(offset.hour, 12);
    assert_eq!(offset.minute, 30);
    assert_eq!(offset.second, 15);
    assert_eq!(offset.frame, 18);
    assert_eq!(offset.subframe, 50);

    let expected = (12 * 3600 + 30 * 60 + 15) as f64 * 1_000_000.0
        + (18.0 / 24.0) * 1_000_000.0
        + (50.0 / 100.0 / 24.0) * 1_000_000.0;
    assert!((offset.as_micros() - expected).abs() < 0.01);

    assert_eq!(file.tracks()[0].info().smpte_offset(), Some(offset));
}

#[test]
fn smpte_offset_shifts_timed_events() {
    // 25 fps x 40 ticks per frame = 1000 ticks per second; offset 10s
    let bytes = smpte_file(SmpteFps::TwentyFive, 40, 0, 0, 10, 0, 0);
    let file = MidiFile::parse(&bytes).unwrap();

    let times: Vec<u64> = file.into_timed_events().map(|e| e.micros()).collect();
    // offset, note on at the offset, note off 96 ticks later
    assert_eq!(times[0], 10_000_000);
    assert_eq!(times[1], 10_000_000);
    assert_eq!(times[2], 10_096_000);
}

#[test]
fn out_of_range_offset_fields_abort_the_track() {
    // hour byte of 31 is past 23
    let bytes = smpte_file(SmpteFps::TwentyFour, 40, 31, 0, 0, 0, 0);
    let err = MidiFile::parse(&bytes).unwrap_err();
    assert_eq!(err.track_index(), Some(0));
    let FileError::Track { source, .. } = err else {
        panic!("expected track error");
    };
    assert_eq!(
        source.kind(),
        &ReaderErrorKind::Parse(SmpteError::Hour(31).into())
    );
}

#[test]
fn every_frame_rate_round_trips_through_the_header() {
    for (fps, division) in [
        (SmpteFps::TwentyFour, 24u8),
        (SmpteFps::TwentyFive, 25),
        (SmpteFps::TwentyNine, 30),
        (SmpteFps::Thirty, 30),
    ] {
        let bytes = smpte_file(fps, 80, 0, 0, 0, 0, 0);
        let file = MidiFile::parse(&bytes).unwrap();
        let Timing::Smpte(smpte) = file.header().timing() else {
            panic!("expected smpte timing");
        };
        assert_eq!(smpte.fps(), fps);
        assert_eq!(smpte.fps().as_division(), division);
    }
}
