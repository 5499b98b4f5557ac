#![doc = r#"
SMPTE offset: an absolute start time for a track.

When a track should begin somewhere other than time zero — scoring to
picture, broadcast cues — its first events include an SMPTE offset meta
event placing the track's origin at an absolute
hours:minutes:seconds:frames.subframes position.
"#]

use crate::{SmpteError, file::SmpteFps};

/// A track's starting position in SMPTE time code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmpteOffset {
    /// The frame rate the offset is expressed in. When the file itself
    /// uses SMPTE timing, the file's rate takes precedence over this one.
    pub fps: SmpteFps,
    /// Hours, 0-23.
    pub hour: u8,
    /// Minutes, 0-59.
    pub minute: u8,
    /// Seconds, 0-59.
    pub second: u8,
    /// Frame within the second; the valid range depends on `fps`.
    pub frame: u8,
    /// Hundredths of a frame, 0-99.
    pub subframe: u8,
}

impl SmpteOffset {
    /// Parse the 5-byte payload of an SMPTE offset meta event.
    ///
    /// The first byte packs the frame rate into bits 5-6 (`0rrhhhhh`)
    /// and the hours into the low five bits; minutes, seconds, frames
    /// and subframes follow one byte each.
    pub const fn parse(data: &[u8]) -> Result<Self, SmpteError> {
        if data.len() != 5 {
            return Err(SmpteError::Length(data.len()));
        }

        let fps = match data[0] >> 5 {
            0 => SmpteFps::TwentyFour,
            1 => SmpteFps::TwentyFive,
            2 => SmpteFps::TwentyNine,
            3 => SmpteFps::Thirty,
            bits => return Err(SmpteError::FrameRateBits(bits)),
        };
        let hour = data[0] & 0b0001_1111;
        if hour > 23 {
            return Err(SmpteError::Hour(hour));
        }
        let minute = data[1];
        if minute > 59 {
            return Err(SmpteError::Minute(minute));
        }
        let second = data[2];
        if second > 59 {
            return Err(SmpteError::Second(second));
        }
        let frame = data[3];
        let subframe = data[4];
        if subframe > 99 {
            return Err(SmpteError::Subframe(subframe));
        }
        Ok(Self {
            fps,
            hour,
            minute,
            second,
            frame,
            subframe,
        })
    }

    /// The offset in microseconds, using its own frame rate.
    pub const fn as_micros(&self) -> f64 {
        self.as_micros_with_override(self.fps)
    }

    /// The offset in microseconds, computed with a different frame rate.
    ///
    /// Used when the file's division names a rate that disagrees with
    /// the offset's own; the file's rate wins.
    pub const fn as_micros_with_override(&self, fps: SmpteFps) -> f64 {
        let whole_seconds = (self.hour as u64 * 3600 + self.minute as u64 * 60 + self.second as u64)
            * 1_000_000;
        whole_seconds as f64
            + (self.frame as u64 * 1_000_000) as f64 / fps.as_f64()
            + (self.subframe as u64 * 10_000) as f64 / fps.as_f64()
    }
}
