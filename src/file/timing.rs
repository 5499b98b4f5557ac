use crate::{
    SmpteError,
    message::DataByte,
    reader::{ReadResult, Reader, ReaderError},
};

/// How a file's delta-time ticks are to be interpreted.
///
/// The header's division field picks one of two schemes: musical time
/// (ticks per quarter note, scaled by tempo events) when its high bit
/// is clear, or absolute SMPTE time (frames per second times ticks per
/// frame) when it is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Timing {
    /// Delta-times count fractions of a quarter note.
    TicksPerQuarterNote(TicksPerQuarterNote),
    /// Delta-times count fractions of an SMPTE frame.
    Smpte(SmpteTiming),
}

impl Timing {
    /// Create a musical-time division. The high bit is disregarded, so
    /// the effective range is 1 through 32767.
    pub const fn new_ticks_per_quarter_note(tpqn: u16) -> Self {
        Self::TicksPerQuarterNote(TicksPerQuarterNote(tpqn & 0x7FFF))
    }

    /// Create an SMPTE division.
    pub const fn new_smpte(fps: SmpteFps, ticks_per_frame: DataByte) -> Self {
        Self::Smpte(SmpteTiming {
            fps,
            ticks_per_frame,
        })
    }

    pub(crate) fn read(reader: &mut Reader<'_>) -> ReadResult<Self> {
        let bytes = reader.read_array::<2>()?;
        if bytes[0] & 0x80 == 0 {
            return Ok(Self::TicksPerQuarterNote(TicksPerQuarterNote(
                u16::from_be_bytes(bytes),
            )));
        }
        // Bits 14 through 8 hold one of -24, -25, -29, -30.
        let fps = match bytes[0] as i8 {
            -24 => SmpteFps::TwentyFour,
            -25 => SmpteFps::TwentyFive,
            -29 => SmpteFps::TwentyNine,
            -30 => SmpteFps::Thirty,
            other => {
                return Err(ReaderError::parse(
                    reader.buffer_position(),
                    SmpteError::HeaderFrameRate(other),
                ));
            }
        };
        Ok(Self::Smpte(SmpteTiming {
            fps,
            ticks_per_frame: DataByte::masked(bytes[1]),
        }))
    }

    /// Returns Some if the timing is musical (ticks per quarter note).
    pub const fn ticks_per_quarter_note(&self) -> Option<u16> {
        match self {
            Self::TicksPerQuarterNote(t) => Some(t.get()),
            Self::Smpte(_) => None,
        }
    }
}

/// A musical-time division: how many ticks make a quarter note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TicksPerQuarterNote(u16);

impl TicksPerQuarterNote {
    /// The tick count, with the reserved high bit cleared.
    pub const fn get(&self) -> u16 {
        self.0 & 0x7FFF
    }
}

/// An SMPTE division: frame rate and ticks per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmpteTiming {
    pub(crate) fps: SmpteFps,
    pub(crate) ticks_per_frame: DataByte,
}

impl SmpteTiming {
    /// The frames per second.
    pub const fn fps(&self) -> SmpteFps {
        self.fps
    }

    /// The ticks per frame.
    pub const fn ticks_per_frame(&self) -> u8 {
        self.ticks_per_frame.0
    }
}

/// The four SMPTE frame rates the MIDI specification admits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SmpteFps {
    /// 24 frames per second, the film standard.
    TwentyFour,
    /// 25 frames per second, PAL/SECAM.
    TwentyFive,
    /// 29.97 frames per second, NTSC drop-frame.
    TwentyNine,
    /// 30 frames per second, NTSC black & white.
    Thirty,
}

impl SmpteFps {
    /// The nominal integer rate used in division arithmetic.
    ///
    /// Drop-frame 29.97 counts as 30 here.
    pub const fn as_division(&self) -> u8 {
        match self {
            Self::TwentyFour => 24,
            Self::TwentyFive => 25,
            Self::TwentyNine | Self::Thirty => 30,
        }
    }

    /// The exact rate, fractional for drop-frame.
    pub const fn as_f64(&self) -> f64 {
        match self {
            Self::TwentyFour => 24.,
            Self::TwentyFive => 25.,
            Self::TwentyNine => DROP_FRAME,
            Self::Thirty => 30.,
        }
    }
}

/// NTSC color drop-frame rate: 29.97002997... fps.
const DROP_FRAME: f64 = 30_000. / 1001.;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::Reader;
    use pretty_assertions::assert_eq;

    #[test]
    fn division_with_clear_high_bit_is_musical() {
        let mut reader = Reader::from_byte_slice(&[0x01, 0xE0]);
        let timing = Timing::read(&mut reader).unwrap();
        assert_eq!(timing.ticks_per_quarter_note(), Some(480));
    }

    #[test]
    fn division_with_set_high_bit_is_smpte() {
        // -25 fps, 40 ticks per frame
        let mut reader = Reader::from_byte_slice(&[0xE7, 40]);
        let Timing::Smpte(smpte) = Timing::read(&mut reader).unwrap() else {
            panic!("expected smpte timing");
        };
        assert_eq!(smpte.fps(), SmpteFps::TwentyFive);
        assert_eq!(smpte.ticks_per_frame(), 40);
    }

    #[test]
    fn unknown_frame_rate_is_rejected() {
        let mut reader = Reader::from_byte_slice(&[0x90, 40]);
        let err = Timing::read(&mut reader).unwrap_err();
        assert_eq!(
            err.kind(),
            &crate::reader::ReaderErrorKind::Parse(SmpteError::HeaderFrameRate(0x90u8 as i8).into())
        );
    }
}
