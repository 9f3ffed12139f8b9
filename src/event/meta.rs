use num_enum::{IntoPrimitive, TryFromPrimitive};

/// The meta event kind byte that follows an `0xFF` status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MetaEventKind {
    /// `FF 00`
    SequenceNumber = 0x00,
    /// `FF 01`
    Text = 0x01,
    /// `FF 02`
    CopyrightNotice = 0x02,
    /// `FF 03`
    TrackName = 0x03,
    /// `FF 04`
    InstrumentName = 0x04,
    /// `FF 05`
    Lyric = 0x05,
    /// `FF 06`
    Marker = 0x06,
    /// `FF 07`
    CuePoint = 0x07,
    /// `FF 08`
    ProgramName = 0x08,
    /// `FF 09`
    DeviceName = 0x09,
    /// `FF 20`
    ChannelPrefix = 0x20,
    /// `FF 21`
    Port = 0x21,
    /// `FF 2F`
    EndOfTrack = 0x2F,
    /// `FF 51`
    Tempo = 0x51,
    /// `FF 54`
    SmpteOffset = 0x54,
    /// `FF 58`
    TimeSignature = 0x58,
    /// `FF 59`
    KeySignature = 0x59,
    /// `FF 7F`
    SequencerSpecific = 0x7F,
}

impl MetaEventKind {
    /// True for the nine text-shaped kinds, `0x01..=0x09`.
    pub const fn is_text(self) -> bool {
        (self as u8) >= Self::Text as u8 && (self as u8) <= Self::DeviceName as u8
    }
}

/// A meta event, one variant per kind.
///
/// The payload shape is part of the variant, so a kind carrying the wrong
/// payload cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MetaEvent {
    /// Sequence number, two bytes of data.
    SequenceNumber(u16),
    /// Free text.
    Text(String),
    /// Copyright notice.
    CopyrightNotice(String),
    /// Track name; the first one seen names the track.
    TrackName(String),
    /// Instrument name.
    InstrumentName(String),
    /// Lyric fragment.
    Lyric(String),
    /// Marker label.
    Marker(String),
    /// Cue point label.
    CuePoint(String),
    /// Program name.
    ProgramName(String),
    /// Device name.
    DeviceName(String),
    /// Channel prefix, one byte.
    ChannelPrefix(u8),
    /// Port number, one byte.
    Port(u8),
    /// End of track, no payload.
    EndOfTrack,
    /// Tempo as a 24-bit count of microseconds per quarter note.
    Tempo(u32),
    /// SMPTE offset, five bytes.
    SmpteOffset(SmpteOffset),
    /// Time signature, four bytes.
    TimeSignature(TimeSignature),
    /// Key signature, two bytes.
    KeySignature(KeySignature),
    /// Sequencer-specific blob, variable length.
    SequencerSpecific(Vec<u8>),
}

impl MetaEvent {
    /// The kind tag for this event.
    pub const fn kind(&self) -> MetaEventKind {
        match self {
            Self::SequenceNumber(_) => MetaEventKind::SequenceNumber,
            Self::Text(_) => MetaEventKind::Text,
            Self::CopyrightNotice(_) => MetaEventKind::CopyrightNotice,
            Self::TrackName(_) => MetaEventKind::TrackName,
            Self::InstrumentName(_) => MetaEventKind::InstrumentName,
            Self::Lyric(_) => MetaEventKind::Lyric,
            Self::Marker(_) => MetaEventKind::Marker,
            Self::CuePoint(_) => MetaEventKind::CuePoint,
            Self::ProgramName(_) => MetaEventKind::ProgramName,
            Self::DeviceName(_) => MetaEventKind::DeviceName,
            Self::ChannelPrefix(_) => MetaEventKind::ChannelPrefix,
            Self::Port(_) => MetaEventKind::Port,
            Self::EndOfTrack => MetaEventKind::EndOfTrack,
            Self::Tempo(_) => MetaEventKind::Tempo,
            Self::SmpteOffset(_) => MetaEventKind::SmpteOffset,
            Self::TimeSignature(_) => MetaEventKind::TimeSignature,
            Self::KeySignature(_) => MetaEventKind::KeySignature,
            Self::SequencerSpecific(_) => MetaEventKind::SequencerSpecific,
        }
    }

    /// The text payload, for the text-shaped kinds.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(s)
            | Self::CopyrightNotice(s)
            | Self::TrackName(s)
            | Self::InstrumentName(s)
            | Self::Lyric(s)
            | Self::Marker(s)
            | Self::CuePoint(s)
            | Self::ProgramName(s)
            | Self::DeviceName(s) => Some(s),
            _ => None,
        }
    }
}

/// A five-byte SMPTE offset payload, stored as read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmpteOffset {
    /// Hours (with the frame-rate bits in the top of the byte).
    pub hour: u8,
    /// Minutes.
    pub minute: u8,
    /// Seconds.
    pub second: u8,
    /// Frames.
    pub frame: u8,
    /// Fractional frames, in hundredths.
    pub frame_hundredths: u8,
}

/// A four-byte time signature payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSignature {
    /// Beats per measure.
    pub numerator: u8,
    /// Denominator as a power-of-two exponent (2 means a quarter note).
    pub denominator: u8,
    /// MIDI clocks per metronome tick.
    pub clocks_per_tick: u8,
    /// Thirty-second notes per 24 MIDI clocks.
    pub thirtysecond_notes_per_24_clocks: u8,
}

impl TimeSignature {
    /// The literal denominator value, `2^denominator`.
    pub const fn literal_denominator(&self) -> u16 {
        let exp = if self.denominator > 15 {
            15
        } else {
            self.denominator
        };
        1 << exp
    }
}

/// A two-byte key signature payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeySignature {
    /// Count of sharps (positive) or flats (negative, two's complement).
    pub sharps: u8,
    /// 0 for major, 1 for minor.
    pub tonality: u8,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn kind_byte_mapping() {
        assert_eq!(MetaEventKind::try_from(0x51), Ok(MetaEventKind::Tempo));
        assert_eq!(MetaEventKind::try_from(0x2F), Ok(MetaEventKind::EndOfTrack));
        assert!(MetaEventKind::try_from(0x60).is_err());
        assert_eq!(u8::from(MetaEventKind::TimeSignature), 0x58);
    }

    #[test]
    fn text_kinds() {
        assert!(MetaEventKind::Lyric.is_text());
        assert!(MetaEventKind::DeviceName.is_text());
        assert!(!MetaEventKind::SequenceNumber.is_text());
        assert!(!MetaEventKind::ChannelPrefix.is_text());
    }

    #[test]
    fn literal_denominator_is_power_of_two() {
        let ts = TimeSignature {
            numerator: 6,
            denominator: 3,
            clocks_per_tick: 24,
            thirtysecond_notes_per_24_clocks: 8,
        };
        assert_eq!(ts.literal_denominator(), 8);
    }
}
