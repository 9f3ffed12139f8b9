#![doc = r#"
Event model shared by both codecs.

A [`TrackEvent`] is a tick delta plus one of three payload families: a
channel message, a meta event, or a sysex blob. Each family is a closed sum
type, so every consumption site matches exhaustively and an unrecognized
kind can never slip through silently.
"#]

mod meta;
pub use meta::*;

/// One timed event in a track: the ticks elapsed since the previous event
/// and the event payload.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackEvent {
    /// Ticks since the previous event in the same track.
    pub delta_time: u32,
    /// The event payload.
    pub event: Event,
}

impl TrackEvent {
    /// Build a zero-delta end-of-track marker.
    pub const fn end_of_track(delta_time: u32) -> Self {
        Self {
            delta_time,
            event: Event::Meta(MetaEvent::EndOfTrack),
        }
    }
}

/// The three payload families an event can carry.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Event {
    /// A channel voice message.
    Channel(ChannelEvent),
    /// A meta event (status `0xFF`).
    Meta(MetaEvent),
    /// A system-exclusive payload (status `0xF0` or `0xF7`).
    Sysex(SysexEvent),
}

impl From<ChannelEvent> for Event {
    fn from(value: ChannelEvent) -> Self {
        Self::Channel(value)
    }
}

impl From<MetaEvent> for Event {
    fn from(value: MetaEvent) -> Self {
        Self::Meta(value)
    }
}

impl From<SysexEvent> for Event {
    fn from(value: SysexEvent) -> Self {
        Self::Sysex(value)
    }
}

/// A channel message together with its channel and status-byte provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelEvent {
    /// MIDI channel, 0-15.
    pub channel: u8,
    /// For byte-for-byte rewriting: true if the original bytes carried a
    /// status byte that running status had made redundant. The encoder
    /// re-emits it verbatim.
    pub force_status: bool,
    /// The message payload.
    pub message: ChannelMessage,
}

impl ChannelEvent {
    /// The full status byte for this event: message nibble plus channel.
    pub const fn status(&self) -> u8 {
        self.message.status_nibble() | self.channel
    }
}

/// The set of channel voice messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChannelMessage {
    /// `0x8n`: note released.
    NoteOff {
        /// Key number.
        key: u8,
        /// Release velocity.
        velocity: u8,
    },
    /// `0x9n`: note pressed.
    NoteOn {
        /// Key number.
        key: u8,
        /// Attack velocity.
        velocity: u8,
    },
    /// `0xAn`: polyphonic key pressure.
    NotePressure {
        /// Key number.
        key: u8,
        /// Pressure amount.
        pressure: u8,
    },
    /// `0xBn`: controller change.
    Controller {
        /// Controller number.
        controller: u8,
        /// Controller value.
        value: u8,
    },
    /// `0xCn`: program change.
    ProgramChange {
        /// Program number.
        program: u8,
    },
    /// `0xDn`: channel pressure.
    ChannelPressure {
        /// Pressure amount.
        pressure: u8,
    },
    /// `0xEn`: pitch bend with a 14-bit value.
    PitchBend {
        /// Bend amount, 0-16383.
        bend: u16,
    },
}

impl ChannelMessage {
    /// The status high nibble for this message, `0x80..=0xE0`.
    pub const fn status_nibble(&self) -> u8 {
        match self {
            Self::NoteOff { .. } => 0x80,
            Self::NoteOn { .. } => 0x90,
            Self::NotePressure { .. } => 0xA0,
            Self::Controller { .. } => 0xB0,
            Self::ProgramChange { .. } => 0xC0,
            Self::ChannelPressure { .. } => 0xD0,
            Self::PitchBend { .. } => 0xE0,
        }
    }
}

/// Raw system-exclusive bytes.
///
/// When the triggering status byte was `0xF0` (exclusive start), that marker
/// is kept as the first stored byte so re-encoding reproduces the input.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SysexEvent {
    /// The stored payload, including the `0xF0` prefix when present.
    pub data: Vec<u8>,
}
