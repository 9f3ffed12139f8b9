use crate::event::MetaEventKind;
use thiserror::Error;

/// Errors raised while interpreting already-read bytes.
///
/// Everything here is fatal to the current decode: there is no partial
/// result and no skipping of unknown constructs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The file did not begin with `MThd` followed by a size of 6.
    #[error("MIDI file did not begin with proper MIDI header")]
    BadFileHeader,
    /// Format word beyond multi-track-sequential.
    #[error("MIDI format {0} is not supported by this library")]
    UnsupportedFormat(u16),
    /// The tick-rate word had its high bit set.
    #[error("SMPTE delta time format is not supported by this library")]
    SmpteTiming,
    /// A track did not begin with `MTrk`.
    #[error("MIDI track not recognized")]
    BadTrackHeader,
    /// A meta event kind byte this library does not know.
    #[error("unknown meta event type {0:#04x}")]
    UnknownMetaEvent(u8),
    /// A fixed-length meta event carried the wrong payload length.
    #[error("{kind:?} events must have {expected} bytes of data, found {found}")]
    MetaEventLength {
        /// Which meta event was malformed.
        kind: MetaEventKind,
        /// The payload length the kind requires.
        expected: u32,
        /// The length declared in the file.
        found: u32,
    },
    /// A data byte appeared where a status byte was required and no
    /// running status was in effect.
    #[error("running status byte {0:#04x} is not a valid status")]
    BadRunningStatus(u8),
    /// The resource magic word was not revision 2.
    #[error("only MidiFileResource rev 2 is supported, found {0}")]
    UnsupportedRevision(i32),
    /// A resource track record kind this library does not know.
    #[error("unknown resource track event kind {0:#04x}")]
    UnknownResourceEvent(u8),
    /// A resource channel-message record with an unrecognized status nibble.
    #[error("unknown midi message type {0:#04x} in resource event")]
    UnknownResourceMessage(u8),
    /// A resource meta record whose subtype is not text-shaped.
    #[error("invalid text event type {0:#04x} in resource event")]
    InvalidResourceMeta(u8),
    /// A resource meta record pointing outside its track's string table.
    #[error("string table index {index} out of range ({len} strings)")]
    StringIndex {
        /// The index stored in the record.
        index: u16,
        /// The size of the track's string table.
        len: usize,
    },
    /// A resource time-signature record with a zero denominator.
    #[error("time signature denominator must be nonzero")]
    ZeroDenominator,
}

/// Errors raised while encoding a model or converting between models.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// The resource format hard-requires 480 ticks per quarter note.
    #[error("midi must use 480 ticks per quarter note, found {0}")]
    TicksPerQuarterNote(u16),
    /// A meta event kind the resource record format cannot store.
    #[error("unhandled meta event type {0:?} for resource track")]
    UnhandledMeta(MetaEventKind),
    /// Sysex events cannot be stored in a resource track.
    #[error("unhandled event type (sysex) for resource track")]
    UnhandledSysex,
    /// Polyphonic key pressure has no resource record encoding.
    #[error("unhandled channel message (note pressure) for resource track")]
    UnhandledNotePressure,
}
