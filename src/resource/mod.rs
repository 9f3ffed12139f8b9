#![doc = r#"
In-memory model of the proprietary `MidiFileResource` binary format.

The resource format stores the same musical content as a standard MIDI file
but models it differently: absolute-tick event records instead of deltas, a
separate tempo table instead of embedded tempo meta events, measure-indexed
time signatures, and no stored end-of-track events. Several fields have
unknown semantics upstream; they are carried byte-for-byte and never
interpreted.
"#]

mod decode;
mod encode;

use crate::file::MidiTrack;

/// The magic revision word every supported resource begins with.
pub(crate) const MAGIC: i32 = 2;

/// Sentinel in the final-tick slot announcing an explicit revision number:
/// the bytes `'#REV'`.
pub(crate) const REV_MARKER: u32 = 0x5645_5223;

/// A tempo table entry.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tempo {
    /// Start of this tempo, in milliseconds.
    pub start_millis: f32,
    /// Start of this tempo, in ticks.
    pub start_ticks: u32,
    /// Microseconds per quarter note.
    pub tempo: i32,
}

/// A time-signature table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSig {
    /// Measure index where this signature takes effect.
    pub measure: i32,
    /// Tick where this signature takes effect.
    pub tick: u32,
    /// Beats per measure.
    pub numerator: i16,
    /// Literal denominator value.
    pub denominator: i16,
}

/// A beat table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Beat {
    /// Tick of the beat.
    pub tick: u32,
    /// True if this beat starts a measure.
    pub downbeat: bool,
}

/// A chord table entry (revision 2 resources only).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chord {
    /// Chord label.
    pub name: String,
    /// First tick of the chord.
    pub start: u32,
    /// Last tick of the chord; `0xFFFF_FFFF` while still open.
    pub end: u32,
}

/// A stored track plus its opaque tag (0 for the sample track, −1 otherwise).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackWrapper {
    /// Opaque per-track tag.
    pub tag: i32,
    /// The track content.
    pub track: MidiTrack,
}

/// A decoded `MidiFileResource`.
///
/// The `reserved_*` fields have unknown semantics upstream and are preserved
/// exactly as read; do not infer behavior from them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MidiFileResource {
    /// Format revision word, always 2.
    pub magic: i32,
    /// Final tick of the last stored track.
    pub last_track_final_tick: u32,
    /// The stored tracks with their tags.
    pub tracks: Vec<TrackWrapper>,
    /// Explicit revision introduced by the `#REV` sentinel, 0 when absent.
    pub revision: i32,
    /// Final tick over all tracks.
    pub final_tick: u32,
    /// Number of measures covered by the measure-tick table.
    pub measures: u32,
    /// Reserved, preserved byte-for-byte.
    pub reserved_ints: [u32; 6],
    /// Redundant `final_tick - 1`, stored separately for fidelity.
    pub final_tick_minus_one: u32,
    /// Reserved, preserved byte-for-byte.
    pub reserved_floats: [f32; 4],
    /// The tempo table.
    pub tempos: Vec<Tempo>,
    /// The time-signature table.
    pub time_sigs: Vec<TimeSig>,
    /// The beat table.
    pub beats: Vec<Beat>,
    /// Reserved trailing zero.
    pub reserved_zero: i32,
    /// Secondary revision tag, present when `revision > 1`.
    pub revision2: i32,
    /// The chord table, present when `revision > 1`.
    pub chords: Vec<Chord>,
    /// Track names mirrored from the stored tracks.
    pub track_names: Vec<String>,
}

impl Default for MidiFileResource {
    fn default() -> Self {
        Self {
            magic: MAGIC,
            last_track_final_tick: 0,
            tracks: Vec::new(),
            revision: 0,
            final_tick: 0,
            measures: 0,
            reserved_ints: [0; 6],
            final_tick_minus_one: 0,
            reserved_floats: [0.0; 4],
            tempos: Vec::new(),
            time_sigs: Vec::new(),
            beats: Vec::new(),
            reserved_zero: 0,
            revision2: 0,
            chords: Vec::new(),
            track_names: Vec::new(),
        }
    }
}
