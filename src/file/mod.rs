#![doc = r#"
In-memory model of a standard MIDI file.

A [`MidiFile`] is built in one decode pass, derives its tempo/time-signature
timeline and total duration eagerly on construction, and is never mutated
afterward.
"#]

mod decode;
mod encode;

mod tempo_map;
pub use tempo_map::*;

use crate::event::TrackEvent;
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// The SMF format word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum MidiFormat {
    /// Format 0: one track.
    SingleTrack = 0,
    /// Format 1: multiple simultaneous tracks.
    MultiTrack = 1,
    /// Format 2: multiple sequential tracks.
    MultiSequence = 2,
}

/// One named track: its cumulative tick length and ordered events.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MidiTrack {
    /// Taken from the first TrackName meta event seen, else empty.
    pub name: String,
    /// Sum of all delta times in the track.
    pub total_ticks: u64,
    /// The track's events, in file order.
    pub events: Vec<TrackEvent>,
}

/// A decoded standard MIDI file.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MidiFile {
    format: MidiFormat,
    ticks_per_qn: u16,
    tracks: Vec<MidiTrack>,
    tempo_timesig_map: Vec<TempoTimesigEvent>,
    duration: f64,
}

impl MidiFile {
    /// Assemble a file model and eagerly derive its tempo/time-signature
    /// timeline and duration from track 0.
    pub fn new(format: MidiFormat, tracks: Vec<MidiTrack>, ticks_per_qn: u16) -> Self {
        let (tempo_timesig_map, duration) = tempo_map::build(&tracks, ticks_per_qn);
        Self {
            format,
            ticks_per_qn,
            tracks,
            tempo_timesig_map,
            duration,
        }
    }

    /// The file's format word.
    pub const fn format(&self) -> MidiFormat {
        self.format
    }

    /// Total duration in seconds, derived at construction.
    pub const fn duration(&self) -> f64 {
        self.duration
    }

    /// The file's tick resolution per quarter note.
    pub const fn ticks_per_qn(&self) -> u16 {
        self.ticks_per_qn
    }

    /// The derived tempo/time-signature timeline, ordered by tick.
    pub fn tempo_timesig_map(&self) -> &[TempoTimesigEvent] {
        &self.tempo_timesig_map
    }

    /// The file's tracks, in file order.
    pub fn tracks(&self) -> &[MidiTrack] {
        &self.tracks
    }

    /// Find a track by its name, if any track carries it.
    pub fn track_by_name(&self, name: &str) -> Option<&MidiTrack> {
        self.tracks.iter().find(|t| t.name == name)
    }
}
