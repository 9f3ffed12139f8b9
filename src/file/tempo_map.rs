use super::MidiTrack;
use crate::event::{Event, MetaEvent};
use std::collections::BTreeMap;

/// Tempo assumed before any tempo meta event is seen: 120 BPM.
pub const DEFAULT_MICROS_PER_QN: u32 = 500_000;

const MICROSECONDS_PER_SECOND: f64 = 1_000_000.0;

/// One change point in the derived tempo/time-signature timeline.
///
/// Entries are ordered by tick. When only one of tempo or time signature
/// changes at a tick, the other fields carry the most recent values forward
/// with their `new_*` flag unset.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TempoTimesigEvent {
    /// The time, in seconds, where this change occurs.
    pub time: f64,
    /// The MIDI tick at which this change occurs.
    pub tick: u64,
    /// The tempo that follows this marker.
    pub bpm: f64,
    /// True if this marker defines a new time signature.
    pub new_time_sig: bool,
    /// True if this marker defines a new tempo.
    pub new_tempo: bool,
    /// The time signature numerator in effect from this marker.
    pub numerator: u8,
    /// The literal time signature denominator (not an exponent).
    pub denominator: u16,
}

/// Seconds spanned by `ticks` at a fixed tempo.
pub(crate) fn ticks_to_seconds(ticks_per_qn: u16, ticks: u64, micros_per_qn: u32) -> f64 {
    (ticks as f64 / f64::from(ticks_per_qn)) * (f64::from(micros_per_qn) / MICROSECONDS_PER_SECOND)
}

fn tempo_to_bpm(micros_per_qn: u32) -> f64 {
    60.0 / (f64::from(micros_per_qn) / MICROSECONDS_PER_SECOND)
}

/// Walk track 0 (the conventional tempo-map track) and derive the ordered
/// timeline of tempo/time-signature change points plus the file duration.
pub(crate) fn build(tracks: &[MidiTrack], ticks_per_qn: u16) -> (Vec<TempoTimesigEvent>, f64) {
    let Some(tempo_track) = tracks.first() else {
        return (Vec::new(), 0.0);
    };

    let mut duration = 0.0;
    let mut ticks = 0u64; // running total of MIDI ticks
    let mut micros_per_qn = DEFAULT_MICROS_PER_QN;

    let mut tempos = BTreeMap::new();
    let mut sigs = BTreeMap::new();
    let mut times = BTreeMap::new();

    for event in &tempo_track.events {
        ticks += u64::from(event.delta_time);
        duration += ticks_to_seconds(ticks_per_qn, event.delta_time.into(), micros_per_qn);
        let Event::Meta(meta) = &event.event else {
            continue;
        };
        match meta {
            MetaEvent::Tempo(micros) => {
                micros_per_qn = *micros;
                tempos.insert(ticks, *micros);
                times.insert(ticks, duration);
            }
            MetaEvent::TimeSignature(sig) => {
                sigs.insert(ticks, *sig);
                times.insert(ticks, duration);
            }
            _ => {}
        }
    }

    // Tracks that outlast the tempo track keep accruing time at the last
    // known tempo up to their final tick.
    for track in tracks.iter().skip(1) {
        if track.total_ticks > ticks {
            duration += ticks_to_seconds(ticks_per_qn, track.total_ticks - ticks, micros_per_qn);
            ticks = track.total_ticks;
        }
    }

    let mut map = Vec::with_capacity(times.len());
    let mut bpm = 120.0;
    let mut numerator = 4u8;
    let mut denominator = 4u16;
    for (&tick, &time) in &times {
        let new_tempo = tempos.get(&tick).is_some_and(|&micros| {
            bpm = tempo_to_bpm(micros);
            true
        });
        let new_time_sig = sigs.get(&tick).is_some_and(|sig| {
            numerator = sig.numerator;
            denominator = sig.literal_denominator();
            true
        });
        map.push(TempoTimesigEvent {
            time,
            tick,
            bpm,
            new_time_sig,
            new_tempo,
            numerator,
            denominator,
        });
    }
    (map, duration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{ChannelEvent, ChannelMessage, TimeSignature, TrackEvent};
    use pretty_assertions::assert_eq;

    fn meta(delta_time: u32, meta: MetaEvent) -> TrackEvent {
        TrackEvent {
            delta_time,
            event: Event::Meta(meta),
        }
    }

    fn note_on(delta_time: u32) -> TrackEvent {
        TrackEvent {
            delta_time,
            event: Event::Channel(ChannelEvent {
                channel: 0,
                force_status: false,
                message: ChannelMessage::NoteOn {
                    key: 60,
                    velocity: 100,
                },
            }),
        }
    }

    fn track(events: Vec<TrackEvent>) -> MidiTrack {
        let total_ticks = events.iter().map(|e| u64::from(e.delta_time)).sum();
        MidiTrack {
            name: String::new(),
            total_ticks,
            events,
        }
    }

    #[test]
    fn single_tempo_with_long_second_track() {
        let tempo_track = track(vec![
            meta(0, MetaEvent::Tempo(500_000)),
            meta(480, MetaEvent::EndOfTrack),
        ]);
        let other = track(vec![note_on(0), note_on(960), meta(0, MetaEvent::EndOfTrack)]);
        let (map, duration) = build(&[tempo_track, other], 480);

        assert_eq!(duration, 1.0);
        assert_eq!(map.len(), 1);
        let entry = &map[0];
        assert_eq!(entry.time, 0.0);
        assert_eq!(entry.tick, 0);
        assert_eq!(entry.bpm, 120.0);
        assert!(entry.new_tempo);
        assert!(!entry.new_time_sig);
        assert_eq!(entry.numerator, 4);
        assert_eq!(entry.denominator, 4);
    }

    #[test]
    fn merges_tempo_and_signature_at_same_tick() {
        let sig = TimeSignature {
            numerator: 3,
            denominator: 2,
            clocks_per_tick: 24,
            thirtysecond_notes_per_24_clocks: 8,
        };
        let tempo_track = track(vec![
            meta(0, MetaEvent::Tempo(500_000)),
            meta(0, MetaEvent::TimeSignature(sig)),
            meta(960, MetaEvent::Tempo(250_000)),
            meta(0, MetaEvent::EndOfTrack),
        ]);
        let (map, duration) = build(&[tempo_track], 480);

        assert_eq!(map.len(), 2);
        assert!(map[0].new_tempo && map[0].new_time_sig);
        assert_eq!(map[0].numerator, 3);
        assert_eq!(map[0].denominator, 4);

        // second entry: tempo only, carries the 3/4 signature forward
        assert!(map[1].new_tempo);
        assert!(!map[1].new_time_sig);
        assert_eq!(map[1].numerator, 3);
        assert_eq!(map[1].denominator, 4);
        assert_eq!(map[1].bpm, 240.0);
        assert_eq!(map[1].tick, 960);
        assert_eq!(map[1].time, 1.0);
        assert_eq!(duration, 1.0);
    }

    #[test]
    fn timeline_is_monotonic_and_bpm_positive() {
        let tempo_track = track(vec![
            meta(0, MetaEvent::Tempo(600_000)),
            meta(120, MetaEvent::Tempo(300_000)),
            meta(120, MetaEvent::Tempo(150_000)),
            meta(480, MetaEvent::EndOfTrack),
        ]);
        let (map, _) = build(&[tempo_track], 480);
        assert_eq!(map.len(), 3);
        for pair in map.windows(2) {
            assert!(pair[0].tick < pair[1].tick);
            assert!(pair[0].time <= pair[1].time);
        }
        for entry in &map {
            assert!(entry.bpm > 0.0);
        }
    }

    #[test]
    fn signature_before_any_tempo_defaults_to_120_bpm() {
        let sig = TimeSignature {
            numerator: 7,
            denominator: 3,
            clocks_per_tick: 24,
            thirtysecond_notes_per_24_clocks: 8,
        };
        let tempo_track = track(vec![
            meta(0, MetaEvent::TimeSignature(sig)),
            meta(0, MetaEvent::EndOfTrack),
        ]);
        let (map, _) = build(&[tempo_track], 480);
        assert_eq!(map.len(), 1);
        assert!(map[0].new_time_sig);
        assert!(!map[0].new_tempo);
        assert_eq!(map[0].bpm, 120.0);
        assert_eq!(map[0].numerator, 7);
        assert_eq!(map[0].denominator, 8);
    }

    #[test]
    fn empty_track_list_yields_empty_map() {
        let (map, duration) = build(&[], 480);
        assert!(map.is_empty());
        assert_eq!(duration, 0.0);
    }
}
