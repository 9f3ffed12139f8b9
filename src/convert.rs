#![doc = r#"
Two-way conversion between [`MidiFile`] and [`MidiFileResource`].

The two formats model the same music differently (embedded tempo meta events
vs a separate tempo table, raw ticks vs measure-indexed time signatures), so
[`MidiFileResource::from_midi`] reconciles them by walking the file's derived
tempo/time-signature timeline, while [`MidiFileResource::extract_midi`] is a
pure structural projection: the timeline is recomputed from the meta events
embedded in the tracks themselves.
"#]

use crate::{
    EncodeError,
    event::{Event, MetaEvent},
    file::{MidiFile, MidiFormat},
    resource::{Chord, MidiFileResource, Tempo, TimeSig, TrackWrapper},
};

/// The resource format hard-requires this tick resolution.
pub const RESOURCE_TICKS_PER_QN: u16 = 480;

/// Track name marking the sample track; its wrapper is tagged 0.
pub const SAMPLE_TRACK_NAME: &str = "samplemidi";

/// Track name whose Text meta events become chord records.
pub const CHORD_TRACK_NAME: &str = "chords";

impl MidiFileResource {
    /// Build a resource from a decoded standard MIDI file.
    ///
    /// Fails unless the file uses 480 ticks per quarter note. The tempo and
    /// time-signature tables are taken from the file's timeline change
    /// points, and a measure-tick table is accumulated alongside to obtain
    /// the measure count.
    pub fn from_midi(midi: &MidiFile) -> Result<Self, EncodeError> {
        if midi.ticks_per_qn() != RESOURCE_TICKS_PER_QN {
            return Err(EncodeError::TicksPerQuarterNote(midi.ticks_per_qn()));
        }

        let mut resource = MidiFileResource {
            last_track_final_tick: midi
                .tracks()
                .last()
                .map_or(0, |track| track.total_ticks as u32),
            ..Default::default()
        };

        let mut final_tick = 0u32;
        for track in midi.tracks() {
            resource.tracks.push(TrackWrapper {
                tag: if track.name == SAMPLE_TRACK_NAME { 0 } else { -1 },
                track: track.clone(),
            });
            resource.track_names.push(track.name.clone());
            if track.total_ticks > u64::from(final_tick) {
                final_tick = track.total_ticks as u32;
            }
            if track.name == CHORD_TRACK_NAME {
                collect_chords(track, &mut resource.chords);
            }
        }

        build_tempo_tables(midi, final_tick, &mut resource);

        resource.revision = 2;
        resource.final_tick = final_tick;
        resource.final_tick_minus_one = final_tick.wrapping_sub(1);
        resource.reserved_floats = [-1.0; 4];
        resource.revision2 = if resource.chords.is_empty() { -1 } else { 2 };
        Ok(resource)
    }

    /// Project the stored tracks back into a standard MIDI file model.
    ///
    /// The resource's tempo, time-signature and measure metadata is
    /// discarded on purpose: the file model recomputes its own timeline
    /// from the meta events embedded in the tracks.
    pub fn extract_midi(&self) -> MidiFile {
        let tracks = self
            .tracks
            .iter()
            .map(|wrapper| wrapper.track.clone())
            .collect();
        MidiFile::new(MidiFormat::MultiTrack, tracks, RESOURCE_TICKS_PER_QN)
    }
}

/// Each Text meta event opens a new chord at its tick and closes the
/// previous one at the tick before. The last chord stays open.
fn collect_chords(track: &crate::file::MidiTrack, chords: &mut Vec<Chord>) {
    let mut current_tick = 0u32;
    for event in &track.events {
        current_tick = current_tick.wrapping_add(event.delta_time);
        let Event::Meta(MetaEvent::Text(name)) = &event.event else {
            continue;
        };
        if let Some(open) = chords.last_mut() {
            open.end = current_tick.wrapping_sub(1);
        }
        chords.push(Chord {
            name: name.clone(),
            start: current_tick,
            end: u32::MAX,
        });
    }
}

/// Collect the tempo and time-signature tables from the timeline's change
/// points, growing the measure-tick table as signatures change: elapsed
/// ticks convert to whole measures at the previous signature's
/// ticks-per-measure, then the table is extended with the final signature's
/// step until it covers the file's final tick.
fn build_tempo_tables(midi: &MidiFile, final_tick: u32, resource: &mut MidiFileResource) {
    let map = midi.tempo_timesig_map();
    let (mut last_sig_tick, mut last_numerator, mut last_denominator) = map
        .first()
        .map_or((0, 4, 4), |e| (e.tick, e.numerator, e.denominator));

    let mut measure_count = 1usize; // tick 0 always starts measure 0
    let mut last_measure_tick = 0u32;
    let mut measure = 0i32;

    for entry in map {
        if entry.new_tempo {
            resource.tempos.push(Tempo {
                start_millis: (entry.time * 1000.0) as f32,
                start_ticks: entry.tick as u32,
                tempo: (60_000_000.0 / entry.bpm as f32) as i32,
            });
        }
        if entry.new_time_sig {
            if entry.tick > 0 {
                let elapsed = entry.tick - last_sig_tick;
                let ticks_per_beat =
                    (u64::from(RESOURCE_TICKS_PER_QN) * 4 / u64::from(last_denominator)).max(1);
                measure += (elapsed / ticks_per_beat / u64::from(last_numerator).max(1)) as i32;
                let step = ticks_per_measure(last_numerator, last_denominator);
                while measure_count < measure.max(0) as usize {
                    last_measure_tick = last_measure_tick.wrapping_add(step);
                    measure_count += 1;
                }
            }
            resource.time_sigs.push(TimeSig {
                measure,
                tick: entry.tick as u32,
                numerator: i16::from(entry.numerator),
                denominator: entry.denominator as i16,
            });
            last_sig_tick = entry.tick;
            last_numerator = entry.numerator;
            last_denominator = entry.denominator;
        }
    }

    let step = ticks_per_measure(last_numerator, last_denominator);
    if step > 0 {
        let mut tick = last_measure_tick + step;
        while tick < final_tick {
            measure_count += 1;
            tick += step;
        }
    }
    resource.measures = measure_count as u32;
}

fn ticks_per_measure(numerator: u8, denominator: u16) -> u32 {
    u32::from(RESOURCE_TICKS_PER_QN) * u32::from(numerator) * 4 / u32::from(denominator.max(1))
}
