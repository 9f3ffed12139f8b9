//! End-to-end decode/encode tests over hand-assembled resource files.

use midres::prelude::*;
use midres::{Beat, Chord, Tempo, TimeSig};
use pretty_assertions::assert_eq;

fn push_u32(bytes: &mut Vec<u8>, v: u32) {
    bytes.extend_from_slice(&v.to_le_bytes());
}

fn push_i32(bytes: &mut Vec<u8>, v: i32) {
    bytes.extend_from_slice(&v.to_le_bytes());
}

fn push_f32(bytes: &mut Vec<u8>, v: f32) {
    bytes.extend_from_slice(&v.to_le_bytes());
}

fn push_symbol(bytes: &mut Vec<u8>, s: &str) {
    push_u32(bytes, s.len() as u32);
    bytes.extend_from_slice(s.as_bytes());
}

fn push_record(bytes: &mut Vec<u8>, tick: u32, kind: u8, data: [u8; 3]) {
    push_u32(bytes, tick);
    bytes.push(kind);
    bytes.extend_from_slice(&data);
}

/// A two-track revision 2 resource: a tempo/name track and a chords track.
fn revision2_resource() -> Vec<u8> {
    let mut bytes = Vec::new();
    push_i32(&mut bytes, 2); // magic
    push_u32(&mut bytes, 1920); // last track's final tick
    push_u32(&mut bytes, 2); // track count

    // track 0: name, tempo, time signature, a couple of notes
    bytes.push(1);
    push_i32(&mut bytes, 0); // samplemidi tag
    push_u32(&mut bytes, 5);
    push_record(&mut bytes, 0, 8, [0x03, 0x00, 0x00]); // track name
    push_record(&mut bytes, 0, 2, [0x07, 0x20, 0xA1]); // 500000 us/qn
    push_record(&mut bytes, 0, 4, [0x04, 0x04, 0x00]); // 4/4
    push_record(&mut bytes, 0, 1, [0x90, 0x3C, 0x64]); // note on
    push_record(&mut bytes, 480, 1, [0x80, 0x3C, 0x00]); // note off
    push_u32(&mut bytes, 1); // string table
    push_symbol(&mut bytes, "samplemidi");

    // track 1: chord labels
    bytes.push(1);
    push_i32(&mut bytes, -1);
    push_u32(&mut bytes, 3);
    push_record(&mut bytes, 0, 8, [0x03, 0x00, 0x00]);
    push_record(&mut bytes, 0, 8, [0x01, 0x01, 0x00]);
    push_record(&mut bytes, 960, 8, [0x01, 0x02, 0x00]);
    push_u32(&mut bytes, 3);
    push_symbol(&mut bytes, "chords");
    push_symbol(&mut bytes, "C:maj");
    push_symbol(&mut bytes, "F:maj");

    bytes.extend_from_slice(b"#REV");
    push_i32(&mut bytes, 2); // revision
    push_u32(&mut bytes, 1920); // final tick
    push_u32(&mut bytes, 1); // measures
    for _ in 0..6 {
        push_u32(&mut bytes, 0);
    }
    push_u32(&mut bytes, 1919); // final tick minus one
    for _ in 0..4 {
        push_f32(&mut bytes, -1.0);
    }

    push_u32(&mut bytes, 1); // tempo table
    push_f32(&mut bytes, 0.0);
    push_u32(&mut bytes, 0);
    push_i32(&mut bytes, 500_000);

    push_u32(&mut bytes, 1); // time signature table
    push_i32(&mut bytes, 0);
    push_u32(&mut bytes, 0);
    bytes.extend_from_slice(&4i16.to_le_bytes());
    bytes.extend_from_slice(&4i16.to_le_bytes());

    push_u32(&mut bytes, 2); // beat table
    push_u32(&mut bytes, 0);
    bytes.push(1);
    push_u32(&mut bytes, 480);
    bytes.push(0);

    push_i32(&mut bytes, 0); // reserved
    push_i32(&mut bytes, 2); // revision2

    push_u32(&mut bytes, 2); // chord table
    push_symbol(&mut bytes, "C:maj");
    push_u32(&mut bytes, 0);
    push_u32(&mut bytes, 959);
    push_symbol(&mut bytes, "F:maj");
    push_u32(&mut bytes, 960);
    push_u32(&mut bytes, u32::MAX);

    push_u32(&mut bytes, 2); // track names
    push_symbol(&mut bytes, "samplemidi");
    push_symbol(&mut bytes, "chords");

    bytes
}

#[test]
fn revision2_resource_decodes_fully() {
    let bytes = revision2_resource();
    let res = MidiFileResource::parse(&bytes).unwrap();

    assert_eq!(res.magic, 2);
    assert_eq!(res.revision, 2);
    assert_eq!(res.revision2, 2);
    assert_eq!(res.last_track_final_tick, 1920);
    assert_eq!(res.final_tick, 1920);
    assert_eq!(res.final_tick_minus_one, 1919);
    assert_eq!(res.measures, 1);
    assert_eq!(res.reserved_floats, [-1.0; 4]);

    assert_eq!(res.tracks.len(), 2);
    assert_eq!(res.tracks[0].tag, 0);
    assert_eq!(res.tracks[0].track.name, "samplemidi");
    assert_eq!(res.tracks[1].tag, -1);
    assert_eq!(res.tracks[1].track.name, "chords");
    assert_eq!(res.track_names, vec!["samplemidi", "chords"]);

    assert_eq!(
        res.tempos,
        vec![Tempo {
            start_millis: 0.0,
            start_ticks: 0,
            tempo: 500_000
        }]
    );
    assert_eq!(
        res.time_sigs,
        vec![TimeSig {
            measure: 0,
            tick: 0,
            numerator: 4,
            denominator: 4
        }]
    );
    assert_eq!(
        res.beats,
        vec![
            Beat {
                tick: 0,
                downbeat: true
            },
            Beat {
                tick: 480,
                downbeat: false
            }
        ]
    );
    assert_eq!(
        res.chords,
        vec![
            Chord {
                name: "C:maj".to_owned(),
                start: 0,
                end: 959
            },
            Chord {
                name: "F:maj".to_owned(),
                start: 960,
                end: u32::MAX
            }
        ]
    );
}

#[test]
fn decoded_tracks_get_synthetic_end_of_track() {
    let res = MidiFileResource::parse(&revision2_resource()).unwrap();

    // the first track's synthetic end-of-track is stretched to the stored
    // final tick
    let first = &res.tracks[0].track;
    assert_eq!(first.total_ticks, 1920);
    let last = first.events.last().unwrap();
    assert_eq!(last.event, Event::Meta(MetaEvent::EndOfTrack));
    assert_eq!(last.delta_time, 1440); // records end at tick 480

    // later tracks end exactly where their records do
    let second = &res.tracks[1].track;
    assert_eq!(second.total_ticks, 960);
    assert_eq!(second.events.last().unwrap().delta_time, 0);
}

#[test]
fn revision2_resource_roundtrips_byte_for_byte() {
    let bytes = revision2_resource();
    let res = MidiFileResource::parse(&bytes).unwrap();
    assert_eq!(res.encode().unwrap(), bytes);
}

#[test]
fn revision0_resource_roundtrips_byte_for_byte() {
    // no #REV sentinel, no revision2 word, no chord table
    let mut bytes = Vec::new();
    push_i32(&mut bytes, 2);
    push_u32(&mut bytes, 96);
    push_u32(&mut bytes, 1);

    bytes.push(1);
    push_i32(&mut bytes, -1);
    push_u32(&mut bytes, 2);
    push_record(&mut bytes, 0, 1, [0x91, 0x40, 0x50]);
    push_record(&mut bytes, 96, 1, [0x81, 0x40, 0x00]);
    push_u32(&mut bytes, 0); // empty string table

    push_u32(&mut bytes, 96); // final tick, not the sentinel
    push_u32(&mut bytes, 1); // measures
    for _ in 0..6 {
        push_u32(&mut bytes, 0);
    }
    push_u32(&mut bytes, 95);
    for _ in 0..4 {
        push_f32(&mut bytes, 0.0);
    }
    push_u32(&mut bytes, 0); // tempos
    push_u32(&mut bytes, 0); // time signatures
    push_u32(&mut bytes, 0); // beats
    push_i32(&mut bytes, 0); // reserved
    push_u32(&mut bytes, 1); // track names
    push_symbol(&mut bytes, "lead");

    let res = MidiFileResource::parse(&bytes).unwrap();
    assert_eq!(res.revision, 0);
    assert_eq!(res.final_tick, 96);
    assert!(res.chords.is_empty());
    assert_eq!(res.track_names, vec!["lead"]);
    assert_eq!(res.encode().unwrap(), bytes);
}

#[test]
fn truncated_resource_is_rejected() {
    let mut bytes = revision2_resource();
    bytes.truncate(bytes.len() - 3);
    assert!(MidiFileResource::parse(&bytes).is_err());
}
