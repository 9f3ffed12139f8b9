use super::{Beat, Chord, MAGIC, MidiFileResource, REV_MARKER, Tempo, TimeSig, TrackWrapper};
use crate::{
    ParseError,
    event::{ChannelEvent, ChannelMessage, Event, MetaEvent, TimeSignature, TrackEvent},
    file::MidiTrack,
    reader::{ReadResult, Reader, ReaderError},
};

/// Resource track records are a fixed width: a `u32` absolute tick, one
/// kind byte, and three data bytes.
const RECORD_SIZE: usize = 8;

/// Record kind bytes.
const KIND_MIDI: u8 = 1;
const KIND_TEMPO: u8 = 2;
const KIND_TIME_SIGNATURE: u8 = 4;
const KIND_META: u8 = 8;

impl MidiFileResource {
    /// Decode a resource from a byte buffer.
    ///
    /// Since the format never stores end-of-track events, every decoded
    /// track gets a synthetic zero-delta one appended, and the first
    /// track's is then stretched to the stored final tick so a later
    /// re-encode reproduces the original total length.
    pub fn parse(bytes: &[u8]) -> ReadResult<Self> {
        let mut reader = Reader::new(bytes);
        let magic = reader.read_i32_le()?;
        if magic != MAGIC {
            return Err(ReaderError::parse(0, ParseError::UnsupportedRevision(magic)));
        }
        let last_track_final_tick = reader.read_u32_le()?;
        let mut tracks = reader.read_list(read_track_wrapper)?;

        let final_tick_or_rev = reader.read_u32_le()?;
        let (revision, final_tick) = if final_tick_or_rev == REV_MARKER {
            (reader.read_i32_le()?, reader.read_u32_le()?)
        } else {
            (0, final_tick_or_rev)
        };

        // Fidelity shim: the original end-of-track events are not saved, so
        // the best we can do is stretch the first track's synthetic one to
        // the stored final tick. Only the first track; this is not a
        // general rule.
        if let Some(wrapper) = tracks.first_mut() {
            let track = &mut wrapper.track;
            if let Some(last) = track.events.last_mut() {
                last.delta_time = final_tick.wrapping_sub(track.total_ticks as u32);
            }
            track.total_ticks = final_tick.into();
        }

        let measures = reader.read_u32_le()?;
        let mut reserved_ints = [0u32; 6];
        for slot in &mut reserved_ints {
            *slot = reader.read_u32_le()?;
        }
        let final_tick_minus_one = reader.read_u32_le()?;
        let mut reserved_floats = [0f32; 4];
        for slot in &mut reserved_floats {
            *slot = reader.read_f32_le()?;
        }
        let tempos = reader.read_list(|r| {
            Ok(Tempo {
                start_millis: r.read_f32_le()?,
                start_ticks: r.read_u32_le()?,
                tempo: r.read_i32_le()?,
            })
        })?;
        let time_sigs = reader.read_list(|r| {
            Ok(TimeSig {
                measure: r.read_i32_le()?,
                tick: r.read_u32_le()?,
                numerator: r.read_i16_le()?,
                denominator: r.read_i16_le()?,
            })
        })?;
        let beats = reader.read_list(|r| {
            Ok(Beat {
                tick: r.read_u32_le()?,
                downbeat: r.read_u8()? != 0,
            })
        })?;
        let reserved_zero = reader.read_i32_le()?;
        let (revision2, chords) = if revision > 1 {
            let revision2 = reader.read_i32_le()?;
            let chords = reader.read_list(|r| {
                Ok(Chord {
                    name: r.read_symbol()?,
                    start: r.read_u32_le()?,
                    end: r.read_u32_le()?,
                })
            })?;
            (revision2, chords)
        } else {
            (0, Vec::new())
        };
        let track_names = reader.read_list(|r| r.read_symbol())?;

        log::debug!(
            "decoded resource: rev {revision}, {} tracks, final tick {final_tick}",
            tracks.len()
        );
        Ok(Self {
            magic,
            last_track_final_tick,
            tracks,
            revision,
            final_tick,
            measures,
            reserved_ints,
            final_tick_minus_one,
            reserved_floats,
            tempos,
            time_sigs,
            beats,
            reserved_zero,
            revision2,
            chords,
            track_names,
        })
    }
}

fn read_track_wrapper(reader: &mut Reader<'_>) -> ReadResult<TrackWrapper> {
    let _marker = reader.read_u8()?;
    let tag = reader.read_i32_le()?;
    let num_events = reader.read_u32_le()?;
    // the flat record block comes before the string table it refers into
    let record_bytes = reader.read_bytes(num_events as usize * RECORD_SIZE)?;
    let strings = reader.read_list(|r| r.read_symbol())?;

    let mut records = Reader::new(record_bytes);
    let mut tick = 0u32;
    let mut name = String::new();
    let mut events = Vec::with_capacity(num_events as usize + 1);
    for _ in 0..num_events {
        events.push(read_record(&mut records, &mut tick, &mut name, &strings)?);
    }
    // the resource format never stores an end-of-track event
    events.push(TrackEvent::end_of_track(0));
    Ok(TrackWrapper {
        tag,
        track: MidiTrack {
            name,
            total_ticks: tick.into(),
            events,
        },
    })
}

fn read_record(
    reader: &mut Reader<'_>,
    current_tick: &mut u32,
    name: &mut String,
    strings: &[String],
) -> ReadResult<TrackEvent> {
    let tick = reader.read_u32_le()?;
    let delta_time = tick.wrapping_sub(*current_tick);
    *current_tick = tick;

    let kind_pos = reader.position();
    let kind = reader.read_u8()?;
    let event = match kind {
        KIND_MIDI => {
            let status = reader.read_u8()?;
            let channel = status & 0x0F;
            let d1 = reader.read_u8()?;
            let d2 = reader.read_u8()?;
            let message = match status & 0xF0 {
                0x80 => ChannelMessage::NoteOff {
                    key: d1,
                    velocity: d2,
                },
                0x90 => ChannelMessage::NoteOn {
                    key: d1,
                    velocity: d2,
                },
                0xB0 => ChannelMessage::Controller {
                    controller: d1,
                    value: d2,
                },
                0xC0 => ChannelMessage::ProgramChange { program: d1 },
                0xD0 => ChannelMessage::ChannelPressure { pressure: d1 },
                0xE0 => ChannelMessage::PitchBend {
                    bend: u16::from(d1) | u16::from(d2) << 8,
                },
                other => {
                    // can't be sure the remaining types are 1:1
                    return Err(ReaderError::parse(
                        kind_pos,
                        ParseError::UnknownResourceMessage(other),
                    ));
                }
            };
            Event::Channel(ChannelEvent {
                channel,
                force_status: false,
                message,
            })
        }
        KIND_TEMPO => {
            let high = reader.read_u8()?;
            let low = reader.read_u16_le()?;
            Event::Meta(MetaEvent::Tempo(u32::from(high) << 16 | u32::from(low)))
        }
        KIND_TIME_SIGNATURE => {
            let numerator = reader.read_u8()?;
            let denominator = reader.read_u8()?;
            let _pad = reader.read_u8()?;
            let exponent = denominator
                .checked_ilog2()
                .ok_or(ReaderError::parse(kind_pos, ParseError::ZeroDenominator))?;
            Event::Meta(MetaEvent::TimeSignature(TimeSignature {
                numerator,
                denominator: exponent as u8,
                clocks_per_tick: 24,
                thirtysecond_notes_per_24_clocks: 8,
            }))
        }
        KIND_META => {
            let subtype = reader.read_u8()?;
            let index = reader.read_u16_le()?;
            let text = strings
                .get(usize::from(index))
                .ok_or(ReaderError::parse(
                    kind_pos,
                    ParseError::StringIndex {
                        index,
                        len: strings.len(),
                    },
                ))?
                .clone();
            let meta = match subtype {
                0x01 => MetaEvent::Text(text),
                0x02 => MetaEvent::CopyrightNotice(text),
                0x03 => {
                    if name.is_empty() {
                        name.clone_from(&text);
                    }
                    MetaEvent::TrackName(text)
                }
                0x04 => MetaEvent::InstrumentName(text),
                0x05 => MetaEvent::Lyric(text),
                0x06 => MetaEvent::Marker(text),
                0x07 => MetaEvent::CuePoint(text),
                other => {
                    return Err(ReaderError::parse(
                        kind_pos,
                        ParseError::InvalidResourceMeta(other),
                    ));
                }
            };
            Event::Meta(meta)
        }
        other => {
            return Err(ReaderError::parse(
                kind_pos,
                ParseError::UnknownResourceEvent(other),
            ));
        }
    };
    Ok(TrackEvent { delta_time, event })
}
