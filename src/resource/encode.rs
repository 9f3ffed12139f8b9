use super::{MidiFileResource, REV_MARKER, TrackWrapper};
use crate::{
    EncodeError,
    event::{ChannelMessage, Event, MetaEvent, MetaEventKind},
    writer::Writer,
};

impl MidiFileResource {
    /// Encode the resource back to bytes.
    ///
    /// Fails when a track carries an event the record format cannot store
    /// (sysex, polyphonic key pressure, or a meta event that is not tempo,
    /// time signature, text, or end-of-track).
    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        let mut w = Writer::new();
        w.write_i32_le(self.magic);
        w.write_u32_le(self.last_track_final_tick);
        w.write_u32_le(self.tracks.len() as u32);
        for wrapper in &self.tracks {
            write_track(&mut w, wrapper)?;
        }
        if self.revision != 0 {
            w.write_u32_le(REV_MARKER);
            w.write_i32_le(self.revision);
        }
        w.write_u32_le(self.final_tick);
        w.write_u32_le(self.measures);
        for v in self.reserved_ints {
            w.write_u32_le(v);
        }
        w.write_u32_le(self.final_tick_minus_one);
        for v in self.reserved_floats {
            w.write_f32_le(v);
        }
        w.write_list(&self.tempos, |w, t| {
            w.write_f32_le(t.start_millis);
            w.write_u32_le(t.start_ticks);
            w.write_i32_le(t.tempo);
        });
        w.write_list(&self.time_sigs, |w, ts| {
            w.write_i32_le(ts.measure);
            w.write_u32_le(ts.tick);
            w.write_i16_le(ts.numerator);
            w.write_i16_le(ts.denominator);
        });
        w.write_list(&self.beats, |w, b| {
            w.write_u32_le(b.tick);
            w.write_u8(u8::from(b.downbeat));
        });
        w.write_i32_le(self.reserved_zero);
        if self.revision > 1 {
            w.write_i32_le(self.revision2);
            w.write_list(&self.chords, |w, c| {
                w.write_symbol(&c.name);
                w.write_u32_le(c.start);
                w.write_u32_le(c.end);
            });
        }
        w.write_list(&self.track_names, |w, name| w.write_symbol(name));
        Ok(w.into_bytes())
    }
}

fn write_track(w: &mut Writer, wrapper: &TrackWrapper) -> Result<(), EncodeError> {
    let track = &wrapper.track;
    w.write_u8(1);
    w.write_i32_le(wrapper.tag);
    // the end-of-track event is not persisted, so it is not counted
    w.write_u32_le(track.events.len().saturating_sub(1) as u32);

    let mut strings: Vec<&str> = Vec::new();
    let mut ticks = 0u32;
    for event in &track.events {
        let (kind, d1, d2, d3) = match &event.event {
            Event::Channel(c) => {
                let status = c.status();
                let (d2, d3) = match c.message {
                    ChannelMessage::NoteOff { key, velocity }
                    | ChannelMessage::NoteOn { key, velocity } => (key, velocity),
                    ChannelMessage::Controller { controller, value } => (controller, value),
                    ChannelMessage::ProgramChange { program } => (program, 0),
                    ChannelMessage::ChannelPressure { pressure } => (pressure, 0),
                    ChannelMessage::PitchBend { bend } => (bend as u8, (bend >> 8) as u8),
                    ChannelMessage::NotePressure { .. } => {
                        return Err(EncodeError::UnhandledNotePressure);
                    }
                };
                (1, status, d2, d3)
            }
            Event::Meta(MetaEvent::Tempo(tempo)) => {
                (2, (tempo >> 16) as u8, *tempo as u8, (tempo >> 8) as u8)
            }
            Event::Meta(MetaEvent::TimeSignature(ts)) => {
                (4, ts.numerator, ts.literal_denominator() as u8, 0)
            }
            Event::Meta(MetaEvent::EndOfTrack) => continue,
            Event::Meta(meta) => match meta.text() {
                Some(text) if meta.kind() as u8 <= MetaEventKind::CuePoint as u8 => {
                    let index = strings.len() as u16;
                    strings.push(text);
                    (8, meta.kind().into(), index as u8, (index >> 8) as u8)
                }
                _ => return Err(EncodeError::UnhandledMeta(meta.kind())),
            },
            Event::Sysex(_) => return Err(EncodeError::UnhandledSysex),
        };
        ticks = ticks.wrapping_add(event.delta_time);
        w.write_u32_le(ticks);
        w.write_u8(kind);
        w.write_u8(d1);
        w.write_u8(d2);
        w.write_u8(d3);
    }
    w.write_list(&strings, |w, s| w.write_symbol(s));
    Ok(())
}
