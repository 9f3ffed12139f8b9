use super::MidiFile;
use super::decode::{HEADER_SIZE, MTHD, MTRK};
use crate::{
    event::{ChannelMessage, Event, MetaEvent, TrackEvent},
    writer::Writer,
};

impl MidiFile {
    /// Encode the model back to standard MIDI file bytes.
    ///
    /// Channel messages use running status, except where an event's
    /// `force_status` flag records that the input spelled the status byte
    /// out redundantly; those are re-emitted verbatim so that re-encoding a
    /// decoded file reproduces it byte for byte.
    pub fn encode(&self) -> Vec<u8> {
        let mut w = Writer::new();
        w.write_u32_be(MTHD);
        w.write_u32_be(HEADER_SIZE);
        w.write_u16_be(self.format().into());
        w.write_u16_be(self.tracks().len() as u16);
        w.write_u16_be(self.ticks_per_qn());
        for track in self.tracks() {
            w.write_u32_be(MTRK);
            // serialize to a scratch buffer first to learn the track length
            let mut scratch = Writer::new();
            let mut running_status = 0u8;
            for event in &track.events {
                write_event(&mut scratch, event, &mut running_status);
            }
            let track_data = scratch.into_bytes();
            w.write_u32_be(track_data.len() as u32);
            w.write_bytes(&track_data);
        }
        w.into_bytes()
    }
}

fn write_event(w: &mut Writer, event: &TrackEvent, running_status: &mut u8) {
    w.write_varint(event.delta_time);
    match &event.event {
        Event::Channel(c) => {
            let status = c.status();
            if status != *running_status || c.force_status {
                w.write_u8(status);
                *running_status = status;
            }
            match c.message {
                ChannelMessage::NoteOff { key, velocity }
                | ChannelMessage::NoteOn { key, velocity } => {
                    w.write_u8(key);
                    w.write_u8(velocity);
                }
                ChannelMessage::NotePressure { key, pressure } => {
                    w.write_u8(key);
                    w.write_u8(pressure);
                }
                ChannelMessage::Controller { controller, value } => {
                    w.write_u8(controller);
                    w.write_u8(value);
                }
                ChannelMessage::ProgramChange { program } => w.write_u8(program),
                ChannelMessage::ChannelPressure { pressure } => w.write_u8(pressure),
                ChannelMessage::PitchBend { bend } => w.write_u16_be(bend),
            }
        }
        Event::Meta(meta) => {
            w.write_u8(0xFF);
            w.write_u8(meta.kind().into());
            match meta {
                MetaEvent::SequenceNumber(n) => {
                    w.write_varint(2);
                    w.write_u16_be(*n);
                }
                MetaEvent::Text(text)
                | MetaEvent::CopyrightNotice(text)
                | MetaEvent::TrackName(text)
                | MetaEvent::InstrumentName(text)
                | MetaEvent::Lyric(text)
                | MetaEvent::Marker(text)
                | MetaEvent::CuePoint(text)
                | MetaEvent::ProgramName(text)
                | MetaEvent::DeviceName(text) => {
                    w.write_varint(text.len() as u32);
                    w.write_bytes(text.as_bytes());
                }
                MetaEvent::ChannelPrefix(channel) | MetaEvent::Port(channel) => {
                    w.write_varint(1);
                    w.write_u8(*channel);
                }
                MetaEvent::EndOfTrack => w.write_varint(0),
                MetaEvent::Tempo(micros) => {
                    w.write_varint(3);
                    w.write_u24_be(*micros);
                }
                MetaEvent::SmpteOffset(x) => {
                    w.write_varint(5);
                    w.write_bytes(&[x.hour, x.minute, x.second, x.frame, x.frame_hundredths]);
                }
                MetaEvent::TimeSignature(x) => {
                    w.write_varint(4);
                    w.write_bytes(&[
                        x.numerator,
                        x.denominator,
                        x.clocks_per_tick,
                        x.thirtysecond_notes_per_24_clocks,
                    ]);
                }
                MetaEvent::KeySignature(x) => {
                    w.write_varint(2);
                    w.write_bytes(&[x.sharps, x.tonality]);
                }
                MetaEvent::SequencerSpecific(data) => {
                    w.write_varint(data.len() as u32);
                    w.write_bytes(data);
                }
            }
        }
        Event::Sysex(sysex) => match sysex.data.split_first() {
            // the stored start-of-exclusive marker becomes the status byte
            Some((&0xF0, rest)) => {
                w.write_u8(0xF0);
                w.write_varint(rest.len() as u32);
                w.write_bytes(rest);
            }
            _ => {
                w.write_u8(0xF7);
                w.write_varint(sysex.data.len() as u32);
                w.write_bytes(&sysex.data);
            }
        },
    }
}
