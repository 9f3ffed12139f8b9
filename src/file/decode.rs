use super::{MidiFile, MidiFormat, MidiTrack};
use crate::{
    ParseError,
    event::{
        ChannelEvent, ChannelMessage, Event, KeySignature, MetaEvent, MetaEventKind, SmpteOffset,
        SysexEvent, TimeSignature, TrackEvent,
    },
    reader::{ReadResult, Reader, ReaderError},
};

pub(super) const MTHD: u32 = 0x4D54_6864;
pub(super) const MTRK: u32 = 0x4D54_726B;
pub(super) const HEADER_SIZE: u32 = 6;

impl MidiFile {
    /// Decode a standard MIDI file from a byte buffer.
    ///
    /// The tempo/time-signature timeline and duration are derived as part of
    /// construction. Any malformed, truncated, or unrecognized construct is
    /// a fatal error; there is no partial result.
    pub fn parse(bytes: &[u8]) -> ReadResult<Self> {
        let mut reader = Reader::new(bytes);
        if reader.read_u32_be()? != MTHD || reader.read_u32_be()? != HEADER_SIZE {
            return Err(ReaderError::parse(0, ParseError::BadFileHeader));
        }
        let format_pos = reader.position();
        let format_raw = reader.read_u16_be()?;
        let format = MidiFormat::try_from(format_raw)
            .map_err(|_| ReaderError::parse(format_pos, ParseError::UnsupportedFormat(format_raw)))?;
        let num_tracks = reader.read_u16_be()?;
        let tick_pos = reader.position();
        let ticks_per_qn = reader.read_u16_be()?;
        if ticks_per_qn & 0x8000 != 0 {
            return Err(ReaderError::parse(tick_pos, ParseError::SmpteTiming));
        }

        let mut tracks = Vec::with_capacity(num_tracks.into());
        for _ in 0..num_tracks {
            tracks.push(read_track(&mut reader)?);
        }
        log::debug!(
            "decoded SMF: format {format_raw}, {num_tracks} tracks, {ticks_per_qn} ticks/qn"
        );
        Ok(MidiFile::new(format, tracks, ticks_per_qn))
    }
}

fn read_track(reader: &mut Reader<'_>) -> ReadResult<MidiTrack> {
    let tag_pos = reader.position();
    if reader.read_u32_be()? != MTRK {
        return Err(ReaderError::parse(tag_pos, ParseError::BadTrackHeader));
    }
    let track_length = reader.read_u32_be()? as usize;
    let track_end = reader.position() + track_length;

    let mut name = String::new();
    let mut total_ticks = 0u64;
    let mut events = Vec::new();
    let mut running_status = 0u8;
    // The declared length only bounds the loop; events are consumed until
    // the byte count is reached, not counted.
    while reader.position() < track_end {
        let event = read_event(reader, &mut running_status)?;
        if name.is_empty()
            && let Event::Meta(MetaEvent::TrackName(track_name)) = &event.event
        {
            name = track_name.clone();
        }
        total_ticks += u64::from(event.delta_time);
        events.push(event);
    }
    Ok(MidiTrack {
        name,
        total_ticks,
        events,
    })
}

fn read_event(reader: &mut Reader<'_>, running_status: &mut u8) -> ReadResult<TrackEvent> {
    let delta_time = reader.read_varint()?;
    let status_pos = reader.position();
    let mut status = reader.peek_u8()?;
    // true if we expected to use running status but a status byte was
    // provided anyway
    let mut force_status = false;
    if status < 0x80 {
        // running status: the peeked byte is data, not consumed here
        status = *running_status;
        if status < 0x80 {
            return Err(ReaderError::parse(
                status_pos,
                ParseError::BadRunningStatus(status),
            ));
        }
    } else {
        reader.read_u8()?;
        force_status = *running_status == status;
        if status < 0xF0 {
            // meta and sysex markers never update running status
            *running_status = status;
        }
    }

    let channel = status & 0x0F;
    let message = match status & 0xF0 {
        0x80 => ChannelMessage::NoteOff {
            key: reader.read_u8()?,
            velocity: reader.read_u8()?,
        },
        0x90 => ChannelMessage::NoteOn {
            key: reader.read_u8()?,
            velocity: reader.read_u8()?,
        },
        0xA0 => ChannelMessage::NotePressure {
            key: reader.read_u8()?,
            pressure: reader.read_u8()?,
        },
        0xB0 => ChannelMessage::Controller {
            controller: reader.read_u8()?,
            value: reader.read_u8()?,
        },
        0xC0 => ChannelMessage::ProgramChange {
            program: reader.read_u8()?,
        },
        0xD0 => ChannelMessage::ChannelPressure {
            pressure: reader.read_u8()?,
        },
        0xE0 => ChannelMessage::PitchBend {
            bend: reader.read_u16_be()?,
        },
        _ => {
            let event = if status == 0xFF {
                Event::Meta(read_meta(reader)?)
            } else {
                Event::Sysex(read_sysex(reader, status)?)
            };
            return Ok(TrackEvent { delta_time, event });
        }
    };
    Ok(TrackEvent {
        delta_time,
        event: Event::Channel(ChannelEvent {
            channel,
            force_status,
            message,
        }),
    })
}

fn expect_len(kind: MetaEventKind, expected: u32, found: u32, pos: usize) -> ReadResult<()> {
    if expected == found {
        Ok(())
    } else {
        Err(ReaderError::parse(
            pos,
            ParseError::MetaEventLength {
                kind,
                expected,
                found,
            },
        ))
    }
}

fn read_meta(reader: &mut Reader<'_>) -> ReadResult<MetaEvent> {
    let kind_pos = reader.position();
    let kind_byte = reader.read_u8()?;
    let kind = MetaEventKind::try_from(kind_byte)
        .map_err(|_| ReaderError::parse(kind_pos, ParseError::UnknownMetaEvent(kind_byte)))?;
    let length = reader.read_varint()?;
    let length_pos = reader.position();

    use MetaEventKind as K;
    let meta = match kind {
        K::SequenceNumber => {
            expect_len(kind, 2, length, length_pos)?;
            MetaEvent::SequenceNumber(reader.read_u16_be()?)
        }
        K::Text => MetaEvent::Text(reader.read_str(length as usize)?),
        K::CopyrightNotice => MetaEvent::CopyrightNotice(reader.read_str(length as usize)?),
        K::TrackName => MetaEvent::TrackName(reader.read_str(length as usize)?),
        K::InstrumentName => MetaEvent::InstrumentName(reader.read_str(length as usize)?),
        K::Lyric => MetaEvent::Lyric(reader.read_str(length as usize)?),
        K::Marker => MetaEvent::Marker(reader.read_str(length as usize)?),
        K::CuePoint => MetaEvent::CuePoint(reader.read_str(length as usize)?),
        K::ProgramName => MetaEvent::ProgramName(reader.read_str(length as usize)?),
        K::DeviceName => MetaEvent::DeviceName(reader.read_str(length as usize)?),
        K::ChannelPrefix => {
            expect_len(kind, 1, length, length_pos)?;
            MetaEvent::ChannelPrefix(reader.read_u8()?)
        }
        K::Port => {
            expect_len(kind, 1, length, length_pos)?;
            MetaEvent::Port(reader.read_u8()?)
        }
        K::EndOfTrack => {
            expect_len(kind, 0, length, length_pos)?;
            MetaEvent::EndOfTrack
        }
        K::Tempo => {
            expect_len(kind, 3, length, length_pos)?;
            MetaEvent::Tempo(reader.read_u24_be()?)
        }
        K::SmpteOffset => {
            expect_len(kind, 5, length, length_pos)?;
            let [hour, minute, second, frame, frame_hundredths] =
                reader.read_bytes(5)?.try_into().unwrap();
            MetaEvent::SmpteOffset(SmpteOffset {
                hour,
                minute,
                second,
                frame,
                frame_hundredths,
            })
        }
        K::TimeSignature => {
            expect_len(kind, 4, length, length_pos)?;
            let [numerator, denominator, clocks_per_tick, thirtysecond_notes_per_24_clocks] =
                reader.read_bytes(4)?.try_into().unwrap();
            MetaEvent::TimeSignature(TimeSignature {
                numerator,
                denominator,
                clocks_per_tick,
                thirtysecond_notes_per_24_clocks,
            })
        }
        K::KeySignature => {
            expect_len(kind, 2, length, length_pos)?;
            let [sharps, tonality] = reader.read_bytes(2)?.try_into().unwrap();
            MetaEvent::KeySignature(KeySignature { sharps, tonality })
        }
        K::SequencerSpecific => {
            MetaEvent::SequencerSpecific(reader.read_bytes(length as usize)?.to_vec())
        }
    };
    Ok(meta)
}

fn read_sysex(reader: &mut Reader<'_>, status: u8) -> ReadResult<SysexEvent> {
    let length = reader.read_varint()? as usize;
    let payload = reader.read_bytes(length)?;
    let data = if status == 0xF0 {
        // keep the start-of-exclusive marker so re-encoding reproduces it
        let mut data = Vec::with_capacity(length + 1);
        data.push(0xF0);
        data.extend_from_slice(payload);
        data
    } else {
        payload.to_vec()
    };
    Ok(SysexEvent { data })
}
