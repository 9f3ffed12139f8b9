#![doc = r#"
Codecs for standard MIDI files and the proprietary `MidiFileResource`
format, plus two-way conversion between them.

# Decoding a standard MIDI file

```no_run
use midres::prelude::*;

# fn main() -> Result<(), Box<dyn std::error::Error>> {
let bytes = std::fs::read("song.mid")?;
let midi = MidiFile::parse(&bytes)?;

println!("{} tracks, {:.3} seconds", midi.tracks().len(), midi.duration());
for entry in midi.tempo_timesig_map() {
    println!(
        "tick {:>8}: {:.2} bpm, {}/{}",
        entry.tick, entry.bpm, entry.numerator, entry.denominator
    );
}
# Ok(())
# }
```

[`MidiFile::parse`] keeps everything it reads, including redundant status
bytes and the system-exclusive framing, so [`MidiFile::encode`] reproduces
an accepted input byte for byte.

# Converting to and from the resource format

```no_run
use midres::prelude::*;

# fn main() -> Result<(), Box<dyn std::error::Error>> {
let midi = MidiFile::parse(&std::fs::read("song.mid")?)?;
let resource = MidiFileResource::from_midi(&midi)?;
std::fs::write("song.mfr", resource.encode()?)?;
# Ok(())
# }
```

The resource format is narrower than standard MIDI: it requires 480 ticks
per quarter note and cannot represent system-exclusive data, polyphonic key
pressure, or most meta events. Conversion reports these as [`EncodeError`]s
instead of dropping data silently.

# Feature flags

- `serde`: `Serialize`/`Deserialize` implementations for the event and
  resource models.
"#]

mod convert;
mod error;
mod event;
mod file;
mod reader;
mod resource;
mod writer;

pub use convert::{CHORD_TRACK_NAME, RESOURCE_TICKS_PER_QN, SAMPLE_TRACK_NAME};
pub use error::{EncodeError, ParseError};
pub use event::{
    ChannelEvent, ChannelMessage, Event, KeySignature, MetaEvent, MetaEventKind, SmpteOffset,
    SysexEvent, TimeSignature, TrackEvent,
};
pub use file::{
    DEFAULT_MICROS_PER_QN, MidiFile, MidiFormat, MidiTrack, TempoTimesigEvent,
};
pub use reader::{ReadResult, Reader, ReaderError, ReaderErrorKind};
pub use resource::{Beat, Chord, MidiFileResource, Tempo, TimeSig, TrackWrapper};
pub use writer::Writer;

/// Common imports for working with both formats.
pub mod prelude {
    pub use crate::{
        ChannelEvent, ChannelMessage, EncodeError, Event, MetaEvent, MetaEventKind, MidiFile,
        MidiFileResource, MidiFormat, MidiTrack, ParseError, ReaderError, TempoTimesigEvent,
        TrackEvent,
    };
}
