//! midres CLI — inspect, copy, and convert MIDI files and resources.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use midres::prelude::*;

#[derive(Parser)]
#[command(
    name = "midres",
    about = "Standard MIDI file and MidiFileResource inspector and converter",
    version,
)]
struct Cli {
    /// Show debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a standard MIDI file and print a summary
    Mid { input: PathBuf },
    /// Parse a standard MIDI file and write it back out
    Midcopy { input: PathBuf, output: PathBuf },
    /// Parse a resource file and print a summary
    Mfr { input: PathBuf },
    /// Parse a resource file and write it back out
    Mfrcopy { input: PathBuf, output: PathBuf },
    /// Convert a standard MIDI file to a resource file
    Convert { input: PathBuf, output: PathBuf },
    /// Extract a standard MIDI file from a resource file
    Extract { input: PathBuf, output: PathBuf },
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Command::Mid { input } => read_midi(&input).map(|midi| print_midi(&midi)),
        Command::Midcopy { input, output } => {
            read_midi(&input).and_then(|midi| write_out(&output, &midi.encode()))
        }
        Command::Mfr { input } => read_resource(&input).map(|res| print_resource(&res)),
        Command::Mfrcopy { input, output } => read_resource(&input).and_then(|res| {
            let bytes = res.encode().context("resource cannot be re-encoded")?;
            write_out(&output, &bytes)
        }),
        Command::Convert { input, output } => read_midi(&input).and_then(|midi| {
            let resource = MidiFileResource::from_midi(&midi)
                .context("midi file cannot be converted to a resource")?;
            write_out(&output, &resource.encode()?)
        }),
        Command::Extract { input, output } => read_resource(&input)
            .and_then(|res| write_out(&output, &res.extract_midi().encode())),
    };

    if let Err(e) = result {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

fn read_midi(path: &Path) -> Result<MidiFile> {
    let bytes =
        std::fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
    MidiFile::parse(&bytes).with_context(|| format!("cannot parse {}", path.display()))
}

fn read_resource(path: &Path) -> Result<MidiFileResource> {
    let bytes =
        std::fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
    MidiFileResource::parse(&bytes).with_context(|| format!("cannot parse {}", path.display()))
}

fn write_out(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("cannot write {}", path.display()))?;
    println!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

fn print_midi(midi: &MidiFile) {
    println!(
        "format {:?}, {} ticks/qn, {:.3} seconds",
        midi.format(),
        midi.ticks_per_qn(),
        midi.duration()
    );
    for entry in midi.tempo_timesig_map() {
        println!(
            "  tick {:>8} ({:>8.3}s): {:>7.2} bpm, {}/{}",
            entry.tick, entry.time, entry.bpm, entry.numerator, entry.denominator
        );
    }
    for (i, track) in midi.tracks().iter().enumerate() {
        println!(
            "  track {i}: {:?}, {} events, {} ticks",
            track.name,
            track.events.len(),
            track.total_ticks
        );
    }
}

fn print_resource(res: &MidiFileResource) {
    println!(
        "revision {}, {} measures, final tick {}",
        res.revision, res.measures, res.final_tick
    );
    for tempo in &res.tempos {
        println!(
            "  tempo at tick {:>8} ({:>8.1}ms): {} us/qn",
            tempo.start_ticks, tempo.start_millis, tempo.tempo
        );
    }
    for sig in &res.time_sigs {
        println!(
            "  {}/{} from measure {} (tick {})",
            sig.numerator, sig.denominator, sig.measure, sig.tick
        );
    }
    for (wrapper, name) in res.tracks.iter().zip(&res.track_names) {
        println!(
            "  track {name:?} (tag {}): {} events, {} ticks",
            wrapper.tag,
            wrapper.track.events.len(),
            wrapper.track.total_ticks
        );
    }
    for chord in &res.chords {
        if chord.end == u32::MAX {
            println!("  chord {:?}: tick {}..", chord.name, chord.start);
        } else {
            println!("  chord {:?}: tick {}..={}", chord.name, chord.start, chord.end);
        }
    }
}
