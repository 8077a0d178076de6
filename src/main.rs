// main.rs
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use futures::executor::block_on;
use tracing_subscriber::EnvFilter;

use fretboard_synth::signal_chain::reverb::IMPULSE_SECONDS;
use fretboard_synth::{CpalBackend, GuitarEngine, ScheduledEvent, SettingsUpdate};

#[derive(Parser)]
#[command(name = "fretboard-synth", about = "Plays guitar notes, scales and chords")]
struct Args {
    /// Master volume, 0..=1
    #[arg(long, global = true)]
    volume: Option<f32>,

    /// Beats per minute for scales
    #[arg(long, global = true)]
    tempo: Option<f32>,

    /// Reverb wet level, 0..=1
    #[arg(long, global = true)]
    reverb: Option<f32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play a single note, e.g. "A4"
    Note {
        name: String,
        /// Seconds; defaults to the configured note length
        #[arg(long)]
        duration: Option<f32>,
    },
    /// Play notes one beat apart
    Scale {
        #[arg(required = true)]
        notes: Vec<String>,
        #[arg(long)]
        descending: bool,
    },
    /// Voice chord tones and strum them
    Chord {
        #[arg(required = true)]
        tones: Vec<String>,
        #[arg(long)]
        arpeggiate: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut update = SettingsUpdate::new();
    update.volume = args.volume;
    update.tempo = args.tempo;
    update.reverb_amount = args.reverb;

    let mut engine = GuitarEngine::new(CpalBackend);
    engine.update_settings(&update);

    let events: Vec<ScheduledEvent> = block_on(async {
        match &args.command {
            Command::Note { name, duration } => {
                engine.play_note(name, *duration).await.map(|event| vec![event])
            }
            Command::Scale { notes, descending } => engine.play_scale(notes, !descending).await,
            Command::Chord { tones, arpeggiate } => engine.play_chord(tones, *arpeggiate).await,
        }
    })
    .context("failed to start audio output")?;

    for event in &events {
        log::info!(
            "{} at {:.3}s for {:.2}s ({:.2} Hz)",
            event.note,
            event.start_time,
            event.duration,
            event.frequency
        );
    }

    // Keep the stream alive until the last note and its reverb tail finish
    let end = events.iter().map(ScheduledEvent::end_time).fold(0.0, f64::max);
    let remaining = end - engine.current_time() + IMPULSE_SECONDS as f64;
    if remaining > 0.0 {
        thread::sleep(Duration::from_secs_f64(remaining));
    }
    Ok(())
}
