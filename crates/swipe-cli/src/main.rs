//! Command-line front end for the SWIPE' pitch estimator.
//!
//! This binary is the thin, replaceable shell the core never depends on:
//! WAV decoding, argument parsing, batch-file iteration, and output
//! formatting all live here, grounded in the same clap/hound/anyhow
//! combination the rest of the corpus reaches for when it needs a
//! signal-processing CLI.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;

use swipe_dsp::hz_to_mel;
use swipe_pitch::{estimate_pitch, PitchFrame, SwipeConfig};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// SWIPE' (prime-harmonics) monophonic pitch tracker.
#[derive(Parser, Debug)]
#[command(name = "swipe", disable_version_flag = true)]
struct Cli {
    /// Input WAV file (reads stdin if omitted)
    #[arg(short = 'i')]
    input: Option<PathBuf>,

    /// Output text file (writes stdout if omitted)
    #[arg(short = 'o')]
    output: Option<PathBuf>,

    /// Batch mode: a file with one `INPUT OUTPUT` pair per line
    #[arg(short = 'b')]
    batch: Option<PathBuf>,

    /// Pitch range in Hz, "MIN:MAX"
    #[arg(short = 'r', default_value = "100:600")]
    range: String,

    /// Strength threshold in [0, 1]
    #[arg(short = 's', default_value_t = 0.300)]
    strength: f64,

    /// Output timestep in seconds, >= 0.001
    #[arg(short = 't', default_value_t = 0.001)]
    dt: f64,

    /// Emit pitch on the Mel scale instead of Hz
    #[arg(short = 'm')]
    mel: bool,

    /// Don't output voiceless frames (otherwise printed as "NaN")
    #[arg(short = 'n')]
    no_voiceless: bool,

    /// Print version and exit
    #[arg(short = 'v', long = "version")]
    version: bool,
}

fn main() {
    env_logger::init();
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(
            e.kind(),
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        ) => {
            print!("{e}");
            std::process::exit(0);
        }
        Err(e) => {
            // `clap`'s own `Error::exit()` uses code 2 for usage errors;
            // spec.md's CLI contract wants every invalid-argument path
            // (not just the hand-validated `-r`/`-s`/`-t` ones) to exit 1.
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    if cli.version {
        println!("swipe {VERSION}");
        return;
    }

    if let Err(e) = run(cli) {
        eprintln!("swipe: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let (min_hz, max_hz) = parse_range(&cli.range)?;
    if min_hz < 1.0 {
        bail!("min pitch {min_hz} Hz is below the 1 Hz floor");
    }
    if max_hz - min_hz < 1.0 {
        bail!("pitch range [{min_hz}, {max_hz}] is too narrow (need at least 1 Hz of span)");
    }

    let strength = if (0.0..=1.0).contains(&cli.strength) {
        cli.strength
    } else {
        log::warn!("strength threshold {} out of [0, 1]; using default 0.300", cli.strength);
        0.300
    };
    let dt = if cli.dt >= 0.001 {
        cli.dt
    } else {
        log::warn!("timestep {} s below 1 ms floor; using default 0.001", cli.dt);
        0.001
    };

    let config = SwipeConfig {
        min_hz,
        max_hz,
        strength_threshold: strength,
        dt,
        ..Default::default()
    };

    if let Some(batch_file) = &cli.batch {
        run_batch(batch_file, &config, cli.mel, cli.no_voiceless)
    } else {
        process_one(cli.input.as_deref(), cli.output.as_deref(), &config, cli.mel, cli.no_voiceless)
    }
}

fn parse_range(range: &str) -> Result<(f64, f64)> {
    let (min_str, max_str) = range
        .split_once(':')
        .ok_or_else(|| anyhow!("pitch range \"{range}\" must be \"MIN:MAX\""))?;
    let min = min_str.trim().parse::<f64>().context("invalid MIN in pitch range")?;
    let max = max_str.trim().parse::<f64>().context("invalid MAX in pitch range")?;
    Ok((min, max))
}

fn run_batch(batch_file: &Path, config: &SwipeConfig, mel: bool, no_voiceless: bool) -> Result<()> {
    let file = File::open(batch_file).with_context(|| format!("opening batch file {}", batch_file.display()))?;
    for line in BufReader::new(file).lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut parts = line.split_whitespace();
        let input = parts.next().ok_or_else(|| anyhow!("malformed batch line: \"{line}\""))?;
        let output = parts.next().ok_or_else(|| anyhow!("malformed batch line: \"{line}\""))?;
        process_one(Some(Path::new(input)), Some(Path::new(output)), config, mel, no_voiceless)?;
    }
    Ok(())
}

fn process_one(
    input: Option<&Path>,
    output: Option<&Path>,
    config: &SwipeConfig,
    mel: bool,
    no_voiceless: bool,
) -> Result<()> {
    let (signal, sample_rate) = read_signal(input)?;
    if signal.is_empty() {
        bail!("input audio is empty");
    }

    let frames = estimate_pitch(&signal, sample_rate, config).context("pitch estimation failed")?;
    write_frames(output, &frames, mel, no_voiceless)
}

fn read_signal(input: Option<&Path>) -> Result<(Vec<f64>, f64)> {
    let reader = match input {
        Some(path) => hound::WavReader::open(path).with_context(|| format!("opening {}", path.display()))?,
        None => hound::WavReader::new(io::stdin().lock()).context("reading WAV from stdin")?,
    };

    let spec = reader.spec();
    let sample_rate = spec.sample_rate as f64;
    let channels = spec.channels as usize;
    if channels == 0 {
        bail!("WAV file declares zero channels");
    }

    let samples: Vec<f64> = match spec.sample_format {
        hound::SampleFormat::Float => reader.into_samples::<f32>().map(|s| s.unwrap_or(0.0) as f64).collect(),
        hound::SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f64;
            reader.into_samples::<i32>().map(|s| s.unwrap_or(0) as f64 / max_val).collect()
        }
    };

    let mono: Vec<f64> = if channels == 1 {
        samples
    } else {
        samples
            .chunks(channels)
            .map(|chunk| chunk.iter().sum::<f64>() / channels as f64)
            .collect()
    };

    Ok((mono, sample_rate))
}

fn write_frames(output: Option<&Path>, frames: &[PitchFrame], mel: bool, no_voiceless: bool) -> Result<()> {
    let mut sink: Box<dyn Write> = match output {
        Some(path) => Box::new(File::create(path).with_context(|| format!("creating {}", path.display()))?),
        None => Box::new(io::stdout().lock()),
    };

    for frame in frames {
        match frame.hz {
            Some(hz) => {
                let pitch = if mel { hz_to_mel(hz) } else { hz };
                writeln!(sink, "{:.7} {:.4}", frame.time, pitch)?;
            }
            None => {
                if !no_voiceless {
                    writeln!(sink, "{:.7} {}", frame.time, "NaN")?;
                }
            }
        }
    }
    Ok(())
}
