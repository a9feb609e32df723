//! Command-line front end: render scores to features, batch a directory,
//! inspect stored feature arrays.

use cadenza::export::read_npy;
use cadenza::prelude::*;
use cadenza::core::{DEFAULT_HOP_LENGTH, DEFAULT_N_FFT, DEFAULT_N_MELS, DEFAULT_SAMPLE_RATE, DEFAULT_TOP_DB, DEFAULT_WIN_LENGTH};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// MIDI to spectrogram feature extraction
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render one score and compute its features
    Render(RenderCommand),

    /// Process many scores in parallel
    Batch(BatchCommand),

    /// Print shape and value range of a stored feature array
    Inspect(InspectCommand),
}

#[derive(Args, Debug)]
struct RenderCommand {
    /// SoundFont 2 sample bank
    #[arg(short, long)]
    soundfont: PathBuf,

    /// Standard MIDI File to render
    #[arg(short, long)]
    input: PathBuf,

    /// Write the rendered waveform here
    #[arg(long)]
    wav: Option<PathBuf>,

    /// Write the feature array (.npy) here
    #[arg(long)]
    features: Option<PathBuf>,

    /// Seconds rendered after the last event
    #[arg(long, default_value_t = 0.0)]
    tail: f64,

    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(Args, Debug)]
struct BatchCommand {
    /// SoundFont 2 sample bank
    #[arg(short, long)]
    soundfont: PathBuf,

    /// Directory for <stem>.wav and <stem>.npy outputs
    #[arg(short, long)]
    out_dir: PathBuf,

    /// Worker threads (default: one per core)
    #[arg(short, long)]
    threads: Option<usize>,

    /// Skip writing waveforms
    #[arg(long)]
    no_wav: bool,

    /// Scores to process
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(Args, Debug)]
struct InspectCommand {
    /// Feature array written by `render` or `batch`
    path: PathBuf,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[arg(long, default_value_t = DEFAULT_SAMPLE_RATE)]
    sample_rate: u32,

    #[arg(long, default_value_t = DEFAULT_N_FFT)]
    n_fft: usize,

    #[arg(long, default_value_t = DEFAULT_HOP_LENGTH)]
    hop_length: usize,

    #[arg(long, default_value_t = DEFAULT_WIN_LENGTH)]
    win_length: usize,

    #[arg(long, default_value_t = DEFAULT_N_MELS)]
    n_mels: usize,

    /// Linear-frequency magnitude instead of mel power
    #[arg(long)]
    linear: bool,

    /// Keep raw power/magnitude instead of dB
    #[arg(long)]
    no_log: bool,

    /// Dynamic range of dB output
    #[arg(long, default_value_t = DEFAULT_TOP_DB)]
    top_db: f32,
}

impl ConfigArgs {
    fn build(&self) -> Result<AudioConfig> {
        Ok(AudioConfig::builder()
            .sample_rate(self.sample_rate)
            .n_fft(self.n_fft)
            .hop_length(self.hop_length)
            .win_length(self.win_length)
            .n_mels(self.n_mels)
            .use_mel(!self.linear)
            .log_scale(!self.no_log)
            .top_db(self.top_db)
            .build()?)
    }
}

fn render(cmd: RenderCommand) -> Result<()> {
    let config = cmd.config.build()?;
    let mut pipeline = FeaturePipeline::new(&cmd.soundfont, config)?
        .with_render_settings(RenderSettings::default().tail_seconds(cmd.tail));

    let output = pipeline.process_detailed(&cmd.input, cmd.wav.as_deref(), cmd.features.as_deref())?;
    let (bins, frames) = output.features.shape();
    println!("{}: {} x {}", cmd.input.display(), bins, frames);
    for warning in &output.warnings {
        eprintln!("warning: {}", warning);
    }
    Ok(())
}

fn batch(cmd: BatchCommand) -> Result<bool> {
    let config = cmd.config.build()?;
    let mut processor = BatchProcessor::new(&cmd.soundfont, config)?;
    if let Some(threads) = cmd.threads {
        processor = processor.threads(threads);
    }

    std::fs::create_dir_all(&cmd.out_dir).map_err(cadenza::export::ExportError::from)?;

    let jobs: Vec<BatchJob> = cmd
        .inputs
        .iter()
        .map(|input| {
            let mut job = BatchJob::for_score(input, &cmd.out_dir);
            if cmd.no_wav {
                job.wave = None;
            }
            job
        })
        .collect();

    let mut all_ok = true;
    for result in processor.run(&jobs) {
        match result.outcome {
            Ok(summary) => {
                println!("{}: {} x {}", result.score.display(), summary.shape.0, summary.shape.1);
                for warning in &summary.warnings {
                    eprintln!("warning: {}", warning);
                }
            }
            Err(e) => {
                all_ok = false;
                eprintln!("{}: error: {}", result.score.display(), e);
            }
        }
    }
    Ok(all_ok)
}

fn inspect(cmd: InspectCommand) -> Result<()> {
    let map = read_npy(&cmd.path)?;
    let (bins, frames) = map.shape();
    println!("{}", cmd.path.display());
    println!("  shape: ({}, {})", bins, frames);
    if let Some(stats) = map.stats() {
        println!("  min:   {:.4}", stats.min);
        println!("  max:   {:.4}", stats.max);
        println!("  mean:  {:.4}", stats.mean);
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Render(cmd) => render(cmd).map(|_| true),
        Commands::Batch(cmd) => batch(cmd),
        Commands::Inspect(cmd) => inspect(cmd).map(|_| true),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {} ({:?})", e, e.kind());
            ExitCode::FAILURE
        }
    }
}
