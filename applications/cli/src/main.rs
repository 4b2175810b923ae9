/// quietcut - shorten pauses and clean up recorded speech
use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use quietcut_audio::encode::FfmpegBackend;
use quietcut_audio::pipeline;
use quietcut_cli::{analyze, decode_file, AppConfig, ProgressLogger, RegionReport};
use quietcut_core::{OutputFormat, DEFAULT_MP3_BITRATE};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "quietcut=info,quietcut_cli=info,quietcut_audio=info";
const VERBOSE_FILTER: &str = "quietcut=debug,quietcut_cli=debug,quietcut_audio=debug";

#[derive(Parser)]
#[command(name = "quietcut")]
#[command(about = "Silence removal and voice enhancement for recorded speech", long_about = None)]
struct Cli {
    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process an audio file and write the result
    Process(ProcessArgs),
    /// Print the noise floor and region layout of a file as JSON
    Analyze {
        /// Input audio file
        input: PathBuf,
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Silence threshold in dBFS
        #[arg(long, allow_negative_numbers = true)]
        threshold_db: Option<f32>,
    },
}

#[derive(Args)]
struct ProcessArgs {
    /// Input audio file
    input: PathBuf,
    /// Output file
    #[arg(short, long)]
    output: PathBuf,
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Fraction of each long pause to remove (0 to 1)
    #[arg(long)]
    remove_ratio: Option<f32>,
    /// Silence threshold in dBFS
    #[arg(long, allow_negative_numbers = true)]
    threshold_db: Option<f32>,
    /// Derive the threshold from the noise floor
    #[arg(long)]
    auto_threshold: bool,
    /// Shortest pause (seconds) that gets shortened
    #[arg(long)]
    min_silence: Option<f64>,
    /// Seconds of each pause kept next to speech
    #[arg(long)]
    padding: Option<f64>,
    /// Skip silence removal
    #[arg(long)]
    no_silence: bool,
    /// Run the voice enhancement chain
    #[arg(long)]
    enhance: bool,
    /// Enhance with the aggressive gate (implies --enhance)
    #[arg(long)]
    aggressive: bool,
    /// Output container
    #[arg(long, value_enum)]
    format: Option<FormatArg>,
    /// MP3 bitrate in kbps
    #[arg(long)]
    bitrate: Option<u32>,
    /// Write the region layout as JSON to this path
    #[arg(long)]
    regions: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Wav,
    Mp3,
}

impl ProcessArgs {
    /// Layer command-line flags over the loaded configuration
    fn apply(&self, config: &mut AppConfig) {
        if let Some(ratio) = self.remove_ratio {
            config.silence.remove_ratio = ratio;
        }
        if let Some(threshold) = self.threshold_db {
            config.silence.threshold_db = threshold;
        }
        if self.auto_threshold {
            config.silence.auto_threshold = true;
        }
        if let Some(seconds) = self.min_silence {
            config.silence.min_silence_duration = seconds;
        }
        if let Some(seconds) = self.padding {
            config.silence.padding_duration = seconds;
        }
        if self.no_silence {
            config.stages.silence = false;
        }
        if self.enhance || self.aggressive {
            config.stages.enhance = true;
        }
        if self.aggressive {
            config.enhance.aggressive_gate = true;
        }

        let configured_bitrate = match config.output {
            OutputFormat::Mp3 { bitrate_kbps } => Some(bitrate_kbps),
            OutputFormat::Wav => None,
        };
        config.output = match self.format {
            Some(FormatArg::Wav) => OutputFormat::Wav,
            Some(FormatArg::Mp3) => OutputFormat::Mp3 {
                bitrate_kbps: self
                    .bitrate
                    .or(configured_bitrate)
                    .unwrap_or(DEFAULT_MP3_BITRATE),
            },
            None => match (config.output, self.bitrate) {
                (OutputFormat::Mp3 { .. }, Some(bitrate_kbps)) => {
                    OutputFormat::Mp3 { bitrate_kbps }
                }
                (current, _) => current,
            },
        };
        if self.bitrate.is_some() && config.output == OutputFormat::Wav {
            warn!("--bitrate has no effect on WAV output");
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose {
        VERBOSE_FILTER
    } else {
        DEFAULT_FILTER
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Process(args) => process_file(&args),
        Commands::Analyze {
            input,
            config,
            threshold_db,
        } => analyze_file(&input, config.as_deref(), threshold_db),
    }
}

fn process_file(args: &ProcessArgs) -> anyhow::Result<()> {
    let mut config =
        AppConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    args.apply(&mut config);
    config.validate().context("Invalid command-line options")?;
    let options = config.process_options()?;

    let buffer = decode_file(&args.input)
        .with_context(|| format!("Failed to decode {}", args.input.display()))?;
    let input_frames = buffer.frames();
    let sample_rate = buffer.sample_rate();
    info!(
        input = %args.input.display(),
        channels = buffer.channel_count(),
        sample_rate,
        seconds = buffer.duration_secs(),
        "Loaded input"
    );

    let backend = FfmpegBackend::new(config.encoder.ffmpeg_path.clone());
    let mut progress = ProgressLogger::new();
    let output = pipeline::process(buffer, &options, &backend, &mut progress)
        .context("Processing failed")?;

    let extension = output.encoded.mime.extension();
    if args.output.extension().and_then(|e| e.to_str()) != Some(extension) {
        warn!(
            output = %args.output.display(),
            expected = extension,
            "Output extension does not match encoded format"
        );
    }
    std::fs::write(&args.output, &output.encoded.bytes)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    if let Some(path) = &args.regions {
        RegionReport::from_run(input_frames, sample_rate, &output)
            .write(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    info!(
        output = %args.output.display(),
        mime = output.encoded.mime.as_str(),
        bytes = output.encoded.bytes.len(),
        removed_secs = output.removed_frames as f64 / f64::from(sample_rate),
        "Done"
    );
    Ok(())
}

fn analyze_file(
    input: &Path,
    config: Option<&Path>,
    threshold_db: Option<f32>,
) -> anyhow::Result<()> {
    let config = AppConfig::load(config).context("Failed to load configuration")?;
    let buffer = decode_file(input)
        .with_context(|| format!("Failed to decode {}", input.display()))?;

    let report = analyze(&buffer, &config.silence, threshold_db)
        .context("Invalid analysis options")?;
    println!("{}", report.to_json()?);
    Ok(())
}
