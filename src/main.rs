// pglide/src/main.rs

mod audio;
mod pseg;
mod scalc;
mod srend;

use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Instant;

const DEFAULT_BLOCK_SIZES: [usize; 11] = [1, 4, 16, 64, 128, 256, 512, 1024, 2048, 4096, 16384];
const DEFAULT_IMAGE_WIDTH: u32 = 2048;
const DEFAULT_IMAGE_HEIGHT: u32 = 512;

#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
enum CliWindowType {
    Hann,
    Hamming,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
enum CliColorScheme {
    Oceanic,
    Grayscale,
    Inferno,
    Viridis,
}

/// Renders a pitch glide as spliced two-tone crossfades, one WAV per block size
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Comma-separated block sizes in samples, one output file each
    #[arg(short = 'b', long = "block-sizes", value_delimiter = ',', default_values_t = DEFAULT_BLOCK_SIZES)]
    block_sizes: Vec<usize>,

    /// Directory for the generated files (created if missing)
    #[arg(short = 'o', long = "output-dir", default_value = ".")]
    output_dir: PathBuf,

    /// Sample rate in Hz
    #[arg(short = 'r', long = "sample-rate", default_value_t = 44100)]
    sample_rate: u32,

    /// Signal duration in seconds
    #[arg(short = 'd', long = "duration", default_value_t = 5.0)]
    duration: f64,

    /// Glide start frequency in Hz
    #[arg(long = "start-freq", default_value_t = 110.0)]
    start_freq: f64,

    /// Sweep rate in Hz (frequency rises by twice this much every second)
    #[arg(long = "sweep-rate", default_value_t = 500.0)]
    sweep_rate: f64,

    /// Also save a spectrogram PNG next to each WAV
    #[arg(short = 's', long = "spectrogram")]
    spectrogram: bool,

    /// Spectrogram window function
    #[arg(short = 'w', long = "window-type", value_enum, default_value_t = CliWindowType::Hann)]
    window_type: CliWindowType,

    /// Spectrogram color scheme
    #[arg(short = 'c', long = "color-scheme", value_enum, default_value_t = CliColorScheme::Oceanic)]
    color_scheme: CliColorScheme,

    /// Spectrogram image size in WxH format
    #[arg(short = 'i', long = "image-size", default_value = "2048x512")]
    image_size: String,

    /// Spectrogram FFT size
    #[arg(short = 'f', long = "fft-size", default_value_t = 2048)]
    fft_size: usize,

    /// Spectrogram hop length in samples
    #[arg(long, default_value_t = 512)]
    hop_length: usize,

    /// Spectrogram dynamic range in dB
    #[arg(long, default_value_t = 110.0)]
    dynamic_range: f32,
}

impl From<CliWindowType> for scalc::WindowType {
    fn from(w: CliWindowType) -> Self {
        match w {
            CliWindowType::Hann => scalc::WindowType::Hann,
            CliWindowType::Hamming => scalc::WindowType::Hamming,
        }
    }
}

impl From<CliColorScheme> for srend::ColorScheme {
    fn from(c: CliColorScheme) -> Self {
        match c {
            CliColorScheme::Oceanic => srend::ColorScheme::Oceanic,
            CliColorScheme::Grayscale => srend::ColorScheme::Grayscale,
            CliColorScheme::Inferno => srend::ColorScheme::Inferno,
            CliColorScheme::Viridis => srend::ColorScheme::Viridis,
        }
    }
}

fn parse_image_size(s: &str) -> (u32, u32) {
    let parts: Vec<&str> = s.split('x').collect();
    if parts.len() != 2 {
        return (DEFAULT_IMAGE_WIDTH, DEFAULT_IMAGE_HEIGHT);
    }
    let w = parts[0].parse::<u32>().ok().filter(|&w| w > 0).unwrap_or(DEFAULT_IMAGE_WIDTH);
    let h = parts[1].parse::<u32>().ok().filter(|&h| h > 0).unwrap_or(DEFAULT_IMAGE_HEIGHT);
    (w, h)
}

/// Spectrogram settings, present only when previews are requested
#[derive(Debug, Clone)]
struct PreviewConfig {
    calc: scalc::CalcParams,
    color_scheme: srend::ColorScheme,
    width: u32,
    height: u32,
    dynamic_range: f32,
}

/// Validated settings shared by every block size in a run
#[derive(Debug, Clone)]
struct RunConfig {
    block_sizes: Vec<usize>,
    output_dir: PathBuf,
    sample_rate: u32,
    length: usize,
    chirp: pseg::ChirpParams,
    preview: Option<PreviewConfig>,
}

impl RunConfig {
    fn from_args(args: &Args) -> Result<Self, Box<dyn Error>> {
        if args.block_sizes.is_empty() {
            return Err("No block sizes given".into());
        }
        if let Some(bad) = args.block_sizes.iter().find(|&&b| b == 0) {
            return Err(format!("Invalid block size {}: must be at least 1", bad).into());
        }
        if args.sample_rate == 0 {
            return Err("Sample rate must be positive".into());
        }
        if !args.duration.is_finite() || args.duration <= 0.0 {
            return Err(format!("Invalid duration {}: must be positive", args.duration).into());
        }
        let length = (args.duration * args.sample_rate as f64).round() as usize;
        if length == 0 {
            return Err(format!("Duration {}s is shorter than one sample", args.duration).into());
        }

        let preview = if args.spectrogram {
            let (width, height) = parse_image_size(&args.image_size);
            Some(PreviewConfig {
                calc: scalc::CalcParams {
                    n_fft: args.fft_size,
                    hop_length: args.hop_length,
                    window_type: args.window_type.into(),
                },
                color_scheme: args.color_scheme.into(),
                width,
                height,
                dynamic_range: args.dynamic_range,
            })
        } else {
            None
        };

        Ok(RunConfig {
            block_sizes: args.block_sizes.clone(),
            output_dir: args.output_dir.clone(),
            sample_rate: args.sample_rate,
            length,
            chirp: pseg::ChirpParams::from_hz(args.start_freq, args.sweep_rate, args.sample_rate),
            preview,
        })
    }
}

fn output_path(dir: &Path, block_size: usize) -> PathBuf {
    dir.join(format!("block{}.wav", block_size))
}

/// Outcome of rendering one block size
#[derive(Debug)]
struct BlockReport {
    block_size: usize,
    summary: audio::WavSummary,
    error: pseg::ErrorStats,
    preview_path: Option<PathBuf>,
}

/// Synthesize, quantize and write one file, then read it back to check it
fn render_block(config: &RunConfig, block_size: usize) -> Result<BlockReport, Box<dyn Error>> {
    let mut buffer = vec![0.0f32; config.length];
    pseg::approx_pitch_glide(&mut buffer, block_size, &config.chirp)?;
    let error = pseg::approximation_error(&buffer, &config.chirp);

    let path = output_path(&config.output_dir, block_size);
    let pcm = audio::quantize(&buffer);
    audio::write_wav(&path, &pcm, config.sample_rate)?;
    let summary = audio::verify_wav(&path, config.sample_rate, config.length)?;

    let preview_path = match &config.preview {
        Some(preview) => {
            let spec_data = scalc::calculate_spectrogram(&buffer, preview.calc)?;
            let image = srend::create_spectrogram_image(
                &spec_data,
                preview.width,
                preview.height,
                preview.color_scheme,
                preview.dynamic_range,
                Some(block_size),
            );
            let png_path = PathBuf::from(format!("{}.png", path.display()));
            image.save(&png_path)?;
            Some(png_path)
        }
        None => None,
    };

    Ok(BlockReport {
        block_size,
        summary,
        error,
        preview_path,
    })
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let config = RunConfig::from_args(args)?;

    println!("Run parameters:");
    println!("  Output directory: {}", config.output_dir.display());
    println!(
        "  Signal: {} Hz, {} samples, glide from {} Hz at {} Hz/s",
        config.sample_rate,
        config.length,
        args.start_freq,
        2.0 * args.sweep_rate
    );
    println!("  Block sizes: {:?}", config.block_sizes);
    println!("--------------------------------------------------");

    std::fs::create_dir_all(&config.output_dir)?;
    let start = Instant::now();

    let pb = ProgressBar::new(config.block_sizes.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut reports = Vec::with_capacity(config.block_sizes.len());
    for &block_size in &config.block_sizes {
        pb.set_message(format!("block {}", block_size));
        let report = render_block(&config, block_size)?;
        log::info!(
            "block {}: rms error {:.6}, peak error {:.6}",
            report.block_size,
            report.error.rms,
            report.error.peak
        );
        reports.push(report);
        pb.inc(1);
    }
    pb.finish_with_message("done");

    println!();
    for report in &reports {
        println!("  {}", report.summary.to_pretty_string());
        println!(
            "    block {:>5}: rms error {:.6}, peak error {:.6}",
            report.block_size, report.error.rms, report.error.peak
        );
        if let Some(png) = &report.preview_path {
            println!("    spectrogram: {}", png.display());
        }
    }
    println!("\nWrote {} files in {:.2?}", reports.len(), start.elapsed());
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
