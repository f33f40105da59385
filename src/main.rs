//! rawplay CLI - inspect and export YUV4MPEG2 raw video

use clap::{Parser, Subcommand};
use rawplay_lib::convert::CpuConverter;
use rawplay_lib::util::Buffer;
use rawplay_lib::y4m;
use rawplay_lib::{Config, init};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "rawplay")]
#[command(about = "Inspect and export YUV4MPEG2 raw video", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Number of threads to use
    #[arg(short = 't', long)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about a y4m file
    Info {
        /// Input file path
        input: PathBuf,
    },

    /// Convert one frame to a PNG image
    Dump {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,

        /// Frame index to convert
        #[arg(short, long, default_value_t = 0)]
        frame: usize,

        /// Output PNG path
        #[arg(short, long)]
        output: PathBuf,

        /// Export the luma plane as a greyscale preview instead of full color
        #[arg(long)]
        grayscale: bool,

        /// Wrap the frame index modulo the frame count (looping playback)
        #[arg(long)]
        wrap: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize the library
    let config = Config {
        max_threads: cli.threads,
        verbose: cli.verbose,
        debug: cli.debug,
    };

    init(config)?;

    info!("rawplay v{}", rawplay_lib::VERSION);

    // Execute command
    match cli.command {
        Commands::Info { input } => {
            info!("Getting info for: {}", input.display());
            cmd_info(&input)?;
        }
        Commands::Dump {
            input,
            frame,
            output,
            grayscale,
            wrap,
        } => {
            info!("Dumping frame {} of {}", frame, input.display());
            cmd_dump(&input, frame, &output, grayscale, wrap)?;
        }
    }

    Ok(())
}

fn cmd_info(input: &Path) -> anyhow::Result<()> {
    let stream = load_stream(input)?;
    let header = stream.header();

    println!("File: {}", input.display());
    println!();
    println!("Format: YUV4MPEG2 ({})", header.colorspace);
    println!("Resolution: {}x{}", header.width, header.height);
    println!(
        "Frame Rate: {:.3} fps ({})",
        header.frame_rate.to_f64(),
        header.frame_rate
    );
    println!("Interlacing: {}", header.interlacing);
    if let Some(aspect) = header.pixel_aspect {
        println!("Pixel Aspect: {}", aspect);
    }
    println!("Frames: {}", stream.frame_count());
    println!("Duration: {:.3}s", stream.duration_seconds());

    Ok(())
}

fn cmd_dump(
    input: &Path,
    frame: usize,
    output: &Path,
    grayscale: bool,
    wrap: bool,
) -> anyhow::Result<()> {
    let stream = load_stream(input)?;
    let frame_ref = if wrap {
        stream.frame_wrapping(frame)?
    } else {
        stream.frame(frame)?
    };

    let converter = CpuConverter::new();
    let rgb = if grayscale {
        converter.luma_preview(&frame_ref)?
    } else {
        converter.convert(&frame_ref)?
    };

    image::save_buffer(
        output,
        &rgb.data,
        rgb.width,
        rgb.height,
        image::ExtendedColorType::Rgb8,
    )?;

    info!(frame, path = %output.display(), "wrote frame image");
    Ok(())
}

fn load_stream(path: &Path) -> rawplay_lib::Result<y4m::VideoStream> {
    let bytes = fs::read(path)?;
    y4m::parse(Buffer::from_vec(bytes))
}
