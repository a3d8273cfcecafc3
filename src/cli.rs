use clap::Parser;
use std::path::PathBuf;

use crate::config::CollageSettings;
use crate::core::grid::{GRID_COLS, GRID_ROWS};

// Build version with grid info
const VERSION_INFO: &str = const_format::concatcp!(
    env!("CARGO_PKG_VERSION"), "\n",
    "Grid:   ", GRID_ROWS, "x", GRID_COLS, " per collage\n",
    "Target: ", std::env::consts::ARCH, "-", std::env::consts::OS
);

/// Batch photo collage generator
///
/// Packs photos named `0001-*.jpg`, `0002-*.jpg`, ... into 10x10 grid
/// collages, cropping each photo to fill its cell.
#[derive(Parser, Debug)]
#[command(author, version = VERSION_INFO, about, long_about = None)]
pub struct Args {
    /// Folder containing the numbered photos (default: current directory)
    #[arg(value_name = "SOURCE")]
    pub source: Option<PathBuf>,

    /// Output folder for collages (default: ./collages)
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// JSON settings file (default: $GRIDCOLLAGE_CONFIG, ./gridcollage.json, platform config dir)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Canvas width in pixels
    #[arg(long = "width", value_name = "PX")]
    pub width: Option<u32>,

    /// Canvas height in pixels
    #[arg(long = "height", value_name = "PX")]
    pub height: Option<u32>,

    /// Spacing between cells in pixels
    #[arg(long = "border", value_name = "PX")]
    pub border: Option<u32>,

    /// Margin around the canvas edges in pixels
    #[arg(long = "padding", value_name = "PX")]
    pub padding: Option<u32>,

    /// Number of collages (100 photos each)
    #[arg(short = 'n', long = "collages", value_name = "N")]
    pub collages: Option<u32>,

    /// JPEG quality (1-100)
    #[arg(short = 'q', long = "quality", value_name = "1-100")]
    pub quality: Option<u8>,

    /// Output file name prefix
    #[arg(long = "prefix", value_name = "NAME")]
    pub prefix: Option<String>,

    /// Pause between collages in milliseconds
    #[arg(long = "pause-ms", value_name = "MS")]
    pub pause_ms: Option<u64>,

    /// Print the effective settings as JSON and exit
    #[arg(long = "dump-config")]
    pub dump_config: bool,

    /// Enable logging to file (default: gridcollage.log in the output folder)
    #[arg(short = 'l', long = "log", value_name = "LOG_FILE")]
    pub log_file: Option<Option<PathBuf>>,

    /// Increase logging verbosity (default: warn, -v: info, -vv: debug, -vvv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

impl Args {
    /// Overlay flags given on the command line onto `settings`
    pub fn apply_to(&self, settings: &mut CollageSettings) {
        if let Some(source) = &self.source {
            settings.source_dir = source.clone();
        }
        if let Some(output) = &self.output {
            settings.output_dir = output.clone();
        }
        if let Some(width) = self.width {
            settings.canvas_width = width;
        }
        if let Some(height) = self.height {
            settings.canvas_height = height;
        }
        if let Some(border) = self.border {
            settings.border = border;
        }
        if let Some(padding) = self.padding {
            settings.padding = padding;
        }
        if let Some(collages) = self.collages {
            settings.collages = collages;
        }
        if let Some(quality) = self.quality {
            settings.quality = quality;
        }
        if let Some(prefix) = &self.prefix {
            settings.file_prefix = prefix.clone();
        }
        if let Some(pause_ms) = self.pause_ms {
            settings.pause_ms = pause_ms;
        }
    }

    /// Log level from `-v` count
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbosity {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}
