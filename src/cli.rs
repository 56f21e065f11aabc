use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "drop-tally")]
#[command(about = "Reads item drops from rhythm game result screenshots and reports drop rates", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: config.json next to the executable)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract drops from one screenshot and print them as JSON
    Extract {
        #[arg(required = true)]
        image: PathBuf,
    },

    /// Extract screenshots and append their drops to the drop log
    Ingest {
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },

    /// Show drop rates per item
    Stats {
        /// Only songs whose name contains this text (case-sensitive)
        #[arg(short, long)]
        song: Option<String>,
    },

    /// Write drop statistics as JSON and/or a bar chart
    Export {
        /// Only songs whose name contains this text (case-sensitive)
        #[arg(short, long)]
        song: Option<String>,

        /// JSON output file (default: drop_stats.json next to the executable)
        #[arg(long)]
        json: Option<PathBuf>,

        /// PNG chart output file
        #[arg(long)]
        chart: Option<PathBuf>,
    },

    /// Locate Tesseract and fetch missing trained data
    Setup,
}
