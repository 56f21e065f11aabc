//! drop-tally
//!
//! Extracts item drops from rhythm game result screenshots with template
//! matching and Tesseract OCR, keeps them in a CSV log and reports per-item
//! drop rates.

mod analysis;
mod cli;
mod config;
mod error;
mod ingest;
mod ocr;
mod paths;
mod pipeline;
mod vision;

use anyhow::{anyhow, Result};
use clap::Parser;
use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};
use std::thread;
use tracing::{error, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use cli::{Cli, Commands};
use config::AppConfig;
use ingest::{create_ingest_queue, run_ingest_worker, DropLog, IngestContext, IngestItem};
use ocr::TesseractRecognizer;
use vision::TemplateLibrary;

/// Console (stderr) plus an append-mode file under logs/.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let log_path = paths::get_logs_dir().join("drop_tally.log");
    let file_layer = match OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(file) => Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file))),
        Err(e) => {
            eprintln!("Failed to open log file {}: {}", log_path.display(), e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();
}

fn install_panic_hook() {
    std::panic::set_hook(Box::new(|panic_info| {
        let msg = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        let location = panic_info
            .location()
            .map(|loc| format!(" at {}:{}:{}", loc.file(), loc.line(), loc.column()))
            .unwrap_or_default();
        error!("[PANIC]{} {}", location, msg);
    }));
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    paths::ensure_directories()?;
    init_logging(cli.verbose);
    install_panic_hook();

    let config_path = cli.config.clone().unwrap_or_else(paths::get_config_path);
    let config = AppConfig::load(&config_path);

    match cli.command {
        Commands::Extract { image } => {
            let library = TemplateLibrary::load(&config.templates_dir, &config.extraction)?;
            let recognizer = TesseractRecognizer::locate()?;

            let result = pipeline::extract_file(&image, &library, &config.extraction, &recognizer)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }

        Commands::Ingest { images } => {
            let context = IngestContext {
                library: TemplateLibrary::load(&config.templates_dir, &config.extraction)?,
                config: config.extraction.clone(),
                recognizer: Box::new(TesseractRecognizer::locate()?),
                log: Arc::new(DropLog::init(&config.drop_log)?),
            };

            let (sender, receiver) = create_ingest_queue();
            let worker = thread::spawn(move || {
                run_ingest_worker(receiver, context, |item, status| {
                    println!("{}: {}", item.image_path.display(), status);
                })
            });

            for image in images {
                if sender.send(IngestItem::new(image)).is_err() {
                    warn!("Ingest worker stopped early");
                    break;
                }
            }
            drop(sender);

            let summary = worker.join().map_err(|_| anyhow!("Ingest worker panicked"))?;
            println!(
                "{} image(s): {} recorded ({} drops), {} with nothing recognized, {} failed",
                summary.processed, summary.recorded, summary.rows, summary.nothing_recognized, summary.failed
            );
        }

        Commands::Stats { song } => {
            println!("{}", analysis::stats_report(&config.drop_log, song.as_deref())?);
        }

        Commands::Export { song, json, chart } => {
            let json = match (&json, &chart) {
                (None, None) => Some(paths::get_exe_dir().join("drop_stats.json")),
                _ => json,
            };

            match analysis::load_stats(&config.drop_log, song.as_deref())? {
                Ok(stats) => {
                    let chart_config = analysis::config::ChartConfig::load(&paths::get_chart_config_path());
                    let output =
                        analysis::export_stats(&stats, json.as_deref(), chart.as_deref(), &chart_config)?;
                    for path in output.json.iter().chain(output.chart.iter()) {
                        println!("Saved {}", path.display());
                    }
                }
                Err(no_data) => println!("{}", no_data),
            }
        }

        Commands::Setup => {
            let tesseract = ocr::ensure_tesseract()?;
            println!("Tesseract: {}", tesseract.executable.display());
            println!("tessdata:  {}", tesseract.tessdata.display());
        }
    }

    info!("Done");
    Ok(())
}
