use gridcollage::CollageError;
use gridcollage::cli::Args;
use gridcollage::config::{CollageSettings, PathConfig};
use gridcollage::core::locator::locate_photos;
use gridcollage::core::runner::CollageBatch;
use gridcollage::progress::CollageProgress;
use gridcollage::report;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};

fn main() {
    if let Err(e) = run() {
        eprintln!("❌ Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    // Settings: defaults -> settings file -> CLI flags
    let path_config = PathConfig::from_env_and_cli(args.config.clone());
    let (mut settings, settings_file) = CollageSettings::load(&path_config)?;
    args.apply_to(&mut settings);

    if args.dump_config {
        println!("{}", settings.to_json()?);
        return Ok(());
    }

    let batch = CollageBatch::new(settings)?;
    let settings = batch.settings();

    report::print_lines(&report::banner_lines(settings, batch.geometry()));

    // The only early abort: nothing to read from
    if !settings.source_dir.is_dir() {
        return Err(CollageError::SourceMissing(settings.source_dir.clone()).into());
    }

    std::fs::create_dir_all(&settings.output_dir).with_context(|| {
        format!("Failed to create output folder: {}", settings.output_dir.display())
    })?;

    init_logger(&args, settings)?;
    info!("Grid collage batch starting...");
    match &settings_file {
        Some(path) => info!("Loaded settings from {}", path.display()),
        None => debug!("No settings file found, using defaults"),
    }
    debug!("Command-line args: {:?}", args);
    debug!("Effective settings: {:?}", settings);

    println!("📁 Scanning for photos...");
    let index = locate_photos(&settings.source_dir, settings.total_photos())?;
    report::print_lines(&report::scan_lines(&index));

    let mut progress = CollageProgress::new();
    let total_collages = settings.collages;
    let batch_report = batch.run(&index, &mut progress, |collage| {
        report::print_lines(&report::collage_lines(collage, total_collages));
    })?;

    report::print_lines(&report::summary_lines(&batch_report, &settings.output_dir));
    info!(
        "Finished: {} placed, {} missing, {} errors",
        batch_report.placed(),
        batch_report.missing_count(),
        batch_report.error_count()
    );

    Ok(())
}

/// Console logging (respects RUST_LOG) or file logging with `--log`
fn init_logger(args: &Args, settings: &CollageSettings) -> Result<()> {
    let log_level = args.log_level();

    if let Some(log_path_opt) = &args.log_file {
        // File logging with specified verbosity level
        let log_path = log_path_opt
            .clone()
            .unwrap_or_else(|| settings.output_dir.join("gridcollage.log"));

        let file = std::fs::File::create(&log_path)
            .with_context(|| format!("Failed to create log file: {}", log_path.display()))?;

        env_logger::Builder::new()
            .filter_level(log_level)
            .format_timestamp_millis()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();

        info!(
            "Logging to file: {} (level: {:?})",
            log_path.display(),
            log_level
        );
    } else {
        // Console logging with specified verbosity level (respects RUST_LOG if set)
        let default_level = match args.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
            .format_timestamp_millis()
            .init();
    }

    Ok(())
}
