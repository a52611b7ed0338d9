use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};

mod cli;
mod constants;
mod cover;
mod deck;
mod engine;
mod error;
mod fetcher;
mod monitor;
mod state;
mod surface;
mod texture_loader;
mod window;

use crate::cli::Args;
use crate::engine::Engine;
use crate::fetcher::Fetcher;
use crate::monitor::select_monitor;
use crate::texture_loader::load_image_paths;
use crate::window::Window;

fn init_logging(args: &Args) -> Result<()> {
    // 0 (default) = info, 1 (-v) = debug, 2+ (-vv) = trace; RUST_LOG still wins
    let default_level = match args.verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level));
    builder.format_timestamp_millis();

    if let Some(log_path) = &args.log_file {
        let file = std::fs::File::create(log_path)
            .with_context(|| format!("Failed to create log file {}", log_path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}

fn run(args: &Args) -> Result<()> {
    let folder = args.image_folder();

    // --- Refresh the cache from the server ---
    if args.should_fetch() {
        let fetcher = Fetcher::new(&args.server, &args.cache_dir);
        match fetcher.clear_cache() {
            Ok(()) => {
                fetcher.download_playlist();
            }
            Err(e) => warn!("Could not prepare cache {}: {}", fetcher.cache_dir().display(), e),
        }
    }

    // --- Collect images before any window exists ---
    let image_paths = load_image_paths(&folder)?;
    info!("Found {} image(s) in {}", image_paths.len(), folder.display());

    // --- Pick the monitor; the window stays hidden until it is placed ---
    let window = Window::open_hidden("Slideshow");
    let monitors = window.monitors();
    info!("Detecting monitors...");
    for monitor in &monitors {
        info!("  Monitor {}: {}", monitor.index, monitor);
    }
    let target = select_monitor(&monitors, args.monitor)?.clone();
    info!("Using monitor {}", target.index);

    let mut engine = Engine::new(window, &target, image_paths, args.timing())?;
    engine.run();

    info!("Slideshow closed");
    Ok(())
}

fn main() {
    let args = Args::parse();

    if let Err(e) = init_logging(&args) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }

    if let Err(e) = run(&args) {
        error!("Error: {:#}", e);
        process::exit(1);
    }
}
