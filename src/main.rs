use clap::Parser;
use anyhow::Result;
use std::io::BufRead;
use std::sync::mpsc;
use std::thread;

use dirpoll::{
    cli::Cli,
    ConsoleListener, DirectoryTracker, DirectoryWatcher, JsonListener, OutputFormat, WatchConfig,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.setup_logging();

    let config = match cli.resolve_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            std::process::exit(1);
        }
    };
    if let Err(err) = config.validate() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }

    if let Err(err) = run(&config) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }

    Ok(())
}

fn run(config: &WatchConfig) -> Result<()> {
    let directory = &config.directory;

    config.ensure_directory()?;

    let mut tracker = DirectoryTracker::initialize(directory)?;
    match config.output {
        OutputFormat::Text => tracker.register_listener(ConsoleListener::stdout()),
        OutputFormat::Json => tracker.register_listener(JsonListener::stdout()),
    }

    let mut watcher = DirectoryWatcher::start(tracker, config.poll_interval())?;
    tracing::debug!("Started watching {}", directory.display());

    println!("Watching directory: {}", directory.display());
    println!("Press Enter to exit...");

    wait_for_exit()?;

    watcher.stop();
    tracing::debug!("Stopped watching {}", directory.display());
    Ok(())
}

/// Blocks until a line is read from stdin, stdin closes, or Ctrl+C.
fn wait_for_exit() -> Result<()> {
    let (exit_tx, exit_rx) = mpsc::channel::<()>();

    let ctrlc_tx = exit_tx.clone();
    ctrlc::set_handler(move || {
        let _ = ctrlc_tx.send(());
    })?;

    thread::spawn(move || {
        let mut line = String::new();
        if let Err(err) = std::io::stdin().lock().read_line(&mut line) {
            tracing::warn!("Failed to read from stdin: {}", err);
        }
        let _ = exit_tx.send(());
    });

    let _ = exit_rx.recv();
    Ok(())
}
