// ABOUTME: Main entry point for devmux
//
// Binary: devmux
// Usage: devmux [COMMAND]
// - No command: prints a usage hint
// - run: detect services, pick a subset, run/multiplex them
// - list: show detected services

use anyhow::Result;
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, LeaveAlternateScreen};
use std::io;

mod cli;
mod detect;
mod models;
mod mux;

/// Terminal restoration for abnormal exits; the UI loops clean up after
/// themselves on the normal path.
fn cleanup_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();
    setup_panic_handler();

    let args = cli::Cli::parse();

    let result = match args.command {
        Some(cli::Commands::Run) => cli::run::execute().await,
        Some(cli::Commands::List) => cli::list::execute(args.format),
        None => {
            println!("devmux - detect and run project services. Try 'devmux run' or 'devmux list'.");
            Ok(())
        }
    };

    if result.is_err() {
        cleanup_terminal();
    }
    result
}

fn setup_logging() {
    use std::fs::OpenOptions;
    use std::path::PathBuf;
    use tracing_subscriber::prelude::*;

    let log_dir = dirs::home_dir()
        .map(|home| home.join(".devmux").join("logs"))
        .unwrap_or_else(|| PathBuf::from(".devmux/logs"));
    let _ = std::fs::create_dir_all(&log_dir);

    let log_file = log_dir.join(format!(
        "devmux-{}.jsonl",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    ));
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_file) else {
        // No log file, no logging; the UI owns the terminal anyway.
        return;
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_writer(file)
                .with_ansi(false),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "devmux=info".into()),
        )
        .init();
}

fn setup_panic_handler() {
    use tracing::error;

    std::panic::set_hook(Box::new(|panic_info| {
        // Restore the terminal before anything is printed.
        cleanup_terminal();
        error!("application panicked: {panic_info}");
        eprintln!("devmux panicked: {panic_info}");
        eprintln!("Check the logs under ~/.devmux/logs for details.");
    }));
}
