//! tubevault CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use tubevault::cli::{Cli, CommandDispatcher};
use tubevault::session::default_state_dir;
use tubevault::ui::{Console, OutputMode};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("tubevault=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tubevault=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("tubevault starting with args: {:?}", cli);

    // Determine output mode
    let output_mode = if cli.quiet {
        OutputMode::Quiet
    } else if cli.verbose {
        OutputMode::Verbose
    } else {
        OutputMode::Normal
    };

    // Handle --no-color
    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    let state_dir = cli.state_dir.clone().unwrap_or_else(default_state_dir);

    let console = Console::new(output_mode, !cli.no_color);
    let dispatcher = CommandDispatcher::new(state_dir, cli.api_url.clone());

    match dispatcher.dispatch(&cli, &console) {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            console.error(&format!("Error: {}", e));
            ExitCode::from(1)
        }
    }
}
