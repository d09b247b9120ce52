//! worktimer - a terminal work/rest interval timer
//!
//! Measures work and rest time in alternating iterations, keeps lifetime
//! totals for both, and alerts when a threshold is reached:
//! - 25 minutes of work by default
//! - 5 minutes of rest, tripled on every 4th iteration

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tokio::sync::mpsc;

use worktimer::cli::{Cli, Commands, Display, JsonDisplay, RunArgs, TerminalDisplay};
use worktimer::engine::{spawn_stdin_reader, SessionEngine};
use worktimer::notification::DesktopNotifier;
use worktimer::session::{SessionController, SystemClock};
use worktimer::sound::create_player;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&e.to_string());
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// Logs go to stderr so they do not interleave with the status line.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Run(args)) => {
            run_session(args).await?;
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Runs an interactive session until the user quits.
async fn run_session(args: RunArgs) -> Result<()> {
    let config = args.to_config();
    config.validate().map_err(anyhow::Error::msg)?;

    let controller = SessionController::new(config.clone(), SystemClock);
    let sound = create_player(config.sound_enabled);
    let notifier = DesktopNotifier::new();

    let (tx, rx) = mpsc::unbounded_channel();
    spawn_stdin_reader(tx);

    if args.json {
        let mut engine = SessionEngine::new(controller, sound, notifier, JsonDisplay::stdout())
            .with_tick_interval(args.tick_interval());
        engine.run(rx).await?;
    } else {
        Display::show_key_help();
        let mut engine = SessionEngine::new(controller, sound, notifier, TerminalDisplay::stdout())
            .with_tick_interval(args.tick_interval());
        engine.run(rx).await?;
    }

    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
