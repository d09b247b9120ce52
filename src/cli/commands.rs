//! Command definitions for the timer CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::engine::DEFAULT_TICK_MS;
use crate::types::SessionConfig;

// ============================================================================
// CLI Structure
// ============================================================================

/// Work/rest interval timer
#[derive(Parser, Debug)]
#[command(
    name = "worktimer",
    version,
    about = "作業/休憩インターバルタイマー",
    long_about = "作業時間と休憩時間を交互に計測し、それぞれの合計を記録するターミナルタイマー。\n\
                  設定した時間に達するとアラーム音とデスクトップ通知でお知らせします。",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run an interactive work/rest session
    Run(RunArgs),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Work threshold in minutes (1-600)
    #[arg(
        short,
        long,
        default_value = "25",
        value_parser = clap::value_parser!(u32).range(1..=600)
    )]
    pub work: u32,

    /// Rest threshold in minutes (1-600); every 4th rest is tripled
    #[arg(
        short,
        long,
        default_value = "5",
        value_parser = clap::value_parser!(u32).range(1..=600)
    )]
    pub rest: u32,

    /// Disable alarm tones
    #[arg(long)]
    pub no_sound: bool,

    /// Disable desktop notifications
    #[arg(long)]
    pub no_notify: bool,

    /// Emit JSON lines instead of a status line
    #[arg(long)]
    pub json: bool,

    /// Tick interval in milliseconds (must stay below one minute)
    #[arg(
        long,
        default_value_t = DEFAULT_TICK_MS,
        value_parser = clap::value_parser!(u64).range(10..=59_000)
    )]
    pub tick_ms: u64,
}

impl RunArgs {
    /// Builds the session configuration from the flags.
    pub fn to_config(&self) -> SessionConfig {
        SessionConfig::default()
            .with_work_minutes(self.work)
            .with_rest_minutes(self.rest)
            .with_sound(!self.no_sound)
            .with_notifications(!self.no_notify)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod cli_tests {
        use super::*;

        #[test]
        fn test_parse_no_args() {
            let cli = Cli::parse_from(["worktimer"]);
            assert!(cli.command.is_none());
            assert!(!cli.verbose);
        }

        #[test]
        fn test_parse_verbose_flag() {
            let cli = Cli::parse_from(["worktimer", "-v", "run"]);
            assert!(cli.verbose);
        }

        #[test]
        fn test_parse_completions_bash() {
            let cli = Cli::parse_from(["worktimer", "completions", "bash"]);
            match cli.command {
                Some(Commands::Completions { shell }) => {
                    assert_eq!(shell, clap_complete::Shell::Bash);
                }
                _ => panic!("Expected Completions command"),
            }
        }

        #[test]
        fn test_invalid_command() {
            assert!(Cli::try_parse_from(["worktimer", "bogus"]).is_err());
        }
    }

    mod run_args_tests {
        use super::*;

        fn parse_run(args: &[&str]) -> RunArgs {
            let mut argv = vec!["worktimer", "run"];
            argv.extend_from_slice(args);
            match Cli::parse_from(argv).command {
                Some(Commands::Run(args)) => args,
                _ => panic!("Expected Run command"),
            }
        }

        #[test]
        fn test_defaults() {
            let args = parse_run(&[]);
            assert_eq!(args.work, 25);
            assert_eq!(args.rest, 5);
            assert!(!args.no_sound);
            assert!(!args.no_notify);
            assert!(!args.json);
            assert_eq!(args.tick_ms, 100);
        }

        #[test]
        fn test_custom_values() {
            let args = parse_run(&["-w", "50", "-r", "10", "--no-sound", "--json", "--tick-ms", "250"]);
            assert_eq!(args.work, 50);
            assert_eq!(args.rest, 10);
            assert!(args.no_sound);
            assert!(args.json);
            assert_eq!(args.tick_interval(), Duration::from_millis(250));
        }

        #[test]
        fn test_work_out_of_range() {
            assert!(Cli::try_parse_from(["worktimer", "run", "--work", "0"]).is_err());
            assert!(Cli::try_parse_from(["worktimer", "run", "--work", "601"]).is_err());
        }

        #[test]
        fn test_tick_must_be_sub_minute() {
            assert!(Cli::try_parse_from(["worktimer", "run", "--tick-ms", "60000"]).is_err());
            assert!(Cli::try_parse_from(["worktimer", "run", "--tick-ms", "5"]).is_err());
        }

        #[test]
        fn test_to_config() {
            let config = parse_run(&["--work", "40", "--no-notify"]).to_config();
            assert_eq!(config.work_minutes, 40);
            assert_eq!(config.rest_minutes, 5);
            assert!(config.sound_enabled);
            assert!(!config.notifications_enabled);
        }

        #[test]
        fn test_parsed_defaults_match_session_defaults() {
            let parsed = parse_run(&[]);
            assert_eq!(parsed.to_config(), SessionConfig::default());
            assert_eq!(parsed.tick_ms, DEFAULT_TICK_MS);
            assert!(!parsed.json);
        }
    }
}
