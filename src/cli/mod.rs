//! CLI module for the moulinette harnesses.
//!
//! ## Commands
//!
//! - `audit <binary> [args...]` - compile under every profile, run the valgrind matrix
//! - `sort` - cross-check push_swap against its checker
//! - `maps [path]` - validate .ber maps and cross-check so_long
//! - `gen` - generate random candidate maps and self-check them
//!
//! ## Modules
//!
//! - `commands` - audit implementation and norminette parsing
//! - `map_runner` - maps/gen harnesses
//! - `sort_runner` - push_swap harness
//! - `interfaces` - I/O boundary traits for the binaries under test
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;
pub mod interfaces;
pub mod map_runner;
pub mod sort_runner;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use crate::version::VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Test harnesses for 42-style C student projects
#[derive(Parser, Debug)]
#[command(name = "moulinette")]
#[command(version = VERSION)]
#[command(about = "Test harnesses for 42-style C student projects", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile under every profile and run the valgrind matrix
    Audit {
        /// Binary the Makefile produces
        #[arg(value_name = "BINARY")]
        binary: String,
        /// Extra arguments passed to the binary under valgrind
        #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Cross-check push_swap against its checker
    Sort {
        /// Number of random cases
        #[arg(long, default_value_t = 100)]
        cases: usize,
        /// Largest argument count for random cases
        #[arg(long = "max-args", default_value_t = 500)]
        max_args: usize,
        /// RNG seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Validate every .ber map and cross-check so_long
    Maps {
        /// Directory holding the maps
        #[arg(value_name = "PATH", default_value = "./maps")]
        path: PathBuf,
        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Generate random candidate maps and self-check them
    Gen {
        /// Map width in cells
        #[arg(long, default_value_t = 10)]
        width: usize,
        /// Map height in cells
        #[arg(long, default_value_t = 10)]
        height: usize,
        /// Number of maps to generate
        #[arg(long, default_value_t = 1)]
        count: usize,
        /// Also run ./so_long on each generated map
        #[arg(long)]
        run: bool,
        /// RNG seed for reproducible maps
        #[arg(long)]
        seed: Option<u64>,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Audit { binary, args } => commands::audit(&binary, &args),
        Command::Sort {
            cases,
            max_args,
            seed,
        } => sort_runner::run_sort(cases, max_args, seed),
        Command::Maps { path, verbose } => map_runner::run_maps(&path, verbose),
        Command::Gen {
            width,
            height,
            count,
            run,
            seed,
        } => map_runner::run_gen(width, height, count, run, seed),
    }
}

// ============================================================================
// Tests
// ============================================================================
