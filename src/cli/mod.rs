//! CLI module for the Sageleaf compiler
//!
//! This module provides the `sage` command-line interface.
//!
//! ## Commands
//!
//! - `build <file.sl>` - Compile to C and build a native executable
//! - `run <file.sl>` - Compile and run the program
//! - `check <file.sl>` - Parse and type check (`--tokens` / `--ast` dump JSON)
//! - `emit c <file.sl>` - Write the generated C next to the source
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

use std::fmt;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

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

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// The Sageleaf programming language compiler
#[derive(Parser, Debug)]
#[command(name = "sage")]
#[command(version = VERSION)]
#[command(about = "The Sageleaf programming language compiler", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile a Sageleaf program to a native executable
    Build {
        /// Source file to compile
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Compile and run a Sageleaf program
    Run {
        /// Source file to run
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Parse and type check a Sageleaf program
    Check {
        /// Source file to check
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Dump the token stream as pretty-printed JSON
        #[arg(long)]
        tokens: bool,
        /// Dump the parsed AST as pretty-printed JSON
        #[arg(long)]
        ast: bool,
    },

    /// Emit code in various formats
    Emit {
        #[command(subcommand)]
        format: EmitFormat,
    },
}

#[derive(Subcommand, Debug)]
pub enum EmitFormat {
    /// Emit C code next to the source file
    C {
        /// Source file to translate
        #[arg(value_name = "FILE")]
        file: PathBuf,
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
        Command::Build { file } => {
            validate_source_path(&file)?;
            commands::build_file(&file)
        }
        Command::Run { file } => {
            validate_source_path(&file)?;
            commands::run_file(&file)
        }
        Command::Check { file, tokens, ast } => {
            validate_source_path(&file)?;
            commands::check_file(&file, tokens, ast)
        }
        Command::Emit {
            format: EmitFormat::C { file },
        } => {
            validate_source_path(&file)?;
            commands::emit_c(&file)
        }
    }
}

/// Reject missing files and non-`.sl` inputs before a command runs.
fn validate_source_path(file: &Path) -> CliResult<()> {
    if !file.exists() {
        return Err(CliError::failure(format!(
            "Error: File '{}' not found",
            file.display()
        )));
    }
    if file.extension().is_none_or(|ext| ext != "sl") {
        return Err(CliError::failure(format!(
            "Error: Expected .sl file, got '{}'",
            file.display()
        )));
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
