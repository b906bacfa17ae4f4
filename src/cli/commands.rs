//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.
//!
//! Syntax, type, and codegen errors are rendered through `miette` with the
//! offending source attached; everything downstream of the compiler (the C
//! compiler, the child process) reports with plain messages.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use sageleaf_syntax::ast::{Program, SourceSpan};
use sageleaf_syntax::diagnostics::{SourceDiagnostic, SyntaxError};
use sageleaf_syntax::lexer::{self, Token};
use sageleaf_syntax::parser;

use crate::codegen;
use crate::typecheck;

use super::{CliError, CliResult, ExitCode};

/// Maximum source file size (100 MB)
///
/// Files larger than this are rejected to prevent out-of-memory conditions
/// during compilation.
const MAX_SOURCE_SIZE: u64 = 100 * 1024 * 1024;

// ============================================================================
// Shared pipeline
// ============================================================================

/// A source file loaded into memory and named for diagnostics.
struct LoadedSource {
    /// Path as shown in spans and errors, relativized when possible
    display: String,
    text: String,
}

/// Read a source file, capping its size and fixing its diagnostic name.
fn load_source(file: &Path) -> CliResult<LoadedSource> {
    let metadata = fs::metadata(file)
        .map_err(|e| CliError::failure(format!("Cannot access file '{}': {}", file.display(), e)))?;

    if metadata.len() > MAX_SOURCE_SIZE {
        return Err(CliError::failure(format!(
            "Source file '{}' is too large ({} bytes, max {} bytes)",
            file.display(),
            metadata.len(),
            MAX_SOURCE_SIZE
        )));
    }

    let text = fs::read_to_string(file)
        .map_err(|e| CliError::failure(format!("Error reading file '{}': {}", file.display(), e)))?;

    Ok(LoadedSource {
        display: display_path(file),
        text,
    })
}

/// Relativize `file` against the current directory for display.
///
/// The syntax core never reads the environment, so shortening paths for
/// human-facing spans happens here, once, before lexing.
fn display_path(file: &Path) -> String {
    env::current_dir()
        .ok()
        .and_then(|cwd| file.strip_prefix(&cwd).ok())
        .unwrap_or(file)
        .display()
        .to_string()
}

/// Lex and parse a loaded file.
fn front_end(source: &LoadedSource) -> CliResult<(Vec<Token>, Program)> {
    let tokens = lexer::lex(&source.text, &source.display)
        .map_err(|e| syntax_failure(&SyntaxError::Lex(e), source))?;
    let program =
        parser::parse(&tokens).map_err(|e| syntax_failure(&SyntaxError::Parse(e), source))?;
    Ok((tokens, program))
}

/// Run the full pipeline on a loaded file: lex, parse, check, generate C.
fn compile_source(source: &LoadedSource) -> CliResult<String> {
    let (_, program) = front_end(source)?;
    typecheck::check(&program)
        .map_err(|e| spanned_failure(e.message.clone(), &e.span, source))?;
    codegen::generate(&program).map_err(|e| spanned_failure(e.message.clone(), &e.span, source))
}

/// Render a syntax error through `miette` with the source attached.
fn syntax_failure(error: &SyntaxError, source: &LoadedSource) -> CliError {
    let diagnostic = SourceDiagnostic::new(error, &source.text);
    CliError::failure(format!("{:?}", miette::Report::new(diagnostic)))
}

/// Render a later-stage error (type check, codegen) the same way.
///
/// Spans pointing outside the loaded file (the embedded runtime library)
/// fall back to a plain message, since the user's source cannot anchor them.
fn spanned_failure(message: String, span: &SourceSpan, source: &LoadedSource) -> CliError {
    if span.file.as_ref() == source.display {
        let diagnostic = SourceDiagnostic::from_parts(message, span, &source.text);
        CliError::failure(format!("{:?}", miette::Report::new(diagnostic)))
    } else {
        CliError::failure(format!("{message} at {span}"))
    }
}

// ============================================================================
// Native build plumbing
// ============================================================================

/// A temporary build directory, removed on drop.
struct ScratchDir(PathBuf);

impl ScratchDir {
    fn create() -> CliResult<Self> {
        let millis = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        let dir = env::temp_dir().join(format!("sage_build_{}_{}", process::id(), millis));
        fs::create_dir_all(&dir)
            .map_err(|e| CliError::failure(format!("Error creating build directory: {}", e)))?;
        Ok(Self(dir))
    }

    fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

/// Compile `c_code` with the system C compiler inside `scratch`.
///
/// Returns the path of the produced executable, which lives in the scratch
/// directory and disappears with it.
fn compile_c(c_code: &str, scratch: &Path) -> CliResult<PathBuf> {
    let c_file = scratch.join("program.c");
    let exe_file = scratch.join("program");

    fs::write(&c_file, c_code)
        .map_err(|e| CliError::failure(format!("Error writing C source: {}", e)))?;

    tracing::debug!(c_file = %c_file.display(), "invoking system C compiler");
    let output = process::Command::new("cc")
        .arg("-std=c99")
        .arg("-o")
        .arg(&exe_file)
        .arg(&c_file)
        .output()
        .map_err(|e| CliError::failure(format!("Error running cc: {}", e)))?;

    if !output.status.success() {
        return Err(CliError::failure(format!(
            "Compilation failed: {}",
            String::from_utf8_lossy(&output.stderr)
        )));
    }
    Ok(exe_file)
}

// ============================================================================
// Commands
// ============================================================================

/// Build a Sageleaf file to a native executable next to the source.
pub fn build_file(file: &Path) -> CliResult<ExitCode> {
    let source = load_source(file)?;
    let c_code = compile_source(&source)?;

    let scratch = ScratchDir::create()?;
    let executable = compile_c(&c_code, scratch.path())?;

    let output = file.with_extension("");
    fs::copy(&executable, &output).map_err(|e| {
        CliError::failure(format!(
            "Error writing executable '{}': {}",
            output.display(),
            e
        ))
    })?;
    Ok(ExitCode::SUCCESS)
}

/// Build and run a Sageleaf file, propagating the program's exit code.
pub fn run_file(file: &Path) -> CliResult<ExitCode> {
    let source = load_source(file)?;
    let c_code = compile_source(&source)?;

    let scratch = ScratchDir::create()?;
    let executable = compile_c(&c_code, scratch.path())?;

    let status = process::Command::new(&executable)
        .status()
        .map_err(|e| CliError::failure(format!("Error running program: {}", e)))?;

    if status.success() {
        println!("Exit code: {}", status.code().unwrap_or(0));
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode(status.code().unwrap_or(1)))
    }
}

/// Parse and type check a file; optionally dump tokens and AST as JSON.
pub fn check_file(file: &Path, dump_tokens: bool, dump_ast: bool) -> CliResult<ExitCode> {
    let source = load_source(file)?;
    let (tokens, program) = front_end(&source)?;

    if dump_tokens {
        let json = serde_json::to_string_pretty(&tokens)
            .map_err(|e| CliError::failure(format!("Error serializing tokens: {}", e)))?;
        println!("{json}");
    }
    if dump_ast {
        let json = serde_json::to_string_pretty(&program)
            .map_err(|e| CliError::failure(format!("Error serializing AST: {}", e)))?;
        println!("{json}");
    }

    typecheck::check(&program)
        .map_err(|e| spanned_failure(e.message.clone(), &e.span, &source))?;
    Ok(ExitCode::SUCCESS)
}

/// Compile a file to C, written next to the source as `<file>.c`.
pub fn emit_c(file: &Path) -> CliResult<ExitCode> {
    let source = load_source(file)?;
    let c_code = compile_source(&source)?;

    let output = file.with_extension("c");
    fs::write(&output, c_code)
        .map_err(|e| CliError::failure(format!("Error writing '{}': {}", output.display(), e)))?;
    Ok(ExitCode::SUCCESS)
}
