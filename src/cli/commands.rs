//! CLI command implementation for the audit harness.
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::proc::{self, CommandOutput, ProcError, logs::LogSink, makefile};
use crate::report::{BOLD, GREEN, RED, RESET};

use super::{CliError, CliResult, ExitCode};

/// Build profiles exercised by `audit`, in order.
const BUILD_PROFILES: [&str; 4] = ["all", "debug", "asan", "tsan"];

/// Valgrind tools run against every profile.
const VALGRIND_TOOLS: [&str; 4] = ["memcheck", "helgrind", "drd", "cachegrind"];

/// External tools `audit` cannot run without.
const REQUIRED_TOOLS: [&str; 3] = ["valgrind", "norminette", "make"];

/// Entry point for `moulinette audit`.
///
/// Sequence: tool checks, log-directory reset, Makefile patch, then one
/// compile + valgrind matrix per build profile. The Makefile is restored
/// whether or not the run succeeds.
pub fn audit(binary: &str, params: &[String]) -> CliResult<ExitCode> {
    for tool in REQUIRED_TOOLS {
        proc::require_tool(tool).map_err(|e| CliError::failure(format!("Error: {e}")))?;
    }

    let makefile_path = Path::new("Makefile");
    if !makefile_path.is_file() {
        return Err(CliError::failure("No Makefile in the current directory"));
    }

    let sink = LogSink::create()
        .map_err(|e| CliError::failure(format!("Cannot prepare log directory: {e}")))?;

    makefile::patch(makefile_path)
        .map_err(|e| CliError::failure(format!("Cannot patch Makefile: {e}")))?;

    // The Makefile now carries our extra rules; restore it on every path out.
    let result = audit_inner(binary, params, &sink);
    if let Err(e) = makefile::unpatch(makefile_path) {
        tracing::warn!("could not restore Makefile: {}", e);
    }
    result
}

fn audit_inner(binary: &str, params: &[String], sink: &LogSink) -> CliResult<ExitCode> {
    run_make(sink, "fclean", binary)?;

    summarize_file_types(Path::new("."));

    match run_norminette(Some(sink)) {
        Ok(report) if report.passed => println!("{GREEN}Norminette passed!{RESET}"),
        Ok(report) => {
            println!("{RED}Norminette failed:{RESET}");
            for file in &report.offending_files {
                println!("{RED}{file} is not normed!{RESET}");
            }
        }
        Err(e) => println!("{RED}Norminette did not run: {e}{RESET}"),
    }

    let mut exit = ExitCode::SUCCESS;
    for profile in BUILD_PROFILES {
        run_make(sink, "fclean", binary)?;
        println!("\n{BOLD}Compiling with profile: {profile}{RESET}\n");
        run_make(sink, profile, binary)?;

        if proc::is_executable(Path::new(binary)) {
            if !run_valgrind_matrix(sink, profile, binary, params) {
                exit = ExitCode::FAILURE;
            }
        } else {
            println!("{RED}Error: binary '{binary}' not found or not executable.{RESET}");
            exit = ExitCode::FAILURE;
        }
    }

    Ok(exit)
}

/// Run `make <target>`, filing output and sweeping stray files; a failed
/// compile is fatal.
fn run_make(sink: &LogSink, target: &str, binary: &str) -> CliResult<()> {
    let before = proc::logs::snapshot(Path::new("."));
    let command = ["make", target];

    let output =
        proc::run_command("make", [target]).map_err(|e| CliError::failure(format!("Error: {e}")))?;

    file_output(sink, &command, &output);
    sweep(sink, &before, &command, binary);

    if !output.success {
        return Err(CliError::failure(format!(
            "Failed to compile using 'make {target}':\n{}",
            output.stderr
        )));
    }
    if !output.stdout.is_empty() {
        println!("{}", output.stdout);
    }
    Ok(())
}

/// Run the full valgrind matrix for one build profile.
///
/// Non-zero exits are reported and the matrix keeps going; returns whether
/// every run came back clean.
fn run_valgrind_matrix(sink: &LogSink, profile: &str, binary: &str, params: &[String]) -> bool {
    let mut clean = true;

    println!("\nTesting profile {profile} with valgrind --leak-check=full");
    clean &= run_valgrind(sink, profile, binary, params, "--leak-check=full");

    for tool in VALGRIND_TOOLS {
        let flag = format!("--tool={tool}");
        println!("\nTesting profile {profile} with valgrind {flag}");
        clean &= run_valgrind(sink, profile, binary, params, &flag);
    }

    clean
}

fn run_valgrind(
    sink: &LogSink,
    profile: &str,
    binary: &str,
    params: &[String],
    flag: &str,
) -> bool {
    let before = proc::logs::snapshot(Path::new("."));
    let command = [profile, "valgrind", flag, binary];

    let mut args: Vec<String> = vec![flag.to_string(), binary.to_string()];
    args.extend(params.iter().cloned());

    match proc::run_command("valgrind", &args) {
        Ok(output) => {
            file_output(sink, &command, &output);
            sweep(sink, &before, &command, binary);

            if !output.success {
                println!(
                    "{RED}valgrind {flag} on profile {profile} failed:{RESET}\n{}",
                    output.stderr
                );
            }
            if !output.stdout.is_empty() {
                println!("{}", output.stdout);
            }
            output.success
        }
        Err(e) => {
            println!("{RED}valgrind did not run: {e}{RESET}");
            false
        }
    }
}

/// Result of a norminette run.
pub struct NormReport {
    pub passed: bool,
    pub offending_files: Vec<String>,
}

/// Run norminette over the working tree and parse its per-file verdicts.
///
/// A line that does not end in `OK!` names a file that failed the norm.
pub fn run_norminette(sink: Option<&LogSink>) -> Result<NormReport, ProcError> {
    let output = proc::run_command("norminette", std::iter::empty::<&str>())?;
    if let Some(sink) = sink {
        file_output(sink, &["norminette"], &output);
    }

    let mut offending = Vec::new();
    for line in output.stdout.lines() {
        if line.trim().is_empty() || line.ends_with("OK!") {
            continue;
        }
        let file = line.split(':').next().unwrap_or(line).trim().to_string();
        if !offending.contains(&file) {
            offending.push(file);
        }
    }

    Ok(NormReport {
        passed: offending.is_empty(),
        offending_files: offending,
    })
}

/// Count and display source file types under `root`.
fn summarize_file_types(root: &Path) {
    let mut c_files = 0;
    let mut cpp_files = 0;
    let mut headers = 0;
    let mut other = 0;

    for file in proc::logs::collect_files(root) {
        match file.extension().and_then(|e| e.to_str()) {
            Some("c") => c_files += 1,
            Some("cpp") => cpp_files += 1,
            Some("h") => headers += 1,
            _ => other += 1,
        }
    }

    println!("C files: {c_files}");
    println!("C++ files: {cpp_files}");
    println!("Header files: {headers}");
    println!("Other files: {other}");
}

fn file_output(sink: &LogSink, command: &[&str], output: &CommandOutput) {
    if let Err(e) = sink.write_capture(command, &output.stdout) {
        tracing::warn!("could not write log for {:?}: {}", command, e);
    }
    if !output.stderr.is_empty() {
        let mut err_command: Vec<&str> = command.to_vec();
        err_command.push("_error");
        if let Err(e) = sink.write_capture(&err_command, &output.stderr) {
            tracing::warn!("could not write error log for {:?}: {}", command, e);
        }
    }
}

fn sweep(sink: &LogSink, before: &HashSet<PathBuf>, command: &[&str], binary: &str) {
    if let Err(e) = sink.sweep_new_files(Path::new("."), before, command, Some(binary)) {
        tracing::warn!("could not sweep generated files: {}", e);
    }
}
