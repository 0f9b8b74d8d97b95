//! Map harness: validate every `.ber` map and cross-check `so_long`.
//!
//! For each discovered map the built-in validator and the student binary
//! both render a verdict; agreement (both accept or both reject) is OK,
//! disagreement is a discrepancy. Discrepant maps are copied into a
//! `check/` directory with both outputs appended so they can be inspected
//! offline. Also home to `gen`, which feeds the same validator with
//! randomly generated candidate maps.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::grid::{self, MapError, generate::generate};
use crate::proc::{self, logs};
use crate::report::{CaseResult, ConsoleReporter, GREEN, RESET, Reporter, Summary, render_map_error};

use super::interfaces::{MapBinary, SoLongBinary};
use super::{CliError, CliResult, ExitCode};

/// Directory discrepant maps are copied into for offline inspection.
pub const CHECK_DIR: &str = "check";

/// Entry point for `moulinette maps`.
pub fn run_maps(path: &Path, verbose: bool) -> CliResult<ExitCode> {
    if !path.is_dir() {
        return Err(CliError::failure(format!(
            "No maps folder found at '{}'",
            path.display()
        )));
    }

    let maps = discover_map_files(path);
    if maps.is_empty() {
        return Err(CliError::failure(format!(
            "No .ber maps under '{}'",
            path.display()
        )));
    }

    let so_long = Path::new("./so_long");
    if !proc::is_executable(so_long) {
        return Err(CliError::failure(
            "No so_long found, maybe you forgot to make?",
        ));
    }

    let check_dir = Path::new(CHECK_DIR);
    reset_check_dir(check_dir)
        .map_err(|e| CliError::failure(format!("Cannot prepare '{CHECK_DIR}': {e}")))?;

    let binary = SoLongBinary::new(so_long);
    let mut reporter = ConsoleReporter::new(verbose);
    let summary = run_all(&maps, &binary, check_dir, &mut reporter);

    if summary.discrepancies > 0 || summary.failed > 0 {
        // Summary already printed by the reporter
        Err(CliError::new("", ExitCode::FAILURE))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Drive every map through the validator and the binary, comparing verdicts.
pub fn run_all(
    maps: &[PathBuf],
    binary: &dyn MapBinary,
    check_dir: &Path,
    reporter: &mut dyn Reporter,
) -> Summary {
    let start = Instant::now();
    reporter.on_collection_complete(maps.len());

    let mut summary = Summary::default();
    for map in maps {
        let name = map.display().to_string();

        let source = match fs::read_to_string(map) {
            Ok(source) => source,
            Err(e) => {
                let result = CaseResult::Failed(format!("cannot read map: {e}"));
                summary.record(&result);
                reporter.on_case_complete(&name, &result);
                continue;
            }
        };

        let verdict = grid::check_map(&source);
        let run = match binary.run_map(map) {
            Ok(output) => output,
            Err(e) => {
                let result = CaseResult::Failed(format!("so_long failed to run: {e}"));
                summary.record(&result);
                reporter.on_case_complete(&name, &result);
                continue;
            }
        };

        let result = compare_verdicts(&verdict, run.success);
        if let CaseResult::Discrepancy { .. } = &result {
            if let Err(e) = file_discrepancy(check_dir, map, &source, &verdict, &run.stdout) {
                tracing::warn!(
                    "could not copy {} into {}: {}",
                    map.display(),
                    check_dir.display(),
                    e
                );
            }
        }

        summary.record(&result);
        reporter.on_case_complete(&name, &result);
    }

    summary.duration = start.elapsed();
    reporter.on_run_complete(&summary);
    summary
}

/// Compare the validator's verdict with the binary's exit status.
fn compare_verdicts(validator: &Result<(), MapError>, binary_ok: bool) -> CaseResult {
    match (validator, binary_ok) {
        (Ok(()), true) => CaseResult::Ok,
        (Err(e), false) => CaseResult::OkRejected(format!("invalid map: {e}")),
        (Ok(()), false) => CaseResult::Discrepancy {
            validator: "OK".to_string(),
            binary: "Error".to_string(),
        },
        (Err(e), true) => CaseResult::Discrepancy {
            validator: format!("Error: {e}"),
            binary: "OK".to_string(),
        },
    }
}

/// Discover `.ber` files under a path (recursive, sorted).
pub fn discover_map_files(path: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    if path.is_file() {
        if path.extension().is_some_and(|ext| ext == "ber") {
            files.push(path.to_path_buf());
        }
    } else if path.is_dir() {
        if let Ok(entries) = fs::read_dir(path) {
            for entry in entries.flatten() {
                let entry_path = entry.path();
                if entry_path.is_dir() {
                    let name = entry_path.file_name().and_then(|n| n.to_str()).unwrap_or("");
                    if !name.starts_with('.') {
                        files.extend(discover_map_files(&entry_path));
                    }
                } else if entry_path.extension().is_some_and(|ext| ext == "ber") {
                    files.push(entry_path);
                }
            }
        }
    }

    files.sort();
    files
}

/// Recreate the check directory, clearing stale `.ber` copies.
fn reset_check_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    for entry in fs::read_dir(dir)?.flatten() {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "ber") {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}

/// Copy a discrepant map into the check directory with both outputs appended.
fn file_discrepancy(
    check_dir: &Path,
    map: &Path,
    source: &str,
    verdict: &Result<(), MapError>,
    binary_output: &str,
) -> io::Result<()> {
    let Some(name) = map.file_name() else {
        return Ok(());
    };

    let reason = match verdict {
        Ok(()) => "Valid map".to_string(),
        Err(e) => format!("Invalid map: {e}"),
    };

    let mut content = source.to_string();
    content.push_str("\n\nValidator output:\n");
    content.push_str(&reason);
    content.push_str("\n\nso_long output:\n");
    content.push_str(binary_output);

    fs::write(check_dir.join(name), content)
}

// ============================================================================
// gen: random candidate maps
// ============================================================================

/// Entry point for `moulinette gen`.
pub fn run_gen(
    width: usize,
    height: usize,
    count: usize,
    run: bool,
    seed: Option<u64>,
) -> CliResult<ExitCode> {
    if width < 3 || height < 3 || (width - 2) * (height - 2) < 3 {
        return Err(CliError::failure(
            "map interior must hold at least three cells (try 5x5 or larger)",
        ));
    }
    if run && !proc::is_executable(Path::new("./so_long")) {
        return Err(CliError::failure(
            "No so_long found, maybe you forgot to make?",
        ));
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    for index in 0..count {
        let grid = generate(width, height, &mut rng);
        let source = grid.to_string();

        println!("Generated map {} of {count}:", index + 1);
        print!("{source}");
        println!();

        match grid.validate() {
            Ok(()) => println!("Validation: {GREEN}Valid map{RESET}"),
            Err(e) => print!("{}", render_map_error("generated", &source, &e)),
        }

        if run {
            let output = run_through_temp_file(&source)?;
            let status = if output.success {
                format!("{GREEN}Success{RESET}")
            } else {
                format!("Failed (exit code {:?})", output.exit_code)
            };
            println!("so_long execution: {status}");
        }
        println!();
    }

    Ok(ExitCode::SUCCESS)
}

/// Feed a generated map to `./so_long` through a temp file that is removed
/// afterwards.
fn run_through_temp_file(source: &str) -> CliResult<proc::CommandOutput> {
    let tmp = env::temp_dir().join(format!(
        "moulinette_gen_{}_{}.ber",
        process::id(),
        logs::timestamp_millis()
    ));

    fs::write(&tmp, source)
        .map_err(|e| CliError::failure(format!("Error writing temporary map file: {e}")))?;

    let result = proc::run_command("./so_long", [tmp.as_os_str()]);
    let _ = fs::remove_file(&tmp);

    result.map_err(|e| CliError::failure(format!("Error running so_long: {e}")))
}

// ============================================================================
// Tests
// ============================================================================
