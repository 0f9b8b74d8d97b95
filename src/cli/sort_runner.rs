//! Sorting harness: cross-check `push_swap` against its `checker`.
//!
//! Random cases pipe `push_swap args | checker args` and expect the
//! checker's `OK`. The adversarial battery feeds known-bad argument
//! strings; those cases pass when the pipeline rejects the input
//! gracefully (anything but a `KO` or a failed spawn).

use std::path::Path;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::proc::{self, CommandOutput};
use crate::report::{BOLD, CaseResult, ConsoleReporter, GREEN, RED, RESET, Reporter, Summary};

use super::commands::run_norminette;
use super::{CliError, CliResult, ExitCode};

/// Adversarial argument strings the pipeline must reject gracefully.
const EDGE_PARAMS: [&str; 20] = [
    "",
    " ",
    "   ",
    "-",
    "---",
    "+",
    "+++",
    "+1+",
    "1+1",
    "1-1",
    "~",
    "a",
    "-a",
    "-2a",
    "-0",
    "?",
    "2147483648",
    "-2147483649",
    "-2147483649123123112",
    "-214748364812123123131312113123123123123123123",
];

/// Entry point for `moulinette sort`.
pub fn run_sort(cases: usize, max_args: usize, seed: Option<u64>) -> CliResult<ExitCode> {
    if !Path::new("./push_swap").is_file() {
        return Err(CliError::failure(
            "The file 'push_swap' does not exist, maybe you forgot to make?",
        ));
    }
    if !Path::new("./checker").is_file() {
        return Err(CliError::failure(
            "The file 'checker' does not exist, maybe you forgot to make?",
        ));
    }
    if max_args == 0 {
        return Err(CliError::failure("--max-args must be at least 1"));
    }

    match run_norminette(None) {
        Ok(report) if report.passed => println!("{GREEN}Norm OK!{RESET}"),
        Ok(report) => {
            for file in &report.offending_files {
                println!("{RED}{file} is not normed!{RESET}");
            }
        }
        Err(e) => println!("{RED}Norminette did not run: {e}{RESET}"),
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    // verbose so the adversarial battery shows each rejection verdict
    let start = Instant::now();
    let mut reporter = ConsoleReporter::new(true);
    let mut summary = Summary::default();

    println!("\n{BOLD}=== random tests ==={RESET}");
    for case in 0..cases {
        let len = rng.gen_range(1..=max_args);
        let args: Vec<String> = (0..len).map(|_| rng.r#gen::<i32>().to_string()).collect();

        let result = match run_pipeline(&args) {
            Ok(output) => {
                let verdict = verdict_line(&output);
                if verdict == "OK" {
                    CaseResult::Ok
                } else {
                    CaseResult::Failed(format!(
                        "checker said {verdict:?} for {len} argument(s)"
                    ))
                }
            }
            Err(e) => CaseResult::Failed(format!("pipeline failed: {e}")),
        };

        summary.record(&result);
        reporter.on_case_complete(&format!("random #{:03} ({len} args)", case + 1), &result);
    }

    println!("\n{BOLD}=== adversarial arguments ==={RESET}");
    for param in EDGE_PARAMS {
        let args = vec![param.to_string()];
        let result = match run_pipeline(&args) {
            Ok(output) => {
                let verdict = verdict_line(&output).to_string();
                if verdict == "KO" {
                    CaseResult::Failed(format!("checker said KO for {param:?}"))
                } else if verdict == "OK" {
                    CaseResult::Ok
                } else {
                    CaseResult::OkRejected(format!("rejected with {verdict:?}"))
                }
            }
            Err(e) => CaseResult::Failed(format!("pipeline failed: {e}")),
        };

        summary.record(&result);
        reporter.on_case_complete(&format!("edge {param:?}"), &result);
    }

    summary.duration = start.elapsed();
    reporter.on_run_complete(&summary);

    if summary.failed > 0 {
        // Summary already printed by the reporter
        Err(CliError::new("", ExitCode::FAILURE))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn run_pipeline(args: &[String]) -> Result<CommandOutput, proc::ProcError> {
    proc::run_piped("./push_swap", args, "./checker", args)
}

/// The checker's verdict line: `OK`/`KO` land on stdout, `Error` on stderr.
fn verdict_line(output: &CommandOutput) -> &str {
    let stdout = output.stdout.trim();
    if stdout.is_empty() {
        output.stderr.trim()
    } else {
        stdout
    }
}

// ============================================================================
// Tests
// ============================================================================
