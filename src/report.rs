//! Console reporting for harness runs.
//!
//! ## Reporter trait
//!
//! Harness loops report through the [`Reporter`] trait so execution stays
//! separate from output. Custom formats (JSON, TAP, ...) can be added by
//! implementing the trait; [`ConsoleReporter`] is the default.

use std::time::Duration;

use crate::grid::MapError;

/// ANSI palette shared by every harness.
pub const GREEN: &str = "\x1b[32m";
pub const RED: &str = "\x1b[31m";
pub const YELLOW: &str = "\x1b[33m";
pub const BOLD: &str = "\x1b[1m";
pub const RESET: &str = "\x1b[0m";

/// Outcome of a single harness case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseResult {
    /// The case passed.
    Ok,
    /// The case passed by rejecting bad input; the reason is kept for display.
    OkRejected(String),
    /// The case failed outright.
    Failed(String),
    /// The built-in validator and the binary under test disagreed.
    Discrepancy { validator: String, binary: String },
}

/// Aggregate counts for a finished run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub ok: usize,
    pub failed: usize,
    pub discrepancies: usize,
    pub duration: Duration,
}

impl Summary {
    /// Fold one case outcome into the counts.
    pub fn record(&mut self, result: &CaseResult) {
        self.total += 1;
        match result {
            CaseResult::Ok | CaseResult::OkRejected(_) => self.ok += 1,
            CaseResult::Failed(_) => self.failed += 1,
            CaseResult::Discrepancy { .. } => self.discrepancies += 1,
        }
    }

    /// Whether the run finished without failures or discrepancies.
    pub fn clean(&self) -> bool {
        self.failed == 0 && self.discrepancies == 0
    }
}

/// Trait for reporting harness execution results.
pub trait Reporter {
    /// Called once case collection is done.
    fn on_collection_complete(&mut self, case_count: usize);

    /// Called after each case.
    fn on_case_complete(&mut self, name: &str, result: &CaseResult);

    /// Called when the run finishes.
    fn on_run_complete(&mut self, summary: &Summary);
}

/// Default console reporter.
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    pub verbose: bool,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Reporter for ConsoleReporter {
    fn on_collection_complete(&mut self, case_count: usize) {
        if case_count == 0 {
            eprintln!("No cases collected");
        } else {
            println!("collected {case_count} case(s)");
            println!();
        }
    }

    fn on_case_complete(&mut self, name: &str, result: &CaseResult) {
        match result {
            CaseResult::Ok => println!("{name} {GREEN}OK{RESET}"),
            CaseResult::OkRejected(reason) => {
                if self.verbose {
                    println!("{name} {GREEN}OK{RESET} ({reason})");
                } else {
                    println!("{name} {GREEN}OK{RESET}");
                }
            }
            CaseResult::Failed(reason) => {
                println!("{name} {RED}Error{RESET}");
                println!("  {reason}");
            }
            CaseResult::Discrepancy { validator, binary } => {
                println!("{name} {YELLOW}Warning (discrepancy){RESET}");
                println!("  validator: {validator}");
                println!("  binary under test: {binary}");
            }
        }
    }

    fn on_run_complete(&mut self, summary: &Summary) {
        println!();

        let mut parts = vec![format!("{} ok", summary.ok)];
        if summary.failed > 0 {
            parts.push(format!("{} failed", summary.failed));
        }
        if summary.discrepancies > 0 {
            parts.push(format!("{} discrepancies", summary.discrepancies));
        }

        let color = if summary.clean() { GREEN } else { RED };
        println!(
            "{BOLD}{color}====== {} of {} in {:.2}s ======{RESET}",
            parts.join(", "),
            summary.total,
            summary.duration.as_secs_f64()
        );
    }
}

/// Render a map validation error with source context, compiler style: the
/// offending line plus a caret under the offending column.
pub fn render_map_error(file_name: &str, source: &str, error: &MapError) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{BOLD}{RED}invalid map{RESET}{BOLD}: {error}{RESET}\n"
    ));

    match error.location() {
        Some((row, col)) => {
            out.push_str(&format!("  --> {file_name}:{}:{}\n", row + 1, col + 1));
            if let Some(line) = source.lines().nth(row) {
                out.push_str(&format!("{:>4} | {line}\n", row + 1));
                out.push_str(&format!("     | {}{RED}^{RESET}\n", " ".repeat(col)));
            }
        }
        None => out.push_str(&format!("  --> {file_name}\n")),
    }

    out
}

// ============================================================================
// Tests
// ============================================================================
