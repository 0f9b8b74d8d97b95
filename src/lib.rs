#![forbid(unsafe_code)]
//! moulinette - test harnesses for 42-style C student projects
//!
//! Each harness is an independent, short-lived command-line invocation that
//! shells out to an external tool (compiler, memory checker, style checker)
//! or runs the built-in map validator, then prints a pass/fail summary:
//! `audit` (make + norminette + valgrind matrix), `sort` (push_swap vs.
//! checker), `maps` (map validator vs. so_long) and `gen` (random maps).
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: If a panic represents a harness bug (logic error), use an assert with a
//!   clear explanation, as in `grid::generate`.

pub mod cli;
pub mod grid;
pub mod proc;
pub mod report;
pub mod version;

pub use grid::{Cell, Grid, MapError, check_map};
pub use proc::{CommandOutput, ProcError};
pub use report::{CaseResult, ConsoleReporter, Reporter, Summary};
