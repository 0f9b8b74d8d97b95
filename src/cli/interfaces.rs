//! Harness I/O boundary interfaces.
//!
//! The map harness drives an opaque student binary; the trait keeps the
//! comparison loop testable without a compiled `so_long` on hand. The
//! default implementation preserves the real invocation.

use std::path::{Path, PathBuf};

use crate::proc::{self, CommandOutput, ProcError};

/// Run the binary under test against a single map file.
pub trait MapBinary {
    fn run_map(&self, map: &Path) -> Result<CommandOutput, ProcError>;
}

/// The real `so_long` binary on disk.
pub struct SoLongBinary {
    path: PathBuf,
}

impl SoLongBinary {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl MapBinary for SoLongBinary {
    fn run_map(&self, map: &Path) -> Result<CommandOutput, ProcError> {
        proc::run_command(&self.path.to_string_lossy(), [map.as_os_str()])
    }
}
