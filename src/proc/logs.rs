//! `tester_logs/` lifecycle and captured-output filing.
//!
//! Every audit step writes its captured stdout/stderr under a name derived
//! from the command line, and stray files a step drops into the working
//! tree (valgrind annex files and the like) are swept into the log
//! directory afterwards so the next step starts from a clean tree.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Directory where captured tool output lands.
pub const LOG_DIR: &str = "tester_logs";

/// Filing sink for captured command output.
#[derive(Debug)]
pub struct LogSink {
    dir: PathBuf,
}

impl LogSink {
    /// Wipe and recreate the default log directory.
    pub fn create() -> io::Result<Self> {
        Self::create_at(Path::new(LOG_DIR))
    }

    /// Wipe and recreate a log directory at `dir`.
    pub fn create_at(dir: &Path) -> io::Result<Self> {
        match fs::remove_dir_all(dir) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        fs::create_dir_all(dir)?;
        Ok(LogSink {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write captured output under a name derived from the command line
    /// plus a timestamp. Returns the path written.
    pub fn write_capture(&self, command: &[&str], content: &str) -> io::Result<PathBuf> {
        let path = self
            .dir
            .join(format!("{}_{}.txt", file_stem_for(command), timestamp_millis()));
        fs::write(&path, content)?;
        Ok(path)
    }

    /// Move files that appeared under `root` since `before` into the log
    /// directory, renamed after the command that produced them.
    ///
    /// The binary under test and `.o` object files stay where the build
    /// put them.
    pub fn sweep_new_files(
        &self,
        root: &Path,
        before: &HashSet<PathBuf>,
        command: &[&str],
        binary: Option<&str>,
    ) -> io::Result<Vec<PathBuf>> {
        let mut moved = Vec::new();
        for file in collect_files(root) {
            // paths from a "." root carry a leading "./" component
            let in_log_dir = file.starts_with(&self.dir)
                || file
                    .strip_prefix(".")
                    .map(|p| p.starts_with(&self.dir))
                    .unwrap_or(false);
            if before.contains(&file) || in_log_dir {
                continue;
            }
            if file.extension().is_some_and(|ext| ext == "o") {
                continue;
            }
            if let Some(binary) = binary {
                let is_binary = Path::new(binary)
                    .file_name()
                    .is_some_and(|name| file.file_name() == Some(name));
                if is_binary {
                    continue;
                }
            }
            let Some(name) = file.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let target = self.dir.join(format!("{}_{}", file_stem_for(command), name));
            fs::rename(&file, &target)?;
            moved.push(target);
        }
        Ok(moved)
    }
}

/// All files under `root`, recursive, skipping hidden directories.
pub fn collect_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    collect_into(root, &mut files);
    files
}

/// Snapshot of the file set under `root`, for later sweeping.
pub fn snapshot(root: &Path) -> HashSet<PathBuf> {
    collect_files(root).into_iter().collect()
}

fn collect_into(dir: &Path, files: &mut Vec<PathBuf>) {
    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
                if !name.starts_with('.') {
                    collect_into(&path, files);
                }
            } else {
                files.push(path);
            }
        }
    }
}

fn file_stem_for(command: &[&str]) -> String {
    command.join("_").replace('/', "_")
}

pub(crate) fn timestamp_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

// ============================================================================
// Tests
// ============================================================================
