//! Makefile patching for instrumented build profiles.
//!
//! Student Makefiles only ship `all`; `audit` wants one build per profile,
//! so the extra rules are appended for the duration of the run and exactly
//! those rules are removed again when it ends.

use std::fs;
use std::io;
use std::path::Path;

/// Rules appended to the project Makefile, one per instrumented profile.
pub const PROFILE_RULES: [&str; 3] = [
    "debug: FLAGS += -O0 -g\ndebug: all\n",
    "asan: FLAGS += -fsanitize=address\nasan: all\n",
    "tsan: FLAGS += -fsanitize=thread\ntsan: all\n",
];

/// Append any missing profile rules. Idempotent: rules already present are
/// never duplicated. Returns whether the file changed.
pub fn patch(path: &Path) -> io::Result<bool> {
    let mut content = fs::read_to_string(path)?;
    let mut changed = false;
    for rule in PROFILE_RULES {
        if !content.contains(rule) {
            if !content.ends_with('\n') {
                content.push('\n');
            }
            content.push_str(rule);
            changed = true;
        }
    }
    if changed {
        fs::write(path, &content)?;
    }
    Ok(changed)
}

/// Remove exactly the rules [`patch`] appends.
pub fn unpatch(path: &Path) -> io::Result<()> {
    let content = fs::read_to_string(path)?;
    let mut stripped = content.clone();
    for rule in PROFILE_RULES {
        stripped = stripped.replace(rule, "");
    }
    if stripped != content {
        fs::write(path, &stripped)?;
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_makefile(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("moulinette_makefile_{name}"));
        fs::write(&path, content).unwrap();
        path
    }

    const BASE: &str = "NAME = so_long\nall:\n\tcc -o $(NAME) main.c\n";

    #[test]
    fn patch_appends_all_profiles() {
        let path = temp_makefile("patch", BASE);
        assert!(patch(&path).unwrap());

        let content = fs::read_to_string(&path).unwrap();
        for rule in PROFILE_RULES {
            assert!(content.contains(rule));
        }
        assert!(content.starts_with(BASE));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn patch_is_idempotent() {
        let path = temp_makefile("idempotent", BASE);
        assert!(patch(&path).unwrap());
        let once = fs::read_to_string(&path).unwrap();
        assert!(!patch(&path).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), once);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn unpatch_restores_original() {
        let path = temp_makefile("unpatch", BASE);
        patch(&path).unwrap();
        unpatch(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), BASE);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn patch_handles_missing_trailing_newline() {
        let path = temp_makefile("no_newline", "all:\n\tcc main.c");
        patch(&path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("all:\n\tcc main.c\ndebug:"));

        let _ = fs::remove_file(&path);
    }
}
