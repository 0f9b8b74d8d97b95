//! Integration tests for the map validator over fixture files

use std::fs;
use std::path::Path;

use moulinette::grid::{MapError, check_map};

/// Helper to validate a fixture map file
fn validate_file(path: &Path) -> Result<(), String> {
    let source = fs::read_to_string(path).map_err(|e| e.to_string())?;
    check_map(&source).map_err(|e| e.to_string())
}

/// Test that all valid fixture maps validate successfully
#[test]
fn test_valid_fixtures() {
    let fixtures_dir = Path::new("tests/fixtures/valid");

    let mut seen = 0;
    for entry in fs::read_dir(fixtures_dir).unwrap() {
        let entry = entry.unwrap();
        let path = entry.path();
        if path.extension().map(|e| e == "ber").unwrap_or(false) {
            seen += 1;
            let result = validate_file(&path);
            assert!(
                result.is_ok(),
                "Expected {} to validate successfully, got: {:?}",
                path.display(),
                result.unwrap_err()
            );
        }
    }
    assert!(seen > 0, "no valid fixture maps found");
}

/// Test that invalid fixture maps are rejected
#[test]
fn test_invalid_fixtures() {
    let fixtures_dir = Path::new("tests/fixtures/invalid");

    let mut seen = 0;
    for entry in fs::read_dir(fixtures_dir).unwrap() {
        let entry = entry.unwrap();
        let path = entry.path();
        if path.extension().map(|e| e == "ber").unwrap_or(false) {
            seen += 1;
            let result = validate_file(&path);
            assert!(
                result.is_err(),
                "Expected {} to be rejected, but it validated",
                path.display()
            );
        }
    }
    assert!(seen > 0, "no invalid fixture maps found");
}

/// Specific reasons for a few known-bad fixtures
mod rejection_reasons {
    use super::*;

    fn reason_for(name: &str) -> MapError {
        let path = Path::new("tests/fixtures/invalid").join(name);
        let source = fs::read_to_string(&path).unwrap();
        check_map(&source).unwrap_err()
    }

    #[test]
    fn boxed_exit_has_no_path() {
        assert!(matches!(
            reason_for("boxed_exit.ber"),
            MapError::UnreachableExit { .. }
        ));
    }

    #[test]
    fn open_border_is_a_border_reason() {
        assert!(matches!(
            reason_for("open_border.ber"),
            MapError::OpenBorder { .. }
        ));
    }

    #[test]
    fn two_players_are_duplicates() {
        assert!(matches!(
            reason_for("two_players.ber"),
            MapError::DuplicatePlayer { .. }
        ));
    }

    #[test]
    fn ragged_map_is_not_rectangular() {
        assert!(matches!(
            reason_for("not_rectangular.ber"),
            MapError::NotRectangular { .. }
        ));
    }

    #[test]
    fn unknown_character_is_reported_with_position() {
        assert_eq!(
            reason_for("bad_cell.ber"),
            MapError::InvalidCell {
                ch: 'X',
                row: 1,
                col: 3
            }
        );
    }

    #[test]
    fn blank_interior_line_is_malformed() {
        assert!(matches!(
            reason_for("blank_interior.ber"),
            MapError::InteriorBlank { .. }
        ));
    }

    #[test]
    fn missing_pieces_are_reported() {
        assert_eq!(reason_for("no_exit.ber"), MapError::MissingExit);
        assert_eq!(
            reason_for("no_collectible.ber"),
            MapError::MissingCollectibles
        );
    }
}
