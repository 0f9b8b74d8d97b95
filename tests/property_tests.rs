//! Property-based tests for the map validator
//!
//! These tests use proptest to verify invariants across many randomly
//! generated grids, catching edge cases that hand-written maps might miss.

use moulinette::grid::generate::generate;
use moulinette::grid::{Cell, Grid, MapError};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Rows for a walled grid with the given interior fill (row-major).
fn walled(interior_h: usize, interior_w: usize, fill: &[Cell]) -> Vec<Vec<Cell>> {
    let width = interior_w + 2;
    let height = interior_h + 2;
    let mut rows = vec![vec![Cell::Wall; width]; height];
    for row in 1..height - 1 {
        for col in 1..width - 1 {
            rows[row][col] = fill[(row - 1) * interior_w + (col - 1)];
        }
    }
    rows
}

/// Interior dimensions paired with a random interior fill.
fn interior_strategy() -> impl Strategy<Value = (usize, usize, Vec<Cell>)> {
    (2usize..=8, 2usize..=8).prop_flat_map(|(h, w)| {
        (
            Just(h),
            Just(w),
            prop::collection::vec(
                prop::sample::select(vec![Cell::Floor, Cell::Wall, Cell::Collectible]),
                h * w,
            ),
        )
    })
}

proptest! {
    /// Property: any grid whose border is not all walls is rejected with a
    /// border-related reason, whatever the interior looks like.
    #[test]
    fn non_walled_border_is_rejected(
        (h, w, fill) in interior_strategy(),
        border_pick in any::<prop::sample::Index>(),
    ) {
        let mut rows = walled(h, w, &fill);
        let height = rows.len();
        let width = rows[0].len();

        let mut border: Vec<(usize, usize)> = Vec::new();
        for col in 0..width {
            border.push((0, col));
            border.push((height - 1, col));
        }
        for row in 1..height - 1 {
            border.push((row, 0));
            border.push((row, width - 1));
        }

        let (row, col) = *border_pick.get(&border);
        rows[row][col] = Cell::Floor;

        let grid = Grid::from_rows(rows);
        let rejected = matches!(grid.validate(), Err(MapError::OpenBorder { .. }));
        prop_assert!(rejected);
    }

    /// Property: a grid without a player start never validates.
    #[test]
    fn missing_player_is_rejected((h, w, fill) in interior_strategy()) {
        let grid = Grid::from_rows(walled(h, w, &fill));
        prop_assert_eq!(grid.validate(), Err(MapError::MissingPlayer));
    }

    /// Property: two player starts never validate, wherever they land.
    #[test]
    fn duplicate_players_are_rejected(
        (h, w, fill) in interior_strategy(),
        first in any::<prop::sample::Index>(),
        second in any::<prop::sample::Index>(),
    ) {
        let interior: Vec<(usize, usize)> = (1..=h)
            .flat_map(|row| (1..=w).map(move |col| (row, col)))
            .collect();
        let a = *first.get(&interior);
        let b = *second.get(&interior);
        prop_assume!(a != b);

        let mut rows = walled(h, w, &fill);
        rows[a.0][a.1] = Cell::Player;
        rows[b.0][b.1] = Cell::Player;

        let grid = Grid::from_rows(rows);
        let rejected = matches!(grid.validate(), Err(MapError::DuplicatePlayer { .. }));
        prop_assert!(rejected);
    }

    /// Property: a solid wall row between start and exit always breaks
    /// reachability.
    #[test]
    fn solid_partition_breaks_reachability(w in 5usize..=12) {
        let rows = partitioned(w, None);
        let grid = Grid::from_rows(rows);
        let rejected = matches!(grid.validate(), Err(MapError::UnreachableExit { .. }));
        prop_assert!(rejected);
    }

    /// Property: punching a single gap through the partition restores the
    /// path, wherever the gap is.
    #[test]
    fn gap_in_partition_restores_reachability(w in 5usize..=12, gap_pick in any::<prop::sample::Index>()) {
        let gap = 1 + gap_pick.index(w - 2);
        let rows = partitioned(w, Some(gap));
        let grid = Grid::from_rows(rows);
        prop_assert_eq!(grid.validate(), Ok(()));
    }

    /// Property: generated candidate maps always satisfy the structural
    /// invariants; only reachability may fail.
    #[test]
    fn generated_candidates_fail_only_on_reachability(
        width in 3usize..=12,
        height in 3usize..=12,
        seed in any::<u64>(),
    ) {
        prop_assume!((width - 2) * (height - 2) >= 3);
        let mut rng = StdRng::seed_from_u64(seed);
        let grid = generate(width, height, &mut rng);

        let structurally_sound = matches!(
            grid.validate(),
            Ok(())
                | Err(MapError::UnreachableExit { .. })
                | Err(MapError::UnreachableCollectible { .. })
        );
        prop_assert!(structurally_sound, "structural failure in generated map");
    }
}

/// A 5-row grid: open top region with P and C, a wall row, open bottom
/// region with E. `gap` punches one floor cell through the wall row.
fn partitioned(width: usize, gap: Option<usize>) -> Vec<Vec<Cell>> {
    let mut rows = vec![vec![Cell::Wall; width]; 5];
    for col in 1..width - 1 {
        rows[1][col] = Cell::Floor;
        rows[3][col] = Cell::Floor;
    }
    rows[1][1] = Cell::Player;
    rows[1][width - 2] = Cell::Collectible;
    rows[3][width - 2] = Cell::Exit;
    if let Some(col) = gap {
        rows[2][col] = Cell::Floor;
    }
    rows
}
