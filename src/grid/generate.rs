//! Random candidate-map generation.
//!
//! Candidates get a solid wall border, a random interior, and one player,
//! one exit and one guaranteed collectible on distinct interior cells.
//! They are *candidates*: the random fill may wall off the exit or a
//! collectible, which is exactly what the `gen` self-check demonstrates.

use rand::Rng;

use super::{Cell, Coord, Grid};

/// Interior cell pool for the random fill.
const FILL: [Cell; 3] = [Cell::Floor, Cell::Wall, Cell::Collectible];

/// Generate a random candidate map of `width` x `height` cells.
///
/// The RNG is passed in so callers can seed with `StdRng` for
/// reproducible maps.
///
/// # Panics
///
/// Panics if the interior holds fewer than three cells; the CLI validates
/// dimensions before calling.
pub fn generate<R: Rng + ?Sized>(width: usize, height: usize, rng: &mut R) -> Grid {
    assert!(
        width >= 3 && height >= 3 && (width - 2) * (height - 2) >= 3,
        "map interior must hold at least three cells"
    );

    let mut rows = vec![vec![Cell::Wall; width]; height];
    for row in rows.iter_mut().take(height - 1).skip(1) {
        for cell in row.iter_mut().take(width - 1).skip(1) {
            *cell = FILL[rng.gen_range(0..FILL.len())];
        }
    }

    let player = random_interior(width, height, rng);
    rows[player.0][player.1] = Cell::Player;

    let mut exit = random_interior(width, height, rng);
    while exit == player {
        exit = random_interior(width, height, rng);
    }
    rows[exit.0][exit.1] = Cell::Exit;

    let mut collectible = random_interior(width, height, rng);
    while collectible == player || collectible == exit {
        collectible = random_interior(width, height, rng);
    }
    rows[collectible.0][collectible.1] = Cell::Collectible;

    Grid::from_rows(rows)
}

fn random_interior<R: Rng + ?Sized>(width: usize, height: usize, rng: &mut R) -> Coord {
    (rng.gen_range(1..height - 1), rng.gen_range(1..width - 1))
}
