use itertools::Itertools;
use log::{info, warn};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::model::{BoardError, Cell, Grid, KindId, Position};

use super::match_finder;

/// Redistribute the kinds of all non-obstacle tiles uniformly at random
/// over the same positions (Fisher-Yates), retrying up to `max_attempts`
/// permutations until the result has at least one potential match. On
/// failure the pre-shuffle assignment is restored and `UnshuffleableBoard`
/// is returned, a legitimate terminal state for a level with too few kinds
/// or too many obstacles.
pub fn shuffle(
    grid: &mut Grid,
    rng: &mut impl Rng,
    max_attempts: u32,
) -> Result<Vec<(Position, KindId)>, BoardError> {
    let (positions, original_kinds): (Vec<Position>, Vec<KindId>) = grid.tiles().unzip();

    let mut kinds = original_kinds.clone();
    for attempt in 1..=max_attempts {
        kinds.shuffle(rng);
        for (&pos, &kind) in positions.iter().zip(kinds.iter()) {
            grid.set(pos, Cell::Tile(kind));
        }
        if match_finder::has_any_potential_match(grid) {
            if attempt > 1 {
                info!(target: "shuffler", "playable permutation found on attempt {}", attempt);
            }
            return Ok(positions.iter().copied().zip_eq(kinds).collect());
        }
    }

    for (&pos, &kind) in positions.iter().zip(original_kinds.iter()) {
        grid.set(pos, Cell::Tile(kind));
    }
    warn!(
        target: "shuffler",
        "no playable permutation of {} tiles after {} attempts",
        positions.len(),
        max_attempts
    );
    Err(BoardError::UnshuffleableBoard {
        attempts: max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_shuffle_preserves_the_kind_multiset() {
        let mut grid = Grid::parse(
            "\
abca
b#cb
aacc",
        );
        let before: Vec<KindId> = grid.tiles().map(|(_, kind)| kind).sorted().collect();
        let positions_before: Vec<Position> = grid.tiles().map(|(pos, _)| pos).collect();

        let mut rng = StdRng::seed_from_u64(11);
        shuffle(&mut grid, &mut rng, 50).unwrap();

        let after: Vec<KindId> = grid.tiles().map(|(_, kind)| kind).sorted().collect();
        let positions_after: Vec<Position> = grid.tiles().map(|(pos, _)| pos).collect();
        assert_eq!(before, after);
        assert_eq!(positions_before, positions_after);
        assert!(grid.get(Position::new(1, 1)).is_obstacle());
        assert!(match_finder::has_any_potential_match(&grid));
    }

    #[test]
    fn test_shuffle_is_deterministic_for_a_seed() {
        let template = Grid::parse(
            "\
abcab
bcabc
cabca",
        );

        let mut first = template.clone();
        let mut second = template.clone();
        let placements_first = shuffle(&mut first, &mut StdRng::seed_from_u64(42), 50).unwrap();
        let placements_second = shuffle(&mut second, &mut StdRng::seed_from_u64(42), 50).unwrap();

        assert_eq!(first, second);
        assert_eq!(placements_first, placements_second);
    }

    #[test]
    fn test_all_obstacle_board_is_unshuffleable() {
        let mut grid = Grid::parse("####");
        let mut rng = StdRng::seed_from_u64(3);
        let err = shuffle(&mut grid, &mut rng, 50).unwrap_err();
        assert_eq!(err, BoardError::UnshuffleableBoard { attempts: 50 });
        assert_eq!(grid, Grid::parse("####"));
    }

    #[test]
    fn test_unshuffleable_board_is_restored() {
        // two tiles of different kinds can never form a potential match
        let mut grid = Grid::parse("ab");
        let mut rng = StdRng::seed_from_u64(5);
        let err = shuffle(&mut grid, &mut rng, 10).unwrap_err();
        assert_eq!(err, BoardError::UnshuffleableBoard { attempts: 10 });
        assert_eq!(grid, Grid::parse("ab"));
    }
}
