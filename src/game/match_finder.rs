use itertools::Itertools;
use log::trace;

use crate::model::{Axis, Grid, KindId, MatchGroup, Position};

/// Neighbor probe order: down, up, left, right.
const NEIGHBOR_OFFSETS: [(isize, isize); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// First qualifying run in a fixed column-major scan (left-to-right,
/// bottom-to-top), extending rightward or upward from each cell, horizontal
/// checked before vertical. Cascades resolve one group per iteration and
/// re-scan, so "first" rather than "all" is load-bearing.
pub fn find_first_match(grid: &Grid, threshold: usize) -> Option<MatchGroup> {
    for origin in grid.positions() {
        let Some(kind) = grid.kind_at(origin) else {
            continue;
        };

        let mut horizontal = vec![origin];
        for col in origin.col + 1..grid.width() {
            let next = Position::new(col, origin.row);
            if grid.kind_at(next) == Some(kind) {
                horizontal.push(next);
            } else {
                break;
            }
        }
        if horizontal.len() >= threshold {
            return Some(MatchGroup::new(kind, Axis::Horizontal, horizontal));
        }

        let mut vertical = vec![origin];
        for row in origin.row + 1..grid.height() {
            let next = Position::new(origin.col, row);
            if grid.kind_at(next) == Some(kind) {
                vertical.push(next);
            } else {
                break;
            }
        }
        if vertical.len() >= threshold {
            return Some(MatchGroup::new(kind, Axis::Vertical, vertical));
        }
    }
    None
}

/// Whether a qualifying run passes *through* `pos`, expanding in all four
/// directions. Used to validate a tentative swap at each swapped position.
pub fn matches_at(grid: &Grid, pos: Position, threshold: usize) -> bool {
    let Some(kind) = grid.kind_at(pos) else {
        return false;
    };

    let run_length = |delta_col: isize, delta_row: isize| {
        let mut length = 0;
        let mut current = pos;
        while let Some(next) = grid.offset(current, delta_col, delta_row) {
            if grid.kind_at(next) != Some(kind) {
                break;
            }
            length += 1;
            current = next;
        }
        length
    };

    let horizontal = 1 + run_length(1, 0) + run_length(-1, 0);
    let vertical = 1 + run_length(0, 1) + run_length(0, -1);
    horizontal >= threshold || vertical >= threshold
}

/// Count of kinds that could complete an L/T-shaped near-match at `pos`:
/// for each distinct orthogonal-neighbor kind differing from the cell's
/// own, a move exists when at least 3 of the 4 neighbors share it.
fn neighbor_triangulation_at(grid: &Grid, pos: Position) -> usize {
    let Some(current) = grid.kind_at(pos) else {
        return 0;
    };

    let neighbor_kind = |offset: &(isize, isize)| {
        grid.offset(pos, offset.0, offset.1)
            .and_then(|neighbor| grid.kind_at(neighbor))
    };

    let candidate_kinds: Vec<KindId> = NEIGHBOR_OFFSETS
        .iter()
        .filter_map(&neighbor_kind)
        .filter(|&kind| kind != current)
        .unique()
        .collect();

    candidate_kinds
        .into_iter()
        .filter(|&kind| {
            let same_kind_neighbors = NEIGHBOR_OFFSETS
                .iter()
                .filter_map(&neighbor_kind)
                .filter(|&neighbor| neighbor == kind)
                .count();
            same_kind_neighbors >= 3
        })
        .count()
}

/// Count of diagonal cells that could be swapped in to extend a same-kind
/// pair starting at `pos` (rightward or upward) into a triple. The cells
/// just outside the pair's span must be inside the board and not obstacles,
/// since they are where the diagonal tile would land.
fn pair_diagonal_at(grid: &Grid, pos: Position) -> usize {
    let mut count = 0;

    let diagonals_for_pair = |outer_guard_a: Position,
                              outer_guard_b: Position,
                              pair: Position,
                              thirds: [(isize, isize); 4]| {
        if grid.is_obstacle(outer_guard_a) || grid.is_obstacle(outer_guard_b) {
            return 0;
        }
        let Some(kind) = grid.kind_at(pos) else {
            return 0;
        };
        if grid.kind_at(pair) != Some(kind) {
            return 0;
        }
        thirds
            .iter()
            .filter_map(|&(delta_col, delta_row)| grid.offset(pos, delta_col, delta_row))
            .filter(|&third| grid.kind_at(third) == Some(kind))
            .count()
    };

    if pos.col > 0 && pos.col + 2 < grid.width() {
        count += diagonals_for_pair(
            Position::new(pos.col - 1, pos.row),
            Position::new(pos.col + 2, pos.row),
            Position::new(pos.col + 1, pos.row),
            [(-1, -1), (-1, 1), (2, -1), (2, 1)],
        );
    }

    if pos.row > 0 && pos.row + 2 < grid.height() {
        count += diagonals_for_pair(
            Position::new(pos.col, pos.row - 1),
            Position::new(pos.col, pos.row + 2),
            Position::new(pos.col, pos.row + 1),
            [(-1, -1), (1, -1), (-1, 2), (1, 2)],
        );
    }

    count
}

/// Count of 4-cell spans starting at `pos` where cells 0, 1 and 3 share a
/// kind and cell 2 is not an obstacle, so the missing tile can be swapped
/// into the gap.
fn skip_one_triple_at(grid: &Grid, pos: Position) -> usize {
    let mut count = 0;

    if pos.col + 3 < grid.width()
        && !grid.is_obstacle(Position::new(pos.col + 2, pos.row))
    {
        let kinds = (
            grid.kind_at(pos),
            grid.kind_at(Position::new(pos.col + 1, pos.row)),
            grid.kind_at(Position::new(pos.col + 3, pos.row)),
        );
        if let (Some(first), Some(second), Some(fourth)) = kinds {
            if first == second && first == fourth {
                count += 1;
            }
        }
    }

    if pos.row + 3 < grid.height()
        && !grid.is_obstacle(Position::new(pos.col, pos.row + 2))
    {
        let kinds = (
            grid.kind_at(pos),
            grid.kind_at(Position::new(pos.col, pos.row + 1)),
            grid.kind_at(Position::new(pos.col, pos.row + 3)),
        );
        if let (Some(first), Some(second), Some(fourth)) = kinds {
            if first == second && first == fourth {
                count += 1;
            }
        }
    }

    count
}

/// Totals of the three independent potential-match detectors. They are
/// approximations, not an exhaustive swap trial; each over- or under-counts
/// in some obstacle layouts, but their union is what decides deadlocks.
pub fn potential_match_counts(grid: &Grid) -> (usize, usize, usize) {
    let mut triangulation = 0;
    let mut diagonal = 0;
    let mut triple = 0;
    for pos in grid.positions() {
        triangulation += neighbor_triangulation_at(grid, pos);
        diagonal += pair_diagonal_at(grid, pos);
        triple += skip_one_triple_at(grid, pos);
    }
    (triangulation, diagonal, triple)
}

/// A single legal swap can create a match iff any detector fires.
pub fn has_any_potential_match(grid: &Grid) -> bool {
    let (triangulation, diagonal, triple) = potential_match_counts(grid);
    trace!(
        target: "match_finder",
        "potential matches: triangulation={} diagonal={} skip-one={}",
        triangulation,
        diagonal,
        triple
    );
    triangulation + diagonal + triple > 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_first_match_none_on_scrambled_board() {
        let grid = Grid::parse(
            "\
abab
baba
abab",
        );
        assert_eq!(find_first_match(&grid, 3), None);
    }

    #[test]
    fn test_find_first_match_prefers_horizontal() {
        // both a horizontal and a vertical run start at (0,0); the
        // horizontal one must win
        let grid = Grid::parse(
            "\
abb
acc
aaa",
        );
        let group = find_first_match(&grid, 3).unwrap();
        assert_eq!(group.axis, Axis::Horizontal);
        assert_eq!(
            group.positions,
            vec![
                Position::new(0, 0),
                Position::new(1, 0),
                Position::new(2, 0)
            ]
        );
    }

    #[test]
    fn test_find_first_match_scans_column_major() {
        // vertical run in column 1; column 0 holds nothing
        let grid = Grid::parse(
            "\
.b.
.b.
.bc",
        );
        let group = find_first_match(&grid, 3).unwrap();
        assert_eq!(group.axis, Axis::Vertical);
        assert_eq!(group.kind, KindId(1));
        assert_eq!(group.positions[0], Position::new(1, 0));
    }

    #[test]
    fn test_find_first_match_run_broken_by_obstacle() {
        let grid = Grid::parse("aa#aa");
        assert_eq!(find_first_match(&grid, 3), None);
        assert!(find_first_match(&grid, 2).is_some());
    }

    #[test]
    fn test_matches_at_counts_through_the_cell() {
        let grid = Grid::parse("aba");
        assert!(!matches_at(&grid, Position::new(1, 0), 3));

        let grid = Grid::parse("aaa");
        assert!(matches_at(&grid, Position::new(1, 0), 3));
        assert!(matches_at(&grid, Position::new(0, 0), 3));
    }

    #[test]
    fn test_matches_at_vertical() {
        let grid = Grid::parse(
            "\
ca
cb
ab
ab",
        );
        // column 1 holds b,b,b reading down from row 2
        assert!(matches_at(&grid, Position::new(1, 1), 3));
        assert!(!matches_at(&grid, Position::new(0, 0), 3));
    }

    #[test]
    fn test_neighbor_triangulation_detects_t_shape() {
        // the center 'b' is surrounded by three 'a's; swapping it away
        // completes an 'a' triple
        let grid = Grid::parse(
            "\
.a.
aba
.c.",
        );
        let (triangulation, _, _) = potential_match_counts(&grid);
        assert!(triangulation >= 1);
        assert!(has_any_potential_match(&grid));
    }

    #[test]
    fn test_pair_diagonal_support() {
        // 'a' pair at (1,0)-(2,0); diagonal 'a' at (0,1) completes it by
        // swapping down into (0,0)
        let grid = Grid::parse(
            "\
ab.b
baab",
        );
        let (_, diagonal, _) = potential_match_counts(&grid);
        assert!(diagonal >= 1);
    }

    #[test]
    fn test_pair_diagonal_blocked_by_obstacle_on_span() {
        // same shape, but the landing cell left of the pair is an obstacle
        let grid = Grid::parse(
            "\
ab.b
#aab",
        );
        let (_, diagonal, _) = potential_match_counts(&grid);
        assert_eq!(diagonal, 0);
    }

    #[test]
    fn test_skip_one_triple_horizontal_and_vertical() {
        let grid = Grid::parse("aaba");
        let (_, _, triple) = potential_match_counts(&grid);
        assert_eq!(triple, 1);

        let grid = Grid::parse(
            "\
a
b
a
a",
        );
        let (_, _, triple) = potential_match_counts(&grid);
        assert_eq!(triple, 1);
    }

    #[test]
    fn test_skip_one_triple_gap_obstacle_excluded() {
        let grid = Grid::parse("aa#a");
        let (_, _, triple) = potential_match_counts(&grid);
        assert_eq!(triple, 0);
    }

    #[test]
    fn test_all_obstacle_board_has_no_potential_match() {
        let grid = Grid::parse("####");
        assert!(!has_any_potential_match(&grid));
    }

    #[test]
    fn test_no_potential_match_on_small_alternating_board() {
        // 2x2 alternation leaves no same-kind pair and no completable shape
        let grid = Grid::parse(
            "\
ab
ba",
        );
        assert!(!has_any_potential_match(&grid));
    }
}
