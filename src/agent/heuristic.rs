//! Static board evaluation used at the leaves of the search.
//!
//! The score is a weighted sum of sub-metrics. The position and chain
//! metrics are implemented but weighted zero by default; raising their
//! weights switches them on, scaled by `log2(max tile)` like the other
//! placement terms.

use crate::engine::{Board, SIZE};

/// Max-tile exponent at which the win bonus kicks in (2^11 = 2048).
const WIN_EXPONENT: f64 = 11.0;

/// Weights for [`evaluate`]. Defaults reproduce the tuned player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicWeights {
    pub smoothness: f64,
    pub monotonicity: f64,
    pub max_tile: f64,
    pub empty: f64,
    /// Off by default.
    pub position: f64,
    /// Off by default.
    pub chain: f64,
    /// Flat bonus once a 2048 tile exists.
    pub win_bonus: f64,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self {
            smoothness: 2.0,
            monotonicity: 0.5,
            max_tile: 1.0,
            empty: 2.0,
            position: 0.0,
            chain: 0.0,
            win_bonus: 100.0,
        }
    }
}

/// Desirability of `board`; higher is better.
pub fn evaluate(board: &Board, weights: &HeuristicWeights) -> f64 {
    let max_log = max_tile_log2(board);
    let mut total = smoothness(board) * weights.smoothness
        + monotonicity(board) * weights.monotonicity
        + max_log * weights.max_tile
        + board.count_empty() as f64 * weights.empty;
    if weights.position != 0.0 {
        total += position_score(board) as f64 * max_log * weights.position;
    }
    if weights.chain != 0.0 {
        total += chain_score(board) * max_log * weights.chain;
    }
    if max_log >= WIN_EXPONENT {
        total += weights.win_bonus;
    }
    total
}

/// Sum of equal neighbours along rows and columns, over the max tile.
///
/// Each line is scanned with a cursor on the last nonzero tile seen, so
/// gaps are skipped rather than compared.
pub fn smoothness(board: &Board) -> f64 {
    let sum: u64 = lines(board)
        .map(|line| {
            scan_line(&line, |prev, cur| if cur == prev { cur as u64 } else { 0 })
        })
        .sum();
    sum as f64 / normalizer(board)
}

/// Sum over neighbouring tiles one merge step apart (`x` next to `2x`) of
/// the larger tile, along rows and columns, over the max tile.
pub fn monotonicity(board: &Board) -> f64 {
    let sum: u64 = lines(board)
        .map(|line| {
            scan_line(&line, |prev, cur| {
                if cur == prev * 2 || cur * 2 == prev { prev.max(cur) as u64 } else { 0 }
            })
        })
        .sum();
    sum as f64 / normalizer(board)
}

/// `log2` of the max tile; 0 for an empty board.
pub fn max_tile_log2(board: &Board) -> f64 {
    match board.max_tile() {
        0 => 0.0,
        max => (max as f64).log2(),
    }
}

/// Placement of the best-placed max tile, squared: corner 2, edge 1, inside 0.
pub fn position_score(board: &Board) -> u32 {
    max_cells(board)
        .into_iter()
        .map(|(row, col)| axis_score(row) + axis_score(col))
        .max()
        .map_or(0, |best| best * best)
}

/// Best mergeable chain radiating from a max tile, over the max tile.
///
/// Every walk from a max tile keeps one traversed list shared by the whole
/// walk, siblings included. Cells reached through one neighbour therefore
/// count as seen when a later sibling looks at them. Only equal-value hops
/// consult the list.
pub fn chain_score(board: &Board) -> f64 {
    let max = board.max_tile();
    if max == 0 {
        return 0.0;
    }
    max_cells(board)
        .into_iter()
        .map(|cell| {
            let mut traversed = Vec::new();
            chain_walk(board, cell, &mut traversed, true) as f64 / max as f64
        })
        .fold(0.0, f64::max)
}

/// A visited neighbour, keyed the way the walk identifies it.
type Visit = (u32, usize, usize);

fn chain_walk(board: &Board, (row, col): (usize, usize), traversed: &mut Vec<Visit>, first: bool) -> u64 {
    let value = board.tile(row, col) as u64;
    let hop = if first { 8 } else { 1 };
    let mut best = 0;
    for (n_val, r, c) in neighbors(board, row, col) {
        let seen = traversed.contains(&(n_val, r, c));
        traversed.push((n_val, r, c));
        let n_val = n_val as u64;
        let score = if value == n_val * 2 {
            value * hop + chain_walk(board, (r, c), traversed, false)
        } else if value == n_val && !seen {
            value * hop * 4 + chain_walk(board, (r, c), traversed, false)
        } else {
            0
        };
        best = best.max(score);
    }
    best
}

/// Nonzero orthogonal neighbours in the order up, left, right, down.
fn neighbors(board: &Board, row: usize, col: usize) -> Vec<Visit> {
    let candidates = [
        (row.checked_sub(1), Some(col)),
        (Some(row), col.checked_sub(1)),
        (Some(row), Some(col + 1)),
        (Some(row + 1), Some(col)),
    ];
    candidates
        .into_iter()
        .filter_map(|(r, c)| match (r, c) {
            (Some(r), Some(c)) if r < SIZE && c < SIZE && board.tile(r, c) != 0 => Some((board.tile(r, c), r, c)),
            _ => None,
        })
        .collect()
}

/// Cells holding the (nonzero) max tile, row-major.
fn max_cells(board: &Board) -> Vec<(usize, usize)> {
    let max = board.max_tile();
    if max == 0 {
        return Vec::new();
    }
    (0..SIZE)
        .flat_map(|r| (0..SIZE).map(move |c| (r, c)))
        .filter(|&(r, c)| board.tile(r, c) == max)
        .collect()
}

#[inline]
fn axis_score(coord: usize) -> u32 { (((coord + SIZE - 1) % SIZE) / 2) as u32 }

#[inline]
fn normalizer(board: &Board) -> f64 { board.max_tile().max(1) as f64 }

/// All rows left to right, then all columns top to bottom.
fn lines(board: &Board) -> impl Iterator<Item = [u32; SIZE]> + '_ {
    let rows = board.rows().iter().copied();
    let cols = (0..SIZE).map(move |c| {
        let mut col = [0; SIZE];
        for (r, cell) in col.iter_mut().enumerate() {
            *cell = board.tile(r, c);
        }
        col
    });
    rows.chain(cols)
}

/// Walk a line with a cursor on the previous nonzero tile (starting from the
/// first cell, even if empty) and sum `score(prev, cur)` for each nonzero tile.
fn scan_line(line: &[u32; SIZE], score: impl Fn(u32, u32) -> u64) -> u64 {
    let mut prev = line[0];
    let mut acc = 0;
    for &cur in &line[1..] {
        if cur != 0 {
            acc += score(prev, cur);
            prev = cur;
        }
    }
    acc
}
