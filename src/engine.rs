use rand::Rng;
use std::fmt;

/// Side length of the board.
pub const SIZE: usize = 4;

/// Tile value that marks a won game.
pub const WIN_TILE: u32 = 2048;

/// Largest tile a 4x4 board can ever hold (2^17).
pub const MAX_TILE: u32 = 1 << 17;

type Grid = [[u32; SIZE]; SIZE];

/// A direction to move/merge tiles.
///
/// Discriminants are the wire indices session drivers send (`0..=3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

// Index <-> direction <-> name, in index order.
static DIRECTION_TABLE: [(Direction, &str); 4] = [
    (Direction::Up, "up"),
    (Direction::Right, "right"),
    (Direction::Down, "down"),
    (Direction::Left, "left"),
];

impl Direction {
    /// All directions in index order.
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

    #[inline]
    pub fn index(self) -> usize { self as usize }

    /// Look up a direction by wire index; anything outside `0..=3` is `None`.
    pub fn from_index(index: i64) -> Option<Direction> {
        usize::try_from(index).ok().and_then(|i| DIRECTION_TABLE.get(i)).map(|&(dir, _)| dir)
    }

    #[inline]
    pub fn name(self) -> &'static str { DIRECTION_TABLE[self.index()].1 }

    /// Look up a direction by its lowercase name (`"up"`, `"right"`, ...).
    pub fn from_name(name: &str) -> Option<Direction> {
        DIRECTION_TABLE.iter().find(|&&(_, n)| n == name).map(|&(dir, _)| dir)
    }

    /// Normalize a request token to a direction: either a numeric index or a name.
    ///
    /// Surrounding whitespace is ignored. A numeric token must be a whole
    /// decimal integer (an optional sign is allowed, so `"+2"` is `Down`);
    /// prefixes like `"2abc"` are rejected. Names are lowercase only.
    ///
    /// ```
    /// use ai_2048_search::engine::Direction;
    /// assert_eq!(Direction::parse("2"), Some(Direction::Down));
    /// assert_eq!(Direction::parse("left"), Some(Direction::Left));
    /// assert_eq!(Direction::parse("7"), None);
    /// assert_eq!(Direction::parse("sideways"), None);
    /// assert_eq!(Direction::parse(" +2 "), Some(Direction::Down));
    /// assert_eq!(Direction::parse("2abc"), None);
    /// ```
    pub fn parse(token: &str) -> Option<Direction> {
        let token = token.trim();
        match token.parse::<i64>() {
            Ok(index) => Direction::from_index(index),
            Err(_) => Direction::from_name(token),
        }
    }

    /// Clockwise quarter turns that bring this direction onto "left".
    #[inline]
    fn left_rotations(self) -> usize {
        match self {
            Direction::Left => 0,
            Direction::Down => 1,
            Direction::Right => 2,
            Direction::Up => 3,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

/// Construction failure for a board or game rebuilt from external data.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidStateError {
    #[error("board must have {expected} rows, got {found}")]
    RowCount { expected: usize, found: usize },
    #[error("row {row} must have {expected} cells, got {found}")]
    RowLength { row: usize, expected: usize, found: usize },
    #[error("cell ({row}, {col}) holds {value}, which is neither 0 nor a power of two in 2..=131072")]
    TileValue { row: usize, col: usize, value: u32 },
    #[error("unknown last move {0:?}")]
    LastMove(String),
}

/// What a single slide did to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveOutcome {
    /// True if any cell changed.
    pub changed: bool,
    /// Sum of the values of all tiles created by merges.
    pub gained: u64,
}

impl MoveOutcome {
    #[inline]
    fn combine(self, other: MoveOutcome) -> MoveOutcome {
        MoveOutcome { changed: self.changed || other.changed, gained: self.gained + other.gained }
    }
}

/// A 4x4 2048 board holding actual tile values (0 for empty).
///
/// `Board` is `Copy`: every clone is a fully independent grid, so search
/// branches can never alias each other's storage.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board(Grid);

impl Board {
    /// A constant empty board (all zeros).
    pub const EMPTY: Board = Board([[0; SIZE]; SIZE]);

    /// A fresh board with two random tiles.
    ///
    /// ```
    /// use ai_2048_search::engine::Board;
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(123);
    /// let b = Board::new(&mut rng);
    /// assert_eq!(b.count_empty(), 14);
    /// ```
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut board = Board::EMPTY;
        board.spawn_tile(rng);
        board.spawn_tile(rng);
        board
    }

    /// Wrap a grid without validation.
    #[inline]
    pub fn from_rows(rows: [[u32; SIZE]; SIZE]) -> Self { Board(rows) }

    /// Build a board from untrusted rows, checking shape and tile values.
    pub fn try_from_rows(rows: &[Vec<u32>]) -> Result<Self, InvalidStateError> {
        if rows.len() != SIZE {
            return Err(InvalidStateError::RowCount { expected: SIZE, found: rows.len() });
        }
        let mut grid = [[0; SIZE]; SIZE];
        for (r, row) in rows.iter().enumerate() {
            if row.len() != SIZE {
                return Err(InvalidStateError::RowLength { row: r, expected: SIZE, found: row.len() });
            }
            for (c, &value) in row.iter().enumerate() {
                if !is_tile_value(value) {
                    return Err(InvalidStateError::TileValue { row: r, col: c, value });
                }
                grid[r][c] = value;
            }
        }
        Ok(Board(grid))
    }

    #[inline]
    pub fn rows(&self) -> &[[u32; SIZE]; SIZE] { &self.0 }

    /// Rows as owned vectors, the shape used by the state record.
    pub fn to_vecs(&self) -> Vec<Vec<u32>> { self.0.iter().map(|row| row.to_vec()).collect() }

    #[inline]
    pub fn tile(&self, row: usize, col: usize) -> u32 { self.0[row][col] }

    /// Iterate over all cell values, row-major.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ { self.0.iter().flat_map(|row| row.iter().copied()) }

    /// Put a 2 (90%) or 4 (10%) on a uniformly random empty cell.
    ///
    /// Returns the cell that was filled, or `None` if the board is full.
    pub fn spawn_tile<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<(usize, usize)> {
        let empty = self.count_empty();
        if empty == 0 {
            return None;
        }
        let mut index = rng.gen_range(0..empty);
        let value = generate_random_tile(rng);
        for r in 0..SIZE {
            for c in 0..SIZE {
                if self.0[r][c] != 0 {
                    continue;
                }
                if index == 0 {
                    self.0[r][c] = value;
                    return Some((r, c));
                }
                index -= 1;
            }
        }
        None
    }

    /// Slide and merge all tiles in `dir`, in place. No random insert.
    ///
    /// The grid is turned so that `dir` points left, every row is compacted
    /// and merged leftwards, and the grid is turned the rest of the way round
    /// so the total number of quarter turns is a multiple of four.
    ///
    /// ```
    /// use ai_2048_search::engine::{Board, Direction};
    /// let mut b = Board::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
    /// let outcome = b.apply_move(Direction::Left);
    /// assert!(outcome.changed);
    /// assert_eq!(outcome.gained, 4);
    /// assert_eq!(b.rows()[0], [4, 0, 0, 0]);
    /// ```
    pub fn apply_move(&mut self, dir: Direction) -> MoveOutcome {
        let turns = dir.left_rotations();
        for _ in 0..turns {
            self.rotate90();
        }
        let outcome = self
            .0
            .iter_mut()
            .fold(MoveOutcome::default(), |acc, row| acc.combine(merge_row_left(row)));
        for _ in 0..(SIZE - turns) % SIZE {
            self.rotate90();
        }
        outcome
    }

    /// Like [`Board::apply_move`] but on a copy, leaving `self` untouched.
    #[inline]
    pub fn shifted(self, dir: Direction) -> (Board, MoveOutcome) {
        let mut next = self;
        let outcome = next.apply_move(dir);
        (next, outcome)
    }

    /// True if sliding in `dir` would change anything.
    #[inline]
    pub fn can_move(&self, dir: Direction) -> bool { self.shifted(dir).1.changed }

    /// Rotate the grid a quarter turn clockwise, in place.
    pub fn rotate90(&mut self) {
        let old = self.0;
        for r in 0..SIZE {
            for c in 0..SIZE {
                self.0[r][c] = old[SIZE - 1 - c][r];
            }
        }
    }

    /// True if a 2048 tile is on the board.
    pub fn is_won(&self) -> bool { self.iter().any(|v| v == WIN_TILE) }

    /// True if no direction changes the board. Only scratch copies are moved.
    ///
    /// ```
    /// use ai_2048_search::engine::Board;
    /// // With no tiles there is nothing to slide.
    /// assert!(Board::EMPTY.is_terminal());
    /// ```
    pub fn is_terminal(&self) -> bool { Direction::ALL.iter().all(|&dir| !self.can_move(dir)) }

    /// Highest tile value on the board, 0 if empty.
    pub fn max_tile(&self) -> u32 { self.iter().max().unwrap_or(0) }

    /// Number of empty cells.
    pub fn count_empty(&self) -> usize { self.iter().filter(|&v| v == 0).count() }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "Board({:?})", self.0) }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        for (r, row) in self.0.iter().enumerate() {
            if r > 0 {
                writeln!(f, "-------------------------------")?;
            }
            let cells: Vec<String> = row.iter().map(|&v| format_val(v)).collect();
            writeln!(f, "{}", cells.join("|"))?;
        }
        Ok(())
    }
}

impl From<[[u32; SIZE]; SIZE]> for Board {
    fn from(rows: [[u32; SIZE]; SIZE]) -> Self { Board::from_rows(rows) }
}

#[inline]
fn is_tile_value(value: u32) -> bool { value == 0 || ((2..=MAX_TILE).contains(&value) && value.is_power_of_two()) }

fn generate_random_tile<R: Rng + ?Sized>(rng: &mut R) -> u32 { if rng.gen_range(0..10) < 9 { 2 } else { 4 } }

/// Compact and merge one row towards index 0.
///
/// Each destination slot pulls in the next nonzero tile to its right. An
/// empty destination takes the tile and keeps looking for an equal partner;
/// a destination that merges is done for this move, so merged tiles never
/// merge twice.
fn merge_row_left(row: &mut [u32; SIZE]) -> MoveOutcome {
    let mut outcome = MoveOutcome::default();
    for dest in 0..SIZE - 1 {
        for src in dest + 1..SIZE {
            let val = row[src];
            if val == 0 {
                continue;
            }
            if row[dest] == 0 {
                row[dest] = val;
                row[src] = 0;
                outcome.changed = true;
            } else if row[dest] == val {
                row[dest] += val;
                row[src] = 0;
                outcome.gained += row[dest] as u64;
                outcome.changed = true;
                break;
            } else {
                break;
            }
        }
    }
    outcome
}

fn format_val(val: u32) -> String {
    match val {
        0 => String::from("       "),
        x => format!("{:^7}", x),
    }
}
