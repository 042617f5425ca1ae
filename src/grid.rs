use std::fmt;

use rand::Rng;
use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeSeq, Serializer};

/// Default grid dimensions (square).
pub const ROWS: usize = 30;
pub const COLS: usize = 30;

/// Default random fill probability.
pub const DEFAULT_FILL: f64 = 0.3;

/// Fixed-size toroidal cell grid. Cells are strictly 0 (dead) or 1 (alive),
/// stored row-major. Dimensions are fixed at construction and never change.
///
/// In-bounds indices are a precondition for `get`/`set`/`toggle`; bounds
/// validation belongs to the caller (the UI layer). Wrapped access goes
/// through `get_wrapped`/`set_wrapped`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<u8>,
}

/// Validation failure when building a grid from raw nested rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridShapeError {
    /// No rows, or a zero-length first row.
    Empty,
    /// Row `row` has `len` cells where `expected` were required.
    Ragged {
        row: usize,
        len: usize,
        expected: usize,
    },
    /// Cell at `(row, col)` holds `value`, which is neither 0 nor 1.
    BadCell { row: usize, col: usize, value: u8 },
}

impl fmt::Display for GridShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridShapeError::Empty => write!(f, "grid data is empty"),
            GridShapeError::Ragged { row, len, expected } => {
                write!(f, "row {row} has {len} cells, expected {expected}")
            }
            GridShapeError::BadCell { row, col, value } => {
                write!(f, "cell ({row}, {col}) has value {value}, expected 0 or 1")
            }
        }
    }
}

impl std::error::Error for GridShapeError {}

impl Grid {
    /// An all-dead grid. Deterministic, side-effect-free.
    pub fn empty(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![0; rows * cols],
        }
    }

    /// An all-dead grid at the default 30×30 size.
    pub fn empty_default() -> Self {
        Self::empty(ROWS, COLS)
    }

    /// A grid where each cell is independently alive with probability `fill`.
    /// The generator is caller-supplied so tests can seed it.
    pub fn random<R: Rng + ?Sized>(rows: usize, cols: usize, fill: f64, rng: &mut R) -> Self {
        let cells = (0..rows * cols)
            .map(|_| u8::from(rng.gen_range(0.0..1.0) < fill))
            .collect();
        Self { rows, cols, cells }
    }

    /// A 30×30 grid randomized at the default fill from the thread RNG.
    pub fn random_default() -> Self {
        Self::random(ROWS, COLS, DEFAULT_FILL, &mut rand::thread_rng())
    }

    /// Build a grid from nested rows of 0/1 values, validating shape and
    /// cell values. Inverse of `to_rows`.
    pub fn from_rows(rows: Vec<Vec<u8>>) -> Result<Self, GridShapeError> {
        if rows.is_empty() || rows[0].is_empty() {
            return Err(GridShapeError::Empty);
        }
        let cols = rows[0].len();
        let mut cells = Vec::with_capacity(rows.len() * cols);
        for (r, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(GridShapeError::Ragged {
                    row: r,
                    len: row.len(),
                    expected: cols,
                });
            }
            for (c, &value) in row.iter().enumerate() {
                if value > 1 {
                    return Err(GridShapeError::BadCell { row: r, col: c, value });
                }
                cells.push(value);
            }
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            cells,
        })
    }

    /// The grid as nested rows of 0/1 values (the persisted form).
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.cells.chunks(self.cols).map(<[u8]>::to_vec).collect()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cell state at in-bounds `(r, c)`.
    pub fn get(&self, r: usize, c: usize) -> bool {
        debug_assert!(r < self.rows && c < self.cols);
        self.cells[r * self.cols + c] == 1
    }

    /// Set the cell at in-bounds `(r, c)`.
    pub fn set(&mut self, r: usize, c: usize, alive: bool) {
        debug_assert!(r < self.rows && c < self.cols);
        self.cells[r * self.cols + c] = u8::from(alive);
    }

    /// Flip the cell at in-bounds `(r, c)`, touching no other cell.
    pub fn toggle(&mut self, r: usize, c: usize) {
        debug_assert!(r < self.rows && c < self.cols);
        self.cells[r * self.cols + c] ^= 1;
    }

    /// Cell state with toroidal wrapping on both axes.
    pub fn get_wrapped(&self, r: i64, c: i64) -> bool {
        let (wr, wc) = self.wrap(r, c);
        self.cells[wr * self.cols + wc] == 1
    }

    /// Set a cell with toroidal wrapping on both axes.
    pub fn set_wrapped(&mut self, r: i64, c: i64, alive: bool) {
        let (wr, wc) = self.wrap(r, c);
        self.cells[wr * self.cols + wc] = u8::from(alive);
    }

    fn wrap(&self, r: i64, c: i64) -> (usize, usize) {
        let h = self.rows as i64;
        let w = self.cols as i64;
        let wr = ((r % h) + h) % h;
        let wc = ((c % w) + w) % w;
        (wr as usize, wc as usize)
    }

    /// Count live cells.
    pub fn population(&self) -> u64 {
        self.cells.iter().map(|&c| u64::from(c)).sum()
    }

    /// True when every cell is dead.
    pub fn is_empty_of_life(&self) -> bool {
        self.cells.iter().all(|&c| c == 0)
    }

    /// Inclusive bounding box `(r0, c0, r1, c1)` of alive cells, or `None`
    /// when every cell is dead.
    pub fn bounding_box(&self) -> Option<(usize, usize, usize, usize)> {
        let mut bounds: Option<(usize, usize, usize, usize)> = None;
        for r in 0..self.rows {
            for c in 0..self.cols {
                if self.get(r, c) {
                    bounds = Some(match bounds {
                        None => (r, c, r, c),
                        Some((r0, c0, r1, c1)) => (r0.min(r), c0.min(c), r1.max(r), c1.max(c)),
                    });
                }
            }
        }
        bounds
    }

    /// Place a pattern of center-relative offsets, wrapping at the edges.
    pub fn place_pattern(&mut self, pattern: &[(i64, i64)], center: Option<(i64, i64)>) {
        let (cr, cc) = center.unwrap_or((self.rows as i64 / 2, self.cols as i64 / 2));
        for &(dr, dc) in pattern {
            self.set_wrapped(cr + dr, cc + dc, true);
        }
    }
}

// The persisted form is exactly the nested 0/1 array, row-major, so the
// JSON on disk reads `[[0,1,...],...]` with no wrapper object.
impl Serialize for Grid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows))?;
        for row in self.cells.chunks(self.cols) {
            seq.serialize_element(row)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Grid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rows = Vec::<Vec<u8>>::deserialize(deserializer)?;
        Grid::from_rows(rows).map_err(de::Error::custom)
    }
}

// ── Predefined patterns ──

/// Glider: small, moving pattern.
pub fn pattern_glider() -> Vec<(i64, i64)> {
    vec![(-1, 0), (0, 1), (1, -1), (1, 0), (1, 1)]
}

/// Blinker: the period-2 three-cell oscillator.
pub fn pattern_blinker() -> Vec<(i64, i64)> {
    vec![(0, -1), (0, 0), (0, 1)]
}

/// Block: the 2×2 still life.
pub fn pattern_block() -> Vec<(i64, i64)> {
    vec![(0, 0), (0, 1), (1, 0), (1, 1)]
}
