// availability mask for the placement grid.
//
// the mask is supplied once at the start of a run and never mutated by the
// search; blocked cells can never be covered by a placement.

use serde::{Deserialize, Serialize};
use std::fmt;

/// height × width matrix of cell availability, row-major.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mask {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

/// rejected row-matrix input (empty, ragged, or zero-width rows).
#[derive(Debug, PartialEq, Eq)]
pub struct MaskShapeError {
    pub row: usize,
    pub expected: usize,
    pub got: usize,
}

impl fmt::Display for MaskShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mask row {} has {} cells, expected {}",
            self.row, self.got, self.expected
        )
    }
}

impl std::error::Error for MaskShapeError {}

impl Mask {
    /// a fully available mask.
    pub fn open(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![true; width * height],
        }
    }

    /// build a mask from explicit rows (`true` = available). every row must
    /// have the same non-zero length.
    pub fn from_rows(rows: &[Vec<bool>]) -> Result<Self, MaskShapeError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        if height == 0 || width == 0 {
            return Err(MaskShapeError { row: 0, expected: 1, got: 0 });
        }
        let mut cells = Vec::with_capacity(width * height);
        for (row, r) in rows.iter().enumerate() {
            if r.len() != width {
                return Err(MaskShapeError { row, expected: width, got: r.len() });
            }
            cells.extend_from_slice(r);
        }
        Ok(Self { width, height, cells })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_available(&self, row: usize, col: usize) -> bool {
        self.cells[row * self.width + col]
    }

    /// mark a rectangle as blocked. the rectangle is clipped to the grid, so
    /// callers validate bounds separately if out-of-range input is an error.
    pub fn block_rect(&mut self, top: usize, left: usize, height: usize, width: usize) {
        let bottom = (top + height).min(self.height);
        let right = (left + width).min(self.width);
        for row in top..bottom {
            for col in left..right {
                self.cells[row * self.width + col] = false;
            }
        }
    }

    pub fn available_cells(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }
}
