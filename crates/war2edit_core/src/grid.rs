//! Tile grid backing the editor map

use war2edit_tile::TileCode;

use crate::bitmap::BitmapError;

/// One tile code per map cell, stored row-major in a single allocation.
///
/// `None` marks a cell that has not been drawn yet. The grid is sized once;
/// a map resize builds a new grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Option<TileCode>>,
}

impl Grid {
    /// Allocate an unset grid, reporting allocation failure instead of aborting
    pub fn try_new(width: u32, height: u32) -> Result<Self, BitmapError> {
        if width == 0 || height == 0 {
            return Err(BitmapError::InvalidDimensions { width, height });
        }
        let count = (width as usize)
            .checked_mul(height as usize)
            .ok_or(BitmapError::InvalidDimensions { width, height })?;

        let mut cells = Vec::new();
        cells
            .try_reserve_exact(count)
            .map_err(|_| BitmapError::Allocation {
                what: "grid",
                bytes: count.saturating_mul(std::mem::size_of::<Option<TileCode>>()),
            })?;
        cells.resize(count, None);

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if self.contains(x, y) {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Tile code at `(x, y)`; `None` when unset or out of bounds
    pub fn get(&self, x: u32, y: u32) -> Option<TileCode> {
        self.index(x, y).and_then(|idx| self.cells[idx])
    }

    /// Only the compositor writes cells
    pub(crate) fn set(&mut self, x: u32, y: u32, code: TileCode) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = Some(code);
                true
            }
            None => false,
        }
    }

    /// True once every cell holds a tile code
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Row `y` as a slice
    pub fn row(&self, y: u32) -> Option<&[Option<TileCode>]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.width as usize;
        Some(&self.cells[start..start + self.width as usize])
    }

    /// All cells, row-major
    pub fn cells(&self) -> &[Option<TileCode>] {
        &self.cells
    }
}
