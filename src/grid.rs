// src/grid.rs

//! Row-major 2-D grids and quarter-turn rotation.

/// A rectangular, row-major grid of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T: Copy> Grid<T> {
    /// Creates a `width × height` grid with every cell set to `fill`.
    pub fn filled(width: usize, height: usize, fill: T) -> Self {
        Self {
            width,
            height,
            cells: vec![fill; width * height],
        }
    }

    /// Wraps existing row-major cells. Returns `None` if the cell count does
    /// not match the dimensions.
    pub fn from_cells(width: usize, height: usize, cells: Vec<T>) -> Option<Self> {
        if cells.len() != width * height {
            return None;
        }
        Some(Self {
            width,
            height,
            cells,
        })
    }

    /// Builds a grid by evaluating `f(x, y)` for each cell.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                cells.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn get(&self, x: usize, y: usize) -> Option<T> {
        if x < self.width && y < self.height {
            Some(self.cells[y * self.width + x])
        } else {
            None
        }
    }

    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        // chunks_exact(0) panics; an empty grid has no rows.
        self.cells.chunks_exact(self.width.max(1)).take(self.height)
    }

    /// Applies `f` to every cell, keeping the shape.
    pub fn map<U: Copy>(&self, f: impl FnMut(T) -> U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            cells: self.cells.iter().copied().map(f).collect(),
        }
    }

    /// Rotates clockwise by `turns × 90°`. See [`rotate_90`].
    pub fn rotate_90(&self, turns: u32) -> Self {
        rotate_90(self, turns)
    }
}

/// Rotates `grid` clockwise by `turns × 90°`, producing a new grid.
///
/// Odd `turns` swap width and height. `turns` is taken modulo 4, so
/// `rotate_90(&rotate_90(&g, 1), 3) == g`.
pub fn rotate_90<T: Copy>(grid: &Grid<T>, turns: u32) -> Grid<T> {
    let (w, h) = grid.dimensions();
    let src = grid.cells();

    match turns % 4 {
        0 => grid.clone(),
        // Source (x, y) lands at (h - 1 - y, x) in an h × w grid.
        1 => Grid::from_fn(h, w, |x, y| src[(h - 1 - x) * w + y]),
        2 => Grid::from_fn(w, h, |x, y| src[(h - 1 - y) * w + (w - 1 - x)]),
        // Source (x, y) lands at (y, w - 1 - x).
        _ => Grid::from_fn(h, w, |x, y| src[x * w + (w - 1 - y)]),
    }
}

#[cfg(test)]
mod tests;
