use crate::rng::Pcg32;
use thiserror::Error;

/// Cell color value. Freshly generated boards use `0` for the uncolored
/// pivot marker and `1..=max_color` for every other cell; imported boards
/// may carry `0` as an ordinary color.
pub type Color = u8;

/// Highest supported color count. The save payload stores one decimal digit
/// per cell, so values past 9 cannot round-trip.
pub const MAX_COLORS: Color = 9;

/// Largest supported board edge. Generated boards stay far below this;
/// the cap keeps imported saves within coordinates a terminal can address.
pub const MAX_DIMENSION: usize = 255;

/// Errors from board construction and save import.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Width or height outside `1..=MAX_DIMENSION`.
    #[error("board dimensions must be between 1x1 and {MAX_DIMENSION}x{MAX_DIMENSION}")]
    InvalidDimension,
    /// Color count outside `1..=MAX_COLORS`.
    #[error("color count must be between 1 and {MAX_COLORS}")]
    InvalidColorCount,
    /// Save text did not match the expected layout.
    #[error("malformed save data: {0}")]
    MalformedSave(&'static str),
}

/// A rectangular board of colored cells, played by repeatedly recoloring
/// the connected region around the fixed center pivot until the whole
/// board is one color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    max_color: Color,
    /// Row-major cell values, each in `0..=max_color`.
    cells: Vec<Color>,
    /// Seed that regenerates this board's starting position. `None` for
    /// boards imported from saves that predate seed persistence.
    seed: Option<u64>,
}

impl Grid {
    /// Generate a board from a fresh entropy seed.
    pub fn new_random(width: usize, height: usize, max_color: Color) -> Result<Self, GridError> {
        Self::from_seed(width, height, max_color, Pcg32::entropy_seed())
    }

    /// Deterministically generate a board from `seed`. Cells are uniform
    /// draws over `1..=max_color` in row-major order; the pivot is then
    /// overwritten with the `0` marker.
    pub fn from_seed(
        width: usize,
        height: usize,
        max_color: Color,
        seed: u64,
    ) -> Result<Self, GridError> {
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(GridError::InvalidDimension);
        }
        if max_color == 0 || max_color > MAX_COLORS {
            return Err(GridError::InvalidColorCount);
        }

        let mut rng = Pcg32::with_seed(seed);
        let cells = (0..width * height)
            .map(|_| rng.next_color(max_color))
            .collect();

        let mut grid = Self {
            width,
            height,
            max_color,
            cells,
            seed: Some(seed),
        };
        let pivot = grid.pivot_index();
        grid.cells[pivot] = 0;
        Ok(grid)
    }

    /// Assemble a board from already-validated parts (the save codec's
    /// entry point). `cells` must hold `width * height` values, each at
    /// most `max_color`.
    pub(crate) fn from_parts(
        width: usize,
        height: usize,
        max_color: Color,
        cells: Vec<Color>,
        seed: Option<u64>,
    ) -> Result<Self, GridError> {
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(GridError::InvalidDimension);
        }
        if max_color == 0 || max_color > MAX_COLORS {
            return Err(GridError::InvalidColorCount);
        }
        if cells.len() != width * height {
            return Err(GridError::MalformedSave("cell count does not match dimensions"));
        }
        debug_assert!(cells.iter().all(|&c| c <= max_color));

        Ok(Self {
            width,
            height,
            max_color,
            cells,
            seed,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn max_color(&self) -> Color {
        self.max_color
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Cell value at `(x, y)`.
    pub fn cell(&self, x: usize, y: usize) -> Color {
        self.cells[y * self.width + x]
    }

    /// Rows of cell values, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Color]> + '_ {
        self.cells.chunks(self.width)
    }

    /// The fixed fill origin, at the board's center.
    pub fn pivot(&self) -> (usize, usize) {
        (self.width / 2, self.height / 2)
    }

    fn pivot_index(&self) -> usize {
        (self.height / 2) * self.width + self.width / 2
    }

    /// True once every cell holds the same color.
    pub fn solved(&self) -> bool {
        self.cells.iter().all(|&c| c == self.cells[0])
    }

    /// Recolor the pivot's connected region to `color`. Filling with the
    /// region's current color is a valid no-op; move legality is the
    /// caller's concern.
    pub fn fill(&mut self, color: Color) {
        debug_assert!(color <= self.max_color);
        let mut members = Vec::new();
        self.scan_region(|idx| members.push(idx), |_| {});
        for idx in members {
            self.cells[idx] = color;
        }
    }

    /// Walk the pivot's connected same-colored region with an explicit work
    /// stack. `member` is called with the index of every region cell and
    /// `boundary` with the color of every distinct cell adjacent to the
    /// region. Cells are handled once, on first pop, so a scan visits at
    /// most `width * height` cells.
    pub(crate) fn scan_region<M, B>(&self, mut member: M, mut boundary: B)
    where
        M: FnMut(usize),
        B: FnMut(Color),
    {
        let origin = self.cells[self.pivot_index()];
        let mut visited = vec![false; self.cells.len()];
        let mut stack = vec![self.pivot_index()];

        while let Some(idx) = stack.pop() {
            if visited[idx] {
                continue;
            }
            visited[idx] = true;

            if self.cells[idx] != origin {
                boundary(self.cells[idx]);
                continue;
            }
            member(idx);

            let x = idx % self.width;
            if x > 0 && !visited[idx - 1] {
                stack.push(idx - 1);
            }
            if x + 1 < self.width && !visited[idx + 1] {
                stack.push(idx + 1);
            }
            if idx >= self.width && !visited[idx - self.width] {
                stack.push(idx - self.width);
            }
            if idx + self.width < self.cells.len() && !visited[idx + self.width] {
                stack.push(idx + self.width);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker_3x3() -> Grid {
        // 1 2 1
        // 2 0 2
        // 1 2 1
        Grid::from_parts(3, 3, 2, vec![1, 2, 1, 2, 0, 2, 1, 2, 1], None).unwrap()
    }

    #[test]
    fn test_same_seed_same_board() {
        let a = Grid::from_seed(19, 19, 6, 1234).unwrap();
        let b = Grid::from_seed(19, 19, 6, 1234).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_generated_board_shape() {
        let grid = Grid::from_seed(9, 7, 4, 99).unwrap();
        assert_eq!(grid.width(), 9);
        assert_eq!(grid.height(), 7);
        assert_eq!(grid.max_color(), 4);
        assert_eq!(grid.seed(), Some(99));
        assert_eq!(grid.pivot(), (4, 3));

        let (px, py) = grid.pivot();
        assert_eq!(grid.cell(px, py), 0);
        for (y, row) in grid.rows().enumerate() {
            for (x, &c) in row.iter().enumerate() {
                if (x, y) != (px, py) {
                    assert!(c >= 1 && c <= 4, "cell ({x}, {y}) out of range: {c}");
                }
            }
        }
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert_eq!(
            Grid::from_seed(0, 5, 3, 1).unwrap_err(),
            GridError::InvalidDimension
        );
        assert_eq!(
            Grid::from_seed(5, 0, 3, 1).unwrap_err(),
            GridError::InvalidDimension
        );
    }

    #[test]
    fn test_oversized_dimensions_rejected() {
        assert_eq!(
            Grid::from_seed(MAX_DIMENSION + 1, 5, 3, 1).unwrap_err(),
            GridError::InvalidDimension
        );
        assert_eq!(
            Grid::from_seed(5, 1000, 3, 1).unwrap_err(),
            GridError::InvalidDimension
        );
        assert!(Grid::from_seed(MAX_DIMENSION, 1, 3, 1).is_ok());
    }

    #[test]
    fn test_bad_color_counts_rejected() {
        assert_eq!(
            Grid::from_seed(5, 5, 0, 1).unwrap_err(),
            GridError::InvalidColorCount
        );
        assert_eq!(
            Grid::from_seed(5, 5, 10, 1).unwrap_err(),
            GridError::InvalidColorCount
        );
    }

    #[test]
    fn test_fill_recolors_plus_shape() {
        let mut grid = checker_3x3();
        grid.fill(2);

        // Only the pivot belonged to the region; corners are untouched and
        // the filled pivot now joins the 2s into a plus.
        let expected = [1, 2, 1, 2, 2, 2, 1, 2, 1];
        for (i, &want) in expected.iter().enumerate() {
            assert_eq!(grid.cell(i % 3, i / 3), want);
        }
        assert!(!grid.solved());

        grid.fill(1);
        assert!(grid.solved());
    }

    #[test]
    fn test_fill_does_not_cross_diagonals() {
        let mut grid = checker_3x3();
        // Corner 1s touch the pivot only diagonally, so filling with 1
        // must leave them as a separate region.
        grid.fill(1);
        assert_eq!(grid.cell(0, 0), 1);
        assert_eq!(grid.cell(1, 0), 2);
        assert_eq!(grid.cell(1, 1), 1);
        assert!(!grid.solved());
    }

    #[test]
    fn test_fill_same_color_is_noop() {
        let mut grid = checker_3x3();
        grid.fill(2);
        let before = grid.clone();
        grid.fill(2);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_uniform_board_stays_solved_through_fill() {
        let mut grid = Grid::from_parts(3, 2, 3, vec![2, 2, 2, 2, 2, 2], None).unwrap();
        assert!(grid.solved());
        grid.fill(2);
        assert!(grid.solved());
    }

    #[test]
    fn test_single_cell_board_starts_solved() {
        let grid = Grid::from_seed(1, 1, 1, 5).unwrap();
        assert!(grid.solved());
        assert_eq!(grid.cell(0, 0), 0);
    }

    #[test]
    fn test_region_growth_is_monotonic() {
        let mut grid = Grid::from_seed(11, 11, 3, 77).unwrap();
        let mut previous = 0;
        for color in [1u8, 2, 3, 1, 2, 3] {
            let mut count = 0;
            grid.scan_region(|_| count += 1, |_| {});
            assert!(count >= previous, "region shrank from {previous} to {count}");
            previous = count;
            grid.fill(color);
        }
    }
}
