//! Greedy solving: the next-color heuristic, full auto-solve, and the
//! seed-replay move estimate that challenge budgets are built on.

use crate::grid::{Color, Grid, MAX_COLORS};

impl Grid {
    /// The color touching the pivot region along the most boundary cells.
    /// Ties resolve to the lowest color value. One-ply greedy: callers must
    /// not assume the choice minimizes total moves. On a solved board there
    /// is no boundary and the result is the `0` marker.
    pub fn best_color(&self) -> Color {
        let mut counts = [0u32; MAX_COLORS as usize + 1];
        self.scan_region(|_| {}, |color| counts[color as usize] += 1);

        let mut best = 0;
        for color in 1..=self.max_color() as usize {
            if counts[color] > counts[best] {
                best = color;
            }
        }
        best as Color
    }

    /// Solve by repeatedly applying [`Grid::best_color`], returning the
    /// move sequence. Every fill strictly grows the pivot region, so the
    /// loop runs at most `width * height` times.
    pub fn solve(&mut self) -> Vec<Color> {
        let mut moves = Vec::new();
        while !self.solved() {
            let color = self.best_color();
            self.fill(color);
            moves.push(color);
        }
        log::debug!("greedy solve finished in {} moves", moves.len());
        moves
    }

    /// Greedy move count for this board's starting position, replayed on a
    /// regenerated copy so the live board is untouched. `None` when the
    /// board was imported without a seed.
    pub fn estimate_moves(&self) -> Option<usize> {
        let seed = self.seed()?;
        let mut replay = Grid::from_seed(self.width(), self.height(), self.max_color(), seed).ok()?;
        Some(replay.solve().len())
    }
}
