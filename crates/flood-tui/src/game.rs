use flood_core::{Color, Grid, Progress, SaveData};
use std::time::{Duration, Instant};

/// How a puzzle ended, or hasn't yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Still being played
    Pending,
    /// Board reduced to one color
    Won,
    /// Move budget exhausted with the board unsolved
    Lost,
    /// Abandoned by the player
    Quit,
}

/// Which rule set the session runs under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Free play with unlimited moves
    Standard,
    /// Budgeted stage/level run
    Challenge,
}

/// Number of stages in a challenge run
pub const STAGES: u32 = 7;
/// Levels played within each stage
pub const LEVELS_PER_STAGE: u32 = 3;

const BASE_SIZE: usize = 9;
const STAGE_SIZE_STEP: usize = 2;
const BASE_COLORS: Color = 3;

/// Board parameters for a challenge stage: width, height, color count.
/// Boards grow by two cells per axis and one color per stage, from 9x9
/// with 3 colors up to 21x21 with the full 9.
pub fn stage_board(stage: u32) -> (usize, usize, Color) {
    debug_assert!(stage >= 1 && stage <= STAGES);
    let size = BASE_SIZE + (stage - 1) as usize * STAGE_SIZE_STEP;
    (size, size, BASE_COLORS + (stage - 1) as Color)
}

/// Extra moves granted beyond the solver estimate; shrinks by one with
/// each level inside a stage.
pub fn tolerance(level: u32) -> u32 {
    LEVELS_PER_STAGE - level
}

/// The stage/level after a win, or `None` once the run is complete.
pub fn advance(progress: Progress) -> Option<Progress> {
    if progress.level + 1 < LEVELS_PER_STAGE {
        Some(Progress {
            stage: progress.stage,
            level: progress.level + 1,
        })
    } else if progress.stage < STAGES {
        Some(Progress {
            stage: progress.stage + 1,
            level: 0,
        })
    } else {
        None
    }
}

/// One interactive puzzle over an engine board
pub struct Session {
    /// The board being played
    grid: Grid,
    /// Rule set
    mode: Mode,
    /// Current result
    outcome: Outcome,
    /// Last accepted color, which the next move may not repeat
    last_color: Option<Color>,
    /// Accepted moves so far
    moves_made: u32,
    /// Remaining move budget; `None` in standard mode
    moves_remaining: Option<u32>,
    /// Challenge position; `None` in standard mode
    progress: Option<Progress>,
    /// Start time
    start_time: Instant,
    /// Elapsed time, frozen once the outcome settles
    elapsed: Duration,
    /// Whether there are moves since the last save
    dirty: bool,
}

impl Session {
    /// Free-play session with no move budget.
    pub fn standard(grid: Grid) -> Self {
        let outcome = if grid.solved() {
            Outcome::Won
        } else {
            Outcome::Pending
        };
        Self {
            grid,
            mode: Mode::Standard,
            outcome,
            last_color: None,
            moves_made: 0,
            moves_remaining: None,
            progress: None,
            start_time: Instant::now(),
            elapsed: Duration::ZERO,
            dirty: false,
        }
    }

    /// Budgeted challenge session at the given progression point.
    pub fn challenge(grid: Grid, progress: Progress) -> Self {
        Self::challenge_with_tolerance(grid, progress, tolerance(progress.level))
    }

    fn challenge_with_tolerance(grid: Grid, progress: Progress, tolerance: u32) -> Self {
        // Seed replay gives the estimate for the board's starting position;
        // boards imported without a seed estimate from the position as it
        // stands instead.
        let estimate = grid.estimate_moves().unwrap_or_else(|| {
            let mut scratch = grid.clone();
            scratch.solve().len()
        }) as u32;
        log::debug!(
            "stage {} level {}: budget {} ({} estimated + {} tolerance)",
            progress.stage,
            progress.level,
            estimate + tolerance,
            estimate,
            tolerance
        );

        let outcome = if grid.solved() {
            Outcome::Won
        } else {
            Outcome::Pending
        };
        Self {
            grid,
            mode: Mode::Challenge,
            outcome,
            last_color: None,
            moves_made: 0,
            moves_remaining: Some(estimate + tolerance),
            progress: Some(progress),
            start_time: Instant::now(),
            elapsed: Duration::ZERO,
            dirty: false,
        }
    }

    /// Rebuild a session from an imported save. Saves with a progression
    /// trailer resume the challenge run; trailers out of range are clamped
    /// onto the nearest valid stage and level.
    pub fn from_save(data: SaveData) -> Self {
        match data.progress {
            Some(p) => {
                let progress = Progress {
                    stage: p.stage.clamp(1, STAGES),
                    level: p.level.min(LEVELS_PER_STAGE - 1),
                };
                Self::challenge(data.grid, progress)
            }
            None => Self::standard(data.grid),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn moves_made(&self) -> u32 {
        self.moves_made
    }

    pub fn moves_remaining(&self) -> Option<u32> {
        self.moves_remaining
    }

    pub fn last_color(&self) -> Option<Color> {
        self.last_color
    }

    pub fn progress(&self) -> Option<Progress> {
        self.progress
    }

    /// Whether there are unsaved moves.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Lowest playable color. Freshly generated boards reserve 0 for the
    /// pivot marker, but on seedless legacy imports 0 is an ordinary color
    /// and refusing it would leave 0-regions unreachable.
    pub fn lowest_color(&self) -> Color {
        if self.grid.seed().is_none() {
            0
        } else {
            1
        }
    }

    /// Time spent on this puzzle.
    pub fn elapsed(&self) -> Duration {
        if self.outcome == Outcome::Pending {
            self.elapsed + self.start_time.elapsed()
        } else {
            self.elapsed
        }
    }

    /// Format the elapsed time as MM:SS
    pub fn elapsed_string(&self) -> String {
        let secs = self.elapsed().as_secs();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }

    /// Apply one player move. Returns false without consuming budget when
    /// the game is over, the color is outside
    /// `lowest_color..=max_color`, or it repeats the last accepted color.
    pub fn play(&mut self, color: Color) -> bool {
        if self.outcome != Outcome::Pending {
            return false;
        }
        if color < self.lowest_color() || color > self.grid.max_color() {
            return false;
        }
        if self.last_color == Some(color) {
            return false;
        }
        self.apply(color);
        true
    }

    /// One greedy solver move, for the animated auto-solve. Returns false
    /// once the outcome has settled.
    pub fn auto_step(&mut self) -> bool {
        if self.outcome != Outcome::Pending {
            return false;
        }
        let color = self.grid.best_color();
        self.apply(color);
        true
    }

    fn apply(&mut self, color: Color) {
        self.grid.fill(color);
        self.last_color = Some(color);
        self.moves_made += 1;
        self.dirty = true;
        if let Some(remaining) = self.moves_remaining.as_mut() {
            *remaining -= 1;
        }

        // A final budgeted move that solves the board still wins
        if self.grid.solved() {
            self.finish(Outcome::Won);
        } else if self.moves_remaining == Some(0) {
            self.finish(Outcome::Lost);
        }
    }

    /// Record that the player walked away from an unfinished board.
    pub fn quit(&mut self) {
        if self.outcome == Outcome::Pending {
            self.finish(Outcome::Quit);
        }
    }

    fn finish(&mut self, outcome: Outcome) {
        self.elapsed += self.start_time.elapsed();
        self.outcome = outcome;
    }

    /// Save text for this session; challenge saves carry the progression
    /// trailer.
    pub fn export(&self) -> String {
        flood_core::export(&self.grid, self.progress)
    }

    /// Mark the current position as persisted.
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }
}
