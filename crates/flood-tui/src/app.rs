use crate::game::{self, Mode, Outcome, Session};
use crate::storage::{self, SaveFile};
use crate::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent};
use flood_core::{Color, Grid, Progress};
use std::time::Duration;

/// Result of handling a key press
pub enum AppAction {
    Continue,
    Quit,
}

/// Current screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Main menu
    Menu,
    /// Normal gameplay
    Playing,
    /// Auto-solver animation, one fill per tick
    Solving,
    /// Board settings for standard games
    Options,
    /// Saved game list for loading
    LoadMenu,
    /// Saved game list for deleting
    DeleteMenu,
    /// Win banner over the finished board
    Won,
    /// Loss banner over the finished board
    Lost,
    /// Whole challenge run finished
    RunComplete,
}

/// Main menu entries, in display order
pub const MENU_ITEMS: [(&str, &str); 6] = [
    ("s", "Start game"),
    ("c", "Challenge run"),
    ("o", "Options"),
    ("l", "Load game"),
    ("d", "Delete saves"),
    ("q", "Quit"),
];

/// Board parameters for standard games, edited on the options screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardOptions {
    pub width: usize,
    pub height: usize,
    pub colors: Color,
}

impl Default for BoardOptions {
    fn default() -> Self {
        Self {
            width: 19,
            height: 19,
            colors: 6,
        }
    }
}

impl BoardOptions {
    pub const MIN_SIZE: usize = 5;
    pub const MAX_SIZE: usize = 25;
    pub const MIN_COLORS: Color = 2;
    pub const MAX_COLORS: Color = flood_core::MAX_COLORS;

    /// Sizes move in steps of two so they stay odd and the pivot is a true
    /// center cell.
    fn adjust_size(value: usize, delta: isize) -> usize {
        value
            .saturating_add_signed(delta * 2)
            .clamp(Self::MIN_SIZE, Self::MAX_SIZE)
    }

    fn adjust_colors(value: Color, delta: isize) -> Color {
        (value as isize + delta).clamp(Self::MIN_COLORS as isize, Self::MAX_COLORS as isize)
            as Color
    }
}

/// The main application state
pub struct App {
    /// Current screen
    pub screen: Screen,
    /// Session being played, if any
    pub session: Option<Session>,
    /// Color theme
    pub theme: Theme,
    /// Standard-game board settings
    pub options: BoardOptions,
    /// Selected main menu item
    pub menu_selection: usize,
    /// Selected options row
    pub options_selection: usize,
    /// Save files shown in the load/delete menus
    pub saves: Vec<SaveFile>,
    /// Selected save file
    pub save_selection: usize,
    /// Whether the quit confirmation overlay is up
    pub confirm_quit: bool,
    /// Message to display
    pub message: Option<String>,
    /// Message timer
    message_timer: u32,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            screen: Screen::Menu,
            session: None,
            theme: Theme::dark(),
            options: BoardOptions::default(),
            menu_selection: 0,
            options_selection: 0,
            saves: Vec::new(),
            save_selection: 0,
            confirm_quit: false,
            message: None,
            message_timer: 0,
        }
    }

    /// Get the tick rate based on current screen
    pub fn get_tick_rate(&self) -> Duration {
        match self.screen {
            Screen::Solving => Duration::from_millis(150), // solver animation pace
            _ => Duration::from_millis(100),
        }
    }

    /// Update timers and the solver animation (called every tick)
    pub fn tick(&mut self) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message = None;
            }
        }

        if self.screen == Screen::Solving {
            self.solve_step();
        }
    }

    /// Show a temporary message
    pub fn show_message(&mut self, msg: &str) {
        self.message = Some(msg.to_string());
        self.message_timer = 30; // ~3 seconds at 100ms poll
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        match self.screen {
            Screen::Menu => self.handle_menu_key(key),
            Screen::Playing => self.handle_playing_key(key),
            Screen::Solving => self.handle_solving_key(key),
            Screen::Options => self.handle_options_key(key),
            Screen::LoadMenu | Screen::DeleteMenu => self.handle_save_list_key(key),
            Screen::Won | Screen::Lost | Screen::RunComplete => self.handle_result_key(key),
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.menu_selection = self.menu_selection.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.menu_selection = (self.menu_selection + 1).min(MENU_ITEMS.len() - 1);
            }
            KeyCode::Enter | KeyCode::Char(' ') => return self.activate_menu_item(),

            // Letter hotkeys mirror the menu entries
            KeyCode::Char('s') => self.start_standard(),
            KeyCode::Char('c') => self.start_challenge_run(),
            KeyCode::Char('o') => {
                self.options_selection = 0;
                self.screen = Screen::Options;
            }
            KeyCode::Char('l') => self.open_saves(Screen::LoadMenu),
            KeyCode::Char('d') => self.open_saves(Screen::DeleteMenu),
            KeyCode::Char('q') | KeyCode::Esc => return AppAction::Quit,
            _ => {}
        }
        AppAction::Continue
    }

    fn activate_menu_item(&mut self) -> AppAction {
        match self.menu_selection {
            0 => self.start_standard(),
            1 => self.start_challenge_run(),
            2 => {
                self.options_selection = 0;
                self.screen = Screen::Options;
            }
            3 => self.open_saves(Screen::LoadMenu),
            4 => self.open_saves(Screen::DeleteMenu),
            _ => return AppAction::Quit,
        }
        AppAction::Continue
    }

    fn handle_playing_key(&mut self, key: KeyEvent) -> AppAction {
        if self.confirm_quit {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    self.confirm_quit = false;
                    self.finish_with_quit();
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc | KeyCode::Enter => {
                    self.confirm_quit = false;
                }
                _ => {}
            }
            return AppAction::Continue;
        }

        let Some(mode) = self.session.as_ref().map(Session::mode) else {
            self.screen = Screen::Menu;
            return AppAction::Continue;
        };

        match key.code {
            // Color input; 0 only lands on legacy boards where it is a color
            KeyCode::Char(c @ '0'..='9') => {
                let color = c.to_digit(10).unwrap() as Color;
                if let Some(session) = self.session.as_mut() {
                    session.play(color);
                }
                self.after_move();
            }

            // Auto-solve, free play only
            KeyCode::Char('h') | KeyCode::Char('H') if mode == Mode::Standard => {
                self.screen = Screen::Solving;
            }

            KeyCode::Char('s') | KeyCode::Char('S') => self.save_current(),

            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                let dirty = self.session.as_ref().is_some_and(Session::is_dirty);
                if dirty {
                    self.confirm_quit = true;
                } else {
                    self.finish_with_quit();
                }
            }

            _ => {}
        }
        AppAction::Continue
    }

    /// Any key skips the animation and finishes the solve at once.
    fn handle_solving_key(&mut self, _key: KeyEvent) -> AppAction {
        if let Some(session) = self.session.as_mut() {
            while session.auto_step() {}
        }
        self.after_move();
        AppAction::Continue
    }

    fn handle_options_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.options_selection = self.options_selection.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.options_selection = (self.options_selection + 1).min(2);
            }
            KeyCode::Left | KeyCode::Char('h') => self.adjust_option(-1),
            KeyCode::Right | KeyCode::Char('l') => self.adjust_option(1),
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') => {
                self.screen = Screen::Menu;
            }
            _ => {}
        }
        AppAction::Continue
    }

    fn adjust_option(&mut self, delta: isize) {
        match self.options_selection {
            0 => self.options.width = BoardOptions::adjust_size(self.options.width, delta),
            1 => self.options.height = BoardOptions::adjust_size(self.options.height, delta),
            _ => self.options.colors = BoardOptions::adjust_colors(self.options.colors, delta),
        }
    }

    fn handle_save_list_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.save_selection = self.save_selection.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let max = self.saves.len().saturating_sub(1);
                self.save_selection = (self.save_selection + 1).min(max);
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if self.screen == Screen::LoadMenu {
                    self.load_selected();
                } else {
                    self.delete_selected();
                }
            }
            KeyCode::Esc | KeyCode::Char('q') => {
                self.screen = Screen::Menu;
            }
            _ => {}
        }
        AppAction::Continue
    }

    /// Any key leaves a result screen. Challenge wins roll on to the next
    /// puzzle (or the run-complete banner); everything else returns to the
    /// menu.
    fn handle_result_key(&mut self, _key: KeyEvent) -> AppAction {
        match self.screen {
            Screen::Won => {
                let progress = self.session.as_ref().and_then(Session::progress);
                match progress.map(game::advance) {
                    Some(Some(next)) => self.start_challenge_puzzle(next),
                    Some(None) => self.screen = Screen::RunComplete,
                    None => {
                        self.session = None;
                        self.screen = Screen::Menu;
                    }
                }
            }
            _ => {
                self.session = None;
                self.screen = Screen::Menu;
            }
        }
        AppAction::Continue
    }

    fn start_standard(&mut self) {
        match Grid::new_random(self.options.width, self.options.height, self.options.colors) {
            Ok(grid) => {
                self.session = Some(Session::standard(grid));
                self.confirm_quit = false;
                self.screen = Screen::Playing;
            }
            Err(err) => self.show_message(&err.to_string()),
        }
    }

    fn start_challenge_run(&mut self) {
        self.start_challenge_puzzle(Progress { stage: 1, level: 0 });
    }

    fn start_challenge_puzzle(&mut self, progress: Progress) {
        let (width, height, colors) = game::stage_board(progress.stage);
        match Grid::new_random(width, height, colors) {
            Ok(grid) => {
                let session = Session::challenge(grid, progress);
                self.show_message(&format!(
                    "Stage {} level {}: {} moves",
                    progress.stage,
                    progress.level + 1,
                    session.moves_remaining().unwrap_or(0)
                ));
                self.session = Some(session);
                self.confirm_quit = false;
                self.screen = Screen::Playing;
            }
            Err(err) => self.show_message(&err.to_string()),
        }
    }

    /// Start a session from save-blob text. Unreadable blobs degrade to a
    /// fresh standard board rather than failing the program.
    pub fn load_save_text(&mut self, text: &str) {
        match flood_core::import(text) {
            Ok(data) => {
                if data.clamped > 0 {
                    self.show_message(&format!(
                        "{} cells were out of range and were clamped",
                        data.clamped
                    ));
                }
                self.session = Some(Session::from_save(data));
                self.confirm_quit = false;
                self.screen = Screen::Playing;
            }
            Err(err) => {
                log::warn!("save rejected: {err}");
                self.show_message("Save was unreadable, starting a fresh board");
                self.start_standard();
            }
        }
    }

    fn after_move(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        match session.outcome() {
            Outcome::Won => self.screen = Screen::Won,
            Outcome::Lost => self.screen = Screen::Lost,
            Outcome::Pending | Outcome::Quit => {}
        }
    }

    fn finish_with_quit(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.quit();
        }
        self.session = None;
        self.screen = Screen::Menu;
    }

    fn solve_step(&mut self) {
        let Some(session) = self.session.as_mut() else {
            self.screen = Screen::Menu;
            return;
        };
        session.auto_step();
        self.after_move();
    }

    fn save_current(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let blob = session.export();
        match storage::write_save(&blob, session.mode() == Mode::Challenge) {
            Ok(_) => {
                session.mark_saved();
                self.show_message("Game saved");
            }
            Err(err) => self.show_message(&format!("Failed to save: {err}")),
        }
    }

    fn open_saves(&mut self, screen: Screen) {
        self.saves = storage::list_saves();
        self.save_selection = 0;
        if self.saves.is_empty() {
            self.show_message("No saved games yet. Press s while playing to save");
        }
        self.screen = screen;
    }

    fn load_selected(&mut self) {
        let Some(save) = self.saves.get(self.save_selection) else {
            return;
        };
        match storage::read_save(&save.path) {
            Ok(text) => self.load_save_text(&text),
            Err(err) => self.show_message(&format!("Failed to read save: {err}")),
        }
    }

    fn delete_selected(&mut self) {
        let Some(save) = self.saves.get(self.save_selection) else {
            return;
        };
        match storage::delete_save(save) {
            Ok(()) => {
                self.show_message("Save deleted");
                self.saves = storage::list_saves();
                self.save_selection = 0;
            }
            Err(err) => self.show_message(&format!("Failed to delete save: {err}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    const CHECKER: &str = "W:3\nH:3\nM:2\n121202121\n";

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn code(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn checker_session() -> Session {
        Session::standard(Grid::from_export(CHECKER).unwrap())
    }

    fn playing_app(session: Session) -> App {
        let mut app = App::new();
        app.session = Some(session);
        app.screen = Screen::Playing;
        app
    }

    #[test]
    fn test_menu_selection_stays_in_bounds() {
        let mut app = App::new();
        app.handle_key(code(KeyCode::Up));
        assert_eq!(app.menu_selection, 0);
        for _ in 0..20 {
            app.handle_key(code(KeyCode::Down));
        }
        assert_eq!(app.menu_selection, MENU_ITEMS.len() - 1);
    }

    #[test]
    fn test_menu_quit() {
        let mut app = App::new();
        assert!(matches!(app.handle_key(key('q')), AppAction::Quit));
    }

    #[test]
    fn test_start_hotkey_uses_options() {
        let mut app = App::new();
        app.handle_key(key('s'));
        assert_eq!(app.screen, Screen::Playing);
        let session = app.session.as_ref().unwrap();
        assert_eq!(session.mode(), Mode::Standard);
        assert_eq!(session.grid().width(), 19);
        assert_eq!(session.grid().height(), 19);
        assert_eq!(session.grid().max_color(), 6);
    }

    #[test]
    fn test_challenge_hotkey_starts_stage_one() {
        let mut app = App::new();
        app.handle_key(key('c'));
        assert_eq!(app.screen, Screen::Playing);
        let session = app.session.as_ref().unwrap();
        assert_eq!(session.mode(), Mode::Challenge);
        assert_eq!(session.progress(), Some(Progress { stage: 1, level: 0 }));
        assert_eq!(session.grid().width(), 9);
        assert_eq!(session.grid().max_color(), 3);
        assert!(session.moves_remaining().is_some());
    }

    #[test]
    fn test_options_adjustment_clamps() {
        let mut app = App::new();
        app.handle_key(key('o'));
        assert_eq!(app.screen, Screen::Options);

        app.handle_key(code(KeyCode::Right));
        assert_eq!(app.options.width, 21);
        for _ in 0..20 {
            app.handle_key(code(KeyCode::Right));
        }
        assert_eq!(app.options.width, BoardOptions::MAX_SIZE);
        for _ in 0..20 {
            app.handle_key(code(KeyCode::Left));
        }
        assert_eq!(app.options.width, BoardOptions::MIN_SIZE);

        app.handle_key(code(KeyCode::Down));
        app.handle_key(code(KeyCode::Down));
        for _ in 0..20 {
            app.handle_key(code(KeyCode::Right));
        }
        assert_eq!(app.options.colors, BoardOptions::MAX_COLORS);

        app.handle_key(code(KeyCode::Esc));
        assert_eq!(app.screen, Screen::Menu);
    }

    #[test]
    fn test_digits_play_and_repeats_are_ignored() {
        let mut app = playing_app(checker_session());
        app.handle_key(key('2'));
        assert_eq!(app.session.as_ref().unwrap().moves_made(), 1);
        app.handle_key(key('2'));
        assert_eq!(app.session.as_ref().unwrap().moves_made(), 1);
    }

    #[test]
    fn test_zero_key_plays_on_legacy_boards() {
        let legacy = Session::standard(Grid::from_export("W:3\nH:1\nM:2\n010\n").unwrap());
        let mut app = playing_app(legacy);
        app.handle_key(key('0'));
        assert_eq!(app.screen, Screen::Won);
    }

    #[test]
    fn test_zero_key_is_ignored_on_generated_boards() {
        let seeded = Session::standard(Grid::from_seed(9, 9, 4, 8).unwrap());
        let mut app = playing_app(seeded);
        app.handle_key(key('0'));
        assert_eq!(app.session.as_ref().unwrap().moves_made(), 0);
        assert_eq!(app.screen, Screen::Playing);
    }

    #[test]
    fn test_winning_move_shows_win_screen() {
        let mut app = playing_app(checker_session());
        app.handle_key(key('2'));
        assert_eq!(app.screen, Screen::Playing);
        app.handle_key(key('1'));
        assert_eq!(app.screen, Screen::Won);
    }

    #[test]
    fn test_quit_with_unsaved_moves_asks_first() {
        let mut app = playing_app(checker_session());
        app.handle_key(key('2'));

        app.handle_key(key('q'));
        assert!(app.confirm_quit);
        assert_eq!(app.screen, Screen::Playing);

        app.handle_key(key('n'));
        assert!(!app.confirm_quit);
        assert_eq!(app.screen, Screen::Playing);

        app.handle_key(key('q'));
        app.handle_key(key('y'));
        assert_eq!(app.screen, Screen::Menu);
        assert!(app.session.is_none());
    }

    #[test]
    fn test_quit_without_moves_skips_confirm() {
        let mut app = playing_app(checker_session());
        app.handle_key(key('q'));
        assert_eq!(app.screen, Screen::Menu);
        assert!(app.session.is_none());
    }

    #[test]
    fn test_solve_hotkey_is_standard_only() {
        let mut app = playing_app(checker_session());
        app.handle_key(key('h'));
        assert_eq!(app.screen, Screen::Solving);

        let challenge = Session::challenge(
            Grid::from_export(CHECKER).unwrap(),
            Progress { stage: 1, level: 0 },
        );
        let mut app = playing_app(challenge);
        app.handle_key(key('h'));
        assert_eq!(app.screen, Screen::Playing);
    }

    #[test]
    fn test_solver_animation_steps_per_tick() {
        let mut app = playing_app(checker_session());
        app.handle_key(key('h'));

        app.tick();
        assert_eq!(app.session.as_ref().unwrap().moves_made(), 1);
        assert_eq!(app.screen, Screen::Solving);
        app.tick();
        assert_eq!(app.screen, Screen::Won);
        assert!(app.session.as_ref().unwrap().grid().solved());
    }

    #[test]
    fn test_any_key_finishes_the_solve() {
        let mut app = playing_app(checker_session());
        app.handle_key(key('h'));
        app.handle_key(code(KeyCode::Enter));
        assert_eq!(app.screen, Screen::Won);
        assert!(app.session.as_ref().unwrap().grid().solved());
    }

    #[test]
    fn test_challenge_win_advances_to_next_level() {
        let challenge = Session::challenge(
            Grid::from_export(CHECKER).unwrap(),
            Progress { stage: 1, level: 0 },
        );
        let mut app = playing_app(challenge);
        app.handle_key(key('2'));
        app.handle_key(key('1'));
        assert_eq!(app.screen, Screen::Won);

        app.handle_key(code(KeyCode::Enter));
        assert_eq!(app.screen, Screen::Playing);
        let session = app.session.as_ref().unwrap();
        assert_eq!(session.progress(), Some(Progress { stage: 1, level: 1 }));
        assert_eq!(session.moves_made(), 0);
    }

    #[test]
    fn test_final_win_completes_the_run() {
        let challenge = Session::challenge(
            Grid::from_export(CHECKER).unwrap(),
            Progress { stage: 7, level: 2 },
        );
        let mut app = playing_app(challenge);
        app.handle_key(key('2'));
        app.handle_key(key('1'));
        assert_eq!(app.screen, Screen::Won);

        app.handle_key(code(KeyCode::Enter));
        assert_eq!(app.screen, Screen::RunComplete);
        app.handle_key(code(KeyCode::Enter));
        assert_eq!(app.screen, Screen::Menu);
        assert!(app.session.is_none());
    }

    #[test]
    fn test_standard_win_returns_to_menu() {
        let mut app = playing_app(checker_session());
        app.handle_key(key('2'));
        app.handle_key(key('1'));
        app.handle_key(code(KeyCode::Enter));
        assert_eq!(app.screen, Screen::Menu);
        assert!(app.session.is_none());
    }

    #[test]
    fn test_unreadable_save_degrades_to_fresh_board() {
        let mut app = App::new();
        // Payload is two cells short of the declared 3x3
        app.load_save_text("W:3\nH:3\nM:2\n1212021\n");
        assert_eq!(app.screen, Screen::Playing);
        assert!(app.message.is_some());
        let session = app.session.as_ref().unwrap();
        assert_eq!(session.mode(), Mode::Standard);
        assert_eq!(session.grid().width(), 19);
    }

    #[test]
    fn test_save_text_resumes_challenge() {
        let mut app = App::new();
        app.load_save_text("W:3\nH:3\nM:2\n121202121\n2:1\n");
        assert_eq!(app.screen, Screen::Playing);
        let session = app.session.as_ref().unwrap();
        assert_eq!(session.mode(), Mode::Challenge);
        assert_eq!(session.progress(), Some(Progress { stage: 2, level: 1 }));
    }

    #[test]
    fn test_messages_decay_after_ticks() {
        let mut app = App::new();
        app.show_message("hello");
        assert!(app.message.is_some());
        for _ in 0..30 {
            app.tick();
        }
        assert!(app.message.is_none());
    }
}
