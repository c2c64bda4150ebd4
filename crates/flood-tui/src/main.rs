mod app;
mod game;
mod render;
mod storage;
mod theme;

use app::App;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

/// Terminal flood puzzle: recolor the center region until the whole board
/// is one color.
#[derive(Parser)]
#[command(name = "flood", version, about)]
struct Args {
    /// Save file to load on startup
    save: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut app = App::new();
    if let Some(path) = &args.save {
        match fs::read_to_string(path) {
            Ok(text) => app.load_save_text(&text),
            Err(err) => {
                eprintln!("flood: cannot open {}: {err}", path.display());
                std::process::exit(1);
            }
        }
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Run the app
    let result = run_app(&mut stdout, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen)?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

fn run_app(stdout: &mut io::Stdout, app: &mut App) -> io::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        // Tick rate follows the screen: slower for play, paced for the
        // solver animation
        let tick_rate = app.get_tick_rate();

        // Render
        render::render(stdout, app)?;
        stdout.flush()?;

        // Handle input with timeout so ticks keep coming
        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                // Handle Ctrl+C
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                    break;
                }

                match app.handle_key(key) {
                    app::AppAction::Continue => {}
                    app::AppAction::Quit => break,
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}
