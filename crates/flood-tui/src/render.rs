use crate::app::{App, BoardOptions, Screen, MENU_ITEMS};
use crate::game::{Mode, Outcome, Session};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    style::{Attribute, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use std::io;

pub fn render(stdout: &mut io::Stdout, app: &App) -> io::Result<()> {
    let (term_width, term_height) = terminal::size()?;

    execute!(stdout, Hide, Clear(ClearType::All))?;

    match app.screen {
        Screen::Menu => render_menu(stdout, app, term_width)?,
        Screen::Playing | Screen::Solving => render_game(stdout, app, term_width)?,
        Screen::Options => render_options(stdout, app, term_width)?,
        Screen::LoadMenu | Screen::DeleteMenu => render_save_list(stdout, app, term_width)?,
        Screen::Won | Screen::Lost => {
            render_game(stdout, app, term_width)?;
            render_result_banner(stdout, app, term_width, term_height)?;
        }
        Screen::RunComplete => render_run_complete(stdout, app, term_width, term_height)?,
    }

    if let Some(ref msg) = app.message {
        render_message(stdout, app, msg, term_width)?;
    }

    execute!(stdout, ResetColor, Show)?;
    Ok(())
}

fn render_menu(stdout: &mut io::Stdout, app: &App, term_width: u16) -> io::Result<()> {
    let theme = &app.theme;
    let x = term_width.saturating_sub(24) / 2;

    execute!(stdout, SetBackgroundColor(theme.bg))?;
    execute!(
        stdout,
        MoveTo(x, 2),
        SetForegroundColor(theme.title),
        Print("═══════ FLOOD ═══════")
    )?;
    execute!(
        stdout,
        MoveTo(x, 3),
        SetForegroundColor(theme.info),
        Print("fill the board, one color at a time")
    )?;

    for (i, (hotkey, label)) in MENU_ITEMS.iter().enumerate() {
        let y = 5 + i as u16;
        let bg = if i == app.menu_selection {
            theme.selected_bg
        } else {
            theme.bg
        };
        execute!(
            stdout,
            MoveTo(x, y),
            SetBackgroundColor(bg),
            SetForegroundColor(theme.key),
            Print(format!(" {hotkey} ")),
            SetForegroundColor(theme.fg),
            Print(format!(" {label:<16}"))
        )?;
    }

    execute!(
        stdout,
        MoveTo(x, 5 + MENU_ITEMS.len() as u16 + 1),
        SetBackgroundColor(theme.bg),
        SetForegroundColor(theme.info),
        Print("j/k move, Enter select")
    )?;

    Ok(())
}

fn render_game(stdout: &mut io::Stdout, app: &App, term_width: u16) -> io::Result<()> {
    let Some(session) = app.session.as_ref() else {
        return Ok(());
    };
    let theme = &app.theme;
    let grid = session.grid();

    // Each cell is two characters wide, the frame adds one column per
    // side, and the info panel sits to the right
    let board_width = (grid.width() * 2 + 2) as u16;
    let total_width = board_width + 26;
    let start_x = if term_width > total_width {
        (term_width - total_width) / 2
    } else {
        1
    };
    let start_y: u16 = 2;

    execute!(
        stdout,
        MoveTo(start_x, 0),
        SetBackgroundColor(theme.bg),
        SetForegroundColor(theme.title),
        Print("═══ FLOOD ═══")
    )?;

    render_board(stdout, app, session, start_x, start_y)?;

    let info_x = start_x + board_width + 2;
    render_info_panel(stdout, app, session, info_x, start_y)?;

    let controls_y = start_y + grid.height() as u16 + 3;
    render_controls(stdout, app, session, start_x, controls_y)?;

    if app.confirm_quit {
        let warning = " Unsaved moves will be lost! Quit anyway? (y/n) ";
        let x = term_width.saturating_sub(warning.len() as u16) / 2;
        execute!(
            stdout,
            MoveTo(x, start_y + 1 + grid.height() as u16 / 2),
            SetBackgroundColor(theme.error),
            SetForegroundColor(theme.fg),
            Print(warning)
        )?;
    }

    Ok(())
}

fn render_board(
    stdout: &mut io::Stdout,
    app: &App,
    session: &Session,
    x: u16,
    y: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    let grid = session.grid();
    let pivot = grid.pivot();
    let inner = grid.width() * 2;

    execute!(
        stdout,
        MoveTo(x, y),
        SetBackgroundColor(theme.bg),
        SetForegroundColor(theme.border),
        Print(format!("┌{}┐", "─".repeat(inner)))
    )?;

    for (row_idx, row) in grid.rows().enumerate() {
        let row_y = y + 1 + row_idx as u16;
        execute!(
            stdout,
            MoveTo(x, row_y),
            SetForegroundColor(theme.border),
            Print("│")
        )?;
        for (col_idx, &cell) in row.iter().enumerate() {
            // On legacy boards 0 is a real color, so it keeps its digit
            let label = if cell == 0 && session.lowest_color() > 0 {
                "· ".to_string()
            } else {
                format!("{cell} ")
            };
            execute!(
                stdout,
                SetBackgroundColor(theme.cell(cell)),
                SetForegroundColor(theme.fg)
            )?;
            if (col_idx, row_idx) == pivot {
                // The pivot stands out in reverse video
                execute!(
                    stdout,
                    SetAttribute(Attribute::Reverse),
                    Print(label),
                    SetAttribute(Attribute::NoReverse)
                )?;
            } else {
                execute!(stdout, Print(label))?;
            }
        }
        execute!(
            stdout,
            SetBackgroundColor(theme.bg),
            SetForegroundColor(theme.border),
            Print("│")
        )?;
    }

    execute!(
        stdout,
        MoveTo(x, y + 1 + grid.height() as u16),
        SetForegroundColor(theme.border),
        Print(format!("└{}┘", "─".repeat(inner)))
    )?;

    Ok(())
}

fn render_info_panel(
    stdout: &mut io::Stdout,
    app: &App,
    session: &Session,
    x: u16,
    y: u16,
) -> io::Result<()> {
    let theme = &app.theme;

    execute!(stdout, SetBackgroundColor(theme.bg))?;

    let mode_line = match (session.mode(), session.progress()) {
        (Mode::Challenge, Some(p)) => format!("Stage {} level {}", p.stage, p.level + 1),
        _ => "Free play".to_string(),
    };
    execute!(
        stdout,
        MoveTo(x, y),
        SetForegroundColor(theme.fg),
        Print(mode_line)
    )?;

    execute!(
        stdout,
        MoveTo(x, y + 2),
        SetForegroundColor(theme.info),
        Print(format!("Time:  {:>8}", session.elapsed_string()))
    )?;
    execute!(
        stdout,
        MoveTo(x, y + 3),
        SetForegroundColor(theme.info),
        Print(format!("Moves: {:>8}", session.moves_made()))
    )?;

    if let Some(remaining) = session.moves_remaining() {
        let color = if remaining <= 3 {
            theme.error
        } else {
            theme.info
        };
        execute!(
            stdout,
            MoveTo(x, y + 4),
            SetForegroundColor(color),
            Print(format!("Left:  {:>8}", remaining))
        )?;
    }

    // Color legend: each playable digit on its own background
    execute!(
        stdout,
        MoveTo(x, y + 6),
        SetForegroundColor(theme.info),
        Print("Colors: ")
    )?;
    for color in session.lowest_color()..=session.grid().max_color() {
        execute!(
            stdout,
            SetBackgroundColor(theme.cell(color)),
            SetForegroundColor(theme.fg),
            Print(format!("{color} "))
        )?;
    }
    execute!(stdout, SetBackgroundColor(theme.bg))?;

    if app.screen == Screen::Solving {
        execute!(
            stdout,
            MoveTo(x, y + 8),
            SetForegroundColor(theme.key),
            Print("Auto-solving...")
        )?;
    }

    Ok(())
}

fn render_controls(
    stdout: &mut io::Stdout,
    app: &App,
    session: &Session,
    x: u16,
    y: u16,
) -> io::Result<()> {
    let theme = &app.theme;

    let fill_keys = if session.lowest_color() == 0 {
        "0-9"
    } else {
        "1-9"
    };
    let mut controls: Vec<(&str, &str)> = vec![(fill_keys, "Fill"), ("s", "Save")];
    if session.mode() == Mode::Standard {
        controls.push(("h", "Solve"));
    }
    controls.push(("q", "Menu"));

    execute!(stdout, SetBackgroundColor(theme.bg))?;
    execute!(stdout, MoveTo(x, y))?;
    for (hotkey, desc) in controls {
        execute!(
            stdout,
            SetForegroundColor(theme.key),
            Print(format!("{hotkey} ")),
            SetForegroundColor(theme.info),
            Print(format!("{desc}   "))
        )?;
    }

    Ok(())
}

fn render_options(stdout: &mut io::Stdout, app: &App, term_width: u16) -> io::Result<()> {
    let theme = &app.theme;
    let x = term_width.saturating_sub(24) / 2;

    execute!(stdout, SetBackgroundColor(theme.bg))?;
    execute!(
        stdout,
        MoveTo(x, 2),
        SetForegroundColor(theme.title),
        Print("═══ OPTIONS ═══")
    )?;

    let rows = [
        ("Width", app.options.width.to_string()),
        ("Height", app.options.height.to_string()),
        ("Colors", app.options.colors.to_string()),
    ];
    for (i, (label, value)) in rows.iter().enumerate() {
        let bg = if i == app.options_selection {
            theme.selected_bg
        } else {
            theme.bg
        };
        execute!(
            stdout,
            MoveTo(x, 4 + i as u16),
            SetBackgroundColor(bg),
            SetForegroundColor(theme.fg),
            Print(format!(" {label:<8} "))
        )?;
        execute!(
            stdout,
            SetForegroundColor(theme.key),
            Print(format!("<  {value:>2}  > "))
        )?;
    }

    execute!(
        stdout,
        MoveTo(x, 9),
        SetBackgroundColor(theme.bg),
        SetForegroundColor(theme.info),
        Print(format!(
            "sizes {}-{} (odd), colors {}-{}",
            BoardOptions::MIN_SIZE,
            BoardOptions::MAX_SIZE,
            BoardOptions::MIN_COLORS,
            BoardOptions::MAX_COLORS
        ))
    )?;
    execute!(
        stdout,
        MoveTo(x, 10),
        SetForegroundColor(theme.info),
        Print("h/l adjust, Enter done")
    )?;

    Ok(())
}

fn render_save_list(stdout: &mut io::Stdout, app: &App, term_width: u16) -> io::Result<()> {
    let theme = &app.theme;
    let x = term_width.saturating_sub(36) / 2;
    let title = if app.screen == Screen::LoadMenu {
        "═══ LOAD GAME ═══"
    } else {
        "═══ DELETE SAVES ═══"
    };

    execute!(stdout, SetBackgroundColor(theme.bg))?;
    execute!(
        stdout,
        MoveTo(x, 2),
        SetForegroundColor(theme.title),
        Print(title)
    )?;

    if app.saves.is_empty() {
        execute!(
            stdout,
            MoveTo(x, 4),
            SetForegroundColor(theme.info),
            Print("(no saved games)")
        )?;
    }

    for (i, save) in app.saves.iter().enumerate() {
        let bg = if i == app.save_selection {
            theme.selected_bg
        } else {
            theme.bg
        };
        let tag = if save.challenge { "challenge" } else { "" };
        execute!(
            stdout,
            MoveTo(x, 4 + i as u16),
            SetBackgroundColor(bg),
            SetForegroundColor(theme.fg),
            Print(format!(" {:<20}", save.label())),
            SetForegroundColor(theme.key),
            Print(format!("{tag:>10} "))
        )?;
    }

    let action = if app.screen == Screen::LoadMenu {
        "load"
    } else {
        "delete"
    };
    execute!(
        stdout,
        MoveTo(x, 5 + app.saves.len().max(1) as u16),
        SetBackgroundColor(theme.bg),
        SetForegroundColor(theme.info),
        Print(format!("j/k move, Enter {action}, q back"))
    )?;

    Ok(())
}

fn render_result_banner(
    stdout: &mut io::Stdout,
    app: &App,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let Some(session) = app.session.as_ref() else {
        return Ok(());
    };
    let theme = &app.theme;

    let (text, color) = match session.outcome() {
        Outcome::Won => (
            format!(" Solved in {} moves! ", session.moves_made()),
            theme.success,
        ),
        Outcome::Lost => (" Out of moves! ".to_string(), theme.error),
        _ => return Ok(()),
    };

    let x = term_width.saturating_sub(text.len() as u16) / 2;
    let y = term_height / 2;
    execute!(
        stdout,
        MoveTo(x, y),
        SetBackgroundColor(color),
        SetForegroundColor(theme.bg),
        Print(&text)
    )?;

    let hint = " press any key ";
    let hint_x = term_width.saturating_sub(hint.len() as u16) / 2;
    execute!(
        stdout,
        MoveTo(hint_x, y + 1),
        SetBackgroundColor(theme.bg),
        SetForegroundColor(theme.info),
        Print(hint)
    )?;

    Ok(())
}

fn render_run_complete(
    stdout: &mut io::Stdout,
    app: &App,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    let lines = [
        "═══════════════════════════",
        "   CHALLENGE COMPLETE!     ",
        "  all stages cleared       ",
        "═══════════════════════════",
    ];
    // Box-drawing characters are multi-byte, so center on display width
    let x = term_width.saturating_sub(27) / 2;
    let y = (term_height / 2).saturating_sub(2);

    execute!(stdout, SetBackgroundColor(theme.bg))?;
    for (i, line) in lines.iter().enumerate() {
        execute!(
            stdout,
            MoveTo(x, y + i as u16),
            SetForegroundColor(theme.success),
            Print(line)
        )?;
    }
    execute!(
        stdout,
        MoveTo(term_width.saturating_sub(15) / 2, y + 5),
        SetForegroundColor(theme.info),
        Print("press any key")
    )?;

    Ok(())
}

fn render_message(
    stdout: &mut io::Stdout,
    app: &App,
    msg: &str,
    term_width: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    let padded = format!("  {}  ", msg);
    let x = term_width.saturating_sub(padded.len() as u16) / 2;

    execute!(
        stdout,
        MoveTo(x, 0),
        SetForegroundColor(theme.fg),
        SetBackgroundColor(theme.selected_bg),
        Print(&padded)
    )?;

    Ok(())
}
