use std::io;
use std::time::{Duration, Instant};

use snake_duel::render::{Board, board_lines};
use snake_duel::{Direction, GameConfig, GameState, GameStatus};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::Alignment,
    style::Stylize,
    widgets::{Block, Borders, Paragraph},
};

fn main() -> io::Result<()> {
    env_logger::init();

    // --- Init terminal ---
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let res = run(&mut terminal);

    // --- Restore terminal even on error ---
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = res {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    Ok(())
}

/// 10 ticks per second, the only timing source.
const TICK_MILLIS: u64 = 100;
/// How long the final frame stays up before the program exits.
const END_SCREEN_MILLIS: u64 = 2000;

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    let mut game = GameState::new(GameConfig::default());

    let tick_rate = Duration::from_millis(TICK_MILLIS);
    let mut last_tick = Instant::now();

    loop {
        // --- Input (non-blocking) ---
        let now = Instant::now();
        let timeout = tick_rate
            .checked_sub(now.saturating_duration_since(last_tick))
            .unwrap_or(Duration::from_millis(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key(&mut game, key) {
                    return Ok(()); // requested quit
                }
            }
        }

        // --- Tick ---
        if last_tick.elapsed() >= tick_rate {
            game.tick();
            last_tick = Instant::now();
        }

        // --- Render ---
        draw(terminal, &game)?;

        if matches!(game.status(), GameStatus::Over(_)) {
            // One final frame with the verdict, then a short linger so the
            // message is readable; any key cuts it short.
            let deadline = Instant::now() + Duration::from_millis(END_SCREEN_MILLIS);
            while let Some(left) = deadline.checked_duration_since(Instant::now()) {
                if event::poll(left)? {
                    if let Event::Key(key) = event::read()? {
                        if key.kind == KeyEventKind::Press {
                            break;
                        }
                    }
                }
            }
            return Ok(());
        }
    }
}

fn draw(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, game: &GameState) -> io::Result<()> {
    let snap = game.snapshot();
    let board = Board::from_snapshot(&snap);
    terminal.draw(|f| {
        let area = f.area();

        let title = " snake duel — you are green, the ai is red ";
        let block = Block::default().borders(Borders::ALL).title(title.bold());

        // Fit the frame to the board; Block adds a 1-char border around it.
        let outer_w = (snap.width as u16).saturating_add(2);
        let outer_h = (snap.height as u16).saturating_add(2);
        let x = area.x.saturating_add(area.width.saturating_sub(outer_w) / 2);
        let y = area.y.saturating_add(area.height.saturating_sub(outer_h) / 2);
        let frame_area = ratatui::layout::Rect::new(x, y, outer_w, outer_h);

        let para = Paragraph::new(board_lines(&board))
            .block(block)
            .alignment(Alignment::Left);
        f.render_widget(para, frame_area);

        // Verdict overlay, centered on the board.
        if let Some(message) = snap.message {
            let overlay = ratatui::layout::Rect::new(
                frame_area.x + 1,
                frame_area.y + outer_h / 2,
                outer_w.saturating_sub(2),
                1,
            );
            let verdict = Paragraph::new(message.bold()).alignment(Alignment::Center);
            f.render_widget(verdict, overlay);
        }
    })?;
    Ok(())
}

/// Returns true if the caller should quit.
fn handle_key(game: &mut GameState, key: KeyEvent) -> bool {
    match key.code {
        // Quit keys
        KeyCode::Char('q') => return true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,

        KeyCode::Up => game.queue_direction(Direction::Up),
        KeyCode::Down => game.queue_direction(Direction::Down),
        KeyCode::Left => game.queue_direction(Direction::Left),
        KeyCode::Right => game.queue_direction(Direction::Right),

        _ => {}
    }
    false
}
