use crate::{Coord, Point, Snapshot};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

/// What occupies a board cell, for drawing purposes only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Empty,
    Player,
    Ai,
    Apple,
}

impl Tile {
    fn glyph(self) -> char {
        match self {
            Self::Empty => ' ',
            Self::Player | Self::Ai => '█',
            Self::Apple => '●',
        }
    }

    fn color(self) -> Color {
        match self {
            Self::Empty => Color::Reset,
            Self::Player => Color::Green,
            Self::Ai => Color::Red,
            Self::Apple => Color::Yellow,
        }
    }
}

/// A flat tile buffer built from one snapshot.
#[derive(Debug, Clone)]
pub struct Board {
    pub width: Coord,
    pub height: Coord,
    tiles: Vec<Tile>,
}

impl Board {
    pub fn from_snapshot(snap: &Snapshot) -> Self {
        let size = (snap.width.max(0) * snap.height.max(0)) as usize;
        let mut board = Self {
            width: snap.width,
            height: snap.height,
            tiles: vec![Tile::Empty; size],
        };
        // Apple first so a transient overlap renders as snake, not food.
        board.set(snap.apple, Tile::Apple);
        for &p in &snap.player {
            board.set(p, Tile::Player);
        }
        for &p in &snap.ai {
            board.set(p, Tile::Ai);
        }
        board
    }

    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if p.x < 0 || p.y < 0 || p.x >= self.width || p.y >= self.height {
            None
        } else {
            Some((p.y * self.width + p.x) as usize)
        }
    }

    fn set(&mut self, p: Point, tile: Tile) {
        if let Some(i) = self.idx(p) {
            self.tiles[i] = tile;
        }
    }

    pub fn get(&self, p: Point) -> Option<Tile> {
        self.idx(p).map(|i| self.tiles[i])
    }
}

/// Styled terminal lines, one `Span` per run of equal tiles.
pub fn board_lines(board: &Board) -> Vec<Line<'static>> {
    (0..board.height)
        .map(|y| {
            let mut spans: Vec<Span<'static>> = Vec::new();
            let mut run = String::new();
            let mut run_tile = Tile::Empty;
            for x in 0..board.width {
                let tile = board.get(Point::new(x, y)).unwrap_or(Tile::Empty);
                if tile != run_tile && !run.is_empty() {
                    spans.push(Span::styled(run, Style::default().fg(run_tile.color())));
                    run = String::new();
                }
                run_tile = tile;
                run.push(tile.glyph());
            }
            if !run.is_empty() {
                spans.push(Span::styled(run, Style::default().fg(run_tile.color())));
            }
            Line::from(spans)
        })
        .collect()
}

/// Plain ascii view, mostly for tests and debugging.
pub fn board_to_str(board: &Board) -> String {
    (0..board.height)
        .map(|y| {
            (0..board.width)
                .map(|x| match board.get(Point::new(x, y)) {
                    Some(Tile::Player) => 'P',
                    Some(Tile::Ai) => 'A',
                    Some(Tile::Apple) => '*',
                    _ => '.',
                })
                .collect::<String>()
        })
        .collect::<Vec<String>>()
        .join("\n")
}
