pub mod render;

use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::{HashSet, VecDeque};

/// Integer coordinate type for grid cells (not pixels)
pub type Coord = i32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: Coord,
    pub y: Coord,
}

impl Point {
    #[inline]
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.dx_dy();
        Self::new(self.x + dx, self.y + dy)
    }

    #[inline]
    pub fn manhattan(self, other: Self) -> Coord {
        (other.x - self.x).abs() + (other.y - self.y).abs()
    }
}

/// Declaration order doubles as the AI tie-break order; do not reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    #[inline]
    pub fn dx_dy(self) -> (Coord, Coord) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    #[inline]
    pub fn is_opposite(self, other: Self) -> bool {
        matches!(
            (self, other),
            (Self::Up, Self::Down)
                | (Self::Down, Self::Up)
                | (Self::Right, Self::Left)
                | (Self::Left, Self::Right)
        )
    }
}

/// Immutable board bounds for the lifetime of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub width: Coord,
    pub height: Coord,
}

impl Grid {
    pub const fn new(width: Coord, height: Coord) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn in_bounds(&self, p: Point) -> bool {
        p.x >= 0 && p.x < self.width && p.y >= 0 && p.y < self.height
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        (self.width.max(0) as usize) * (self.height.max(0) as usize)
    }
}

/// One snake: ordered body (front is head), current direction, pending growth.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Point>,
    dir: Direction,
    grow: bool,
}

impl Snake {
    pub fn new(head: Point, dir: Direction) -> Self {
        let mut body = VecDeque::new();
        body.push_back(head);
        Self {
            body,
            dir,
            grow: false,
        }
    }

    pub fn head(&self) -> Point {
        *self.body.front().expect("snake body is non-empty")
    }

    pub fn direction(&self) -> Direction {
        self.dir
    }

    /// Rejected (no-op) if `dir` reverses the current direction.
    pub fn set_direction(&mut self, dir: Direction) {
        if !dir.is_opposite(self.dir) {
            self.dir = dir;
        }
    }

    /// Prepends the next head cell; drops the tail unless growth is pending.
    /// The new head may be out of bounds; callers check after the move.
    pub fn advance(&mut self) {
        let new_head = self.head().step(self.dir);
        self.body.push_front(new_head);
        if self.grow {
            self.grow = false;
        } else {
            self.body.pop_back();
        }
    }

    pub fn collides_with(&self, cells: &HashSet<Point>) -> bool {
        cells.contains(&self.head())
    }

    pub fn is_out_of_bounds(&self, grid: &Grid) -> bool {
        !grid.in_bounds(self.head())
    }

    /// Idempotent; takes effect on the next `advance`.
    pub fn request_growth(&mut self) {
        self.grow = true;
    }

    pub fn segments(&self) -> impl Iterator<Item = &Point> {
        self.body.iter()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Rejection-samples an unoccupied cell. Diverges on a full board, so the
/// referee checks occupancy against `grid.cell_count()` before calling.
pub fn spawn_apple(rng: &mut impl Rng, grid: Grid, occupied: &HashSet<Point>) -> Point {
    loop {
        let p = Point::new(
            rng.random_range(0..grid.width),
            rng.random_range(0..grid.height),
        );
        if !occupied.contains(&p) {
            return p;
        }
    }
}

/// Greedy one-step policy: among in-bounds, non-forbidden neighbors, pick the
/// one closest to `target` by Manhattan distance. Ties go to the earliest
/// direction in `Direction::ALL`. `None` means every neighbor is unsafe.
pub fn choose_direction(
    head: Point,
    target: Point,
    forbidden: &HashSet<Point>,
    grid: Grid,
) -> Option<Direction> {
    let mut best: Option<(Direction, Coord)> = None;
    for dir in Direction::ALL {
        let next = head.step(dir);
        if !grid.in_bounds(next) || forbidden.contains(&next) {
            continue;
        }
        let dist = next.manhattan(target);
        if best.is_none_or(|(_, d)| dist < d) {
            best = Some((dir, dist));
        }
    }
    best.map(|(dir, _)| dir)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    PlayerWins,
    AiWins,
    Draw,
}

impl Outcome {
    pub fn message(self) -> &'static str {
        match self {
            Self::PlayerWins => "Player Wins!",
            Self::AiWins => "AI Wins!",
            Self::Draw => "Draw!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Running,
    Over(Outcome),
}

#[derive(Debug, Clone)]
pub struct GameConfig {
    pub width: Coord,
    pub height: Coord,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 30,
            height: 20,
        }
    }
}

/// UI-agnostic result of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickResult {
    pub status: GameStatus,
    pub player_ate: bool,
    pub ai_ate: bool,
}

/// Everything the presentation layer needs to draw one frame.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub width: Coord,
    pub height: Coord,
    /// Head-first, same order as the body it was copied from.
    pub player: Vec<Point>,
    pub ai: Vec<Point>,
    pub apple: Point,
    pub message: Option<&'static str>,
}

/// The referee: owns all round state and advances it one tick at a time.
#[derive(Debug)]
pub struct GameState {
    grid: Grid,
    player: Snake,
    ai: Snake,
    apple: Point,
    /// Latest queued input, applied at the start of the next tick.
    pending_dir: Option<Direction>,
    rng: ChaCha8Rng,
    status: GameStatus,
}

impl GameState {
    /// Create a new round with deterministic RNG from `seed`.
    pub fn with_seed(cfg: GameConfig, seed: u64) -> Self {
        Self::with_rng(cfg, ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn with_rng(cfg: GameConfig, mut rng: ChaCha8Rng) -> Self {
        let grid = Grid::new(cfg.width, cfg.height);
        // Symmetric spawn: player on the left facing right, AI mirrored.
        let player = Snake::new(Point::new(5, cfg.height / 2), Direction::Right);
        let ai = Snake::new(Point::new(cfg.width - 6, cfg.height / 2), Direction::Left);
        let occupied: HashSet<Point> = player.segments().chain(ai.segments()).copied().collect();
        let apple = spawn_apple(&mut rng, grid, &occupied);
        Self {
            grid,
            player,
            ai,
            apple,
            pending_dir: None,
            rng,
            status: GameStatus::Running,
        }
    }

    /// Create a new round with non-deterministic seed
    pub fn new(cfg: GameConfig) -> Self {
        Self::with_rng(cfg, ChaCha8Rng::from_os_rng())
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn apple(&self) -> Point {
        self.apple
    }

    pub fn player_segments(&self) -> impl Iterator<Item = &Point> {
        self.player.segments()
    }

    pub fn ai_segments(&self) -> impl Iterator<Item = &Point> {
        self.ai.segments()
    }

    /// Queue a direction change, applied on the next tick if valid.
    /// Last write within a tick wins.
    pub fn queue_direction(&mut self, dir: Direction) {
        self.pending_dir = Some(dir);
    }

    /// Advance the round by one tick.
    pub fn tick(&mut self) -> TickResult {
        if matches!(self.status, GameStatus::Over(_)) {
            return TickResult {
                status: self.status,
                player_ate: false,
                ai_ate: false,
            };
        }

        // 1. Queued human input (reversal rule enforced by the snake).
        if let Some(dir) = self.pending_dir.take() {
            self.player.set_direction(dir);
        }

        // 2. AI decision: everything but the AI's own head is forbidden.
        let mut forbidden: HashSet<Point> = self.player.segments().copied().collect();
        forbidden.extend(self.ai.segments().skip(1).copied());
        match choose_direction(self.ai.head(), self.apple, &forbidden, self.grid) {
            Some(dir) => self.ai.set_direction(dir),
            // No safe move: hold course and accept the consequences.
            None => debug!("ai has no safe move, holding {:?}", self.ai.direction()),
        }

        // 3. Player first, then AI.
        self.player.advance();
        self.ai.advance();

        // 4. Terminal checks, first match wins. Both post-move heads stay out
        // of the set so a head-to-head lands on the draw check below, never
        // on either win.
        let mut occupied: HashSet<Point> = self.player.segments().skip(1).copied().collect();
        occupied.extend(self.ai.segments().skip(1).copied());

        if self.player.is_out_of_bounds(&self.grid) || self.player.collides_with(&occupied) {
            return self.finish(Outcome::AiWins);
        }
        if self.ai.is_out_of_bounds(&self.grid) || self.ai.collides_with(&occupied) {
            return self.finish(Outcome::PlayerWins);
        }
        if self.player.head() == self.ai.head() {
            return self.finish(Outcome::Draw);
        }

        // 5. Eating. Sequential checks; the second respawn's exclusion set
        // sees the first respawn's result because `apple` is replaced in
        // place between them.
        let mut player_ate = false;
        let mut ai_ate = false;
        if self.player.head() == self.apple {
            debug!("player ate apple at {:?}", self.apple);
            self.player.request_growth();
            player_ate = true;
            if !self.respawn_apple() {
                return self.finish(Outcome::Draw);
            }
        }
        if self.ai.head() == self.apple {
            debug!("ai ate apple at {:?}", self.apple);
            self.ai.request_growth();
            ai_ate = true;
            if !self.respawn_apple() {
                return self.finish(Outcome::Draw);
            }
        }

        TickResult {
            status: self.status,
            player_ate,
            ai_ate,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            width: self.grid.width,
            height: self.grid.height,
            player: self.player.segments().copied().collect(),
            ai: self.ai.segments().copied().collect(),
            apple: self.apple,
            message: match self.status {
                GameStatus::Running => None,
                GameStatus::Over(outcome) => Some(outcome.message()),
            },
        }
    }

    /// False means the board is full and the spawner must not be called.
    fn respawn_apple(&mut self) -> bool {
        let occupied: HashSet<Point> = self
            .player
            .segments()
            .chain(self.ai.segments())
            .copied()
            .collect();
        if occupied.len() >= self.grid.cell_count() {
            return false;
        }
        self.apple = spawn_apple(&mut self.rng, self.grid, &occupied);
        true
    }

    fn finish(&mut self, outcome: Outcome) -> TickResult {
        info!("round over: {}", outcome.message());
        self.status = GameStatus::Over(outcome);
        TickResult {
            status: self.status,
            player_ate: false,
            ai_ate: false,
        }
    }
}
