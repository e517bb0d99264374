//! Game session state and the falling-shape simulation

use crate::board::{BOARD_WIDTH, Board};
use crate::input::InputSnapshot;
use crate::shape::{RotationDirection, Shape};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::{Duration, Instant};

/// Fixed interval between forced downward moves
const GRAVITY_INTERVAL: Duration = Duration::from_millis(200);

/// Spawn anchor for a freshly promoted shape
const SPAWN_X: usize = 2;
const SPAWN_Y: usize = 0;

/// Top-level mode switch
///
/// Only InGame has behavior. Title and GameOver are stubs: nothing draws
/// for them and nothing transitions into GameOver during play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Title,
    InGame,
    #[allow(dead_code)]
    GameOver,
}

/// One play session: the board, the falling shape, and its timers
pub struct Game {
    pub phase: Phase,
    pub board: Board,
    /// The falling shape
    pub current: Shape,
    /// The queued shape, promoted when the current one lands
    pub next: Shape,
    /// Top-left anchor of the falling shape, in board cells
    pub x: usize,
    pub y: usize,
    /// Nothing updates this yet; logged once at shutdown
    pub score: u64,
    last_gravity: Instant,
    rng: ChaCha8Rng,
}

impl Game {
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    /// Deterministic construction for tests
    pub fn with_seed(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let current = Shape::random(&mut rng);
        let next = Shape::random(&mut rng);
        Self {
            phase: Phase::default(),
            board: Board::new(),
            current,
            next,
            x: SPAWN_X,
            y: SPAWN_Y,
            score: 0,
            last_gravity: Instant::now(),
            rng,
        }
    }

    /// Switch the active phase and run its reset exactly once
    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
        match self.phase {
            Phase::Title | Phase::GameOver => {}
            Phase::InGame => self.reset_session(),
        }
    }

    fn reset_session(&mut self) {
        self.next = Shape::random(&mut self.rng);
        self.advance_shape();
        self.board.clear();
        self.last_gravity = Instant::now();
        tracing::debug!("session reset");
    }

    /// Promote the queued shape and roll a fresh one behind it
    fn advance_shape(&mut self) {
        self.current = std::mem::replace(&mut self.next, Shape::random(&mut self.rng));
        self.x = SPAWN_X;
        self.y = SPAWN_Y;
    }

    /// Per-frame update: input mapping, then the gravity tick
    pub fn update(&mut self, input: &InputSnapshot) {
        match self.phase {
            Phase::Title | Phase::GameOver => {}
            Phase::InGame => self.update_in_game(input),
        }
    }

    /// Held keys re-trigger every frame; the first matching binding wins
    fn update_in_game(&mut self, input: &InputSnapshot) {
        if input.left {
            self.try_move_left();
        } else if input.right {
            self.try_move_right();
        } else if input.rotate_ccw {
            self.try_rotate(RotationDirection::CounterClockwise);
        } else if input.rotate_cw {
            self.try_rotate(RotationDirection::Clockwise);
        }

        // Gravity runs regardless of which input branch fired
        if self.last_gravity.elapsed() >= GRAVITY_INTERVAL {
            self.try_move_down();
            self.last_gravity = Instant::now();
        }
    }

    pub fn try_move_left(&mut self) {
        if self.x > 0 && !self.board.is_collided(&self.current, self.x - 1, self.y) {
            self.x -= 1;
        }
    }

    pub fn try_move_right(&mut self) {
        if self.x + self.current.width() < BOARD_WIDTH
            && !self.board.is_collided(&self.current, self.x + 1, self.y)
        {
            self.x += 1;
        }
    }

    /// One gravity step: descend, or land and hand over to the next shape
    pub fn try_move_down(&mut self) {
        if self.board.is_collided(&self.current, self.x, self.y + 1) {
            self.board.fill_shape(&self.current, self.x, self.y);
            tracing::debug!(x = self.x, y = self.y, "shape landed");
            self.advance_shape();
        } else {
            self.y += 1;
        }
    }

    /// Trial rotation at the current anchor; committed only if it fits
    pub fn try_rotate(&mut self, direction: RotationDirection) {
        let rotated = self.current.rotated(direction);
        if !self.board.is_collided(&rotated, self.x, self.y) {
            self.current = rotated;
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
