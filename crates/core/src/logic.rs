//! Logic module - the phase state machine
//!
//! [`TetrisLogic`] owns the matrix, the next and hold queues, the bag and the
//! stats. It never blocks and never reads a clock: timed behavior goes through
//! the injected [`Scheduler`], state changes are reported to the injected
//! [`Presenter`], and the high score is read from and written to the injected
//! [`HighScoreStore`].
//!
//! # Phases
//!
//! ```text
//! STARTING -> GENERATION -> FALLING <-> LOCK -> PATTERN -> GENERATION ...
//!                 |                                |
//!                 +--------------> OVER <----------+
//! ```
//!
//! PAUSED is reachable from FALLING and LOCK and resumes to the phase it
//! interrupted. Player actions outside FALLING/LOCK are no-ops.
//!
//! # Lock delay
//!
//! A downward move that fails prelocks the piece and arms [`Task::Lock`].
//! Every successful move or rotation of a prelocked piece that leaves it
//! grounded restarts the timer, never extends it. A move that opens space
//! below cancels the timer and the piece falls again under gravity. When the
//! timer fires, the piece gets one last chance to fall; if it cannot, it
//! locks down.
//!
//! Every new piece starts a fresh fall period.

use std::time::Duration;

use anyhow::Result;
use arrayvec::ArrayVec;

use crate::config::EngineConfig;
use crate::high_score;
use crate::matrix::Matrix;
use crate::pieces::Tetromino;
use crate::presenter::{HighScoreStore, Presenter};
use crate::rng::RandomBag;
use crate::scheduler::{ManualScheduler, Scheduler};
use crate::scoring::Stats;
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::types::{Action, Coord, Movement, Phase, Shape, Spin, TSpin, Task, TIME_TICK_MS};

/// Diagonal neighbours of the T anchor, clockwise from top-left
const T_SLOT_COORDS: [Coord; 4] = [
    Coord::new(-1, 1),
    Coord::new(1, 1),
    Coord::new(1, -1),
    Coord::new(-1, -1),
];

const TIME_TICK: Duration = Duration::from_millis(TIME_TICK_MS);

/// Tetris rules engine
pub struct TetrisLogic<S, P, H> {
    config: EngineConfig,
    scheduler: S,
    presenter: P,
    store: H,
    matrix: Matrix,
    bag: RandomBag,
    next_pieces: Vec<Tetromino>,
    held: Option<Tetromino>,
    falling: Option<Tetromino>,
    ghost: Option<Tetromino>,
    stats: Stats,
    phase: Phase,
    /// Phase to restore on resume
    paused_phase: Phase,
    /// Held autorepeatable actions, most recent last
    pressed_actions: ArrayVec<Action, 3>,
    auto_repeat: bool,
}

impl<S: Scheduler, P: Presenter, H: HighScoreStore> TetrisLogic<S, P, H> {
    /// Build an engine and load the stored high score
    pub fn new(config: EngineConfig, scheduler: S, presenter: P, store: H) -> Result<Self> {
        config.validate()?;
        let mut logic = Self {
            matrix: Matrix::new(config.columns, config.lines),
            bag: RandomBag::new(config.seed),
            stats: Stats::new(config.fall_delay, config.lock_delay),
            next_pieces: Vec::with_capacity(config.next_pieces + 1),
            held: None,
            falling: None,
            ghost: None,
            phase: Phase::Starting,
            paused_phase: Phase::Falling,
            pressed_actions: ArrayVec::new(),
            auto_repeat: false,
            config,
            scheduler,
            presenter,
            store,
        };
        if let Some(blob) = logic.store.load() {
            logic.load_high_score(&blob);
        }
        Ok(logic)
    }

    // ---- game lifecycle ----

    /// Start a game at the configured start level
    pub fn start(&mut self) {
        self.new_game(self.config.start_level);
    }

    /// Start a game at `level` (at least 1), dropping any game in progress
    pub fn new_game(&mut self, level: u32) {
        self.stop_all();
        self.stats.new_game();
        self.pressed_actions.clear();
        self.auto_repeat = false;

        self.matrix.reset();
        self.held = None;
        self.falling = None;
        self.ghost = None;
        self.next_pieces.clear();
        for _ in 0..self.config.next_pieces {
            let piece = Tetromino::new(self.bag.draw(), Coord::default());
            self.next_pieces.push(piece);
        }
        self.layout_next_pieces();

        self.phase = Phase::Starting;
        self.scheduler.start(Task::UpdateTime, TIME_TICK);
        self.presenter.on_new_game(&self.matrix, &self.next_pieces);

        // Earlier levels are passed silently so the goal accumulates
        for _ in 1..level.max(1) {
            self.stats.new_level();
        }
        self.new_level();
    }

    fn new_level(&mut self) {
        self.stats.new_level();
        let level = self.stats.level;
        self.presenter.on_new_level(level);
        self.presenter.show_text(&format!("LEVEL\n{}", level));
        self.generation();
    }

    /// Pop the head of the next queue, spawn it, refill the queue
    fn generation(&mut self) {
        self.phase = Phase::Generation;

        let shape = self.bag.draw();
        self.next_pieces.push(Tetromino::new(shape, Coord::default()));
        let mut piece = self.next_pieces.remove(0);
        self.layout_next_pieces();

        piece.coord = self.config.spawn_coord();
        let blocked = !self
            .matrix
            .space_to_move(piece.coord, &piece.minoes_coords());
        self.falling = Some(piece);
        self.refresh_ghost();

        if blocked {
            self.game_over();
            return;
        }

        self.phase = Phase::Falling;
        self.scheduler.restart(Task::Fall, self.stats.fall_delay);
        if let (Some(falling), Some(ghost)) = (&self.falling, &self.ghost) {
            self.presenter
                .on_generation(falling, ghost, &self.next_pieces);
            self.presenter.on_falling(falling);
        }
    }

    fn layout_next_pieces(&mut self) {
        for (n, piece) in self.next_pieces.iter_mut().enumerate() {
            piece.coord = self.config.next_piece_coord(n);
        }
    }

    fn game_over(&mut self) {
        self.phase = Phase::Over;
        self.stop_all();
        self.pressed_actions.clear();
        self.auto_repeat = false;
        self.save_high_score();
        self.presenter.on_game_over();
    }

    fn stop_all(&mut self) {
        for task in Task::ALL {
            self.scheduler.stop(task);
        }
    }

    /// Freeze every timer; only meaningful while a piece is in play
    pub fn pause(&mut self) {
        if !self.phase.is_active() {
            return;
        }
        self.paused_phase = self.phase;
        self.phase = Phase::Paused;
        self.stop_all();
        self.pressed_actions.clear();
        self.auto_repeat = false;
        self.presenter.on_pause();
    }

    /// Re-arm the timers relevant to the interrupted phase
    pub fn resume(&mut self) {
        if self.phase != Phase::Paused {
            return;
        }
        self.phase = self.paused_phase;
        self.scheduler.start(Task::Fall, self.stats.fall_delay);
        if self.falling.as_ref().is_some_and(|piece| piece.prelocked) {
            self.scheduler.start(Task::Lock, self.stats.lock_delay);
        }
        self.scheduler.start(Task::UpdateTime, TIME_TICK);
        self.presenter.on_resume();
    }

    // ---- player actions ----

    pub fn move_left(&mut self) -> bool {
        self.phase.is_active() && self.move_piece(Movement::LEFT, true)
    }

    pub fn move_right(&mut self) -> bool {
        self.phase.is_active() && self.move_piece(Movement::RIGHT, true)
    }

    /// One cell down, 1 point per cell
    pub fn soft_drop(&mut self) -> bool {
        if !self.phase.is_active() {
            return false;
        }
        let moved = self.move_piece(Movement::DOWN, true);
        if moved {
            self.stats.add_to_score(1);
        }
        moved
    }

    /// Drop to the floor, 2 points per cell, and lock at once
    pub fn hard_drop(&mut self) -> bool {
        if !self.phase.is_active() {
            return false;
        }
        while self.move_piece(Movement::DOWN, false) {
            self.stats.add_to_score(2);
        }
        self.lock_down();
        true
    }

    pub fn rotate_clockwise(&mut self) -> bool {
        self.phase.is_active() && self.rotate(Spin::Clockwise)
    }

    pub fn rotate_counterclockwise(&mut self) -> bool {
        self.phase.is_active() && self.rotate(Spin::CounterClockwise)
    }

    /// Swap the falling piece with the hold slot, once per piece
    pub fn hold(&mut self) -> bool {
        if !self.phase.is_active() {
            return false;
        }
        let Some(mut piece) = self.falling.take() else {
            return false;
        };
        if !piece.hold_enabled {
            self.falling = Some(piece);
            return false;
        }

        piece.hold_enabled = false;
        self.scheduler.stop(Task::Lock);
        piece.reset_orientation();
        piece.coord = self.config.held_coord();
        self.ghost = None;
        let retrieved = self.held.replace(piece);
        if let Some(held) = &self.held {
            self.presenter.on_hold(held);
        }

        match retrieved {
            Some(mut piece) => {
                piece.coord = self.config.spawn_coord();
                let blocked = !self
                    .matrix
                    .space_to_move(piece.coord, &piece.minoes_coords());
                self.falling = Some(piece);
                self.refresh_ghost();
                if blocked {
                    self.game_over();
                    return true;
                }
                self.phase = Phase::Falling;
                self.scheduler.restart(Task::Fall, self.stats.fall_delay);
                if let Some(falling) = &self.falling {
                    self.presenter.on_falling(falling);
                }
            }
            None => self.generation(),
        }
        true
    }

    /// Key press: run the action, and track it for autorepeat when it is a
    /// movement
    pub fn do_action(&mut self, action: Action) -> bool {
        let applied = self.apply(action);
        if action.is_autorepeatable() && self.phase.is_active() {
            self.auto_repeat = false;
            self.pressed_actions.retain(|pressed| *pressed != action);
            if self.pressed_actions.try_push(action).is_ok() {
                let delay = match action {
                    Action::SoftDrop => self.stats.fall_delay / 20,
                    _ => self.config.autorepeat_delay,
                };
                self.scheduler.restart(Task::RepeatAction, delay);
            }
        }
        applied
    }

    /// Key release
    pub fn remove_action(&mut self, action: Action) {
        if let Some(index) = self.pressed_actions.iter().position(|a| *a == action) {
            self.pressed_actions.remove(index);
        }
        if self.pressed_actions.is_empty() {
            self.auto_repeat = false;
            self.scheduler.stop(Task::RepeatAction);
        }
    }

    fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::MoveLeft => self.move_left(),
            Action::MoveRight => self.move_right(),
            Action::SoftDrop => self.soft_drop(),
            Action::HardDrop => self.hard_drop(),
            Action::RotateClockwise => self.rotate_clockwise(),
            Action::RotateCounterClockwise => self.rotate_counterclockwise(),
            Action::Hold => self.hold(),
        }
    }

    // ---- timed tasks ----

    /// Entry point for a fired task
    pub fn run_task(&mut self, task: Task) {
        match task {
            Task::Fall => self.fall(),
            Task::Lock => self.lock(),
            Task::RepeatAction => self.repeat_action(),
            Task::UpdateTime => self.update_time(),
        }
    }

    fn fall(&mut self) {
        if !self.phase.is_active() {
            return;
        }
        self.move_piece(Movement::DOWN, true);
        if self.phase.is_active() {
            self.scheduler.start(Task::Fall, self.stats.fall_delay);
        }
    }

    fn lock(&mut self) {
        if !self.phase.is_active() {
            return;
        }
        if self.move_piece(Movement::DOWN, true) {
            return;
        }
        self.lock_down();
    }

    fn repeat_action(&mut self) {
        match self.pressed_actions.last().copied() {
            Some(action) if self.phase.is_active() => {
                self.apply(action);
                self.auto_repeat = true;
                self.scheduler
                    .start(Task::RepeatAction, self.config.autorepeat_period);
            }
            _ => {
                self.auto_repeat = false;
                self.scheduler.stop(Task::RepeatAction);
            }
        }
    }

    fn update_time(&mut self) {
        if !self.phase.is_active() {
            return;
        }
        self.stats.update_time();
        self.scheduler.start(Task::UpdateTime, TIME_TICK);
    }

    // ---- movement ----

    fn move_piece(&mut self, movement: Coord, prelock: bool) -> bool {
        let Some(piece) = self.falling.as_mut() else {
            return false;
        };
        let potential_coord = piece.coord + movement;
        if self
            .matrix
            .space_to_move(potential_coord, &piece.minoes_coords())
        {
            piece.coord = potential_coord;
            if movement != Movement::DOWN {
                piece.last_rotation_point_used = None;
            }
            let prelocked = piece.prelocked;
            self.refresh_ghost();
            if prelock && prelocked {
                self.reset_lock_delay();
            }
            true
        } else {
            if prelock && movement == Movement::DOWN && !piece.prelocked {
                piece.prelocked = true;
                self.scheduler.start(Task::Lock, self.stats.lock_delay);
                self.phase = Phase::Lock;
                self.presenter.on_locked(piece);
            }
            false
        }
    }

    fn rotate(&mut self, spin: Spin) -> bool {
        let Some(piece) = self.falling.as_mut() else {
            return false;
        };
        let rotated = piece.rotated_minoes_coords(spin);
        let anchor = piece.coord;
        let kick = piece
            .kicks(spin)
            .iter()
            .enumerate()
            .find(|(_, kick)| self.matrix.space_to_move(anchor + **kick, &rotated));
        let Some((index, kick)) = kick else {
            return false;
        };

        piece.coord = anchor + *kick;
        piece.set_minoes_coords(rotated);
        piece.orientation = spin.next_orientation(piece.orientation);
        piece.last_rotation_point_used = Some(index as u8 + 1);
        let prelocked = piece.prelocked;
        self.refresh_ghost();
        if prelocked {
            self.reset_lock_delay();
        }
        true
    }

    /// After a successful move of a prelocked piece: still grounded restarts
    /// the lock timer, free space below releases the piece back to FALLING
    fn reset_lock_delay(&mut self) {
        let Some(piece) = self.falling.as_mut() else {
            return;
        };
        let grounded = !self
            .matrix
            .space_to_move(piece.coord + Movement::DOWN, &piece.minoes_coords());
        if grounded {
            self.scheduler.restart(Task::Lock, self.stats.lock_delay);
            self.phase = Phase::Lock;
            return;
        }

        piece.prelocked = false;
        self.scheduler.stop(Task::Lock);
        if self.phase == Phase::Lock {
            self.phase = Phase::Falling;
            self.presenter.on_falling(piece);
        }
    }

    fn refresh_ghost(&mut self) {
        let Some(piece) = &self.falling else {
            self.ghost = None;
            return;
        };
        let mut ghost = piece.ghost();
        let minoes = ghost.minoes_coords();
        while self
            .matrix
            .space_to_move(ghost.coord + Movement::DOWN, &minoes)
        {
            ghost.coord += Movement::DOWN;
        }
        self.ghost = Some(ghost);
    }

    // ---- lock and pattern ----

    fn lock_down(&mut self) {
        let Some(mut piece) = self.falling.take() else {
            return;
        };
        piece.prelocked = false;
        self.scheduler.stop(Task::Lock);
        if !self.pressed_actions.is_empty() {
            self.auto_repeat = false;
            self.scheduler
                .restart(Task::RepeatAction, self.config.autorepeat_delay);
        }
        self.phase = Phase::Pattern;

        let top = self.config.lines as i8;
        if piece.cells().iter().all(|cell| cell.y >= top) {
            self.falling = Some(piece);
            self.game_over();
            return;
        }

        let t_spin = self.t_spin(&piece);
        self.matrix.place(piece.coord, &piece.minoes);
        self.ghost = None;
        self.presenter.on_locks_down(&self.matrix, &piece);

        let rows = self.matrix.full_rows();
        if !rows.is_empty() {
            self.presenter.on_animate(&self.matrix, &rows);
            self.matrix.remove_rows(&rows);
            self.presenter.on_eliminate(&self.matrix, &rows);
        }

        let score = self.stats.locks_down(t_spin, rows.len());
        if !score.pattern_name.is_empty() {
            self.presenter
                .show_text(&format!("{}\n{}", score.pattern_name, score.pattern_score));
        }
        if score.combo >= 1 {
            self.presenter
                .show_text(&format!("COMBO x{}\n{}", score.combo, score.combo_score));
        }
        self.presenter.on_completion(&score);

        if self.stats.goal <= 0 {
            self.new_level();
        } else {
            self.generation();
        }
    }

    /// 3-corner rule, only for a T whose last move was a rotation.
    /// A and B are the corners on the pointing side, kick 5 forces a full
    /// T-spin.
    fn t_spin(&self, piece: &Tetromino) -> TSpin {
        let Some(rotation_point) = piece.last_rotation_point_used else {
            return TSpin::None;
        };
        if !piece.descriptor().can_spin {
            return TSpin::None;
        }
        let is_t_slot = |n: u8| {
            let corner = T_SLOT_COORDS[((piece.orientation + n) % 4) as usize];
            !self.matrix.cell_is_free(piece.coord + corner)
        };
        let (a, b, c, d) = (is_t_slot(0), is_t_slot(1), is_t_slot(3), is_t_slot(2));
        if rotation_point == 5 || (a && b && (c || d)) {
            TSpin::Full
        } else if c && d && (a || b) {
            TSpin::Mini
        } else {
            TSpin::None
        }
    }

    // ---- high score ----

    /// Set the high score from a stored blob; malformed blobs give 0
    pub fn load_high_score(&mut self, blob: &[u8]) {
        self.stats.high_score = high_score::decode_or_zero(blob);
    }

    /// Encode the high score and hand it to the store
    pub fn save_high_score(&mut self) -> Vec<u8> {
        let blob = high_score::encode(self.stats.high_score);
        self.store.save(&blob);
        blob
    }

    // ---- puzzle setup ----
    //
    // Not part of normal play: hosts use these to load preset boards
    // (puzzles, replays of a position) and tests use them to build exact
    // situations. Neither notifies the presenter.

    /// Direct access to the grid, for preset boards
    ///
    /// Changes are not checked against the falling piece; call before
    /// [`replace_falling`](Self::replace_falling) to keep them consistent.
    pub fn matrix_mut(&mut self) -> &mut Matrix {
        &mut self.matrix
    }

    /// Swap the falling piece for a fresh `shape` at the spawn coordinate
    ///
    /// Cancels a pending lock and restarts the fall period. Returns false
    /// outside FALLING/LOCK.
    pub fn replace_falling(&mut self, shape: Shape) -> bool {
        if !self.phase.is_active() {
            return false;
        }
        self.scheduler.stop(Task::Lock);
        self.scheduler.restart(Task::Fall, self.stats.fall_delay);
        self.falling = Some(Tetromino::new(shape, self.config.spawn_coord()));
        self.refresh_ghost();
        self.phase = Phase::Falling;
        true
    }

    // ---- accessors ----

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    pub fn falling_piece(&self) -> Option<&Tetromino> {
        self.falling.as_ref()
    }

    pub fn ghost_piece(&self) -> Option<&Tetromino> {
        self.ghost.as_ref()
    }

    pub fn next_pieces(&self) -> &[Tetromino] {
        &self.next_pieces
    }

    pub fn held_piece(&self) -> Option<&Tetromino> {
        self.held.as_ref()
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn score(&self) -> u64 {
        self.stats.score()
    }

    pub fn high_score(&self) -> u64 {
        self.stats.high_score
    }

    pub fn pressed_actions(&self) -> &[Action] {
        &self.pressed_actions
    }

    pub fn is_auto_repeating(&self) -> bool {
        self.auto_repeat
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn store(&self) -> &H {
        &self.store
    }

    /// Read-only view of the whole game
    pub fn snapshot(&self) -> GameSnapshot {
        let mut snapshot = GameSnapshot::default();
        self.snapshot_into(&mut snapshot);
        snapshot
    }

    /// Fill `out`, reusing its buffers
    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.columns = self.matrix.columns();
        out.lines = self.matrix.lines();
        out.board.clear();
        out.board.extend(
            self.matrix
                .cells()
                .iter()
                .map(|cell| cell.map(|mino| mino.color)),
        );
        out.falling = self.falling.as_ref().map(ActiveSnapshot::from);
        out.ghost = self.ghost.as_ref().map(ActiveSnapshot::from);
        out.held = self.held.as_ref().map(|piece| piece.shape);
        out.next.clear();
        out.next
            .extend(self.next_pieces.iter().map(|piece| piece.shape));
        out.can_hold = self
            .falling
            .as_ref()
            .is_some_and(|piece| piece.hold_enabled);
        out.phase = self.phase;
        out.level = self.stats.level;
        out.score = self.stats.score();
        out.high_score = self.stats.high_score;
        out.goal = self.stats.goal;
        out.lines_cleared = self.stats.lines_cleared;
        out.combo = self.stats.combo;
        out.time = self.stats.time;
    }
}

impl<P: Presenter, H: HighScoreStore> TetrisLogic<ManualScheduler, P, H> {
    /// Move the virtual clock forward by `dt`, running every task that falls
    /// due, including tasks re-armed along the way
    pub fn advance(&mut self, dt: Duration) {
        let until = self.scheduler.now() + dt;
        while let Some(task) = self.scheduler.pop_due(until) {
            self.run_task(task);
        }
        self.scheduler.set_now(until);
    }
}
