use log::{info, trace};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::events::{Channel, EventEmitter, EventObserver};
use crate::model::{
    BoardConfig, BoardError, BoardEvent, Cell, Grid, Level, LevelCell, Position,
};

use super::{gravity, match_finder, refill, shuffler};

/// Where the controller is in its turn cycle. Exactly one state-mutating
/// operation is honored at a time; calls arriving while the controller is
/// busy resolving are no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    AwaitingSecondSelection(Position),
    Resolving,
    Shuffling,
}

/// Drives the turn cycle over an owned [`Grid`]: swap attempt, match check,
/// cascade (explode, collapse, refill, re-check), deadlock detection and
/// shuffle. Every public operation runs to completion and returns the full
/// ordered event log for that operation; the same events are published to
/// subscribers of [`BoardController::observer`] once the operation succeeds,
/// so the log and the channel always carry identical replays. The controller
/// never looks at presentation state; animation is purely downstream of the
/// log.
pub struct BoardController {
    grid: Grid,
    config: BoardConfig,
    rng: StdRng,
    seed: u64,
    state: ControllerState,
    event_emitter: EventEmitter<BoardEvent>,
    event_observer: EventObserver<BoardEvent>,
}

impl BoardController {
    /// Build a session from level text. `'.'` cells receive a random kind
    /// from the refill policy; the RNG is seeded from `seed`, or freshly if
    /// `None` (the effective seed is retained for replay).
    pub fn new(
        level_text: &str,
        config: BoardConfig,
        seed: Option<u64>,
    ) -> Result<Self, BoardError> {
        assert!(config.n_kinds >= 1, "at least one tile kind is required");
        assert!(
            config.min_matches_to_explode >= 2,
            "match threshold below 2 makes every swap explode"
        );

        let level = Level::parse(level_text)?;
        let seed = seed.unwrap_or_else(|| rand::rng().next_u64());
        let mut rng = StdRng::seed_from_u64(seed);

        let mut grid = Grid::new(level.width, level.height);
        for pos in grid.positions().collect::<Vec<Position>>() {
            match level.cell(pos) {
                LevelCell::Obstacle => grid.set(pos, Cell::Obstacle),
                LevelCell::Box => {
                    let kind = refill::random_kind(&mut rng, config.n_kinds);
                    grid.set(pos, Cell::Tile(kind));
                }
                LevelCell::Blank => {}
            }
        }
        info!(
            target: "board_controller",
            "new session: {}x{} board, {} kinds, seed {}",
            grid.width(),
            grid.height(),
            config.n_kinds,
            seed
        );

        let (event_emitter, event_observer) = Channel::new();
        Ok(Self {
            grid,
            config,
            rng,
            seed,
            state: ControllerState::Idle,
            event_emitter,
            event_observer,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Subscribe point for a presentation layer; events arrive in the same
    /// order they appear in the returned logs.
    pub fn observer(&self) -> EventObserver<BoardEvent> {
        self.event_observer.clone()
    }

    /// Settle the freshly-built board: resolve any matches the random fill
    /// produced and shuffle if the level starts deadlocked. Call once after
    /// construction, before accepting input.
    pub fn start(&mut self) -> Result<Vec<BoardEvent>, BoardError> {
        if self.is_busy() {
            return Ok(Vec::new());
        }
        self.state = ControllerState::Resolving;
        let mut events = Vec::new();
        let outcome = self.resolve(&mut events);
        self.state = ControllerState::Idle;
        outcome?;
        self.publish(&events);
        Ok(events)
    }

    /// The two-click selection flow: the first selected tile is pended; a
    /// second selection adjacent to it attempts the swap, while a
    /// non-adjacent one replaces the pending selection.
    pub fn select(&mut self, pos: Position) -> Result<Vec<BoardEvent>, BoardError> {
        if self.is_busy() {
            trace!(target: "board_controller", "selection {} ignored while busy", pos);
            return Ok(Vec::new());
        }
        if !self.grid.is_in_bounds(pos) {
            return Err(BoardError::OutOfBounds(pos));
        }
        if !self.grid.get(pos).is_tile() {
            // only tiles are selectable; obstacles and holes are inert
            return Ok(Vec::new());
        }

        match self.state {
            ControllerState::Idle => {
                self.state = ControllerState::AwaitingSecondSelection(pos);
                Ok(Vec::new())
            }
            ControllerState::AwaitingSecondSelection(first) if first.is_adjacent(&pos) => {
                self.state = ControllerState::Idle;
                self.try_swap(first, pos)
            }
            ControllerState::AwaitingSecondSelection(first) => {
                trace!(
                    target: "board_controller",
                    "{} is not adjacent to pending {}; replacing selection",
                    pos,
                    first
                );
                self.state = ControllerState::AwaitingSecondSelection(pos);
                Ok(Vec::new())
            }
            ControllerState::Resolving | ControllerState::Shuffling => unreachable!(),
        }
    }

    /// Attempt to swap two adjacent tiles. A swap that creates no match is
    /// reverted (Swap then SwapReverted, board unchanged); one that matches
    /// commits and resolves the full cascade. Non-adjacent or non-tile
    /// positions are rejected with `InvalidSwap` and mutate nothing.
    pub fn try_swap(
        &mut self,
        first: Position,
        second: Position,
    ) -> Result<Vec<BoardEvent>, BoardError> {
        if self.is_busy() {
            trace!(target: "board_controller", "swap ignored while busy");
            return Ok(Vec::new());
        }
        if !self.grid.is_in_bounds(first) {
            return Err(BoardError::OutOfBounds(first));
        }
        if !self.grid.is_in_bounds(second) {
            return Err(BoardError::OutOfBounds(second));
        }
        if !first.is_adjacent(&second)
            || !self.grid.get(first).is_tile()
            || !self.grid.get(second).is_tile()
        {
            return Err(BoardError::InvalidSwap(first, second));
        }

        self.state = ControllerState::Resolving;
        let mut events = Vec::new();
        let outcome = self.swap_and_resolve(first, second, &mut events);
        self.state = ControllerState::Idle;
        outcome?;
        self.publish(&events);
        Ok(events)
    }

    fn swap_and_resolve(
        &mut self,
        first: Position,
        second: Position,
        events: &mut Vec<BoardEvent>,
    ) -> Result<(), BoardError> {
        self.grid.swap(first, second);
        events.push(BoardEvent::Swap { first, second });

        let threshold = self.config.min_matches_to_explode;
        let matched = match_finder::matches_at(&self.grid, first, threshold)
            || match_finder::matches_at(&self.grid, second, threshold);
        if !matched {
            self.grid.swap(first, second);
            events.push(BoardEvent::SwapReverted { first, second });
            trace!(
                target: "board_controller",
                "swap {} <-> {} produced no match; reverted",
                first,
                second
            );
            return Ok(());
        }

        self.resolve(events)
    }

    /// The cascade loop: resolve one match group at a time (explode,
    /// collapse, refill, re-scan), then check for deadlock; a deadlocked
    /// board shuffles and the loop runs again over the shuffle result.
    fn resolve(&mut self, events: &mut Vec<BoardEvent>) -> Result<(), BoardError> {
        fn step(steps: &mut u32, max_steps: u32) -> Result<(), BoardError> {
            *steps += 1;
            if *steps > max_steps {
                return Err(BoardError::BoardInconsistent(
                    "cascade exceeded its step bound",
                ));
            }
            Ok(())
        }

        let threshold = self.config.min_matches_to_explode;
        let max_steps = self.config.max_cascade_steps;
        let mut steps = 0u32;

        loop {
            while let Some(group) = match_finder::find_first_match(&self.grid, threshold) {
                step(&mut steps, max_steps)?;
                trace!(
                    target: "board_controller",
                    "exploding {} {:?} tiles of kind {}",
                    group.len(),
                    group.axis,
                    group.kind
                );
                for &pos in &group.positions {
                    self.grid.set(pos, Cell::Empty);
                }
                events.push(BoardEvent::Explode {
                    kind: group.kind,
                    positions: group.positions,
                });

                let moves = gravity::collapse(&mut self.grid)?;
                if !moves.is_empty() {
                    events.push(BoardEvent::Collapse { moves });
                }
                events.extend(refill::refill_board(
                    &mut self.grid,
                    &mut self.rng,
                    self.config.n_kinds,
                )?);
            }

            if match_finder::has_any_potential_match(&self.grid) {
                return Ok(());
            }

            step(&mut steps, max_steps)?;
            info!(target: "board_controller", "deadlocked; shuffling (seed {})", self.seed);
            events.push(BoardEvent::Deadlock);
            self.state = ControllerState::Shuffling;
            let placements = shuffler::shuffle(
                &mut self.grid,
                &mut self.rng,
                self.config.max_shuffle_attempts,
            )?;
            self.state = ControllerState::Resolving;
            events.push(BoardEvent::Shuffle { placements });
            // a shuffle result is always re-checked for matches
        }
    }

    fn is_busy(&self) -> bool {
        matches!(
            self.state,
            ControllerState::Resolving | ControllerState::Shuffling
        )
    }

    /// Push an operation's event log to channel subscribers. Deferred until
    /// the operation succeeds so the channel never carries events from a
    /// halted session that the returned log does not.
    fn publish(&self, events: &[BoardEvent]) {
        for event in events {
            self.event_emitter.emit(event);
        }
    }
}
