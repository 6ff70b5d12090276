use web_time::{Duration, Instant};

use crate::*;

/// Input arriving inside this window after a move attempt is dropped.
pub const MOVE_COOLDOWN: Duration = Duration::from_millis(150);
pub const MOVE_COST: Score = 1;
pub const CHIP_REWARD: Score = 50;
pub const REPAIR_REWARD: Score = 100;
pub const WASTED_ACTION_PENALTY: Score = 50;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LossReason {
    FellIntoPit,
    HostileRobot,
    Surrounded,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameEnd {
    Won,
    Lost(LossReason),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The game is already over.
    Ignored,
    /// Still inside [`MOVE_COOLDOWN`].
    Throttled,
    BlockedByEdge,
    Moved,
    /// Standing on the robot with every chip in hand.
    ReachedRobot,
    Ended(GameEnd),
}

impl MoveOutcome {
    /// Whether the game state changed and needs to be saved.
    pub const fn changed_state(self) -> bool {
        matches!(self, Self::Moved | Self::ReachedRobot | Self::Ended(_))
    }

    pub const fn game_end(self) -> Option<GameEnd> {
        match self {
            Self::Ended(end) => Some(end),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The game is already over.
    Ignored,
    Repaired,
    RepairRefused,
    ChipCollected {
        collected: CellCount,
        all_collected: bool,
    },
    NothingHere,
}

impl ActionOutcome {
    pub const fn changed_state(self) -> bool {
        !matches!(self, Self::Ignored)
    }

    pub const fn game_end(self) -> Option<GameEnd> {
        match self {
            Self::Repaired => Some(GameEnd::Won),
            _ => None,
        }
    }
}

/// Owns one game and applies player input to it.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayEngine {
    state: GameState,
    cooldown_until: Option<Instant>,
}

impl PlayEngine {
    pub fn new(state: GameState) -> Self {
        Self {
            state,
            cooldown_until: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn into_state(self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_game_over()
    }

    pub fn move_player(&mut self, direction: Direction, now: Instant) -> MoveOutcome {
        if self.state.is_game_over() {
            return MoveOutcome::Ignored;
        }
        if self.cooldown_until.is_some_and(|until| now < until) {
            return MoveOutcome::Throttled;
        }
        self.cooldown_until = Some(now + MOVE_COOLDOWN);

        let Some(target) = apply_delta(self.state.player, direction.delta(), self.state.size()) else {
            return MoveOutcome::BlockedByEdge;
        };

        self.state.player = target;
        self.state.score -= MOVE_COST;
        self.state[target].visited = true;

        let outcome = self.resolve_tile();
        if outcome.game_end().is_none() && self.is_surrounded() {
            return self.end_game(GameEnd::Lost(LossReason::Surrounded));
        }
        outcome
    }

    pub fn act(&mut self) -> ActionOutcome {
        if self.state.is_game_over() {
            return ActionOutcome::Ignored;
        }

        let player = self.state.player;
        let cell = self.state[player];

        if cell.has_robot() {
            if self.state.has_all_chips() {
                self.state.score += REPAIR_REWARD;
                self.end_game(GameEnd::Won);
                ActionOutcome::Repaired
            } else {
                self.state.score -= WASTED_ACTION_PENALTY;
                ActionOutcome::RepairRefused
            }
        } else if let Some(chip) = self
            .state
            .chips
            .iter_mut()
            .find(|chip| chip.position == player && !chip.collected)
        {
            chip.collected = true;
            self.state[player].occupant = Occupant::Empty;
            self.state.chips_collected += 1;
            self.state.score += CHIP_REWARD;
            ActionOutcome::ChipCollected {
                collected: self.state.chips_collected,
                all_collected: self.state.has_all_chips(),
            }
        } else {
            self.state.score -= WASTED_ACTION_PENALTY;
            ActionOutcome::NothingHere
        }
    }

    fn resolve_tile(&mut self) -> MoveOutcome {
        let cell = self.state[self.state.player];

        if cell.has_pit() {
            self.end_game(GameEnd::Lost(LossReason::FellIntoPit))
        } else if cell.has_robot() {
            if self.state.has_all_chips() {
                MoveOutcome::ReachedRobot
            } else {
                self.end_game(GameEnd::Lost(LossReason::HostileRobot))
            }
        } else {
            MoveOutcome::Moved
        }
    }

    /// No cardinal neighbour is both in bounds and free of a pit.
    fn is_surrounded(&self) -> bool {
        self.state
            .iter_neighbors(self.state.player)
            .all(|coords| self.state[coords].has_pit())
    }

    fn end_game(&mut self, end: GameEnd) -> MoveOutcome {
        if !self.state.is_game_over() {
            self.state.play_state = match end {
                GameEnd::Won => PlayState::Won,
                GameEnd::Lost(_) => PlayState::Lost,
            };
            self.state.reveal_all();
            log::debug!("Game ended: {:?}, score {}", end, self.state.score);
        }
        MoveOutcome::Ended(end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(grid_size: Coord, robot: Coord2, pits: &[Coord2], chips: &[Coord2]) -> PlayEngine {
        PlayEngine::new(GameState::from_layout(grid_size, robot, pits, chips).unwrap())
    }

    /// Moves far enough apart in time to never hit the cooldown.
    struct Clock(Instant);

    impl Clock {
        fn new() -> Self {
            Self(Instant::now())
        }

        fn tick(&mut self) -> Instant {
            self.0 += Duration::from_secs(1);
            self.0
        }
    }

    fn walk(engine: &mut PlayEngine, clock: &mut Clock, path: &[Direction]) -> MoveOutcome {
        path.iter()
            .map(|&direction| engine.move_player(direction, clock.tick()))
            .last()
            .unwrap_or(MoveOutcome::Ignored)
    }

    #[test]
    fn move_costs_one_and_marks_visited() {
        let mut engine = engine(5, (4, 4), &[], &[]);
        let mut clock = Clock::new();

        assert_eq!(
            engine.move_player(Direction::Right, clock.tick()),
            MoveOutcome::Moved
        );
        assert_eq!(engine.state().player(), (1, 0));
        assert_eq!(engine.state().score(), 99);
        assert!(engine.state().cell_at((1, 0)).visited);
    }

    #[test]
    fn edge_rejects_without_cost() {
        let mut engine = engine(5, (4, 4), &[], &[]);

        let outcome = engine.move_player(Direction::Left, Instant::now());

        assert_eq!(outcome, MoveOutcome::BlockedByEdge);
        assert!(!outcome.changed_state());
        assert_eq!(engine.state().player(), (0, 0));
        assert_eq!(engine.state().score(), 100);
    }

    #[test]
    fn cooldown_drops_rapid_input() {
        let mut engine = engine(5, (4, 4), &[], &[]);
        let start = Instant::now();

        assert_eq!(engine.move_player(Direction::Right, start), MoveOutcome::Moved);
        assert_eq!(
            engine.move_player(Direction::Right, start + Duration::from_millis(100)),
            MoveOutcome::Throttled
        );
        assert_eq!(engine.state().player(), (1, 0));
        assert_eq!(engine.state().score(), 99);
        assert_eq!(
            engine.move_player(Direction::Right, start + MOVE_COOLDOWN),
            MoveOutcome::Moved
        );
        assert_eq!(engine.state().player(), (2, 0));
    }

    #[test]
    fn falling_into_pit_ends_and_reveals() {
        let mut engine = engine(4, (3, 3), &[(0, 1)], &[]);

        let outcome = engine.move_player(Direction::Down, Instant::now());

        assert_eq!(outcome, MoveOutcome::Ended(GameEnd::Lost(LossReason::FellIntoPit)));
        assert_eq!(engine.state().play_state(), PlayState::Lost);
        assert!(engine.state().grid.iter().all(|cell| cell.visited));
    }

    #[test]
    fn robot_without_chips_is_hostile() {
        let mut engine = engine(4, (1, 0), &[], &[(3, 3)]);

        assert_eq!(
            engine.move_player(Direction::Right, Instant::now()),
            MoveOutcome::Ended(GameEnd::Lost(LossReason::HostileRobot))
        );
    }

    #[test]
    fn surrounded_by_pits_ends_game() {
        // (1, 0) is boxed in by the edge and pits at (2, 0) and (1, 1); the start cell collapses behind the
        // player to close the last exit.
        let mut state = GameState::from_layout(4, (3, 3), &[(2, 0), (1, 1)], &[]).unwrap();
        state[(0, 0)].occupant = Occupant::Pit;
        let mut engine = PlayEngine::new(state);

        let outcome = engine.move_player(Direction::Right, Instant::now());

        assert_eq!(outcome, MoveOutcome::Ended(GameEnd::Lost(LossReason::Surrounded)));
        assert!(engine.is_finished());
        assert_eq!(engine.state().player(), (1, 0));
        assert_eq!(engine.state().score(), 99);
    }

    #[test]
    fn corner_with_pit_neighbors_is_surrounded() {
        let mut state = GameState::from_layout(4, (3, 3), &[(1, 0), (0, 1)], &[]).unwrap();
        assert!(PlayEngine::new(state.clone()).is_surrounded());

        state[(0, 1)].occupant = Occupant::Empty;
        assert!(!PlayEngine::new(state).is_surrounded());
    }

    #[test]
    fn collecting_chip_rewards_and_clears_tile() {
        let mut engine = engine(4, (3, 3), &[], &[(1, 0), (2, 0)]);
        let mut clock = Clock::new();

        walk(&mut engine, &mut clock, &[Direction::Right]);
        assert_eq!(
            engine.act(),
            ActionOutcome::ChipCollected {
                collected: 1,
                all_collected: false
            }
        );
        assert_eq!(engine.state().score(), 149);
        assert!(!engine.state().cell_at((1, 0)).has_chip());
        assert!(engine.state().chips()[0].collected);

        assert_eq!(engine.act(), ActionOutcome::NothingHere);
        assert_eq!(engine.state().score(), 99);
    }

    #[test]
    fn repair_without_all_chips_is_penalized() {
        let mut state = GameState::from_layout(4, (1, 0), &[], &[(3, 3)]).unwrap();
        state.player = (1, 0);
        let mut engine = PlayEngine::new(state);

        assert_eq!(engine.act(), ActionOutcome::RepairRefused);
        assert_eq!(engine.state().score(), 50);
        assert!(!engine.is_finished());
    }

    #[test]
    fn full_run_wins() {
        let mut engine = engine(4, (3, 0), &[(0, 2)], &[(1, 0), (2, 0)]);
        let mut clock = Clock::new();

        walk(&mut engine, &mut clock, &[Direction::Right]);
        engine.act();
        walk(&mut engine, &mut clock, &[Direction::Right]);
        assert_eq!(
            engine.act(),
            ActionOutcome::ChipCollected {
                collected: 2,
                all_collected: true
            }
        );
        assert_eq!(
            walk(&mut engine, &mut clock, &[Direction::Right]),
            MoveOutcome::ReachedRobot
        );
        assert_eq!(engine.act(), ActionOutcome::Repaired);

        // 100 - 3 moves + 2 chips + repair
        assert_eq!(engine.state().score(), 100 - 3 + 100 + 100);
        assert_eq!(engine.state().play_state(), PlayState::Won);
        assert!(engine.state().cell_at((3, 0)).visited);
        assert!(engine.state().cell_at((3, 3)).visited);
    }

    #[test]
    fn finished_game_ignores_input() {
        let mut engine = engine(4, (3, 3), &[(0, 1)], &[(2, 2)]);
        let mut clock = Clock::new();
        walk(&mut engine, &mut clock, &[Direction::Down]);
        let before = engine.state().clone();

        assert_eq!(engine.move_player(Direction::Right, clock.tick()), MoveOutcome::Ignored);
        assert_eq!(engine.act(), ActionOutcome::Ignored);
        assert_eq!(engine.state(), &before);
    }
}
