use hashbrown::HashSet;

use super::*;

/// Draws allowed per item before placement gives up.
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 1000;

/// Reject-and-resample placement: every item gets a uniformly random free cell, drawn in the order robot, pits,
/// chips.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomLayoutGenerator {
    seed: u64,
    max_attempts: u32,
}

impl RandomLayoutGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            max_attempts: MAX_PLACEMENT_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }
}

impl LayoutGenerator for RandomLayoutGenerator {
    fn generate(self, config: GameConfig) -> Result<GameState> {
        use rand::prelude::*;

        config.validate()?;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut occupied: HashSet<Coord2> = HashSet::with_capacity(config.required_cells() as usize);
        occupied.insert(PLAYER_START);

        let mut place = |rng: &mut SmallRng| -> Result<Coord2> {
            for _ in 0..self.max_attempts {
                let coords = (
                    rng.random_range(0..config.grid_size),
                    rng.random_range(0..config.grid_size),
                );
                if occupied.insert(coords) {
                    return Ok(coords);
                }
            }
            log::warn!(
                "Gave up placing an item after {} attempts on a {size}x{size} grid",
                self.max_attempts,
                size = config.grid_size
            );
            Err(GameError::PlacementExhausted)
        };

        let robot = place(&mut rng)?;
        let pits = (0..config.pits)
            .map(|_| place(&mut rng))
            .collect::<Result<Vec<_>>>()?;
        let chips = (0..config.chips)
            .map(|_| place(&mut rng))
            .collect::<Result<Vec<_>>>()?;

        log::debug!(
            "Generated layout with seed {}: robot at {:?}, {} pits, {} chips",
            self.seed,
            robot,
            pits.len(),
            chips.len()
        );
        GameState::from_layout(config.grid_size, robot, &pits, &chips)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_positions(state: &GameState) -> Vec<Coord2> {
        let mut positions = vec![state.player(), state.robot()];
        positions.extend_from_slice(state.pits());
        positions.extend(state.chips().iter().map(|chip| chip.position));
        positions
    }

    #[test]
    fn placements_are_unique_across_seeds() {
        for seed in 0..200 {
            let state = RandomLayoutGenerator::new(seed)
                .generate(GameConfig::default())
                .unwrap();
            let positions = all_positions(&state);
            let unique: HashSet<_> = positions.iter().copied().collect();

            assert_eq!(positions.len(), 20);
            assert_eq!(unique.len(), positions.len(), "seed {}", seed);
        }
    }

    #[test]
    fn fresh_state_has_starting_values() {
        let state = RandomLayoutGenerator::new(7)
            .generate(GameConfig::default())
            .unwrap();

        assert_eq!(state.player(), (0, 0));
        assert!(state.cell_at((0, 0)).visited);
        assert_eq!(state.score(), 100);
        assert_eq!(state.chips_collected(), 0);
        assert!(!state.is_game_over());
        assert_eq!(state.grid.iter().filter(|cell| cell.visited).count(), 1);
    }

    #[test]
    fn same_seed_same_layout() {
        let a = RandomLayoutGenerator::new(42).generate(GameConfig::default());
        let b = RandomLayoutGenerator::new(42).generate(GameConfig::default());
        assert_eq!(a, b);
    }

    #[test]
    fn cues_follow_hazards() {
        let state = RandomLayoutGenerator::new(3)
            .generate(GameConfig::default())
            .unwrap();
        assert_eq!(
            state.grid.mapv(|cell| cell.cues),
            compute_cues(state.size(), state.robot(), state.pits())
        );
    }

    #[test]
    fn invalid_config_is_rejected_before_placement() {
        let config = GameConfig::new_unchecked(3, 6, 3);
        assert_eq!(
            RandomLayoutGenerator::new(1).generate(config),
            Err(GameError::InvalidConfig {
                grid_size: 3,
                pits: 6,
                chips: 3
            })
        );
    }

    #[test]
    fn full_grid_is_filled_exactly() {
        let config = GameConfig::new(3, 4, 3).unwrap();
        let state = RandomLayoutGenerator::new(11)
            .with_max_attempts(100_000)
            .generate(config)
            .unwrap();
        let empty = state
            .grid
            .iter()
            .filter(|cell| cell.occupant == Occupant::Empty)
            .count();
        assert_eq!(empty, 1);
    }

    #[test]
    fn exhausted_budget_is_reported() {
        let config = GameConfig::new(3, 4, 3).unwrap();
        assert_eq!(
            RandomLayoutGenerator::new(5)
                .with_max_attempts(0)
                .generate(config),
            Err(GameError::PlacementExhausted)
        );
    }
}
