use core::ops::{Index, IndexMut};
use hashbrown::HashSet;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

pub const PLAYER_START: Coord2 = (0, 0);
pub const STARTING_SCORE: Score = 100;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chip {
    pub position: Coord2,
    pub collected: bool,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayState {
    #[default]
    Active,
    Won,
    Lost,
}

impl PlayState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Full game state: the board plus everything placed on it.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub(crate) config: GameConfig,
    pub(crate) grid: Array2<Cell>,
    pub(crate) player: Coord2,
    pub(crate) robot: Coord2,
    pub(crate) pits: Vec<Coord2>,
    pub(crate) chips: Vec<Chip>,
    pub(crate) score: Score,
    pub(crate) chips_collected: CellCount,
    pub(crate) play_state: PlayState,
}

impl GameState {
    /// Builds a fresh game from explicit placements. The player always starts at [`PLAYER_START`].
    pub fn from_layout(grid_size: Coord, robot: Coord2, pits: &[Coord2], chips: &[Coord2]) -> Result<Self> {
        let config = GameConfig::new(
            grid_size,
            pits.len().try_into().map_err(|_| GameError::InvalidBoardShape)?,
            chips.len().try_into().map_err(|_| GameError::InvalidBoardShape)?,
        )?;
        let size = config.size();

        let mut occupied = HashSet::with_capacity(config.required_cells() as usize);
        occupied.insert(PLAYER_START);
        for &coords in core::iter::once(&robot).chain(pits).chain(chips) {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCoords);
            }
            if !occupied.insert(coords) {
                return Err(GameError::OverlappingPlacement);
            }
        }

        let cues = compute_cues(size, robot, pits);
        let mut grid: Array2<Cell> = Array2::from_shape_fn(size.to_nd_index(), |index| Cell {
            cues: cues[index],
            ..Cell::default()
        });

        grid[robot.to_nd_index()].occupant = Occupant::Robot;
        for pit in pits {
            grid[pit.to_nd_index()].occupant = Occupant::Pit;
        }
        for chip in chips {
            grid[chip.to_nd_index()].occupant = Occupant::Chip;
        }
        grid[PLAYER_START.to_nd_index()].visited = true;

        Ok(Self {
            config,
            grid,
            player: PLAYER_START,
            robot,
            pits: pits.to_vec(),
            chips: chips
                .iter()
                .map(|&position| Chip {
                    position,
                    collected: false,
                })
                .collect(),
            score: STARTING_SCORE,
            chips_collected: 0,
            play_state: PlayState::Active,
        })
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn size(&self) -> Coord2 {
        self.config.size()
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self[coords]
    }

    pub fn player(&self) -> Coord2 {
        self.player
    }

    pub fn robot(&self) -> Coord2 {
        self.robot
    }

    pub fn pits(&self) -> &[Coord2] {
        &self.pits
    }

    pub fn chips(&self) -> &[Chip] {
        &self.chips
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn chips_collected(&self) -> CellCount {
        self.chips_collected
    }

    pub fn total_chips(&self) -> CellCount {
        self.config.chips
    }

    pub fn has_all_chips(&self) -> bool {
        self.chips_collected >= self.config.chips
    }

    pub fn play_state(&self) -> PlayState {
        self.play_state
    }

    pub fn is_game_over(&self) -> bool {
        self.play_state.is_finished()
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub(crate) fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size())
    }

    pub(crate) fn reveal_all(&mut self) {
        self.grid.iter_mut().for_each(|cell| cell.visited = true);
    }

    /// Checks every cross-field invariant, used when a state comes from outside the engine.
    pub(crate) fn check_consistency(&self) -> Result<()> {
        self.config.validate()?;
        let side = usize::from(self.config.grid_size);
        if self.grid.dim() != (side, side)
            || self.pits.len() != usize::from(self.config.pits)
            || self.chips.len() != usize::from(self.config.chips)
        {
            return Err(GameError::InvalidBoardShape);
        }

        // Only the placements are distinct, the player walks over chips and the robot.
        let mut occupied = HashSet::with_capacity(self.config.required_cells() as usize);
        occupied.insert(PLAYER_START);
        for coords in core::iter::once(self.robot)
            .chain(self.pits.iter().copied())
            .chain(self.chips.iter().map(|chip| chip.position))
        {
            if !occupied.insert(self.validate_coords(coords)?) {
                return Err(GameError::OverlappingPlacement);
            }
        }

        let collected = self.chips.iter().filter(|chip| chip.collected).count();
        if collected != usize::from(self.chips_collected) {
            return Err(GameError::InvalidBoardShape);
        }

        let cues = compute_cues(self.size(), self.robot, &self.pits);
        let expected_occupant = |coords: Coord2| {
            if coords == self.robot {
                Occupant::Robot
            } else if self.pits.contains(&coords) {
                Occupant::Pit
            } else if self
                .chips
                .iter()
                .any(|chip| chip.position == coords && !chip.collected)
            {
                Occupant::Chip
            } else {
                Occupant::Empty
            }
        };
        for ((x, y), cell) in self.grid.indexed_iter() {
            let coords: Coord2 = (
                x.try_into().map_err(|_| GameError::InvalidBoardShape)?,
                y.try_into().map_err(|_| GameError::InvalidBoardShape)?,
            );
            if cell.occupant != expected_occupant(coords) || cell.cues != cues[(x, y)] {
                return Err(GameError::InvalidBoardShape);
            }
        }

        let player = self[self.validate_coords(self.player)?];
        if !player.visited || (!self.is_game_over() && player.has_pit()) {
            return Err(GameError::InvalidBoardShape);
        }

        Ok(())
    }
}

impl Index<Coord2> for GameState {
    type Output = Cell;

    fn index(&self, (x, y): Coord2) -> &Self::Output {
        &self.grid[(x as usize, y as usize)]
    }
}

impl IndexMut<Coord2> for GameState {
    fn index_mut(&mut self, (x, y): Coord2) -> &mut Self::Output {
        &mut self.grid[(x as usize, y as usize)]
    }
}
