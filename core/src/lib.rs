use serde::{Deserialize, Serialize};

pub use cues::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use notice::*;
pub use session::*;
pub use snapshot::*;
pub use state::*;
pub use tile::*;
pub use types::*;

mod cues;
mod engine;
mod error;
mod generator;
mod notice;
mod session;
mod snapshot;
mod state;
mod tile;
mod types;

/// Board dimensions and item counts for one game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub grid_size: Coord,
    pub pits: CellCount,
    pub chips: CellCount,
}

impl GameConfig {
    pub const DEFAULT_GRID_SIZE: Coord = 10;
    pub const DEFAULT_PITS: CellCount = 10;
    pub const DEFAULT_CHIPS: CellCount = 8;

    pub const fn new_unchecked(grid_size: Coord, pits: CellCount, chips: CellCount) -> Self {
        Self {
            grid_size,
            pits,
            chips,
        }
    }

    pub fn new(grid_size: Coord, pits: CellCount, chips: CellCount) -> Result<Self> {
        let config = Self::new_unchecked(grid_size, pits, chips);
        config.validate()?;
        Ok(config)
    }

    pub const fn size(&self) -> Coord2 {
        (self.grid_size, self.grid_size)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.grid_size, self.grid_size)
    }

    /// Player, robot, pits and chips each need a cell of their own.
    pub const fn required_cells(&self) -> u32 {
        2 + self.pits as u32 + self.chips as u32
    }

    pub fn validate(&self) -> Result<()> {
        if self.grid_size == 0 || self.required_cells() > u32::from(self.total_cells()) {
            return Err(GameError::InvalidConfig {
                grid_size: self.grid_size,
                pits: self.pits,
                chips: self.chips,
            });
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked(
            Self::DEFAULT_GRID_SIZE,
            Self::DEFAULT_PITS,
            Self::DEFAULT_CHIPS,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = GameConfig::default();
        assert_eq!(config.size(), (10, 10));
        assert_eq!(config.required_cells(), 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_rejects_overfull_grid() {
        assert_eq!(
            GameConfig::new(3, 5, 3),
            Err(GameError::InvalidConfig {
                grid_size: 3,
                pits: 5,
                chips: 3
            })
        );
        assert!(GameConfig::new(3, 4, 3).is_ok());
    }

    #[test]
    fn config_rejects_empty_grid() {
        assert!(GameConfig::new(0, 0, 0).is_err());
    }
}
