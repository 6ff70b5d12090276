use thiserror::Error;

use crate::{CellCount, Coord};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Grid of size {grid_size} cannot hold {pits} pits and {chips} chips")]
    InvalidConfig {
        grid_size: Coord,
        pits: CellCount,
        chips: CellCount,
    },
    #[error("Failed to place all items, try again")]
    PlacementExhausted,
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Two items were placed on the same cell")]
    OverlappingPlacement,
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
}

pub type Result<T> = core::result::Result<T, GameError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Snapshot store failed: {0}")]
pub struct StoreError(pub String);

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Snapshot is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Snapshot version {found} is not supported, expected {expected}")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("Snapshot describes an inconsistent board: {0}")]
    Inconsistent(#[from] GameError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
