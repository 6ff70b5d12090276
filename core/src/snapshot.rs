use hashbrown::HashMap;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

pub const SNAPSHOT_VERSION: u32 = 1;
pub const SNAPSHOT_KEY: &str = "nisbot:game:v1";

/// Key/value store scoped to one browser session.
pub trait SnapshotStore {
    fn save(&mut self, key: &str, document: &str) -> core::result::Result<(), StoreError>;
    fn load(&self, key: &str) -> core::result::Result<Option<String>, StoreError>;
    fn delete(&mut self, key: &str);
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    documents: HashMap<String, String>,
}

impl MemoryStore {
    pub fn contains(&self, key: &str) -> bool {
        self.documents.contains_key(key)
    }
}

impl SnapshotStore for MemoryStore {
    fn save(&mut self, key: &str, document: &str) -> core::result::Result<(), StoreError> {
        self.documents.insert(key.to_owned(), document.to_owned());
        Ok(())
    }

    fn load(&self, key: &str) -> core::result::Result<Option<String>, StoreError> {
        Ok(self.documents.get(key).cloned())
    }

    fn delete(&mut self, key: &str) {
        self.documents.remove(key);
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct PositionRecord {
    x: Coord,
    y: Coord,
}

impl From<Coord2> for PositionRecord {
    fn from((x, y): Coord2) -> Self {
        Self { x, y }
    }
}

impl From<PositionRecord> for Coord2 {
    fn from(PositionRecord { x, y }: PositionRecord) -> Self {
        (x, y)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct CellRecord {
    visited: bool,
    occupant: Occupant,
    cues: SmallVec<[Cue; 2]>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct ChipRecord {
    x: Coord,
    y: Coord,
    collected: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigRecord {
    grid_size: Coord,
    num_pits: CellCount,
    num_chips: CellCount,
}

impl From<GameConfig> for ConfigRecord {
    fn from(config: GameConfig) -> Self {
        Self {
            grid_size: config.grid_size,
            num_pits: config.pits,
            num_chips: config.chips,
        }
    }
}

impl From<ConfigRecord> for GameConfig {
    fn from(record: ConfigRecord) -> Self {
        GameConfig::new_unchecked(record.grid_size, record.num_pits, record.num_chips)
    }
}

#[derive(Deserialize)]
struct VersionHeader {
    version: u32,
}

/// Version 1 schema. Rows are stored top to bottom, `grid[y][x]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotV1 {
    version: u32,
    config: ConfigRecord,
    grid: Vec<Vec<CellRecord>>,
    player_pos: PositionRecord,
    nisbot_pos: PositionRecord,
    pits: Vec<PositionRecord>,
    chips: Vec<ChipRecord>,
    score: Score,
    chips_collected: CellCount,
    play_state: PlayState,
}

impl SnapshotV1 {
    fn capture(state: &GameState) -> Self {
        let (size_x, size_y) = state.size();
        let grid = (0..size_y)
            .map(|y| {
                (0..size_x)
                    .map(|x| {
                        let cell = state.cell_at((x, y));
                        CellRecord {
                            visited: cell.visited,
                            occupant: cell.occupant,
                            cues: cell.cues.to_list(),
                        }
                    })
                    .collect()
            })
            .collect();

        Self {
            version: SNAPSHOT_VERSION,
            config: state.config.into(),
            grid,
            player_pos: state.player.into(),
            nisbot_pos: state.robot.into(),
            pits: state.pits.iter().map(|&pit| pit.into()).collect(),
            chips: state
                .chips
                .iter()
                .map(|chip| ChipRecord {
                    x: chip.position.0,
                    y: chip.position.1,
                    collected: chip.collected,
                })
                .collect(),
            score: state.score,
            chips_collected: state.chips_collected,
            play_state: state.play_state,
        }
    }

    fn rebuild(self) -> Result<GameState> {
        let config = GameConfig::from(self.config);
        let side = usize::from(config.grid_size);
        if self.grid.len() != side || self.grid.iter().any(|row| row.len() != side) {
            return Err(GameError::InvalidBoardShape);
        }

        let rows = &self.grid;
        let grid = Array2::from_shape_fn((side, side), |(x, y)| {
            let record = &rows[y][x];
            Cell {
                visited: record.visited,
                occupant: record.occupant,
                cues: Cues::from_list(&record.cues),
            }
        });

        let state = GameState {
            config,
            grid,
            player: self.player_pos.into(),
            robot: self.nisbot_pos.into(),
            pits: self.pits.into_iter().map(Coord2::from).collect(),
            chips: self
                .chips
                .into_iter()
                .map(|chip| Chip {
                    position: (chip.x, chip.y),
                    collected: chip.collected,
                })
                .collect(),
            score: self.score,
            chips_collected: self.chips_collected,
            play_state: self.play_state,
        };
        state.check_consistency()?;
        Ok(state)
    }
}

pub fn encode_snapshot(state: &GameState) -> core::result::Result<String, SnapshotError> {
    Ok(serde_json::to_string(&SnapshotV1::capture(state))?)
}

pub fn decode_snapshot(document: &str) -> core::result::Result<GameState, SnapshotError> {
    let VersionHeader { version } = serde_json::from_str(document)?;
    if version != SNAPSHOT_VERSION {
        return Err(SnapshotError::UnsupportedVersion {
            found: version,
            expected: SNAPSHOT_VERSION,
        });
    }
    let snapshot: SnapshotV1 = serde_json::from_str(document)?;
    Ok(snapshot.rebuild()?)
}

/// The snapshot slot of one session.
#[derive(Clone, Debug)]
pub struct Snapshots<S> {
    store: S,
    key: &'static str,
}

impl<S: SnapshotStore> Snapshots<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, SNAPSHOT_KEY)
    }

    pub fn with_key(store: S, key: &'static str) -> Self {
        Self { store, key }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Overwrites any earlier snapshot.
    pub fn save(&mut self, state: &GameState) -> core::result::Result<(), SnapshotError> {
        let document = encode_snapshot(state)?;
        self.store.save(self.key, &document)?;
        Ok(())
    }

    /// `Ok(None)` when nothing was saved.
    pub fn restore(&self) -> core::result::Result<Option<GameState>, SnapshotError> {
        match self.store.load(self.key)? {
            Some(document) => decode_snapshot(&document).map(Some),
            None => Ok(None),
        }
    }

    pub fn clear(&mut self) {
        self.store.delete(self.key);
    }
}
