use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// What sits on a cell. Pits, chips and the robot never share a cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Occupant {
    #[default]
    Empty,
    Pit,
    Chip,
    Robot,
}

/// A single sensory hint.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cue {
    /// The robot is one step away.
    Whirring,
    /// A pit is one step away.
    Draft,
}

bitflags! {
    /// Set of cues attached to a cell.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Cues: u8 {
        const WHIRRING = 1;
        const DRAFT    = 1 << 1;
    }
}

impl From<Cue> for Cues {
    fn from(cue: Cue) -> Self {
        match cue {
            Cue::Whirring => Cues::WHIRRING,
            Cue::Draft => Cues::DRAFT,
        }
    }
}

impl Cues {
    /// Explicit list form, stable order.
    pub fn to_list(self) -> SmallVec<[Cue; 2]> {
        let mut list = SmallVec::new();
        if self.contains(Cues::WHIRRING) {
            list.push(Cue::Whirring);
        }
        if self.contains(Cues::DRAFT) {
            list.push(Cue::Draft);
        }
        list
    }

    pub fn from_list(list: &[Cue]) -> Self {
        list.iter()
            .fold(Cues::empty(), |cues, &cue| cues | Cues::from(cue))
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub visited: bool,
    pub occupant: Occupant,
    pub cues: Cues,
}

impl Cell {
    pub const fn has_pit(self) -> bool {
        matches!(self.occupant, Occupant::Pit)
    }

    pub const fn has_chip(self) -> bool {
        matches!(self.occupant, Occupant::Chip)
    }

    pub const fn has_robot(self) -> bool {
        matches!(self.occupant, Occupant::Robot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cue_list_round_trips() {
        let cues = Cues::WHIRRING | Cues::DRAFT;
        let list = cues.to_list();
        assert_eq!(list.as_slice(), &[Cue::Whirring, Cue::Draft]);
        assert_eq!(Cues::from_list(&list), cues);
        assert!(Cues::empty().to_list().is_empty());
    }
}
