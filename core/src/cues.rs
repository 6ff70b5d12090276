use ndarray::Array2;

use crate::*;

/// Sensory cues for every cell, derived only from where the robot and pits are.
pub fn compute_cues(size: Coord2, robot: Coord2, pits: &[Coord2]) -> Array2<Cues> {
    let mut cues: Array2<Cues> = Array2::default(size.to_nd_index());

    for coords in NeighborIter::new(robot, size) {
        cues[coords.to_nd_index()] |= Cues::WHIRRING;
    }
    for &pit in pits {
        for coords in NeighborIter::new(pit, size) {
            cues[coords.to_nd_index()] |= Cues::DRAFT;
        }
    }

    cues
}
