use crate::*;

/// Text shown to the player after an input: the event itself and the ambient senses of the current tile.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Notice {
    pub primary: String,
    pub ambient: String,
}

impl Notice {
    /// A notice with the ambient line cleared.
    pub fn quiet(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            ambient: String::new(),
        }
    }

    /// A notice that keeps describing what the player senses where they stand.
    pub fn with_senses(primary: impl Into<String>, state: &GameState) -> Self {
        Self {
            primary: primary.into(),
            ambient: ambient_text(state),
        }
    }

    pub fn welcome(state: &GameState) -> Self {
        Self::quiet(format!(
            "Welcome! Find all {} chips to repair Nisbot.",
            state.total_chips()
        ))
    }

    pub fn welcome_back() -> Self {
        Self::quiet("Welcome back! Your game has been restored.")
    }

    pub fn for_move(outcome: MoveOutcome, state: &GameState) -> Option<Self> {
        use MoveOutcome::*;

        Some(match outcome {
            Ignored | Throttled => return None,
            BlockedByEdge => Self::with_senses("You can't move off the edge!", state),
            Moved => Self::with_senses("You moved.", state),
            ReachedRobot => {
                Self::quiet("You've found Nisbot and have all the parts! Press 'E' to repair it.")
            }
            Ended(end) => Self::quiet(end.reason()),
        })
    }

    pub fn for_action(outcome: ActionOutcome, state: &GameState) -> Option<Self> {
        use ActionOutcome::*;

        Some(match outcome {
            Ignored => return None,
            Repaired => Self::quiet(GameEnd::Won.reason()),
            RepairRefused => Self::with_senses(
                format!(
                    "You need all {} chips to repair Nisbot!",
                    state.total_chips()
                ),
                state,
            ),
            ChipCollected {
                all_collected: true,
                ..
            } => Self::with_senses("All chips collected! Find Nisbot to repair.", state),
            ChipCollected { collected, .. } => Self::with_senses(
                format!("Chip collected! You now have {}.", collected),
                state,
            ),
            NothingHere => Self::with_senses("There is nothing to do here.", state),
        })
    }
}

/// Sensory description of the player's tile.
pub fn ambient_text(state: &GameState) -> String {
    let cell = state.cell_at(state.player());
    let mut parts = Vec::with_capacity(3);
    if cell.cues.contains(Cues::WHIRRING) {
        parts.push("You hear a faint electronic whirring.");
    }
    if cell.cues.contains(Cues::DRAFT) {
        parts.push("You feel a cool draft.");
    }
    if cell.has_chip() {
        parts.push("You see something gleaming here!");
    }
    parts.join(" ")
}

impl GameEnd {
    pub const fn headline(self) -> &'static str {
        match self {
            Self::Won => "Repair Complete!",
            Self::Lost(_) => "Mission Failed!",
        }
    }

    pub const fn reason(self) -> &'static str {
        match self {
            Self::Won => "You successfully repaired Nisbot! You win!",
            Self::Lost(LossReason::FellIntoPit) => "You fell into a pit! Game Over.",
            Self::Lost(LossReason::HostileRobot) => {
                "You approached Nisbot without all the parts... It was hostile!"
            }
            Self::Lost(LossReason::Surrounded) => {
                "You are surrounded by pits and cannot move! Game Over."
            }
        }
    }

    pub const fn is_win(self) -> bool {
        matches!(self, Self::Won)
    }
}

/// Closing message of a finished game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FinalReport {
    pub end: GameEnd,
    pub score: Score,
}

impl FinalReport {
    pub fn headline(&self) -> &'static str {
        self.end.headline()
    }

    pub fn summary(&self) -> String {
        format!("{} Final Score: {}", self.end.reason(), self.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use web_time::{Duration, Instant};

    #[test]
    fn ambient_lists_cues_and_gleam() {
        // player at (0, 0): pit at (1, 0) and robot at (0, 1) are both adjacent
        let state = GameState::from_layout(4, (0, 1), &[(1, 0)], &[(3, 3)]).unwrap();
        assert_eq!(
            ambient_text(&state),
            "You hear a faint electronic whirring. You feel a cool draft."
        );

        let mut state = GameState::from_layout(4, (3, 3), &[], &[(1, 1)]).unwrap();
        state.player = (1, 1);
        assert_eq!(ambient_text(&state), "You see something gleaming here!");
    }

    #[test]
    fn robot_tile_suppresses_senses() {
        let state = GameState::from_layout(4, (3, 3), &[(3, 2)], &[]).unwrap();
        let notice = Notice::for_move(MoveOutcome::ReachedRobot, &state).unwrap();
        assert!(notice.ambient.is_empty());
    }

    #[test]
    fn rejected_input_has_no_notice() {
        let state = GameState::from_layout(4, (3, 3), &[], &[]).unwrap();
        assert_eq!(Notice::for_move(MoveOutcome::Throttled, &state), None);
        assert_eq!(Notice::for_action(ActionOutcome::Ignored, &state), None);
    }

    #[test]
    fn edge_bump_keeps_describing_senses() {
        let state = GameState::from_layout(4, (3, 3), &[(1, 0)], &[(2, 2)]).unwrap();
        let mut engine = PlayEngine::new(state);

        let outcome = engine.move_player(Direction::Left, Instant::now());

        assert_eq!(outcome, MoveOutcome::BlockedByEdge);
        assert_eq!(
            Notice::for_move(outcome, engine.state()),
            Some(Notice {
                primary: "You can't move off the edge!".into(),
                ambient: "You feel a cool draft.".into(),
            })
        );
    }

    #[test]
    fn action_messages() {
        let state = GameState::from_layout(4, (3, 3), &[], &[(1, 0), (2, 0)]).unwrap();
        let mut engine = PlayEngine::new(state);
        let start = Instant::now();
        let primary = |outcome, state: &GameState| Notice::for_action(outcome, state).unwrap().primary;

        let outcome = engine.act();
        assert_eq!(primary(outcome, engine.state()), "There is nothing to do here.");

        let outcome = engine.move_player(Direction::Right, start);
        let moved = Notice::for_move(outcome, engine.state()).unwrap();
        assert_eq!(moved.primary, "You moved.");
        assert_eq!(moved.ambient, "You see something gleaming here!");

        let outcome = engine.act();
        assert_eq!(primary(outcome, engine.state()), "Chip collected! You now have 1.");
        assert!(Notice::for_action(outcome, engine.state()).unwrap().ambient.is_empty());

        engine.move_player(Direction::Right, start + Duration::from_secs(1));
        let outcome = engine.act();
        assert_eq!(
            primary(outcome, engine.state()),
            "All chips collected! Find Nisbot to repair."
        );

        assert_eq!(
            primary(ActionOutcome::RepairRefused, engine.state()),
            "You need all 2 chips to repair Nisbot!"
        );
        assert_eq!(
            primary(ActionOutcome::Repaired, engine.state()),
            "You successfully repaired Nisbot! You win!"
        );
    }

    #[test]
    fn final_report_mentions_score() {
        let report = FinalReport {
            end: GameEnd::Lost(LossReason::FellIntoPit),
            score: 87,
        };
        assert_eq!(report.headline(), "Mission Failed!");
        assert_eq!(report.summary(), "You fell into a pit! Game Over. Final Score: 87");
    }
}
