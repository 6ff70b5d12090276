use web_time::Instant;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Act,
}

/// Side effect the host has to carry out after an update, outside the synchronous mutation path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    SubmitScore { name: String, score: Score },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Update {
    pub notice: Option<Notice>,
    pub report: Option<FinalReport>,
    pub effect: Option<Effect>,
}

impl Update {
    /// Whether anything visible changed.
    pub fn has_update(&self) -> bool {
        self.notice.is_some() || self.report.is_some()
    }
}

/// One player's game plus its session snapshot.
#[derive(Debug)]
pub struct GameSession<S> {
    engine: PlayEngine,
    snapshots: Snapshots<S>,
    player_name: Option<String>,
    config: GameConfig,
}

impl<S: SnapshotStore> GameSession<S> {
    /// Resumes the saved game if there is an unfinished one, otherwise starts a fresh layout from `seed`.
    pub fn start(
        store: S,
        player_name: Option<String>,
        config: GameConfig,
        seed: u64,
    ) -> Result<(Self, Notice)> {
        let mut snapshots = Snapshots::new(store);

        match snapshots.restore() {
            Ok(Some(state)) if !state.is_game_over() => {
                log::debug!("Resuming saved game, score {}", state.score());
                let session = Self {
                    engine: PlayEngine::new(state),
                    snapshots,
                    player_name,
                    config,
                };
                return Ok((session, Notice::welcome_back()));
            }
            Ok(Some(_)) => {
                log::debug!("Saved game already finished, starting fresh");
                snapshots.clear();
            }
            Ok(None) => {}
            Err(err) => {
                log::warn!("Discarding unreadable saved game: {}", err);
                snapshots.clear();
            }
        }

        let state = RandomLayoutGenerator::new(seed).generate(config)?;
        let mut session = Self {
            engine: PlayEngine::new(state),
            snapshots,
            player_name,
            config,
        };
        session.persist();
        let notice = Notice::welcome(session.state());
        Ok((session, notice))
    }

    /// Replaces the current game. On error the current game is kept untouched.
    pub fn new_game(&mut self, seed: u64) -> Result<Notice> {
        let state = RandomLayoutGenerator::new(seed).generate(self.config)?;
        self.engine = PlayEngine::new(state);
        self.persist();
        Ok(Notice::welcome(self.state()))
    }

    pub fn handle(&mut self, command: Command, now: Instant) -> Update {
        let (notice, changed, end) = match command {
            Command::Move(direction) => {
                let outcome = self.engine.move_player(direction, now);
                (
                    Notice::for_move(outcome, self.state()),
                    outcome.changed_state(),
                    outcome.game_end(),
                )
            }
            Command::Act => {
                let outcome = self.engine.act();
                (
                    Notice::for_action(outcome, self.state()),
                    outcome.changed_state(),
                    outcome.game_end(),
                )
            }
        };

        let mut update = Update {
            notice,
            ..Default::default()
        };
        if let Some(end) = end {
            self.snapshots.clear();
            update.report = Some(FinalReport {
                end,
                score: self.state().score(),
            });
            update.effect = self.submission_for(end);
        } else if changed {
            self.persist();
        }
        update
    }

    pub fn engine(&self) -> &PlayEngine {
        &self.engine
    }

    pub fn state(&self) -> &GameState {
        self.engine.state()
    }

    pub fn snapshots(&self) -> &Snapshots<S> {
        &self.snapshots
    }

    pub fn player_name(&self) -> Option<&str> {
        self.player_name.as_deref()
    }

    fn submission_for(&self, end: GameEnd) -> Option<Effect> {
        if !end.is_win() {
            return None;
        }
        match &self.player_name {
            Some(name) => Some(Effect::SubmitScore {
                name: name.clone(),
                score: self.state().score(),
            }),
            None => {
                log::warn!("Won without a logged in player, score not submitted");
                None
            }
        }
    }

    fn persist(&mut self) {
        if let Err(err) = self.snapshots.save(self.engine.state()) {
            log::error!("Could not save game to session storage: {}", err);
        }
    }
}
