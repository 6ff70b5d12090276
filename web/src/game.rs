use gloo::events::EventListener;
use nisbot_core as game;
use wasm_bindgen::JsCast;
use web_sys::KeyboardEvent;
use web_time::Instant;
use yew::prelude::*;

use crate::api::{ApiClient, NetworkError};
use crate::utils::*;

/// Maps a `KeyboardEvent::key` to a game command.
fn key_command(key: &str) -> Option<game::Command> {
    use game::{Command, Direction};

    match key {
        "ArrowUp" => Some(Command::Move(Direction::Up)),
        "ArrowDown" => Some(Command::Move(Direction::Down)),
        "ArrowLeft" => Some(Command::Move(Direction::Left)),
        "ArrowRight" => Some(Command::Move(Direction::Right)),
        "e" | "E" => Some(Command::Act),
        _ => None,
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct ViewCell {
    visited: bool,
    item: Option<&'static str>,
    cues: &'static str,
    player: bool,
}

fn view_cell(state: &game::GameState, coords: game::Coord2) -> ViewCell {
    let cell = state.cell_at(coords);
    let player = state.player() == coords;
    if !cell.visited {
        return ViewCell {
            player,
            ..Default::default()
        };
    }

    let item = match cell.occupant {
        game::Occupant::Pit => Some("⚫"),
        game::Occupant::Chip => Some("⚙️"),
        game::Occupant::Robot if state.is_game_over() || player => Some("🤖"),
        game::Occupant::Robot | game::Occupant::Empty => None,
    };
    let whirring = cell.cues.contains(game::Cues::WHIRRING);
    let draft = cell.cues.contains(game::Cues::DRAFT);
    let cues = match (whirring, draft) {
        (true, true) => "🔊🌬️",
        (true, false) => "🔊",
        (false, true) => "🌬️",
        (false, false) => "",
    };

    ViewCell {
        visited: true,
        item,
        cues,
        player,
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Submission {
    Idle,
    Pending,
    Done(String),
    Failed(String),
}

/// Closes the end dialog only once a new game actually started, so "Play Again" stays reachable.
fn apply_start(
    report: &mut Option<game::FinalReport>,
    submission: &mut Submission,
    result: game::Result<game::Notice>,
) -> game::Notice {
    match result {
        Ok(notice) => {
            *report = None;
            *submission = Submission::Idle;
            notice
        }
        Err(err) => {
            log::error!("Could not generate a new game: {}", err);
            game::Notice::quiet(err.to_string())
        }
    }
}

pub(crate) enum Msg {
    Input(game::Command),
    NewGame,
    Submitted(Result<String, NetworkError>),
}

#[derive(Properties, Clone, PartialEq)]
pub(crate) struct GameProps {
    pub player_name: String,
    pub api: ApiClient,
    #[prop_or_default]
    pub seed: Option<u64>,
    /// Called once a won game's score reached the leaderboard.
    #[prop_or_default]
    pub on_score_submitted: Callback<()>,
}

pub(crate) struct GameView {
    session: Option<game::GameSession<SessionStore>>,
    notice: game::Notice,
    report: Option<game::FinalReport>,
    submission: Submission,
    _keydown: EventListener,
}

impl GameView {
    fn seed(ctx: &Context<Self>) -> u64 {
        ctx.props().seed.unwrap_or_else(js_random_seed)
    }

    fn start(&mut self, ctx: &Context<Self>) {
        let seed = Self::seed(ctx);
        let result = match self.session.as_mut() {
            Some(session) => session.new_game(seed),
            None => game::GameSession::start(
                SessionStore,
                Some(ctx.props().player_name.clone()),
                game::GameConfig::default(),
                seed,
            )
            .map(|(session, notice)| {
                self.session = Some(session);
                notice
            }),
        };

        self.notice = apply_start(&mut self.report, &mut self.submission, result);
    }

    fn handle_effect(&mut self, ctx: &Context<Self>, effect: game::Effect) {
        match effect {
            game::Effect::SubmitScore { name, score } => {
                self.submission = Submission::Pending;
                let api = ctx.props().api.clone();
                ctx.link().send_future(async move {
                    Msg::Submitted(api.submit_score(&name, score).await)
                });
            }
        }
    }

    fn view_board(&self, state: &game::GameState) -> Html {
        let (cols, rows) = state.size();
        html! {
            <table class="board">
                {
                    for (0..rows).map(|y| html! {
                        <tr>
                            {
                                for (0..cols).map(|x| {
                                    let cell = view_cell(state, (x, y));
                                    let class = classes!(
                                        "cell",
                                        cell.visited.then_some("visited"),
                                        cell.player.then_some("player-location"),
                                    );
                                    html! {
                                        <td {class}>
                                            {cell.item.unwrap_or_default()}
                                            {cell.player.then_some("🧑‍🔧").unwrap_or_default()}
                                            <span class="sensory-cue">{cell.cues}</span>
                                        </td>
                                    }
                                })
                            }
                        </tr>
                    })
                }
            </table>
        }
    }

    fn view_report(&self, ctx: &Context<Self>, report: &game::FinalReport) -> Html {
        let class = if report.end.is_win() {
            "win-screen"
        } else {
            "game-over-screen"
        };
        let submission = match &self.submission {
            Submission::Idle => html! {},
            Submission::Pending => html! { <p class="status">{"Submitting..."}</p> },
            Submission::Done(message) => html! { <p class="status ok">{message}</p> },
            Submission::Failed(message) => html! { <p class="status error">{message}</p> },
        };
        let onclick = ctx.link().callback(|_: MouseEvent| Msg::NewGame);

        html! {
            <dialog {class} open=true>
                <h2>{report.headline()}</h2>
                <p>{report.summary()}</p>
                {submission}
                <button {onclick}>{"Play Again"}</button>
            </dialog>
        }
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let link = ctx.link().clone();
        let keydown = EventListener::new(&gloo::utils::document(), "keydown", move |event| {
            let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if let Some(command) = key_command(&event.key()) {
                event.prevent_default();
                link.send_message(Msg::Input(command));
            }
        });

        let mut view = Self {
            session: None,
            notice: game::Notice::default(),
            report: None,
            submission: Submission::Idle,
            _keydown: keydown,
        };
        view.start(ctx);
        view
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Input(command) => {
                let Some(session) = self.session.as_mut() else {
                    return false;
                };
                if self.report.is_some() {
                    return false;
                }

                let update = session.handle(command, Instant::now());
                log::trace!("{:?} -> {:?}", command, update);
                if !update.has_update() {
                    return false;
                }
                if let Some(notice) = update.notice {
                    self.notice = notice;
                }
                self.report = update.report;
                if let Some(effect) = update.effect {
                    self.handle_effect(ctx, effect);
                }
                true
            }
            Msg::NewGame => {
                self.start(ctx);
                true
            }
            Msg::Submitted(Ok(message)) => {
                self.submission = Submission::Done(message);
                ctx.props().on_score_submitted.emit(());
                true
            }
            Msg::Submitted(Err(err)) => {
                log::error!("Error submitting score: {:?}", err);
                self.submission = Submission::Failed(format!("Submission failed: {}", err));
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let Some(session) = self.session.as_ref() else {
            let onclick = ctx.link().callback(|_: MouseEvent| Msg::NewGame);
            return html! {
                <div class="nisbot">
                    <p class="message">{&self.notice.primary}</p>
                    <button {onclick}>{"Try again"}</button>
                </div>
            };
        };
        let state = session.state();

        html! {
            <div class="nisbot">
                <nav>
                    <span>{format!("Score: {}", state.score())}</span>
                    <span>{format!("Chips: {} / {}", state.chips_collected(), state.total_chips())}</span>
                </nav>
                {self.view_board(state)}
                <p class="message">{&self.notice.primary}</p>
                <p class="sensory">{&self.notice.ambient}</p>
                {
                    self.report
                        .as_ref()
                        .map(|report| self.view_report(ctx, report))
                        .unwrap_or_default()
                }
            </div>
        }
    }
}
