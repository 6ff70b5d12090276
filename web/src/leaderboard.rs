use nisbot_protocol::LeaderboardEntry;
use yew::prelude::*;

use crate::api::ApiClient;

#[derive(Clone, Debug, PartialEq)]
enum Board {
    Loading,
    Loaded(Vec<LeaderboardEntry>),
    Failed,
}

#[derive(Properties, PartialEq)]
pub(crate) struct LeaderboardProps {
    pub api: ApiClient,
    /// Bumped to trigger a reload, e.g. after a submitted score.
    #[prop_or_default]
    pub generation: u32,
}

#[function_component]
pub(crate) fn LeaderboardView(props: &LeaderboardProps) -> Html {
    let board = use_state(|| Board::Loading);

    {
        let board = board.clone();
        let api = props.api.clone();
        use_effect_with(props.generation, move |_| {
            wasm_bindgen_futures::spawn_local(async move {
                match api.fetch_leaderboard().await {
                    Ok(entries) => board.set(Board::Loaded(entries)),
                    Err(err) => {
                        log::error!("Error loading leaderboard: {:?}", err);
                        board.set(Board::Failed);
                    }
                }
            });
        });
    }

    let body = match &*board {
        Board::Loading => html! { <p>{"Loading..."}</p> },
        Board::Failed => {
            html! { <p>{"Could not load leaderboard. Check the server connection."}</p> }
        }
        Board::Loaded(entries) if entries.is_empty() => {
            html! { <p>{"No scores yet. Be the first!"}</p> }
        }
        Board::Loaded(entries) => html! {
            <ol>
                { for entries.iter().map(|entry| html! {
                    <li>{format!("{} - {}", entry.name, entry.total_score)}</li>
                }) }
            </ol>
        },
    };

    html! {
        <aside class="leaderboard">
            <h3>{"Leaderboard"}</h3>
            {body}
        </aside>
    }
}
