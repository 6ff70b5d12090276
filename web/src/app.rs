use nisbot_core::SnapshotStore;
use serde::{Deserialize, Serialize};
use yew::prelude::*;

use crate::api::ApiClient;
use crate::game::GameView;
use crate::leaderboard::LeaderboardView;
use crate::login::LoginView;
use crate::utils::*;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
struct PlayerName(String);

impl StorageKey for PlayerName {
    const KEY: &'static str = "nisbot:user";
}

#[derive(Properties, Clone, PartialEq)]
pub(crate) struct AppProps {
    pub api: ApiClient,
    #[prop_or_default]
    pub seed: Option<u64>,
}

#[function_component]
pub(crate) fn App(props: &AppProps) -> Html {
    let user = use_state(PlayerName::session_load);
    let leaderboard_generation = use_state(|| 0u32);

    let on_login = {
        let user = user.clone();
        Callback::from(move |name: String| {
            log::info!("logged in as {}", name);
            let name = PlayerName(name);
            name.session_save();
            user.set(Some(name));
        })
    };

    let on_logout = {
        let user = user.clone();
        Callback::from(move |_: MouseEvent| {
            PlayerName::session_clear();
            SessionStore.delete(nisbot_core::SNAPSHOT_KEY);
            user.set(None);
        })
    };

    let on_score_submitted = {
        let generation = leaderboard_generation.clone();
        Callback::from(move |()| generation.set(generation.wrapping_add(1)))
    };

    let Some(PlayerName(name)) = (*user).clone() else {
        return html! {
            <main>
                <LoginView api={props.api.clone()} {on_login} />
                <LeaderboardView api={props.api.clone()} generation={*leaderboard_generation} />
            </main>
        };
    };

    html! {
        <main>
            <header>
                <span class="player-name">{&name}</span>
                <button onclick={on_logout}>{"Log out"}</button>
            </header>
            <GameView
                player_name={name.clone()}
                api={props.api.clone()}
                seed={props.seed}
                {on_score_submitted}
            />
            <LeaderboardView api={props.api.clone()} generation={*leaderboard_generation} />
        </main>
    }
}
