use nisbot_protocol::normalize_name;
use wasm_bindgen::JsCast;
use web_sys::{HtmlInputElement, KeyboardEvent};
use yew::prelude::*;

use crate::api::{ApiClient, AuthOutcome};

#[derive(Clone, Debug, PartialEq)]
enum Status {
    Idle,
    Pending,
    Failed(String),
}

#[derive(Properties, PartialEq)]
pub(crate) struct LoginProps {
    pub api: ApiClient,
    pub on_login: Callback<String>,
}

/// Entry screen, the game only starts once the service knows the name.
#[function_component]
pub(crate) fn LoginView(props: &LoginProps) -> Html {
    let name = use_state(String::new);
    let status = use_state(|| Status::Idle);

    let attempt_login = {
        let name = name.clone();
        let status = status.clone();
        let api = props.api.clone();
        let on_login = props.on_login.clone();
        Callback::from(move |()| {
            if *status == Status::Pending {
                return;
            }
            let Some(name) = normalize_name(&name) else {
                status.set(Status::Failed("Please enter your name.".into()));
                return;
            };

            status.set(Status::Pending);
            let status = status.clone();
            let api = api.clone();
            let on_login = on_login.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match api.authenticate(&name).await {
                    Ok(AuthOutcome::Accepted(message)) => {
                        log::debug!("login accepted: {}", message);
                        status.set(Status::Idle);
                        on_login.emit(name);
                    }
                    Ok(AuthOutcome::NotFound(message)) => status.set(Status::Failed(message)),
                    Err(err) => {
                        log::error!("login error: {:?}", err);
                        status.set(Status::Failed(err.to_string()));
                    }
                }
            });
        })
    };

    let oninput = {
        let name = name.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target().and_then(|t| t.dyn_into::<HtmlInputElement>().ok()) {
                name.set(input.value());
            }
        })
    };
    let onkeypress = {
        let attempt_login = attempt_login.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" {
                attempt_login.emit(());
            }
        })
    };
    let onclick = Callback::from(move |_: MouseEvent| attempt_login.emit(()));

    let (status_class, status_text) = match &*status {
        Status::Idle => ("", String::new()),
        Status::Pending => ("pending", "Authenticating...".to_string()),
        Status::Failed(message) => ("error", message.clone()),
    };

    html! {
        <article class="login">
            <h2>{"Nisbot needs a mechanic"}</h2>
            <input
                id="participant-name"
                placeholder="Your name"
                value={(*name).clone()}
                {oninput}
                {onkeypress}
            />
            <button {onclick} disabled={*status == Status::Pending}>{"Start"}</button>
            <p class={classes!("status", status_class)}>{status_text}</p>
        </article>
    }
}
