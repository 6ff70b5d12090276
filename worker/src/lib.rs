use nisbot_protocol::{
    AUTH_PATH, AuthRequest, LEADERBOARD_PATH, MessageResponse, SubmitScoreRequest,
};
use time::OffsetDateTime;
use worker::*;

pub mod leaderboard;

use leaderboard::{
    LeaderboardError, PARTICIPANT_PREFIX, Participant, STANDINGS_KEY, Standings, participant_key,
};

/// KV namespace holding one record per participant plus the aggregated standings.
const KV_BINDING: &str = "NISBOT";

fn cors() -> Cors {
    Cors::new()
        .with_origins(["*"])
        .with_methods([Method::Get, Method::Post, Method::Options])
        .with_allowed_headers(["Content-Type"])
}

fn message(status: u16, text: impl Into<String>) -> Result<Response> {
    Ok(Response::from_json(&MessageResponse::new(text))?.with_status(status))
}

fn now_utc() -> OffsetDateTime {
    let millis = Date::now().as_millis();
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
        .unwrap_or(OffsetDateTime::UNIX_EPOCH)
}

async fn load_participant(kv: &KvStore, name: &str) -> Result<Option<Participant>> {
    Ok(kv.get(&participant_key(name)).json::<Participant>().await?)
}

async fn store_participant(kv: &KvStore, participant: &Participant) -> Result<()> {
    let document = serde_json::to_string(participant)?;
    kv.put(&participant_key(&participant.name), document)?
        .execute()
        .await?;
    Ok(())
}

/// Names of every participant key, following the list cursor across pages.
async fn list_participant_keys(kv: &KvStore) -> Result<Vec<String>> {
    let mut keys = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let mut list = kv.list().prefix(PARTICIPANT_PREFIX.to_string());
        if let Some(cursor) = cursor.take() {
            list = list.cursor(cursor);
        }
        let page = list.execute().await?;
        keys.extend(page.keys.into_iter().map(|key| key.name));
        cursor = leaderboard::next_page_cursor(page.list_complete, page.cursor);
        if cursor.is_none() {
            break;
        }
    }
    Ok(keys)
}

async fn rebuild_standings(kv: &KvStore) -> Result<Standings> {
    let keys = list_participant_keys(kv).await?;
    let mut participants = Vec::with_capacity(keys.len());
    for key in keys {
        if let Some(participant) = kv.get(&key).json::<Participant>().await? {
            participants.push(participant);
        }
    }
    let standings = Standings::from_participants(&participants);
    console_log!("rebuilt standings from {} participants", standings.len());
    Ok(standings)
}

async fn load_standings(kv: &KvStore) -> Result<Standings> {
    match kv.get(STANDINGS_KEY).json::<Standings>().await? {
        Some(standings) => Ok(standings),
        None => rebuild_standings(kv).await,
    }
}

async fn store_standings(kv: &KvStore, standings: &Standings) -> Result<()> {
    let document = serde_json::to_string(standings)?;
    kv.put(STANDINGS_KEY, document)?.execute().await?;
    Ok(())
}

async fn authenticate(mut req: Request, ctx: RouteContext<()>) -> Result<Response> {
    let Ok(body) = req.json::<AuthRequest>().await else {
        return message(400, "Invalid request body.");
    };
    let name = match leaderboard::validate_name(&body.name) {
        Ok(name) => name,
        Err(err) => return message(400, err.to_string()),
    };

    let kv = ctx.kv(KV_BINDING)?;
    match load_participant(&kv, &name).await? {
        Some(_) => message(200, format!("Welcome, {}!", name)),
        None => {
            console_log!("auth rejected for unknown participant {}", name);
            message(404, LeaderboardError::UnknownParticipant(name).to_string())
        }
    }
}

async fn fetch_leaderboard(_req: Request, ctx: RouteContext<()>) -> Result<Response> {
    let kv = ctx.kv(KV_BINDING)?;
    let standings = match kv.get(STANDINGS_KEY).json::<Standings>().await? {
        Some(standings) => standings,
        None => {
            let standings = rebuild_standings(&kv).await?;
            store_standings(&kv, &standings).await?;
            standings
        }
    };
    Response::from_json(&standings.top())
}

async fn submit_score(mut req: Request, ctx: RouteContext<()>) -> Result<Response> {
    let Ok(body) = req.json::<SubmitScoreRequest>().await else {
        return message(400, "Invalid name or score provided.");
    };
    let name = match leaderboard::validate_submission(&body) {
        Ok(name) => name,
        Err(err) => return message(400, err.to_string()),
    };

    let kv = ctx.kv(KV_BINDING)?;
    let mut participant = load_participant(&kv, &name)
        .await?
        .unwrap_or_else(|| Participant::new(name.clone()));
    participant.record_score(body.score, now_utc());
    store_participant(&kv, &participant).await?;

    let mut standings = load_standings(&kv).await?;
    standings.record(&participant);
    store_standings(&kv, &standings).await?;

    console_log!(
        "score {} submitted for {}, total {}",
        body.score,
        name,
        participant.total_score
    );
    message(201, "Score submitted successfully!")
}

#[event(fetch)]
async fn fetch(req: Request, env: Env, _ctx: Context) -> Result<Response> {
    if req.method() == Method::Options {
        return Response::empty()?.with_cors(&cors());
    }

    let response = Router::new()
        .post_async(AUTH_PATH, authenticate)
        .get_async(LEADERBOARD_PATH, fetch_leaderboard)
        .post_async(LEADERBOARD_PATH, submit_score)
        .run(req, env)
        .await;

    match response {
        Ok(response) => response.with_cors(&cors()),
        Err(err) => {
            console_error!("request failed: {}", err);
            message(500, "Internal server error.")?.with_cors(&cors())
        }
    }
}
