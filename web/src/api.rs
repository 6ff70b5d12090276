use gloo::net::http::{Request, Response};
use nisbot_protocol::{
    AUTH_PATH, AuthRequest, LEADERBOARD_PATH, LeaderboardEntry, MessageResponse,
    SubmitScoreRequest,
};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub(crate) enum NetworkError {
    #[error("Could not connect to the server.")]
    Unreachable(String),
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("Unexpected response from the server.")]
    InvalidBody(String),
}

impl From<gloo::net::Error> for NetworkError {
    fn from(err: gloo::net::Error) -> Self {
        match err {
            gloo::net::Error::SerdeError(err) => Self::InvalidBody(err.to_string()),
            err => Self::Unreachable(err.to_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum AuthOutcome {
    Accepted(String),
    NotFound(String),
}

/// Client for the leaderboard service. Calls are never retried.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub(crate) fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) async fn authenticate(&self, name: &str) -> Result<AuthOutcome, NetworkError> {
        let response = Request::post(&self.url(AUTH_PATH))
            .json(&AuthRequest {
                name: name.to_string(),
            })?
            .send()
            .await?;

        match response.status() {
            404 => Ok(AuthOutcome::NotFound(read_message(response).await)),
            _ if response.ok() => Ok(AuthOutcome::Accepted(read_message(response).await)),
            status => Err(NetworkError::Rejected {
                status,
                message: read_message(response).await,
            }),
        }
    }

    pub(crate) async fn submit_score(&self, name: &str, score: i32) -> Result<String, NetworkError> {
        let response = Request::post(&self.url(LEADERBOARD_PATH))
            .json(&SubmitScoreRequest {
                name: name.to_string(),
                score,
            })?
            .send()
            .await?;

        if response.ok() {
            Ok(read_message(response).await)
        } else {
            Err(NetworkError::Rejected {
                status: response.status(),
                message: read_message(response).await,
            })
        }
    }

    pub(crate) async fn fetch_leaderboard(&self) -> Result<Vec<LeaderboardEntry>, NetworkError> {
        let response = Request::get(&self.url(LEADERBOARD_PATH)).send().await?;
        if !response.ok() {
            return Err(NetworkError::Rejected {
                status: response.status(),
                message: format!("HTTP error! Status: {}", response.status()),
            });
        }
        Ok(response.json().await?)
    }
}

async fn read_message(response: Response) -> String {
    match response.json::<MessageResponse>().await {
        Ok(body) => body.message,
        Err(err) => {
            log::debug!("response without message body: {}", err);
            format!("Request failed with status {}", response.status())
        }
    }
}
