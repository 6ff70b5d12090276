//! JSON bodies exchanged between the web client and the leaderboard worker.

use serde::{Deserialize, Serialize};

pub const AUTH_PATH: &str = "/api/auth";
pub const LEADERBOARD_PATH: &str = "/api/leaderboard";

/// Longest participant name that is stored, longer names are cut.
pub const MAX_NAME_LEN: usize = 15;
/// Entries returned by the leaderboard endpoint.
pub const LEADERBOARD_SIZE: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthRequest {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitScoreRequest {
    pub name: String,
    pub score: i32,
}

/// Body of every non-list response, success or failure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub name: String,
    pub total_score: i64,
}

/// Trims surrounding whitespace and cuts to [`MAX_NAME_LEN`] characters. `None` for a blank name.
pub fn normalize_name(name: &str) -> Option<String> {
    let name = name.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.chars().take(MAX_NAME_LEN).collect())
    }
}
