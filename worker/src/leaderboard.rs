use nisbot_protocol::{LEADERBOARD_SIZE, LeaderboardEntry, SubmitScoreRequest, normalize_name};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use time::OffsetDateTime;

pub const PARTICIPANT_PREFIX: &str = "participant:";
/// Key of the aggregated [`Standings`] document.
pub const STANDINGS_KEY: &str = "leaderboard:standings";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LeaderboardError {
    #[error("Please enter your name.")]
    BlankName,
    #[error("Participant {0} is not registered.")]
    UnknownParticipant(String),
}

/// Stored record of one registered participant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub name: String,
    #[serde(default)]
    pub total_score: i64,
    #[serde(default)]
    pub submissions: u32,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub last_submission: Option<OffsetDateTime>,
}

impl Participant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            total_score: 0,
            submissions: 0,
            last_submission: None,
        }
    }

    pub fn record_score(&mut self, score: i32, at: OffsetDateTime) {
        self.total_score += i64::from(score);
        self.submissions += 1;
        self.last_submission = Some(at);
    }

    pub fn entry(&self) -> LeaderboardEntry {
        LeaderboardEntry {
            name: self.name.clone(),
            total_score: self.total_score,
        }
    }
}

pub fn participant_key(name: &str) -> String {
    format!("{}{}", PARTICIPANT_PREFIX, name)
}

pub fn validate_name(name: &str) -> Result<String, LeaderboardError> {
    normalize_name(name).ok_or(LeaderboardError::BlankName)
}

pub fn validate_submission(request: &SubmitScoreRequest) -> Result<String, LeaderboardError> {
    validate_name(&request.name)
}

/// Cursor of the next key listing page, `None` once the listing is complete.
pub fn next_page_cursor(list_complete: bool, cursor: Option<String>) -> Option<String> {
    cursor.filter(|cursor| !list_complete && !cursor.is_empty())
}

/// Running total of every participant, kept in one document so a leaderboard read is a single lookup.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standings {
    totals: BTreeMap<String, i64>,
}

impl Standings {
    pub fn from_participants<'a>(participants: impl IntoIterator<Item = &'a Participant>) -> Self {
        let mut standings = Self::default();
        for participant in participants {
            standings.record(participant);
        }
        standings
    }

    /// Replaces the stored total of `participant`.
    pub fn record(&mut self, participant: &Participant) {
        self.totals
            .insert(participant.name.clone(), participant.total_score);
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn top(&self) -> Vec<LeaderboardEntry> {
        rank(self.totals.iter().map(|(name, &total_score)| LeaderboardEntry {
            name: name.clone(),
            total_score,
        }))
    }
}

/// Highest totals first, ties broken by name, cut to [`LEADERBOARD_SIZE`].
pub fn rank(entries: impl IntoIterator<Item = LeaderboardEntry>) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<_> = entries.into_iter().collect();
    entries.sort_by(|a, b| {
        b.total_score
            .cmp(&a.total_score)
            .then_with(|| a.name.cmp(&b.name))
    });
    entries.truncate(LEADERBOARD_SIZE);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participant(name: &str, total_score: i64) -> Participant {
        Participant {
            total_score,
            ..Participant::new(name)
        }
    }

    #[test]
    fn rank_sorts_descending_and_keeps_top_ten() {
        let participants = (0..15).map(|i| participant(&format!("p{:02}", i), i * 10).entry());

        let ranked = rank(participants);

        assert_eq!(ranked.len(), LEADERBOARD_SIZE);
        assert_eq!(ranked[0].name, "p14");
        assert_eq!(ranked[0].total_score, 140);
        assert_eq!(ranked[9].name, "p05");
        assert!(ranked.windows(2).all(|w| w[0].total_score >= w[1].total_score));
    }

    #[test]
    fn ties_are_broken_by_name() {
        let ranked = rank([participant("bob", 5).entry(), participant("amy", 5).entry()]);
        assert_eq!(ranked[0].name, "amy");
    }

    #[test]
    fn recording_accumulates_total() {
        let mut record = Participant::new("ada");
        record.record_score(248, OffsetDateTime::UNIX_EPOCH);
        record.record_score(-20, OffsetDateTime::UNIX_EPOCH);

        assert_eq!(record.total_score, 228);
        assert_eq!(record.submissions, 2);
        assert_eq!(record.last_submission, Some(OffsetDateTime::UNIX_EPOCH));
    }

    #[test]
    fn record_round_trips_with_timestamp() {
        let mut record = Participant::new("ada");
        record.record_score(10, OffsetDateTime::UNIX_EPOCH);
        let json = serde_json::to_string(&record).unwrap();

        assert!(json.contains("\"lastSubmission\":\"1970-01-01T00:00:00Z\""));
        assert_eq!(serde_json::from_str::<Participant>(&json).unwrap(), record);
        assert_eq!(
            serde_json::from_str::<Participant>(r#"{"name":"new"}"#).unwrap(),
            Participant::new("new")
        );
    }

    #[test]
    fn blank_submission_is_rejected() {
        let request = SubmitScoreRequest {
            name: "  ".into(),
            score: 10,
        };
        assert_eq!(validate_submission(&request), Err(LeaderboardError::BlankName));
    }

    #[test]
    fn standings_follow_totals_that_drop_out_of_the_top() {
        let mut players: Vec<_> = (0..12)
            .map(|i| participant(&format!("p{:02}", i), 100 + i))
            .collect();
        let mut standings = Standings::from_participants(&players);
        assert_eq!(standings.len(), 12);
        assert_eq!(standings.top()[0].name, "p11");

        players[11].record_score(-500, OffsetDateTime::UNIX_EPOCH);
        standings.record(&players[11]);

        let top = standings.top();
        assert_eq!(top.len(), LEADERBOARD_SIZE);
        assert_eq!(top[0].name, "p10");
        assert_eq!(top[9].name, "p01");
        assert!(top.iter().all(|entry| entry.name != "p11"));
        assert_eq!(standings.len(), 12);
    }

    #[test]
    fn listing_continues_until_complete() {
        assert_eq!(next_page_cursor(false, Some("abc".into())), Some("abc".into()));
        assert_eq!(next_page_cursor(true, Some("abc".into())), None);
        assert_eq!(next_page_cursor(false, None), None);
        assert_eq!(next_page_cursor(false, Some(String::new())), None);
    }

    #[test]
    fn standings_document_round_trips() {
        let mut standings = Standings::default();
        assert!(standings.is_empty());
        standings.record(&participant("ada", 248));

        let json = serde_json::to_string(&standings).unwrap();
        assert_eq!(json, r#"{"totals":{"ada":248}}"#);
        assert_eq!(serde_json::from_str::<Standings>(&json).unwrap(), standings);
    }
}
