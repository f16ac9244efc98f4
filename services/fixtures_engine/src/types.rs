use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Team {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    /// Canonical slug as stored by ingestion; may be missing on freshly imported rows.
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub crest: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompetitionColors {
    pub primary: String,
    pub secondary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Competition {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub short_name: String,
    pub icon: String,
    pub colors: CompetitionColors,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Round {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Score {
    pub home: Option<i32>,
    pub away: Option<i32>,
}

/// A UK broadcaster attached to a fixture.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Provider {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub href: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Blackout {
    pub is_blackout: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Fixture {
    /// Zero when the datastore row carried no id.
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub competition_id: Option<i64>,
    pub home: Team,
    pub away: Team,
    pub kickoff_utc: DateTime<Utc>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub round: Option<Round>,
    #[serde(default)]
    pub score: Option<Score>,
    #[serde(default)]
    pub broadcaster: Option<String>,
    #[serde(default)]
    pub providers_uk: Vec<Provider>,
    #[serde(default)]
    pub blackout: Blackout,
}

impl Fixture {
    /// Both sides of the score, only when the match has been completed.
    pub fn final_score(&self) -> Option<(i32, i32)> {
        match self.score {
            Some(Score {
                home: Some(home),
                away: Some(away),
            }) => Some((home, away)),
            _ => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.final_score().is_some()
    }

    pub fn has_broadcaster(&self) -> bool {
        self.broadcaster.is_some()
    }
}
