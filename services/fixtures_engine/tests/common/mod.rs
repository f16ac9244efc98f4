#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use fixtures_engine::types::{Blackout, Fixture, Score, Team};

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
}

pub fn team(id: i64, name: &str, slug: Option<&str>) -> Team {
    Team {
        id,
        name: name.to_string(),
        slug: slug.map(str::to_string),
        crest: None,
    }
}

pub fn arsenal() -> Team {
    team(1, "Arsenal", Some("arsenal"))
}

pub fn chelsea() -> Team {
    team(2, "Chelsea", Some("chelsea"))
}

pub fn spurs() -> Team {
    team(3, "Tottenham Hotspur", Some("tottenham-hotspur"))
}

pub fn fixture(
    id: i64,
    competition_id: Option<i64>,
    home: Team,
    away: Team,
    kickoff_utc: DateTime<Utc>,
    score: Option<(i32, i32)>,
) -> Fixture {
    Fixture {
        id,
        competition_id,
        home,
        away,
        kickoff_utc,
        venue: None,
        round: None,
        score: score.map(|(home, away)| Score {
            home: Some(home),
            away: Some(away),
        }),
        broadcaster: None,
        providers_uk: Vec::new(),
        blackout: Blackout::default(),
    }
}

/// A small season: two Arsenal v Chelsea results, one upcoming derby, a cup
/// tie and a fixture whose away slug never got ingested.
pub fn season() -> Vec<Fixture> {
    let days = chrono::Duration::days;
    let mut derby = fixture(4, Some(1), spurs(), arsenal(), now() + days(5), None);
    derby.broadcaster = Some("Sky Sports".to_string());
    vec![
        fixture(1, Some(1), arsenal(), chelsea(), now() - days(60), Some((2, 0))),
        fixture(2, Some(1), chelsea(), arsenal(), now() - days(20), Some((3, 1))),
        fixture(3, Some(6), chelsea(), spurs(), now() + days(2), None),
        derby,
        fixture(
            5,
            Some(2),
            arsenal(),
            team(9, "Bayern München", None),
            now() + days(10),
            None,
        ),
    ]
}
