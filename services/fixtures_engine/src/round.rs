use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::types::Fixture;

/// League round number, or `None` for named cup rounds like "Round of 16".
pub fn round_number(fixture: &Fixture) -> Option<i32> {
    fixture
        .round
        .as_ref()
        .and_then(|round| round.name.trim().parse::<i32>().ok())
}

/// "Matchweek 12" for numbered league rounds, otherwise the raw round name.
///
/// Fixtures without round metadata get an empty label.
pub fn round_label(fixture: &Fixture) -> String {
    match (round_number(fixture), fixture.round.as_ref()) {
        (Some(number), _) => format!("Matchweek {}", number),
        (None, Some(round)) => round.name.clone(),
        (None, None) => String::new(),
    }
}

/// Fixtures keyed by numeric round; fixtures without one are left out.
pub fn group_by_round(fixtures: &[Fixture]) -> BTreeMap<i32, Vec<&Fixture>> {
    let mut rounds: BTreeMap<i32, Vec<&Fixture>> = BTreeMap::new();
    for fixture in fixtures {
        if let Some(number) = round_number(fixture) {
            rounds.entry(number).or_default().push(fixture);
        }
    }
    rounds
}

/// The earliest round that still has a fixture to kick off, falling back to
/// the latest round once the whole set is historical.
pub fn current_round(fixtures: &[Fixture], now: DateTime<Utc>) -> Option<i32> {
    let rounds = group_by_round(fixtures);

    rounds
        .iter()
        .find(|(_, round_fixtures)| round_fixtures.iter().any(|f| f.kickoff_utc > now))
        .map(|(number, _)| *number)
        .or_else(|| rounds.keys().next_back().copied())
}
