use serde::Serialize;
use std::collections::HashMap;

use crate::competitions::{sort_by_priority, CompetitionOrder, CompetitionRegistry};
use crate::slug::canonicalize;
use crate::status::Clock;
use crate::types::{Competition, Fixture};

/// Results tabs only ever show this many matches.
pub const MAX_RECENT_RESULTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupStats {
    pub total: usize,
    pub upcoming: usize,
    /// Fixtures carrying a final score, whatever the clock says about them.
    pub completed: usize,
    pub with_broadcaster: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionFixtureGroup {
    pub competition: Competition,
    pub fixtures: Vec<Fixture>,
    pub upcoming: Vec<Fixture>,
    pub results: Vec<Fixture>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_match: Option<Fixture>,
    pub stats: GroupStats,
}

/// Split fixtures into pending (kickoff ascending) and the most recent
/// finished ones (kickoff descending, capped).
fn split_pending_and_results<'a>(
    fixtures: impl IntoIterator<Item = &'a Fixture>,
    clock: &Clock,
) -> (Vec<Fixture>, Vec<Fixture>) {
    let mut upcoming = Vec::new();
    let mut results = Vec::new();
    for fixture in fixtures {
        if clock.classify_fixture(fixture).is_pending() {
            upcoming.push(fixture.clone());
        } else {
            results.push(fixture.clone());
        }
    }

    upcoming.sort_by_key(|f| f.kickoff_utc);
    results.sort_by(|a, b| b.kickoff_utc.cmp(&a.kickoff_utc));
    results.truncate(MAX_RECENT_RESULTS);
    (upcoming, results)
}

/// Partition fixtures by competition and order the groups by `order`.
///
/// Fixtures without a competition id are left out. Ids missing from the
/// registry get a placeholder competition instead of being dropped.
pub fn group_by_competition<O>(
    fixtures: &[Fixture],
    registry: &CompetitionRegistry,
    order: &O,
    clock: &Clock,
) -> Vec<CompetitionFixtureGroup>
where
    O: CompetitionOrder + ?Sized,
{
    let mut discovery: Vec<i64> = Vec::new();
    let mut buckets: HashMap<i64, Vec<&Fixture>> = HashMap::new();
    for fixture in fixtures {
        let Some(competition_id) = fixture.competition_id else {
            continue;
        };
        buckets
            .entry(competition_id)
            .or_insert_with(|| {
                discovery.push(competition_id);
                Vec::new()
            })
            .push(fixture);
    }

    let mut groups: Vec<CompetitionFixtureGroup> = discovery
        .into_iter()
        .filter_map(|id| buckets.remove(&id).map(|bucket| (id, bucket)))
        .map(|(id, bucket)| {
            let (upcoming, results) = split_pending_and_results(bucket.iter().copied(), clock);
            let stats = GroupStats {
                total: bucket.len(),
                upcoming: upcoming.len(),
                completed: bucket.iter().filter(|f| f.is_completed()).count(),
                with_broadcaster: bucket.iter().filter(|f| f.has_broadcaster()).count(),
            };
            CompetitionFixtureGroup {
                competition: registry.resolve(id),
                fixtures: bucket.into_iter().cloned().collect(),
                next_match: upcoming.first().cloned(),
                upcoming,
                results,
                stats,
            }
        })
        .collect();

    sort_by_priority(&mut groups, order, |group| &group.competition);
    groups
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastCoverage {
    pub total: usize,
    pub confirmed: usize,
    pub percentage: u32,
}

/// Share of not-yet-finished fixtures with a confirmed UK broadcaster.
pub fn broadcast_coverage(fixtures: &[Fixture], clock: &Clock) -> BroadcastCoverage {
    let pending: Vec<&Fixture> = fixtures
        .iter()
        .filter(|f| clock.classify_fixture(f).is_pending())
        .collect();
    let total = pending.len();
    let confirmed = pending.iter().filter(|f| f.has_broadcaster()).count();
    let percentage = if total == 0 {
        0
    } else {
        (100.0 * confirmed as f64 / total as f64).round() as u32
    };
    BroadcastCoverage {
        total,
        confirmed,
        percentage,
    }
}

fn involves_team(fixture: &Fixture, canonical_slug: &str) -> bool {
    [&fixture.home, &fixture.away].iter().any(|team| {
        team.slug
            .as_deref()
            .is_some_and(|slug| canonicalize(slug) == canonical_slug)
    })
}

/// Fixtures involving a team, matched on canonical slug, kickoff ascending.
pub fn fixtures_for_team<'a>(fixtures: &'a [Fixture], team_slug: &str) -> Vec<&'a Fixture> {
    let canonical = canonicalize(team_slug);
    if canonical.is_empty() {
        return Vec::new();
    }
    let mut matched: Vec<&Fixture> = fixtures
        .iter()
        .filter(|f| involves_team(f, &canonical))
        .collect();
    matched.sort_by_key(|f| f.kickoff_utc);
    matched
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSchedule {
    pub team_slug: String,
    pub upcoming: Vec<Fixture>,
    pub results: Vec<Fixture>,
    pub coverage: BroadcastCoverage,
}

pub fn team_schedule(fixtures: &[Fixture], team_slug: &str, clock: &Clock) -> TeamSchedule {
    let team_fixtures = fixtures_for_team(fixtures, team_slug);
    let (upcoming, results) = split_pending_and_results(team_fixtures.iter().copied(), clock);
    let owned: Vec<Fixture> = team_fixtures.into_iter().cloned().collect();
    TeamSchedule {
        team_slug: canonicalize(team_slug),
        upcoming,
        results,
        coverage: broadcast_coverage(&owned, clock),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::competitions::PriorityOrder;
    use crate::status::ReferenceZone;
    use crate::types::test_support::{at, fixture, team};
    use crate::types::Score;
    use chrono::{DateTime, Duration, Offset, Utc};
    use pretty_assertions::assert_eq;

    fn clock(now: DateTime<Utc>) -> Clock {
        Clock::new(now, ReferenceZone::Fixed(Utc.fix()))
    }

    fn comp_fixture(id: i64, competition_id: Option<i64>, kickoff: DateTime<Utc>) -> Fixture {
        let mut f = fixture(
            id,
            team(1, "Arsenal", Some("arsenal")),
            team(2, "Chelsea", Some("chelsea")),
            kickoff,
        );
        f.competition_id = competition_id;
        f
    }

    #[test]
    fn test_empty_input_yields_no_groups() {
        let groups = group_by_competition(
            &[],
            &CompetitionRegistry::uk_default(),
            &PriorityOrder::default(),
            &clock(at(2025, 1, 1, 12, 0)),
        );
        assert!(groups.is_empty());
    }

    #[test]
    fn test_groups_split_sort_and_stats() {
        let now = at(2025, 3, 1, 12, 0);
        let mut fixtures = Vec::new();
        // Seven finished league fixtures, one per day before now.
        for day in 1..=7 {
            let mut f = comp_fixture(day, Some(1), now - Duration::days(day));
            f.score = Some(Score {
                home: Some(1),
                away: Some(0),
            });
            fixtures.push(f);
        }
        let mut later = comp_fixture(20, Some(1), now + Duration::days(7));
        later.broadcaster = Some("Sky Sports".to_string());
        let sooner = comp_fixture(21, Some(1), now + Duration::days(2));
        let live = comp_fixture(22, Some(1), now - Duration::minutes(30));
        fixtures.extend([later, sooner, live]);

        let groups = group_by_competition(
            &fixtures,
            &CompetitionRegistry::uk_default(),
            &PriorityOrder::default(),
            &clock(now),
        );
        assert_eq!(groups.len(), 1);
        let group = &groups[0];
        assert_eq!(group.competition.slug, "premier-league");
        assert_eq!(group.fixtures.len(), 10);
        assert_eq!(group.upcoming.iter().map(|f| f.id).collect::<Vec<_>>(), vec![22, 21, 20]);
        assert_eq!(group.results.iter().map(|f| f.id).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
        assert_eq!(group.next_match.as_ref().map(|f| f.id), Some(22));
        assert_eq!(
            group.stats,
            GroupStats {
                total: 10,
                upcoming: 3,
                completed: 7,
                with_broadcaster: 1,
            }
        );
    }

    #[test]
    fn test_completed_counts_scored_fixtures() {
        let now = at(2025, 3, 1, 12, 0);
        let mut scored_live = comp_fixture(1, Some(1), now - Duration::minutes(100));
        scored_live.score = Some(Score {
            home: Some(2),
            away: Some(1),
        });
        let unscored_finished = comp_fixture(2, Some(1), now - Duration::days(1));

        let groups = group_by_competition(
            &[scored_live, unscored_finished],
            &CompetitionRegistry::uk_default(),
            &PriorityOrder::default(),
            &clock(now),
        );
        let group = &groups[0];
        assert_eq!(group.stats.completed, 1);
        assert_eq!(group.stats.upcoming, 1);
        assert_eq!(group.results.iter().map(|f| f.id).collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_group_order_and_dropped_fixtures() {
        let now = at(2025, 3, 1, 12, 0);
        let kickoff = now + Duration::days(1);
        let fixtures = vec![
            comp_fixture(1, Some(6), kickoff),
            comp_fixture(2, None, kickoff),
            comp_fixture(3, Some(99), kickoff),
            comp_fixture(4, Some(2), kickoff),
            comp_fixture(5, Some(1), kickoff),
            comp_fixture(6, Some(6), kickoff),
        ];
        let groups = group_by_competition(
            &fixtures,
            &CompetitionRegistry::uk_default(),
            &PriorityOrder::default(),
            &clock(now),
        );
        let ids: Vec<i64> = groups.iter().map(|g| g.competition.id).collect();
        assert_eq!(ids, vec![1, 2, 6, 99]);
        assert_eq!(groups[2].stats.total, 2);
        assert_eq!(groups[3].competition.slug, "competition-99");
        assert!(groups.iter().all(|g| g.results.is_empty()));
    }

    #[test]
    fn test_broadcast_coverage() {
        let now = at(2025, 3, 1, 12, 0);
        let mut a = comp_fixture(1, Some(1), now + Duration::days(1));
        a.broadcaster = Some("TNT Sports".to_string());
        let b = comp_fixture(2, Some(1), now + Duration::days(2));
        let c = comp_fixture(3, Some(1), now + Duration::days(3));
        let mut old = comp_fixture(4, Some(1), now - Duration::days(3));
        old.broadcaster = Some("Sky Sports".to_string());

        assert_eq!(
            broadcast_coverage(&[a, b, c, old.clone()], &clock(now)),
            BroadcastCoverage {
                total: 3,
                confirmed: 1,
                percentage: 33,
            }
        );
        assert_eq!(broadcast_coverage(&[], &clock(now)), BroadcastCoverage::default());
        assert_eq!(broadcast_coverage(&[old], &clock(now)).percentage, 0);
    }

    #[test]
    fn test_team_schedule_matches_canonical_slug() {
        let now = at(2025, 3, 1, 12, 0);
        let mut spurs_home = fixture(
            1,
            team(3, "Tottenham Hotspur", Some("tottenham-hotspur")),
            team(1, "Arsenal", Some("arsenal")),
            now + Duration::days(3),
        );
        spurs_home.broadcaster = Some("Sky Sports".to_string());
        let spurs_away = fixture(
            2,
            team(4, "Liverpool", Some("liverpool")),
            team(3, "Tottenham Hotspur", Some("spurs")),
            now - Duration::days(3),
        );
        let other = fixture(
            3,
            team(4, "Liverpool", Some("liverpool")),
            team(1, "Arsenal", Some("arsenal")),
            now + Duration::days(1),
        );
        let fixtures = vec![spurs_home, spurs_away, other];

        assert_eq!(
            fixtures_for_team(&fixtures, "Spurs").iter().map(|f| f.id).collect::<Vec<_>>(),
            vec![2, 1]
        );
        let schedule = team_schedule(&fixtures, "spurs", &clock(now));
        assert_eq!(schedule.team_slug, "tottenham-hotspur");
        assert_eq!(schedule.upcoming.len(), 1);
        assert_eq!(schedule.results.len(), 1);
        assert_eq!(schedule.coverage.percentage, 100);
        assert!(fixtures_for_team(&fixtures, "  ").is_empty());
    }
}
