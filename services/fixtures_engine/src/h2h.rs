use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::types::Fixture;

pub const RECENT_FORM_LEN: usize = 5;

/// A single result seen from the first team's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormResult {
    W,
    D,
    L,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct H2hStats {
    /// Every meeting passed in, played or not.
    pub total_matches: usize,
    pub completed_matches: usize,
    pub team1_wins: usize,
    pub team2_wins: usize,
    pub draws: usize,
    pub team1_goals: i64,
    pub team2_goals: i64,
    pub team1_home_wins: usize,
    pub team1_away_wins: usize,
    pub team2_home_wins: usize,
    pub team2_away_wins: usize,
    pub biggest_win_margin: i64,
    pub most_goals_in_game: i64,
    pub average_goals_per_game: f64,
    pub recent_form: Vec<FormResult>,
}

/// Which side team1 played on, or `None` to leave the fixture out entirely.
type SideOf<'a> = dyn Fn(&Fixture) -> Option<bool> + 'a;

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn tally(fixtures: &[Fixture], team1_is_home: &SideOf<'_>) -> H2hStats {
    let mut stats = H2hStats::default();
    let mut form: VecDeque<FormResult> = VecDeque::new();
    let mut goals_total: i64 = 0;

    for fixture in fixtures {
        let Some(team1_home) = team1_is_home(fixture) else {
            continue;
        };
        stats.total_matches += 1;

        let Some((home, away)) = fixture.final_score() else {
            continue;
        };
        let (home, away) = (home as i64, away as i64);
        stats.completed_matches += 1;

        let (team1_score, team2_score) = if team1_home { (home, away) } else { (away, home) };
        stats.team1_goals += team1_score;
        stats.team2_goals += team2_score;

        let result = match team1_score.cmp(&team2_score) {
            std::cmp::Ordering::Greater => {
                stats.team1_wins += 1;
                if team1_home {
                    stats.team1_home_wins += 1;
                } else {
                    stats.team1_away_wins += 1;
                }
                FormResult::W
            }
            std::cmp::Ordering::Less => {
                stats.team2_wins += 1;
                if team1_home {
                    stats.team2_away_wins += 1;
                } else {
                    stats.team2_home_wins += 1;
                }
                FormResult::L
            }
            std::cmp::Ordering::Equal => {
                stats.draws += 1;
                FormResult::D
            }
        };
        form.push_front(result);

        stats.biggest_win_margin = stats.biggest_win_margin.max((home - away).abs());
        stats.most_goals_in_game = stats.most_goals_in_game.max(home + away);
        goals_total += home + away;
    }

    if stats.completed_matches > 0 {
        stats.average_goals_per_game = round1(goals_total as f64 / stats.completed_matches as f64);
    }
    stats.recent_form = form.into_iter().take(RECENT_FORM_LEN).collect();
    stats
}

/// Head-to-head record between two teams identified by display name.
///
/// Team1 is taken to be the home side whenever `fixture.home.name` equals
/// `team1_name`, and the away side otherwise, without checking that the away
/// name actually matches. A fixture between differently-spelled teams is
/// therefore credited as if team1 played away. Use
/// [`compute_h2h_stats_by_id`] when stable team ids are available.
///
/// Each completed result is pushed to the front of `recent_form` as the input
/// is walked, and the first five are kept.
pub fn compute_h2h_stats(fixtures: &[Fixture], team1_name: &str, _team2_name: &str) -> H2hStats {
    tally(fixtures, &|fixture| Some(fixture.home.name == team1_name))
}

/// Head-to-head record matched on team ids. Fixtures that are not between
/// exactly these two teams are skipped.
pub fn compute_h2h_stats_by_id(fixtures: &[Fixture], team1_id: i64, team2_id: i64) -> H2hStats {
    tally(fixtures, &|fixture| {
        match (fixture.home.id, fixture.away.id) {
            (home, away) if home == team1_id && away == team2_id => Some(true),
            (home, away) if home == team2_id && away == team1_id => Some(false),
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::test_support::{at, fixture, team};
    use crate::types::{Score, Team};
    use pretty_assertions::assert_eq;

    fn arsenal() -> Team {
        team(1, "Arsenal", Some("arsenal"))
    }

    fn chelsea() -> Team {
        team(2, "Chelsea", Some("chelsea"))
    }

    fn played(id: i64, home: Team, away: Team, score: Option<(i32, i32)>) -> Fixture {
        let mut f = fixture(id, home, away, at(2024, 1, id as u32, 15, 0));
        f.score = score.map(|(h, a)| Score {
            home: Some(h),
            away: Some(a),
        });
        f
    }

    #[test]
    fn test_win_at_home_and_loss_away() {
        let fixtures = vec![
            played(1, arsenal(), chelsea(), Some((2, 0))),
            played(2, chelsea(), arsenal(), Some((3, 1))),
        ];
        let stats = compute_h2h_stats(&fixtures, "Arsenal", "Chelsea");
        assert_eq!(stats.team1_wins, 1);
        assert_eq!(stats.team2_wins, 1);
        assert_eq!(stats.draws, 0);
        assert_eq!(stats.team1_goals, 3);
        assert_eq!(stats.team2_goals, 3);
        assert_eq!(stats.biggest_win_margin, 2);
        assert_eq!(stats.most_goals_in_game, 4);
        assert_eq!(stats.team1_home_wins, 1);
        assert_eq!(stats.team2_home_wins, 1);
        assert_eq!(stats.average_goals_per_game, 3.0);
        assert_eq!(stats.recent_form, vec![FormResult::L, FormResult::W]);
    }

    #[test]
    fn test_incomplete_fixtures_only_count_towards_total() {
        let fixtures = vec![
            played(1, arsenal(), chelsea(), Some((1, 1))),
            played(2, chelsea(), arsenal(), None),
        ];
        let stats = compute_h2h_stats(&fixtures, "Arsenal", "Chelsea");
        assert_eq!(stats.total_matches, 2);
        assert_eq!(stats.completed_matches, 1);
        assert_eq!(stats.draws, 1);
        assert_eq!(stats.recent_form, vec![FormResult::D]);
    }

    #[test]
    fn test_no_completed_fixtures() {
        let fixtures = vec![played(1, arsenal(), chelsea(), None)];
        let stats = compute_h2h_stats(&fixtures, "Arsenal", "Chelsea");
        assert_eq!(
            stats,
            H2hStats {
                total_matches: 1,
                ..H2hStats::default()
            }
        );
        assert_eq!(compute_h2h_stats(&[], "Arsenal", "Chelsea"), H2hStats::default());
    }

    #[test]
    fn test_recent_form_prepends_and_truncates() {
        // Input order W, W, D, L, W, W, L -> prepended -> L W W L D W W -> first five.
        let results = [(1, 0), (2, 0), (0, 0), (0, 1), (3, 2), (1, 0), (0, 2)];
        let fixtures: Vec<Fixture> = results
            .iter()
            .enumerate()
            .map(|(i, score)| played(i as i64 + 1, arsenal(), chelsea(), Some(*score)))
            .collect();
        let stats = compute_h2h_stats(&fixtures, "Arsenal", "Chelsea");
        use FormResult::*;
        assert_eq!(stats.recent_form, vec![L, W, W, L, D]);
        assert_eq!(stats.average_goals_per_game, 1.7);
    }

    #[test]
    fn test_name_mismatch_is_credited_as_away() {
        // "Arsenal FC" never equals "Arsenal", so team1 is assumed to be away.
        let fixtures = vec![played(1, team(1, "Arsenal FC", None), chelsea(), Some((2, 0)))];
        let stats = compute_h2h_stats(&fixtures, "Arsenal", "Chelsea");
        assert_eq!(stats.team1_wins, 0);
        assert_eq!(stats.team2_wins, 1);
        assert_eq!(stats.team2_home_wins, 1);
    }

    #[test]
    fn test_by_id_ignores_names_and_skips_other_teams() {
        let fixtures = vec![
            played(1, team(1, "Arsenal FC", None), chelsea(), Some((2, 0))),
            played(2, chelsea(), team(3, "Liverpool", None), Some((0, 5))),
        ];
        let stats = compute_h2h_stats_by_id(&fixtures, 1, 2);
        assert_eq!(stats.total_matches, 1);
        assert_eq!(stats.team1_wins, 1);
        assert_eq!(stats.team1_home_wins, 1);
        assert_eq!(stats.most_goals_in_game, 2);
    }

    #[test]
    fn test_stats_are_repeatable() {
        let fixtures = vec![
            played(1, arsenal(), chelsea(), Some((4, 2))),
            played(2, chelsea(), arsenal(), Some((0, 0))),
        ];
        let first = serde_json::to_string(&compute_h2h_stats(&fixtures, "Arsenal", "Chelsea")).unwrap();
        let second = serde_json::to_string(&compute_h2h_stats(&fixtures, "Arsenal", "Chelsea")).unwrap();
        assert_eq!(first, second);
    }
}
