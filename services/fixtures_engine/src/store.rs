use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use tracing::{debug, info};

use crate::config::DatabaseConfig;
use crate::error::AppError;
use crate::slug::canonicalize;
use crate::types::{Blackout, Fixture, Provider, Round, Score, Team};

/// Read access to fixture rows. Implementations return whole fixtures with
/// both teams embedded; ordering is kickoff ascending unless stated.
#[async_trait]
pub trait FixtureStore: Send + Sync {
    async fn all_fixtures(&self) -> Result<Vec<Fixture>, AppError>;

    async fn fixtures_by_competition(&self, competition_id: i64) -> Result<Vec<Fixture>, AppError>;

    async fn fixtures_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Fixture>, AppError>;

    async fn fixtures_for_team(&self, team_slug: &str) -> Result<Vec<Fixture>, AppError>;

    /// Every meeting of the two teams, most recent first.
    async fn fixtures_between_teams(&self, slug_a: &str, slug_b: &str) -> Result<Vec<Fixture>, AppError>;
}

/// Flat row from the `fixture_rows` view.
#[derive(Debug, sqlx::FromRow)]
pub struct FixtureRow {
    pub id: i64,
    pub competition_id: Option<i64>,
    pub home_id: i64,
    pub home_name: String,
    pub home_slug: Option<String>,
    pub home_crest: Option<String>,
    pub away_id: i64,
    pub away_name: String,
    pub away_slug: Option<String>,
    pub away_crest: Option<String>,
    pub kickoff_utc: DateTime<Utc>,
    pub venue: Option<String>,
    pub round_id: Option<i64>,
    pub round_name: Option<String>,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub broadcaster: Option<String>,
    pub providers_uk: Option<Json<Vec<Provider>>>,
    pub is_blackout: Option<bool>,
    pub blackout_reason: Option<String>,
}

impl From<FixtureRow> for Fixture {
    fn from(row: FixtureRow) -> Self {
        let score = match (row.home_score, row.away_score) {
            (None, None) => None,
            (home, away) => Some(Score { home, away }),
        };
        Fixture {
            id: row.id,
            competition_id: row.competition_id,
            home: Team {
                id: row.home_id,
                name: row.home_name,
                slug: row.home_slug,
                crest: row.home_crest,
            },
            away: Team {
                id: row.away_id,
                name: row.away_name,
                slug: row.away_slug,
                crest: row.away_crest,
            },
            kickoff_utc: row.kickoff_utc,
            venue: row.venue,
            round: row.round_name.map(|name| Round {
                id: row.round_id,
                name,
            }),
            score,
            broadcaster: row.broadcaster,
            providers_uk: row.providers_uk.map(|json| json.0).unwrap_or_default(),
            blackout: Blackout {
                is_blackout: row.is_blackout.unwrap_or(false),
                reason: row.blackout_reason,
            },
        }
    }
}

const SELECT_FIXTURES: &str = r#"
    SELECT
        id,
        competition_id,
        home_id,
        home_name,
        home_slug,
        home_crest,
        away_id,
        away_name,
        away_slug,
        away_crest,
        kickoff_utc,
        venue,
        round_id,
        round_name,
        home_score,
        away_score,
        broadcaster,
        providers_uk,
        is_blackout,
        blackout_reason
    FROM fixture_rows
"#;

/// Postgres-backed store over the `fixture_rows` view.
#[derive(Debug, Clone)]
pub struct PgFixtureStore {
    pool: PgPool,
}

impl PgFixtureStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await?;
        info!("Connected to fixtures database");
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, sql: String, binds: Vec<QueryArg>) -> Result<Vec<Fixture>, AppError> {
        debug!("Running fixture query: {}", sql.trim());
        let mut query = sqlx::query_as::<_, FixtureRow>(&sql);
        for bind in binds {
            query = match bind {
                QueryArg::Int(value) => query.bind(value),
                QueryArg::Text(value) => query.bind(value),
                QueryArg::Timestamp(value) => query.bind(value),
            };
        }
        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Fixture::from).collect())
    }
}

enum QueryArg {
    Int(i64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

#[async_trait]
impl FixtureStore for PgFixtureStore {
    async fn all_fixtures(&self) -> Result<Vec<Fixture>, AppError> {
        self.fetch(format!("{} ORDER BY kickoff_utc", SELECT_FIXTURES), Vec::new())
            .await
    }

    async fn fixtures_by_competition(&self, competition_id: i64) -> Result<Vec<Fixture>, AppError> {
        self.fetch(
            format!("{} WHERE competition_id = $1 ORDER BY kickoff_utc", SELECT_FIXTURES),
            vec![QueryArg::Int(competition_id)],
        )
        .await
    }

    async fn fixtures_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Fixture>, AppError> {
        self.fetch(
            format!(
                "{} WHERE kickoff_utc >= $1 AND kickoff_utc < $2 ORDER BY kickoff_utc",
                SELECT_FIXTURES
            ),
            vec![QueryArg::Timestamp(from), QueryArg::Timestamp(to)],
        )
        .await
    }

    async fn fixtures_for_team(&self, team_slug: &str) -> Result<Vec<Fixture>, AppError> {
        self.fetch(
            format!(
                "{} WHERE home_slug = $1 OR away_slug = $1 ORDER BY kickoff_utc",
                SELECT_FIXTURES
            ),
            vec![QueryArg::Text(canonicalize(team_slug))],
        )
        .await
    }

    async fn fixtures_between_teams(&self, slug_a: &str, slug_b: &str) -> Result<Vec<Fixture>, AppError> {
        self.fetch(
            format!(
                "{} WHERE (home_slug = $1 AND away_slug = $2) OR (home_slug = $2 AND away_slug = $1) \
                 ORDER BY kickoff_utc DESC",
                SELECT_FIXTURES
            ),
            vec![
                QueryArg::Text(canonicalize(slug_a)),
                QueryArg::Text(canonicalize(slug_b)),
            ],
        )
        .await
    }
}

/// In-process store over a fixed fixture list, for tests and offline runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryFixtureStore {
    fixtures: Vec<Fixture>,
}

impl MemoryFixtureStore {
    pub fn new(fixtures: Vec<Fixture>) -> Self {
        Self { fixtures }
    }

    fn sorted(&self, mut fixtures: Vec<Fixture>) -> Vec<Fixture> {
        fixtures.sort_by_key(|f| f.kickoff_utc);
        fixtures
    }
}

fn canonical_team_slug(team: &Team) -> Option<String> {
    team.slug.as_deref().map(canonicalize)
}

#[async_trait]
impl FixtureStore for MemoryFixtureStore {
    async fn all_fixtures(&self) -> Result<Vec<Fixture>, AppError> {
        Ok(self.sorted(self.fixtures.clone()))
    }

    async fn fixtures_by_competition(&self, competition_id: i64) -> Result<Vec<Fixture>, AppError> {
        Ok(self.sorted(
            self.fixtures
                .iter()
                .filter(|f| f.competition_id == Some(competition_id))
                .cloned()
                .collect(),
        ))
    }

    async fn fixtures_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Fixture>, AppError> {
        Ok(self.sorted(
            self.fixtures
                .iter()
                .filter(|f| f.kickoff_utc >= from && f.kickoff_utc < to)
                .cloned()
                .collect(),
        ))
    }

    async fn fixtures_for_team(&self, team_slug: &str) -> Result<Vec<Fixture>, AppError> {
        let slug = Some(canonicalize(team_slug));
        Ok(self.sorted(
            self.fixtures
                .iter()
                .filter(|f| canonical_team_slug(&f.home) == slug || canonical_team_slug(&f.away) == slug)
                .cloned()
                .collect(),
        ))
    }

    async fn fixtures_between_teams(&self, slug_a: &str, slug_b: &str) -> Result<Vec<Fixture>, AppError> {
        let (a, b) = (Some(canonicalize(slug_a)), Some(canonicalize(slug_b)));
        let mut meetings: Vec<Fixture> = self
            .fixtures
            .iter()
            .filter(|f| {
                let (home, away) = (canonical_team_slug(&f.home), canonical_team_slug(&f.away));
                (home == a && away == b) || (home == b && away == a)
            })
            .cloned()
            .collect();
        meetings.sort_by(|x, y| y.kickoff_utc.cmp(&x.kickoff_utc));
        Ok(meetings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::test_support::{at, fixture, team};

    fn store() -> MemoryFixtureStore {
        let mut late = fixture(
            1,
            team(1, "Arsenal", Some("arsenal")),
            team(3, "Tottenham Hotspur", Some("spurs")),
            at(2025, 3, 1, 15, 0),
        );
        late.competition_id = Some(1);
        let mut early = fixture(
            2,
            team(3, "Tottenham Hotspur", Some("tottenham-hotspur")),
            team(1, "Arsenal", Some("arsenal")),
            at(2024, 9, 15, 16, 30),
        );
        early.competition_id = Some(7);
        let other = fixture(
            3,
            team(4, "Liverpool", Some("liverpool")),
            team(1, "Arsenal", Some("arsenal")),
            at(2025, 1, 10, 20, 0),
        );
        MemoryFixtureStore::new(vec![late, early, other])
    }

    #[tokio::test]
    async fn test_memory_store_queries() {
        let store = store();
        let all = store.all_fixtures().await.unwrap();
        assert_eq!(all.iter().map(|f| f.id).collect::<Vec<_>>(), vec![2, 3, 1]);

        let cup = store.fixtures_by_competition(7).await.unwrap();
        assert_eq!(cup.len(), 1);

        let window = store
            .fixtures_between(at(2025, 1, 1, 0, 0), at(2025, 2, 1, 0, 0))
            .await
            .unwrap();
        assert_eq!(window.iter().map(|f| f.id).collect::<Vec<_>>(), vec![3]);

        let spurs = store.fixtures_for_team("Spurs").await.unwrap();
        assert_eq!(spurs.iter().map(|f| f.id).collect::<Vec<_>>(), vec![2, 1]);
    }

    #[tokio::test]
    async fn test_memory_store_meetings_are_most_recent_first() {
        let meetings = store()
            .fixtures_between_teams("tottenham-hotspur", "arsenal")
            .await
            .unwrap();
        assert_eq!(meetings.iter().map(|f| f.id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_row_conversion() {
        let row = FixtureRow {
            id: 10,
            competition_id: Some(1),
            home_id: 1,
            home_name: "Arsenal".to_string(),
            home_slug: Some("arsenal".to_string()),
            home_crest: None,
            away_id: 2,
            away_name: "Chelsea".to_string(),
            away_slug: None,
            away_crest: None,
            kickoff_utc: at(2025, 1, 1, 15, 0),
            venue: Some("Emirates Stadium".to_string()),
            round_id: Some(20),
            round_name: Some("20".to_string()),
            home_score: None,
            away_score: None,
            broadcaster: None,
            providers_uk: Some(Json(vec![Provider {
                id: "sky".to_string(),
                name: "Sky Sports".to_string(),
                href: None,
            }])),
            is_blackout: None,
            blackout_reason: None,
        };
        let fixture = Fixture::from(row);
        assert_eq!(fixture.score, None);
        assert_eq!(fixture.round.as_ref().map(|r| r.name.as_str()), Some("20"));
        assert_eq!(fixture.providers_uk.len(), 1);
        assert!(!fixture.blackout.is_blackout);
    }
}
