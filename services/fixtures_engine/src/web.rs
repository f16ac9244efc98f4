use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::{
    auth::AdminAuth,
    competitions::{CompetitionRegistry, PriorityOrder},
    config::AppConfig,
    error::AppError,
    grouping::{group_by_competition, team_schedule, CompetitionFixtureGroup, TeamSchedule},
    h2h::{compute_h2h_stats, H2hStats},
    sitemap::{h2h_sitemap_entries, render_sitemap_xml},
    slug::{canonical_pair_key, canonicalize, PAIR_SEPARATOR},
    status::{Clock, ReferenceZone},
    store::FixtureStore,
    types::Fixture,
    urls::{
        build_h2h_urls_batch, canonical_redirect, parse_h2h_path, url_strategy_stats, H2hRoute,
        H2hUrl, UrlStrategy, UrlStrategyStats, H2H_PREFIX,
    },
};

pub type NowFn = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn FixtureStore>,
    pub config: Arc<AppConfig>,
    pub registry: Arc<CompetitionRegistry>,
    pub order: Arc<PriorityOrder>,
    pub zone: ReferenceZone,
    pub auth: Arc<AdminAuth>,
    pub now: NowFn,
}

impl AppState {
    pub fn new(store: Arc<dyn FixtureStore>, config: AppConfig) -> Self {
        Self {
            store,
            registry: Arc::new(CompetitionRegistry::uk_default()),
            order: Arc::new(config.schedule.priority_order()),
            zone: config.schedule.zone(),
            auth: Arc::new(AdminAuth::new(&config.admin)),
            config: Arc::new(config),
            now: Arc::new(Utc::now),
        }
    }

    /// Pin "now", so responses are reproducible.
    pub fn with_now(mut self, now: NowFn) -> Self {
        self.now = now;
        self
    }

    fn clock(&self) -> Clock {
        Clock::new((self.now)(), self.zone)
    }
}

#[axum::debug_handler]
pub async fn competition_fixtures_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<CompetitionFixtureGroup>>, AppError> {
    let fixtures = state.store.all_fixtures().await?;
    let groups = group_by_competition(&fixtures, &state.registry, state.order.as_ref(), &state.clock());
    Ok(Json(groups))
}

#[axum::debug_handler]
pub async fn team_schedule_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<TeamSchedule>, AppError> {
    let fixtures = state.store.fixtures_for_team(&slug).await?;
    if fixtures.is_empty() {
        return Err(AppError::NotFound(format!("No fixtures for team {}", slug)));
    }
    Ok(Json(team_schedule(&fixtures, &slug, &state.clock())))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct H2hResponse {
    pub canonical_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    pub team1: String,
    pub team2: String,
    pub stats: H2hStats,
}

/// Display names with team1 being whichever side carries `first_slug`.
fn team_names(meeting: &Fixture, first_slug: &str) -> (String, String) {
    let home_is_first = meeting
        .home
        .slug
        .as_deref()
        .is_some_and(|slug| canonicalize(slug) == first_slug);
    if home_is_first {
        (meeting.home.name.clone(), meeting.away.name.clone())
    } else {
        (meeting.away.name.clone(), meeting.home.name.clone())
    }
}

/// Meetings between a fixture's two teams by name, most recent first.
fn meetings_by_name(fixtures: Vec<Fixture>, anchor: &Fixture) -> Vec<Fixture> {
    let names = [anchor.home.name.as_str(), anchor.away.name.as_str()];
    let mut meetings: Vec<Fixture> = fixtures
        .into_iter()
        .filter(|f| {
            (f.home.name == names[0] && f.away.name == names[1])
                || (f.home.name == names[1] && f.away.name == names[0])
        })
        .collect();
    meetings.sort_by(|a, b| b.kickoff_utc.cmp(&a.kickoff_utc));
    meetings
}

#[axum::debug_handler]
pub async fn h2h_handler(
    State(state): State<AppState>,
    Path(segment): Path<String>,
) -> Result<Json<H2hResponse>, AppError> {
    let route = parse_h2h_path(&segment)
        .ok_or_else(|| AppError::NotFound(format!("Unrecognised head-to-head path {}", segment)))?;

    let response = match route {
        H2hRoute::Pair { team_a, team_b } => {
            let key = canonical_pair_key(&team_a, &team_b);
            let meetings = state.store.fixtures_between_teams(&team_a, &team_b).await?;
            let latest = meetings
                .first()
                .ok_or_else(|| AppError::NotFound(format!("No meetings for {}", key)))?;
            let first_slug = key.split(PAIR_SEPARATOR).next().unwrap_or_default();
            let (team1, team2) = team_names(latest, first_slug);
            H2hResponse {
                canonical_url: format!("{}{}", H2H_PREFIX, key),
                redirect: canonical_redirect(&segment),
                stats: compute_h2h_stats(&meetings, &team1, &team2),
                team1,
                team2,
            }
        }
        H2hRoute::FixtureId(id) => {
            let fixtures = state.store.all_fixtures().await?;
            let anchor = fixtures
                .iter()
                .find(|f| f.id == id)
                .cloned()
                .ok_or_else(|| AppError::NotFound(format!("Fixture {}", id)))?;
            let meetings = meetings_by_name(fixtures, &anchor);
            let (team1, team2) = (anchor.home.name.clone(), anchor.away.name.clone());
            H2hResponse {
                canonical_url: format!("{}{}", H2H_PREFIX, id),
                redirect: None,
                stats: compute_h2h_stats(&meetings, &team1, &team2),
                team1,
                team2,
            }
        }
    };

    Ok(Json(response))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FixtureLinksResponse {
    pub links: BTreeMap<i64, H2hUrl>,
    pub stats: UrlStrategyStats,
}

#[axum::debug_handler]
pub async fn fixture_links_handler(
    State(state): State<AppState>,
) -> Result<Json<FixtureLinksResponse>, AppError> {
    let fixtures = state.store.all_fixtures().await?;
    let links = build_h2h_urls_batch(&fixtures);
    for warning in links.values().filter_map(|link| link.warning.as_deref()) {
        warn!("{}", warning);
    }

    let stats = url_strategy_stats(links.values());
    if stats.health_score < 100 && stats.total > 0 {
        warn!(
            "H2H link health {}% ({} direct, {} by id, {} failed)",
            stats.health_score, stats.direct_seo, stats.fixture_id, stats.failed
        );
    } else {
        info!("H2H link health {}% across {} fixtures", stats.health_score, stats.total);
    }

    Ok(Json(FixtureLinksResponse { links, stats }))
}

#[axum::debug_handler]
pub async fn sitemap_handler(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let fixtures = state.store.all_fixtures().await?;
    let entries = h2h_sitemap_entries(
        &fixtures,
        &state.config.sitemap.popular_matchups,
        &state.config.server.base_url,
    );
    Ok((
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        render_sitemap_xml(&entries),
    ))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[axum::debug_handler]
pub async fn admin_login_handler(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    state
        .auth
        .login(&request.username, &request.password)
        .map(|token| Json(LoginResponse { token }))
        .ok_or(AppError::Unauthorized)
}

fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<(), AppError> {
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| state.auth.verify_bearer(value));
    if authorized {
        Ok(())
    } else {
        Err(AppError::Unauthorized)
    }
}

/// Fixtures whose H2H link fell back from a direct slug URL, for editors to
/// fix team slugs.
#[axum::debug_handler]
pub async fn admin_link_issues_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<FixtureLinksResponse>, AppError> {
    require_admin(&state, &headers)?;
    let fixtures = state.store.all_fixtures().await?;
    let mut links = build_h2h_urls_batch(&fixtures);
    let stats = url_strategy_stats(links.values());
    links.retain(|_, link| link.strategy != UrlStrategy::DirectSeo);
    info!("{} fixtures need slug attention", links.len());
    Ok(Json(FixtureLinksResponse { links, stats }))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/competitions/fixtures", get(competition_fixtures_handler))
        .route("/api/teams/{slug}/schedule", get(team_schedule_handler))
        .route("/api/h2h/{segment}", get(h2h_handler))
        .route("/api/fixtures/links", get(fixture_links_handler))
        .route("/sitemap-h2h.xml", get(sitemap_handler))
        .route("/admin/login", post(admin_login_handler))
        .route("/admin/fixtures/links", get(admin_link_issues_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(state: AppState) -> Result<(), AppError> {
    let addr = state.config.server.bind_addr.clone();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Fixtures site listening on http://{}", addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}
