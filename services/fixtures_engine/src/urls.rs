use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::slug::{canonical_pair_key, is_valid_slug, PAIR_SEPARATOR};
use crate::types::Fixture;

pub const H2H_PREFIX: &str = "/h2h/";
/// Placeholder href for a link the page should render disabled.
pub const DISABLED_URL: &str = "#";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UrlStrategy {
    DirectSeo,
    FixtureId,
    Failed,
}

/// Outcome of resolving a fixture's head-to-head link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct H2hUrl {
    pub url: String,
    pub strategy: UrlStrategy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl H2hUrl {
    pub fn is_usable(&self) -> bool {
        self.strategy != UrlStrategy::Failed
    }
}

fn usable_slug(slug: Option<&str>) -> Option<&str> {
    slug.filter(|s| is_valid_slug(s))
}

/// Direct SEO url for a team pair, or `None` when either slug is unusable.
pub fn h2h_url_for_slugs(slug_a: &str, slug_b: &str) -> Option<String> {
    if is_valid_slug(slug_a) && is_valid_slug(slug_b) {
        Some(format!("{}{}", H2H_PREFIX, canonical_pair_key(slug_a, slug_b)))
    } else {
        None
    }
}

/// Resolve the best head-to-head link for a fixture. Never fails: the worst
/// case is a disabled `#` link carrying a warning.
pub fn build_h2h_url(fixture: &Fixture) -> H2hUrl {
    let home = fixture.home.slug.as_deref();
    let away = fixture.away.slug.as_deref();

    if let (Some(home), Some(away)) = (usable_slug(home), usable_slug(away)) {
        if let Some(url) = h2h_url_for_slugs(home, away) {
            return H2hUrl {
                url,
                strategy: UrlStrategy::DirectSeo,
                warning: None,
            };
        }
    }

    if fixture.id > 0 {
        return H2hUrl {
            url: format!("{}{}", H2H_PREFIX, fixture.id),
            strategy: UrlStrategy::FixtureId,
            warning: Some(format!(
                "Fixture {} has invalid team slugs (home: {:?}, away: {:?}); using fixture id url",
                fixture.id, home, away
            )),
        };
    }

    H2hUrl {
        url: DISABLED_URL.to_string(),
        strategy: UrlStrategy::Failed,
        warning: Some(format!(
            "Fixture {} has invalid team slugs (home: {:?}, away: {:?}) and no usable id; link disabled",
            fixture.id, home, away
        )),
    }
}

/// Per-fixture links keyed by fixture id. Fixtures sharing an id (including
/// several id-less ones) collapse onto the last one seen.
pub fn build_h2h_urls_batch(fixtures: &[Fixture]) -> BTreeMap<i64, H2hUrl> {
    fixtures
        .iter()
        .map(|fixture| (fixture.id, build_h2h_url(fixture)))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlStrategyStats {
    pub direct_seo: usize,
    pub fixture_id: usize,
    pub failed: usize,
    pub total: usize,
    /// 100 when every link is a direct SEO url, 0 for an empty set.
    pub health_score: u32,
}

pub fn url_strategy_stats<'a, I>(results: I) -> UrlStrategyStats
where
    I: IntoIterator<Item = &'a H2hUrl>,
{
    let mut stats = UrlStrategyStats::default();
    for result in results {
        match result.strategy {
            UrlStrategy::DirectSeo => stats.direct_seo += 1,
            UrlStrategy::FixtureId => stats.fixture_id += 1,
            UrlStrategy::Failed => stats.failed += 1,
        }
        stats.total += 1;
    }

    if stats.total > 0 {
        let weighted = 100.0 * stats.direct_seo as f64 + 50.0 * stats.fixture_id as f64;
        stats.health_score = (weighted / stats.total as f64).round().clamp(0.0, 100.0) as u32;
    }
    stats
}

/// A parsed `/h2h/{segment}` route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum H2hRoute {
    Pair { team_a: String, team_b: String },
    FixtureId(i64),
}

pub fn parse_h2h_path(segment: &str) -> Option<H2hRoute> {
    let segment = segment.trim_matches('/');
    let segment = segment.strip_prefix("h2h/").unwrap_or(segment);

    if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
        return segment
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .map(H2hRoute::FixtureId);
    }

    let (team_a, team_b) = segment.split_once(PAIR_SEPARATOR)?;
    if team_b.contains(PAIR_SEPARATOR) {
        return None;
    }
    if is_valid_slug(team_a) && is_valid_slug(team_b) {
        Some(H2hRoute::Pair {
            team_a: team_a.to_string(),
            team_b: team_b.to_string(),
        })
    } else {
        None
    }
}

/// The canonical path a pair segment should permanently redirect to, when
/// it is not already canonical.
pub fn canonical_redirect(segment: &str) -> Option<String> {
    match parse_h2h_path(segment)? {
        H2hRoute::Pair { team_a, team_b } => {
            let key = canonical_pair_key(&team_a, &team_b);
            let current = segment.trim_matches('/');
            let current = current.strip_prefix("h2h/").unwrap_or(current);
            (key != current).then(|| format!("{}{}", H2H_PREFIX, key))
        }
        H2hRoute::FixtureId(_) => None,
    }
}
