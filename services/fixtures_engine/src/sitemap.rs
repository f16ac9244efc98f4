use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use tracing::info;

use crate::error::AppError;
use crate::slug::{canonical_pair_key, is_valid_slug};
use crate::urls::{parse_h2h_path, H2hRoute, H2H_PREFIX};
use crate::types::Fixture;

pub const POPULAR_PRIORITY: &str = "0.9";
pub const DEFAULT_PRIORITY: &str = "0.8";
pub const CHANGEFREQ: &str = "daily";

/// Curated matchups promoted in the sitemap.
pub const POPULAR_MATCHUPS: &[&str] = &[
    "arsenal-vs-tottenham-hotspur",
    "liverpool-vs-manchester-united",
    "manchester-city-vs-manchester-united",
    "arsenal-vs-chelsea",
    "chelsea-vs-tottenham-hotspur",
    "everton-vs-liverpool",
    "celtic-vs-rangers",
    "arsenal-vs-manchester-united",
    "liverpool-vs-manchester-city",
    "newcastle-united-vs-sunderland",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SitemapEntry {
    pub url: String,
    pub changefreq: &'static str,
    pub priority: &'static str,
}

/// Normalize an allowlist entry (`b-vs-a`, `/h2h/a-vs-b`, alias slugs) to its canonical key.
fn popular_key(entry: &str) -> Option<String> {
    match parse_h2h_path(entry)? {
        H2hRoute::Pair { team_a, team_b } => Some(canonical_pair_key(&team_a, &team_b)),
        H2hRoute::FixtureId(_) => None,
    }
}

/// One entry per unique unordered team pairing with usable slugs, sorted by url.
pub fn h2h_sitemap_entries<S: AsRef<str>>(
    fixtures: &[Fixture],
    popular: &[S],
    base_url: &str,
) -> Vec<SitemapEntry> {
    let popular: HashSet<String> = popular
        .iter()
        .filter_map(|entry| popular_key(entry.as_ref()))
        .collect();

    let keys: BTreeSet<String> = fixtures
        .iter()
        .filter_map(|f| match (f.home.slug.as_deref(), f.away.slug.as_deref()) {
            (Some(home), Some(away)) if is_valid_slug(home) && is_valid_slug(away) => {
                Some(canonical_pair_key(home, away))
            }
            _ => None,
        })
        .collect();

    let base = base_url.trim_end_matches('/');
    keys.into_iter()
        .map(|key| SitemapEntry {
            url: format!("{}{}{}", base, H2H_PREFIX, key),
            changefreq: CHANGEFREQ,
            priority: if popular.contains(&key) {
                POPULAR_PRIORITY
            } else {
                DEFAULT_PRIORITY
            },
        })
        .collect()
}

pub fn render_sitemap_xml(entries: &[SitemapEntry]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for entry in entries {
        xml.push_str(&format!(
            "  <url>\n    <loc>{}</loc>\n    <changefreq>{}</changefreq>\n    <priority>{}</priority>\n  </url>\n",
            html_escape::encode_text(&entry.url),
            entry.changefreq,
            entry.priority
        ));
    }
    xml.push_str("</urlset>\n");
    xml
}

/// Render the sitemap for `fixtures` to `path`, returning the entry count.
pub async fn write_sitemap<S: AsRef<str>>(
    path: &Path,
    fixtures: &[Fixture],
    popular: &[S],
    base_url: &str,
) -> Result<usize, AppError> {
    let entries = h2h_sitemap_entries(fixtures, popular, base_url);
    tokio::fs::write(path, render_sitemap_xml(&entries)).await?;
    info!("Wrote {} sitemap entries to {}", entries.len(), path.display());
    Ok(entries.len())
}
