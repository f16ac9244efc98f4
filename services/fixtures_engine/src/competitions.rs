use std::collections::HashMap;

use crate::types::{Competition, CompetitionColors};

/// Slugs ranked ahead of everything else on fixture listings.
pub const DEFAULT_PRIORITY: &[&str] = &[
    "premier-league",
    "champions-league",
    "europa-league",
    "europa-conference-league",
];

/// Decides where a competition sits in grouped listings. Lower ranks come
/// first; unranked competitions follow in the order they were discovered.
pub trait CompetitionOrder {
    fn rank(&self, competition: &Competition) -> Option<usize>;
}

impl<F> CompetitionOrder for F
where
    F: Fn(&Competition) -> Option<usize>,
{
    fn rank(&self, competition: &Competition) -> Option<usize> {
        self(competition)
    }
}

/// Ordering driven by a list of competition slugs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityOrder {
    slugs: Vec<String>,
}

impl PriorityOrder {
    pub fn new<I, S>(slugs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            slugs: slugs.into_iter().map(Into::into).collect(),
        }
    }

    pub fn slugs(&self) -> &[String] {
        &self.slugs
    }
}

impl Default for PriorityOrder {
    fn default() -> Self {
        Self::new(DEFAULT_PRIORITY.iter().copied())
    }
}

impl CompetitionOrder for PriorityOrder {
    fn rank(&self, competition: &Competition) -> Option<usize> {
        self.slugs.iter().position(|slug| *slug == competition.slug)
    }
}

/// Stable sort by rank; unranked items keep their relative order at the end.
pub fn sort_by_priority<T, O, F>(items: &mut [T], order: &O, competition_of: F)
where
    O: CompetitionOrder + ?Sized,
    F: Fn(&T) -> &Competition,
{
    items.sort_by_key(|item| match order.rank(competition_of(item)) {
        Some(rank) => (0, rank),
        None => (1, 0),
    });
}

/// The statically configured set of competitions fixtures are grouped under.
#[derive(Debug, Clone, Default)]
pub struct CompetitionRegistry {
    by_id: HashMap<i64, Competition>,
}

fn competition(
    id: i64,
    slug: &str,
    name: &str,
    short_name: &str,
    icon: &str,
    primary: &str,
    secondary: &str,
) -> Competition {
    Competition {
        id,
        slug: slug.to_string(),
        name: name.to_string(),
        short_name: short_name.to_string(),
        icon: icon.to_string(),
        colors: CompetitionColors {
            primary: primary.to_string(),
            secondary: secondary.to_string(),
        },
    }
}

impl CompetitionRegistry {
    pub fn new(competitions: impl IntoIterator<Item = Competition>) -> Self {
        Self {
            by_id: competitions.into_iter().map(|c| (c.id, c)).collect(),
        }
    }

    pub fn uk_default() -> Self {
        Self::new([
            competition(1, "premier-league", "Premier League", "EPL", "🏴", "#3d195b", "#00ff85"),
            competition(2, "champions-league", "UEFA Champions League", "UCL", "⭐", "#0e1e5b", "#ffffff"),
            competition(3, "europa-league", "UEFA Europa League", "UEL", "🟠", "#f68e00", "#000000"),
            competition(
                4,
                "europa-conference-league",
                "UEFA Europa Conference League",
                "UECL",
                "🟢",
                "#00be14",
                "#000000",
            ),
            competition(5, "championship", "EFL Championship", "EFL", "🏆", "#1c2c5b", "#ffffff"),
            competition(6, "fa-cup", "FA Cup", "FAC", "🏆", "#d71920", "#ffffff"),
            competition(7, "efl-cup", "EFL Cup", "EFLC", "🥤", "#00a650", "#ffffff"),
            competition(8, "scottish-premiership", "Scottish Premiership", "SPFL", "🏴", "#4b2c83", "#ffffff"),
        ])
    }

    pub fn get(&self, id: i64) -> Option<&Competition> {
        self.by_id.get(&id)
    }

    pub fn by_slug(&self, slug: &str) -> Option<&Competition> {
        self.by_id.values().find(|c| c.slug == slug)
    }

    /// Registered competition, or a generic placeholder for ids the registry
    /// does not know yet.
    pub fn resolve(&self, id: i64) -> Competition {
        self.get(id).cloned().unwrap_or_else(|| {
            competition(
                id,
                &format!("competition-{}", id),
                &format!("Competition {}", id),
                &format!("C{}", id),
                "⚽",
                "#333333",
                "#ffffff",
            )
        })
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
