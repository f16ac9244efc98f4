use serde::{Deserialize, Serialize};
use std::env;
use tracing::warn;

use crate::competitions::{PriorityOrder, DEFAULT_PRIORITY};
use crate::sitemap::POPULAR_MATCHUPS;
use crate::status::ReferenceZone;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost:5432/fixtures".to_string(),
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            base_url: "https://www.example.co.uk".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminConfig {
    pub username: String,
    /// Empty disables admin login.
    pub password: String,
    pub token_secret: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: String::new(),
            token_secret: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduleConfig {
    /// `uk`, `utc` or a fixed `+HH:MM` offset.
    pub reference_zone: String,
    pub competition_priority: Vec<String>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            reference_zone: "uk".to_string(),
            competition_priority: DEFAULT_PRIORITY.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ScheduleConfig {
    pub fn zone(&self) -> ReferenceZone {
        self.reference_zone.parse().unwrap_or_else(|e| {
            warn!("{}; falling back to UK time", e);
            ReferenceZone::Uk
        })
    }

    pub fn priority_order(&self) -> PriorityOrder {
        PriorityOrder::new(self.competition_priority.iter().cloned())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SitemapConfig {
    pub popular_matchups: Vec<String>,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            popular_matchups: POPULAR_MATCHUPS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub admin: AdminConfig,
    pub schedule: ScheduleConfig,
    pub sitemap: SitemapConfig,
}

fn list_var(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl AppConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = env::var("DATABASE_URL") {
            config.database.url = url;
        }
        if let Some(max) = env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|m| m.parse::<u32>().ok())
        {
            config.database.max_connections = max;
        }
        if let Ok(addr) = env::var("BIND_ADDR") {
            config.server.bind_addr = addr;
        }
        if let Ok(base_url) = env::var("SITE_BASE_URL") {
            config.server.base_url = base_url;
        }
        if let Ok(username) = env::var("ADMIN_USERNAME") {
            config.admin.username = username;
        }
        if let Ok(password) = env::var("ADMIN_PASSWORD") {
            config.admin.password = password;
        }
        if let Ok(secret) = env::var("ADMIN_TOKEN_SECRET") {
            config.admin.token_secret = secret;
        }
        if let Ok(zone) = env::var("REFERENCE_TIMEZONE") {
            config.schedule.reference_zone = zone;
        }
        if let Ok(priority) = env::var("COMPETITION_PRIORITY") {
            config.schedule.competition_priority = list_var(&priority);
        }
        if let Ok(popular) = env::var("POPULAR_MATCHUPS") {
            config.sitemap.popular_matchups = list_var(&popular);
        }

        config
    }
}
