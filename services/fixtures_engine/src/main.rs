use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::{path::PathBuf, sync::Arc};
use tracing_subscriber::EnvFilter;

use fixtures_engine::{
    config::AppConfig,
    h2h::compute_h2h_stats,
    sitemap::write_sitemap,
    slug::canonicalize,
    store::{FixtureStore, PgFixtureStore},
    web::{self, AppState},
};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve,
    /// Write the head-to-head sitemap
    Sitemap {
        /// Where to write the XML
        #[arg(short, long, default_value = "sitemap-h2h.xml")]
        output: PathBuf,
    },
    /// Print head-to-head statistics for two teams as JSON
    H2h {
        /// First team's slug
        team1: String,
        /// Second team's slug
        team2: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();
    let store = PgFixtureStore::connect(&config.database)
        .await
        .context("Failed to connect to the fixtures database")?;

    match cli.command {
        Commands::Serve => {
            let state = AppState::new(Arc::new(store), config);
            web::serve(state).await.context("HTTP server failed")?;
        }
        Commands::Sitemap { output } => {
            let fixtures = store.all_fixtures().await?;
            write_sitemap(
                &output,
                &fixtures,
                &config.sitemap.popular_matchups,
                &config.server.base_url,
            )
            .await
            .with_context(|| format!("Failed to write {:?}", output))?;
        }
        Commands::H2h { team1, team2 } => {
            let meetings = store.fixtures_between_teams(&team1, &team2).await?;
            let team1_slug = canonicalize(&team1);
            let name_of = |slug: &str| {
                meetings.iter().find_map(|f| {
                    [&f.home, &f.away]
                        .into_iter()
                        .find(|t| t.slug.as_deref().map(canonicalize).as_deref() == Some(slug))
                        .map(|t| t.name.clone())
                })
            };
            let team1_name = name_of(&team1_slug).unwrap_or(team1.clone());
            let team2_name = name_of(&canonicalize(&team2)).unwrap_or(team2.clone());
            let stats = compute_h2h_stats(&meetings, &team1_name, &team2_name);
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }

    Ok(())
}
