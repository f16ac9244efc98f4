//! Fixture classification, canonical head-to-head URLs and statistics for the
//! UK fixtures and TV listings site.
//!
//! Everything outside [`store`] and [`web`] is a pure function of its input:
//! callers pass in already-fetched fixtures and an explicit evaluation time.

pub mod auth;
pub mod competitions;
pub mod config;
pub mod error;
pub mod grouping;
pub mod h2h;
pub mod round;
pub mod sitemap;
pub mod slug;
pub mod status;
pub mod store;
pub mod types;
pub mod urls;
pub mod web;
