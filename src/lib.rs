//! # Winrate Tracker
//!
//! Team and player win rates over recent League of Legends matches.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (matches, players, teams, win rates)
//! - **riot**: Riot API traits and the reqwest client
//! - **engine**: Bounded concurrent retrieval, retry and aggregation
//! - **service**: Team management and win-rate use cases
//! - **storage**: JSONL-backed team and player repository
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod config;
pub mod engine;
pub mod models;
pub mod riot;
pub mod service;
pub mod storage;

pub use models::*;
