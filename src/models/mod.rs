//! Core data models for the win-rate tracker.

mod ids;
mod matches;
mod queue;
mod stats;
mod team;

pub use ids::*;
pub use matches::*;
pub use queue::*;
pub use stats::*;
pub use team::*;
