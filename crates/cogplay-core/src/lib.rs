//! cogplay-core: puzzle generation, scoring and progress statistics.
//!
//! This crate holds the cognitive mini-games (generators and scorers), the
//! shared data model, the intent judge seam used by the then-what game and
//! the rolling-window aggregation that turns score history into trends.

pub mod error;
pub mod games;
pub mod history;
pub mod judge;
pub mod model;
pub mod statistics;
