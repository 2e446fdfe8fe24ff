//! cogplay-judge: configuration and intent judge construction.
//!
//! Loads `cogplay.toml` and builds the [`IntentJudge`] the then-what game is
//! scored with: a remote HTTP judge, optionally wrapped so that failures fall
//! back to the built-in heuristic.
//!
//! [`IntentJudge`]: cogplay_core::judge::IntentJudge

pub mod config;
pub mod fallback;
pub mod mock;
pub mod remote;

pub use config::{create_judge, load_config, load_config_from, CogplayConfig, JudgeConfig};
pub use fallback::FallbackJudge;
pub use remote::RemoteJudge;
