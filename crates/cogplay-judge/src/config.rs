//! Configuration loading and judge factory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use cogplay_core::judge::{HeuristicJudge, IntentJudge};
use cogplay_core::model::Difficulty;

use crate::fallback::FallbackJudge;
use crate::remote::{RemoteJudge, DEFAULT_TIMEOUT_SECS};

const KEY_ENV_VAR: &str = "COGPLAY_JUDGE_KEY";

/// Which intent judge scores then-what responses.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum JudgeConfig {
    #[default]
    Heuristic,
    Remote {
        endpoint: String,
        #[serde(default)]
        api_key: Option<String>,
        #[serde(default = "default_timeout")]
        timeout_secs: u64,
        #[serde(default = "default_true")]
        fallback_to_heuristic: bool,
    },
}

impl std::fmt::Debug for JudgeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JudgeConfig::Heuristic => f.debug_struct("Heuristic").finish(),
            JudgeConfig::Remote {
                endpoint,
                api_key,
                timeout_secs,
                fallback_to_heuristic,
            } => f
                .debug_struct("Remote")
                .field("endpoint", endpoint)
                .field("api_key", &api_key.as_ref().map(|_| "***"))
                .field("timeout_secs", timeout_secs)
                .field("fallback_to_heuristic", fallback_to_heuristic)
                .finish(),
        }
    }
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_true() -> bool {
    true
}

/// Top-level cogplay configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CogplayConfig {
    /// Difficulty used when a command is not given one.
    #[serde(default)]
    pub default_difficulty: Difficulty,
    /// Length of a reaction game.
    #[serde(default = "default_reaction_duration")]
    pub reaction_duration_secs: u64,
    /// Max concurrent judge requests in batch mode.
    #[serde(default = "default_parallelism")]
    pub judge_parallelism: usize,
    /// Where score history is read from when no path is given.
    #[serde(default = "default_history_dir")]
    pub history_dir: PathBuf,
    #[serde(default)]
    pub judge: JudgeConfig,
}

fn default_reaction_duration() -> u64 {
    60
}
fn default_parallelism() -> usize {
    4
}
fn default_history_dir() -> PathBuf {
    PathBuf::from("./history")
}

impl Default for CogplayConfig {
    fn default() -> Self {
        Self {
            default_difficulty: Difficulty::default(),
            reaction_duration_secs: default_reaction_duration(),
            judge_parallelism: default_parallelism(),
            history_dir: default_history_dir(),
            judge: JudgeConfig::default(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + end];
        let value = std::env::var(var_name).unwrap_or_default();
        result = format!("{}{}{}", &result[..start], value, &result[start + end + 1..]);
    }
    result
}

fn resolve_judge_config(config: JudgeConfig) -> JudgeConfig {
    match config {
        JudgeConfig::Heuristic => JudgeConfig::Heuristic,
        JudgeConfig::Remote {
            endpoint,
            api_key,
            timeout_secs,
            fallback_to_heuristic,
        } => JudgeConfig::Remote {
            endpoint: resolve_env_vars(&endpoint),
            api_key: api_key.map(|k| resolve_env_vars(&k)).filter(|k| !k.is_empty()),
            timeout_secs,
            fallback_to_heuristic,
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `cogplay.toml` in the current directory
/// 2. `~/.config/cogplay/config.toml`
///
/// `COGPLAY_JUDGE_KEY` overrides the remote judge's API key.
pub fn load_config() -> Result<CogplayConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<CogplayConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("cogplay.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|dir| dir.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => CogplayConfig::default(),
    };

    if let Ok(key) = std::env::var(KEY_ENV_VAR) {
        if let JudgeConfig::Remote { api_key, .. } = &mut config.judge {
            *api_key = Some(key);
        }
    }

    config.judge = resolve_judge_config(config.judge);
    Ok(config)
}

/// Parse a TOML config string (useful for testing).
pub fn parse_config_str(content: &str) -> Result<CogplayConfig> {
    let config: CogplayConfig = toml::from_str(content)?;
    if config.judge_parallelism == 0 {
        anyhow::bail!("judge_parallelism must be at least 1");
    }
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("cogplay"))
}

/// Create a judge instance from its configuration.
pub fn create_judge(config: &JudgeConfig) -> Result<Box<dyn IntentJudge>> {
    match config {
        JudgeConfig::Heuristic => Ok(Box::new(HeuristicJudge)),
        JudgeConfig::Remote {
            endpoint,
            api_key,
            timeout_secs,
            fallback_to_heuristic,
        } => {
            if endpoint.trim().is_empty() {
                anyhow::bail!("remote judge needs an endpoint");
            }
            let remote = RemoteJudge::new(endpoint, api_key.clone(), *timeout_secs)
                .context("failed to create remote judge")?;
            if *fallback_to_heuristic {
                Ok(Box::new(FallbackJudge::new(Box::new(remote))))
            } else {
                Ok(Box::new(remote))
            }
        }
    }
}
