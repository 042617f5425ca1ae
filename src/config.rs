use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::driver::{clamp_interval, DEFAULT_INTERVAL};

/// Environment variable names.
const STATE_PATH_VAR: &str = "LIFETORUS_STATE";
const INTERVAL_VAR: &str = "LIFETORUS_INTERVAL_MS";
const API_KEY_VAR: &str = "GEMINI_API_KEY";
const MODEL_VAR: &str = "GEMINI_MODEL";

const DEFAULT_STATE_PATH: &str = "lifetorus_state.json";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Runtime configuration read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// File the `save`/`load` commands persist the grid to.
    pub state_path: PathBuf,
    /// Initial tick interval.
    pub interval: Duration,
    /// Credential for the pattern commentary service; `None` disables it.
    pub api_key: Option<String>,
    /// Model id for the commentary service.
    pub model: String,
}

impl Config {
    pub fn from_env() -> Self {
        let state_path = env::var(STATE_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATE_PATH));

        let interval = match env::var(INTERVAL_VAR) {
            Ok(raw) => match raw.parse::<u64>() {
                Ok(ms) => clamp_interval(Duration::from_millis(ms)),
                Err(_) => {
                    log::warn!("{INTERVAL_VAR}={raw:?} is not a number, using default");
                    DEFAULT_INTERVAL
                }
            },
            Err(_) => DEFAULT_INTERVAL,
        };

        let api_key = env::var(API_KEY_VAR).ok().filter(|k| !k.is_empty());
        let model = env::var(MODEL_VAR).unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Self {
            state_path,
            interval,
            api_key,
            model,
        }
    }
}
