use std::path::PathBuf;
use std::time::Duration;

pub const LOG_ENV: &str = "MODAL_DIALOG_LOG";
pub const LOG_FILE_ENV: &str = "MODAL_DIALOG_LOG_FILE";
pub const KEY_DEBUG_ENV: &str = "MODAL_DIALOG_KEY_DEBUG";
pub const POLL_MS_ENV: &str = "MODAL_DIALOG_POLL_MS";
pub const STATE_DIR_ENV: &str = "MODAL_DIALOG_STATE_DIR";

const DEFAULT_LOG_FILTER: &str = "warn";
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub log_filter: String,
    pub log_file: Option<PathBuf>,
    pub key_debug: bool,
    pub poll_interval: Duration,
    pub state_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            log_file: None,
            key_debug: false,
            poll_interval: DEFAULT_POLL_INTERVAL,
            state_dir: None,
        }
    }
}

fn truthy(value: Option<&str>) -> bool {
    value
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let poll_interval = lookup(POLL_MS_ENV)
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map(|millis| Duration::from_millis(millis).max(MIN_POLL_INTERVAL))
            .unwrap_or(defaults.poll_interval);
        Self {
            log_filter: non_empty(lookup(LOG_ENV)).unwrap_or(defaults.log_filter),
            log_file: non_empty(lookup(LOG_FILE_ENV)).map(PathBuf::from),
            key_debug: truthy(lookup(KEY_DEBUG_ENV).as_deref()),
            poll_interval,
            state_dir: non_empty(lookup(STATE_DIR_ENV)).map(PathBuf::from),
        }
    }
}
