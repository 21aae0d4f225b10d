use crate::notice::DEFAULT_NOTICE_TTL;
use crate::scheduler::DEFAULT_SYNC_INTERVAL;
use std::path::PathBuf;
use std::time::Duration;

/// File name used when exporting without an explicit path
pub const EXPORT_FILE_NAME: &str = "quotes.json";

#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite file holding the durable slots
    pub db_path: PathBuf,

    /// Where export writes and the UI's import reads
    pub export_path: PathBuf,

    pub sync_interval: Duration,

    pub notice_ttl: Duration,
}

impl Config {
    /// Read `QUOTE_KEEPER_*` environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Config::default();

        let db_path = std::env::var("QUOTE_KEEPER_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        let export_path = std::env::var("QUOTE_KEEPER_EXPORT_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.export_path);

        let sync_interval = std::env::var("QUOTE_KEEPER_SYNC_INTERVAL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|secs: &u64| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.sync_interval);

        let notice_ttl = std::env::var("QUOTE_KEEPER_NOTICE_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.notice_ttl);

        Config {
            db_path,
            export_path,
            sync_interval,
            notice_ttl,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            db_path: PathBuf::from("./quotes.db"),
            export_path: PathBuf::from(format!("./{}", EXPORT_FILE_NAME)),
            sync_interval: DEFAULT_SYNC_INTERVAL,
            notice_ttl: DEFAULT_NOTICE_TTL,
        }
    }
}
