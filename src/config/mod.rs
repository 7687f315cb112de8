use std::path::PathBuf;
use std::time::Duration;

use crate::errors::{PodcastError, PodcastResult};

pub const DEFAULT_DAYS: u32 = 1;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding `feeds.txt` and the scratch artifacts.
    pub home: PathBuf,
    pub days: u32,
    pub timeout: Duration,
}

impl Config {
    /// Get the directory where the executable is located
    fn exe_dir() -> Option<PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    pub fn from_env() -> PodcastResult<Self> {
        // Try to load .env from executable's directory first
        if let Some(dir) = Self::exe_dir() {
            let env_path = dir.join(".env");
            if env_path.exists() {
                dotenvy::from_path(&env_path).ok();
            }
        }
        // Fall back to current directory
        dotenvy::dotenv().ok();

        let home = match std::env::var_os("PODCASTS_HOME") {
            Some(dir) => PathBuf::from(dir),
            None => std::env::var_os("HOME")
                .map(|h| PathBuf::from(h).join(".podcasts"))
                .ok_or_else(|| {
                    PodcastError::Config("neither PODCASTS_HOME nor HOME is set".to_string())
                })?,
        };

        let days = parse_env("PODCASTS_DAYS", DEFAULT_DAYS)?;
        let timeout_secs = parse_env("PODCASTS_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;

        Ok(Self {
            home,
            days,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn feed_list_path(&self) -> PathBuf {
        self.home.join("feeds.txt")
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> PodcastResult<T> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| PodcastError::Config(format!("{} must be a number, got {:?}", key, raw))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_falls_back_to_default() {
        let days: u32 = parse_env("PODCASTS_TEST_UNSET_VARIABLE", 7).unwrap();
        assert_eq!(days, 7);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("PODCASTS_TEST_GARBAGE_DAYS", "three");
        let result: PodcastResult<u32> = parse_env("PODCASTS_TEST_GARBAGE_DAYS", 1);
        assert!(matches!(result, Err(PodcastError::Config(_))));
    }

    #[test]
    fn test_feed_list_lives_in_home() {
        let config = Config {
            home: PathBuf::from("/srv/podcasts"),
            days: 1,
            timeout: Duration::from_secs(30),
        };
        assert_eq!(config.feed_list_path(), PathBuf::from("/srv/podcasts/feeds.txt"));
    }
}
