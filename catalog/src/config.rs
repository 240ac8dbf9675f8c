//! Configuration for the catalog binary.
//!
//! Handles database location with the following precedence:
//! 1. `--db` command-line flag
//! 2. GAMEDATA_DB_PATH environment variable
//! 3. $GAMEDATA_DATA_DIR/gamedata.db
//! 4. ~/.config/gamedata/gamedata.db (production default)
//! 5. ./data/gamedata.db (fallback for development)

use std::path::PathBuf;

const DB_FILE_NAME: &str = "gamedata.db";
const DEFAULT_CONFIG_DIR: &str = ".config/gamedata";
const DEV_DATA_DIR: &str = "./data";

/// Resolve the database file path, honouring an explicit override first.
pub fn get_db_path(cli_override: Option<PathBuf>) -> PathBuf {
    db_path_from(
        cli_override,
        std::env::var("GAMEDATA_DB_PATH").ok(),
        std::env::var("GAMEDATA_DATA_DIR").ok(),
        std::env::var("HOME").ok(),
    )
}

/// Directory for rolling log files, if file logging is enabled.
///
/// Set GAMEDATA_LOG_DIR to log to `<dir>/gamedata-catalog.YYYY-MM-DD`
/// instead of stderr.
pub fn get_log_dir() -> Option<PathBuf> {
    std::env::var("GAMEDATA_LOG_DIR")
        .ok()
        .filter(|d| !d.is_empty())
        .map(PathBuf::from)
}

fn db_path_from(
    cli_override: Option<PathBuf>,
    db_path: Option<String>,
    data_dir: Option<String>,
    home: Option<String>,
) -> PathBuf {
    if let Some(path) = cli_override {
        return path;
    }

    if let Some(path) = db_path.filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }

    if let Some(dir) = data_dir.filter(|d| !d.is_empty()) {
        return PathBuf::from(dir).join(DB_FILE_NAME);
    }

    if let Some(home) = home {
        return PathBuf::from(home).join(DEFAULT_CONFIG_DIR).join(DB_FILE_NAME);
    }

    PathBuf::from(DEV_DATA_DIR).join(DB_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override_wins() {
        let path = db_path_from(
            Some(PathBuf::from("/tmp/override.db")),
            Some("/tmp/env.db".into()),
            Some("/tmp/data".into()),
            Some("/home/me".into()),
        );
        assert_eq!(path, PathBuf::from("/tmp/override.db"));
    }

    #[test]
    fn test_db_path_env_before_data_dir() {
        let path = db_path_from(
            None,
            Some("/tmp/env.db".into()),
            Some("/tmp/data".into()),
            None,
        );
        assert_eq!(path, PathBuf::from("/tmp/env.db"));
    }

    #[test]
    fn test_data_dir_joins_file_name() {
        let path = db_path_from(None, None, Some("/tmp/data".into()), Some("/home/me".into()));
        assert_eq!(path, PathBuf::from("/tmp/data/gamedata.db"));
    }

    #[test]
    fn test_home_default() {
        let path = db_path_from(None, Some(String::new()), None, Some("/home/me".into()));
        assert_eq!(path, PathBuf::from("/home/me/.config/gamedata/gamedata.db"));
    }

    #[test]
    fn test_dev_fallback() {
        let path = db_path_from(None, None, None, None);
        assert_eq!(path, PathBuf::from("./data/gamedata.db"));
    }

    #[test]
    fn test_get_db_path_is_never_empty() {
        // Depends on the test environment, so only check that something resolves.
        let path = get_db_path(None);
        assert!(!path.as_os_str().is_empty());
    }
}
