//! Utility helpers — path resolution and timestamp formatting.

use std::path::PathBuf;

/// Format used for the `timestamp` column of the alert log.
pub const ALERT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Get the Alertbot data directory (e.g. `~/.alertbot/`).
pub fn get_data_path() -> PathBuf {
    let home = home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".alertbot")
}

/// Current local time in the alert log format.
pub fn alert_timestamp() -> String {
    chrono::Local::now().format(ALERT_TIMESTAMP_FORMAT).to_string()
}

/// Expand `~` to the home directory in a path string.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(rest)
    } else if path == "~" {
        home_dir().unwrap_or_else(|| PathBuf::from("."))
    } else {
        PathBuf::from(path)
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| std::env::var("USERPROFILE").ok().map(PathBuf::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_home_tilde() {
        let expanded = expand_home("~/test/alerts.db");
        assert!(!expanded.starts_with("~"));
        assert!(expanded.to_str().unwrap().ends_with("test/alerts.db"));
    }

    #[test]
    fn test_expand_home_absolute() {
        let expanded = expand_home("/var/lib/alertbot/alerts.db");
        assert_eq!(expanded, PathBuf::from("/var/lib/alertbot/alerts.db"));
    }

    #[test]
    fn test_alert_timestamp_format() {
        let ts = alert_timestamp();
        // YYYY-MM-DD HH:MM:SS
        assert_eq!(ts.len(), 19);
        chrono::NaiveDateTime::parse_from_str(&ts, ALERT_TIMESTAMP_FORMAT).unwrap();
    }
}
