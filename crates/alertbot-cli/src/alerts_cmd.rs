//! `alertbot alerts` and `alertbot clear`.

use anyhow::Result;
use colored::Colorize;

use alertbot_core::config::Config;
use alertbot_core::StoreError;

use crate::helpers;
use crate::Stores;

/// List the most recent alerts, newest first.
pub fn list(config: &Config, limit: usize) -> Result<()> {
    let stores = crate::open_stores(config)?;
    let alerts = stores.log.recent(limit)?;
    let total = stores.log.count()?;

    println!();
    println!(
        "  {}  {}",
        "Alerts".cyan().bold(),
        format!("{} of {}", alerts.len(), total).dimmed()
    );
    println!();
    helpers::print_alert_list(&alerts);
    Ok(())
}

/// Delete all alerts after checking the admin password.
pub fn clear(config: &Config, password: Option<String>) -> Result<()> {
    let stores = crate::open_stores(config)?;
    let password = helpers::secret_or_prompt(password, "Admin password")?;

    let deleted = clear_alerts(&stores, &password)?;
    helpers::print_success(&format!("All alerts cleared ({deleted} removed)"));
    Ok(())
}

fn clear_alerts(stores: &Stores, password: &str) -> Result<usize, StoreError> {
    stores.log.clear_all(password, &stores.config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alertbot_core::{AlertLog, BotConfig, ConfigStore, Database, IncomingAlert, Priority};

    fn temp_stores() -> (tempfile::TempDir, Stores) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path().join("alerts.db")).unwrap();
        let stores = Stores {
            config: ConfigStore::new(db.clone()),
            log: AlertLog::new(db),
        };
        stores
            .config
            .save(&BotConfig::new("0A1B2C3D", "key", "letmein"))
            .unwrap();
        stores
            .log
            .append(&IncomingAlert::new("Missed Dose", "Atorvastatin", Priority::High))
            .unwrap();
        (dir, stores)
    }

    #[test]
    fn clear_with_wrong_password_keeps_alerts() {
        let (_dir, stores) = temp_stores();
        let err = clear_alerts(&stores, "guess").unwrap_err();
        assert!(matches!(err, StoreError::WrongPassword));
        assert_eq!(err.to_string(), "incorrect admin password");
        assert_eq!(stores.log.count().unwrap(), 1);
    }

    #[test]
    fn clear_with_admin_password() {
        let (_dir, stores) = temp_stores();
        assert_eq!(clear_alerts(&stores, "letmein").unwrap(), 1);
        assert_eq!(stores.log.count().unwrap(), 0);
    }
}
