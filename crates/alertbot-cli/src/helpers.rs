//! Shared CLI helpers — alert rendering, prompts, banner.

use std::path::Path;

use anyhow::{Context, Result};
use colored::{ColoredString, Colorize};

use alertbot_core::{Alert, Priority};

/// Replace the home directory prefix of `path` with `~` for display.
pub fn display_path(path: &Path) -> String {
    if let Some(home) = dirs_next::home_dir() {
        if let Ok(rest) = path.strip_prefix(&home) {
            return format!("~/{}", rest.display());
        }
    }
    path.display().to_string()
}

/// Priority label coloured like the alert bubbles: red, orange, green.
pub fn priority_label(priority: Priority) -> ColoredString {
    let label = format!("{:<8}", priority.as_str());
    match priority {
        Priority::Critical => label.red().bold(),
        Priority::High => label.truecolor(255, 153, 0).bold(),
        Priority::Low => label.green(),
    }
}

/// Print one alert as a two-line entry.
pub fn print_alert(alert: &Alert) {
    println!(
        "  {} {}  {}",
        priority_label(alert.priority),
        alert.alert_type.bold(),
        alert.timestamp.dimmed()
    );
    if !alert.message.is_empty() {
        println!("           {}", alert.message);
    }
}

/// Print a list of alerts (newest first), or the empty-log hint.
pub fn print_alert_list(alerts: &[Alert]) {
    if alerts.is_empty() {
        println!("  {}", "No alerts yet".dimmed());
        println!("  {}", "Waiting for messages from CuraX...".dimmed());
        println!();
        return;
    }

    for alert in alerts {
        print_alert(alert);
    }
    println!();
}

/// Print the banner shown by `watch` and `setup`.
pub fn print_banner(subtitle: &str) {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!("{}  v{}", "💊 CuraX Alerts".cyan().bold(), version.dimmed());
    if !subtitle.is_empty() {
        println!("{}", subtitle.dimmed());
    }
    println!();
}

pub fn print_success(message: &str) {
    println!("  {} {}", "✓".green(), message);
}

pub fn print_error(message: &str) {
    eprintln!("  {} {}", "✗".red(), message);
}

/// Use `value` if given, otherwise prompt for it on the terminal.
pub fn value_or_prompt(value: Option<String>, label: &str) -> Result<String> {
    if let Some(v) = value {
        return Ok(v);
    }

    let mut editor = rustyline::DefaultEditor::new().context("failed to open terminal prompt")?;
    let line = editor
        .readline(&format!("  {label}: "))
        .with_context(|| format!("no input for {label}"))?;
    Ok(line)
}

/// Like [`value_or_prompt`], but the typed value is not echoed.
pub fn secret_or_prompt(value: Option<String>, label: &str) -> Result<String> {
    if let Some(v) = value {
        return Ok(v);
    }

    dialoguer::Password::with_theme(&dialoguer::theme::ColorfulTheme::default())
        .with_prompt(format!("  {label}"))
        .allow_empty_password(true)
        .interact()
        .with_context(|| format!("no input for {label}"))
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn display_path_under_home() {
        if let Some(home) = dirs_next::home_dir() {
            let shown = display_path(&home.join(".alertbot").join("alerts.db"));
            assert_eq!(shown, "~/.alertbot/alerts.db");
        }
    }

    #[test]
    fn display_path_outside_home() {
        let shown = display_path(&PathBuf::from("/var/lib/alertbot/alerts.db"));
        assert_eq!(shown, "/var/lib/alertbot/alerts.db");
    }

    #[test]
    fn priority_label_is_padded() {
        colored::control::set_override(false);
        assert_eq!(priority_label(Priority::High).to_string(), "HIGH    ");
        assert_eq!(priority_label(Priority::Critical).to_string(), "CRITICAL");
    }

    #[test]
    fn value_or_prompt_uses_given_value() {
        let value = value_or_prompt(Some("given".to_string()), "Name").unwrap();
        assert_eq!(value, "given");
    }

    #[test]
    fn secret_or_prompt_uses_given_value() {
        let value = secret_or_prompt(Some("letmein".to_string()), "Admin password").unwrap();
        assert_eq!(value, "letmein");
    }
}
