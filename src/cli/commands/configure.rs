//! Configure command handler for editing default settings.

use anyhow::{Result, bail};
use inquire::{Select, Text};

use crate::config::{ChatConfig, ConfigFile, ConfigManager};
use crate::ui::{Style, handle_prompt_cancellation};

/// Runs the configure command to edit default settings.
///
/// Allows the user to interactively set the default account, its nickname and
/// the nickname completion character.
pub fn run_configure() -> Result<()> {
    handle_prompt_cancellation(run_configure_inner)
}

fn run_configure_inner() -> Result<()> {
    let manager = ConfigManager::new()?;
    let mut config = manager.load_or_default()?;

    if config.accounts.is_empty() {
        bail!(
            "No accounts configured.\n\n\
             Add an [accounts.<name>] section to {} first.",
            manager.config_path().display()
        );
    }

    print_current_defaults(&config);

    let mut account_names: Vec<String> = config.accounts.keys().cloned().collect();
    account_names.sort_unstable();

    let account = select_account(&account_names, config.chat.account.as_deref())?;

    let current_nickname = config
        .accounts
        .get(&account)
        .and_then(|a| a.nickname.clone());
    let nickname = prompt_nickname(current_nickname.as_deref())?;

    let completion_char = prompt_completion_char(config.chat.nick_completion_char.as_deref())?;

    if let Some(entry) = config.accounts.get_mut(&account) {
        entry.nickname = Some(nickname);
    }
    config.chat = ChatConfig {
        account: Some(account),
        nick_completion_char: completion_char,
    };

    manager.save(&config)?;

    println!();
    println!(
        "{} Configuration saved to {}",
        Style::success("✓"),
        Style::secondary(manager.config_path().display().to_string())
    );

    Ok(())
}

fn print_current_defaults(config: &ConfigFile) {
    println!("{}", Style::header("Current defaults"));
    println!(
        "  {}          {}",
        Style::label("account"),
        config
            .chat
            .account
            .as_deref()
            .map_or_else(|| Style::secondary("(not set)"), Style::value)
    );
    println!(
        "  {}  {}",
        Style::label("completion char"),
        config
            .chat
            .nick_completion_char
            .as_deref()
            .map_or_else(|| Style::secondary("(not set)"), Style::value)
    );
    println!();
}

fn select_account(accounts: &[String], default: Option<&str>) -> Result<String> {
    let default_index = default
        .and_then(|d| accounts.iter().position(|a| a == d))
        .unwrap_or(0);

    let selection = Select::new("Default account:", accounts.to_vec())
        .with_starting_cursor(default_index)
        .prompt()?;

    Ok(selection)
}

fn prompt_nickname(default: Option<&str>) -> Result<String> {
    let mut prompt = Text::new("Nickname:").with_help_message("Your nickname on this account");
    if let Some(d) = default {
        prompt = prompt.with_default(d);
    }

    let nickname = prompt.prompt()?;
    validate_nickname(&nickname)
}

fn prompt_completion_char(default: Option<&str>) -> Result<Option<String>> {
    let mut prompt = Text::new("Nickname completion character:")
        .with_help_message("Appended after a nickname completed at the start of a line, e.g. ':'");
    if let Some(d) = default {
        prompt = prompt.with_default(d);
    }

    let value = prompt.prompt()?;
    Ok(normalize_completion_char(&value))
}

fn validate_nickname(nickname: &str) -> Result<String> {
    let nickname = nickname.trim();
    if nickname.is_empty() {
        bail!("Nickname cannot be empty");
    }
    if nickname.chars().any(char::is_whitespace) {
        bail!("Nickname cannot contain whitespace");
    }
    Ok(nickname.to_string())
}

fn normalize_completion_char(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
