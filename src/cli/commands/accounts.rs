//! Account listing command handler.

use anyhow::Result;

use crate::config::{ConfigFile, ConfigManager};
use crate::ui::Style;

/// Prints configured accounts to stdout.
///
/// If `specific_account` is provided, shows detailed information for that account.
/// Otherwise, lists all configured accounts with their protocol and nickname.
pub fn print_accounts(specific_account: Option<&str>) -> Result<()> {
    let manager = ConfigManager::new()?;
    let config = manager.load_or_default()?;
    print!("{}", render_accounts(&config, specific_account)?);
    Ok(())
}

fn render_accounts(config: &ConfigFile, specific_account: Option<&str>) -> Result<String> {
    if config.accounts.is_empty() {
        return Ok("No accounts configured.\n\
                   Add accounts to ~/.config/empathy-chat/config.toml\n"
            .to_string());
    }

    let default_account = config.chat.account.as_deref();
    let marker = |name: &str| {
        if default_account == Some(name) {
            format!(" {}", Style::default_marker())
        } else {
            String::new()
        }
    };
    let mut out = String::new();

    if let Some(name) = specific_account {
        let Some(account) = config.accounts.get(name) else {
            anyhow::bail!("Account '{name}' not found");
        };

        out.push_str(&format!("Account: {name}{}\n", marker(name)));
        out.push_str(&format!("  protocol = {}\n", account.protocol()));
        out.push_str(&format!(
            "  nickname = {}\n",
            account.nickname.as_deref().unwrap_or("(not set)")
        ));
        if let Some(room) = &account.room {
            out.push_str(&format!("  room     = {room}\n"));
        }
        if let Some(topic) = account.topic_property() {
            out.push_str(&format!(
                "  topic    = {}{}\n",
                topic.value.as_deref().unwrap_or("(none)"),
                if topic.writable { "" } else { " (read-only)" }
            ));
        }
        if account.members.is_empty() {
            out.push_str("  members  = (none configured)\n");
        } else {
            out.push_str("  members:\n");
            for member in &account.members {
                out.push_str(&format!("    - {member}\n"));
            }
        }
    } else {
        let mut names: Vec<_> = config.accounts.keys().collect();
        names.sort_unstable();

        out.push_str("Configured accounts:\n\n");
        for name in names {
            let account = &config.accounts[name];
            out.push_str(&format!("  {}{}\n", Style::value(name), marker(name)));
            out.push_str(&format!(
                "    {}: {}\n",
                Style::label("protocol"),
                account.protocol()
            ));
            if let Some(nickname) = &account.nickname {
                out.push_str(&format!("    {}: {nickname}\n", Style::label("nickname")));
            }
        }
    }

    Ok(out)
}
