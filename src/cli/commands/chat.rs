use anyhow::Result;

use crate::chat::{ChatSession, SessionConfig};
use crate::config::{ConfigFile, ConfigManager, ResolveOptions, resolve_account};
use crate::status;

pub struct ChatOptions {
    pub account: Option<String>,
    pub nick: Option<String>,
}

pub async fn run_chat(options: ChatOptions) -> Result<()> {
    let manager = ConfigManager::new()?;
    let file_config = manager.load_or_default()?;
    let config = load_session_config(options, file_config)?;

    status!("Loaded configuration from {}", manager.config_path().display());

    let mut session = ChatSession::new(config);
    session.run().await
}

fn load_session_config(options: ChatOptions, file_config: ConfigFile) -> Result<SessionConfig> {
    let resolve_options = ResolveOptions {
        account: options.account,
        nickname: options.nick,
    };
    let account = resolve_account(&resolve_options, &file_config)?;
    Ok(SessionConfig::new(account, file_config.chat))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_load_session_config_applies_overrides() {
        let file_config: ConfigFile = toml::from_str(
            r#"
            [chat]
            account = "libera"
            nick_completion_char = ":"

            [accounts.libera]
            nickname = "alice"
            "#,
        )
        .unwrap();

        let options = ChatOptions {
            account: None,
            nick: Some("al".to_string()),
        };
        let config = load_session_config(options, file_config).unwrap();

        assert_eq!(config.account.name, "libera");
        assert_eq!(config.account.nickname, "al");
        assert_eq!(config.chat.nick_completion_char.as_deref(), Some(":"));
    }
}
