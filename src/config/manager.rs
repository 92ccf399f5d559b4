use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::chat::{LoopbackConfig, Settings, TopicProperty};
use crate::{fs as atomic, paths, warning};

/// Default protocol for accounts that do not name one.
pub const DEFAULT_PROTOCOL: &str = "irc";

/// Default longest message body, in characters.
pub const DEFAULT_MAX_MESSAGE_LENGTH: usize = 512;

/// Settings in the `[chat]` section of config.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Default account name.
    pub account: Option<String>,
    /// Text appended after a nickname completed at the start of a line.
    pub nick_completion_char: Option<String>,
}

impl Settings for ChatConfig {
    fn nick_completion_char(&self) -> Option<String> {
        self.nick_completion_char.clone()
    }
}

/// Configuration for one account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Protocol name (defaults to `irc`).
    #[serde(default)]
    pub protocol: Option<String>,
    /// Our nickname on this account.
    #[serde(default)]
    pub nickname: Option<String>,
    /// Room the conversation opens on.
    #[serde(default)]
    pub room: Option<String>,
    /// Other members of the conversation.
    #[serde(default)]
    pub members: Vec<String>,
    /// Initial topic.
    #[serde(default)]
    pub topic: Option<String>,
    /// Whether we may change the topic.
    #[serde(default)]
    pub topic_writable: Option<bool>,
    /// Longest message body accepted, in characters.
    #[serde(default)]
    pub max_message_length: Option<usize>,
    /// Simulated delay before requests complete, in milliseconds.
    #[serde(default)]
    pub latency_ms: Option<u64>,
}

impl AccountConfig {
    /// Returns the topic property, or `None` if topics are not configured.
    ///
    /// Setting either `topic` or `topic_writable` enables topics; the topic is
    /// writable unless `topic_writable = false`.
    pub fn topic_property(&self) -> Option<TopicProperty> {
        if self.topic.is_none() && self.topic_writable.is_none() {
            return None;
        }
        Some(TopicProperty {
            value: self.topic.clone(),
            writable: self.topic_writable.unwrap_or(true),
        })
    }

    pub fn protocol(&self) -> &str {
        self.protocol.as_deref().unwrap_or(DEFAULT_PROTOCOL)
    }
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/empathy-chat/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Chat settings.
    #[serde(default)]
    pub chat: ChatConfig,
    /// Account configurations keyed by name.
    #[serde(default)]
    pub accounts: HashMap<String, AccountConfig>,
}

/// Resolved account after merging CLI arguments and config file.
#[derive(Debug, Clone)]
pub struct ResolvedAccount {
    /// The selected account name.
    pub name: String,
    pub protocol: String,
    pub nickname: String,
    pub room: Option<String>,
    pub members: Vec<String>,
    pub topic: Option<TopicProperty>,
    pub max_message_length: usize,
    pub latency: Duration,
}

impl ResolvedAccount {
    /// Builds the loopback account settings for this account.
    pub fn loopback_config(&self) -> LoopbackConfig {
        LoopbackConfig {
            protocol: self.protocol.clone(),
            nickname: self.nickname.clone(),
            members: self.members.clone(),
            topic: self.topic.clone(),
            max_message_length: self.max_message_length,
            latency: self.latency,
        }
    }
}

/// CLI overrides that take precedence over config file values.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Account name override.
    pub account: Option<String>,
    /// Nickname override.
    pub nickname: Option<String>,
}

/// Resolves the account to chat on by merging CLI options with the config file.
///
/// # Errors
///
/// Returns an error if no account is selected, the selected account is not
/// configured, or no nickname is known.
pub fn resolve_account(
    options: &ResolveOptions,
    config_file: &ConfigFile,
) -> Result<ResolvedAccount> {
    let name = options
        .account
        .as_ref()
        .or(config_file.chat.account.as_ref())
        .cloned()
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Missing required configuration: 'account'\n\n\
                 Please provide it via:\n  \
                 - CLI option: empathy-chat chat --account <name>\n  \
                 - Config file: ~/.config/empathy-chat/config.toml"
            )
        })?;

    let account = config_file.accounts.get(&name).ok_or_else(|| {
        let mut available: Vec<_> = config_file.accounts.keys().map(String::as_str).collect();
        available.sort_unstable();
        if available.is_empty() {
            anyhow::anyhow!(
                "Account '{name}' not found\n\n\
                 No accounts configured. Add accounts to ~/.config/empathy-chat/config.toml"
            )
        } else {
            anyhow::anyhow!(
                "Account '{name}' not found\n\n\
                 Available accounts:\n  \
                 - {}",
                available.join("\n  - ")
            )
        }
    })?;

    let nickname = options
        .nickname
        .as_ref()
        .or(account.nickname.as_ref())
        .cloned()
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Missing required configuration: 'nickname'\n\n\
                 Please provide it via:\n  \
                 - CLI option: empathy-chat chat --nick <nickname>\n  \
                 - Config file: [accounts.{name}] nickname = \"...\""
            )
        })?;

    if account.members.is_empty() {
        warning!("Account '{name}' has no members configured; nickname completion is disabled");
    }

    Ok(ResolvedAccount {
        protocol: account.protocol().to_string(),
        nickname,
        room: account.room.clone(),
        members: account.members.clone(),
        topic: account.topic_property(),
        max_message_length: account
            .max_message_length
            .unwrap_or(DEFAULT_MAX_MESSAGE_LENGTH),
        latency: Duration::from_millis(account.latency_ms.unwrap_or(0)),
        name,
    })
}

/// Manages loading and saving configuration files.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a config manager for the default location.
    ///
    /// Configuration is stored at `$XDG_CONFIG_HOME/empathy-chat/config.toml`
    /// or `~/.config/empathy-chat/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::config_file()?,
        })
    }

    /// Creates a config manager for an explicit file.
    pub const fn with_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub const fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        toml::from_str(&contents).with_context(|| {
            format!(
                "Failed to parse config file: {}",
                self.config_path.display()
            )
        })
    }

    pub fn save(&self, config: &ConfigFile) -> Result<()> {
        let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;
        atomic::atomic_write(&self.config_path, &contents)
    }

    /// Loads the config file, or returns defaults if it does not exist.
    ///
    /// A file that exists but cannot be parsed is still an error.
    pub fn load_or_default(&self) -> Result<ConfigFile> {
        if !self.config_path.exists() {
            return Ok(ConfigFile::default());
        }
        self.load()
    }
}
