//! Config priority contract tests.
//!
//! These tests verify that CLI options take priority over config file settings.
//! Priority order (highest to lowest):
//! 1. CLI arguments
//! 2. Config file defaults
//! 3. Built-in defaults

use std::collections::HashMap;
use std::time::Duration;

use empathy_chat::config::{
    AccountConfig, ChatConfig, ConfigFile, DEFAULT_MAX_MESSAGE_LENGTH, ResolveOptions,
    resolve_account,
};

fn make_config_with_defaults() -> ConfigFile {
    let mut accounts = HashMap::new();
    accounts.insert(
        "libera".to_string(),
        AccountConfig {
            nickname: Some("config_nick".to_string()),
            members: vec!["bob".to_string()],
            ..Default::default()
        },
    );
    accounts.insert(
        "work".to_string(),
        AccountConfig {
            protocol: Some("jabber".to_string()),
            nickname: Some("work_nick".to_string()),
            members: vec!["dave".to_string()],
            max_message_length: Some(100),
            latency_ms: Some(20),
            ..Default::default()
        },
    );

    ConfigFile {
        chat: ChatConfig {
            account: Some("libera".to_string()),
            nick_completion_char: None,
        },
        accounts,
    }
}

#[test]
fn test_cli_account_overrides_config_account() {
    let config = make_config_with_defaults();
    let options = ResolveOptions {
        account: Some("work".to_string()),
        nickname: None,
    };

    let resolved = resolve_account(&options, &config).unwrap();

    assert_eq!(resolved.name, "work");
    assert_eq!(resolved.protocol, "jabber");
    assert_eq!(resolved.nickname, "work_nick");
}

#[test]
fn test_cli_nickname_overrides_account_nickname() {
    let config = make_config_with_defaults();
    let options = ResolveOptions {
        account: None,
        nickname: Some("cli_nick".to_string()),
    };

    let resolved = resolve_account(&options, &config).unwrap();

    assert_eq!(resolved.name, "libera");
    assert_eq!(resolved.nickname, "cli_nick");
}

#[test]
fn test_config_used_when_cli_not_specified() {
    let config = make_config_with_defaults();

    let resolved = resolve_account(&ResolveOptions::default(), &config).unwrap();

    assert_eq!(resolved.name, "libera");
    assert_eq!(resolved.nickname, "config_nick");
    assert_eq!(resolved.members, vec!["bob"]);
}

#[test]
fn test_builtin_defaults_fill_missing_values() {
    let config = make_config_with_defaults();

    let resolved = resolve_account(&ResolveOptions::default(), &config).unwrap();

    assert_eq!(resolved.protocol, "irc");
    assert_eq!(resolved.max_message_length, DEFAULT_MAX_MESSAGE_LENGTH);
    assert_eq!(resolved.latency, Duration::ZERO);
    assert!(resolved.topic.is_none());
}

#[test]
fn test_account_values_override_builtin_defaults() {
    let config = make_config_with_defaults();
    let options = ResolveOptions {
        account: Some("work".to_string()),
        nickname: None,
    };

    let resolved = resolve_account(&options, &config).unwrap();

    assert_eq!(resolved.max_message_length, 100);
    assert_eq!(resolved.latency, Duration::from_millis(20));
}
