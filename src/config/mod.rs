mod manager;

pub use manager::{
    AccountConfig, ChatConfig, ConfigFile, ConfigManager, DEFAULT_MAX_MESSAGE_LENGTH,
    DEFAULT_PROTOCOL, ResolveOptions, ResolvedAccount, resolve_account,
};
