//! Subcommand implementations.

/// Account listing command handler.
pub mod accounts;

/// Chat mode command handler.
pub mod chat;

/// Configure command handler.
pub mod configure;

/// Slash command listing handler.
pub mod slash;
