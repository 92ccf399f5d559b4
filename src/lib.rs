//! # empathy-chat - Terminal Chat Input Core
//!
//! `empathy-chat` turns typed lines into chat actions. Plain lines are sent as
//! messages; lines starting with `/` run slash commands. Recently sent lines
//! are kept in a small input history that can be recalled and edited.
//!
//! ## Features
//!
//! - **Slash commands**: `/clear`, `/topic`, `/join`, `/query`, `/msg`,
//!   `/nick`, `/me`, `/say` and `/help`
//! - **Input history**: the last ten lines, with edits kept while browsing
//! - **Nickname completion**: completes member nicknames at the cursor
//! - **Loopback account**: an in-process account for trying things out
//!
//! ## Quick Start
//!
//! ```bash
//! # Chat on the default account
//! empathy-chat
//!
//! # Chat on another account with a different nickname
//! empathy-chat chat --account work --nick al
//!
//! # List slash commands
//! empathy-chat commands
//! ```
//!
//! ## Configuration
//!
//! Settings are stored in `~/.config/empathy-chat/config.toml`:
//!
//! ```toml
//! [chat]
//! account = "libera"
//! nick_completion_char = ":"
//!
//! [accounts.libera]
//! nickname = "alice"
//! room = "#empathy"
//! members = ["bob", "carol"]
//! ```

/// Input history, slash commands and message dispatch.
pub mod chat;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration file management and account settings.
pub mod config;

/// File system utilities.
pub mod fs;

/// Global output configuration (quiet mode, colors, logging).
pub mod output;

/// XDG-style path utilities for configuration.
pub mod paths;

/// Terminal UI components (colors, prompt cancellation).
pub mod ui;
