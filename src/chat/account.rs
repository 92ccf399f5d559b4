//! The account/session the conversation runs on, and the settings store.
//!
//! Account operations are fire-and-forget: each one takes a [`Completion`]
//! that the account calls exactly once, possibly from another task, when the
//! request finishes.

use std::fmt;

use super::event::Message;

/// Called once with the outcome of an account request.
pub type Completion = Box<dyn FnOnce(Result<(), AccountError>) + Send + 'static>;

/// Reason a message could not be delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendError {
    Offline,
    InvalidContact,
    PermissionDenied,
    TooLong,
    NotImplemented,
    Unknown,
}

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::Offline => "offline",
            Self::InvalidContact => "invalid contact",
            Self::PermissionDenied => "permission denied",
            Self::TooLong => "too long message",
            Self::NotImplemented => "not implemented",
            Self::Unknown => "unknown",
        };
        f.write_str(reason)
    }
}

impl std::error::Error for SendError {}

/// Failure reported by an account request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    /// Sending a message failed.
    Send(SendError),
    /// The server or account refused the request.
    Rejected(String),
}

impl fmt::Display for AccountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Send(err) => write!(f, "{err}"),
            Self::Rejected(reason) => f.write_str(reason),
        }
    }
}

impl std::error::Error for AccountError {}

impl From<SendError> for AccountError {
    fn from(err: SendError) -> Self {
        Self::Send(err)
    }
}

/// The topic property of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TopicProperty {
    /// Current topic, if one is set.
    pub value: Option<String>,
    /// Whether we may change it.
    pub writable: bool,
}

/// Our typing state as shown to the other side of the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatState {
    /// Present, not typing.
    #[default]
    Active,
    /// Typing a message.
    Composing,
    /// Stopped typing without sending.
    Paused,
}

/// The account and conversation commands act on.
pub trait Account {
    /// Sends a message on the current conversation.
    fn send(&self, message: Message, done: Completion);

    /// Returns the topic property, or `None` if the conversation has no topic.
    fn topic_property(&self) -> Option<TopicProperty>;

    /// Changes the conversation topic.
    fn set_topic(&self, topic: &str, done: Completion);

    /// Asks the server to change our nickname.
    fn request_alias(&self, nickname: &str, done: Completion);

    /// Joins a chat room.
    fn join_room(&self, room_id: &str, done: Completion);

    /// Opens (or reuses) a private conversation, optionally sending a first message.
    fn open_private_chat(&self, contact_id: &str, message: Option<&str>, done: Completion);

    /// Returns the aliases of the conversation members.
    fn members(&self) -> Vec<String>;

    /// Tells the other side whether we are typing.
    fn set_chat_state(&self, state: ChatState);
}

/// Read-only user preferences.
pub trait Settings {
    /// Text appended after a nickname completed at the start of a line.
    fn nick_completion_char(&self) -> Option<String>;
}
