//! The chat input core: history, slash commands and message dispatch.
//!
//! [`Dispatcher`] interprets submitted lines and [`Composer`] owns the text
//! being typed. Requests go to an [`Account`]; their failures come back as
//! [`ChatEvent`]s rendered on a [`ChatView`].

mod account;
/// Slash command table, parsing and autocomplete.
pub mod command;
mod completion;
mod composer;
mod dispatcher;
mod event;
mod handlers;
mod history;
mod loopback;
mod session;
mod ui;

pub use account::{
    Account, AccountError, ChatState, Completion, SendError, Settings, TopicProperty,
};
pub use command::{COMMANDS, ChatCompleter, CommandSpec};
pub use completion::{NickCompletion, complete_nick, format_candidates};
pub use composer::{COMPOSING_STOP_TIMEOUT, Composer};
pub use dispatcher::{Dispatcher, UNKNOWN_COMMAND};
pub use event::{
    ChatEvent, ChatView, EventReceiver, EventSender, Message, MessageKind, channel, render,
};
pub use handlers::{CommandContext, PRIVATE_CHAT_FAILED, TOPIC_DENIED, TOPIC_UNSUPPORTED};
pub use history::{HISTORY_CAPACITY, HistoryEntry, InputHistory};
pub use loopback::{LoopbackAccount, LoopbackConfig};
pub use session::{ChatSession, SessionConfig};
pub use ui::TerminalView;
