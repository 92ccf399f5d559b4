//! An in-process account that answers requests locally.
//!
//! Used by the terminal client when there is no real server to talk to. Sent
//! messages come back as if the server had echoed them, and requests succeed
//! or fail according to simple IRC-like rules.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tracing::debug;

use super::account::{Account, AccountError, ChatState, Completion, SendError, TopicProperty};
use super::event::{EventSender, Message};

/// Longest nickname accepted by `/nick`.
const MAX_NICKNAME_LENGTH: usize = 32;

/// Settings for a loopback account.
#[derive(Debug, Clone)]
pub struct LoopbackConfig {
    /// Protocol name; `irc` enables room name validation.
    pub protocol: String,
    pub nickname: String,
    pub members: Vec<String>,
    /// `None` when the conversation has no topic.
    pub topic: Option<TopicProperty>,
    /// Longest message body accepted, in characters.
    pub max_message_length: usize,
    /// Delay before each request completes.
    pub latency: Duration,
}

#[derive(Debug)]
struct State {
    nickname: String,
    members: Vec<String>,
    topic: Option<TopicProperty>,
    rooms: Vec<String>,
    chat_state: ChatState,
}

/// Account that serves every request from memory.
#[derive(Debug, Clone)]
pub struct LoopbackAccount {
    protocol: String,
    max_message_length: usize,
    latency: Duration,
    state: Arc<Mutex<State>>,
    events: EventSender,
}

impl LoopbackAccount {
    pub fn new(config: LoopbackConfig, events: EventSender) -> Self {
        let state = State {
            nickname: config.nickname,
            members: config.members,
            topic: config.topic,
            rooms: Vec::new(),
            chat_state: ChatState::default(),
        };
        Self {
            protocol: config.protocol,
            max_message_length: config.max_message_length,
            latency: config.latency,
            state: Arc::new(Mutex::new(state)),
            events,
        }
    }

    /// Returns our current nickname.
    pub fn nickname(&self) -> String {
        self.lock().nickname.clone()
    }

    /// Returns the rooms joined so far.
    pub fn rooms(&self) -> Vec<String> {
        self.lock().rooms.clone()
    }

    /// Returns the typing state last announced.
    pub fn chat_state(&self) -> ChatState {
        self.lock().chat_state
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `request` after the configured latency and hands its outcome to `done`.
    ///
    /// Without latency, or outside a tokio runtime, the request runs before
    /// this returns.
    fn finish<F>(&self, done: Completion, request: F)
    where
        F: FnOnce(&Self) -> Result<(), AccountError> + Send + 'static,
    {
        let handle = Handle::try_current().ok().filter(|_| !self.latency.is_zero());
        let Some(handle) = handle else {
            done(request(self));
            return;
        };

        let account = self.clone();
        handle.spawn(async move {
            tokio::time::sleep(account.latency).await;
            done(request(&account));
        });
    }

    fn validate_room(&self, room_id: &str) -> Result<(), AccountError> {
        if self.protocol == "irc" && !room_id.starts_with(['#', '&']) {
            return Err(AccountError::Rejected(format!("no such channel: {room_id}")));
        }
        Ok(())
    }
}

fn validate_nickname(nickname: &str) -> Result<(), AccountError> {
    if nickname.is_empty()
        || nickname.chars().count() > MAX_NICKNAME_LENGTH
        || nickname.chars().any(char::is_whitespace)
    {
        return Err(AccountError::Rejected(format!("erroneous nickname: {nickname}")));
    }
    Ok(())
}

impl Account for LoopbackAccount {
    fn send(&self, message: Message, done: Completion) {
        self.finish(done, move |account| {
            if message.body.chars().count() > account.max_message_length {
                return Err(SendError::TooLong.into());
            }
            let nickname = account.nickname();
            account.events.message(message.with_sender(nickname));
            Ok(())
        });
    }

    fn topic_property(&self) -> Option<TopicProperty> {
        self.lock().topic.clone()
    }

    fn set_topic(&self, topic: &str, done: Completion) {
        let topic = topic.to_string();
        self.finish(done, move |account| {
            let mut state = account.lock();
            match state.topic.as_mut() {
                Some(property) if property.writable => {
                    property.value = Some(topic.clone());
                }
                _ => return Err(SendError::PermissionDenied.into()),
            }
            drop(state);
            account.events.topic(topic);
            Ok(())
        });
    }

    fn request_alias(&self, nickname: &str, done: Completion) {
        let nickname = nickname.to_string();
        self.finish(done, move |account| {
            validate_nickname(&nickname)?;
            debug!(%nickname, "Nickname changed");
            account.lock().nickname.clone_from(&nickname);
            account.events.notice(format!("You are now known as {nickname}"));
            Ok(())
        });
    }

    fn join_room(&self, room_id: &str, done: Completion) {
        let room_id = room_id.to_string();
        self.finish(done, move |account| {
            account.validate_room(&room_id)?;
            let mut state = account.lock();
            if !state.rooms.contains(&room_id) {
                state.rooms.push(room_id.clone());
            }
            drop(state);
            account.events.notice(format!("Joined {room_id}"));
            Ok(())
        });
    }

    fn open_private_chat(&self, contact_id: &str, message: Option<&str>, done: Completion) {
        let contact_id = contact_id.to_string();
        let message = message.map(str::to_string);
        self.finish(done, move |account| {
            let state = account.lock();
            let Some(contact) = state
                .members
                .iter()
                .find(|member| member.eq_ignore_ascii_case(&contact_id))
                .cloned()
            else {
                return Err(AccountError::Rejected(format!("unknown contact: {contact_id}")));
            };
            let nickname = state.nickname.clone();
            drop(state);

            account
                .events
                .notice(format!("Opened private chat with {contact}"));
            if let Some(body) = message.filter(|body| !body.is_empty()) {
                account.events.message(Message::new(body).with_sender(nickname));
            }
            Ok(())
        });
    }

    fn members(&self) -> Vec<String> {
        self.lock().members.clone()
    }

    fn set_chat_state(&self, state: ChatState) {
        debug!(?state, "Chat state changed");
        self.lock().chat_state = state;
    }
}
