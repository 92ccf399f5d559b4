//! Built-in command handlers.
//!
//! Handlers run after the arguments have been checked against the command's
//! arity, so the argument patterns below only fail on a table mistake.

use tracing::debug;

use super::account::{Account, Completion};
use super::command::{COMMANDS, lookup};
use super::event::{ChatView, EventSender, Message};

pub const TOPIC_UNSUPPORTED: &str = "Topic not supported on this conversation";
pub const TOPIC_DENIED: &str = "You are not allowed to change the topic";
pub const PRIVATE_CHAT_FAILED: &str = "Failed to open private chat";

/// What a handler may act on.
pub struct CommandContext<'a> {
    pub account: &'a dyn Account,
    pub view: &'a mut dyn ChatView,
    pub events: &'a EventSender,
}

/// Builds a completion that queues `notice` if the request fails.
pub fn notify_on_failure(events: &EventSender, notice: String) -> Completion {
    let events = events.clone();
    Box::new(move |result| {
        if let Err(err) = result {
            debug!(%err, "Account request failed");
            events.notice(notice);
        }
    })
}

/// Sends `message`, reporting a delivery failure as a notice.
pub fn send_message(account: &dyn Account, events: &EventSender, message: Message) {
    let body = message.body.clone();
    let events = events.clone();
    account.send(
        message,
        Box::new(move |result| {
            if let Err(err) = result {
                events.notice(format!("Error sending message '{body}': {err}"));
            }
        }),
    );
}

pub fn clear(ctx: &mut CommandContext<'_>, _args: &[String]) {
    ctx.view.clear();
}

pub fn topic_guard(account: &dyn Account) -> Result<(), &'static str> {
    match account.topic_property() {
        None => Err(TOPIC_UNSUPPORTED),
        Some(property) if !property.writable => Err(TOPIC_DENIED),
        Some(_) => Ok(()),
    }
}

pub fn topic(ctx: &mut CommandContext<'_>, args: &[String]) {
    let [_, topic] = args else { return };
    ctx.account.set_topic(
        topic,
        notify_on_failure(ctx.events, "Failed to change the topic".to_string()),
    );
}

pub fn join(ctx: &mut CommandContext<'_>, args: &[String]) {
    let [_, rooms] = args else { return };
    for room in rooms.split([',', ' ']).filter(|room| !room.is_empty()) {
        ctx.account.join_room(
            room,
            notify_on_failure(ctx.events, format!("Failed to join chat room '{room}'")),
        );
    }
}

/// Handles both `/query` and `/msg`.
pub fn query(ctx: &mut CommandContext<'_>, args: &[String]) {
    let (contact, message) = match args {
        [_, contact] => (contact, None),
        [_, contact, message] => (contact, Some(message.as_str())),
        _ => return,
    };
    ctx.account.open_private_chat(
        contact,
        message,
        notify_on_failure(ctx.events, PRIVATE_CHAT_FAILED.to_string()),
    );
}

pub fn nick(ctx: &mut CommandContext<'_>, args: &[String]) {
    let [_, nickname] = args else { return };
    ctx.account.request_alias(
        nickname,
        notify_on_failure(
            ctx.events,
            format!("Failed to change nickname to '{nickname}'"),
        ),
    );
}

pub fn me(ctx: &mut CommandContext<'_>, args: &[String]) {
    let [_, text] = args else { return };
    send_message(ctx.account, ctx.events, Message::action(text.as_str()));
}

pub fn say(ctx: &mut CommandContext<'_>, args: &[String]) {
    let [_, text] = args else { return };
    send_message(ctx.account, ctx.events, Message::new(text.as_str()));
}

pub fn help(ctx: &mut CommandContext<'_>, args: &[String]) {
    let Some(name) = args.get(1) else {
        for spec in COMMANDS {
            ctx.view.append_event(spec.help);
        }
        return;
    };

    match lookup(name) {
        Some(spec) => ctx.view.append_event(&spec.usage()),
        None => ctx.view.append_event("Unknown command"),
    }
}
