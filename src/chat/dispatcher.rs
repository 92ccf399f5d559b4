//! Routes submitted lines to slash commands or sends them as messages.

use tracing::debug;

use super::account::Account;
use super::command::{find_command, has_second_slash, parse_args};
use super::event::{ChatView, EventReceiver, EventSender, Message};
use super::handlers::{CommandContext, send_message};
use super::history::InputHistory;

pub const UNKNOWN_COMMAND: &str = "Unknown command; see /help for the available commands";

/// Interprets submitted lines for one conversation.
pub struct Dispatcher<A> {
    account: A,
    history: InputHistory,
    events: EventSender,
    pending: EventReceiver,
}

impl<A: Account> Dispatcher<A> {
    /// Creates a dispatcher for `account`.
    ///
    /// `events` and `pending` must be the two ends of one [`super::event::channel`];
    /// the account may hold further clones of `events`.
    pub const fn new(account: A, events: EventSender, pending: EventReceiver) -> Self {
        Self {
            account,
            history: InputHistory::new(),
            events,
            pending,
        }
    }

    /// Handles a submitted line.
    ///
    /// Blank lines are ignored. Every other line is recorded in the history,
    /// then either runs the slash command it names or is sent as a message.
    pub fn send(&mut self, text: &str, view: &mut dyn ChatView) {
        if text.trim().is_empty() {
            return;
        }

        self.history.add(text, false);

        let Some(input) = text.strip_prefix('/') else {
            send_message(&self.account, &self.events, Message::new(text));
            return;
        };

        if let Some(spec) = find_command(input) {
            if let Some(guard) = spec.guard
                && let Err(notice) = guard(&self.account)
            {
                view.append_event(notice);
                return;
            }

            let args = parse_args(input, spec.max_args);
            if !spec.accepts(args.len()) {
                debug!(command = spec.name, count = args.len(), "Wrong number of arguments");
                view.append_event(&spec.usage());
                return;
            }

            let mut ctx = CommandContext {
                account: &self.account,
                view,
                events: &self.events,
            };
            (spec.handler)(&mut ctx, &args);
            return;
        }

        if !has_second_slash(input) {
            view.append_event(UNKNOWN_COMMAND);
            return;
        }

        send_message(&self.account, &self.events, Message::new(text));
    }

    /// Renders events queued by completed account requests.
    pub fn flush_events(&mut self, view: &mut dyn ChatView) -> usize {
        self.pending.drain_into(view)
    }

    /// Returns a sender for queuing events on this conversation.
    pub fn event_sender(&self) -> EventSender {
        self.events.clone()
    }

    pub const fn account(&self) -> &A {
        &self.account
    }

    pub const fn history(&self) -> &InputHistory {
        &self.history
    }

    pub const fn history_mut(&mut self) -> &mut InputHistory {
        &mut self.history
    }
}
