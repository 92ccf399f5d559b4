//! Messages, chat events and the view they are rendered into.

use tokio::sync::mpsc;
use tracing::debug;

/// How a message is presented to the other side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageKind {
    /// A regular text message.
    #[default]
    Normal,
    /// An IRC-style `/me` action.
    Action,
}

/// A chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Nickname of the sender, `None` for a message we are about to send.
    pub sender: Option<String>,
    pub body: String,
    pub kind: MessageKind,
}

impl Message {
    /// Creates a normal message.
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            sender: None,
            body: body.into(),
            kind: MessageKind::Normal,
        }
    }

    /// Creates an action message.
    pub fn action(body: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Action,
            ..Self::new(body)
        }
    }

    #[must_use]
    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }
}

/// Something that happened in the conversation after the fact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// A system notice, e.g. a failure reported by the account.
    Notice(String),
    /// A message sent or received on the conversation.
    Message(Message),
    /// The conversation topic changed.
    Topic(String),
}

/// The conversation view.
pub trait ChatView {
    /// Shows a system notice.
    fn append_event(&mut self, text: &str);

    /// Shows a message.
    fn append_message(&mut self, message: &Message);

    /// Removes everything shown so far.
    fn clear(&mut self);

    /// Shows a topic change.
    fn set_topic(&mut self, topic: &str) {
        self.append_event(&format!("Topic set to: {topic}"));
    }
}

/// Creates a connected event sender and receiver.
pub fn channel() -> (EventSender, EventReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSender(tx), EventReceiver(rx))
}

/// Cloneable handle used by completions and accounts to queue events.
#[derive(Debug, Clone)]
pub struct EventSender(mpsc::UnboundedSender<ChatEvent>);

impl EventSender {
    pub fn send(&self, event: ChatEvent) {
        if self.0.send(event).is_err() {
            debug!("Event receiver dropped, discarding event");
        }
    }

    pub fn notice(&self, text: impl Into<String>) {
        self.send(ChatEvent::Notice(text.into()));
    }

    pub fn message(&self, message: Message) {
        self.send(ChatEvent::Message(message));
    }

    pub fn topic(&self, topic: impl Into<String>) {
        self.send(ChatEvent::Topic(topic.into()));
    }
}

/// Receiving end of the event queue.
#[derive(Debug)]
pub struct EventReceiver(mpsc::UnboundedReceiver<ChatEvent>);

impl EventReceiver {
    /// Returns the next queued event without waiting.
    pub fn try_next(&mut self) -> Option<ChatEvent> {
        self.0.try_recv().ok()
    }

    /// Waits for the next event.
    pub async fn next(&mut self) -> Option<ChatEvent> {
        self.0.recv().await
    }

    /// Renders every queued event into `view` and returns how many there were.
    pub fn drain_into(&mut self, view: &mut dyn ChatView) -> usize {
        let mut count = 0;
        while let Some(event) = self.try_next() {
            render(view, &event);
            count += 1;
        }
        count
    }
}

/// Renders a single event into `view`.
pub fn render(view: &mut dyn ChatView, event: &ChatEvent) {
    match event {
        ChatEvent::Notice(text) => view.append_event(text),
        ChatEvent::Message(message) => view.append_message(message),
        ChatEvent::Topic(topic) => view.set_topic(topic),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Lines(Vec<String>);

    impl ChatView for Lines {
        fn append_event(&mut self, text: &str) {
            self.0.push(format!("event: {text}"));
        }

        fn append_message(&mut self, message: &Message) {
            self.0.push(format!("message: {}", message.body));
        }

        fn clear(&mut self) {
            self.0.clear();
        }
    }

    #[test]
    fn test_message_constructors() {
        let message = Message::new("hi");
        assert_eq!(message.kind, MessageKind::Normal);
        assert!(message.sender.is_none());

        let action = Message::action("waves").with_sender("alice");
        assert_eq!(action.kind, MessageKind::Action);
        assert_eq!(action.sender.as_deref(), Some("alice"));
        assert_eq!(action.body, "waves");
    }

    #[test]
    fn test_drain_renders_in_order() {
        let (tx, mut rx) = channel();
        tx.notice("first");
        tx.message(Message::new("second"));
        tx.topic("third");

        let mut view = Lines::default();
        assert_eq!(rx.drain_into(&mut view), 3);
        assert_eq!(
            view.0,
            vec![
                "event: first",
                "message: second",
                "event: Topic set to: third"
            ]
        );
        assert_eq!(rx.drain_into(&mut view), 0);
    }

    #[test]
    fn test_send_after_receiver_dropped() {
        let (tx, rx) = channel();
        drop(rx);
        tx.notice("nobody listens");
    }
}
