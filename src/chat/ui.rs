//! Chat mode UI components.

use crate::ui::Style;

use super::event::{ChatView, Message, MessageKind};
use super::session::SessionConfig;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Renders the conversation on the terminal.
#[derive(Debug, Default)]
pub struct TerminalView;

impl TerminalView {
    pub const fn new() -> Self {
        Self
    }
}

impl ChatView for TerminalView {
    fn append_event(&mut self, text: &str) {
        println!("{}", Style::notice(text));
    }

    fn append_message(&mut self, message: &Message) {
        println!("{}", format_message(message));
    }

    fn clear(&mut self) {
        print!("\x1B[2J\x1B[1;1H");
    }
}

fn format_message(message: &Message) -> String {
    let sender = message.sender.as_deref().unwrap_or("");
    match message.kind {
        MessageKind::Normal => format!("<{}> {}", Style::nick(sender), message.body),
        MessageKind::Action => format!("* {} {}", Style::nick(sender), message.body),
    }
}

pub fn print_header(config: &SessionConfig) {
    println!(
        "{} {} - {} as {}",
        Style::header("empathy-chat"),
        Style::version(format!("v{VERSION}")),
        Style::value(&config.account.name),
        Style::nick(&config.account.nickname)
    );
    if let Some(room) = &config.account.room {
        println!("  {}  {}", Style::label("room"), Style::value(room));
    }
    if let Some(topic) = config.account.topic.as_ref().and_then(|t| t.value.as_ref()) {
        println!("  {} {}", Style::label("topic"), topic);
    }
    println!();
}

pub fn print_goodbye() {
    println!("{}", Style::success("Goodbye!"));
}
