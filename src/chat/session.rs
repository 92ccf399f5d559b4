use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use inquire::Text;
use inquire::autocompletion::{Autocomplete, Replacement};
use tracing::debug;

use super::account::Account;
use super::command::ChatCompleter;
use super::composer::Composer;
use super::dispatcher::Dispatcher;
use super::event::{self, ChatView, Message};
use super::loopback::LoopbackAccount;
use super::ui::{self, TerminalView};
use crate::config::{ChatConfig, ResolvedAccount};
use crate::ui::{answer_or_cancel, chat_render_config};

/// Configuration for a chat session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// The account to chat on.
    pub account: ResolvedAccount,
    /// Chat settings from the config file.
    pub chat: ChatConfig,
}

impl SessionConfig {
    pub const fn new(account: ResolvedAccount, chat: ChatConfig) -> Self {
        Self { account, chat }
    }
}

type SharedComposer = Rc<RefCell<Composer<LoopbackAccount>>>;

/// An interactive chat session on a loopback account.
///
/// Provides a REPL-style interface where each line is either a message or a
/// slash command.
pub struct ChatSession {
    config: SessionConfig,
    composer: SharedComposer,
    view: TerminalView,
}

impl ChatSession {
    /// Creates a new chat session with the given configuration.
    pub fn new(config: SessionConfig) -> Self {
        let (events, pending) = event::channel();
        let account = LoopbackAccount::new(config.account.loopback_config(), events.clone());
        let dispatcher = Dispatcher::new(account, events, pending);

        Self {
            config,
            composer: Rc::new(RefCell::new(Composer::new(dispatcher))),
            view: TerminalView::new(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        ui::print_header(&self.config);
        let render_config = chat_render_config();

        loop {
            self.composer.borrow_mut().flush_events(&mut self.view);

            let answer = Text::new("")
                .with_render_config(render_config)
                .with_autocomplete(self.line_editor())
                .with_help_message(
                    "Type a message or /help, Tab recalls history on an empty line, Ctrl+C to quit",
                )
                .prompt();

            let Some(line) = answer_or_cancel(answer)? else {
                println!(); // Clear line before goodbye message
                self.composer.borrow_mut().cancel();
                break;
            };

            self.submit(line);
            // Let zero-latency completions queue their events before the next drain.
            tokio::task::yield_now().await;
        }

        let flushed = self.composer.borrow_mut().flush_events(&mut self.view);
        debug!(flushed, "Session finished");
        ui::print_goodbye();
        Ok(())
    }

    fn submit(&mut self, line: String) {
        let mut composer = self.composer.borrow_mut();
        composer.set_text(line);
        composer.submit(&mut self.view);
    }

    fn line_editor(&self) -> LineEditor {
        let composer = self.composer.borrow();
        let dispatcher = composer.dispatcher();
        let commands = ChatCompleter::new(
            dispatcher.account().members(),
            self.config.chat.nick_completion_char.clone(),
        )
        .with_history(dispatcher.history().entries());

        LineEditor {
            composer: Rc::clone(&self.composer),
            settings: self.config.chat.clone(),
            commands,
        }
    }
}

/// Prompt completer that keeps the composer in step with the typed line.
///
/// Each keystroke updates the composer buffer, which drives the typing state.
/// Tab on an empty line, or while a recalled line is shown, recalls the next
/// older history line with any edits kept. Otherwise Tab completes the
/// highlighted suggestion, a slash command or a nickname.
#[derive(Clone)]
struct LineEditor {
    composer: SharedComposer,
    settings: ChatConfig,
    commands: ChatCompleter,
}

impl Autocomplete for LineEditor {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, inquire::CustomUserError> {
        {
            let mut composer = self.composer.borrow_mut();
            if composer.text() != input {
                composer.set_text(input);
            }
        }
        self.commands.get_suggestions(input)
    }

    fn get_completion(
        &mut self,
        input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, inquire::CustomUserError> {
        if highlighted_suggestion.is_some() || input.starts_with('/') {
            return self.commands.get_completion(input, highlighted_suggestion);
        }

        let mut composer = self.composer.borrow_mut();
        composer.set_text(input);
        if input.is_empty() || composer.dispatcher().history().is_navigating() {
            composer.history_older();
        } else {
            // The candidates are already on screen as suggestions.
            composer.complete(&self.settings, &mut Suggestions);
        }
        Ok(Some(composer.text().to_string()))
    }
}

/// Drops notices raised while the prompt owns the terminal.
struct Suggestions;

impl ChatView for Suggestions {
    fn append_event(&mut self, text: &str) {
        debug!(text, "Completion notice");
    }

    fn append_message(&mut self, _message: &Message) {}

    fn clear(&mut self) {}
}
