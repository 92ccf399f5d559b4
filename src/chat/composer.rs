//! The input buffer and the keys that act on it.
//!
//! Every buffer change also drives the typing state. A non-empty buffer
//! announces [`ChatState::Composing`], a quiet spell of
//! [`COMPOSING_STOP_TIMEOUT`] drops it to [`ChatState::Paused`], and an empty
//! buffer (including after a send) returns to [`ChatState::Active`].

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

use super::account::{Account, ChatState, Settings};
use super::completion::{complete_nick, format_candidates};
use super::dispatcher::Dispatcher;
use super::event::ChatView;

/// How long typing may stop before the state drops to paused.
pub const COMPOSING_STOP_TIMEOUT: Duration = Duration::from_secs(5);

enum Typing {
    Idle,
    /// Holds the pause timer; `None` outside a tokio runtime, where the state
    /// never pauses.
    Composing(Option<JoinHandle<()>>),
}

/// Text being composed, wired to the conversation's dispatcher.
pub struct Composer<A> {
    buffer: String,
    dispatcher: Dispatcher<A>,
    typing: Typing,
    composing_timeout: Duration,
}

impl<A: Account + Clone + Send + 'static> Composer<A> {
    pub const fn new(dispatcher: Dispatcher<A>) -> Self {
        Self {
            buffer: String::new(),
            dispatcher,
            typing: Typing::Idle,
            composing_timeout: COMPOSING_STOP_TIMEOUT,
        }
    }

    /// Overrides [`COMPOSING_STOP_TIMEOUT`].
    #[must_use]
    pub fn with_composing_timeout(mut self, timeout: Duration) -> Self {
        self.composing_timeout = timeout;
        self
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
        self.buffer_changed();
    }

    pub fn push_str(&mut self, text: &str) {
        self.buffer.push_str(text);
        self.buffer_changed();
    }

    /// Replaces the buffer with the next older history line.
    pub fn history_older(&mut self) {
        let history = self.dispatcher.history_mut();
        history.update_from_buffer(&self.buffer);
        self.buffer = history.get_next().unwrap_or_default().to_string();
        self.buffer_changed();
    }

    /// Replaces the buffer with the next newer history line.
    pub fn history_newer(&mut self) {
        let history = self.dispatcher.history_mut();
        history.update_from_buffer(&self.buffer);
        self.buffer = history.get_prev().unwrap_or_default().to_string();
        self.buffer_changed();
    }

    /// Sends the buffer, dropping any history edits made while composing it.
    pub fn submit(&mut self, view: &mut dyn ChatView) {
        let text = std::mem::take(&mut self.buffer);
        self.dispatcher.history_mut().revert();
        self.dispatcher.send(&text, view);
        self.buffer_changed();
    }

    /// Discards the buffer and any history edits.
    pub fn cancel(&mut self) {
        self.buffer.clear();
        self.dispatcher.history_mut().revert();
        self.buffer_changed();
    }

    /// Completes the nickname at the end of the buffer.
    ///
    /// When several members match, they are listed in the view.
    pub fn complete(&mut self, settings: &dyn Settings, view: &mut dyn ChatView) {
        let members = self.dispatcher.account().members();
        let completion_char = settings.nick_completion_char();
        let Some(completion) = complete_nick(
            &self.buffer,
            self.buffer.len(),
            &members,
            completion_char.as_deref(),
        ) else {
            return;
        };

        if completion.candidates.len() > 1 {
            view.append_event(&format_candidates(&completion.candidates));
        }
        self.buffer = completion.buffer;
        self.buffer_changed();
    }

    /// Renders events queued by completed account requests.
    pub fn flush_events(&mut self, view: &mut dyn ChatView) -> usize {
        self.dispatcher.flush_events(view)
    }

    pub const fn dispatcher(&self) -> &Dispatcher<A> {
        &self.dispatcher
    }

    pub const fn dispatcher_mut(&mut self) -> &mut Dispatcher<A> {
        &mut self.dispatcher
    }

    fn buffer_changed(&mut self) {
        if self.buffer.is_empty() {
            self.composing_stop();
        } else {
            self.composing_start();
        }
    }

    fn composing_start(&mut self) {
        // A fired timer has already announced the pause.
        let announced = match &self.typing {
            Typing::Idle => false,
            Typing::Composing(timer) => timer.as_ref().is_none_or(|t| !t.is_finished()),
        };
        if let Typing::Composing(Some(timer)) = &self.typing {
            timer.abort();
        }

        if !announced {
            self.dispatcher.account().set_chat_state(ChatState::Composing);
        }
        self.typing = Typing::Composing(self.spawn_pause_timer());
    }

    fn composing_stop(&mut self) {
        if let Typing::Composing(Some(timer)) = std::mem::replace(&mut self.typing, Typing::Idle) {
            timer.abort();
        }
        self.dispatcher.account().set_chat_state(ChatState::Active);
    }

    fn spawn_pause_timer(&self) -> Option<JoinHandle<()>> {
        let handle = Handle::try_current().ok()?;
        let account = self.dispatcher.account().clone();
        let timeout = self.composing_timeout;
        Some(handle.spawn(async move {
            tokio::time::sleep(timeout).await;
            debug!(?timeout, "Stopped composing");
            account.set_chat_state(ChatState::Paused);
        }))
    }
}

impl<A> Drop for Composer<A> {
    fn drop(&mut self) {
        if let Typing::Composing(Some(timer)) = &self.typing {
            timer.abort();
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::chat::dispatcher::tests::{RecordingAccount, RecordingView};
    use crate::chat::event;

    const SHORT_TIMEOUT: Duration = Duration::from_millis(200);

    struct Colon;

    impl Settings for Colon {
        fn nick_completion_char(&self) -> Option<String> {
            Some(":".to_string())
        }
    }

    fn composer() -> Composer<RecordingAccount> {
        let (events, pending) = event::channel();
        Composer::new(Dispatcher::new(RecordingAccount::default(), events, pending))
    }

    fn send_lines(composer: &mut Composer<RecordingAccount>, lines: &[&str]) {
        let mut view = RecordingView::default();
        for line in lines {
            composer.set_text(*line);
            composer.submit(&mut view);
        }
    }

    fn history(composer: &Composer<RecordingAccount>) -> Vec<String> {
        composer
            .dispatcher()
            .history()
            .entries()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_submit_sends_and_clears_buffer() {
        let mut composer = composer();
        send_lines(&mut composer, &["hello"]);

        assert_eq!(composer.text(), "");
        assert_eq!(composer.dispatcher().account().calls(), vec!["send hello"]);
        assert_eq!(history(&composer), vec!["hello"]);
    }

    #[test]
    fn test_walk_history_and_back() {
        let mut composer = composer();
        send_lines(&mut composer, &["first", "second"]);

        composer.set_text("draft");
        composer.history_older();
        assert_eq!(composer.text(), "second");
        composer.history_older();
        assert_eq!(composer.text(), "first");
        composer.history_older();
        assert_eq!(composer.text(), "first");

        composer.history_newer();
        assert_eq!(composer.text(), "second");
        composer.history_newer();
        assert_eq!(composer.text(), "draft");
    }

    #[test]
    fn test_newer_without_navigation_keeps_buffer() {
        let mut composer = composer();
        send_lines(&mut composer, &["first"]);

        composer.set_text("typing");
        composer.history_newer();
        assert_eq!(composer.text(), "typing");
    }

    #[test]
    fn test_edits_survive_navigation_until_submit() {
        let mut composer = composer();
        send_lines(&mut composer, &["first", "second"]);

        composer.history_older();
        composer.set_text("second, edited");
        composer.history_older();
        composer.history_newer();
        assert_eq!(composer.text(), "second, edited");

        let mut view = RecordingView::default();
        composer.submit(&mut view);

        assert_eq!(history(&composer), vec!["second, edited", "second", "first"]);
    }

    #[test]
    fn test_resending_recalled_line_moves_it_to_front() {
        let mut composer = composer();
        send_lines(&mut composer, &["first", "second"]);

        composer.history_older();
        composer.history_older();
        assert_eq!(composer.text(), "first");

        let mut view = RecordingView::default();
        composer.submit(&mut view);
        assert_eq!(history(&composer), vec!["first", "second"]);
    }

    #[test]
    fn test_cancel_discards_edits() {
        let mut composer = composer();
        send_lines(&mut composer, &["first"]);

        composer.set_text("draft");
        composer.history_older();
        composer.set_text("first, edited");
        composer.cancel();

        assert_eq!(composer.text(), "");
        assert!(!composer.dispatcher().history().is_navigating());
        assert_eq!(history(&composer), vec!["first"]);
    }

    #[test]
    fn test_history_on_empty_composer() {
        let mut composer = composer();
        composer.history_older();
        assert_eq!(composer.text(), "");
        composer.history_newer();
        assert_eq!(composer.text(), "");
    }

    #[test]
    fn test_complete_nick_at_line_start() {
        let mut composer = composer();
        let mut view = RecordingView::default();

        composer.set_text("b");
        composer.complete(&Colon, &mut view);

        assert_eq!(composer.text(), "bob: ");
        assert!(view.events.is_empty());
    }

    // Typing state

    #[test]
    fn test_typing_announces_composing_once() {
        let mut composer = composer();
        composer.set_text("h");
        composer.push_str("i");
        composer.set_text("hi there");

        let states = composer.dispatcher().account().states();
        assert_eq!(states, vec![ChatState::Composing]);
    }

    #[test]
    fn test_emptying_buffer_returns_to_active() {
        let mut composer = composer();
        composer.set_text("oops");
        composer.set_text("");
        composer.set_text("again");

        assert_eq!(
            composer.dispatcher().account().states(),
            vec![ChatState::Composing, ChatState::Active, ChatState::Composing]
        );
    }

    #[test]
    fn test_submit_returns_to_active_after_sending() {
        let mut composer = composer();
        send_lines(&mut composer, &["hello"]);

        let account = composer.dispatcher().account();
        assert_eq!(account.calls(), vec!["send hello"]);
        assert_eq!(account.states(), vec![ChatState::Composing, ChatState::Active]);
    }

    #[test]
    fn test_history_recall_is_typing() {
        let mut composer = composer();
        send_lines(&mut composer, &["first"]);

        composer.history_older();
        composer.cancel();

        assert_eq!(
            composer.dispatcher().account().states(),
            vec![
                ChatState::Composing,
                ChatState::Active,
                ChatState::Composing,
                ChatState::Active
            ]
        );
    }

    #[tokio::test]
    async fn test_quiet_spell_pauses_then_typing_resumes() {
        let mut composer = composer().with_composing_timeout(SHORT_TIMEOUT);
        let account = composer.dispatcher().account().clone();

        composer.set_text("h");
        tokio::time::sleep(SHORT_TIMEOUT * 2).await;
        assert_eq!(account.states(), vec![ChatState::Composing, ChatState::Paused]);

        composer.push_str("i");
        assert_eq!(
            account.states(),
            vec![ChatState::Composing, ChatState::Paused, ChatState::Composing]
        );

        let mut view = RecordingView::default();
        composer.submit(&mut view);
        tokio::time::sleep(SHORT_TIMEOUT * 2).await;

        assert_eq!(
            account.states(),
            vec![
                ChatState::Composing,
                ChatState::Paused,
                ChatState::Composing,
                ChatState::Active
            ]
        );
    }

    #[tokio::test]
    async fn test_typing_restarts_pause_timer() {
        let mut composer = composer().with_composing_timeout(SHORT_TIMEOUT);
        let account = composer.dispatcher().account().clone();

        composer.set_text("h");
        tokio::time::sleep(SHORT_TIMEOUT * 3 / 5).await;
        composer.push_str("i");
        tokio::time::sleep(SHORT_TIMEOUT * 3 / 5).await;
        assert_eq!(account.states(), vec![ChatState::Composing]);

        tokio::time::sleep(SHORT_TIMEOUT).await;
        assert_eq!(account.states(), vec![ChatState::Composing, ChatState::Paused]);
    }
}
