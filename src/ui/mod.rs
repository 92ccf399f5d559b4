//! Terminal UI helpers shared by the chat prompt and the configure prompts.

use anyhow::Result;
use inquire::InquireError;
use inquire::ui::{Attributes, Color, RenderConfig, StyleSheet, Styled};

use crate::output;

mod style;

pub use style::Style;

/// Returns `true` when the user left a prompt with Ctrl+C or Esc.
pub const fn is_prompt_cancelled(err: &InquireError) -> bool {
    matches!(
        err,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

/// Turns a cancelled prompt into `Ok(None)`.
pub fn answer_or_cancel<T>(answer: Result<T, InquireError>) -> Result<Option<T>> {
    match answer {
        Ok(value) => Ok(Some(value)),
        Err(e) if is_prompt_cancelled(&e) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Runs a sequence of prompts, treating cancellation as a clean exit.
///
/// Prints a newline on cancellation so the shell prompt starts on its own line.
pub fn handle_prompt_cancellation<F>(f: F) -> Result<()>
where
    F: FnOnce() -> Result<()>,
{
    match f() {
        Err(e)
            if e.downcast_ref::<InquireError>()
                .is_some_and(is_prompt_cancelled) =>
        {
            println!();
            Ok(())
        }
        result => result,
    }
}

/// Prompt styling for the chat input line.
///
/// Suggestions are grey and the highlighted one purple. Without colors the
/// prompt falls back to inquire's plain rendering.
pub fn chat_render_config() -> RenderConfig<'static> {
    if output::is_no_color() {
        return RenderConfig::empty();
    }

    let prompt_style = Styled::new("❯")
        .with_fg(Color::LightBlue)
        .with_attr(Attributes::BOLD);
    let mut render_config = RenderConfig::default()
        .with_prompt_prefix(prompt_style)
        .with_answered_prompt_prefix(prompt_style);

    render_config.option = StyleSheet::new().with_fg(Color::Grey);
    render_config.selected_option = Some(StyleSheet::new().with_fg(Color::DarkMagenta));
    render_config
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_or_cancel() {
        assert_eq!(answer_or_cancel(Ok("hi")).unwrap(), Some("hi"));
        assert_eq!(
            answer_or_cancel::<String>(Err(InquireError::OperationInterrupted)).unwrap(),
            None
        );

        let err = answer_or_cancel::<String>(Err(InquireError::Custom("tty lost".into())))
            .unwrap_err();
        assert!(err.to_string().contains("tty lost"));
    }

    #[test]
    fn test_configure_cancelled_midway_is_clean() {
        let result = handle_prompt_cancellation(|| {
            let _account = answer_or_cancel(Ok("libera".to_string()))?;
            Err(InquireError::OperationCanceled.into())
        });
        assert!(result.is_ok());
    }

    #[test]
    fn test_failed_save_is_reported() {
        let result = handle_prompt_cancellation(|| anyhow::bail!("Failed to write file"));
        assert!(result.unwrap_err().to_string().contains("Failed to write file"));
    }
}
