//! Input history with revertible edits.
//!
//! Lines are kept newest first. When the user starts walking the history, the
//! text sitting in the input buffer is staged at the head of the list so it can
//! be recalled again, and edits made to recalled lines are kept next to the
//! original text until the navigation is reverted.

use tracing::debug;

/// Maximum number of committed lines kept.
pub const HISTORY_CAPACITY: usize = 10;

/// A single line in the input history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    original_text: String,
    modified_text: Option<String>,
}

impl HistoryEntry {
    fn new(text: &str) -> Self {
        Self {
            original_text: text.to_string(),
            modified_text: None,
        }
    }

    /// Returns the edited text if there is one, the original text otherwise.
    pub fn text(&self) -> &str {
        self.modified_text.as_deref().unwrap_or(&self.original_text)
    }

    /// Returns the text the entry was created with.
    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    /// Returns `true` if the entry carries an in-progress edit.
    pub const fn is_modified(&self) -> bool {
        self.modified_text.is_some()
    }

    // An edited entry never equals a plain line.
    fn matches(&self, text: &str) -> bool {
        self.modified_text.is_none() && self.original_text == text
    }

    fn revert(&mut self) {
        self.modified_text = None;
    }

    fn update_text(&mut self, text: &str) {
        if text == self.original_text {
            self.modified_text = None;
        } else {
            self.modified_text = Some(text.to_string());
        }
    }
}

/// Shell-like history of sent lines.
///
/// While navigating, `cursor` points at the recalled entry and index 0 holds
/// the staged line.
#[derive(Debug, Default)]
pub struct InputHistory {
    entries: Vec<HistoryEntry>,
    cursor: Option<usize>,
}

impl InputHistory {
    /// Creates an empty history.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            cursor: None,
        }
    }

    /// Adds a line to the history.
    ///
    /// A committed line (`temporary == false`) replaces every identical
    /// committed line, evicts the oldest lines beyond [`HISTORY_CAPACITY`] and
    /// ends navigation. A temporary line is staged at the head and becomes the
    /// navigation cursor.
    pub fn add(&mut self, text: &str, temporary: bool) {
        if temporary {
            self.entries.insert(0, HistoryEntry::new(text));
            self.cursor = Some(0);
            return;
        }

        while let Some(index) = self.position(text, 0) {
            self.entries.remove(index);
        }
        self.entries.truncate(HISTORY_CAPACITY - 1);

        self.entries.insert(0, HistoryEntry::new(text));
        self.cursor = None;
    }

    /// Moves one step toward older lines and returns the recalled text.
    ///
    /// Stays on the oldest line once it is reached. Returns `None` only when
    /// the history is empty. Starting without a staged line stages an empty
    /// one first, so the newest line is the first one recalled.
    pub fn get_next(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            debug!("No input history, next entry is None");
            return None;
        }

        let current = match self.cursor {
            Some(current) => current,
            None => {
                self.add("", true);
                0
            }
        };
        let index = (current + 1).min(self.entries.len() - 1);
        self.cursor = Some(index);

        let text = self.entries[index].text();
        debug!(entry = text, "Returning next entry");
        Some(text)
    }

    /// Moves one step toward newer lines and returns the recalled text.
    ///
    /// Stays on the staged line once it is reached. Returns `None` when the
    /// history is empty or no navigation is in progress.
    pub fn get_prev(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            debug!("No input history, previous entry is None");
            return None;
        }

        let index = self.cursor?.saturating_sub(1);
        self.cursor = Some(index);

        let text = self.entries[index].text();
        debug!(entry = text, "Returning previous entry");
        Some(text)
    }

    /// Synchronizes the history with the live buffer content.
    ///
    /// Outside navigation the text is staged. During navigation it becomes the
    /// edit of the recalled line, or drops the edit when it matches the
    /// original text again.
    pub fn update_from_buffer(&mut self, text: &str) {
        match self.cursor {
            None => self.add(text, true),
            Some(index) => self.entries[index].update_text(text),
        }
    }

    /// Abandons the current navigation.
    ///
    /// Removes the staged line, drops every in-progress edit and removes a
    /// duplicate of the line the cursor was on, if one exists.
    pub fn revert(&mut self) {
        let Some(cursor) = self.cursor.take() else {
            debug!("No input history navigation to revert");
            return;
        };

        self.entries.remove(0);
        self.entries.iter_mut().for_each(HistoryEntry::revert);
        if cursor == 0 {
            return;
        }

        // Indices shifted by the removal of the staged line.
        let current = cursor - 1;
        let text = self.entries[current].original_text.clone();

        match self.position(&text, 0) {
            Some(first) if first < current => {
                self.entries.remove(current);
            }
            _ => {
                if let Some(later) = self.position(&text, current + 1) {
                    self.entries.remove(later);
                }
            }
        }
    }

    /// Returns `true` while the user is walking the history.
    pub const fn is_navigating(&self) -> bool {
        self.cursor.is_some()
    }

    /// Returns the text under the cursor, if navigating.
    pub fn current(&self) -> Option<&str> {
        self.cursor
            .and_then(|index| self.entries.get(index))
            .map(HistoryEntry::text)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the effective texts, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(HistoryEntry::text)
    }

    fn position(&self, text: &str, from: usize) -> Option<usize> {
        self.entries
            .get(from..)?
            .iter()
            .position(|entry| entry.matches(text))
            .map(|offset| from + offset)
    }
}
