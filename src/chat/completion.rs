//! Nickname completion for the input buffer.

/// Result of completing the word before the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NickCompletion {
    /// The buffer with the completed word.
    pub buffer: String,
    /// Cursor position after the completed word.
    pub cursor: usize,
    /// Every member alias that matched.
    pub candidates: Vec<String>,
}

/// Completes the word ending at `cursor` against the member aliases.
///
/// Matching ignores case. A single match replaces the word with the alias,
/// followed by `completion_char` and a space when the word starts the buffer.
/// Several matches replace the word with their longest common prefix. Returns
/// `None` when nothing matches.
pub fn complete_nick(
    buffer: &str,
    cursor: usize,
    members: &[String],
    completion_char: Option<&str>,
) -> Option<NickCompletion> {
    let cursor = clamp_to_boundary(buffer, cursor);
    let start = buffer[..cursor]
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map_or(0, |(index, c)| index + c.len_utf8());
    let word = buffer[start..cursor].to_lowercase();

    let candidates: Vec<String> = members
        .iter()
        .filter(|alias| alias.to_lowercase().starts_with(&word))
        .cloned()
        .collect();

    let mut completed = match candidates.as_slice() {
        [] => return None,
        [alias] => alias.clone(),
        [first, rest @ ..] => {
            let len = rest
                .iter()
                .map(|alias| common_prefix_len(first, alias))
                .min()
                .unwrap_or(first.len());
            first[..len].to_string()
        }
    };

    if candidates.len() == 1
        && start == 0
        && let Some(suffix) = completion_char
    {
        completed.push_str(suffix);
        completed.push(' ');
    }

    let mut result = String::with_capacity(buffer.len() + completed.len());
    result.push_str(&buffer[..start]);
    result.push_str(&completed);
    let new_cursor = result.len();
    result.push_str(&buffer[cursor..]);

    Some(NickCompletion {
        buffer: result,
        cursor: new_cursor,
        candidates,
    })
}

/// Formats candidates the way they are listed in the conversation.
pub fn format_candidates(candidates: &[String]) -> String {
    candidates.iter().map(|alias| format!("{alias} - ")).collect()
}

// Byte length of the case-insensitive common prefix, measured on `a`.
fn common_prefix_len(a: &str, b: &str) -> usize {
    a.chars()
        .zip(b.chars())
        .take_while(|(x, y)| x.to_lowercase().eq(y.to_lowercase()))
        .map(|(x, _)| x.len_utf8())
        .sum()
}

fn clamp_to_boundary(buffer: &str, cursor: usize) -> usize {
    let mut cursor = cursor.min(buffer.len());
    while !buffer.is_char_boundary(cursor) {
        cursor -= 1;
    }
    cursor
}
