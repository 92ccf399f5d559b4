use std::fmt;

use inquire::autocompletion::{Autocomplete, Replacement};
use tracing::debug;

use super::account::Account;
use super::completion::complete_nick;
use super::handlers::{self, CommandContext};

/// Runs a command with its parsed arguments.
pub type Handler = fn(&mut CommandContext<'_>, &[String]);

/// Checks whether a command can be used on the current conversation at all.
/// Returns the notice to show when it cannot.
pub type Guard = fn(&dyn Account) -> Result<(), &'static str>;

/// A built-in slash command.
#[derive(Clone, Copy)]
pub struct CommandSpec {
    /// Keyword after the slash, matched case-insensitively.
    pub name: &'static str,
    /// Fewest tokens accepted, command name included.
    pub min_args: usize,
    /// Most tokens accepted, command name included.
    pub max_args: usize,
    pub handler: Handler,
    /// Checked before arity, when present.
    pub guard: Option<Guard>,
    pub help: &'static str,
}

impl CommandSpec {
    /// Returns `true` if `count` tokens are within the accepted range.
    pub const fn accepts(&self, count: usize) -> bool {
        count >= self.min_args && count <= self.max_args
    }

    /// Returns the usage line shown when the arguments do not fit.
    pub fn usage(&self) -> String {
        format!("Usage: {}", self.help)
    }

    /// Returns the help text without the leading synopsis.
    pub fn summary(&self) -> &'static str {
        self.help
            .split_once(": ")
            .map_or(self.help, |(_, description)| description)
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("min_args", &self.min_args)
            .field("max_args", &self.max_args)
            .finish_non_exhaustive()
    }
}

/// Built-in commands, in matching order.
pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "clear",
        min_args: 1,
        max_args: 1,
        handler: handlers::clear,
        guard: None,
        help: "/clear: clear all messages from the current conversation",
    },
    CommandSpec {
        name: "topic",
        min_args: 2,
        max_args: 2,
        handler: handlers::topic,
        guard: Some(handlers::topic_guard),
        help: "/topic <topic>: set the topic of the current conversation",
    },
    CommandSpec {
        name: "join",
        min_args: 2,
        max_args: 2,
        handler: handlers::join,
        guard: None,
        help: "/join <chat room ID>: join a new chat room",
    },
    CommandSpec {
        name: "j",
        min_args: 2,
        max_args: 2,
        handler: handlers::join,
        guard: None,
        help: "/j <chat room ID>: join a new chat room",
    },
    CommandSpec {
        name: "query",
        min_args: 2,
        max_args: 3,
        handler: handlers::query,
        guard: None,
        help: "/query <contact ID> [<message>]: open a private chat",
    },
    CommandSpec {
        name: "msg",
        min_args: 3,
        max_args: 3,
        handler: handlers::query,
        guard: None,
        help: "/msg <contact ID> <message>: open a private chat",
    },
    CommandSpec {
        name: "nick",
        min_args: 2,
        max_args: 2,
        handler: handlers::nick,
        guard: None,
        help: "/nick <nickname>: change your nickname on the current server",
    },
    CommandSpec {
        name: "me",
        min_args: 2,
        max_args: 2,
        handler: handlers::me,
        guard: None,
        help: "/me <message>: send an ACTION message to the current conversation",
    },
    CommandSpec {
        name: "say",
        min_args: 2,
        max_args: 2,
        handler: handlers::say,
        guard: None,
        help: "/say <message>: send <message> to the current conversation. \
               This is used to send a message starting with a '/'. For example: \
               \"/say /join is used to join a new chat room\"",
    },
    CommandSpec {
        name: "help",
        min_args: 1,
        max_args: 2,
        handler: handlers::help,
        guard: None,
        help: "/help [<command>]: show all supported commands. \
               If <command> is defined, show its usage.",
    },
];

/// Finds the command invoked by `input`, the text following the slash.
///
/// The first command whose name prefixes `input` (ignoring ASCII case) and is
/// followed by the end of input or whitespace wins.
pub fn find_command(input: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|spec| invokes(input, spec.name))
}

/// Looks up a command by its exact name, ignoring ASCII case.
pub fn lookup(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS
        .iter()
        .find(|spec| spec.name.eq_ignore_ascii_case(name))
}

fn invokes(input: &str, name: &str) -> bool {
    let Some(head) = input.get(..name.len()) else {
        return false;
    };
    head.eq_ignore_ascii_case(name)
        && input[name.len()..]
            .chars()
            .next()
            .is_none_or(is_space)
}

/// Splits a command line into at most `max_args` tokens.
///
/// Leading tokens are whitespace-delimited. The last token takes the rest of
/// the line verbatim, trimmed, and is left out when nothing remains.
pub fn parse_args(text: &str, max_args: usize) -> Vec<String> {
    let mut parts = Vec::with_capacity(max_args);
    let mut rest = text;
    let mut remaining = max_args;

    while remaining > 1 {
        rest = rest.trim_start_matches(is_space);
        let Some(end) = rest.find(is_space) else {
            break;
        };
        parts.push(rest[..end].to_string());
        rest = &rest[end..];
        remaining -= 1;
    }

    let last = rest.trim_matches(is_space);
    if !last.is_empty() {
        parts.push(last.to_string());
    }

    debug!(text, max_args, ?parts, "Parsed command");
    parts
}

/// ASCII whitespace including vertical tab, which `char::is_ascii_whitespace` leaves out.
const fn is_space(c: char) -> bool {
    c.is_ascii_whitespace() || c == '\x0B'
}

/// Returns `true` if a second slash appears before the first whitespace.
///
/// Lets lines like `/usr/bin/foo` through as plain messages.
pub fn has_second_slash(input: &str) -> bool {
    input
        .chars()
        .take_while(|&c| !is_space(c))
        .any(|c| c == '/')
}

/// Autocompleter for the chat prompt: slash commands and member nicknames.
///
/// On an empty line it offers the input history, newest first.
#[derive(Clone, Default)]
pub struct ChatCompleter {
    members: Vec<String>,
    completion_char: Option<String>,
    history: Vec<String>,
}

impl ChatCompleter {
    pub const fn new(members: Vec<String>, completion_char: Option<String>) -> Self {
        Self {
            members,
            completion_char,
            history: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_history<'a>(mut self, entries: impl IntoIterator<Item = &'a str>) -> Self {
        self.history = entries
            .into_iter()
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect();
        self
    }
}

impl Autocomplete for ChatCompleter {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, inquire::CustomUserError> {
        if input.is_empty() {
            return Ok(self.history.clone());
        }

        if input.starts_with('/') {
            let typed = input.to_ascii_lowercase();
            let suggestions = COMMANDS
                .iter()
                .filter(|spec| format!("/{}", spec.name).starts_with(&typed))
                .map(|spec| format!("/{}  {}", spec.name, spec.summary()))
                .collect();
            return Ok(suggestions);
        }

        Ok(complete_nick(input, input.len(), &self.members, None)
            .map(|completion| completion.candidates)
            .unwrap_or_default())
    }

    fn get_completion(
        &mut self,
        input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, inquire::CustomUserError> {
        if input.is_empty() {
            return Ok(highlighted_suggestion);
        }

        if input.starts_with('/') {
            let replacement = highlighted_suggestion
                .map(|s| s.split_whitespace().next().unwrap_or("").to_string());
            return Ok(replacement);
        }

        // A highlighted nickname narrows the candidates to that one member.
        let members = highlighted_suggestion.map_or_else(|| self.members.clone(), |nick| vec![nick]);
        let replacement = complete_nick(
            input,
            input.len(),
            &members,
            self.completion_char.as_deref(),
        )
        .map(|completion| completion.buffer);
        Ok(replacement)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args_splits_up_to_max() {
        assert_eq!(
            parse_args("msg alice hello there", 3),
            vec!["msg", "alice", "hello there"]
        );
    }

    #[test]
    fn test_parse_args_single_token() {
        assert_eq!(parse_args("clear", 1), vec!["clear"]);
    }

    #[test]
    fn test_parse_args_collapses_repeated_whitespace() {
        assert_eq!(
            parse_args("query   bob    see  you", 3),
            vec!["query", "bob", "see  you"]
        );
    }

    #[test]
    fn test_parse_args_omits_empty_tail() {
        assert_eq!(parse_args("topic ", 2), vec!["topic"]);
        assert_eq!(parse_args("topic", 2), vec!["topic"]);
    }

    #[test]
    fn test_parse_args_keeps_extra_words_in_last_token() {
        assert_eq!(parse_args("clear everything now", 1), vec!["clear everything now"]);
    }

    #[test]
    fn test_find_command_matches_case_insensitively() {
        assert_eq!(find_command("JOIN #rust").unwrap().name, "join");
        assert_eq!(find_command("Clear").unwrap().name, "clear");
    }

    #[test]
    fn test_find_command_requires_word_boundary() {
        assert!(find_command("joinxyz").is_none());
        assert!(find_command("mex").is_none());
    }

    #[test]
    fn test_find_command_prefers_table_order() {
        assert_eq!(find_command("join #a").unwrap().name, "join");
        assert_eq!(find_command("j #a").unwrap().name, "j");
        assert_eq!(find_command("j\t#a").unwrap().name, "j");
    }

    #[test]
    fn test_find_command_unknown() {
        assert!(find_command("").is_none());
        assert!(find_command("quit").is_none());
        assert!(find_command("usr/bin/foo").is_none());
    }

    #[test]
    fn test_lookup_exact_name() {
        assert_eq!(lookup("MSG").unwrap().name, "msg");
        assert!(lookup("ms").is_none());
    }

    #[test]
    fn test_command_arity() {
        let msg = lookup("msg").unwrap();
        assert!(!msg.accepts(2));
        assert!(msg.accepts(3));

        let query = lookup("query").unwrap();
        assert!(query.accepts(2));
        assert!(query.accepts(3));
        assert!(!query.accepts(1));
    }

    #[test]
    fn test_usage_and_summary() {
        let clear = lookup("clear").unwrap();
        assert_eq!(
            clear.usage(),
            "Usage: /clear: clear all messages from the current conversation"
        );
        assert_eq!(clear.summary(), "clear all messages from the current conversation");
    }

    #[test]
    fn test_has_second_slash() {
        assert!(has_second_slash("unix/path/to/file"));
        assert!(has_second_slash("usr/bin/foo --help"));
        assert!(!has_second_slash("unknown command/with slash"));
        assert!(!has_second_slash("unknown"));
    }

    // ChatCompleter tests

    fn completer() -> ChatCompleter {
        ChatCompleter::new(
            vec!["Bob".to_string(), "bobby".to_string(), "carol".to_string()],
            Some(":".to_string()),
        )
    }

    #[test]
    fn test_completer_command_suggestions() {
        let mut completer = completer();
        let suggestions = completer.get_suggestions("/").unwrap();
        assert_eq!(suggestions.len(), COMMANDS.len());

        let suggestions = completer.get_suggestions("/jo").unwrap();
        assert_eq!(suggestions.len(), 1);
        assert!(suggestions[0].starts_with("/join"));
    }

    #[test]
    fn test_completer_command_completion() {
        let mut completer = completer();
        let suggestion = "/clear  clear all messages from the current conversation".to_string();
        let completion = completer.get_completion("/c", Some(suggestion)).unwrap();
        assert_eq!(completion, Some("/clear".to_string()));
    }

    #[test]
    fn test_completer_nick_suggestions() {
        let mut completer = completer();
        let suggestions = completer.get_suggestions("hi bo").unwrap();
        assert_eq!(suggestions, vec!["Bob", "bobby"]);
        assert!(completer.get_suggestions("").unwrap().is_empty());
    }

    #[test]
    fn test_completer_nick_completion_at_line_start() {
        let mut completer = completer();
        let completion = completer.get_completion("ca", None).unwrap();
        assert_eq!(completion, Some("carol: ".to_string()));
    }

    #[test]
    fn test_completer_highlighted_nick() {
        let mut completer = completer();
        let completion = completer
            .get_completion("thanks bo", Some("bobby".to_string()))
            .unwrap();
        assert_eq!(completion, Some("thanks bobby".to_string()));
    }

    #[test]
    fn test_completer_offers_history_on_empty_line() {
        let mut completer = completer().with_history(["/join #rust", "", "hello"]);
        assert_eq!(
            completer.get_suggestions("").unwrap(),
            vec!["/join #rust", "hello"]
        );

        let completion = completer
            .get_completion("", Some("hello".to_string()))
            .unwrap();
        assert_eq!(completion, Some("hello".to_string()));
    }

    #[test]
    fn test_vertical_tab_separates_tokens() {
        assert_eq!(find_command("me\x0Bwaves").unwrap().name, "me");
        assert_eq!(
            parse_args("msg\x0Balice hi", 3),
            vec!["msg", "alice", "hi"]
        );
        assert!(!has_second_slash("say\x0B/tmp"));
    }
}
