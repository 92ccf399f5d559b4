//! Slash command listing handler.

use anyhow::Result;
use serde::Serialize;

use crate::chat::{COMMANDS, CommandSpec};
use crate::ui::Style;

#[derive(Debug, Serialize)]
struct CommandInfo<'a> {
    name: &'a str,
    min_args: usize,
    max_args: usize,
    help: &'a str,
}

impl<'a> From<&'a CommandSpec> for CommandInfo<'a> {
    fn from(spec: &'a CommandSpec) -> Self {
        Self {
            name: spec.name,
            min_args: spec.min_args,
            max_args: spec.max_args,
            help: spec.help,
        }
    }
}

/// Prints the slash command table to stdout.
pub fn print_commands(json: bool) -> Result<()> {
    if json {
        let infos: Vec<CommandInfo<'_>> = COMMANDS.iter().map(CommandInfo::from).collect();
        println!("{}", serde_json::to_string_pretty(&infos)?);
        return Ok(());
    }

    println!("{}", Style::header("Available commands"));
    for spec in COMMANDS {
        println!(
            "  {:<8} {}",
            Style::command(format!("/{}", spec.name)),
            Style::secondary(spec.summary())
        );
    }
    Ok(())
}
