use anyhow::Result;
use clap::Parser;

use empathy_chat::cli::commands::{accounts, chat, configure, slash};
use empathy_chat::cli::{Args, Command};
use empathy_chat::output::{self, OutputConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    output::init(OutputConfig {
        quiet: args.quiet,
        no_color: args.no_color || OutputConfig::default().no_color,
    });
    output::init_logging(args.verbose);

    match args.command {
        Some(Command::Accounts { name }) => {
            accounts::print_accounts(name.as_deref())?;
        }
        Some(Command::Commands { json }) => {
            slash::print_commands(json)?;
        }
        Some(Command::Configure) => {
            configure::run_configure()?;
        }
        Some(Command::Chat { account, nick }) => {
            chat::run_chat(chat::ChatOptions { account, nick }).await?;
        }
        None => {
            chat::run_chat(chat::ChatOptions {
                account: None,
                nick: None,
            })
            .await?;
        }
    }

    Ok(())
}
