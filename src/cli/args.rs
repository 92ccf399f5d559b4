use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "empathy-chat")]
#[command(about = "Terminal chat with slash commands and input history")]
#[command(version)]
pub struct Args {
    /// Suppress status messages
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging (see EMPATHY_CHAT_LOG for finer control)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start an interactive conversation (default)
    Chat {
        /// Account to chat on
        #[arg(short, long)]
        account: Option<String>,

        /// Nickname to use
        #[arg(short, long)]
        nick: Option<String>,
    },
    /// List configured accounts
    Accounts {
        /// Show details for one account
        name: Option<String>,
    },
    /// List the available slash commands
    Commands {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Configure default settings
    Configure,
}
