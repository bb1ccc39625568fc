use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "relaybot")]
#[command(author, version, about = "Telegram bot that relays files from links back into the chat", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the bot (default when no subcommand is given)
    Run,

    /// Download a single URL locally through the same strategy chain, without Telegram
    Fetch {
        /// URL to download
        url: String,

        /// Directory to store the file in (defaults to DOWNLOAD_PATH)
        #[arg(short, long)]
        output: Option<String>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
