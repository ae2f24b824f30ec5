use clap::{Parser, Subcommand};

/// Release-notify – post build and release outcomes to a chat webhook
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Activate verbose logging on stderr (-v, -vv, etc.)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Build the notification from the environment and post it (default)
    Send {
        /// Request timeout in seconds, 0 disables it (overrides SLACK_TIMEOUT)
        #[arg(short, long, value_name = "SECS")]
        timeout: Option<u64>,
    },
    /// Print the notification document without sending it
    Payload,
    /// Print build information
    Version {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// The subcommand to run; a bare invocation sends.
    pub fn action(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or(Commands::Send { timeout: None })
    }
}
