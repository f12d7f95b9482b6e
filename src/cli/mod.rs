//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the
//! appropriate commands.

pub mod character_list;

use std::error::Error;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cli::character_list::list_characters;
use crate::ui::chat_loop::{run_chat, ChatOptions};

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_DESCRIBE"),
    ")"
);

#[derive(Parser)]
#[command(name = "chatelaine")]
#[command(version = VERSION)]
#[command(about = "A terminal chat client for character companion services")]
#[command(
    long_about = "Chatelaine is a full-screen terminal chat client for character companion \
services. Pick a character, chat in per-character sessions, and switch back and \
forth without losing a conversation.\n\n\
Environment Variables:\n\
  CHATELAINE_API_BASE   Base URL of the chat service (overrides the config file)\n\n\
Controls:\n\
  Type              Enter your message in the input field\n\
  Enter             Send the message\n\
  Tab               Focus the session sidebar\n\
  Ctrl+N            Start a new chat\n\
  Esc               Back to the character picker\n\
  Ctrl+T            Toggle dark/light theme\n\
  Up/Down           Scroll through chat history\n\
  Ctrl+C            Quit the application"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Base URL of the chat service (overrides config and environment)
    #[arg(long, global = true, value_name = "URL")]
    pub api_base: Option<String>,

    /// Character to start chatting with
    #[arg(short = 'c', long, global = true, value_name = "NAME")]
    pub character: Option<String>,

    /// Enable transcript logging to the specified file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<String>,

    /// UI theme ("dark" or "light")
    #[arg(long, global = true, value_name = "THEME")]
    pub theme: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// List the built-in characters
    Characters,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()
        .unwrap()
        .block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Characters => list_characters(),
        Commands::Chat => {
            run_chat(ChatOptions {
                api_base: args.api_base,
                character: args.character,
                log_file: args.log,
                theme: args.theme,
            })
            .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_parse_flags_and_subcommands() {
        let args = Args::parse_from(["chatelaine", "-c", "Yuki", "--api-base", "http://x"]);
        assert_eq!(args.character.as_deref(), Some("Yuki"));
        assert_eq!(args.api_base.as_deref(), Some("http://x"));
        assert!(args.command.is_none());

        let args = Args::parse_from(["chatelaine", "characters"]);
        assert!(matches!(args.command, Some(Commands::Characters)));
    }
}
