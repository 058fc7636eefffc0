//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod say;
pub mod zone_list;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::cli::say::run_say;
use crate::cli::zone_list::list_zones;
use crate::core::completion::GeminiClient;
use crate::core::config::data::{Config, ConfigKey};
use crate::core::session::ChatSession;
use crate::core::zones::{ZoneId, ZoneRegistry};
use crate::logging::init_file_logging;
use crate::ui::chat_loop::run_chat;

#[derive(Parser)]
#[command(name = "fivepoints")]
#[command(about = "A five-zone terminal dining concierge backed by Gemini")]
#[command(
    long_about = "Five Points is a full-screen terminal chat with five themed zones. Each zone \
is a staff persona with its own voice; switching zones starts a fresh conversation.\n\n\
Environment Variables:\n\
  GEMINI_API_KEY    Your Gemini API key (API_KEY is accepted as a fallback)\n\
  RUST_LOG          Log filter when --log is given (default: fivepoints=info)\n\n\
Controls:\n\
  Enter             Send the message\n\
  Tab/Shift+Tab     Next/previous zone\n\
  F1-F5             Jump to a zone\n\
  Alt+1..Alt+3      Send a suggested prompt\n\
  Up/Down/PgUp/PgDn Scroll the conversation (mouse wheel works too)\n\
  Esc               Clear the input\n\
  Ctrl+C            Quit"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Zone to start in (observation, learning, discussion, support, silence)
    #[arg(short = 'z', long, global = true, value_name = "ZONE")]
    pub zone: Option<ZoneId>,

    /// Gemini model to use
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Write diagnostic logs to this file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Send one message to a zone and print the reply
    Say {
        /// Message to send (multiple words are joined with spaces)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        prompt: Vec<String>,
    },
    /// List the zones
    Zones,
    /// Set a configuration value, or print the configuration when no value is given
    Set {
        /// default-zone, model, or base-url
        key: String,
        /// Value to store (multiple words are joined with spaces)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset a configuration value
    Unset {
        /// default-zone, model, or base-url
        key: String,
    },
}

/// Zone, model and endpoint after applying CLI flags over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSettings {
    pub zone: ZoneId,
    pub model: String,
    pub base_url: String,
}

impl ResolvedSettings {
    pub fn resolve(args: &Args, config: &Config) -> Self {
        Self {
            zone: args.zone.unwrap_or_else(|| config.effective_zone()),
            model: args
                .model
                .clone()
                .unwrap_or_else(|| config.effective_model().to_string()),
            base_url: config.effective_base_url().to_string(),
        }
    }

    pub fn client(&self) -> GeminiClient {
        GeminiClient::from_env(reqwest::Client::new(), &self.base_url, &self.model)
    }
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    if let Some(path) = &args.log {
        init_file_logging(path)?;
    }

    let config = Config::load()?;
    let settings = ResolvedSettings::resolve(&args, &config);

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let session = ChatSession::new(Arc::new(ZoneRegistry::builtin()?), settings.zone);
            run_chat(session, Arc::new(settings.client())).await
        }
        Commands::Say { prompt } => {
            let session = ChatSession::new(Arc::new(ZoneRegistry::builtin()?), settings.zone);
            run_say(session, prompt, &settings.client()).await
        }
        Commands::Zones => {
            list_zones(&ZoneRegistry::builtin()?, config.effective_zone());
            Ok(())
        }
        Commands::Set { key, value } => {
            if value.is_empty() {
                config.print_all();
                return Ok(());
            }
            let mut config = config;
            let key = parse_key_or_exit(&key);
            let value = value.join(" ");
            if let Err(err) = config.set_value(key, &value) {
                eprintln!("❌ {err}");
                std::process::exit(1);
            }
            config.save()?;
            println!("✅ Set {} to: {}", key.as_str(), value.trim());
            Ok(())
        }
        Commands::Unset { key } => {
            let mut config = config;
            let key = parse_key_or_exit(&key);
            config.unset_value(key);
            config.save()?;
            println!("✅ Unset {}", key.as_str());
            Ok(())
        }
    }
}

fn parse_key_or_exit(key: &str) -> ConfigKey {
    match ConfigKey::parse(key) {
        Ok(key) => key,
        Err(err) => {
            eprintln!("❌ {err}");
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests;
