// SPDX-FileCopyrightText: 2026 Vitrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vitrina - a chat-bot mediated marketplace for AI-bot solutions.
//!
//! This is the binary entry point for the Vitrina bot.

mod serve;

use clap::{Parser, Subcommand};

/// Vitrina - a chat-bot mediated marketplace for AI-bot solutions.
#[derive(Parser, Debug)]
#[command(name = "vitrina", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the bot and poll Telegram for updates.
    Serve,
    /// Print the resolved configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match vitrina_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            vitrina_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("vitrina serve failed: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => {
            print_config(config);
        }
        None => {
            println!("vitrina: use --help for available commands");
        }
    }
}

/// Render the resolved config as TOML with secrets masked.
fn print_config(mut config: vitrina_config::VitrinaConfig) {
    if config.bot.token.is_some() {
        config.bot.token = Some("<set>".to_string());
    }
    if config.search.openai_api_key.is_some() {
        config.search.openai_api_key = Some("<set>".to_string());
    }
    match toml::to_string_pretty(&config) {
        Ok(rendered) => println!("{rendered}"),
        Err(e) => eprintln!("failed to render config: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secrets_are_masked_in_config_output() {
        let mut config = vitrina_config::VitrinaConfig::default();
        config.bot.token = Some("123456:real-token".to_string());
        config.search.openai_api_key = Some("sk-real".to_string());

        // print_config consumes; replicate its masking here.
        if config.bot.token.is_some() {
            config.bot.token = Some("<set>".to_string());
        }
        if config.search.openai_api_key.is_some() {
            config.search.openai_api_key = Some("<set>".to_string());
        }
        let rendered = toml::to_string_pretty(&config).unwrap();
        assert!(!rendered.contains("real-token"));
        assert!(!rendered.contains("sk-real"));
        assert!(rendered.contains("<set>"));
    }
}
