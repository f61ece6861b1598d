// SPDX-FileCopyrightText: 2026 Charla Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Charla - a retrieval-augmented WhatsApp assistant.
//!
//! This is the binary entry point for the Charla webhook server.

mod serve;

use clap::{Parser, Subcommand};

/// Charla - a retrieval-augmented WhatsApp assistant.
#[derive(Parser, Debug)]
#[command(name = "charla", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Charla webhook server.
    Serve,
    /// Show the resolved configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match charla_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            charla_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => {
            println!("agent.name          = {}", config.agent.name);
            println!("agent.log_level     = {}", config.agent.log_level);
            println!(
                "server              = {}:{}",
                config.server.bind_address, config.server.port
            );
            println!("cohere.chat_model   = {}", config.cohere.chat_model);
            println!("cohere.embed_model  = {}", config.cohere.embed_model);
            println!("qdrant.url          = {}", config.qdrant.url);
            println!("qdrant.collection   = {}", config.qdrant.collection);
            println!("store.database_path = {}", config.store.database_path);
            println!("queue.debounce_ms   = {}", config.queue.debounce_ms);
        }
        None => {
            println!("charla: use --help for available commands");
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn binary_loads_config_defaults() {
        // Config loads with defaults when no config file is present.
        let config =
            charla_config::load_and_validate().expect("default config should be valid");
        assert_eq!(config.agent.name, "charla");
    }
}
