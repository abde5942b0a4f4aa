pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod relay;
pub mod server;

use cli::{ Cli, Command, ServeArgs };
use log::info;
use server::Server;
use std::error::Error;

pub async fn serve(args: ServeArgs) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Relay Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!(
        "Gemini API Key: {}",
        if llm::non_blank(args.gemini_api_key.as_deref()).is_some() { "set" } else { "missing" }
    );
    info!("Gemini Model: {}", llm::non_blank(args.gemini_model.as_deref()).unwrap_or(llm::DEFAULT_MODEL));
    info!(
        "Gemini Base URL: {}",
        llm::non_blank(args.gemini_base_url.as_deref()).unwrap_or(llm::DEFAULT_BASE_URL)
    );
    info!("History Window: {} turns", config::prompt::HISTORY_FOR_PROMPT_LEN);
    info!("---------------------------");

    let server = Server::from_args(&args)?;
    server.run().await
}

pub async fn run(cli: Cli) -> Result<(), Box<dyn Error + Send + Sync>> {
    match cli.command {
        Command::Serve(args) => serve(args).await,
        Command::Play(args) => client::repl::run(args).await,
    }
}
