pub mod api;

use crate::cli::ServeArgs;
use crate::llm::{ new_client, LlmConfig };
use crate::relay::GameRelay;
use log::{ info, warn };
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

pub struct Server {
    addr: SocketAddr,
    relay: Arc<GameRelay>,
}

impl Server {
    pub fn new(addr: SocketAddr, relay: Arc<GameRelay>) -> Self {
        if relay.is_configured() {
            info!("Relay configured with a model service credential.");
        } else {
            warn!("GEMINI_API_KEY is not set. Every generation request will fail until it is configured.");
        }
        Self { addr, relay }
    }

    pub fn from_args(args: &ServeArgs) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let addr = args.server_addr.parse::<SocketAddr>()
            .map_err(|e| format!("Invalid server address '{}': {}", args.server_addr, e))?;

        let client = match args.gemini_api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => {
                let config = LlmConfig {
                    api_key: key.to_string(),
                    model: args.gemini_model.clone(),
                    base_url: args.gemini_base_url.clone(),
                };
                Some(new_client(&config)?)
            }
            _ => None,
        };

        Ok(Self::new(addr, Arc::new(GameRelay::new(client))))
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        api::start_http_server(self.addr, self.relay.clone()).await
    }
}
