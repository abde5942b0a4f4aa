use clap::{ Args, Parser, Subcommand };

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Generate playable HTML games by chatting with an LLM", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the relay HTTP service.
    Serve(ServeArgs),
    /// Chat with a running relay from the terminal.
    Play(PlayArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Host address and port for the server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:4000")]
    pub server_addr: String,

    /// API key for the Gemini model service. Requests fail with a configuration error when unset.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// Model name override (e.g., gemini-2.5-pro)
    #[arg(long, env = "GEMINI_MODEL")] // No default, the client falls back to its own
    pub gemini_model: Option<String>,

    /// Base URL for the Gemini API
    #[arg(long, env = "GEMINI_BASE_URL")]
    pub gemini_base_url: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct PlayArgs {
    /// Base URL of the relay service.
    #[arg(long, env = "RELAY_URL", default_value = "http://127.0.0.1:4000")]
    pub relay_url: String,

    /// File the sandboxed preview page is written to after every turn.
    #[arg(long, env = "PREVIEW_PATH", default_value = "preview.html")]
    pub preview_path: String,
}
