use log::info;
use std::error::Error;
use tokio::io::{ AsyncBufReadExt, AsyncWriteExt, BufReader };

use super::preview::render_sandbox_page;
use super::session::ConversationSession;
use super::transport::HttpRelayClient;
use super::ConversationClient;
use crate::cli::PlayArgs;

const QUIT_COMMANDS: [&str; 2] = ["/quit", "/exit"];

async fn write_preview(path: &str, session: &ConversationSession) -> std::io::Result<()> {
    tokio::fs::write(path, render_sandbox_page(session.preview())).await
}

async fn prompt(stdout: &mut tokio::io::Stdout) -> std::io::Result<()> {
    stdout.write_all(b"\nyou> ").await?;
    stdout.flush().await
}

pub async fn run(args: PlayArgs) -> Result<(), Box<dyn Error + Send + Sync>> {
    let transport = HttpRelayClient::new(&args.relay_url);
    info!("Talking to relay at {}", transport.endpoint());
    let mut client = ConversationClient::new(transport);

    write_preview(&args.preview_path, client.session()).await?;
    println!("Describe a game to build. Open {} in a browser to play it; /quit to leave.", args.preview_path);

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt(&mut stdout).await?;

    while let Some(line) = lines.next_line().await? {
        if QUIT_COMMANDS.contains(&line.trim()) {
            break;
        }
        if client.submit(&line).await {
            let session = client.session();
            match session.error() {
                Some(err) => println!("error> {}", err),
                None => {
                    if let Some(last) = session.messages().last() {
                        println!("architect> {}", last.content);
                    }
                    write_preview(&args.preview_path, session).await?;
                    println!("(preview updated: {})", args.preview_path);
                }
            }
        }
        prompt(&mut stdout).await?;
    }

    Ok(())
}
