pub mod cli;
pub mod config;
pub mod history;
pub mod llm;
pub mod models;
pub mod server;
pub mod widget;

use cli::Args;
use llm::LlmConfig;
use log::info;
use server::Server;
use std::error::Error;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Listening Port: {}", args.port);
    info!("Chat Model: {}", args.chat_model);
    info!("Chat Base URL: {:?}", args.chat_base_url);
    info!("-------------------------");

    let config = LlmConfig {
        api_key: Some(args.chat_api_key.clone()).filter(|k| !k.is_empty()),
        completion_model: Some(args.chat_model.clone()),
        base_url: args.chat_base_url.clone(),
    };
    let chat = llm::new_client(&config)?;

    let server = Server::new(args.port, chat);
    server.run().await?;

    Ok(())
}
