use botadvisor::cli::Args;
use clap::Parser;
use dotenv::dotenv;
use log::error;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if let Err(e) = botadvisor::run(args).await {
        // Faults are logged and surfaced; the server itself keeps serving
        // through per-request errors, so reaching here means startup failed.
        error!("Erreur globale: {}", e);
        return Err(e);
    }

    Ok(())
}
