pub mod api;
pub mod cors;
pub mod recover;

use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

use log::info;

use crate::llm::ChatClient;
use self::api::AppState;

pub struct Server {
    port: u16,
    state: AppState,
}

impl Server {
    pub fn new(port: u16, chat: Arc<dyn ChatClient>) -> Self {
        let model = chat.get_model();
        Self {
            port,
            state: AppState { chat, model },
        }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        info!("Starting HTTP API server on: http://{}", addr);

        let app = api::router(self.state.clone());
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app.into_make_service()).await?;

        Ok(())
    }
}
