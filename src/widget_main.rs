use std::error::Error;
use std::io;

use botadvisor::cli::Args;
use botadvisor::history::TurnHistory;
use botadvisor::widget::{ app, client::ApiClient, Delays };
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode,
    enable_raw_mode,
    EnterAlternateScreen,
    LeaveAlternateScreen,
};
use dotenv::dotenv;
use ratatui::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    dotenv().ok();
    let args = Args::parse();

    let history = TurnHistory::new(&args.history_path);
    let api = ApiClient::new(&args.api_url);
    let delays = Delays::from_args(&args);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app::run(&mut terminal, history, api, delays).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
