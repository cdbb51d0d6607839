use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Server Args ---
    /// Port for the HTTP API server to listen on.
    #[arg(long, env = "PORT", default_value = "3002")]
    pub port: u16,

    /// API key for the Gemini provider, read once at startup.
    #[arg(long, env = "GEMINI_API_KEY", default_value = "")]
    pub chat_api_key: String,

    /// Model name for chat completion.
    #[arg(long, env = "CHAT_MODEL", default_value = "gemini-2.5-flash")]
    pub chat_model: String,

    /// Base URL override for the chat provider API.
    #[arg(long, env = "CHAT_BASE_URL")] // No default, rely on provider defaults if None
    pub chat_base_url: Option<String>,

    // --- Widget Args ---
    /// Base URL of the chat API the widget talks to.
    #[arg(long, env = "API_URL", default_value = "http://127.0.0.1:3002")]
    pub api_url: String,

    /// Path of the JSON file holding the widget's chat history.
    #[arg(long, env = "HISTORY_PATH", default_value = "chat_history.json")]
    pub history_path: String,

    // --- Widget Timing Args ---
    /// Milliseconds the intro "Thinking..." stays up before the greeting is revealed.
    #[arg(long, env = "INTRO_REVEAL_MS", default_value = "3000")]
    pub intro_reveal_ms: u64,

    /// Milliseconds between sending a message and showing the reply placeholder.
    #[arg(long, env = "PLACEHOLDER_DELAY_MS", default_value = "1000")]
    pub placeholder_delay_ms: u64,

    /// Milliseconds a reply is held back after arrival before it is rendered.
    #[arg(long, env = "RESPONSE_HOLD_MS", default_value = "3000")]
    pub response_hold_ms: u64,

    /// Milliseconds after startup before the widget opens on its own.
    #[arg(long, env = "AUTO_OPEN_MS", default_value = "6000")]
    pub auto_open_ms: u64,
}
