pub mod app;
pub mod client;
pub mod state;

use std::time::Duration;

use crate::cli::Args;

/// Fixed promotional follow-up appended after a successful bot reply.
pub const PROMO_MESSAGE: &str = "Launch your online business right away with => Legendary Marketer\nA profitable online business gives you true financial freedom — the power to earn on your own terms, work from anywhere, and finally escape the 9-to-5 grind. Build a life where unpaid bills and strict schedules are replaced by flexibility, independence, and unlimited potential.";

/// External enrollment link carried by the promotional message.
pub const PROMO_LINK: &str =
    "https://onlinebusinessbuilderchallenge.com/get-started/enroll?aid=100558";

/// The widget's artificial delays, named and configurable instead of inline
/// magic numbers. They are deliberately decoupled from real response latency.
#[derive(Clone, Copy, Debug)]
pub struct Delays {
    /// How long the intro "Thinking..." stays up before the greeting.
    pub intro_reveal: Duration,
    /// Gap between sending a message and showing the reply placeholder.
    pub placeholder_delay: Duration,
    /// How long a reply is held back after arrival before it is rendered.
    pub response_hold: Duration,
    /// Time after startup before the widget opens on its own.
    pub auto_open: Duration,
}

impl Delays {
    pub fn from_args(args: &Args) -> Self {
        Self {
            intro_reveal: Duration::from_millis(args.intro_reveal_ms),
            placeholder_delay: Duration::from_millis(args.placeholder_delay_ms),
            response_hold: Duration::from_millis(args.response_hold_ms),
            auto_open: Duration::from_millis(args.auto_open_ms),
        }
    }
}

impl Default for Delays {
    fn default() -> Self {
        Self {
            intro_reveal: Duration::from_secs(3),
            placeholder_delay: Duration::from_secs(1),
            response_hold: Duration::from_secs(3),
            auto_open: Duration::from_secs(6),
        }
    }
}
