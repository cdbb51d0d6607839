use std::error::Error;
use std::io::Stdout;
use std::sync::Arc;

use crossterm::event::{ self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers };
use log::warn;
use ratatui::prelude::*;
use ratatui::widgets::{ Block, Borders, Paragraph, Wrap };
use tokio::sync::mpsc;
use tokio::time::sleep;

use crate::history::TurnHistory;
use crate::models::chat::Role;
use super::client::ApiClient;
use super::state::{ Entry, EntryKind, WidgetState };
use super::Delays;

const MAX_INPUT_ROWS: u16 = 5;

enum AppEvent {
    Key(KeyEvent),
    AutoOpen,
    IntroRevealElapsed,
    PlaceholderDue { request_id: u64 },
    Completed { request_id: u64, outcome: Result<String, String> },
}

pub struct App {
    state: WidgetState,
    history: TurnHistory,
    api: Arc<ApiClient>,
    delays: Delays,
    tx: mpsc::Sender<AppEvent>,
}

impl App {
    fn new(history: TurnHistory, api: ApiClient, delays: Delays, tx: mpsc::Sender<AppEvent>) -> Self {
        let mut state = WidgetState::new();
        for turn in history.load_all() {
            state.replay(&turn);
        }
        Self {
            state,
            history,
            api: Arc::new(api),
            delays,
            tx,
        }
    }

    fn schedule_intro_reveal(&self) {
        let tx = self.tx.clone();
        let delay = self.delays.intro_reveal;
        tokio::spawn(async move {
            sleep(delay).await;
            let _ = tx.send(AppEvent::IntroRevealElapsed).await;
        });
    }

    fn opened(&mut self) {
        if self.state.begin_intro() {
            self.schedule_intro_reveal();
        }
    }

    fn submit(&mut self) {
        let Some(outbound) = self.state.submit() else {
            return;
        };

        if let Err(e) = self.history.append(Role::User, &outbound.message) {
            warn!("Failed to persist user turn: {}", e);
        }

        let api = self.api.clone();
        let tx = self.tx.clone();
        let delays = self.delays;
        tokio::spawn(async move {
            sleep(delays.placeholder_delay).await;
            let _ = tx
                .send(AppEvent::PlaceholderDue { request_id: outbound.request_id })
                .await;

            let outcome = match api.send(&outbound.message).await {
                Ok(text) => {
                    sleep(delays.response_hold).await;
                    Ok(text)
                }
                Err(e) => Err(e.to_string()),
            };
            let _ = tx
                .send(AppEvent::Completed { request_id: outbound.request_id, outcome })
                .await;
        });
    }

    /// Applies one event to the widget. Returns false when the app should
    /// shut down.
    fn on_event(&mut self, event: AppEvent) -> bool {
        match event {
            AppEvent::Key(key) => self.on_key(key),
            AppEvent::AutoOpen => {
                if self.state.auto_open() {
                    self.opened();
                }
                true
            }
            AppEvent::IntroRevealElapsed => {
                self.state.reveal_intro();
                true
            }
            AppEvent::PlaceholderDue { request_id } => {
                self.state.show_placeholder(request_id);
                true
            }
            AppEvent::Completed { request_id, outcome } => {
                if let Some(bot_text) = self.state.complete_request(request_id, outcome) {
                    if let Err(e) = self.history.append(Role::Bot, &bot_text) {
                        warn!("Failed to persist bot turn: {}", e);
                    }
                }
                true
            }
        }
    }

    fn on_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return true;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => false,
            KeyCode::Tab => {
                if self.state.toggle() {
                    self.opened();
                }
                true
            }
            KeyCode::Esc => {
                if self.state.open {
                    self.state.close();
                    true
                } else {
                    false
                }
            }
            KeyCode::Enter if self.state.open => {
                self.submit();
                true
            }
            KeyCode::Char(c) if self.state.open => {
                self.state.input.push(c);
                true
            }
            KeyCode::Backspace if self.state.open => {
                self.state.input.pop();
                true
            }
            _ => true,
        }
    }
}

/// Keyboard input is read on a dedicated blocking task feeding the app
/// channel, so key presses are picked up even while the event loop sits idle
/// between timer events. The task ends when the channel closes.
fn spawn_input_reader(tx: mpsc::Sender<AppEvent>) {
    tokio::task::spawn_blocking(move || {
        loop {
            match event::read() {
                Ok(Event::Key(key)) => {
                    if tx.blocking_send(AppEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
    });
}

pub async fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    history: TurnHistory,
    api: ApiClient,
    delays: Delays,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let (tx, mut rx) = mpsc::channel::<AppEvent>(32);
    let mut app = App::new(history, api, delays, tx.clone());

    spawn_input_reader(tx.clone());

    {
        let tx = tx.clone();
        let delay = delays.auto_open;
        tokio::spawn(async move {
            sleep(delay).await;
            let _ = tx.send(AppEvent::AutoOpen).await;
        });
    }

    loop {
        terminal.draw(|f| draw(f, &app.state))?;

        let Some(event) = rx.recv().await else {
            break;
        };
        if !app.on_event(event) {
            break;
        }
    }

    Ok(())
}

fn draw(f: &mut Frame, state: &WidgetState) {
    let area = f.area();

    let chat_area = if state.side_panel_visible(area.width) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(35), Constraint::Min(40)])
            .split(area);
        draw_side_panel(f, chunks[0]);
        chunks[1]
    } else {
        area
    };

    if !state.open {
        let hint = Paragraph::new("Press Tab to chat with BotAdvisor")
            .block(Block::default().borders(Borders::ALL).title("BotAdvisor"))
            .wrap(Wrap { trim: true });
        f.render_widget(hint, chat_area);
        return;
    }

    let input_rows = input_height(&state.input, chat_area.width.saturating_sub(2));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(input_rows + 2),
        ])
        .split(chat_area);

    draw_messages(f, chunks[0], state);
    draw_counter(f, chunks[1], state);
    draw_input(f, chunks[2], state);
}

fn draw_side_panel(f: &mut Frame, area: Rect) {
    let panel = Paragraph::new(
        "BotAdvisor\n\nYour guide to launching\nan online business."
    )
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    f.render_widget(panel, area);
}

fn draw_messages(f: &mut Frame, area: Rect, state: &WidgetState) {
    let width = area.width.saturating_sub(2).max(1) as usize;
    let mut lines: Vec<Line> = Vec::new();

    if let Some(intro) = state.intro_text() {
        push_wrapped(&mut lines, intro, width, Style::default().fg(Color::Yellow), "Bot: ");
        lines.push(Line::default());
    }

    for entry in state.entries() {
        let (style, prefix) = entry_style(entry);
        push_wrapped(&mut lines, &entry.text, width, style, prefix);
        if entry.kind == EntryKind::Promo {
            push_wrapped(&mut lines, super::PROMO_LINK, width, style, "");
        }
        lines.push(Line::default());
    }

    // Bottom-anchored: the chat stays scrolled to its latest entry.
    let visible = area.height.saturating_sub(2) as usize;
    let skip = lines.len().saturating_sub(visible);
    let text = Text::from(lines.split_off(skip));

    let messages = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Chat"));
    f.render_widget(messages, area);
}

fn entry_style(entry: &Entry) -> (Style, &'static str) {
    match entry.kind {
        EntryKind::Outgoing => (Style::default().fg(Color::Cyan), "You: "),
        EntryKind::Incoming => (Style::default(), "Bot: "),
        EntryKind::Placeholder => (Style::default().fg(Color::DarkGray).italic(), "Bot: "),
        EntryKind::Error => (Style::default().fg(Color::Red), "Bot: "),
        EntryKind::Promo => (Style::default().fg(Color::Red).bold(), ""),
    }
}

fn draw_counter(f: &mut Frame, area: Rect, state: &WidgetState) {
    let style = if state.over_limit() {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let suffix = if state.over_limit() { "  word limit exceeded, sending disabled" } else { "" };
    let counter = Paragraph::new(format!("{}{}", state.counter_text(), suffix)).style(style);
    f.render_widget(counter, area);
}

fn draw_input(f: &mut Frame, area: Rect, state: &WidgetState) {
    let input = Paragraph::new(state.input.as_str())
        .block(Block::default().borders(Borders::ALL).title("Message"))
        .wrap(Wrap { trim: false });
    f.render_widget(input, area);
}

/// The input area grows with its content, up to a small cap.
fn input_height(input: &str, width: u16) -> u16 {
    let width = width.max(1) as usize;
    let rows: usize = input
        .split('\n')
        .map(|line| line.chars().count() / width + 1)
        .sum();
    (rows as u16).clamp(1, MAX_INPUT_ROWS)
}

fn push_wrapped(lines: &mut Vec<Line>, text: &str, width: usize, style: Style, prefix: &str) {
    for wrapped in wrap_text(&format!("{}{}", prefix, text), width) {
        lines.push(Line::styled(wrapped, style));
    }
}

/// Greedy word wrap; words longer than the width are hard-split.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();
    for raw_line in text.split('\n') {
        let mut current = String::new();
        for word in raw_line.split_whitespace() {
            let mut word = word;
            while word.chars().count() > width {
                if !current.is_empty() {
                    out.push(std::mem::take(&mut current));
                }
                let split_at = word.char_indices().nth(width).map(|(i, _)| i).unwrap_or(word.len());
                out.push(word[..split_at].to_string());
                word = &word[split_at..];
            }
            let needed = if current.is_empty() { word.chars().count() } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > width && !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        out.push(current);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{ SystemTime, UNIX_EPOCH };

    fn temp_history() -> TurnHistory {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time should be monotonic")
            .as_nanos();
        TurnHistory::new(std::env::temp_dir().join(format!(
            "botadvisor_app_{}_{}.json",
            std::process::id(),
            nanos
        )))
    }

    fn test_app() -> (App, mpsc::Receiver<AppEvent>) {
        let (tx, rx) = mpsc::channel(32);
        let app = App::new(
            temp_history(),
            ApiClient::new("http://127.0.0.1:0"),
            Delays::default(),
            tx,
        );
        (app, rx)
    }

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[tokio::test]
    async fn keystrokes_are_handled_regardless_of_arrival_timing() {
        // Keys reach the app as channel events from the reader task, so a
        // key arriving long after the last timer event must still be applied.
        let (mut app, _rx) = test_app();

        assert!(app.on_event(key(KeyCode::Tab)));
        assert!(app.state.open);

        for c in "hello there".chars() {
            assert!(app.on_event(key(KeyCode::Char(c))));
        }
        assert_eq!(app.state.input, "hello there");

        assert!(app.on_event(key(KeyCode::Backspace)));
        assert_eq!(app.state.input, "hello ther");
    }

    #[tokio::test]
    async fn timer_events_interleave_with_typing() {
        let (mut app, _rx) = test_app();

        assert!(app.on_event(AppEvent::AutoOpen));
        assert!(app.state.open);
        assert!(app.on_event(key(KeyCode::Char('h'))));
        assert!(app.on_event(AppEvent::IntroRevealElapsed));
        assert!(app.on_event(key(KeyCode::Char('i'))));
        assert_eq!(app.state.input, "hi");
    }

    #[tokio::test]
    async fn ctrl_c_requests_shutdown() {
        let (mut app, _rx) = test_app();
        let quit = AppEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!app.on_event(quit));
    }

    #[tokio::test]
    async fn esc_closes_the_widget_then_quits() {
        let (mut app, _rx) = test_app();
        assert!(app.on_event(key(KeyCode::Tab)));
        assert!(app.on_event(key(KeyCode::Esc)));
        assert!(!app.state.open);
        assert!(!app.on_event(key(KeyCode::Esc)));
    }

    #[tokio::test]
    async fn released_keys_are_ignored() {
        let (mut app, _rx) = test_app();
        assert!(app.on_event(key(KeyCode::Tab)));

        let release = AppEvent::Key(KeyEvent::new_with_kind(
            KeyCode::Char('x'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
        ));
        assert!(app.on_event(release));
        assert!(app.state.input.is_empty());
    }

    #[test]
    fn wrap_text_respects_width() {
        let lines = wrap_text("one two three four", 9);
        assert_eq!(lines, vec!["one two", "three", "four"]);
    }

    #[test]
    fn wrap_text_hard_splits_long_words() {
        let lines = wrap_text("abcdefghij", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn wrap_text_preserves_explicit_newlines() {
        let lines = wrap_text("a\nb", 10);
        assert_eq!(lines, vec!["a", "b"]);
    }

    #[test]
    fn input_height_grows_with_content_up_to_cap() {
        assert_eq!(input_height("", 20), 1);
        assert_eq!(input_height(&"x".repeat(45), 20), 3);
        assert_eq!(input_height(&"x".repeat(1000), 20), MAX_INPUT_ROWS);
    }
}
