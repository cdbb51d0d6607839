use crate::models::chat::{ ChatTurn, Role, NO_RESPONSE };
use super::PROMO_MESSAGE;

/// Client-side entry invariant: submissions above this word count are no-ops.
pub const WORD_LIMIT: usize = 150;

/// Viewport width at or below which the side panel is hidden while the
/// widget is open.
pub const NARROW_VIEWPORT_COLS: u16 = 120;

pub const GREETING: &str = "Hi there! I'm BotAdvisor. How can I help you today?";
pub const THINKING: &str = "Thinking...";
pub const REQUEST_ERROR: &str = "Oops! An error occurred. Please try again.";

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    Outgoing,
    Incoming,
    Placeholder,
    Error,
    Promo,
}

#[derive(Clone, Debug)]
pub struct Entry {
    pub kind: EntryKind,
    pub text: String,
}

impl Entry {
    fn new(kind: EntryKind, text: impl Into<String>) -> Self {
        Self { kind, text: text.into() }
    }
}

/// One-shot intro gate: the first open shows "Thinking..." in place of the
/// greeting, then reveals it after a fixed delay. Never re-armed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intro {
    Pending,
    Thinking,
    Revealed,
}

#[derive(Clone, Debug)]
pub struct OutboundMessage {
    pub request_id: u64,
    pub message: String,
}

/// Explicit finite-state machine for the chat widget. Every transition goes
/// through a named method; there are no ambient flags. Pure state, no IO.
pub struct WidgetState {
    pub open: bool,
    intro: Intro,
    pub input: String,
    entries: Vec<Entry>,
    in_flight: Option<u64>,
    next_request_id: u64,
}

impl WidgetState {
    pub fn new() -> Self {
        Self {
            open: false,
            intro: Intro::Pending,
            input: String::new(),
            entries: Vec::new(),
            in_flight: None,
            next_request_id: 1,
        }
    }

    /// Replays one stored turn into the rendered list at startup.
    pub fn replay(&mut self, turn: &ChatTurn) {
        let kind = match turn.role {
            Role::User => EntryKind::Outgoing,
            Role::Bot => EntryKind::Incoming,
        };
        self.entries.push(Entry::new(kind, turn.message.clone()));
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Toggler activation. Returns true when the widget just opened.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Timed auto-open; fires once and only if not already open.
    pub fn auto_open(&mut self) -> bool {
        if self.open {
            return false;
        }
        self.open = true;
        true
    }

    /// Arms the intro gate. Returns true only on the first call so the
    /// caller schedules exactly one reveal timer.
    pub fn begin_intro(&mut self) -> bool {
        if self.intro != Intro::Pending {
            return false;
        }
        self.intro = Intro::Thinking;
        true
    }

    pub fn reveal_intro(&mut self) {
        if self.intro == Intro::Thinking {
            self.intro = Intro::Revealed;
        }
    }

    /// Text of the greeting slot: "Thinking..." while the intro gate is up,
    /// the greeting afterwards, nothing before the first open.
    pub fn intro_text(&self) -> Option<&'static str> {
        match self.intro {
            Intro::Pending => None,
            Intro::Thinking => Some(THINKING),
            Intro::Revealed => Some(GREETING),
        }
    }

    pub fn side_panel_visible(&self, viewport_cols: u16) -> bool {
        !(self.open && viewport_cols <= NARROW_VIEWPORT_COLS)
    }

    pub fn over_limit(&self) -> bool {
        word_count(&self.input) > WORD_LIMIT
    }

    pub fn counter_text(&self) -> String {
        format!("{}/{}", word_count(&self.input), WORD_LIMIT)
    }

    pub fn request_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Send action. A no-op (None) on empty input, above the word limit, or
    /// while a prior request is unresolved (single-flight). Otherwise the
    /// outgoing entry is appended, the input cleared, and the request token
    /// taken.
    pub fn submit(&mut self) -> Option<OutboundMessage> {
        let message = self.input.trim().to_string();
        if message.is_empty() || self.over_limit() || self.in_flight.is_some() {
            return None;
        }

        self.input.clear();
        self.entries.push(Entry::new(EntryKind::Outgoing, message.clone()));

        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.in_flight = Some(request_id);

        Some(OutboundMessage { request_id, message })
    }

    /// Appends the transient placeholder for a still-unresolved request.
    pub fn show_placeholder(&mut self, request_id: u64) {
        if self.in_flight == Some(request_id) {
            self.entries.push(Entry::new(EntryKind::Placeholder, THINKING));
        }
    }

    /// Resolves a request: removes the placeholder, renders the reply or the
    /// fixed error entry, and appends the promo after a real reply. Returns
    /// the text to persist as a bot turn (errors are never persisted).
    pub fn complete_request(
        &mut self,
        request_id: u64,
        outcome: Result<String, String>
    ) -> Option<String> {
        if self.in_flight != Some(request_id) {
            return None;
        }
        self.in_flight = None;

        if let Some(pos) = self.entries.iter().rposition(|e| e.kind == EntryKind::Placeholder) {
            self.entries.remove(pos);
        }

        match outcome {
            Ok(text) => {
                self.entries.push(Entry::new(EntryKind::Incoming, text.clone()));
                let trimmed = text.trim();
                if !trimmed.is_empty() && trimmed != NO_RESPONSE {
                    self.entries.push(Entry::new(EntryKind::Promo, PROMO_MESSAGE));
                }
                Some(text)
            }
            Err(_) => {
                self.entries.push(Entry::new(EntryKind::Error, REQUEST_ERROR));
                None
            }
        }
    }
}

impl Default for WidgetState {
    fn default() -> Self {
        Self::new()
    }
}
