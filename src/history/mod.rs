use chrono::Utc;
use log::info;
use std::fs;
use std::io;
use std::path::PathBuf;

use crate::models::chat::{ ChatTurn, Role };

/// File-backed, append-only turn history. One JSON document holds the full
/// ordered turn list; the widget process is the sole writer.
pub struct TurnHistory {
    path: PathBuf,
}

impl TurnHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        info!("Chat history will be stored in: {}", path.display());
        Self { path }
    }

    /// Returns the stored turns in append order. A missing or unparseable
    /// file is treated as an empty history, not an error.
    pub fn load_all(&self) -> Vec<ChatTurn> {
        match fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_default(),
            Err(_) => Vec::new(),
        }
    }

    /// Appends one turn with a generated timestamp and writes the full
    /// sequence back. No eviction; the history only grows.
    pub fn append(&self, role: Role, message: &str) -> io::Result<()> {
        let mut turns = self.load_all();
        turns.push(ChatTurn {
            role,
            message: message.to_string(),
            timestamp: Utc::now().to_rfc3339(),
        });
        let bytes = serde_json::to_vec_pretty(&turns)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
        fs::write(&self.path, bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{ SystemTime, UNIX_EPOCH };

    fn temp_history(prefix: &str) -> TurnHistory {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time should be monotonic")
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "botadvisor_history_{prefix}_{}_{}.json",
            std::process::id(),
            nanos
        ));
        TurnHistory::new(path)
    }

    #[test]
    fn load_all_on_missing_file_is_empty() {
        let history = temp_history("missing");
        assert!(history.load_all().is_empty());
    }

    #[test]
    fn append_round_trip_preserves_order_and_fields() {
        let history = temp_history("round_trip");

        history.append(Role::User, "first").expect("append should succeed");
        history.append(Role::Bot, "second").expect("append should succeed");
        history.append(Role::User, "third").expect("append should succeed");

        let turns = history.load_all();
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[0].role, Role::User);
        assert_eq!(turns[0].message, "first");
        assert_eq!(turns[1].role, Role::Bot);
        assert_eq!(turns[1].message, "second");
        assert_eq!(turns[2].message, "third");
        assert!(!turns[0].timestamp.is_empty());

        let _ = fs::remove_file(&history.path);
    }

    #[test]
    fn unparseable_file_is_treated_as_empty() {
        let history = temp_history("corrupt");
        fs::write(&history.path, b"not json at all").expect("fixture should write");

        assert!(history.load_all().is_empty());

        // Appending on top of a corrupt file starts a fresh sequence.
        history.append(Role::Bot, "hello").expect("append should succeed");
        let turns = history.load_all();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].message, "hello");

        let _ = fs::remove_file(&history.path);
    }
}
