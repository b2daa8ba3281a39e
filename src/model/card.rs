use serde::{Deserialize, Serialize};
use ulid::Ulid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Card {
    pub id: String,
    pub text: String,
}

impl Card {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Ulid::new().to_string(),
            text: text.into(),
        }
    }

    /// First non-blank line, for one-line listings and status messages.
    pub fn summary(&self) -> &str {
        self.text
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .unwrap_or("")
    }
}
