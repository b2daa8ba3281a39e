use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::Result;
use crate::model::{Board, Draft};

/// The durable store. Two records live as JSON files under the data
/// directory: `cards.json` (the board) and `draft.json` (unsubmitted form
/// text). All file I/O goes through here.
pub struct Store {
    data_dir: PathBuf,
}

impl Store {
    /// Create a Store rooted at the given directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// The default location, `~/.troika`.
    pub fn default_dir() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".troika"))
            .unwrap_or_else(|| PathBuf::from(".troika"))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn cards_path(&self) -> PathBuf {
        self.data_dir.join("cards.json")
    }

    fn draft_path(&self) -> PathBuf {
        self.data_dir.join("draft.json")
    }

    /// The saved board, or `None` when the record is missing or
    /// unreadable so callers can fall back to the example dataset.
    pub fn load_cards(&self) -> Option<Board> {
        let data = fs::read_to_string(self.cards_path()).ok()?;
        match serde_json::from_str(&data) {
            Ok(board) => Some(board),
            Err(e) => {
                warn!("cards record unreadable, falling back: {e}");
                None
            }
        }
    }

    /// Load the board, falling back to the example dataset.
    pub fn load_or_example(&self) -> Board {
        self.load_cards().unwrap_or_else(Board::example)
    }

    pub fn save_cards(&self, board: &Board) -> Result<()> {
        self.write_json(&self.cards_path(), board)
    }

    pub fn load_draft(&self) -> Option<Draft> {
        let data = fs::read_to_string(self.draft_path()).ok()?;
        serde_json::from_str(&data).ok()
    }

    pub fn save_draft(&self, draft: &Draft) -> Result<()> {
        self.write_json(&self.draft_path(), draft)
    }

    /// Remove the draft record. Absence is not an error.
    pub fn clear_draft(&self) -> Result<()> {
        match fs::remove_file(self.draft_path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_json<T: serde::Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        let json = serde_json::to_string_pretty(value)?;
        fs::write(path, json)?;
        Ok(())
    }
}
