use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, TroikaError};

use super::Card;

/// The three fixed column slots. The serialized names double as the
/// record keys in the `cards` store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ColumnId {
    #[serde(rename = "column-first")]
    First,
    #[serde(rename = "column-second")]
    Second,
    #[serde(rename = "column-third")]
    Third,
}

impl ColumnId {
    pub const ALL: [ColumnId; 3] = [ColumnId::First, ColumnId::Second, ColumnId::Third];

    pub fn title(self) -> &'static str {
        match self {
            ColumnId::First => "TODO",
            ColumnId::Second => "IN PROGRESS",
            ColumnId::Third => "DONE",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            ColumnId::First => "column-first",
            ColumnId::Second => "column-second",
            ColumnId::Third => "column-third",
        }
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ColumnId {
    type Err = TroikaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "first" | "column-first" | "todo" => Ok(ColumnId::First),
            "second" | "column-second" | "doing" | "in-progress" => Ok(ColumnId::Second),
            "third" | "column-third" | "done" => Ok(ColumnId::Third),
            _ => Err(TroikaError::UnknownColumn(s.into())),
        }
    }
}

/// The board: each column owns an ordered card list. Serializes as a plain
/// map of column key to card array, which is exactly the `cards` record
/// layout on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Board {
    columns: BTreeMap<ColumnId, Vec<Card>>,
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    pub fn empty() -> Self {
        let mut columns = BTreeMap::new();
        for column in ColumnId::ALL {
            columns.insert(column, Vec::new());
        }
        Self { columns }
    }

    /// The starter dataset shown when no saved board exists.
    pub fn example() -> Self {
        let mut board = Self::empty();
        let seed: [(ColumnId, &[&str]); 3] = [
            (
                ColumnId::First,
                &[
                    "Card 1",
                    "Card 2",
                    "Card 3\n\n{\\__/}\n (\u{2022}\u{1d17}\u{2022})\n / > \\",
                ],
            ),
            (ColumnId::Second, &["Card 4\n  3\n 2\n1", "Card 5", "Card 6\n\n(\\(\\\n( -.-)\no_(\")(\")"]),
            (
                ColumnId::Third,
                &[
                    "Card 7",
                    "Card 8",
                    "Card 9\n\n{\\__/}{\\__/}\n (\u{2022}\u{1d17}\u{2022}) (\u{2022}\u{1d17}\u{2022})\n / > \\ / >< \\",
                ],
            ),
        ];
        for (column, texts) in seed {
            for text in texts {
                board.columns.entry(column).or_default().push(Card::new(*text));
            }
        }
        board
    }

    /// Ordered cards of a column. An absent key reads as empty.
    pub fn cards(&self, column: ColumnId) -> &[Card] {
        self.columns.get(&column).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn total_cards(&self) -> usize {
        self.columns.values().map(Vec::len).sum()
    }

    /// Board-wide lookup: the owning column, position and card for an id.
    pub fn find_card(&self, id: &str) -> Option<(ColumnId, usize, &Card)> {
        for column in ColumnId::ALL {
            if let Some(pos) = self.cards(column).iter().position(|c| c.id == id) {
                return Some((column, pos, &self.cards(column)[pos]));
            }
        }
        None
    }

    /// Create a card at the end of `column`. Fails if the text is blank.
    pub fn add_card(&mut self, column: ColumnId, text: &str) -> Result<Card> {
        if text.trim().is_empty() {
            return Err(TroikaError::EmptyCardText);
        }
        let card = Card::new(text);
        self.columns.entry(column).or_default().push(card.clone());
        Ok(card)
    }

    /// Remove the card with `id` from `column`. An unknown id is a
    /// defensive no-op; UI gating means it should never happen.
    pub fn delete_card(&mut self, column: ColumnId, id: &str) {
        let cards = self.columns.entry(column).or_default();
        match cards.iter().position(|c| c.id == id) {
            Some(pos) => {
                cards.remove(pos);
            }
            None => warn!("delete: card {id} not found in {column}, ignoring"),
        }
    }

    /// Move a card between (or within) columns. Removal happens before the
    /// index is interpreted, so `index` is relative to the post-removal
    /// list and gets clamped to it. An unknown id is a defensive no-op.
    pub fn move_card(&mut self, id: &str, from: ColumnId, to: ColumnId, index: usize) {
        let source = self.columns.entry(from).or_default();
        let Some(pos) = source.iter().position(|c| c.id == id) else {
            warn!("move: card {id} not found in {from}, ignoring");
            return;
        };
        let card = source.remove(pos);
        let dest = self.columns.entry(to).or_default();
        let index = index.min(dest.len());
        dest.insert(index, card);
    }

    /// Read-only copy for rendering and persistence.
    pub fn snapshot(&self) -> Board {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(board: &Board, column: ColumnId) -> Vec<String> {
        board.cards(column).iter().map(|c| c.id.clone()).collect()
    }

    #[test]
    fn empty_board_has_three_empty_columns() {
        let board = Board::empty();
        for column in ColumnId::ALL {
            assert!(board.cards(column).is_empty());
        }
        assert_eq!(board.total_cards(), 0);
    }

    #[test]
    fn example_board_has_nine_cards() {
        let board = Board::example();
        assert_eq!(board.total_cards(), 9);
        assert_eq!(board.cards(ColumnId::First).len(), 3);
        assert_eq!(board.cards(ColumnId::Second).len(), 3);
        assert_eq!(board.cards(ColumnId::Third).len(), 3);
        assert_eq!(board.cards(ColumnId::First)[0].text, "Card 1");
    }

    #[test]
    fn add_card_appends_at_end() {
        let mut board = Board::empty();
        board.add_card(ColumnId::First, "A").unwrap();
        let card = board.add_card(ColumnId::First, "B").unwrap();
        assert_eq!(board.cards(ColumnId::First).len(), 2);
        assert_eq!(board.cards(ColumnId::First)[1], card);
    }

    #[test]
    fn add_card_blank_text_fails() {
        let mut board = Board::empty();
        assert!(matches!(
            board.add_card(ColumnId::First, ""),
            Err(TroikaError::EmptyCardText)
        ));
        assert!(matches!(
            board.add_card(ColumnId::First, "   \n\t "),
            Err(TroikaError::EmptyCardText)
        ));
        assert_eq!(board.total_cards(), 0);
    }

    #[test]
    fn delete_card_removes_it() {
        let mut board = Board::empty();
        let card = board.add_card(ColumnId::Second, "Gone soon").unwrap();
        board.delete_card(ColumnId::Second, &card.id);
        assert!(board.cards(ColumnId::Second).is_empty());
    }

    #[test]
    fn delete_only_card_leaves_empty_sequence() {
        let mut board = Board::empty();
        let card = board.add_card(ColumnId::Third, "Solo").unwrap();
        board.delete_card(ColumnId::Third, &card.id);
        assert!(board.cards(ColumnId::Third).is_empty());
        assert_eq!(board.total_cards(), 0);
    }

    #[test]
    fn delete_unknown_id_is_a_noop() {
        let mut board = Board::empty();
        board.add_card(ColumnId::First, "Stays").unwrap();
        board.delete_card(ColumnId::First, "no-such-id");
        assert_eq!(board.cards(ColumnId::First).len(), 1);
    }

    #[test]
    fn move_within_column_reorders_only() {
        let mut board = Board::empty();
        let a = board.add_card(ColumnId::First, "a").unwrap();
        let b = board.add_card(ColumnId::First, "b").unwrap();
        let c = board.add_card(ColumnId::First, "c").unwrap();

        let before: std::collections::BTreeSet<_> =
            ids(&board, ColumnId::First).into_iter().collect();

        board.move_card(&c.id, ColumnId::First, ColumnId::First, 0);
        assert_eq!(ids(&board, ColumnId::First), vec![
            c.id.clone(),
            a.id.clone(),
            b.id.clone()
        ]);

        let after: std::collections::BTreeSet<_> =
            ids(&board, ColumnId::First).into_iter().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn move_index_is_relative_to_post_removal_list() {
        let mut board = Board::empty();
        let a = board.add_card(ColumnId::First, "a").unwrap();
        let b = board.add_card(ColumnId::First, "b").unwrap();
        let c = board.add_card(ColumnId::First, "c").unwrap();

        // Index 2 of [b, c], not of [a, b, c].
        board.move_card(&a.id, ColumnId::First, ColumnId::First, 2);
        assert_eq!(ids(&board, ColumnId::First), vec![b.id, c.id, a.id]);
    }

    #[test]
    fn move_lands_at_requested_index() {
        let mut board = Board::empty();
        for text in ["a", "b", "c", "d"] {
            board.add_card(ColumnId::Second, text).unwrap();
        }
        let moved = board.cards(ColumnId::Second)[3].clone();
        board.move_card(&moved.id, ColumnId::Second, ColumnId::Second, 1);
        let (_, pos, _) = board.find_card(&moved.id).unwrap();
        assert_eq!(pos, 1);
    }

    #[test]
    fn move_index_is_clamped() {
        let mut board = Board::empty();
        let a = board.add_card(ColumnId::First, "a").unwrap();
        board.add_card(ColumnId::Second, "x").unwrap();
        board.move_card(&a.id, ColumnId::First, ColumnId::Second, 99);
        assert_eq!(board.cards(ColumnId::Second)[1].id, a.id);
    }

    #[test]
    fn move_across_columns_conserves_cards() {
        let mut board = Board::empty();
        let x = board.add_card(ColumnId::First, "X").unwrap();
        let keep = board.add_card(ColumnId::First, "keep").unwrap();
        let b0 = board.add_card(ColumnId::Second, "b0").unwrap();
        let b1 = board.add_card(ColumnId::Second, "b1").unwrap();

        board.move_card(&x.id, ColumnId::First, ColumnId::Second, 2);

        assert_eq!(board.total_cards(), 4);
        assert_eq!(ids(&board, ColumnId::First), vec![keep.id]);
        assert_eq!(ids(&board, ColumnId::Second), vec![b0.id, b1.id, x.id]);
    }

    #[test]
    fn move_unknown_id_is_a_noop() {
        let mut board = Board::empty();
        board.add_card(ColumnId::First, "a").unwrap();
        board.move_card("no-such-id", ColumnId::First, ColumnId::Second, 0);
        assert_eq!(board.cards(ColumnId::First).len(), 1);
        assert!(board.cards(ColumnId::Second).is_empty());
    }

    #[test]
    fn mutation_sequence_conserves_counts_and_uniqueness() {
        let mut board = Board::empty();
        let mut adds = 0;
        let mut deletes = 0;

        let a = board.add_card(ColumnId::First, "a").unwrap();
        let b = board.add_card(ColumnId::First, "b").unwrap();
        let c = board.add_card(ColumnId::Second, "c").unwrap();
        adds += 3;

        board.move_card(&a.id, ColumnId::First, ColumnId::Third, 0);
        board.move_card(&c.id, ColumnId::Second, ColumnId::Third, 1);
        board.move_card(&a.id, ColumnId::Third, ColumnId::Third, 5);

        board.delete_card(ColumnId::First, &b.id);
        deletes += 1;

        assert_eq!(board.total_cards(), adds - deletes);

        let mut seen = std::collections::BTreeSet::new();
        for column in ColumnId::ALL {
            for card in board.cards(column) {
                assert!(seen.insert(card.id.clone()), "duplicate id {}", card.id);
            }
        }
    }

    #[test]
    fn snapshot_is_an_independent_copy() {
        let mut board = Board::empty();
        board.add_card(ColumnId::First, "original").unwrap();
        let snapshot = board.snapshot();

        board.add_card(ColumnId::First, "later").unwrap();
        assert_eq!(snapshot.cards(ColumnId::First).len(), 1);
        assert_eq!(board.cards(ColumnId::First).len(), 2);
    }

    #[test]
    fn board_serializes_as_column_key_map() {
        let board = Board::empty();
        let value = serde_json::to_value(&board).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 3);
        assert!(object.contains_key("column-first"));
        assert!(object.contains_key("column-second"));
        assert!(object.contains_key("column-third"));
        assert!(object["column-first"].as_array().unwrap().is_empty());
    }

    #[test]
    fn board_roundtrip_json() {
        let mut board = Board::example();
        let moved = board.cards(ColumnId::First)[0].clone();
        board.move_card(&moved.id, ColumnId::First, ColumnId::Third, 1);

        let json = serde_json::to_string_pretty(&board).unwrap();
        let deserialized: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(board, deserialized);
    }

    #[test]
    fn column_id_parses_aliases() {
        assert_eq!("todo".parse::<ColumnId>().unwrap(), ColumnId::First);
        assert_eq!("Doing".parse::<ColumnId>().unwrap(), ColumnId::Second);
        assert_eq!("column-third".parse::<ColumnId>().unwrap(), ColumnId::Third);
        assert!("backlog".parse::<ColumnId>().is_err());
    }

    #[test]
    fn column_titles_are_stable() {
        assert_eq!(ColumnId::First.title(), "TODO");
        assert_eq!(ColumnId::Second.title(), "IN PROGRESS");
        assert_eq!(ColumnId::Third.title(), "DONE");
    }
}
