use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use crate::error::{Result, TroikaError};
use crate::model::ColumnId;
use crate::storage::Store;

#[derive(Parser, Debug)]
#[command(name = "troika", version, about = "Three columns, your cards, the mouse.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Data directory (defaults to ~/.troika)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the board
    List,

    /// Add a new card
    Add {
        /// Card text
        text: String,
        /// Target column (first/second/third, or todo/doing/done)
        #[arg(long, default_value = "first")]
        to: String,
    },

    /// Move a card to a column position
    Move {
        /// Card ID
        id: String,
        /// Target column
        #[arg(long)]
        to: String,
        /// Position in the target column (defaults to the end)
        #[arg(long)]
        at: Option<usize>,
    },

    /// Delete a card permanently
    Delete {
        /// Card ID
        id: String,
    },

    /// Launch the TUI
    Tui,

    /// Show version
    Version,
}

// --- Command implementations ---

pub fn list(store: &Store, json_output: bool) -> Result<()> {
    let board = store.load_or_example();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&board)?);
        return Ok(());
    }

    for column in ColumnId::ALL {
        let cards = board.cards(column);
        let header = format!("── {} ({}) ──", column.title(), cards.len());
        println!("{}", header.cyan().bold());

        for (i, card) in cards.iter().enumerate() {
            println!("  {}. {}  {}", i + 1, card.summary(), card.id.dimmed());
        }
        println!();
    }
    Ok(())
}

pub fn add(store: &Store, text: &str, to: &str, json_output: bool) -> Result<()> {
    let column: ColumnId = to.parse()?;
    let mut board = store.load_or_example();

    let card = board.add_card(column, text)?;
    store.save_cards(&board)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&card)?);
    } else {
        println!("Added: {} → {}", card.summary(), column.title());
    }
    Ok(())
}

pub fn move_card(
    store: &Store,
    id: &str,
    to: &str,
    at: Option<usize>,
    json_output: bool,
) -> Result<()> {
    let column: ColumnId = to.parse()?;
    let mut board = store.load_or_example();

    let (from, _, card) = board
        .find_card(id)
        .ok_or_else(|| TroikaError::CardNotFound(id.into()))?;
    let summary = card.summary().to_string();

    // No position given: append at the end (the clamp lands it there).
    board.move_card(id, from, column, at.unwrap_or(usize::MAX));
    store.save_cards(&board)?;

    if json_output {
        let (_, index, _) = board.find_card(id).expect("card was just moved");
        println!(
            "{}",
            serde_json::json!({"moved": id, "to": column, "index": index})
        );
    } else {
        println!("Moved: {} → {}", summary, column.title());
    }
    Ok(())
}

pub fn delete(store: &Store, id: &str, json_output: bool) -> Result<()> {
    let mut board = store.load_or_example();

    let (column, _, card) = board
        .find_card(id)
        .ok_or_else(|| TroikaError::CardNotFound(id.into()))?;
    let summary = card.summary().to_string();

    board.delete_card(column, id);
    store.save_cards(&board)?;

    if json_output {
        println!("{}", serde_json::json!({"deleted": id, "text": summary}));
    } else {
        println!("Deleted: {summary}");
    }
    Ok(())
}

pub fn version() -> Result<()> {
    println!("troika {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}

pub fn default_action() -> Result<()> {
    println!("troika: three columns, your cards, the mouse.");
    println!();
    println!("Run `troika tui` to open the board or `troika --help` for usage.");
    Ok(())
}
