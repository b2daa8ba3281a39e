mod board;
mod card;
mod draft;

pub use board::{Board, ColumnId};
pub use card::Card;
pub use draft::Draft;
