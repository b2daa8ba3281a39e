use ratatui::layout::Rect;

use crate::model::ColumnId;

use super::layout::{BoardLayout, hit};

/// The pending drop slot: where the placeholder currently sits. Indexes
/// are relative to the target column with the dragged card removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertPoint {
    pub column: ColumnId,
    pub index: usize,
}

/// Live drag state. Created on mouse-down over a card body, destroyed on
/// release or focus loss. `engaged` flips on the first motion; until then
/// the session is merely armed and a release is a plain click.
#[derive(Debug, Clone)]
pub struct DragSession {
    pub card_id: String,
    pub origin_column: ColumnId,
    pub origin_index: usize,
    grab_dx: u16,
    grab_dy: u16,
    pub width: u16,
    pub height: u16,
    pointer_x: u16,
    pointer_y: u16,
    pub engaged: bool,
    pub insertion: InsertPoint,
}

impl DragSession {
    pub fn new(
        card_id: impl Into<String>,
        column: ColumnId,
        index: usize,
        rect: Rect,
        x: u16,
        y: u16,
    ) -> Self {
        Self {
            card_id: card_id.into(),
            origin_column: column,
            origin_index: index,
            grab_dx: x.saturating_sub(rect.x),
            grab_dy: y.saturating_sub(rect.y),
            width: rect.width,
            height: rect.height,
            pointer_x: x,
            pointer_y: y,
            engaged: false,
            insertion: InsertPoint { column, index },
        }
    }

    /// Track one pointer motion: engage the drag and recompute the
    /// insertion point against the current layout.
    pub fn update_pointer(&mut self, x: u16, y: u16, layout: &BoardLayout) {
        self.engaged = true;
        self.pointer_x = x;
        self.pointer_y = y;
        self.insertion = insertion_at(layout, x, y, self.insertion);
    }

    /// Where the floating proxy goes: the grab point stays under the
    /// pointer, clamped into the frame.
    pub fn proxy_rect(&self, frame: Rect) -> Rect {
        let width = self.width.min(frame.width);
        let height = self.height.min(frame.height);
        let max_x = (frame.x + frame.width).saturating_sub(width);
        let max_y = (frame.y + frame.height).saturating_sub(height);
        Rect {
            x: self.pointer_x.saturating_sub(self.grab_dx).clamp(frame.x, max_x),
            y: self.pointer_y.saturating_sub(self.grab_dy).clamp(frame.y, max_y),
            width,
            height,
        }
    }
}

/// The insertion point under the pointer. Inside an empty column the
/// placeholder becomes its sole entry; over a card the pointer row is
/// compared to the card's midpoint (below means after it). Anywhere else
/// the previous point stands.
pub fn insertion_at(layout: &BoardLayout, x: u16, y: u16, current: InsertPoint) -> InsertPoint {
    let Some(column) = layout.columns.iter().find(|c| hit(c.content, x, y)) else {
        return current;
    };
    if column.cards.is_empty() {
        return InsertPoint {
            column: column.id,
            index: 0,
        };
    }
    for (index, slot) in column.cards.iter().enumerate() {
        if hit(slot.rect, x, y) {
            let midpoint = slot.rect.y + slot.rect.height / 2;
            let index = if y > midpoint { index + 1 } else { index };
            return InsertPoint {
                column: column.id,
                index,
            };
        }
    }
    current
}
