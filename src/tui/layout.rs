use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::model::{Board, ColumnId};

use super::app::AddCardForm;
use super::drag::DragSession;

/// 3-row bordered input plus the controls line.
pub const FORM_HEIGHT: u16 = 4;

/// Rectangle map of one rendered frame. Event handlers hit-test against
/// this; nothing is ever read back out of the frame itself.
#[derive(Debug, Clone, Default)]
pub struct BoardLayout {
    pub area: Rect,
    pub columns: Vec<ColumnLayout>,
}

#[derive(Debug, Clone)]
pub struct ColumnLayout {
    pub id: ColumnId,
    pub area: Rect,
    /// The card list area, i.e. the drop surface.
    pub content: Rect,
    /// Visible cards in order. During a drag the dragged card is absent,
    /// so slot indexes double as post-removal insertion indexes.
    pub cards: Vec<CardSlot>,
    pub placeholder: Option<Rect>,
    /// The add-card trigger; `None` while this column's form is open.
    pub add_button: Option<Rect>,
    pub form: Option<FormLayout>,
}

#[derive(Debug, Clone)]
pub struct CardSlot {
    pub id: String,
    pub rect: Rect,
    pub delete: Rect,
}

#[derive(Debug, Clone)]
pub struct FormLayout {
    pub area: Rect,
    pub input: Rect,
    pub submit: Rect,
    pub cancel: Rect,
}

pub fn hit(rect: Rect, x: u16, y: u16) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

/// Bordered cards: text lines plus the frame.
pub fn card_height(text: &str) -> u16 {
    text.lines().count().max(1) as u16 + 2
}

pub fn layout_board(
    board: &Board,
    drag: Option<&DragSession>,
    form: Option<&AddCardForm>,
    area: Rect,
) -> BoardLayout {
    let col_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(area);

    let columns = ColumnId::ALL
        .into_iter()
        .enumerate()
        .map(|(i, id)| layout_column(board, drag, form, id, col_areas[i]))
        .collect();

    BoardLayout { area, columns }
}

fn layout_column(
    board: &Board,
    drag: Option<&DragSession>,
    form: Option<&AddCardForm>,
    id: ColumnId,
    area: Rect,
) -> ColumnLayout {
    let inner = inset(area);

    let form_open = form.is_some_and(|f| f.column == id);
    let wanted_footer = if form_open { FORM_HEIGHT } else { 1 };
    let footer_height = wanted_footer.min(inner.height);
    let content = Rect {
        x: inner.x,
        y: inner.y,
        width: inner.width,
        height: inner.height - footer_height,
    };
    let footer = Rect {
        x: inner.x,
        y: inner.y + content.height,
        width: inner.width,
        height: footer_height,
    };

    let dragged_id = drag.map(|d| d.card_id.as_str());
    let insertion = drag.map(|d| d.insertion);
    let bottom = content.y + content.height;

    let mut cards = Vec::new();
    let mut placeholder = None;
    let mut y = content.y;
    let mut visible_index = 0usize;

    for card in board.cards(id) {
        if Some(card.id.as_str()) == dragged_id {
            continue;
        }
        if placeholder.is_none()
            && insertion.is_some_and(|p| p.column == id && p.index == visible_index)
        {
            y += reserve_placeholder(&mut placeholder, drag, content, y, bottom);
        }
        let remaining = bottom.saturating_sub(y);
        if remaining == 0 {
            break;
        }
        let rect = Rect {
            x: content.x,
            y,
            width: content.width,
            height: card_height(&card.text).min(remaining),
        };
        let delete = Rect {
            x: (rect.x + rect.width).saturating_sub(2),
            y: rect.y,
            width: 1,
            height: 1,
        };
        cards.push(CardSlot {
            id: card.id.clone(),
            rect,
            delete,
        });
        y += rect.height;
        visible_index += 1;
    }
    if placeholder.is_none()
        && insertion.is_some_and(|p| p.column == id && p.index >= visible_index)
    {
        reserve_placeholder(&mut placeholder, drag, content, y, bottom);
    }

    let (add_button, form_layout) = if form_open {
        let input = Rect {
            x: footer.x,
            y: footer.y,
            width: footer.width,
            height: footer.height.saturating_sub(1),
        };
        let controls_y = footer.y + input.height;
        let submit = Rect {
            x: footer.x,
            y: controls_y,
            width: 12u16.min(footer.width),
            height: 1,
        };
        let cancel = Rect {
            x: footer.x + submit.width + 1,
            y: controls_y,
            width: 3u16.min(footer.width.saturating_sub(submit.width + 1)),
            height: 1,
        };
        (
            None,
            Some(FormLayout {
                area: footer,
                input,
                submit,
                cancel,
            }),
        )
    } else {
        (Some(footer), None)
    };

    ColumnLayout {
        id,
        area,
        content,
        cards,
        placeholder,
        add_button,
        form: form_layout,
    }
}

fn reserve_placeholder(
    placeholder: &mut Option<Rect>,
    drag: Option<&DragSession>,
    content: Rect,
    y: u16,
    bottom: u16,
) -> u16 {
    let wanted = drag.map(|d| d.height).unwrap_or(3);
    let height = wanted.min(bottom.saturating_sub(y));
    if height > 0 {
        *placeholder = Some(Rect {
            x: content.x,
            y,
            width: content.width,
            height,
        });
    }
    height
}

fn inset(r: Rect) -> Rect {
    Rect {
        x: r.x.saturating_add(1),
        y: r.y.saturating_add(1),
        width: r.width.saturating_sub(2),
        height: r.height.saturating_sub(2),
    }
}
