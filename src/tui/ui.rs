use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::app::App;
use super::layout::FormLayout;

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Min(0),    // Board
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    draw_title_bar(f, chunks[0], app);
    app.refresh_layout(chunks[1]);
    draw_board(f, app);
    draw_status_bar(f, chunks[2], app);

    // The proxy floats above everything else.
    draw_proxy(f, app);
}

fn draw_title_bar(f: &mut Frame, area: Rect, app: &App) {
    let title = format!(" troika  │  {} cards", app.board.total_cards());
    let bar = Paragraph::new(title).style(
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );
    f.render_widget(bar, area);
}

fn draw_board(f: &mut Frame, app: &App) {
    for column in &app.layout.columns {
        let count = app.board.cards(column.id).len();
        let is_drop_target = app
            .drag
            .as_ref()
            .is_some_and(|d| d.engaged && d.insertion.column == column.id);

        let border_style = if is_drop_target {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::default()
            .title(format!("{} ({count})", column.id.title()))
            .borders(Borders::ALL)
            .border_style(border_style);
        f.render_widget(block, column.area);

        for slot in &column.cards {
            let text = app
                .board
                .cards(column.id)
                .iter()
                .find(|c| c.id == slot.id)
                .map(|c| c.text.clone())
                .unwrap_or_default();
            let card = Paragraph::new(text)
                .block(Block::default().borders(Borders::ALL))
                .wrap(Wrap { trim: false });
            f.render_widget(card, slot.rect);

            let delete = Paragraph::new("\u{2715}").style(Style::default().fg(Color::Red));
            f.render_widget(delete, slot.delete);
        }

        if let Some(rect) = column.placeholder {
            let spot = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM));
            f.render_widget(spot, rect);
        }

        if let Some(rect) = column.add_button {
            let button =
                Paragraph::new("+ Add another card").style(Style::default().fg(Color::DarkGray));
            f.render_widget(button, rect);
        }

        if let Some(form_layout) = &column.form {
            draw_form(f, form_layout, app);
        }
    }
}

fn draw_form(f: &mut Frame, layout: &FormLayout, app: &App) {
    let Some(form) = &app.form else { return };
    let warn = form.warn_until.is_some();

    let (text, style) = if form.input.is_empty() || warn {
        let color = if warn { Color::Red } else { Color::DarkGray };
        (
            "Enter a title for this card...".to_string(),
            Style::default().fg(color),
        )
    } else {
        (format!("{}\u{258f}", form.input), Style::default())
    };

    let border = if warn {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Cyan)
    };
    let input = Paragraph::new(text)
        .style(style)
        .block(Block::default().borders(Borders::ALL).border_style(border))
        .wrap(Wrap { trim: false });
    f.render_widget(input, layout.input);

    let submit = Paragraph::new("[ Add card ]").style(
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );
    f.render_widget(submit, layout.submit);

    let cancel = Paragraph::new(" \u{2715} ").style(Style::default().fg(Color::Red));
    f.render_widget(cancel, layout.cancel);
}

fn draw_proxy(f: &mut Frame, app: &App) {
    let Some(session) = &app.drag else { return };
    if !session.engaged {
        return;
    }
    let text = app
        .board
        .find_card(&session.card_id)
        .map(|(_, _, c)| c.text.clone())
        .unwrap_or_default();

    let rect = session.proxy_rect(f.area());
    f.render_widget(Clear, rect);
    let proxy = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(proxy, rect);
}

fn draw_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let left = if let Some(msg) = &app.message {
        format!(" {msg}")
    } else if app.form.is_some() {
        " Enter to add  │  Esc to cancel".into()
    } else {
        " drag cards with the mouse  │  \u{2715} delete  │  + add  │  q quit".into()
    };
    let bar = Paragraph::new(left).style(
        Style::default()
            .fg(Color::Black)
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );
    f.render_widget(bar, area);
}
