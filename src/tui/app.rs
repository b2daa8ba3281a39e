use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use tracing::warn;

use crate::error::{Result, TroikaError};
use crate::model::{Board, ColumnId, Draft};
use crate::storage::Store;

use super::drag::DragSession;
use super::layout::{BoardLayout, hit, layout_board};
use super::ui;

/// Keystroke quiescence before the draft is written out.
pub const DRAFT_DEBOUNCE: Duration = Duration::from_millis(250);
/// How long the empty-submit warning stays lit.
pub const WARN_DURATION: Duration = Duration::from_secs(1);

/// Semantic click targets, resolved once from the raw mouse position.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    OpenForm(ColumnId),
    CancelForm,
    SubmitForm,
    DeleteCard(ColumnId, String),
}

/// The inline add-card form. At most one exists across the board.
#[derive(Debug, Clone)]
pub struct AddCardForm {
    pub column: ColumnId,
    pub input: String,
    pub warn_until: Option<Instant>,
}

pub struct App {
    pub store: Store,
    pub board: Board,
    pub drag: Option<DragSession>,
    pub form: Option<AddCardForm>,
    pub layout: BoardLayout,
    pub message: Option<String>,
    pub should_quit: bool,
    draft_deadline: Option<Instant>,
}

impl App {
    pub fn new(store: Store) -> Self {
        let board = store.load_or_example();
        Self {
            store,
            board,
            drag: None,
            form: None,
            layout: BoardLayout::default(),
            message: None,
            should_quit: false,
            draft_deadline: None,
        }
    }

    /// Recompute the rectangle map. The draw pass calls this each frame;
    /// tests call it directly in place of a terminal.
    pub fn refresh_layout(&mut self, area: Rect) {
        self.layout = layout_board(&self.board, self.drag.as_ref(), self.form.as_ref(), area);
    }

    pub fn handle_event(&mut self, event: Event, now: Instant) {
        match event {
            Event::Key(key) => self.handle_key(key, now),
            Event::Mouse(mouse) => self.handle_mouse(mouse, now),
            Event::FocusLost => self.handle_focus_lost(),
            _ => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        // Ctrl+C always quits
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.form.is_some() {
            self.handle_form_key(key, now);
            return;
        }

        if key.code == KeyCode::Char('q') {
            self.should_quit = true;
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Esc => self.close_form(),
            KeyCode::Enter => self.submit_form(now),
            KeyCode::Backspace => {
                if let Some(form) = self.form.as_mut() {
                    form.input.pop();
                    self.draft_deadline = Some(now + DRAFT_DEBOUNCE);
                }
            }
            KeyCode::Char(c) => {
                if let Some(form) = self.form.as_mut() {
                    form.input.push(c);
                    self.draft_deadline = Some(now + DRAFT_DEBOUNCE);
                }
            }
            _ => {}
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        let (x, y) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                // A live session here means the release never reached us;
                // reset it instead of letting two drags overlap.
                if self.drag.take().is_some() {
                    warn!("mouse down while a drag session was active, resetting");
                }
                match self.action_at(x, y) {
                    Some(action) => self.dispatch(action, now),
                    None => self.arm_drag(x, y),
                }
            }
            MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
                if let Some(session) = self.drag.as_mut() {
                    session.update_pointer(x, y, &self.layout);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => match self.drag.take() {
                Some(session) if session.engaged => self.commit_drag(session),
                _ => {}
            },
            _ => {}
        }
    }

    /// Losing the terminal is the pointer-leave analog: a drag in flight
    /// commits at the last tracked placeholder position, an armed click
    /// just dissolves.
    pub fn handle_focus_lost(&mut self) {
        match self.drag.take() {
            Some(session) if session.engaged => self.commit_drag(session),
            _ => {}
        }
    }

    fn action_at(&self, x: u16, y: u16) -> Option<Action> {
        for column in &self.layout.columns {
            if let Some(form) = &column.form {
                if hit(form.submit, x, y) {
                    return Some(Action::SubmitForm);
                }
                if hit(form.cancel, x, y) {
                    return Some(Action::CancelForm);
                }
            }
            if column.add_button.is_some_and(|b| hit(b, x, y)) {
                return Some(Action::OpenForm(column.id));
            }
            for slot in &column.cards {
                if hit(slot.delete, x, y) {
                    return Some(Action::DeleteCard(column.id, slot.id.clone()));
                }
            }
        }
        None
    }

    fn dispatch(&mut self, action: Action, now: Instant) {
        match action {
            Action::OpenForm(column) => self.open_form(column),
            Action::CancelForm => self.close_form(),
            Action::SubmitForm => self.submit_form(now),
            Action::DeleteCard(column, id) => {
                self.board.delete_card(column, &id);
                self.persist();
            }
        }
    }

    fn arm_drag(&mut self, x: u16, y: u16) {
        for column in &self.layout.columns {
            for (index, slot) in column.cards.iter().enumerate() {
                if hit(slot.rect, x, y) {
                    self.drag = Some(DragSession::new(
                        slot.id.clone(),
                        column.id,
                        index,
                        slot.rect,
                        x,
                        y,
                    ));
                    return;
                }
            }
        }
    }

    fn commit_drag(&mut self, session: DragSession) {
        self.board.move_card(
            &session.card_id,
            session.origin_column,
            session.insertion.column,
            session.insertion.index,
        );
        self.persist();
        self.message = Some(format!("Moved \u{2192} {}", session.insertion.column.title()));
    }

    pub fn open_form(&mut self, column: ColumnId) {
        self.close_form();
        let input = self
            .store
            .load_draft()
            .filter(|d| d.column == column)
            .map(|d| d.text)
            .unwrap_or_default();
        self.form = Some(AddCardForm {
            column,
            input,
            warn_until: None,
        });
    }

    pub fn close_form(&mut self) {
        if self.form.take().is_some() {
            self.draft_deadline = None;
            if let Err(e) = self.store.clear_draft() {
                warn!("failed to clear draft: {e}");
            }
        }
    }

    pub fn submit_form(&mut self, now: Instant) {
        let Some((column, text)) = self.form.as_ref().map(|f| (f.column, f.input.clone())) else {
            return;
        };
        match self.board.add_card(column, &text) {
            Ok(card) => {
                self.persist();
                self.message = Some(format!("Added: {}", card.summary()));
                self.close_form();
            }
            Err(_) => {
                // Blank text: light the inline warning, keep the form open.
                if let Some(form) = self.form.as_mut() {
                    form.warn_until = Some(now + WARN_DURATION);
                }
            }
        }
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.save_cards(&self.board) {
            warn!("save failed, board kept in memory only: {e}");
            self.message = Some(format!("Save failed: {e}"));
        }
    }

    /// Fire due timers: the draft debounce and the warning highlight.
    pub fn tick(&mut self, now: Instant) {
        if self.draft_deadline.is_some_and(|d| d <= now) {
            self.draft_deadline = None;
            if let Some(form) = &self.form {
                let draft = Draft {
                    column: form.column,
                    text: form.input.clone(),
                };
                if let Err(e) = self.store.save_draft(&draft) {
                    warn!("failed to save draft: {e}");
                }
            }
        }
        if let Some(form) = self.form.as_mut()
            && form.warn_until.is_some_and(|w| w <= now)
        {
            form.warn_until = None;
        }
    }

    /// Poll no longer than the nearest pending deadline.
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        let mut timeout = Duration::from_millis(100);
        let deadlines = [
            self.draft_deadline,
            self.form.as_ref().and_then(|f| f.warn_until),
        ];
        for deadline in deadlines.into_iter().flatten() {
            timeout = timeout.min(deadline.saturating_duration_since(now));
        }
        timeout
    }
}

pub fn run_tui(store: Store) -> Result<()> {
    let mut app = App::new(store);

    enable_raw_mode().map_err(|e| TroikaError::Other(format!("Terminal error: {e}")))?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )
    .map_err(|e| TroikaError::Other(format!("Terminal error: {e}")))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal =
        Terminal::new(backend).map_err(|e| TroikaError::Other(format!("Terminal error: {e}")))?;

    let result = run_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        DisableMouseCapture,
        LeaveAlternateScreen
    )
    .ok();
    terminal.show_cursor().ok();

    result
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal
            .draw(|f| ui::draw(f, app))
            .map_err(|e| TroikaError::Other(format!("Draw error: {e}")))?;

        if event::poll(app.poll_timeout(Instant::now()))
            .map_err(|e| TroikaError::Other(format!("Event error: {e}")))?
        {
            let event =
                event::read().map_err(|e| TroikaError::Other(format!("Event error: {e}")))?;
            app.handle_event(event, Instant::now());
        }
        app.tick(Instant::now());

        if app.should_quit {
            return Ok(());
        }
    }
}
