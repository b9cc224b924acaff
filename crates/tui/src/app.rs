use crate::presentation::PayloadRenderer;
use crate::theme::AuthorPalette;
use crate::trace_view::TraceView;
use crate::views::trace::HitMap;
use crossterm::event::{KeyCode, MouseEvent, MouseEventKind};
use otlog_core::ClientTrace;
use otlog_runtime_config::{ViewerConfig, ViewerSettings};

const PAGE_ROWS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Trace,
    Help,
}

pub struct App<P> {
    pub view: TraceView<P>,
    pub screen: Screen,
    /// First visible row, counted newest-first.
    pub scroll: usize,
    /// Index into the focus order while a unit is keyboard-focused.
    pub focus: Option<usize>,
    /// Marker cells of the last drawn frame.
    pub hits: HitMap,
    pub settings: ViewerSettings,
    pub palette: AuthorPalette,
    pub title: String,
    /// Diagram invariant violations found at load time.
    pub warnings: Vec<String>,
    pub flash_message: Option<String>,
    renderer: Box<dyn PayloadRenderer<P>>,
}

impl<P: Clone> App<P> {
    pub fn new(
        trace: ClientTrace<P>,
        config: &ViewerConfig,
        renderer: Box<dyn PayloadRenderer<P>>,
    ) -> Self {
        Self {
            view: TraceView::new(trace),
            screen: Screen::Trace,
            scroll: 0,
            focus: None,
            hits: HitMap::default(),
            settings: config.viewer.clone(),
            palette: AuthorPalette::from_rgb(&config.palette.parsed_colors()),
            title: String::new(),
            warnings: Vec::new(),
            flash_message: None,
            renderer,
        }
    }
}

impl<P> App<P> {
    pub fn row_count(&self) -> usize {
        self.view.trace().log.len() + 1
    }

    /// Returns true if the app should quit.
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        self.flash_message = None;

        if self.screen == Screen::Help {
            // Any key exits help
            self.screen = Screen::Trace;
            return false;
        }

        match key {
            KeyCode::Char('q') => return true,
            KeyCode::Char('?') => self.screen = Screen::Help,
            KeyCode::Tab => self.focus_step(true),
            KeyCode::BackTab => self.focus_step(false),
            KeyCode::Esc => self.release_pointer(),
            KeyCode::Char('j') | KeyCode::Down => self.scroll_by(1),
            KeyCode::Char('k') | KeyCode::Up => self.scroll_by(-1),
            KeyCode::PageDown => self.scroll_by(PAGE_ROWS as isize),
            KeyCode::PageUp => self.scroll_by(-(PAGE_ROWS as isize)),
            KeyCode::Char('g') | KeyCode::Home => self.scroll_to(0),
            KeyCode::Char('G') | KeyCode::End => self.scroll_to(self.row_count() - 1),
            _ => {}
        }
        false
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> bool {
        if self.screen == Screen::Help {
            return false;
        }
        match mouse.kind {
            MouseEventKind::Moved => {
                let target = self.hits.unit_at(mouse.column, mouse.row);
                self.focus = target.and_then(|id| {
                    self.view.focus_order().iter().position(|&unit| unit == id)
                });
                self.view.point_at(target, self.renderer.as_ref());
            }
            MouseEventKind::ScrollUp => self.scroll_by(-1),
            MouseEventKind::ScrollDown => self.scroll_by(1),
            _ => {}
        }
        false
    }

    fn scroll_by(&mut self, delta: isize) {
        let target = self.scroll.saturating_add_signed(delta);
        self.scroll_to(target);
    }

    fn scroll_to(&mut self, row: usize) {
        let row = row.min(self.row_count().saturating_sub(1));
        if row == self.scroll {
            return;
        }
        self.scroll = row;
        // Markers move under a stationary pointer.
        self.release_pointer();
    }

    fn release_pointer(&mut self) {
        self.focus = None;
        self.view.point_at(None, self.renderer.as_ref());
    }

    fn focus_step(&mut self, forward: bool) {
        let len = self.view.focus_order().len();
        if len == 0 {
            self.flash_message = Some("No operations in this trace".to_string());
            return;
        }
        let next = match (self.focus, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        };
        let id = self.view.focus_order()[next];
        self.focus = Some(next);
        self.view.point_at(Some(id), self.renderer.as_ref());

        // Bring the focused row into view when it is not on screen.
        if self.hits.rect_of(id).is_none() {
            if let Some(key) = self.view.row_of(id) {
                self.scroll = key.position(self.view.trace().log.len());
            }
        }
    }
}
