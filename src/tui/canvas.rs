use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::backend::CrosstermBackend;
use ratatui::{Frame, Terminal};

use crate::config::Config;
use crate::editor::form::Widget;
use crate::editor::panel::{PanelMode, PanelOutcome};
use crate::error::PhilosophyError;
use crate::state::AppState;
use crate::surface::scene::Scene;
use crate::surface::{ArrowKind, Point, ShapeId};
use crate::thought::model::{Thought, ThoughtId};
use crate::tui::input::{self, Action, Direction, Focus};
use crate::tui::render::{self, DialogView, FrameAreas, RenderData};

/// Demo thoughts: name, thinker, text, and where to drag them from the default
/// position.
const DEMO_THOUGHTS: [(&str, &str, &str, (f64, f64)); 3] = [
    ("Cogito", "Descartes", "I think, therefore I am.", (-150.0, -150.0)),
    ("Tabula rasa", "Locke", "The mind starts as a blank slate.", (250.0, -150.0)),
    ("Esse est percipi", "Berkeley", "To be is to be perceived.", (100.0, 150.0)),
];

/// Offsets for the demo arrows, one per kind in [`ArrowKind::ALL`] order.
const DEMO_ARROW_OFFSETS: [(f64, f64); 3] = [(140.0, -50.0), (330.0, 90.0), (20.0, 260.0)];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Dialog {
    Confirm(&'static str),
    Alert(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragState {
    shape: ShapeId,
    last: Point,
}

/// One interactive editing session over an in-memory scene.
#[derive(Debug)]
pub struct Session {
    app: AppState<Scene>,
    focus: Focus,
    selected: Option<ShapeId>,
    dialog: Option<Dialog>,
    status_message: Option<String>,
    show_help: bool,
    drag_step: f64,
    panel_width: u16,
    dragging: Option<DragState>,
    areas: FrameAreas,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        Self {
            app: AppState::new(config.scene(), config.canvas_size(), config.create_defaults()),
            focus: Focus::Panel,
            selected: None,
            dialog: None,
            status_message: None,
            show_help: false,
            drag_step: config.drag_step,
            panel_width: config.panel_width,
            dragging: None,
            areas: FrameAreas::default(),
        }
    }

    pub fn app(&self) -> &AppState<Scene> {
        &self.app
    }

    /// Fill the canvas with a few thoughts and one arrow of each kind.
    pub fn seed_demo(&mut self) -> Result<(), PhilosophyError> {
        for (name, thinker, text, (dx, dy)) in DEMO_THOUGHTS {
            let id = self.app.submit_create(name)?;
            let circle = {
                let thought = self
                    .app
                    .registry_mut()
                    .get_mut(id)
                    .ok_or(PhilosophyError::UnknownThought(id))?;
                thought.details_mut().set("thinker", thinker);
                thought.details_mut().set("text", text);
                thought
                    .visual()
                    .map(|binding| binding.circle())
                    .ok_or(PhilosophyError::NotDrawn(id))?
            };
            self.app.surface_mut().drag(circle, dx, dy)?;
        }
        for (kind, (dx, dy)) in ArrowKind::ALL.into_iter().zip(DEMO_ARROW_OFFSETS) {
            self.app.add_arrow(kind)?;
            if let Some(arrow) = self.app.registry().arrows().last().map(|a| a.shape()) {
                self.app.surface_mut().drag(arrow, dx, dy)?;
            }
        }
        self.status_message = Some("demo canvas: nothing here is saved".to_string());
        Ok(())
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        let panel_title = match self.app.editor().mode() {
            PanelMode::Create => "Create",
            PanelMode::Editing(_) => "Edit",
        };
        let dialog = match &self.dialog {
            Some(Dialog::Confirm(question)) => Some(DialogView::Confirm(*question)),
            Some(Dialog::Alert(message)) => Some(DialogView::Alert(message.as_str())),
            None => None,
        };
        let hints = self.hints();
        let data = RenderData {
            form: self.app.editor().form(),
            panel_title,
            scene: self.app.surface(),
            selected: self.selected,
            focus: self.focus,
            panel_width: self.panel_width,
            hints,
            message: self.status_message.as_deref(),
            thought_count: self.app.registry().len(),
            arrow_count: self.app.registry().arrows().len(),
            show_help: self.show_help,
            dialog,
        };
        let areas = render::draw(frame, &data);
        self.areas = areas;
    }

    fn hints(&self) -> &'static str {
        match (&self.dialog, self.focus) {
            (Some(Dialog::Confirm(_)), _) => "[y/Enter] yes  [n/Esc] no",
            (Some(Dialog::Alert(_)), _) => "[any key] close",
            (None, Focus::Panel) => "[Tab] next  [Enter] press  [Esc] canvas  [Ctrl-c] quit",
            (None, Focus::Canvas) => {
                "[Tab] select  [Enter] open  [←↑↓→/hjkl] drag  [i/Esc] panel  [?] help  [q] quit"
            }
        }
    }

    /// Handle one key press. Returns `true` when the session should end.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if let Some(dialog) = self.dialog.take() {
            match dialog {
                Dialog::Confirm(question) => self.handle_confirm_key(key, question),
                Dialog::Alert(_) => {}
            }
            return false;
        }
        if self.show_help {
            self.show_help = false;
            return false;
        }
        self.status_message = None;

        match input::action_for_key(key, self.focus) {
            Action::Quit => return true,
            Action::ToggleHelp => self.show_help = true,
            Action::FocusPanel => self.focus = Focus::Panel,
            Action::FocusCanvas => self.focus = Focus::Canvas,
            Action::NextWidget => self.app.editor_mut().focus_next(),
            Action::PrevWidget => self.app.editor_mut().focus_prev(),
            Action::NextElement => self.cycle_selection(true),
            Action::PrevElement => self.cycle_selection(false),
            Action::Activate => match self.focus {
                Focus::Panel => self.activate_panel(),
                Focus::Canvas => self.open_selected(),
            },
            Action::Move(direction) => match self.focus {
                Focus::Panel => match direction {
                    Direction::Left => self.app.editor_mut().cursor_left(),
                    Direction::Right => self.app.editor_mut().cursor_right(),
                    Direction::Up | Direction::Down => {}
                },
                Focus::Canvas => self.nudge_selected(direction),
            },
            Action::InputChar(c) => {
                let result = self.app.insert_char(c);
                self.report(result);
            }
            Action::Backspace => {
                let result = self.app.backspace();
                self.report(result);
            }
            Action::Noop => {}
        }
        false
    }

    fn handle_confirm_key(&mut self, key: KeyEvent, question: &'static str) {
        let affirmative = match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => true,
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => false,
            _ => {
                self.dialog = Some(Dialog::Confirm(question));
                return;
            }
        };
        match self.app.resolve_destroy(affirmative) {
            Ok(Some(thought)) => {
                self.status_message = Some(format!("thought {thought} un-thought"));
                self.drop_stale_selection();
                self.focus = Focus::Panel;
            }
            Ok(None) => {}
            Err(err) => self.report_error(err),
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.dialog.is_some() || self.show_help {
            return;
        }
        let canvas = self.app.canvas();
        let point = render::canvas_point(
            self.areas.canvas,
            mouse.column,
            mouse.row,
            canvas.width,
            canvas.height,
        );

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.status_message = None;
                if let Some(point) = point {
                    self.press_canvas(point);
                } else {
                    self.press_panel(mouse.column, mouse.row);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let (Some(drag), Some(point)) = (self.dragging, point) {
                    let moved = self.app.surface_mut().drag(
                        drag.shape,
                        point.x - drag.last.x,
                        point.y - drag.last.y,
                    );
                    self.report(moved.map_err(PhilosophyError::from));
                    self.dragging = Some(DragState {
                        shape: drag.shape,
                        last: point,
                    });
                }
            }
            MouseEventKind::Up(MouseButton::Left) => self.dragging = None,
            _ => {}
        }
    }

    /// A press on the canvas selects the element under it and follows its
    /// click route. Empty canvas brings back the create form.
    fn press_canvas(&mut self, point: Point) {
        self.focus = Focus::Canvas;
        let Some(shape) = self.app.surface().hit_test(point) else {
            self.selected = None;
            if self.app.editor().mode() != PanelMode::Create {
                self.app.editor_mut().reset();
            }
            return;
        };
        self.selected = Some(shape);
        self.dragging = Some(DragState { shape, last: point });
        if let Some(thought) = self.app.surface().click_at(point) {
            self.open_thought(thought);
        }
    }

    fn press_panel(&mut self, column: u16, row: u16) {
        let panel = self.areas.panel;
        if column < panel.x
            || row < panel.y
            || column >= panel.x + panel.width
            || row >= panel.y + panel.height
        {
            return;
        }
        let Some(idx) = render::widget_at_row(self.app.editor().form(), usize::from(row - panel.y))
        else {
            return;
        };
        self.focus = Focus::Panel;
        if !self.app.editor_mut().focus_widget(idx) {
            return;
        }
        let action = match self.app.editor().form().focused() {
            Some(Widget::Button { action, .. }) => Some(*action),
            _ => None,
        };
        if let Some(action) = action {
            let result = self.app.press(action);
            self.apply_result(result);
        }
    }

    fn activate_panel(&mut self) {
        let result = self.app.activate();
        self.apply_result(result);
    }

    fn apply_result(&mut self, result: Result<PanelOutcome, PhilosophyError>) {
        match result {
            Ok(outcome) => self.apply_outcome(outcome),
            Err(err) => self.report_error(err),
        }
    }

    fn apply_outcome(&mut self, outcome: PanelOutcome) {
        match outcome {
            PanelOutcome::None => {}
            PanelOutcome::Created(thought) => {
                let name = self
                    .app
                    .registry()
                    .get(thought)
                    .map(Thought::name)
                    .unwrap_or_default();
                self.status_message = Some(format!("thought {thought} \"{name}\" created"));
            }
            PanelOutcome::ArrowAdded(kind) => {
                self.selected = self.app.registry().arrows().last().map(|a| a.shape());
                self.status_message = Some(format!(
                    "{} arrow added: select it on the canvas and drag it into place",
                    kind.label()
                ));
            }
            PanelOutcome::Confirm(question) => self.dialog = Some(Dialog::Confirm(question)),
        }
    }

    fn open_thought(&mut self, thought: ThoughtId) {
        match self.app.click(thought) {
            Ok(()) => {
                let name = self.app.editor().form().heading().unwrap_or_default();
                self.status_message = Some(format!("editing \"{name}\""));
                self.focus = Focus::Panel;
            }
            Err(err) => self.report_error(err),
        }
    }

    fn open_selected(&mut self) {
        if let Some(thought) = self
            .selected
            .and_then(|shape| self.app.surface().click_route(shape))
        {
            self.open_thought(thought);
        }
    }

    fn cycle_selection(&mut self, forward: bool) {
        let roots: Vec<ShapeId> = self.app.surface().roots().map(|s| s.id).collect();
        if roots.is_empty() {
            self.selected = None;
            return;
        }
        let current = self
            .selected
            .and_then(|id| roots.iter().position(|root| *root == id));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => roots.len() - 1,
            (Some(idx), true) => (idx + 1) % roots.len(),
            (Some(idx), false) => (idx + roots.len() - 1) % roots.len(),
        };
        self.selected = Some(roots[next]);
    }

    fn nudge_selected(&mut self, direction: Direction) {
        let Some(shape) = self.selected else {
            self.status_message = Some("nothing selected: [Tab] picks an element".to_string());
            return;
        };
        let step = self.drag_step;
        let (dx, dy) = match direction {
            Direction::Up => (0.0, -step),
            Direction::Down => (0.0, step),
            Direction::Left => (-step, 0.0),
            Direction::Right => (step, 0.0),
        };
        let moved = self.app.surface_mut().drag(shape, dx, dy);
        self.report(moved.map_err(PhilosophyError::from));
    }

    fn drop_stale_selection(&mut self) {
        if self
            .selected
            .is_some_and(|shape| !self.app.surface().contains(shape))
        {
            self.selected = None;
        }
        self.dragging = None;
    }

    fn report<T>(&mut self, result: Result<T, PhilosophyError>) {
        if let Err(err) = result {
            self.report_error(err);
        }
    }

    /// Empty names get a modal alert; anything else lands in the status line.
    fn report_error(&mut self, err: PhilosophyError) {
        match err {
            PhilosophyError::EmptyName => self.dialog = Some(Dialog::Alert(err.to_string())),
            other => {
                tracing::warn!(error = %other, "operation failed");
                self.status_message = Some(format!("error: {other}"));
            }
        }
    }
}

pub fn run(config: &Config, demo: bool) -> Result<()> {
    let mut session = Session::new(config);
    if demo {
        session
            .seed_demo()
            .context("failed to seed the demo canvas")?;
    }

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    tracing::info!(demo, "session started");

    loop {
        terminal.draw(|f| session.draw(f))?;
        if !event::poll(Duration::from_millis(200))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if session.handle_key(key) {
                    break;
                }
            }
            Event::Mouse(mouse) => session.handle_mouse(mouse),
            _ => {}
        }
    }

    tracing::info!(
        thoughts = session.app().registry().len(),
        arrows = session.app().registry().arrows().len(),
        "session ended"
    );
    Ok(())
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, DisableMouseCapture, LeaveAlternateScreen);
    }
}
