//! Application state: the live thoughts, the editor panel, and the canvas.

use crate::editor::form::ButtonAction;
use crate::editor::panel::{CreateDefaults, EditorPanel, PanelOutcome};
use crate::error::{PhilosophyError, Result};
use crate::surface::{ArrowKind, Surface};
use crate::thought::model::{Details, Lifecycle, Thought, ThoughtId};
use crate::thought::visual::ArrowBinding;

/// Every thought currently on the canvas, plus the arrows drawn so far.
///
/// Only drawn thoughts are ever registered; un-thinking removes them.
#[derive(Debug, Default)]
pub struct Registry {
    thoughts: Vec<Thought>,
    arrows: Vec<ArrowBinding>,
    last_id: u64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name a new thought with a fresh id. Ids are only used up on success.
    pub fn think(&mut self, raw_name: &str, details: Details) -> Result<Thought> {
        let thought = Thought::think(ThoughtId::new(self.last_id + 1), raw_name, details)?;
        self.last_id += 1;
        Ok(thought)
    }

    pub fn register(&mut self, thought: Thought) -> Result<ThoughtId> {
        let id = thought.id();
        if !thought.is_drawn() {
            return Err(match thought.lifecycle() {
                Lifecycle::Unthought => PhilosophyError::Unthought(id),
                _ => PhilosophyError::NotDrawn(id),
            });
        }
        if self.contains(id) {
            return Err(PhilosophyError::AlreadyDrawn(id));
        }
        self.thoughts.push(thought);
        Ok(id)
    }

    /// Un-think a registered thought and hand back the dead record.
    ///
    /// The thought stays registered if the surface cannot release its shapes.
    pub fn unthink(&mut self, id: ThoughtId, surface: &mut dyn Surface) -> Result<Thought> {
        let idx = self
            .thoughts
            .iter()
            .position(|t| t.id() == id)
            .ok_or(PhilosophyError::UnknownThought(id))?;
        self.thoughts[idx].unthink(surface)?;
        Ok(self.thoughts.remove(idx))
    }

    pub fn get(&self, id: ThoughtId) -> Option<&Thought> {
        self.thoughts.iter().find(|t| t.id() == id)
    }

    pub fn get_mut(&mut self, id: ThoughtId) -> Option<&mut Thought> {
        self.thoughts.iter_mut().find(|t| t.id() == id)
    }

    pub fn contains(&self, id: ThoughtId) -> bool {
        self.get(id).is_some()
    }

    /// Live thoughts in creation order.
    pub fn thoughts(&self) -> &[Thought] {
        &self.thoughts
    }

    pub fn len(&self) -> usize {
        self.thoughts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thoughts.is_empty()
    }

    pub fn add_arrow(&mut self, arrow: ArrowBinding) {
        self.arrows.push(arrow);
    }

    pub fn arrows(&self) -> &[ArrowBinding] {
        &self.arrows
    }
}

/// Size of the drawing surface, in canvas units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

/// Everything the editor works on, owned in one place and lent out per call.
#[derive(Debug)]
pub struct AppState<S> {
    registry: Registry,
    editor: EditorPanel,
    canvas: CanvasSize,
    surface: S,
}

impl<S: Surface> AppState<S> {
    pub fn new(surface: S, canvas: CanvasSize, defaults: CreateDefaults) -> Self {
        Self {
            registry: Registry::new(),
            editor: EditorPanel::new(defaults),
            canvas,
            surface,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn editor(&self) -> &EditorPanel {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut EditorPanel {
        &mut self.editor
    }

    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn submit_create(&mut self, raw_name: &str) -> Result<ThoughtId> {
        self.editor.submit_create(raw_name, &mut self.registry, &mut self.surface)
    }

    pub fn edit(&mut self, thought: ThoughtId) -> Result<()> {
        self.editor.edit(thought, &self.registry)
    }

    /// A click on a thought's shape opens it in the editor.
    pub fn click(&mut self, thought: ThoughtId) -> Result<()> {
        self.edit(thought)
    }

    pub fn add_arrow(&mut self, kind: ArrowKind) -> Result<()> {
        self.editor.add_arrow(kind, &mut self.registry, &mut self.surface)
    }

    pub fn resolve_destroy(&mut self, affirmative: bool) -> Result<Option<ThoughtId>> {
        self.editor.resolve_destroy(affirmative, &mut self.registry, &mut self.surface)
    }

    pub fn activate(&mut self) -> Result<PanelOutcome> {
        self.editor.activate(&mut self.registry, &mut self.surface)
    }

    pub fn press(&mut self, action: ButtonAction) -> Result<PanelOutcome> {
        self.editor.press(action, &mut self.registry, &mut self.surface)
    }

    pub fn insert_char(&mut self, c: char) -> Result<()> {
        self.editor.insert_char(c, &mut self.registry)
    }

    pub fn backspace(&mut self) -> Result<()> {
        self.editor.backspace(&mut self.registry)
    }
}
