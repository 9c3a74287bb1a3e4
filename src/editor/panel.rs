//! The editor panel: one form at a time, either creating a thought or editing
//! one.

use crate::editor::form::{ButtonAction, Form, InputTarget, Widget};
use crate::error::{PhilosophyError, Result};
use crate::state::Registry;
use crate::surface::{ArrowKind, Point, Surface};
use crate::thought::model::{Details, ThoughtId, chomp};
use crate::thought::visual::{ArrowBinding, Drawable, Placement};

pub const UNTHINK_PROMPT: &str = "Are you sure you want to un-think this thought?";

/// New arrows start here; they are dragged into place afterwards.
const ARROW_FROM: Point = Point::new(100.0, 100.0);
const ARROW_TO: Point = Point::new(200.0, 200.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelMode {
    Create,
    Editing(ThoughtId),
}

/// What a new thought gets when the create form is submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateDefaults {
    pub details: Vec<String>,
    pub placement: Placement,
}

/// Result of pressing a button in the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelOutcome {
    None,
    Created(ThoughtId),
    ArrowAdded(ArrowKind),
    /// The action waits on a yes/no answer to this question.
    Confirm(&'static str),
}

#[derive(Debug)]
pub struct EditorPanel {
    mode: PanelMode,
    form: Form,
    defaults: CreateDefaults,
    pending_destroy: Option<ThoughtId>,
}

impl EditorPanel {
    pub fn new(defaults: CreateDefaults) -> Self {
        Self {
            mode: PanelMode::Create,
            form: Form::create(),
            defaults,
            pending_destroy: None,
        }
    }

    pub fn mode(&self) -> PanelMode {
        self.mode
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    /// Throw the current form away and show the create form.
    pub fn reset(&mut self) -> &Form {
        self.form = Form::create();
        self.mode = PanelMode::Create;
        self.pending_destroy = None;
        &self.form
    }

    /// Create, draw, and register a thought named `raw_name`.
    ///
    /// The panel stays in its current mode; in create mode the name field is
    /// cleared on success and left untouched on failure.
    pub fn submit_create(
        &mut self,
        raw_name: &str,
        registry: &mut Registry,
        surface: &mut dyn Surface,
    ) -> Result<ThoughtId> {
        let details = Details::blank(self.defaults.details.iter().cloned());
        let mut thought = registry.think(raw_name, details)?;
        thought.draw(surface, self.defaults.placement)?;
        let id = registry.register(thought)?;
        tracing::info!(thought = %id, name = chomp(raw_name), "thought created");

        if self.mode == PanelMode::Create
            && let Some(input) = self.form.input_mut(&InputTarget::Name)
        {
            input.clear();
        }
        Ok(id)
    }

    /// Show the edit form for `thought`, replacing whatever was there.
    pub fn edit(&mut self, thought: ThoughtId, registry: &Registry) -> Result<()> {
        let record = registry
            .get(thought)
            .ok_or(PhilosophyError::UnknownThought(thought))?;
        self.reset();
        self.form = Form::edit(record);
        self.mode = PanelMode::Editing(thought);
        tracing::debug!(%thought, "editing thought");
        Ok(())
    }

    /// Ask before un-thinking `thought`. Answer with [`Self::resolve_destroy`].
    pub fn request_destroy(&mut self, thought: ThoughtId) -> &'static str {
        self.pending_destroy = Some(thought);
        UNTHINK_PROMPT
    }

    /// Act on the answer to [`UNTHINK_PROMPT`].
    ///
    /// Yes: the thought is un-thought and the panel returns to the create form.
    /// No: nothing changes. Returns the thought that was removed, if any. If
    /// the surface fails, the thought stays on the canvas and in the editor.
    pub fn resolve_destroy(
        &mut self,
        affirmative: bool,
        registry: &mut Registry,
        surface: &mut dyn Surface,
    ) -> Result<Option<ThoughtId>> {
        let Some(thought) = self.pending_destroy.take() else {
            return Ok(None);
        };
        if !affirmative {
            return Ok(None);
        }
        registry.unthink(thought, surface)?;
        self.reset();
        Ok(Some(thought))
    }

    pub fn add_arrow(
        &mut self,
        kind: ArrowKind,
        registry: &mut Registry,
        surface: &mut dyn Surface,
    ) -> Result<()> {
        let arrow = ArrowBinding::draw(surface, kind, ARROW_FROM, ARROW_TO)?;
        registry.add_arrow(arrow);
        tracing::info!(kind = kind.label(), "arrow added");
        Ok(())
    }

    /// Activate the focused widget. Enter in the name field means "Think it".
    pub fn activate(
        &mut self,
        registry: &mut Registry,
        surface: &mut dyn Surface,
    ) -> Result<PanelOutcome> {
        let action = match self.form.focused() {
            Some(Widget::Button { action, .. }) => Some(*action),
            Some(Widget::Input(input)) if input.target == InputTarget::Name => {
                Some(ButtonAction::Think)
            }
            _ => None,
        };
        match action {
            Some(action) => self.press(action, registry, surface),
            None => Ok(PanelOutcome::None),
        }
    }

    pub fn press(
        &mut self,
        action: ButtonAction,
        registry: &mut Registry,
        surface: &mut dyn Surface,
    ) -> Result<PanelOutcome> {
        match action {
            ButtonAction::Think => {
                let name = self
                    .form
                    .input(&InputTarget::Name)
                    .map(|input| input.value().to_string())
                    .unwrap_or_default();
                self.submit_create(&name, registry, surface)
                    .map(PanelOutcome::Created)
            }
            ButtonAction::Arrow(kind) => {
                self.add_arrow(kind, registry, surface)?;
                Ok(PanelOutcome::ArrowAdded(kind))
            }
            ButtonAction::Unthink => match self.mode {
                PanelMode::Editing(thought) => {
                    Ok(PanelOutcome::Confirm(self.request_destroy(thought)))
                }
                PanelMode::Create => Ok(PanelOutcome::None),
            },
        }
    }

    pub fn focus_next(&mut self) {
        self.form.focus_next();
    }

    pub fn focus_prev(&mut self) {
        self.form.focus_prev();
    }

    pub fn focus_widget(&mut self, idx: usize) -> bool {
        self.form.focus(idx)
    }

    /// Type a character into the focused input.
    pub fn insert_char(&mut self, c: char, registry: &mut Registry) -> Result<()> {
        if let Some(Widget::Input(input)) = self.form.focused_mut() {
            input.insert(c);
        }
        self.commit_focused(registry)
    }

    pub fn backspace(&mut self, registry: &mut Registry) -> Result<()> {
        let changed = match self.form.focused_mut() {
            Some(Widget::Input(input)) => input.backspace(),
            _ => false,
        };
        if changed {
            self.commit_focused(registry)?;
        }
        Ok(())
    }

    pub fn cursor_left(&mut self) {
        if let Some(Widget::Input(input)) = self.form.focused_mut() {
            input.left();
        }
    }

    pub fn cursor_right(&mut self) {
        if let Some(Widget::Input(input)) = self.form.focused_mut() {
            input.right();
        }
    }

    /// Write the focused field input through to the thought being edited.
    fn commit_focused(&mut self, registry: &mut Registry) -> Result<()> {
        let PanelMode::Editing(thought) = self.mode else {
            return Ok(());
        };
        let Some(Widget::Input(input)) = self.form.focused() else {
            return Ok(());
        };
        let InputTarget::Field(field) = &input.target else {
            return Ok(());
        };
        let record = registry
            .get_mut(thought)
            .ok_or(PhilosophyError::UnknownThought(thought))?;
        record.details_mut().set(field, input.value());
        tracing::trace!(%thought, field = field.as_str(), "detail updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::scene::Scene;

    fn defaults() -> CreateDefaults {
        CreateDefaults {
            details: vec!["thinker".to_string(), "text".to_string()],
            placement: Placement {
                position: Point::new(300.0, 300.0),
                radius: 70.0,
            },
        }
    }

    fn setup() -> (EditorPanel, Registry, Scene) {
        (
            EditorPanel::new(defaults()),
            Registry::new(),
            Scene::new(800.0, 600.0),
        )
    }

    fn type_text(panel: &mut EditorPanel, registry: &mut Registry, text: &str) {
        for c in text.chars() {
            panel.insert_char(c, registry).unwrap();
        }
    }

    #[test]
    fn new_panel_starts_in_create_mode() {
        let (panel, _, _) = setup();
        assert_eq!(panel.mode(), PanelMode::Create);
        assert_eq!(panel.form(), &Form::create());
    }

    #[test]
    fn empty_name_is_rejected_without_side_effects() {
        let (mut panel, mut registry, mut scene) = setup();
        type_text(&mut panel, &mut registry, "  \t ");

        let err = panel.activate(&mut registry, &mut scene).unwrap_err();
        assert_eq!(err, PhilosophyError::EmptyName);
        assert!(registry.is_empty());
        assert!(scene.is_empty());
        assert_eq!(
            panel.form().input(&InputTarget::Name).map(|i| i.value()),
            Some("  \t "),
            "the rejected text stays in the field"
        );
    }

    #[test]
    fn think_it_creates_a_drawn_thought_and_stays_in_create_mode() {
        let (mut panel, mut registry, mut scene) = setup();
        type_text(&mut panel, &mut registry, " Cogito ");
        panel.focus_next();

        let outcome = panel.activate(&mut registry, &mut scene).unwrap();
        let PanelOutcome::Created(id) = outcome else {
            panic!("expected a created thought, got {outcome:?}");
        };
        let thought = registry.get(id).expect("registered");
        assert_eq!(thought.name(), "Cogito");
        assert_eq!(
            thought.details().iter().collect::<Vec<_>>(),
            vec![("thinker", ""), ("text", "")]
        );
        assert!(thought.is_drawn());
        assert_eq!(scene.len(), 2);
        assert_eq!(panel.mode(), PanelMode::Create);
        assert_eq!(
            panel.form().input(&InputTarget::Name).map(|i| i.value()),
            Some("")
        );
    }

    #[test]
    fn typing_in_a_field_writes_through_on_every_keystroke() {
        let (mut panel, mut registry, mut scene) = setup();
        let id = panel.submit_create("Cogito", &mut registry, &mut scene).unwrap();
        panel.edit(id, &registry).unwrap();
        assert!(panel.focus_widget(1), "the thinker field follows the title");

        panel.insert_char('D', &mut registry).unwrap();
        assert_eq!(registry.get(id).unwrap().details().get("thinker"), Some("D"));
        type_text(&mut panel, &mut registry, "escartes");
        panel.backspace(&mut registry).unwrap();

        let details = registry.get(id).unwrap().details();
        assert_eq!(details.get("thinker"), Some("Descarte"));
        assert_eq!(details.get("text"), Some(""), "other fields untouched");
    }

    #[test]
    fn typing_in_create_mode_does_not_touch_thoughts() {
        let (mut panel, mut registry, mut scene) = setup();
        let id = panel.submit_create("Cogito", &mut registry, &mut scene).unwrap();
        type_text(&mut panel, &mut registry, "Sum");
        assert_eq!(
            registry.get(id).unwrap().details(),
            &Details::blank(["thinker", "text"])
        );
    }

    #[test]
    fn unthink_button_asks_first() {
        let (mut panel, mut registry, mut scene) = setup();
        let id = panel.submit_create("Cogito", &mut registry, &mut scene).unwrap();
        panel.edit(id, &registry).unwrap();

        let outcome = panel
            .press(ButtonAction::Unthink, &mut registry, &mut scene)
            .unwrap();
        assert_eq!(outcome, PanelOutcome::Confirm(UNTHINK_PROMPT));
        assert!(registry.contains(id), "nothing happens before the answer");
        assert_eq!(
            panel.resolve_destroy(true, &mut registry, &mut scene).unwrap(),
            Some(id)
        );
    }

    #[test]
    fn declining_leaves_the_edit_form_alone() {
        let (mut panel, mut registry, mut scene) = setup();
        let id = panel.submit_create("Cogito", &mut registry, &mut scene).unwrap();
        panel.edit(id, &registry).unwrap();
        let form_before = panel.form().clone();
        panel.request_destroy(id);

        let removed = panel
            .resolve_destroy(false, &mut registry, &mut scene)
            .unwrap();
        assert_eq!(removed, None);
        assert_eq!(panel.mode(), PanelMode::Editing(id));
        assert_eq!(panel.form(), &form_before);
        assert!(registry.get(id).is_some_and(|t| t.is_drawn()));
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn confirming_unthinks_and_resets() {
        let (mut panel, mut registry, mut scene) = setup();
        let id = panel.submit_create("Cogito", &mut registry, &mut scene).unwrap();
        panel.edit(id, &registry).unwrap();
        panel.request_destroy(id);

        let removed = panel
            .resolve_destroy(true, &mut registry, &mut scene)
            .unwrap();
        assert_eq!(removed, Some(id));
        assert_eq!(panel.mode(), PanelMode::Create);
        assert_eq!(panel.form(), &Form::create());
        assert!(!registry.contains(id));
        assert!(scene.is_empty());
    }

    #[test]
    fn editing_another_thought_discards_the_previous_form() {
        let (mut panel, mut registry, mut scene) = setup();
        let a = panel.submit_create("A", &mut registry, &mut scene).unwrap();
        let b = panel.submit_create("B", &mut registry, &mut scene).unwrap();
        registry.get_mut(a).unwrap().details_mut().insert("only_a", "x");

        panel.edit(a, &registry).unwrap();
        assert_eq!(panel.form().inputs().count(), 3);
        panel.edit(b, &registry).unwrap();

        assert_eq!(panel.mode(), PanelMode::Editing(b));
        assert_eq!(panel.form().heading(), Some("B"));
        let labels: Vec<_> = panel
            .form()
            .inputs()
            .filter_map(|i| i.label.as_deref())
            .collect();
        assert_eq!(labels, vec!["Thinker", "Text"]);
    }

    #[test]
    fn editing_an_unknown_thought_keeps_the_panel() {
        let (mut panel, registry, _) = setup();
        let err = panel.edit(ThoughtId::new(42), &registry).unwrap_err();
        assert_eq!(err, PhilosophyError::UnknownThought(ThoughtId::new(42)));
        assert_eq!(panel.mode(), PanelMode::Create);
    }

    #[test]
    fn arrow_buttons_add_unbound_arrows() {
        let (mut panel, mut registry, mut scene) = setup();
        let outcome = panel
            .press(ButtonAction::Arrow(ArrowKind::Implies), &mut registry, &mut scene)
            .unwrap();
        assert_eq!(outcome, PanelOutcome::ArrowAdded(ArrowKind::Implies));
        assert_eq!(registry.arrows().len(), 1);
        assert!(registry.is_empty(), "arrows are not thoughts");
        assert_eq!(panel.mode(), PanelMode::Create);
    }
}
