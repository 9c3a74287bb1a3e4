//! The widgets the editor panel shows.
//!
//! A [`Form`] is rebuilt from scratch on every mode change; nothing is patched
//! in place except the values of its text inputs.

use crate::surface::ArrowKind;
use crate::thought::model::Thought;

pub const CREATE_HEADING: &str = "Add a new thought";
pub const THINK_LABEL: &str = "Think it";
pub const UNTHINK_LABEL: &str = "Un-think this";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    Think,
    Arrow(ArrowKind),
    Unthink,
}

/// What a text input writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputTarget {
    /// The name of the thought being created.
    Name,
    /// A detail field of the thought being edited.
    Field(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInput {
    pub label: Option<String>,
    pub target: InputTarget,
    value: String,
    /// Character (not byte) offset into `value`.
    cursor: usize,
}

impl TextInput {
    pub fn new(label: Option<String>, target: InputTarget, value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.chars().count();
        Self {
            label,
            target,
            value,
            cursor,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn insert(&mut self, c: char) {
        let at = byte_index_for_cursor(&self.value, self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor. Returns whether anything changed.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let from = byte_index_for_cursor(&self.value, self.cursor - 1);
        let to = byte_index_for_cursor(&self.value, self.cursor);
        self.value.replace_range(from..to, "");
        self.cursor -= 1;
        true
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        let max = self.value.chars().count();
        self.cursor = (self.cursor + 1).min(max);
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Widget {
    Heading(String),
    Input(TextInput),
    Button { label: String, action: ButtonAction },
}

impl Widget {
    pub fn is_focusable(&self) -> bool {
        !matches!(self, Self::Heading(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    widgets: Vec<Widget>,
    focus: Option<usize>,
}

impl Form {
    fn new(widgets: Vec<Widget>) -> Self {
        let focus = widgets.iter().position(Widget::is_focusable);
        Self { widgets, focus }
    }

    /// Heading, name field, "Think it", and one button per arrow kind.
    pub fn create() -> Self {
        let mut widgets = vec![
            Widget::Heading(CREATE_HEADING.to_string()),
            Widget::Input(TextInput::new(None, InputTarget::Name, "")),
            Widget::Button {
                label: THINK_LABEL.to_string(),
                action: ButtonAction::Think,
            },
        ];
        widgets.extend(ArrowKind::ALL.into_iter().map(|kind| Widget::Button {
            label: kind.label().to_string(),
            action: ButtonAction::Arrow(kind),
        }));
        Self::new(widgets)
    }

    /// Title, one input per detail field in order, and the un-think button.
    pub fn edit(thought: &Thought) -> Self {
        let mut widgets = vec![Widget::Heading(thought.name().to_string())];
        widgets.extend(thought.details().iter().map(|(field, value)| {
            Widget::Input(TextInput::new(
                Some(first_upper(field)),
                InputTarget::Field(field.to_string()),
                value,
            ))
        }));
        widgets.push(Widget::Button {
            label: UNTHINK_LABEL.to_string(),
            action: ButtonAction::Unthink,
        });
        Self::new(widgets)
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn heading(&self) -> Option<&str> {
        self.widgets.iter().find_map(|w| match w {
            Widget::Heading(text) => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn inputs(&self) -> impl Iterator<Item = &TextInput> {
        self.widgets.iter().filter_map(|w| match w {
            Widget::Input(input) => Some(input),
            _ => None,
        })
    }

    pub fn input(&self, target: &InputTarget) -> Option<&TextInput> {
        self.inputs().find(|input| input.target == *target)
    }

    pub fn input_mut(&mut self, target: &InputTarget) -> Option<&mut TextInput> {
        self.widgets.iter_mut().find_map(|w| match w {
            Widget::Input(input) if input.target == *target => Some(input),
            _ => None,
        })
    }

    pub fn focus_index(&self) -> Option<usize> {
        self.focus
    }

    pub fn focused(&self) -> Option<&Widget> {
        self.focus.and_then(|idx| self.widgets.get(idx))
    }

    pub fn focused_mut(&mut self) -> Option<&mut Widget> {
        self.focus.and_then(|idx| self.widgets.get_mut(idx))
    }

    /// Focus widget `idx`. Headings cannot take focus.
    pub fn focus(&mut self, idx: usize) -> bool {
        if self.widgets.get(idx).is_some_and(Widget::is_focusable) {
            self.focus = Some(idx);
            true
        } else {
            false
        }
    }

    pub fn focus_next(&mut self) {
        self.step_focus(1);
    }

    pub fn focus_prev(&mut self) {
        self.step_focus(-1);
    }

    fn step_focus(&mut self, delta: isize) {
        let focusable: Vec<usize> = self
            .widgets
            .iter()
            .enumerate()
            .filter(|(_, w)| w.is_focusable())
            .map(|(idx, _)| idx)
            .collect();
        if focusable.is_empty() {
            self.focus = None;
            return;
        }
        let len = focusable.len() as isize;
        let current = self
            .focus
            .and_then(|idx| focusable.iter().position(|&f| f == idx))
            .map(|pos| pos as isize)
            .unwrap_or(if delta > 0 { -1 } else { 0 });
        let next = (current + delta).rem_euclid(len) as usize;
        self.focus = Some(focusable[next]);
    }
}

/// Upper-case the first character, leave the rest alone.
pub fn first_upper(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn byte_index_for_cursor(text: &str, cursor: usize) -> usize {
    text.char_indices()
        .nth(cursor)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}
