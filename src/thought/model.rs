use std::fmt;

use crate::error::{PhilosophyError, Result};
use crate::surface::Surface;
use crate::thought::visual::VisualBinding;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ThoughtId(u64);

impl ThoughtId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ThoughtId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Free-form fields describing a thought, in display order.
///
/// Field names are unique; inserting an existing name overwrites its value in
/// place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Details {
    fields: Vec<(String, String)>,
}

impl Details {
    pub fn new() -> Self {
        Self::default()
    }

    /// Details with every named field present and empty.
    pub fn blank<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut details = Self::new();
        for name in names {
            details.insert(name, "");
        }
        details
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((field, value)),
        }
    }

    /// Overwrite an existing field. Returns `false` when the field is unknown.
    pub fn set(&mut self, field: &str, value: impl Into<String>) -> bool {
        match self.fields.iter_mut().find(|(name, _)| name == field) {
            Some((_, existing)) => {
                *existing = value.into();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

/// Where a thought is in its life.
#[derive(Debug, PartialEq, Eq)]
pub enum Lifecycle {
    /// Named, but not on the canvas yet.
    Thought,
    Drawn(VisualBinding),
    /// Deleted. Terminal.
    Unthought,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Thought {
    id: ThoughtId,
    name: String,
    details: Details,
    pub(super) lifecycle: Lifecycle,
}

impl Thought {
    /// Name a new thought. The name is chomped and must not end up empty.
    pub fn think(id: ThoughtId, raw_name: &str, details: Details) -> Result<Self> {
        let name = chomp(raw_name);
        if name.is_empty() {
            return Err(PhilosophyError::EmptyName);
        }
        Ok(Self {
            id,
            name: name.to_string(),
            details,
            lifecycle: Lifecycle::Thought,
        })
    }

    pub fn id(&self) -> ThoughtId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn details(&self) -> &Details {
        &self.details
    }

    pub fn details_mut(&mut self) -> &mut Details {
        &mut self.details
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn visual(&self) -> Option<&VisualBinding> {
        match &self.lifecycle {
            Lifecycle::Drawn(binding) => Some(binding),
            _ => None,
        }
    }

    pub fn is_drawn(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Drawn(_))
    }

    /// Take the thought off the canvas for good.
    ///
    /// A thought that was never drawn is left alone. The thought only becomes
    /// un-thought once the surface has released its shapes; on failure it stays
    /// drawn and can be un-thought again.
    pub fn unthink(&mut self, surface: &mut dyn Surface) -> Result<()> {
        let Lifecycle::Drawn(binding) = &self.lifecycle else {
            return Ok(());
        };
        tracing::info!(thought = %self.id, name = %self.name, "un-thinking thought");
        binding.liquidate(surface)?;
        self.lifecycle = Lifecycle::Unthought;
        Ok(())
    }
}

/// Strip leading and trailing whitespace, leaving the interior alone.
///
/// Text with no visible characters chomps to `""`.
pub fn chomp(text: &str) -> &str {
    text.trim()
}
