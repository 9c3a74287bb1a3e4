//! On-canvas representations of thoughts and arrows.

use crate::error::{PhilosophyError, Result};
use crate::surface::{ArrowKind, Point, ShapeId, Surface, TextStyle};
use crate::thought::model::{Lifecycle, Thought, ThoughtId};

/// Where, and how large, to draw a thought.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Point,
    pub radius: f64,
}

/// Properties a thought element is created from.
#[derive(Debug, Clone, PartialEq)]
pub struct ThoughtElement<'a> {
    pub thought: ThoughtId,
    pub label: &'a str,
    pub placement: Placement,
}

/// The shapes standing for one thought on the canvas.
///
/// The binding owns its shapes: they are released by [`VisualBinding::liquidate`].
#[derive(Debug, PartialEq, Eq)]
pub struct VisualBinding {
    thought: ThoughtId,
    circle: ShapeId,
    label: ShapeId,
}

impl VisualBinding {
    /// Draw a circle with the thought's label in it and route its clicks back
    /// to the thought.
    ///
    /// Shapes created before a failing step are removed again.
    pub fn create(surface: &mut dyn Surface, element: &ThoughtElement<'_>) -> Result<Self> {
        let Placement { position, radius } = element.placement;
        let circle = surface.circle(position, radius)?;
        let label = match surface.text(position, element.label, TextStyle::Label) {
            Ok(label) => label,
            Err(err) => {
                discard(surface, circle);
                return Err(err.into());
            }
        };
        let wired = surface
            .attach(circle, label)
            .and_then(|()| surface.on_click(circle, element.thought));
        if let Err(err) = wired {
            discard(surface, label);
            discard(surface, circle);
            return Err(err.into());
        }

        tracing::debug!(thought = %element.thought, %circle, %label, "thought element created");
        Ok(Self {
            thought: element.thought,
            circle,
            label,
        })
    }

    /// The shape clicks and drags land on.
    pub fn circle(&self) -> ShapeId {
        self.circle
    }

    /// Remove every shape of the element from the canvas.
    pub fn liquidate(&self, surface: &mut dyn Surface) -> Result<()> {
        surface.remove(self.circle)?;
        tracing::debug!(
            thought = %self.thought,
            circle = %self.circle,
            label = %self.label,
            "thought element liquidated"
        );
        Ok(())
    }
}

/// Remove a shape left over from a failed draw.
fn discard(surface: &mut dyn Surface, shape: ShapeId) {
    if let Err(err) = surface.remove(shape) {
        tracing::warn!(%shape, error = %err, "failed to roll back shape");
    }
}

/// Something that can put itself on the canvas.
pub trait Drawable {
    fn draw(&mut self, surface: &mut dyn Surface, placement: Placement) -> Result<&VisualBinding>;
}

impl Drawable for Thought {
    /// Draw the thought once. Drawing a drawn or un-thought thought is an error.
    fn draw(&mut self, surface: &mut dyn Surface, placement: Placement) -> Result<&VisualBinding> {
        match self.lifecycle {
            Lifecycle::Thought => {}
            Lifecycle::Drawn(_) => return Err(PhilosophyError::AlreadyDrawn(self.id())),
            Lifecycle::Unthought => return Err(PhilosophyError::Unthought(self.id())),
        }
        let binding = VisualBinding::create(
            surface,
            &ThoughtElement {
                thought: self.id(),
                label: self.name(),
                placement,
            },
        )?;
        self.lifecycle = Lifecycle::Drawn(binding);
        self.visual().ok_or(PhilosophyError::NotDrawn(self.id()))
    }
}

/// An arrow on the canvas. Arrows are not tied to the thoughts they point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrowBinding {
    kind: ArrowKind,
    shape: ShapeId,
}

impl ArrowBinding {
    pub fn draw(
        surface: &mut dyn Surface,
        kind: ArrowKind,
        from: Point,
        to: Point,
    ) -> Result<Self> {
        let shape = surface.arrow(from, to, kind)?;
        Ok(Self { kind, shape })
    }

    pub fn kind(&self) -> ArrowKind {
        self.kind
    }

    pub fn shape(&self) -> ShapeId {
        self.shape
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::SurfaceError;
    use crate::surface::scene::{Scene, ShapeKind};
    use crate::thought::model::Details;

    fn placement() -> Placement {
        Placement {
            position: Point::new(300.0, 300.0),
            radius: 70.0,
        }
    }

    fn cogito() -> Thought {
        Thought::think(ThoughtId::new(3), "Cogito", Details::blank(["thinker", "text"])).unwrap()
    }

    #[test]
    fn draw_creates_a_labelled_clickable_circle() {
        let mut scene = Scene::new(800.0, 600.0);
        let mut thought = cogito();
        let binding = thought.draw(&mut scene, placement()).unwrap();
        let circle = binding.circle();

        assert_eq!(scene.click_route(circle), Some(ThoughtId::new(3)));
        let children: Vec<_> = scene.children(circle).collect();
        assert_eq!(children.len(), 1, "the label rides on the circle");
        let label_shape = children[0];
        assert!(matches!(
            &label_shape.kind,
            ShapeKind::Text { text, style: TextStyle::Label, .. } if text == "Cogito"
        ));
        assert!(thought.is_drawn());
    }

    #[test]
    fn redrawing_is_rejected() {
        let mut scene = Scene::new(800.0, 600.0);
        let mut thought = cogito();
        thought.draw(&mut scene, placement()).unwrap();

        let err = thought.draw(&mut scene, placement()).unwrap_err();
        assert_eq!(err, PhilosophyError::AlreadyDrawn(ThoughtId::new(3)));
        assert_eq!(scene.len(), 2, "no second set of shapes");
    }

    #[test]
    fn drawing_an_unthought_thought_is_rejected() {
        let mut scene = Scene::new(800.0, 600.0);
        let mut thought = cogito();
        thought.draw(&mut scene, placement()).unwrap();
        thought.unthink(&mut scene).unwrap();

        let err = thought.draw(&mut scene, placement()).unwrap_err();
        assert_eq!(err, PhilosophyError::Unthought(ThoughtId::new(3)));
        assert!(scene.is_empty());
    }

    #[test]
    fn failed_draw_rolls_back_partial_shapes() {
        let mut scene = Scene::new(800.0, 600.0).with_limit(Some(1));
        let mut thought = cogito();

        let err = thought.draw(&mut scene, placement()).unwrap_err();
        assert_eq!(err, PhilosophyError::Collaborator(SurfaceError::Full { limit: 1 }));
        assert!(scene.is_empty(), "the circle must not be left behind");
        assert!(!thought.is_drawn());
    }

    /// Accepts circles, then fails every other call.
    struct Brittle(Scene);

    impl Surface for Brittle {
        fn circle(&mut self, center: Point, radius: f64) -> Result<ShapeId, SurfaceError> {
            self.0.circle(center, radius)
        }

        fn text(&mut self, _: Point, _: &str, _: TextStyle) -> Result<ShapeId, SurfaceError> {
            Err(SurfaceError::Full { limit: 1 })
        }

        fn arrow(&mut self, _: Point, _: Point, _: ArrowKind) -> Result<ShapeId, SurfaceError> {
            Err(SurfaceError::Full { limit: 1 })
        }

        fn attach(&mut self, parent: ShapeId, child: ShapeId) -> Result<(), SurfaceError> {
            Err(SurfaceError::InvalidAttachment { parent, child })
        }

        fn on_click(&mut self, shape: ShapeId, _: ThoughtId) -> Result<(), SurfaceError> {
            Err(SurfaceError::UnknownShape(shape))
        }

        fn remove(&mut self, shape: ShapeId) -> Result<(), SurfaceError> {
            Err(SurfaceError::UnknownShape(shape))
        }
    }

    #[test]
    fn failed_rollback_reports_the_original_error() {
        let mut surface = Brittle(Scene::new(800.0, 600.0));
        let mut thought = cogito();

        let err = thought.draw(&mut surface, placement()).unwrap_err();
        assert_eq!(err, PhilosophyError::Collaborator(SurfaceError::Full { limit: 1 }));
        assert_eq!(surface.0.len(), 1, "the circle could not be removed");
        assert_eq!(thought.lifecycle(), &Lifecycle::Thought);
    }

    #[test]
    fn arrows_carry_their_kind() {
        let mut scene = Scene::new(800.0, 600.0);
        let arrow = ArrowBinding::draw(
            &mut scene,
            ArrowKind::Iff,
            Point::new(100.0, 100.0),
            Point::new(200.0, 200.0),
        )
        .unwrap();
        assert_eq!(arrow.kind(), ArrowKind::Iff);
        assert!(matches!(
            scene.get(arrow.shape()).map(|s| &s.kind),
            Some(ShapeKind::Arrow { kind: ArrowKind::Iff, .. })
        ));
    }
}
