//! In-memory scene graph backing the terminal canvas.
//!
//! Shapes are kept in creation order; later shapes sit on top. Attachments are
//! one level deep: a root shape may carry children, children carry nothing.

use crate::surface::{ArrowKind, Point, ShapeId, Surface, SurfaceError, TextStyle};
use crate::thought::model::ThoughtId;

/// How close (in canvas units) a click must land to an arrow's shaft.
const ARROW_HIT_TOLERANCE: f64 = 8.0;

#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    Circle {
        center: Point,
        radius: f64,
    },
    Text {
        at: Point,
        text: String,
        style: TextStyle,
    },
    Arrow {
        from: Point,
        to: Point,
        kind: ArrowKind,
    },
}

impl ShapeKind {
    fn anchors(&self) -> Vec<Point> {
        match self {
            Self::Circle { center, .. } => vec![*center],
            Self::Text { at, .. } => vec![*at],
            Self::Arrow { from, to, .. } => vec![*from, *to],
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        match self {
            Self::Circle { center, .. } => *center = center.offset(dx, dy),
            Self::Text { at, .. } => *at = at.offset(dx, dy),
            Self::Arrow { from, to, .. } => {
                *from = from.offset(dx, dy);
                *to = to.offset(dx, dy);
            }
        }
    }

    fn contains(&self, point: Point) -> bool {
        match self {
            Self::Circle { center, radius } => center.distance(point) <= *radius,
            Self::Text { .. } => false,
            Self::Arrow { from, to, .. } => {
                distance_to_segment(point, *from, *to) <= ARROW_HIT_TOLERANCE
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub id: ShapeId,
    pub kind: ShapeKind,
    pub parent: Option<ShapeId>,
    pub click: Option<ThoughtId>,
}

#[derive(Debug, Clone)]
pub struct Scene {
    width: f64,
    height: f64,
    shapes: Vec<Shape>,
    next_id: u64,
    limit: Option<usize>,
}

impl Scene {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            shapes: Vec::new(),
            next_id: 1,
            limit: None,
        }
    }

    /// Refuse to hold more than `limit` shapes.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.get(id).is_some()
    }

    /// Shapes that can be selected and dragged on their own.
    pub fn roots(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter().filter(|s| s.parent.is_none())
    }

    pub fn children(&self, parent: ShapeId) -> impl Iterator<Item = &Shape> {
        self.shapes
            .iter()
            .filter(move |s| s.parent == Some(parent))
    }

    /// The top-most root shape under `point`.
    pub fn hit_test(&self, point: Point) -> Option<ShapeId> {
        self.shapes
            .iter()
            .rev()
            .filter(|s| s.parent.is_none())
            .find(|s| s.kind.contains(point))
            .map(|s| s.id)
    }

    /// The route of the top-most routed shape under `point`. Shapes without a
    /// route, such as arrows, do not block the ones below them.
    pub fn click_at(&self, point: Point) -> Option<ThoughtId> {
        self.shapes
            .iter()
            .rev()
            .filter(|s| s.parent.is_none() && s.kind.contains(point))
            .find_map(|s| s.click)
    }

    pub fn click_route(&self, id: ShapeId) -> Option<ThoughtId> {
        self.get(id).and_then(|s| s.click)
    }

    /// Move a shape, together with its attachments, by `(dx, dy)`.
    ///
    /// Dragging a child drags its parent. Movement is clamped so every anchor
    /// of the dragged shape stays on the canvas.
    pub fn drag(&mut self, id: ShapeId, dx: f64, dy: f64) -> Result<(), SurfaceError> {
        let shape = self.get(id).ok_or(SurfaceError::UnknownShape(id))?;
        let root = shape.parent.unwrap_or(id);
        let anchors = self
            .get(root)
            .ok_or(SurfaceError::UnknownShape(root))?
            .kind
            .anchors();

        let min_x = anchors.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let max_x = anchors.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        let min_y = anchors.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_y = anchors.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        let dx = clamp_delta(dx, -min_x, self.width - max_x);
        let dy = clamp_delta(dy, -min_y, self.height - max_y);

        for shape in &mut self.shapes {
            if shape.id == root || shape.parent == Some(root) {
                shape.kind.translate(dx, dy);
            }
        }
        Ok(())
    }

    fn push(&mut self, kind: ShapeKind) -> Result<ShapeId, SurfaceError> {
        if let Some(limit) = self.limit
            && self.shapes.len() >= limit
        {
            return Err(SurfaceError::Full { limit });
        }
        let id = ShapeId::new(self.next_id);
        self.next_id += 1;
        self.shapes.push(Shape {
            id,
            kind,
            parent: None,
            click: None,
        });
        Ok(id)
    }

    fn get_mut(&mut self, id: ShapeId) -> Result<&mut Shape, SurfaceError> {
        self.shapes
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(SurfaceError::UnknownShape(id))
    }
}

impl Surface for Scene {
    fn circle(&mut self, center: Point, radius: f64) -> Result<ShapeId, SurfaceError> {
        self.push(ShapeKind::Circle { center, radius })
    }

    fn text(&mut self, at: Point, text: &str, style: TextStyle) -> Result<ShapeId, SurfaceError> {
        self.push(ShapeKind::Text {
            at,
            text: text.to_string(),
            style,
        })
    }

    fn arrow(&mut self, from: Point, to: Point, kind: ArrowKind) -> Result<ShapeId, SurfaceError> {
        self.push(ShapeKind::Arrow { from, to, kind })
    }

    fn attach(&mut self, parent: ShapeId, child: ShapeId) -> Result<(), SurfaceError> {
        let invalid = SurfaceError::InvalidAttachment { parent, child };
        if parent == child {
            return Err(invalid);
        }
        let parent_shape = self.get(parent).ok_or(SurfaceError::UnknownShape(parent))?;
        if parent_shape.parent.is_some() {
            return Err(invalid);
        }
        if self.children(child).next().is_some() {
            return Err(invalid);
        }
        let child_shape = self.get_mut(child)?;
        if child_shape.parent.is_some() {
            return Err(invalid);
        }
        child_shape.parent = Some(parent);
        Ok(())
    }

    fn on_click(&mut self, shape: ShapeId, thought: ThoughtId) -> Result<(), SurfaceError> {
        self.get_mut(shape)?.click = Some(thought);
        Ok(())
    }

    fn remove(&mut self, shape: ShapeId) -> Result<(), SurfaceError> {
        if !self.contains(shape) {
            return Err(SurfaceError::UnknownShape(shape));
        }
        self.shapes
            .retain(|s| s.id != shape && s.parent != Some(shape));
        Ok(())
    }
}

fn clamp_delta(delta: f64, lo: f64, hi: f64) -> f64 {
    if lo > hi {
        return 0.0;
    }
    delta.clamp(lo, hi)
}

fn distance_to_segment(point: Point, from: Point, to: Point) -> f64 {
    let (vx, vy) = (to.x - from.x, to.y - from.y);
    let len_sq = vx * vx + vy * vy;
    if len_sq == 0.0 {
        return point.distance(from);
    }
    let t = (((point.x - from.x) * vx + (point.y - from.y) * vy) / len_sq).clamp(0.0, 1.0);
    point.distance(Point::new(from.x + t * vx, from.y + t * vy))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circle_with_label(scene: &mut Scene, center: Point) -> (ShapeId, ShapeId) {
        let circle = scene.circle(center, 70.0).unwrap();
        let label = scene.text(center, "Cogito", TextStyle::Label).unwrap();
        scene.attach(circle, label).unwrap();
        (circle, label)
    }

    #[test]
    fn remove_cascades_to_attached_children() {
        let mut scene = Scene::new(800.0, 600.0);
        let (circle, label) = circle_with_label(&mut scene, Point::new(300.0, 300.0));
        let other = scene.circle(Point::new(600.0, 100.0), 30.0).unwrap();

        scene.remove(circle).unwrap();

        assert!(!scene.contains(circle));
        assert!(!scene.contains(label), "label should go with its circle");
        assert!(scene.contains(other));
        assert_eq!(
            scene.remove(circle),
            Err(SurfaceError::UnknownShape(circle)),
            "a shape can only be released once"
        );
    }

    #[test]
    fn drag_moves_children_and_clamps_to_canvas() {
        let mut scene = Scene::new(800.0, 600.0);
        let (circle, label) = circle_with_label(&mut scene, Point::new(300.0, 300.0));

        scene.drag(label, 50.0, -20.0).unwrap();
        let moved = Point::new(350.0, 280.0);
        assert_eq!(
            scene.get(circle).map(|s| s.kind.clone()),
            Some(ShapeKind::Circle {
                center: moved,
                radius: 70.0
            })
        );
        assert!(matches!(
            scene.get(label).map(|s| &s.kind),
            Some(ShapeKind::Text { at, .. }) if *at == moved
        ));

        scene.drag(circle, 10_000.0, 10_000.0).unwrap();
        assert!(matches!(
            scene.get(circle).map(|s| &s.kind),
            Some(ShapeKind::Circle { center, .. }) if *center == Point::new(800.0, 600.0)
        ));
    }

    #[test]
    fn hit_test_prefers_the_top_most_shape() {
        let mut scene = Scene::new(800.0, 600.0);
        let below = scene.circle(Point::new(300.0, 300.0), 70.0).unwrap();
        let above = scene.circle(Point::new(340.0, 300.0), 70.0).unwrap();

        assert_eq!(scene.hit_test(Point::new(320.0, 300.0)), Some(above));
        assert_eq!(scene.hit_test(Point::new(240.0, 300.0)), Some(below));
        assert_eq!(scene.hit_test(Point::new(20.0, 20.0)), None);
    }

    #[test]
    fn arrows_are_hit_near_their_shaft() {
        let mut scene = Scene::new(800.0, 600.0);
        let arrow = scene
            .arrow(
                Point::new(100.0, 100.0),
                Point::new(200.0, 200.0),
                ArrowKind::Implies,
            )
            .unwrap();

        assert_eq!(scene.hit_test(Point::new(152.0, 148.0)), Some(arrow));
        assert_eq!(scene.hit_test(Point::new(100.0, 200.0)), None);
    }

    #[test]
    fn click_routes_resolve_to_thoughts() {
        let mut scene = Scene::new(800.0, 600.0);
        let (circle, _) = circle_with_label(&mut scene, Point::new(300.0, 300.0));
        let thought = ThoughtId::new(7);
        scene.on_click(circle, thought).unwrap();

        assert_eq!(scene.click_at(Point::new(310.0, 290.0)), Some(thought));
        assert_eq!(scene.click_at(Point::new(700.0, 500.0)), None);

        let arrow = scene
            .arrow(Point::new(250.0, 300.0), Point::new(350.0, 300.0), ArrowKind::Iff)
            .unwrap();
        assert_eq!(scene.hit_test(Point::new(300.0, 300.0)), Some(arrow));
        assert_eq!(
            scene.click_at(Point::new(300.0, 300.0)),
            Some(thought),
            "an arrow on top does not swallow the thought's click"
        );
    }

    #[test]
    fn capacity_limit_rejects_new_shapes() {
        let mut scene = Scene::new(800.0, 600.0).with_limit(Some(1));
        scene.circle(Point::new(10.0, 10.0), 5.0).unwrap();
        assert_eq!(
            scene.text(Point::new(10.0, 10.0), "x", TextStyle::Label),
            Err(SurfaceError::Full { limit: 1 })
        );
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn attach_rejects_nesting() {
        let mut scene = Scene::new(800.0, 600.0);
        let (circle, label) = circle_with_label(&mut scene, Point::new(300.0, 300.0));
        let extra = scene.text(Point::new(0.0, 0.0), "x", TextStyle::Label).unwrap();

        assert!(scene.attach(label, extra).is_err(), "children cannot carry children");
        assert!(scene.attach(extra, circle).is_err(), "parents cannot be attached");
        assert!(scene.attach(circle, circle).is_err());
    }
}
