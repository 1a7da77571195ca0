//! On-screen layout of the stored shapes.
//!
//! The layout model is a read-only view over the store and the viewport. It
//! answers where a shape currently sits on screen and what lies under the
//! pointer.

use crate::guides::ScreenBounds;
use crate::shape::{Shape, ShapeId};
use crate::store::ShapeStore;
use crate::viewport::Viewport;
use kurbo::{Point, Rect};

/// Side of the square resize handle, in logical units.
pub const HANDLE_SIZE: f64 = 12.0;

/// What the pointer is over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitTarget {
    /// The resize handle of a shape.
    ResizeHandle(ShapeId),
    /// The body of a shape.
    Body(ShapeId),
    /// Empty canvas.
    Background,
}

/// Logical rectangle of a shape's resize handle (its bottom-right corner).
///
/// At most half the shape's width and height, leaving small shapes a body.
pub fn handle_rect(shape: &Shape) -> Rect {
    let bounds = shape.bounds();
    let width = HANDLE_SIZE.min(bounds.width() / 2.0);
    let height = HANDLE_SIZE.min(bounds.height() / 2.0);
    Rect::new(bounds.x1 - width, bounds.y1 - height, bounds.x1, bounds.y1)
}

/// Inclusive on every edge, unlike `Rect::contains`.
fn covers(rect: Rect, point: Point) -> bool {
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

/// Borrowed view of the store laid out through the viewport.
#[derive(Debug, Clone, Copy)]
pub struct LayoutModel<'a> {
    store: &'a ShapeStore,
    viewport: &'a Viewport,
}

impl<'a> LayoutModel<'a> {
    pub fn new(store: &'a ShapeStore, viewport: &'a Viewport) -> Self {
        Self { store, viewport }
    }

    /// On-screen box of the resize handle of a shape.
    pub fn screen_handle(&self, id: &ShapeId) -> Option<Rect> {
        let shape = self.store.get(id)?;
        Some(self.viewport.logical_rect_to_screen(handle_rect(shape)))
    }

    /// Find what lies under a screen point.
    ///
    /// Shapes are tested topmost first; within a shape the resize handle
    /// wins over the body.
    pub fn hit_test(&self, screen: Point) -> HitTarget {
        let point = self.viewport.screen_to_logical(screen);
        for shape in self.store.shapes_ordered().into_iter().rev() {
            if covers(handle_rect(shape), point) {
                return HitTarget::ResizeHandle(shape.id.clone());
            }
            if covers(shape.bounds(), point) {
                return HitTarget::Body(shape.id.clone());
            }
        }
        HitTarget::Background
    }
}

impl ScreenBounds for LayoutModel<'_> {
    fn ids(&self) -> Vec<ShapeId> {
        self.store
            .shapes_ordered()
            .into_iter()
            .map(|shape| shape.id.clone())
            .collect()
    }

    fn screen_bounds(&self, id: &ShapeId) -> Option<Rect> {
        let shape = self.store.get(id)?;
        Some(self.viewport.logical_rect_to_screen(shape.bounds()))
    }

    fn canvas_origin(&self) -> Point {
        self.viewport.logical_to_screen(Point::ORIGIN)
    }

    fn zoom(&self) -> f64 {
        self.viewport.zoom()
    }
}
