//! Alignment guides between a reference shape and its neighbours.

use crate::shape::ShapeId;
use kurbo::{Point, Rect};
use serde::Serialize;

/// Maximum distance (logical units) at which two edges are considered aligned.
pub const GUIDE_THRESHOLD: f64 = 5.0;

/// Source of on-screen shape geometry.
///
/// Bounds are in screen pixels. `canvas_origin` is the screen position of
/// the logical origin and `zoom` the current scale, so that
/// `logical = (screen - origin) / zoom`.
pub trait ScreenBounds {
    /// Ids of every shape currently laid out, in paint order.
    fn ids(&self) -> Vec<ShapeId>;
    /// On-screen bounding box of a shape, if it is laid out.
    fn screen_bounds(&self, id: &ShapeId) -> Option<Rect>;
    fn canvas_origin(&self) -> Point;
    fn zoom(&self) -> f64;
}

/// Which edge or center line a guide aligns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GuideKind {
    Left,
    CenterX,
    Right,
    Top,
    CenterY,
    Bottom,
}

/// Direction of the line a guide draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// A vertical line at some x.
    Vertical,
    /// A horizontal line at some y.
    Horizontal,
}

impl GuideKind {
    /// All kinds in detection order.
    pub const ALL: [GuideKind; 6] = [
        GuideKind::Left,
        GuideKind::CenterX,
        GuideKind::Right,
        GuideKind::Top,
        GuideKind::CenterY,
        GuideKind::Bottom,
    ];

    pub fn orientation(self) -> Orientation {
        match self {
            GuideKind::Left | GuideKind::CenterX | GuideKind::Right => Orientation::Vertical,
            GuideKind::Top | GuideKind::CenterY | GuideKind::Bottom => Orientation::Horizontal,
        }
    }

    /// Coordinate of this edge or center line of `rect`.
    pub fn coordinate(self, rect: Rect) -> f64 {
        match self {
            GuideKind::Left => rect.x0,
            GuideKind::CenterX => (rect.x0 + rect.x1) / 2.0,
            GuideKind::Right => rect.x1,
            GuideKind::Top => rect.y0,
            GuideKind::CenterY => (rect.y0 + rect.y1) / 2.0,
            GuideKind::Bottom => rect.y1,
        }
    }
}

/// A detected alignment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuideLine {
    pub kind: GuideKind,
    /// Logical x (vertical guides) or y (horizontal guides) of the line,
    /// taken from the aligned neighbour.
    pub position: f64,
    /// Distance between the reference and the neighbour along the axis.
    pub distance: f64,
    /// The neighbour the reference aligns with.
    pub target: ShapeId,
}

impl GuideLine {
    pub fn orientation(&self) -> Orientation {
        self.kind.orientation()
    }
}

/// Map a screen box into the logical frame.
fn to_logical(rect: Rect, origin: Point, zoom: f64) -> Rect {
    Rect::new(
        (rect.x0 - origin.x) / zoom,
        (rect.y0 - origin.y) / zoom,
        (rect.x1 - origin.x) / zoom,
        (rect.y1 - origin.y) / zoom,
    )
}

/// Find every edge and center alignment between `reference` and the other
/// shapes.
///
/// Each neighbour is checked for left, centerX, right, top, centerY and
/// bottom in that order. Matches are not deduplicated. Returns an empty
/// list if the reference is not laid out.
pub fn detect_guides<B>(bounds: &B, reference: &ShapeId, threshold: f64) -> Vec<GuideLine>
where
    B: ScreenBounds + ?Sized,
{
    let origin = bounds.canvas_origin();
    let zoom = bounds.zoom();
    if !zoom.is_finite() || zoom <= 0.0 {
        log::warn!("Skipping guide detection at zoom {}", zoom);
        return Vec::new();
    }

    let Some(reference_rect) = bounds.screen_bounds(reference) else {
        return Vec::new();
    };
    let reference_rect = to_logical(reference_rect, origin, zoom);

    let mut guides = Vec::new();
    for id in bounds.ids() {
        if &id == reference {
            continue;
        }
        let Some(other) = bounds.screen_bounds(&id) else {
            continue;
        };
        let other = to_logical(other, origin, zoom);

        for kind in GuideKind::ALL {
            let ours = kind.coordinate(reference_rect);
            let theirs = kind.coordinate(other);
            let distance = (ours - theirs).abs();
            if distance <= threshold {
                guides.push(GuideLine {
                    kind,
                    position: theirs,
                    distance,
                    target: id.clone(),
                });
            }
        }
    }
    guides
}
