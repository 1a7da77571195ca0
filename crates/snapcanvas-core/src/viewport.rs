//! Viewport module for pan/zoom transforms.
//!
//! Screen coordinates are raw pointer pixels. Logical coordinates are canvas
//! units, invariant under pan and zoom:
//!
//! ```text
//! logical = (screen - pan) / zoom
//! screen  = logical * zoom + pan
//! ```

use crate::store::{GeometryError, VisibleArea};
use crate::timing::{Deferred, Instant};
use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::Serialize;
use std::time::Duration;

/// Smallest zoom factor.
pub const MIN_ZOOM: f64 = 0.2;
/// Largest zoom factor.
pub const MAX_ZOOM: f64 = 2.0;
/// Zoom slider increment.
pub const ZOOM_STEP: f64 = 0.05;
/// Zoom factor a new viewport starts at.
pub const DEFAULT_ZOOM: f64 = 0.6;
/// Default quiet period before a requested zoom is applied.
pub const ZOOM_SETTLE_DELAY: Duration = Duration::from_millis(40);

/// Background grid placement in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundGrid {
    /// Screen position of the logical origin.
    pub origin: Point,
    /// On-screen size of one grid cell.
    pub cell_size: f64,
}

/// Viewport manages the view transform for the canvas.
///
/// It handles panning (translation) and zooming (scaling), converting
/// between screen and logical coordinates. Zoom changes keep the visual
/// center of the viewport fixed.
#[derive(Debug, Clone)]
pub struct Viewport {
    /// Current translation offset in screen pixels.
    pan: Vec2,
    /// Applied zoom factor.
    zoom: f64,
    /// Size of the visible area in screen pixels, once known.
    size: Option<Size>,
    settle_delay: Duration,
    /// Requested zoom waiting for input to settle.
    pending_zoom: Deferred<f64>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(DEFAULT_ZOOM, ZOOM_SETTLE_DELAY)
    }
}

impl Viewport {
    /// Create a viewport with no known size.
    pub fn new(zoom: f64, settle_delay: Duration) -> Self {
        let zoom = if zoom.is_finite() {
            zoom.clamp(MIN_ZOOM, MAX_ZOOM)
        } else {
            DEFAULT_ZOOM
        };
        Self {
            pan: Vec2::ZERO,
            zoom,
            size: None,
            settle_delay,
            pending_zoom: Deferred::new(),
        }
    }

    pub fn pan(&self) -> Vec2 {
        self.pan
    }

    pub fn set_pan(&mut self, pan: Vec2) {
        self.pan = pan;
    }

    /// Applied zoom factor.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Zoom the view is heading to: the pending request, else the applied zoom.
    pub fn target_zoom(&self) -> f64 {
        self.pending_zoom.peek().copied().unwrap_or(self.zoom)
    }

    /// Applied zoom as a rounded percentage, for the slider label.
    pub fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }

    pub fn size(&self) -> Option<Size> {
        self.size
    }

    /// Record the size of the visible area.
    pub fn set_size(&mut self, size: Size) {
        self.size = Some(size);
    }

    /// Screen-space center of the viewport, or the origin if the size is unknown.
    pub fn screen_center(&self) -> Point {
        self.size
            .map(|size| Point::new(size.width / 2.0, size.height / 2.0))
            .unwrap_or(Point::ORIGIN)
    }

    /// Get the affine transform for rendering (translate, then scale).
    ///
    /// This transform converts logical coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.pan) * Affine::scale(self.zoom)
    }

    /// Get the inverse transform for input handling.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.pan)
    }

    /// Convert a screen point to logical coordinates.
    pub fn screen_to_logical(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.pan.x) / self.zoom,
            (screen.y - self.pan.y) / self.zoom,
        )
    }

    /// Convert a logical point to screen coordinates.
    pub fn logical_to_screen(&self, logical: Point) -> Point {
        Point::new(
            logical.x * self.zoom + self.pan.x,
            logical.y * self.zoom + self.pan.y,
        )
    }

    /// Convert a screen-space delta to a logical delta.
    pub fn screen_delta_to_logical(&self, delta: Vec2) -> Vec2 {
        delta / self.zoom
    }

    /// Convert a logical rectangle to its on-screen box.
    pub fn logical_rect_to_screen(&self, rect: Rect) -> Rect {
        Rect::from_points(
            self.logical_to_screen(Point::new(rect.x0, rect.y0)),
            self.logical_to_screen(Point::new(rect.x1, rect.y1)),
        )
    }

    /// Pan by a delta in screen coordinates.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Apply a zoom factor immediately, keeping the screen center fixed.
    ///
    /// Returns true if the zoom changed.
    pub fn set_zoom(&mut self, target: f64) -> bool {
        if !target.is_finite() {
            log::warn!("Ignoring non-finite zoom {}", target);
            return false;
        }
        let new_zoom = target.clamp(MIN_ZOOM, MAX_ZOOM);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return false;
        }

        let center = self.screen_center().to_vec2();
        let scale = new_zoom / self.zoom;
        self.pan = center - (center - self.pan) * scale;
        self.zoom = new_zoom;
        true
    }

    /// Request a zoom change that is applied once input settles.
    ///
    /// A new request cancels the pending one and restarts the delay.
    pub fn request_zoom(&mut self, target: f64, now: Instant) {
        if !target.is_finite() {
            log::warn!("Ignoring non-finite zoom request {}", target);
            return;
        }
        let target = target.clamp(MIN_ZOOM, MAX_ZOOM);
        self.pending_zoom.schedule(now + self.settle_delay, target);
    }

    pub fn has_pending_zoom(&self) -> bool {
        self.pending_zoom.is_pending()
    }

    /// Apply the requested zoom if its delay has elapsed.
    ///
    /// Returns true if the applied zoom changed.
    pub fn settle(&mut self, now: Instant) -> bool {
        match self.pending_zoom.take_due(now) {
            Some(target) => self.set_zoom(target),
            None => false,
        }
    }

    /// Jump back to 100%, dropping any pending request.
    pub fn reset_zoom(&mut self) -> bool {
        self.pending_zoom.cancel();
        self.set_zoom(1.0)
    }

    /// Pan so that a logical content box anchored at the origin is centered.
    ///
    /// Returns false if the viewport size is not known yet.
    pub fn center_content(&mut self, content: Size) -> bool {
        let Some(size) = self.size else {
            return false;
        };
        self.pan = Vec2::new(
            (size.width - content.width * self.zoom) / 2.0,
            (size.height - content.height * self.zoom) / 2.0,
        );
        true
    }

    /// Placement of a background grid with cells of `unit` logical pixels.
    pub fn background_grid(&self, unit: f64) -> BackgroundGrid {
        BackgroundGrid {
            origin: self.logical_to_screen(Point::ORIGIN),
            cell_size: unit * self.zoom,
        }
    }
}

impl VisibleArea for Viewport {
    fn visible_rect(&self) -> Result<Rect, GeometryError> {
        let size = self.size.ok_or(GeometryError::NotMounted)?;
        if !size.width.is_finite() || !size.height.is_finite() {
            return Err(GeometryError::Transform(format!(
                "viewport size {}x{} is not finite",
                size.width, size.height
            )));
        }
        if !self.zoom.is_finite() || self.zoom <= 0.0 || !self.pan.x.is_finite() || !self.pan.y.is_finite() {
            return Err(GeometryError::Transform(format!(
                "pan {:?} zoom {}",
                self.pan, self.zoom
            )));
        }
        Ok(Rect::from_points(
            self.screen_to_logical(Point::ORIGIN),
            self.screen_to_logical(Point::new(size.width, size.height)),
        ))
    }
}
