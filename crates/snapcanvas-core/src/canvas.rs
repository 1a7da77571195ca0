//! Canvas runtime: routes input to the store, viewport and controller.

use crate::config::EditorConfig;
use crate::controller::{DragController, MoveOutcome};
use crate::guides::{GuideLine, detect_guides};
use crate::input::{DELETE_KEY, InputState, KeyEvent, MouseButton, PointerEvent};
use crate::layout::{HitTarget, LayoutModel};
use crate::shape::{Shape, ShapeId};
use crate::storage::Storage;
use crate::store::ShapeStore;
use crate::timing::Instant;
use crate::viewport::{BackgroundGrid, Viewport};
use kurbo::{Point, Size, Vec2};
use serde::Serialize;
use std::sync::Arc;

/// Serializable view of the editor state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasSnapshot {
    pub shapes: Vec<Shape>,
    pub focused: Option<ShapeId>,
    pub zoom: f64,
    /// Applied zoom as the slider label shows it.
    pub zoom_percent: u32,
    pub pan: Vec2,
    pub grid: BackgroundGrid,
    pub guides: Vec<GuideLine>,
}

/// The interactive canvas.
#[derive(Debug)]
pub struct Canvas {
    /// Shapes, focus and grid unit.
    pub store: ShapeStore,
    /// Pan/zoom transform.
    pub viewport: Viewport,
    controller: DragController,
    input: InputState,
    guide_threshold: f64,
    /// Logical content box centered on first mount.
    content_size: Option<Size>,
    /// Current alignment guides.
    guides: Vec<GuideLine>,
    /// Shape the guides were computed for.
    guides_for: Option<ShapeId>,
    /// What the primary button went down on.
    press_target: Option<HitTarget>,
    /// Last pointer position of a background pan.
    pan_anchor: Option<Point>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl Canvas {
    /// Create a canvas without persistence.
    pub fn new(config: &EditorConfig) -> Self {
        Self::with_store(ShapeStore::new(config), config)
    }

    /// Create a canvas whose shapes are loaded from and saved to `storage`.
    pub fn with_storage(storage: Arc<dyn Storage>, config: &EditorConfig) -> Self {
        Self::with_store(ShapeStore::with_storage(storage, config), config)
    }

    fn with_store(store: ShapeStore, config: &EditorConfig) -> Self {
        Self {
            store,
            viewport: Viewport::new(config.initial_zoom, config.zoom_settle()),
            controller: DragController::from_config(config),
            input: InputState::new(),
            guide_threshold: config.guide_threshold,
            content_size: config.content_size,
            guides: Vec::new(),
            guides_for: None,
            press_target: None,
            pan_anchor: None,
        }
    }

    /// Record the on-screen size of the canvas. Shapes can only be added
    /// once a size is known.
    ///
    /// The first size centers the configured content box; later resizes
    /// keep the pan.
    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        let first_mount = self.viewport.size().is_none();
        self.viewport.set_size(Size::new(width, height));
        if let (true, Some(content)) = (first_mount, self.content_size) {
            if self.viewport.center_content(content) {
                log::debug!(
                    "Centered {}x{} content, pan {:?}",
                    content.width,
                    content.height,
                    self.viewport.pan()
                );
            }
        }
    }

    pub fn controller(&self) -> &DragController {
        &self.controller
    }

    pub fn layout(&self) -> LayoutModel<'_> {
        LayoutModel::new(&self.store, &self.viewport)
    }

    pub fn guides(&self) -> &[GuideLine] {
        &self.guides
    }

    pub fn focused_id(&self) -> Option<&ShapeId> {
        self.store.focused_id()
    }

    pub fn snapshot(&self) -> CanvasSnapshot {
        CanvasSnapshot {
            shapes: self.store.shapes().to_vec(),
            focused: self.store.focused_id().cloned(),
            zoom: self.viewport.zoom(),
            zoom_percent: self.viewport.zoom_percent(),
            pan: self.viewport.pan(),
            grid: self.viewport.background_grid(self.store.unit()),
            guides: self.guides.clone(),
        }
    }

    /// Add a rectangle centered in the visible area.
    pub fn add_rectangle(&mut self) -> Option<ShapeId> {
        self.store.add_shape(&self.viewport)
    }

    pub fn request_zoom(&mut self, target: f64, now: Instant) {
        self.viewport.request_zoom(target, now);
    }

    pub fn reset_zoom(&mut self) -> bool {
        self.viewport.reset_zoom()
    }

    pub fn set_unit(&mut self, unit: f64) {
        self.store.set_unit(unit);
    }

    /// Focus a shape, or clear focus with `None`.
    ///
    /// Guides follow the focused shape unless it is being dragged.
    pub fn focus(&mut self, id: Option<ShapeId>) {
        self.store.set_focused_shape(id);
        match self.store.focused_id().cloned() {
            Some(id) if self.controller.active_id() != Some(&id) => self.update_guides(id),
            Some(_) => {}
            None => self.clear_guides(),
        }
    }

    fn update_guides(&mut self, id: ShapeId) {
        let layout = LayoutModel::new(&self.store, &self.viewport);
        self.guides = detect_guides(&layout, &id, self.guide_threshold);
        self.guides_for = Some(id);
    }

    fn clear_guides(&mut self) {
        self.guides.clear();
        self.guides_for = None;
    }

    /// Process a pointer event that happened at `now`.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent, now: Instant) {
        self.input.handle_pointer_event(event);
        match *event {
            PointerEvent::Down {
                position,
                button: MouseButton::Left,
            } => self.pointer_down(position),
            PointerEvent::Down { .. } => {}
            PointerEvent::Move { position } => self.pointer_move(position, now),
            PointerEvent::Up { button, .. } => self.pointer_up(button),
        }
    }

    fn pointer_down(&mut self, position: Point) {
        let target = self.layout().hit_test(position);
        match &target {
            HitTarget::ResizeHandle(id) => {
                self.controller.begin_resize(&self.store, id, position);
            }
            HitTarget::Body(id) => {
                self.controller.begin_drag(&self.store, &self.viewport, id, position);
            }
            HitTarget::Background => {
                if self.controller.is_idle() {
                    self.pan_anchor = Some(position);
                }
            }
        }
        self.press_target = Some(target);
    }

    fn pointer_move(&mut self, position: Point, now: Instant) {
        if let Some(anchor) = self.pan_anchor {
            self.viewport.pan_by(position - anchor);
            self.pan_anchor = Some(position);
            return;
        }
        match self
            .controller
            .pointer_move(&mut self.store, &self.viewport, position, now)
        {
            MoveOutcome::Moved(id) => self.update_guides(id),
            MoveOutcome::ResizeScheduled(_) | MoveOutcome::Throttled | MoveOutcome::Ignored => {}
        }
    }

    /// Any button release ends the interaction; only a primary click
    /// changes focus.
    fn pointer_up(&mut self, button: MouseButton) {
        if self.controller.pointer_up(&mut self.store).is_some() {
            self.clear_guides();
        }
        self.pan_anchor = None;

        let target = self.press_target.take();
        if button == MouseButton::Left && self.input.is_click() {
            match target {
                Some(HitTarget::Body(id)) | Some(HitTarget::ResizeHandle(id)) => self.focus(Some(id)),
                Some(HitTarget::Background) => self.focus(None),
                None => {}
            }
        }
    }

    /// Process a key event.
    pub fn handle_key_event(&mut self, event: &KeyEvent) {
        if let KeyEvent::Pressed(key) = event {
            if key == DELETE_KEY {
                self.delete_focused();
            }
        }
    }

    /// Delete the focused shape. Returns false if nothing was focused.
    pub fn delete_focused(&mut self) -> bool {
        let Some(id) = self.store.focused_id().cloned() else {
            return false;
        };
        log::debug!("Deleting focused shape {}", id);
        let deleted = self.store.delete_shape(&id);
        self.clear_guides();
        deleted
    }

    /// Run deferred work that is due at `now`.
    ///
    /// Applies a settled zoom and the pending resize write. Returns true if
    /// anything changed and the canvas needs repainting.
    pub fn tick(&mut self, now: Instant) -> bool {
        let zoomed = self.viewport.settle(now);
        let resized = self.controller.flush_resize(&mut self.store, now).is_some();
        if zoomed || resized {
            if let Some(id) = self.guides_for.clone() {
                self.update_guides(id);
            }
        }
        zoomed || resized
    }
}
