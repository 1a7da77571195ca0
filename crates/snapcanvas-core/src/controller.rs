//! Drag and resize state machine.
//!
//! The controller turns pointer movement into snapped store writes. Moves
//! are throttled; resize writes are deferred to the next frame and
//! coalesced so that at most one is outstanding.

use crate::config::EditorConfig;
use crate::shape::{ShapeId, ShapePatch};
use crate::store::ShapeStore;
use crate::timing::{Deferred, Instant, Throttle};
use crate::viewport::Viewport;
use kurbo::{Point, Size, Vec2};
use std::time::Duration;

/// Snap a value to the nearest multiple of `step`, halves away from zero.
pub fn snap_to_step(value: f64, step: f64) -> f64 {
    (value / step).round() * step
}

/// Snap a resized dimension, never going below `min_size`.
///
/// At the floor the result is `min_size` itself, which need not be a
/// multiple of `step`.
pub fn snap_size(value: f64, step: f64, min_size: f64) -> f64 {
    snap_to_step(value, step).max(min_size)
}

/// What the controller is doing.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionState {
    Idle,
    /// Moving a shape. `grab_offset` is the logical offset of the pointer
    /// from the shape's top-left corner.
    Dragging { id: ShapeId, grab_offset: Vec2 },
    /// Resizing a shape from its bottom-right handle.
    Resizing {
        id: ShapeId,
        start_pointer: Point,
        start_size: Size,
    },
}

/// Result of feeding a pointer move to the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    /// No interaction in progress.
    Ignored,
    /// Dropped by the move throttle.
    Throttled,
    /// The dragged shape was written at a new position.
    Moved(ShapeId),
    /// A resize write is waiting for the next frame.
    ResizeScheduled(ShapeId),
}

#[derive(Debug, Clone, PartialEq)]
struct ResizeCommit {
    id: ShapeId,
    size: Size,
}

/// Pointer-driven drag/resize controller.
#[derive(Debug, Clone)]
pub struct DragController {
    state: InteractionState,
    throttle: Throttle,
    pending_resize: Deferred<ResizeCommit>,
}

impl Default for DragController {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}

impl DragController {
    pub fn new(move_throttle: Duration) -> Self {
        Self {
            state: InteractionState::Idle,
            throttle: Throttle::new(move_throttle),
            pending_resize: Deferred::new(),
        }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(config.move_throttle())
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == InteractionState::Idle
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, InteractionState::Dragging { .. })
    }

    /// Shape being dragged or resized.
    pub fn active_id(&self) -> Option<&ShapeId> {
        match &self.state {
            InteractionState::Idle => None,
            InteractionState::Dragging { id, .. } | InteractionState::Resizing { id, .. } => Some(id),
        }
    }

    pub fn has_pending_resize(&self) -> bool {
        self.pending_resize.is_pending()
    }

    /// Start moving `id`, grabbed at screen point `pointer`.
    ///
    /// Only starts from idle. Returns false if an interaction is already in
    /// progress or the shape does not exist.
    pub fn begin_drag(
        &mut self,
        store: &ShapeStore,
        viewport: &Viewport,
        id: &ShapeId,
        pointer: Point,
    ) -> bool {
        if !self.is_idle() {
            log::debug!("Ignoring drag start on {}: {:?} in progress", id, self.state);
            return false;
        }
        let Some(shape) = store.get(id) else {
            return false;
        };
        let grab_offset = viewport.screen_to_logical(pointer) - shape.position();
        log::debug!("Drag start {} offset {:?}", id, grab_offset);
        self.throttle.reset();
        self.state = InteractionState::Dragging {
            id: id.clone(),
            grab_offset,
        };
        true
    }

    /// Start resizing `id` from screen point `pointer`.
    pub fn begin_resize(&mut self, store: &ShapeStore, id: &ShapeId, pointer: Point) -> bool {
        if !self.is_idle() {
            log::debug!("Ignoring resize start on {}: {:?} in progress", id, self.state);
            return false;
        }
        let Some(shape) = store.get(id) else {
            return false;
        };
        log::debug!("Resize start {} at {:?}", id, shape.size());
        self.throttle.reset();
        self.state = InteractionState::Resizing {
            id: id.clone(),
            start_pointer: pointer,
            start_size: shape.size(),
        };
        true
    }

    /// Feed a pointer move at screen point `pointer`.
    pub fn pointer_move(
        &mut self,
        store: &mut ShapeStore,
        viewport: &Viewport,
        pointer: Point,
        now: Instant,
    ) -> MoveOutcome {
        if self.is_idle() {
            return MoveOutcome::Ignored;
        }
        if !self.throttle.try_accept(now) {
            return MoveOutcome::Throttled;
        }

        let step = store.move_unit();
        match &self.state {
            InteractionState::Idle => MoveOutcome::Ignored,
            InteractionState::Dragging { id, grab_offset } => {
                let raw = viewport.screen_to_logical(pointer) - *grab_offset;
                let snapped = Point::new(snap_to_step(raw.x, step), snap_to_step(raw.y, step));
                if store.update_shape(id, ShapePatch::position(snapped)) {
                    MoveOutcome::Moved(id.clone())
                } else {
                    MoveOutcome::Ignored
                }
            }
            InteractionState::Resizing {
                id,
                start_pointer,
                start_size,
            } => {
                let delta = viewport.screen_delta_to_logical(pointer - *start_pointer);
                let min_size = store.min_size();
                let size = Size::new(
                    snap_size(start_size.width + delta.x, step, min_size),
                    snap_size(start_size.height + delta.y, step, min_size),
                );
                let commit = ResizeCommit {
                    id: id.clone(),
                    size,
                };
                if self.pending_resize.schedule(now, commit).is_some() {
                    log::trace!("Superseded pending resize of {}", id);
                }
                MoveOutcome::ResizeScheduled(id.clone())
            }
        }
    }

    /// Write the pending resize if it is due.
    ///
    /// The write starts from the shape's style as stored now and replaces
    /// only its width and height. Returns the resized shape.
    pub fn flush_resize(&mut self, store: &mut ShapeStore, now: Instant) -> Option<ShapeId> {
        let commit = self.pending_resize.take_due(now)?;
        let style = store
            .get(&commit.id)?
            .style
            .with_size(commit.size.width, commit.size.height);
        store
            .update_shape(&commit.id, ShapePatch::style(style))
            .then_some(commit.id)
    }

    /// End whatever interaction is in progress.
    ///
    /// A pending resize is written before returning to idle. Returns the
    /// shape that was being manipulated.
    pub fn pointer_up(&mut self, store: &mut ShapeStore) -> Option<ShapeId> {
        if let Some(commit) = self.pending_resize.cancel() {
            if let Some(shape) = store.get(&commit.id) {
                let style = shape.style.with_size(commit.size.width, commit.size.height);
                store.update_shape(&commit.id, ShapePatch::style(style));
            }
        }
        let previous = std::mem::replace(&mut self.state, InteractionState::Idle);
        self.throttle.reset();
        match previous {
            InteractionState::Idle => None,
            InteractionState::Dragging { id, .. } | InteractionState::Resizing { id, .. } => {
                log::debug!("Interaction on {} ended", id);
                Some(id)
            }
        }
    }
}
