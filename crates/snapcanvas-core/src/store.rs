//! The shape store: canonical shapes, focus, grid unit and persistence.
//!
//! All mutation goes through the named operations below. Every operation
//! that changes the shape list writes it through to storage.

use crate::config::EditorConfig;
use crate::shape::{Shape, ShapeId, ShapePatch};
use crate::storage::{PersistedState, Storage, StorageError};
use crate::style::{SPAWN_SIZE_UNITS, ShapeStyle};
use kurbo::{Point, Rect};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Default grid unit in logical pixels.
pub const DEFAULT_UNIT: f64 = 14.0;

/// Smallest width/height a shape may have, in logical units.
pub const MIN_SHAPE_SIZE: f64 = 10.0;

/// Fallback spawn margin from the logical origin, in grid units.
const FALLBACK_SPAWN_UNITS: f64 = 3.0;

/// Why the visible canvas area could not be measured.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// The canvas has no size yet.
    #[error("canvas is not mounted")]
    NotMounted,
    /// The view transform cannot be inverted or is not finite.
    #[error("unreadable view transform: {0}")]
    Transform(String),
}

/// Capability to report the logical rectangle currently visible on screen.
pub trait VisibleArea {
    fn visible_rect(&self) -> Result<Rect, GeometryError>;
}

/// Owner of the shape list, the focused shape and the grid unit.
pub struct ShapeStore {
    shapes: Vec<Shape>,
    unit: f64,
    focused: Option<ShapeId>,
    min_size: f64,
    storage: Option<Arc<dyn Storage>>,
    storage_key: String,
}

impl fmt::Debug for ShapeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapeStore")
            .field("shapes", &self.shapes)
            .field("unit", &self.unit)
            .field("focused", &self.focused)
            .field("persistent", &self.storage.is_some())
            .finish()
    }
}

impl Default for ShapeStore {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl ShapeStore {
    /// Create an empty store without persistence.
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            shapes: Vec::new(),
            unit: config.unit,
            focused: None,
            min_size: config.min_size,
            storage: None,
            storage_key: config.storage_key.clone(),
        }
    }

    /// Create a store backed by `storage`, loading the persisted shapes.
    ///
    /// An absent or unreadable record yields an empty store.
    pub fn with_storage(storage: Arc<dyn Storage>, config: &EditorConfig) -> Self {
        let mut store = Self::new(config);
        store.shapes = store.load_from(storage.as_ref());
        store.storage = Some(storage);
        store
    }

    fn load_from(&self, storage: &dyn Storage) -> Vec<Shape> {
        let state = match storage.load(&self.storage_key) {
            Ok(state) => state,
            Err(StorageError::NotFound(_)) => {
                log::debug!("No persisted shapes under {}", self.storage_key);
                return Vec::new();
            }
            Err(e) => {
                log::warn!("Discarding persisted shapes: {}", e);
                return Vec::new();
            }
        };

        let mut seen = HashSet::new();
        let mut shapes = Vec::with_capacity(state.shapes.len());
        for mut shape in state.shapes {
            if !shape.x.is_finite() || !shape.y.is_finite() {
                log::warn!("Dropping persisted shape {} with invalid position", shape.id);
                continue;
            }
            if !seen.insert(shape.id.clone()) {
                log::warn!("Dropping duplicate persisted shape {}", shape.id);
                continue;
            }
            shape.style.normalize(self.min_size);
            shapes.push(shape);
        }
        log::debug!("Loaded {} shapes", shapes.len());
        shapes
    }

    fn persist(&self) {
        let Some(storage) = &self.storage else {
            return;
        };
        let state = PersistedState::new(self.shapes.clone());
        if let Err(e) = storage.save(&self.storage_key, &state) {
            log::error!("Failed to persist shapes: {}", e);
        }
    }

    /// All shapes in insertion order.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Shapes back to front: by z-index, insertion order breaking ties.
    pub fn shapes_ordered(&self) -> Vec<&Shape> {
        let mut ordered: Vec<&Shape> = self.shapes.iter().collect();
        ordered.sort_by_key(|shape| shape.style.z_index);
        ordered
    }

    pub fn get(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|shape| &shape.id == id)
    }

    pub fn contains(&self, id: &ShapeId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Current grid unit.
    pub fn unit(&self) -> f64 {
        self.unit
    }

    /// Snap increment for moves and resizes.
    pub fn move_unit(&self) -> f64 {
        self.unit / 2.0
    }

    pub fn min_size(&self) -> f64 {
        self.min_size
    }

    pub fn focused_id(&self) -> Option<&ShapeId> {
        self.focused.as_ref()
    }

    /// The focused shape as currently stored.
    pub fn focused_shape(&self) -> Option<&Shape> {
        self.focused.as_ref().and_then(|id| self.get(id))
    }

    /// Highest numeric id suffix in use, or 0.
    fn last_index(&self) -> u64 {
        self.shapes
            .iter()
            .filter_map(|shape| shape.id.index())
            .max()
            .unwrap_or(0)
    }

    fn fallback_spawn_position(&self) -> Point {
        let margin = self.unit * FALLBACK_SPAWN_UNITS;
        Point::new(margin, margin)
    }

    /// Add a rectangle centered in the visible area.
    ///
    /// Returns `None` without touching state when the canvas is not mounted.
    /// An unreadable transform places the shape at a fixed default position.
    pub fn add_shape(&mut self, area: &dyn VisibleArea) -> Option<ShapeId> {
        let Some(next) = self.last_index().checked_add(1) else {
            log::warn!("Shape ids exhausted, skipping shape creation");
            return None;
        };
        let size = self.unit * SPAWN_SIZE_UNITS;

        let position = match area.visible_rect() {
            Ok(rect) => {
                let center = rect.center();
                Point::new(center.x - size / 2.0, center.y - size / 2.0)
            }
            Err(GeometryError::NotMounted) => {
                log::debug!("Canvas not mounted, skipping shape creation");
                return None;
            }
            Err(e) => {
                log::warn!("{}; spawning at default position", e);
                self.fallback_spawn_position()
            }
        };

        let id = ShapeId::from_index(next);
        let z_index = i64::try_from(next).unwrap_or(i64::MAX);
        let mut style = ShapeStyle::for_unit(self.unit, z_index);
        style.normalize(self.min_size);

        log::debug!("Adding {} at ({}, {})", id, position.x, position.y);
        self.shapes.push(Shape::new(id.clone(), position, style));
        self.persist();
        Some(id)
    }

    /// Shallow-merge `patch` into the shape with `id`.
    ///
    /// Returns false, leaving state unchanged, if no shape has that id.
    pub fn update_shape(&mut self, id: &ShapeId, patch: ShapePatch) -> bool {
        let min_size = self.min_size;
        let Some(shape) = self.shapes.iter_mut().find(|shape| &shape.id == id) else {
            log::debug!("Ignoring update for unknown shape {}", id);
            return false;
        };
        shape.apply(patch);
        shape.style.normalize(min_size);
        self.persist();
        true
    }

    /// Remove the shape with `id`, clearing focus if it was focused.
    pub fn delete_shape(&mut self, id: &ShapeId) -> bool {
        let before = self.shapes.len();
        self.shapes.retain(|shape| &shape.id != id);
        if self.shapes.len() == before {
            log::debug!("Ignoring delete for unknown shape {}", id);
            return false;
        }
        if self.focused.as_ref() == Some(id) {
            self.focused = None;
        }
        self.persist();
        true
    }

    /// Replace the focus pointer. Unknown ids clear focus.
    pub fn set_focused_shape(&mut self, id: Option<ShapeId>) {
        self.focused = id.filter(|id| self.contains(id));
    }

    /// Replace the grid unit. Existing shapes are not resnapped.
    pub fn set_unit(&mut self, unit: f64) {
        if !unit.is_finite() || unit <= 0.0 {
            log::warn!("Ignoring invalid grid unit {}", unit);
            return;
        }
        self.unit = unit;
    }
}
