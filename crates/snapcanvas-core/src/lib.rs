//! SnapCanvas Core Library
//!
//! Platform-agnostic interaction and layout engine for a grid-snapped
//! rectangle canvas: the shape store, the pan/zoom viewport, the drag and
//! resize controller, and alignment guide detection.

pub mod canvas;
pub mod config;
pub mod controller;
pub mod guides;
pub mod input;
pub mod layout;
pub mod shape;
pub mod storage;
pub mod store;
pub mod style;
pub mod timing;
pub mod viewport;

pub use canvas::{Canvas, CanvasSnapshot};
pub use config::{ConfigError, EditorConfig};
pub use controller::{DragController, InteractionState, MoveOutcome, snap_to_step};
pub use guides::{GUIDE_THRESHOLD, GuideKind, GuideLine, ScreenBounds, detect_guides};
pub use input::{InputState, KeyEvent, MouseButton, PointerEvent};
pub use layout::{HitTarget, LayoutModel};
pub use shape::{Shape, ShapeId, ShapePatch};
pub use storage::{MemoryStorage, PersistedState, Storage, StorageError, StorageResult};
pub use store::{GeometryError, ShapeStore, VisibleArea};
pub use style::{ShapeStyle, TextAlign};
pub use timing::Instant;
pub use viewport::{BackgroundGrid, Viewport};
