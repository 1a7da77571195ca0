//! Replays scripts against a canvas.

use crate::config::AppConfig;
use crate::script::{Script, ScriptStep};
use kurbo::Point;
use snapcanvas_core::canvas::{Canvas, CanvasSnapshot};
use snapcanvas_core::input::{KeyEvent, PointerEvent};
use snapcanvas_core::storage::Storage;
use snapcanvas_core::timing::Instant;
use std::sync::Arc;
use std::time::Duration;

/// A canvas driven by a simulated clock.
#[derive(Debug)]
pub struct Session {
    canvas: Canvas,
    started: Instant,
    /// Latest timestamp seen, in milliseconds.
    clock_ms: u64,
}

impl Session {
    pub fn new(config: &AppConfig, storage: Arc<dyn Storage>) -> Self {
        let mut canvas = Canvas::with_storage(storage, &config.editor);
        canvas.set_viewport_size(f64::from(config.width), f64::from(config.height));
        log::info!(
            "{}: {}x{} canvas, {} stored shapes",
            config.title,
            config.width,
            config.height,
            canvas.store.len()
        );
        Self {
            canvas,
            started: Instant::now(),
            clock_ms: 0,
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Advance the clock to `time`. Timestamps never run backwards.
    fn advance(&mut self, time: u64) -> Instant {
        if time < self.clock_ms {
            log::warn!("Step at {}ms is earlier than {}ms, holding clock", time, self.clock_ms);
        } else {
            self.clock_ms = time;
        }
        self.started + Duration::from_millis(self.clock_ms)
    }

    /// Apply one step.
    ///
    /// Every timed step runs the frame that is due before it, the way a
    /// host delivers animation frames between input events.
    pub fn apply(&mut self, step: &ScriptStep) {
        let now = match step.time() {
            Some(time) => {
                let now = self.advance(time);
                self.canvas.tick(now);
                now
            }
            None => self.started + Duration::from_millis(self.clock_ms),
        };

        match step {
            ScriptStep::Resize { width, height } => {
                self.canvas.set_viewport_size(*width, *height);
            }
            ScriptStep::AddRectangle => {
                if self.canvas.add_rectangle().is_none() {
                    log::warn!("Canvas has no size, rectangle not added");
                }
            }
            ScriptStep::PointerDown { x, y, button, .. } => {
                let event = PointerEvent::Down {
                    position: Point::new(*x, *y),
                    button: *button,
                };
                self.canvas.handle_pointer_event(&event, now);
            }
            ScriptStep::PointerMove { x, y, .. } => {
                let event = PointerEvent::Move {
                    position: Point::new(*x, *y),
                };
                self.canvas.handle_pointer_event(&event, now);
            }
            ScriptStep::PointerUp { x, y, button, .. } => {
                let event = PointerEvent::Up {
                    position: Point::new(*x, *y),
                    button: *button,
                };
                self.canvas.handle_pointer_event(&event, now);
            }
            ScriptStep::Key { key, .. } => {
                self.canvas.handle_key_event(&KeyEvent::Pressed(key.clone()));
                self.canvas.handle_key_event(&KeyEvent::Released(key.clone()));
            }
            ScriptStep::Focus { id } => self.canvas.focus(id.clone()),
            ScriptStep::RequestZoom { zoom, .. } => self.canvas.request_zoom(*zoom, now),
            ScriptStep::ResetZoom => {
                self.canvas.reset_zoom();
            }
            ScriptStep::SetUnit { unit } => self.canvas.set_unit(*unit),
            ScriptStep::Tick { .. } => {}
        }
    }

    /// Apply every step of a script and return the final state.
    pub fn run(&mut self, script: &Script) -> CanvasSnapshot {
        for step in &script.steps {
            log::debug!("Step {:?}", step);
            self.apply(step);
        }
        self.canvas.snapshot()
    }
}
