//! Scripted editing sessions.
//!
//! A script is a JSON array of steps. Pointer positions are screen pixels;
//! `time` is milliseconds since the session started.
//!
//! ```json
//! [
//!   { "type": "addRectangle" },
//!   { "type": "pointerDown", "x": 410, "y": 310, "time": 0 },
//!   { "type": "pointerMove", "x": 440, "y": 310, "time": 16 },
//!   { "type": "pointerUp", "x": 440, "y": 310, "time": 20 }
//! ]
//! ```

use serde::{Deserialize, Serialize};
use snapcanvas_core::input::MouseButton;
use snapcanvas_core::shape::ShapeId;

fn primary() -> MouseButton {
    MouseButton::Left
}

/// One step of a session script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ScriptStep {
    /// Resize the canvas, as the host window would.
    Resize { width: f64, height: f64 },
    AddRectangle,
    PointerDown {
        x: f64,
        y: f64,
        #[serde(default)]
        time: u64,
        #[serde(default = "primary")]
        button: MouseButton,
    },
    PointerMove {
        x: f64,
        y: f64,
        #[serde(default)]
        time: u64,
    },
    PointerUp {
        x: f64,
        y: f64,
        #[serde(default)]
        time: u64,
        #[serde(default = "primary")]
        button: MouseButton,
    },
    /// A key press followed by its release.
    Key {
        key: String,
        #[serde(default)]
        time: u64,
    },
    Focus { id: Option<ShapeId> },
    RequestZoom {
        zoom: f64,
        #[serde(default)]
        time: u64,
    },
    ResetZoom,
    SetUnit { unit: f64 },
    /// Run an animation frame.
    Tick { time: u64 },
}

impl ScriptStep {
    /// Timestamp of the step, for steps that carry one.
    pub fn time(&self) -> Option<u64> {
        match self {
            ScriptStep::PointerDown { time, .. }
            | ScriptStep::PointerMove { time, .. }
            | ScriptStep::PointerUp { time, .. }
            | ScriptStep::Key { time, .. }
            | ScriptStep::RequestZoom { time, .. }
            | ScriptStep::Tick { time } => Some(*time),
            ScriptStep::Resize { .. }
            | ScriptStep::AddRectangle
            | ScriptStep::Focus { .. }
            | ScriptStep::ResetZoom
            | ScriptStep::SetUnit { .. } => None,
        }
    }
}

/// A parsed session script.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Script {
    pub steps: Vec<ScriptStep>,
}

impl Script {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_steps() {
        let script = Script::from_json(
            r#"[
                {"type": "addRectangle"},
                {"type": "pointerDown", "x": 10, "y": 20},
                {"type": "pointerMove", "x": 30, "y": 20, "time": 16},
                {"type": "pointerUp", "x": 30, "y": 20, "time": 40, "button": "left"},
                {"type": "key", "key": "Delete"},
                {"type": "requestZoom", "zoom": 1.5, "time": 50},
                {"type": "tick", "time": 90},
                {"type": "setUnit", "unit": 20}
            ]"#,
        )
        .unwrap();

        assert_eq!(script.steps.len(), 8);
        assert_eq!(script.steps[0], ScriptStep::AddRectangle);
        assert_eq!(
            script.steps[1],
            ScriptStep::PointerDown {
                x: 10.0,
                y: 20.0,
                time: 0,
                button: MouseButton::Left,
            }
        );
        assert_eq!(script.steps[2].time(), Some(16));
        assert_eq!(script.steps[7].time(), None);
    }

    #[test]
    fn test_unknown_step_is_rejected() {
        assert!(Script::from_json(r#"[{"type": "rotate"}]"#).is_err());
    }
}
