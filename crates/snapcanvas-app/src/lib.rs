//! SnapCanvas Application
//!
//! Headless shell around the core engine. It wires up configuration and
//! storage, then replays scripted editing sessions against a canvas.

mod config;
mod script;
mod session;

pub use config::{AppConfig, AppError};
pub use script::{Script, ScriptStep};
pub use session::Session;
