//! playdeck
//!
//! A desktop control surface for a media player. The session record, its
//! transitions and the engine seam are plain Rust and always built; the
//! GStreamer engine (`gst` feature) and the egui front end (`gui` feature)
//! plug into them.
//!
//! ```
//! use playdeck::ops::reducer::{apply_action, UserAction};
//! use playdeck::types::engine_io::EngineCommand;
//! use playdeck::types::session_state::SessionState;
//!
//! let step = apply_action(&SessionState::initial(), UserAction::Load("https://example/a.m3u8".into()));
//! assert_eq!(step.commands.last(), Some(&EngineCommand::Play));
//! ```

pub mod config;
pub mod error;
pub mod ops;
pub mod renderer;
pub mod types;
#[cfg(feature = "gui")]
pub mod ui;

pub use error::{ConfigError, EngineError, InputError};
