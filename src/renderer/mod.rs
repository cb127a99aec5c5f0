pub mod engine;
#[cfg(feature = "gst")]
pub mod gst_engine;
pub mod preview;
pub mod session_bridge;
