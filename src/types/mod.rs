pub mod engine_io;
pub mod media_source;
pub mod session_state;
pub mod video_frame;
