use crate::error::EngineError;
use crate::types::media_source::MediaSource;

/// Imperative requests sent to the rendering engine. None of them return a
/// result; the outcome comes back later as an [`EngineEvent`].
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    Load(MediaSource),
    Play,
    Pause,
    /// Target position as a fraction of the duration.
    SeekTo(f64),
    SetVolume(f64),
    SetMuted(bool),
    SetPlaybackRate(f64),
    RequestFullscreen,
    EnterPip,
    ExitPip,
    Destroy,
    /// Rebuild the rendering session, with or without native controls.
    Recreate { controls: bool },
}

/// Callbacks reported by the engine, in the order it observed them.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Ready,
    Start,
    Play,
    Pause,
    BufferBegin,
    BufferEnd,
    Progress { played: f64, loaded: f64 },
    Duration(f64),
    PlaybackRateChanged(f64),
    /// Position in seconds the engine seeked to.
    Seek(f64),
    Ended,
    Error(EngineError),
    PipEnabled,
    PipDisabled,
    PlaybackQualityChanged { width: u32, height: u32 },
}
