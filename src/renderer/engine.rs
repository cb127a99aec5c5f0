use crate::types::engine_io::{EngineCommand, EngineEvent};
use crate::types::media_source::MediaSource;

/// The rendering engine as seen from the session.
///
/// Commands are fire-and-forget: nothing is returned, and failures or
/// completions show up later in [`EngineAdapter::poll_events`]. The engine
/// applies its own lifecycle commands in the order they are issued.
#[cfg_attr(test, mockall::automock)]
pub trait EngineAdapter {
    fn load(&mut self, source: &MediaSource);
    fn play(&mut self);
    fn pause(&mut self);
    /// Seek to a fraction of the duration.
    fn seek_to(&mut self, fraction: f64);
    fn set_volume(&mut self, volume: f64);
    fn set_muted(&mut self, muted: bool);
    fn set_playback_rate(&mut self, rate: f64);
    fn request_fullscreen(&mut self);
    fn enter_pip(&mut self);
    fn exit_pip(&mut self);
    /// Tear down the live session.
    fn destroy(&mut self);
    /// Build a fresh session, with or without native controls.
    fn recreate(&mut self, controls: bool);
    /// Callbacks observed since the last call, oldest first.
    fn poll_events(&mut self) -> Vec<EngineEvent>;
}

pub fn execute<E: EngineAdapter + ?Sized>(engine: &mut E, command: &EngineCommand) {
    match command {
        EngineCommand::Load(source) => engine.load(source),
        EngineCommand::Play => engine.play(),
        EngineCommand::Pause => engine.pause(),
        EngineCommand::SeekTo(fraction) => engine.seek_to(*fraction),
        EngineCommand::SetVolume(volume) => engine.set_volume(*volume),
        EngineCommand::SetMuted(muted) => engine.set_muted(*muted),
        EngineCommand::SetPlaybackRate(rate) => engine.set_playback_rate(*rate),
        EngineCommand::RequestFullscreen => engine.request_fullscreen(),
        EngineCommand::EnterPip => engine.enter_pip(),
        EngineCommand::ExitPip => engine.exit_pip(),
        EngineCommand::Destroy => engine.destroy(),
        EngineCommand::Recreate { controls } => engine.recreate(*controls),
    }
}
