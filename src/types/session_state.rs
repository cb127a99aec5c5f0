use crate::types::media_source::MediaSource;

pub const DEFAULT_VOLUME: f64 = 0.8;
pub const DEFAULT_PLAYBACK_RATE: f64 = 1.0;

/// The single record describing one playback session.
///
/// `playing`, `pip`, `volume`, `muted` and `playback_rate` hold what the user
/// asked for. `played`, `loaded` and `duration` hold what the engine last
/// reported, except that `played` carries the drag position while `seeking`.
///
/// Records are never edited in place: every transition in
/// [`crate::ops::transitions`] returns a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub url: Option<MediaSource>,
    pub playing: bool,
    pub controls: bool,
    pub light: bool,
    pub pip: bool,
    pub looping: bool,
    pub muted: bool,
    pub volume: f64,
    pub playback_rate: f64,
    pub played: f64,
    pub loaded: f64,
    pub duration: f64,
    pub seeking: bool,
}

impl SessionState {
    pub fn initial() -> Self {
        SessionState {
            url: None,
            playing: true,
            controls: true,
            light: false,
            pip: false,
            looping: false,
            muted: false,
            volume: DEFAULT_VOLUME,
            playback_rate: DEFAULT_PLAYBACK_RATE,
            played: 0.0,
            loaded: 0.0,
            duration: 0.0,
            seeking: false,
        }
    }

    pub fn has_media(&self) -> bool {
        self.url.is_some()
    }

    /// Seconds elapsed, derived from the duration and the played fraction.
    pub fn elapsed(&self) -> f64 {
        self.duration * self.played
    }

    pub fn remaining(&self) -> f64 {
        self.duration * (1.0 - self.played)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_defaults() {
        let state = SessionState::initial();
        assert!(state.url.is_none());
        assert!(state.playing);
        assert!(state.controls);
        assert!(!state.light && !state.pip && !state.looping && !state.muted);
        assert_eq!(state.volume, 0.8);
        assert_eq!(state.playback_rate, 1.0);
        assert_eq!(state.played, 0.0);
        assert_eq!(state.loaded, 0.0);
        assert_eq!(state.duration, 0.0);
        assert!(!state.seeking);
        assert_eq!(state, SessionState::default());
    }

    #[test]
    fn test_elapsed_and_remaining() {
        let state = SessionState {
            duration: 200.0,
            played: 0.25,
            ..SessionState::initial()
        };
        assert_eq!(state.elapsed(), 50.0);
        assert_eq!(state.remaining(), 150.0);
    }
}
