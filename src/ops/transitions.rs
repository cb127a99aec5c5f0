//! Pure state transitions.
//!
//! Each function takes the current record and a payload and returns the next
//! record. None of them fail. Fractions and volume are clamped into [0, 1];
//! the playback rate is passed through because the engine owns its range.

use crate::types::media_source::MediaSource;
use crate::types::session_state::SessionState;

/// Clamps into [0, 1]. NaN collapses to 0 so it can never reach the record.
pub fn clamp_fraction(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

pub fn initial() -> SessionState {
    SessionState::initial()
}

pub fn load(state: &SessionState, url: MediaSource) -> SessionState {
    SessionState {
        url: Some(url),
        played: 0.0,
        loaded: 0.0,
        pip: false,
        seeking: false,
        ..state.clone()
    }
}

pub fn toggle_play_pause(state: &SessionState) -> SessionState {
    SessionState {
        playing: !state.playing,
        ..state.clone()
    }
}

pub fn stop(state: &SessionState) -> SessionState {
    SessionState {
        url: None,
        playing: false,
        ..state.clone()
    }
}

/// Flips native controls. The live session is torn down and rebuilt around
/// the same url, so progress starts over.
pub fn toggle_controls(state: &SessionState) -> SessionState {
    SessionState {
        controls: !state.controls,
        played: 0.0,
        loaded: 0.0,
        ..state.clone()
    }
}

pub fn toggle_light(state: &SessionState) -> SessionState {
    SessionState {
        light: !state.light,
        ..state.clone()
    }
}

pub fn toggle_loop(state: &SessionState) -> SessionState {
    SessionState {
        looping: !state.looping,
        ..state.clone()
    }
}

pub fn toggle_muted(state: &SessionState) -> SessionState {
    SessionState {
        muted: !state.muted,
        ..state.clone()
    }
}

pub fn toggle_pip(state: &SessionState) -> SessionState {
    SessionState {
        pip: !state.pip,
        ..state.clone()
    }
}

pub fn set_volume(state: &SessionState, volume: f64) -> SessionState {
    SessionState {
        volume: clamp_fraction(volume),
        ..state.clone()
    }
}

pub fn set_playback_rate(state: &SessionState, rate: f64) -> SessionState {
    SessionState {
        playback_rate: rate,
        ..state.clone()
    }
}

pub fn begin_seek(state: &SessionState) -> SessionState {
    SessionState {
        seeking: true,
        ..state.clone()
    }
}

/// Moves `played` along with the drag. Ignored unless a seek is in progress.
pub fn update_seek_preview(state: &SessionState, fraction: f64) -> SessionState {
    if !state.seeking {
        return state.clone();
    }
    SessionState {
        played: clamp_fraction(fraction),
        ..state.clone()
    }
}

/// Ends the drag. `played` is left alone: the engine reports the new
/// position through its progress callback once the seek lands.
pub fn commit_seek(state: &SessionState) -> SessionState {
    SessionState {
        seeking: false,
        ..state.clone()
    }
}

/// Applies a progress report unless the user is dragging the seek bar.
pub fn on_engine_progress(state: &SessionState, played: f64, loaded: f64) -> SessionState {
    if state.seeking {
        return state.clone();
    }
    SessionState {
        played: clamp_fraction(played),
        loaded: clamp_fraction(loaded),
        ..state.clone()
    }
}

pub fn on_engine_duration(state: &SessionState, duration: f64) -> SessionState {
    let duration = if duration.is_nan() { 0.0 } else { duration.max(0.0) };
    SessionState {
        duration,
        ..state.clone()
    }
}

pub fn on_engine_ended(state: &SessionState) -> SessionState {
    SessionState {
        playing: state.looping,
        ..state.clone()
    }
}

pub fn on_engine_pip_change(state: &SessionState, enabled: bool) -> SessionState {
    SessionState {
        pip: enabled,
        ..state.clone()
    }
}

pub fn on_engine_play(state: &SessionState) -> SessionState {
    SessionState {
        playing: true,
        ..state.clone()
    }
}

pub fn on_engine_pause(state: &SessionState) -> SessionState {
    SessionState {
        playing: false,
        ..state.clone()
    }
}

pub fn on_engine_rate_changed(state: &SessionState, rate: f64) -> SessionState {
    SessionState {
        playback_rate: rate,
        ..state.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded_state() -> SessionState {
        let state = load(&initial(), MediaSource::single("https://example/a.m3u8"));
        on_engine_progress(&state, 0.4, 0.7)
    }

    #[test]
    fn test_set_volume_clamps() {
        for v in [-3.0, -0.0001, 0.0, 0.25, 0.8, 1.0, 1.5, 100.0] {
            let next = set_volume(&initial(), v);
            assert_eq!(next.volume, v.clamp(0.0, 1.0));
        }
        assert_eq!(set_volume(&initial(), f64::NAN).volume, 0.0);
        assert_eq!(set_volume(&initial(), f64::INFINITY).volume, 1.0);
    }

    #[test]
    fn test_progress_ignored_while_seeking() {
        let state = begin_seek(&loaded_state());
        let next = on_engine_progress(&state, 0.9, 0.95);
        assert_eq!(next.played, 0.4);
        assert_eq!(next.loaded, 0.7);
        assert!(next.seeking);
    }

    #[test]
    fn test_progress_clamped() {
        let next = on_engine_progress(&initial(), 1.2, -0.1);
        assert_eq!(next.played, 1.0);
        assert_eq!(next.loaded, 0.0);
    }

    #[test]
    fn test_toggle_controls_twice() {
        let state = loaded_state();
        let once = toggle_controls(&state);
        assert_eq!(once.controls, !state.controls);
        assert_eq!(once.url, state.url);
        assert_eq!((once.played, once.loaded), (0.0, 0.0));

        let progressed = on_engine_progress(&once, 0.3, 0.5);
        let twice = toggle_controls(&progressed);
        assert_eq!(twice.controls, state.controls);
        assert_eq!(twice.url, state.url);
        assert_eq!((twice.played, twice.loaded), (0.0, 0.0));
    }

    #[test]
    fn test_stop_then_load() {
        for playing in [true, false] {
            let state = SessionState {
                playing,
                pip: true,
                ..loaded_state()
            };
            let stopped = stop(&state);
            assert!(stopped.url.is_none());
            assert!(!stopped.playing);

            let reloaded = load(&stopped, MediaSource::single("https://example/b.mp4"));
            assert_eq!(reloaded.url, Some(MediaSource::single("https://example/b.mp4")));
            assert_eq!(reloaded.played, 0.0);
            assert_eq!(reloaded.loaded, 0.0);
            assert!(!reloaded.pip);
            // load never touches play intent; stop already cleared it
            assert_eq!(reloaded.playing, stopped.playing);
        }
    }

    #[test]
    fn test_load_keeps_play_intent() {
        let paused = SessionState {
            playing: false,
            ..initial()
        };
        assert!(!load(&paused, "a.mp4".into()).playing);
        assert!(load(&initial(), "a.mp4".into()).playing);
    }

    #[test]
    fn test_ended_follows_loop() {
        let looping = SessionState {
            looping: true,
            playing: false,
            ..initial()
        };
        assert!(on_engine_ended(&looping).playing);

        let once = SessionState {
            looping: false,
            playing: true,
            ..initial()
        };
        assert!(!on_engine_ended(&once).playing);
    }

    #[test]
    fn test_seek_preview_requires_seeking() {
        let state = loaded_state();
        assert_eq!(update_seek_preview(&state, 0.9).played, 0.4);

        let dragging = begin_seek(&state);
        assert_eq!(update_seek_preview(&dragging, 0.9).played, 0.9);
        assert_eq!(update_seek_preview(&dragging, 7.0).played, 1.0);
    }

    #[test]
    fn test_commit_seek_leaves_played() {
        let dragging = update_seek_preview(&begin_seek(&loaded_state()), 0.2);
        let committed = commit_seek(&dragging);
        assert!(!committed.seeking);
        assert_eq!(committed.played, 0.2);
    }

    #[test]
    fn test_toggles_touch_one_field() {
        let state = loaded_state();
        assert_eq!(
            toggle_light(&state),
            SessionState {
                light: true,
                ..state.clone()
            }
        );
        assert_eq!(
            toggle_loop(&state),
            SessionState {
                looping: true,
                ..state.clone()
            }
        );
        assert_eq!(
            toggle_muted(&state),
            SessionState {
                muted: true,
                ..state.clone()
            }
        );
        assert_eq!(
            toggle_pip(&state),
            SessionState {
                pip: true,
                ..state.clone()
            }
        );
        assert_eq!(toggle_play_pause(&toggle_play_pause(&state)), state);
    }

    #[test]
    fn test_duration_never_negative() {
        assert_eq!(on_engine_duration(&initial(), -5.0).duration, 0.0);
        assert_eq!(on_engine_duration(&initial(), f64::NAN).duration, 0.0);
        assert_eq!(on_engine_duration(&initial(), 3725.0).duration, 3725.0);
    }

    #[test]
    fn test_rate_passed_through() {
        assert_eq!(set_playback_rate(&initial(), 16.0).playback_rate, 16.0);
        assert_eq!(on_engine_rate_changed(&initial(), 0.5).playback_rate, 0.5);
    }

    #[test]
    fn test_engine_pip_and_play_reports() {
        let state = toggle_pip(&loaded_state());
        assert!(!on_engine_pip_change(&state, false).pip);
        assert!(!on_engine_pause(&state).playing);
        assert!(on_engine_play(&on_engine_pause(&state)).playing);
    }

    #[test]
    fn test_load_during_drag_ends_seek() {
        let dragging = update_seek_preview(&begin_seek(&loaded_state()), 0.4);
        assert!(dragging.seeking);
        let reloaded = load(&dragging, MediaSource::single("https://example/b.mp4"));
        assert!(!reloaded.seeking);
        assert_eq!(reloaded.played, 0.0);

        // progress flows again straight away
        let progressed = on_engine_progress(&reloaded, 0.1, 0.2);
        assert_eq!(progressed.played, 0.1);
    }
}
