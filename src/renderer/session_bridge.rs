use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::EngineError;
use crate::ops::reducer::{self, Step, UserAction};
use crate::renderer::engine::{self, EngineAdapter};
use crate::types::engine_io::{EngineCommand, EngineEvent};
use crate::types::session_state::SessionState;

/// Owns the session record and the engine, and is the only thing that
/// replaces the record. User actions and engine callbacks both pass through
/// here one at a time, on the caller's thread.
pub struct SessionBridge<E: EngineAdapter> {
    state: SessionState,
    engine: E,
    session_id: Uuid,
    notice: Option<EngineError>,
}

impl<E: EngineAdapter> SessionBridge<E> {
    /// Starts a session and hands the record's volume, mute and rate to the
    /// engine, which otherwise keeps its own defaults.
    pub fn new(engine: E) -> Self {
        let session_id = Uuid::new_v4();
        info!(%session_id, "Session started");
        let mut bridge = Self {
            state: SessionState::initial(),
            engine,
            session_id,
            notice: None,
        };
        let commands = reducer::settings_commands(&bridge.state);
        bridge.run(&commands);
        bridge
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// The last engine error, kept until dismissed or until the next load.
    pub fn notice(&self) -> Option<&EngineError> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn dispatch(&mut self, action: UserAction) {
        debug!(session_id = %self.session_id, ?action, "User action");
        if matches!(action, UserAction::Load(_)) {
            self.notice = None;
        }
        let step = reducer::apply_action(&self.state, action);
        self.commit(step);
    }

    /// Drains pending engine callbacks and reconciles each one in arrival
    /// order. Returns how many were handled.
    pub fn pump(&mut self) -> usize {
        let events = self.engine.poll_events();
        let count = events.len();
        for event in events {
            self.handle_event(event);
        }
        count
    }

    pub fn handle_event(&mut self, event: EngineEvent) {
        match &event {
            EngineEvent::Progress { .. } => {}
            EngineEvent::Error(e) => {
                warn!(session_id = %self.session_id, error = %e, "Engine error");
                self.notice = Some(e.clone());
            }
            EngineEvent::Ready | EngineEvent::Start | EngineEvent::Ended => {
                info!(session_id = %self.session_id, ?event, "Engine event");
            }
            _ => debug!(session_id = %self.session_id, ?event, "Engine event"),
        }
        let step = reducer::apply_event(&self.state, &event);
        self.commit(step);
    }

    fn commit(&mut self, step: Step) {
        self.state = step.state;
        self.run(&step.commands);
    }

    fn run(&mut self, commands: &[EngineCommand]) {
        for command in commands {
            debug!(session_id = %self.session_id, ?command, "Engine command");
            engine::execute(&mut self.engine, command);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::engine::MockEngineAdapter;
    use crate::types::media_source::MediaSource;
    use mockall::Sequence;
    use mockall::predicate::eq;

    const HLS: &str = "https://example/a.m3u8";

    fn expect_initial_settings(engine: &mut MockEngineAdapter) {
        engine.expect_set_volume().with(eq(0.8)).times(1).return_const(());
        engine.expect_set_muted().with(eq(false)).times(1).return_const(());
        engine
            .expect_set_playback_rate()
            .with(eq(1.0))
            .times(1)
            .return_const(());
    }

    fn permissive_engine() -> MockEngineAdapter {
        let mut engine = MockEngineAdapter::new();
        engine.expect_load().return_const(());
        engine.expect_play().return_const(());
        engine.expect_pause().return_const(());
        engine.expect_seek_to().return_const(());
        engine.expect_set_volume().return_const(());
        engine.expect_set_muted().return_const(());
        engine.expect_set_playback_rate().return_const(());
        engine.expect_request_fullscreen().return_const(());
        engine.expect_enter_pip().return_const(());
        engine.expect_exit_pip().return_const(());
        engine.expect_destroy().return_const(());
        engine.expect_recreate().return_const(());
        engine
    }

    #[test]
    fn test_commit_seek_then_progress() {
        let mut engine = MockEngineAdapter::new();
        expect_initial_settings(&mut engine);
        engine
            .expect_load()
            .withf(|source| source == &MediaSource::single(HLS))
            .times(1)
            .return_const(());
        engine.expect_play().times(1).return_const(());
        engine.expect_seek_to().with(eq(0.5)).times(1).return_const(());
        engine.expect_poll_events().times(1).returning(|| {
            vec![EngineEvent::Progress {
                played: 0.5,
                loaded: 0.6,
            }]
        });

        let mut bridge = SessionBridge::new(engine);
        bridge.dispatch(UserAction::Load(HLS.into()));
        bridge.dispatch(UserAction::CommitSeek(0.5));
        assert_eq!(bridge.pump(), 1);

        let state = bridge.state();
        assert_eq!(state.played, 0.5);
        assert_eq!(state.loaded, 0.6);
        assert!(!state.seeking);
    }

    #[test]
    fn test_progress_during_drag_is_suppressed() {
        let mut engine = permissive_engine();
        engine.expect_poll_events().times(1).returning(|| {
            vec![EngineEvent::Progress {
                played: 0.1,
                loaded: 0.2,
            }]
        });

        let mut bridge = SessionBridge::new(engine);
        bridge.dispatch(UserAction::Load(HLS.into()));
        bridge.dispatch(UserAction::BeginSeek);
        bridge.dispatch(UserAction::UpdateSeekPreview(0.3));
        bridge.pump();
        assert_eq!(bridge.state().played, 0.3);
        assert_eq!(bridge.state().loaded, 0.0);

        bridge.dispatch(UserAction::CommitSeek(0.3));
        assert_eq!(bridge.state().played, 0.3);
        assert!(!bridge.state().seeking);
    }

    #[test]
    fn test_error_sets_notice_without_touching_intent() {
        let mut engine = permissive_engine();
        engine.expect_poll_events().times(1).returning(|| {
            vec![EngineEvent::Error(EngineError::Network(
                "connection refused".to_string(),
            ))]
        });

        let mut bridge = SessionBridge::new(engine);
        bridge.dispatch(UserAction::Load(HLS.into()));
        let before = bridge.state().clone();
        bridge.pump();
        assert_eq!(bridge.state(), &before);
        assert!(matches!(bridge.notice(), Some(EngineError::Network(_))));

        bridge.dispatch(UserAction::Load(HLS.into()));
        assert!(bridge.notice().is_none());
    }

    #[test]
    fn test_loop_restart_goes_to_engine() {
        let mut engine = MockEngineAdapter::new();
        expect_initial_settings(&mut engine);
        engine.expect_load().times(1).return_const(());
        engine.expect_play().times(2).return_const(());
        engine.expect_seek_to().with(eq(0.0)).times(1).return_const(());
        engine
            .expect_poll_events()
            .times(1)
            .returning(|| vec![EngineEvent::Ended]);

        let mut bridge = SessionBridge::new(engine);
        bridge.dispatch(UserAction::Load(HLS.into()));
        bridge.dispatch(UserAction::ToggleLoop);
        bridge.pump();
        assert!(bridge.state().playing);
    }

    #[test]
    fn test_os_pip_close_resyncs() {
        let mut engine = permissive_engine();
        engine
            .expect_poll_events()
            .times(1)
            .returning(|| vec![EngineEvent::PipEnabled, EngineEvent::PipDisabled]);

        let mut bridge = SessionBridge::new(engine);
        bridge.dispatch(UserAction::Load(HLS.into()));
        bridge.dispatch(UserAction::TogglePip);
        assert!(bridge.state().pip);
        assert_eq!(bridge.pump(), 2);
        assert!(!bridge.state().pip);
    }

    #[test]
    fn test_engine_gets_record_settings_before_first_load() {
        let mut engine = MockEngineAdapter::new();
        let mut seq = Sequence::new();
        engine
            .expect_set_volume()
            .with(eq(0.8))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        engine
            .expect_set_muted()
            .with(eq(false))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        engine
            .expect_set_playback_rate()
            .with(eq(1.0))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        engine
            .expect_load()
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        engine
            .expect_play()
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());

        let mut bridge = SessionBridge::new(engine);
        bridge.dispatch(UserAction::Load(HLS.into()));
        assert_eq!(bridge.state().volume, 0.8);
    }
}
