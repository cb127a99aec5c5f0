//! Routes user actions and engine callbacks through the transitions and works
//! out which engine commands each step implies.

use crate::ops::capability::can_enable_pip;
use crate::ops::transitions::{self, clamp_fraction};
use crate::types::engine_io::{EngineCommand, EngineEvent};
use crate::types::media_source::MediaSource;
use crate::types::session_state::SessionState;

/// Everything the user can do to a session.
#[derive(Debug, Clone, PartialEq)]
pub enum UserAction {
    Load(MediaSource),
    TogglePlayPause,
    Stop,
    ToggleControls,
    ToggleLight,
    ToggleLoop,
    ToggleMuted,
    TogglePip,
    SetVolume(f64),
    SetPlaybackRate(f64),
    BeginSeek,
    UpdateSeekPreview(f64),
    CommitSeek(f64),
    RequestFullscreen,
}

/// The outcome of one transition: the replacement record and the commands to
/// send the engine, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub state: SessionState,
    pub commands: Vec<EngineCommand>,
}

impl Step {
    fn quiet(state: SessionState) -> Self {
        Step {
            state,
            commands: Vec::new(),
        }
    }
}

pub fn apply_action(state: &SessionState, action: UserAction) -> Step {
    match action {
        UserAction::Load(url) => {
            let next = transitions::load(state, url.clone());
            let mut commands = Vec::new();
            // Reloading the same url still has to reach the engine, e.g. to retry after an error.
            if state.url == next.url {
                commands.push(EngineCommand::Load(url));
                if next.playing {
                    commands.push(EngineCommand::Play);
                }
            }
            commands.extend(sync_commands(state, &next));
            Step {
                state: next,
                commands,
            }
        }
        UserAction::TogglePlayPause => synced(state, transitions::toggle_play_pause(state)),
        UserAction::Stop => synced(state, transitions::stop(state)),
        UserAction::ToggleControls => {
            let next = transitions::toggle_controls(state);
            let mut commands = vec![
                EngineCommand::Destroy,
                EngineCommand::Recreate {
                    controls: next.controls,
                },
            ];
            if let Some(url) = &next.url {
                commands.push(EngineCommand::Load(url.clone()));
                if next.playing {
                    commands.push(EngineCommand::Play);
                }
            }
            Step {
                state: next,
                commands,
            }
        }
        UserAction::ToggleLight => Step::quiet(transitions::toggle_light(state)),
        UserAction::ToggleLoop => Step::quiet(transitions::toggle_loop(state)),
        UserAction::ToggleMuted => synced(state, transitions::toggle_muted(state)),
        UserAction::TogglePip => synced(state, transitions::toggle_pip(state)),
        UserAction::SetVolume(volume) => synced(state, transitions::set_volume(state, volume)),
        UserAction::SetPlaybackRate(rate) => {
            synced(state, transitions::set_playback_rate(state, rate))
        }
        UserAction::BeginSeek => Step::quiet(transitions::begin_seek(state)),
        UserAction::UpdateSeekPreview(fraction) => {
            Step::quiet(transitions::update_seek_preview(state, fraction))
        }
        UserAction::CommitSeek(fraction) => {
            let next = transitions::commit_seek(state);
            let commands = if next.has_media() {
                vec![EngineCommand::SeekTo(clamp_fraction(fraction))]
            } else {
                Vec::new()
            };
            Step {
                state: next,
                commands,
            }
        }
        UserAction::RequestFullscreen => {
            let commands = if state.has_media() {
                vec![EngineCommand::RequestFullscreen]
            } else {
                Vec::new()
            };
            Step {
                state: state.clone(),
                commands,
            }
        }
    }
}

/// Reconciles an engine callback. Callbacks never echo commands back, except
/// that reaching the end with looping on restarts from the top.
pub fn apply_event(state: &SessionState, event: &EngineEvent) -> Step {
    match event {
        EngineEvent::Progress { played, loaded } => {
            Step::quiet(transitions::on_engine_progress(state, *played, *loaded))
        }
        EngineEvent::Duration(duration) => {
            Step::quiet(transitions::on_engine_duration(state, *duration))
        }
        EngineEvent::Ended => {
            let next = transitions::on_engine_ended(state);
            let commands = if next.looping && next.has_media() {
                vec![EngineCommand::SeekTo(0.0), EngineCommand::Play]
            } else {
                Vec::new()
            };
            Step {
                state: next,
                commands,
            }
        }
        EngineEvent::PipEnabled => Step::quiet(transitions::on_engine_pip_change(state, true)),
        EngineEvent::PipDisabled => Step::quiet(transitions::on_engine_pip_change(state, false)),
        EngineEvent::Play => Step::quiet(transitions::on_engine_play(state)),
        EngineEvent::Pause => Step::quiet(transitions::on_engine_pause(state)),
        EngineEvent::PlaybackRateChanged(rate) => {
            Step::quiet(transitions::on_engine_rate_changed(state, *rate))
        }
        EngineEvent::Ready
        | EngineEvent::Start
        | EngineEvent::BufferBegin
        | EngineEvent::BufferEnd
        | EngineEvent::Seek(_)
        | EngineEvent::Error(_)
        | EngineEvent::PlaybackQualityChanged { .. } => Step::quiet(state.clone()),
    }
}

fn synced(prev: &SessionState, next: SessionState) -> Step {
    let commands = sync_commands(prev, &next);
    Step {
        state: next,
        commands,
    }
}

/// Commands that push a record's volume, mute and rate to an engine that has
/// not seen them yet, such as one just handed to a new session.
pub fn settings_commands(state: &SessionState) -> Vec<EngineCommand> {
    vec![
        EngineCommand::SetVolume(state.volume),
        EngineCommand::SetMuted(state.muted),
        EngineCommand::SetPlaybackRate(state.playback_rate),
    ]
}

/// Commands that bring the engine in line with the fields that differ
/// between two records.
pub fn sync_commands(prev: &SessionState, next: &SessionState) -> Vec<EngineCommand> {
    let mut commands = Vec::new();

    if prev.url != next.url {
        match &next.url {
            Some(url) => {
                commands.push(EngineCommand::Load(url.clone()));
                if next.playing {
                    commands.push(EngineCommand::Play);
                }
            }
            None => commands.push(EngineCommand::Destroy),
        }
    } else if prev.playing != next.playing && next.has_media() {
        commands.push(if next.playing {
            EngineCommand::Play
        } else {
            EngineCommand::Pause
        });
    }

    if prev.volume != next.volume {
        commands.push(EngineCommand::SetVolume(next.volume));
    }
    if prev.muted != next.muted {
        commands.push(EngineCommand::SetMuted(next.muted));
    }
    if prev.playback_rate != next.playback_rate {
        commands.push(EngineCommand::SetPlaybackRate(next.playback_rate));
    }
    if prev.pip != next.pip {
        if !next.pip {
            commands.push(EngineCommand::ExitPip);
        } else if can_enable_pip(next.url.as_ref()) {
            commands.push(EngineCommand::EnterPip);
        }
    }

    commands
}
