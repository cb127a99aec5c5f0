use eframe::egui;

use crate::ops::capability::can_enable_pip;
use crate::ops::reducer::UserAction;
use crate::types::session_state::SessionState;

/// Upper bound of the seek bar. Seeking to exactly 1.0 would land on the end
/// of the stream and fire `ended`.
pub const SEEK_MAX: f64 = 0.999999;
pub const SPEED_PRESETS: [f64; 3] = [1.0, 1.5, 2.0];

#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    Action(UserAction),
    /// Bring the light-mode preview card back.
    ShowPreview,
}

/// Renders the playback controls and returns what the user did this frame.
pub fn controls_panel(ui: &mut egui::Ui, state: &SessionState) -> Vec<ControlEvent> {
    let mut events = Vec::new();
    let mut show_preview = false;
    let mut act = |action: UserAction| events.push(ControlEvent::Action(action));

    egui::Grid::new("playback_controls")
        .num_columns(2)
        .spacing([12.0, 6.0])
        .striped(true)
        .show(ui, |ui| {
            ui.strong("Controls");
            ui.horizontal(|ui| {
                if ui.button("Stop").clicked() {
                    act(UserAction::Stop);
                }
                if ui
                    .button(if state.playing { "Pause" } else { "Play" })
                    .clicked()
                {
                    act(UserAction::TogglePlayPause);
                }
                if ui.button("Fullscreen").clicked() {
                    act(UserAction::RequestFullscreen);
                }
                if state.light && ui.button("Show preview").clicked() {
                    show_preview = true;
                }
                if can_enable_pip(state.url.as_ref())
                    && ui
                        .button(if state.pip { "Disable PiP" } else { "Enable PiP" })
                        .clicked()
                {
                    act(UserAction::TogglePip);
                }
            });
            ui.end_row();

            ui.strong("Speed");
            ui.horizontal(|ui| {
                for rate in SPEED_PRESETS {
                    if ui
                        .selectable_label(state.playback_rate == rate, format!("{}x", rate))
                        .clicked()
                    {
                        act(UserAction::SetPlaybackRate(rate));
                    }
                }
            });
            ui.end_row();

            ui.strong("Seek");
            let mut played = state.played;
            let response = ui.add(
                egui::Slider::new(&mut played, 0.0..=SEEK_MAX)
                    .show_value(false)
                    .min_decimals(6),
            );
            for action in seek_actions(
                state.seeking,
                response.is_pointer_button_down_on(),
                response.changed(),
                played,
            ) {
                act(action);
            }
            ui.end_row();

            ui.strong("Volume");
            let mut volume = state.volume;
            if ui
                .add(egui::Slider::new(&mut volume, 0.0..=1.0).show_value(false))
                .changed()
            {
                act(UserAction::SetVolume(volume));
            }
            ui.end_row();

            ui.strong("Controls");
            ui.horizontal(|ui| {
                let mut controls = state.controls;
                if ui.checkbox(&mut controls, "").changed() {
                    act(UserAction::ToggleControls);
                }
                ui.label(egui::RichText::new("Requires player reload").italics().weak());
            });
            ui.end_row();

            ui.strong("Muted");
            let mut muted = state.muted;
            if ui.checkbox(&mut muted, "").changed() {
                act(UserAction::ToggleMuted);
            }
            ui.end_row();

            ui.strong("Loop");
            let mut looping = state.looping;
            if ui.checkbox(&mut looping, "").changed() {
                act(UserAction::ToggleLoop);
            }
            ui.end_row();

            ui.strong("Light mode");
            let mut light = state.light;
            if ui.checkbox(&mut light, "").changed() {
                act(UserAction::ToggleLight);
            }
            ui.end_row();

            ui.strong("Played");
            ui.add(egui::ProgressBar::new(state.played as f32).desired_width(240.0));
            ui.end_row();

            ui.strong("Loaded");
            ui.add(egui::ProgressBar::new(state.loaded as f32).desired_width(240.0));
            ui.end_row();
        });

    if show_preview {
        events.push(ControlEvent::ShowPreview);
    }
    events
}

/// Maps the seek bar's pointer state onto the begin/preview/commit sequence.
///
/// Pressing starts a seek, moving updates the preview, and releasing commits.
/// A change with no pointer held (keyboard) does all three at once.
pub fn seek_actions(
    seeking: bool,
    pointer_down: bool,
    changed: bool,
    value: f64,
) -> Vec<UserAction> {
    let mut actions = Vec::new();
    match (seeking, pointer_down) {
        (false, true) => {
            actions.push(UserAction::BeginSeek);
            if changed {
                actions.push(UserAction::UpdateSeekPreview(value));
            }
        }
        (true, true) => {
            if changed {
                actions.push(UserAction::UpdateSeekPreview(value));
            }
        }
        (true, false) => {
            if changed {
                actions.push(UserAction::UpdateSeekPreview(value));
            }
            actions.push(UserAction::CommitSeek(value));
        }
        (false, false) => {
            if changed {
                actions.push(UserAction::BeginSeek);
                actions.push(UserAction::UpdateSeekPreview(value));
                actions.push(UserAction::CommitSeek(value));
            }
        }
    }
    actions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_sequence() {
        assert_eq!(
            seek_actions(false, true, false, 0.2),
            vec![UserAction::BeginSeek]
        );
        assert_eq!(
            seek_actions(true, true, true, 0.3),
            vec![UserAction::UpdateSeekPreview(0.3)]
        );
        assert!(seek_actions(true, true, false, 0.3).is_empty());
        assert_eq!(
            seek_actions(true, false, false, 0.3),
            vec![UserAction::CommitSeek(0.3)]
        );
    }

    #[test]
    fn test_keyboard_change_commits_immediately() {
        assert_eq!(
            seek_actions(false, false, true, 0.6),
            vec![
                UserAction::BeginSeek,
                UserAction::UpdateSeekPreview(0.6),
                UserAction::CommitSeek(0.6),
            ]
        );
        assert!(seek_actions(false, false, false, 0.6).is_empty());
    }
}
