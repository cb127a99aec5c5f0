use std::time::Duration;

use eframe::egui;

use crate::config::PlayerConfig;
use crate::ops::reducer::UserAction;
use crate::renderer::gst_engine::GstEngine;
use crate::renderer::session_bridge::SessionBridge;
use crate::types::session_state::SessionState;
use crate::ui::controls::{ControlEvent, controls_panel};
use crate::ui::state_table::state_table;
use crate::ui::url_bar::UrlBar;
use crate::ui::video_player::VideoPanel;

// Bus messages are only drained while the UI repaints.
const IDLE_REPAINT: Duration = Duration::from_millis(100);

pub struct PlayerApp {
    bridge: SessionBridge<GstEngine>,
    url_bar: UrlBar,
    video: VideoPanel,
}

impl PlayerApp {
    pub fn new(engine: GstEngine, config: &PlayerConfig) -> Self {
        Self {
            bridge: SessionBridge::new(engine),
            url_bar: UrlBar::new(config.initial_url_input.clone()),
            video: VideoPanel::new(config),
        }
    }

    fn dispatch_all(&mut self, actions: Vec<UserAction>) {
        for action in actions {
            let entering_light =
                matches!(action, UserAction::ToggleLight) && !self.bridge.state().light;
            self.bridge.dispatch(action);
            if entering_light {
                self.video.show_preview();
                let mut follow_up = Vec::new();
                pause_behind_preview(self.bridge.state(), &mut follow_up);
                for action in follow_up {
                    self.bridge.dispatch(action);
                }
            }
        }
    }
}

/// Light mode stands the preview card in for the player, so nothing should be
/// audible behind it.
fn pause_behind_preview(state: &SessionState, actions: &mut Vec<UserAction>) {
    if state.playing {
        actions.push(UserAction::TogglePlayPause);
    }
}

impl eframe::App for PlayerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.bridge.pump();

        let mut actions = Vec::new();

        if let Some(notice) = self.bridge.notice().cloned() {
            egui::TopBottomPanel::top("notice_panel").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let color = ui.visuals().warn_fg_color;
                    ui.colored_label(color, notice.to_string());
                    if ui.small_button("Dismiss").clicked() {
                        self.bridge.dismiss_notice();
                    }
                });
            });
        }

        egui::SidePanel::right("state_panel")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| {
                ui.heading("State");
                ui.separator();
                state_table(ui, self.bridge.state());
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                actions.extend(self.video.show(ui, &mut self.bridge));
                ui.add_space(8.0);

                if let Some(action) = self.url_bar.show(ui) {
                    actions.push(action);
                }
                ui.add_space(8.0);

                for event in controls_panel(ui, self.bridge.state()) {
                    match event {
                        ControlEvent::Action(action) => actions.push(action),
                        ControlEvent::ShowPreview => {
                            self.video.show_preview();
                            pause_behind_preview(self.bridge.state(), &mut actions);
                        }
                    }
                }
            });
        });

        self.dispatch_all(actions);

        if self.bridge.state().playing || self.bridge.state().seeking {
            ctx.request_repaint();
        } else {
            ctx.request_repaint_after(IDLE_REPAINT);
        }
    }
}
