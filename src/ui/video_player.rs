use std::time::Duration;

use eframe::egui;
use egui::load::SizedTexture;

use crate::config::PlayerConfig;
use crate::ops::capability::first_playable;
use crate::ops::reducer::UserAction;
use crate::ops::time_format::format_duration;
use crate::renderer::gst_engine::GstEngine;
use crate::renderer::preview::{PreviewProber, ProbeStatus};
use crate::renderer::session_bridge::SessionBridge;
use crate::types::session_state::SessionState;

const OVERLAY_HEIGHT: f32 = 28.0;

/// The rendering surface: video texture, light-mode preview card, native
/// overlay controls and the picture-in-picture window.
pub struct VideoPanel {
    texture: Option<egui::TextureHandle>,
    last_frame_number: Option<u64>,
    preview_dismissed: bool,
    prober: PreviewProber,
    pip_size: [f32; 2],
}

impl VideoPanel {
    pub fn new(config: &PlayerConfig) -> Self {
        Self {
            texture: None,
            last_frame_number: None,
            preview_dismissed: false,
            prober: PreviewProber::new(
                config.probe_cache_capacity,
                Duration::from_secs(config.probe_timeout_secs),
            ),
            pip_size: config.pip_window_size,
        }
    }

    /// Brings the preview card back in light mode.
    pub fn show_preview(&mut self) {
        self.preview_dismissed = false;
    }

    /// Whether the preview card currently stands in for the video.
    pub fn preview_visible(&self, state: &SessionState) -> bool {
        state.light && !self.preview_dismissed
    }

    /// Upload the engine's newest frame if it changed since the last call.
    fn update_texture(&mut self, ctx: &egui::Context, engine: &GstEngine) {
        let Some(frame) = engine.latest_frame() else {
            self.texture = None;
            self.last_frame_number = None;
            return;
        };
        if self.last_frame_number == Some(frame.frame_number) {
            return;
        }
        let image = egui::ColorImage::from_rgba_unmultiplied(frame.size(), &frame.data);
        match &mut self.texture {
            Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.texture =
                    Some(ctx.load_texture("playdeck_frame", image, egui::TextureOptions::LINEAR))
            }
        }
        self.last_frame_number = Some(frame.frame_number);
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        bridge: &mut SessionBridge<GstEngine>,
    ) -> Vec<UserAction> {
        let ctx = ui.ctx().clone();
        let mut actions = Vec::new();
        let state = bridge.state().clone();

        if !state.light {
            self.preview_dismissed = false;
        }
        self.update_texture(&ctx, bridge.engine());

        if bridge.engine_mut().take_fullscreen_request() {
            ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(true));
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Escape) && i.viewport().fullscreen == Some(true))
        {
            ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(false));
        }

        let width = ui.available_width();
        let aspect = bridge
            .engine()
            .latest_frame()
            .map(|frame| frame.aspect_ratio())
            .unwrap_or(16.0 / 9.0);
        let size = egui::vec2(width, width / aspect);

        if self.preview_visible(&state) {
            if self.preview_card(ui, &state, size) {
                self.preview_dismissed = true;
                actions.extend(card_click_action(&state));
            }
        } else if bridge.engine().pip_active() {
            placeholder(ui, size, "Playing in picture-in-picture");
            if self.pip_window(&ctx) {
                bridge.engine_mut().close_pip_window();
            }
        } else if let Some(texture) = &self.texture {
            let response = ui.add(
                egui::Image::from_texture(SizedTexture::from_handle(texture))
                    .fit_to_exact_size(size)
                    .sense(egui::Sense::click()),
            );
            if bridge.engine().is_buffering() {
                ui.painter().text(
                    response.rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "Buffering",
                    egui::FontId::proportional(18.0),
                    egui::Color32::WHITE,
                );
            }
            if bridge.engine().native_controls() && response.hovered() {
                if let Some(action) = overlay_controls(ui, response.rect, &state) {
                    actions.push(action);
                }
            }
        } else if state.url.is_some() {
            placeholder(ui, size, "No video");
        } else {
            placeholder(ui, size, "No media loaded");
        }

        actions
    }

    /// Draws the light-mode card. Returns true when it was clicked.
    fn preview_card(&mut self, ui: &mut egui::Ui, state: &SessionState, size: egui::Vec2) -> bool {
        let mut lines = Vec::new();
        if let Some(locator) = state.url.as_ref().and_then(first_playable) {
            match self.prober.status(locator) {
                Some(ProbeStatus::Ready(info)) => {
                    lines.push(info.title.clone().unwrap_or_else(|| locator.to_string()));
                    if let Some(duration) = info.duration {
                        lines.push(format_duration(duration));
                    }
                    if let Some((w, h)) = info.resolution {
                        lines.push(format!("{}x{}", w, h));
                    } else if !info.has_video {
                        lines.push("Audio".to_string());
                    }
                }
                Some(ProbeStatus::Failed(_)) => lines.push(locator.to_string()),
                Some(ProbeStatus::Pending) | None => lines.push("Loading preview".to_string()),
            }
        }
        if !state.has_media() {
            lines.push("No media loaded".to_string());
            return ui
                .add_enabled(false, egui::Button::new(lines.join("\n")).min_size(size))
                .clicked();
        }
        lines.push("Click to play".to_string());

        ui.add(egui::Button::new(lines.join("\n")).min_size(size))
            .clicked()
    }

    /// Runs the always-on-top PiP viewport for this frame. Returns true if the
    /// window system asked to close it.
    fn pip_window(&self, ctx: &egui::Context) -> bool {
        let texture = self.texture.as_ref();
        ctx.show_viewport_immediate(
            egui::ViewportId::from_hash_of("playdeck_pip"),
            egui::ViewportBuilder::default()
                .with_title("Picture-in-picture")
                .with_inner_size(self.pip_size)
                .with_always_on_top(),
            |ctx, _class| {
                egui::CentralPanel::default()
                    .frame(egui::Frame::default().fill(egui::Color32::BLACK))
                    .show(ctx, |ui| {
                        if let Some(texture) = texture {
                            ui.add(
                                egui::Image::from_texture(SizedTexture::from_handle(texture))
                                    .fit_to_exact_size(ui.available_size()),
                            );
                        }
                    });
                ctx.input(|i| i.viewport().close_requested())
            },
        )
    }
}

/// Clicking the light-mode card starts playback of the loaded media. With
/// nothing loaded there is nothing to start.
fn card_click_action(state: &SessionState) -> Option<UserAction> {
    (state.has_media() && !state.playing).then_some(UserAction::TogglePlayPause)
}

fn placeholder(ui: &mut egui::Ui, size: egui::Vec2, text: &str) {
    let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
    ui.painter().rect_filled(rect, 0.0, egui::Color32::BLACK);
    ui.painter().text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        text,
        egui::FontId::proportional(16.0),
        egui::Color32::GRAY,
    );
}

/// Native controls drawn over the bottom of the video while hovered.
fn overlay_controls(
    ui: &mut egui::Ui,
    video_rect: egui::Rect,
    state: &SessionState,
) -> Option<UserAction> {
    let strip = egui::Rect::from_min_max(
        egui::pos2(video_rect.left(), video_rect.bottom() - OVERLAY_HEIGHT),
        video_rect.right_bottom(),
    );
    ui.painter()
        .rect_filled(strip, 0.0, egui::Color32::from_black_alpha(160));

    let progress = egui::Rect::from_min_max(
        egui::pos2(strip.left(), strip.top()),
        egui::pos2(
            strip.left() + strip.width() * state.played as f32,
            strip.top() + 3.0,
        ),
    );
    ui.painter()
        .rect_filled(progress, 0.0, ui.visuals().selection.bg_fill);

    let button_rect = egui::Rect::from_min_size(
        strip.left_top() + egui::vec2(4.0, 5.0),
        egui::vec2(56.0, OVERLAY_HEIGHT - 8.0),
    );
    let label = if state.playing { "Pause" } else { "Play" };
    let clicked = ui.put(button_rect, egui::Button::new(label)).clicked();

    ui.painter().text(
        strip.right_center() - egui::vec2(8.0, -2.0),
        egui::Align2::RIGHT_CENTER,
        format!(
            "{} / {}",
            format_duration(state.elapsed()),
            format_duration(state.duration)
        ),
        egui::FontId::monospace(12.0),
        egui::Color32::WHITE,
    );

    clicked.then_some(UserAction::TogglePlayPause)
}
