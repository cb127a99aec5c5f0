use eframe::egui;

use crate::error::InputError;
use crate::ops::reducer::UserAction;
use crate::ops::source_input::{parse_source, path_to_file_uri};

const MEDIA_FILTER: &[&str] = &[
    "mp4", "mov", "mkv", "webm", "ogv", "m4v", "avi", "mp3", "wav", "ogg", "flac", "m4a", "opus",
    "aac",
];

/// Free-text source entry. Typing does nothing until the user confirms with
/// Enter or the Load button.
pub struct UrlBar {
    input: String,
    error: Option<InputError>,
}

impl UrlBar {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            input: initial.into(),
            error: None,
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui) -> Option<UserAction> {
        let mut action = None;

        ui.horizontal(|ui| {
            let field = ui.add(
                egui::TextEdit::singleline(&mut self.input)
                    .hint_text("Enter URL or absolute path")
                    .desired_width(320.0),
            );
            if field.changed() {
                self.error = None;
            }
            let submitted = field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            if ui.button("Load").clicked() || submitted {
                action = self.confirm();
            }

            if ui.button("Open file").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Media", MEDIA_FILTER)
                    .pick_file()
                {
                    if let Some(uri) = path_to_file_uri(&path) {
                        self.input = uri;
                        action = self.confirm();
                    }
                }
            }
        });

        if let Some(error) = &self.error {
            let color = ui.visuals().error_fg_color;
            ui.colored_label(color, error.to_string());
        }

        action
    }

    fn confirm(&mut self) -> Option<UserAction> {
        match parse_source(&self.input) {
            Ok(source) => {
                self.error = None;
                Some(UserAction::Load(source))
            }
            Err(e) => {
                tracing::warn!(input = %self.input, error = %e, "Ignoring URL input");
                self.error = Some(e);
                None
            }
        }
    }
}
