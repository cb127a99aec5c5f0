use eframe::egui;
use egui_extras::{Column, TableBuilder};

use crate::ops::time_format::{format_duration, iso_duration};
use crate::types::session_state::SessionState;

/// Read-only dump of the session record.
pub fn state_table(ui: &mut egui::Ui, state: &SessionState) {
    let url = state
        .url
        .as_ref()
        .map(|source| source.to_string())
        .unwrap_or_else(|| "null".to_string());

    let rows: [(&str, String, Option<String>); 9] = [
        ("url", url, None),
        ("playing", state.playing.to_string(), None),
        ("volume", format!("{:.3}", state.volume), None),
        ("speed", state.playback_rate.to_string(), None),
        ("played", format!("{:.3}", state.played), None),
        ("loaded", format!("{:.3}", state.loaded), None),
        (
            "duration",
            format_duration(state.duration),
            Some(iso_duration(state.duration)),
        ),
        (
            "elapsed",
            format_duration(state.elapsed()),
            Some(iso_duration(state.elapsed())),
        ),
        (
            "remaining",
            format_duration(state.remaining()),
            Some(iso_duration(state.remaining())),
        ),
    ];

    TableBuilder::new(ui)
        .id_salt("session_state")
        .striped(true)
        .column(Column::exact(90.0))
        .column(Column::remainder().clip(true))
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("State");
            });
            header.col(|ui| {
                ui.strong("Value");
            });
        })
        .body(|mut body| {
            for (name, value, hover) in rows {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.label(name);
                    });
                    row.col(|ui| {
                        let response = ui.monospace(value);
                        if let Some(hover) = hover {
                            response.on_hover_text(hover);
                        }
                    });
                });
            }
        });
}
