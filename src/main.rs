use std::time::Duration;

use playdeck::config::PlayerConfig;
use playdeck::renderer::gst_engine::GstEngine;
use playdeck::ui::app::PlayerApp;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> eframe::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "playdeck=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = PlayerConfig::load_or_default();
    tracing::info!(?config, "Starting playdeck");

    let engine = match GstEngine::new(Duration::from_millis(config.progress_interval_ms)) {
        Ok(engine) => engine,
        Err(e) => {
            tracing::error!(error = %e, "Could not start the playback engine");
            std::process::exit(1);
        }
    };
    let app = PlayerApp::new(engine, &config);

    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title(config.window_title.clone())
            .with_inner_size([1100.0, 720.0]),
        ..Default::default()
    };
    eframe::run_native(
        &config.window_title,
        native_options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
}
