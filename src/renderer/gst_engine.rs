use std::collections::VecDeque;
use std::time::{Duration, Instant};

use gstreamer as gst;
use gstreamer_app as gst_app;
use gstreamer_video as gst_video;
use gst_video::prelude::*;
use tracing::{debug, info, warn};

use crate::error::EngineError;
use crate::ops::capability::first_playable;
use crate::renderer::engine::EngineAdapter;
use crate::types::engine_io::EngineEvent;
use crate::types::media_source::MediaSource;
use crate::types::video_frame::VideoFrame;

/// Highest playback rate the pipeline is asked to honour.
pub const MAX_PLAYBACK_RATE: f64 = 8.0;

// GST_FORMAT_PERCENT_MAX
const PERCENT_SCALE: f64 = 1_000_000.0;

#[derive(Debug, Clone, Copy)]
struct EngineSettings {
    volume: f64,
    muted: bool,
    rate: f64,
}

/// Per-load bookkeeping, reset whenever a new source is opened.
#[derive(Debug, Default)]
struct Lifecycle {
    ready: bool,
    started: bool,
    buffering: bool,
    ended: bool,
    want_playing: bool,
    last_duration: Option<f64>,
    last_resolution: Option<(u32, u32)>,
}

/// GStreamer `playbin` behind the engine seam.
///
/// Decoded video lands in an RGBA appsink and is exposed as the newest
/// [`VideoFrame`]. Bus messages are drained on the caller's thread in
/// [`EngineAdapter::poll_events`], so every callback reaches the session in
/// order and on the same thread as user input.
pub struct GstEngine {
    pipeline: Option<gst::Element>,
    appsink: Option<gst_app::AppSink>,
    source_uri: Option<String>,
    settings: EngineSettings,
    lifecycle: Lifecycle,
    pending: VecDeque<EngineEvent>,
    native_controls: bool,
    pip_active: bool,
    fullscreen_requested: bool,
    latest_frame: Option<VideoFrame>,
    frame_counter: u64,
    progress_interval: Duration,
    last_progress: Option<Instant>,
}

impl GstEngine {
    pub fn new(progress_interval: Duration) -> Result<Self, EngineError> {
        gst::init().map_err(|e| EngineError::Other(format!("GStreamer init failed: {}", e)))?;
        Ok(Self {
            pipeline: None,
            appsink: None,
            source_uri: None,
            settings: EngineSettings {
                volume: 1.0,
                muted: false,
                rate: 1.0,
            },
            lifecycle: Lifecycle::default(),
            pending: VecDeque::new(),
            native_controls: true,
            pip_active: false,
            fullscreen_requested: false,
            latest_frame: None,
            frame_counter: 0,
            progress_interval,
            last_progress: None,
        })
    }

    pub fn latest_frame(&self) -> Option<&VideoFrame> {
        self.latest_frame.as_ref()
    }

    pub fn native_controls(&self) -> bool {
        self.native_controls
    }

    pub fn pip_active(&self) -> bool {
        self.pip_active
    }

    pub fn is_buffering(&self) -> bool {
        self.lifecycle.buffering
    }

    /// Called when the PiP window is closed from outside the app.
    pub fn close_pip_window(&mut self) {
        info!("PiP window closed by the window system");
        self.exit_pip();
    }

    /// One-shot: true once per fullscreen request.
    pub fn take_fullscreen_request(&mut self) -> bool {
        std::mem::take(&mut self.fullscreen_requested)
    }

    fn build_pipeline(&mut self) -> Result<(), EngineError> {
        let caps = gst_video::VideoCapsBuilder::new()
            .format(gst_video::VideoFormat::Rgba)
            .build();
        let appsink = gst_app::AppSink::builder()
            .caps(&caps)
            .max_buffers(1)
            .drop(true)
            .build();
        let playbin = gst::ElementFactory::make("playbin")
            .name("playdeck-playbin")
            .property("video-sink", &appsink)
            .build()
            .map_err(|e| EngineError::Other(format!("Failed to create playbin: {}", e)))?;

        playbin.set_property("volume", self.settings.volume);
        playbin.set_property("mute", self.settings.muted);

        debug!(native_controls = self.native_controls, "Pipeline built");
        self.pipeline = Some(playbin);
        self.appsink = Some(appsink);
        Ok(())
    }

    fn ensure_pipeline(&mut self) -> Option<gst::Element> {
        if self.pipeline.is_none() {
            if let Err(e) = self.build_pipeline() {
                self.pending.push_back(EngineEvent::Error(e));
                return None;
            }
        }
        self.pipeline.clone()
    }

    fn set_state(&mut self, state: gst::State) {
        let Some(pipeline) = &self.pipeline else {
            return;
        };
        if let Err(e) = pipeline.set_state(state) {
            warn!(?state, error = %e, "State change refused");
            self.pending.push_back(EngineEvent::Error(EngineError::Other(format!(
                "Failed to change state to {:?}: {}",
                state, e
            ))));
        }
    }

    fn seek_with_rate(&self, position: gst::ClockTime, rate: f64) -> Result<(), EngineError> {
        let Some(pipeline) = &self.pipeline else {
            return Ok(());
        };
        pipeline
            .seek(
                rate,
                gst::SeekFlags::FLUSH | gst::SeekFlags::ACCURATE,
                gst::SeekType::Set,
                position,
                gst::SeekType::None,
                gst::ClockTime::NONE,
            )
            .map_err(|e| EngineError::Other(format!("Seek failed: {}", e)))
    }

    fn drain_bus(&mut self) {
        let Some(bus) = self.pipeline.as_ref().and_then(|p| p.bus()) else {
            return;
        };
        while let Some(msg) = bus.pop() {
            self.handle_message(&msg);
        }
    }

    fn handle_message(&mut self, msg: &gst::Message) {
        use gst::MessageView;

        let from_pipeline = self
            .pipeline
            .as_ref()
            .is_some_and(|p| msg.src() == Some(p.upcast_ref::<gst::Object>()));

        match msg.view() {
            MessageView::Eos(..) => {
                self.lifecycle.ended = true;
                self.pending.push_back(EngineEvent::Ended);
            }
            MessageView::Error(err) => {
                warn!(
                    error = %err.error(),
                    debug = ?err.debug(),
                    "Pipeline error"
                );
                self.pending
                    .push_back(EngineEvent::Error(classify_error(&err.error())));
            }
            MessageView::Warning(w) => {
                warn!(warning = %w.error(), "Pipeline warning");
            }
            MessageView::AsyncDone(..) if !self.lifecycle.ready => {
                self.lifecycle.ready = true;
                self.pending.push_back(EngineEvent::Ready);
                self.report_duration();
                if self.settings.rate != 1.0 {
                    self.apply_rate(self.settings.rate);
                }
            }
            MessageView::DurationChanged(..) => self.report_duration(),
            MessageView::StateChanged(sc) if from_pipeline => {
                if sc.pending() != gst::State::VoidPending || self.lifecycle.buffering {
                    return;
                }
                match (sc.old(), sc.current()) {
                    (_, gst::State::Playing) => {
                        if !self.lifecycle.started {
                            self.lifecycle.started = true;
                            self.pending.push_back(EngineEvent::Start);
                        }
                        self.pending.push_back(EngineEvent::Play);
                    }
                    (gst::State::Playing, gst::State::Paused) => {
                        self.pending.push_back(EngineEvent::Pause);
                    }
                    _ => {}
                }
            }
            MessageView::Buffering(b) => self.on_buffering(b.percent()),
            _ => {}
        }
    }

    fn on_buffering(&mut self, percent: i32) {
        if percent < 100 {
            if !self.lifecycle.buffering {
                debug!(percent, "Buffering");
                self.lifecycle.buffering = true;
                self.pending.push_back(EngineEvent::BufferBegin);
                if self.lifecycle.want_playing {
                    self.set_state(gst::State::Paused);
                }
            }
        } else if self.lifecycle.buffering {
            self.lifecycle.buffering = false;
            self.pending.push_back(EngineEvent::BufferEnd);
            if self.lifecycle.want_playing {
                self.set_state(gst::State::Playing);
            }
        }
    }

    fn report_duration(&mut self) {
        let Some(pipeline) = &self.pipeline else {
            return;
        };
        let Some(duration) = pipeline.query_duration::<gst::ClockTime>() else {
            return;
        };
        let seconds = clock_seconds(duration);
        if self.lifecycle.last_duration != Some(seconds) {
            self.lifecycle.last_duration = Some(seconds);
            self.pending.push_back(EngineEvent::Duration(seconds));
        }
    }

    fn apply_rate(&mut self, rate: f64) {
        let Some(position) = self
            .pipeline
            .as_ref()
            .and_then(|p| p.query_position::<gst::ClockTime>())
        else {
            return;
        };
        match self.seek_with_rate(position, rate) {
            Ok(()) => self.pending.push_back(EngineEvent::PlaybackRateChanged(rate)),
            Err(e) => self.pending.push_back(EngineEvent::Error(e)),
        }
    }

    fn poll_progress(&mut self) {
        if !self.lifecycle.ready {
            return;
        }
        let now = Instant::now();
        if self
            .last_progress
            .is_some_and(|last| now.duration_since(last) < self.progress_interval)
        {
            return;
        }
        self.last_progress = Some(now);

        let Some(pipeline) = &self.pipeline else {
            return;
        };
        let position = pipeline.query_position::<gst::ClockTime>();
        let duration = pipeline.query_duration::<gst::ClockTime>();
        let played = match (position, duration) {
            (Some(position), Some(duration)) if duration.nseconds() > 0 => {
                position.nseconds() as f64 / duration.nseconds() as f64
            }
            _ => 0.0,
        };
        let loaded = self.buffered_fraction(pipeline).unwrap_or(played);
        self.pending.push_back(EngineEvent::Progress { played, loaded });
    }

    fn buffered_fraction(&self, pipeline: &gst::Element) -> Option<f64> {
        if self
            .source_uri
            .as_deref()
            .is_some_and(|uri| uri.starts_with("file://"))
        {
            return Some(1.0);
        }
        let mut query = gst::query::Buffering::new(gst::Format::Percent);
        if !pipeline.query(&mut query) {
            return None;
        }
        let (_, stop, _) = query.range();
        let stop = stop.value();
        if stop < 0 {
            return None;
        }
        Some(stop as f64 / PERCENT_SCALE)
    }

    fn pull_frame(&mut self) {
        let Some(appsink) = &self.appsink else {
            return;
        };
        let mut newest = None;
        while let Some(sample) = appsink.try_pull_sample(gst::ClockTime::ZERO) {
            newest = Some(sample);
        }
        if newest.is_none() && self.latest_frame.is_none() {
            newest = appsink.try_pull_preroll(gst::ClockTime::ZERO);
        }
        let Some(sample) = newest else {
            return;
        };
        match sample_to_frame(&sample, self.frame_counter) {
            Some(frame) => {
                let resolution = (frame.width, frame.height);
                if self.lifecycle.last_resolution != Some(resolution) {
                    self.lifecycle.last_resolution = Some(resolution);
                    self.pending.push_back(EngineEvent::PlaybackQualityChanged {
                        width: frame.width,
                        height: frame.height,
                    });
                }
                self.frame_counter += 1;
                self.latest_frame = Some(frame);
            }
            None => debug!("Dropped a sample without readable video"),
        }
    }
}

impl EngineAdapter for GstEngine {
    fn load(&mut self, source: &MediaSource) {
        let Some(uri) = first_playable(source).map(str::to_string) else {
            return;
        };
        let Some(pipeline) = self.ensure_pipeline() else {
            return;
        };
        info!(%uri, "Loading");

        self.set_state(gst::State::Null);
        pipeline.set_property("uri", uri.as_str());
        self.source_uri = Some(uri);
        self.lifecycle = Lifecycle::default();
        self.latest_frame = None;
        self.last_progress = None;
        self.set_state(gst::State::Paused);
    }

    fn play(&mut self) {
        self.lifecycle.want_playing = true;
        // Like a media element, playing after the end starts over.
        if self.lifecycle.ended {
            self.seek_to(0.0);
        }
        if self.source_uri.is_some() && !self.lifecycle.buffering {
            self.set_state(gst::State::Playing);
        }
    }

    fn pause(&mut self) {
        self.lifecycle.want_playing = false;
        if self.source_uri.is_some() {
            self.set_state(gst::State::Paused);
        }
    }

    fn seek_to(&mut self, fraction: f64) {
        let Some(duration) = self
            .pipeline
            .as_ref()
            .and_then(|p| p.query_duration::<gst::ClockTime>())
        else {
            debug!(fraction, "Seek ignored, duration unknown");
            return;
        };
        let target = gst::ClockTime::from_nseconds((duration.nseconds() as f64 * fraction) as u64);
        self.lifecycle.ended = false;
        match self.seek_with_rate(target, self.settings.rate) {
            Ok(()) => self
                .pending
                .push_back(EngineEvent::Seek(clock_seconds(target))),
            Err(e) => self.pending.push_back(EngineEvent::Error(e)),
        }
    }

    fn set_volume(&mut self, volume: f64) {
        self.settings.volume = volume;
        if let Some(pipeline) = &self.pipeline {
            pipeline.set_property("volume", volume);
        }
    }

    fn set_muted(&mut self, muted: bool) {
        self.settings.muted = muted;
        if let Some(pipeline) = &self.pipeline {
            pipeline.set_property("mute", muted);
        }
    }

    fn set_playback_rate(&mut self, rate: f64) {
        if !(rate > 0.0 && rate <= MAX_PLAYBACK_RATE) {
            warn!(rate, "Unsupported playback rate");
            self.pending
                .push_back(EngineEvent::PlaybackRateChanged(self.settings.rate));
            return;
        }
        self.settings.rate = rate;
        if self.lifecycle.ready {
            self.apply_rate(rate);
        } else {
            self.pending.push_back(EngineEvent::PlaybackRateChanged(rate));
        }
    }

    fn request_fullscreen(&mut self) {
        self.fullscreen_requested = true;
    }

    fn enter_pip(&mut self) {
        if !self.pip_active {
            self.pip_active = true;
            self.pending.push_back(EngineEvent::PipEnabled);
        }
    }

    fn exit_pip(&mut self) {
        if self.pip_active {
            self.pip_active = false;
            self.pending.push_back(EngineEvent::PipDisabled);
        }
    }

    fn destroy(&mut self) {
        if let Some(pipeline) = self.pipeline.take() {
            if let Err(e) = pipeline.set_state(gst::State::Null) {
                warn!(error = %e, "Pipeline refused to shut down");
            }
            info!("Pipeline destroyed");
        }
        self.appsink = None;
        self.source_uri = None;
        self.lifecycle = Lifecycle::default();
        self.latest_frame = None;
        self.exit_pip();
    }

    fn recreate(&mut self, controls: bool) {
        self.native_controls = controls;
        if let Err(e) = self.build_pipeline() {
            self.pending.push_back(EngineEvent::Error(e));
        }
    }

    fn poll_events(&mut self) -> Vec<EngineEvent> {
        self.drain_bus();
        self.pull_frame();
        self.poll_progress();
        self.pending.drain(..).collect()
    }
}

impl Drop for GstEngine {
    fn drop(&mut self) {
        if let Some(pipeline) = &self.pipeline {
            let _ = pipeline.set_state(gst::State::Null);
        }
    }
}

fn clock_seconds(time: gst::ClockTime) -> f64 {
    time.nseconds() as f64 / 1_000_000_000.0
}

fn sample_to_frame(sample: &gst::Sample, frame_number: u64) -> Option<VideoFrame> {
    let info = gst_video::VideoInfo::from_caps(sample.caps()?).ok()?;
    let buffer = sample.buffer()?;
    let frame = gst_video::VideoFrameRef::from_buffer_ref_readable(buffer, &info).ok()?;

    let width = info.width();
    let height = info.height();
    let row_bytes = width as usize * 4;
    let stride = *frame.plane_stride().first()? as usize;
    let plane = frame.plane_data(0).ok()?;

    let mut data = Vec::with_capacity(row_bytes * height as usize);
    for row in plane.chunks(stride).take(height as usize) {
        data.extend_from_slice(row.get(..row_bytes)?);
    }

    Some(VideoFrame {
        data,
        width,
        height,
        timestamp: buffer.pts().map(clock_seconds).unwrap_or_default(),
        frame_number,
    })
}

fn classify_error(err: &gst::glib::Error) -> EngineError {
    let message = err.message().to_string();
    if let Some(kind) = err.kind::<gst::ResourceError>() {
        return match kind {
            gst::ResourceError::NotFound
            | gst::ResourceError::OpenRead
            | gst::ResourceError::OpenReadWrite
            | gst::ResourceError::Read
            | gst::ResourceError::Busy
            | gst::ResourceError::NotAuthorized => EngineError::Network(message),
            _ => EngineError::Other(message),
        };
    }
    if let Some(kind) = err.kind::<gst::StreamError>() {
        return match kind {
            gst::StreamError::CodecNotFound
            | gst::StreamError::TypeNotFound
            | gst::StreamError::WrongType
            | gst::StreamError::Format
            | gst::StreamError::Demux => EngineError::UnsupportedFormat(message),
            _ => EngineError::Decode(message),
        };
    }
    if let Some(gst::CoreError::MissingPlugin) = err.kind::<gst::CoreError>() {
        return EngineError::UnsupportedFormat(message);
    }
    EngineError::Other(message)
}
