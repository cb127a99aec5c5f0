//! Metadata for the light-mode preview card.

use std::num::NonZeroUsize;

use lru::LruCache;

#[derive(Debug, Clone, PartialEq)]
pub struct PreviewInfo {
    pub title: Option<String>,
    pub duration: Option<f64>,
    pub has_video: bool,
    pub resolution: Option<(u32, u32)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProbeStatus {
    Pending,
    Ready(PreviewInfo),
    Failed(String),
}

/// Probe results keyed by locator, bounded to the most recently used entries.
pub struct ProbeCache {
    entries: LruCache<String, ProbeStatus>,
}

impl ProbeCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
        }
    }

    pub fn get(&mut self, locator: &str) -> Option<&ProbeStatus> {
        self.entries.get(locator)
    }

    /// Marks a locator as being probed. Returns false if it is already known,
    /// in which case no new probe should start.
    pub fn begin(&mut self, locator: &str) -> bool {
        if self.entries.contains(locator) {
            return false;
        }
        self.entries.put(locator.to_string(), ProbeStatus::Pending);
        true
    }

    pub fn complete(&mut self, locator: String, result: Result<PreviewInfo, String>) {
        let status = match result {
            Ok(info) => ProbeStatus::Ready(info),
            Err(reason) => ProbeStatus::Failed(reason),
        };
        self.entries.put(locator, status);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(feature = "gst")]
pub use prober::PreviewProber;

#[cfg(feature = "gst")]
mod prober {
    use std::sync::mpsc::{Receiver, Sender, channel};
    use std::time::Duration;

    use gstreamer as gst;
    use gstreamer_pbutils as gst_pbutils;

    use super::{PreviewInfo, ProbeCache, ProbeStatus};

    type ProbeResult = (String, Result<PreviewInfo, String>);

    /// Probes locators on background threads with the GStreamer discoverer so
    /// the UI never blocks on a slow network resource.
    pub struct PreviewProber {
        cache: ProbeCache,
        timeout: Duration,
        results_tx: Sender<ProbeResult>,
        results_rx: Receiver<ProbeResult>,
    }

    impl PreviewProber {
        pub fn new(capacity: usize, timeout: Duration) -> Self {
            let (results_tx, results_rx) = channel();
            Self {
                cache: ProbeCache::new(capacity),
                timeout,
                results_tx,
                results_rx,
            }
        }

        /// Current status for a locator, starting a probe on first request.
        pub fn status(&mut self, locator: &str) -> Option<&ProbeStatus> {
            self.collect();
            if self.cache.begin(locator) {
                self.spawn_probe(locator.to_string());
            }
            self.cache.get(locator)
        }

        fn collect(&mut self) {
            while let Ok((locator, result)) = self.results_rx.try_recv() {
                self.cache.complete(locator, result);
            }
        }

        fn spawn_probe(&self, locator: String) {
            let tx = self.results_tx.clone();
            let timeout = self.timeout;
            std::thread::spawn(move || {
                let result = discover(&locator, timeout);
                if let Err(reason) = &result {
                    tracing::warn!(%locator, %reason, "Preview probe failed");
                }
                // The receiver is gone when the window closed mid-probe.
                let _ = tx.send((locator, result));
            });
        }
    }

    fn discover(locator: &str, timeout: Duration) -> Result<PreviewInfo, String> {
        gst::init().map_err(|e| e.to_string())?;
        let discoverer =
            gst_pbutils::Discoverer::new(gst::ClockTime::from_nseconds(timeout.as_nanos() as u64))
                .map_err(|e| e.to_string())?;
        let info = discoverer.discover_uri(locator).map_err(|e| e.to_string())?;

        let video = info.video_streams();
        let resolution = video.first().map(|stream| (stream.width(), stream.height()));
        let title = info
            .tags()
            .and_then(|tags| tags.get::<gst::tags::Title>().map(|t| t.get().to_string()));
        let duration = info
            .duration()
            .map(|d| d.nseconds() as f64 / 1_000_000_000.0);

        tracing::debug!(%locator, ?duration, ?resolution, "Probed preview");
        Ok(PreviewInfo {
            title,
            duration,
            has_video: !video.is_empty(),
            resolution,
        })
    }
}
