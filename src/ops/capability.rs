//! Capability predicates over locators. They only look at the url value and
//! never touch a live session, so the UI can ask them every frame.

use crate::types::media_source::MediaSource;

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "ogg", "ogv", "webm", "mov", "m4v", "mkv", "avi"];
const AUDIO_EXTENSIONS: &[&str] = &[
    "m4a", "m4b", "mp4a", "mpga", "mp2", "mp2a", "mp3", "m2a", "m3a", "wav", "weba", "aac",
    "oga", "spx", "flac", "opus",
];
const STREAM_EXTENSIONS: &[&str] = &["m3u8", "mpd", "flv"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Audio,
    /// Adaptive or container streams (HLS, DASH, FLV); assumed to carry video.
    Stream,
    Unknown,
}

/// Lower-cased extension of the locator's last path segment, ignoring any
/// query string or fragment.
fn extension(locator: &str) -> Option<String> {
    let path = match url::Url::parse(locator) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => locator
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };
    let segment = path.rsplit(['/', '\\']).next()?;
    let (_, ext) = segment.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

pub fn media_kind(locator: &str) -> MediaKind {
    let Some(ext) = extension(locator) else {
        return MediaKind::Unknown;
    };
    let ext = ext.as_str();
    if VIDEO_EXTENSIONS.contains(&ext) {
        MediaKind::Video
    } else if AUDIO_EXTENSIONS.contains(&ext) {
        MediaKind::Audio
    } else if STREAM_EXTENSIONS.contains(&ext) {
        MediaKind::Stream
    } else {
        MediaKind::Unknown
    }
}

pub fn can_play(locator: &str) -> bool {
    media_kind(locator) != MediaKind::Unknown
}

/// The locator the engine should open: the first one it can play, falling
/// back to the first entry so unknown extensions still get a try.
pub fn first_playable(source: &MediaSource) -> Option<&str> {
    let locators = source.locators();
    locators
        .iter()
        .find(|locator| can_play(locator))
        .or_else(|| locators.first())
        .map(String::as_str)
}

/// Whether picture-in-picture can be offered for this url. Audio-only and
/// unrecognised resources cannot float a video window.
pub fn can_enable_pip(url: Option<&MediaSource>) -> bool {
    let Some(source) = url else {
        return false;
    };
    source
        .locators()
        .iter()
        .find(|locator| can_play(locator))
        .is_some_and(|locator| matches!(media_kind(locator), MediaKind::Video | MediaKind::Stream))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_kind() {
        assert_eq!(media_kind("https://example/a.m3u8"), MediaKind::Stream);
        assert_eq!(media_kind("https://example/a.M3U8?token=1"), MediaKind::Stream);
        assert_eq!(media_kind("file:///home/me/clip.mkv"), MediaKind::Video);
        assert_eq!(media_kind("/music/song.mp3"), MediaKind::Audio);
        assert_eq!(media_kind("https://example/watch"), MediaKind::Unknown);
        assert_eq!(media_kind("https://example.com/"), MediaKind::Unknown);
    }

    #[test]
    fn test_pip_capability() {
        assert!(!can_enable_pip(None));
        assert!(can_enable_pip(Some(&MediaSource::single("https://example/a.mp4"))));
        assert!(can_enable_pip(Some(&MediaSource::single("https://example/a.m3u8"))));
        assert!(!can_enable_pip(Some(&MediaSource::single("https://example/a.mp3"))));
        assert!(!can_enable_pip(Some(&MediaSource::single("https://example/page"))));
    }

    #[test]
    fn test_pip_uses_first_playable_of_multi() {
        let source = MediaSource::Multi(vec![
            "https://example/page".to_string(),
            "https://example/a.webm".to_string(),
        ]);
        assert!(can_enable_pip(Some(&source)));
        assert_eq!(first_playable(&source), Some("https://example/a.webm"));
    }

    #[test]
    fn test_first_playable_falls_back() {
        let source = MediaSource::single("rtsp://camera/live");
        assert_eq!(first_playable(&source), Some("rtsp://camera/live"));
    }
}
