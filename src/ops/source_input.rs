use std::path::Path;

use crate::error::InputError;
use crate::types::media_source::MediaSource;

const SUPPORTED_SCHEMES: &[&str] = &["http", "https", "file", "rtsp", "rtsps", "rtmp", "udp"];

/// Turns the confirmed contents of the URL field into a source.
///
/// Several whitespace-separated locators become a multi-source in the order
/// given. An absolute local path is taken whole, spaces included, and
/// converted to a `file://` URI.
pub fn parse_source(input: &str) -> Result<MediaSource, InputError> {
    let trimmed = input.trim();
    if Path::new(trimmed).is_absolute() {
        return parse_locator(trimmed).map(MediaSource::single);
    }
    let locators = trimmed
        .split_whitespace()
        .map(parse_locator)
        .collect::<Result<Vec<_>, _>>()?;
    MediaSource::from_locators(locators).ok_or(InputError::Empty)
}

fn parse_locator(token: &str) -> Result<String, InputError> {
    let path = Path::new(token);
    if path.is_absolute() {
        return path_to_file_uri(path).ok_or_else(|| InputError::InvalidUrl {
            input: token.to_string(),
            reason: "not a valid file path".to_string(),
        });
    }

    let parsed = url::Url::parse(token).map_err(|e| InputError::InvalidUrl {
        input: token.to_string(),
        reason: e.to_string(),
    })?;
    if !SUPPORTED_SCHEMES.contains(&parsed.scheme()) {
        return Err(InputError::UnsupportedScheme(parsed.scheme().to_string()));
    }
    Ok(parsed.to_string())
}

/// `file://` URI for an absolute path, percent-encoded as needed.
pub fn path_to_file_uri(path: &Path) -> Option<String> {
    url::Url::from_file_path(path).ok().map(|uri| uri.to_string())
}
