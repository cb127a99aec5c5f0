use std::fmt;

/// A loadable media resource: one locator, or an ordered list of alternatives
/// where the engine plays the first one it can handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    Single(String),
    Multi(Vec<String>),
}

impl MediaSource {
    pub fn single(locator: impl Into<String>) -> Self {
        MediaSource::Single(locator.into())
    }

    /// Builds a source from a list of locators. A one-element list collapses
    /// to `Single`; an empty list yields `None`.
    pub fn from_locators(mut locators: Vec<String>) -> Option<Self> {
        match locators.len() {
            0 => None,
            1 => locators.pop().map(MediaSource::Single),
            _ => Some(MediaSource::Multi(locators)),
        }
    }

    pub fn locators(&self) -> &[String] {
        match self {
            MediaSource::Single(locator) => std::slice::from_ref(locator),
            MediaSource::Multi(locators) => locators,
        }
    }

    pub fn is_multi(&self) -> bool {
        matches!(self, MediaSource::Multi(_))
    }
}

impl fmt::Display for MediaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaSource::Single(locator) => f.write_str(locator),
            MediaSource::Multi(_) => f.write_str("Multiple"),
        }
    }
}

impl From<&str> for MediaSource {
    fn from(locator: &str) -> Self {
        MediaSource::Single(locator.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_locators_collapses_single() {
        let source = MediaSource::from_locators(vec!["https://a/x.mp4".to_string()]);
        assert_eq!(source, Some(MediaSource::single("https://a/x.mp4")));
        assert!(MediaSource::from_locators(Vec::new()).is_none());
    }

    #[test]
    fn test_display_multi() {
        let source = MediaSource::Multi(vec!["a.mp4".into(), "a.webm".into()]);
        assert_eq!(source.to_string(), "Multiple");
        assert_eq!(source.locators().len(), 2);
        assert_eq!(MediaSource::from("b.mp4").to_string(), "b.mp4");
    }
}
