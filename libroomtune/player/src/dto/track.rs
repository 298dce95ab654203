use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Where the audio payload of a track can be streamed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioSource {
    Remote(String),
    File(PathBuf),
}

impl fmt::Display for AudioSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(url) => f.write_str(url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub title: String,
    pub url: String,
    pub duration: Option<Duration>,
    pub thumbnail: Option<String>,
    pub source: AudioSource,
}

impl Track {
    pub fn new(title: impl Into<String>, url: impl Into<String>, source: AudioSource) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            duration: None,
            thumbnail: None,
            source,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }

    /// `m:ss`, or `h:mm:ss` for anything an hour or longer. Streams without a known length are
    /// shown as `live`.
    pub fn formatted_duration(&self) -> String {
        let Some(duration) = self.duration else {
            return "live".to_owned();
        };
        let total = duration.as_secs();
        let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
        if hours > 0 {
            format!("{hours}:{minutes:02}:{seconds:02}")
        } else {
            format!("{minutes}:{seconds:02}")
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.title, self.formatted_duration())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rstest::rstest;

    use super::{AudioSource, Track};

    #[rstest(
        secs,
        expected,
        case(Some(0), "0:00"),
        case(Some(59), "0:59"),
        case(Some(61), "1:01"),
        case(Some(3600), "1:00:00"),
        case(Some(3725), "1:02:05"),
        case(None, "live")
    )]
    fn test_formatted_duration(secs: Option<u64>, expected: &str) {
        let mut track = Track::new("title", "url", AudioSource::Remote("url".to_owned()));
        track.duration = secs.map(Duration::from_secs);
        assert_eq!(expected, track.formatted_duration());
    }
}
