use std::env;
use std::time::Duration;

use async_trait::async_trait;
use eyre::{Context, Result};
use lazy_regex::regex_is_match;
use serde_json::Value;
use tap::TapFallible;
use tracing::{error, info, warn};
use which::which;
use youtube_dl::{SingleVideo, YoutubeDl, YoutubeDlOutput};

use crate::dto::track::{AudioSource, Track};
use crate::source::{SourceError, TrackSource};

const AUDIO_FORMAT: &str = "bestaudio/best";

fn find_exe(env_var: &str, exe_name: &str) -> Result<String> {
    let path =
        env::var(env_var).or_else(|_| which(exe_name).map(|p| p.to_string_lossy().to_string()))?;

    info!("Using {exe_name} path: {path:?}");
    Ok(path)
}

fn is_link(query: &str) -> bool {
    query.starts_with("http")
}

fn is_valid_url(query: &str) -> bool {
    regex_is_match!(r"^https?://[^\s/$.?#][^\s]*$"i, query)
}

/// Resolves links and search terms with yt-dlp. Links are looked up directly, anything else is
/// searched for and the first hit is used.
#[derive(Clone, Debug, Default)]
pub struct YtDlpSource {
    yt_dlp_path: Option<String>,
}

impl YtDlpSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            yt_dlp_path: Some(path.into()),
        }
    }

    fn ytdl_exe(&self) -> Result<String> {
        match &self.yt_dlp_path {
            Some(path) => Ok(path.clone()),
            None => find_exe("YT_DLP_PATH", "yt-dlp")
                .tap_err(|e| error!("yt-dlp path not found: {e:?}")),
        }
    }

    async fn run(&self, target: &str) -> Result<YoutubeDlOutput> {
        info!("extracting metadata for {target:?} - this may take a few seconds");
        let output = YoutubeDl::new(target)
            .youtube_dl_path(self.ytdl_exe()?)
            .format(AUDIO_FORMAT)
            .extract_audio(true)
            .run_async()
            .await
            .wrap_err("error running yt-dlp")?;
        info!("metadata extraction complete");
        Ok(output)
    }

    async fn resolve_link(&self, url: &str) -> Result<Track, SourceError> {
        if !is_valid_url(url) {
            return Err(SourceError::InvalidReference(url.to_owned()));
        }
        let output = self.run(url).await.map_err(|e| {
            warn!("Unable to resolve {url}: {e:?}");
            SourceError::InvalidReference(url.to_owned())
        })?;
        let video =
            first_video(output).ok_or_else(|| SourceError::InvalidReference(url.to_owned()))?;
        video_to_track(&video, url)
    }

    async fn search(&self, query: &str) -> Result<Track, SourceError> {
        let output = self
            .run(&format!("ytsearch1:{query}"))
            .await
            .map_err(|e| SourceError::Download(format!("{e:#}")))?;
        let video =
            first_video(output).ok_or_else(|| SourceError::NoResultsFound(query.to_owned()))?;
        video_to_track(&video, query)
    }
}

#[async_trait]
impl TrackSource for YtDlpSource {
    async fn resolve(&self, query: &str) -> Result<Track, SourceError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SourceError::NoResultsFound(query.to_owned()));
        }
        if is_link(query) {
            self.resolve_link(query).await
        } else {
            self.search(query).await
        }
    }
}

fn first_video(output: YoutubeDlOutput) -> Option<SingleVideo> {
    match output {
        YoutubeDlOutput::SingleVideo(video) => Some(*video),
        YoutubeDlOutput::Playlist(playlist) => {
            info!("found playlist: {:?}, using first entry", playlist.title);
            playlist.entries.unwrap_or_default().into_iter().next()
        }
    }
}

fn video_to_track(video: &SingleVideo, query: &str) -> Result<Track, SourceError> {
    // Read the fields back out of yt-dlp's json so the keys match what the tool prints
    let info = serde_json::to_value(video).map_err(|e| SourceError::Download(e.to_string()))?;
    track_from_info(&info, query)
}

fn str_field(info: &Value, key: &str) -> Option<String> {
    info.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

fn is_audio_only(format: &Value) -> bool {
    format.get("vcodec").and_then(Value::as_str) == Some("none")
        && format.get("acodec").and_then(Value::as_str) != Some("none")
}

fn audio_url(info: &Value) -> Option<String> {
    let best_format = info
        .get("formats")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter(|f| is_audio_only(f) && str_field(f, "url").is_some())
        .max_by(|a, b| {
            let abr = |f: &Value| f.get("abr").and_then(Value::as_f64).unwrap_or_default();
            abr(a).total_cmp(&abr(b))
        })
        .and_then(|f| str_field(f, "url"));

    // The top level url is the format chosen by yt-dlp itself
    str_field(info, "url").or(best_format)
}

pub(crate) fn track_from_info(info: &Value, query: &str) -> Result<Track, SourceError> {
    let page_url = str_field(info, "webpage_url").unwrap_or_else(|| query.to_owned());
    let stream_url = audio_url(info)
        .ok_or_else(|| SourceError::Download(format!("No audio stream found for {page_url}")))?;
    let title = str_field(info, "title").unwrap_or_else(|| page_url.clone());

    let mut track = Track::new(title, page_url, AudioSource::Remote(stream_url));
    if let Some(seconds) = info
        .get("duration")
        .and_then(Value::as_f64)
        .filter(|s| s.is_finite() && *s >= 0.0)
    {
        track = track.with_duration(Duration::from_secs_f64(seconds));
    }
    if let Some(thumbnail) = str_field(info, "thumbnail") {
        track = track.with_thumbnail(thumbnail);
    }
    Ok(track)
}

#[cfg(test)]
#[path = "./yt_dlp_test.rs"]
mod yt_dlp_test;
