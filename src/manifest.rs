use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::ManifestError;

/// An entry of the document manifest. `views` is bumped in place every time the document is
/// loaded and only lives as long as the page does.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct DocumentItem {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub likes: u64,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct MediaItem {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: BackendKind,
    pub url: String,
}

/// The playback technology an item needs. Only one is active at any moment.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Hash)]
pub enum BackendKind {
    #[serde(rename = "youtube")]
    EmbeddedVideo,
    #[serde(rename = "mp4")]
    LocalVideo,
    #[serde(rename = "audio")]
    LocalAudio,
}

impl BackendKind {
    pub const ALL: [BackendKind; 3] = [
        BackendKind::EmbeddedVideo,
        BackendKind::LocalVideo,
        BackendKind::LocalAudio,
    ];

    /// Local files can be downloaded, streams cannot.
    pub fn is_file(self) -> bool {
        matches!(self, BackendKind::LocalVideo | BackendKind::LocalAudio)
    }

    pub fn badge(self) -> &'static str {
        match self {
            BackendKind::EmbeddedVideo => "YOUTUBE",
            BackendKind::LocalVideo => "MP4",
            BackendKind::LocalAudio => "AUDIO",
        }
    }

    /// CSS class used by the media list for the type badge.
    pub fn class(self) -> &'static str {
        match self {
            BackendKind::EmbeddedVideo => "youtube",
            BackendKind::LocalVideo => "mp4",
            BackendKind::LocalAudio => "audio",
        }
    }
}

pub fn parse_documents(json: &str) -> Result<Vec<DocumentItem>, ManifestError> {
    parse(json)
}

pub fn parse_media(json: &str) -> Result<Vec<MediaItem>, ManifestError> {
    parse(json)
}

fn parse<T: DeserializeOwned>(json: &str) -> Result<Vec<T>, ManifestError> {
    serde_json::from_str(json).map_err(|e| ManifestError::Data(e.to_string()))
}

/// Resolves a manifest path against the page location. Absolute locations pass through.
pub fn resolve(base: &str, location: &str) -> Result<url::Url, ManifestError> {
    if let Ok(absolute) = url::Url::parse(location) {
        return Ok(absolute);
    }

    url::Url::parse(base)
        .and_then(|base| base.join(location))
        .map_err(|_| ManifestError::Location(location.to_string()))
}

/// Fetches a manifest and decodes it as an ordered list of items.
pub async fn fetch<T: DeserializeOwned>(url: url::Url) -> Result<Vec<T>, ManifestError> {
    tracing::info!(%url, "Loading manifest...");

    let response = reqwest::get(url.clone())
        .await
        .map_err(|e| ManifestError::Fetch(e.to_string()))?;

    check_status(response.status())?;

    let body = response
        .text()
        .await
        .map_err(|e| ManifestError::Fetch(e.to_string()))?;

    let items = parse(&body)?;

    tracing::info!(%url, count = items.len(), "Manifest parsed...");

    Ok(items)
}

fn check_status(status: reqwest::StatusCode) -> Result<(), ManifestError> {
    if !status.is_success() {
        tracing::warn!(%status, "Manifest request refused.");
        return Err(ManifestError::HttpCode(status.as_u16()));
    }

    Ok(())
}

/// Cuts `title` to at most `limit` characters, marking the cut with an ellipsis.
pub fn short_title(title: &str, limit: usize) -> String {
    match title.char_indices().nth(limit) {
        Some((end, _)) => format!("{}...", &title[..end]),
        None => title.to_string(),
    }
}
