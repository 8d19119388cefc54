use crate::helpers::lenient;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// YouTube Data API v3 `videos` list response with `part=snippet`
/// @see https://developers.google.com/youtube/v3/docs/videos/list
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(in crate::youtube) struct VideoListResponse {
    #[serde(deserialize_with = "lenient::list")]
    pub items: Vec<VideoResource>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(in crate::youtube) struct VideoResource {
    #[serde(deserialize_with = "lenient::id_string")]
    pub id: String,
    pub snippet: Option<Snippet>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(in crate::youtube) struct Snippet {
    #[serde(deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(deserialize_with = "lenient::text")]
    pub description: String,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub channel_title: Option<String>,
    #[serde(deserialize_with = "lenient::optional_text")]
    pub published_at: Option<String>,
    pub thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(in crate::youtube) struct Thumbnails {
    pub default: Option<Thumbnail>,
    pub medium: Option<Thumbnail>,
    pub high: Option<Thumbnail>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(in crate::youtube) struct Thumbnail {
    #[serde(deserialize_with = "lenient::optional_text")]
    pub url: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoSnippet {
    /// Video id the lookup was issued for
    pub key: String,
    pub title: String,
    pub description: String,
    pub channel_title: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub thumbnail_url: Option<String>,
    pub watch_url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrailerFailure {
    pub key: String,
    pub reason: String,
}

/// Outcome of a trailer fan-out. Videos are in arrival order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TrailerCollection {
    pub videos: Vec<VideoSnippet>,
    pub failures: Vec<TrailerFailure>,
}
