use crate::context::ApiContext;
use crate::errors::{ExtractError, RetrievalError};
use crate::helpers::http::{jitter, parse_url};
use crate::movies::VideoRef;
use crate::state::ViewScope;
use crate::store::{self, Action, Dispatch, Operation};
use crate::types::required;
use crate::youtube::types::{Snippet, VideoListResponse};
use crate::youtube::{TrailerCollection, TrailerFailure, VideoSnippet, YOUTUBE_API_LIMIT};

use chrono::{DateTime, Utc};
use futures::{future, stream, StreamExt};
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;
use url::Url;

pub fn watch_url(key: &str) -> String {
    format!("https://www.youtube.com/watch?v={key}")
}

fn into_snippet(key: &str, snippet: Snippet) -> VideoSnippet {
    let thumbnail_url = snippet.thumbnails.and_then(|t| {
        [t.high, t.medium, t.default]
            .into_iter()
            .flatten()
            .find_map(|thumbnail| thumbnail.url)
    });

    VideoSnippet {
        key: key.to_string(),
        title: snippet.title.trim().to_string(),
        description: snippet.description,
        channel_title: snippet.channel_title,
        published_at: snippet
            .published_at
            .and_then(|v| DateTime::parse_from_rfc3339(&v).ok())
            .map(|v| v.with_timezone(&Utc)),
        thumbnail_url,
        watch_url: watch_url(key),
    }
}

/// The first item of a `videos` list response, which holds at most one
/// video when queried by id
pub fn extract_video_snippet(key: &str, body: &Value) -> Result<VideoSnippet, ExtractError> {
    let response = VideoListResponse::deserialize(body).map_err(|source| ExtractError::Shape {
        what: "video details",
        source,
    })?;

    let item = response
        .items
        .into_iter()
        .next()
        .ok_or(ExtractError::Empty("video details"))?;

    Ok(into_snippet(key, item.snippet.unwrap_or_default()))
}

pub fn video_url(api: &ApiContext, key: &str) -> Result<Url, RetrievalError> {
    let youtube = &api.config().youtube;
    let api_key = required(&youtube.api_key, "youtube.api_key")?;

    let mut url = parse_url(youtube.base_url.trim_end_matches('/'))?;
    url.query_pairs_mut()
        .append_pair("id", key)
        .append_pair("key", api_key)
        .append_pair("part", "snippet");
    Ok(url)
}

#[instrument(name = "fetch-video-snippet", skip(api))]
pub async fn fetch_video_snippet(api: &ApiContext, key: &str) -> Result<VideoSnippet, RetrievalError> {
    let url = video_url(api, key)?;

    YOUTUBE_API_LIMIT.until_ready_with_jitter(jitter()).await;
    let body = api.http().get_json(&url).await?;

    Ok(extract_video_snippet(key, &body)?)
}

/// Look up every video of a title, at most `youtube.concurrency` at a time.
///
/// Each lookup reports its own outcome as it arrives. Tearing `scope` down
/// abandons the lookups still pending and nothing is reported afterwards.
pub async fn retrieve_video_details(
    api: &ApiContext,
    videos: &[VideoRef],
    scope: &ViewScope,
    dispatch: &dyn Dispatch,
) -> Result<TrailerCollection, RetrievalError> {
    let dispatch = scope.dispatcher(dispatch);
    let concurrency = api.config().youtube.concurrency.max(1);
    tracing::debug!(count = videos.len(), concurrency, "Looking up trailers");

    let lookups = stream::iter(videos)
        .map(|video| async move {
            (
                video.key.as_str(),
                fetch_video_snippet(api, &video.key).await,
            )
        })
        .buffer_unordered(concurrency)
        .fold(TrailerCollection::default(), |mut collection, (key, result)| {
            match store::settle(
                &dispatch,
                Operation::VideoDetails,
                result,
                Action::TrailerRetrieved,
            ) {
                Ok(snippet) => collection.videos.push(snippet),
                Err(e) => collection.failures.push(TrailerFailure {
                    key: key.to_string(),
                    reason: e.to_string(),
                }),
            }
            future::ready(collection)
        });

    let collection = scope.run(Operation::VideoDetails, lookups).await?;
    tracing::debug!(
        found = collection.videos.len(),
        failed = collection.failures.len(),
        "Trailer lookup finished"
    );

    Ok(collection)
}
