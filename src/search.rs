use std::collections::HashMap;

use chrono::{Duration, SecondsFormat, Utc};
use log::debug;
use serde::Deserialize;

use crate::config::Settings;
use crate::error::{Error, Result};

const SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";
const VIDEOS_URL: &str = "https://www.googleapis.com/youtube/v3/videos";

/// Only videos published within the last year are considered
const SEARCH_WINDOW_DAYS: i64 = 365;
/// The initial search over-fetches so the popularity filter has room to drop
const SEARCH_MAX_RESULTS: u32 = 10;

/// One candidate surfaced by keyword search; consumed once per pipeline run
#[derive(Debug, Clone)]
pub struct SearchCandidate {
    pub video_id: String,
    pub title: String,
    pub channel_title: String,
    pub published_at: String,
    pub thumbnail_url: Option<String>,
}

/// Snippet-level details for a single known video
#[derive(Debug, Clone)]
pub struct VideoDetails {
    pub title: String,
    pub channel_title: String,
    pub published_at: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: String,
    #[serde(rename = "channelTitle")]
    channel_title: String,
    #[serde(rename = "publishedAt")]
    published_at: String,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: String,
    snippet: Snippet,
    #[serde(default)]
    statistics: Statistics,
}

#[derive(Debug, Default, Deserialize)]
struct Statistics {
    // The Data API returns counts as strings
    #[serde(rename = "viewCount")]
    view_count: Option<String>,
}

/// Search for candidate videos: up to 10 relevance-ranked results from the
/// last year, filtered to those meeting the view-count threshold, truncated
/// to the per-run cap. Relevance order is preserved; survivors are never
/// re-sorted by view count.
///
/// Zero raw search results is `NoResultsFound`; an empty list after the
/// popularity filter is `Ok(vec![])` and left to the caller.
pub async fn search_videos(
    client: &reqwest::Client,
    settings: &Settings,
    keyword: &str,
) -> Result<Vec<SearchCandidate>> {
    let api_key = settings.youtube_key()?;

    let published_after = (Utc::now() - Duration::days(SEARCH_WINDOW_DAYS))
        .to_rfc3339_opts(SecondsFormat::Secs, true);
    let max_results = SEARCH_MAX_RESULTS.to_string();
    debug!("Searching videos: keyword={keyword} publishedAfter={published_after}");

    let search: SearchResponse = client
        .get(SEARCH_URL)
        .query(&[
            ("part", "snippet"),
            ("q", keyword),
            ("type", "video"),
            ("maxResults", max_results.as_str()),
            ("publishedAfter", published_after.as_str()),
            ("relevanceLanguage", settings.relevance_language.as_str()),
            ("key", api_key),
        ])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    if search.items.is_empty() {
        return Err(Error::NoResultsFound {
            keyword: keyword.to_string(),
        });
    }

    let candidates: Vec<SearchCandidate> = search
        .items
        .into_iter()
        .filter_map(|item| {
            let video_id = item.id.video_id?;
            Some(SearchCandidate {
                video_id,
                title: item.snippet.title,
                channel_title: item.snippet.channel_title,
                published_at: item.snippet.published_at,
                thumbnail_url: item.snippet.thumbnails.default.map(|t| t.url),
            })
        })
        .collect();

    let ids = candidates
        .iter()
        .map(|c| c.video_id.as_str())
        .collect::<Vec<_>>()
        .join(",");

    let details: VideosResponse = client
        .get(VIDEOS_URL)
        .query(&[
            ("part", "snippet,statistics"),
            ("id", ids.as_str()),
            ("key", api_key),
        ])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let view_counts: HashMap<String, u64> = details
        .items
        .into_iter()
        .map(|item| {
            let views = item
                .statistics
                .view_count
                .as_deref()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0);
            (item.id, views)
        })
        .collect();

    let survivors = filter_by_popularity(
        candidates,
        &view_counts,
        settings.min_view_count,
        settings.max_videos,
    );
    debug!("Search survivors after popularity filter: {}", survivors.len());

    Ok(survivors)
}

/// Keep candidates whose view count meets the threshold, in their original
/// relevance order, capped at `max_videos`. Candidates with no statistics
/// record count as zero views.
fn filter_by_popularity(
    candidates: Vec<SearchCandidate>,
    view_counts: &HashMap<String, u64>,
    min_view_count: u64,
    max_videos: usize,
) -> Vec<SearchCandidate> {
    candidates
        .into_iter()
        .filter(|c| view_counts.get(&c.video_id).copied().unwrap_or(0) >= min_view_count)
        .take(max_videos)
        .collect()
}

/// Look up title/channel/publish-date for a single video
pub async fn video_details(
    client: &reqwest::Client,
    settings: &Settings,
    video_id: &str,
) -> Result<VideoDetails> {
    let api_key = settings.youtube_key()?;

    let resp: VideosResponse = client
        .get(VIDEOS_URL)
        .query(&[
            ("part", "snippet,statistics"),
            ("id", video_id),
            ("key", api_key),
        ])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let item = resp.items.into_iter().next().ok_or_else(|| Error::VideoNotFound {
        video_id: video_id.to_string(),
    })?;

    Ok(VideoDetails {
        title: item.snippet.title,
        channel_title: item.snippet.channel_title,
        published_at: item.snippet.published_at,
    })
}
