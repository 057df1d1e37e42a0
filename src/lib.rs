pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod search;
pub mod summarize;
pub mod transcript;

use serde::{Deserialize, Serialize};

/// Analysis report for a single video. Fields serialize in the camelCase
/// wire shape consumed by downstream tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoAnalysis {
    pub title: String,
    pub summary: String,
    pub conclusion: String,
    pub points: Vec<String>,
    pub comment: String,
    /// Empty only in the parse-failure fallback, where no video context exists
    pub video_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<String>,
}

/// Combined report over every video that analyzed successfully.
/// `count` always equals `videos.len()` and is never zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiVideoAnalysis {
    pub title: String,
    pub summary: String,
    pub conclusion: String,
    pub videos: Vec<VideoAnalysis>,
    pub keyword: String,
    pub count: usize,
}

/// Extract video ID from various YouTube URL formats
pub fn extract_video_id(input: &str) -> Option<String> {
    let input = input.trim();

    // youtube.com/watch?v=ID
    if let Some(caps) = regex::Regex::new(r"(?:youtube\.com/watch\?.*v=)([a-zA-Z0-9_-]{11})")
        .unwrap()
        .captures(input)
    {
        return Some(caps[1].to_string());
    }

    // youtu.be/ID
    if let Some(caps) = regex::Regex::new(r"youtu\.be/([a-zA-Z0-9_-]{11})")
        .unwrap()
        .captures(input)
    {
        return Some(caps[1].to_string());
    }

    // youtube.com/embed/ID
    if let Some(caps) = regex::Regex::new(r"youtube\.com/embed/([a-zA-Z0-9_-]{11})")
        .unwrap()
        .captures(input)
    {
        return Some(caps[1].to_string());
    }

    // legacy youtube.com/v/ID
    if let Some(caps) = regex::Regex::new(r"youtube\.com/v/([a-zA-Z0-9_-]{11})")
        .unwrap()
        .captures(input)
    {
        return Some(caps[1].to_string());
    }

    // legacy youtube.com/u/<n>/ID
    if let Some(caps) = regex::Regex::new(r"youtube\.com/u/\w/([a-zA-Z0-9_-]{11})")
        .unwrap()
        .captures(input)
    {
        return Some(caps[1].to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_watch_url_with_extra_params() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?list=PL123&v=dQw4w9WgXcQ&t=120"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_short_url() {
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_embed_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_legacy_v_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/v/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_legacy_user_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/u/1/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_bare_id_rejected() {
        assert_eq!(extract_video_id("dQw4w9WgXcQ"), None);
    }

    #[test]
    fn test_short_id_rejected() {
        assert_eq!(extract_video_id("https://youtu.be/abc123"), None);
    }

    #[test]
    fn test_unrelated_url_rejected() {
        assert_eq!(extract_video_id("https://example.com/watch?v=dQw4w9WgXcQ"), None);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(extract_video_id(""), None);
    }

    #[test]
    fn test_whitespace_trimming() {
        assert_eq!(
            extract_video_id("  https://youtu.be/dQw4w9WgXcQ  "),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_video_analysis_json_shape() {
        let analysis = VideoAnalysis {
            title: "t".to_string(),
            summary: "s".to_string(),
            conclusion: "c".to_string(),
            points: vec!["p1".to_string()],
            comment: "cm".to_string(),
            video_url: "https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string(),
            video_title: Some("vt".to_string()),
            channel_name: None,
            publish_date: None,
        };
        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["videoUrl"], "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
        assert_eq!(json["videoTitle"], "vt");
        assert!(json.get("channelName").is_none());
    }
}
