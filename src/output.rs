use crate::{MultiVideoAnalysis, VideoAnalysis};

/// Render a single-video report as readable text
pub fn render_analysis_text(analysis: &VideoAnalysis) -> String {
    let mut out = String::new();

    out.push_str(&format!("■ タイトル\n{}\n\n", analysis.title));
    out.push_str(&format!("■ 概要\n{}\n\n", analysis.summary));
    out.push_str(&format!("■ 主張・結論\n{}\n\n", analysis.conclusion));

    out.push_str("■ 分析ポイント\n");
    for (i, point) in analysis.points.iter().enumerate() {
        out.push_str(&format!("  {}. {point}\n", i + 1));
    }

    out.push_str(&format!("\n■ 一言コメント\n{}\n", analysis.comment));

    if let Some(ref title) = analysis.video_title {
        out.push_str(&format!("\n動画: {title}"));
        if let Some(ref channel) = analysis.channel_name {
            out.push_str(&format!(" ({channel})"));
        }
        if let Some(ref date) = analysis.publish_date {
            out.push_str(&format!(" {date}"));
        }
        out.push('\n');
    }
    if !analysis.video_url.is_empty() {
        out.push_str(&format!("URL: {}\n", analysis.video_url));
    }

    out
}

/// Render a combined multi-video report as readable text
pub fn render_multi_text(report: &MultiVideoAnalysis) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n\n{}\n", report.title, report.summary));

    for (i, video) in report.videos.iter().enumerate() {
        out.push_str(&format!("\n--- 動画 {} / {} ---\n\n", i + 1, report.count));
        out.push_str(&render_analysis_text(video));
    }

    out.push_str(&format!("\n■ 総合結論\n{}\n", report.conclusion));

    out
}

/// Render any report shape as pretty-printed JSON
pub fn render_json<T: serde::Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_analysis() -> VideoAnalysis {
        VideoAnalysis {
            title: "動画の要点".to_string(),
            summary: "概要です".to_string(),
            conclusion: "結論です".to_string(),
            points: vec!["一つ目".to_string(), "二つ目".to_string()],
            comment: "コメントです".to_string(),
            video_url: "https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string(),
            video_title: Some("元動画タイトル".to_string()),
            channel_name: Some("チャンネル".to_string()),
            publish_date: Some("2025/6/1".to_string()),
        }
    }

    #[test]
    fn test_render_analysis_text() {
        let text = render_analysis_text(&sample_analysis());
        assert!(text.contains("■ タイトル\n動画の要点"));
        assert!(text.contains("  1. 一つ目"));
        assert!(text.contains("  2. 二つ目"));
        assert!(text.contains("元動画タイトル (チャンネル) 2025/6/1"));
        assert!(text.contains("URL: https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
    }

    #[test]
    fn test_render_analysis_text_without_metadata() {
        let analysis = VideoAnalysis {
            video_title: None,
            channel_name: None,
            publish_date: None,
            ..sample_analysis()
        };
        let text = render_analysis_text(&analysis);
        assert!(!text.contains("動画:"));
        assert!(text.contains("URL: "));
    }

    #[test]
    fn test_render_multi_text() {
        let report = MultiVideoAnalysis {
            title: "「投資」に関する動画2本の分析".to_string(),
            summary: "まとめ".to_string(),
            conclusion: "総合的な結論".to_string(),
            videos: vec![sample_analysis(), sample_analysis()],
            keyword: "投資".to_string(),
            count: 2,
        };
        let text = render_multi_text(&report);
        assert!(text.starts_with("「投資」に関する動画2本の分析"));
        assert!(text.contains("--- 動画 1 / 2 ---"));
        assert!(text.contains("--- 動画 2 / 2 ---"));
        assert!(text.contains("■ 総合結論\n総合的な結論"));
    }

    #[test]
    fn test_render_json_uses_wire_field_names() {
        let json = render_json(&sample_analysis()).unwrap();
        assert!(json.contains("\"videoUrl\""));
        assert!(json.contains("\"channelName\""));
        assert!(!json.contains("\"video_url\""));
    }
}
