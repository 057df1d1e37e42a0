use log::{debug, warn};
use serde::Deserialize;

use crate::VideoAnalysis;
use crate::config::Settings;
use crate::error::{Error, Result};

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

const SYSTEM_PROMPT: &str =
    "あなたはYouTube動画の分析エキスパートです。JSONフォーマットで応答してください。";

const TEMPERATURE: f64 = 0.7;
const MAX_TOKENS: u32 = 1000;

/// The five-field report shape the model is required to return
#[derive(Debug, Clone, PartialEq, Deserialize)]
struct ModelReport {
    title: String,
    summary: String,
    conclusion: String,
    points: Vec<String>,
    comment: String,
}

/// Analyze a transcript with the language model and attach the known video
/// metadata. The metadata always comes from the caller, never from the
/// model, so the model cannot invent a wrong URL or channel.
///
/// Malformed model output is absorbed into a fixed fallback report;
/// `SummarizationFailed` is raised only when the API call itself fails.
pub async fn summarize(
    client: &reqwest::Client,
    settings: &Settings,
    transcript: &str,
    video_url: &str,
    video_title: Option<&str>,
    channel_name: Option<&str>,
    publish_date: Option<&str>,
) -> Result<VideoAnalysis> {
    let api_key = settings.openai_key()?;

    let excerpt = truncate_chars(transcript, settings.max_transcript_chars);
    let prompt = build_prompt(excerpt);
    debug!("Summarizing {video_url} ({} transcript chars submitted)", excerpt.chars().count());

    let body = serde_json::json!({
        "model": settings.model,
        "messages": [
            {
                "role": "system",
                "content": SYSTEM_PROMPT
            },
            {
                "role": "user",
                "content": prompt
            }
        ],
        "temperature": TEMPERATURE,
        "max_tokens": MAX_TOKENS,
        "response_format": { "type": "json_object" }
    });

    let resp = client
        .post(CHAT_COMPLETIONS_URL)
        .bearer_auth(api_key)
        .header("Content-Type", "application/json")
        .json(&body)
        .send()
        .await
        .map_err(|e| Error::SummarizationFailed { reason: e.to_string() })?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(Error::SummarizationFailed {
            reason: format!("OpenAI API returned {status}: {body}"),
        });
    }

    let json: serde_json::Value = resp
        .json()
        .await
        .map_err(|e| Error::SummarizationFailed { reason: e.to_string() })?;

    let content = extract_content(&json).ok_or_else(|| Error::SummarizationFailed {
        reason: "empty response from OpenAI API".to_string(),
    })?;

    let report = parse_report(&content);

    Ok(VideoAnalysis {
        title: report.title,
        summary: report.summary,
        conclusion: report.conclusion,
        points: report.points,
        comment: report.comment,
        video_url: video_url.to_string(),
        video_title: video_title.map(|s| s.to_string()),
        channel_name: channel_name.map(|s| s.to_string()),
        publish_date: publish_date.map(|s| s.to_string()),
    })
}

fn build_prompt(transcript: &str) -> String {
    format!(
        r#"あなたはYouTube動画の分析エキスパートです。以下の字幕テキストから動画の内容を分析し、要約してください。
カジュアルな話し言葉で、以下の形式でレポートを作成してください。

■ タイトル（動画内容を端的に表す）
■ 概要（要点のまとめ）
■ この動画の主張・結論
■ 分析ポイント（3〜5項目、箇条書き）
■ 私の一言コメント（主観的なまとめ）

字幕テキスト:
{transcript}

レスポンスは必ずJSON形式で返してください。以下のようなJSONオブジェクト構造で返してください：
{{
  "title": "タイトル",
  "summary": "概要",
  "conclusion": "主張・結論",
  "points": ["ポイント1", "ポイント2", "ポイント3"],
  "comment": "一言コメント"
}}"#
    )
}

fn extract_content(json: &serde_json::Value) -> Option<String> {
    json.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|t| t.as_str())
        .map(|s| s.to_string())
}

/// Parse the model's JSON into the five-field report shape. Any parse or
/// shape mismatch yields the same fixed fallback report regardless of input.
fn parse_report(content: &str) -> ModelReport {
    match serde_json::from_str::<ModelReport>(content) {
        Ok(report) => report,
        Err(e) => {
            warn!("Model response failed validation, using fallback report: {e}");
            fallback_report()
        }
    }
}

fn fallback_report() -> ModelReport {
    ModelReport {
        title: "パースエラー".to_string(),
        summary: "分析データの解析中にエラーが発生しました。".to_string(),
        conclusion: "データを正しく解析できませんでした。".to_string(),
        points: vec!["データの解析に失敗しました。".to_string()],
        comment: "システムエラーが発生しました。再試行してください。".to_string(),
    }
}

/// Deterministic prefix cut at a character boundary
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_report_valid() {
        let content = r#"{
            "title": "t",
            "summary": "s",
            "conclusion": "c",
            "points": ["p1", "p2", "p3"],
            "comment": "cm"
        }"#;
        let report = parse_report(content);
        assert_eq!(report.title, "t");
        assert_eq!(report.points, vec!["p1", "p2", "p3"]);
        assert_eq!(report.comment, "cm");
    }

    #[test]
    fn test_parse_report_tolerates_extra_keys() {
        let content = r#"{
            "title": "t",
            "summary": "s",
            "conclusion": "c",
            "points": ["p1"],
            "comment": "cm",
            "videoUrl": "https://example.com"
        }"#;
        let report = parse_report(content);
        assert_eq!(report.title, "t");
    }

    #[test]
    fn test_parse_report_malformed_yields_fallback() {
        let report = parse_report("this is not json at all");
        assert_eq!(report, fallback_report());
    }

    #[test]
    fn test_parse_report_missing_field_yields_fallback() {
        let content = r#"{"title": "t", "summary": "s", "conclusion": "c", "points": ["p"]}"#;
        assert_eq!(parse_report(content), fallback_report());
    }

    #[test]
    fn test_parse_report_wrong_points_type_yields_fallback() {
        let content =
            r#"{"title": "t", "summary": "s", "conclusion": "c", "points": "p", "comment": "cm"}"#;
        assert_eq!(parse_report(content), fallback_report());
    }

    #[test]
    fn test_fallback_is_deterministic() {
        // Different malformed inputs produce the identical fallback
        let a = parse_report("{broken");
        let b = parse_report(r#"["an", "array"]"#);
        assert_eq!(a, b);
        assert_eq!(a.title, "パースエラー");
        assert_eq!(a.points, vec!["データの解析に失敗しました。"]);
    }

    #[test]
    fn test_extract_content() {
        let json = serde_json::json!({
            "choices": [
                {
                    "message": {
                        "role": "assistant",
                        "content": "{\"title\": \"t\"}"
                    }
                }
            ]
        });
        assert_eq!(extract_content(&json).as_deref(), Some("{\"title\": \"t\"}"));
    }

    #[test]
    fn test_extract_content_empty_choices() {
        let json = serde_json::json!({"choices": []});
        assert!(extract_content(&json).is_none());
    }

    #[test]
    fn test_truncate_chars_short_input_unchanged() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_chars_cuts_prefix() {
        assert_eq!(truncate_chars("hello world", 5), "hello");
    }

    #[test]
    fn test_truncate_chars_multibyte_safe() {
        // Counts characters, not bytes
        assert_eq!(truncate_chars("日本語のテキスト", 3), "日本語");
    }

    #[test]
    fn test_prompt_embeds_transcript() {
        let prompt = build_prompt("[0:05] こんにちは");
        assert!(prompt.contains("[0:05] こんにちは"));
        assert!(prompt.contains("JSON形式"));
    }
}
