use std::future::Future;

use futures::future::join_all;
use log::{debug, info, warn};

use crate::config::Settings;
use crate::error::{CandidateFailure, Error, Result, Stage};
use crate::search::{self, SearchCandidate};
use crate::{MultiVideoAnalysis, VideoAnalysis, extract_video_id, summarize, transcript};

/// Marker words the combine phase counts against per-video conclusions
const COMMON_MARKERS: [&str; 5] = ["重要", "必要", "ポイント", "効果的", "注目"];

type CandidateResult = std::result::Result<VideoAnalysis, CandidateFailure>;

/// Single-video path: URL → transcript → summary
pub async fn analyze_url(
    client: &reqwest::Client,
    settings: &Settings,
    url: &str,
) -> Result<VideoAnalysis> {
    settings.openai_key()?;

    let video_id = extract_video_id(url).ok_or_else(|| Error::InvalidVideoUrl {
        input: url.to_string(),
    })?;

    let segments = transcript::fetch_transcript(
        client,
        &video_id,
        &settings.primary_lang,
        &settings.secondary_lang,
    )
    .await?;
    let text = transcript::format_transcript(&segments);

    summarize::summarize(client, settings, &text, url, None, None, None).await
}

/// Keyword path: search → concurrent per-candidate analysis → combined report.
///
/// Four phases, sequential at the phase level. A candidate failing any of its
/// three steps is dropped without disturbing its siblings; the run fails only
/// when no candidates are found or none survive.
pub async fn analyze_keyword(
    client: &reqwest::Client,
    settings: &Settings,
    keyword: &str,
) -> Result<MultiVideoAnalysis> {
    // Credential preflight before any network work
    settings.youtube_key()?;
    settings.openai_key()?;

    // Phase 1: search
    info!("Searching videos for keyword: {keyword}");
    let candidates = search::search_videos(client, settings, keyword).await?;
    if candidates.is_empty() {
        return Err(Error::NoResultsFound {
            keyword: keyword.to_string(),
        });
    }
    info!("Analyzing {} candidate videos", candidates.len());

    // Phases 2 and 3: fan out, then join all before proceeding
    let (successes, failures) =
        run_fan_out(&candidates, |c| analyze_candidate(client, settings, c)).await;
    info!(
        "Analysis complete: {} succeeded, {} failed",
        successes.len(),
        failures.len()
    );

    if successes.is_empty() {
        return Err(Error::AllAnalysesFailed { failures });
    }

    // Phase 4: combine
    Ok(combine_results(successes, keyword))
}

/// Run every candidate's analysis concurrently and wait for all of them to
/// settle. Successes come back in original candidate order — `join_all`
/// preserves input order independent of completion order.
async fn run_fan_out<'a, F, Fut>(
    candidates: &'a [SearchCandidate],
    analyze: F,
) -> (Vec<VideoAnalysis>, Vec<CandidateFailure>)
where
    F: Fn(&'a SearchCandidate) -> Fut,
    Fut: Future<Output = CandidateResult>,
{
    let results = join_all(candidates.iter().map(analyze)).await;

    let mut successes = Vec::new();
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(analysis) => successes.push(analysis),
            Err(failure) => failures.push(failure),
        }
    }
    (successes, failures)
}

/// Per-candidate chain: transcript → metadata → summary. Each step's error
/// is converted to a `CandidateFailure` tagged with the failing stage.
async fn analyze_candidate(
    client: &reqwest::Client,
    settings: &Settings,
    candidate: &SearchCandidate,
) -> CandidateResult {
    let video_id = &candidate.video_id;
    debug!("Analyzing candidate {video_id}");

    let segments = transcript::fetch_transcript(
        client,
        video_id,
        &settings.primary_lang,
        &settings.secondary_lang,
    )
    .await
    .map_err(|e| fail(video_id, Stage::Transcript, &e))?;
    let text = transcript::format_transcript(&segments);

    let details = search::video_details(client, settings, video_id)
        .await
        .map_err(|e| fail(video_id, Stage::Metadata, &e))?;

    let video_url = format!("https://www.youtube.com/watch?v={video_id}");
    let publish_date = format_publish_date(&details.published_at);

    summarize::summarize(
        client,
        settings,
        &text,
        &video_url,
        Some(&details.title),
        Some(&details.channel_title),
        Some(&publish_date),
    )
    .await
    .map_err(|e| fail(video_id, Stage::Summarization, &e))
}

fn fail(video_id: &str, stage: Stage, err: &Error) -> CandidateFailure {
    warn!("Candidate {video_id} failed at {stage}: {err}");
    CandidateFailure {
        video_id: video_id.to_string(),
        stage,
        reason: err.to_string(),
    }
}

/// Merge successful analyses into one combined report. `videos` keeps the
/// original candidate order; `count` always equals `videos.len()`.
fn combine_results(videos: Vec<VideoAnalysis>, keyword: &str) -> MultiVideoAnalysis {
    debug!("Combining {} analysis results", videos.len());
    let count = videos.len();
    let title = format!("「{keyword}」に関する動画{count}本の分析");
    let summary = format!(
        "「{keyword}」をテーマにした複数の動画を分析した結果、以下のような共通点と相違点が見つかりました。"
    );
    let conclusion = format!("全体を通して、「{keyword}」については{}", common_conclusion(&videos));

    MultiVideoAnalysis {
        title,
        summary,
        conclusion,
        videos,
        keyword: keyword.to_string(),
        count,
    }
}

fn common_conclusion(videos: &[VideoAnalysis]) -> String {
    let conclusions: Vec<&str> = videos.iter().map(|v| v.conclusion.as_str()).collect();
    let phrases = find_common_phrases(&conclusions);

    if phrases.is_empty() {
        "様々な視点や意見が存在することがわかりました。".to_string()
    } else {
        format!("{}などの共通点が見られました。", phrases.join("、"))
    }
}

/// A marker counts as common when it appears as a substring in at least half
/// of the texts (ties included). Fewer than two texts never yield markers.
fn find_common_phrases(texts: &[&str]) -> Vec<&'static str> {
    if texts.len() < 2 {
        return Vec::new();
    }

    COMMON_MARKERS
        .into_iter()
        .filter(|marker| {
            let count = texts.iter().filter(|t| t.contains(marker)).count();
            2 * count >= texts.len()
        })
        .collect()
}

/// Render an RFC 3339 publish timestamp the way the reports display dates
/// (e.g. `2025/6/1`). Unparseable input passes through untouched.
fn format_publish_date(published_at: &str) -> String {
    match chrono::DateTime::parse_from_rfc3339(published_at) {
        Ok(dt) => dt.format("%Y/%-m/%-d").to_string(),
        Err(_) => published_at.to_string(),
    }
}
