use thiserror::Error;

/// Stage of the per-video analysis chain that produced a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Transcript,
    Metadata,
    Summarization,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Transcript => write!(f, "transcript"),
            Stage::Metadata => write!(f, "metadata"),
            Stage::Summarization => write!(f, "summarization"),
        }
    }
}

/// Diagnostic record for one candidate that dropped out of a batch run
#[derive(Debug, Clone)]
pub struct CandidateFailure {
    pub video_id: String,
    pub stage: Stage,
    pub reason: String,
}

impl std::fmt::Display for CandidateFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed at {}: {}", self.video_id, self.stage, self.reason)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("could not extract a video ID from URL: {input}")]
    InvalidVideoUrl { input: String },

    #[error("no transcript available for video {video_id}: {reason}")]
    TranscriptUnavailable { video_id: String, reason: String },

    #[error("no video found with ID {video_id}")]
    VideoNotFound { video_id: String },

    #[error("no videos found for keyword: {keyword}")]
    NoResultsFound { keyword: String },

    #[error("summarization request failed: {reason}")]
    SummarizationFailed { reason: String },

    #[error("all {} candidate videos failed analysis: {}", .failures.len(), format_failures(.failures))]
    AllAnalysesFailed { failures: Vec<CandidateFailure> },

    #[error("missing API key: {env_var} environment variable is not set")]
    MissingApiKey { env_var: String },

    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn format_failures(failures: &[CandidateFailure]) -> String {
    failures
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, Error>;
