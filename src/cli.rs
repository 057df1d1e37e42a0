use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "ytsum", about = "YouTube video summarizer", version)]
pub struct Cli {
    /// YouTube video URL to analyze
    pub url: Option<String>,

    /// Search keyword: analyze the top matching videos instead of a single URL
    #[arg(short, long, conflicts_with = "url")]
    pub keyword: Option<String>,

    /// Output format: text (default), json
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Preferred caption language
    #[arg(short, long)]
    pub lang: Option<String>,

    /// LLM model for analysis
    #[arg(long)]
    pub model: Option<String>,

    /// Maximum number of videos analyzed per keyword run
    #[arg(long)]
    pub max_videos: Option<usize>,

    /// Write output to file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Show resolved configuration and progress on stderr
    #[arg(short, long)]
    pub verbose: bool,
}
