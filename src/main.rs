use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use eyre::{Result, bail};
use log::{debug, info};

mod cli;

use cli::{Cli, OutputFormat};

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("ytsum.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ytsum")
        .join("logs")
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;

    let cli = Cli::parse();

    // Load config file (non-fatal if missing/invalid)
    let config = ytsum::config::Config::load().unwrap_or_default();

    let settings = ytsum::config::Settings::resolve(
        &config,
        std::env::var("YOUTUBE_API_KEY").ok(),
        std::env::var("OPENAI_API_KEY").ok(),
        cli.model.clone(),
        cli.lang.clone(),
        cli.max_videos,
    );

    if cli.verbose {
        let config_path = ytsum::config::config_path();
        if config_path.exists() {
            eprintln!("Config: {}", config_path.display());
        }
        eprintln!(
            "Model: {}  Languages: {}/{}  Max videos: {}",
            settings.model, settings.primary_lang, settings.secondary_lang, settings.max_videos
        );
        debug!("Max transcript chars: {}", settings.max_transcript_chars);
    }

    // Per-request timeout: no provider call may hang a candidate task forever
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(120))
        .build()?;

    let rendered = match (&cli.url, &cli.keyword) {
        (Some(url), None) => {
            if cli.verbose {
                eprintln!("Analyzing video: {url}");
            }
            let analysis = ytsum::pipeline::analyze_url(&client, &settings, url).await?;
            match cli.format {
                OutputFormat::Text => ytsum::output::render_analysis_text(&analysis),
                OutputFormat::Json => ytsum::output::render_json(&analysis)?,
            }
        }
        (None, Some(keyword)) => {
            if cli.verbose {
                eprintln!("Searching and analyzing videos for: {keyword}");
            }
            let report = ytsum::pipeline::analyze_keyword(&client, &settings, keyword).await?;
            if cli.verbose {
                eprintln!("Analyzed {} videos", report.count);
            }
            match cli.format {
                OutputFormat::Text => ytsum::output::render_multi_text(&report),
                OutputFormat::Json => ytsum::output::render_json(&report)?,
            }
        }
        _ => bail!(
            "provide a video URL or a search keyword\n\nUsage: ytsum <URL>\n       ytsum --keyword <KEYWORD>"
        ),
    };

    if let Some(ref path) = cli.output {
        std::fs::write(path, &rendered)?;
        if cli.verbose {
            eprintln!("Output written to: {}", path.display());
        }
    } else {
        println!("{rendered}");
    }

    Ok(())
}
