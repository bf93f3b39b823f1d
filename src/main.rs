use anyhow::Result;
use clap::{Arg, Command};
use std::path::PathBuf;
use tracing::{info, warn};

use qa_video_splitter::config::Config;
use qa_video_splitter::matching::{MatchReport, QaMatcher};
use qa_video_splitter::qa::load_qa_csv;
use qa_video_splitter::splitter::{write_plan, CutPlanner};
use qa_video_splitter::transcript::load_whisper_json;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("qa_video_splitter=info,warn")
        .init();

    let matches = Command::new("Q&A Video Splitter")
        .version("0.1.0")
        .about("Aligns Q&A records with Whisper transcripts and plans video cuts")
        .arg(
            Arg::new("csv")
                .short('c')
                .long("csv")
                .value_name("FILE")
                .help("Q&A results CSV file")
                .required(true),
        )
        .arg(
            Arg::new("whisper-json")
                .short('j')
                .long("whisper-json")
                .value_name("FILE")
                .help("Whisper transcript JSON file")
                .required(true),
        )
        .arg(
            Arg::new("output-dir")
                .short('o')
                .long("output-dir")
                .value_name("DIR")
                .help("Output directory for the cut plan")
                .default_value("./output"),
        )
        .arg(
            Arg::new("threshold")
                .short('t')
                .long("threshold")
                .value_name("SCORE")
                .help("Minimum confidence for accepting a match"),
        )
        .arg(
            Arg::new("temporal")
                .long("temporal")
                .help("Enable the temporal bonus scorer")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let csv_path = PathBuf::from(matches.get_one::<String>("csv").unwrap());
    let whisper_path = PathBuf::from(matches.get_one::<String>("whisper-json").unwrap());
    let output_dir = PathBuf::from(matches.get_one::<String>("output-dir").unwrap());

    if matches.get_flag("verbose") {
        info!("Verbose logging enabled");
    }

    // Load configuration, then apply CLI overrides
    let mut config = Config::load().unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {}", e);
        Config::default()
    });
    if let Some(threshold) = matches.get_one::<String>("threshold") {
        config.matching.confidence_threshold = threshold.parse()?;
    }
    if matches.get_flag("temporal") {
        config.matching.enable_temporal = true;
    }
    config.validate()?;

    info!("🚀 Q&A Video Splitter starting...");
    info!("📋 Q&A CSV: {}", csv_path.display());
    info!("🎤 Whisper JSON: {}", whisper_path.display());
    info!("📂 Output directory: {}", output_dir.display());

    let start_time = std::time::Instant::now();

    let records = load_qa_csv(&csv_path).await?;
    let segments = load_whisper_json(&whisper_path).await?;

    let matcher = QaMatcher::new(config.matching.clone());
    let results = matcher.match_records(&records, &segments);

    let report = MatchReport::from_results(&results);
    report.log_summary();

    let planner = CutPlanner::new(config.splitter.clone());
    let plan = planner.build_plan(
        &results,
        config.output.save_report.then(|| report.clone()),
    );
    let plan_path = write_plan(&plan, &output_dir).await?;

    info!(
        "🎉 Done in {:.2}s: plan at {}",
        start_time.elapsed().as_secs_f64(),
        plan_path.display()
    );

    Ok(())
}
