/// Compare plain and temporal matching on the same inputs
///
/// Runs the matcher once without the temporal bonus and once per candidate
/// weight, then prints match counts, average confidence and order
/// consistency so weights can be tuned against real data.
use anyhow::Result;
use clap::{Arg, Command};
use std::path::PathBuf;

use qa_video_splitter::config::Config;
use qa_video_splitter::matching::{MatchReport, QaMatcher};
use qa_video_splitter::qa::load_qa_csv;
use qa_video_splitter::transcript::load_whisper_json;

const CANDIDATE_WEIGHTS: &[f64] = &[0.1, 0.2, 0.3];

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("qa_video_splitter=warn")
        .init();

    let matches = Command::new("compare-matchers")
        .about("Compare plain vs temporal matching quality")
        .arg(
            Arg::new("csv")
                .long("csv")
                .value_name("FILE")
                .required(true),
        )
        .arg(
            Arg::new("whisper-json")
                .long("whisper-json")
                .value_name("FILE")
                .required(true),
        )
        .get_matches();

    let csv_path = PathBuf::from(matches.get_one::<String>("csv").unwrap());
    let whisper_path = PathBuf::from(matches.get_one::<String>("whisper-json").unwrap());

    let records = load_qa_csv(&csv_path).await?;
    let segments = load_whisper_json(&whisper_path).await?;

    println!("Q&A records: {}", records.len());
    println!("Transcript segments: {}", segments.len());

    let base_config = Config::default().matching;
    let plain = QaMatcher::new(base_config.clone()).match_records(&records, &segments);
    print_report("plain", &MatchReport::from_results(&plain));

    for &weight in CANDIDATE_WEIGHTS {
        let mut config = base_config.clone();
        config.enable_temporal = true;
        config.temporal_weight = weight;

        let results = QaMatcher::new(config).match_records(&records, &segments);
        print_report(
            &format!("temporal (weight={weight})"),
            &MatchReport::from_results(&results),
        );
    }

    Ok(())
}

fn print_report(label: &str, report: &MatchReport) {
    println!("\n=== {} ===", label);
    println!(
        "  matched: {}/{} ({:.1}%)",
        report.matched,
        report.total_records,
        report.match_rate * 100.0
    );
    println!("  avg confidence: {:.3}", report.average_confidence);
    println!("  avg text score: {:.3}", report.average_text_score);
    println!("  avg temporal bonus: {:.3}", report.average_temporal_bonus);
    println!(
        "  order consistency: {:.1}% ({} violations)",
        report.consistency_ratio * 100.0,
        report.order_violations
    );
}
