//! Run command - convert, preprocess, extract and score PDF files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Local};
use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, error, warn};

use aixtract_core::models::config::AixtractConfig;
use aixtract_core::{
    read_pdf2xml, AlignmentScorer, DocumentConverter, FragmentPreprocessor, PdfToXmlConverter,
    Preprocessor, Scores,
};

use super::extract::extract_document;

/// Arguments for the run command.
#[derive(Args)]
pub struct RunArgs {
    /// Input PDF files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory (default: next to each PDF)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Summary row for one processed document.
#[derive(Debug, Serialize)]
struct RunRecord {
    filename: String,
    status: &'static str,
    pages: usize,
    mean_score: Option<f64>,
    processing_time_ms: u64,
    finished_at: String,
    error: String,
}

pub fn run(args: RunArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let mut config = super::load_config(config_path)?;
    if let Some(dir) = &args.output_dir {
        config.converter.output_dir = Some(dir.clone());
    }

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!("{} Found {} files to process", style("ℹ").blue(), files.len());

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(progress_style());

    let mut records = Vec::with_capacity(files.len());

    for path in &files {
        let file_start = Instant::now();
        let result = process_single_file(path, &config);
        let processing_time_ms = file_start.elapsed().as_millis() as u64;
        let finished_at: DateTime<Local> = Local::now();
        let filename = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        match result {
            Ok(scores) => records.push(RunRecord {
                filename,
                status: "success",
                pages: scores.pages.len(),
                mean_score: scores.mean,
                processing_time_ms,
                finished_at: finished_at.to_rfc3339(),
                error: String::new(),
            }),
            Err(e) => {
                let error_msg = format!("{:#}", e);
                if !args.continue_on_error {
                    pb.abandon();
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
                warn!("Failed to process {}: {}", path.display(), error_msg);
                records.push(RunRecord {
                    filename,
                    status: "error",
                    pages: 0,
                    mean_score: None,
                    processing_time_ms,
                    finished_at: finished_at.to_rfc3339(),
                    error: error_msg,
                });
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    let summary_path = args
        .output_dir
        .as_ref()
        .map(|d| d.join("summary.csv"))
        .unwrap_or_else(|| PathBuf::from("summary.csv"));
    write_summary(&summary_path, &records)?;

    let failed: Vec<_> = records.iter().filter(|r| r.status == "error").collect();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        records.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(records.len() - failed.len()).green(),
        style(failed.len()).red()
    );
    println!("{} Summary written to {}", style("✓").green(), summary_path.display());

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for record in &failed {
            println!("  - {}: {}", record.filename, record.error);
        }
    }

    Ok(())
}

const PROGRESS_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}";

fn progress_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(PROGRESS_TEMPLATE)
        .unwrap()
        .progress_chars("=>-")
}

/// Run the whole pipeline for one PDF, writing every stage next to its XML.
fn process_single_file(path: &Path, config: &AixtractConfig) -> anyhow::Result<Scores> {
    let converter = PdfToXmlConverter::from_config(&config.converter);
    let xml_path = converter.convert(path, None)?;
    let work_dir = xml_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let fragments = read_pdf2xml(&xml_path)?.fragment_map();

    let preprocessed = FragmentPreprocessor::from_config(&config.preprocess).process(&fragments);
    write_stage(&work_dir.join("preprocessed.json"), &preprocessed)?;

    let generated = extract_document(&preprocessed, config)?;
    write_stage(&work_dir.join("generated.json"), &generated)?;

    let scores = AlignmentScorer::new().process(&preprocessed.fragment_map(), &generated)?;
    write_stage(&work_dir.join("scores.json"), &scores)?;

    Ok(scores)
}

fn write_stage<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    fs::write(path, serde_json::to_string_pretty(value)?)?;
    debug!("Wrote {}", path.display());
    Ok(())
}

fn write_summary(path: &Path, records: &[RunRecord]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut wtr = csv::Writer::from_path(path)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_template_renders_message() {
        assert!(PROGRESS_TEMPLATE.ends_with("{msg}"));

        let pb = ProgressBar::hidden();
        pb.set_style(progress_style());
        pb.set_length(2);
        pb.inc(2);
        pb.finish_with_message("Complete");

        assert_eq!(pb.message(), "Complete");
        assert!(pb.is_finished());
    }
}
