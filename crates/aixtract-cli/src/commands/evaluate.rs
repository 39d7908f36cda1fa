//! Evaluate command - score generated records against ground truth.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;

use aixtract_core::models::score::MEAN_KEY;
use aixtract_core::score::metric_by_name;
use aixtract_core::{AlignmentScorer, GeneratedDocument, Scores};

use super::load_fragments;

/// Arguments for the evaluate command.
#[derive(Args)]
pub struct EvaluateArgs {
    /// Ground truth: pdf2xml file or preprocessed JSON
    #[arg(required = true)]
    ground_truth: PathBuf,

    /// Generated JSON file
    #[arg(required = true)]
    generated: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Similarity metric
    #[arg(long, default_value = "str_similarity")]
    metric: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub fn run(args: EvaluateArgs) -> anyhow::Result<()> {
    let metric = metric_by_name(&args.metric)
        .ok_or_else(|| anyhow::anyhow!("Unknown metric: {}", args.metric))?;

    let ground_truth = load_fragments(&args.ground_truth)?;

    if !args.generated.exists() {
        anyhow::bail!("Input file not found: {}", args.generated.display());
    }
    let generated: GeneratedDocument = serde_json::from_str(&fs::read_to_string(&args.generated)?)?;

    let scores = AlignmentScorer::with_metric(metric).process(&ground_truth, &generated)?;
    let output = format_scores(&scores, args.format)?;

    if let Some(path) = &args.output {
        fs::write(path, &output)?;
        println!("{} Output written to {}", style("✓").green(), path.display());
    } else {
        println!("{}", output);
    }

    Ok(())
}

pub fn format_scores(scores: &Scores, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(scores)?),
        OutputFormat::Csv => format_scores_csv(scores),
        OutputFormat::Text => Ok(format_scores_text(scores)),
    }
}

fn score_cell(score: Option<f64>) -> String {
    score.map(|s| format!("{:.2}", s)).unwrap_or_default()
}

fn format_scores_csv(scores: &Scores) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["page", "score"])?;
    for (page, score) in &scores.pages {
        wtr.write_record([page.to_string(), score_cell(*score)])?;
    }
    wtr.write_record([MEAN_KEY.to_string(), score_cell(scores.mean)])?;

    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn format_scores_text(scores: &Scores) -> String {
    let mut output = String::new();

    for (page, score) in &scores.pages {
        match score {
            Some(value) => output.push_str(&format!("Page {:>4}: {:.2}\n", page, value)),
            None => output.push_str(&format!("Page {:>4}: n/a (no text)\n", page)),
        }
    }

    match scores.mean {
        Some(mean) => output.push_str(&format!("Similarity score: {:.2}", mean)),
        None => output.push_str("Similarity score: n/a"),
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn scores() -> Scores {
        Scores::from_pages(BTreeMap::from([(1, Some(1.0)), (2, None), (3, Some(0.5))]))
    }

    #[test]
    fn test_csv_format() {
        let csv = format_scores(&scores(), OutputFormat::Csv).unwrap();
        assert_eq!(csv, "page,score\n1,1.00\n2,\n3,0.50\nmean,0.75\n");
    }

    #[test]
    fn test_text_format() {
        let text = format_scores(&scores(), OutputFormat::Text).unwrap();
        assert!(text.contains("Page    2: n/a (no text)"));
        assert!(text.ends_with("Similarity score: 0.75"));
    }
}
