//! Preprocess command - segment the fragments of a document.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use tracing::info;

use aixtract_core::{read_pdf2xml, FragmentPreprocessor, PreprocessedDocument, Preprocessor};

use super::{load_config, write_json};

/// Arguments for the preprocess command.
#[derive(Args)]
pub struct PreprocessArgs {
    /// pdf2xml file, or a JSON object of page -> [fragment, ...]
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Order fragments bottom to top
    #[arg(long)]
    descending: bool,
}

pub fn run(args: PreprocessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let preprocessor = FragmentPreprocessor::from_config(&config.preprocess)
        .with_descending(args.descending || config.preprocess.descending);

    let extension = args
        .input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let document: PreprocessedDocument = match extension.as_str() {
        "xml" => preprocessor.process(&read_pdf2xml(&args.input)?.fragment_map()),
        "json" => {
            let data: serde_json::Value = serde_json::from_str(&fs::read_to_string(&args.input)?)?;
            preprocessor.process_json(&data)?
        }
        _ => anyhow::bail!("Unsupported file format: {}", extension),
    };

    info!("Preprocessed {} pages", document.pages.len());
    write_json(&document, args.output.as_deref())
}
