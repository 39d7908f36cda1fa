//! Subcommand implementations.

pub mod config;
pub mod convert;
pub mod evaluate;
pub mod extract;
pub mod preprocess;
pub mod run;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use console::style;
use serde::Serialize;

use aixtract_core::models::config::AixtractConfig;
use aixtract_core::{read_pdf2xml, PreprocessedDocument, RawFragment};

/// Load the config file given with `-c`, or the defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<AixtractConfig> {
    match config_path {
        Some(path) => Ok(AixtractConfig::from_file(Path::new(path))?),
        None => Ok(AixtractConfig::default()),
    }
}

/// Pretty-print `value` to `output`, or to stdout when no path is given.
pub fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> anyhow::Result<()> {
    let content = serde_json::to_string_pretty(value)?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, content)?;
            println!("{} Output written to {}", style("✓").green(), path.display());
        }
        None => println!("{}", content),
    }

    Ok(())
}

/// Load page fragments from a pdf2xml file or a preprocessed JSON file.
///
/// Preprocessed pages contribute their upper segment followed by their lower one.
pub fn load_fragments(path: &Path) -> anyhow::Result<BTreeMap<u32, Vec<RawFragment>>> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "xml" => Ok(read_pdf2xml(path)?.fragment_map()),
        "json" => {
            let document: PreprocessedDocument = serde_json::from_str(&fs::read_to_string(path)?)?;
            Ok(document.fragment_map())
        }
        _ => anyhow::bail!("Unsupported file format: {}", extension),
    }
}
