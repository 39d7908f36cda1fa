//! Convert command - run pdftohtml on a single PDF.

use std::path::PathBuf;

use clap::Args;
use console::style;

use aixtract_core::{read_pdf2xml, DocumentConverter, PdfToXmlConverter};

use super::load_config;

/// Arguments for the convert command.
#[derive(Args)]
pub struct ConvertArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Output XML file (default: <dir>/<stem>/<stem>.xml)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: ConvertArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let converter = PdfToXmlConverter::from_config(&config.converter);

    let xml_path = converter.convert(&args.input, args.output.as_deref())?;
    let document = read_pdf2xml(&xml_path)?;

    println!(
        "{} Converted {} ({} pages) to {}",
        style("✓").green(),
        args.input.display(),
        document.page_count(),
        xml_path.display()
    );

    Ok(())
}
