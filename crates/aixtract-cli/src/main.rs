//! CLI application for structured extraction from PDF datasheets.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{config, convert, evaluate, extract, preprocess, run};

/// aixtract - Turn PDF datasheets into structured JSON with a local LLM
#[derive(Parser)]
#[command(name = "aixtract")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a PDF into pdf2xml with pdftohtml
    Convert(convert::ConvertArgs),

    /// Order, deduplicate and split the text fragments of a pdf2xml file
    Preprocess(preprocess::PreprocessArgs),

    /// Extract structured records from preprocessed segments
    Extract(extract::ExtractArgs),

    /// Score generated records against ground-truth fragments
    Evaluate(evaluate::EvaluateArgs),

    /// Run the full pipeline over PDF files
    Run(run::RunArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Convert(args) => convert::run(args, config_path),
        Commands::Preprocess(args) => preprocess::run(args, config_path),
        Commands::Extract(args) => extract::run(args, config_path),
        Commands::Evaluate(args) => evaluate::run(args),
        Commands::Run(args) => run::run(args, config_path),
        Commands::Config(args) => config::run(args, config_path),
    }
}
