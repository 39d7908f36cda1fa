//! Error types for the aixtract-core library.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::segments::Segment;

/// Main error type for the aixtract library.
#[derive(Error, Debug)]
pub enum AixtractError {
    /// pdf2xml reading error.
    #[error("reader error: {0}")]
    Reader(#[from] ReaderError),

    /// PDF conversion error.
    #[error("conversion error: {0}")]
    Convert(#[from] ConvertError),

    /// Fragment preprocessing error.
    #[error("preprocessing error: {0}")]
    Preprocess(#[from] PreprocessError),

    /// Structured extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Scoring error.
    #[error("scoring error: {0}")]
    Score(#[from] ScoreError),

    /// Generative service error outside of the retry loop.
    #[error("generative service error: {0}")]
    GenAi(#[from] aixtract_genai::GenAiError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to reading pdf2xml documents.
#[derive(Error, Debug)]
pub enum ReaderError {
    /// The XML file does not exist.
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// The file does not carry the `.xml` extension.
    #[error("expected an XML file, got {0}")]
    UnexpectedExtension(PathBuf),

    /// The document root is not `<pdf2xml>`.
    #[error("expected root tag <pdf2xml>, got <{0}>")]
    UnexpectedRoot(String),

    /// A `<page>` element is missing its number.
    #[error("page element without a valid number attribute")]
    MissingPageNumber,

    /// The XML is not well formed.
    #[error("malformed XML: {0}")]
    Malformed(String),

    /// Low-level XML error.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// I/O error while reading the file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to running the external PDF converter.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// The PDF file does not exist.
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// The file does not carry the `.pdf` extension.
    #[error("expected a PDF file, got {0}")]
    UnexpectedExtension(PathBuf),

    /// The converter could not be started.
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The converter exited with a failure status.
    #[error("`{command}` failed: {stderr}")]
    ToolFailed { command: String, stderr: String },
}

/// Errors related to fragment preprocessing.
#[derive(Error, Debug)]
pub enum PreprocessError {
    /// A page's value is not a list of fragments.
    #[error("expected a list of text elements for page {page}")]
    Validation { page: String },

    /// A page key is not a page number.
    #[error("invalid page number '{page}'")]
    InvalidPage { page: String },
}

/// Errors related to prompt templates.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// The template never references the required variable.
    #[error("prompt missing required template variable '{0}'")]
    MissingVariable(String),

    /// The template references a variable that is never provided.
    #[error("prompt references undefined template variable '{0}'")]
    UndefinedVariable(String),
}

/// Errors related to structured extraction.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Invalid controller configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The prompt template could not be rendered.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Every attempt produced unparseable output.
    #[error("invalid JSON format after {retries} retries (last failure: {last_failure})")]
    ExhaustedRetries { retries: u32, last_failure: String },

    /// A failure while extracting one segment of one page.
    #[error("page {page} segment {segment}: {source}")]
    Segment {
        page: u32,
        segment: Segment,
        #[source]
        source: Box<ExtractionError>,
    },
}

impl ExtractionError {
    /// Attach page/segment context to an error.
    pub fn in_segment(self, page: u32, segment: Segment) -> Self {
        ExtractionError::Segment {
            page,
            segment,
            source: Box::new(self),
        }
    }
}

/// Errors related to alignment scoring.
#[derive(Error, Debug)]
pub enum ScoreError {
    /// A ground-truth page has no generated counterpart.
    #[error("no generated data for page {page}")]
    MissingPage { page: u32 },

    /// A generated page does not hold the expected segments.
    #[error("page {page} has {found} generated segments, expected upper and lower")]
    UnexpectedSegments { page: u32, found: usize },

    /// A ground-truth fragment is not a well-formed text element.
    #[error("malformed ground-truth fragment: {0}")]
    MalformedFragment(String),
}

/// Result type for the aixtract library.
pub type Result<T> = std::result::Result<T, AixtractError>;
