//! Core library for turning positioned PDF text into structured data.
//!
//! This crate provides:
//! - pdf2xml reading and `pdftohtml` conversion
//! - layout-aware fragment preprocessing (order, deduplicate, split)
//! - retry-driven structured extraction through a generative service
//! - greedy alignment scoring of generated data against ground truth

pub mod error;
pub mod extract;
pub mod models;
pub mod pdf;
pub mod preprocess;
pub mod score;

pub use error::{AixtractError, Result};
pub use extract::{ExtractionController, PromptTemplate};
pub use models::config::AixtractConfig;
pub use models::document::{PageData, PageSize, ParsedDocument, RawFragment};
pub use models::generated::{GeneratedDocument, PageGenerate, StructuredRecord};
pub use models::score::Scores;
pub use models::segments::{PageContent, PreprocessedDocument, Segment};
pub use pdf::{read_pdf2xml, DocumentConverter, PdfToXmlConverter};
pub use preprocess::{FragmentPreprocessor, Preprocessor};
pub use score::{AlignmentScorer, SimilarityMetric, StrSimilarity};

/// Re-export generative service types.
pub use aixtract_genai::{ChatRequest, GenAiError, GenerativeService};
