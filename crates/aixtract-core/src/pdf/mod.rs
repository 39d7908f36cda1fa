//! PDF conversion and pdf2xml reading.

mod converter;
mod reader;

pub use converter::{DocumentConverter, PdfToXmlConverter};
pub use reader::{parse_pdf2xml, read_pdf2xml};

use crate::error::ReaderError;

/// Result type for pdf2xml reading.
pub type Result<T> = std::result::Result<T, ReaderError>;
