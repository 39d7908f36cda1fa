//! PDF to pdf2xml conversion through `pdftohtml`.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::error::ConvertError;
use crate::models::config::ConverterConfig;

/// Trait for PDF to pdf2xml converters.
pub trait DocumentConverter {
    /// Convert `pdf`, writing the XML to `save_path` or a derived location.
    ///
    /// Returns the path of the written XML file.
    fn convert(&self, pdf: &Path, save_path: Option<&Path>) -> Result<PathBuf, ConvertError>;
}

/// Runs `pdftohtml -xml` as a child process.
#[derive(Debug, Clone)]
pub struct PdfToXmlConverter {
    command: String,
    output_dir: Option<PathBuf>,
}

impl PdfToXmlConverter {
    pub fn new() -> Self {
        Self {
            command: "pdftohtml".to_string(),
            output_dir: None,
        }
    }

    pub fn from_config(config: &ConverterConfig) -> Self {
        Self {
            command: config.command.clone(),
            output_dir: config.output_dir.clone(),
        }
    }

    /// Use a different converter executable.
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }

    /// Write derived XML paths under this directory instead of beside the PDF.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// `<base>/<stem>/<stem>.xml`, where base is the output dir or the PDF's directory.
    pub fn default_save_path(&self, pdf: &Path) -> PathBuf {
        let stem = pdf
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());

        let base = self
            .output_dir
            .clone()
            .or_else(|| pdf.parent().map(Path::to_path_buf))
            .unwrap_or_default();

        base.join(&stem).join(format!("{}.xml", stem))
    }
}

impl Default for PdfToXmlConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentConverter for PdfToXmlConverter {
    fn convert(&self, pdf: &Path, save_path: Option<&Path>) -> Result<PathBuf, ConvertError> {
        if !pdf.exists() {
            return Err(ConvertError::NotFound(pdf.to_path_buf()));
        }
        let is_pdf = pdf
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
        if !is_pdf {
            return Err(ConvertError::UnexpectedExtension(pdf.to_path_buf()));
        }

        let target = match save_path {
            Some(path) => path.to_path_buf(),
            None => self.default_save_path(pdf),
        };

        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ConvertError::Spawn {
                command: self.command.clone(),
                source,
            })?;
        }

        debug!("Running {} -xml {} {}", self.command, pdf.display(), target.display());

        let output = Command::new(&self.command)
            .arg("-xml")
            .arg(pdf)
            .arg(&target)
            .output()
            .map_err(|source| ConvertError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ConvertError::ToolFailed {
                command: self.command.clone(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        info!("Converted {} -> {}", pdf.display(), target.display());
        Ok(target)
    }
}
