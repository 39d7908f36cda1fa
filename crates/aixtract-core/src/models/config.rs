//! Configuration structures for the extraction pipeline.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Prompt sent for every segment. `{{ xml_content }}` receives the segment's fragments.
pub const DEFAULT_PROMPT_TEMPLATE: &str = r#"The following XML content was converted from a PDF using `pdf2xml`. Your task is to extract structured information from this XML based on the `<text>` tags, focusing on the actual text content and its positions (`top`, `left`).
### XML Content:
```xml
{{ xml_content }}
```
Please convert the extracted information into a well-structured JSON format, organized by section headers and their corresponding key-value pairs. Do not include any attribute metadata in the JSON. Ensure that the JSON syntax is valid, with proper indentation, brackets, and quotation marks.
Output only the JSON."#;

/// Main configuration for the aixtract pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AixtractConfig {
    /// Fragment preprocessing configuration.
    pub preprocess: PreprocessConfig,

    /// Generative service and extraction configuration.
    pub generation: GenerationConfig,

    /// External PDF converter configuration.
    pub converter: ConverterConfig,
}

/// Fragment preprocessing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Maximum vertical distance between duplicate fragments.
    pub top_tolerance: u64,

    /// Maximum horizontal distance between duplicate fragments.
    pub left_tolerance: u64,

    /// Order fragments bottom to top instead of top to bottom.
    pub descending: bool,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            top_tolerance: 5,
            left_tolerance: 5,
            descending: false,
        }
    }
}

/// Generative service and extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Base URL of the Ollama API.
    pub endpoint: String,

    /// Model identifier passed with every request.
    pub model: String,

    /// Attempts per segment before giving up.
    pub max_retries: u32,

    /// Prompt template, must reference `{{ xml_content }}`.
    pub prompt_template: String,

    /// Per-request timeout in seconds (none = wait indefinitely).
    pub timeout_secs: Option<u64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:11434/".to_string(),
            model: "llama3.2:1b".to_string(),
            max_retries: 5,
            prompt_template: DEFAULT_PROMPT_TEMPLATE.to_string(),
            timeout_secs: None,
        }
    }
}

/// External PDF converter configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Converter executable.
    pub command: String,

    /// Directory for converted XML files (default: next to each PDF).
    pub output_dir: Option<PathBuf>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            command: "pdftohtml".to_string(),
            output_dir: None,
        }
    }
}

impl AixtractConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Connection settings for the Ollama backend.
    pub fn ollama(&self) -> aixtract_genai::OllamaConfig {
        aixtract_genai::OllamaConfig {
            endpoint: self.generation.endpoint.clone(),
            timeout_secs: self.generation.timeout_secs,
        }
    }
}
