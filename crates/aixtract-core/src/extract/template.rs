//! Prompt templates with `{{ variable }}` placeholders.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::error::TemplateError;
use crate::models::document::RawFragment;

/// The single variable a prompt template receives.
pub const CONTENT_VARIABLE: &str = "xml_content";

lazy_static! {
    static ref PLACEHOLDER: Regex =
        Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").unwrap();
}

/// Serialize a segment for the prompt: one trimmed fragment per line.
pub fn serialize_segment(fragments: &[RawFragment]) -> String {
    fragments
        .iter()
        .map(|f| f.as_str().trim())
        .collect::<Vec<_>>()
        .join("\n")
}

/// A prompt that embeds one segment's serialized content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    source: String,
}

impl PromptTemplate {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Check that `xml_content` is referenced and nothing else is.
    pub fn validate(&self) -> Result<(), TemplateError> {
        let mut has_content = false;

        for caps in PLACEHOLDER.captures_iter(&self.source) {
            let name = &caps[1];
            if name != CONTENT_VARIABLE {
                return Err(TemplateError::UndefinedVariable(name.to_string()));
            }
            has_content = true;
        }

        if has_content {
            Ok(())
        } else {
            Err(TemplateError::MissingVariable(CONTENT_VARIABLE.to_string()))
        }
    }

    /// Substitute the content into every placeholder.
    pub fn render(&self, content: &str) -> Result<String, TemplateError> {
        self.validate()?;

        Ok(PLACEHOLDER
            .replace_all(&self.source, |_: &Captures| content)
            .into_owned())
    }

    /// Render the template for a segment's fragments.
    pub fn render_segment(&self, fragments: &[RawFragment]) -> Result<String, TemplateError> {
        self.render(&serialize_segment(fragments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_with_and_without_spaces() {
        let template = PromptTemplate::new("A: {{xml_content}}\nB: {{  xml_content }}");
        assert_eq!(template.render("<text/>").unwrap(), "A: <text/>\nB: <text/>");
    }

    #[test]
    fn test_content_is_inserted_literally() {
        let template = PromptTemplate::new("{{ xml_content }}");
        assert_eq!(template.render("costs $1 and $2").unwrap(), "costs $1 and $2");
    }

    #[test]
    fn test_missing_variable() {
        let template = PromptTemplate::new("Extract JSON from the document.");
        assert_eq!(
            template.render("x"),
            Err(TemplateError::MissingVariable("xml_content".to_string()))
        );
    }

    #[test]
    fn test_undefined_variable() {
        let template = PromptTemplate::new("{{ xml_content }} for {{ title }}");
        assert_eq!(
            template.validate(),
            Err(TemplateError::UndefinedVariable("title".to_string()))
        );
    }

    #[test]
    fn test_render_segment() {
        let template = PromptTemplate::new("```xml\n{{ xml_content }}\n```");
        let fragments = vec![
            RawFragment::from("<text top=\"1\">a</text>\n"),
            RawFragment::from("<text top=\"2\">b</text>\n"),
        ];

        assert_eq!(
            template.render_segment(&fragments).unwrap(),
            "```xml\n<text top=\"1\">a</text>\n<text top=\"2\">b</text>\n```"
        );
    }

    #[test]
    fn test_default_prompt_is_valid() {
        let template = PromptTemplate::new(crate::models::config::DEFAULT_PROMPT_TEMPLATE);
        assert!(template.validate().is_ok());
    }
}
