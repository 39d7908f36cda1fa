//! Parsing of individual `<text>` fragments.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Tag name of a positioned text element.
pub const TEXT_TAG: &[u8] = b"text";

/// Tag name marking emphasized (bold) content.
pub const EMPHASIS_TAG: &[u8] = b"b";

/// A positioned text element decoded from its serialized form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextElement {
    /// Vertical offset (`top` attribute, 0 when absent or unparsable).
    pub top: i64,
    /// Horizontal offset (`left` attribute, 0 when absent or unparsable).
    pub left: i64,
    /// Whether any descendant element is an emphasis tag.
    pub emphasized: bool,
    /// Text nodes in document order, including nested markup.
    pub texts: Vec<String>,
}

impl TextElement {
    /// Concatenated inner text, untrimmed.
    pub fn content(&self) -> String {
        self.texts.concat()
    }
}

/// Why a fragment could not be decoded as a text element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentError {
    /// Not well-formed XML, or not exactly one root element.
    Malformed(String),
    /// Well-formed, but the root element is not `<text>`.
    NotText(String),
}

/// Decode one serialized fragment.
pub fn parse_text_element(xml: &str) -> Result<TextElement, FragmentError> {
    let mut reader = Reader::from_str(xml);
    let mut depth = 0usize;
    let mut element: Option<TextElement> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                open_element(&e, depth, &mut element)?;
                depth += 1;
            }
            Ok(Event::Empty(e)) => {
                open_element(&e, depth, &mut element)?;
            }
            Ok(Event::End(_)) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| FragmentError::Malformed("unbalanced end tag".to_string()))?;
            }
            Ok(Event::Text(t)) => {
                let text = t
                    .unescape()
                    .map_err(|e| FragmentError::Malformed(e.to_string()))?;
                match element.as_mut() {
                    Some(el) if depth > 0 => el.texts.push(text.into_owned()),
                    _ if text.trim().is_empty() => {}
                    _ => {
                        return Err(FragmentError::Malformed(
                            "text outside of the root element".to_string(),
                        ))
                    }
                }
            }
            Ok(Event::CData(c)) => {
                if let Some(el) = element.as_mut().filter(|_| depth > 0) {
                    el.texts.push(String::from_utf8_lossy(&c).into_owned());
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(FragmentError::Malformed(e.to_string())),
            _ => {}
        }
    }

    if depth != 0 {
        return Err(FragmentError::Malformed("unclosed element".to_string()));
    }

    element.ok_or_else(|| FragmentError::Malformed("no root element".to_string()))
}

/// Handle an opening tag at the given nesting depth.
fn open_element(
    e: &BytesStart<'_>,
    depth: usize,
    element: &mut Option<TextElement>,
) -> Result<(), FragmentError> {
    let name = e.name();

    if depth == 0 {
        if element.is_some() {
            return Err(FragmentError::Malformed("more than one root element".to_string()));
        }
        if name.as_ref() != TEXT_TAG {
            return Err(FragmentError::NotText(
                String::from_utf8_lossy(name.as_ref()).into_owned(),
            ));
        }
        *element = Some(TextElement {
            top: int_attribute(e, "top")?,
            left: int_attribute(e, "left")?,
            emphasized: false,
            texts: Vec::new(),
        });
    } else if name.as_ref() == EMPHASIS_TAG {
        if let Some(el) = element.as_mut() {
            el.emphasized = true;
        }
    }

    Ok(())
}

fn int_attribute(e: &BytesStart<'_>, key: &str) -> Result<i64, FragmentError> {
    let attr = e
        .try_get_attribute(key)
        .map_err(|err| FragmentError::Malformed(err.to_string()))?;

    let Some(attr) = attr else {
        return Ok(0);
    };

    let value = attr
        .unescape_value()
        .map_err(|err| FragmentError::Malformed(err.to_string()))?;

    Ok(value.trim().parse().unwrap_or(0))
}
