//! pdf2xml document reading.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, info};

use super::Result;
use crate::error::ReaderError;
use crate::models::document::{PageData, PageSize, ParsedDocument, RawFragment};

const ROOT_TAG: &[u8] = b"pdf2xml";
const PAGE_TAG: &[u8] = b"page";
const TEXT_TAG: &[u8] = b"text";

/// Read a pdf2xml file produced by `pdftohtml -xml`.
pub fn read_pdf2xml(path: impl AsRef<Path>) -> Result<ParsedDocument> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ReaderError::NotFound(path.to_path_buf()));
    }
    let is_xml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("xml"));
    if !is_xml {
        return Err(ReaderError::UnexpectedExtension(path.to_path_buf()));
    }

    let xml = fs::read_to_string(path)?;
    let document = parse_pdf2xml(&xml)?;

    info!("Read {} pages from {}", document.page_count(), path.display());
    Ok(document)
}

/// Parse pdf2xml source.
///
/// Each fragment is the verbatim source of a `<text>` element that is a direct
/// child of a `<page>`.
pub fn parse_pdf2xml(xml: &str) -> Result<ParsedDocument> {
    let mut reader = Reader::from_str(xml);
    let mut document = ParsedDocument::default();
    let mut root_seen = false;
    let mut current: Option<(u32, PageData)> = None;
    // Depth below the current <page>; text elements are taken at depth 0 only.
    let mut page_depth = 0usize;

    loop {
        let start = reader.buffer_position() as usize;

        match reader.read_event()? {
            Event::Start(e) if !root_seen => {
                check_root(&e)?;
                root_seen = true;
            }
            Event::Empty(e) if !root_seen => {
                check_root(&e)?;
                root_seen = true;
            }
            Event::Start(e) if e.name().as_ref() == PAGE_TAG && current.is_none() => {
                current = Some(page_header(&e)?);
                page_depth = 0;
            }
            Event::Empty(e) if e.name().as_ref() == PAGE_TAG && current.is_none() => {
                let (number, data) = page_header(&e)?;
                document.pages.insert(number, data);
            }
            Event::Start(e) if e.name().as_ref() == TEXT_TAG && page_depth == 0 => {
                reader.read_to_end(e.name())?;
                if let Some((_, page)) = current.as_mut() {
                    let end = reader.buffer_position() as usize;
                    page.fragments.push(RawFragment::new(&xml[start..end]));
                }
            }
            Event::Empty(e) if e.name().as_ref() == TEXT_TAG && page_depth == 0 => {
                if let Some((_, page)) = current.as_mut() {
                    let end = reader.buffer_position() as usize;
                    page.fragments.push(RawFragment::new(&xml[start..end]));
                }
            }
            Event::Start(_) => {
                if current.is_some() {
                    page_depth += 1;
                }
            }
            Event::End(e) => {
                if current.is_some() && page_depth == 0 && e.name().as_ref() == PAGE_TAG {
                    if let Some((number, data)) = current.take() {
                        debug!("Page {}: {} text fragments", number, data.fragments.len());
                        document.pages.insert(number, data);
                    }
                } else if current.is_some() {
                    page_depth = page_depth.saturating_sub(1);
                }
            }
            Event::Text(t) if !root_seen => {
                let text = t
                    .unescape()
                    .map_err(|e| ReaderError::Malformed(e.to_string()))?;
                if !text.trim().is_empty() {
                    return Err(ReaderError::Malformed("text before the root element".to_string()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !root_seen {
        return Err(ReaderError::Malformed("no root element".to_string()));
    }
    if current.is_some() {
        return Err(ReaderError::Malformed("unclosed <page> element".to_string()));
    }

    Ok(document)
}

fn check_root(e: &BytesStart<'_>) -> Result<()> {
    if e.name().as_ref() == ROOT_TAG {
        Ok(())
    } else {
        Err(ReaderError::UnexpectedRoot(
            String::from_utf8_lossy(e.name().as_ref()).into_owned(),
        ))
    }
}

fn page_header(e: &BytesStart<'_>) -> Result<(u32, PageData)> {
    let number = attribute(e, "number")?
        .and_then(|v| v.trim().parse::<u32>().ok())
        .ok_or(ReaderError::MissingPageNumber)?;

    let float = |key: &str| -> Result<f64> {
        Ok(attribute(e, key)?
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0.0))
    };

    let size = PageSize {
        top: float("top")?,
        left: float("left")?,
        height: float("height")?,
        width: float("width")?,
    };

    Ok((
        number,
        PageData {
            size,
            fragments: Vec::new(),
        },
    ))
}

fn attribute(e: &BytesStart<'_>, key: &str) -> Result<Option<String>> {
    let Some(attr) = e
        .try_get_attribute(key)
        .map_err(|err| ReaderError::Malformed(err.to_string()))?
    else {
        return Ok(None);
    };

    let value = attr
        .unescape_value()
        .map_err(|err| ReaderError::Malformed(err.to_string()))?;
    Ok(Some(value.into_owned()))
}
