//! Reads UI XML documents into `formwork_dom::Element` trees.
//!
//! This is deliberately schema-agnostic: it produces the raw attributed tree
//! and leaves version gating and interpretation to the loader.

use std::fs;
use std::path::Path;

use formwork_dom::Element;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed document: {0}")]
    Malformed(String),
    #[error("document has no root element")]
    Empty,
}

pub type Result<T> = std::result::Result<T, ReadError>;

/// Parses a whole document from a string.
pub fn read_str(xml: &str) -> Result<Element> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ReadError::Malformed(e.to_string()))?;
        match event {
            Event::Start(start) => stack.push(element_from(&start)?),
            Event::Empty(start) => {
                let el = element_from(&start)?;
                attach(el, &mut stack, &mut root)?;
            }
            Event::End(_) => {
                // Mismatched close tags are already rejected by the reader.
                let el = stack
                    .pop()
                    .ok_or_else(|| ReadError::Malformed("unbalanced closing tag".into()))?;
                attach(el, &mut stack, &mut root)?;
            }
            Event::Text(text) => {
                let s = text
                    .unescape()
                    .map_err(|e| ReadError::Malformed(e.to_string()))?;
                append_text(&mut stack, &s);
            }
            Event::CData(cdata) => {
                let bytes = cdata.into_inner();
                let s = std::str::from_utf8(&bytes)
                    .map_err(|e| ReadError::Malformed(e.to_string()))?;
                append_text(&mut stack, s);
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctypes.
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(ReadError::Malformed("unclosed element at end of input".into()));
    }
    root.ok_or(ReadError::Empty)
}

/// Parses a whole document from a file.
pub fn read_file(path: &Path) -> Result<Element> {
    let xml = fs::read_to_string(path).map_err(|source| ReadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    read_str(&xml)
}

fn element_from(start: &BytesStart<'_>) -> Result<Element> {
    let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut el = Element::new(tag);
    for attr in start.attributes() {
        let attr = attr.map_err(|e| ReadError::Malformed(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| ReadError::Malformed(e.to_string()))?
            .into_owned();
        el.attrs.insert(key, value);
    }
    Ok(el)
}

fn attach(el: Element, stack: &mut Vec<Element>, root: &mut Option<Element>) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(el),
        None if root.is_none() => *root = Some(el),
        None => return Err(ReadError::Malformed("multiple root elements".into())),
    }
    Ok(())
}

fn append_text(stack: &mut [Element], s: &str) {
    if s.is_empty() {
        return;
    }
    if let Some(top) = stack.last_mut() {
        match &mut top.text {
            Some(existing) => existing.push_str(s),
            None => top.text = Some(s.to_string()),
        }
    }
}
