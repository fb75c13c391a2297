//! Owned XML fragment tree used by the embedded-data extractors.
//!
//! Raw rows carry HOT2000 house-file snippets as text. [`Element::from_string`]
//! parses one snippet into a small immutable tree that can be navigated with
//! slash-separated paths (see [`path`]) and serialized back to canonical text.

pub mod path;

use std::fmt;
use std::str::FromStr;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{EnerguideError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Parse a single-rooted fragment.
    pub fn from_string(data: &str) -> Result<Self> {
        let malformed = |reason: String| {
            EnerguideError::MalformedFragment(format!("{}: {}", reason, abbreviate(data)))
        };

        let mut reader = Reader::from_str(data);
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;
        let mut buf = Vec::new();

        loop {
            let event = reader
                .read_event_into(&mut buf)
                .map_err(|e| malformed(format!("XML parse error at {}: {}", reader.buffer_position(), e)))?;

            match event {
                Event::Start(ref e) => {
                    if root.is_some() {
                        return Err(malformed("more than one root element".to_string()));
                    }
                    stack.push(start_element(e).map_err(malformed)?);
                }
                Event::Empty(ref e) => {
                    let element = start_element(e).map_err(malformed)?;
                    attach(&mut stack, &mut root, element).map_err(malformed)?;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| malformed("unexpected closing tag".to_string()))?;
                    attach(&mut stack, &mut root, element).map_err(malformed)?;
                }
                Event::Text(ref e) => {
                    let raw = String::from_utf8_lossy(e);
                    let text = quick_xml::escape::unescape(&raw)
                        .map_err(|e| malformed(format!("bad text content: {}", e)))?;
                    push_text(&mut stack, &text).map_err(malformed)?;
                }
                Event::CData(ref e) => {
                    let raw = String::from_utf8_lossy(e);
                    push_text(&mut stack, &raw).map_err(malformed)?;
                }
                Event::GeneralRef(ref e) => {
                    let name = String::from_utf8_lossy(e);
                    let resolved = resolve_entity(&name)
                        .ok_or_else(|| malformed(format!("unknown entity &{};", name)))?;
                    push_text(&mut stack, &resolved).map_err(malformed)?;
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if !stack.is_empty() {
            return Err(malformed(format!("unclosed element <{}>", stack[stack.len() - 1].tag)));
        }
        root.ok_or_else(|| malformed("no root element".to_string()))
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attrib(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Child elements in document order.
    pub fn children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// Concatenated direct text content, or `None` for an element without text.
    pub fn text(&self) -> Option<String> {
        let mut out: Option<String> = None;
        for node in &self.children {
            if let Node::Text(text) = node {
                out.get_or_insert_with(String::new).push_str(text);
            }
        }
        out
    }

    pub fn xpath(&self, path: &str) -> Vec<&Element> {
        path::select(self, path)
    }

    pub fn find(&self, path: &str) -> Option<&Element> {
        self.xpath(path).into_iter().next()
    }

    /// Text of the first element at `path`; an element with no text yields `""`.
    pub fn findtext(&self, path: &str) -> Option<String> {
        self.find(path).map(|node| node.text().unwrap_or_default())
    }

    pub fn get_text(&self, path: &str) -> Result<String> {
        self.findtext(path).ok_or_else(|| {
            EnerguideError::MissingValue(format!(
                "Couldn't find text at path {} in tag {}",
                path, self.tag
            ))
        })
    }

    /// Resolve `path` to a leaf value (`@attr`, `text()`, or an element's text)
    /// and convert it to `T`.
    pub fn get<T: FromStr>(&self, path: &str) -> Result<T> {
        let value = path::select_value(self, path).ok_or_else(|| {
            EnerguideError::MissingValue(format!(
                "Couldn't find element at {} in {}",
                path, self.tag
            ))
        })?;

        value.trim().parse::<T>().map_err(|_| {
            EnerguideError::MissingValue(format!(
                "Unable to cast {} to {} in {}",
                value,
                std::any::type_name::<T>(),
                self.tag
            ))
        })
    }

    /// [`Element::get`] for `f64`, rejecting `inf` and `NaN`.
    pub fn get_number(&self, path: &str) -> Result<f64> {
        let value = self.get::<f64>(path)?;
        if !value.is_finite() {
            return Err(EnerguideError::MissingValue(format!(
                "Non-finite number {} at {} in {}",
                value, path, self.tag
            )));
        }
        Ok(value)
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (key, value) in &self.attributes {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&quick_xml::escape::escape(value.as_str()));
            out.push('"');
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for node in &self.children {
            match node {
                Node::Element(child) => child.write_to(out),
                Node::Text(text) => out.push_str(&quick_xml::escape::escape(text.as_str())),
            }
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

/// Canonical serialization: attributes in source order, whitespace-only text dropped.
impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_to(&mut out);
        f.write_str(&out)
    }
}

impl FromStr for Element {
    type Err = EnerguideError;

    fn from_str(s: &str) -> Result<Self> {
        Element::from_string(s)
    }
}

fn start_element(start: &BytesStart) -> std::result::Result<Element, String> {
    let tag = String::from_utf8_lossy(start.name().as_ref()).to_string();
    let mut element = Element::new(tag);
    for attr in start.attributes() {
        let attr = attr.map_err(|e| format!("bad attribute on <{}>: {}", element.tag, e))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let raw = String::from_utf8_lossy(&attr.value).to_string();
        let value = quick_xml::escape::unescape(&raw)
            .map_err(|e| format!("bad attribute value {}={:?}: {}", key, raw, e))?
            .to_string();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> std::result::Result<(), String> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(Node::Element(element));
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err("more than one root element".to_string()),
    }
}

fn push_text(stack: &mut [Element], text: &str) -> std::result::Result<(), String> {
    let Some(parent) = stack.last_mut() else {
        if text.trim().is_empty() {
            return Ok(());
        }
        return Err("text outside of the root element".to_string());
    };

    if let Some(Node::Text(existing)) = parent.children.last_mut() {
        existing.push_str(text);
        return Ok(());
    }
    if text.trim().is_empty() {
        return Ok(());
    }
    parent.children.push(Node::Text(text.to_string()));
    Ok(())
}

fn resolve_entity(name: &str) -> Option<String> {
    if let Some(code) = name.strip_prefix('#') {
        let value = match code.strip_prefix('x').or_else(|| code.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => code.parse::<u32>().ok()?,
        };
        return char::from_u32(value).map(String::from);
    }
    let resolved = match name {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        _ => return None,
    };
    Some(resolved.to_string())
}

fn abbreviate(data: &str) -> String {
    const LIMIT: usize = 120;
    let trimmed = data.trim();
    if trimmed.chars().count() <= LIMIT {
        return trimmed.to_string();
    }
    let head: String = trimmed.chars().take(LIMIT).collect();
    format!("{}...", head)
}
