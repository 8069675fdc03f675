//! Minimal XML element tree built on `quick-xml`.
//!
//! Format parsers are pure functions over an [`XmlDocument`]; this module is
//! the only place that deals with the event stream.

use std::str;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{ParseError, Result};

/// A parsed XML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    root: Element,
}

/// An element with its attributes, child elements and text content.
///
/// Names are local names; namespace prefixes are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
    text: String,
}

impl XmlDocument {
    pub fn parse(input: &str) -> Result<Self> {
        let mut reader = Reader::from_str(input);
        reader.trim_text(false);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let event = reader
                .read_event()
                .map_err(|source| ParseError::Xml {
                    source,
                    position: reader.buffer_position(),
                })?;
            match event {
                Event::Eof => break,
                Event::Start(ref e) => {
                    stack.push(element_from(e, reader.buffer_position())?);
                }
                Event::Empty(ref e) => {
                    let element = element_from(e, reader.buffer_position())?;
                    close(element, &mut stack, &mut root)?;
                }
                Event::End(_) => {
                    // End names are verified against the start tag by the reader.
                    let element = stack.pop().ok_or_else(|| {
                        ParseError::Invalid("unexpected closing tag".to_string())
                    })?;
                    close(element, &mut stack, &mut root)?;
                }
                Event::Text(ref e) => {
                    if let Some(current) = stack.last_mut() {
                        let text = e.unescape().map_err(|source| ParseError::Xml {
                            source,
                            position: reader.buffer_position(),
                        })?;
                        current.text.push_str(&text);
                    }
                }
                Event::CData(e) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                    }
                }
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(ParseError::Invalid(format!(
                "unclosed element <{}>",
                open.name
            )));
        }
        root.map(|root| XmlDocument { root })
            .ok_or_else(|| ParseError::Invalid("document has no root element".to_string()))
    }

    pub fn root(&self) -> &Element {
        &self.root
    }
}

impl Element {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Text directly inside this element, untrimmed.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter()
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.name == name)
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Text of the first child called `name`, trimmed.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.trim())
    }

    /// Every element called `name` below this one, in document order.
    pub fn descendants_named<'a>(&'a self, name: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        collect_descendants(self, name, &mut found);
        found
    }
}

fn collect_descendants<'a>(element: &'a Element, name: &str, found: &mut Vec<&'a Element>) {
    for child in &element.children {
        if child.name == name {
            found.push(child);
        }
        collect_descendants(child, name, found);
    }
}

fn close(element: Element, stack: &mut [Element], root: &mut Option<Element>) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(ParseError::Invalid(format!(
                "multiple root elements (found <{}>)",
                element.name
            )))
        }
    }
    Ok(())
}

fn element_from(e: &BytesStart, position: usize) -> Result<Element> {
    let name = local_name(e.local_name().into_inner())?;
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| ParseError::Xml {
            source: quick_xml::Error::from(err),
            position,
        })?;
        let key = local_name(attr.key.local_name().into_inner())?;
        let value = attr
            .unescape_value()
            .map_err(|source| ParseError::Xml { source, position })?;
        attributes.push((key, value.into_owned()));
    }
    Ok(Element {
        name,
        attributes,
        ..Default::default()
    })
}

fn local_name(bytes: &[u8]) -> Result<String> {
    str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| ParseError::Invalid(format!("non UTF-8 name: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tree() {
        let doc = XmlDocument::parse(
            r#"<?xml version="1.0" encoding="utf-8"?>
<root version="2">
  <item id="1">first</item>
  <group><item id="2"/></group>
  <item id="3"><![CDATA[a < b]]></item>
</root>"#,
        )
        .unwrap();

        let root = doc.root();
        assert_eq!(root.name(), "root");
        assert_eq!(root.attr("version"), Some("2"));
        assert_eq!(root.attr("missing"), None);

        let direct: Vec<_> = root.children_named("item").collect();
        assert_eq!(direct.len(), 2);
        assert_eq!(direct[0].text(), "first");
        assert_eq!(direct[1].text(), "a < b");

        let all = root.descendants_named("item");
        let ids: Vec<_> = all.iter().filter_map(|e| e.attr("id")).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_text_keeps_leading_whitespace_and_unescapes() {
        let doc = XmlDocument::parse("<l>    if (a &amp;&amp; b)</l>").unwrap();
        assert_eq!(doc.root().text(), "    if (a && b)");
    }

    #[test]
    fn test_namespaces_are_dropped() {
        let doc = XmlDocument::parse(
            r#"<x:CoverageDSPriv xmlns:x="urn:test"><x:Lines x:id="1"/></x:CoverageDSPriv>"#,
        )
        .unwrap();
        assert_eq!(doc.root().name(), "CoverageDSPriv");
        let lines = doc.root().child("Lines").unwrap();
        assert_eq!(lines.attr("id"), Some("1"));
    }

    #[test]
    fn test_child_text_is_trimmed() {
        let doc = XmlDocument::parse("<a><n>\n  42\n</n></a>").unwrap();
        assert_eq!(doc.root().child_text("n"), Some("42"));
    }

    #[test]
    fn test_rejects_malformed_documents() {
        assert!(XmlDocument::parse("").is_err());
        assert!(XmlDocument::parse("   ").is_err());
        assert!(XmlDocument::parse("<a><b></a>").is_err());
        assert!(XmlDocument::parse("<a><b>").is_err());
        assert!(XmlDocument::parse("<a/><b/>").is_err());
    }
}
