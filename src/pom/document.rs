use crate::error::{PomupError, Result};
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;
use quick_xml::writer::Writer;
use std::fs;
use std::path::Path;

/// A mutable XML document tree.
///
/// Built once from a manifest file, mutated in place during the update pass,
/// and serialized exactly once at the end of a run. Serializing an unmodified
/// tree yields an equivalent document: element structure, namespaces,
/// attributes, text (whitespace included) and comments survive the round
/// trip. Processing instructions and doctypes are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    root: XmlElement,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    raw_name: String,
    namespace: Option<String>,
    local_name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
    Comment(String),
    CData(String),
}

impl XmlDocument {
    /// Read and parse an XML manifest from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            PomupError::PomParsing(format!("Failed to read '{}': {e}", path.display()))
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut reader = NsReader::from_str(content);
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            let (resolution, event) = reader
                .read_resolved_event()
                .map_err(|e| PomupError::PomParsing(format!("Malformed XML: {e}")))?;

            match event {
                Event::Start(start) => {
                    if root.is_some() && stack.is_empty() {
                        return Err(PomupError::PomParsing(
                            "Unexpected content after the document root".to_string(),
                        ));
                    }
                    stack.push(begin_element(resolution, &start)?);
                }
                Event::Empty(start) => {
                    if root.is_some() && stack.is_empty() {
                        return Err(PomupError::PomParsing(
                            "Unexpected content after the document root".to_string(),
                        ));
                    }
                    let element = begin_element(resolution, &start)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(XmlNode::Element(element)),
                        None => root = Some(element),
                    }
                }
                Event::End(_) => {
                    let Some(finished) = stack.pop() else {
                        return Err(PomupError::PomParsing(
                            "Unexpected closing tag".to_string(),
                        ));
                    };
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(XmlNode::Element(finished)),
                        None => root = Some(finished),
                    }
                }
                Event::Text(text) => {
                    let text = text.decode().map_err(|e| {
                        PomupError::PomParsing(format!("Malformed text content: {e}"))
                    })?;
                    match stack.last_mut() {
                        Some(parent) => push_text(parent, &text),
                        None if text.trim().is_empty() => {}
                        None => {
                            return Err(PomupError::PomParsing(
                                "Text content outside the document root".to_string(),
                            ));
                        }
                    }
                }
                Event::GeneralRef(reference) => {
                    let resolved = resolve_reference(reference)?;
                    if let Some(parent) = stack.last_mut() {
                        push_text(parent, &resolved);
                    }
                }
                Event::CData(data) => {
                    if let Some(parent) = stack.last_mut() {
                        let content = String::from_utf8_lossy(&data.into_inner()).into_owned();
                        parent.children.push(XmlNode::CData(content));
                    }
                }
                Event::Comment(comment) => {
                    if let Some(parent) = stack.last_mut() {
                        let content = String::from_utf8_lossy(&comment.into_inner()).into_owned();
                        parent.children.push(XmlNode::Comment(content));
                    }
                }
                Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
                Event::Eof => break,
            }
        }

        if !stack.is_empty() {
            return Err(PomupError::PomParsing(
                "Unexpected end of file inside an open element".to_string(),
            ));
        }

        match root {
            Some(root) => Ok(Self { root }),
            None => Err(PomupError::PomParsing("No root element found".to_string())),
        }
    }

    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut XmlElement {
        &mut self.root
    }

    /// Serialize the tree, UTF-8, with an XML declaration header.
    pub fn to_xml_string(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(serialize_error)?;
        writer
            .write_event(Event::Text(BytesText::from_escaped("\n")))
            .map_err(serialize_error)?;
        write_element(&mut writer, &self.root)?;

        String::from_utf8(writer.into_inner()).map_err(|e| {
            PomupError::PomParsing(format!("Serialized document is not valid UTF-8: {e}"))
        })
    }

    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let xml = self.to_xml_string()?;
        fs::write(path, xml)?;
        Ok(())
    }
}

impl XmlElement {
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn is_named(&self, namespace: &str, local_name: &str) -> bool {
        self.namespace.as_deref() == Some(namespace) && self.local_name == local_name
    }

    /// First direct child element with the given namespace and local name.
    pub fn child(&self, namespace: &str, local_name: &str) -> Option<&XmlElement> {
        self.children.iter().find_map(|node| match node {
            XmlNode::Element(child) if child.is_named(namespace, local_name) => Some(child),
            _ => None,
        })
    }

    pub fn child_mut(&mut self, namespace: &str, local_name: &str) -> Option<&mut XmlElement> {
        self.children.iter_mut().find_map(|node| match node {
            XmlNode::Element(child) if child.is_named(namespace, local_name) => Some(child),
            _ => None,
        })
    }

    /// All descendant elements with the given name, in document order.
    /// Matched elements are not descended into.
    pub fn descendants(&self, namespace: &str, local_name: &str) -> Vec<&XmlElement> {
        let mut found = Vec::new();
        collect_descendants(self, namespace, local_name, &mut found);
        found
    }

    pub fn descendants_mut(
        &mut self,
        namespace: &str,
        local_name: &str,
    ) -> Vec<&mut XmlElement> {
        let mut found = Vec::new();
        collect_descendants_mut(self, namespace, local_name, &mut found);
        found
    }

    /// Text of the first text node, verbatim. `None` for elements without
    /// text content.
    pub fn text(&self) -> Option<&str> {
        self.children.iter().find_map(|node| match node {
            XmlNode::Text(text) => Some(text.as_str()),
            _ => None,
        })
    }

    /// Replace the element's text content in place, inserting a text node if
    /// the element had none.
    pub fn set_text(&mut self, text: &str) {
        for node in self.children.iter_mut() {
            if let XmlNode::Text(existing) = node {
                *existing = text.to_string();
                return;
            }
        }
        self.children.insert(0, XmlNode::Text(text.to_string()));
    }
}

fn begin_element(resolution: ResolveResult, start: &BytesStart) -> Result<XmlElement> {
    let raw_name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let local_name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let namespace = match resolution {
        ResolveResult::Bound(ns) => Some(String::from_utf8_lossy(ns.as_ref()).into_owned()),
        ResolveResult::Unbound | ResolveResult::Unknown(_) => None,
    };

    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute
            .map_err(|e| PomupError::PomParsing(format!("Malformed attribute: {e}")))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|e| PomupError::PomParsing(format!("Malformed attribute value: {e}")))?
            .into_owned();
        attributes.push((key, value));
    }

    Ok(XmlElement {
        raw_name,
        namespace,
        local_name,
        attributes,
        children: Vec::new(),
    })
}

fn push_text(parent: &mut XmlElement, text: &str) {
    if let Some(XmlNode::Text(existing)) = parent.children.last_mut() {
        existing.push_str(text);
    } else {
        parent.children.push(XmlNode::Text(text.to_string()));
    }
}

fn resolve_reference(reference: quick_xml::events::BytesRef) -> Result<String> {
    let name = String::from_utf8_lossy(&reference.into_inner()).into_owned();

    if let Some(code) = name.strip_prefix('#') {
        let value = match code.strip_prefix('x').or_else(|| code.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => code.parse::<u32>().ok(),
        };
        return value
            .and_then(char::from_u32)
            .map(String::from)
            .ok_or_else(|| {
                PomupError::PomParsing(format!("Malformed character reference '&{name};'"))
            });
    }

    let resolved = match name.as_str() {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "apos" => "'",
        "quot" => "\"",
        other => {
            return Err(PomupError::PomParsing(format!(
                "Unsupported entity reference '&{other};'"
            )));
        }
    };
    Ok(resolved.to_string())
}

fn collect_descendants<'a>(
    element: &'a XmlElement,
    namespace: &str,
    local_name: &str,
    found: &mut Vec<&'a XmlElement>,
) {
    for node in &element.children {
        if let XmlNode::Element(child) = node {
            if child.is_named(namespace, local_name) {
                found.push(child);
            } else {
                collect_descendants(child, namespace, local_name, found);
            }
        }
    }
}

fn collect_descendants_mut<'a>(
    element: &'a mut XmlElement,
    namespace: &str,
    local_name: &str,
    found: &mut Vec<&'a mut XmlElement>,
) {
    for node in element.children.iter_mut() {
        if let XmlNode::Element(child) = node {
            if child.is_named(namespace, local_name) {
                found.push(child);
            } else {
                collect_descendants_mut(child, namespace, local_name, found);
            }
        }
    }
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &XmlElement) -> Result<()> {
    let mut start = BytesStart::new(element.raw_name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        writer
            .write_event(Event::Empty(start))
            .map_err(serialize_error)?;
        return Ok(());
    }

    writer
        .write_event(Event::Start(start))
        .map_err(serialize_error)?;

    for node in &element.children {
        match node {
            XmlNode::Element(child) => write_element(writer, child)?,
            XmlNode::Text(text) => writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(serialize_error)?,
            XmlNode::Comment(comment) => writer
                .write_event(Event::Comment(BytesText::from_escaped(comment.as_str())))
                .map_err(serialize_error)?,
            XmlNode::CData(data) => writer
                .write_event(Event::CData(BytesCData::new(data.as_str())))
                .map_err(serialize_error)?,
        }
    }

    writer
        .write_event(Event::End(BytesEnd::new(element.raw_name.as_str())))
        .map_err(serialize_error)?;
    Ok(())
}

fn serialize_error(e: impl std::fmt::Display) -> PomupError {
    PomupError::PomParsing(format!("Failed to serialize document: {e}"))
}
