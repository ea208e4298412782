//! XML files, read into a nested mapping.
//!
//! The document becomes `{root_tag: content}`. An element holding only text maps to
//! that string, an empty element to null, and anything else to a mapping of its
//! children. Attributes are stored as `@name`, text next to children as `#text`,
//! and repeated child tags collect into a list.

use super::{FileFormat, FormatError, FormatParser};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use serde_json::{Map, Value};

pub struct XmlParser;

impl FormatParser for XmlParser {
    fn format(&self) -> FileFormat {
        FileFormat::Xml
    }

    fn parse(&self, raw: &str) -> Result<Map<String, Value>, FormatError> {
        let mut reader = Reader::from_str(raw);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut document = Map::new();

        loop {
            match reader.read_event().map_err(xml_error)? {
                Event::Start(start) => stack.push(Element::open(&start)?),
                Event::Empty(start) => {
                    let element = Element::open(&start)?;
                    close(element, &mut stack, &mut document);
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| xml_error("closing tag without an open element"))?;
                    close(element, &mut stack, &mut document);
                }
                Event::Text(text) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&text.unescape().map_err(xml_error)?);
                    }
                }
                Event::CData(data) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                    }
                }
                Event::Eof => break,
                // declarations, comments, processing instructions, doctype
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(xml_error(format!("unclosed element <{}>", open.name)));
        }
        if document.is_empty() {
            return Err(xml_error("document has no root element"));
        }
        Ok(document)
    }
}

struct Element {
    name: String,
    children: Map<String, Value>,
    text: String,
}

impl Element {
    fn open(start: &BytesStart<'_>) -> Result<Self, FormatError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut children = Map::new();
        for attr in start.attributes() {
            let attr = attr.map_err(xml_error)?;
            let key = format!("@{}", String::from_utf8_lossy(attr.key.as_ref()));
            let value = attr.unescape_value().map_err(xml_error)?;
            children.insert(key, Value::String(value.into_owned()));
        }
        Ok(Self {
            name,
            children,
            text: String::new(),
        })
    }

    fn into_value(self) -> Value {
        if self.children.is_empty() {
            if self.text.is_empty() {
                return Value::Null;
            }
            return Value::String(self.text);
        }
        let mut children = self.children;
        if !self.text.is_empty() {
            children.insert("#text".to_string(), Value::String(self.text));
        }
        Value::Object(children)
    }
}

fn close(element: Element, stack: &mut [Element], document: &mut Map<String, Value>) {
    let name = element.name.clone();
    let value = element.into_value();
    let target = match stack.last_mut() {
        Some(parent) => &mut parent.children,
        None => document,
    };
    add_child(target, name, value);
}

fn add_child(target: &mut Map<String, Value>, name: String, value: Value) {
    match target.get_mut(&name) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            target.insert(name, value);
        }
    }
}

fn xml_error(err: impl std::fmt::Display) -> FormatError {
    FormatError::new(FileFormat::Xml, err)
}
