//! Owned XML element tree built from quick-xml pull events.
//!
//! Names are reduced to their local part so lookups ignore namespace
//! prefixes. Values are kept escaped and decoded on access, so a bad entity
//! only affects the entity that reads it.

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::escape::{escape, unescape};
use quick_xml::events::{BytesStart, Event};

use crate::error::{CddParseError, NodeError};

/// Read access to an XML element, independent of the backing tree.
pub trait XmlNode {
    /// Local element name.
    fn name(&self) -> &str;
    /// Decoded attribute value, looked up by local name.
    fn attribute(&self, name: &str) -> Result<Option<Cow<'_, str>>, NodeError>;
    /// Decoded direct text content.
    fn text(&self) -> Result<Option<Cow<'_, str>>, NodeError>;
    fn children(&self) -> impl Iterator<Item = &Self>;

    fn child(&self, name: &str) -> Option<&Self> {
        self.children().find(|c| c.name() == name)
    }

    /// All elements reached by following `path` (`A/B/C`) child by child.
    fn select_path(&self, path: &str) -> Vec<&Self> {
        let mut current = vec![self];
        for step in path.split('/').filter(|s| !s.is_empty()) {
            current = current
                .into_iter()
                .flat_map(|node| node.children().filter(move |c| c.name() == step))
                .collect();
        }
        current
    }

    /// Every element below this one, in document order.
    fn descendants(&self) -> Vec<&Self> {
        let mut out = Vec::new();
        let mut stack: Vec<&Self> = self.children().collect();
        stack.reverse();
        while let Some(node) = stack.pop() {
            out.push(node);
            let mark = stack.len();
            stack.extend(node.children());
            stack[mark..].reverse();
        }
        out
    }

    fn descendants_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Self> {
        self.descendants()
            .into_iter()
            .filter(move |n| n.name() == name)
    }

    fn find_descendant(&self, name: &str) -> Option<&Self> {
        self.descendants().into_iter().find(|n| n.name() == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    /// Build a tree from XML text. Only structural problems fail here.
    pub fn parse(xml: &str) -> Result<Element, CddParseError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event()? {
                Event::Start(e) => stack.push(Element::from_start(&e)),
                Event::Empty(e) => attach(&mut stack, &mut root, Element::from_start(&e))?,
                Event::End(_) => {
                    let done = stack.pop().ok_or(CddParseError::UnbalancedEnd)?;
                    attach(&mut stack, &mut root, done)?;
                }
                Event::Text(t) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&String::from_utf8_lossy(&t));
                    }
                }
                Event::CData(c) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&escape(String::from_utf8_lossy(&c).as_ref()));
                    }
                }
                Event::Eof => break,
                // Declarations, comments, PIs and stray DOCTYPEs carry nothing we read
                _ => {}
            }
        }

        if let Some(open) = stack.pop() {
            return Err(CddParseError::UnexpectedEof(open.name));
        }
        root.ok_or(CddParseError::EmptyDocument)
    }

    /// Build a detached element, mainly for tests.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, raw: impl Into<String>) -> Self {
        self.attributes.push((name.into(), raw.into()));
        self
    }

    pub fn with_text(mut self, raw: impl Into<String>) -> Self {
        self.text = raw.into();
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    fn from_start(start: &BytesStart<'_>) -> Self {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
        let attributes = start
            .attributes()
            .flatten()
            .map(|attr| {
                (
                    String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned(),
                    String::from_utf8_lossy(&attr.value).into_owned(),
                )
            })
            .collect();
        Self {
            name,
            attributes,
            ..Default::default()
        }
    }

    fn decode<'a>(&self, raw: &'a str, what: &str) -> Result<Cow<'a, str>, NodeError> {
        unescape(raw).map_err(|e| NodeError {
            element: self.name.clone(),
            what: what.to_string(),
            message: e.to_string(),
        })
    }
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), CddParseError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
    } else if root.is_none() {
        *root = Some(element);
    } else {
        return Err(CddParseError::MultipleRoots(element.name));
    }
    Ok(())
}

fn local_part(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

impl XmlNode for Element {
    fn name(&self) -> &str {
        &self.name
    }

    fn attribute(&self, name: &str) -> Result<Option<Cow<'_, str>>, NodeError> {
        let wanted = local_part(name);
        self.attributes
            .iter()
            .find(|(key, _)| key == wanted)
            .map(|(key, raw)| self.decode(raw, &format!("attribute '{key}'")))
            .transpose()
    }

    fn text(&self) -> Result<Option<Cow<'_, str>>, NodeError> {
        if self.text.is_empty() {
            return Ok(None);
        }
        self.decode(&self.text, "text").map(Some)
    }

    fn children(&self) -> impl Iterator<Item = &Self> {
        self.children.iter()
    }
}

/// Remove a `<!DOCTYPE ...>` declaration, internal subset included.
pub fn strip_doctype(xml: &str) -> Cow<'_, str> {
    let Some(start) = xml.find("<!DOCTYPE") else {
        return Cow::Borrowed(xml);
    };
    let decl = &xml[start..];

    let end = match (decl.find('['), decl.find('>')) {
        (Some(open), Some(close)) if open < close => decl[open..]
            .find(']')
            .and_then(|bracket| {
                let after = open + bracket;
                decl[after..].find('>').map(|gt| after + gt + 1)
            }),
        (_, Some(close)) => Some(close + 1),
        _ => None,
    };

    match end {
        Some(end) => Cow::Owned(format!("{}{}", &xml[..start], &xml[start + end..])),
        None => {
            log::warn!("unterminated DOCTYPE declaration left in place");
            Cow::Borrowed(xml)
        }
    }
}
