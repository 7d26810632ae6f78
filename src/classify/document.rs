//! Parsed `efetch` record documents.
//!
//! The efetch XML is read with `quick-xml` into a small owned element tree so
//! the classifier can walk it with tolerant lookups. Every lookup returns an
//! `Option`; [`get_or_default`] collapses a missing node or empty text into a
//! caller-supplied default.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;

/// Name of the per-record element inside `<PubmedArticleSet>`.
const ARTICLE_ELEMENT: &str = "PubmedArticle";

/// Errors produced while turning a response body into a [`RawRecordDocument`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// The body is not well-formed XML.
    #[error("XML parse error: {reason}")]
    Malformed {
        /// Parser diagnostic.
        reason: String,
    },

    /// The body contains no elements at all.
    #[error("document has no root element")]
    Empty,

    /// Well-formed XML without a `PubmedArticle` element.
    #[error("no PubmedArticle element in document")]
    MissingArticle,
}

impl DocumentError {
    fn malformed(reason: impl ToString) -> Self {
        Self::Malformed {
            reason: reason.to_string(),
        }
    }
}

/// A node inside an element: either a child element or a run of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    /// Child element.
    Element(XmlElement),
    /// Character data (entities already unescaped).
    Text(String),
}

/// An owned XML element with attributes and ordered children.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
}

impl XmlElement {
    /// Creates an empty element (used by tests and the parser).
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Element tag name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attribute value by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Child elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    /// First direct child named `name`.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.elements().find(|element| element.name == name)
    }

    /// First descendant (excluding `self`) named `name`, in document order.
    #[must_use]
    pub fn descendant(&self, name: &str) -> Option<&XmlElement> {
        for element in self.elements() {
            if element.name == name {
                return Some(element);
            }
            if let Some(found) = element.descendant(name) {
                return Some(found);
            }
        }
        None
    }

    /// All descendants (excluding `self`) named `name`, in document order.
    #[must_use]
    pub fn descendants(&self, name: &str) -> Vec<&XmlElement> {
        let mut found = Vec::new();
        self.collect_descendants(name, &mut found);
        found
    }

    fn collect_descendants<'a>(&'a self, name: &str, found: &mut Vec<&'a XmlElement>) {
        for element in self.elements() {
            if element.name == name {
                found.push(element);
            }
            element.collect_descendants(name, found);
        }
    }

    /// Resolves a small path expression relative to this element.
    ///
    /// Steps are separated by `/` and match direct children. A leading `.//`
    /// makes the first step match any descendant instead.
    ///
    /// ```
    /// use pubmed_affiliations::RawRecordDocument;
    ///
    /// let doc = RawRecordDocument::parse(
    ///     "<PubmedArticle><Article><Journal><PubDate><Year>2021</Year></PubDate></Journal></Article></PubmedArticle>",
    /// ).unwrap();
    /// let year = doc.article().lookup(".//PubDate/Year").map(|e| e.text());
    /// assert_eq!(year.as_deref(), Some("2021"));
    /// ```
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<&XmlElement> {
        let (first_is_descendant, rest) = match path.strip_prefix(".//") {
            Some(rest) => (true, rest),
            None => (false, path),
        };

        let mut steps = rest.split('/').filter(|step| !step.is_empty());
        let first = steps.next()?;
        let mut current = if first_is_descendant {
            self.descendant(first)?
        } else {
            self.child(first)?
        };
        for step in steps {
            current = current.child(step)?;
        }
        Some(current)
    }

    /// All text inside this element and its descendants, concatenated in order.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.append_text(&mut out);
        out
    }

    fn append_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                XmlNode::Text(text) => out.push_str(text),
                XmlNode::Element(element) => element.append_text(out),
            }
        }
    }

    /// Appends a child element (builder style, for constructing fixtures).
    #[must_use]
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    /// Appends a text run (builder style).
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.push_text(text.into());
        self
    }

    /// Adds an attribute (builder style).
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    fn push_text(&mut self, text: String) {
        if let Some(XmlNode::Text(existing)) = self.children.last_mut() {
            existing.push_str(&text);
        } else {
            self.children.push(XmlNode::Text(text));
        }
    }
}

/// Tolerant lookup: trimmed text at `path`, or `default` when the node is
/// missing or its text is empty.
#[must_use]
pub fn get_or_default(node: &XmlElement, path: &str, default: &str) -> String {
    node.lookup(path)
        .map(|element| element.text().trim().to_string())
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Tolerant lookup returning `None` instead of a default.
#[must_use]
pub fn get_text(node: &XmlElement, path: &str) -> Option<String> {
    node.lookup(path)
        .map(|element| element.text().trim().to_string())
        .filter(|text| !text.is_empty())
}

/// One PubMed record, as returned by `efetch` (the `PubmedArticle` element).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecordDocument {
    article: XmlElement,
}

impl RawRecordDocument {
    /// Parses an efetch response body and keeps its first `PubmedArticle`.
    ///
    /// The root element itself may be the `PubmedArticle`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError`] when the body is not well-formed XML, is empty,
    /// or has no `PubmedArticle` element.
    pub fn parse(xml: &str) -> Result<Self, DocumentError> {
        let root = parse_tree(xml)?;
        if root.name == ARTICLE_ELEMENT {
            return Ok(Self { article: root });
        }
        root.descendant(ARTICLE_ELEMENT)
            .cloned()
            .map(|article| Self { article })
            .ok_or(DocumentError::MissingArticle)
    }

    /// Wraps an already-built `PubmedArticle` element.
    #[must_use]
    pub fn from_article(article: XmlElement) -> Self {
        Self { article }
    }

    /// The `PubmedArticle` element.
    #[must_use]
    pub fn article(&self) -> &XmlElement {
        &self.article
    }
}

fn parse_tree(xml: &str) -> Result<XmlElement, DocumentError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event().map_err(DocumentError::malformed)? {
            Event::Start(start) => stack.push(element_from_start(&start)?),
            Event::Empty(start) => {
                let element = element_from_start(&start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| DocumentError::malformed("unexpected closing tag"))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                // Whitespace between top-level nodes is not part of any element.
                if let Some(parent) = stack.last_mut() {
                    let text = text.unescape().map_err(DocumentError::malformed)?;
                    parent.push_text(text.into_owned());
                }
            }
            Event::CData(data) => {
                if let Some(parent) = stack.last_mut() {
                    parent.push_text(String::from_utf8_lossy(&data).into_owned());
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(DocumentError::malformed(format!(
            "unexpected end of document inside <{}>",
            open.name
        )));
    }
    root.ok_or(DocumentError::Empty)
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlElement, DocumentError> {
    let mut element = XmlElement::new(String::from_utf8_lossy(start.name().as_ref()));
    for attribute in start.attributes() {
        let attribute = attribute.map_err(DocumentError::malformed)?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(DocumentError::malformed)?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), DocumentError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(XmlNode::Element(element));
        Ok(())
    } else if root.is_none() {
        *root = Some(element);
        Ok(())
    } else {
        Err(DocumentError::malformed("multiple root elements"))
    }
}
