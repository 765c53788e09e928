//! Postcard SVG composer.
//!
//! The postcard template is an SVG whose top-level elements are tagged with an
//! `id` of the form `slot:choice`. A request picks one choice per slot through
//! its query string and gets back an SVG holding only the matching elements,
//! plus the `text` element with the visitor's message filled in.

use std::{
    collections::HashMap,
    io,
    path::{Path, PathBuf},
};

use quick_xml::{
    escape::escape,
    events::{BytesStart, Event},
    reader::Reader,
};
use serde::Deserialize;

/// Identifier of the element that carries the free-text message.
pub const TEXT_ID: &str = "text";

/// Token replaced by the visitor's message inside the `text` element.
pub const TEXT_PLACEHOLDER: &str = "POSTCARD_TEXT_GOES_HERE";

const SLOT_SEPARATOR: char = ':';

const WIDTH: u32 = 100;
const HEIGHT: u32 = 100;

const FOOTER: &str = "\n</svg>\n";

#[derive(Debug, thiserror::Error)]
pub enum PostcardError {
    #[error("postcard template not found at {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read postcard template")]
    Io(#[from] io::Error),

    #[error("XML parse error")]
    Xml(#[from] quick_xml::Error),

    #[error("XML attribute error")]
    XmlAttr(#[from] quick_xml::events::attributes::AttrError),

    #[error("postcard template has no root element")]
    MissingRoot,

    #[error("postcard template ends before the root element is closed")]
    Truncated,
}

/// Typed reading of an element's `id` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementId<'a> {
    /// The free-text element.
    Text,
    /// A slot choice. `key` runs up to the first `:` and `value` starts after
    /// the last one, so `a:b:c` is slot `a` with choice `c`. Either may be empty.
    Slot { key: &'a str, value: &'a str },
    /// No `:` at all. Such elements never make it into a postcard.
    Unrecognized,
}

impl<'a> ElementId<'a> {
    pub fn parse(id: &'a str) -> Self {
        if id == TEXT_ID {
            return ElementId::Text;
        }

        match (id.split_once(SLOT_SEPARATOR), id.rsplit_once(SLOT_SEPARATOR)) {
            (Some((key, _)), Some((_, value))) => ElementId::Slot { key, value },
            _ => ElementId::Unrecognized,
        }
    }
}

/// A top-level element of the template, kept as the exact markup it had in
/// the source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostcardElement {
    id: Option<String>,
    markup: String,
}

impl PostcardElement {
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// `None` when the element carries no `id` at all.
    pub fn identifier(&self) -> Option<ElementId<'_>> {
        self.id.as_deref().map(ElementId::parse)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostcardTemplate {
    view_box: String,
    elements: Vec<PostcardElement>,
}

impl PostcardTemplate {
    /// Reads and parses the template file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PostcardError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => PostcardError::NotFound {
                path: path.to_path_buf(),
            },
            _ => PostcardError::Io(err),
        })?;

        let template = Self::parse(&source)?;
        tracing::debug!(
            path = %path.display(),
            elements = template.elements.len(),
            "loaded postcard template"
        );

        Ok(template)
    }

    /// Splits an SVG document into its root's direct children.
    pub fn parse(source: &str) -> Result<Self, PostcardError> {
        let mut reader = Reader::from_str(source);
        reader.config_mut().trim_text(false);

        let mut view_box = None;
        let mut elements = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(e) if view_box.is_none() => {
                    view_box = Some(attribute(&e, "viewBox")?.unwrap_or_default());
                }
                Event::Empty(e) if view_box.is_none() => {
                    // A self-closing root has no children.
                    view_box = Some(attribute(&e, "viewBox")?.unwrap_or_default());
                    break;
                }
                Event::Start(e) => {
                    let id = attribute(&e, "id")?;
                    let start = tag_start(source, reader.buffer_position() as usize);
                    reader.read_to_end(e.name())?;
                    let end = reader.buffer_position() as usize;
                    elements.push(PostcardElement {
                        id,
                        markup: source[start..end].to_owned(),
                    });
                }
                Event::Empty(e) => {
                    let id = attribute(&e, "id")?;
                    let end = reader.buffer_position() as usize;
                    let start = tag_start(source, end);
                    elements.push(PostcardElement {
                        id,
                        markup: source[start..end].to_owned(),
                    });
                }
                // The root's closing tag.
                Event::End(_) => break,
                Event::Eof if view_box.is_some() => return Err(PostcardError::Truncated),
                Event::Eof => break,
                _ => {}
            }
        }

        let view_box = view_box.ok_or(PostcardError::MissingRoot)?;

        Ok(Self { view_box, elements })
    }

    pub fn view_box(&self) -> &str {
        &self.view_box
    }

    pub fn elements(&self) -> &[PostcardElement] {
        &self.elements
    }
}

/// Slot choices made by a visitor, usually straight from the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Selections(HashMap<String, String>);

impl Selections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// The postcard message; empty when the visitor wrote none.
    pub fn text(&self) -> &str {
        self.get(TEXT_ID).unwrap_or_default()
    }
}

impl<K, V> FromIterator<(K, V)> for Selections
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// A finished SVG document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedDocument(String);

impl ComposedDocument {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Builds the postcard picked by `selections` out of `template`.
///
/// The header takes the template root's `viewBox` and the message is
/// XML-escaped before substitution, so the output is valid SVG for any input
/// rather than a verbatim splice of the query string.
pub fn compose(template: &PostcardTemplate, selections: &Selections) -> ComposedDocument {
    let text = escape(selections.text());
    let mut output = header(template.view_box());

    for element in &template.elements {
        match element.identifier() {
            Some(ElementId::Text) => {
                output.push_str(&element.markup.replace(TEXT_PLACEHOLDER, &text));
            }
            Some(ElementId::Slot { key, value }) if selections.get(key) == Some(value) => {
                output.push_str(&element.markup);
            }
            _ => {}
        }
    }

    output.push_str(FOOTER);
    ComposedDocument(output)
}

fn header(view_box: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
         <svg width=\"{WIDTH}%\" height=\"{HEIGHT}%\" viewBox=\"{}\" version=\"1.1\" id=\"Layer_1\" \
         xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\">\n",
        escape(view_box)
    )
}

fn attribute(e: &BytesStart, name: &str) -> Result<Option<String>, PostcardError> {
    let value = e.try_get_attribute(name)?.map(|attr| {
        attr.unescape_value().map_or_else(
            |_| String::from_utf8_lossy(&attr.value).into_owned(),
            std::borrow::Cow::into_owned,
        )
    });
    Ok(value)
}

/// Offset of the `<` opening the tag that ends at `tag_end`. Attribute values
/// cannot hold a raw `<`, so the last one before the end is the tag's own.
fn tag_start(source: &str, tag_end: usize) -> usize {
    source[..tag_end].rfind('<').unwrap_or(0)
}
