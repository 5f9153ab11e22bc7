//! Document events - the unit of content flowing through a splice.
//!
//! This is a SAX-style event model: a resource is delivered as a flat
//! sequence of events, with structure represented by start/end pairs.
//!
//! A document `<Config a="1"><Item>x</Item></Config>` is delivered as:
//! ```text
//! DocumentStart
//! ElementStart { name: "Config", attributes: [a="1"] }
//! ElementStart { name: "Item" }
//! Text("x")
//! ElementEnd { name: "Item" }
//! ElementEnd { name: "Config" }
//! DocumentEnd
//! ```
//!
//! Events own their data. Included resources are parsed while the outer
//! parse is suspended mid-stream, so events cannot borrow from a single
//! input buffer.

use std::fmt;

/// Streaming document events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // ========== Envelope Events ==========

    /// Start of a parsed resource.
    DocumentStart,

    /// End of a parsed resource.
    DocumentEnd,

    // ========== Structure Events ==========

    /// Element start: `<name attr="value">`
    ///
    /// The name is the qualified name as written, prefix included.
    ElementStart {
        name: String,
        attributes: Attributes,
    },

    /// Element end: `</name>` (also emitted for empty elements `<name/>`)
    ElementEnd {
        name: String,
    },

    // ========== Content Events ==========

    /// Unescaped character data (CDATA sections included)
    Text {
        content: String,
    },

    /// Comment: `<!-- content -->`
    Comment {
        content: String,
    },
}

impl Event {
    /// Element start with no attributes.
    pub fn start(name: impl Into<String>) -> Self {
        Event::ElementStart {
            name: name.into(),
            attributes: Attributes::new(),
        }
    }

    /// Element start with the given attributes, in order.
    pub fn start_with<K, V>(name: impl Into<String>, attributes: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Event::ElementStart {
            name: name.into(),
            attributes: attributes.into_iter().collect(),
        }
    }

    pub fn end(name: impl Into<String>) -> Self {
        Event::ElementEnd { name: name.into() }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Event::Text {
            content: content.into(),
        }
    }

    pub fn comment(content: impl Into<String>) -> Self {
        Event::Comment {
            content: content.into(),
        }
    }

    /// Element name for start/end events.
    pub fn name(&self) -> Option<&str> {
        match self {
            Event::ElementStart { name, .. } | Event::ElementEnd { name } => Some(name),
            _ => None,
        }
    }

    /// Check if this is a document envelope event.
    pub fn is_envelope(&self) -> bool {
        matches!(self, Event::DocumentStart | Event::DocumentEnd)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::DocumentStart => f.write_str("DocumentStart"),
            Event::DocumentEnd => f.write_str("DocumentEnd"),
            Event::ElementStart { name, attributes } => {
                write!(f, "<{name}")?;
                for (key, value) in attributes.iter() {
                    write!(f, " {key}={value:?}")?;
                }
                f.write_str(">")
            }
            Event::ElementEnd { name } => write!(f, "</{name}>"),
            Event::Text { content } => write!(f, "{content:?}"),
            Event::Comment { content } => write!(f, "<!--{content}-->"),
        }
    }
}

/// Ordered attribute-name to value mapping.
///
/// Document order is preserved. Lookups are linear; elements carry a
/// handful of attributes at most.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an attribute, replacing the value of an existing key in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Value of the attribute named `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Attributes
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = Attributes::new();
        for (key, value) in iter {
            attributes.insert(key, value);
        }
        attributes
    }
}
