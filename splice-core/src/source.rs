//! Event sources: parse a resource into a stream of document events.
//!
//! [`XmlEventSource`] drives `quick-xml`'s pull reader over the resource's
//! stream and pushes each event into a handler as soon as it is read. Only
//! the stack of open element names is held; no tree is built.

use std::borrow::Cow;

use quick_xml::events::{BytesStart, Event as XmlEvent};
use quick_xml::Reader;
use tracing::trace;

use crate::error::SourceError;
use crate::event::{Attributes, Event};
use crate::handler::EventHandler;
use crate::resource::Resource;

/// Parses resources into document events.
///
/// A source must deliver `DocumentStart` first and `DocumentEnd` last, with
/// balanced element start/end pairs in between, or fail with
/// [`SourceError::Malformed`]. Errors returned by the handler abort the parse
/// and come back as [`SourceError::Handler`].
pub trait EventSource {
    fn parse(&self, resource: &Resource, handler: &mut dyn EventHandler) -> Result<(), SourceError>;
}

impl<S: EventSource + ?Sized> EventSource for &S {
    fn parse(&self, resource: &Resource, handler: &mut dyn EventHandler) -> Result<(), SourceError> {
        (**self).parse(resource, handler)
    }
}

/// XML event source built on `quick-xml`.
#[derive(Debug, Clone, Copy)]
pub struct XmlEventSource {
    trim_whitespace: bool,
}

impl Default for XmlEventSource {
    fn default() -> Self {
        Self {
            trim_whitespace: true,
        }
    }
}

impl XmlEventSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trim leading/trailing whitespace from text and drop whitespace-only
    /// text between elements. On by default.
    pub fn trim_whitespace(mut self, trim: bool) -> Self {
        self.trim_whitespace = trim;
        self
    }
}

impl EventSource for XmlEventSource {
    fn parse(&self, resource: &Resource, handler: &mut dyn EventHandler) -> Result<(), SourceError> {
        let input = resource.open()?;
        let mut reader = Reader::from_reader(input);
        let config = reader.config_mut();
        config.trim_text(self.trim_whitespace);
        config.expand_empty_elements = true;
        config.check_end_names = true;

        let system_id = resource.system_id();
        let malformed = |position: u64, message: String| SourceError::Malformed {
            system_id: system_id.to_owned(),
            position,
            message,
        };

        trace!(system_id, "parse start");
        emit(handler, Event::DocumentStart)?;

        let mut open: Vec<String> = Vec::new();
        let mut root_closed = false;
        let mut buf = Vec::new();
        loop {
            let position = reader.buffer_position() as u64;
            let event = match reader.read_event_into(&mut buf) {
                Ok(event) => event,
                Err(quick_xml::Error::Io(e)) => {
                    return Err(SourceError::Io(std::io::Error::new(e.kind(), e.to_string())));
                }
                Err(e) => return Err(malformed(position, e.to_string())),
            };

            match event {
                XmlEvent::Start(start) => {
                    if open.is_empty() && root_closed {
                        return Err(malformed(position, "element after the root element".into()));
                    }
                    let (name, attributes) = element_start(&start).map_err(|m| malformed(position, m))?;
                    open.push(name.clone());
                    emit(handler, Event::ElementStart { name, attributes })?;
                }
                XmlEvent::End(end) => {
                    let name = utf8(end.name().into_inner()).map_err(|m| malformed(position, m))?;
                    match open.pop() {
                        Some(expected) if expected == name => {}
                        Some(expected) => {
                            return Err(malformed(
                                position,
                                format!("expected </{expected}>, found </{name}>"),
                            ));
                        }
                        None => return Err(malformed(position, format!("unmatched </{name}>"))),
                    }
                    root_closed = open.is_empty();
                    emit(handler, Event::ElementEnd { name: name.into_owned() })?;
                }
                XmlEvent::Empty(start) => {
                    if open.is_empty() && root_closed {
                        return Err(malformed(position, "element after the root element".into()));
                    }
                    root_closed = open.is_empty();
                    let (name, attributes) = element_start(&start).map_err(|m| malformed(position, m))?;
                    emit(
                        handler,
                        Event::ElementStart {
                            name: name.clone(),
                            attributes,
                        },
                    )?;
                    emit(handler, Event::ElementEnd { name })?;
                }
                XmlEvent::Text(text) => {
                    let content = text.unescape().map_err(|e| malformed(position, e.to_string()))?;
                    if open.is_empty() {
                        // Only whitespace may surround the root element.
                        if !content.trim().is_empty() {
                            return Err(malformed(position, "text outside the root element".into()));
                        }
                    } else if !content.is_empty() {
                        emit(handler, Event::text(content.into_owned()))?;
                    }
                }
                XmlEvent::CData(data) => {
                    if open.is_empty() {
                        return Err(malformed(position, "CDATA outside the root element".into()));
                    }
                    let content = utf8(&data).map_err(|m| malformed(position, m))?;
                    emit(handler, Event::text(content.into_owned()))?;
                }
                XmlEvent::Comment(comment) => {
                    let content = utf8(&comment).map_err(|m| malformed(position, m))?;
                    emit(handler, Event::comment(content.into_owned()))?;
                }
                XmlEvent::Eof => break,
                // Declarations, processing instructions and doctypes are not
                // part of the event model.
                _ => {}
            }
            buf.clear();
        }

        if let Some(name) = open.pop() {
            return Err(malformed(
                reader.buffer_position() as u64,
                format!("unclosed element <{name}>"),
            ));
        }
        if !root_closed {
            return Err(malformed(reader.buffer_position() as u64, "no root element".into()));
        }

        emit(handler, Event::DocumentEnd)?;
        trace!(system_id, "parse end");
        Ok(())
    }
}

#[inline]
fn emit(handler: &mut dyn EventHandler, event: Event) -> Result<(), SourceError> {
    handler.handle(event).map_err(SourceError::Handler)
}

fn element_start(start: &BytesStart<'_>) -> Result<(String, Attributes), String> {
    let name = utf8(start.name().as_ref())?.into_owned();
    let mut attributes = Attributes::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        let key = utf8(attr.key.as_ref())?;
        let value = attr.unescape_value().map_err(|e| e.to_string())?;
        attributes.insert(key.into_owned(), value.into_owned());
    }
    Ok((name, attributes))
}

fn utf8(bytes: &[u8]) -> Result<Cow<'_, str>, String> {
    std::str::from_utf8(bytes)
        .map(Cow::Borrowed)
        .map_err(|e| format!("invalid UTF-8: {e}"))
}
