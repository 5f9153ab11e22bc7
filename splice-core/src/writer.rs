//! Serialize an event stream back to XML text.

use std::borrow::Cow;
use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event as XmlEvent};
use quick_xml::Writer;

use crate::error::SpliceError;
use crate::event::Event;
use crate::handler::EventHandler;

/// Handler writing events as XML.
///
/// An element start immediately followed by its end is written as an empty
/// element (`<a/>`). Comments are written verbatim, except that `--` and a
/// trailing `-` get a space inserted so the comment stays well-formed.
pub struct XmlWriter<W: Write> {
    writer: Writer<W>,
    pending: Option<BytesStart<'static>>,
    declaration: bool,
}

impl<W: Write> XmlWriter<W> {
    /// Compact output, with an XML declaration.
    pub fn new(inner: W) -> Self {
        Self {
            writer: Writer::new(inner),
            pending: None,
            declaration: true,
        }
    }

    /// Indented output, `indent` spaces per level, with an XML declaration.
    pub fn indented(inner: W, indent: usize) -> Self {
        Self {
            writer: Writer::new_with_indent(inner, b' ', indent),
            pending: None,
            declaration: true,
        }
    }

    /// Whether `DocumentStart` writes `<?xml version="1.0" encoding="UTF-8"?>`.
    pub fn with_declaration(mut self, declaration: bool) -> Self {
        self.declaration = declaration;
        self
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn write(&mut self, event: XmlEvent<'_>) -> Result<(), SpliceError> {
        self.writer
            .write_event(event)
            .map_err(|e| SpliceError::Handler(format!("write failed: {e}")))
    }

    fn flush_pending(&mut self) -> Result<(), SpliceError> {
        match self.pending.take() {
            Some(start) => self.write(XmlEvent::Start(start)),
            None => Ok(()),
        }
    }
}

impl<W: Write> EventHandler for XmlWriter<W> {
    fn handle(&mut self, event: Event) -> Result<(), SpliceError> {
        if let Event::ElementEnd { ref name } = event {
            if let Some(start) = self.pending.take() {
                if start.name().as_ref() == name.as_bytes() {
                    return self.write(XmlEvent::Empty(start));
                }
                self.write(XmlEvent::Start(start))?;
            }
        } else {
            self.flush_pending()?;
        }

        match event {
            Event::DocumentStart => {
                if self.declaration {
                    self.write(XmlEvent::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
                }
                Ok(())
            }
            Event::DocumentEnd => self
                .writer
                .get_mut()
                .write_all(b"\n")
                .map_err(|e| SpliceError::Handler(format!("write failed: {e}"))),
            Event::ElementStart { name, attributes } => {
                let mut start = BytesStart::new(name);
                for (key, value) in attributes.iter() {
                    start.push_attribute((key, value));
                }
                self.pending = Some(start);
                Ok(())
            }
            Event::ElementEnd { name } => self.write(XmlEvent::End(BytesEnd::new(name))),
            Event::Text { content } => self.write(XmlEvent::Text(BytesText::new(&content))),
            Event::Comment { content } => {
                self.write(XmlEvent::Comment(BytesText::from_escaped(comment_text(&content))))
            }
        }
    }
}

/// Comment content that cannot close or break the comment early.
fn comment_text(content: &str) -> Cow<'_, str> {
    if !content.contains("--") && !content.ends_with('-') {
        return Cow::Borrowed(content);
    }
    let mut out = String::with_capacity(content.len() + 4);
    for c in content.chars() {
        if c == '-' && out.ends_with('-') {
            out.push(' ');
        }
        out.push(c);
    }
    if out.ends_with('-') {
        out.push(' ');
    }
    Cow::Owned(out)
}
