//! Body-only adapter.
//!
//! An included resource is a standalone, well-formed document with its own
//! root element. When spliced into another document only what sits beneath
//! that root belongs in the output:
//!
//! ```text
//! DocumentStart              dropped
//! ElementStart(Part)         dropped (root)
//!   ElementStart(Item)       forwarded
//!   Text("2")                forwarded
//!   ElementEnd(Item)         forwarded
//! ElementEnd(Part)           dropped (root)
//! DocumentEnd                dropped
//! ```

use crate::error::SpliceError;
use crate::event::Event;
use crate::handler::EventHandler;

/// Forwards the body of a document, stripping its envelope and root element.
///
/// Text and comments are forwarded at any depth; only element boundaries at
/// the root level are dropped.
#[derive(Debug)]
pub struct BodyOnly<H> {
    inner: H,
    depth: usize,
}

impl<H: EventHandler> BodyOnly<H> {
    pub fn new(inner: H) -> Self {
        Self { inner, depth: 0 }
    }

    /// Current element nesting, counting the root element.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn into_inner(self) -> H {
        self.inner
    }
}

impl<H: EventHandler> EventHandler for BodyOnly<H> {
    fn handle(&mut self, event: Event) -> Result<(), SpliceError> {
        match event {
            Event::DocumentStart | Event::DocumentEnd => Ok(()),
            Event::ElementStart { .. } => {
                self.depth += 1;
                if self.depth == 1 {
                    return Ok(());
                }
                self.inner.handle(event)
            }
            Event::ElementEnd { .. } => {
                let depth = self.depth;
                self.depth = depth.saturating_sub(1);
                if depth <= 1 {
                    return Ok(());
                }
                self.inner.handle(event)
            }
            Event::Text { .. } | Event::Comment { .. } => self.inner.handle(event),
        }
    }
}
