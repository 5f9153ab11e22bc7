//! Splice Core
//!
//! Streaming, event-based include resolution for XML configuration documents.
//! A root resource is parsed into document events; every `<Include ref="..."/>`
//! marker is replaced in place by the body of the referenced resource, which is
//! itself parsed and spliced recursively. No tree is ever built.
//!
//! # Architecture
//!
//! - **event.rs** - Owned document events and ordered attributes
//! - **handler.rs** - EventHandler trait, Recorder, closure adapter
//! - **resource.rs** - Resource (system id + readable content)
//! - **resolver.rs** - ResourceResolver trait, file and in-memory resolvers
//! - **source.rs** - EventSource trait, quick-xml backed XmlEventSource
//! - **body.rs** - BodyOnly adapter (strips document envelope and root element)
//! - **include.rs** - IncludeFilter, the recursive splice
//! - **compose.rs** - Composer, the top-level entry point
//! - **writer.rs** - XmlWriter, serializes events back to XML
//!
//! # Example
//!
//! ```
//! use splice_core::{Composer, Event, MemoryResolver, Recorder};
//!
//! let resolver = MemoryResolver::new()
//!     .with("/conf/root.xml", r#"<Config><Include ref="part.xml"/><Item>1</Item></Config>"#)
//!     .with("/conf/part.xml", "<Part><Item>2</Item></Part>");
//! let root = resolver.resource("/conf/root.xml").unwrap();
//!
//! let mut recorder = Recorder::new();
//! Composer::new(resolver).compose(&root, &mut recorder).unwrap();
//!
//! assert!(recorder
//!     .events()
//!     .contains(&Event::comment("start include 'part.xml'")));
//! ```

pub mod body;
pub mod compose;
pub mod config;
pub mod error;
pub mod event;
pub mod handler;
pub mod include;
pub mod resolver;
pub mod resource;
pub mod source;
pub mod writer;

pub use body::BodyOnly;
pub use compose::{compose_file, Composer};
pub use config::SpliceConfig;
pub use error::{SourceError, SpliceError};
pub use event::{Attributes, Event};
pub use handler::{from_fn, EventHandler, FnHandler, Recorder};
pub use include::IncludeFilter;
pub use resolver::{resolve_location, FileResolver, MemoryResolver, ResolveError, ResourceResolver};
pub use resource::Resource;
pub use source::{EventSource, XmlEventSource};
pub use writer::XmlWriter;
