//! Top-level composition entry point.

use std::path::Path;

use tracing::{debug, info_span};

use crate::config::SpliceConfig;
use crate::error::SpliceError;
use crate::event::Event;
use crate::handler::{EventHandler, Recorder};
use crate::include::IncludeFilter;
use crate::resolver::{FileResolver, ResourceResolver};
use crate::resource::Resource;
use crate::source::{EventSource, XmlEventSource};

/// Composes documents: parses a root resource and splices its includes.
///
/// ```
/// use splice_core::{Composer, MemoryResolver, SpliceConfig};
///
/// let resolver = MemoryResolver::new()
///     .with("/r.xml", r#"<R><Import src="p.xml"/></R>"#)
///     .with("/p.xml", "<P><Q/></P>");
/// let root = resolver.resource("/r.xml").unwrap();
///
/// let composer = Composer::new(resolver)
///     .with_config(SpliceConfig::default().with_marker("Import").with_ref_attribute("src"));
/// let events = composer.compose_to_vec(&root).unwrap();
/// assert_eq!(events.len(), 8);
/// ```
#[derive(Debug, Clone)]
pub struct Composer<R, S = XmlEventSource> {
    resolver: R,
    source: S,
    config: SpliceConfig,
}

impl<R: ResourceResolver> Composer<R, XmlEventSource> {
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            source: XmlEventSource::default(),
            config: SpliceConfig::default(),
        }
    }
}

impl Composer<FileResolver, XmlEventSource> {
    /// Composer over files on disk.
    pub fn files() -> Self {
        Self::new(FileResolver::new())
    }
}

impl<R: ResourceResolver, S: EventSource> Composer<R, S> {
    /// Replace the event source.
    pub fn with_source<T: EventSource>(self, source: T) -> Composer<R, T> {
        Composer {
            resolver: self.resolver,
            source,
            config: self.config,
        }
    }

    pub fn with_config(mut self, config: SpliceConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SpliceConfig {
        &self.config
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Stream the composed document into `handler`.
    ///
    /// Events are delivered as they are produced. On error the handler has
    /// seen a prefix of the output; callers that must not act on partial
    /// output should buffer (see [`compose_to_vec`](Self::compose_to_vec)).
    pub fn compose(&self, root: &Resource, handler: &mut dyn EventHandler) -> Result<(), SpliceError> {
        let span = info_span!("compose", root = root.system_id());
        let _entered = span.enter();

        let mut filter = IncludeFilter::new(handler, root, &self.resolver, &self.source, &self.config);
        self.source
            .parse(root, &mut filter)
            .map_err(|e| e.attribute(root.system_id()))?;
        debug!("composition complete");
        Ok(())
    }

    /// Compose into a vector, returning nothing unless the whole
    /// composition succeeds.
    pub fn compose_to_vec(&self, root: &Resource) -> Result<Vec<Event>, SpliceError> {
        let mut recorder = Recorder::new();
        self.compose(root, &mut recorder)?;
        Ok(recorder.into_events())
    }
}

/// Compose the file at `path` with default options.
pub fn compose_file(path: impl AsRef<Path>, handler: &mut dyn EventHandler) -> Result<(), SpliceError> {
    let composer = Composer::files();
    let root = composer.resolver().root(path);
    composer.compose(&root, handler)
}
