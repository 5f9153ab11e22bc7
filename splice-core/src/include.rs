//! Include-resolving filter - the recursive splice.
//!
//! The filter sits between an event source and a downstream handler and
//! passes every event through unchanged, except include markers:
//!
//! ```text
//! <Config>                         <Config>
//!   <Include ref="part.xml"/>  →     <!--start include 'part.xml'-->
//!   <Item>1</Item>                   <Item>2</Item>          (body of part.xml)
//! </Config>                          <!--end include-->
//!                                    <Item>1</Item>
//!                                  </Config>
//! ```
//!
//! On a marker the filter resolves the reference against its *own* resource,
//! then parses the target to completion through a fresh chain
//!
//! ```text
//! source(target) → IncludeFilter(target) → BodyOnly → downstream
//! ```
//!
//! before returning to the outer stream. Each level owns its chain; nothing
//! is shared between levels except read-only collaborators.

use tracing::{debug, debug_span, trace};

use crate::body::BodyOnly;
use crate::config::SpliceConfig;
use crate::error::SpliceError;
use crate::event::Event;
use crate::handler::EventHandler;
use crate::resolver::ResourceResolver;
use crate::resource::Resource;
use crate::source::EventSource;

/// An include directive: a marker element start and its reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Include<'e> {
    /// Value of the reference attribute; empty when absent.
    pub reference: &'e str,
}

impl<'e> Include<'e> {
    /// Recognize an include marker. `None` for any other event.
    pub fn from_event(event: &'e Event, config: &SpliceConfig) -> Option<Self> {
        match event {
            Event::ElementStart { name, attributes } if config.is_marker(name) => Some(Include {
                reference: attributes.get(&config.ref_attribute).unwrap_or(""),
            }),
            _ => None,
        }
    }

    /// Includes with an empty reference are disabled and splice nothing.
    pub fn is_disabled(&self) -> bool {
        self.reference.is_empty()
    }
}

/// Event handler that replaces include markers with the referenced content.
pub struct IncludeFilter<'a> {
    downstream: &'a mut dyn EventHandler,
    resource: &'a Resource,
    resolver: &'a dyn ResourceResolver,
    source: &'a dyn EventSource,
    config: &'a SpliceConfig,
    /// System ids from the root down to `resource`.
    trail: Vec<String>,
}

impl<'a> IncludeFilter<'a> {
    /// Filter for the root resource of a composition.
    pub fn new(
        downstream: &'a mut dyn EventHandler,
        resource: &'a Resource,
        resolver: &'a dyn ResourceResolver,
        source: &'a dyn EventSource,
        config: &'a SpliceConfig,
    ) -> Self {
        Self {
            downstream,
            resource,
            resolver,
            source,
            config,
            trail: vec![resource.system_id().to_owned()],
        }
    }

    /// The resource whose events this filter receives.
    pub fn resource(&self) -> &Resource {
        self.resource
    }

    /// Include nesting of this filter; the root filter is at depth 0.
    pub fn depth(&self) -> usize {
        self.trail.len() - 1
    }

    fn splice(&mut self, reference: &str) -> Result<(), SpliceError> {
        self.downstream
            .handle(Event::comment(format!("start include '{reference}'")))?;

        let depth = self.depth() + 1;
        if depth > self.config.max_depth {
            return Err(SpliceError::IncludeDepthExceeded {
                reference: reference.to_owned(),
                max_depth: self.config.max_depth,
            });
        }

        let target = self
            .resolver
            .resolve(reference, self.resource.system_id())
            .map_err(|source| SpliceError::ReferenceResolution {
                reference: reference.to_owned(),
                source,
            })?
            .ok_or_else(|| SpliceError::ResourceNotFound {
                reference: reference.to_owned(),
            })?;

        if self.config.detect_cycles && self.trail.iter().any(|id| id == target.system_id()) {
            return Err(SpliceError::IncludeCycle {
                reference: reference.to_owned(),
                system_id: target.system_id().to_owned(),
            });
        }

        let span = debug_span!("include", reference, system_id = target.system_id(), depth);
        let _entered = span.enter();
        debug!("splicing include");

        let mut trail = self.trail.clone();
        trail.push(target.system_id().to_owned());

        let mut body = BodyOnly::new(&mut *self.downstream);
        let mut nested = IncludeFilter {
            downstream: &mut body,
            resource: &target,
            resolver: self.resolver,
            source: self.source,
            config: self.config,
            trail,
        };
        self.source
            .parse(&target, &mut nested)
            .map_err(|e| e.attribute(reference))?;

        self.downstream.handle(Event::comment("end include"))
    }
}

impl EventHandler for IncludeFilter<'_> {
    fn handle(&mut self, event: Event) -> Result<(), SpliceError> {
        if let Some(include) = Include::from_event(&event, self.config) {
            if include.is_disabled() {
                trace!(system_id = self.resource.system_id(), "include without reference removed");
                return Ok(());
            }
            return self.splice(include.reference);
        }
        match event {
            Event::ElementEnd { ref name } if self.config.is_marker(name) => Ok(()),
            other => self.downstream.handle(other),
        }
    }
}
