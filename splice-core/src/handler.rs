//! Event consumers.
//!
//! Every stage of a processing chain is an [`EventHandler`]: sources push
//! events into one, filters and adapters wrap another.

use crate::error::SpliceError;
use crate::event::Event;

/// Consumer of document events.
pub trait EventHandler {
    /// Accept one event. An error aborts the parse feeding this handler.
    fn handle(&mut self, event: Event) -> Result<(), SpliceError>;
}

impl<H: EventHandler + ?Sized> EventHandler for &mut H {
    #[inline]
    fn handle(&mut self, event: Event) -> Result<(), SpliceError> {
        (**self).handle(event)
    }
}

impl<H: EventHandler + ?Sized> EventHandler for Box<H> {
    #[inline]
    fn handle(&mut self, event: Event) -> Result<(), SpliceError> {
        (**self).handle(event)
    }
}

/// Handler that records every event it receives.
#[derive(Debug, Default, Clone)]
pub struct Recorder {
    events: Vec<Event>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}

impl EventHandler for Recorder {
    fn handle(&mut self, event: Event) -> Result<(), SpliceError> {
        self.events.push(event);
        Ok(())
    }
}

/// Handler backed by a closure. Built with [`from_fn`].
pub struct FnHandler<F> {
    f: F,
}

/// Wrap a closure as an [`EventHandler`].
///
/// ```
/// use splice_core::{from_fn, Event, EventHandler};
///
/// let mut elements = 0;
/// let mut handler = from_fn(|event| {
///     if matches!(event, Event::ElementStart { .. }) {
///         elements += 1;
///     }
///     Ok(())
/// });
/// handler.handle(Event::start("a")).unwrap();
/// drop(handler);
/// assert_eq!(elements, 1);
/// ```
pub fn from_fn<F>(f: F) -> FnHandler<F>
where
    F: FnMut(Event) -> Result<(), SpliceError>,
{
    FnHandler { f }
}

impl<F> EventHandler for FnHandler<F>
where
    F: FnMut(Event) -> Result<(), SpliceError>,
{
    #[inline]
    fn handle(&mut self, event: Event) -> Result<(), SpliceError> {
        (self.f)(event)
    }
}
