//! Composition options.

use serde::Deserialize;

/// Default marker element name.
pub const DEFAULT_MARKER: &str = "Include";

/// Default reference attribute name.
pub const DEFAULT_REF_ATTRIBUTE: &str = "ref";

/// Default bound on include nesting.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Options controlling how include markers are recognized and followed.
///
/// Deserializable so callers can keep it in a config file; every field
/// falls back to its default when absent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpliceConfig {
    /// Element name (local part) that triggers inclusion.
    pub marker: String,
    /// Attribute on the marker carrying the reference.
    pub ref_attribute: String,
    /// Deepest include nesting allowed before composition fails.
    pub max_depth: usize,
    /// Reject an include of a resource that is already being included.
    pub detect_cycles: bool,
}

impl Default for SpliceConfig {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            ref_attribute: DEFAULT_REF_ATTRIBUTE.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            detect_cycles: false,
        }
    }
}

impl SpliceConfig {
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    pub fn with_ref_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.ref_attribute = attribute.into();
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_cycle_detection(mut self, enabled: bool) -> Self {
        self.detect_cycles = enabled;
        self
    }

    /// Check whether an element name is the include marker.
    ///
    /// Compares the local part, so `<cfg:Include>` matches marker `Include`.
    #[inline]
    pub fn is_marker(&self, name: &str) -> bool {
        local_name(name) == self.marker
    }
}

/// Local part of a qualified name (`prefix:local` → `local`).
#[inline]
pub fn local_name(name: &str) -> &str {
    match name.rfind(':') {
        Some(idx) => &name[idx + 1..],
        None => name,
    }
}
