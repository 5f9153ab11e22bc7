//! Reference resolution.
//!
//! A resolver maps a reference found in a document (`<Include ref="b/x.xml"/>`)
//! to a [`Resource`], relative to the system id of the resource that contains
//! the reference. Resolution is always against the *current* resource, so a
//! chain of includes across directories keeps resolving from wherever the
//! previous include landed:
//!
//! ```text
//! /a/root.xml     ref="b/x.xml"  →  /a/b/x.xml
//! /a/b/x.xml      ref="y.xml"    →  /a/b/y.xml
//! ```

use std::collections::HashMap;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::resource::Resource;

/// Why a reference could not be mapped to a resource.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("invalid reference '{reference}': {reason}")]
    Invalid {
        reference: String,
        reason: &'static str,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Maps references to resources.
///
/// `Ok(None)` means the reference is well-formed but nothing exists there.
pub trait ResourceResolver {
    fn resolve(&self, reference: &str, base: &str) -> Result<Option<Resource>, ResolveError>;
}

impl<R: ResourceResolver + ?Sized> ResourceResolver for &R {
    fn resolve(&self, reference: &str, base: &str) -> Result<Option<Resource>, ResolveError> {
        (**self).resolve(reference, base)
    }
}

impl<R: ResourceResolver + ?Sized> ResourceResolver for Box<R> {
    fn resolve(&self, reference: &str, base: &str) -> Result<Option<Resource>, ResolveError> {
        (**self).resolve(reference, base)
    }
}

impl<R: ResourceResolver + ?Sized> ResourceResolver for Arc<R> {
    fn resolve(&self, reference: &str, base: &str) -> Result<Option<Resource>, ResolveError> {
        (**self).resolve(reference, base)
    }
}

// ============================================================================
// Location arithmetic
// ============================================================================

/// Resolve `reference` against the directory of `base`.
///
/// Locations are `/`-separated. An absolute reference replaces the base;
/// `.` and `..` segments are folded. `..` never climbs above the root of an
/// absolute location.
///
/// ```
/// use splice_core::resolve_location;
///
/// assert_eq!(resolve_location("b/x.xml", "/a/root.xml"), "/a/b/x.xml");
/// assert_eq!(resolve_location("../y.xml", "/a/b/x.xml"), "/a/y.xml");
/// assert_eq!(resolve_location("/etc/z.xml", "/a/root.xml"), "/etc/z.xml");
/// ```
pub fn resolve_location(reference: &str, base: &str) -> String {
    if reference.starts_with('/') {
        return normalize(reference);
    }
    let dir = match base.rfind('/') {
        Some(idx) => &base[..=idx],
        None => "",
    };
    normalize(&format!("{dir}{reference}"))
}

fn normalize(location: &str) -> String {
    let absolute = location.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();
    for segment in location.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if absolute => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }
    let joined = segments.join("/");
    if absolute {
        format!("/{joined}")
    } else {
        joined
    }
}

fn check_reference(reference: &str) -> Result<(), ResolveError> {
    let invalid = |reason| ResolveError::Invalid {
        reference: reference.to_owned(),
        reason,
    };
    if reference.contains('\0') {
        return Err(invalid("contains NUL"));
    }
    if let Some((scheme, _)) = reference.split_once("://") {
        if !scheme.is_empty() && scheme.chars().all(|c| c.is_ascii_alphanumeric() || "+-.".contains(c)) {
            return Err(invalid("URL schemes are not supported"));
        }
    }
    Ok(())
}

// ============================================================================
// Filesystem
// ============================================================================

/// Resolves references to files on disk.
///
/// System ids are file paths. A relative reference is joined onto the
/// directory of the base path and folded lexically (symlinks are not
/// consulted). References that point at nothing, or at a directory,
/// resolve to `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileResolver;

impl FileResolver {
    pub fn new() -> Self {
        FileResolver
    }

    /// Root resource for `path`.
    pub fn root(&self, path: impl AsRef<Path>) -> Resource {
        Resource::from_path(normalize_path(path.as_ref()))
    }
}

impl ResourceResolver for FileResolver {
    fn resolve(&self, reference: &str, base: &str) -> Result<Option<Resource>, ResolveError> {
        check_reference(reference)?;
        let reference = Path::new(reference);
        let joined = if reference.is_absolute() {
            reference.to_path_buf()
        } else {
            Path::new(base)
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .join(reference)
        };
        let path = normalize_path(&joined);
        match std::fs::metadata(&path) {
            Ok(meta) if meta.is_file() => Ok(Some(Resource::from_path(path))),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ResolveError::Io(e)),
        }
    }
}

/// Lexically fold `.` and `..` components.
fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let climbable = matches!(out.components().next_back(), Some(Component::Normal(_)));
                if climbable {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

// ============================================================================
// In-memory
// ============================================================================

/// Resolves references against a fixed set of in-memory documents.
///
/// Locations are keys of the form produced by [`resolve_location`].
#[derive(Debug, Clone, Default)]
pub struct MemoryResolver {
    documents: HashMap<String, Arc<[u8]>>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document at `location`, replacing any previous one.
    pub fn insert(&mut self, location: impl Into<String>, content: impl AsRef<[u8]>) {
        self.documents
            .insert(location.into(), Arc::from(content.as_ref()));
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, location: impl Into<String>, content: impl AsRef<[u8]>) -> Self {
        self.insert(location, content);
        self
    }

    /// The document stored at exactly `location`.
    pub fn resource(&self, location: &str) -> Option<Resource> {
        self.documents
            .get(location)
            .map(|bytes| Resource::from_bytes(location, Arc::clone(bytes)))
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl ResourceResolver for MemoryResolver {
    fn resolve(&self, reference: &str, base: &str) -> Result<Option<Resource>, ResolveError> {
        check_reference(reference)?;
        Ok(self.resource(&resolve_location(reference, base)))
    }
}
