//! Caller identification for auto-detected loggers and implicit timing.
//!
//! Rust offers no reliable way to read the caller's type off the stack, so
//! the facade captures the call site with `#[track_caller]` and hands it to a
//! [`FrameInspector`]. Tests swap in a [`FixedInspector`].

use std::panic::Location;

use crate::key::TypeKey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerFrame {
    pub file: String,
    pub method: String,
}

impl CallerFrame {
    pub fn new(file: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            method: method.into(),
        }
    }
}

pub trait FrameInspector: Send + Sync {
    /// Logger key for code running at `caller`.
    fn caller_type(&self, caller: &'static Location<'static>) -> TypeKey;

    fn caller_frame(&self, caller: &'static Location<'static>) -> CallerFrame;
}

/// Derives a module path from the caller's source file.
///
/// `crates/billing/src/invoice/mod.rs` becomes `billing::invoice`, which lines
/// up with `env_logger` module directives when the crate directory carries the
/// crate name. The frame's method is that same module path, since a location
/// does not name its enclosing function.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationInspector;

impl FrameInspector for LocationInspector {
    fn caller_type(&self, caller: &'static Location<'static>) -> TypeKey {
        TypeKey::from(module_path_for(caller.file()))
    }

    fn caller_frame(&self, caller: &'static Location<'static>) -> CallerFrame {
        CallerFrame::new(caller.file(), module_path_for(caller.file()))
    }
}

pub fn module_path_for(file: &str) -> String {
    let normalized = file.replace('\\', "/");
    let without_ext = normalized.strip_suffix(".rs").unwrap_or(&normalized);
    let segments: Vec<&str> = without_ext
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();

    let Some(src_idx) = segments.iter().rposition(|s| *s == "src") else {
        return segments.last().copied().unwrap_or_default().to_string();
    };

    let mut rest = &segments[src_idx + 1..];
    let mut path = Vec::new();

    // Binaries under src/bin are their own crate, named after the file or directory.
    if rest.len() > 1 && rest[0] == "bin" {
        rest = &rest[1..];
        path.push(rest[0].replace('-', "_"));
        rest = &rest[1..];
    } else if let Some(krate) = src_idx.checked_sub(1).map(|i| segments[i]) {
        path.push(strip_version(krate).replace('-', "_"));
    }

    path.extend(
        rest.iter()
            .filter(|s| !matches!(**s, "mod" | "lib" | "main"))
            .map(|s| s.to_string()),
    );

    if path.is_empty() {
        segments.last().copied().unwrap_or_default().to_string()
    } else {
        path.join("::")
    }
}

/// `my-dep-1.2.3` as unpacked in the cargo registry is crate `my-dep`.
fn strip_version(krate: &str) -> &str {
    for (idx, _) in krate.match_indices('-') {
        let version = &krate[idx + 1..];
        let major = version.split('.').next().unwrap_or_default();
        if version.contains('.') && !major.is_empty() && major.bytes().all(|b| b.is_ascii_digit()) {
            return &krate[..idx];
        }
    }
    krate
}

/// Always reports the same caller.
#[derive(Debug, Clone)]
pub struct FixedInspector {
    key: TypeKey,
    frame: CallerFrame,
}

impl FixedInspector {
    pub fn new(key: impl Into<TypeKey>, frame: CallerFrame) -> Self {
        Self {
            key: key.into(),
            frame,
        }
    }
}

impl FrameInspector for FixedInspector {
    fn caller_type(&self, _caller: &'static Location<'static>) -> TypeKey {
        self.key.clone()
    }

    fn caller_frame(&self, _caller: &'static Location<'static>) -> CallerFrame {
        self.frame.clone()
    }
}
