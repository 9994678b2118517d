use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use crate::foundation::error::{StripError, StripResult};

/// Loads overlay markup for a layout's overlay reference.
///
/// Every failure is reported as [`StripError::OverlayFetch`]; the compositor degrades to a plain
/// stroked frame instead of aborting.
pub trait OverlaySource: Send + Sync {
    fn load(&self, reference: &str) -> StripResult<String>;
}

/// Overlay files under a template root directory.
#[derive(Clone, Debug)]
pub struct FsOverlaySource {
    root: PathBuf,
}

impl FsOverlaySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl OverlaySource for FsOverlaySource {
    fn load(&self, reference: &str) -> StripResult<String> {
        let norm = normalize_rel_path(reference)?;
        let path = self.root.join(Path::new(&norm));
        std::fs::read_to_string(&path)
            .map_err(|e| StripError::overlay_fetch(format!("read '{}': {e}", path.display())))
    }
}

/// Overlay markup held in memory, keyed by normalized reference.
#[derive(Clone, Debug, Default)]
pub struct InMemoryOverlaySource {
    entries: HashMap<String, String>,
}

impl InMemoryOverlaySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, reference: &str, markup: impl Into<String>) -> StripResult<()> {
        self.entries
            .insert(normalize_rel_path(reference)?, markup.into());
        Ok(())
    }

    pub fn with(mut self, reference: &str, markup: impl Into<String>) -> StripResult<Self> {
        self.insert(reference, markup)?;
        Ok(self)
    }
}

impl OverlaySource for InMemoryOverlaySource {
    fn load(&self, reference: &str) -> StripResult<String> {
        let norm = normalize_rel_path(reference)?;
        self.entries
            .get(&norm)
            .cloned()
            .ok_or_else(|| StripError::overlay_fetch(format!("no overlay registered for '{norm}'")))
    }
}

/// Normalize and validate template-relative overlay references.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(reference: &str) -> StripResult<String> {
    let s = reference.trim().replace('\\', "/");
    if s.starts_with('/') {
        return Err(StripError::overlay_fetch(format!(
            "overlay reference '{reference}' must be relative"
        )));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(StripError::overlay_fetch(format!(
                "overlay reference '{reference}' must not contain '..'"
            )));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(StripError::overlay_fetch(
            "overlay reference must contain a file name",
        ));
    }
    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
