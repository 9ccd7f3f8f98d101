use std::path::{Path, PathBuf};

use crate::foundation::error::{ForgeError, ForgeResult};

/// Resolves a file reference token from the setup to a concrete readable path.
///
/// Locating, caching and converting sources is the caller's business; the engine only asks for
/// a path and treats `None` as "resource unavailable".
pub trait ResourceLocator: Send + Sync {
    fn locate(&self, token: &str) -> Option<PathBuf>;
}

/// Locator resolving setup-relative tokens under one root directory.
#[derive(Clone, Debug)]
pub struct DirLocator {
    root: PathBuf,
}

impl DirLocator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceLocator for DirLocator {
    fn locate(&self, token: &str) -> Option<PathBuf> {
        let rel = normalize_rel_path(token).ok()?;
        let path = self.root.join(Path::new(&rel));
        path.is_file().then_some(path)
    }
}

/// Normalize and validate setup-relative paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> ForgeResult<String> {
    let s = source.trim().replace('\\', "/");
    if s.starts_with('/') {
        return Err(ForgeError::validation("resource paths must be relative"));
    }
    if s.is_empty() {
        return Err(ForgeError::validation("resource path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(ForgeError::validation(
                "resource paths must not contain '..'",
            ));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(ForgeError::validation(
            "resource path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}
