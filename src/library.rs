//! Persisting finished clips into a media library.

use std::io;
use std::path::{Path, PathBuf};

use crate::foundation::error::{StillclipError, StillclipResult};

/// Destination for finished files.
pub trait LibraryWriter {
    /// Persist `path` and return where it was stored.
    fn save(&self, path: &Path) -> StillclipResult<PathBuf>;
}

/// Library backed by a plain directory.
///
/// Files are copied in, never moved, and never overwrite an existing entry.
#[derive(Clone, Debug)]
pub struct DirectoryLibrary {
    root: PathBuf,
}

impl DirectoryLibrary {
    /// Library rooted at `root` (created on first save).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Library directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn free_name(&self, file_name: &Path) -> PathBuf {
        let candidate = self.root.join(file_name);
        if !candidate.exists() {
            return candidate;
        }
        let stem = file_name
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "clip".to_string());
        let ext = file_name
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let mut n = 1u32;
        loop {
            let candidate = self.root.join(format!("{stem}-{n}{ext}"));
            if !candidate.exists() {
                return candidate;
            }
            n += 1;
        }
    }
}

impl LibraryWriter for DirectoryLibrary {
    #[tracing::instrument(level = "info", skip(self), fields(root = %self.root.display()))]
    fn save(&self, path: &Path) -> StillclipResult<PathBuf> {
        if !path.is_file() {
            return Err(StillclipError::write(format!(
                "cannot save '{}': not a file",
                path.display()
            )));
        }
        let file_name = path.file_name().ok_or_else(|| {
            StillclipError::write(format!("cannot save '{}': no file name", path.display()))
        })?;

        std::fs::create_dir_all(&self.root).map_err(|e| {
            io_error(
                e,
                format!("failed to create library directory '{}'", self.root.display()),
            )
        })?;

        let dest = self.free_name(Path::new(file_name));
        std::fs::copy(path, &dest)
            .map_err(|e| io_error(e, format!("failed to copy into '{}'", dest.display())))?;

        tracing::info!(dest = %dest.display(), "saved to library");
        Ok(dest)
    }
}

fn io_error(e: io::Error, context: String) -> StillclipError {
    match e.kind() {
        io::ErrorKind::PermissionDenied => StillclipError::permission_denied(format!("{context}: {e}")),
        _ => StillclipError::write(format!("{context}: {e}")),
    }
}
