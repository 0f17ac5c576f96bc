use crate::error::{KubeAiError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Read a UTF-8 file, mapping a missing path to [`KubeAiError::FileNotFound`].
pub fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            KubeAiError::FileNotFound(path.to_path_buf())
        } else {
            KubeAiError::ReadFile {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

/// Atomically replace `path` with `data` using a tempfile in the same directory.
///
/// The original contents stay intact if anything fails before the rename.
/// Symlinks are followed so the link target is what gets replaced, and the
/// replacement keeps the existing file's permissions. A new file gets mode
/// 0644 minus the process umask.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let wrap = |source: std::io::Error| KubeAiError::WriteFile {
        path: path.to_path_buf(),
        source,
    };

    let target = resolve_target(path).map_err(wrap)?;
    let dir = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(wrap)?;

    let (permissions, created) = match std::fs::metadata(&target) {
        Ok(meta) => (meta.permissions(), false),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            (create_placeholder(&target).map_err(wrap)?, true)
        }
        Err(e) => return Err(wrap(e)),
    };

    let result = replace_with(&dir, &target, data, permissions);
    if result.is_err() && created {
        let _ = std::fs::remove_file(&target);
    }
    result.map_err(wrap)
}

fn replace_with(
    dir: &Path,
    target: &Path,
    data: &[u8],
    permissions: std::fs::Permissions,
) -> std::io::Result<()> {
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.as_file().set_permissions(permissions)?;
    tmp.persist(target).map_err(|e| e.error)?;
    Ok(())
}

/// The real file behind `path`, or `path` itself when nothing exists there yet.
fn resolve_target(path: &Path) -> std::io::Result<PathBuf> {
    match std::fs::canonicalize(path) {
        Ok(real) => Ok(real),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(path.to_path_buf()),
        Err(e) => Err(e),
    }
}

/// Create an empty file with the default manifest mode and return the
/// umask-adjusted permissions it ended up with.
fn create_placeholder(path: &Path) -> std::io::Result<std::fs::Permissions> {
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }
    let file = options.open(path)?;
    Ok(file.metadata()?.permissions())
}

/// Append text to a file, creating it if it doesn't exist.
pub fn append_text(path: &Path, text: &str) -> Result<()> {
    let mut f = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| KubeAiError::WriteFile {
            path: path.to_path_buf(),
            source,
        })?;
    f.write_all(text.as_bytes())?;
    Ok(())
}
