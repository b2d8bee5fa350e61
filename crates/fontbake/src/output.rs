//! Atomic file output.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use fontbake_core::logging::targets;

use crate::error::{AppError, AppResult};

/// Writes a file through a temporary sibling and a rename.
///
/// The target is either fully replaced or left untouched. A writer dropped without
/// [`commit`](Self::commit) removes its temporary file.
///
/// # Example
///
/// ```ignore
/// use fontbake::output::AtomicWriter;
///
/// let mut writer = AtomicWriter::new("out/font.fnt")?;
/// writer.write_all(&descriptor)?;
/// writer.commit()?;
/// ```
pub struct AtomicWriter {
    target_path: PathBuf,
    temp_path: PathBuf,
    writer: Option<BufWriter<File>>,
    committed: bool,
}

impl AtomicWriter {
    /// Create the temporary file next to `path`.
    pub fn new(path: impl AsRef<Path>) -> AppResult<Self> {
        let target_path = path.as_ref().to_path_buf();

        // Same directory, so the rename never crosses file systems.
        let parent = target_path.parent().unwrap_or(Path::new("."));
        let file_name = target_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "file".to_string());
        let temp_path = parent.join(format!(".{}.tmp.{}", file_name, std::process::id()));

        let file = File::create(&temp_path).map_err(|e| AppError::write(&target_path, e))?;

        Ok(Self {
            target_path,
            temp_path,
            writer: Some(BufWriter::new(file)),
            committed: false,
        })
    }

    /// Append bytes to the temporary file.
    pub fn write_all(&mut self, buf: &[u8]) -> AppResult<()> {
        let writer = self.writer.as_mut().ok_or_else(|| {
            AppError::write(&self.target_path, std::io::Error::other("writer already closed"))
        })?;
        writer
            .write_all(buf)
            .map_err(|e| AppError::write(&self.target_path, e))
    }

    /// Flush, sync and rename over the target.
    pub fn commit(mut self) -> AppResult<()> {
        self.sync()?;

        fs::rename(&self.temp_path, &self.target_path)
            .map_err(|e| AppError::write(&self.target_path, e))?;

        self.committed = true;
        tracing::debug!(target: targets::APP, path = %self.target_path.display(), "file written");
        Ok(())
    }

    /// Flush and sync the temporary file, then close it.
    fn sync(&mut self) -> AppResult<()> {
        let Some(mut writer) = self.writer.take() else {
            return Ok(());
        };
        writer
            .flush()
            .map_err(|e| AppError::write(&self.target_path, e))?;
        writer
            .get_ref()
            .sync_all()
            .map_err(|e| AppError::write(&self.target_path, e))
    }
}

impl Drop for AtomicWriter {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.temp_path);
        }
    }
}

impl std::fmt::Debug for AtomicWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtomicWriter")
            .field("target_path", &self.target_path)
            .field("temp_path", &self.temp_path)
            .field("committed", &self.committed)
            .finish_non_exhaustive()
    }
}

/// Write a group of files, all or nothing.
///
/// Every temporary file is written and synced before the first rename, so a full
/// disk or an unwritable directory leaves all targets untouched. If a rename fails
/// part way, the targets renamed so far are removed again.
pub fn write_files<'a, I>(files: I) -> AppResult<()>
where
    I: IntoIterator<Item = (&'a Path, &'a [u8])>,
{
    let mut staged = Vec::new();
    for (path, bytes) in files {
        let mut writer = AtomicWriter::new(path)?;
        writer.write_all(bytes)?;
        writer.sync()?;
        staged.push(writer);
    }

    let mut renamed: Vec<PathBuf> = Vec::with_capacity(staged.len());
    for writer in staged {
        let target = writer.target_path.clone();
        if let Err(err) = writer.commit() {
            for path in &renamed {
                let _ = fs::remove_file(path);
            }
            tracing::warn!(
                target: targets::APP,
                removed = renamed.len(),
                "output incomplete, removed files already written"
            );
            return Err(err);
        }
        renamed.push(target);
    }
    Ok(())
}
