//! Atomic file replacement for the state file

use crate::traits::StorageResult;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes to a sibling `.tmp` file and renames it over the target on commit
///
/// Readers never observe a half-written state file: either the old content or
/// the new one is in place.
pub(crate) struct AtomicWriter {
    temp_path: PathBuf,
    final_path: PathBuf,
    file: Option<File>,
}

impl AtomicWriter {
    pub(crate) fn new<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        let final_path = path.as_ref().to_path_buf();

        if let Some(parent) = final_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = Self::temp_path(&final_path);
        let file = File::create(&temp_path)?;

        Ok(Self {
            temp_path,
            final_path,
            file: Some(file),
        })
    }

    pub(crate) fn write(&mut self, data: &[u8]) -> StorageResult<()> {
        if let Some(file) = self.file.as_mut() {
            file.write_all(data)?;
        }
        Ok(())
    }

    /// Flush, sync and rename into place
    pub(crate) fn commit(mut self) -> StorageResult<()> {
        if let Some(mut file) = self.file.take() {
            file.flush()?;
            file.sync_all()?;
        }
        fs::rename(&self.temp_path, &self.final_path)?;
        Ok(())
    }

    fn temp_path(final_path: &Path) -> PathBuf {
        let mut temp = final_path.as_os_str().to_owned();
        temp.push(".tmp");
        PathBuf::from(temp)
    }
}

impl Drop for AtomicWriter {
    fn drop(&mut self) {
        // Leftover only when commit did not run or failed before the rename
        if self.temp_path.exists() {
            let _ = fs::remove_file(&self.temp_path);
        }
    }
}
