//! Mock implementations for testing
//!
//! In-memory stand-ins for the platform traits, used by unit and
//! integration tests across the workspace.

#![allow(clippy::unwrap_used)] // test support code

use crate::storage::{File, Storage};

/// Maximum number of files a [`MemStorage`] can hold.
pub const MEM_STORAGE_FILES: usize = 4;

/// Maximum size of a single file in a [`MemStorage`].
///
/// Deliberately larger than the firmware's key-file limit so tests can
/// stage oversized files.
pub const MEM_FILE_BYTES: usize = 8192;

/// Error type shared by [`MemStorage`] and [`MemFile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemStorageError {
    /// No file with the requested name.
    NotFound,
    /// Simulated mount/read failure, armed via [`MemStorage::fail_reads`].
    Injected,
}

type Name = heapless::String<32>;
type Contents = heapless::Vec<u8, MEM_FILE_BYTES>;

/// In-memory filesystem with a handful of named files.
pub struct MemStorage {
    files: heapless::Vec<(Name, Contents), MEM_STORAGE_FILES>,
    fail_reads: bool,
}

impl MemStorage {
    /// Create an empty storage.
    pub fn new() -> Self {
        Self {
            files: heapless::Vec::new(),
            fail_reads: false,
        }
    }

    /// Add a file. Panics (test code) if capacity is exceeded.
    pub fn with_file(mut self, name: &str, contents: &[u8]) -> Self {
        let mut n: Name = heapless::String::new();
        n.push_str(name).unwrap();
        let mut c: Contents = heapless::Vec::new();
        c.extend_from_slice(contents).unwrap();
        self.files.push((n, c)).map_err(|_| ()).unwrap();
        self
    }

    /// Make every subsequent read fail, simulating a dying card.
    pub fn fail_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }
}

impl Default for MemStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for MemStorage {
    type Error = MemStorageError;
    type File = MemFile;

    async fn open_file(&mut self, path: &str) -> Result<MemFile, MemStorageError> {
        let (_, contents) = self
            .files
            .iter()
            .find(|(name, _)| name.as_str() == path)
            .ok_or(MemStorageError::NotFound)?;
        Ok(MemFile {
            contents: contents.clone(),
            pos: 0,
            fail_reads: self.fail_reads,
        })
    }

    async fn exists(&mut self, path: &str) -> Result<bool, MemStorageError> {
        Ok(self.files.iter().any(|(name, _)| name.as_str() == path))
    }

    async fn list_root(&mut self, f: &mut dyn FnMut(&str, u64)) -> Result<(), MemStorageError> {
        for (name, contents) in &self.files {
            f(name.as_str(), contents.len() as u64);
        }
        Ok(())
    }
}

/// A cursor over one [`MemStorage`] file.
pub struct MemFile {
    contents: Contents,
    pos: usize,
    fail_reads: bool,
}

impl File for MemFile {
    type Error = MemStorageError;

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, MemStorageError> {
        if self.fail_reads {
            return Err(MemStorageError::Injected);
        }
        let remaining = self.contents.len().saturating_sub(self.pos);
        let n = remaining.min(buf.len());
        let src = self
            .contents
            .get(self.pos..self.pos.saturating_add(n))
            .ok_or(MemStorageError::Injected)?;
        buf.get_mut(..n)
            .ok_or(MemStorageError::Injected)?
            .copy_from_slice(src);
        self.pos = self.pos.saturating_add(n);
        Ok(n)
    }

    fn size(&self) -> u64 {
        self.contents.len() as u64
    }
}
