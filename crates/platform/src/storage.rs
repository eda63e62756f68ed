//! Storage abstraction for the key file
//!
//! The firmware reads exactly one file at boot: the RSA private key. These
//! traits keep that read testable on the host; the hardware implementation
//! sits on embedded-sdmmc in the firmware crate.

/// Storage trait for file system access
pub trait Storage {
    /// Error type
    type Error: core::fmt::Debug;
    /// File type
    type File: File;

    /// Open a file for reading, relative to the filesystem root.
    async fn open_file(&mut self, path: &str) -> Result<Self::File, Self::Error>;

    /// Check whether `path` exists.
    async fn exists(&mut self, path: &str) -> Result<bool, Self::Error>;

    /// Iterate root-directory entries, invoking `f` with each name and size.
    ///
    /// Used only for the boot-time file listing in the log; implementations
    /// without cheap directory iteration may make this a no-op.
    async fn list_root(&mut self, f: &mut dyn FnMut(&str, u64)) -> Result<(), Self::Error>;
}

/// File trait for reading files
pub trait File {
    /// Error type
    type Error: core::fmt::Debug;

    /// Read from the current position; returns bytes read, 0 at end of file.
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// File size in bytes.
    fn size(&self) -> u64;
}

/// Errors from the generic whole-file read helper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror_no_std::Error)]
pub enum StorageError {
    /// The file is larger than the destination buffer's capacity.
    #[error("file exceeds buffer capacity")]
    TooLarge,
    /// The underlying filesystem reported an error mid-read.
    #[error("read failed")]
    Io,
}

/// Read an entire file into a heapless vector.
///
/// Returns [`StorageError::TooLarge`] without reading anything when the
/// reported file size exceeds `N`, so a corrupt or oversized key file cannot
/// chew through the read path byte by byte.
pub async fn read_to_vec<F: File, const N: usize>(
    file: &mut F,
) -> Result<heapless::Vec<u8, N>, StorageError> {
    if file.size() > N as u64 {
        return Err(StorageError::TooLarge);
    }

    let mut out: heapless::Vec<u8, N> = heapless::Vec::new();
    let mut chunk = [0u8; 64];
    loop {
        let n = file.read(&mut chunk).await.map_err(|_| StorageError::Io)?;
        if n == 0 {
            break;
        }
        let filled = chunk.get(..n).ok_or(StorageError::Io)?;
        out.extend_from_slice(filled)
            .map_err(|_| StorageError::TooLarge)?;
    }
    Ok(out)
}
