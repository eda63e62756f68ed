//! SD-card implementation of the platform storage traits.
//!
//! embedded-sdmmc hands out volume/directory/file handles that borrow each
//! other, which fights the simple `Storage` trait shape. The key file is a
//! few kilobytes and read exactly once at boot, so this adapter opens the
//! volume per call and reads files eagerly into a fixed buffer, returning a
//! plain cursor.

use embedded_sdmmc::{BlockDevice, Mode, TimeSource, Timestamp, VolumeIdx, VolumeManager};
use platform::storage::{File, Storage};

use crate::boot::KEY_FILE_MAX;

/// Fixed timestamp source: the card is read-only for us, and FAT mtimes on
/// a panel have no consumer.
pub struct NullTime;

impl TimeSource for NullTime {
    fn get_timestamp(&self) -> Timestamp {
        Timestamp {
            year_since_1970: 54,
            zero_indexed_month: 0,
            zero_indexed_day: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
        }
    }
}

/// Errors surfaced by the SD adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdStorageError {
    /// Volume 0 would not open (no card, unformatted card).
    Mount,
    /// File missing or unreadable.
    File,
    /// File larger than the boot read buffer.
    TooLarge,
}

/// Storage over the first FAT volume of an SD card.
pub struct SdStorage<D: BlockDevice> {
    volume_mgr: VolumeManager<D, NullTime>,
}

impl<D: BlockDevice> SdStorage<D> {
    /// Wrap a block device (typically `embedded_sdmmc::SdCard`).
    pub fn new(device: D) -> Self {
        Self {
            volume_mgr: VolumeManager::new(device, NullTime),
        }
    }

    /// Whether volume 0 mounts. Used by boot to distinguish "no card" from
    /// "card without a key file".
    pub fn probe(&mut self) -> bool {
        self.volume_mgr.open_volume(VolumeIdx(0)).is_ok()
    }
}

impl<D: BlockDevice> Storage for SdStorage<D> {
    type Error = SdStorageError;
    type File = SdFileBuf;

    async fn open_file(&mut self, path: &str) -> Result<SdFileBuf, SdStorageError> {
        let mut volume = self
            .volume_mgr
            .open_volume(VolumeIdx(0))
            .map_err(|_| SdStorageError::Mount)?;
        let mut root = volume.open_root_dir().map_err(|_| SdStorageError::Mount)?;
        let mut file = root
            .open_file_in_dir(path, Mode::ReadOnly)
            .map_err(|_| SdStorageError::File)?;

        let mut contents: heapless::Vec<u8, KEY_FILE_MAX> = heapless::Vec::new();
        let mut chunk = [0u8; 64];
        loop {
            let n = file.read(&mut chunk).map_err(|_| SdStorageError::File)?;
            if n == 0 {
                break;
            }
            let filled = chunk.get(..n).ok_or(SdStorageError::File)?;
            contents
                .extend_from_slice(filled)
                .map_err(|_| SdStorageError::TooLarge)?;
        }

        Ok(SdFileBuf { contents, pos: 0 })
    }

    async fn exists(&mut self, path: &str) -> Result<bool, SdStorageError> {
        let mut volume = self
            .volume_mgr
            .open_volume(VolumeIdx(0))
            .map_err(|_| SdStorageError::Mount)?;
        let mut root = volume.open_root_dir().map_err(|_| SdStorageError::Mount)?;
        match root.find_directory_entry(path) {
            Ok(_) => Ok(true),
            Err(embedded_sdmmc::Error::NotFound) => Ok(false),
            Err(_) => Err(SdStorageError::File),
        }
    }

    async fn list_root(&mut self, f: &mut dyn FnMut(&str, u64)) -> Result<(), SdStorageError> {
        use core::fmt::Write as _;

        let mut volume = self
            .volume_mgr
            .open_volume(VolumeIdx(0))
            .map_err(|_| SdStorageError::Mount)?;
        let mut root = volume.open_root_dir().map_err(|_| SdStorageError::Mount)?;
        root.iterate_dir(|entry| {
            let mut name: heapless::String<16> = heapless::String::new();
            let _ = write!(name, "{}", entry.name);
            f(name.as_str(), u64::from(entry.size));
        })
        .map_err(|_| SdStorageError::File)
    }
}

/// A whole key file, buffered at open time.
pub struct SdFileBuf {
    contents: heapless::Vec<u8, KEY_FILE_MAX>,
    pos: usize,
}

impl File for SdFileBuf {
    type Error = SdStorageError;

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, SdStorageError> {
        let remaining = self.contents.len().saturating_sub(self.pos);
        let n = remaining.min(buf.len());
        let src = self
            .contents
            .get(self.pos..self.pos.saturating_add(n))
            .ok_or(SdStorageError::File)?;
        buf.get_mut(..n)
            .ok_or(SdStorageError::File)?
            .copy_from_slice(src);
        self.pos = self.pos.saturating_add(n);
        Ok(n)
    }

    fn size(&self) -> u64 {
        self.contents.len() as u64
    }
}
