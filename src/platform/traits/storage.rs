//! SD filesystem interface trait
//!
//! This module defines the filesystem interface that platform implementations
//! must provide. The core stores three kinds of files on the card: the
//! configuration file, the counters record and the captured pictures.
//!
//! # Safety Invariants
//!
//! - The card must be mounted before any call
//! - Paths are absolute, rooted at the card's filesystem root
//! - No concurrent access from multiple contexts

use crate::platform::error::StorageError;

/// SD filesystem interface trait
pub trait StorageInterface {
    /// Check whether a file exists
    fn exists(&mut self, path: &str) -> bool;

    /// Size of a file in bytes
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the file does not exist.
    fn size(&mut self, path: &str) -> Result<u32, StorageError>;

    /// Read up to `buf.len()` bytes starting at `offset`
    ///
    /// Returns the number of bytes read; 0 means end of file.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the file does not exist,
    /// `StorageError::ReadFailed` on a card-level failure.
    fn read(&mut self, path: &str, offset: u32, buf: &mut [u8]) -> Result<usize, StorageError>;

    /// Create or truncate a file and write `data` to it
    ///
    /// # Errors
    ///
    /// Returns `StorageError::WriteFailed` on a card-level failure.
    fn write(&mut self, path: &str, data: &[u8]) -> Result<(), StorageError>;
}
