//! Mock SD filesystem for testing
//!
//! Provides an in-memory file map with failure injection.

use crate::platform::error::StorageError;
use crate::platform::traits::StorageInterface;
use std::collections::BTreeMap;
use std::string::String;
use std::vec::Vec;

/// Mock SD filesystem
///
/// Simulates the card's filesystem in memory. Supports read/write failure
/// injection for error-path testing.
#[derive(Debug, Default)]
pub struct MockStorage {
    files: BTreeMap<String, Vec<u8>>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MockStorage {
    /// Create an empty mock filesystem
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a file
    pub fn insert(&mut self, path: &str, data: &[u8]) {
        self.files.insert(String::from(path), Vec::from(data));
    }

    /// File contents (for test verification)
    pub fn contents(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(|d| d.as_slice())
    }

    /// Number of stored files
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Make every subsequent read fail
    pub fn inject_read_failure(&mut self) {
        self.fail_reads = true;
    }

    /// Make every subsequent write fail
    pub fn inject_write_failure(&mut self) {
        self.fail_writes = true;
    }

    /// Clear injected failures
    pub fn clear_failures(&mut self) {
        self.fail_reads = false;
        self.fail_writes = false;
    }
}

impl StorageInterface for MockStorage {
    fn exists(&mut self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    fn size(&mut self, path: &str) -> Result<u32, StorageError> {
        self.files
            .get(path)
            .map(|d| d.len() as u32)
            .ok_or(StorageError::NotFound)
    }

    fn read(&mut self, path: &str, offset: u32, buf: &mut [u8]) -> Result<usize, StorageError> {
        if self.fail_reads {
            return Err(StorageError::ReadFailed);
        }
        let data = self.files.get(path).ok_or(StorageError::NotFound)?;
        let start = (offset as usize).min(data.len());
        let len = buf.len().min(data.len() - start);
        buf[..len].copy_from_slice(&data[start..start + len]);
        Ok(len)
    }

    fn write(&mut self, path: &str, data: &[u8]) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::WriteFailed);
        }
        self.files.insert(String::from(path), Vec::from(data));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_storage_read_write() {
        let mut storage = MockStorage::new();
        storage.write("/a.txt", b"hello").unwrap();

        assert!(storage.exists("/a.txt"));
        assert_eq!(storage.size("/a.txt").unwrap(), 5);

        let mut buf = [0u8; 16];
        let n = storage.read("/a.txt", 0, &mut buf).unwrap();
        assert_eq!(&buf[..n], b"hello");
    }

    #[test]
    fn test_mock_storage_offset_read() {
        let mut storage = MockStorage::new();
        storage.insert("/a.bin", &[1, 2, 3, 4, 5]);

        let mut buf = [0u8; 2];
        assert_eq!(storage.read("/a.bin", 3, &mut buf).unwrap(), 2);
        assert_eq!(buf, [4, 5]);
        assert_eq!(storage.read("/a.bin", 5, &mut buf).unwrap(), 0);
    }

    #[test]
    fn test_mock_storage_missing_file() {
        let mut storage = MockStorage::new();
        let mut buf = [0u8; 4];
        assert_eq!(
            storage.read("/nope", 0, &mut buf),
            Err(StorageError::NotFound)
        );
    }

    #[test]
    fn test_mock_storage_failure_injection() {
        let mut storage = MockStorage::new();
        storage.insert("/a.txt", b"x");
        storage.inject_read_failure();
        storage.inject_write_failure();

        let mut buf = [0u8; 1];
        assert_eq!(
            storage.read("/a.txt", 0, &mut buf),
            Err(StorageError::ReadFailed)
        );
        assert_eq!(storage.write("/b.txt", b"y"), Err(StorageError::WriteFailed));

        storage.clear_failures();
        assert!(storage.write("/b.txt", b"y").is_ok());
    }
}
