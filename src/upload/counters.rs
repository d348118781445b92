//! Durable picture counters
//!
//! Two integers decide what still needs uploading: how many pictures exist
//! on the card and how many of them the server has confirmed. They are kept
//! in a small text record (`/counters.txt`) that is loaded once per boot and
//! rewritten after every delivery batch, so the pipeline resumes correctly
//! after deep sleep or power loss.
//!
//! The record is plain `name=value` text so an operator can inspect or reset
//! it by editing the card.

use crate::platform::traits::StorageInterface;
use crate::platform::StorageError;
use core::fmt::Write;
use heapless::String;

/// Counters file path on the SD card
pub const COUNTERS_FILE: &str = "/counters.txt";

/// Read buffer for the counters record
const COUNTERS_MAX: usize = 128;

/// Durable counter pair
///
/// Invariant: `uploaded <= pictures` after every persist. `uploaded` only
/// advances one step at a time, immediately after a confirmed delivery.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileCounters {
    /// Pictures stored on the card so far
    pub pictures: u32,
    /// Pictures confirmed by the upload server
    pub uploaded: u32,
}

/// Counters record errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountersError {
    /// The record cannot be read
    Storage(StorageError),
    /// The record exists but does not parse
    Malformed,
}

impl From<StorageError> for CountersError {
    fn from(err: StorageError) -> Self {
        CountersError::Storage(err)
    }
}

impl FileCounters {
    /// Pictures not yet confirmed by the server
    pub fn pending(&self) -> u32 {
        self.pictures.saturating_sub(self.uploaded)
    }

    /// Load the counters record
    ///
    /// # Errors
    ///
    /// `CountersError::Malformed` when the record misses a counter, contains
    /// an unknown line, or claims more uploads than pictures.
    pub fn load<S: StorageInterface>(storage: &mut S) -> Result<Self, CountersError> {
        let mut buf = [0u8; COUNTERS_MAX];
        let len = storage.read(COUNTERS_FILE, 0, &mut buf)?;
        let text = core::str::from_utf8(&buf[..len]).map_err(|_| CountersError::Malformed)?;

        let mut pictures: Option<u32> = None;
        let mut uploaded: Option<u32> = None;
        for raw_line in text.lines() {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }
            let (key, value) = line.split_once('=').ok_or(CountersError::Malformed)?;
            let value: u32 = value.trim().parse().map_err(|_| CountersError::Malformed)?;
            match key.trim() {
                "pictureCounter" => pictures = Some(value),
                "uploadedPictureCounter" => uploaded = Some(value),
                _ => {
                    crate::log_error!("Unknown counter {}", key);
                    return Err(CountersError::Malformed);
                }
            }
        }

        match (pictures, uploaded) {
            (Some(pictures), Some(uploaded)) if uploaded <= pictures => Ok(Self {
                pictures,
                uploaded,
            }),
            _ => Err(CountersError::Malformed),
        }
    }

    /// Persist the counters record
    ///
    /// # Errors
    ///
    /// Returns the storage failure; the caller treats it as hard.
    pub fn save<S: StorageInterface>(&self, storage: &mut S) -> Result<(), StorageError> {
        let mut record: String<COUNTERS_MAX> = String::new();
        // Two u32 fields always fit the record buffer
        let _ = write!(
            record,
            "pictureCounter={}\nuploadedPictureCounter={}\n",
            self.pictures, self.uploaded
        );
        storage.write(COUNTERS_FILE, record.as_bytes())
    }

    /// Load the counters record, creating a zeroed one when absent or broken
    ///
    /// # Errors
    ///
    /// Returns the storage failure when the fresh record cannot be written.
    pub fn load_or_create<S: StorageInterface>(storage: &mut S) -> Result<Self, StorageError> {
        match Self::load(storage) {
            Ok(counters) => Ok(counters),
            Err(_) => {
                crate::log_info!("No usable counters record, creating a fresh one.");
                let counters = Self::default();
                counters.save(storage)?;
                Ok(counters)
            }
        }
    }
}
