//! Picture persistence
//!
//! Stores one captured frame on the card and advances the produced counter.
//! The file is written before the counters: a power cut between the two
//! leaves an uncounted picture file that the next capture simply overwrites,
//! and never a counter pointing at a missing file.

use super::counters::FileCounters;
use super::filename;
use super::filename::PictureName;
use crate::platform::traits::StorageInterface;
use crate::platform::StorageError;

/// Persist a captured picture and advance the counters
///
/// Returns the name the picture was stored under.
///
/// # Errors
///
/// Returns the storage failure of either the picture write or the counters
/// persist; the counters are only advanced after the picture is on the card.
pub fn store_picture<S: StorageInterface>(
    storage: &mut S,
    counters: &mut FileCounters,
    data: &[u8],
) -> Result<PictureName, StorageError> {
    let index = counters.pictures + 1;
    let name = filename::picture_name(index);
    let path = filename::picture_path(&name);

    storage.write(&path, data)?;
    crate::log_info!("Saved picture {}.", path.as_str());

    counters.pictures = index;
    counters.save(storage)?;
    Ok(name)
}
