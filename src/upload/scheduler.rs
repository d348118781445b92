//! Bunched upload scheduler
//!
//! Decides whether a delivery batch is due, iterates the undelivered range
//! in order, and persists the counters exactly once after the batch halts.
//! A failed item is not retried within the cycle; the next wake cycle picks
//! it up again because `uploaded` was never advanced past it.

use super::counters::FileCounters;
use super::filename;
use super::filename::PictureName;
use super::multipart::{BufferSource, FileSource, UploadError, Uploader};
use crate::config::settings::UploadSettings;
use crate::platform::traits::{RngInterface, StorageInterface, TimerInterface, UploadTransport};

/// True when enough undelivered pictures accumulated for a batch
///
/// Eligibility is exactly `pictures - uploaded >= bunch_size`.
pub fn bunch_ready(bunch_size: u8, counters: &FileCounters) -> bool {
    counters.pending() >= bunch_size as u32
}

/// Upload one stored picture identified by its counter index
///
/// # Errors
///
/// Delivery errors only; the counters are untouched by this function.
pub fn upload_picture_file<S, T, M>(
    storage: &mut S,
    transport: &mut T,
    timer: &mut M,
    settings: &UploadSettings,
    index: u32,
) -> Result<(), UploadError>
where
    S: StorageInterface,
    T: UploadTransport,
    M: TimerInterface,
{
    let name = filename::picture_name(index);
    let path = filename::picture_path(&name);
    crate::log_info!("Uploading picture file {}.", path.as_str());

    let mut source = FileSource::open(storage, &path).map_err(UploadError::Read)?;
    Uploader::new(transport, timer, settings).upload(&name, &mut source)
}

/// Upload stored pictures that have not reached the server yet
///
/// No-op while fewer than `bunch_size` pictures are pending; in that case
/// nothing is attempted and nothing is persisted. Otherwise items
/// `uploaded+1 ..= pictures` are delivered in order; each success advances
/// `uploaded` by one and the first failure stops the batch. The counters
/// are persisted after the loop halts, so they always reflect exactly the
/// successfully delivered prefix.
///
/// # Errors
///
/// The first delivery error, or the counters persist failure
/// (`UploadError::Write`), which takes precedence.
pub fn upload_pending<S, T, M>(
    storage: &mut S,
    transport: &mut T,
    timer: &mut M,
    settings: &UploadSettings,
    counters: &mut FileCounters,
) -> Result<(), UploadError>
where
    S: StorageInterface,
    T: UploadTransport,
    M: TimerInterface,
{
    if !bunch_ready(settings.bunch_size, counters) {
        crate::log_debug!(
            "No upload bunch yet: {} pending of {} required.",
            counters.pending(),
            settings.bunch_size
        );
        return Ok(());
    }

    let mut outcome = Ok(());
    for index in counters.uploaded + 1..=counters.pictures {
        match upload_picture_file(storage, transport, timer, settings, index) {
            Ok(()) => counters.uploaded = index,
            Err(err) => {
                crate::log_error!("Upload of picture {} failed.", index);
                outcome = Err(err);
                break;
            }
        }
    }

    counters.save(storage).map_err(UploadError::Write)?;
    outcome
}

/// Upload one in-memory picture under a randomized name
///
/// Single-shot path for devices that do not persist pictures locally: no
/// counters are involved, and the randomized name avoids collisions across
/// non-durable sessions. Returns the name the server saw.
///
/// # Errors
///
/// Delivery errors of the single attempt.
pub fn upload_snapshot<T, M, R>(
    transport: &mut T,
    timer: &mut M,
    rng: &mut R,
    settings: &UploadSettings,
    data: &[u8],
) -> Result<PictureName, UploadError>
where
    T: UploadTransport,
    M: TimerInterface,
    R: RngInterface,
{
    let name = filename::random_picture_name(rng, settings.file_name_rand_size);
    let mut source = BufferSource::new(data);
    Uploader::new(transport, timer, settings).upload(&name, &mut source)?;
    Ok(name)
}
