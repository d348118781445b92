//! Durable, resumable picture upload pipeline
//!
//! The pipeline is driven by a persisted counter pair: how many pictures
//! were produced, how many the server confirmed. Each wake cycle stores the
//! new capture ([`store::store_picture`]), then delivers the undelivered
//! range in order once enough pictures are pending
//! ([`scheduler::upload_pending`]). Partial failure leaves a consistent
//! state: `uploaded` reflects exactly the delivered prefix, and the next
//! cycle resumes behind it.
//!
//! Devices that do not persist pictures use the single-shot
//! [`scheduler::upload_snapshot`] path instead; no counters are involved.

pub mod counters;
pub mod filename;
pub mod multipart;
pub mod scheduler;
pub mod store;

pub use counters::{CountersError, FileCounters, COUNTERS_FILE};
pub use filename::{PictureName, PicturePath};
pub use multipart::{BufferSource, FileSource, PayloadSource, UploadError, Uploader, BOUNDARY};
pub use scheduler::{bunch_ready, upload_pending, upload_picture_file, upload_snapshot};
pub use store::store_picture;
