//! Picture file naming
//!
//! Persisted pictures are named after their counter index
//! (`pic-00236.jpg`), which makes the file for upload item N computable
//! without a directory scan. Pictures that are uploaded without being
//! persisted get a randomized name instead, so names cannot collide across
//! non-durable sessions.

use crate::platform::traits::RngInterface;
use core::fmt::Write;
use heapless::String;

/// Maximum picture file name length
pub const MAX_PICTURE_NAME_LEN: usize = 24;

/// Maximum picture file path length (name plus leading `/`)
pub const MAX_PICTURE_PATH_LEN: usize = 25;

/// Maximum length of the randomized name part
const MAX_RAND_LEN: usize = 12;

/// A picture file name
pub type PictureName = String<MAX_PICTURE_NAME_LEN>;

/// A picture file path
pub type PicturePath = String<MAX_PICTURE_PATH_LEN>;

/// Name for the picture with the given counter index, e.g. `pic-00236.jpg`
pub fn picture_name(index: u32) -> PictureName {
    let mut name = PictureName::new();
    // Always fits: "pic-" + at most 10 digits + ".jpg"
    let _ = write!(name, "pic-{:05}.jpg", index);
    name
}

/// Randomized picture name, e.g. `pic-ahr5z.jpg`
///
/// `rand_len` is clamped to fit the bounded name.
pub fn random_picture_name<R: RngInterface>(rng: &mut R, rand_len: u8) -> PictureName {
    let len = (rand_len as usize).min(MAX_RAND_LEN);
    let mut name = PictureName::new();
    let _ = name.push_str("pic-");
    for _ in 0..len {
        let _ = name.push(random_char(rng));
    }
    let _ = name.push_str(".jpg");
    name
}

/// Absolute path of a picture file
pub fn picture_path(name: &str) -> PicturePath {
    let mut path = PicturePath::new();
    let _ = path.push('/');
    let _ = path.push_str(name);
    path
}

/// Random char in a-z or 0-9
fn random_char<R: RngInterface>(rng: &mut R) -> char {
    let value = (rng.next_u32() % 36) as u8;
    let byte = value + if value < 10 { b'0' } else { b'a' - 10 };
    byte as char
}
