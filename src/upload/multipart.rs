//! Multipart picture upload
//!
//! One HTTP POST per picture: a `multipart/form-data` body with a fixed
//! boundary carrying the `auth` token field and the `fileToUpload` payload
//! field. The payload streams in fixed-size chunks from either an in-memory
//! frame buffer or a file on the card, behind [`PayloadSource`].
//!
//! Response handling is minimal on purpose: only the three-digit token after
//! the first space of the status line is read, bounded by a fixed deadline.
//! Anything other than 200 is a delivery failure.

use crate::config::settings::UploadSettings;
use crate::platform::traits::{StorageInterface, TimerInterface, UploadTransport};
use crate::platform::{NetError, StorageError};
use core::fmt::{self, Write as _};
use heapless::{String, Vec};

/// Fixed multipart boundary token
pub const BOUNDARY: &str = "TrailCamUpload";

/// Payload chunk size in bytes
const CHUNK_SIZE: usize = 1024;

/// Deadline for the response status line
const STATUS_TIMEOUT_MS: u64 = 10_000;

/// Poll interval while waiting for response bytes
const POLL_INTERVAL_MS: u32 = 100;

/// Upload pipeline errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadError {
    /// A picture file could not be read from the card
    Read(StorageError),
    /// The counters record could not be persisted
    Write(StorageError),
    /// Connection or send failure
    Net(NetError),
    /// The server answered with a status other than 200 (0 = no parseable
    /// status before the deadline)
    Rejected(u16),
    /// Request headers exceeded their fixed buffers
    RequestOverflow,
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadError::Read(e) => write!(f, "picture read error: {:?}", e),
            UploadError::Write(e) => write!(f, "counters write error: {:?}", e),
            UploadError::Net(e) => write!(f, "network error: {:?}", e),
            UploadError::Rejected(code) => write!(f, "server rejected upload: status {}", code),
            UploadError::RequestOverflow => write!(f, "request headers overflow"),
        }
    }
}

/// Source of the payload bytes of one upload
pub trait PayloadSource {
    /// Total payload length in bytes
    fn len(&self) -> u32;

    /// True when the payload is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read the next chunk into `buf`; 0 means the payload is exhausted
    ///
    /// # Errors
    ///
    /// Returns the storage failure for file-backed payloads.
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, StorageError>;
}

/// Payload held in memory (frame buffer straight from the sensor)
pub struct BufferSource<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> BufferSource<'a> {
    /// Source over `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }
}

impl PayloadSource for BufferSource<'_> {
    fn len(&self) -> u32 {
        self.data.len() as u32
    }

    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, StorageError> {
        let remaining = &self.data[self.offset..];
        let len = buf.len().min(remaining.len());
        buf[..len].copy_from_slice(&remaining[..len]);
        self.offset += len;
        Ok(len)
    }
}

/// Payload streamed from a file on the card
pub struct FileSource<'a, S: StorageInterface> {
    storage: &'a mut S,
    path: &'a str,
    size: u32,
    offset: u32,
}

impl<'a, S: StorageInterface> FileSource<'a, S> {
    /// Open `path` for streaming
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the file does not exist.
    pub fn open(storage: &'a mut S, path: &'a str) -> Result<Self, StorageError> {
        let size = storage.size(path)?;
        Ok(Self {
            storage,
            path,
            size,
            offset: 0,
        })
    }
}

impl<S: StorageInterface> PayloadSource for FileSource<'_, S> {
    fn len(&self) -> u32 {
        self.size
    }

    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, StorageError> {
        let remaining = (self.size - self.offset) as usize;
        if remaining == 0 {
            return Ok(0);
        }
        let want = buf.len().min(remaining);
        let n = self.storage.read(self.path, self.offset, &mut buf[..want])?;
        if n == 0 {
            // File shrank under us; the announced Content-Length can no
            // longer be honored.
            return Err(StorageError::ReadFailed);
        }
        self.offset += n as u32;
        Ok(n)
    }
}

/// Uploads one payload to the configured server
pub struct Uploader<'a, T: UploadTransport, M: TimerInterface> {
    transport: &'a mut T,
    timer: &'a mut M,
    settings: &'a UploadSettings,
}

impl<'a, T: UploadTransport, M: TimerInterface> Uploader<'a, T, M> {
    /// Uploader over an unconnected transport
    pub fn new(transport: &'a mut T, timer: &'a mut M, settings: &'a UploadSettings) -> Self {
        Self {
            transport,
            timer,
            settings,
        }
    }

    /// Upload one payload as `file_name`
    ///
    /// # Errors
    ///
    /// Delivery fails on connection/send errors, on a non-200 status and on
    /// a payload read failure.
    pub fn upload(
        &mut self,
        file_name: &str,
        source: &mut dyn PayloadSource,
    ) -> Result<(), UploadError> {
        crate::log_info!(
            "Connecting to server {}.",
            self.settings.server_address.as_str()
        );
        self.transport
            .connect(self.settings.server_address.as_str(), self.settings.server_port)
            .map_err(UploadError::Net)?;

        crate::log_info!("Uploading file {}...", file_name);
        let outcome = self
            .send_request(file_name, source)
            .and_then(|()| self.read_status());
        self.transport.close();

        let status = outcome?;
        crate::log_info!("Response status code: {}.", status);
        if status == 200 {
            Ok(())
        } else {
            Err(UploadError::Rejected(status))
        }
    }

    fn send_request(
        &mut self,
        file_name: &str,
        source: &mut dyn PayloadSource,
    ) -> Result<(), UploadError> {
        let mut head: String<384> = String::new();
        write!(
            head,
            "--{b}\r\nContent-Disposition: form-data; name=\"auth\"\r\n\r\n{auth}\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"fileToUpload\"; \
             filename=\"{name}\"\r\nContent-Type: image/jpeg\r\n\r\n",
            b = BOUNDARY,
            auth = self.settings.auth.as_str(),
            name = file_name,
        )
        .map_err(|_| UploadError::RequestOverflow)?;

        let mut tail: String<32> = String::new();
        write!(tail, "\r\n--{}--\r\n", BOUNDARY).map_err(|_| UploadError::RequestOverflow)?;

        let total_len = source.len() + head.len() as u32 + tail.len() as u32;

        let mut header: String<256> = String::new();
        write!(
            header,
            "POST {path} HTTP/1.1\r\nHost: {host}\r\nContent-Length: {len}\r\n\
             Content-Type: multipart/form-data; boundary={b}\r\n\r\n",
            path = self.settings.path.as_str(),
            host = self.settings.server_address.as_str(),
            len = total_len,
            b = BOUNDARY,
        )
        .map_err(|_| UploadError::RequestOverflow)?;

        self.transport
            .write(header.as_bytes())
            .map_err(UploadError::Net)?;
        self.transport
            .write(head.as_bytes())
            .map_err(UploadError::Net)?;

        let mut chunk = [0u8; CHUNK_SIZE];
        loop {
            let n = source.read_chunk(&mut chunk).map_err(UploadError::Read)?;
            if n == 0 {
                break;
            }
            self.transport.write(&chunk[..n]).map_err(UploadError::Net)?;
        }

        self.transport
            .write(tail.as_bytes())
            .map_err(UploadError::Net)
    }

    /// Read the three-digit token after the first space of the status line
    fn read_status(&mut self) -> Result<u16, UploadError> {
        let deadline = self.timer.now_ms() + STATUS_TIMEOUT_MS;
        let mut started = false;
        let mut digits: Vec<u8, 3> = Vec::new();

        'poll: while self.timer.now_ms() < deadline {
            let mut buf = [0u8; 64];
            let n = self.transport.read(&mut buf).map_err(UploadError::Net)?;
            if n == 0 {
                self.timer.delay_ms(POLL_INTERVAL_MS);
                continue;
            }
            for &byte in &buf[..n] {
                if !started {
                    started = byte == b' ';
                } else if digits.len() == 3 || byte == b' ' {
                    break 'poll;
                } else {
                    let _ = digits.push(byte);
                }
            }
        }

        Ok(core::str::from_utf8(&digits)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0))
    }
}
