//! Upload transport interface trait
//!
//! This module defines the TCP client interface used by the multipart
//! uploader. The transport is connection-oriented: `connect` opens one
//! connection, `write`/`read` operate on it, `close` releases it.

use crate::platform::error::NetError;

/// TCP upload transport trait
///
/// # Safety Invariants
///
/// - `write` and `read` are only valid between `connect` and `close`
/// - `read` is non-blocking: 0 means no data available yet, not end of stream
pub trait UploadTransport {
    /// Open a connection to `host:port`
    ///
    /// # Errors
    ///
    /// Returns `NetError::ConnectFailed` when the peer cannot be reached.
    fn connect(&mut self, host: &str, port: u16) -> Result<(), NetError>;

    /// Send `data` on the open connection
    ///
    /// # Errors
    ///
    /// Returns `NetError::SendFailed` or `NetError::Closed`.
    fn write(&mut self, data: &[u8]) -> Result<(), NetError>;

    /// Read available response bytes into `buf`
    ///
    /// Returns the number of bytes read; 0 means no data available yet.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, NetError>;

    /// Close the connection
    fn close(&mut self);
}
