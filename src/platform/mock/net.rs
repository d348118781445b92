//! Mock upload transport for testing
//!
//! Records every request and plays back scripted responses, one per
//! connection.

use crate::platform::error::NetError;
use crate::platform::traits::UploadTransport;
use std::collections::VecDeque;
use std::string::String;
use std::vec::Vec;

/// Mock TCP upload transport
///
/// Each `connect` starts a new recorded request and arms the next scripted
/// response; `read` then drains that response. With no scripted response the
/// peer stays silent, which exercises the uploader's response timeout.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: VecDeque<Vec<u8>>,
    requests: Vec<Vec<u8>>,
    targets: Vec<(String, u16)>,
    current_response: Vec<u8>,
    response_sent: bool,
    connected: bool,
    refuse_connections: bool,
}

impl MockTransport {
    /// Create a transport with no scripted responses
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw response for the next connection
    pub fn push_response(&mut self, response: &[u8]) {
        self.responses.push_back(Vec::from(response));
    }

    /// Queue `n` plain `200 OK` responses
    pub fn push_ok_responses(&mut self, n: usize) {
        for _ in 0..n {
            self.push_response(b"HTTP/1.1 200 OK\r\n\r\n");
        }
    }

    /// Refuse every subsequent connection attempt
    pub fn refuse_connections(&mut self) {
        self.refuse_connections = true;
    }

    /// Recorded request bodies, one per connection (for test verification)
    pub fn requests(&self) -> &[Vec<u8>] {
        &self.requests
    }

    /// Recorded connection targets, one per connection
    pub fn targets(&self) -> &[(String, u16)] {
        &self.targets
    }
}

impl UploadTransport for MockTransport {
    fn connect(&mut self, host: &str, port: u16) -> Result<(), NetError> {
        if self.refuse_connections {
            return Err(NetError::ConnectFailed);
        }
        self.connected = true;
        self.targets.push((String::from(host), port));
        self.requests.push(Vec::new());
        self.current_response = self.responses.pop_front().unwrap_or_default();
        self.response_sent = false;
        Ok(())
    }

    fn write(&mut self, data: &[u8]) -> Result<(), NetError> {
        if !self.connected {
            return Err(NetError::Closed);
        }
        match self.requests.last_mut() {
            Some(req) => {
                req.extend_from_slice(data);
                Ok(())
            }
            None => Err(NetError::SendFailed),
        }
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, NetError> {
        if !self.connected || self.response_sent || self.current_response.is_empty() {
            return Ok(0);
        }
        let len = buf.len().min(self.current_response.len());
        buf[..len].copy_from_slice(&self.current_response[..len]);
        // The whole scripted response fits one poll in practice.
        self.current_response.drain(..len);
        if self.current_response.is_empty() {
            self.response_sent = true;
        }
        Ok(len)
    }

    fn close(&mut self) {
        self.connected = false;
    }
}
