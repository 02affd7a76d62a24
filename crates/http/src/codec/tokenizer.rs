use http::{Method, Version};
use httparse::{Error, Status};
use tracing::trace;

use crate::ensure;
use crate::protocol::ParseError;

/// Maximum number of headers allowed in a request
pub const MAX_HEADER_NUM: usize = 64;

/// Maximum size in bytes of a start line or of a header block
pub const MAX_HEADER_BYTES: usize = 8 * 1024;

/// Receives the parsed start line.
pub trait RequestLineHandler {
    /// `target` borrows the inbound window and is only valid for this call.
    fn on_start_line(&mut self, method: &Method, target: &[u8], version: Version);
}

/// Receives the parsed header fields, both callbacks default to ignoring them.
pub trait HeadersHandler {
    fn on_header(&mut self, _name: &[u8], _value: &[u8]) {}

    fn on_headers_complete(&mut self) {}
}

/// Incremental HTTP/1.x request tokenizer built on `httparse`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RequestTokenizer;

impl RequestTokenizer {
    pub fn new() -> Self {
        Self
    }

    /// Parses the start line at the beginning of `buf`.
    ///
    /// Empty lines in front of the start line are skipped and consumed
    /// together with it.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(consumed))` if a complete start line was parsed and reported
    /// - `Ok(None)` if the line is not complete yet
    /// - `Err(ParseError)` if the line is malformed or too long
    pub fn parse_request_line<H>(&self, handler: &mut H, buf: &[u8]) -> Result<Option<usize>, ParseError>
    where
        H: RequestLineHandler + ?Sized,
    {
        let skipped = buf.iter().take_while(|&&b| b == b'\r' || b == b'\n').count();
        let Some(line_end) = memchr::memchr(b'\n', &buf[skipped..]) else {
            ensure!(buf.len() <= MAX_HEADER_BYTES, ParseError::too_large_header(buf.len(), MAX_HEADER_BYTES));
            return Ok(None);
        };
        let consumed = skipped + line_end + 1;
        ensure!(consumed <= MAX_HEADER_BYTES, ParseError::too_large_header(consumed, MAX_HEADER_BYTES));

        // no header slots: httparse stops right after the start line
        let mut req = httparse::Request::new(&mut []);
        match req.parse(&buf[skipped..consumed]) {
            Ok(_) | Err(Error::TooManyHeaders) => {}
            Err(e) => return Err(ParseError::invalid_header(e)),
        }

        let method = req.method.ok_or(ParseError::InvalidMethod)?;
        let method = Method::from_bytes(method.as_bytes()).map_err(|_e| ParseError::InvalidMethod)?;
        let target = req.path.ok_or(ParseError::InvalidUri)?;
        let version = match req.version {
            Some(0) => Version::HTTP_10,
            Some(1) => Version::HTTP_11,
            // Currently HTTP/2 and HTTP/3 not supported
            v => return Err(ParseError::InvalidVersion(v)),
        };

        trace!(consumed, %method, ?version, "parsed request line");
        handler.on_start_line(&method, target.as_bytes(), version);
        Ok(Some(consumed))
    }

    /// Parses a complete header block, including the empty line closing it.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(consumed))` if the block was complete, every field has been reported
    /// - `Ok(None)` if the block is not complete yet, nothing has been reported
    /// - `Err(ParseError)` if the block is malformed or exceeds the limits
    pub fn parse_headers<H>(&self, handler: &mut H, buf: &[u8]) -> Result<Option<usize>, ParseError>
    where
        H: HeadersHandler + ?Sized,
    {
        let mut headers = [httparse::EMPTY_HEADER; MAX_HEADER_NUM];

        match httparse::parse_headers(buf, &mut headers) {
            Ok(Status::Complete((consumed, headers))) => {
                ensure!(consumed <= MAX_HEADER_BYTES, ParseError::too_large_header(consumed, MAX_HEADER_BYTES));
                for header in headers {
                    handler.on_header(header.name.as_bytes(), header.value);
                }
                handler.on_headers_complete();
                trace!(consumed, header_count = headers.len(), "parsed headers");
                Ok(Some(consumed))
            }
            Ok(Status::Partial) => {
                ensure!(buf.len() <= MAX_HEADER_BYTES, ParseError::too_large_header(buf.len(), MAX_HEADER_BYTES));
                Ok(None)
            }
            Err(Error::TooManyHeaders) => Err(ParseError::too_many_headers(MAX_HEADER_NUM)),
            Err(e) => Err(ParseError::invalid_header(e)),
        }
    }
}
