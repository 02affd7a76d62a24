//! The per-connection request state machine.

use std::sync::Arc;

use http::{Method, Version};
use tokio::io::AsyncWrite;
use tracing::trace;

use crate::buffer::{BufferWriter, OutputSink};
use crate::codec::{HeadersHandler, RequestLineHandler, RequestTokenizer};
use crate::config::ConnectionConfig;
use crate::connection::ResponseWriter;
use crate::date::DateHeader;
use crate::ensure;
use crate::handler::{self, DefaultRoute, RequestType};
use crate::protocol::{ParseError, SendError};

/// Where the parser stands within the current request.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    /// waiting for a complete start line
    #[default]
    StartLine,
    /// start line parsed, waiting for the complete header block
    Headers,
    /// request fully parsed, waiting for its response
    Body,
}

/// Outcome of draining a read window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drain {
    /// Every complete request was answered, `consumed` bytes can be released.
    Completed { consumed: usize },
    /// The request ending at `consumed` needs [`RequestPipeline::respond_async`],
    /// the bytes after it were not examined.
    Suspended { consumed: usize },
}

/// Request parsing state and response dispatch of one connection.
///
/// The state survives across reads, so a request split over any number of
/// reads resumes exactly where the previous read stopped. It moves
/// `StartLine -> Headers -> Body` while parsing and returns to `StartLine`
/// only once the response has been produced.
#[derive(Debug)]
pub struct RequestPipeline {
    state: ParseState,
    request_type: RequestType,
    tokenizer: RequestTokenizer,
    default_route: DefaultRoute,
    write_size_hint: usize,
    date_header: Arc<DateHeader>,
}

impl RequestPipeline {
    pub fn new(config: &ConnectionConfig, date_header: Arc<DateHeader>) -> Self {
        Self {
            state: ParseState::StartLine,
            request_type: RequestType::NotFound,
            tokenizer: RequestTokenizer::new(),
            default_route: config.default_route,
            write_size_hint: config.write_size_hint,
            date_header,
        }
    }

    #[inline]
    pub fn state(&self) -> ParseState {
        self.state
    }

    #[inline]
    pub fn request_type(&self) -> RequestType {
        self.request_type
    }

    /// Answers every complete request in `buf` through one writer batch.
    ///
    /// All responses of the batch are committed to `sink` once, at the end.
    /// When a request cannot be answered synchronously the batch is committed
    /// early and [`Drain::Suspended`] is returned, the caller must then run
    /// [`respond_async`](RequestPipeline::respond_async) before handling more bytes.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if a request is malformed, or if the window is
    /// final (`is_completed`) and ends inside a request.
    pub fn handle_requests<S>(&mut self, buf: &[u8], is_completed: bool, sink: &mut S) -> Result<Drain, ParseError>
    where
        S: OutputSink + ?Sized,
    {
        let mut position = 0;
        let mut writer = BufferWriter::new(sink, self.write_size_hint);

        loop {
            self.parse_request(buf, &mut position, is_completed)?;

            if self.state != ParseState::Body {
                break;
            }

            if !self.process_request(&mut writer) {
                writer.commit();
                return Ok(Drain::Suspended { consumed: position });
            }

            self.state = ParseState::StartLine;

            if position == buf.len() {
                break;
            }
        }

        writer.commit();
        Ok(Drain::Completed { consumed: position })
    }

    /// Produces the response of a suspended request.
    ///
    /// Responses committed before the suspension already sit in the same
    /// output buffer ahead of this one, the caller flushes them all together.
    #[allow(clippy::unused_async, reason = "suspension point for responses that are not produced inline")]
    pub async fn respond_async<W>(&mut self, output: &mut ResponseWriter<W>) -> Result<(), SendError>
    where
        W: AsyncWrite + Unpin,
    {
        debug_assert_eq!(self.state, ParseState::Body);

        {
            let date = self.date_header.current_header_bytes();
            let mut writer = BufferWriter::new(output.sink(), self.default_route.response_len());
            handler::write_default(&mut writer, &date, self.default_route);
        }

        self.state = ParseState::StartLine;
        Ok(())
    }

    fn parse_request(&mut self, buf: &[u8], position: &mut usize, is_completed: bool) -> Result<(), ParseError> {
        let tokenizer = self.tokenizer;

        if self.state == ParseState::StartLine {
            let window = &buf[*position..];
            match tokenizer.parse_request_line(self, window)? {
                Some(consumed) => {
                    *position += consumed;
                    self.state = ParseState::Headers;
                }
                // empty lines between requests belong to no request
                None if window.iter().all(|&b| b == b'\r' || b == b'\n') => *position = buf.len(),
                None => {}
            }
        }

        if self.state == ParseState::Headers {
            if let Some(consumed) = tokenizer.parse_headers(self, &buf[*position..])? {
                *position += consumed;
                self.state = ParseState::Body;
            }
        }

        trace!(state = ?self.state, position = *position, "parsed request");
        let idle = self.state == ParseState::StartLine && *position == buf.len();
        ensure!(self.state == ParseState::Body || idle || !is_completed, ParseError::unexpected_eof(buf.len() - *position));
        Ok(())
    }

    /// Writes the response synchronously, false if it needs the async path.
    #[inline]
    fn process_request<S: OutputSink + ?Sized>(&self, writer: &mut BufferWriter<'_, S>) -> bool {
        match self.request_type {
            RequestType::PlainText => {
                handler::write_plaintext(writer, &self.date_header.current_header_bytes());
                true
            }
            RequestType::NotFound => false,
        }
    }
}

impl RequestLineHandler for RequestPipeline {
    #[inline]
    fn on_start_line(&mut self, method: &Method, target: &[u8], _version: Version) {
        self.request_type = handler::classify(method, target);
    }
}

// header values never influence the response, they are parsed only to keep the framing
impl HeadersHandler for RequestPipeline {}
