//! Route classification and the canned responses.
//!
//! Only `GET /plaintext` is recognized. Responses are assembled from byte
//! constants and the cached `Date` header bytes, nothing is formatted on the
//! request path.

use http::Method;

use crate::buffer::{BufferWriter, OutputSink};

const PLAINTEXT_PATH: &[u8] = b"/plaintext";

const PLAINTEXT_PREAMBLE: &[u8] = b"HTTP/1.1 200 OK\r\n\
    Server: K\r\n\
    Content-Type: text/plain\r\n\
    Content-Length: 13";

const PLAINTEXT_BODY: &[u8] = b"Hello, World!";

const NOT_FOUND_PREAMBLE: &[u8] = b"HTTP/1.1 404 Not Found\r\n\
    Server: K\r\n\
    Content-Type: text/plain\r\n\
    Content-Length: 0\r\n\
    Connection: close";

const EMPTY_OK_PREAMBLE: &[u8] = b"HTTP/1.1 200 OK\r\n\
    Server: K\r\n\
    Content-Type: text/plain\r\n\
    Content-Length: 0";

/// What a request resolved to once its start line was parsed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum RequestType {
    #[default]
    NotFound,
    PlainText,
}

/// The response produced for requests that match no route.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DefaultRoute {
    /// `404 Not Found` with an empty body and `Connection: close`
    #[default]
    NotFound,
    /// `200 OK` with an empty body
    EmptyOk,
}

impl DefaultRoute {
    fn preamble(self) -> &'static [u8] {
        match self {
            DefaultRoute::NotFound => NOT_FOUND_PREAMBLE,
            DefaultRoute::EmptyOk => EMPTY_OK_PREAMBLE,
        }
    }

    /// Length of the complete default response.
    pub fn response_len(self) -> usize {
        self.preamble().len() + crate::date::HEADER_LENGTH
    }
}

/// Classifies a request by method and target path.
#[inline]
pub fn classify(method: &Method, path: &[u8]) -> RequestType {
    if method == Method::GET && path.len() == PLAINTEXT_PATH.len() && path == PLAINTEXT_PATH {
        RequestType::PlainText
    } else {
        RequestType::NotFound
    }
}

/// Writes the `GET /plaintext` response, `date` is the cached header sequence.
#[inline]
pub fn write_plaintext<S: OutputSink + ?Sized>(writer: &mut BufferWriter<'_, S>, date: &[u8]) {
    writer.write(PLAINTEXT_PREAMBLE);
    writer.write(date);
    writer.write(PLAINTEXT_BODY);
}

/// Writes the response for unrecognized requests.
#[inline]
pub fn write_default<S: OutputSink + ?Sized>(writer: &mut BufferWriter<'_, S>, date: &[u8], default_route: DefaultRoute) {
    writer.write(default_route.preamble());
    writer.write(date);
}
