use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, trace};

use crate::protocol::{HttpError, ParseError};

/// The bytes available after a [`RequestReader::read`].
#[derive(Debug)]
pub struct ReadResult<'a> {
    /// every byte received and not consumed yet
    pub buffer: &'a [u8],
    /// true once the peer closed its sending side, no more bytes will arrive
    pub is_completed: bool,
}

/// Inbound byte source with partial-message buffering.
///
/// Each [`read`](RequestReader::read) returns the whole retained window. The
/// caller reports with [`advance_to`](RequestReader::advance_to) how much of
/// it was consumed (dropped) and how much was examined: when everything was
/// examined the next read waits for the socket, otherwise it returns the
/// retained bytes right away.
#[derive(Debug)]
pub struct RequestReader<R> {
    reader: R,
    buf: BytesMut,
    read_buffer_size: usize,
    is_completed: bool,
    needs_read: bool,
}

impl<R> RequestReader<R> {
    pub fn with_capacity(reader: R, read_buffer_size: usize) -> Self {
        Self {
            reader,
            buf: BytesMut::with_capacity(read_buffer_size),
            read_buffer_size,
            is_completed: false,
            needs_read: true,
        }
    }

    /// Drops the first `consumed` bytes of the window returned by the last read.
    ///
    /// `examined` counts the bytes inspected so far, including the consumed
    /// ones. Examining less than the whole window makes the next read return
    /// immediately.
    ///
    /// # Panics
    ///
    /// Panics if `consumed > examined` or `examined` exceeds the window.
    pub fn advance_to(&mut self, consumed: usize, examined: usize) {
        assert!(consumed <= examined && examined <= self.buf.len(), "advance_to({consumed}, {examined}) out of window {}", self.buf.len());
        self.needs_read = examined == self.buf.len();
        self.buf.advance(consumed);
    }

    /// Marks the inbound side as finished, dropping any retained bytes.
    pub fn complete(&mut self, error: Option<&HttpError>) {
        match error {
            Some(e) => debug!(cause = %e, unread = self.buf.len(), "request stream completed with error"),
            None => debug!(unread = self.buf.len(), "request stream completed"),
        }
        self.is_completed = true;
        self.buf.clear();
    }
}

impl<R: AsyncRead + Unpin> RequestReader<R> {
    /// Waits for inbound bytes unless retained bytes have not been examined yet.
    pub async fn read(&mut self) -> Result<ReadResult<'_>, ParseError> {
        if self.needs_read && !self.is_completed {
            if self.buf.capacity() - self.buf.len() < self.read_buffer_size {
                self.buf.reserve(self.read_buffer_size);
            }

            let size = self.reader.read_buf(&mut self.buf).await.map_err(ParseError::io)?;
            trace!(size, buffered = self.buf.len(), "read request bytes");
            if size == 0 {
                self.is_completed = true;
            }
        }

        self.needs_read = true;
        Ok(ReadResult { buffer: &self.buf[..], is_completed: self.is_completed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn retains_unconsumed_bytes() {
        let (mut client, server) = tokio::io::duplex(64);
        let mut reader = RequestReader::with_capacity(server, 16);

        tokio::io::AsyncWriteExt::write_all(&mut client, b"GET /pla").await.unwrap();
        let result = reader.read().await.unwrap();
        assert_eq!(result.buffer, b"GET /pla");
        assert!(!result.is_completed);
        reader.advance_to(4, 8);

        tokio::io::AsyncWriteExt::write_all(&mut client, b"intext").await.unwrap();
        drop(client);
        let result = reader.read().await.unwrap();
        assert_eq!(result.buffer, b"/plaintext");
        reader.advance_to(10, 10);

        let result = reader.read().await.unwrap();
        assert!(result.buffer.is_empty());
        assert!(result.is_completed);
    }

    #[tokio::test]
    async fn unexamined_bytes_are_returned_without_reading() {
        // the client never writes again, a socket read would hang
        let (mut client, server) = tokio::io::duplex(64);
        let mut reader = RequestReader::with_capacity(server, 16);

        tokio::io::AsyncWriteExt::write_all(&mut client, b"firstsecond").await.unwrap();
        assert_eq!(reader.read().await.unwrap().buffer, b"firstsecond");
        reader.advance_to(5, 5);

        let result = reader.read().await.unwrap();
        assert_eq!(result.buffer, b"second");
        assert!(!result.is_completed);
    }

    #[test]
    #[should_panic(expected = "out of window")]
    fn consumed_beyond_window_panics() {
        let (_client, server) = tokio::io::duplex(64);
        let mut reader = RequestReader::with_capacity(server, 16);
        reader.advance_to(1, 1);
    }
}
