use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::buffer::OutputBuffer;
use crate::protocol::SendError;

/// Outbound byte sink: an [`OutputBuffer`] in front of the transport.
///
/// Responses are committed into the buffer synchronously and leave on
/// [`flush`](ResponseWriter::flush), once per inbound read.
#[derive(Debug)]
pub struct ResponseWriter<W> {
    writer: W,
    buffer: OutputBuffer,
    is_completed: bool,
}

impl<W> ResponseWriter<W> {
    pub fn with_segment_size(writer: W, segment_size: usize) -> Self {
        Self { writer, buffer: OutputBuffer::with_segment_size(segment_size), is_completed: false }
    }

    /// The sink response writers claim their regions from.
    #[inline]
    pub fn sink(&mut self) -> &mut OutputBuffer {
        &mut self.buffer
    }
}

impl<W: AsyncWrite + Unpin> ResponseWriter<W> {
    /// Writes every committed byte to the transport and flushes it.
    pub async fn flush(&mut self) -> Result<(), SendError> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        self.writer.write_all(self.buffer.committed()).await?;
        self.buffer.clear();
        Ok(self.writer.flush().await?)
    }

    /// Flushes what is left and shuts the transport down, only the first call has an effect.
    pub async fn complete(&mut self) -> Result<(), SendError> {
        if self.is_completed {
            return Ok(());
        }
        self.is_completed = true;

        let flushed = self.flush().await;
        let shutdown = self.writer.shutdown().await.map_err(SendError::io);
        debug!("response stream completed");
        flushed.and(shutdown)
    }
}
