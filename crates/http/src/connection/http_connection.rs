use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::info;

use crate::config::ConnectionConfig;
use crate::connection::{Drain, RequestPipeline, RequestReader, ResponseWriter};
use crate::date::DateHeader;
use crate::protocol::HttpError;

/// An HTTP connection driving the request pipeline over a split transport.
///
/// One `HttpConnection` is meant to run as one task. Requests are answered
/// strictly in arrival order: every read drains all complete requests into a
/// single output batch, and the output is flushed once per read.
///
/// # Type Parameters
///
/// * `R`: The async readable stream type
/// * `W`: The async writable stream type
#[derive(Debug)]
pub struct HttpConnection<R, W> {
    input: RequestReader<R>,
    output: ResponseWriter<W>,
    pipeline: RequestPipeline,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Creates a connection with the default config and the global [`DateHeader`].
    pub fn new(reader: R, writer: W) -> Self {
        Self::with_config(reader, writer, &ConnectionConfig::default(), Arc::clone(DateHeader::global()))
    }

    pub fn with_config(reader: R, writer: W, config: &ConnectionConfig, date_header: Arc<DateHeader>) -> Self {
        Self {
            input: RequestReader::with_capacity(reader, config.read_buffer_size),
            output: ResponseWriter::with_segment_size(writer, config.segment_size),
            pipeline: RequestPipeline::new(config, date_header),
        }
    }

    /// Serves requests until the peer closes the connection or an error occurs.
    ///
    /// Whatever the outcome, the inbound side is completed first (carrying the
    /// error, if any) and the outbound side is flushed and shut down afterwards.
    pub async fn process(mut self) -> Result<(), HttpError> {
        let result = self.process_requests().await;

        self.input.complete(result.as_ref().err());
        let completed = self.output.complete().await.map_err(HttpError::from);
        result.and(completed)
    }

    async fn process_requests(&mut self) -> Result<(), HttpError> {
        let Self { input, output, pipeline } = self;

        loop {
            let read_result = input.read().await?;
            let window_len = read_result.buffer.len();

            if window_len == 0 && read_result.is_completed {
                info!("cant read more request, break this connection down");
                return Ok(());
            }

            let drain = pipeline.handle_requests(read_result.buffer, read_result.is_completed, output.sink())?;
            match drain {
                Drain::Completed { consumed } => input.advance_to(consumed, window_len),
                Drain::Suspended { consumed } => {
                    // requests behind the suspended one are handed out again without a socket read
                    input.advance_to(consumed, consumed);
                    pipeline.respond_async(output).await?;
                    if consumed < window_len {
                        continue;
                    }
                }
            }

            output.flush().await?;
        }
    }
}
