//! Zero-allocation output path.
//!
//! - [`OutputSink`]: the capability a writer needs from its backing storage
//! - [`OutputBuffer`]: the [`bytes::BytesMut`] backed sink used by connections
//! - [`BufferWriter`]: claim/write/commit batching on top of any sink, including
//!   the decimal encoder [`BufferWriter::write_numeric`]

mod numeric;
mod sink;
mod writer;

pub use sink::DEFAULT_SEGMENT_SIZE;
pub use sink::OutputBuffer;
pub use sink::OutputSink;
pub use writer::BufferWriter;

#[cfg(test)]
pub(crate) use writer::tests::RecordingSink;
