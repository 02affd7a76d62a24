//! Connection handling.
//!
//! - [`RequestReader`]: inbound source, hands out the retained byte window
//!   and keeps unconsumed bytes for the next read
//! - [`ResponseWriter`]: outbound sink, buffers committed responses until the
//!   once-per-read flush
//! - [`RequestPipeline`]: the per-connection parse state machine and response dispatch
//! - [`HttpConnection`]: the driving loop tying them together

mod http_connection;
mod pipeline;
mod request_reader;
mod response_writer;

pub use http_connection::HttpConnection;
pub use pipeline::Drain;
pub use pipeline::ParseState;
pub use pipeline::RequestPipeline;
pub use request_reader::ReadResult;
pub use request_reader::RequestReader;
pub use response_writer::ResponseWriter;
