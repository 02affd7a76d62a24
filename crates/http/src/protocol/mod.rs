//! Core protocol types shared by the codec and connection layers.
//!
//! The pipeline only needs a small error taxonomy:
//!
//! - [`ParseError`]: framing errors raised while tokenizing the inbound stream
//!   (including the peer closing the stream in the middle of a request) and
//!   read-side I/O errors
//! - [`SendError`]: write-side I/O errors
//! - [`HttpError`]: top-level error returned by a connection task
//!
//! No error is retried inside the pipeline, every error terminates the
//! connection it was raised on.

mod error;
pub use error::HttpError;
pub use error::ParseError;
pub use error::SendError;
