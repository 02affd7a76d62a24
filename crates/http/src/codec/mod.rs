//! Request tokenizing.
//!
//! The pipeline never builds request objects. [`RequestTokenizer`] walks the
//! inbound window with `httparse` and reports what it found through the
//! [`RequestLineHandler`] and [`HeadersHandler`] callbacks, the caller keeps
//! whatever it needs (usually nothing but the route) and the bytes are
//! released afterwards.
//!
//! Start line and header block are separate units: each call either consumes
//! one complete unit and returns `Some(consumed)`, or returns `None` and
//! consumes nothing, in which case it must be called again with more bytes.

mod tokenizer;

pub use tokenizer::HeadersHandler;
pub use tokenizer::MAX_HEADER_BYTES;
pub use tokenizer::MAX_HEADER_NUM;
pub use tokenizer::RequestLineHandler;
pub use tokenizer::RequestTokenizer;
