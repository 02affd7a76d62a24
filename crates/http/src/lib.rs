//! An allocation-averse HTTP/1.1 request pipeline for plaintext micro-benchmarks
//!
//! This crate answers a single route, `GET /plaintext`, as fast as a single
//! connection's request loop allows. The inbound byte stream is tokenized
//! incrementally, every complete request found in a read is answered into one
//! batched output region, and the output is flushed once per read. Nothing on
//! the request path allocates or formats: responses are byte constants plus a
//! `Date` header that a background task re-renders once per second.
//!
//! # Example
//!
//! ```no_run
//! use plaintext_http::connection::HttpConnection;
//! use plaintext_http::date::DateHeader;
//! use tokio::net::TcpListener;
//! use tracing::{error, info, warn, Level};
//! use tracing_subscriber::FmtSubscriber;
//!
//! #[tokio::main]
//! async fn main() {
//!     // Initialize logging
//!     let subscriber = FmtSubscriber::builder()
//!         .with_max_level(Level::INFO)
//!         .finish();
//!     tracing::subscriber::set_global_default(subscriber)
//!         .expect("setting default subscriber failed");
//!
//!     // keep the cached date header fresh
//!     DateHeader::global().sync_timer();
//!
//!     info!(port = 8080, "start listening");
//!     let tcp_listener = match TcpListener::bind("127.0.0.1:8080").await {
//!         Ok(tcp_listener) => tcp_listener,
//!         Err(e) => {
//!             error!(cause = %e, "bind server error");
//!             return;
//!         }
//!     };
//!
//!     loop {
//!         let (tcp_stream, _remote_addr) = match tcp_listener.accept().await {
//!             Ok(stream_and_addr) => stream_and_addr,
//!             Err(e) => {
//!                 warn!(cause = %e, "failed to accept");
//!                 continue;
//!             }
//!         };
//!
//!         tokio::spawn(async move {
//!             let (reader, writer) = tcp_stream.into_split();
//!             let connection = HttpConnection::new(reader, writer);
//!             if let Err(e) = connection.process().await {
//!                 error!("service has error, cause {}, connection shutdown", e);
//!             }
//!         });
//!     }
//! }
//! ```
//!
//! # Architecture
//!
//! The crate is organized into several key modules:
//!
//! - [`buffer`]: output sinks, the claim/write/commit [`buffer::BufferWriter`] and its decimal encoder
//! - [`date`]: the double buffered, once per second refreshed `Date` header
//! - [`codec`]: the `httparse` based start line and header tokenizer
//! - [`handler`]: route classification and the canned responses
//! - [`connection`]: inbound/outbound adapters, the request state machine and the connection loop
//! - [`config`]: per-connection settings
//! - [`protocol`]: error types
//!
//! # Wire format
//!
//! `GET /plaintext` is answered with
//!
//! ```text
//! HTTP/1.1 200 OK\r\nServer: K\r\nContent-Type: text/plain\r\nContent-Length: 13\r\nDate: <date>\r\n\r\nHello, World!
//! ```
//!
//! Every other request gets the configured [`handler::DefaultRoute`], either a
//! `404 Not Found` or a `200 OK`, both with an empty body.
//!
//! # Limitations
//!
//! - HTTP/1.0 and HTTP/1.1 only, request bodies are not supported
//! - Maximum header size: 8KB
//! - Maximum number of headers: 64

pub mod buffer;
pub mod codec;
pub mod config;
pub mod connection;
pub mod date;
pub mod handler;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
