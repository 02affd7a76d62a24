//! Bootstrap for the plaintext benchmark server.
//!
//! [`Server`] binds the listener, keeps the global `Date` header fresh and
//! runs one [`HttpConnection`](plaintext_http::connection::HttpConnection)
//! task per accepted socket.
//!
//! ```no_run
//! use plaintext_http::handler::DefaultRoute;
//! use plaintext_server::Server;
//!
//! #[tokio::main]
//! async fn main() {
//!     let server = Server::builder()
//!         .address("127.0.0.1:8080")
//!         .default_route(DefaultRoute::NotFound)
//!         .build()
//!         .unwrap();
//!     server.start().await.unwrap();
//! }
//! ```

mod server;

pub use server::Server;
pub use server::ServerBuildError;
pub use server::ServerBuilder;
pub use server::ServerError;
