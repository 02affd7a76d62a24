use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;

use plaintext_http::config::ConnectionConfig;
use plaintext_http::connection::HttpConnection;
use plaintext_http::date::DateHeader;
use plaintext_http::handler::DefaultRoute;
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tracing::{error, info, warn};

#[derive(Debug)]
pub struct ServerBuilder {
    address: Option<io::Result<Vec<SocketAddr>>>,
    config: ConnectionConfig,
}

impl ServerBuilder {
    fn new() -> Self {
        Self { address: None, config: ConnectionConfig::default() }
    }

    pub fn address<A: ToSocketAddrs>(mut self, address: A) -> Self {
        self.address = Some(address.to_socket_addrs().map(Iterator::collect));
        self
    }

    pub fn default_route(mut self, default_route: DefaultRoute) -> Self {
        self.config = self.config.with_default_route(default_route);
        self
    }

    pub fn connection_config(mut self, config: ConnectionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<Server, ServerBuildError> {
        let address = match self.address {
            None => return Err(ServerBuildError::MissingAddress),
            Some(Err(source)) => return Err(ServerBuildError::InvalidAddress { source }),
            Some(Ok(address)) => address,
        };
        if address.is_empty() {
            return Err(ServerBuildError::MissingAddress);
        }
        Ok(Server { address, config: self.config })
    }
}

#[derive(Debug)]
pub struct Server {
    address: Vec<SocketAddr>,
    config: ConnectionConfig,
}

#[derive(Error, Debug)]
pub enum ServerBuildError {
    #[error("address must be set")]
    MissingAddress,
    #[error("invalid address: {source}")]
    InvalidAddress { source: io::Error },
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("bind server error: {source}")]
    Bind { source: io::Error },
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Binds the configured address and serves connections until the task is dropped.
    pub async fn start(self) -> Result<(), ServerError> {
        info!("start listening at {:?}", self.address);
        let tcp_listener = match TcpListener::bind(self.address.as_slice()).await {
            Ok(tcp_listener) => tcp_listener,
            Err(e) => {
                error!(cause = %e, "bind server error");
                return Err(ServerError::Bind { source: e });
            }
        };

        self.serve(tcp_listener).await;
        Ok(())
    }

    /// Accepts from an already bound listener, one task per connection.
    pub async fn serve(self, tcp_listener: TcpListener) {
        let date_header = DateHeader::global();
        date_header.sync_timer();

        let config = Arc::new(self.config);
        loop {
            let (tcp_stream, remote_addr) = match tcp_listener.accept().await {
                Ok(stream_and_addr) => stream_and_addr,
                Err(e) => {
                    warn!(cause = %e, "failed to accept");
                    continue;
                }
            };

            let config = Arc::clone(&config);
            let date_header = Arc::clone(date_header);

            tokio::spawn(async move {
                serve_connection(tcp_stream, remote_addr, &config, date_header).await;
            });
        }
    }
}

async fn serve_connection(
    tcp_stream: TcpStream,
    remote_addr: SocketAddr,
    config: &ConnectionConfig,
    date_header: Arc<DateHeader>,
) {
    if let Err(e) = tcp_stream.set_nodelay(true) {
        warn!(cause = %e, %remote_addr, "failed to set TCP_NODELAY");
    }

    let (reader, writer) = tcp_stream.into_split();
    let connection = HttpConnection::with_config(reader, writer, config, date_header);
    match connection.process().await {
        Ok(()) => {
            info!(%remote_addr, "finished process, connection shutdown");
        }
        Err(e) => {
            error!(%remote_addr, "service has error, cause {}, connection shutdown", e);
        }
    }
}
