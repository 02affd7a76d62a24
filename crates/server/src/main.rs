use std::env;
use std::process::ExitCode;

use plaintext_http::handler::DefaultRoute;
use plaintext_server::Server;
use tracing::{Level, error};
use tracing_subscriber::FmtSubscriber;

const DEFAULT_LISTEN: &str = "127.0.0.1:8080";

fn default_route_from_env() -> Result<DefaultRoute, String> {
    match env::var("DEFAULT_ROUTE").as_deref() {
        Err(_) | Ok("not-found") => Ok(DefaultRoute::NotFound),
        Ok("empty-ok") => Ok(DefaultRoute::EmptyOk),
        Ok(other) => Err(format!("unknown DEFAULT_ROUTE `{other}`, expected `not-found` or `empty-ok`")),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("setting default subscriber failed: {e}");
        return ExitCode::FAILURE;
    }

    let default_route = match default_route_from_env() {
        Ok(default_route) => default_route,
        Err(reason) => {
            error!("{reason}");
            return ExitCode::FAILURE;
        }
    };
    let listen = env::var("LISTEN").unwrap_or_else(|_| DEFAULT_LISTEN.to_owned());

    let server = match Server::builder().address(listen.as_str()).default_route(default_route).build() {
        Ok(server) => server,
        Err(e) => {
            error!(cause = %e, "invalid server configuration");
            return ExitCode::FAILURE;
        }
    };

    match server.start().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
