//! Backend entry-point: wires configuration, stores, and the HTTP pipeline.

use std::path::PathBuf;
use std::sync::Arc;

use actix_web::cookie::Key;
use actix_web::{App, HttpServer};
use clap::Parser;
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

use backend::domain::ports::SystemClock;
use backend::domain::{CommentService, UserService};
use backend::inbound::http::session::session_middleware;
use backend::inbound::http::state::HttpState;
use backend::inbound::http::api_scope;
use backend::outbound::hashing::Argon2CredentialHasher;
use backend::outbound::persistence::{MemoryCommentStore, MemoryUserStore};

/// Server configuration, read from flags or the environment.
#[derive(Debug, Parser)]
#[command(name = "backend", about = "Session-authenticated comment board backend")]
struct ServerConfig {
    /// Address to bind.
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0")]
    bind_addr: String,

    /// Port to bind.
    #[arg(long, env = "BIND_PORT", default_value_t = 8080)]
    bind_port: u16,

    /// File holding the session key material.
    #[arg(long, env = "SESSION_KEY_FILE", default_value = "/var/run/secrets/session_key")]
    session_key_file: PathBuf,

    /// Allow an ephemeral session key when the key file is unreadable.
    /// Sessions then die with the process; debug builds imply this.
    #[arg(long, env = "SESSION_ALLOW_EPHEMERAL", default_value_t = false)]
    session_allow_ephemeral: bool,

    /// Mark the session cookie `Secure`.
    #[arg(
        long,
        env = "SESSION_COOKIE_SECURE",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    cookie_secure: bool,
}

fn load_session_key(config: &ServerConfig) -> std::io::Result<Key> {
    match std::fs::read(&config.session_key_file) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) => {
            if cfg!(debug_assertions) || config.session_allow_ephemeral {
                warn!(
                    path = %config.session_key_file.display(),
                    error = %e,
                    "using temporary session key (dev only)"
                );
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {}: {e}",
                    config.session_key_file.display()
                )))
            }
        }
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = ServerConfig::parse();
    let key = load_session_key(&config)?;
    let cookie_secure = config.cookie_secure;
    let bind = (config.bind_addr.clone(), config.bind_port);

    let users = UserService::new(
        Arc::new(MemoryUserStore::default()),
        Arc::new(Argon2CredentialHasher),
    );
    let comments = CommentService::new(
        Arc::new(MemoryCommentStore::default()),
        Arc::new(SystemClock),
    );
    let state = HttpState::new(users, comments);

    HttpServer::new(move || {
        App::new().service(api_scope(
            state.clone(),
            session_middleware(key.clone(), cookie_secure),
        ))
    })
    .bind(bind)?
    .run()
    .await
}
