//! HTTP server for Marquee.
//!
//! Assembles the session layer, user accounts, and one of the two
//! presentation profiles (JSON API or server-rendered views) over any
//! [`MovieStore`].

pub mod error;
pub mod session;
pub mod users;
pub mod views;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, middleware};
use chrono::Duration;
use marquee_core::store::MovieStore;
use serde::Deserialize;
use tower::ServiceBuilder;
use tower_cookies::CookieManagerLayer;
use tower_http::trace::TraceLayer;

use session::SessionStore;
use views::Views;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Which presentation binding the server exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
  /// JSON payloads with explicit status codes.
  Json,
  /// HTML pages; mutations answer with redirects.
  #[default]
  Views,
}

/// Runtime server configuration, deserialised from `config.toml` and
/// `MARQUEE_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:          String,
  pub port:          u16,
  pub store_path:    PathBuf,
  pub profile:       Profile,
  pub cookie_name:   String,
  /// Adds `Secure` to the session cookie. Enable behind TLS.
  pub cookie_secure: bool,
  /// Session lifetime in seconds.
  pub session_ttl:   u64,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:          "127.0.0.1".to_string(),
      port:          3000,
      store_path:    PathBuf::from("marquee.db"),
      profile:       Profile::default(),
      cookie_name:   "marquee_session".to_string(),
      cookie_secure: false,
      session_ttl:   7 * 24 * 60 * 60,
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through the account and view handlers.
#[derive(Clone)]
pub struct AppState<S: MovieStore> {
  pub store:    Arc<S>,
  pub sessions: Arc<SessionStore>,
  pub views:    Arc<Views>,
  pub config:   Arc<ServerConfig>,
}

impl<S: MovieStore> AppState<S> {
  /// Build state with an empty session table and the built-in templates.
  pub fn new(store: Arc<S>, config: ServerConfig) -> Result<Self, Error> {
    Ok(Self {
      store,
      sessions: Arc::new(SessionStore::new(
        config.cookie_name.clone(),
        config.cookie_secure,
        i64::try_from(config.session_ttl)
          .ok()
          .and_then(Duration::try_seconds)
          .unwrap_or(Duration::MAX),
      )),
      views: Arc::new(Views::new()?),
      config: Arc::new(config),
    })
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the configured profile.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: MovieStore + Clone + 'static,
{
  let profile = state.config.profile;
  let sessions = state.sessions.clone();

  let app = match profile {
    Profile::Json => marquee_api::api_router(state.store.clone())
      .merge(users::json_routes(state)),
    Profile::Views => views::routes(state.clone()).merge(users::view_routes(state)),
  }
  .layer(middleware::from_fn_with_state(sessions, session::attach))
  .layer(CookieManagerLayer::new());

  let app = match profile {
    Profile::Json => app,
    // HTML forms can only POST; the override must run before method routing.
    Profile::Views => Router::new().fallback_service(
      ServiceBuilder::new()
        .layer(middleware::from_fn(views::method_override))
        .service(app),
    ),
  };

  app.layer(TraceLayer::new_for_http())
}
