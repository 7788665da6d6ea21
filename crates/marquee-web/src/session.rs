//! In-process session provider.
//!
//! A successful login creates a random token, remembers the caller's
//! identity under it, and hands the token to the browser in a cookie. The
//! [`attach`] middleware resolves that cookie on every request and stores
//! the resulting [`AuthContext`] in the request extensions, where
//! [`marquee_api::Caller`] picks it up.
//!
//! Cookies are read and written through [`tower_cookies`]; the router
//! installs its `CookieManagerLayer` outside [`attach`].

use std::{collections::HashMap, sync::Arc};

use axum::{
  extract::{Request, State},
  middleware::Next,
  response::Response,
};
use chrono::{DateTime, Duration, Utc};
use marquee_core::{auth::AuthContext, user::User};
use rand_core::{OsRng, RngCore};
use tokio::sync::RwLock;
use tower_cookies::{
  Cookie, Cookies,
  cookie::{SameSite, time},
};
use tracing::debug;

const TOKEN_BYTES: usize = 32;

struct Session {
  ctx:        AuthContext,
  expires_at: DateTime<Utc>,
}

impl Session {
  fn is_live(&self, now: DateTime<Utc>) -> bool { self.expires_at > now }
}

/// Live sessions keyed by token.
///
/// A session ends at logout, at its expiry, or when the same browser logs in
/// again. Expired entries are swept whenever a new session is created.
pub struct SessionStore {
  cookie_name: String,
  secure:      bool,
  ttl:         Duration,
  sessions:    RwLock<HashMap<String, Session>>,
}

impl SessionStore {
  pub fn new(cookie_name: impl Into<String>, secure: bool, ttl: Duration) -> Self {
    Self {
      cookie_name: cookie_name.into(),
      secure,
      ttl,
      sessions: RwLock::new(HashMap::new()),
    }
  }

  /// Start a session for `user` and return its token. A `previous` token
  /// carried by the same browser is ended first.
  pub async fn create(&self, user: &User, previous: Option<&str>) -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    let token = hex::encode(bytes);

    let now = Utc::now();
    let mut sessions = self.sessions.write().await;
    if let Some(prev) = previous {
      sessions.remove(prev);
    }
    sessions.retain(|_, s| s.is_live(now));
    sessions.insert(token.clone(), Session {
      ctx:        AuthContext::user(user.user_id, user.username.clone()),
      expires_at: now
        .checked_add_signed(self.ttl)
        .unwrap_or(DateTime::<Utc>::MAX_UTC),
    });
    token
  }

  /// The identity behind `token`, if the session is live. An expired
  /// session is dropped on sight.
  pub async fn resolve(&self, token: &str) -> Option<AuthContext> {
    let now = Utc::now();
    {
      let sessions = self.sessions.read().await;
      match sessions.get(token) {
        Some(s) if s.is_live(now) => return Some(s.ctx.clone()),
        None => return None,
        Some(_) => {}
      }
    }
    self.sessions.write().await.remove(token);
    None
  }

  /// End a session. Returns `false` if the token was not live.
  pub async fn destroy(&self, token: &str) -> bool {
    self.sessions.write().await.remove(token).is_some()
  }

  /// Number of sessions currently held, expired or not.
  pub async fn len(&self) -> usize { self.sessions.read().await.len() }

  /// The session token carried by the request, if any.
  pub fn token(&self, cookies: &Cookies) -> Option<String> {
    cookies
      .get(&self.cookie_name)
      .map(|c| c.value().to_owned())
  }

  /// Install `token` as the session cookie.
  pub fn issue(&self, cookies: &Cookies, token: String) {
    let max_age = time::Duration::seconds(self.ttl.num_seconds());
    cookies.add(
      Cookie::build((self.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(self.secure)
        .max_age(max_age)
        .build(),
    );
  }

  /// Tell the browser to drop the session cookie.
  pub fn revoke(&self, cookies: &Cookies) {
    cookies.remove(
      Cookie::build((self.cookie_name.clone(), ""))
        .path("/")
        .build(),
    );
  }
}

/// Middleware: resolve the session cookie into an [`AuthContext`] extension.
pub async fn attach(
  State(sessions): State<Arc<SessionStore>>,
  cookies: Cookies,
  mut req: Request,
  next: Next,
) -> Response {
  let ctx = match sessions.token(&cookies) {
    Some(token) => sessions.resolve(&token).await.unwrap_or_default(),
    None => AuthContext::anonymous(),
  };
  debug!(logged_in = ctx.logged_in, user = ?ctx.username, "session resolved");
  req.extensions_mut().insert(ctx);
  next.run(req).await
}
