//! User accounts: sign-up, login, logout.
//!
//! | Method | Path | JSON profile | Views profile |
//! |--------|------|--------------|---------------|
//! | `GET`  | `/users/signup` | — | sign-up form |
//! | `POST` | `/users/signup` | 201 + user | redirect to login |
//! | `GET`  | `/users/login` | — | login form |
//! | `POST` | `/users/login` | 200 + profile, sets cookie | redirect to `/movies`, sets cookie |
//! | `POST` | `/users/logout` | 204, clears cookie | redirect to login, clears cookie |

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{
  Form, Json, Router,
  extract::{
    State,
    rejection::{FormRejection, JsonRejection},
  },
  http::StatusCode,
  response::{Html, IntoResponse, Redirect},
  routing::{get, post},
};
use marquee_api::Caller;
use marquee_core::{
  store::MovieStore,
  user::{NewUser, User},
};
use rand_core::OsRng;
use serde::Deserialize;
use serde_json::json;
use tower_cookies::Cookies;
use tracing::info;

use crate::{
  AppState,
  error::Error,
  views::{ViewError, page_context},
};

/// Username and password as posted by either profile.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
  pub username: String,
  pub password: String,
}

// ─── Passwords ───────────────────────────────────────────────────────────────

pub fn hash_password(password: &str) -> Result<String, Error> {
  let salt = SaltString::generate(&mut OsRng);
  Ok(
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map_err(|e| Error::PasswordHash(e.to_string()))?
      .to_string(),
  )
}

pub fn verify_password(password: &str, phc: &str) -> bool {
  PasswordHash::new(phc)
    .map(|parsed| {
      Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
    })
    .unwrap_or(false)
}

// ─── Account operations ──────────────────────────────────────────────────────

/// Create an account. The username must be free and the password non-empty.
pub async fn signup<S: MovieStore>(
  store: &S,
  creds: Credentials,
) -> Result<User, Error> {
  let username = creds.username.trim().to_string();
  if username.is_empty() || creds.password.is_empty() {
    return Err(Error::Invalid("username and password are required".into()));
  }

  let user = store
    .add_user(NewUser {
      username:      username.clone(),
      password_hash: hash_password(&creds.password)?,
    })
    .await
    .map_err(Error::store)?
    .ok_or(Error::UsernameTaken(username))?;
  info!(user_id = %user.user_id, username = %user.username, "user signed up");
  Ok(user)
}

/// Check credentials and open a session, replacing any session the browser
/// already holds. Returns the user and sets the session cookie. Unknown
/// users and wrong passwords are indistinguishable.
pub async fn login<S: MovieStore>(
  state: &AppState<S>,
  cookies: &Cookies,
  creds: Credentials,
) -> Result<User, Error> {
  let user = state
    .store
    .find_user_by_username(creds.username.trim())
    .await
    .map_err(Error::store)?
    .filter(|u| verify_password(&creds.password, &u.password_hash))
    .ok_or(Error::InvalidCredentials)?;

  let previous = state.sessions.token(cookies);
  let token = state.sessions.create(&user, previous.as_deref()).await;
  state.sessions.issue(cookies, token);
  info!(user_id = %user.user_id, "user logged in");
  Ok(user)
}

/// End the session named by the request cookie, if any, and drop the cookie.
async fn logout<S: MovieStore>(state: &AppState<S>, cookies: &Cookies) {
  if let Some(token) = state.sessions.token(cookies)
    && state.sessions.destroy(&token).await
  {
    info!("user logged out");
  }
  state.sessions.revoke(cookies);
}

// ─── JSON profile ────────────────────────────────────────────────────────────

pub fn json_routes<S>(state: AppState<S>) -> Router
where
  S: MovieStore + Clone + 'static,
{
  Router::new()
    .route("/users/signup", post(json_signup::<S>))
    .route("/users/login", post(json_login::<S>))
    .route("/users/logout", post(json_logout::<S>))
    .with_state(state)
}

async fn json_signup<S>(
  State(state): State<AppState<S>>,
  creds: Result<Json<Credentials>, JsonRejection>,
) -> Result<impl IntoResponse, Error>
where
  S: MovieStore + Clone + 'static,
{
  let Json(creds) = creds?;
  let user = signup(state.store.as_ref(), creds).await?;
  Ok((StatusCode::CREATED, Json(json!({ "user": user }))))
}

async fn json_login<S>(
  State(state): State<AppState<S>>,
  cookies: Cookies,
  creds: Result<Json<Credentials>, JsonRejection>,
) -> Result<impl IntoResponse, Error>
where
  S: MovieStore + Clone + 'static,
{
  let Json(creds) = creds?;
  let user = login(&state, &cookies, creds).await?;
  Ok(Json(json!({ "user": user.profile() })))
}

async fn json_logout<S>(
  State(state): State<AppState<S>>,
  cookies: Cookies,
) -> StatusCode
where
  S: MovieStore + Clone + 'static,
{
  logout(&state, &cookies).await;
  StatusCode::NO_CONTENT
}

// ─── Views profile ───────────────────────────────────────────────────────────

pub fn view_routes<S>(state: AppState<S>) -> Router
where
  S: MovieStore + Clone + 'static,
{
  Router::new()
    .route("/users/signup", get(signup_form::<S>).post(view_signup::<S>))
    .route("/users/login", get(login_form::<S>).post(view_login::<S>))
    .route("/users/logout", post(view_logout::<S>))
    .with_state(state)
}

async fn signup_form<S>(
  State(state): State<AppState<S>>,
  Caller(ctx): Caller,
) -> Result<Html<String>, ViewError>
where
  S: MovieStore + Clone + 'static,
{
  Ok(state.views.render("users/signup.html", &page_context(&ctx))?)
}

async fn login_form<S>(
  State(state): State<AppState<S>>,
  Caller(ctx): Caller,
) -> Result<Html<String>, ViewError>
where
  S: MovieStore + Clone + 'static,
{
  Ok(state.views.render("users/login.html", &page_context(&ctx))?)
}

async fn view_signup<S>(
  State(state): State<AppState<S>>,
  creds: Result<Form<Credentials>, FormRejection>,
) -> Result<Redirect, ViewError>
where
  S: MovieStore + Clone + 'static,
{
  let Form(creds) = creds?;
  signup(state.store.as_ref(), creds).await?;
  Ok(Redirect::to("/users/login"))
}

async fn view_login<S>(
  State(state): State<AppState<S>>,
  cookies: Cookies,
  creds: Result<Form<Credentials>, FormRejection>,
) -> Result<Redirect, ViewError>
where
  S: MovieStore + Clone + 'static,
{
  let Form(creds) = creds?;
  login(&state, &cookies, creds).await?;
  Ok(Redirect::to("/movies"))
}

async fn view_logout<S>(
  State(state): State<AppState<S>>,
  cookies: Cookies,
) -> Redirect
where
  S: MovieStore + Clone + 'static,
{
  logout(&state, &cookies).await;
  Redirect::to("/users/login")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn password_roundtrip() {
    let phc = hash_password("hunter2").unwrap();
    assert!(phc.starts_with("$argon2"));
    assert!(verify_password("hunter2", &phc));
    assert!(!verify_password("hunter3", &phc));
  }

  #[test]
  fn malformed_hash_never_verifies() {
    assert!(!verify_password("anything", "not-a-phc-string"));
  }
}
