//! Server-rendered presentation profile.
//!
//! Reads render HTML from Tera templates compiled into the binary. Mutations
//! answer with a `303 See Other` to the affected page, and every failure
//! redirects to `/error?error=<message>`.

pub mod comments;
pub mod movies;

use axum::{
  Router,
  extract::{Query, Request, State, rejection::FormRejection},
  http::{Method, StatusCode},
  middleware::Next,
  response::{Html, IntoResponse, Redirect, Response},
  routing::{delete, get, post},
};
use marquee_api::Caller;
use marquee_core::{auth::AuthContext, store::MovieStore};
use serde::Deserialize;
use tera::{Context, Tera};
use tracing::warn;
use url::form_urlencoded;

use crate::{AppState, error::Error};

const TEMPLATES: &[(&str, &str)] = &[
  ("layout.html", include_str!("../../templates/layout.html")),
  ("error.html", include_str!("../../templates/error.html")),
  ("movies/index.html", include_str!("../../templates/movies/index.html")),
  ("movies/show.html", include_str!("../../templates/movies/show.html")),
  ("movies/new.html", include_str!("../../templates/movies/new.html")),
  ("movies/edit.html", include_str!("../../templates/movies/edit.html")),
  ("users/login.html", include_str!("../../templates/users/login.html")),
  ("users/signup.html", include_str!("../../templates/users/signup.html")),
];

// ─── Templates ───────────────────────────────────────────────────────────────

/// The compiled template set.
pub struct Views {
  tera: Tera,
}

impl Views {
  pub fn new() -> Result<Self, Error> {
    let mut tera = Tera::default();
    tera.add_raw_templates(TEMPLATES.iter().copied())?;
    Ok(Self { tera })
  }

  pub fn render(&self, name: &str, ctx: &Context) -> Result<Html<String>, Error> {
    Ok(Html(self.tera.render(name, ctx)?))
  }
}

/// A template context pre-filled with the caller's session.
pub fn page_context(caller: &AuthContext) -> Context {
  let mut ctx = Context::new();
  ctx.insert("session", caller);
  ctx
}

// ─── Errors ──────────────────────────────────────────────────────────────────

/// `/error?error=<message>`, URL-encoded.
pub fn error_location(message: &str) -> String {
  let query = form_urlencoded::Serializer::new(String::new())
    .append_pair("error", message)
    .finish();
  format!("/error?{query}")
}

/// An [`Error`] rendered as a redirect to the error page.
#[derive(Debug)]
pub struct ViewError(pub Error);

impl From<Error> for ViewError {
  fn from(e: Error) -> Self { Self(e) }
}

impl From<marquee_core::Error> for ViewError {
  fn from(e: marquee_core::Error) -> Self { Self(Error::Resource(e)) }
}

impl From<FormRejection> for ViewError {
  fn from(rejection: FormRejection) -> Self {
    Self(Error::Invalid(rejection.body_text()))
  }
}

impl IntoResponse for ViewError {
  fn into_response(self) -> Response {
    let message = self.0.to_string();
    warn!(error = %message, "request failed; redirecting to error page");
    Redirect::to(&error_location(&message)).into_response()
  }
}

#[derive(Debug, Deserialize)]
pub struct ErrorParams {
  pub error: Option<String>,
}

/// `GET /error?error=<message>`
async fn error_page<S>(
  State(state): State<AppState<S>>,
  Caller(ctx): Caller,
  Query(params): Query<ErrorParams>,
) -> Response
where
  S: MovieStore + Clone + 'static,
{
  let mut page = page_context(&ctx);
  page.insert(
    "error",
    params.error.as_deref().unwrap_or("something went wrong"),
  );
  match state.views.render("error.html", &page) {
    Ok(html) => html.into_response(),
    Err(e) => {
      (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
    }
  }
}

// ─── Method override ─────────────────────────────────────────────────────────

/// Middleware: treat `POST ...?_method=PUT` and `POST ...?_method=DELETE` as
/// those methods.
pub async fn method_override(mut req: Request, next: Next) -> Response {
  if req.method() == Method::POST
    && let Some(method) = req.uri().query().and_then(override_from_query)
  {
    *req.method_mut() = method;
  }
  next.run(req).await
}

fn override_from_query(query: &str) -> Option<Method> {
  let (_, value) = form_urlencoded::parse(query.as_bytes())
    .find(|(key, _)| key == "_method")?;
  match value.to_ascii_uppercase().as_str() {
    "PUT" => Some(Method::PUT),
    "DELETE" => Some(Method::DELETE),
    _ => None,
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

pub fn routes<S>(state: AppState<S>) -> Router
where
  S: MovieStore + Clone + 'static,
{
  Router::new()
    .route("/", get(|| async { Redirect::to("/movies") }))
    .route("/error", get(error_page::<S>))
    // Movies
    .route("/movies", get(movies::index::<S>).post(movies::create::<S>))
    .route("/movies/mine", get(movies::mine::<S>))
    .route("/movies/new", get(movies::new_form::<S>))
    .route(
      "/movies/{id}",
      get(movies::show::<S>)
        .put(movies::update::<S>)
        .delete(movies::delete::<S>),
    )
    .route("/movies/{id}/edit", get(movies::edit_form::<S>))
    // Comments
    .route("/comments/{movie_id}", post(comments::append::<S>))
    .route(
      "/comments/delete/{movie_id}/{comment_id}",
      delete(comments::remove::<S>),
    )
    .with_state(state)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn templates_compile() {
    let views = Views::new().unwrap();
    let mut page = page_context(&AuthContext::anonymous());
    page.insert("error", "boom");
    let html = views.render("error.html", &page).unwrap();
    assert!(html.0.contains("boom"));
  }

  #[test]
  fn error_location_is_encoded() {
    assert_eq!(
      error_location("not allowed & gone"),
      "/error?error=not+allowed+%26+gone"
    );
  }

  #[test]
  fn override_parsing() {
    assert_eq!(override_from_query("_method=delete"), Some(Method::DELETE));
    assert_eq!(override_from_query("a=1&_method=PUT"), Some(Method::PUT));
    assert_eq!(override_from_query("_method=PATCH"), None);
    assert_eq!(override_from_query("x=y"), None);
  }
}
