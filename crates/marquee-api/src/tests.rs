//! Router-level tests for the JSON binding.

use std::sync::Arc;

use axum::{
  Extension, Router,
  body::Body,
  http::{Request, StatusCode, header},
  response::Response,
};
use marquee_core::{auth::AuthContext, store::MovieStore};
use marquee_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;
use uuid::Uuid;

use crate::api_router;

async fn store() -> Arc<SqliteStore> {
  Arc::new(SqliteStore::open_in_memory().await.expect("in-memory store"))
}

fn app(store: &Arc<SqliteStore>, ctx: Option<&AuthContext>) -> Router {
  let router = api_router(store.clone());
  match ctx {
    Some(c) => router.layer(Extension(c.clone())),
    None => router,
  }
}

fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
  let builder = Request::builder().method(method).uri(uri);
  match body {
    Some(v) => builder
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(v.to_string()))
      .unwrap(),
    None => builder.body(Body::empty()).unwrap(),
  }
}

async fn body_json(res: Response) -> Value {
  let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
    .await
    .unwrap();
  serde_json::from_slice(&bytes).unwrap()
}

async fn create_titanic(store: &Arc<SqliteStore>, ctx: &AuthContext) -> String {
  let res = app(store, Some(ctx))
    .oneshot(request(
      "POST",
      "/movies",
      Some(json!({ "name": "Titanic", "genre": "romance_love", "isPgRated": true })),
    ))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::CREATED);
  body_json(res).await["movie"]["movie_id"]
    .as_str()
    .unwrap()
    .to_owned()
}

#[tokio::test]
async fn empty_list_is_ok() {
  let s = store().await;
  let res = app(&s, None)
    .oneshot(request("GET", "/movies", None))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::OK);
  assert_eq!(body_json(res).await, json!({ "movies": [] }));
}

#[tokio::test]
async fn create_forces_owner_and_returns_201() {
  let s = store().await;
  let u1 = AuthContext::user(Uuid::new_v4(), "u1");

  let res = app(&s, Some(&u1))
    .oneshot(request(
      "POST",
      "/movies",
      Some(json!({
        "name": "Titanic",
        "genre": "romance_love",
        "isPgRated": true,
        "owner": Uuid::new_v4(),
      })),
    ))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::CREATED);

  let body = body_json(res).await;
  let owner = body["movie"]["owner"].as_str().unwrap();
  assert_eq!(owner, u1.user_id.unwrap().to_string());
  assert_eq!(body["movie"]["is_pg_rated"], json!(true));
}

#[tokio::test]
async fn anonymous_create_is_401() {
  let s = store().await;
  let res = app(&s, None)
    .oneshot(request("POST", "/movies", Some(json!({ "name": "Avatar" }))))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
  assert!(body_json(res).await["error"].is_string());
}

#[tokio::test]
async fn malformed_bodies_are_400_with_json_error() {
  let s = store().await;
  let u1 = AuthContext::user(Uuid::new_v4(), "u1");
  let id = create_titanic(&s, &u1).await;

  let cases = [
    request("POST", "/movies", Some(json!({ "genre": "drama" }))),
    request("PUT", &format!("/movies/{id}"), Some(json!({ "isPgRated": "often" }))),
    request("POST", &format!("/comments/{id}"), Some(json!({}))),
    Request::builder()
      .method("POST")
      .uri("/movies")
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from("{not json"))
      .unwrap(),
    Request::builder()
      .method("POST")
      .uri("/movies")
      .body(Body::from(r#"{"name":"Avatar"}"#))
      .unwrap(),
  ];
  for req in cases {
    let uri = req.uri().to_string();
    let res = app(&s, Some(&u1)).oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{uri}");
    assert_eq!(
      res.headers()[header::CONTENT_TYPE],
      "application/json",
      "{uri}"
    );
    assert!(body_json(res).await["error"].is_string(), "{uri}");
  }

  // Nothing was written by the rejected calls.
  let movie = s.get_movie(id.parse().unwrap()).await.unwrap().unwrap();
  assert_eq!(movie.name, "Titanic");
  assert!(movie.comments.is_empty());
  assert_eq!(s.list_movies(None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn anonymous_put_and_delete_are_401() {
  let s = store().await;
  let u1 = AuthContext::user(Uuid::new_v4(), "u1");
  let id = create_titanic(&s, &u1).await;
  let uri = format!("/movies/{id}");

  let res = app(&s, None)
    .oneshot(request("PUT", &uri, Some(json!({ "name": "Hijacked" }))))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

  let res = app(&s, None)
    .oneshot(request("DELETE", &uri, None))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

  let movie = s.get_movie(id.parse().unwrap()).await.unwrap().unwrap();
  assert_eq!(movie.name, "Titanic");
}

#[tokio::test]
async fn unknown_movie_is_404() {
  let s = store().await;
  for uri in [format!("/movies/{}", Uuid::new_v4()), "/movies/nope".into()] {
    let res = app(&s, None)
      .oneshot(request("GET", &uri, None))
      .await
      .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
  }
}

#[tokio::test]
async fn non_owner_put_is_403_and_store_unchanged() {
  let s = store().await;
  let u1 = AuthContext::user(Uuid::new_v4(), "u1");
  let u2 = AuthContext::user(Uuid::new_v4(), "u2");
  let id = create_titanic(&s, &u1).await;

  let res = app(&s, Some(&u2))
    .oneshot(request(
      "PUT",
      &format!("/movies/{id}"),
      Some(json!({ "name": "Hijacked" })),
    ))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::FORBIDDEN);

  let stored = s
    .get_movie(id.parse().unwrap())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(stored.name, "Titanic");
}

#[tokio::test]
async fn owner_put_and_delete_are_204() {
  let s = store().await;
  let u1 = AuthContext::user(Uuid::new_v4(), "u1");
  let id = create_titanic(&s, &u1).await;

  let res = app(&s, Some(&u1))
    .oneshot(request(
      "PUT",
      &format!("/movies/{id}"),
      Some(json!({ "genre": "drama" })),
    ))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::NO_CONTENT);

  let res = app(&s, None)
    .oneshot(request("GET", &format!("/movies/{id}"), None))
    .await
    .unwrap();
  let body = body_json(res).await;
  assert_eq!(body["movie"]["genre"], json!("drama"));
  assert_eq!(body["movie"]["name"], json!("Titanic"));

  let res = app(&s, Some(&u1))
    .oneshot(request("DELETE", &format!("/movies/{id}"), None))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::NO_CONTENT);

  let res = app(&s, None)
    .oneshot(request("GET", &format!("/movies/{id}"), None))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn mine_only_lists_callers_movies() {
  let s = store().await;
  let u1 = AuthContext::user(Uuid::new_v4(), "u1");
  let u2 = AuthContext::user(Uuid::new_v4(), "u2");
  create_titanic(&s, &u1).await;
  create_titanic(&s, &u2).await;

  let res = app(&s, Some(&u2))
    .oneshot(request("GET", "/movies/mine", None))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::OK);
  let body = body_json(res).await;
  let movies = body["movies"].as_array().unwrap();
  assert_eq!(movies.len(), 1);
  assert_eq!(
    movies[0]["owner"]["user_id"],
    json!(u2.user_id.unwrap().to_string())
  );
}

#[tokio::test]
async fn comment_lifecycle() {
  let s = store().await;
  let u1 = AuthContext::user(Uuid::new_v4(), "u1");
  let u2 = AuthContext::user(Uuid::new_v4(), "u2");
  let id = create_titanic(&s, &u1).await;

  let res = app(&s, None)
    .oneshot(request(
      "POST",
      &format!("/comments/{id}"),
      Some(json!({ "body": "great" })),
    ))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

  let res = app(&s, Some(&u1))
    .oneshot(request(
      "POST",
      &format!("/comments/{id}"),
      Some(json!({ "body": "great", "author": u2.user_id })),
    ))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::CREATED);
  let body = body_json(res).await;
  let comments = body["movie"]["comments"].as_array().unwrap();
  assert_eq!(comments.len(), 1);
  assert_eq!(comments[0]["author"], json!(u1.user_id.unwrap().to_string()));
  assert_eq!(comments[0]["body"], json!("great"));
  let cid = comments[0]["comment_id"].as_str().unwrap().to_owned();
  let uri = format!("/comments/delete/{id}/{cid}");

  let res = app(&s, Some(&u2))
    .oneshot(request("DELETE", &uri, None))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::FORBIDDEN);

  let res = app(&s, Some(&u1))
    .oneshot(request("DELETE", &uri, None))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::NO_CONTENT);

  let res = app(&s, Some(&u1))
    .oneshot(request("DELETE", &uri, None))
    .await
    .unwrap();
  assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
