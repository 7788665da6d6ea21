//! Integration tests for `SqliteStore` and the resource handlers against an
//! in-memory database.

use marquee_core::{
  Error as CoreError,
  auth::AuthContext,
  movie::{MovieInput, MoviePatch, NewComment, NewMovie},
  resource::{
    comments,
    movies::{self, ListScope},
  },
  store::MovieStore,
  user::{NewUser, User},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn user(s: &SqliteStore, name: &str) -> (User, AuthContext) {
  let user = s
    .add_user(NewUser {
      username:      name.into(),
      password_hash: format!("hash-of-{name}"),
    })
    .await
    .unwrap()
    .expect("username is free");
  let ctx = AuthContext::user(user.user_id, name);
  (user, ctx)
}

fn titanic() -> MovieInput {
  MovieInput {
    name:        "Titanic".into(),
    genre:       "romance_love".into(),
    is_pg_rated: true,
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_find_user() {
  let s = store().await;
  let (alice, _) = user(&s, "alice").await;

  let by_id = s.get_user(alice.user_id).await.unwrap().unwrap();
  assert_eq!(by_id.username, "alice");
  assert_eq!(by_id.password_hash, "hash-of-alice");

  let by_name = s.find_user_by_username("alice").await.unwrap().unwrap();
  assert_eq!(by_name.user_id, alice.user_id);

  assert!(s.find_user_by_username("bob").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
  let s = store().await;
  user(&s, "alice").await;

  let taken = s
    .add_user(NewUser {
      username:      "alice".into(),
      password_hash: "x".into(),
    })
    .await
    .unwrap();
  assert!(taken.is_none());

  // The original account is untouched.
  let alice = s.find_user_by_username("alice").await.unwrap().unwrap();
  assert_eq!(alice.password_hash, "hash-of-alice");
}

// ─── Movie documents ─────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_get_and_list_movies() {
  let s = store().await;
  let owner = Uuid::new_v4();

  let first = s
    .insert_movie(NewMovie {
      name:        "Avatar".into(),
      genre:       "sci_fiction".into(),
      is_pg_rated: true,
      owner,
    })
    .await
    .unwrap();
  s.insert_movie(NewMovie {
    name:        "LOTR".into(),
    genre:       "action".into(),
    is_pg_rated: false,
    owner:       Uuid::new_v4(),
  })
  .await
  .unwrap();

  let fetched = s.get_movie(first.movie_id).await.unwrap().unwrap();
  assert_eq!(fetched, first);

  let all = s.list_movies(None).await.unwrap();
  let names: Vec<_> = all.iter().map(|m| m.name.as_str()).collect();
  assert_eq!(names, ["Avatar", "LOTR"]);

  let owned = s.list_movies(Some(owner)).await.unwrap();
  assert_eq!(owned.len(), 1);
  assert_eq!(owned[0].movie_id, first.movie_id);
}

#[tokio::test]
async fn get_missing_movie_returns_none() {
  let s = store().await;
  assert!(s.get_movie(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn save_never_rewrites_owner() {
  let s = store().await;
  let owner = Uuid::new_v4();
  let mut movie = s
    .insert_movie(titanic().owned_by(owner))
    .await
    .unwrap();

  movie.owner = Uuid::new_v4();
  movie.name = "Titanic II".into();
  assert!(s.save_movie(&movie).await.unwrap());

  let stored = s.get_movie(movie.movie_id).await.unwrap().unwrap();
  assert_eq!(stored.owner, owner);
  assert_eq!(stored.name, "Titanic II");
}

#[tokio::test]
async fn save_and_delete_missing_movie_report_false() {
  let s = store().await;
  let movie = s
    .insert_movie(titanic().owned_by(Uuid::new_v4()))
    .await
    .unwrap();
  assert!(s.delete_movie(movie.movie_id).await.unwrap());
  assert!(!s.delete_movie(movie.movie_id).await.unwrap());
  assert!(!s.save_movie(&movie).await.unwrap());
}

// ─── Movie handler ───────────────────────────────────────────────────────────

#[tokio::test]
async fn list_with_no_movies_is_empty() {
  let s = store().await;
  let all = movies::list(&s, &AuthContext::anonymous(), ListScope::All)
    .await
    .unwrap();
  assert!(all.is_empty());
}

#[tokio::test]
async fn create_sets_owner_from_session() {
  let s = store().await;
  let (u1, ctx) = user(&s, "u1").await;

  let movie = movies::create(&s, &ctx, titanic()).await.unwrap();
  let stored = s.get_movie(movie.movie_id).await.unwrap().unwrap();
  assert_eq!(stored.owner, u1.user_id);
  assert_eq!(stored.name, "Titanic");
  assert_eq!(stored.genre, "romance_love");
  assert!(stored.is_pg_rated);
}

#[tokio::test]
async fn anonymous_create_is_rejected() {
  let s = store().await;
  let err = movies::create(&s, &AuthContext::anonymous(), titanic())
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::Unauthenticated));
  assert!(s.list_movies(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn create_with_blank_name_is_invalid() {
  let s = store().await;
  let (_, ctx) = user(&s, "u1").await;
  let mut input = titanic();
  input.name = " ".into();
  let err = movies::create(&s, &ctx, input).await.unwrap_err();
  assert!(matches!(err, CoreError::Invalid(_)));
}

#[tokio::test]
async fn list_resolves_owner_and_mine_filters() {
  let s = store().await;
  let (_, ctx1) = user(&s, "u1").await;
  let (_, ctx2) = user(&s, "u2").await;

  movies::create(&s, &ctx1, titanic()).await.unwrap();
  let mut other = titanic();
  other.name = "cowboy".into();
  movies::create(&s, &ctx2, other).await.unwrap();

  let all = movies::list(&s, &ctx1, ListScope::All).await.unwrap();
  assert_eq!(all.len(), 2);
  assert_eq!(all[0].owner.username.as_deref(), Some("u1"));
  assert_eq!(all[1].owner.username.as_deref(), Some("u2"));

  let mine = movies::list(&s, &ctx2, ListScope::Mine).await.unwrap();
  assert_eq!(mine.len(), 1);
  assert_eq!(mine[0].name, "cowboy");

  let anon = movies::list(&s, &AuthContext::anonymous(), ListScope::Mine)
    .await
    .unwrap();
  assert!(anon.is_empty());
}

#[tokio::test]
async fn get_one_unknown_or_malformed_id_is_not_found() {
  let s = store().await;
  let err = movies::get_one(&s, &Uuid::new_v4().to_string())
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::MovieNotFound(_)));

  let err = movies::get_one(&s, "not-an-id").await.unwrap_err();
  assert!(matches!(err, CoreError::MovieNotFound(ref id) if id == "not-an-id"));
}

#[tokio::test]
async fn owner_can_partially_update() {
  let s = store().await;
  let (_, ctx) = user(&s, "u1").await;
  let movie = movies::create(&s, &ctx, titanic()).await.unwrap();

  let patch = MoviePatch {
    is_pg_rated: Some(false),
    ..Default::default()
  };
  movies::update(&s, &ctx, &movie.movie_id.to_string(), patch)
    .await
    .unwrap();

  let stored = s.get_movie(movie.movie_id).await.unwrap().unwrap();
  assert_eq!(stored.name, "Titanic");
  assert!(!stored.is_pg_rated);
  assert!(stored.updated_at >= movie.updated_at);
}

#[tokio::test]
async fn non_owner_update_is_forbidden_and_changes_nothing() {
  let s = store().await;
  let (_, ctx1) = user(&s, "u1").await;
  let (_, ctx2) = user(&s, "u2").await;
  let movie = movies::create(&s, &ctx1, titanic()).await.unwrap();
  let id = movie.movie_id.to_string();

  let patch = MoviePatch {
    name: Some("Hijacked".into()),
    ..Default::default()
  };
  let err = movies::update(&s, &ctx2, &id, patch.clone())
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::Forbidden));

  let err = movies::update(&s, &AuthContext::anonymous(), &id, patch)
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::Unauthenticated));

  let stored = s.get_movie(movie.movie_id).await.unwrap().unwrap();
  assert_eq!(stored, movie);
}

#[tokio::test]
async fn non_owner_delete_is_forbidden() {
  let s = store().await;
  let (_, ctx1) = user(&s, "u1").await;
  let (_, ctx2) = user(&s, "u2").await;
  let movie = movies::create(&s, &ctx1, titanic()).await.unwrap();
  let id = movie.movie_id.to_string();

  let err = movies::delete(&s, &ctx2, &id).await.unwrap_err();
  assert!(matches!(err, CoreError::Forbidden));
  assert!(s.get_movie(movie.movie_id).await.unwrap().is_some());

  movies::delete(&s, &ctx1, &id).await.unwrap();
  assert!(s.get_movie(movie.movie_id).await.unwrap().is_none());

  let err = movies::delete(&s, &ctx1, &id).await.unwrap_err();
  assert!(matches!(err, CoreError::MovieNotFound(_)));
}

// ─── Comment handler ─────────────────────────────────────────────────────────

#[tokio::test]
async fn append_sets_author_from_session() {
  let s = store().await;
  let (_, owner) = user(&s, "owner").await;
  let (u1, ctx) = user(&s, "u1").await;
  let m1 = movies::create(&s, &owner, titanic()).await.unwrap();

  // A payload-supplied author has nowhere to go.
  let input: NewComment = serde_json::from_value(serde_json::json!({
    "body": "great",
    "author": Uuid::new_v4(),
  }))
  .unwrap();
  let (_, comment) = comments::append(&s, &ctx, &m1.movie_id.to_string(), input)
    .await
    .unwrap();
  assert_eq!(comment.author, u1.user_id);

  let stored = s.get_movie(m1.movie_id).await.unwrap().unwrap();
  assert_eq!(stored.comments.len(), 1);
  let c = stored.comments.get(comment.comment_id).unwrap();
  assert_eq!(c.author, u1.user_id);
  assert_eq!(c.body, "great");

  let view = movies::get_one(&s, &m1.movie_id.to_string()).await.unwrap();
  assert_eq!(view.comments[0].author.username.as_deref(), Some("u1"));
}

#[tokio::test]
async fn anonymous_append_is_rejected() {
  let s = store().await;
  let (_, owner) = user(&s, "owner").await;
  let m1 = movies::create(&s, &owner, titanic()).await.unwrap();

  let err = comments::append(
    &s,
    &AuthContext::anonymous(),
    &m1.movie_id.to_string(),
    NewComment::new("great"),
  )
  .await
  .unwrap_err();
  assert!(matches!(err, CoreError::Unauthenticated));
  let stored = s.get_movie(m1.movie_id).await.unwrap().unwrap();
  assert!(stored.comments.is_empty());
}

#[tokio::test]
async fn append_to_missing_movie_is_not_found() {
  let s = store().await;
  let (_, ctx) = user(&s, "u1").await;
  let err = comments::append(
    &s,
    &ctx,
    &Uuid::new_v4().to_string(),
    NewComment::new("great"),
  )
  .await
  .unwrap_err();
  assert!(matches!(err, CoreError::MovieNotFound(_)));
}

#[tokio::test]
async fn author_removes_comment_once() {
  let s = store().await;
  let (_, ctx) = user(&s, "u1").await;
  let m1 = movies::create(&s, &ctx, titanic()).await.unwrap();
  let mid = m1.movie_id.to_string();

  comments::append(&s, &ctx, &mid, NewComment::new("first"))
    .await
    .unwrap();
  let (_, c) = comments::append(&s, &ctx, &mid, NewComment::new("great"))
    .await
    .unwrap();
  let cid = c.comment_id.to_string();

  comments::remove(&s, &ctx, &mid, &cid).await.unwrap();

  let stored = s.get_movie(m1.movie_id).await.unwrap().unwrap();
  assert_eq!(stored.comments.len(), 1);
  assert!(!stored.comments.contains(c.comment_id));

  let view = movies::get_one(&s, &mid).await.unwrap();
  assert!(view.comments.iter().all(|v| v.comment_id != c.comment_id));

  let err = comments::remove(&s, &ctx, &mid, &cid).await.unwrap_err();
  assert!(matches!(err, CoreError::CommentNotFound { .. }));
}

#[tokio::test]
async fn non_author_cannot_remove_comment() {
  let s = store().await;
  let (_, ctx1) = user(&s, "u1").await;
  let (_, ctx2) = user(&s, "u2").await;
  let m1 = movies::create(&s, &ctx2, titanic()).await.unwrap();
  let mid = m1.movie_id.to_string();

  let (_, c) = comments::append(&s, &ctx1, &mid, NewComment::new("great"))
    .await
    .unwrap();
  let cid = c.comment_id.to_string();

  // Owning the movie does not grant rights over other people's comments.
  let err = comments::remove(&s, &ctx2, &mid, &cid).await.unwrap_err();
  assert!(matches!(err, CoreError::Forbidden));

  let err = comments::remove(&s, &AuthContext::anonymous(), &mid, &cid)
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::Unauthenticated));

  let stored = s.get_movie(m1.movie_id).await.unwrap().unwrap();
  assert!(stored.comments.contains(c.comment_id));
}

#[tokio::test]
async fn remove_unknown_comment_is_not_found() {
  let s = store().await;
  let (_, ctx) = user(&s, "u1").await;
  let m1 = movies::create(&s, &ctx, titanic()).await.unwrap();
  let mid = m1.movie_id.to_string();

  for cid in [Uuid::new_v4().to_string(), "garbage".to_string()] {
    let err = comments::remove(&s, &ctx, &mid, &cid).await.unwrap_err();
    assert!(err.is_not_found());
  }
}

#[tokio::test]
async fn deleting_movie_drops_its_comments() {
  let s = store().await;
  let (_, ctx) = user(&s, "u1").await;
  let m1 = movies::create(&s, &ctx, titanic()).await.unwrap();
  let mid = m1.movie_id.to_string();
  let (_, c) = comments::append(&s, &ctx, &mid, NewComment::new("great"))
    .await
    .unwrap();

  movies::delete(&s, &ctx, &mid).await.unwrap();

  let err = comments::remove(&s, &ctx, &mid, &c.comment_id.to_string())
    .await
    .unwrap_err();
  assert!(matches!(err, CoreError::MovieNotFound(_)));
}
