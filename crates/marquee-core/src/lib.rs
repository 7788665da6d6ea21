//! Core types and the resource handlers for Marquee.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! The store backend and both presentation bindings depend on it.

pub mod auth;
pub mod error;
pub mod movie;
pub mod resource;
pub mod store;
pub mod user;
pub mod view;

pub use error::{Error, Result};
