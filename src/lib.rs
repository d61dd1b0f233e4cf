//! Core of a small social recipe-sharing platform.
//!
//! [`platform::Platform`] is the in-memory store (users, recipes, likes,
//! comments, follows). [`auth::AuthService`] handles registration and
//! login on top of it, [`persist`] saves and restores the whole store as
//! one snapshot, and [`console`] is the interactive front-end.

pub mod auth;
pub mod console;
pub mod errors;
pub mod models;
pub mod persist;
pub mod platform;
