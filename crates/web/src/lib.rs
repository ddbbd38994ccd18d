//! Donelist web application library.
//!
//! Serves the to-do application: signup, login, and per-user todo
//! lists split into current and completed views. Exposed as a library
//! so the CLI and the integration tests can reuse the router, the
//! repositories, and the configuration loader.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
