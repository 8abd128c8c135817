//! User Account API Library
//!
//! Exposes the server's building blocks for the binaries and for
//! integration tests.

pub mod background_tasks;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod validators;
