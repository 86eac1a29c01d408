//! Database models shared across the directory repository.

pub mod advisor;
pub mod announcement;
#[cfg(feature = "server")]
pub mod auth;
#[cfg(feature = "server")]
pub mod config;
