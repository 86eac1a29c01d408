//! DTO modules that bridge services with the JSON endpoints.

pub mod api;
pub mod dashboard;
pub mod main;
