//! Domain aggregates exposed by the directory service layer.

pub mod advisor;
pub mod announcement;
pub mod facet;
pub mod types;
