//! Application-level Actix middleware.

pub mod trace;
