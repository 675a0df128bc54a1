//! Small client utilities shared across pages.

pub mod auth;
