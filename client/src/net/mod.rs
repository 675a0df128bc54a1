//! Network layer: REST helpers and shared wire types.

pub mod api;
pub mod types;
