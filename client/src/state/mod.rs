//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! State is split by domain (`auth`, `library`, `draft`) so individual
//! components can depend on small focused models.

pub mod auth;
pub mod draft;
pub mod library;
