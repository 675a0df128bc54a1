//! Domain services used by HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own business logic, persistence, and outbound calls so
//! route handlers can stay focused on protocol translation and auth plumbing.

pub mod account;
pub mod dropbox;
pub mod epub;
pub mod export;
pub mod library;
pub mod session;
