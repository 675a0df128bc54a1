//! Route-level page components.

pub mod create;
pub mod home;
pub mod library;
pub mod login;
pub mod register;
