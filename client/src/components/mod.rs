//! Reusable UI components.

pub mod header;
pub mod register_form;
pub mod user_menu;
