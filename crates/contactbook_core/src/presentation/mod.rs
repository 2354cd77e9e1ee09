//! Presentation layer for the contact screen.
//!
//! # Responsibility
//! - Hold observable screen state on top of the shared contact store.
//! - Model the creation form and list rendering without any UI toolkit.

pub mod form;
pub mod screen;
pub mod view_model;
