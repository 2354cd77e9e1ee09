//! Contact domain model.
//!
//! # Responsibility
//! - Define the records stored and observed by core business logic.
//!
//! # Invariants
//! - Every stored contact is identified by a store-assigned `ContactId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod contact;
