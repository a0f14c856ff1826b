//! Document content model.
//!
//! # Responsibility
//! - Define content items, their typed payloads and coded names.
//! - Keep every relation as a plain `NodeId`, never as a pointer.
//!
//! # Invariants
//! - Value kinds and relationship kinds are closed enumerations.
//! - A payload's variant is the item's value kind.

pub mod coded;
pub mod item;
pub mod kinds;
pub mod uid;
pub mod value;
