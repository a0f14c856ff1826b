//! Document-owned storage for items and edges.
//!
//! # Responsibility
//! - Own content items in an id-addressed arena (structural edges included).
//! - Keep by-reference edges apart from the containment tree.
//!
//! # Invariants
//! - Stores never validate relationship semantics; the builder does.

pub mod edge_store;
pub mod node_store;

pub use edge_store::{ByReferenceEdge, EdgeStore};
pub use node_store::NodeStore;
