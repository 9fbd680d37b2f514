//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel
//! - **jwks**: bearer token verification against the identity provider's
//!   published signing keys
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod jwks;
pub mod persistence;
