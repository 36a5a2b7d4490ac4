//! Domain models for the storefront.
//!
//! The typed entities (cart, wizard, listings, payment methods) live in
//! `plansmith-core`; this module covers how they are held in the session.

pub mod session;

pub use session::keys as session_keys;
