//! Plansmith Core - Shared domain types.
//!
//! This crate provides the domain types and state machines used by the
//! storefront binary:
//! - catalog entities (listings, payment methods)
//! - the shopping cart store
//! - the checkout wizard state machine
//!
//! # Architecture
//!
//! The core crate contains only types and pure transition functions - no I/O,
//! no HTTP clients, no async. Cart and wizard behavior is fully testable here
//! without a web harness; the storefront crate drives these types from request
//! handlers and persists them in the session between requests.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and money
//! - [`listing`] - House-plan catalog entities and filtering
//! - [`payment`] - Payment methods and the selection state
//! - [`cart`] - The cart store
//! - [`checkout`] - The checkout wizard state machine

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod listing;
pub mod payment;
pub mod types;

pub use cart::{Cart, CartEntry};
pub use checkout::{
    CheckoutError, CheckoutStep, CheckoutWizard, CustomerDetails, OrderDraft, OrderLine,
    OrderReceipt,
};
pub use listing::Listing;
pub use payment::{MethodSelection, PaymentMethod, PaymentMethodKind};
pub use types::*;
