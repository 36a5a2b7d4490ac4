//! Cache types for plans API responses.

use plansmith_core::{Listing, PaymentMethod};

/// Cache key for catalog and payment method lookups.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Listings,
    PaymentMethods,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Listings(Vec<Listing>),
    PaymentMethods(Vec<PaymentMethod>),
}
