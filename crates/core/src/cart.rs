//! The shopping cart store.
//!
//! A pure, serde-serializable value held in the session between requests.
//! All mutation goes through the operations below; nothing here performs
//! I/O. Invariants:
//!
//! - at most one entry per listing id
//! - every entry has quantity >= 1 (setting quantity to 0 removes)

use serde::{Deserialize, Serialize};

use crate::listing::Listing;
use crate::types::{ListingId, Money};

/// One (listing, quantity) pairing in the cart.
///
/// Carries the listing's title and unit price as a display snapshot so the
/// cart page and order lines never need the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    /// The listing this entry references.
    pub listing_id: ListingId,
    /// Listing title at the time it was added.
    pub title: String,
    /// Unit price at the time it was added.
    pub unit_price: Money,
    /// Number of copies, always >= 1.
    pub quantity: u32,
}

impl CartEntry {
    /// `unit_price × quantity` for this entry.
    #[must_use]
    pub const fn line_total(&self) -> Money {
        self.unit_price.saturating_mul(self.quantity)
    }
}

/// Ordered collection of cart entries with pure transition functions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add a listing: increments quantity when an entry for `listing.id`
    /// already exists, otherwise appends a new entry with quantity 1.
    pub fn add(&mut self, listing: &Listing) {
        if let Some(entry) = self.entry_mut(listing.id) {
            entry.quantity = entry.quantity.saturating_add(1);
            return;
        }
        self.entries.push(CartEntry {
            listing_id: listing.id,
            title: listing.title.clone(),
            unit_price: listing.price,
            quantity: 1,
        });
    }

    /// Set the quantity for a listing. Quantity 0 removes the entry;
    /// unknown listing ids are a no-op.
    pub fn set_quantity(&mut self, listing_id: ListingId, quantity: u32) {
        if quantity < 1 {
            self.remove(listing_id);
            return;
        }
        if let Some(entry) = self.entry_mut(listing_id) {
            entry.quantity = quantity;
        }
    }

    /// Remove the entry for a listing, if present.
    pub fn remove(&mut self, listing_id: ListingId) {
        self.entries.retain(|entry| entry.listing_id != listing_id);
    }

    /// Sum of `unit_price × quantity` over all entries; zero when empty.
    #[must_use]
    pub fn total(&self) -> Money {
        self.entries.iter().map(CartEntry::line_total).sum()
    }

    /// Sum of quantities, for the cart badge.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.entries
            .iter()
            .fold(0, |count, entry| count.saturating_add(entry.quantity))
    }

    /// Empty the cart (after order completion).
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Whether the cart holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    fn entry_mut(&mut self, listing_id: ListingId) -> Option<&mut CartEntry> {
        self.entries
            .iter_mut()
            .find(|entry| entry.listing_id == listing_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn listing(id: i64, price: u64) -> Listing {
        Listing {
            id: ListingId::new(id),
            title: format!("Plan {id}"),
            description: String::new(),
            style_category: "Modern".to_string(),
            price: Money::from_rand(price),
            bedrooms: 3,
            bathrooms: 2,
            garages: 2,
            storeys: 1,
            square_footage: 220,
            featured_image_url: None,
            gallery_images: Vec::new(),
            is_featured: false,
        }
    }

    #[test]
    fn test_add_new_listing_starts_at_quantity_one() {
        let mut cart = Cart::new();
        cart.add(&listing(1, 15_000));

        assert_eq!(cart.entries().len(), 1);
        assert_eq!(cart.entries().first().unwrap().quantity, 1);
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_add_existing_listing_increments_quantity() {
        let mut cart = Cart::new();
        cart.add(&listing(1, 15_000));
        cart.add(&listing(1, 15_000));

        assert_eq!(cart.entries().len(), 1);
        assert_eq!(cart.entries().first().unwrap().quantity, 2);
    }

    #[test]
    fn test_total_of_two_copies() {
        // cart = [{id:1, price:15000, qty:2}] -> total 30000
        let mut cart = Cart::new();
        cart.add(&listing(1, 15_000));
        cart.add(&listing(1, 15_000));

        assert_eq!(cart.total(), Money::from_rand(30_000));
    }

    #[test]
    fn test_empty_cart_total_is_zero() {
        assert_eq!(Cart::new().total(), Money::ZERO);
    }

    #[test]
    fn test_set_quantity_zero_removes_entry() {
        let mut cart = Cart::new();
        cart.add(&listing(1, 15_000));

        cart.set_quantity(ListingId::new(1), 0);
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Money::ZERO);
    }

    #[test]
    fn test_set_quantity_unknown_listing_is_noop() {
        let mut cart = Cart::new();
        cart.add(&listing(1, 15_000));

        cart.set_quantity(ListingId::new(99), 5);
        assert_eq!(cart.entries().len(), 1);
        assert_eq!(cart.entries().first().unwrap().quantity, 1);
    }

    #[test]
    fn test_double_add_equals_add_then_set_quantity_two() {
        let plan = listing(1, 15_000);

        let mut doubled = Cart::new();
        doubled.add(&plan);
        doubled.add(&plan);

        let mut explicit = Cart::new();
        explicit.add(&plan);
        explicit.set_quantity(plan.id, 2);

        assert_eq!(doubled, explicit);
    }

    #[test]
    fn test_remove_unknown_listing_is_noop() {
        let mut cart = Cart::new();
        cart.add(&listing(1, 15_000));

        cart.remove(ListingId::new(2));
        assert_eq!(cart.entries().len(), 1);
    }

    #[test]
    fn test_clear_empties_the_store() {
        let mut cart = Cart::new();
        cart.add(&listing(1, 15_000));
        cart.add(&listing(2, 8_500));

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_entries_preserve_insertion_order() {
        let mut cart = Cart::new();
        cart.add(&listing(2, 8_500));
        cart.add(&listing(1, 15_000));
        cart.add(&listing(3, 12_000));

        let ids: Vec<i64> = cart.entries().iter().map(|e| e.listing_id.as_i64()).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    mod proptest_tests {
        use proptest::prelude::*;

        use super::*;

        /// A single cart operation over a small id space.
        #[derive(Debug, Clone)]
        enum CartOp {
            Add(i64),
            SetQuantity(i64, u32),
            Remove(i64),
        }

        fn cart_op() -> impl Strategy<Value = CartOp> {
            prop_oneof![
                (1_i64..=5).prop_map(CartOp::Add),
                ((1_i64..=5), (0_u32..=4)).prop_map(|(id, q)| CartOp::SetQuantity(id, q)),
                (1_i64..=5).prop_map(CartOp::Remove),
            ]
        }

        fn apply(cart: &mut Cart, op: &CartOp) {
            match *op {
                CartOp::Add(id) => cart.add(&listing(id, unit_price(id))),
                CartOp::SetQuantity(id, q) => cart.set_quantity(ListingId::new(id), q),
                CartOp::Remove(id) => cart.remove(ListingId::new(id)),
            }
        }

        const fn unit_price(id: i64) -> u64 {
            (id as u64) * 1_000
        }

        proptest! {
            /// No operation sequence produces duplicate ids or a zero quantity.
            #[test]
            fn invariants_hold_for_all_op_sequences(ops in prop::collection::vec(cart_op(), 0..40)) {
                let mut cart = Cart::new();
                for op in &ops {
                    apply(&mut cart, op);

                    let mut seen = std::collections::HashSet::new();
                    for entry in cart.entries() {
                        prop_assert!(seen.insert(entry.listing_id), "duplicate entry for {}", entry.listing_id);
                        prop_assert!(entry.quantity >= 1, "entry with quantity 0 survived");
                    }
                }
            }

            /// total() always equals the recomputed sum over entries.
            #[test]
            fn total_matches_recomputed_sum(ops in prop::collection::vec(cart_op(), 0..40)) {
                let mut cart = Cart::new();
                for op in &ops {
                    apply(&mut cart, op);
                }

                let expected: u64 = cart
                    .entries()
                    .iter()
                    .map(|e| e.unit_price.as_rand() * u64::from(e.quantity))
                    .sum();
                prop_assert_eq!(cart.total(), Money::from_rand(expected));
            }

            /// item_count() always equals the sum of quantities.
            #[test]
            fn item_count_matches_quantity_sum(ops in prop::collection::vec(cart_op(), 0..40)) {
                let mut cart = Cart::new();
                for op in &ops {
                    apply(&mut cart, op);
                }

                let expected: u32 = cart.entries().iter().map(|e| e.quantity).sum();
                prop_assert_eq!(cart.item_count(), expected);
            }
        }
    }
}
