//! House-plan catalog entities and filtering.

use serde::{Deserialize, Serialize};

use crate::types::{ListingId, Money};

/// A purchasable house-plan listing.
///
/// Immutable once fetched from the plans API; the storefront never mutates
/// listings, it only snapshots their id/title/price into cart entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// Unique listing identifier.
    pub id: ListingId,
    /// Display title, e.g. "Modern Villa".
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Style category, e.g. "Modern", "Traditional".
    pub style_category: String,
    /// Price in whole rand.
    pub price: Money,
    /// Number of bedrooms.
    pub bedrooms: u32,
    /// Number of bathrooms.
    pub bathrooms: u32,
    /// Number of garage bays.
    pub garages: u32,
    /// Number of storeys.
    pub storeys: u32,
    /// Floor area in square metres.
    pub square_footage: u32,
    /// Hosted URL of the featured image, when one has been uploaded.
    pub featured_image_url: Option<String>,
    /// Hosted URLs of the gallery images, in display order.
    pub gallery_images: Vec<String>,
    /// Whether the listing is highlighted as featured.
    pub is_featured: bool,
}

impl Listing {
    /// Whether this listing matches a free-text query.
    ///
    /// A listing matches when its title or style category contains the query
    /// case-insensitively. The empty query matches everything.
    #[must_use]
    pub fn matches_query(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let query = query.to_lowercase();
        self.title.to_lowercase().contains(&query)
            || self.style_category.to_lowercase().contains(&query)
    }
}

/// Filter listings by a free-text query, preserving catalog order.
///
/// Pure function over the slice it is given: callers re-run it whenever the
/// query or the stored catalog changes. An empty query yields everything.
#[must_use]
pub fn filter<'a>(listings: &'a [Listing], query: &str) -> Vec<&'a Listing> {
    let query = query.trim();
    listings
        .iter()
        .filter(|listing| listing.matches_query(query))
        .collect()
}
