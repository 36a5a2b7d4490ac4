//! Catalog route handlers.
//!
//! The home page shows the full plan catalog with a search box. Typing in
//! the box swaps the grid via HTMX against `GET /listings`; the filter runs
//! over the already-fetched catalog, not against the backend.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use plansmith_core::{Listing, listing};

use crate::filters;
use crate::state::AppState;

// =============================================================================
// Listing Views
// =============================================================================

/// Listing display data for templates.
#[derive(Clone)]
pub struct ListingView {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub style_category: String,
    pub price: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub garages: u32,
    pub storeys: u32,
    pub square_footage: u32,
    pub image_url: Option<String>,
    pub is_featured: bool,
}

impl From<&Listing> for ListingView {
    fn from(listing: &Listing) -> Self {
        Self {
            id: listing.id.as_i64(),
            title: listing.title.clone(),
            description: listing.description.clone(),
            style_category: listing.style_category.clone(),
            price: listing.price.to_string(),
            bedrooms: listing.bedrooms,
            bathrooms: listing.bathrooms,
            garages: listing.garages,
            storeys: listing.storeys,
            square_footage: listing.square_footage,
            image_url: listing.featured_image_url.clone(),
            is_featured: listing.is_featured,
        }
    }
}

/// Catalog fetch outcome shaped for templates.
struct CatalogView {
    listings: Vec<Listing>,
    fetch_failed: bool,
}

/// Fetch the catalog, degrading to an empty grid with a failure flag.
async fn fetch_catalog(state: &AppState) -> CatalogView {
    state.plans().fetch_listings().await.map_or_else(
        |e| {
            tracing::error!("Failed to fetch plan catalog: {e}");
            CatalogView {
                listings: Vec::new(),
                fetch_failed: true,
            }
        },
        |listings| CatalogView {
            listings,
            fetch_failed: false,
        },
    )
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// Plans to show in the grid.
    pub listings: Vec<ListingView>,
    /// True when the catalog fetch failed and the grid is empty for that reason.
    pub fetch_failed: bool,
    /// Current filter query, echoed back into the search box.
    pub query: String,
}

/// Listing grid fragment template (for HTMX filter swaps).
#[derive(Template, WebTemplate)]
#[template(path = "partials/listing_grid.html")]
pub struct ListingGridTemplate {
    pub listings: Vec<ListingView>,
    pub fetch_failed: bool,
    pub query: String,
}

/// Filter query parameters.
#[derive(Debug, Deserialize)]
pub struct FilterQuery {
    #[serde(default)]
    pub q: String,
}

/// Display the home page, honoring a `?q=` filter.
#[instrument(skip(state))]
pub async fn home(
    State(state): State<AppState>,
    Query(params): Query<FilterQuery>,
) -> impl IntoResponse {
    let catalog = fetch_catalog(&state).await;
    let filtered = listing::filter(&catalog.listings, &params.q);

    HomeTemplate {
        listings: filtered.into_iter().map(ListingView::from).collect(),
        fetch_failed: catalog.fetch_failed,
        query: params.q,
    }
}

/// Filtered listing grid (HTMX).
///
/// Matches title or style category case-insensitively; an empty query
/// returns the full catalog.
#[instrument(skip(state))]
pub async fn listings(
    State(state): State<AppState>,
    Query(params): Query<FilterQuery>,
) -> impl IntoResponse {
    let catalog = fetch_catalog(&state).await;
    let filtered = listing::filter(&catalog.listings, &params.q);

    ListingGridTemplate {
        listings: filtered.into_iter().map(ListingView::from).collect(),
        fetch_failed: catalog.fetch_failed,
        query: params.q,
    }
}
