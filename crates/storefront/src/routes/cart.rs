//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart itself lives in the session; handlers load it, mutate it through
//! `plansmith-core`, and store it back.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use plansmith_core::{Cart, CartEntry, ListingId};

use crate::error::{AppError, add_breadcrumb};
use crate::filters;
use crate::models::session as shopper_session;
use crate::state::AppState;

// =============================================================================
// Cart Views
// =============================================================================

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartEntryView {
    pub listing_id: i64,
    pub title: String,
    pub unit_price: String,
    pub quantity: u32,
    pub line_total: String,
}

impl From<&CartEntry> for CartEntryView {
    fn from(entry: &CartEntry) -> Self {
        Self {
            listing_id: entry.listing_id.as_i64(),
            title: entry.title.clone(),
            unit_price: entry.unit_price.to_string(),
            quantity: entry.quantity,
            line_total: entry.line_total().to_string(),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub entries: Vec<CartEntryView>,
    pub total: String,
    pub item_count: u32,
    pub is_empty: bool,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            entries: cart.entries().iter().map(CartEntryView::from).collect(),
            total: cart.total().to_string(),
            item_count: cart.item_count(),
            is_empty: cart.is_empty(),
        }
    }
}

// =============================================================================
// Forms and Templates
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub listing_id: i64,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub listing_id: i64,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub listing_id: i64,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart page.
#[instrument(skip(session))]
pub async fn show(session: Session) -> impl IntoResponse {
    let cart = shopper_session::load_cart(&session).await;

    CartShowTemplate {
        cart: CartView::from(&cart),
    }
}

/// Add a plan to the cart (HTMX).
///
/// Looks the plan up in the catalog to snapshot its title and price, then
/// returns the cart count badge with a trigger to refresh other fragments.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response, AppError> {
    let listings = state.plans().fetch_listings().await?;
    let listing = listings
        .iter()
        .find(|listing| listing.id == ListingId::new(form.listing_id))
        .ok_or_else(|| AppError::NotFound(format!("plan {}", form.listing_id)))?;

    let mut cart = shopper_session::load_cart(&session).await;
    cart.add(listing);
    shopper_session::save_cart(&session, &cart).await?;

    add_breadcrumb(
        "cart",
        "Added plan to cart",
        Some(&[("listing_id", &form.listing_id.to_string())]),
    );

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate {
            count: cart.item_count(),
        },
    )
        .into_response())
}

/// Update a line's quantity (HTMX).
///
/// A quantity of zero removes the line. Unknown plans are a no-op.
#[instrument(skip(session))]
pub async fn update(
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response, AppError> {
    let mut cart = shopper_session::load_cart(&session).await;
    cart.set_quantity(ListingId::new(form.listing_id), form.quantity);
    shopper_session::save_cart(&session, &cart).await?;

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from(&cart),
        },
    )
        .into_response())
}

/// Remove a line from the cart (HTMX).
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response, AppError> {
    let mut cart = shopper_session::load_cart(&session).await;
    cart.remove(ListingId::new(form.listing_id));
    shopper_session::save_cart(&session, &cart).await?;

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from(&cart),
        },
    )
        .into_response())
}

/// Cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    let cart = shopper_session::load_cart(&session).await;

    CartCountTemplate {
        count: cart.item_count(),
    }
}
