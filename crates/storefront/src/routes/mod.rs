//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Catalog page
//! GET  /listings               - Filtered listing grid fragment (HTMX)
//! GET  /health                 - Health check
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart (returns count badge, triggers cart-updated)
//! POST /cart/update            - Update quantity (returns cart_items fragment)
//! POST /cart/remove            - Remove item (returns cart_items fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout               - Current wizard step
//! POST /checkout/details       - Submit customer details
//! POST /checkout/back          - Return to the details step
//! POST /checkout/method        - Select a payment method (fragment)
//! POST /checkout/submit        - Place the order
//! POST /checkout/done          - Leave the confirmation page, clearing the cart
//! POST /checkout/cancel        - Abort checkout, keeping the cart
//!
//! # Admin
//! GET  /admin/images           - Image upload page
//! POST /admin/images           - Upload an image (fragment)
//! ```

pub mod admin;
pub mod cart;
pub mod checkout;
pub mod home;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show))
        .route("/details", post(checkout::submit_details))
        .route("/back", post(checkout::back))
        .route("/method", post(checkout::select_method))
        .route("/submit", post(checkout::submit))
        .route("/done", post(checkout::done))
        .route("/cancel", post(checkout::cancel))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/images", get(admin::show).post(admin::upload))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Catalog
        .route("/", get(home::home))
        .route("/listings", get(home::listings))
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout routes
        .nest("/checkout", checkout_routes())
        // Admin routes
        .nest("/admin", admin_routes())
}
