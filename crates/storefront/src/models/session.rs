//! Session-stored shopper state.
//!
//! The cart and the checkout wizard live entirely in the session. Handlers
//! load a value, mutate it through `plansmith-core`, and store it back;
//! nothing shopper-facing touches disk.
//!
//! Reads degrade to "no state" so catalog pages keep rendering when the
//! session store misbehaves. Writes propagate their errors, because silently
//! dropping a cart mutation or a checkout step is worse than a 500.

use plansmith_core::{Cart, CheckoutWizard, MethodSelection};
use tower_sessions::Session;

/// Session keys for shopper state.
pub mod keys {
    /// Key for the shopper's cart.
    pub const CART: &str = "cart";

    /// Key for the in-progress checkout wizard.
    pub const CHECKOUT_WIZARD: &str = "checkout_wizard";

    /// Key for the payment methods fetched for this checkout.
    pub const PAYMENT_METHODS: &str = "payment_methods";
}

/// Load the cart, defaulting to empty.
pub async fn load_cart(session: &Session) -> Cart {
    session
        .get::<Cart>(keys::CART)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Store the cart.
pub async fn save_cart(
    session: &Session,
    cart: &Cart,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CART, cart).await
}

/// Remove the cart.
pub async fn clear_cart(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<Cart>(keys::CART).await?;
    Ok(())
}

/// Load the in-progress checkout wizard, if any.
pub async fn load_wizard(session: &Session) -> Option<CheckoutWizard> {
    session
        .get::<CheckoutWizard>(keys::CHECKOUT_WIZARD)
        .await
        .ok()
        .flatten()
}

/// Store the checkout wizard.
pub async fn save_wizard(
    session: &Session,
    wizard: &CheckoutWizard,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CHECKOUT_WIZARD, wizard).await
}

/// Load the payment methods fetched for this checkout, if any.
pub async fn load_methods(session: &Session) -> Option<MethodSelection> {
    session
        .get::<MethodSelection>(keys::PAYMENT_METHODS)
        .await
        .ok()
        .flatten()
}

/// Store the payment methods fetched for this checkout.
pub async fn save_methods(
    session: &Session,
    methods: &MethodSelection,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::PAYMENT_METHODS, methods).await
}

/// Drop all checkout state, leaving the cart alone.
pub async fn clear_checkout(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CheckoutWizard>(keys::CHECKOUT_WIZARD)
        .await?;
    session
        .remove::<MethodSelection>(keys::PAYMENT_METHODS)
        .await?;
    Ok(())
}
