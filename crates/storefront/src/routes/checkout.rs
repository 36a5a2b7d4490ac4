//! Checkout wizard route handlers.
//!
//! The wizard state machine lives in `plansmith-core`; these handlers hold
//! one wizard per session and render whichever step it is on. `GET /checkout`
//! always shows the current step, so every POST that moves the wizard just
//! redirects back there.
//!
//! Order submission pauses for the configured settle delay after a successful
//! POST, then re-reads the session and only confirms if the same checkout
//! attempt is still live. A cancel or restart during the pause supersedes the
//! attempt and the result is discarded.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use plansmith_core::{
    Cart, CheckoutError, CheckoutStep, CheckoutWizard, CustomerDetails, MethodSelection,
    OrderReceipt, PaymentMethodId,
};

use crate::error::{AppError, add_breadcrumb};
use crate::filters;
use crate::models::session as shopper_session;
use crate::routes::cart::CartView;
use crate::state::AppState;

// =============================================================================
// Payment Method Views
// =============================================================================

/// One payment method option for templates.
#[derive(Clone)]
pub struct MethodView {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub labels_caption: &'static str,
    pub labels: Vec<String>,
    pub selected: bool,
}

/// Payment method chooser display data.
#[derive(Clone)]
pub struct MethodsView {
    pub methods: Vec<MethodView>,
    pub unavailable: bool,
    pub can_submit: bool,
}

impl From<&MethodSelection> for MethodsView {
    fn from(selection: &MethodSelection) -> Self {
        let selected_id = selection.selected().map(|method| method.id);

        let methods = selection
            .methods()
            .iter()
            .map(|method| MethodView {
                id: method.id.as_i64(),
                name: method.name.clone(),
                description: method.description.clone(),
                labels_caption: method.kind.labels_caption(),
                labels: method.supported_labels.clone(),
                selected: Some(method.id) == selected_id,
            })
            .collect();

        Self {
            methods,
            unavailable: selection.is_empty(),
            can_submit: selected_id.is_some(),
        }
    }
}

/// Receipt display data for the confirmation step.
#[derive(Clone)]
pub struct ReceiptView {
    pub total: String,
    pub payment_method_name: String,
    pub email: String,
    pub order_number: Option<String>,
}

impl From<&OrderReceipt> for ReceiptView {
    fn from(receipt: &OrderReceipt) -> Self {
        Self {
            total: receipt.total.to_string(),
            payment_method_name: receipt.payment_method_name.clone(),
            email: receipt.email.clone(),
            order_number: receipt.order_number.clone(),
        }
    }
}

// =============================================================================
// Forms and Templates
// =============================================================================

/// Customer details form data.
#[derive(Debug, Deserialize)]
pub struct DetailsForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub notes: String,
}

impl From<DetailsForm> for CustomerDetails {
    fn from(form: DetailsForm) -> Self {
        Self {
            first_name: form.first_name,
            last_name: form.last_name,
            email: form.email,
            phone: form.phone,
            address: form.address,
            city: form.city,
            province: form.province,
            postal_code: form.postal_code,
            notes: form.notes,
        }
    }
}

/// Payment method selection form data.
#[derive(Debug, Deserialize)]
pub struct MethodForm {
    pub method_id: i64,
}

/// Details step template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/details.html")]
pub struct DetailsTemplate {
    pub details: CustomerDetails,
    pub error: Option<String>,
}

/// Payment step template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/payment.html")]
pub struct PaymentTemplate {
    pub methods: MethodsView,
    pub cart: CartView,
    pub message: Option<String>,
}

/// Confirmation step template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/confirmation.html")]
pub struct ConfirmationTemplate {
    pub receipt: ReceiptView,
}

/// Payment methods fragment template (for HTMX selection swaps).
#[derive(Template, WebTemplate)]
#[template(path = "partials/payment_methods.html")]
pub struct PaymentMethodsTemplate {
    pub methods: MethodsView,
}

// =============================================================================
// Step Rendering
// =============================================================================

/// Payment methods for this checkout: reused from the session when already
/// fetched, fetched once otherwise. Fetch failures are not stored, so the
/// next render retries.
async fn methods_for_payment(
    state: &AppState,
    session: &Session,
) -> Result<MethodSelection, AppError> {
    if let Some(selection) = shopper_session::load_methods(session).await {
        return Ok(selection);
    }

    match state.plans().fetch_payment_methods().await {
        Ok(methods) => {
            let selection = MethodSelection::from_fetched(methods);
            shopper_session::save_methods(session, &selection).await?;
            Ok(selection)
        }
        Err(e) => {
            tracing::error!("Failed to fetch payment methods: {e}");
            Ok(MethodSelection::unavailable())
        }
    }
}

fn render_payment(
    selection: &MethodSelection,
    cart: &Cart,
    message: Option<String>,
) -> Result<Response, AppError> {
    Ok(PaymentTemplate {
        methods: MethodsView::from(selection),
        cart: CartView::from(cart),
        message,
    }
    .into_response())
}

/// Render whichever step the wizard is on.
async fn render_step(
    state: &AppState,
    session: &Session,
    wizard: &CheckoutWizard,
    cart: &Cart,
) -> Result<Response, AppError> {
    match wizard.step() {
        CheckoutStep::Details => Ok(DetailsTemplate {
            details: wizard.details().clone(),
            error: None,
        }
        .into_response()),
        CheckoutStep::Payment => {
            let selection = methods_for_payment(state, session).await?;
            render_payment(&selection, cart, None)
        }
        CheckoutStep::Confirmation => {
            let receipt = wizard
                .receipt()
                .ok_or_else(|| AppError::Internal("confirmation step without a receipt".into()))?;
            Ok(ConfirmationTemplate {
                receipt: ReceiptView::from(receipt),
            }
            .into_response())
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the current checkout step.
///
/// Starts a fresh wizard when none is in the session. An empty cart bounces
/// back to the cart page unless an order is already confirmed.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Response, AppError> {
    let cart = shopper_session::load_cart(&session).await;

    let wizard = match shopper_session::load_wizard(&session).await {
        Some(wizard) => wizard,
        None => {
            if cart.is_empty() {
                return Ok(Redirect::to("/cart").into_response());
            }
            let wizard = CheckoutWizard::new();
            shopper_session::save_wizard(&session, &wizard).await?;
            wizard
        }
    };

    if cart.is_empty() && wizard.step() != CheckoutStep::Confirmation {
        return Ok(Redirect::to("/cart").into_response());
    }

    render_step(&state, &session, &wizard, &cart).await
}

/// Submit customer details (Details step).
///
/// Validation failures re-render the form with what was typed and the
/// rejection message; the wizard itself does not move.
#[instrument(skip(session, form))]
pub async fn submit_details(
    session: Session,
    Form(form): Form<DetailsForm>,
) -> Result<Response, AppError> {
    let Some(mut wizard) = shopper_session::load_wizard(&session).await else {
        return Ok(Redirect::to("/checkout").into_response());
    };

    let details = CustomerDetails::from(form);

    match wizard.submit_details(&details) {
        Ok(()) => {
            shopper_session::save_wizard(&session, &wizard).await?;
            add_breadcrumb("checkout", "Submitted customer details", None);
            Ok(Redirect::to("/checkout").into_response())
        }
        Err(CheckoutError::InvalidTransition(_)) => Ok(Redirect::to("/checkout").into_response()),
        Err(error) => Ok(DetailsTemplate {
            details,
            error: Some(error.to_string()),
        }
        .into_response()),
    }
}

/// Go back from Payment to Details, keeping the entered fields.
#[instrument(skip(session))]
pub async fn back(session: Session) -> Result<Response, AppError> {
    if let Some(mut wizard) = shopper_session::load_wizard(&session).await
        && wizard.back_to_details().is_ok()
    {
        shopper_session::save_wizard(&session, &wizard).await?;
    }

    Ok(Redirect::to("/checkout").into_response())
}

/// Select a payment method (HTMX).
///
/// Unknown method ids leave the selection unchanged.
#[instrument(skip(session))]
pub async fn select_method(
    session: Session,
    Form(form): Form<MethodForm>,
) -> Result<Response, AppError> {
    let Some(mut selection) = shopper_session::load_methods(&session).await else {
        return Ok(Redirect::to("/checkout").into_response());
    };

    selection.select(PaymentMethodId::new(form.method_id));
    shopper_session::save_methods(&session, &selection).await?;

    Ok(PaymentMethodsTemplate {
        methods: MethodsView::from(&selection),
    }
    .into_response())
}

/// Post-settle commit decision. Confirms the stored wizard only when it
/// still carries the captured attempt token and still accepts confirmation.
/// Anything else in the session means the attempt was superseded and the
/// order result is dropped.
fn commit_confirmation(
    stored: Option<CheckoutWizard>,
    attempt: Uuid,
    receipt: OrderReceipt,
) -> Option<CheckoutWizard> {
    let mut wizard = stored?;
    if wizard.attempt_token() != attempt {
        return None;
    }
    // Back navigation during the pause keeps the token but leaves the step.
    wizard.confirm(receipt).ok()?;
    Some(wizard)
}

/// Submit the order (Payment step).
///
/// One attempt against the backend. A `success: false` envelope keeps the
/// wizard on Payment and shows the backend's message verbatim; transport
/// failures show a generic message instead. Success waits out the settle
/// delay, re-checks that this attempt is still the live one, and then moves
/// the wizard to Confirmation. The cart stays as it is until the shopper
/// leaves the confirmation page.
#[instrument(skip(state, session))]
pub async fn submit(State(state): State<AppState>, session: Session) -> Result<Response, AppError> {
    let Some(wizard) = shopper_session::load_wizard(&session).await else {
        return Ok(Redirect::to("/checkout").into_response());
    };
    if wizard.step() != CheckoutStep::Payment {
        return Ok(Redirect::to("/checkout").into_response());
    }

    let cart = shopper_session::load_cart(&session).await;
    let selection = shopper_session::load_methods(&session)
        .await
        .unwrap_or_else(MethodSelection::unavailable);

    let draft = match wizard.build_draft(&cart, &selection) {
        Ok(draft) => draft,
        Err(error) => return render_payment(&selection, &cart, Some(error.to_string())),
    };

    let attempt = wizard.attempt_token();
    add_breadcrumb(
        "checkout",
        "Submitting order",
        Some(&[("lines", &draft.lines.len().to_string())]),
    );

    match state.plans().create_order(&draft).await {
        Ok(order_number) => {
            // Simulated settle pause before the confirmation appears
            tokio::time::sleep(state.config().checkout.settle_delay).await;

            // The session may have moved on during the pause; only commit
            // the attempt this result belongs to.
            let stored = shopper_session::load_wizard(&session).await;
            match commit_confirmation(stored, attempt, draft.receipt(order_number)) {
                Some(wizard) => shopper_session::save_wizard(&session, &wizard).await?,
                None => {
                    tracing::warn!("Discarding order result for a superseded checkout attempt");
                }
            }
            Ok(Redirect::to("/checkout").into_response())
        }
        Err(error) => {
            if error.is_transport() {
                tracing::error!("Order submission transport failure: {error}");
            } else {
                tracing::warn!("Order rejected by backend: {error}");
            }
            render_payment(&selection, &cart, Some(error.user_message("order processing failed")))
        }
    }
}

/// Leave the confirmation page (Confirmation step).
///
/// This is the point where the cart is cleared, so the confirmation page can
/// still show what was purchased up until the shopper moves on.
#[instrument(skip(session))]
pub async fn done(session: Session) -> Result<Response, AppError> {
    let Some(wizard) = shopper_session::load_wizard(&session).await else {
        return Ok(Redirect::to("/").into_response());
    };
    if wizard.step() != CheckoutStep::Confirmation {
        return Ok(Redirect::to("/checkout").into_response());
    }

    shopper_session::clear_cart(&session).await?;
    shopper_session::clear_checkout(&session).await?;
    add_breadcrumb("checkout", "Order complete, cart cleared", None);

    Ok(Redirect::to("/").into_response())
}

/// Abort the checkout, keeping the cart.
#[instrument(skip(session))]
pub async fn cancel(session: Session) -> Result<Response, AppError> {
    if let Some(wizard) = shopper_session::load_wizard(&session).await
        && wizard.step() == CheckoutStep::Confirmation
    {
        // The order already exists upstream; there is nothing to abort.
        return Ok(Redirect::to("/checkout").into_response());
    }

    shopper_session::clear_checkout(&session).await?;

    Ok(Redirect::to("/cart").into_response())
}
