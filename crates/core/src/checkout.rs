//! The checkout wizard state machine.
//!
//! Three steps: Details -> Payment -> Confirmation. The wizard is a pure
//! value held in the session; every transition is a method returning
//! `Result`, so the guards are testable without a web harness. Order
//! submission itself (the HTTP call) is driven by the storefront handler:
//! the wizard builds the [`OrderDraft`], the handler submits it, and only a
//! successful submission feeds a receipt back into [`CheckoutWizard::confirm`].
//!
//! Each wizard instance carries an attempt token. The submission handler
//! captures the token before awaiting the API call and compares it against
//! the session's wizard afterwards; a mismatch means the user cancelled or
//! restarted checkout mid-flight and the result must be discarded.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cart::Cart;
use crate::payment::MethodSelection;
use crate::types::{ListingId, Money, PaymentMethodId};

/// Which screen the wizard is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckoutStep {
    /// Customer contact and billing details form.
    Details,
    /// Payment method selection and order review.
    Payment,
    /// Order placed; terminal for this wizard instance.
    Confirmation,
}

impl std::fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Details => "details",
            Self::Payment => "payment",
            Self::Confirmation => "confirmation",
        };
        write!(f, "{name}")
    }
}

/// Checkout transition failures.
///
/// These are the validation-class failures surfaced inline on the current
/// step; API failures are a separate concern owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckoutError {
    /// A required customer field is blank.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Submission was attempted with nothing in the cart.
    #[error("empty cart")]
    EmptyCart,

    /// Submission was attempted with no payment method selected.
    #[error("no payment method selected")]
    NoPaymentMethod,

    /// The requested transition is not available from the current step.
    #[error("not available on the {0} step")]
    InvalidTransition(CheckoutStep),
}

/// Customer contact and billing fields captured on the details step.
///
/// First name, last name, email, and phone are required; the rest are
/// optional free text passed through to the order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub notes: String,
}

impl CustomerDetails {
    /// Check the four required fields, reporting the first blank one.
    ///
    /// Whitespace-only values count as blank.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::MissingField`] naming the offending field.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        let required = [
            ("first name", &self.first_name),
            ("last name", &self.last_name),
            ("email", &self.email),
            ("phone", &self.phone),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(CheckoutError::MissingField(name));
            }
        }
        Ok(())
    }
}

/// One line item of an order draft: a cart entry snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub listing_id: ListingId,
    pub quantity: u32,
    pub unit_price: Money,
}

/// The not-yet-submitted purchase request assembled on the payment step.
///
/// Snapshots the cart at build time; later cart mutations do not affect a
/// draft already being submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub customer: CustomerDetails,
    pub payment_method_id: PaymentMethodId,
    pub payment_method_name: String,
    pub lines: Vec<OrderLine>,
    pub total: Money,
}

impl OrderDraft {
    /// Build the confirmation receipt for this draft once the API accepted
    /// it. `order_number` is the API-issued reference, when one was
    /// returned.
    #[must_use]
    pub fn receipt(&self, order_number: Option<String>) -> OrderReceipt {
        OrderReceipt {
            total: self.total,
            payment_method_name: self.payment_method_name.clone(),
            email: self.customer.email.clone(),
            order_number,
        }
    }
}

/// What the confirmation screen displays after a successful order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReceipt {
    /// Order total at submission time.
    pub total: Money,
    /// Display name of the method the order was placed with.
    pub payment_method_name: String,
    /// Email the confirmation is addressed to.
    pub email: String,
    /// API-issued order reference (e.g. "MZ1700000000"), when returned.
    pub order_number: Option<String>,
}

/// The three-step checkout state machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutWizard {
    step: CheckoutStep,
    details: CustomerDetails,
    attempt_token: Uuid,
    receipt: Option<OrderReceipt>,
}

impl CheckoutWizard {
    /// A fresh wizard on the details step with a new attempt token.
    #[must_use]
    pub fn new() -> Self {
        Self {
            step: CheckoutStep::Details,
            details: CustomerDetails::default(),
            attempt_token: Uuid::new_v4(),
            receipt: None,
        }
    }

    /// The current step.
    #[must_use]
    pub const fn step(&self) -> CheckoutStep {
        self.step
    }

    /// The stored customer details (whatever was last accepted).
    #[must_use]
    pub const fn details(&self) -> &CustomerDetails {
        &self.details
    }

    /// This instance's attempt token, for stale-result checks.
    #[must_use]
    pub const fn attempt_token(&self) -> Uuid {
        self.attempt_token
    }

    /// The receipt, present only once `Confirmation` is reached.
    #[must_use]
    pub const fn receipt(&self) -> Option<&OrderReceipt> {
        self.receipt.as_ref()
    }

    /// Details -> Payment.
    ///
    /// Validates the submitted fields and stores them on success. On
    /// validation failure nothing changes: the wizard keeps its previous
    /// details and stays on the details step.
    ///
    /// # Errors
    ///
    /// [`CheckoutError::MissingField`] when a required field is blank;
    /// [`CheckoutError::InvalidTransition`] when not on the details step.
    pub fn submit_details(&mut self, details: &CustomerDetails) -> Result<(), CheckoutError> {
        if self.step != CheckoutStep::Details {
            return Err(CheckoutError::InvalidTransition(self.step));
        }
        details.validate()?;
        self.details = details.clone();
        self.step = CheckoutStep::Payment;
        Ok(())
    }

    /// Payment -> Details (always permitted). Entered field values are
    /// preserved for re-editing.
    ///
    /// # Errors
    ///
    /// [`CheckoutError::InvalidTransition`] when not on the payment step.
    pub fn back_to_details(&mut self) -> Result<(), CheckoutError> {
        if self.step != CheckoutStep::Payment {
            return Err(CheckoutError::InvalidTransition(self.step));
        }
        self.step = CheckoutStep::Details;
        Ok(())
    }

    /// Snapshot the cart and selection into an [`OrderDraft`].
    ///
    /// This is the pure half of the `Payment -> Confirmation` guard; the
    /// caller submits the draft and feeds the outcome back via
    /// [`Self::confirm`].
    ///
    /// # Errors
    ///
    /// [`CheckoutError::EmptyCart`] when the cart has no entries,
    /// [`CheckoutError::NoPaymentMethod`] when nothing is selected, and
    /// [`CheckoutError::InvalidTransition`] when not on the payment step.
    pub fn build_draft(
        &self,
        cart: &Cart,
        selection: &MethodSelection,
    ) -> Result<OrderDraft, CheckoutError> {
        if self.step != CheckoutStep::Payment {
            return Err(CheckoutError::InvalidTransition(self.step));
        }
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let method = selection.selected().ok_or(CheckoutError::NoPaymentMethod)?;

        let lines = cart
            .entries()
            .iter()
            .map(|entry| OrderLine {
                listing_id: entry.listing_id,
                quantity: entry.quantity,
                unit_price: entry.unit_price,
            })
            .collect();

        Ok(OrderDraft {
            customer: self.details.clone(),
            payment_method_id: method.id,
            payment_method_name: method.name.clone(),
            lines,
            total: cart.total(),
        })
    }

    /// Payment -> Confirmation, committing the receipt of a successfully
    /// created order. Confirmation is terminal: no further transitions are
    /// accepted on this instance.
    ///
    /// # Errors
    ///
    /// [`CheckoutError::InvalidTransition`] when not on the payment step.
    pub fn confirm(&mut self, receipt: OrderReceipt) -> Result<(), CheckoutError> {
        if self.step != CheckoutStep::Payment {
            return Err(CheckoutError::InvalidTransition(self.step));
        }
        self.receipt = Some(receipt);
        self.step = CheckoutStep::Confirmation;
        Ok(())
    }
}

impl Default for CheckoutWizard {
    fn default() -> Self {
        Self::new()
    }
}
