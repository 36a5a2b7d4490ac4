//! Payment methods and the checkout selection state.

use serde::{Deserialize, Serialize};

use crate::types::PaymentMethodId;

/// Broad class of a payment method, derived from its wire `code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethodKind {
    /// Card-based payment (`credit_card`).
    Card,
    /// Bank transfer (`eft_bank`).
    Eft,
    /// A code this build does not recognize; still selectable.
    Other,
}

impl PaymentMethodKind {
    /// Map a wire `code` to a kind. Unrecognized codes stay selectable as
    /// [`Self::Other`] rather than failing the decode.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "credit_card" => Self::Card,
            "eft_bank" => Self::Eft,
            _ => Self::Other,
        }
    }

    /// Caption for the supported-labels row on the payment step.
    #[must_use]
    pub const fn labels_caption(&self) -> &'static str {
        match self {
            Self::Card => "We accept",
            Self::Eft => "Supported banks",
            Self::Other => "Supported",
        }
    }
}

/// A selectable way to pay, fetched from the plans API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    /// Unique method identifier.
    pub id: PaymentMethodId,
    /// Display name, e.g. "Credit Card".
    pub name: String,
    /// Short description shown under the name.
    pub description: String,
    /// Card vs bank classification.
    pub kind: PaymentMethodKind,
    /// Card or bank labels for display ("Visa", "FNB", ...).
    pub supported_labels: Vec<String>,
}

/// The payment-method list plus the user's current selection.
///
/// Held in the session for the duration of a checkout so the selection
/// survives back-navigation. A fetch failure leaves the list empty and the
/// selection unset; the payment step then renders its empty variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSelection {
    methods: Vec<PaymentMethod>,
    selected: Option<PaymentMethodId>,
}

impl MethodSelection {
    /// Build from a successful fetch; the first method becomes the default
    /// selection.
    #[must_use]
    pub fn from_fetched(methods: Vec<PaymentMethod>) -> Self {
        let selected = methods.first().map(|method| method.id);
        Self { methods, selected }
    }

    /// The empty state used when the fetch failed.
    #[must_use]
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Select a method by id. Unknown ids are a no-op.
    pub fn select(&mut self, id: PaymentMethodId) {
        if self.methods.iter().any(|method| method.id == id) {
            self.selected = Some(id);
        }
    }

    /// The currently selected method, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&PaymentMethod> {
        let id = self.selected?;
        self.methods.iter().find(|method| method.id == id)
    }

    /// All fetched methods, in API order.
    #[must_use]
    pub fn methods(&self) -> &[PaymentMethod] {
        &self.methods
    }

    /// Whether the fetch produced no methods (failure or an empty catalog).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(id: i64, name: &str, code: &str) -> PaymentMethod {
        PaymentMethod {
            id: PaymentMethodId::new(id),
            name: name.to_string(),
            description: String::new(),
            kind: PaymentMethodKind::from_code(code),
            supported_labels: Vec::new(),
        }
    }

    #[test]
    fn test_kind_from_code() {
        assert_eq!(
            PaymentMethodKind::from_code("credit_card"),
            PaymentMethodKind::Card
        );
        assert_eq!(
            PaymentMethodKind::from_code("eft_bank"),
            PaymentMethodKind::Eft
        );
        assert_eq!(
            PaymentMethodKind::from_code("crypto"),
            PaymentMethodKind::Other
        );
    }

    #[test]
    fn test_first_method_is_default_selection() {
        let selection = MethodSelection::from_fetched(vec![
            method(1, "Credit Card", "credit_card"),
            method(2, "EFT Bank Transfer", "eft_bank"),
        ]);

        assert_eq!(selection.selected().map(|m| m.id), Some(PaymentMethodId::new(1)));
    }

    #[test]
    fn test_select_known_method() {
        let mut selection = MethodSelection::from_fetched(vec![
            method(1, "Credit Card", "credit_card"),
            method(2, "EFT Bank Transfer", "eft_bank"),
        ]);

        selection.select(PaymentMethodId::new(2));
        assert_eq!(selection.selected().map(|m| m.id), Some(PaymentMethodId::new(2)));
    }

    #[test]
    fn test_select_unknown_method_is_noop() {
        let mut selection =
            MethodSelection::from_fetched(vec![method(1, "Credit Card", "credit_card")]);

        selection.select(PaymentMethodId::new(99));
        assert_eq!(selection.selected().map(|m| m.id), Some(PaymentMethodId::new(1)));
    }

    #[test]
    fn test_unavailable_has_no_selection() {
        let selection = MethodSelection::unavailable();
        assert!(selection.is_empty());
        assert!(selection.selected().is_none());
    }

    #[test]
    fn test_empty_fetch_leaves_selection_unset() {
        let selection = MethodSelection::from_fetched(Vec::new());
        assert!(selection.selected().is_none());
    }
}
