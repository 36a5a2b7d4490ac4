//! Conversions between plans API wire shapes and the typed model.

use plansmith_core::{
    Listing, ListingId, Money, OrderDraft, PaymentMethod, PaymentMethodId, PaymentMethodKind,
};

use super::types::{CustomerInfo, ListingPayload, OrderItem, OrderRequest, PaymentMethodPayload};

/// Round a non-negative float onto `u64`, clamping anything unreasonable to 0.
fn round_to_u64(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}

/// Convert one wire listing into the typed model.
///
/// The upstream stores `price` and `bathrooms` as floats; both round to the
/// nearest whole number here.
pub fn convert_listing(payload: ListingPayload) -> Listing {
    Listing {
        id: ListingId::new(payload.id),
        title: payload.title,
        description: payload.description,
        style_category: payload.style_category,
        price: Money::from_rand(round_to_u64(payload.price)),
        bedrooms: payload.bedrooms,
        bathrooms: u32::try_from(round_to_u64(payload.bathrooms)).unwrap_or(0),
        storeys: payload.stories,
        garages: payload.garage_spaces,
        square_footage: payload.square_footage,
        featured_image_url: payload.featured_image_url,
        gallery_images: payload.gallery_images,
        is_featured: payload.is_featured,
    }
}

/// Convert one wire payment method into the typed model.
///
/// The method kind is derived from the upstream `code` and picks which label
/// list (cards or banks) the method advertises.
pub fn convert_payment_method(payload: PaymentMethodPayload) -> PaymentMethod {
    let kind = PaymentMethodKind::from_code(&payload.code);
    let supported_labels = match kind {
        PaymentMethodKind::Card => payload.supported_cards,
        PaymentMethodKind::Eft => payload.supported_banks,
        PaymentMethodKind::Other => Vec::new(),
    };
    PaymentMethod {
        id: PaymentMethodId::new(payload.id),
        name: payload.name,
        description: payload.description,
        kind,
        supported_labels,
    }
}

/// Build the `POST /api/orders` body from a finished draft.
pub fn build_order_request(draft: &OrderDraft) -> OrderRequest {
    OrderRequest {
        customer_info: CustomerInfo {
            first_name: draft.customer.first_name.clone(),
            last_name: draft.customer.last_name.clone(),
            email: draft.customer.email.clone(),
            phone: draft.customer.phone.clone(),
            address: draft.customer.address.clone(),
            city: draft.customer.city.clone(),
            province: draft.customer.province.clone(),
            postal_code: draft.customer.postal_code.clone(),
        },
        items: draft
            .lines
            .iter()
            .map(|line| OrderItem {
                house_plan_id: line.listing_id.as_i64(),
                quantity: line.quantity,
                price: line.unit_price.as_rand(),
            })
            .collect(),
        payment_method_id: draft.payment_method_id.as_i64(),
        notes: draft.customer.notes.clone(),
        total_amount: draft.total.as_rand(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use plansmith_core::{Cart, CheckoutWizard, CustomerDetails, MethodSelection};

    use super::*;

    fn listing_json() -> ListingPayload {
        serde_json::from_value(serde_json::json!({
            "id": 7,
            "title": "Modern Villa",
            "description": "Open plan living",
            "style_category": "Modern",
            "price": 15000.0,
            "bedrooms": 4,
            "bathrooms": 2.5,
            "stories": 2,
            "garage_spaces": 2,
            "square_footage": 320,
            "featured_image_url": "https://cdn.example/7.png",
            "gallery_images": ["https://cdn.example/7a.png"],
            "is_featured": true,
            "is_active": true
        }))
        .unwrap()
    }

    #[test]
    fn listing_floats_round_to_whole_numbers() {
        let listing = convert_listing(listing_json());
        assert_eq!(listing.id, ListingId::new(7));
        assert_eq!(listing.price, Money::from_rand(15_000));
        assert_eq!(listing.bathrooms, 3);
        assert_eq!(listing.storeys, 2);
        assert_eq!(listing.garages, 2);
    }

    #[test]
    fn listing_decode_tolerates_missing_optionals() {
        let payload: ListingPayload = serde_json::from_value(serde_json::json!({
            "id": 1,
            "title": "Bare",
            "price": 9.4
        }))
        .unwrap();
        let listing = convert_listing(payload);
        assert_eq!(listing.price, Money::from_rand(9));
        assert_eq!(listing.bedrooms, 0);
        assert!(listing.gallery_images.is_empty());
        assert!(listing.featured_image_url.is_none());
    }

    #[test]
    fn absurd_bathroom_count_collapses_to_zero() {
        let payload: ListingPayload = serde_json::from_value(serde_json::json!({
            "id": 1,
            "title": "Bad data",
            "price": 100.0,
            "bathrooms": 5_000_000_000.0
        }))
        .unwrap();
        assert_eq!(convert_listing(payload).bathrooms, 0);
    }

    #[test]
    fn card_method_takes_card_labels() {
        let payload: PaymentMethodPayload = serde_json::from_value(serde_json::json!({
            "id": 1,
            "name": "Credit Card",
            "code": "credit_card",
            "supported_cards": ["Visa", "Mastercard"],
            "supported_banks": ["FNB"]
        }))
        .unwrap();
        let method = convert_payment_method(payload);
        assert_eq!(method.kind, PaymentMethodKind::Card);
        assert_eq!(method.supported_labels, vec!["Visa", "Mastercard"]);
    }

    #[test]
    fn eft_method_takes_bank_labels() {
        let payload: PaymentMethodPayload = serde_json::from_value(serde_json::json!({
            "id": 2,
            "name": "EFT",
            "code": "eft_bank",
            "supported_banks": ["FNB", "Absa"]
        }))
        .unwrap();
        let method = convert_payment_method(payload);
        assert_eq!(method.kind, PaymentMethodKind::Eft);
        assert_eq!(method.supported_labels, vec!["FNB", "Absa"]);
    }

    #[test]
    fn order_request_mirrors_the_draft() {
        let mut cart = Cart::new();
        let listing = convert_listing(listing_json());
        cart.add(&listing);
        cart.add(&listing);

        let methods = MethodSelection::from_fetched(vec![convert_payment_method(
            serde_json::from_value(serde_json::json!({
                "id": 3,
                "name": "Credit Card",
                "code": "credit_card"
            }))
            .unwrap(),
        )]);

        let mut wizard = CheckoutWizard::new();
        wizard
            .submit_details(&CustomerDetails {
                first_name: "Thandi".into(),
                last_name: "Nkosi".into(),
                email: "thandi@example.com".into(),
                phone: "0821234567".into(),
                address: "1 Long St".into(),
                city: "Cape Town".into(),
                province: "Western Cape".into(),
                postal_code: "8001".into(),
                notes: "Call ahead".into(),
            })
            .unwrap();
        let draft = wizard.build_draft(&cart, &methods).unwrap();

        let request = build_order_request(&draft);
        assert_eq!(request.total_amount, 30_000);
        assert_eq!(request.payment_method_id, 3);
        assert_eq!(request.notes, "Call ahead");
        assert_eq!(request.items.len(), 1);
        assert_eq!(request.items[0].house_plan_id, 7);
        assert_eq!(request.items[0].quantity, 2);
        assert_eq!(request.items[0].price, 15_000);
        assert_eq!(request.customer_info.email, "thandi@example.com");
    }
}
