//! Wire shapes for the plans API.
//!
//! Every response arrives inside a `{ success, data?, error? }` envelope.
//! Payload structs stay deliberately lenient: optional and unknown fields
//! never fail the decode, and numeric fields accept the floats the upstream
//! emits. The strict typed model lives in `plansmith-core`; `conversions`
//! maps between the two.

use serde::{Deserialize, Serialize};

/// The `{ success, data, error }` envelope wrapping every JSON response.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response body of `POST /api/upload-image` (`url` at top level, no `data`).
#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// `data` object of a successful `POST /api/orders`.
#[derive(Debug, Default, Deserialize)]
pub struct OrderAccepted {
    #[serde(default)]
    pub order_number: Option<String>,
}

/// One listing as served by `GET /api/house-plans`.
///
/// `price` and `bathrooms` arrive as floats; the typed model rounds them.
#[derive(Debug, Deserialize)]
pub struct ListingPayload {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub style_category: String,
    pub price: f64,
    #[serde(default)]
    pub bedrooms: u32,
    #[serde(default)]
    pub bathrooms: f64,
    #[serde(default)]
    pub stories: u32,
    #[serde(default)]
    pub garage_spaces: u32,
    #[serde(default)]
    pub square_footage: u32,
    #[serde(default)]
    pub featured_image_url: Option<String>,
    #[serde(default)]
    pub gallery_images: Vec<String>,
    #[serde(default)]
    pub is_featured: bool,
}

/// One payment method as served by `GET /api/payment-methods`.
#[derive(Debug, Deserialize)]
pub struct PaymentMethodPayload {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub supported_cards: Vec<String>,
    #[serde(default)]
    pub supported_banks: Vec<String>,
}

/// JSON body of `POST /api/orders`.
#[derive(Debug, Serialize)]
pub struct OrderRequest {
    pub customer_info: CustomerInfo,
    pub items: Vec<OrderItem>,
    pub payment_method_id: i64,
    pub notes: String,
    pub total_amount: u64,
}

/// Customer block of [`OrderRequest`].
#[derive(Debug, Serialize)]
pub struct CustomerInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
}

/// Line item block of [`OrderRequest`].
#[derive(Debug, Serialize)]
pub struct OrderItem {
    pub house_plan_id: i64,
    pub quantity: u32,
    pub price: u64,
}
