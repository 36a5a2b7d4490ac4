//! Plans API client.
//!
//! # Architecture
//!
//! - Plain JSON over `reqwest` 0.13, every response wrapped in a
//!   `{ success, data?, error? }` envelope
//! - The backend is source of truth for the catalog and payment methods,
//!   cached in-memory via `moka` (60-second TTL)
//! - Orders and image uploads are never cached
//!
//! Whether a call "worked" is decided by the envelope's `success` flag, not
//! by the HTTP status line. A `success: false` envelope becomes
//! [`PlansError::Rejected`] carrying the backend's own message; anything that
//! prevents reading a well-formed envelope is a transport-class failure.
//!
//! # Example
//!
//! ```rust,ignore
//! use plansmith_storefront::plans::PlansClient;
//!
//! let client = PlansClient::new(&config.plans_api);
//!
//! let listings = client.fetch_listings().await?;
//! let methods = client.fetch_payment_methods().await?;
//! ```

mod cache;
mod conversions;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use plansmith_core::{Listing, OrderDraft, PaymentMethod};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::PlansApiConfig;

use cache::{CacheKey, CacheValue};
use conversions::{build_order_request, convert_listing, convert_payment_method};
use types::{Envelope, ListingPayload, OrderAccepted, PaymentMethodPayload, UploadResponse};

/// Errors that can occur when talking to the plans API.
#[derive(Debug, Error)]
pub enum PlansError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Response did not match the expected shape.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The backend answered with `success: false`.
    #[error("{}", .0.as_deref().unwrap_or("request rejected"))]
    Rejected(Option<String>),
}

impl PlansError {
    /// True when the failure happened before a well-formed envelope came back.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Decode(_) | Self::Malformed(_))
    }

    /// Message safe to show a shopper.
    ///
    /// Backend rejection messages pass through verbatim. Transport failures
    /// collapse to the caller's fallback so wire details never reach the page.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Rejected(Some(message)) => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

/// An image file relayed to the plans API.
#[derive(Debug)]
pub struct ImageUpload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

// =============================================================================
// PlansClient
// =============================================================================

/// Client for the plans API.
///
/// Provides typed access to the catalog, payment methods, order submission,
/// and image uploads. Catalog and payment methods are cached for 60 seconds.
#[derive(Clone)]
pub struct PlansClient {
    inner: Arc<PlansClientInner>,
}

struct PlansClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<CacheKey, CacheValue>,
}

impl PlansClient {
    /// Create a new plans API client.
    #[must_use]
    pub fn new(config: &PlansApiConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(16)
            .time_to_live(Duration::from_secs(60))
            .build();

        Self {
            inner: Arc::new(PlansClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                cache,
            }),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// GET `path` and unwrap the envelope's `data`.
    async fn get_data<T: DeserializeOwned + Default>(&self, path: &str) -> Result<T, PlansError> {
        let response = self.inner.client.get(self.endpoint(path)).send().await?;
        let status = response.status();
        let body = response.text().await?;

        parse_envelope::<T>(status, &body)?
            .ok_or_else(|| PlansError::Malformed(format!("no data in response for {path}")))
    }

    // =========================================================================
    // Catalog Methods
    // =========================================================================

    /// Fetch the plan catalog in a single request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the body cannot be decoded, or
    /// the backend rejects the call.
    #[instrument(skip(self))]
    pub async fn fetch_listings(&self) -> Result<Vec<Listing>, PlansError> {
        if let Some(CacheValue::Listings(listings)) =
            self.inner.cache.get(&CacheKey::Listings).await
        {
            debug!("Cache hit for listings");
            return Ok(listings);
        }

        let payloads: Vec<ListingPayload> = self.get_data("/api/house-plans").await?;
        let listings: Vec<Listing> = payloads.into_iter().map(convert_listing).collect();

        self.inner
            .cache
            .insert(CacheKey::Listings, CacheValue::Listings(listings.clone()))
            .await;

        Ok(listings)
    }

    /// Fetch the available payment methods.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the body cannot be decoded, or
    /// the backend rejects the call.
    #[instrument(skip(self))]
    pub async fn fetch_payment_methods(&self) -> Result<Vec<PaymentMethod>, PlansError> {
        if let Some(CacheValue::PaymentMethods(methods)) =
            self.inner.cache.get(&CacheKey::PaymentMethods).await
        {
            debug!("Cache hit for payment methods");
            return Ok(methods);
        }

        let payloads: Vec<PaymentMethodPayload> = self.get_data("/api/payment-methods").await?;
        let methods: Vec<PaymentMethod> =
            payloads.into_iter().map(convert_payment_method).collect();

        self.inner
            .cache
            .insert(
                CacheKey::PaymentMethods,
                CacheValue::PaymentMethods(methods.clone()),
            )
            .await;

        Ok(methods)
    }

    // =========================================================================
    // Order and Upload Methods (not cached)
    // =========================================================================

    /// Submit an order draft.
    ///
    /// One attempt, no retry. Returns the backend's order number when the
    /// response carries one.
    ///
    /// # Errors
    ///
    /// Returns [`PlansError::Rejected`] with the backend's message when the
    /// order is declined, or a transport-class error when no well-formed
    /// envelope came back.
    #[instrument(skip(self, draft), fields(total = %draft.total, lines = draft.lines.len()))]
    pub async fn create_order(&self, draft: &OrderDraft) -> Result<Option<String>, PlansError> {
        let body = build_order_request(draft);

        let response = self
            .inner
            .client
            .post(self.endpoint("/api/orders"))
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        let accepted: Option<OrderAccepted> = parse_envelope(status, &text)?;
        Ok(accepted.and_then(|data| data.order_number))
    }

    /// Upload an image and return its public URL.
    ///
    /// The file is sent as the `image` field of a multipart form, matching
    /// what the backend's upload endpoint expects.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend rejects the file.
    #[instrument(skip(self, upload), fields(filename = %upload.filename, bytes = upload.bytes.len()))]
    pub async fn upload_image(&self, upload: ImageUpload) -> Result<String, PlansError> {
        let part = reqwest::multipart::Part::bytes(upload.bytes)
            .file_name(upload.filename)
            .mime_str(&upload.content_type)?;
        let form = reqwest::multipart::Form::new().part("image", part);

        let response = self
            .inner
            .client
            .post(self.endpoint("/api/upload-image"))
            .multipart(form)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        parse_upload(status, &text)
    }

    /// Lightweight reachability probe for readiness checks.
    #[instrument(skip(self))]
    pub async fn ping(&self) -> bool {
        let request = self
            .inner
            .client
            .get(self.endpoint("/api/payment-methods"))
            .timeout(Duration::from_secs(2));

        match request.send().await {
            Ok(response) => response.status().is_success(),
            Err(error) => {
                debug!(%error, "Plans API ping failed");
                false
            }
        }
    }
}

// =============================================================================
// Envelope Parsing
// =============================================================================

fn decode_failure(status: reqwest::StatusCode, body: &str, error: serde_json::Error) -> PlansError {
    tracing::error!(
        status = %status,
        body = %body.chars().take(500).collect::<String>(),
        "Failed to parse plans API response"
    );

    if status.is_success() {
        PlansError::Decode(error)
    } else {
        PlansError::Malformed(format!(
            "HTTP {status}: {}",
            body.chars().take(200).collect::<String>()
        ))
    }
}

/// Decode an envelope body, honoring `success` over the HTTP status.
fn parse_envelope<T: DeserializeOwned + Default>(
    status: reqwest::StatusCode,
    body: &str,
) -> Result<Option<T>, PlansError> {
    let envelope: Envelope<T> = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(error) => return Err(decode_failure(status, body, error)),
    };

    if !envelope.success {
        return Err(PlansError::Rejected(envelope.error));
    }

    Ok(envelope.data)
}

/// Decode an upload response (`url` sits beside `success`, not under `data`).
fn parse_upload(status: reqwest::StatusCode, body: &str) -> Result<String, PlansError> {
    let response: UploadResponse = match serde_json::from_str(body) {
        Ok(response) => response,
        Err(error) => return Err(decode_failure(status, body, error)),
    };

    if !response.success {
        return Err(PlansError::Rejected(response.error));
    }

    response
        .url
        .ok_or_else(|| PlansError::Malformed("upload response missing url".to_string()))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use plansmith_core::{Cart, CheckoutWizard, CustomerDetails, MethodSelection, Money};
    use reqwest::StatusCode;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> PlansClient {
        PlansClient::new(&PlansApiConfig {
            base_url: server.uri(),
        })
    }

    fn listing_body() -> serde_json::Value {
        json!({
            "success": true,
            "data": [
                {
                    "id": 1,
                    "title": "Modern Villa",
                    "style_category": "Modern",
                    "price": 15000.0,
                    "bedrooms": 4,
                    "bathrooms": 2.0,
                    "stories": 2,
                    "garage_spaces": 2,
                    "square_footage": 320
                },
                {
                    "id": 2,
                    "title": "Cottage",
                    "style_category": "Traditional",
                    "price": 5000.0
                }
            ],
            "pagination": { "page": 1, "per_page": 12, "total": 2 }
        })
    }

    fn sample_draft() -> OrderDraft {
        let mut cart = Cart::new();
        cart.add(&plansmith_core::Listing {
            id: plansmith_core::ListingId::new(1),
            title: "Modern Villa".to_string(),
            description: String::new(),
            style_category: "Modern".to_string(),
            price: Money::from_rand(15_000),
            bedrooms: 4,
            bathrooms: 2,
            storeys: 2,
            garages: 2,
            square_footage: 320,
            featured_image_url: None,
            gallery_images: Vec::new(),
            is_featured: false,
        });

        let methods = MethodSelection::from_fetched(vec![plansmith_core::PaymentMethod {
            id: plansmith_core::PaymentMethodId::new(3),
            name: "Credit Card".to_string(),
            description: String::new(),
            kind: plansmith_core::PaymentMethodKind::Card,
            supported_labels: vec!["Visa".to_string()],
        }]);

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
                notes: String::new(),
            })
            .unwrap();
        wizard.build_draft(&cart, &methods).unwrap()
    }

    #[test]
    fn envelope_success_false_becomes_rejected() {
        let result: Result<Option<Vec<ListingPayload>>, PlansError> = parse_envelope(
            StatusCode::OK,
            r#"{"success": false, "error": "card declined"}"#,
        );
        match result {
            Err(PlansError::Rejected(Some(message))) => assert_eq!(message, "card declined"),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn envelope_garbage_on_error_status_is_malformed() {
        let result: Result<Option<Vec<ListingPayload>>, PlansError> =
            parse_envelope(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        match result {
            Err(error @ PlansError::Malformed(_)) => assert!(error.is_transport()),
            other => panic!("expected malformed, got {other:?}"),
        }
    }

    #[test]
    fn envelope_garbage_on_ok_status_is_decode_failure() {
        let result: Result<Option<Vec<ListingPayload>>, PlansError> =
            parse_envelope(StatusCode::OK, "not json");
        match result {
            Err(error @ PlansError::Decode(_)) => assert!(error.is_transport()),
            other => panic!("expected decode failure, got {other:?}"),
        }
    }

    #[test]
    fn user_message_passes_rejection_through_verbatim() {
        let error = PlansError::Rejected(Some("card declined".to_string()));
        assert_eq!(
            error.user_message("order processing failed"),
            "card declined"
        );

        let error = PlansError::Rejected(None);
        assert_eq!(
            error.user_message("order processing failed"),
            "order processing failed"
        );

        let error = PlansError::Malformed("HTTP 502".to_string());
        assert_eq!(
            error.user_message("order processing failed"),
            "order processing failed"
        );
    }

    #[tokio::test]
    async fn fetch_listings_decodes_and_caches() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/house-plans"))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);

        let listings = client.fetch_listings().await.unwrap();
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].title, "Modern Villa");
        assert_eq!(listings[0].price, Money::from_rand(15_000));

        // Second call must come from the cache, not a second request.
        let cached = client.fetch_listings().await.unwrap();
        assert_eq!(cached.len(), 2);
    }

    #[tokio::test]
    async fn fetch_listings_surfaces_backend_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/house-plans"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(json!({ "success": false, "error": "database down" })),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);

        match client.fetch_listings().await {
            Err(PlansError::Rejected(Some(message))) => assert_eq!(message, "database down"),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn fetch_payment_methods_decodes_labels() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/payment-methods"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": [
                    {
                        "id": 1,
                        "name": "Credit Card",
                        "code": "credit_card",
                        "description": "Pay with your card",
                        "supported_cards": ["Visa", "Mastercard"]
                    },
                    {
                        "id": 2,
                        "name": "EFT",
                        "code": "eft_bank",
                        "supported_banks": ["FNB", "Absa"]
                    }
                ]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);

        let methods = client.fetch_payment_methods().await.unwrap();
        assert_eq!(methods.len(), 2);
        assert_eq!(methods[0].supported_labels, vec!["Visa", "Mastercard"]);
        assert_eq!(methods[1].supported_labels, vec!["FNB", "Absa"]);
    }

    #[tokio::test]
    async fn create_order_returns_order_number() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/orders"))
            .and(body_string_contains("\"total_amount\":15000"))
            .and(body_string_contains("thandi@example.com"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "success": true,
                "data": { "order_number": "MZ20260823ABCD1234", "status": "pending" },
                "message": "Order created successfully"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);

        let order_number = client.create_order(&sample_draft()).await.unwrap();
        assert_eq!(order_number.as_deref(), Some("MZ20260823ABCD1234"));
    }

    #[tokio::test]
    async fn create_order_decline_carries_backend_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/orders"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "success": false, "error": "card declined" })),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);

        match client.create_order(&sample_draft()).await {
            Err(error) => {
                assert!(!error.is_transport());
                assert_eq!(error.user_message("order processing failed"), "card declined");
            }
            Ok(other) => panic!("expected rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_order_without_data_still_succeeds() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/orders"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .mount(&server)
            .await;

        let client = client_for(&server);

        let order_number = client.create_order(&sample_draft()).await.unwrap();
        assert_eq!(order_number, None);
    }

    #[tokio::test]
    async fn upload_image_sends_image_field_and_returns_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/upload-image"))
            .and(body_string_contains("name=\"image\""))
            .and(body_string_contains("filename=\"plan.png\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "url": "https://cdn.example/plan.png"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);

        let url = client
            .upload_image(ImageUpload {
                filename: "plan.png".to_string(),
                content_type: "image/png".to_string(),
                bytes: vec![0x89, 0x50, 0x4E, 0x47],
            })
            .await
            .unwrap();
        assert_eq!(url, "https://cdn.example/plan.png");
    }

    #[tokio::test]
    async fn upload_image_rejection_carries_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/upload-image"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({ "success": false, "error": "file type not allowed" })),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);

        match client
            .upload_image(ImageUpload {
                filename: "plan.exe".to_string(),
                content_type: "application/octet-stream".to_string(),
                bytes: vec![1, 2, 3],
            })
            .await
        {
            Err(PlansError::Rejected(Some(message))) => {
                assert_eq!(message, "file type not allowed");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn ping_reports_reachability() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/payment-methods"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": []
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(client.ping().await);
    }
}
