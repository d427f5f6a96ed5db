//! OpenAPI documentation for the Quitanda API
//!
//! This module provides auto-generated Swagger/OpenAPI documentation for the REST APIs.

use utoipa::OpenApi;

/// Main OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Quitanda API",
        version = "0.1.0",
        description = "Grocery order, inventory and payment service with a transactional outbox",
        license(name = "Apache-2.0", url = "https://www.apache.org/licenses/LICENSE-2.0"),
        contact(
            name = "Quitanda Team",
            url = "https://github.com/quitanda/quitanda"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "API Server")
    ),
    tags(
        (name = "order", description = "Order placement and lookup APIs"),
        (name = "inventory", description = "Stock batch management APIs"),
        (name = "ops", description = "Outbox operational APIs"),
        (name = "health", description = "Health check APIs")
    ),
    paths(
        crate::api::openapi::order::place_order,
        crate::api::openapi::order::get_order,
        crate::api::openapi::order::list_orders,
        crate::api::openapi::inventory::add_batch,
        crate::api::openapi::inventory::product_stock,
        crate::api::openapi::ops::outbox,
        crate::api::openapi::health::liveness,
        crate::api::openapi::health::readiness,
    ),
    components(
        schemas(
            PlaceOrderRequest,
            OrderInfo,
            AddBatchRequest,
            ProductStock,
            BatchInfo,
            HealthStatus,
        )
    )
)]
pub struct ApiDoc;

// Schema definitions for OpenAPI documentation
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Order placement request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "productId": "apple",
    "quantity": 3,
    "price": 150
}))]
pub struct PlaceOrderRequest {
    /// Product identifier
    #[serde(rename = "productId")]
    pub product_id: String,
    /// Units ordered (at least 1)
    pub quantity: i32,
    /// Unit price in minor units
    pub price: i64,
}

/// Order as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderInfo {
    /// Order identifier
    pub id: String,
    /// Product identifier
    #[serde(rename = "productId")]
    pub product_id: String,
    /// Units ordered
    pub quantity: i32,
    /// Unit price in minor units
    pub price: i64,
    /// Total amount in minor units
    #[serde(rename = "totalAmount")]
    pub total_amount: i64,
    /// PENDING, COMPLETED or CANCELLED
    pub status: String,
}

/// Stock batch creation request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "productId": "apple",
    "quantity": 10,
    "expiresAt": "2026-12-31T00:00:00Z"
}))]
pub struct AddBatchRequest {
    /// Product identifier
    #[serde(rename = "productId")]
    pub product_id: String,
    /// Units in the batch (at least 1)
    pub quantity: i32,
    /// Expiry instant, RFC 3339
    #[serde(rename = "expiresAt")]
    pub expires_at: String,
}

/// Stock view for a product
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductStock {
    /// Product identifier
    #[serde(rename = "productId")]
    pub product_id: String,
    /// Sum of non-expired batch quantities
    pub available: i32,
    /// All batches, expired included
    pub batches: Vec<BatchInfo>,
}

/// Single batch in a stock view
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BatchInfo {
    /// Batch identifier
    pub id: String,
    /// Remaining units
    pub quantity: i32,
    /// Expiry instant, RFC 3339
    #[serde(rename = "expiresAt")]
    pub expires_at: String,
    /// Whether the batch is past its expiry
    pub expired: bool,
}

/// Health status
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthStatus {
    /// Health status
    pub status: String,
}

// Path operation definitions
pub mod order {
    use super::*;

    /// Place an order
    #[utoipa::path(
        post,
        path = "/orders",
        tag = "order",
        request_body = PlaceOrderRequest,
        responses(
            (status = 200, description = "Order placed", body = OrderInfo),
            (status = 400, description = "Invalid request")
        )
    )]
    pub async fn place_order() {}

    /// Get an order by id
    #[utoipa::path(
        get,
        path = "/orders/{id}",
        tag = "order",
        params(
            ("id" = String, Path, description = "Order identifier")
        ),
        responses(
            (status = 200, description = "Order found", body = OrderInfo),
            (status = 404, description = "Order not found")
        )
    )]
    pub async fn get_order() {}

    /// List orders
    #[utoipa::path(
        get,
        path = "/orders",
        tag = "order",
        params(
            ("status" = Option<String>, Query, description = "Filter by status (PENDING, COMPLETED, CANCELLED)"),
            ("pageNo" = Option<u64>, Query, description = "Page number (1-based)"),
            ("pageSize" = Option<u64>, Query, description = "Page size")
        ),
        responses(
            (status = 200, description = "Order page", body = Vec<OrderInfo>)
        )
    )]
    pub async fn list_orders() {}
}

pub mod inventory {
    use super::*;

    /// Add a stock batch
    #[utoipa::path(
        post,
        path = "/inventory/batches",
        tag = "inventory",
        request_body = AddBatchRequest,
        responses(
            (status = 200, description = "Batch created, returns the batch id", body = String),
            (status = 400, description = "Invalid request")
        )
    )]
    pub async fn add_batch() {}

    /// Get stock for a product
    #[utoipa::path(
        get,
        path = "/inventory/{productId}",
        tag = "inventory",
        params(
            ("productId" = String, Path, description = "Product identifier")
        ),
        responses(
            (status = 200, description = "Stock view", body = ProductStock),
            (status = 404, description = "No batches for this product")
        )
    )]
    pub async fn product_stock() {}
}

pub mod ops {
    /// Inspect the outbox
    #[utoipa::path(
        get,
        path = "/ops/outbox",
        tag = "ops",
        responses(
            (status = 200, description = "Incomplete publications and parked count")
        )
    )]
    pub async fn outbox() {}
}

pub mod health {
    use super::*;

    /// Liveness check
    #[utoipa::path(
        get,
        path = "/health/liveness",
        tag = "health",
        responses(
            (status = 200, description = "Service is alive", body = HealthStatus)
        )
    )]
    pub async fn liveness() {}

    /// Readiness check
    #[utoipa::path(
        get,
        path = "/health/readiness",
        tag = "health",
        responses(
            (status = 200, description = "Service is ready", body = HealthStatus),
            (status = 503, description = "Service is not ready")
        )
    )]
    pub async fn readiness() {}
}

/// Configure Swagger UI routes
#[cfg(feature = "swagger")]
pub fn configure_swagger(cfg: &mut actix_web::web::ServiceConfig) {
    use utoipa_swagger_ui::SwaggerUi;

    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );
}

/// No-op when the swagger feature is disabled
#[cfg(not(feature = "swagger"))]
pub fn configure_swagger(_cfg: &mut actix_web::web::ServiceConfig) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_builds() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/orders"));
        assert!(doc.paths.paths.contains_key("/inventory/batches"));
        assert!(doc.paths.paths.contains_key("/health/readiness"));
    }
}
