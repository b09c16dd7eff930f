//! HTTP surface: one flat route table over the storefront and
//! back-office handler modules.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::store::DocumentStore;
use crate::workflow::OrderWorkflow;

pub mod admin;
pub mod respond;
pub mod shop;

/// Matches the 10mb body cap the storefront needs for base64 product
/// images sent inline from the admin panel.
const REQUEST_BODY_LIMIT: usize = 10 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub workflow: OrderWorkflow,
}

pub fn router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health))
        // storefront
        .route("/api/shop/order/create", post(shop::create_order))
        .route("/api/shop/order/list/:user_id", get(shop::list_orders))
        .route("/api/shop/order/details/:id", get(shop::order_details))
        .route("/api/shop/products/get", get(shop::list_products))
        .route("/api/shop/products/get/:id", get(shop::get_product))
        .route("/api/shop/cart/add", post(shop::add_to_cart))
        .route("/api/shop/cart/get/:user_id", get(shop::fetch_cart))
        .route("/api/shop/cart/update-cart", put(shop::update_cart_item))
        .route("/api/shop/cart/:user_id/:product_id", delete(shop::remove_cart_item))
        .route("/api/shop/address/add", post(shop::add_address))
        .route("/api/shop/address/get/:user_id", get(shop::list_addresses))
        .route("/api/shop/address/update/:user_id/:address_id", put(shop::update_address))
        .route("/api/shop/address/delete/:user_id/:address_id", delete(shop::delete_address))
        // back office
        .route("/api/admin/orders/get", get(admin::list_orders))
        .route("/api/admin/orders/details/:id", get(admin::order_details))
        .route("/api/admin/orders/update/:id", put(admin::update_order_status))
        .route("/api/admin/orders/reject-payment/:id", post(admin::reject_order))
        .route("/api/admin/products/add", post(admin::add_product))
        .route("/api/admin/products/get", get(admin::list_products))
        .route("/api/admin/products/edit/:id", put(admin::edit_product))
        .route("/api/admin/products/delete/:id", delete(admin::delete_product))
        // delivery zones
        .route("/api/admin/delivery-locations", get(admin::list_zones))
        .route("/api/admin/delivery-locations/public", get(admin::list_zones_public))
        .route("/api/admin/delivery-locations/seed", post(admin::seed_zones))
        .route("/api/admin/delivery-locations/county", post(admin::add_county))
        .route(
            "/api/admin/delivery-locations/county/:id",
            put(admin::update_county).delete(admin::delete_county),
        )
        .route(
            "/api/admin/delivery-locations/county/:id/subcounty",
            post(admin::add_sub_county),
        )
        .route(
            "/api/admin/delivery-locations/county/:id/subcounty/:sub_county_id",
            put(admin::update_sub_county).delete(admin::delete_sub_county),
        )
        .route(
            "/api/admin/delivery-locations/county/:id/subcounty/:sub_county_id/location",
            post(admin::add_location),
        )
        .route(
            "/api/admin/delivery-locations/county/:id/subcounty/:sub_county_id/location/:location_id",
            put(admin::update_location).delete(admin::delete_location),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(DefaultBodyLimit::max(REQUEST_BODY_LIMIT))
        .with_state(state)
}

/// No configured origins means a wide-open development CORS policy.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }
    let list: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(list))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "service": "duka",
        "timestamp": Utc::now(),
    }))
}
