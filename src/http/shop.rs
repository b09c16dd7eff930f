//! Storefront handlers: checkout, order history, catalog browsing, cart
//! and address book.

use std::cmp::Reverse;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::domain::{Address, AddressSnapshot, Cart, LineItem, Order, Product};
use crate::error::{ApiError, ApiResult};
use crate::http::{respond, AppState};
use crate::store::DocumentStoreExt;
use crate::workflow::PlaceOrder;

// ---- checkout & order history ----

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub cart_id: Option<Uuid>,
    #[serde(default)]
    #[validate(length(min = 1, message = "Missing required order fields"))]
    pub cart_items: Vec<LineItem>,
    #[serde(default)]
    pub address_info: AddressSnapshot,
    /// Overrides the snapshot fee when present. Client-stated totals are
    /// ignored; amounts are recomputed server-side.
    #[serde(default)]
    #[validate(range(min = 0, message = "Delivery fee cannot be negative"))]
    pub delivery_fee: Option<i64>,
}

pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> ApiResult<Response> {
    payload.validate().map_err(ApiError::from_validation)?;
    let order = state
        .workflow
        .place(PlaceOrder {
            user_id: payload.user_id,
            cart_id: payload.cart_id,
            items: payload.cart_items,
            address: payload.address_info,
            delivery_fee: payload.delivery_fee,
        })
        .await?;
    Ok(respond::payload(
        StatusCode::CREATED,
        json!({
            "success": true,
            "message": "Order placed successfully!",
            "orderId": order.id,
            "order": order,
        }),
    ))
}

pub async fn list_orders(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Response> {
    let mut orders: Vec<Order> = state.store.find_by("userId", &user_id.to_string()).await?;
    orders.sort_by_key(|order| Reverse(order.order_date));
    Ok(respond::ok(orders))
}

pub async fn order_details(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    let order: Order = state
        .store
        .load(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Order not found"))?;
    Ok(respond::ok(order))
}

// ---- catalog ----

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogQuery {
    /// Comma-separated category list.
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub sort_by: Option<String>,
}

pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> ApiResult<Response> {
    let mut products: Vec<Product> = state.store.list_all().await?;
    if let Some(filter) = query.category.as_deref().filter(|c| !c.is_empty()) {
        let wanted: Vec<&str> = filter.split(',').map(str::trim).collect();
        products.retain(|p| wanted.iter().any(|c| p.category.eq_ignore_ascii_case(c)));
    }
    sort_catalog(&mut products, query.sort_by.as_deref());
    Ok(respond::ok(products))
}

fn sort_catalog(products: &mut [Product], sort_by: Option<&str>) {
    match sort_by {
        Some("price-lowtohigh") => products.sort_by_key(Product::effective_price),
        Some("price-hightolow") => products.sort_by_key(|p| Reverse(p.effective_price())),
        Some("title-atoz") => {
            products.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
        }
        Some("title-ztoa") => {
            products.sort_by(|a, b| b.title.to_lowercase().cmp(&a.title.to_lowercase()))
        }
        // newest first by default
        _ => products.sort_by_key(|p| Reverse(p.created_at)),
    }
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    let product: Product = state
        .store
        .load(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product not found"))?;
    Ok(respond::ok(product))
}

// ---- cart ----

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub user_id: Uuid,
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: u32,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartItemRequest {
    pub user_id: Uuid,
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: u32,
}

/// Display form of a cart: lines joined with live catalog data. Items
/// whose product has been deleted drop out of the view.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub items: Vec<CartViewItem>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartViewItem {
    pub product_id: Uuid,
    pub image: Option<String>,
    pub title: String,
    pub price: i64,
    pub sale_price: i64,
    pub quantity: u32,
    pub total_stock: u32,
}

pub async fn add_to_cart(
    State(state): State<AppState>,
    Json(payload): Json<AddToCartRequest>,
) -> ApiResult<Response> {
    payload.validate().map_err(ApiError::from_validation)?;
    let product: Product = state
        .store
        .load(payload.product_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product not found"))?;

    let mut cart = find_cart(&state, payload.user_id)
        .await?
        .unwrap_or_else(|| Cart::for_user(payload.user_id));

    let in_cart = cart
        .items
        .iter()
        .find(|item| item.product_id == payload.product_id)
        .map(|item| item.quantity)
        .unwrap_or(0);
    if product.total_stock < in_cart + payload.quantity {
        return Err(ApiError::invalid(format!(
            "Only {} left in stock",
            product.total_stock
        )));
    }

    cart.add_item(payload.product_id, payload.quantity);
    state.store.save(&cart).await?;
    Ok(respond::ok(cart_view(&state, cart).await?))
}

pub async fn fetch_cart(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Response> {
    let cart = find_cart(&state, user_id)
        .await?
        .unwrap_or_else(|| Cart::for_user(user_id));
    Ok(respond::ok(cart_view(&state, cart).await?))
}

pub async fn update_cart_item(
    State(state): State<AppState>,
    Json(payload): Json<UpdateCartItemRequest>,
) -> ApiResult<Response> {
    payload.validate().map_err(ApiError::from_validation)?;
    let mut cart = find_cart(&state, payload.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Cart not found"))?;
    if !cart.set_quantity(payload.product_id, payload.quantity) {
        return Err(ApiError::not_found("Cart item not present!"));
    }
    state.store.save(&cart).await?;
    Ok(respond::ok(cart_view(&state, cart).await?))
}

pub async fn remove_cart_item(
    State(state): State<AppState>,
    Path((user_id, product_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Response> {
    let mut cart = find_cart(&state, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Cart not found"))?;
    cart.remove_item(product_id);
    state.store.save(&cart).await?;
    Ok(respond::ok(cart_view(&state, cart).await?))
}

async fn find_cart(state: &AppState, user_id: Uuid) -> ApiResult<Option<Cart>> {
    let mut carts: Vec<Cart> = state.store.find_by("userId", &user_id.to_string()).await?;
    Ok(if carts.is_empty() {
        None
    } else {
        Some(carts.remove(0))
    })
}

async fn cart_view(state: &AppState, cart: Cart) -> ApiResult<CartView> {
    let mut items = Vec::with_capacity(cart.items.len());
    for item in &cart.items {
        if let Some(product) = state.store.load::<Product>(item.product_id).await? {
            items.push(CartViewItem {
                product_id: product.id,
                image: product.display_image().map(str::to_owned),
                title: product.title.clone(),
                price: product.price,
                sale_price: product.sale_price,
                quantity: item.quantity,
                total_stock: product.total_stock,
            });
        }
    }
    Ok(CartView {
        id: cart.id,
        user_id: cart.user_id,
        items,
        updated_at: cart.updated_at,
    })
}

// ---- address book ----

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddressPayload {
    #[validate(length(min = 1, message = "County is required"))]
    pub county: String,
    #[validate(length(min = 1, message = "Sub-county is required"))]
    pub sub_county: String,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    #[serde(default)]
    pub specific_address: String,
    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    #[validate(range(min = 0, message = "Delivery fee cannot be negative"))]
    pub delivery_fee: i64,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddAddressRequest {
    pub user_id: Uuid,
    #[serde(flatten)]
    #[validate]
    pub address: AddressPayload,
}

pub async fn add_address(
    State(state): State<AppState>,
    Json(payload): Json<AddAddressRequest>,
) -> ApiResult<Response> {
    payload.validate().map_err(ApiError::from_validation)?;
    let fields = payload.address;
    let now = Utc::now();
    let address = Address {
        id: Uuid::new_v4(),
        user_id: payload.user_id,
        county: fields.county,
        sub_county: fields.sub_county,
        location: fields.location,
        specific_address: fields.specific_address,
        phone: fields.phone,
        notes: fields.notes,
        delivery_fee: fields.delivery_fee,
        is_default: fields.is_default,
        created_at: now,
        updated_at: now,
    };
    state.store.save(&address).await?;
    Ok(respond::created(address))
}

pub async fn list_addresses(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Response> {
    let mut addresses: Vec<Address> = state.store.find_by("userId", &user_id.to_string()).await?;
    addresses.sort_by_key(|address| Reverse(address.created_at));
    Ok(respond::ok(addresses))
}

pub async fn update_address(
    State(state): State<AppState>,
    Path((user_id, address_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<AddressPayload>,
) -> ApiResult<Response> {
    payload.validate().map_err(ApiError::from_validation)?;
    let mut address: Address = state
        .store
        .load(address_id)
        .await?
        .filter(|address: &Address| address.user_id == user_id)
        .ok_or_else(|| ApiError::not_found("Address not found"))?;

    address.county = payload.county;
    address.sub_county = payload.sub_county;
    address.location = payload.location;
    address.specific_address = payload.specific_address;
    address.phone = payload.phone;
    address.notes = payload.notes;
    address.delivery_fee = payload.delivery_fee;
    address.is_default = payload.is_default;
    address.touch();

    state.store.save(&address).await?;
    Ok(respond::ok(address))
}

pub async fn delete_address(
    State(state): State<AppState>,
    Path((user_id, address_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Response> {
    let address: Address = state
        .store
        .load(address_id)
        .await?
        .filter(|address: &Address| address.user_id == user_id)
        .ok_or_else(|| ApiError::not_found("Address not found"))?;
    state.store.remove::<Address>(address.id).await?;
    Ok(respond::ok_message("Address deleted successfully"))
}
