//! Back-office handlers: catalog administration, the order board with
//! its status workflow, and the delivery-zone directory.

use std::cmp::Reverse;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::domain::{DeliveryZone, Order, Product, Variation};
use crate::error::{ApiError, ApiResult};
use crate::http::{respond, AppState};
use crate::seed;
use crate::store::DocumentStoreExt;

// ---- products ----

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    #[validate(length(max = 10, message = "A product can carry at most 10 images"))]
    pub images: Vec<String>,
    #[validate(length(min = 1, max = 200, message = "Title is required (max 200 characters)"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1, message = "Product category is required"))]
    pub category: String,
    #[validate(range(min = 0, message = "Price cannot be negative"))]
    pub price: i64,
    #[serde(default)]
    #[validate(range(min = 0, message = "Sale price cannot be negative"))]
    pub sale_price: i64,
    pub total_stock: u32,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 5.0, message = "Average review must be between 0 and 5"))]
    pub average_review: f64,
    #[serde(default)]
    pub variations: Vec<VariationPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariationPayload {
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub label: String,
}

impl ProductPayload {
    fn check(&self) -> ApiResult<()> {
        self.validate().map_err(ApiError::from_validation)?;
        if self.sale_price > self.price {
            return Err(ApiError::invalid(
                "Sale price cannot exceed the regular price",
            ));
        }
        for (index, variation) in self.variations.iter().enumerate() {
            if variation.image.trim().is_empty() || variation.label.trim().is_empty() {
                return Err(ApiError::invalid(format!(
                    "Variation {} is missing image or label",
                    index + 1
                )));
            }
            if variation.label.chars().count() > 100 {
                return Err(ApiError::invalid(format!(
                    "Variation {} label is too long (max 100 characters)",
                    index + 1
                )));
            }
        }
        let (_, images) = self.normalized_images();
        if images.is_empty() && self.variations.is_empty() {
            return Err(ApiError::invalid(
                "Product must have at least one image (either main images or variations)",
            ));
        }
        Ok(())
    }

    /// Gallery minus blank entries; the single legacy `image` field fills
    /// in when the gallery is empty. First image doubles as the primary.
    fn normalized_images(&self) -> (Option<String>, Vec<String>) {
        let mut images: Vec<String> = self
            .images
            .iter()
            .map(|img| img.trim())
            .filter(|img| !img.is_empty())
            .map(str::to_owned)
            .collect();
        if images.is_empty() {
            if let Some(single) = self.image.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
                images.push(single.to_owned());
            }
        }
        (images.first().cloned(), images)
    }

    fn apply_to(self, product: &mut Product) {
        let (image, images) = self.normalized_images();
        product.image = image;
        product.images = images;
        product.title = self.title.trim().to_owned();
        product.description = self.description.trim().to_owned();
        product.category = self.category.trim().to_owned();
        product.price = self.price;
        product.sale_price = self.sale_price;
        product.total_stock = self.total_stock;
        product.average_review = self.average_review;
        product.variations = self
            .variations
            .into_iter()
            .map(|v| Variation {
                id: Uuid::new_v4(),
                image: v.image.trim().to_owned(),
                label: v.label.trim().to_owned(),
            })
            .collect();
        product.updated_at = Utc::now();
    }
}

pub async fn add_product(
    State(state): State<AppState>,
    Json(payload): Json<ProductPayload>,
) -> ApiResult<Response> {
    payload.check()?;
    let now = Utc::now();
    let mut product = Product {
        id: Uuid::new_v4(),
        image: None,
        images: Vec::new(),
        title: String::new(),
        description: String::new(),
        category: String::new(),
        price: 0,
        sale_price: 0,
        total_stock: 0,
        average_review: 0.0,
        variations: Vec::new(),
        created_at: now,
        updated_at: now,
    };
    payload.apply_to(&mut product);
    state.store.save(&product).await?;
    Ok(respond::created(product))
}

pub async fn list_products(State(state): State<AppState>) -> ApiResult<Response> {
    let mut products: Vec<Product> = state.store.list_all().await?;
    products.sort_by_key(|product| Reverse(product.created_at));
    Ok(respond::ok(products))
}

pub async fn edit_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProductPayload>,
) -> ApiResult<Response> {
    payload.check()?;
    let mut product: Product = state
        .store
        .load(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product not found"))?;
    payload.apply_to(&mut product);
    state.store.save(&product).await?;
    Ok(respond::ok(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    if !state.store.remove::<Product>(id).await? {
        return Err(ApiError::not_found("Product not found"));
    }
    Ok(respond::ok_message("Product deleted successfully"))
}

// ---- orders ----

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusRequest {
    #[serde(default)]
    pub order_status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectOrderRequest {
    #[serde(default)]
    pub rejection_reason: Option<String>,
}

pub async fn list_orders(State(state): State<AppState>) -> ApiResult<Response> {
    let mut orders: Vec<Order> = state.store.list_all().await?;
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

pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> ApiResult<Response> {
    let target = payload
        .order_status
        .ok_or_else(|| ApiError::invalid("orderStatus is required"))?;
    state.workflow.update_status(id, &target).await?;
    Ok(respond::ok_message("Order status updated successfully!"))
}

pub async fn reject_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RejectOrderRequest>,
) -> ApiResult<Response> {
    state.workflow.reject(id, payload.rejection_reason).await?;
    Ok(respond::ok_message("Order cancelled successfully"))
}

// ---- delivery zones ----

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountyPayload {
    #[serde(default)]
    pub county: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubCountyPayload {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub delivery_fee: Option<i64>,
}

pub async fn list_zones_public(State(state): State<AppState>) -> ApiResult<Response> {
    let mut zones: Vec<DeliveryZone> = state.store.list_all().await?;
    zones.retain(|zone| zone.is_active);
    zones.sort_by(|a, b| a.county.cmp(&b.county));
    Ok(respond::ok(zones))
}

pub async fn list_zones(State(state): State<AppState>) -> ApiResult<Response> {
    let mut zones: Vec<DeliveryZone> = state.store.list_all().await?;
    zones.sort_by(|a, b| a.county.cmp(&b.county));
    Ok(respond::ok(zones))
}

pub async fn seed_zones(State(state): State<AppState>) -> ApiResult<Response> {
    let report = seed::seed_delivery_zones(state.store.as_ref()).await?;
    Ok(respond::ok_message(report.summary()))
}

pub async fn add_county(
    State(state): State<AppState>,
    Json(payload): Json<CountyPayload>,
) -> ApiResult<Response> {
    let name = required_name(payload.county, "County name is required")?;
    let existing: Vec<DeliveryZone> = state.store.find_by("county", &name).await?;
    if !existing.is_empty() {
        return Err(ApiError::conflict("County already exists"));
    }
    let zone = DeliveryZone::new(name);
    state.store.save(&zone).await?;
    Ok(respond::with_message(
        StatusCode::CREATED,
        zone,
        "County added successfully",
    ))
}

pub async fn update_county(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CountyPayload>,
) -> ApiResult<Response> {
    let mut zone = load_zone(&state, id).await?;
    if let Some(county) = payload.county {
        let name = required_name(Some(county), "County name is required")?;
        if name != zone.county {
            let existing: Vec<DeliveryZone> = state.store.find_by("county", &name).await?;
            if !existing.is_empty() {
                return Err(ApiError::conflict("County already exists"));
            }
            zone.rename(&name);
        }
    }
    if let Some(active) = payload.is_active {
        zone.set_active(active);
    }
    state.store.save(&zone).await?;
    Ok(respond::with_message(
        StatusCode::OK,
        zone,
        "County updated successfully",
    ))
}

pub async fn delete_county(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    if !state.store.remove::<DeliveryZone>(id).await? {
        return Err(ApiError::not_found("County not found"));
    }
    Ok(respond::ok_message("County deleted successfully"))
}

pub async fn add_sub_county(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SubCountyPayload>,
) -> ApiResult<Response> {
    let name = required_name(payload.name, "Sub-county name is required")?;
    let mut zone = load_zone(&state, id).await?;
    zone.add_sub_county(&name)?;
    state.store.save(&zone).await?;
    Ok(respond::with_message(
        StatusCode::CREATED,
        zone,
        "Sub-county added successfully",
    ))
}

pub async fn update_sub_county(
    State(state): State<AppState>,
    Path((id, sub_county_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<SubCountyPayload>,
) -> ApiResult<Response> {
    let mut zone = load_zone(&state, id).await?;
    if zone.sub_county(sub_county_id).is_none() {
        return Err(ApiError::not_found("Sub-county not found"));
    }
    if let Some(name) = payload.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        zone.rename_sub_county(sub_county_id, name)?;
    }
    state.store.save(&zone).await?;
    Ok(respond::with_message(
        StatusCode::OK,
        zone,
        "Sub-county updated successfully",
    ))
}

pub async fn delete_sub_county(
    State(state): State<AppState>,
    Path((id, sub_county_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Response> {
    let mut zone = load_zone(&state, id).await?;
    zone.remove_sub_county(sub_county_id);
    state.store.save(&zone).await?;
    Ok(respond::with_message(
        StatusCode::OK,
        zone,
        "Sub-county deleted successfully",
    ))
}

pub async fn add_location(
    State(state): State<AppState>,
    Path((id, sub_county_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<LocationPayload>,
) -> ApiResult<Response> {
    let name = required_name(payload.name, "Location name is required")?;
    let fee = payload
        .delivery_fee
        .filter(|fee| *fee >= 0)
        .ok_or_else(|| ApiError::invalid("A valid delivery fee is required"))?;
    let mut zone = load_zone(&state, id).await?;
    zone.add_location(sub_county_id, &name, fee)?;
    state.store.save(&zone).await?;
    Ok(respond::with_message(
        StatusCode::CREATED,
        zone,
        "Location added successfully",
    ))
}

pub async fn update_location(
    State(state): State<AppState>,
    Path((id, sub_county_id, location_id)): Path<(Uuid, Uuid, Uuid)>,
    Json(payload): Json<LocationPayload>,
) -> ApiResult<Response> {
    if matches!(payload.delivery_fee, Some(fee) if fee < 0) {
        return Err(ApiError::invalid("A valid delivery fee is required"));
    }
    let mut zone = load_zone(&state, id).await?;
    let name = payload.name.as_deref().map(str::trim).filter(|n| !n.is_empty());
    zone.update_location(sub_county_id, location_id, name, payload.delivery_fee)?;
    state.store.save(&zone).await?;
    Ok(respond::with_message(
        StatusCode::OK,
        zone,
        "Location updated successfully",
    ))
}

pub async fn delete_location(
    State(state): State<AppState>,
    Path((id, sub_county_id, location_id)): Path<(Uuid, Uuid, Uuid)>,
) -> ApiResult<Response> {
    let mut zone = load_zone(&state, id).await?;
    zone.remove_location(sub_county_id, location_id)?;
    state.store.save(&zone).await?;
    Ok(respond::with_message(
        StatusCode::OK,
        zone,
        "Location deleted successfully",
    ))
}

async fn load_zone(state: &AppState, id: Uuid) -> ApiResult<DeliveryZone> {
    state
        .store
        .load(id)
        .await?
        .ok_or_else(|| ApiError::not_found("County not found"))
}

fn required_name(value: Option<String>, message: &str) -> ApiResult<String> {
    value
        .map(|name| name.trim().to_owned())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ApiError::invalid(message))
}
