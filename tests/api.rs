//! End-to-end exercises of the HTTP surface against the in-memory store.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use duka::domain::{Cart, DeliveryZone, Order, OrderStatus, PaymentStatus, Product, User};
use duka::http::{self, AppState};
use duka::notify::NullNotifier;
use duka::store::{DocumentStore, DocumentStoreExt, MemoryStore};
use duka::workflow::OrderWorkflow;

fn test_app() -> (Router, Arc<dyn DocumentStore>) {
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
    let workflow = OrderWorkflow::new(Arc::clone(&store), Arc::new(NullNotifier));
    let state = AppState {
        store: Arc::clone(&store),
        workflow,
    };
    (http::router(state, http::cors_layer(&[])), store)
}

async fn send(app: &Router, method: Method, path: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(path);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn get(app: &Router, path: &str) -> (StatusCode, Value) {
    send(app, Method::GET, path, None).await
}

async fn post(app: &Router, path: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, path, Some(body)).await
}

async fn put(app: &Router, path: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::PUT, path, Some(body)).await
}

async fn delete(app: &Router, path: &str) -> (StatusCode, Value) {
    send(app, Method::DELETE, path, None).await
}

fn product(title: &str, category: &str, price: i64, stock: u32) -> Product {
    let now = Utc::now();
    Product {
        id: Uuid::new_v4(),
        image: Some(format!("{}.webp", title.to_lowercase().replace(' ', "-"))),
        images: Vec::new(),
        title: title.to_owned(),
        description: String::new(),
        category: category.to_owned(),
        price,
        sale_price: 0,
        total_stock: stock,
        average_review: 0.0,
        variations: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}

fn customer(name: &str) -> User {
    User {
        id: Uuid::new_v4(),
        user_name: name.to_owned(),
        email: format!("{}@example.com", name.to_lowercase()),
        role: "user".to_owned(),
    }
}

fn uuid_of(value: &Value) -> Uuid {
    value.as_str().unwrap().parse().unwrap()
}

#[tokio::test]
async fn test_health_reports_ok() {
    let (app, _) = test_app();
    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert_eq!(body["service"], "duka");
}

// ---- admin catalog ----

#[tokio::test]
async fn test_admin_adds_and_lists_products() {
    let (app, _) = test_app();
    let (status, body) = post(
        &app,
        "/api/admin/products/add",
        json!({
            "images": ["  ", "train.webp"],
            "title": "Wooden Train",
            "description": "Classic six-piece set",
            "category": "toddlers",
            "price": 2500,
            "salePrice": 1999,
            "totalStock": 10,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    // blank gallery entries are dropped and the first image is promoted
    assert_eq!(body["data"]["image"], "train.webp");
    assert_eq!(body["data"]["images"], json!(["train.webp"]));

    let (status, body) = get(&app, "/api/admin/products/get").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["title"], "Wooden Train");
}

#[tokio::test]
async fn test_add_product_requires_an_image() {
    let (app, _) = test_app();
    let (status, body) = post(
        &app,
        "/api/admin/products/add",
        json!({
            "title": "Invisible Toy",
            "category": "misc",
            "price": 100,
            "totalStock": 1,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Product must have at least one image (either main images or variations)"
    );
}

#[tokio::test]
async fn test_add_product_rejects_incomplete_variation() {
    let (app, _) = test_app();
    let (status, body) = post(
        &app,
        "/api/admin/products/add",
        json!({
            "title": "Plush Lion",
            "category": "plush",
            "price": 1200,
            "totalStock": 4,
            "variations": [{"image": "", "label": "Small"}],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Variation 1 is missing image or label");
}

#[tokio::test]
async fn test_variation_label_length_counts_characters() {
    let (app, _) = test_app();
    // 60 characters, 120 bytes
    let (status, _) = post(
        &app,
        "/api/admin/products/add",
        json!({
            "title": "Plush Lion",
            "category": "plush",
            "price": 1200,
            "totalStock": 4,
            "variations": [{"image": "lion-xl.webp", "label": "ā".repeat(60)}],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post(
        &app,
        "/api/admin/products/add",
        json!({
            "title": "Plush Lion",
            "category": "plush",
            "price": 1200,
            "totalStock": 4,
            "variations": [{"image": "lion-xl.webp", "label": "x".repeat(101)}],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Variation 1 label is too long (max 100 characters)");
}

#[tokio::test]
async fn test_add_product_rejects_sale_above_price() {
    let (app, _) = test_app();
    let (status, body) = post(
        &app,
        "/api/admin/products/add",
        json!({
            "images": ["lion.webp"],
            "title": "Plush Lion",
            "category": "plush",
            "price": 1000,
            "salePrice": 1500,
            "totalStock": 4,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Sale price cannot exceed the regular price");
}

#[tokio::test]
async fn test_edit_and_delete_product() {
    let (app, store) = test_app();
    let toy = product("Kite", "outdoor", 800, 6);
    store.save(&toy).await.unwrap();

    let (status, _) = put(
        &app,
        &format!("/api/admin/products/edit/{}", Uuid::new_v4()),
        json!({"images": ["kite.webp"], "title": "Kite", "category": "outdoor", "price": 800, "totalStock": 6}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = put(
        &app,
        &format!("/api/admin/products/edit/{}", toy.id),
        json!({"images": ["kite.webp"], "title": "Box Kite", "category": "outdoor", "price": 950, "totalStock": 6}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Box Kite");
    assert_eq!(body["data"]["id"], json!(toy.id));

    let (status, body) = delete(&app, &format!("/api/admin/products/delete/{}", toy.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product deleted successfully");

    let (status, _) = delete(&app, &format!("/api/admin/products/delete/{}", toy.id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---- storefront catalog ----

#[tokio::test]
async fn test_catalog_filters_by_category_and_sorts_by_price() {
    let (app, store) = test_app();
    let mut cheap = product("Marbles", "classic", 300, 50);
    let mut dear = product("Train Set", "classic", 4500, 3);
    let other = product("Kite", "outdoor", 800, 6);
    cheap.created_at = Utc::now() - Duration::minutes(2);
    dear.created_at = Utc::now() - Duration::minutes(1);
    store.save(&cheap).await.unwrap();
    store.save(&dear).await.unwrap();
    store.save(&other).await.unwrap();

    let (status, body) = get(
        &app,
        "/api/shop/products/get?category=classic&sortBy=price-lowtohigh",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["title"], "Marbles");
    assert_eq!(items[1]["title"], "Train Set");

    // newest first when no sort is asked for
    let (_, body) = get(&app, "/api/shop/products/get").await;
    assert_eq!(body["data"][0]["title"], "Kite");
}

#[tokio::test]
async fn test_product_details_unknown_id_is_404() {
    let (app, _) = test_app();
    let (status, body) = get(&app, &format!("/api/shop/products/get/{}", Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Product not found");
}

// ---- cart ----

#[tokio::test]
async fn test_cart_add_is_capped_by_stock() {
    let (app, store) = test_app();
    let toy = product("Yo-yo", "classic", 250, 2);
    store.save(&toy).await.unwrap();
    let user_id = Uuid::new_v4();

    let (status, body) = post(
        &app,
        "/api/shop/cart/add",
        json!({"userId": user_id, "productId": toy.id, "quantity": 3}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Only 2 left in stock");

    let (status, body) = post(
        &app,
        "/api/shop/cart/add",
        json!({"userId": user_id, "productId": toy.id, "quantity": 2}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"][0]["quantity"], 2);
    assert_eq!(body["data"]["items"][0]["title"], "Yo-yo");

    // the two already in the cart count against the remaining stock
    let (status, body) = post(
        &app,
        "/api/shop/cart/add",
        json!({"userId": user_id, "productId": toy.id, "quantity": 1}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Only 2 left in stock");
}

#[tokio::test]
async fn test_cart_fetch_update_and_remove() {
    let (app, store) = test_app();
    let toy = product("Puzzle", "classic", 900, 10);
    store.save(&toy).await.unwrap();
    let user_id = Uuid::new_v4();

    // an untouched cart reads back empty
    let (status, body) = get(&app, &format!("/api/shop/cart/get/{}", user_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"], json!([]));

    // updating before any cart exists
    let (status, body) = put(
        &app,
        "/api/shop/cart/update-cart",
        json!({"userId": user_id, "productId": toy.id, "quantity": 2}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Cart not found");

    post(
        &app,
        "/api/shop/cart/add",
        json!({"userId": user_id, "productId": toy.id, "quantity": 1}),
    )
    .await;

    let (status, body) = put(
        &app,
        "/api/shop/cart/update-cart",
        json!({"userId": user_id, "productId": toy.id, "quantity": 4}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"][0]["quantity"], 4);

    let (status, body) = put(
        &app,
        "/api/shop/cart/update-cart",
        json!({"userId": user_id, "productId": Uuid::new_v4(), "quantity": 1}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Cart item not present!");

    let (status, body) = delete(&app, &format!("/api/shop/cart/{}/{}", user_id, toy.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"], json!([]));
}

// ---- address book ----

fn address_fields(phone: &str) -> Value {
    json!({
        "county": "Nairobi",
        "subCounty": "Westlands",
        "location": "Parklands",
        "specificAddress": "Mji wa Kale Rd, Apt 4",
        "phone": phone,
        "notes": "Call at the gate",
        "deliveryFee": 150,
        "isDefault": true,
    })
}

#[tokio::test]
async fn test_address_crud_roundtrip() {
    let (app, _) = test_app();
    let user_id = Uuid::new_v4();

    let mut payload = address_fields("0712345678");
    payload["userId"] = json!(user_id);
    let (status, body) = post(&app, "/api/shop/address/add", payload).await;
    assert_eq!(status, StatusCode::CREATED);
    let address_id = uuid_of(&body["data"]["id"]);
    assert_eq!(body["data"]["deliveryFee"], 150);

    let (status, body) = get(&app, &format!("/api/shop/address/get/{}", user_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = put(
        &app,
        &format!("/api/shop/address/update/{}/{}", user_id, address_id),
        address_fields("0799999999"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["phone"], "0799999999");

    // addresses are scoped to their owner
    let (status, _) = put(
        &app,
        &format!("/api/shop/address/update/{}/{}", Uuid::new_v4(), address_id),
        address_fields("0700000001"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = delete(
        &app,
        &format!("/api/shop/address/delete/{}/{}", user_id, address_id),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Address deleted successfully");

    let (_, body) = get(&app, &format!("/api/shop/address/get/{}", user_id)).await;
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_address_requires_the_core_fields() {
    let (app, _) = test_app();
    let (status, body) = post(
        &app,
        "/api/shop/address/add",
        json!({
            "userId": Uuid::new_v4(),
            "county": "",
            "subCounty": "Westlands",
            "location": "Parklands",
            "phone": "0712345678",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "County is required");
}

// ---- checkout and the order workflow ----

async fn place_order(app: &Router, store: &Arc<dyn DocumentStore>) -> (Uuid, Uuid, Uuid) {
    let user = customer("Wanjiku");
    let toy = product("Building Blocks", "toddlers", 1500, 5);
    store.save(&user).await.unwrap();
    store.save(&toy).await.unwrap();

    let (status, body) = post(
        app,
        "/api/shop/cart/add",
        json!({"userId": user.id, "productId": toy.id, "quantity": 2}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let cart_id = uuid_of(&body["data"]["id"]);

    let (status, body) = post(
        app,
        "/api/shop/order/create",
        json!({
            "userId": user.id,
            "cartId": cart_id,
            "cartItems": [{
                "productId": toy.id,
                "title": toy.title,
                "image": "building-blocks.webp",
                "price": 1500,
                "quantity": 2,
            }],
            "addressInfo": {
                "county": "Nairobi",
                "subCounty": "Westlands",
                "location": "Parklands",
                "specificAddress": "Apt 4",
                "phone": "0712345678",
                "deliveryFee": 200,
            },
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Order placed successfully!");
    assert_eq!(body["order"]["orderStatus"], "confirmed");
    assert_eq!(body["order"]["paymentMethod"], "cash_on_delivery");
    assert_eq!(body["order"]["subtotalAmount"], 3000);
    assert_eq!(body["order"]["deliveryAmount"], 200);
    assert_eq!(body["order"]["totalAmount"], 3200);
    (uuid_of(&body["orderId"]), toy.id, cart_id)
}

#[tokio::test]
async fn test_checkout_places_cod_order() {
    let (app, store) = test_app();
    let (order_id, _, _) = place_order(&app, &store).await;

    let (status, body) = get(&app, &format!("/api/shop/order/details/{}", order_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["paymentStatus"], "pending");
}

#[tokio::test]
async fn test_checkout_rejects_unknown_user_and_empty_cart() {
    let (app, store) = test_app();
    let user = customer("Atieno");
    store.save(&user).await.unwrap();

    let (status, body) = post(
        &app,
        "/api/shop/order/create",
        json!({"userId": Uuid::new_v4(), "cartItems": [{"productId": Uuid::new_v4(), "title": "X", "price": 10, "quantity": 1}]}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");

    let (status, body) = post(
        &app,
        "/api/shop/order/create",
        json!({"userId": user.id, "cartItems": []}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing required order fields");
}

#[tokio::test]
async fn test_checkout_rejects_bad_line_amounts() {
    let (app, store) = test_app();
    let user = customer("Atieno");
    store.save(&user).await.unwrap();

    let order_with = |price: Value, quantity: Value| {
        json!({
            "userId": user.id,
            "cartItems": [{"productId": Uuid::new_v4(), "title": "X", "price": price, "quantity": quantity}],
        })
    };

    let (status, body) =
        post(&app, "/api/shop/order/create", order_with(json!(-10), json!(1))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Order items need a valid price and quantity");

    let (status, body) =
        post(&app, "/api/shop/order/create", order_with(json!(500), json!(0))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Order items need a valid price and quantity");

    // a line whose total cannot be represented
    let (status, body) =
        post(&app, "/api/shop/order/create", order_with(json!(i64::MAX), json!(2))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Order amounts are too large");
}

#[tokio::test]
async fn test_processing_picks_stock_once_and_clears_the_cart() {
    let (app, store) = test_app();
    let (order_id, product_id, cart_id) = place_order(&app, &store).await;

    let (status, body) = put(
        &app,
        &format!("/api/admin/orders/update/{}", order_id),
        json!({"orderStatus": "inProcess"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Order status updated successfully!");

    let toy: Product = store.load(product_id).await.unwrap().unwrap();
    assert_eq!(toy.total_stock, 3);
    let cart: Option<Cart> = store.load(cart_id).await.unwrap();
    assert!(cart.is_none());

    let order: Order = store.load(order_id).await.unwrap().unwrap();
    assert_eq!(order.order_status, OrderStatus::InProcess);
    assert!(order.stock_applied);
    assert!(order.cart_id.is_none());

    // bouncing out and back into the processing stage must not pick again
    put(
        &app,
        &format!("/api/admin/orders/update/{}", order_id),
        json!({"orderStatus": "shipped"}),
    )
    .await;
    put(
        &app,
        &format!("/api/admin/orders/update/{}", order_id),
        json!({"orderStatus": "processing"}),
    )
    .await;
    let toy: Product = store.load(product_id).await.unwrap().unwrap();
    assert_eq!(toy.total_stock, 3);
}

#[tokio::test]
async fn test_delivered_settles_payment() {
    let (app, store) = test_app();
    let (order_id, _, _) = place_order(&app, &store).await;

    let (status, _) = put(
        &app,
        &format!("/api/admin/orders/update/{}", order_id),
        json!({"orderStatus": "delivered"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let order: Order = store.load(order_id).await.unwrap().unwrap();
    assert_eq!(order.order_status, OrderStatus::Delivered);
    assert_eq!(order.payment_status, PaymentStatus::Paid);
    assert!(order.actual_delivery_date.is_some());
}

#[tokio::test]
async fn test_status_update_validates_input() {
    let (app, store) = test_app();
    let (order_id, _, _) = place_order(&app, &store).await;

    let (status, body) = put(
        &app,
        &format!("/api/admin/orders/update/{}", order_id),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "orderStatus is required");

    let (status, body) = put(
        &app,
        &format!("/api/admin/orders/update/{}", order_id),
        json!({"orderStatus": "teleported"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "unknown order status: teleported");

    let (status, body) = put(
        &app,
        &format!("/api/admin/orders/update/{}", Uuid::new_v4()),
        json!({"orderStatus": "shipped"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Order not found");
}

#[tokio::test]
async fn test_admin_rejects_order_with_reason() {
    let (app, store) = test_app();
    let (order_id, _, _) = place_order(&app, &store).await;

    let (status, body) = post(
        &app,
        &format!("/api/admin/orders/reject-payment/{}", order_id),
        json!({"rejectionReason": "Out of coverage area"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Order cancelled successfully");

    let order: Order = store.load(order_id).await.unwrap().unwrap();
    assert_eq!(order.order_status, OrderStatus::Cancelled);
    assert_eq!(
        order.payment_verification_note.as_deref(),
        Some("Out of coverage area")
    );
}

#[tokio::test]
async fn test_customer_order_history_is_scoped_and_newest_first() {
    let (app, store) = test_app();
    let (order_id, _, _) = place_order(&app, &store).await;
    let order: Order = store.load(order_id).await.unwrap().unwrap();

    let (status, body) = get(&app, &format!("/api/shop/order/list/{}", order.user_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (_, body) = get(&app, &format!("/api/shop/order/list/{}", Uuid::new_v4())).await;
    assert_eq!(body["data"], json!([]));
}

// ---- delivery zones ----

#[tokio::test]
async fn test_zone_directory_build_out() {
    let (app, _) = test_app();

    let (status, body) = post(
        &app,
        "/api/admin/delivery-locations/county",
        json!({"county": "Nairobi"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "County added successfully");
    let county_id = uuid_of(&body["data"]["id"]);

    let (status, body) = post(
        &app,
        "/api/admin/delivery-locations/county",
        json!({"county": "Nairobi"}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "County already exists");

    let (status, body) = post(
        &app,
        &format!("/api/admin/delivery-locations/county/{}/subcounty", county_id),
        json!({"name": "Westlands"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let sub_county_id = uuid_of(&body["data"]["subCounties"][0]["id"]);

    let (status, body) = post(
        &app,
        &format!(
            "/api/admin/delivery-locations/county/{}/subcounty/{}/location",
            county_id, sub_county_id
        ),
        json!({"name": "Parklands", "deliveryFee": 150}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["subCounties"][0]["locations"][0]["deliveryFee"], 150);

    let (status, body) = post(
        &app,
        &format!(
            "/api/admin/delivery-locations/county/{}/subcounty/{}/location",
            county_id, sub_county_id
        ),
        json!({"name": "Highridge"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "A valid delivery fee is required");
}

#[tokio::test]
async fn test_county_rename_cannot_take_an_existing_name() {
    let (app, _) = test_app();
    post(
        &app,
        "/api/admin/delivery-locations/county",
        json!({"county": "Nairobi"}),
    )
    .await;
    let (_, body) = post(
        &app,
        "/api/admin/delivery-locations/county",
        json!({"county": "Mombasa"}),
    )
    .await;
    let mombasa_id = uuid_of(&body["data"]["id"]);

    let (status, body) = put(
        &app,
        &format!("/api/admin/delivery-locations/county/{}", mombasa_id),
        json!({"county": "Nairobi"}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "County already exists");

    // keeping its own name while toggling activity is not a rename
    let (status, _) = put(
        &app,
        &format!("/api/admin/delivery-locations/county/{}", mombasa_id),
        json!({"county": "Mombasa", "isActive": false}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = get(&app, "/api/admin/delivery-locations").await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|zone| zone["county"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Mombasa", "Nairobi"]);
}

#[tokio::test]
async fn test_inactive_counties_hide_from_the_public_list() {
    let (app, _) = test_app();
    let (_, body) = post(
        &app,
        "/api/admin/delivery-locations/county",
        json!({"county": "Mombasa"}),
    )
    .await;
    let county_id = uuid_of(&body["data"]["id"]);

    let (_, body) = get(&app, "/api/admin/delivery-locations/public").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = put(
        &app,
        &format!("/api/admin/delivery-locations/county/{}", county_id),
        json!({"isActive": false}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "County updated successfully");

    let (_, body) = get(&app, "/api/admin/delivery-locations/public").await;
    assert_eq!(body["data"], json!([]));
    // the back office still sees it
    let (_, body) = get(&app, "/api/admin/delivery-locations").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_county_delete_cascades_but_keeps_address_snapshots() {
    let (app, _) = test_app();

    let (_, body) = post(
        &app,
        "/api/admin/delivery-locations/county",
        json!({"county": "Kiambu"}),
    )
    .await;
    let county_id = uuid_of(&body["data"]["id"]);
    let (_, body) = post(
        &app,
        &format!("/api/admin/delivery-locations/county/{}/subcounty", county_id),
        json!({"name": "Ruiru"}),
    )
    .await;
    let sub_county_id = uuid_of(&body["data"]["subCounties"][0]["id"]);
    post(
        &app,
        &format!(
            "/api/admin/delivery-locations/county/{}/subcounty/{}/location",
            county_id, sub_county_id
        ),
        json!({"name": "Kimbo", "deliveryFee": 250}),
    )
    .await;

    // a customer saves an address pointing at that leaf
    let user_id = Uuid::new_v4();
    post(
        &app,
        "/api/shop/address/add",
        json!({
            "userId": user_id,
            "county": "Kiambu",
            "subCounty": "Ruiru",
            "location": "Kimbo",
            "phone": "0712345678",
            "deliveryFee": 250,
        }),
    )
    .await;

    let (status, body) = delete(
        &app,
        &format!("/api/admin/delivery-locations/county/{}", county_id),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "County deleted successfully");

    // sub-counties and locations go with the county document
    let (_, body) = get(&app, "/api/admin/delivery-locations").await;
    assert_eq!(body["data"], json!([]));

    // the fee snapshot on the saved address is untouched
    let (_, body) = get(&app, &format!("/api/shop/address/get/{}", user_id)).await;
    assert_eq!(body["data"][0]["deliveryFee"], 250);
}

#[tokio::test]
async fn test_seeding_reports_and_skips_existing() {
    let (app, store) = test_app();

    let (status, body) = post(&app, "/api/admin/delivery-locations/seed", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Seeded 5 counties. 0 already existed.");

    let (_, body) = post(&app, "/api/admin/delivery-locations/seed", json!({})).await;
    assert_eq!(body["message"], "Seeded 0 counties. 5 already existed.");

    let zones: Vec<DeliveryZone> = store.list_all().await.unwrap();
    assert_eq!(zones.len(), 5);
}
