//! HTTP 层测试
//!
//! 用 oneshot 请求驱动完整的路由 + 中间件栈，验证认证边界与错误码。

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tower::ServiceExt;

use wick_server::core::{Config, ServerState, build_app_with_state};
use wick_server::db::DbService;
use wick_server::db::models::ProductCreate;
use wick_server::db::repository::user::NewUser;
use wick_server::db::repository::{ProductRepository, UserRepository};

async fn test_state() -> ServerState {
    let db = DbService::memory().await.expect("in-memory db").db;
    let config = Config::with_overrides("/tmp/wick-test", 0);
    ServerState::with_db(config, db).await
}

/// Register a user directly and mint a token for them
async fn user_token(state: &ServerState, email: &str, is_admin: bool) -> String {
    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .create(NewUser {
            name: email.split('@').next().unwrap_or("user").to_string(),
            email: email.to_string(),
            password_hash: wick_server::auth::hash_password("password123").unwrap(),
            is_admin,
        })
        .await
        .expect("create user");
    state
        .jwt_service
        .generate_token(&user.id.unwrap().to_string(), &user.name, is_admin)
        .expect("token")
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn health_is_public() {
    let app = build_app_with_state(test_state().await);
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn product_listing_is_public_but_orders_are_not() {
    let state = test_state().await;
    let app = build_app_with_state(state);

    let response = app
        .clone()
        .oneshot(Request::get("/api/products").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(Request::get("/api/orders/myorders").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_then_login_round_trip() {
    let app = build_app_with_state(test_state().await);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            serde_json::json!({
                "name": "Sonal",
                "email": "sonal@example.com",
                "password": "121212"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert!(body["token"].as_str().is_some());
    assert_eq!(body["is_admin"], false);

    // Duplicate registration is a 400
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            serde_json::json!({
                "name": "Sonal",
                "email": "sonal@example.com",
                "password": "121212"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Wrong password is a 401
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            serde_json::json!({ "email": "sonal@example.com", "password": "wrong" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            serde_json::json!({ "email": "sonal@example.com", "password": "121212" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn admin_routes_reject_plain_users() {
    let state = test_state().await;
    let token = user_token(&state, "customer@example.com", false).await;
    let app = build_app_with_state(state);

    let response = app
        .clone()
        .oneshot(
            Request::get("/api/admin/stats")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Product history is a GET under the public prefix, still admin-only
    let response = app
        .oneshot(
            Request::get("/api/products/history")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn invalid_status_update_is_a_400_over_http() {
    let state = test_state().await;
    let admin_token = user_token(&state, "admin@example.com", true).await;
    let customer_token = user_token(&state, "sonal@example.com", false).await;

    // Seed a product and place an order as the customer
    let products = ProductRepository::new(state.db.clone());
    let product = products
        .create(ProductCreate {
            name: "Lavender Bliss".to_string(),
            description: None,
            price: 24.99,
            category: "Aromatherapy".to_string(),
            count_in_stock: Some(12),
            image: None,
        })
        .await
        .expect("seed product");
    let product_id = product.id.unwrap().to_string();

    let app = build_app_with_state(state);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/orders",
            Some(&customer_token),
            serde_json::json!({
                "order_items": [{
                    "product": product_id,
                    "name": "Lavender Bliss",
                    "image": "",
                    "price": 24.99,
                    "quantity": 1
                }],
                "shipping_address": {
                    "address": "Test St",
                    "city": "Test City",
                    "postal_code": "11111",
                    "country": "Test"
                },
                "payment_method": "Razorpay",
                "items_price": 24.99,
                "tax_price": 0.0,
                "shipping_price": 0.0,
                "total_price": 24.99
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let order = body_json(response).await;
    let order_id = order["id"].as_str().expect("order id").to_string();

    // Unknown status value → 400
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/orders/{order_id}/deliver"),
            Some(&admin_token),
            serde_json::json!({ "status": "In Space" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Customers cannot drive fulfilment
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/orders/{order_id}/deliver"),
            Some(&customer_token),
            serde_json::json!({ "status": "Delivered" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Valid admin transition succeeds and stamps delivery state
    let response = app
        .oneshot(json_request(
            "PUT",
            &format!("/api/orders/{order_id}/deliver"),
            Some(&admin_token),
            serde_json::json!({ "status": "Delivered" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "Delivered");
    assert_eq!(body["is_delivered"], true);
    assert!(body["delivered_at"].as_str().is_some());
}
