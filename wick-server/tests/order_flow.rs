//! 订单全流程测试 - 下单 / 支付验证 / 状态流转
//!
//! 直接在内存数据库上驱动 checkout 层，覆盖库存、幂等与绑定校验。

use wick_server::checkout::{self, VerifyOutcome};
use wick_server::db::DbService;
use wick_server::db::models::{
    OrderCreate, OrderItemInput, OrderStatus, PaymentStatus, ProductCreate, ShippingAddress,
};
use wick_server::db::repository::{OrderRepository, ProductRepository};
use wick_server::payments::signature::payment_signature;
use wick_server::utils::AppError;

use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const SECRET: &str = "test-gateway-secret";

async fn test_db() -> Surreal<Db> {
    DbService::memory().await.expect("in-memory db").db
}

fn buyer() -> RecordId {
    RecordId::from_table_key("user", "buyer")
}

fn shipping() -> ShippingAddress {
    ShippingAddress {
        address: "Test St".to_string(),
        city: "Test City".to_string(),
        postal_code: "11111".to_string(),
        country: "Test".to_string(),
    }
}

async fn seed_product(products: &ProductRepository, name: &str, price: f64, stock: i64) -> String {
    let product = products
        .create(ProductCreate {
            name: name.to_string(),
            description: None,
            price,
            category: "Scented".to_string(),
            count_in_stock: Some(stock),
            image: None,
        })
        .await
        .expect("seed product");
    product.id.expect("product id").to_string()
}

fn order_for(product_id: &str, name: &str, price: f64, quantity: i64) -> OrderCreate {
    OrderCreate {
        order_items: vec![OrderItemInput {
            product: product_id.to_string(),
            name: name.to_string(),
            image: String::new(),
            price,
            quantity,
        }],
        shipping_address: shipping(),
        payment_method: "Razorpay".to_string(),
        items_price: price * quantity as f64,
        tax_price: 0.0,
        shipping_price: 0.0,
        total_price: price * quantity as f64,
    }
}

async fn stock_of(products: &ProductRepository, id: &str) -> i64 {
    products
        .find_by_id(id)
        .await
        .expect("find product")
        .expect("product exists")
        .count_in_stock
}

// =============================================================================
// Placement
// =============================================================================

#[tokio::test]
async fn place_order_decrements_stock_and_snapshots_items() {
    let db = test_db().await;
    let products = ProductRepository::new(db.clone());
    let orders = OrderRepository::new(db.clone());

    let id = seed_product(&products, "Lavender Bliss", 24.99, 12).await;
    let order = checkout::place_order(&products, &orders, buyer(), order_for(&id, "Lavender Bliss", 24.99, 2))
        .await
        .expect("order placed");

    assert_eq!(stock_of(&products, &id).await, 10);
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.payment_status, PaymentStatus::Pending);
    assert!(!order.is_paid);
    assert_eq!(order.order_items.len(), 1);
    assert_eq!(order.order_items[0].name, "Lavender Bliss");
    assert_eq!(order.order_items[0].price, 24.99);
    assert_eq!(order.order_items[0].quantity, 2);

    // Catalog edits must not rewrite the snapshot
    products
        .update(
            &id,
            wick_server::db::models::ProductUpdate {
                name: None,
                description: None,
                price: Some(99.0),
                category: None,
                count_in_stock: None,
                image: None,
            },
        )
        .await
        .expect("price change");
    let reloaded = orders
        .find_by_id(&order.id.unwrap().to_string())
        .await
        .expect("find order")
        .expect("order exists");
    assert_eq!(reloaded.order_items[0].price, 24.99);
}

#[tokio::test]
async fn place_order_rejects_empty_item_list() {
    let db = test_db().await;
    let products = ProductRepository::new(db.clone());
    let orders = OrderRepository::new(db.clone());

    let mut input = order_for("product:none", "x", 1.0, 1);
    input.order_items.clear();

    let err = checkout::place_order(&products, &orders, buyer(), input)
        .await
        .expect_err("empty order rejected");
    assert!(matches!(err, AppError::Invalid(_)));
}

#[tokio::test]
async fn place_order_missing_product_is_not_found() {
    let db = test_db().await;
    let products = ProductRepository::new(db.clone());
    let orders = OrderRepository::new(db.clone());

    let err = checkout::place_order(
        &products,
        &orders,
        buyer(),
        order_for("product:ghost", "Ghost", 9.99, 1),
    )
    .await
    .expect_err("missing product rejected");
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn place_order_insufficient_stock_rejected_without_mutation() {
    let db = test_db().await;
    let products = ProductRepository::new(db.clone());
    let orders = OrderRepository::new(db.clone());

    let id = seed_product(&products, "Ocean Breeze", 26.0, 2).await;
    let err = checkout::place_order(&products, &orders, buyer(), order_for(&id, "Ocean Breeze", 26.0, 3))
        .await
        .expect_err("overdraw rejected");
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(stock_of(&products, &id).await, 2);
    assert!(orders.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_multi_item_placement_restores_earlier_reservations() {
    let db = test_db().await;
    let products = ProductRepository::new(db.clone());
    let orders = OrderRepository::new(db.clone());

    let a = seed_product(&products, "Vanilla Bean", 22.5, 5).await;
    let b = seed_product(&products, "Sandalwood", 28.0, 0).await;

    let input = OrderCreate {
        order_items: vec![
            OrderItemInput {
                product: a.clone(),
                name: "Vanilla Bean".to_string(),
                image: String::new(),
                price: 22.5,
                quantity: 2,
            },
            OrderItemInput {
                product: b.clone(),
                name: "Sandalwood".to_string(),
                image: String::new(),
                price: 28.0,
                quantity: 1,
            },
        ],
        shipping_address: shipping(),
        payment_method: "Razorpay".to_string(),
        items_price: 73.0,
        tax_price: 0.0,
        shipping_price: 0.0,
        total_price: 73.0,
    };

    let err = checkout::place_order(&products, &orders, buyer(), input)
        .await
        .expect_err("second item short on stock");
    assert!(matches!(err, AppError::Validation(_)));

    // The units taken for the first item came back
    assert_eq!(stock_of(&products, &a).await, 5);
    assert_eq!(stock_of(&products, &b).await, 0);
    assert!(orders.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn deleted_product_cannot_be_ordered() {
    let db = test_db().await;
    let products = ProductRepository::new(db.clone());
    let orders = OrderRepository::new(db.clone());

    let id = seed_product(&products, "Retired", 10.0, 4).await;
    products.soft_delete(&id).await.expect("soft delete");

    let err = checkout::place_order(&products, &orders, buyer(), order_for(&id, "Retired", 10.0, 1))
        .await
        .expect_err("deleted product rejected");
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(stock_of(&products, &id).await, 4);
}

// =============================================================================
// Payment verification
// =============================================================================

async fn placed_order(db: &Surreal<Db>) -> (ProductRepository, OrderRepository, String) {
    let products = ProductRepository::new(db.clone());
    let orders = OrderRepository::new(db.clone());
    let id = seed_product(&products, "Lavender Bliss", 24.99, 12).await;
    let order = checkout::place_order(&products, &orders, buyer(), order_for(&id, "Lavender Bliss", 24.99, 1))
        .await
        .expect("order placed");
    let order_id = order.id.expect("order id").to_string();
    (products, orders, order_id)
}

#[tokio::test]
async fn verify_payment_marks_order_paid_once() {
    let db = test_db().await;
    let (_, orders, order_id) = placed_order(&db).await;

    assert!(orders
        .bind_gateway_order(&order_id, "order_mock123")
        .await
        .expect("bind"));

    let callback = || wick_server::db::models::PaymentVerification {
        razorpay_order_id: "order_mock123".to_string(),
        razorpay_payment_id: "pay_mock456".to_string(),
        razorpay_signature: payment_signature(SECRET, "order_mock123", "pay_mock456"),
        order_id: order_id.clone(),
    };

    let outcome = checkout::verify_payment(&orders, SECRET, callback())
        .await
        .expect("verification succeeds");
    let order = match outcome {
        VerifyOutcome::Verified(order) => *order,
        VerifyOutcome::AlreadyPaid => panic!("first verification must write"),
    };
    assert!(order.is_paid);
    assert_eq!(order.payment_status, PaymentStatus::Success);
    assert_eq!(order.razorpay_payment_id.as_deref(), Some("pay_mock456"));
    let first_paid_at = order.paid_at.clone().expect("paid_at set");
    assert!(order.payment_verified_at.is_some());
    assert!(order.gateway_response.is_some());

    // Duplicate callback: answered without a second write
    let outcome = checkout::verify_payment(&orders, SECRET, callback())
        .await
        .expect("duplicate verification is safe");
    assert!(matches!(outcome, VerifyOutcome::AlreadyPaid));

    let reloaded = orders
        .find_by_id(&order_id)
        .await
        .expect("find order")
        .expect("order exists");
    assert_eq!(reloaded.paid_at.as_deref(), Some(first_paid_at.as_str()));
}

#[tokio::test]
async fn verify_payment_rejects_mismatched_gateway_order() {
    let db = test_db().await;
    let (_, orders, order_id) = placed_order(&db).await;

    assert!(orders
        .bind_gateway_order(&order_id, "order_mock123")
        .await
        .expect("bind"));

    // Signature is valid, but for a different gateway order
    let callback = wick_server::db::models::PaymentVerification {
        razorpay_order_id: "order_fake123".to_string(),
        razorpay_payment_id: "pay_mock456".to_string(),
        razorpay_signature: payment_signature(SECRET, "order_fake123", "pay_mock456"),
        order_id: order_id.clone(),
    };

    let err = checkout::verify_payment(&orders, SECRET, callback)
        .await
        .expect_err("cross-order payment rejected");
    assert!(matches!(err, AppError::Invalid(_)));

    let order = orders.find_by_id(&order_id).await.unwrap().unwrap();
    assert!(!order.is_paid);
    assert!(order.paid_at.is_none());
}

#[tokio::test]
async fn verify_payment_rejects_bad_signature() {
    let db = test_db().await;
    let (_, orders, order_id) = placed_order(&db).await;

    assert!(orders
        .bind_gateway_order(&order_id, "order_mock123")
        .await
        .expect("bind"));

    let callback = wick_server::db::models::PaymentVerification {
        razorpay_order_id: "order_mock123".to_string(),
        razorpay_payment_id: "pay_mock456".to_string(),
        razorpay_signature: payment_signature("wrong-secret", "order_mock123", "pay_mock456"),
        order_id: order_id.clone(),
    };

    let err = checkout::verify_payment(&orders, SECRET, callback)
        .await
        .expect_err("bad signature rejected");
    assert!(matches!(err, AppError::Invalid(_)));

    let order = orders.find_by_id(&order_id).await.unwrap().unwrap();
    assert!(!order.is_paid);
}

#[tokio::test]
async fn gateway_order_binds_at_most_once() {
    let db = test_db().await;
    let (_, orders, order_id) = placed_order(&db).await;

    assert!(orders
        .bind_gateway_order(&order_id, "order_first")
        .await
        .expect("first bind"));
    // A second initiation must not rebind the order
    assert!(!orders
        .bind_gateway_order(&order_id, "order_second")
        .await
        .expect("second bind is a no-op"));

    let order = orders.find_by_id(&order_id).await.unwrap().unwrap();
    assert_eq!(order.razorpay_order_id.as_deref(), Some("order_first"));
    assert_eq!(order.payment_status, PaymentStatus::Created);
}

// =============================================================================
// Status transitions
// =============================================================================

#[tokio::test]
async fn status_update_outside_allow_list_rejected() {
    let db = test_db().await;
    let (_, orders, order_id) = placed_order(&db).await;

    let err = checkout::apply_status_update(&orders, &order_id, "In Space")
        .await
        .expect_err("unknown status rejected");
    assert!(matches!(err, AppError::Invalid(_)));

    let order = orders.find_by_id(&order_id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert!(!order.is_delivered);
}

#[tokio::test]
async fn delivered_status_stamps_delivery_fields() {
    let db = test_db().await;
    let (_, orders, order_id) = placed_order(&db).await;

    let order = checkout::apply_status_update(&orders, &order_id, "Out for Delivery")
        .await
        .expect("valid transition");
    assert_eq!(order.status, OrderStatus::OutForDelivery);
    assert!(!order.is_delivered);
    assert!(order.delivered_at.is_none());

    let order = checkout::apply_status_update(&orders, &order_id, "Delivered")
        .await
        .expect("delivered transition");
    assert_eq!(order.status, OrderStatus::Delivered);
    assert!(order.is_delivered);
    assert!(order.delivered_at.is_some());
}

#[tokio::test]
async fn cancelled_status_does_not_touch_delivery_fields() {
    let db = test_db().await;
    let (_, orders, order_id) = placed_order(&db).await;

    let order = checkout::apply_status_update(&orders, &order_id, "Cancelled")
        .await
        .expect("cancelled transition");
    assert_eq!(order.status, OrderStatus::Cancelled);
    assert!(!order.is_delivered);
    assert!(order.delivered_at.is_none());
}
