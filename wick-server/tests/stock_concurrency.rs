//! 并发库存测试
//!
//! 两个并发请求同时抢同一批库存时，扣减语句里的下限条件必须保证
//! count_in_stock 永不为负。

use wick_server::checkout;
use wick_server::db::DbService;
use wick_server::db::models::{OrderCreate, OrderItemInput, ShippingAddress, ProductCreate};
use wick_server::db::repository::{OrderRepository, ProductRepository};

use surrealdb::RecordId;

fn order_input(product_id: &str, quantity: i64) -> OrderCreate {
    OrderCreate {
        order_items: vec![OrderItemInput {
            product: product_id.to_string(),
            name: "Ocean Breeze".to_string(),
            image: String::new(),
            price: 26.0,
            quantity,
        }],
        shipping_address: ShippingAddress {
            address: "Test St".to_string(),
            city: "Test City".to_string(),
            postal_code: "11111".to_string(),
            country: "Test".to_string(),
        },
        payment_method: "Razorpay".to_string(),
        items_price: 26.0 * quantity as f64,
        tax_price: 0.0,
        shipping_price: 0.0,
        total_price: 26.0 * quantity as f64,
    }
}

/// 库存 2，两个并发订单各要 2 件：最多一个成功
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_orders_cannot_oversell() {
    let db = DbService::memory().await.expect("in-memory db").db;
    let products = ProductRepository::new(db.clone());

    let product = products
        .create(ProductCreate {
            name: "Ocean Breeze".to_string(),
            description: None,
            price: 26.0,
            category: "Fresh".to_string(),
            count_in_stock: Some(2),
            image: None,
        })
        .await
        .expect("seed product");
    let product_id = product.id.expect("product id").to_string();

    let task = |user_key: &'static str| {
        let db = db.clone();
        let product_id = product_id.clone();
        async move {
            let products = ProductRepository::new(db.clone());
            let orders = OrderRepository::new(db);
            checkout::place_order(
                &products,
                &orders,
                RecordId::from_table_key("user", user_key),
                order_input(&product_id, 2),
            )
            .await
        }
    };

    let (a, b) = tokio::join!(
        tokio::spawn(task("alice")),
        tokio::spawn(task("bob"))
    );
    let results = [a.expect("task a"), b.expect("task b")];
    let successes = results.iter().filter(|r| r.is_ok()).count();

    assert!(successes <= 1, "two orders sold against 2 units of stock");

    let stock = products
        .find_by_id(&product_id)
        .await
        .expect("find product")
        .expect("product exists")
        .count_in_stock;

    // Stock accounts exactly for the successful orders and never goes negative
    assert_eq!(stock, 2 - 2 * successes as i64);
    assert!(stock >= 0);
}

/// 多个单件订单并发抢购：总扣减不超过初始库存
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_single_unit_orders_never_go_negative() {
    let db = DbService::memory().await.expect("in-memory db").db;
    let products = ProductRepository::new(db.clone());

    let product = products
        .create(ProductCreate {
            name: "Sandalwood".to_string(),
            description: None,
            price: 28.0,
            category: "Woody".to_string(),
            count_in_stock: Some(5),
            image: None,
        })
        .await
        .expect("seed product");
    let product_id = product.id.expect("product id").to_string();

    let mut handles = Vec::new();
    for i in 0..10 {
        let db = db.clone();
        let product_id = product_id.clone();
        handles.push(tokio::spawn(async move {
            let products = ProductRepository::new(db.clone());
            let orders = OrderRepository::new(db);
            checkout::place_order(
                &products,
                &orders,
                RecordId::from_table_key("user", format!("u{i}")),
                order_input(&product_id, 1),
            )
            .await
        }));
    }

    let mut successes = 0i64;
    for handle in handles {
        if handle.await.expect("task completes").is_ok() {
            successes += 1;
        }
    }

    let stock = products
        .find_by_id(&product_id)
        .await
        .expect("find product")
        .expect("product exists")
        .count_in_stock;

    assert!(successes <= 5, "sold more units than were in stock");
    assert_eq!(stock, 5 - successes);
    assert!(stock >= 0);
}
