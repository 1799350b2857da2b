//! Order Repository
//!
//! 订单表读写。支付相关的不变量全部由条件更新保证：
//! - `bind_gateway_order`: razorpay_order_id 每单最多写入一次
//! - `mark_paid`: is_paid 只允许 false→true 转换一次
//!
//! 两个条件都写在 UPDATE 语句内，并发重复调用只有一个能生效。

use super::{BaseRepository, RepoError, RepoResult, make_record_id};
use crate::db::models::{Order, OrderItem, OrderStatus, PaymentStatus, ShippingAddress};
use crate::utils::time::now_rfc3339;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const ORDER_TABLE: &str = "order";

/// Field bundle for order creation (items already snapshotted)
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user: RecordId,
    pub order_items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    pub items_price: f64,
    pub tax_price: f64,
    pub shipping_price: f64,
    pub total_price: f64,
}

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Persist a new order in Pending state
    pub async fn create(&self, data: NewOrder) -> RepoResult<Order> {
        let now = now_rfc3339();
        let created: Vec<Order> = self
            .base
            .db()
            .query(
                r#"
                CREATE order SET
                    user             = $user,
                    order_items      = $order_items,
                    shipping_address = $shipping_address,
                    payment_method   = $payment_method,
                    items_price      = $items_price,
                    tax_price        = $tax_price,
                    shipping_price   = $shipping_price,
                    total_price      = $total_price,
                    is_paid          = false,
                    payment_status   = $payment_status,
                    is_delivered     = false,
                    status           = $status,
                    created_at       = $now,
                    updated_at       = $now
                RETURN AFTER
                "#,
            )
            .bind(("user", data.user))
            .bind(("order_items", data.order_items))
            .bind(("shipping_address", data.shipping_address))
            .bind(("payment_method", data.payment_method))
            .bind(("items_price", data.items_price))
            .bind(("tax_price", data.tax_price))
            .bind(("shipping_price", data.shipping_price))
            .bind(("total_price", data.total_price))
            .bind(("payment_status", PaymentStatus::Pending))
            .bind(("status", OrderStatus::Pending))
            .bind(("now", now))
            .await?
            .take(0)?;

        created
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let thing = make_record_id(ORDER_TABLE, id);
        let order: Option<Order> = self.base.db().select(thing).await?;
        Ok(order)
    }

    /// Orders belonging to one user, newest first
    pub async fn find_by_user(&self, user: &RecordId) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE user = $user ORDER BY created_at DESC")
            .bind(("user", user.clone()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// All orders, newest first (admin listing)
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Record the gateway order id, at most once per order.
    ///
    /// 条件写入：已绑定过网关订单的记录不会被改写。
    /// Returns false when the id was already set (or the order is missing).
    pub async fn bind_gateway_order(&self, id: &str, gateway_order_id: &str) -> RepoResult<bool> {
        let thing = make_record_id(ORDER_TABLE, id);
        let updated: Vec<Order> = self
            .base
            .db()
            .query(
                "UPDATE $thing SET razorpay_order_id = $gateway_order_id, \
                 payment_status = $payment_status, updated_at = $now \
                 WHERE razorpay_order_id = NONE RETURN AFTER",
            )
            .bind(("thing", thing))
            .bind(("gateway_order_id", gateway_order_id.to_string()))
            .bind(("payment_status", PaymentStatus::Created))
            .bind(("now", now_rfc3339()))
            .await?
            .take(0)?;
        Ok(!updated.is_empty())
    }

    /// Transition the order to paid, exactly once.
    ///
    /// 条件写入：is_paid 已为 true 时不产生任何写操作，
    /// 并发的重复验证回调只会有一个写入 paid_at。
    /// Returns false when the order was already paid (or missing).
    pub async fn mark_paid(
        &self,
        id: &str,
        gateway_payment_id: &str,
        gateway_response: serde_json::Value,
    ) -> RepoResult<bool> {
        let thing = make_record_id(ORDER_TABLE, id);
        let now = now_rfc3339();
        let updated: Vec<Order> = self
            .base
            .db()
            .query(
                "UPDATE $thing SET is_paid = true, paid_at = $now, \
                 payment_verified_at = $now, payment_status = $payment_status, \
                 razorpay_payment_id = $gateway_payment_id, \
                 gateway_response = $gateway_response, updated_at = $now \
                 WHERE is_paid = false RETURN AFTER",
            )
            .bind(("thing", thing))
            .bind(("now", now))
            .bind(("payment_status", PaymentStatus::Success))
            .bind(("gateway_payment_id", gateway_payment_id.to_string()))
            .bind(("gateway_response", gateway_response))
            .await?
            .take(0)?;
        Ok(!updated.is_empty())
    }

    /// Apply an allow-listed status; Delivered also stamps the delivery fields
    pub async fn update_status(&self, id: &str, status: OrderStatus) -> RepoResult<Order> {
        let thing = make_record_id(ORDER_TABLE, id);
        let now = now_rfc3339();

        let query_str = if status == OrderStatus::Delivered {
            "UPDATE $thing SET status = $status, is_delivered = true, \
             delivered_at = $now, updated_at = $now RETURN AFTER"
        } else {
            "UPDATE $thing SET status = $status, updated_at = $now RETURN AFTER"
        };

        let orders: Vec<Order> = self
            .base
            .db()
            .query(query_str)
            .bind(("thing", thing))
            .bind(("status", status))
            .bind(("now", now))
            .await?
            .take(0)?;
        orders
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    // =========================================================================
    // Aggregates (admin dashboard)
    // =========================================================================

    pub async fn count_all(&self) -> RepoResult<i64> {
        let count: Option<i64> = self
            .base
            .db()
            .query("(SELECT count() AS total FROM order GROUP ALL)[0].total ?? 0")
            .await?
            .take(0)?;
        Ok(count.unwrap_or(0))
    }

    /// Revenue over paid orders only
    pub async fn total_paid_revenue(&self) -> RepoResult<f64> {
        let sum: Option<f64> = self
            .base
            .db()
            .query(
                "(SELECT math::sum(total_price) AS total FROM order \
                 WHERE is_paid = true GROUP ALL)[0].total ?? 0.0",
            )
            .await?
            .take(0)?;
        Ok(sum.unwrap_or(0.0))
    }
}
