//! Order status transitions
//!
//! Admin-driven fulfilment updates. The raw status string is matched
//! against the fixed allow-list before anything is written; "Delivered"
//! additionally stamps the delivery fields.

use crate::db::models::{Order, OrderStatus};
use crate::db::repository::OrderRepository;
use crate::utils::{AppError, AppResult};

pub async fn apply_status_update(
    orders: &OrderRepository,
    order_id: &str,
    raw_status: &str,
) -> AppResult<Order> {
    let status = OrderStatus::parse(raw_status)
        .ok_or_else(|| AppError::invalid(format!("Invalid status value: {}", raw_status)))?;

    let order = orders.update_status(order_id, status).await?;

    tracing::info!(order = %order_id, status = status.as_str(), "Order status updated");
    Ok(order)
}
