//! Order placement
//!
//! Stock is taken with one guarded decrement per line item. There is no
//! separate availability pre-read: the floor condition sits inside the
//! UPDATE itself, so concurrent placements can never oversell. When a later
//! item fails, stock taken by earlier items of the same request is returned
//! before the placement errors, keeping placement all-or-nothing from the
//! caller's view.

use crate::db::models::{Order, OrderCreate, OrderItem};
use crate::db::repository::order::NewOrder;
use crate::db::repository::{OrderRepository, ProductRepository, make_record_id};
use crate::utils::{AppError, AppResult};
use surrealdb::RecordId;

/// Place an order for `user`, reserving stock for every line item
pub async fn place_order(
    products: &ProductRepository,
    orders: &OrderRepository,
    user: RecordId,
    input: OrderCreate,
) -> AppResult<Order> {
    if input.order_items.is_empty() {
        return Err(AppError::invalid("No order items"));
    }
    for item in &input.order_items {
        if item.quantity <= 0 {
            return Err(AppError::validation(format!(
                "Invalid quantity for {}",
                item.name
            )));
        }
    }

    // Take stock item by item; remember what we took for compensation
    let mut reserved: Vec<(String, i64)> = Vec::with_capacity(input.order_items.len());
    for item in &input.order_items {
        let taken = products.reserve_stock(&item.product, item.quantity).await?;
        if !taken {
            let failure = reservation_failure(products, item).await;
            release_reserved(products, &reserved).await;
            return Err(failure);
        }
        reserved.push((item.product.clone(), item.quantity));
    }

    // Snapshot the line items: later catalog edits must not rewrite history
    let order_items: Vec<OrderItem> = input
        .order_items
        .iter()
        .map(|item| OrderItem {
            product: make_record_id("product", &item.product),
            name: item.name.clone(),
            image: item.image.clone(),
            price: item.price,
            quantity: item.quantity,
        })
        .collect();

    let order = orders
        .create(NewOrder {
            user,
            order_items,
            shipping_address: input.shipping_address,
            payment_method: input.payment_method,
            items_price: input.items_price,
            tax_price: input.tax_price,
            shipping_price: input.shipping_price,
            total_price: input.total_price,
        })
        .await;

    match order {
        Ok(order) => Ok(order),
        Err(e) => {
            // The order row never materialized; give the stock back
            release_reserved(products, &reserved).await;
            Err(e.into())
        }
    }
}

/// Pick the right error for a failed reservation: missing product is a 404,
/// a live product without enough stock is a 400
async fn reservation_failure(
    products: &ProductRepository,
    item: &crate::db::models::OrderItemInput,
) -> AppError {
    match products.find_by_id(&item.product).await {
        Ok(Some(product)) if !product.is_deleted => {
            AppError::validation(format!("Insufficient stock for {}", item.name))
        }
        Ok(_) => AppError::not_found(format!("Product not found: {}", item.name)),
        Err(e) => e.into(),
    }
}

/// Return stock taken earlier in a failed placement
async fn release_reserved(products: &ProductRepository, reserved: &[(String, i64)]) {
    for (product_id, quantity) in reserved {
        if let Err(e) = products.release_stock(product_id, *quantity).await {
            // The decrement stands; flag it loudly for manual reconciliation
            tracing::error!(
                product = %product_id,
                quantity,
                error = %e,
                "Failed to release reserved stock after aborted placement"
            );
        }
    }
}
