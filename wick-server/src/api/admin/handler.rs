//! Admin Dashboard Handlers

use axum::{Json, extract::State};
use serde::Serialize;

use crate::auth::AdminUser;
use crate::core::ServerState;
use crate::db::repository::{OrderRepository, ProductRepository, UserRepository};
use crate::utils::{AppError, AppResult};

/// Stock level below which a product counts as "low stock"
const LOW_STOCK_THRESHOLD: i64 = 5;

#[derive(Debug, Serialize)]
pub struct AdminStats {
    pub total_orders: i64,
    pub total_users: i64,
    pub total_products: i64,
    pub low_stock_products: i64,
    /// Σ total_price over paid orders only
    pub total_revenue: f64,
}

/// GET /api/admin/stats - 管理面板统计
pub async fn stats(
    State(state): State<ServerState>,
    _admin: AdminUser,
) -> AppResult<Json<AdminStats>> {
    let orders = OrderRepository::new(state.db.clone());
    let users = UserRepository::new(state.db.clone());
    let products = ProductRepository::new(state.db.clone());

    let stats = AdminStats {
        total_orders: orders.count_all().await.map_err(AppError::from)?,
        total_users: users.count_all().await.map_err(AppError::from)?,
        total_products: products.count_all().await.map_err(AppError::from)?,
        low_stock_products: products
            .count_low_stock(LOW_STOCK_THRESHOLD)
            .await
            .map_err(AppError::from)?,
        total_revenue: orders.total_paid_revenue().await.map_err(AppError::from)?,
    };

    Ok(Json(stats))
}
