//! Order API Handlers
//!
//! Thin translation between HTTP and the checkout module.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;

use crate::auth::{AdminUser, CurrentUser};
use crate::checkout::{self, VerifyOutcome};
use crate::core::ServerState;
use crate::db::models::{Order, OrderCreate, PaymentVerification, StatusUpdate};
use crate::db::repository::{OrderRepository, ProductRepository, UserRepository};
use crate::payments::GatewayOrder;
use crate::utils::{AppError, AppResult};

/// Order detail with the purchaser's public identity attached
#[derive(Debug, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<Order>,
}

/// POST /api/orders - 下单 (扣减库存)
pub async fn place(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<OrderCreate>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let products = ProductRepository::new(state.db.clone());
    let orders = OrderRepository::new(state.db.clone());

    let order =
        checkout::place_order(&products, &orders, user.record_id()?, payload).await?;

    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /api/orders - 所有订单 (管理员)
pub async fn list_all(
    State(state): State<ServerState>,
    _admin: AdminUser,
) -> AppResult<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.db.clone());
    let orders = repo.find_all().await.map_err(AppError::from)?;
    Ok(Json(orders))
}

/// GET /api/orders/myorders - 当前用户订单
pub async fn list_mine(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.db.clone());
    let orders = repo
        .find_by_user(&user.record_id()?)
        .await
        .map_err(AppError::from)?;
    Ok(Json(orders))
}

/// GET /api/orders/{id} - 订单详情 (本人或管理员)
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<OrderDetail>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_id(&id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::not_found("Order not found"))?;

    if !user.is_admin && order.user != user.record_id()? {
        return Err(AppError::forbidden("Not your order"));
    }

    let purchaser = UserRepository::new(state.db.clone())
        .find_by_id(&order.user.to_string())
        .await
        .map_err(AppError::from)?;

    Ok(Json(OrderDetail {
        order,
        user_name: purchaser.as_ref().map(|u| u.name.clone()),
        user_email: purchaser.map(|u| u.email),
    }))
}

/// POST /api/orders/pay/{id} - 发起网关支付
pub async fn initiate_payment(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<GatewayOrder>> {
    let repo = OrderRepository::new(state.db.clone());

    // Only the purchaser may initiate payment for an order
    let order = repo
        .find_by_id(&id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::not_found("Order not found"))?;
    if !user.is_admin && order.user != user.record_id()? {
        return Err(AppError::forbidden("Not your order"));
    }

    let gateway_order = checkout::initiate_payment(&repo, &state.gateway, &id).await?;
    Ok(Json(gateway_order))
}

/// POST /api/orders/pay/verify - 支付回调验证
pub async fn verify_payment(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Json(payload): Json<PaymentVerification>,
) -> AppResult<Json<VerifyResponse>> {
    let repo = OrderRepository::new(state.db.clone());
    let outcome =
        checkout::verify_payment(&repo, state.gateway.key_secret(), payload).await?;

    let response = match outcome {
        VerifyOutcome::Verified(order) => VerifyResponse {
            message: "Payment verified successfully",
            order: Some(*order),
        },
        VerifyOutcome::AlreadyPaid => VerifyResponse {
            message: "Order already paid",
            order: None,
        },
    };
    Ok(Json(response))
}

/// PUT /api/orders/{id}/deliver - 更新发货状态 (管理员)
pub async fn update_status(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(payload): Json<StatusUpdate>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = checkout::apply_status_update(&repo, &id, &payload.status).await?;
    Ok(Json(order))
}
