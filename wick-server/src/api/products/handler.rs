//! Product API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::auth::{AdminUser, CurrentUser};
use crate::core::ServerState;
use crate::db::models::{
    Product, ProductCreate, ProductListQuery, ProductUpdate, Review, ReviewInput,
};
use crate::db::repository::ProductRepository;
use crate::utils::time::now_rfc3339;
use crate::utils::{AppError, AppResponse, AppResult, ok_with_message};

/// GET /api/products - 商品列表 (关键字 / 分类过滤)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ProductListQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let repo = ProductRepository::new(state.db.clone());
    let products = repo.find_public(&query).await.map_err(AppError::from)?;
    Ok(Json(products))
}

/// GET /api/products/categories - 分类列表
pub async fn list_categories(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<String>>> {
    let repo = ProductRepository::new(state.db.clone());
    let categories = repo.distinct_categories().await.map_err(AppError::from)?;
    Ok(Json(categories))
}

/// GET /api/products/history - 全部商品含已下架 (管理员)
pub async fn history(
    State(state): State<ServerState>,
    _admin: AdminUser,
) -> AppResult<Json<Vec<Product>>> {
    let repo = ProductRepository::new(state.db.clone());
    let products = repo.find_history().await.map_err(AppError::from)?;
    Ok(Json(products))
}

/// GET /api/products/{id} - 商品详情
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.db.clone());
    let product = repo
        .find_by_id(&id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::not_found("Product not found"))?;
    Ok(Json(product))
}

/// POST /api/products - 创建商品 (管理员)
pub async fn create(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Json(payload): Json<ProductCreate>,
) -> AppResult<(StatusCode, Json<Product>)> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let repo = ProductRepository::new(state.db.clone());
    let product = repo.create(payload).await.map_err(AppError::from)?;

    tracing::info!(product = %product.name, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /api/products/{id} - 更新商品 (管理员)
pub async fn update(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    if let Some(price) = payload.price
        && price < 0.0
    {
        return Err(AppError::validation("price must not be negative"));
    }
    if let Some(stock) = payload.count_in_stock
        && stock < 0
    {
        return Err(AppError::validation("count_in_stock must not be negative"));
    }

    let repo = ProductRepository::new(state.db.clone());
    let product = repo.update(&id, payload).await.map_err(AppError::from)?;
    Ok(Json(product))
}

/// DELETE /api/products/{id} - 下架商品 (软删除，管理员)
pub async fn soft_delete(
    State(state): State<ServerState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<()>>> {
    let repo = ProductRepository::new(state.db.clone());
    repo.soft_delete(&id).await.map_err(AppError::from)?;

    tracing::info!(product = %id, "Product soft-deleted");
    Ok(ok_with_message((), "Product removed"))
}

// =============================================================================
// Review Handlers
// =============================================================================

/// POST /api/products/{id}/reviews - 新增评价
pub async fn add_review(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<ReviewInput>,
) -> AppResult<(StatusCode, Json<Product>)> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let repo = ProductRepository::new(state.db.clone());
    let review = Review {
        user: user.record_id()?,
        name: user.name.clone(),
        rating: payload.rating,
        comment: payload.comment,
        images: payload.images,
        created_at: now_rfc3339(),
    };
    let product = repo.add_review(&id, review).await.map_err(AppError::from)?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /api/products/{id}/reviews - 更新自己的评价
pub async fn update_review(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<ReviewInput>,
) -> AppResult<Json<Product>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let repo = ProductRepository::new(state.db.clone());
    let product = repo
        .update_review(&id, &user.record_id()?, payload.rating, payload.comment)
        .await
        .map_err(AppError::from)?;
    Ok(Json(product))
}

/// DELETE /api/products/{id}/reviews - 删除自己的评价
pub async fn delete_review(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.db.clone());
    let product = repo
        .delete_review(&id, &user.record_id()?)
        .await
        .map_err(AppError::from)?;
    Ok(Json(product))
}
