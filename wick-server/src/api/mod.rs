//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 注册 / 登录 / 个人资料
//! - [`products`] - 商品目录与评价
//! - [`orders`] - 下单、支付、发货状态
//! - [`admin`] - 管理面板统计

pub mod admin;
pub mod auth;
pub mod health;
pub mod orders;
pub mod products;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};
