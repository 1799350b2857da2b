//! Wick Server - 蜡烛商店电商后端
//!
//! # 架构概述
//!
//! 本模块是 Wick 在线商店的后端服务，提供以下核心功能：
//!
//! - **商品目录** (`api::products`): 商品 CRUD、软删除、顾客评价
//! - **下单与库存** (`checkout`): 条件扣减的库存预留
//! - **支付** (`payments`): Razorpay 网关对接与回调签名验证
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **认证** (`auth`): JWT + Argon2 认证体系
//!
//! # 模块结构
//!
//! ```text
//! wick-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、密码
//! ├── api/           # HTTP 路由和处理器
//! ├── checkout/      # 下单 / 支付 / 状态流转
//! ├── payments/      # 支付网关客户端与签名
//! ├── db/            # 数据库层
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod auth;
pub mod checkout;
pub mod core;
pub mod db;
pub mod payments;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 进程级环境准备: dotenv + 日志
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_logger();
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
 _       ___      __
| |     / (_)____/ /__
| | /| / / / ___/ //_/
| |/ |/ / / /__/ ,<
|__/|__/_/\___/_/|_|
    "#
    );
}
