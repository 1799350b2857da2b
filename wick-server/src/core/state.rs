//! 服务器状态
//!
//! [`ServerState`] 持有所有共享服务的引用，作为 Axum 的应用状态在各
//! 处理器之间以浅拷贝传递。支付网关客户端在这里注入，业务代码不持有
//! 任何全局客户端。

use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::{DbService, seed};
use crate::payments::RazorpayClient;

/// 服务器状态 - 持有所有服务的单例引用
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Db> | 嵌入式数据库 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | gateway | RazorpayClient | 支付网关客户端 (注入) |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库 (SurrealDB)
    pub db: Surreal<Db>,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
    /// 支付网关客户端
    pub gateway: RazorpayClient,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 1. 确保工作目录结构存在
    /// 2. 打开数据库 (work_dir/database/wick.db)
    /// 3. 初始化 JWT 与支付网关客户端
    /// 4. 开发环境写入演示商品
    ///
    /// # Panics
    ///
    /// 数据库初始化失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("wick.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");

        let state = Self::with_db(config.clone(), db_service.db).await;

        // 开发环境下为空目录填充演示商品
        if state.config.is_development()
            && let Err(e) = seed::seed_demo_products(&state.db).await
        {
            tracing::warn!(error = %e, "Demo seed failed");
        }

        state
    }

    /// 用已打开的数据库组装状态 (测试用内存库也走这里)
    pub async fn with_db(config: Config, db: Surreal<Db>) -> Self {
        let jwt_service = Arc::new(JwtService::new(config.jwt.clone()));
        let gateway = RazorpayClient::new(config.razorpay.clone());

        Self {
            config,
            db,
            jwt_service,
            gateway,
        }
    }
}
