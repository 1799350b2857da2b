//! Payment gateway integration
//!
//! Talks to the Razorpay orders API and verifies its signed payment
//! callbacks. The client is constructed once and injected through
//! [`crate::core::ServerState`]; nothing in here is global.

pub mod client;
pub mod signature;

pub use client::{GatewayError, GatewayOrder, RazorpayClient};
pub use signature::verify_payment_signature;

/// 支付网关配置
#[derive(Debug, Clone)]
pub struct RazorpayConfig {
    /// API Key ID (basic auth 用户名)
    pub key_id: String,
    /// API Key Secret (basic auth 密码，亦用于回调签名验证)
    pub key_secret: String,
    /// API 地址 (测试时可指向本地 mock)
    pub api_base: String,
}

impl RazorpayConfig {
    pub fn from_env() -> Self {
        Self {
            key_id: std::env::var("RAZORPAY_KEY_ID").unwrap_or_default(),
            key_secret: std::env::var("RAZORPAY_KEY_SECRET").unwrap_or_default(),
            api_base: std::env::var("RAZORPAY_API_BASE")
                .unwrap_or_else(|_| "https://api.razorpay.com/v1".into()),
        }
    }

    /// 未配置密钥时支付接口不可用
    pub fn is_configured(&self) -> bool {
        !self.key_id.is_empty() && !self.key_secret.is_empty()
    }
}
