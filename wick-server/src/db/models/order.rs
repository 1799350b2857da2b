//! Order Model
//!
//! Orders snapshot item name/image/price at purchase time so later catalog
//! edits never rewrite history. Payment fields bind an order to exactly one
//! gateway transaction.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Fulfilment status. Wire format matches the storefront UI labels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Processed,
    #[serde(rename = "Out for Delivery")]
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Parse against the fixed allow-list. Anything else is rejected.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Pending" => Some(Self::Pending),
            "Processed" => Some(Self::Processed),
            "Out for Delivery" => Some(Self::OutForDelivery),
            "Delivered" => Some(Self::Delivered),
            "Cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processed => "Processed",
            Self::OutForDelivery => "Out for Delivery",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }
}

/// Payment lifecycle as reported by the gateway flow
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Created,
    Attempted,
    Success,
    Failed,
}

/// Order line item (purchase-time snapshot)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    /// Record link to product
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
    pub name: String,
    pub image: String,
    pub price: f64,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Record link to the purchasing user
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    pub order_items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    pub items_price: f64,
    pub tax_price: f64,
    pub shipping_price: f64,
    pub total_price: f64,

    // Payment state
    #[serde(default)]
    pub is_paid: bool,
    pub paid_at: Option<String>,
    pub payment_verified_at: Option<String>,
    pub payment_status: PaymentStatus,
    /// Gateway order id, set at most once (binds the order to one gateway transaction)
    pub razorpay_order_id: Option<String>,
    /// Gateway payment id, recorded on successful verification
    pub razorpay_payment_id: Option<String>,
    /// Raw gateway callback payload kept for audit
    pub gateway_response: Option<serde_json::Value>,

    // Delivery state
    #[serde(default)]
    pub is_delivered: bool,
    pub delivered_at: Option<String>,
    pub status: OrderStatus,

    pub created_at: String,
    pub updated_at: String,
}

/// Incoming line item for order placement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemInput {
    /// Product id ("product:xyz" or bare id)
    pub product: String,
    pub name: String,
    #[serde(default)]
    pub image: String,
    pub price: f64,
    pub quantity: i64,
}

/// Order placement payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub order_items: Vec<OrderItemInput>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    pub items_price: f64,
    pub tax_price: f64,
    pub shipping_price: f64,
    pub total_price: f64,
}

/// Body of the payment verification callback
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentVerification {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    /// Hex-encoded HMAC-SHA256 signature
    pub razorpay_signature: String,
    /// Local order id the client claims this payment belongs to
    pub order_id: String,
}

/// Body of the admin status update
#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}
