//! Product Model
//!
//! Catalog products with embedded customer reviews. Deleting a product only
//! flips `is_deleted` so order history keeps resolving.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// Customer review embedded in a product document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// Reviewer (record link to user)
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    /// Reviewer display name, frozen at review time
    pub name: String,
    /// 1-5
    pub rating: i32,
    pub comment: String,
    /// Optional reference image URLs
    #[serde(default)]
    pub images: Vec<String>,
    pub created_at: String,
}

/// Product model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub count_in_stock: i64,
    /// URL to image
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub reviews: Vec<Review>,
    /// Mean of review ratings, 0.0 when unreviewed
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub num_reviews: i64,
    #[serde(default)]
    pub is_deleted: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Product {
    pub fn is_out_of_stock(&self) -> bool {
        self.count_in_stock == 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProductCreate {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: f64,
    #[validate(length(min = 1, message = "category is required"))]
    pub category: String,
    pub count_in_stock: Option<i64>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub count_in_stock: Option<i64>,
    pub image: Option<String>,
}

/// Review create/update payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReviewInput {
    #[validate(range(min = 1, max = 5, message = "rating must be between 1 and 5"))]
    pub rating: i32,
    #[validate(length(min = 1, message = "comment is required"))]
    pub comment: String,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Query string for the public product listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductListQuery {
    pub keyword: Option<String>,
    pub category: Option<String>,
    /// Admin views pass true to include out-of-stock items
    #[serde(default)]
    pub show_all: bool,
}
