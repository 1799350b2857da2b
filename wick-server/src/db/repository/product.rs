//! Product Repository
//!
//! Catalog queries, soft delete, embedded review mutations and the stock
//! guard used by order placement.

use super::{BaseRepository, RepoError, RepoResult, make_record_id};
use crate::db::models::{Product, ProductCreate, ProductListQuery, ProductUpdate, Review};
use crate::utils::time::now_rfc3339;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const PRODUCT_TABLE: &str = "product";

/// Recompute the derived rating fields from the review list
fn recompute_rating(reviews: &[Review]) -> (f64, i64) {
    if reviews.is_empty() {
        return (0.0, 0);
    }
    let sum: i32 = reviews.iter().map(|r| r.rating).sum();
    (f64::from(sum) / reviews.len() as f64, reviews.len() as i64)
}

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Public catalog listing: never returns soft-deleted products, hides
    /// out-of-stock items unless `show_all` is set
    pub async fn find_public(&self, filter: &ProductListQuery) -> RepoResult<Vec<Product>> {
        let mut conditions = vec!["is_deleted = false"];
        if filter.keyword.is_some() {
            conditions.push("string::contains(string::lowercase(name), string::lowercase($keyword))");
        }
        if filter.category.is_some() {
            conditions.push("category = $category");
        }
        if !filter.show_all {
            conditions.push("count_in_stock > 0");
        }

        let query_str = format!(
            "SELECT * FROM product WHERE {} ORDER BY name",
            conditions.join(" AND ")
        );

        let mut query = self.base.db().query(query_str);
        if let Some(keyword) = filter.keyword.clone() {
            query = query.bind(("keyword", keyword));
        }
        if let Some(category) = filter.category.clone() {
            query = query.bind(("category", category));
        }

        let products: Vec<Product> = query.await?.take(0)?;
        Ok(products)
    }

    /// Every product ever created, newest first, deleted included
    pub async fn find_history(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(products)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let thing = make_record_id(PRODUCT_TABLE, id);
        let product: Option<Product> = self.base.db().select(thing).await?;
        Ok(product)
    }

    /// Distinct category names across live products
    pub async fn distinct_categories(&self) -> RepoResult<Vec<String>> {
        #[derive(serde::Deserialize)]
        struct Row {
            category: String,
        }

        let rows: Vec<Row> = self
            .base
            .db()
            .query("SELECT category FROM product WHERE is_deleted = false GROUP BY category")
            .await?
            .take(0)?;
        Ok(rows.into_iter().map(|r| r.category).collect())
    }

    /// Create a new product
    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        let now = now_rfc3339();
        let created: Vec<Product> = self
            .base
            .db()
            .query(
                r#"
                CREATE product SET
                    name           = $name,
                    description    = $description,
                    price          = $price,
                    category       = $category,
                    count_in_stock = $count_in_stock,
                    image          = $image,
                    reviews        = [],
                    rating         = 0.0,
                    num_reviews    = 0,
                    is_deleted     = false,
                    created_at     = $now,
                    updated_at     = $now
                RETURN AFTER
                "#,
            )
            .bind(("name", data.name))
            .bind((
                "description",
                data.description
                    .unwrap_or_else(|| "No description".to_string()),
            ))
            .bind(("price", data.price))
            .bind(("category", data.category))
            .bind(("count_in_stock", data.count_in_stock.unwrap_or(0).max(0)))
            .bind((
                "image",
                data.image.unwrap_or_else(|| "/images/sample.jpg".to_string()),
            ))
            .bind(("now", now))
            .await?
            .take(0)?;

        created
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Update a product (partial)
    pub async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        let thing = make_record_id(PRODUCT_TABLE, id);

        // Build dynamic SET clauses with proper type bindings
        let mut set_parts: Vec<&str> = Vec::new();
        if data.name.is_some() { set_parts.push("name = $name"); }
        if data.description.is_some() { set_parts.push("description = $description"); }
        if data.price.is_some() { set_parts.push("price = $price"); }
        if data.category.is_some() { set_parts.push("category = $category"); }
        if data.count_in_stock.is_some() { set_parts.push("count_in_stock = $count_in_stock"); }
        if data.image.is_some() { set_parts.push("image = $image"); }

        if set_parts.is_empty() {
            // No fields to update
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)));
        }
        set_parts.push("updated_at = $now");

        let query_str = format!("UPDATE $thing SET {} RETURN AFTER", set_parts.join(", "));

        let mut query = self
            .base
            .db()
            .query(query_str)
            .bind(("thing", thing))
            .bind(("now", now_rfc3339()));
        if let Some(v) = data.name { query = query.bind(("name", v)); }
        if let Some(v) = data.description { query = query.bind(("description", v)); }
        if let Some(v) = data.price { query = query.bind(("price", v)); }
        if let Some(v) = data.category { query = query.bind(("category", v)); }
        if let Some(v) = data.count_in_stock { query = query.bind(("count_in_stock", v)); }
        if let Some(v) = data.image { query = query.bind(("image", v)); }

        let products: Vec<Product> = query.await?.take(0)?;
        products
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    /// Soft delete: the record stays for order history
    pub async fn soft_delete(&self, id: &str) -> RepoResult<Product> {
        let thing = make_record_id(PRODUCT_TABLE, id);
        let products: Vec<Product> = self
            .base
            .db()
            .query("UPDATE $thing SET is_deleted = true, updated_at = $now RETURN AFTER")
            .bind(("thing", thing))
            .bind(("now", now_rfc3339()))
            .await?
            .take(0)?;
        products
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    // =========================================================================
    // Stock guard
    // =========================================================================

    /// Atomically take `quantity` units of stock.
    ///
    /// The floor check lives in the same statement as the decrement, so two
    /// concurrent reservations can never drive `count_in_stock` negative.
    /// Returns false when the product is missing, deleted, or short on stock.
    pub async fn reserve_stock(&self, id: &str, quantity: i64) -> RepoResult<bool> {
        if quantity <= 0 {
            return Err(RepoError::Validation(format!(
                "Invalid quantity {} for product {}",
                quantity, id
            )));
        }
        let thing = make_record_id(PRODUCT_TABLE, id);
        let updated: Vec<Product> = self
            .base
            .db()
            .query(
                "UPDATE $thing SET count_in_stock -= $qty, updated_at = $now \
                 WHERE count_in_stock >= $qty AND is_deleted = false RETURN AFTER",
            )
            .bind(("thing", thing))
            .bind(("qty", quantity))
            .bind(("now", now_rfc3339()))
            .await?
            .take(0)?;
        Ok(!updated.is_empty())
    }

    /// Return stock taken earlier in the same placement attempt
    pub async fn release_stock(&self, id: &str, quantity: i64) -> RepoResult<()> {
        let thing = make_record_id(PRODUCT_TABLE, id);
        self.base
            .db()
            .query("UPDATE $thing SET count_in_stock += $qty, updated_at = $now")
            .bind(("thing", thing))
            .bind(("qty", quantity))
            .bind(("now", now_rfc3339()))
            .await?
            .check()?;
        Ok(())
    }

    // =========================================================================
    // Reviews (embedded)
    // =========================================================================

    /// Add a review; one review per user per product
    pub async fn add_review(&self, product_id: &str, review: Review) -> RepoResult<Product> {
        let mut product = self
            .find_by_id(product_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", product_id)))?;

        if product.reviews.iter().any(|r| r.user == review.user) {
            return Err(RepoError::Duplicate("Product already reviewed".to_string()));
        }

        product.reviews.push(review);
        self.write_reviews(product_id, product.reviews).await
    }

    /// Update the calling user's review
    pub async fn update_review(
        &self,
        product_id: &str,
        user: &surrealdb::RecordId,
        rating: i32,
        comment: String,
    ) -> RepoResult<Product> {
        let mut product = self
            .find_by_id(product_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", product_id)))?;

        let review = product
            .reviews
            .iter_mut()
            .find(|r| &r.user == user)
            .ok_or_else(|| RepoError::NotFound("Review not found".to_string()))?;
        review.rating = rating;
        review.comment = comment;

        self.write_reviews(product_id, product.reviews).await
    }

    /// Remove the calling user's review
    pub async fn delete_review(
        &self,
        product_id: &str,
        user: &surrealdb::RecordId,
    ) -> RepoResult<Product> {
        let mut product = self
            .find_by_id(product_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", product_id)))?;

        let before = product.reviews.len();
        product.reviews.retain(|r| &r.user != user);
        if product.reviews.len() == before {
            return Err(RepoError::NotFound("Review not found".to_string()));
        }

        self.write_reviews(product_id, product.reviews).await
    }

    /// Persist a review list together with its derived rating fields
    async fn write_reviews(&self, product_id: &str, reviews: Vec<Review>) -> RepoResult<Product> {
        let (rating, num_reviews) = recompute_rating(&reviews);
        let thing = make_record_id(PRODUCT_TABLE, product_id);
        let products: Vec<Product> = self
            .base
            .db()
            .query(
                "UPDATE $thing SET reviews = $reviews, rating = $rating, \
                 num_reviews = $num_reviews, updated_at = $now RETURN AFTER",
            )
            .bind(("thing", thing))
            .bind(("reviews", reviews))
            .bind(("rating", rating))
            .bind(("num_reviews", num_reviews))
            .bind(("now", now_rfc3339()))
            .await?
            .take(0)?;
        products
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", product_id)))
    }

    // =========================================================================
    // Aggregates (admin dashboard)
    // =========================================================================

    pub async fn count_all(&self) -> RepoResult<i64> {
        self.count_where("true").await
    }

    pub async fn count_low_stock(&self, threshold: i64) -> RepoResult<i64> {
        let count: Option<i64> = self
            .base
            .db()
            .query("(SELECT count() AS total FROM product WHERE count_in_stock < $threshold AND is_deleted = false GROUP ALL)[0].total ?? 0")
            .bind(("threshold", threshold))
            .await?
            .take(0)?;
        Ok(count.unwrap_or(0))
    }

    async fn count_where(&self, condition: &str) -> RepoResult<i64> {
        let query_str = format!(
            "(SELECT count() AS total FROM product WHERE {} GROUP ALL)[0].total ?? 0",
            condition
        );
        let count: Option<i64> = self.base.db().query(query_str).await?.take(0)?;
        Ok(count.unwrap_or(0))
    }
}
