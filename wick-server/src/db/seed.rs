//! Development seed data
//!
//! Loads a small demo catalog into an empty store so the frontend has
//! something to render on a fresh checkout. Never runs against a non-empty
//! product table.

use crate::db::models::ProductCreate;
use crate::db::repository::{ProductRepository, RepoResult};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

fn demo_products() -> Vec<ProductCreate> {
    vec![
        ProductCreate {
            name: "Lavender Bliss".to_string(),
            description: Some("A soothing lavender scent to relax your mind.".to_string()),
            price: 24.99,
            category: "Aromatherapy".to_string(),
            count_in_stock: Some(12),
            image: Some("/uploads/lavender.png".to_string()),
        },
        ProductCreate {
            name: "Vanilla Bean".to_string(),
            description: Some("Warm and comforting vanilla fragrance.".to_string()),
            price: 22.50,
            category: "Scented".to_string(),
            count_in_stock: Some(45),
            image: Some("/uploads/vanilla.png".to_string()),
        },
        ProductCreate {
            name: "Ocean Breeze".to_string(),
            description: Some("Fresh and crisp scent of the ocean.".to_string()),
            price: 26.00,
            category: "Fresh".to_string(),
            count_in_stock: Some(2),
            image: Some("/uploads/ocean.png".to_string()),
        },
        ProductCreate {
            name: "Sandalwood".to_string(),
            description: Some("Earthy and woody sandalwood aroma.".to_string()),
            price: 28.00,
            category: "Woody".to_string(),
            count_in_stock: Some(8),
            image: Some("/uploads/sandalwood.png".to_string()),
        },
    ]
}

/// Seed the demo catalog when the product table is empty
pub async fn seed_demo_products(db: &Surreal<Db>) -> RepoResult<usize> {
    let repo = ProductRepository::new(db.clone());
    if repo.count_all().await? > 0 {
        return Ok(0);
    }

    let products = demo_products();
    let count = products.len();
    for product in products {
        repo.create(product).await?;
    }
    tracing::info!("Seeded {} demo products", count);
    Ok(count)
}
