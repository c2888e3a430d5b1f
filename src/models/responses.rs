//! Response DTOs for the catalog API
//!
//! All response bodies carry the `{success: bool, ...}` shape.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::models::{Category, Product, ReviewView};

// == Listings ==
#[derive(Debug, Clone, Serialize)]
pub struct ProductsResponse {
    pub success: bool,
    pub products: Vec<Product>,
}

impl ProductsResponse {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            success: true,
            products,
        }
    }
}

/// Filtered listing body, with its page count.
#[derive(Debug, Clone, Serialize)]
pub struct PagedProductsResponse {
    pub success: bool,
    pub products: Vec<Product>,
    pub total_page: usize,
}

impl PagedProductsResponse {
    pub fn new(products: Vec<Product>, total_page: usize) -> Self {
        Self {
            success: true,
            products,
            total_page,
        }
    }
}

// == Single Entities ==
#[derive(Debug, Clone, Serialize)]
pub struct ProductResponse {
    pub success: bool,
    pub product: Product,
}

impl ProductResponse {
    pub fn new(product: Product) -> Self {
        Self {
            success: true,
            product,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoriesResponse {
    pub success: bool,
    pub categories: Vec<Category>,
}

impl CategoriesResponse {
    pub fn new(categories: Vec<Category>) -> Self {
        Self {
            success: true,
            categories,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryResponse {
    pub success: bool,
    pub category: Category,
}

impl CategoryResponse {
    pub fn new(category: Category) -> Self {
        Self {
            success: true,
            category,
        }
    }
}

/// Category plus its products, served by the category listing path.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryListingResponse {
    pub success: bool,
    pub category: Category,
    pub products: Vec<Product>,
}

impl CategoryListingResponse {
    pub fn new(category: Category, products: Vec<Product>) -> Self {
        Self {
            success: true,
            category,
            products,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewsResponse {
    pub success: bool,
    pub reviews: Vec<ReviewView>,
}

impl ReviewsResponse {
    pub fn new(reviews: Vec<ReviewView>) -> Self {
        Self {
            success: true,
            reviews,
        }
    }
}

// == Write Outcomes ==
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

// == Operational ==
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsResponse {
    pub success: bool,
    pub hits: u64,
    pub misses: u64,
    pub expirations: u64,
    pub total_entries: usize,
    pub hit_rate: f64,
}

impl CacheStatsResponse {
    pub fn new(stats: &CacheStats) -> Self {
        Self {
            success: true,
            hits: stats.hits,
            misses: stats.misses,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
            hit_rate: stats.hit_rate(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub status: String,
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            success: true,
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
