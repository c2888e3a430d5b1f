//! Request DTOs for the catalog API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;
use uuid::Uuid;

// == New Product ==
/// Request body for POST /product/new.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProductRequest {
    pub name: String,
    pub description: String,
    pub price: u64,
    pub stock: u32,
    pub category: Uuid,
    pub brand: String,
    #[serde(default)]
    pub discount: Option<u64>,
    /// Opaque photo paths produced by the upload layer
    #[serde(default)]
    pub photos: Vec<String>,
}

impl NewProductRequest {
    /// Validates the request data.
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.photos.is_empty() {
            return Some("Please upload at least one photo".to_string());
        }
        if self.name.trim().is_empty()
            || self.description.trim().is_empty()
            || self.brand.trim().is_empty()
        {
            return Some("All the fields are mandatory".to_string());
        }
        None
    }
}

// == Update Product ==
/// Request body for PUT /product/:id. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProductRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<u64>,
    #[serde(default)]
    pub stock: Option<u32>,
    #[serde(default)]
    pub category: Option<Uuid>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub discount: Option<u64>,
    #[serde(default)]
    pub photos: Option<Vec<String>>,
}

// == New Category ==
/// Request body for POST /category/new and PUT /category/:id.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCategoryRequest {
    pub name: String,
}

impl NewCategoryRequest {
    pub fn validate(&self) -> Option<String> {
        if self.name.trim().is_empty() {
            return Some("All the fields are mandatory".to_string());
        }
        None
    }
}

// == New Review ==
/// Request body for POST /product/review/new/:id.
#[derive(Debug, Clone, Deserialize)]
pub struct NewReviewRequest {
    pub comment: String,
    pub rating: u32,
}

impl NewReviewRequest {
    pub fn validate(&self) -> Option<String> {
        if !(1..=5).contains(&self.rating) {
            return Some("Rating must be between 1 and 5".to_string());
        }
        if self.comment.trim().is_empty() {
            return Some("Comment cannot be empty".to_string());
        }
        None
    }
}

// == Filtered Listing Query ==
/// Query string for GET /product/all (filtered, paginated, uncached).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductListingQuery {
    #[serde(default)]
    pub search: Option<String>,
    /// Upper price bound
    #[serde(default)]
    pub price: Option<u64>,
    #[serde(default)]
    pub brand: Option<String>,
    /// Lower discount bound
    #[serde(default)]
    pub discount: Option<u64>,
    /// Lower rating bound
    #[serde(default)]
    pub ratings: Option<u32>,
    /// "asc" or "desc" by price
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub page: Option<usize>,
}

// == Search Query ==
/// Query string for GET /product/search-data.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchDataQuery {
    #[serde(default)]
    pub query: Option<String>,
}

// == Acting User ==
/// The `?id=` query parameter carrying the acting user.
///
/// Session mechanics live outside this service; the role check resolves this
/// id against the user table.
#[derive(Debug, Clone, Deserialize)]
pub struct ActingUser {
    #[serde(default)]
    pub id: Option<Uuid>,
}
