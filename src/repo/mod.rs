//! Repository Module
//!
//! Abstract persistence seam for the catalog. The services and the cache
//! invalidator depend only on the [`Repository`] trait; the document database
//! that backs production is an external collaborator behind this boundary.
//! [`MemoryRepository`] is the in-process implementation used at startup and
//! in tests.
//!
//! Lookup misses are `Ok(None)`; only backend I/O failures are `Err`.

mod memory;

pub use memory::MemoryRepository;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::RepoError;
use crate::models::{Category, Product, Review, User};

/// Convenience Result type for repository calls.
pub type RepoResult<T> = std::result::Result<T, RepoError>;

// == Product Filter ==
/// Filter for the paginated product listing.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Case-insensitive substring match on the product name
    pub search: Option<String>,
    /// Upper bound on price
    pub max_price: Option<u64>,
    /// Case-insensitive substring match on the brand
    pub brand: Option<String>,
    /// Lower bound on discount
    pub min_discount: Option<u64>,
    /// Lower bound on the derived rating
    pub min_ratings: Option<u32>,
    /// Optional price ordering
    pub sort: Option<PriceSort>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSort {
    Asc,
    Desc,
}

// == Repository Trait ==
#[async_trait]
pub trait Repository: Send + Sync {
    // -- products --
    async fn product_by_id(&self, id: Uuid) -> RepoResult<Option<Product>>;
    /// Most recently created products, newest first.
    async fn latest_products(&self, limit: usize) -> RepoResult<Vec<Product>>;
    async fn all_products(&self) -> RepoResult<Vec<Product>>;
    /// Filtered page of products plus the total page count for the filter.
    async fn filtered_products(
        &self,
        filter: &ProductFilter,
        page: usize,
        per_page: usize,
    ) -> RepoResult<(Vec<Product>, usize)>;
    /// Products whose name contains the fragment, case-insensitively.
    async fn products_matching_name(&self, fragment: &str) -> RepoResult<Vec<Product>>;
    async fn products_in_category(&self, category_id: Uuid) -> RepoResult<Vec<Product>>;
    /// Products sharing a category, excluding one product id.
    async fn related_products(
        &self,
        category_id: Uuid,
        exclude: Uuid,
        limit: usize,
    ) -> RepoResult<Vec<Product>>;
    async fn create_product(&self, product: Product) -> RepoResult<()>;
    /// Whole-entity save; the product must already exist.
    async fn update_product(&self, product: Product) -> RepoResult<()>;
    /// Returns true if a product was removed.
    async fn delete_product(&self, id: Uuid) -> RepoResult<bool>;

    // -- categories --
    async fn category_by_id(&self, id: Uuid) -> RepoResult<Option<Category>>;
    async fn category_by_slug(&self, slug: &str) -> RepoResult<Option<Category>>;
    /// Categories whose name contains the fragment, case-insensitively.
    async fn categories_matching_name(&self, fragment: &str) -> RepoResult<Vec<Category>>;
    async fn all_categories(&self) -> RepoResult<Vec<Category>>;
    async fn create_category(&self, category: Category) -> RepoResult<()>;
    async fn update_category(&self, category: Category) -> RepoResult<()>;
    async fn delete_category(&self, id: Uuid) -> RepoResult<bool>;

    // -- reviews --
    async fn review_by_id(&self, id: Uuid) -> RepoResult<Option<Review>>;
    /// All reviews of a product, most recently updated first.
    async fn reviews_of_product(&self, product_id: Uuid) -> RepoResult<Vec<Review>>;
    async fn review_by_user_and_product(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> RepoResult<Option<Review>>;
    async fn create_review(&self, review: Review) -> RepoResult<()>;
    async fn update_review(&self, review: Review) -> RepoResult<()>;
    async fn delete_review(&self, id: Uuid) -> RepoResult<bool>;

    // -- users --
    async fn user_by_id(&self, id: Uuid) -> RepoResult<Option<User>>;
    async fn create_user(&self, user: User) -> RepoResult<()>;
}
