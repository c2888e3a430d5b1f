//! Query Service
//!
//! Read-path orchestration: every read computes its canonical cache key,
//! returns the cached value on a hit and otherwise queries the repository,
//! populates the cache and returns the result. A repository miss surfaces as
//! `NotFound`; negative results are never cached.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::warn;
use uuid::Uuid;

use crate::cache::{keys, CacheKey, CacheStore, DERIVED_LISTING_TTL_SECS};
use crate::error::{ApiError, Result};
use crate::models::{Category, Product, ReviewView};
use crate::repo::{PriceSort, ProductFilter, Repository};

/// How many related products a listing returns.
const RELATED_PRODUCTS_LIMIT: usize = 8;

// == Query Service ==
#[derive(Clone)]
pub struct QueryService {
    cache: Arc<RwLock<CacheStore>>,
    repo: Arc<dyn Repository>,
    latest_limit: usize,
    per_page: usize,
}

impl QueryService {
    pub fn new(
        cache: Arc<RwLock<CacheStore>>,
        repo: Arc<dyn Repository>,
        latest_limit: usize,
        per_page: usize,
    ) -> Self {
        Self {
            cache,
            repo,
            latest_limit,
            per_page,
        }
    }

    // -- cache plumbing --

    /// Returns the deserialized cached value for the key, if present.
    ///
    /// An entry that fails to deserialize is dropped and treated as a miss;
    /// the read path then repopulates it.
    async fn cached<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let mut cache = self.cache.write().await;
        let raw = cache.get(key.as_ref())?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key = %key, %err, "dropping undeserializable cache entry");
                cache.delete(key.as_ref());
                None
            }
        }
    }

    /// Serializes and stores the value under the key.
    async fn store<T: Serialize>(&self, key: &CacheKey, value: &T, ttl: Option<u64>) -> Result<()> {
        let raw = serde_json::to_string(value)
            .map_err(|err| ApiError::Persistence(format!("cache serialization: {err}")))?;
        let mut cache = self.cache.write().await;
        cache.set(key.as_ref().to_string(), raw, ttl);
        Ok(())
    }

    // -- read operations --

    /// The most recently created products. Cached without TTL.
    pub async fn latest_products(&self) -> Result<Vec<Product>> {
        let key = keys::latest_products();
        if let Some(products) = self.cached(&key).await {
            return Ok(products);
        }

        let products = self.repo.latest_products(self.latest_limit).await?;
        self.store(&key, &products, None).await?;
        Ok(products)
    }

    /// The unfiltered product listing (admin view). Cached without TTL.
    pub async fn admin_products(&self) -> Result<Vec<Product>> {
        let key = keys::all_products();
        if let Some(products) = self.cached(&key).await {
            return Ok(products);
        }

        let products = self.repo.all_products().await?;
        self.store(&key, &products, None).await?;
        Ok(products)
    }

    /// A single product by id. Cached without TTL.
    pub async fn product(&self, id: Uuid) -> Result<Product> {
        let key = keys::product(id);
        if let Some(product) = self.cached(&key).await {
            return Ok(product);
        }

        let product = self
            .repo
            .product_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Product Not Found".to_string()))?;
        self.store(&key, &product, None).await?;
        Ok(product)
    }

    /// The filtered, paginated product listing. Deliberately uncached: the
    /// filter space is unbounded and there is no key family for it.
    pub async fn filtered_products(
        &self,
        filter: &ProductFilter,
        page: usize,
    ) -> Result<(Vec<Product>, usize)> {
        Ok(self
            .repo
            .filtered_products(filter, page, self.per_page)
            .await?)
    }

    /// Search by free-text query. Cached for an hour under the query string.
    ///
    /// Name matches win; if any category name matches, the result is the
    /// products of those categories instead. An empty result is NotFound and
    /// is not cached.
    pub async fn search(&self, query: &str) -> Result<Vec<Product>> {
        let key = keys::search_products(query);
        if let Some(products) = self.cached(&key).await {
            return Ok(products);
        }

        let mut products = self.repo.products_matching_name(query).await?;

        let categories = self.repo.categories_matching_name(query).await?;
        if !categories.is_empty() {
            let mut by_category = Vec::new();
            for category in &categories {
                by_category.extend(self.repo.products_in_category(category.id).await?);
            }
            products = by_category;
        }

        if products.is_empty() {
            return Err(ApiError::NotFound("No products found".to_string()));
        }

        self.store(&key, &products, Some(DERIVED_LISTING_TTL_SECS))
            .await?;
        Ok(products)
    }

    /// Products related to the given one (same category, excluding itself).
    /// Cached for an hour.
    pub async fn related_products(&self, product_id: Uuid) -> Result<Vec<Product>> {
        let product = self
            .repo
            .product_by_id(product_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

        let category = self
            .repo
            .category_by_id(product.category)
            .await?
            .ok_or_else(|| {
                ApiError::NotFound("Category not found for the product".to_string())
            })?;

        let key = keys::related_products(product_id);
        if let Some(products) = self.cached(&key).await {
            return Ok(products);
        }

        let related = self
            .repo
            .related_products(category.id, product_id, RELATED_PRODUCTS_LIMIT)
            .await?;
        self.store(&key, &related, Some(DERIVED_LISTING_TTL_SECS))
            .await?;
        Ok(related)
    }

    /// All categories. Cached without TTL.
    pub async fn all_categories(&self) -> Result<Vec<Category>> {
        let key = keys::all_categories();
        if let Some(categories) = self.cached(&key).await {
            return Ok(categories);
        }

        let categories = self.repo.all_categories().await?;
        self.store(&key, &categories, None).await?;
        Ok(categories)
    }

    /// A single category by slug. Cached without TTL.
    pub async fn category_by_slug(&self, slug: &str) -> Result<Category> {
        let key = keys::category(slug);
        if let Some(category) = self.cached(&key).await {
            return Ok(category);
        }

        let category = self
            .repo
            .category_by_slug(slug)
            .await?
            .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;
        self.store(&key, &category, None).await?;
        Ok(category)
    }

    /// A category and its products, cached under two keys without TTL.
    ///
    /// The two entries are populated together; a partial hit refetches both so
    /// they cannot drift apart.
    pub async fn category_listing(&self, slug: &str) -> Result<(Category, Vec<Product>)> {
        let category_key = keys::category(slug);
        let products_key = keys::products_category(slug);

        if let (Some(category), Some(products)) = (
            self.cached::<Category>(&category_key).await,
            self.cached::<Vec<Product>>(&products_key).await,
        ) {
            return Ok((category, products));
        }

        let category = self
            .repo
            .category_by_slug(slug)
            .await?
            .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;
        let products = self.repo.products_in_category(category.id).await?;

        self.store(&category_key, &category, None).await?;
        self.store(&products_key, &products, None).await?;
        Ok((category, products))
    }

    /// All reviews of a product, joined with their authors. Cached for an hour
    /// under the product id.
    pub async fn reviews_of_product(&self, product_id: Uuid) -> Result<Vec<ReviewView>> {
        let key = keys::reviews(product_id);
        if let Some(reviews) = self.cached(&key).await {
            return Ok(reviews);
        }

        let reviews = self.repo.reviews_of_product(product_id).await?;
        let mut views = Vec::with_capacity(reviews.len());
        for review in &reviews {
            // A review whose author no longer resolves is dropped from the
            // listing rather than failing the whole read.
            if let Some(author) = self.repo.user_by_id(review.user).await? {
                views.push(ReviewView::from_parts(review, &author));
            }
        }

        self.store(&key, &views, Some(DERIVED_LISTING_TTL_SECS))
            .await?;
        Ok(views)
    }
}

/// Parses the listing query's sort parameter.
pub fn parse_price_sort(sort: Option<&str>) -> Option<PriceSort> {
    match sort {
        Some("asc") => Some(PriceSort::Asc),
        Some("desc") => Some(PriceSort::Desc),
        _ => None,
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::models::{slugify, Review, Role, User};
    use crate::repo::MemoryRepository;

    struct Fixture {
        cache: Arc<RwLock<CacheStore>>,
        repo: Arc<MemoryRepository>,
        query: QueryService,
    }

    fn fixture() -> Fixture {
        let cache = Arc::new(RwLock::new(CacheStore::new()));
        let repo = Arc::new(MemoryRepository::new());
        let query = QueryService::new(cache.clone(), repo.clone() as Arc<dyn Repository>, 8, 8);
        Fixture { cache, repo, query }
    }

    fn product_named(name: &str, category: Uuid) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: slugify(name),
            description: "desc".to_string(),
            photos: vec!["uploads/p.png".to_string()],
            category,
            price: 100,
            stock: 3,
            ratings: 0,
            num_of_reviews: 0,
            discount: None,
            brand: "Acme".to_string(),
            dealer: "Admin".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_product_read_through_populates_cache() {
        let fx = fixture();
        let product = product_named("X1", Uuid::new_v4());
        let id = product.id;
        fx.repo.create_product(product).await.unwrap();

        let fetched = fx.query.product(id).await.unwrap();
        assert_eq!(fetched.name, "X1");

        let mut cache = fx.cache.write().await;
        assert!(cache.has(&format!("product-{id}")));
    }

    #[tokio::test]
    async fn test_second_read_served_from_cache() {
        let fx = fixture();
        let product = product_named("X1", Uuid::new_v4());
        let id = product.id;
        fx.repo.create_product(product).await.unwrap();

        fx.query.product(id).await.unwrap();

        // Remove the record under the cache; a cached read must not notice.
        fx.repo.delete_product(id).await.unwrap();
        let fetched = fx.query.product(id).await.unwrap();
        assert_eq!(fetched.name, "X1");
    }

    #[tokio::test]
    async fn test_product_miss_is_not_found_and_not_cached() {
        let fx = fixture();
        let id = Uuid::new_v4();

        let err = fx.query.product(id).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
        assert!(fx.cache.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_search_prefers_category_match() {
        let fx = fixture();
        let phones = crate::models::Category::new("Phones");
        let phones_id = phones.id;
        fx.repo.create_category(phones).await.unwrap();

        fx.repo
            .create_product(product_named("Phone Case", Uuid::new_v4()))
            .await
            .unwrap();
        fx.repo
            .create_product(product_named("X1", phones_id))
            .await
            .unwrap();

        // "phone" matches a category name, so category products win over the
        // name match.
        let results = fx.query.search("phone").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "X1");

        let mut cache = fx.cache.write().await;
        assert!(cache.has("search-products-phone"));
    }

    #[tokio::test]
    async fn test_search_empty_is_not_found_and_uncached() {
        let fx = fixture();

        let err = fx.query.search("nothing").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
        assert!(!fx.cache.write().await.has("search-products-nothing"));
    }

    #[tokio::test]
    async fn test_category_listing_populates_both_keys() {
        let fx = fixture();
        let category = crate::models::Category::new("Phones");
        let category_id = category.id;
        fx.repo.create_category(category).await.unwrap();
        fx.repo
            .create_product(product_named("X1", category_id))
            .await
            .unwrap();

        let (category, products) = fx.query.category_listing("phones").await.unwrap();
        assert_eq!(category.slug, "phones");
        assert_eq!(products.len(), 1);

        let mut cache = fx.cache.write().await;
        assert!(cache.has("category-phones"));
        assert!(cache.has("products-category-phones"));
    }

    #[tokio::test]
    async fn test_related_products_excludes_self() {
        let fx = fixture();
        let category = crate::models::Category::new("Phones");
        let category_id = category.id;
        fx.repo.create_category(category).await.unwrap();

        let target = product_named("X1", category_id);
        let target_id = target.id;
        fx.repo.create_product(target).await.unwrap();
        fx.repo
            .create_product(product_named("X2", category_id))
            .await
            .unwrap();

        let related = fx.query.related_products(target_id).await.unwrap();
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].name, "X2");

        let mut cache = fx.cache.write().await;
        assert!(cache.has(&format!("related-products-{target_id}")));
    }

    #[tokio::test]
    async fn test_reviews_join_author() {
        let fx = fixture();
        let user = User::new("Ada", "ada@example.com", Role::User);
        let user_id = user.id;
        fx.repo.create_user(user).await.unwrap();

        let product_id = Uuid::new_v4();
        fx.repo
            .create_review(Review {
                id: Uuid::new_v4(),
                comment: "Good".to_string(),
                rating: 5,
                user: user_id,
                product: product_id,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
            .await
            .unwrap();

        let views = fx.query.reviews_of_product(product_id).await.unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].user.name, "Ada");

        let mut cache = fx.cache.write().await;
        assert!(cache.has(&format!("reviews-{product_id}")));
    }

    #[tokio::test]
    async fn test_filtered_products_not_cached() {
        let fx = fixture();
        fx.repo
            .create_product(product_named("X1", Uuid::new_v4()))
            .await
            .unwrap();

        let (products, total_page) = fx
            .query
            .filtered_products(&ProductFilter::default(), 1)
            .await
            .unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(total_page, 1);
        assert!(fx.cache.read().await.is_empty());
    }

    #[test]
    fn test_parse_price_sort() {
        assert_eq!(parse_price_sort(Some("asc")), Some(PriceSort::Asc));
        assert_eq!(parse_price_sort(Some("desc")), Some(PriceSort::Desc));
        assert_eq!(parse_price_sort(Some("sideways")), None);
        assert_eq!(parse_price_sort(None), None);
    }
}
