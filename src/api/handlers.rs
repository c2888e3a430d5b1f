//! API Handlers
//!
//! HTTP request handlers for the catalog endpoints. Handlers are thin: they
//! extract parameters, delegate to the query/write services and wrap the
//! result in a `{success, ...}` body. Errors propagate to the boundary, where
//! [`crate::error::ApiError`] maps them to response codes.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::cache::{CacheInvalidator, CacheStore};
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::models::{
    ActingUser, CacheStatsResponse, CategoriesResponse, CategoryListingResponse, CategoryResponse,
    HealthResponse, MessageResponse, NewCategoryRequest, NewProductRequest, NewReviewRequest,
    PagedProductsResponse, ProductListingQuery, ProductResponse, ProductsResponse,
    ReviewsResponse, Role, SearchDataQuery, UpdateProductRequest, User,
};
use crate::repo::{ProductFilter, Repository};
use crate::services::{query::parse_price_sort, QueryService, WriteService};

// == App State ==
/// Application state shared across all handlers.
///
/// Owns the single process-wide cache store (behind `Arc<RwLock<_>>`) and the
/// repository, both injected into the services at construction.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<RwLock<CacheStore>>,
    pub repo: Arc<dyn Repository>,
    pub query: QueryService,
    pub write: WriteService,
}

impl AppState {
    /// Wires the services around one shared cache and repository.
    pub fn new(cache: CacheStore, repo: Arc<dyn Repository>, config: &Config) -> Self {
        let cache = Arc::new(RwLock::new(cache));
        let query = QueryService::new(
            cache.clone(),
            repo.clone(),
            config.latest_products_limit,
            config.product_per_page,
        );
        let invalidator = CacheInvalidator::new(cache.clone(), repo.clone());
        let write = WriteService::new(repo.clone(), invalidator);
        Self {
            cache,
            repo,
            query,
            write,
        }
    }
}

// == Role Check ==
/// Resolves the acting user from the `?id=` parameter.
async fn require_user(state: &AppState, acting: &ActingUser) -> Result<User> {
    let id = acting
        .id
        .ok_or_else(|| ApiError::Unauthorized("Login Required".to_string()))?;
    state
        .repo
        .user_by_id(id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid Credentials".to_string()))
}

/// As [`require_user`], additionally requiring the admin role.
async fn require_admin(state: &AppState, acting: &ActingUser) -> Result<User> {
    let user = require_user(state, acting).await?;
    if user.role != Role::Admin {
        return Err(ApiError::Forbidden("Admin role required".to_string()));
    }
    Ok(user)
}

// == Product Read Handlers ==

/// GET /product/latest
pub async fn latest_products_handler(
    State(state): State<AppState>,
) -> Result<Json<ProductsResponse>> {
    let products = state.query.latest_products().await?;
    Ok(Json(ProductsResponse::new(products)))
}

/// GET /product/all — filtered, paginated, uncached.
pub async fn all_products_handler(
    State(state): State<AppState>,
    Query(params): Query<ProductListingQuery>,
) -> Result<Json<PagedProductsResponse>> {
    let filter = ProductFilter {
        search: params.search,
        max_price: params.price,
        brand: params.brand,
        min_discount: params.discount,
        min_ratings: params.ratings,
        sort: parse_price_sort(params.sort.as_deref()),
    };
    let page = params.page.unwrap_or(1);

    let (products, total_page) = state.query.filtered_products(&filter, page).await?;
    Ok(Json(PagedProductsResponse::new(products, total_page)))
}

/// GET /product/search-data?query=
pub async fn search_data_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchDataQuery>,
) -> Result<Json<ProductsResponse>> {
    let query = params
        .query
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| ApiError::NotFound("No products found".to_string()))?;

    let products = state.query.search(&query).await?;
    Ok(Json(ProductsResponse::new(products)))
}

/// GET /product/admin-products (admin)
pub async fn admin_products_handler(
    State(state): State<AppState>,
    Query(acting): Query<ActingUser>,
) -> Result<Json<ProductsResponse>> {
    require_admin(&state, &acting).await?;
    let products = state.query.admin_products().await?;
    Ok(Json(ProductsResponse::new(products)))
}

/// GET /product/:id
pub async fn single_product_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductResponse>> {
    let product = state.query.product(id).await?;
    Ok(Json(ProductResponse::new(product)))
}

/// GET /product/related/:id
pub async fn related_products_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductsResponse>> {
    let products = state.query.related_products(id).await?;
    Ok(Json(ProductsResponse::new(products)))
}

/// GET /product/category/:slug — category plus its products.
pub async fn category_listing_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<CategoryListingResponse>> {
    let (category, products) = state.query.category_listing(&slug).await?;
    Ok(Json(CategoryListingResponse::new(category, products)))
}

// == Product Write Handlers ==

/// POST /product/new (admin)
pub async fn new_product_handler(
    State(state): State<AppState>,
    Query(acting): Query<ActingUser>,
    Json(req): Json<NewProductRequest>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    let admin = require_admin(&state, &acting).await?;
    state.write.create_product(admin.id, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Product Created Successfully")),
    ))
}

/// PUT /product/:id (admin)
pub async fn update_product_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(acting): Query<ActingUser>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<Json<MessageResponse>> {
    require_admin(&state, &acting).await?;
    state.write.update_product(id, req).await?;
    Ok(Json(MessageResponse::new("Product Updated Successfully")))
}

/// DELETE /product/:id (admin)
pub async fn delete_product_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(acting): Query<ActingUser>,
) -> Result<Json<MessageResponse>> {
    require_admin(&state, &acting).await?;
    state.write.delete_product(id).await?;
    Ok(Json(MessageResponse::new("Product Deleted Successfully")))
}

// == Review Handlers ==

/// GET /product/reviews/:id — reviews of a product.
pub async fn product_reviews_handler(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<ReviewsResponse>> {
    let reviews = state.query.reviews_of_product(product_id).await?;
    Ok(Json(ReviewsResponse::new(reviews)))
}

/// POST /product/review/new/:id — create or update the caller's review.
pub async fn new_review_handler(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Query(acting): Query<ActingUser>,
    Json(req): Json<NewReviewRequest>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    let user = require_user(&state, &acting).await?;
    let updated = state.write.upsert_review(user.id, product_id, req).await?;
    let (status, message) = if updated {
        (StatusCode::OK, "Review Updated")
    } else {
        (StatusCode::CREATED, "Review Added")
    };
    Ok((status, Json(MessageResponse::new(message))))
}

/// DELETE /product/review/:id
pub async fn delete_review_handler(
    State(state): State<AppState>,
    Path(review_id): Path<Uuid>,
    Query(acting): Query<ActingUser>,
) -> Result<Json<MessageResponse>> {
    let user = require_user(&state, &acting).await?;
    state.write.delete_review(user.id, review_id).await?;
    Ok(Json(MessageResponse::new("Review Deleted")))
}

// == Category Handlers ==

/// GET /category/all
pub async fn all_categories_handler(
    State(state): State<AppState>,
) -> Result<Json<CategoriesResponse>> {
    let categories = state.query.all_categories().await?;
    Ok(Json(CategoriesResponse::new(categories)))
}

/// GET /category/:slug
pub async fn get_category_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<CategoryResponse>> {
    let category = state.query.category_by_slug(&slug).await?;
    Ok(Json(CategoryResponse::new(category)))
}

/// POST /category/new (admin)
pub async fn new_category_handler(
    State(state): State<AppState>,
    Query(acting): Query<ActingUser>,
    Json(req): Json<NewCategoryRequest>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    require_admin(&state, &acting).await?;
    state.write.create_category(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Category Created Successfully")),
    ))
}

/// PUT /category/:id (admin)
pub async fn update_category_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(acting): Query<ActingUser>,
    Json(req): Json<NewCategoryRequest>,
) -> Result<Json<CategoryResponse>> {
    require_admin(&state, &acting).await?;
    let category = state.write.update_category(id, req).await?;
    Ok(Json(CategoryResponse::new(category)))
}

/// DELETE /category/:id (admin)
pub async fn delete_category_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(acting): Query<ActingUser>,
) -> Result<Json<MessageResponse>> {
    require_admin(&state, &acting).await?;
    state.write.delete_category(id).await?;
    Ok(Json(MessageResponse::new(
        "Category deleted successfully",
    )))
}

// == Operational Handlers ==

/// GET /cache/stats
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<CacheStatsResponse> {
    let stats = state.cache.read().await.stats();
    Json(CacheStatsResponse::new(&stats))
}

/// GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::MemoryRepository;

    async fn test_state() -> (AppState, Uuid) {
        let (repo, admin_id) = MemoryRepository::with_admin("Admin", "admin@example.com").await;
        let state = AppState::new(
            CacheStore::new(),
            Arc::new(repo) as Arc<dyn Repository>,
            &Config::default(),
        );
        (state, admin_id)
    }

    #[tokio::test]
    async fn test_require_admin_accepts_admin() {
        let (state, admin_id) = test_state().await;
        let user = require_admin(&state, &ActingUser { id: Some(admin_id) })
            .await
            .unwrap();
        assert_eq!(user.name, "Admin");
    }

    #[tokio::test]
    async fn test_require_admin_without_id() {
        let (state, _) = test_state().await;
        let err = require_admin(&state, &ActingUser { id: None })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_require_admin_rejects_plain_user() {
        let (state, _) = test_state().await;
        let user = User::new("Ada", "ada@example.com", Role::User);
        let user_id = user.id;
        state.repo.create_user(user).await.unwrap();

        let err = require_admin(&state, &ActingUser { id: Some(user_id) })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.0.status, "healthy");
    }

    #[tokio::test]
    async fn test_cache_stats_handler_starts_empty() {
        let (state, _) = test_state().await;
        let response = cache_stats_handler(State(state)).await;
        assert_eq!(response.0.hits, 0);
        assert_eq!(response.0.total_entries, 0);
    }
}
