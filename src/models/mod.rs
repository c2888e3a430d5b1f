//! Data model for the catalog API
//!
//! Persisted entities plus the request/response DTOs used for
//! serializing/deserializing HTTP bodies.

pub mod entities;
pub mod requests;
pub mod responses;

pub use entities::{slugify, Category, Product, Review, ReviewAuthor, ReviewView, Role, User};
pub use requests::{
    ActingUser, NewCategoryRequest, NewProductRequest, NewReviewRequest, ProductListingQuery,
    SearchDataQuery, UpdateProductRequest,
};
pub use responses::{
    CacheStatsResponse, CategoriesResponse, CategoryListingResponse, CategoryResponse,
    HealthResponse, MessageResponse, PagedProductsResponse, ProductResponse, ProductsResponse,
    ReviewsResponse,
};
