//! API Routes
//!
//! Configures the Axum router with all catalog endpoints under `/api/v1`.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    all_categories_handler, all_products_handler, admin_products_handler, cache_stats_handler,
    category_listing_handler, delete_category_handler, delete_product_handler,
    delete_review_handler, get_category_handler, health_handler, latest_products_handler,
    new_category_handler, new_product_handler, new_review_handler, product_reviews_handler,
    related_products_handler, search_data_handler, single_product_handler,
    update_category_handler, update_product_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let product_routes = Router::new()
        .route("/latest", get(latest_products_handler))
        .route("/all", get(all_products_handler))
        .route("/search-data", get(search_data_handler))
        .route("/admin-products", get(admin_products_handler))
        .route("/new", post(new_product_handler))
        .route("/category/:slug", get(category_listing_handler))
        .route("/related/:id", get(related_products_handler))
        .route("/reviews/:id", get(product_reviews_handler))
        .route("/review/new/:id", post(new_review_handler))
        .route("/review/:id", delete(delete_review_handler))
        .route(
            "/:id",
            get(single_product_handler)
                .put(update_product_handler)
                .delete(delete_product_handler),
        );

    let category_routes = Router::new()
        .route("/all", get(all_categories_handler))
        .route("/new", post(new_category_handler))
        .route(
            "/:slug",
            get(get_category_handler)
                .put(update_category_handler)
                .delete(delete_category_handler),
        );

    Router::new()
        .nest("/api/v1/product", product_routes)
        .nest("/api/v1/category", category_routes)
        .route("/api/v1/cache/stats", get(cache_stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
