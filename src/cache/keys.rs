//! Cache Key Builders
//!
//! One builder per cache-key family. The read paths and the invalidator both
//! derive keys through these functions, so a key written on a read miss is
//! guaranteed to render identically to the key deleted on a write. Ad hoc
//! string formatting of cache keys anywhere else is a bug.

use std::fmt;

use uuid::Uuid;

// == Cache Key ==
/// A rendered cache key.
///
/// Newtype over the rendered string so key construction stays funneled through
/// this module.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Consumes the key, returning the rendered string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<CacheKey> for String {
    fn from(key: CacheKey) -> Self {
        key.0
    }
}

// == Key Families ==

/// Prefix shared by all search-result keys; swept in full on product writes.
pub const SEARCH_PRODUCTS_PREFIX: &str = "search-products-";

/// Key for the latest-products listing.
pub fn latest_products() -> CacheKey {
    CacheKey("latest-products".to_string())
}

/// Key for the unfiltered product listing.
pub fn all_products() -> CacheKey {
    CacheKey("all-products".to_string())
}

/// Key for a single product.
pub fn product(id: Uuid) -> CacheKey {
    CacheKey(format!("product-{id}"))
}

/// Key for a search-result listing.
pub fn search_products(query: &str) -> CacheKey {
    CacheKey(format!("{SEARCH_PRODUCTS_PREFIX}{query}"))
}

/// Key for the related-products listing of a product.
pub fn related_products(id: Uuid) -> CacheKey {
    CacheKey(format!("related-products-{id}"))
}

/// Key for the category listing.
pub fn all_categories() -> CacheKey {
    CacheKey("all-categories".to_string())
}

/// Key for a single category.
///
/// The family is addressed by slug on the read path and by raw id on category
/// invalidation, so the parameter is a plain string.
pub fn category(slug_or_id: &str) -> CacheKey {
    CacheKey(format!("category-{slug_or_id}"))
}

/// Key for the products-of-category listing. Same slug/id duality as
/// [`category`].
pub fn products_category(slug_or_id: &str) -> CacheKey {
    CacheKey(format!("products-category-{slug_or_id}"))
}

/// Key for the review listing of a product.
pub fn reviews(id: Uuid) -> CacheKey {
    CacheKey(format!("reviews-{id}"))
}

/// Key for a single review.
pub fn review(id: Uuid) -> CacheKey {
    CacheKey(format!("review-{id}"))
}

/// Key for the all-orders listing.
pub fn all_orders() -> CacheKey {
    CacheKey("all-orders".to_string())
}

/// Key for a user's order listing.
pub fn my_orders(user_id: Uuid) -> CacheKey {
    CacheKey(format!("my-orders-{user_id}"))
}

/// Key for a single order.
pub fn order(order_id: Uuid) -> CacheKey {
    CacheKey(format!("order-{order_id}"))
}

/// The fixed set of admin dashboard keys, invalidated together.
pub fn admin_keys() -> [CacheKey; 4] {
    [
        CacheKey("admin-stats".to_string()),
        CacheKey("admin-pie-charts".to_string()),
        CacheKey("admin-bar-charts".to_string()),
        CacheKey("admin-line-charts".to_string()),
    ]
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_keys_render_exactly() {
        assert_eq!(latest_products().as_ref(), "latest-products");
        assert_eq!(all_products().as_ref(), "all-products");
        assert_eq!(all_categories().as_ref(), "all-categories");
        assert_eq!(all_orders().as_ref(), "all-orders");
    }

    #[test]
    fn test_id_keys_render_exactly() {
        let id = Uuid::nil();
        assert_eq!(
            product(id).as_ref(),
            "product-00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(
            related_products(id).as_ref(),
            "related-products-00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(
            reviews(id).as_ref(),
            "reviews-00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(
            review(id).as_ref(),
            "review-00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(
            my_orders(id).as_ref(),
            "my-orders-00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(
            order(id).as_ref(),
            "order-00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_slug_keys() {
        assert_eq!(category("phones").as_ref(), "category-phones");
        assert_eq!(
            products_category("phones").as_ref(),
            "products-category-phones"
        );
    }

    #[test]
    fn test_search_key_carries_prefix() {
        let key = search_products("galaxy s24");
        assert_eq!(key.as_ref(), "search-products-galaxy s24");
        assert!(key.as_ref().starts_with(SEARCH_PRODUCTS_PREFIX));
    }

    #[test]
    fn test_admin_keys() {
        let keys = admin_keys();
        let rendered: Vec<&str> = keys.iter().map(|k| k.as_ref()).collect();
        assert_eq!(
            rendered,
            vec![
                "admin-stats",
                "admin-pie-charts",
                "admin-bar-charts",
                "admin-line-charts"
            ]
        );
    }
}
