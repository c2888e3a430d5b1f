//! Cache Invalidation Module
//!
//! Translates a [`ChangeDescriptor`] into the exact set of cache keys made
//! stale by a write and removes them from the store. The derivation rules here
//! must mirror the read-path key construction in [`crate::services::query`];
//! both sides go through [`crate::cache::keys`] so a rule change cannot drift
//! on one side only.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::cache::{keys, CacheStore};
use crate::error::RepoError;
use crate::repo::Repository;

// == Change Descriptor ==
/// Describes one write's blast radius: which entity kinds changed and,
/// where known, which ids. Built by the write path, consumed once by
/// [`CacheInvalidator::invalidate`].
///
/// Flags are independent; a single write may set several (a review write also
/// touches the product's derived rating fields, so it sets both `review` and
/// `product`).
#[derive(Debug, Clone, Default)]
pub struct ChangeDescriptor {
    pub product: bool,
    pub category: bool,
    pub review: bool,
    pub order: bool,
    pub admin: bool,
    pub product_ids: Vec<Uuid>,
    pub category_ids: Vec<Uuid>,
    /// Ids whose `reviews-{id}`/`review-{id}` keys must go. The review listing
    /// read path keys by product id, so callers pass the product id here.
    pub review_ids: Vec<Uuid>,
    pub user_id: Option<Uuid>,
    pub order_id: Option<Uuid>,
}

impl ChangeDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a product change without a specific id (e.g. creation).
    pub fn product(mut self) -> Self {
        self.product = true;
        self
    }

    /// Marks a product change for a specific product.
    pub fn product_id(mut self, id: Uuid) -> Self {
        self.product = true;
        self.product_ids.push(id);
        self
    }

    /// Marks a category change without a specific id.
    pub fn category(mut self) -> Self {
        self.category = true;
        self
    }

    /// Marks a category change for a specific category.
    pub fn category_id(mut self, id: Uuid) -> Self {
        self.category = true;
        self.category_ids.push(id);
        self
    }

    /// Attaches a category id to a product change so the category's slug keys
    /// are invalidated too. Does not set the `category` flag.
    pub fn product_category(mut self, id: Uuid) -> Self {
        self.category_ids.push(id);
        self
    }

    /// Marks a review change for the given id.
    pub fn review_id(mut self, id: Uuid) -> Self {
        self.review = true;
        self.review_ids.push(id);
        self
    }

    /// Marks an order change.
    pub fn order(mut self, user_id: Option<Uuid>, order_id: Option<Uuid>) -> Self {
        self.order = true;
        self.user_id = user_id;
        self.order_id = order_id;
        self
    }

    /// Marks the admin dashboard aggregates stale.
    pub fn admin(mut self) -> Self {
        self.admin = true;
        self
    }
}

// == Cache Invalidator ==
/// Removes stale keys from the shared cache after a write.
///
/// Holds the repository so product-change invalidation can resolve category
/// ids to slugs; an id that no longer resolves is skipped silently, since the
/// corresponding slug keys either never existed or are already gone.
#[derive(Clone)]
pub struct CacheInvalidator {
    cache: Arc<RwLock<CacheStore>>,
    repo: Arc<dyn Repository>,
}

impl CacheInvalidator {
    pub fn new(cache: Arc<RwLock<CacheStore>>, repo: Arc<dyn Repository>) -> Self {
        Self { cache, repo }
    }

    /// Applies every rule matching the descriptor and deletes the derived keys.
    ///
    /// Runs synchronously inside the write path; the caller only reports
    /// success after this returns. Only a repository failure during slug
    /// resolution is an error.
    pub async fn invalidate(&self, change: &ChangeDescriptor) -> Result<(), RepoError> {
        let mut stale: Vec<String> = Vec::new();

        if change.product {
            stale.push(keys::latest_products().into_string());
            stale.push(keys::all_products().into_string());

            for id in &change.product_ids {
                stale.push(keys::product(*id).into_string());
                stale.push(keys::related_products(*id).into_string());
            }

            // Slug keys for any category touched by the product write.
            for id in &change.category_ids {
                if let Some(category) = self.repo.category_by_id(*id).await? {
                    stale.push(keys::category(&category.slug).into_string());
                    stale.push(keys::products_category(&category.slug).into_string());
                }
            }
        }

        if change.category {
            stale.push(keys::all_categories().into_string());
            for id in &change.category_ids {
                let id = id.to_string();
                stale.push(keys::category(&id).into_string());
                stale.push(keys::products_category(&id).into_string());
            }
        }

        if change.review {
            // Both forms per id; deleting an absent key is free.
            for id in &change.review_ids {
                stale.push(keys::reviews(*id).into_string());
                stale.push(keys::review(*id).into_string());
            }
        }

        if change.order {
            stale.push(keys::all_orders().into_string());
            if let Some(user_id) = change.user_id {
                stale.push(keys::my_orders(user_id).into_string());
            }
            if let Some(order_id) = change.order_id {
                stale.push(keys::order(order_id).into_string());
            }
        }

        if change.admin {
            stale.extend(keys::admin_keys().map(keys::CacheKey::into_string));
        }

        let mut cache = self.cache.write().await;

        // Search results are not indexable by the ids that changed, so every
        // search key goes on any product write.
        if change.product {
            let swept: Vec<String> = cache
                .keys()
                .into_iter()
                .filter(|key| key.starts_with(keys::SEARCH_PRODUCTS_PREFIX))
                .collect();
            stale.extend(swept);
        }

        debug!(keys = stale.len(), "invalidating cache keys");
        cache.delete_many(stale);

        Ok(())
    }
}
