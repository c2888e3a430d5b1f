//! In-memory Repository implementation.
//!
//! HashMap tables behind a `tokio::sync::RwLock`. Backs the server at startup
//! and provides the repository double for tests; a document database can
//! replace it behind the same trait.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Category, Product, Review, Role, User};
use crate::repo::{PriceSort, ProductFilter, RepoResult, Repository};

#[derive(Debug, Default)]
struct Tables {
    products: HashMap<Uuid, Product>,
    categories: HashMap<Uuid, Category>,
    reviews: HashMap<Uuid, Review>,
    users: HashMap<Uuid, User>,
}

// == Memory Repository ==
#[derive(Debug, Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository seeded with one admin user.
    ///
    /// The in-memory store starts empty on every boot, so the admin account
    /// has to be created here for the admin routes to be reachable.
    pub async fn with_admin(name: &str, email: &str) -> (Self, Uuid) {
        let repo = Self::new();
        let admin = User::new(name, email, Role::Admin);
        let admin_id = admin.id;
        repo.tables.write().await.users.insert(admin_id, admin);
        (repo, admin_id)
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn matches_filter(product: &Product, filter: &ProductFilter) -> bool {
    if let Some(search) = &filter.search {
        if !contains_ci(&product.name, search) {
            return false;
        }
    }
    if let Some(max_price) = filter.max_price {
        if product.price > max_price {
            return false;
        }
    }
    if let Some(brand) = &filter.brand {
        if !contains_ci(&product.brand, brand) {
            return false;
        }
    }
    if let Some(min_discount) = filter.min_discount {
        if product.discount.unwrap_or(0) < min_discount {
            return false;
        }
    }
    if let Some(min_ratings) = filter.min_ratings {
        if product.ratings < min_ratings {
            return false;
        }
    }
    true
}

#[async_trait]
impl Repository for MemoryRepository {
    // -- products --

    async fn product_by_id(&self, id: Uuid) -> RepoResult<Option<Product>> {
        Ok(self.tables.read().await.products.get(&id).cloned())
    }

    async fn latest_products(&self, limit: usize) -> RepoResult<Vec<Product>> {
        let tables = self.tables.read().await;
        let mut products: Vec<Product> = tables.products.values().cloned().collect();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        products.truncate(limit);
        Ok(products)
    }

    async fn all_products(&self) -> RepoResult<Vec<Product>> {
        let tables = self.tables.read().await;
        let mut products: Vec<Product> = tables.products.values().cloned().collect();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(products)
    }

    async fn filtered_products(
        &self,
        filter: &ProductFilter,
        page: usize,
        per_page: usize,
    ) -> RepoResult<(Vec<Product>, usize)> {
        let tables = self.tables.read().await;
        let mut matched: Vec<Product> = tables
            .products
            .values()
            .filter(|p| matches_filter(p, filter))
            .cloned()
            .collect();

        match filter.sort {
            Some(PriceSort::Asc) => matched.sort_by(|a, b| a.price.cmp(&b.price)),
            Some(PriceSort::Desc) => matched.sort_by(|a, b| b.price.cmp(&a.price)),
            None => matched.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        }

        let total_pages = matched.len().div_ceil(per_page.max(1));
        let page = page.max(1);
        let skip = (page - 1) * per_page;
        let page_items: Vec<Product> = matched.into_iter().skip(skip).take(per_page).collect();

        Ok((page_items, total_pages))
    }

    async fn products_matching_name(&self, fragment: &str) -> RepoResult<Vec<Product>> {
        let tables = self.tables.read().await;
        Ok(tables
            .products
            .values()
            .filter(|p| contains_ci(&p.name, fragment))
            .cloned()
            .collect())
    }

    async fn products_in_category(&self, category_id: Uuid) -> RepoResult<Vec<Product>> {
        let tables = self.tables.read().await;
        Ok(tables
            .products
            .values()
            .filter(|p| p.category == category_id)
            .cloned()
            .collect())
    }

    async fn related_products(
        &self,
        category_id: Uuid,
        exclude: Uuid,
        limit: usize,
    ) -> RepoResult<Vec<Product>> {
        let tables = self.tables.read().await;
        let mut related: Vec<Product> = tables
            .products
            .values()
            .filter(|p| p.category == category_id && p.id != exclude)
            .cloned()
            .collect();
        related.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        related.truncate(limit);
        Ok(related)
    }

    async fn create_product(&self, product: Product) -> RepoResult<()> {
        self.tables
            .write()
            .await
            .products
            .insert(product.id, product);
        Ok(())
    }

    async fn update_product(&self, product: Product) -> RepoResult<()> {
        self.tables
            .write()
            .await
            .products
            .insert(product.id, product);
        Ok(())
    }

    async fn delete_product(&self, id: Uuid) -> RepoResult<bool> {
        Ok(self.tables.write().await.products.remove(&id).is_some())
    }

    // -- categories --

    async fn category_by_id(&self, id: Uuid) -> RepoResult<Option<Category>> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn category_by_slug(&self, slug: &str) -> RepoResult<Option<Category>> {
        let tables = self.tables.read().await;
        Ok(tables
            .categories
            .values()
            .find(|c| c.slug == slug)
            .cloned())
    }

    async fn categories_matching_name(&self, fragment: &str) -> RepoResult<Vec<Category>> {
        let tables = self.tables.read().await;
        Ok(tables
            .categories
            .values()
            .filter(|c| contains_ci(&c.name, fragment))
            .cloned()
            .collect())
    }

    async fn all_categories(&self) -> RepoResult<Vec<Category>> {
        let tables = self.tables.read().await;
        let mut categories: Vec<Category> = tables.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn create_category(&self, category: Category) -> RepoResult<()> {
        self.tables
            .write()
            .await
            .categories
            .insert(category.id, category);
        Ok(())
    }

    async fn update_category(&self, category: Category) -> RepoResult<()> {
        self.tables
            .write()
            .await
            .categories
            .insert(category.id, category);
        Ok(())
    }

    async fn delete_category(&self, id: Uuid) -> RepoResult<bool> {
        Ok(self.tables.write().await.categories.remove(&id).is_some())
    }

    // -- reviews --

    async fn review_by_id(&self, id: Uuid) -> RepoResult<Option<Review>> {
        Ok(self.tables.read().await.reviews.get(&id).cloned())
    }

    async fn reviews_of_product(&self, product_id: Uuid) -> RepoResult<Vec<Review>> {
        let tables = self.tables.read().await;
        let mut reviews: Vec<Review> = tables
            .reviews
            .values()
            .filter(|r| r.product == product_id)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(reviews)
    }

    async fn review_by_user_and_product(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> RepoResult<Option<Review>> {
        let tables = self.tables.read().await;
        Ok(tables
            .reviews
            .values()
            .find(|r| r.user == user_id && r.product == product_id)
            .cloned())
    }

    async fn create_review(&self, review: Review) -> RepoResult<()> {
        self.tables.write().await.reviews.insert(review.id, review);
        Ok(())
    }

    async fn update_review(&self, review: Review) -> RepoResult<()> {
        self.tables.write().await.reviews.insert(review.id, review);
        Ok(())
    }

    async fn delete_review(&self, id: Uuid) -> RepoResult<bool> {
        Ok(self.tables.write().await.reviews.remove(&id).is_some())
    }

    // -- users --

    async fn user_by_id(&self, id: Uuid) -> RepoResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn create_user(&self, user: User) -> RepoResult<()> {
        self.tables.write().await.users.insert(user.id, user);
        Ok(())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn sample_product(name: &str, category: Uuid, price: u64, age_mins: i64) -> Product {
        let created = Utc::now() - Duration::minutes(age_mins);
        Product {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: crate::models::slugify(name),
            description: "desc".to_string(),
            photos: vec!["uploads/p.png".to_string()],
            category,
            price,
            stock: 5,
            ratings: 0,
            num_of_reviews: 0,
            discount: None,
            brand: "Acme".to_string(),
            dealer: "Admin".to_string(),
            created_at: created,
            updated_at: created,
        }
    }

    #[tokio::test]
    async fn test_latest_products_sorted_and_limited() {
        let repo = MemoryRepository::new();
        let category = Uuid::new_v4();
        repo.create_product(sample_product("Old", category, 100, 30))
            .await
            .unwrap();
        repo.create_product(sample_product("New", category, 100, 1))
            .await
            .unwrap();
        repo.create_product(sample_product("Middle", category, 100, 10))
            .await
            .unwrap();

        let latest = repo.latest_products(2).await.unwrap();
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].name, "New");
        assert_eq!(latest[1].name, "Middle");
    }

    #[tokio::test]
    async fn test_filtered_products_price_and_pagination() {
        let repo = MemoryRepository::new();
        let category = Uuid::new_v4();
        for (i, price) in [100u64, 200, 300, 400, 500].iter().enumerate() {
            repo.create_product(sample_product(&format!("P{i}"), category, *price, i as i64))
                .await
                .unwrap();
        }

        let filter = ProductFilter {
            max_price: Some(400),
            sort: Some(PriceSort::Asc),
            ..Default::default()
        };
        let (page, total_pages) = repo.filtered_products(&filter, 1, 3).await.unwrap();
        assert_eq!(total_pages, 2);
        assert_eq!(
            page.iter().map(|p| p.price).collect::<Vec<_>>(),
            vec![100, 200, 300]
        );

        let (page2, _) = repo.filtered_products(&filter, 2, 3).await.unwrap();
        assert_eq!(page2.len(), 1);
        assert_eq!(page2[0].price, 400);
    }

    #[tokio::test]
    async fn test_name_matching_is_case_insensitive() {
        let repo = MemoryRepository::new();
        let category = Uuid::new_v4();
        repo.create_product(sample_product("Galaxy S24", category, 100, 0))
            .await
            .unwrap();

        let hits = repo.products_matching_name("galaxy").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert!(repo.products_matching_name("pixel").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_related_products_excludes_self() {
        let repo = MemoryRepository::new();
        let category = Uuid::new_v4();
        let target = sample_product("Target", category, 100, 0);
        let target_id = target.id;
        repo.create_product(target).await.unwrap();
        repo.create_product(sample_product("Sibling", category, 100, 1))
            .await
            .unwrap();
        repo.create_product(sample_product("Stranger", Uuid::new_v4(), 100, 1))
            .await
            .unwrap();

        let related = repo.related_products(category, target_id, 8).await.unwrap();
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].name, "Sibling");
    }

    #[tokio::test]
    async fn test_category_by_slug() {
        let repo = MemoryRepository::new();
        let category = Category::new("Gaming Laptops");
        repo.create_category(category.clone()).await.unwrap();

        let found = repo.category_by_slug("gaming-laptops").await.unwrap();
        assert_eq!(found.unwrap().id, category.id);
        assert!(repo.category_by_slug("phones").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_with_admin_seeds_user() {
        let (repo, admin_id) = MemoryRepository::with_admin("Admin", "admin@example.com").await;
        let user = repo.user_by_id(admin_id).await.unwrap().unwrap();
        assert_eq!(user.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_review_by_user_and_product() {
        let repo = MemoryRepository::new();
        let user = Uuid::new_v4();
        let product = Uuid::new_v4();
        let review = Review {
            id: Uuid::new_v4(),
            comment: "ok".to_string(),
            rating: 4,
            user,
            product,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        repo.create_review(review.clone()).await.unwrap();

        let found = repo.review_by_user_and_product(user, product).await.unwrap();
        assert_eq!(found.unwrap().id, review.id);
        assert!(repo
            .review_by_user_and_product(Uuid::new_v4(), product)
            .await
            .unwrap()
            .is_none());
    }
}
