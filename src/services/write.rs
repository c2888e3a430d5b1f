//! Write Service
//!
//! Write-path orchestration: validate, mutate the repository, then hand the
//! cache invalidator a precise [`ChangeDescriptor`] before reporting success.
//! Invalidation is synchronous so the response is only sent once cache
//! consistency is restored. There is no compensating rollback: a failure after
//! the mutation leaves the repository as mutated (accepted gap).

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::cache::{CacheInvalidator, ChangeDescriptor};
use crate::error::{ApiError, Result};
use crate::models::{
    slugify, Category, NewCategoryRequest, NewProductRequest, NewReviewRequest, Product, Review,
    UpdateProductRequest,
};
use crate::repo::Repository;
use crate::services::ratings;

// == Write Service ==
#[derive(Clone)]
pub struct WriteService {
    repo: Arc<dyn Repository>,
    invalidator: CacheInvalidator,
}

impl WriteService {
    pub fn new(repo: Arc<dyn Repository>, invalidator: CacheInvalidator) -> Self {
        Self { repo, invalidator }
    }

    // -- products --

    /// Creates a product listed by `acting_user`.
    pub async fn create_product(
        &self,
        acting_user: Uuid,
        req: NewProductRequest,
    ) -> Result<Product> {
        if let Some(message) = req.validate() {
            return Err(ApiError::Validation(message));
        }

        let user = self
            .repo
            .user_by_id(acting_user)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("Invalid Credentials".to_string()))?;

        // A product must reference an existing category.
        if self.repo.category_by_id(req.category).await?.is_none() {
            return Err(ApiError::NotFound("Category not found".to_string()));
        }

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            slug: slugify(&req.name),
            name: req.name,
            description: req.description,
            photos: req.photos,
            category: req.category,
            price: req.price,
            stock: req.stock,
            ratings: 0,
            num_of_reviews: 0,
            discount: req.discount,
            brand: req.brand,
            dealer: user.name,
            created_at: now,
            updated_at: now,
        };

        self.repo.create_product(product.clone()).await?;
        info!(product = %product.id, "product created");

        self.invalidator
            .invalidate(&ChangeDescriptor::new().product().admin())
            .await?;

        Ok(product)
    }

    /// Applies a partial update to a product.
    pub async fn update_product(&self, id: Uuid, req: UpdateProductRequest) -> Result<Product> {
        let mut product = self
            .repo
            .product_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Product Not Found".to_string()))?;

        if let Some(name) = req.name {
            product.slug = slugify(&name);
            product.name = name;
        }
        if let Some(description) = req.description {
            product.description = description;
        }
        if let Some(price) = req.price {
            product.price = price;
        }
        if let Some(stock) = req.stock {
            product.stock = stock;
        }
        if let Some(category) = req.category {
            if self.repo.category_by_id(category).await?.is_none() {
                return Err(ApiError::NotFound("Category not found".to_string()));
            }
            product.category = category;
        }
        if let Some(brand) = req.brand {
            product.brand = brand;
        }
        if let Some(discount) = req.discount {
            product.discount = Some(discount);
        }
        if let Some(photos) = req.photos {
            if !photos.is_empty() {
                product.photos = photos;
            }
        }
        product.updated_at = Utc::now();

        self.repo.update_product(product.clone()).await?;

        self.invalidator
            .invalidate(&ChangeDescriptor::new().product_id(id).admin())
            .await?;

        Ok(product)
    }

    /// Deletes a product.
    pub async fn delete_product(&self, id: Uuid) -> Result<()> {
        if self
            .repo
            .product_by_id(id)
            .await?
            .is_none()
        {
            return Err(ApiError::NotFound("Product Not Found".to_string()));
        }

        self.repo.delete_product(id).await?;
        info!(product = %id, "product deleted");

        self.invalidator
            .invalidate(&ChangeDescriptor::new().product_id(id).admin())
            .await?;

        Ok(())
    }

    // -- categories --

    /// Creates a category; the slug is derived from the name and must be new.
    pub async fn create_category(&self, req: NewCategoryRequest) -> Result<Category> {
        if let Some(message) = req.validate() {
            return Err(ApiError::Validation(message));
        }

        let slug = slugify(&req.name);
        if self.repo.category_by_slug(&slug).await?.is_some() {
            return Err(ApiError::Validation("Category already exists".to_string()));
        }

        let category = Category::new(req.name);
        self.repo.create_category(category.clone()).await?;

        self.invalidator
            .invalidate(&ChangeDescriptor::new().category())
            .await?;

        Ok(category)
    }

    /// Renames a category, re-deriving its slug.
    pub async fn update_category(&self, id: Uuid, req: NewCategoryRequest) -> Result<Category> {
        if let Some(message) = req.validate() {
            return Err(ApiError::Validation(message));
        }

        let mut category = self
            .repo
            .category_by_id(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;

        category.slug = slugify(&req.name);
        category.name = req.name;
        category.updated_at = Utc::now();

        self.repo.update_category(category.clone()).await?;

        self.invalidator
            .invalidate(&ChangeDescriptor::new().category_id(id).admin())
            .await?;

        Ok(category)
    }

    /// Deletes a category.
    pub async fn delete_category(&self, id: Uuid) -> Result<()> {
        if self.repo.category_by_id(id).await?.is_none() {
            return Err(ApiError::NotFound("Category not found".to_string()));
        }

        self.repo.delete_category(id).await?;

        self.invalidator
            .invalidate(&ChangeDescriptor::new().category_id(id).admin())
            .await?;

        Ok(())
    }

    // -- reviews --

    /// Creates or updates the acting user's review of the product.
    ///
    /// One review per user per product: a repeat review updates in place.
    /// Returns true when an existing review was updated.
    pub async fn upsert_review(
        &self,
        acting_user: Uuid,
        product_id: Uuid,
        req: NewReviewRequest,
    ) -> Result<bool> {
        if let Some(message) = req.validate() {
            return Err(ApiError::Validation(message));
        }

        let user = self
            .repo
            .user_by_id(acting_user)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("Not Logged In".to_string()))?;

        let product = self
            .repo
            .product_by_id(product_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Product Not Found".to_string()))?;

        let existing = self
            .repo
            .review_by_user_and_product(user.id, product.id)
            .await?;
        let updated = existing.is_some();

        match existing {
            Some(mut review) => {
                review.comment = req.comment;
                review.rating = req.rating;
                review.updated_at = Utc::now();
                self.repo.update_review(review).await?;
            }
            None => {
                let now = Utc::now();
                self.repo
                    .create_review(Review {
                        id: Uuid::new_v4(),
                        comment: req.comment,
                        rating: req.rating,
                        user: user.id,
                        product: product.id,
                        created_at: now,
                        updated_at: now,
                    })
                    .await?;
            }
        }

        self.refresh_product_rating(product).await?;
        Ok(updated)
    }

    /// Deletes a review; only its author may do so.
    pub async fn delete_review(&self, acting_user: Uuid, review_id: Uuid) -> Result<()> {
        let user = self
            .repo
            .user_by_id(acting_user)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("Not Logged In".to_string()))?;

        let review = self
            .repo
            .review_by_id(review_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Review Not Found".to_string()))?;

        if review.user != user.id {
            return Err(ApiError::Forbidden("Not Authorized".to_string()));
        }

        self.repo.delete_review(review_id).await?;

        let product = self
            .repo
            .product_by_id(review.product)
            .await?
            .ok_or_else(|| ApiError::NotFound("Product Not Found".to_string()))?;

        self.refresh_product_rating_with_admin(product).await?;
        Ok(())
    }

    /// Recomputes and persists the product's derived rating fields, then
    /// invalidates the product and review keys.
    async fn refresh_product_rating(&self, mut product: Product) -> Result<()> {
        let summary = ratings::recompute(self.repo.as_ref(), product.id).await?;
        product.ratings = summary.ratings;
        product.num_of_reviews = summary.num_of_reviews;
        product.updated_at = Utc::now();
        let product_id = product.id;
        self.repo.update_product(product).await?;

        self.invalidator
            .invalidate(
                &ChangeDescriptor::new()
                    .product_id(product_id)
                    .review_id(product_id),
            )
            .await?;
        Ok(())
    }

    /// As [`Self::refresh_product_rating`], additionally staling the admin
    /// aggregates (review deletion shifts the dashboard counts).
    async fn refresh_product_rating_with_admin(&self, mut product: Product) -> Result<()> {
        let summary = ratings::recompute(self.repo.as_ref(), product.id).await?;
        product.ratings = summary.ratings;
        product.num_of_reviews = summary.num_of_reviews;
        product.updated_at = Utc::now();
        let product_id = product.id;
        self.repo.update_product(product).await?;

        self.invalidator
            .invalidate(
                &ChangeDescriptor::new()
                    .product_id(product_id)
                    .review_id(product_id)
                    .admin(),
            )
            .await?;
        Ok(())
    }
}
