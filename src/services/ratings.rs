//! Rating Aggregator
//!
//! Recomputes a product's derived rating fields from all of its reviews.
//! `Product.ratings` and `Product.num_of_reviews` are only ever written with
//! the output of [`recompute`].

use uuid::Uuid;

use crate::error::RepoError;
use crate::repo::Repository;

/// The derived rating fields of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingSummary {
    /// Floored integer mean of review ratings; 0 when there are no reviews
    pub ratings: u32,
    pub num_of_reviews: u32,
}

/// Reads all reviews of the product and recomputes its rating summary.
pub async fn recompute(
    repo: &dyn Repository,
    product_id: Uuid,
) -> Result<RatingSummary, RepoError> {
    let reviews = repo.reviews_of_product(product_id).await?;

    let num_of_reviews = reviews.len() as u32;
    let total: u32 = reviews.iter().map(|review| review.rating).sum();
    // Integer division floors the mean.
    let ratings = if num_of_reviews == 0 {
        0
    } else {
        total / num_of_reviews
    };

    Ok(RatingSummary {
        ratings,
        num_of_reviews,
    })
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::models::Review;
    use crate::repo::MemoryRepository;

    async fn seed_reviews(repo: &MemoryRepository, product_id: Uuid, ratings: &[u32]) {
        for rating in ratings {
            let review = Review {
                id: Uuid::new_v4(),
                comment: "c".to_string(),
                rating: *rating,
                user: Uuid::new_v4(),
                product: product_id,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            };
            repo.create_review(review).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_recompute_floors_mean() {
        let repo = MemoryRepository::new();
        let product_id = Uuid::new_v4();
        seed_reviews(&repo, product_id, &[3, 4, 5]).await;

        let summary = recompute(&repo, product_id).await.unwrap();
        assert_eq!(
            summary,
            RatingSummary {
                ratings: 4,
                num_of_reviews: 3
            }
        );
    }

    #[tokio::test]
    async fn test_recompute_floors_fractional_mean() {
        let repo = MemoryRepository::new();
        let product_id = Uuid::new_v4();
        seed_reviews(&repo, product_id, &[3, 4]).await;

        // 3.5 floors to 3
        let summary = recompute(&repo, product_id).await.unwrap();
        assert_eq!(summary.ratings, 3);
        assert_eq!(summary.num_of_reviews, 2);
    }

    #[tokio::test]
    async fn test_recompute_no_reviews() {
        let repo = MemoryRepository::new();

        let summary = recompute(&repo, Uuid::new_v4()).await.unwrap();
        assert_eq!(
            summary,
            RatingSummary {
                ratings: 0,
                num_of_reviews: 0
            }
        );
    }

    #[tokio::test]
    async fn test_recompute_ignores_other_products() {
        let repo = MemoryRepository::new();
        let product_id = Uuid::new_v4();
        seed_reviews(&repo, product_id, &[5]).await;
        seed_reviews(&repo, Uuid::new_v4(), &[1, 1, 1]).await;

        let summary = recompute(&repo, product_id).await.unwrap();
        assert_eq!(summary.ratings, 5);
        assert_eq!(summary.num_of_reviews, 1);
    }
}
