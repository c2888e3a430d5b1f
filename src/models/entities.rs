//! Persisted catalog entities.
//!
//! Products reference their Category by id; Reviews reference a Product and a
//! User by id. `Product.ratings` and `Product.num_of_reviews` are derived
//! fields, recomputed by the rating aggregator after every review write and
//! never assigned directly by other write paths.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// == Product ==
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    /// Opaque photo paths; file storage is handled outside this service
    pub photos: Vec<String>,
    /// References an existing Category
    pub category: Uuid,
    pub price: u64,
    pub stock: u32,
    /// Derived: floored average of review ratings
    pub ratings: u32,
    /// Derived: number of reviews
    pub num_of_reviews: u32,
    pub discount: Option<u64>,
    pub brand: String,
    /// Name of the user who listed the product
    pub dealer: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// == Category ==
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Builds a new category with a slug derived from the name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            slug: slugify(&name),
            name,
            created_at: now,
            updated_at: now,
        }
    }
}

// == Review ==
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub comment: String,
    /// 1 to 5
    pub rating: u32,
    /// References an existing User
    pub user: Uuid,
    /// References an existing Product
    pub product: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// == User ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub photo: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            photo: String::new(),
            role,
            created_at: Utc::now(),
        }
    }
}

// == Review View ==
/// A review joined with its author, as served by the review-listing read path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewView {
    pub id: Uuid,
    pub comment: String,
    pub rating: u32,
    pub product: Uuid,
    pub user: ReviewAuthor,
    pub updated_at: DateTime<Utc>,
}

/// The author projection embedded in a [`ReviewView`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewAuthor {
    pub id: Uuid,
    pub name: String,
    pub photo: String,
}

impl ReviewView {
    pub fn from_parts(review: &Review, author: &User) -> Self {
        Self {
            id: review.id,
            comment: review.comment.clone(),
            rating: review.rating,
            product: review.product,
            user: ReviewAuthor {
                id: author.id,
                name: author.name.clone(),
                photo: author.photo.clone(),
            },
            updated_at: review.updated_at,
        }
    }
}

// == Slug Derivation ==
/// Derives a URL-safe slug from a display name.
///
/// Lowercases, maps runs of non-alphanumeric characters to a single hyphen and
/// trims leading/trailing hyphens.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_hyphen = true;

    for ch in name.chars() {
        if ch.is_alphanumeric() {
            for lower in ch.to_lowercase() {
                slug.push(lower);
            }
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    slug.trim_end_matches('-').to_string()
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Phones"), "phones");
        assert_eq!(slugify("Gaming Laptops"), "gaming-laptops");
    }

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(slugify("Audio  &  Video"), "audio-video");
        assert_eq!(slugify("  spaced out  "), "spaced-out");
    }

    #[test]
    fn test_category_new_derives_slug() {
        let category = Category::new("Smart Home");
        assert_eq!(category.slug, "smart-home");
        assert_eq!(category.name, "Smart Home");
    }

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        let role: Role = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, Role::User);
    }

    #[test]
    fn test_review_view_projection() {
        let user = User::new("Ada", "ada@example.com", Role::User);
        let review = Review {
            id: Uuid::new_v4(),
            comment: "Solid".to_string(),
            rating: 4,
            user: user.id,
            product: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let view = ReviewView::from_parts(&review, &user);
        assert_eq!(view.user.name, "Ada");
        assert_eq!(view.rating, 4);
        assert_eq!(view.product, review.product);
    }
}
