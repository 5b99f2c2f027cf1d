//! Review rules: only buyers review, once per product.

use std::sync::Arc;

use shoestore_shared::Clock;
use tracing::{info, warn};
use validator::Validate;

use crate::domain::{Review, ReviewInput};
use crate::error::DomainError;
use crate::repositories::ReviewRepository;

pub struct ReviewService {
    reviews: Arc<dyn ReviewRepository>,
    clock: Arc<dyn Clock>,
}

impl ReviewService {
    pub fn new(reviews: Arc<dyn ReviewRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { reviews, clock }
    }

    pub async fn create(&self, user_id: i32, product_id: i32, input: ReviewInput) -> Result<Review, DomainError> {
        input.validate()?;

        if !self.reviews.has_purchased(user_id, product_id).await? {
            warn!("User {} tried to review product {} without buying it", user_id, product_id);
            return Err(DomainError::ProductNotPurchased);
        }
        if self.reviews.exists_for(product_id, user_id).await? {
            return Err(DomainError::DuplicateReview);
        }

        let review = self
            .reviews
            .create(product_id, user_id, &input, self.clock.now())
            .await?;
        info!("Review {} created for product {}", review.id, product_id);
        Ok(review)
    }

    pub async fn update(&self, id: i32, input: ReviewInput) -> Result<Review, DomainError> {
        input.validate()?;
        let mut review = self.reviews.find(id).await?.ok_or(DomainError::NotFound("Review"))?;

        if !self.reviews.update(id, &input).await? {
            return Err(DomainError::NotFound("Review"));
        }
        review.rating = input.rating;
        review.comment = input.comment;
        Ok(review)
    }

    pub async fn find(&self, id: i32) -> Result<Review, DomainError> {
        self.reviews.find(id).await?.ok_or(DomainError::NotFound("Review"))
    }

    pub async fn delete(&self, id: i32) -> Result<(), DomainError> {
        if !self.reviews.delete(id).await? {
            return Err(DomainError::NotFound("Review"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MockReviewRepository;
    use shoestore_shared::ManualClock;

    fn input(rating: i32) -> ReviewInput {
        ReviewInput { rating, comment: "Comfortable".into() }
    }

    fn service(repo: MockReviewRepository) -> ReviewService {
        ReviewService::new(Arc::new(repo), Arc::new(ManualClock::default()))
    }

    #[tokio::test]
    async fn test_rating_out_of_range_hits_no_storage() {
        let repo = MockReviewRepository::new();
        let err = service(repo).create(1, 2, input(6)).await.unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_requires_purchase() {
        let mut repo = MockReviewRepository::new();
        repo.expect_has_purchased().returning(|_, _| Ok(false));
        repo.expect_create().never();
        let err = service(repo).create(1, 2, input(5)).await.unwrap_err();
        assert!(matches!(err, DomainError::ProductNotPurchased));
    }

    #[tokio::test]
    async fn test_rejects_duplicate() {
        let mut repo = MockReviewRepository::new();
        repo.expect_has_purchased().returning(|_, _| Ok(true));
        repo.expect_exists_for().returning(|_, _| Ok(true));
        let err = service(repo).create(1, 2, input(4)).await.unwrap_err();
        assert!(matches!(err, DomainError::DuplicateReview));
    }

    #[tokio::test]
    async fn test_creates_review() {
        let mut repo = MockReviewRepository::new();
        repo.expect_has_purchased().returning(|_, _| Ok(true));
        repo.expect_exists_for().returning(|_, _| Ok(false));
        repo.expect_create().returning(|product_id, user_id, input, date| {
            Ok(Review {
                id: 10,
                product_id,
                user_id,
                rating: input.rating,
                comment: input.comment.clone(),
                date,
            })
        });
        let review = service(repo).create(1, 2, input(4)).await.unwrap();
        assert_eq!((review.id, review.product_id, review.user_id, review.rating), (10, 2, 1, 4));
    }
}
