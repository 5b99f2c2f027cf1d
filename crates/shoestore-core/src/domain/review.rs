//! Product reviews

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: i32,
    pub product_id: i32,
    pub user_id: i32,
    pub rating: i32,
    pub comment: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReviewInput {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,

    #[serde(default)]
    #[validate(length(max = 2000))]
    pub comment: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        for (rating, ok) in [(0, false), (1, true), (5, true), (6, false)] {
            let input = ReviewInput { rating, comment: String::new() };
            assert_eq!(input.validate().is_ok(), ok, "rating {}", rating);
        }
    }
}
