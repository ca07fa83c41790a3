use serde::{Deserialize, Serialize};

/// Review aggregate attached to a product by the data store.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewSummary {
    pub count: u32,
    pub average_rating: f64,
}

impl ReviewSummary {
    pub fn from_ratings(ratings: &[u8]) -> Self {
        if ratings.is_empty() {
            return Self::default();
        }

        let sum: u32 = ratings.iter().map(|rating| u32::from(*rating)).sum();
        let count = ratings.len() as u32;
        Self { count, average_rating: f64::from(sum) / f64::from(count) }
    }
}
