use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::error::{AppError, AppResult};

/// Lowest rating that counts as a positive signal
pub const LIKED_THRESHOLD: u8 = 4;

/// Highest star rating a user can give
pub const MAX_RATING: u8 = 5;

/// User-owned star ratings keyed by title identifier
///
/// Backed by a `BTreeMap` so iteration order, and therefore genre seeding,
/// is reproducible across runs. Every stored value is within
/// `1..=MAX_RATING`, including maps read back from persistence.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct RatingMap(BTreeMap<String, u8>);

impl RatingMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets or overwrites the rating for a title
    ///
    /// Takes the raw request value so that any integer outside
    /// `1..=MAX_RATING` is reported the same way.
    pub fn rate(&mut self, title_id: &str, rating: i64) -> AppResult<()> {
        if title_id.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Title id cannot be empty".to_string(),
            ));
        }
        let stars = valid_rating(title_id, rating).ok_or_else(|| {
            AppError::InvalidInput(format!(
                "Rating must be between 1 and {}, got {}",
                MAX_RATING, rating
            ))
        })?;

        self.0.insert(title_id.to_string(), stars);
        Ok(())
    }

    pub fn get(&self, title_id: &str) -> Option<u8> {
        self.0.get(title_id).copied()
    }

    pub fn contains(&self, title_id: &str) -> bool {
        self.0.contains_key(title_id)
    }

    pub fn is_liked(&self, title_id: &str) -> bool {
        self.get(title_id).is_some_and(|r| r >= LIKED_THRESHOLD)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn ids(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &u8)> {
        self.0.iter()
    }
}

fn valid_rating(title_id: &str, rating: i64) -> Option<u8> {
    if title_id.trim().is_empty() {
        return None;
    }
    u8::try_from(rating)
        .ok()
        .filter(|r| (1..=MAX_RATING).contains(r))
}

/// Drops entries that `rate` would have rejected
impl<'de> Deserialize<'de> for RatingMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, i64>::deserialize(deserializer)?;
        let total = raw.len();

        let ratings: BTreeMap<String, u8> = raw
            .into_iter()
            .filter_map(|(id, rating)| valid_rating(&id, rating).map(|r| (id, r)))
            .collect();

        if ratings.len() < total {
            tracing::warn!(
                dropped = total - ratings.len(),
                kept = ratings.len(),
                "Discarded out-of-range ratings"
            );
        }

        Ok(Self(ratings))
    }
}

impl<const N: usize> From<[(&str, u8); N]> for RatingMap {
    fn from(pairs: [(&str, u8); N]) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(id, rating)| (id.to_string(), rating))
                .collect(),
        )
    }
}
