//! Promotion model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A unique identifier for a promotion, using UUID v7 (time-sortable)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PromotionId(Uuid);

impl PromotionId {
    /// Create a new unique promotion ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for PromotionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PromotionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PromotionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A promotion record as served by the admin API.
///
/// `id` is immutable; `is_active` is the mutable status field that
/// participates in filter predicates and optimistic toggles. All other
/// attributes are carried opaquely through synchronization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    /// Unique identifier
    pub id: PromotionId,
    /// Display name
    pub name: String,
    /// Whether the promotion is currently enabled
    pub is_active: bool,
    /// Times the promotion has been redeemed
    pub usage_count: u64,
    /// End of validity (Unix ms), `None` when open-ended
    pub ends_at: Option<i64>,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
    /// Last update timestamp (Unix ms)
    pub updated_at: i64,
}

impl Promotion {
    /// Create a new active promotion with the given name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            id: PromotionId::new(),
            name: name.into(),
            is_active: true,
            usage_count: 0,
            ends_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether the promotion's validity window has ended as of `now_ms`
    #[must_use]
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        self.ends_at.is_some_and(|ends_at| ends_at < now_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_promotion_is_active_with_zero_usage() {
        let promo = Promotion::new("Summer sale");
        assert!(promo.is_active);
        assert_eq!(promo.usage_count, 0);
        assert_eq!(promo.ends_at, None);
    }

    #[test]
    fn id_round_trips_through_string() {
        let id = PromotionId::new();
        let parsed: PromotionId = id.as_str().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn expiry_compares_against_given_clock() {
        let mut promo = Promotion::new("Flash deal");
        assert!(!promo.is_expired_at(1_000));

        promo.ends_at = Some(500);
        assert!(promo.is_expired_at(1_000));
        assert!(!promo.is_expired_at(400));
    }
}
