//! Typed search parameters for promotion list queries.
//!
//! Every recognized filter/sort key is a typed field rather than a loose
//! string bag, so an unknown key or a mistyped value cannot reach the wire.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::Promotion;

/// Default page size used when a caller does not pick one.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Sortable columns of the promotion list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    CreatedAt,
    Name,
    UsageCount,
    EndsAt,
}

impl SortKey {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreatedAt => "createdAt",
            Self::Name => "name",
            Self::UsageCount => "usageCount",
            Self::EndsAt => "endsAt",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortDir {
    Asc,
    #[default]
    Desc,
}

impl SortDir {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// One field of a [`SearchPatch`]: leave the current value, clear it, or set it.
///
/// The typed replacement for "a key present with a null value deletes the key".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldPatch<T> {
    #[default]
    Keep,
    Clear,
    Set(T),
}

impl<T: Clone> FieldPatch<T> {
    fn apply_to(&self, slot: &mut Option<T>) {
        match self {
            Self::Keep => {}
            Self::Clear => *slot = None,
            Self::Set(value) => *slot = Some(value.clone()),
        }
    }
}

/// Active filter, sort, and pagination state for the promotion list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    /// Constrain results to active (`true`) or inactive (`false`) promotions
    pub is_active: Option<bool>,
    /// Case-insensitive substring match on the promotion name
    pub name: Option<String>,
    pub sort_key: SortKey,
    pub sort_dir: SortDir,
    /// 1-based page cursor
    pub page: u32,
    pub page_size: u32,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            is_active: None,
            name: None,
            sort_key: SortKey::default(),
            sort_dir: SortDir::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Partial update merged into [`SearchParams`] by [`SearchParams::apply`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPatch {
    pub is_active: FieldPatch<bool>,
    pub name: FieldPatch<String>,
    pub sort_key: Option<SortKey>,
    pub sort_dir: Option<SortDir>,
    pub page_size: Option<u32>,
}

impl SearchParams {
    /// Merge a partial parameter update.
    ///
    /// Any apply resets the page cursor to 1, so a narrowed or widened
    /// filter can never leave the user on a now-out-of-range page.
    pub fn apply(&mut self, patch: &SearchPatch) {
        patch.is_active.apply_to(&mut self.is_active);
        patch.name.apply_to(&mut self.name);
        if let Some(sort_key) = patch.sort_key {
            self.sort_key = sort_key;
        }
        if let Some(sort_dir) = patch.sort_dir {
            self.sort_dir = sort_dir;
        }
        if let Some(page_size) = patch.page_size {
            self.page_size = page_size.max(1);
        }
        self.page = 1;
    }

    /// Move the page cursor without touching filters or sort.
    pub fn go_to_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    /// Whether the filter constrains the `is_active` field at all.
    #[must_use]
    pub const fn constrains_active(&self) -> bool {
        self.is_active.is_some()
    }

    /// Client mirror of the server's filter predicate.
    ///
    /// Used to predict whether a locally mutated record would survive a real
    /// refetch under these parameters.
    #[must_use]
    pub fn matches(&self, promotion: &Promotion) -> bool {
        if let Some(wanted) = self.is_active {
            if promotion.is_active != wanted {
                return false;
            }
        }
        if let Some(needle) = &self.name {
            if !promotion
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase())
            {
                return false;
            }
        }
        true
    }

    /// The same query with every filter cleared, rewound to page 1.
    ///
    /// Used for the summary fetch that feeds aggregate metrics.
    #[must_use]
    pub fn cleared_filters(&self) -> Self {
        Self {
            is_active: None,
            name: None,
            sort_key: self.sort_key,
            sort_dir: self.sort_dir,
            page: 1,
            page_size: self.page_size,
        }
    }

    /// Canonical token for cache keying: stable across field ordering because
    /// it is emitted in a fixed sequence.
    #[must_use]
    pub fn cache_token(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SearchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(active) = self.is_active {
            write!(f, "active={active}&")?;
        }
        if let Some(name) = &self.name {
            write!(f, "name={}&", name.to_lowercase())?;
        }
        write!(
            f,
            "sort={}:{}&page={}&size={}",
            self.sort_key.as_str(),
            self.sort_dir.as_str(),
            self.page,
            self.page_size
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn apply_always_resets_page_to_first() {
        let mut params = SearchParams {
            page: 7,
            ..SearchParams::default()
        };

        params.apply(&SearchPatch {
            is_active: FieldPatch::Set(true),
            ..SearchPatch::default()
        });
        assert_eq!(params.page, 1);

        params.go_to_page(4);
        params.apply(&SearchPatch::default());
        assert_eq!(params.page, 1);
    }

    #[test]
    fn clear_removes_a_filter_key() {
        let mut params = SearchParams {
            is_active: Some(true),
            name: Some("summer".to_string()),
            ..SearchParams::default()
        };

        params.apply(&SearchPatch {
            name: FieldPatch::Clear,
            ..SearchPatch::default()
        });

        assert_eq!(params.name, None);
        assert_eq!(params.is_active, Some(true));
    }

    #[test]
    fn keep_leaves_a_filter_untouched() {
        let mut params = SearchParams {
            is_active: Some(false),
            ..SearchParams::default()
        };

        params.apply(&SearchPatch {
            sort_dir: Some(SortDir::Asc),
            ..SearchPatch::default()
        });

        assert_eq!(params.is_active, Some(false));
        assert_eq!(params.sort_dir, SortDir::Asc);
    }

    #[test]
    fn matches_mirrors_active_and_name_constraints() {
        let mut promo = Promotion::new("Winter Clearance");
        let params = SearchParams {
            is_active: Some(true),
            name: Some("clear".to_string()),
            ..SearchParams::default()
        };

        assert!(params.matches(&promo));

        promo.is_active = false;
        assert!(!params.matches(&promo));

        promo.is_active = true;
        promo.name = "Spring Launch".to_string();
        assert!(!params.matches(&promo));
    }

    #[test]
    fn cleared_filters_keeps_sort_and_page_size() {
        let params = SearchParams {
            is_active: Some(true),
            name: Some("sale".to_string()),
            sort_key: SortKey::UsageCount,
            page: 5,
            page_size: 50,
            ..SearchParams::default()
        };

        let summary = params.cleared_filters();
        assert_eq!(summary.is_active, None);
        assert_eq!(summary.name, None);
        assert_eq!(summary.page, 1);
        assert_eq!(summary.page_size, 50);
        assert_eq!(summary.sort_key, SortKey::UsageCount);
    }

    #[test]
    fn cache_token_is_stable_and_distinguishes_filters() {
        let a = SearchParams::default();
        let b = SearchParams {
            is_active: Some(true),
            ..SearchParams::default()
        };

        assert_eq!(a.cache_token(), a.cache_token());
        assert_ne!(a.cache_token(), b.cache_token());
        assert_eq!(b.cache_token(), "active=true&sort=createdAt:desc&page=1&size=25");
    }
}
