//! Pure derivations over the catalog: the daily entry, search results and favorites.

use chrono::{DateTime, Datelike, TimeZone};
use std::collections::BTreeSet;

use crate::catalog::{Category, CategoryFilter, SlangEntry};

const SECONDS_PER_DAY: i64 = 86_400;

/// Selected dictionary filters. Never empty: falls back to `All`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySelection {
    selected: Vec<CategoryFilter>,
}

impl CategorySelection {
    /// The `{All}` selection
    pub fn all() -> Self {
        Self {
            selected: vec![CategoryFilter::All],
        }
    }

    /// A selection holding exactly one category
    pub fn only(category: Category) -> Self {
        Self {
            selected: vec![CategoryFilter::Only(category)],
        }
    }

    /// Build from an arbitrary list; an empty list means `{All}`
    pub fn from_filters(filters: impl IntoIterator<Item = CategoryFilter>) -> Self {
        let mut selection = Self { selected: Vec::new() };
        for filter in filters {
            if !selection.selected.contains(&filter) {
                selection.selected.push(filter);
            }
        }
        if selection.selected.is_empty() {
            return Self::all();
        }
        selection
    }

    /// Toggle a chip and return the resulting selection.
    ///
    /// Toggling `All` always yields `{All}`. Toggling a category drops `All`,
    /// flips membership of the category and falls back to `{All}` when nothing is left.
    pub fn toggled(&self, filter: CategoryFilter) -> Self {
        if filter == CategoryFilter::All {
            return Self::all();
        }

        let mut next: Vec<CategoryFilter> = self
            .selected
            .iter()
            .copied()
            .filter(|f| *f != CategoryFilter::All)
            .collect();

        if let Some(pos) = next.iter().position(|f| *f == filter) {
            next.remove(pos);
        } else {
            next.push(filter);
        }

        if next.is_empty() {
            Self::all()
        } else {
            Self { selected: next }
        }
    }

    pub fn contains(&self, filter: CategoryFilter) -> bool {
        self.selected.contains(&filter)
    }

    pub fn is_all(&self) -> bool {
        self.contains(CategoryFilter::All)
    }

    /// Whether an entry of this category passes the filter
    pub fn admits(&self, category: Category) -> bool {
        self.is_all() || self.contains(CategoryFilter::Only(category))
    }

    pub fn filters(&self) -> &[CategoryFilter] {
        &self.selected
    }
}

impl Default for CategorySelection {
    fn default() -> Self {
        Self::all()
    }
}

/// Whole days elapsed since 1 January of `now`'s year, in `now`'s time zone
pub fn day_of_year<Tz: TimeZone>(now: &DateTime<Tz>) -> i64 {
    match now
        .timezone()
        .with_ymd_and_hms(now.year(), 1, 1, 0, 0, 0)
        .earliest()
    {
        Some(start) => (now.timestamp() - start.timestamp()).div_euclid(SECONDS_PER_DAY),
        None => i64::from(now.ordinal0()),
    }
}

/// Featured entry for the day containing `now`.
///
/// # Panics
///
/// `catalog` must not be empty.
pub fn entry_of_the_day<'a, Tz: TimeZone>(
    catalog: &'a [SlangEntry],
    now: &DateTime<Tz>,
) -> &'a SlangEntry {
    let index = day_of_year(now).rem_euclid(catalog.len() as i64) as usize;
    &catalog[index]
}

/// Entries whose term or definition contains `query` (case-insensitive)
/// and whose category passes `categories`. Catalog order is preserved.
pub fn search<'a>(
    catalog: &'a [SlangEntry],
    query: &str,
    categories: &CategorySelection,
) -> Vec<&'a SlangEntry> {
    let query = query.trim().to_lowercase();
    catalog
        .iter()
        .filter(|entry| {
            let matches_text = entry.term.to_lowercase().contains(&query)
                || entry.definition.to_lowercase().contains(&query);
            matches_text && categories.admits(entry.category)
        })
        .collect()
}

/// Favorited entries in catalog order. Unknown ids are ignored.
pub fn favorites_of<'a>(
    catalog: &'a [SlangEntry],
    favorite_ids: &BTreeSet<String>,
) -> Vec<&'a SlangEntry> {
    catalog
        .iter()
        .filter(|entry| favorite_ids.contains(&entry.id))
        .collect()
}
