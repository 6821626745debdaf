//! Seed lists: the provider links a batch starts from.
//!
//! Seeds are not validated here. A malformed seed fails during navigation
//! like any other unreachable address.

use std::collections::HashSet;

use tracing::debug;

/// Provider links used when no input is supplied.
pub const DEFAULT_SEEDS: &str = include_str!("../data/default_seeds.txt");

/// Ordered, de-duplicated seed URLs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedList {
    /// Seeds in first-occurrence order.
    pub seeds: Vec<String>,
    /// Number of repeated lines dropped.
    pub duplicates: usize,
}

impl SeedList {
    /// Returns true if there is nothing to process.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }

    /// Returns the number of seeds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    /// Iterates over the seeds in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.seeds.iter().map(String::as_str)
    }
}

/// Parses one seed per line.
///
/// Surrounding whitespace is trimmed; blank lines and `#` comments are
/// ignored; repeats keep their first position.
#[must_use]
pub fn parse_seed_list(text: &str) -> SeedList {
    let mut seen = HashSet::new();
    let mut list = SeedList::default();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if seen.insert(line) {
            list.seeds.push(line.to_string());
        } else {
            debug!(seed = line, "dropping duplicate seed");
            list.duplicates += 1;
        }
    }
    list
}

/// Returns the built-in provider list.
#[must_use]
pub fn default_seed_list() -> SeedList {
    parse_seed_list(DEFAULT_SEEDS)
}
