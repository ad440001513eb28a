use std::collections::HashSet;

use crate::domain::Item;

/// Sort newest first and drop repeated URLs.
///
/// The sort is stable, so items with equal `published` keep the order they
/// arrived in (configured source order, then entry order). Of several items
/// sharing a URL the first one after sorting wins.
pub fn dedupe_and_rank(mut items: Vec<Item>) -> Vec<Item> {
    items.sort_by(|a, b| b.published.cmp(&a.published));

    let mut seen = HashSet::with_capacity(items.len());
    items.retain(|item| seen.insert(item.url.clone()));
    items
}
