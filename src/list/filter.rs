//! Client-side text search over a page of items.

use std::borrow::Cow;

use crate::resource::Resource;

/// Items having at least one field that contains `text`, ignoring case.
///
/// An empty `text` borrows the input unchanged.
pub fn filter<'a, R: Resource>(items: &'a [R], text: &str) -> Cow<'a, [R]> {
    if text.is_empty() {
        return Cow::Borrowed(items);
    }
    let needle = text.to_lowercase();
    Cow::Owned(
        items
            .iter()
            .filter(|item| matches_lowercase(*item, &needle))
            .cloned()
            .collect(),
    )
}

/// Whether any field of `item` contains `text`, ignoring case.
pub fn matches<R: Resource>(item: &R, text: &str) -> bool {
    matches_lowercase(item, &text.to_lowercase())
}

fn matches_lowercase<R: Resource>(item: &R, needle: &str) -> bool {
    item.search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}
