//! Checkbox state that survives refreshes.

use std::collections::HashMap;

use crate::error::SelectionError;
use crate::resource::Resource;

/// Selected items, in the order they were picked, unique by id.
#[derive(Debug, Clone)]
pub struct Selection<R: Resource> {
    items: Vec<R>,
}

impl<R: Resource> Default for Selection<R> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<R: Resource> Selection<R> {
    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &R::Id> {
        self.items.iter().map(Resource::id)
    }

    pub fn contains(&self, id: &R::Id) -> bool {
        self.items.iter().any(|item| item.id() == id)
    }

    pub fn is_checked(&self, item: &R) -> bool {
        self.contains(item.id())
    }

    /// Adds `item`, or refreshes the stored copy if its id is already selected.
    pub fn select(&mut self, item: R) {
        match self.items.iter_mut().find(|held| held.id() == item.id()) {
            Some(held) => *held = item,
            None => self.items.push(item),
        }
    }

    pub fn select_all(&mut self, items: impl IntoIterator<Item = R>) {
        for item in items {
            self.select(item);
        }
    }

    /// Removes the item with `id`, returning it if it was selected.
    pub fn deselect(&mut self, id: &R::Id) -> Option<R> {
        let pos = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(pos))
    }

    /// Flips the checkbox for `item`; returns whether it is now selected.
    pub fn toggle(&mut self, item: R) -> bool {
        if self.deselect(item.id()).is_some() {
            false
        } else {
            self.items.push(item);
            true
        }
    }

    pub fn set_checked(&mut self, item: R, checked: bool) {
        if checked {
            self.select(item);
        } else {
            self.deselect(item.id());
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// The only selected item, for operations such as edit.
    pub fn single(&self) -> Result<&R, SelectionError> {
        match self.items.as_slice() {
            [item] => Ok(item),
            [] => Err(SelectionError::NothingSelected),
            items => Err(SelectionError::MultipleSelected(items.len())),
        }
    }

    /// Re-resolves every selected id against a fresh snapshot.
    ///
    /// Ids still present take the snapshot's field values; ids that vanished
    /// are dropped. Returns the number dropped.
    pub fn reconcile(&mut self, snapshot: &[R]) -> usize {
        let by_id: HashMap<&R::Id, &R> = snapshot.iter().map(|item| (item.id(), item)).collect();
        let before = self.items.len();
        self.items.retain_mut(|held| match by_id.get(held.id()) {
            Some(fresh) => {
                held.clone_from(fresh);
                true
            }
            None => false,
        });
        before - self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::User;

    fn user(id: i64, name: &str) -> User {
        let mut user = User {
            username: name.to_owned(),
            ..Default::default()
        };
        user.meta.id = id;
        user
    }

    #[test]
    fn toggle_by_id() {
        let mut selection = Selection::default();
        assert!(selection.toggle(user(1, "a")));
        assert!(selection.is_checked(&user(1, "renamed")));
        assert!(!selection.toggle(user(1, "renamed")));
        assert!(selection.is_empty());
    }

    #[test]
    fn select_does_not_duplicate() {
        let mut selection = Selection::default();
        selection.select_all([user(1, "a"), user(2, "b"), user(1, "a2")]);
        assert_eq!(selection.len(), 2);
        assert_eq!(selection.items()[0].username, "a2");
    }

    #[test]
    fn set_checked_false_removes() {
        let mut selection = Selection::default();
        selection.set_checked(user(3, "c"), true);
        selection.set_checked(user(3, "c"), false);
        assert!(!selection.contains(&3));
    }

    #[test]
    fn reconcile_updates_survivors() {
        let mut selection = Selection::default();
        selection.select(user(5, "old"));
        let dropped = selection.reconcile(&[user(4, "x"), user(5, "new")]);
        assert_eq!(dropped, 0);
        assert_eq!(selection.items(), &[user(5, "new")]);
    }

    #[test]
    fn reconcile_drops_vanished() {
        let mut selection = Selection::default();
        selection.select_all([user(5, "e"), user(6, "f")]);
        let dropped = selection.reconcile(&[user(6, "f")]);
        assert_eq!(dropped, 1);
        assert!(!selection.contains(&5));
        assert!(selection.contains(&6));
    }

    #[test]
    fn single_target() {
        let mut selection = Selection::default();
        assert_eq!(selection.single().unwrap_err(), SelectionError::NothingSelected);
        selection.select(user(1, "a"));
        assert_eq!(selection.single().unwrap().username, "a");
        selection.select(user(2, "b"));
        assert_eq!(selection.single().unwrap_err(), SelectionError::MultipleSelected(2));
    }
}
